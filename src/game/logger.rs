//! Game logger with verbosity filtering and in-memory capture
//!
//! Tests switch the logger to `OutputMode::Memory` and read the captured
//! entries back through `logs()`.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    Memory,
    Both,
}

impl OutputMode {
    fn prints(self) -> bool {
        matches!(self, OutputMode::Stdout | OutputMode::Both)
    }

    fn captures(self) -> bool {
        matches!(self, OutputMode::Memory | OutputMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// "controller_choice", "trigger", or `None` for plain lines
    pub category: Option<&'static str>,
}

/// Logger owned by `GameState`
///
/// Captured entries are kept regardless of verbosity; printing is filtered.
/// Only the settings survive serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    #[serde(default)]
    output_mode: OutputMode,
    #[serde(skip)]
    captured: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture into memory and stop printing
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        self.output_mode.captures()
    }

    pub fn logs(&self) -> Ref<'_, [LogEntry]> {
        Ref::map(self.captured.borrow(), Vec::as_slice)
    }

    pub fn clear_logs(&mut self) {
        self.captured.get_mut().clear();
    }

    /// Print captured entries the verbosity allows, then drop them
    pub fn flush_buffer(&mut self) {
        for entry in self.captured.get_mut().drain(..) {
            if entry.level <= self.verbosity {
                print_line(entry.level, &entry.message);
            }
        }
    }

    fn emit(&self, level: VerbosityLevel, message: &str, category: Option<&'static str>) {
        if self.output_mode.captures() {
            self.captured.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            });
        }
        if self.output_mode.prints() && level <= self.verbosity {
            print_line(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.emit(VerbosityLevel::Minimal, message, None);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, message, None);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, message, None);
    }

    /// A controller decision the engine had to step in on
    #[inline]
    pub fn controller_choice(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, message, Some("controller_choice"));
    }

    /// A triggered ability about to resolve; shown at Verbose
    #[inline]
    pub fn trigger(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, message, Some("trigger"));
    }
}

// Outcome lines flush left, everything else indented under its turn header
fn print_line(level: VerbosityLevel, message: &str) {
    if level == VerbosityLevel::Minimal {
        println!("{message}");
    } else {
        println!("  {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert_eq!(logger.output_mode(), OutputMode::Stdout);
        assert!(!logger.is_capturing());
    }

    #[test]
    fn test_capture_keeps_categories() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("Alice quests with Goofy for 1 lore");
        logger.minimal("Turn 2");
        logger.controller_choice("Illegal action ignored; passing");

        let logs = logger.logs();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "Alice quests with Goofy for 1 lore");
        assert_eq!(logs[1].level, VerbosityLevel::Minimal);
        assert_eq!(logs[2].category, Some("controller_choice"));
    }

    #[test]
    fn test_capture_ignores_verbosity() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        logger.verbose("Jafar triggers");
        assert_eq!(logger.logs().len(), 1);
    }

    #[test]
    fn test_both_mode_captures() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.set_output_mode(OutputMode::Both);
        assert!(logger.is_capturing());
        logger.trigger("Jafar triggers");
        assert_eq!(logger.logs()[0].category, Some("trigger"));
    }

    #[test]
    fn test_flush_and_clear() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        logger.normal("first");
        logger.normal("second");
        logger.flush_buffer();
        assert!(logger.logs().is_empty());

        logger.normal("third");
        logger.clear_logs();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_serde_keeps_settings_only() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();
        logger.normal("not serialized");

        let json = serde_json::to_string(&logger).unwrap();
        let back: GameLogger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.verbosity(), VerbosityLevel::Verbose);
        assert_eq!(back.output_mode(), OutputMode::Memory);
        assert!(back.logs().is_empty());
    }
}
