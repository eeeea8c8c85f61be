//! Game state, turn structure and the trigger engine

/// Verbose log line that costs nothing when the feature is disabled
///
/// When `verbose-logging` is off, the `format!` is compiled out entirely.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod actions;
pub mod controller;
pub mod events;
pub mod game_loop;
pub mod logger;
pub mod phase;
pub mod resolve;
pub mod scripted_controller;
pub mod state;
pub mod statics;
pub mod triggers;
pub mod zero_controller;

pub use actions::{PlayMode, PlayerAction};
pub use controller::{ControllerSet, GameStateView, PlayerController};
pub use events::{EventListener, EventLog, GameEvent};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use phase::{Phase, Step, TurnStructure};
pub use scripted_controller::ScriptedController;
pub use state::{GameConfig, GameState};
pub use zero_controller::ZeroController;
