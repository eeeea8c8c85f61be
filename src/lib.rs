//! Lorcana Forge - rules text parser and turn engine for Disney Lorcana
//!
//! Card rules text is parsed into structured ability definitions
//! (`parser`), which a deterministic two-player game engine (`game`)
//! executes through an event-driven trigger system.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod parser;
pub mod zones;

pub use error::{LorcanaError, Result};
