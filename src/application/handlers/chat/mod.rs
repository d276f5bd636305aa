//! Chat handlers - turn processing.

mod process_turn;

pub use process_turn::{ChatError, ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult};
