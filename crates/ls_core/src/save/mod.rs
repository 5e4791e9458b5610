//! Checkpoint persistence and the write-once scorecard store.
//!
//! The scoring core never persists per ball; durable copies are written at
//! the innings/match checkpoints and read back for crash recovery.

pub mod error;
pub mod format;
pub mod manager;
pub mod migration;

pub use error::SaveError;
pub use format::SessionSave;
pub use manager::{CompletionOutcome, SaveManager};

/// Current checkpoint format version.
pub const SAVE_VERSION: u32 = 1;
