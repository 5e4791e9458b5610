//! # ls_core - Ball-by-Ball Cricket Scoring Engine
//!
//! This library provides the scoring core for a live match platform:
//! a ball-by-ball state machine tracking innings, overs, strike rotation,
//! bowler eligibility, wicket/extras combinations and the target chase,
//! with single-step undo and mid-match recovery from persisted state.
//!
//! ## Features
//! - Deterministic command processing (same commands = same scorecard)
//! - Full-state snapshot after every accepted command
//! - Bounded undo ring with exact single-command rollback
//! - Checkpoint persistence with idempotent completion writes
//! - JSON command API for easy integration with UI and API layers

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod state;

// Re-export the command surface
pub use api::{
    apply_and_publish, apply_command, apply_command_json, LogSink, RecordingSink, ScoringCommand,
    SnapshotSink,
};
pub use engine::{eligible_bowlers, BowlingHistory, InningsClock, OverQuota, WicketCommand};
pub use error::{Result, ScoringError};

// Re-export the data model
pub use models::{
    BattingLedger, BattingRecord, BowlingLedger, BowlingRecord, CompletionPayload, DismissedBatter,
    ExtraKind, ExtrasTally, InningsSnapshot, MatchConfig, MatchResultSummary, MatchSetup,
    ResultType, ScoreSnapshot, Team, TeamScore, WicketKind,
};

// Re-export persistence and session management
pub use save::{CompletionOutcome, SaveError, SaveManager, SessionSave};
pub use state::{MatchScoringSession, ScoringState, SessionPhase, UndoLog};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
