use thiserror::Error;

use crate::save::SaveError;

/// Crate-wide error type for the scoring core.
///
/// Three families, matching how the boundary treats them:
/// - precondition rejections: user-facing, recoverable, state untouched
/// - validation errors: bad external input, rejected before any mutation
/// - invariant violations: indicate a core bug, fatal to the session
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("match already complete")]
    MatchAlreadyComplete,

    #[error("first innings complete - start second innings first")]
    FirstInningsComplete,

    #[error("next bowler must be selected before scoring")]
    BowlerSelectionPending,

    #[error("dismissed batter must be replaced before the next delivery")]
    BatsmanReplacementPending,

    #[error("bowler required")]
    BowlerRequired,

    #[error("striker and non-striker required")]
    BatsmenRequired,

    #[error("over already complete")]
    OverComplete,

    #[error("innings already complete")]
    InningsComplete,

    #[error("wrong session phase: expected {expected}, in {actual}")]
    WrongPhase { expected: &'static str, actual: &'static str },

    #[error("invalid run value: {runs} (must be 0..=6)")]
    InvalidRuns { runs: u32 },

    #[error("extras require at least 1 run, got {runs}")]
    InvalidExtraRuns { runs: u32 },

    #[error("player not on roster: {name}")]
    UnknownPlayer { name: String },

    #[error("player already dismissed: {name}")]
    AlreadyDismissed { name: String },

    #[error("player already at the crease: {name}")]
    AlreadyBatting { name: String },

    #[error("players must be distinct: {name}")]
    DuplicatePlayer { name: String },

    #[error("bowler bowled the previous over: {name}")]
    ConsecutiveOver { name: String },

    #[error("bowler over quota exhausted: {name}")]
    QuotaExhausted { name: String },

    #[error("next batsman required for this wicket")]
    NextBatsmanRequired,

    #[error("nothing to undo")]
    NoHistory,

    #[error("a scoring session is already bound for match {match_id}")]
    SessionAlreadyBound { match_id: String },

    #[error("no scoring session bound for match {match_id}")]
    SessionNotBound { match_id: String },

    #[error("scoring invariant violated: {0}")]
    Invariant(String),

    #[error("save error: {0}")]
    Save(#[from] SaveError),
}

impl ScoringError {
    /// Whether the caller can recover by correcting input and retrying.
    ///
    /// Everything except invariant violations is recoverable; an invariant
    /// failure means the session state itself is suspect.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScoringError::Invariant(_))
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
