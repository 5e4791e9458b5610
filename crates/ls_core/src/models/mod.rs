pub mod batting;
pub mod bowling;
pub mod events;
pub mod score;
pub mod snapshot;
pub mod team;

pub use batting::{BattingLedger, BattingRecord};
pub use bowling::{BowlingLedger, BowlingRecord};
pub use events::{DismissedBatter, ExtraKind, WicketKind};
pub use score::{overs_display, ExtrasTally, TeamScore};
pub use snapshot::{
    CompletionPayload, InningsSnapshot, MatchData, MatchResultSummary, PlayersAtCrease,
    ResultType, ScoreSnapshot, TeamScoreView,
};
pub use team::{MatchConfig, MatchSetup, Team};
