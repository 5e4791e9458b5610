use serde::{Deserialize, Serialize};

use super::batting::BattingRecord;
use super::bowling::BowlingRecord;
use super::score::ExtrasTally;

/// Score line for one team as shown on the board: `"123/4"` in `"15.2"` overs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TeamScoreView {
    pub runs: u32,
    pub wickets: u8,
    /// `"O.B"` string, never a decimal fraction.
    pub overs: String,
}

/// The two batters and the bowler currently in play.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PlayersAtCrease {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub striker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_striker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowler: Option<String>,
}

/// Innings-scoped detail carried inside each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchData {
    pub current_inning: u8,
    pub ball_by_ball: Vec<String>,
    pub current_players: PlayersAtCrease,
    pub batting_stats: Vec<BattingRecord>,
    pub bowling_stats: Vec<BowlingRecord>,
}

/// Full-state projection emitted after every accepted command.
///
/// Broadcast order must match command order; each snapshot stands alone
/// (it is not a delta).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreSnapshot {
    pub match_id: String,
    pub team1_score: TeamScoreView,
    pub team2_score: TeamScoreView,
    pub match_data: MatchData,
    /// Chase target, present during the second innings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// Immutable record of a finished (or re-captured) innings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InningsSnapshot {
    pub inning_number: u8,
    pub batting_team: String,
    pub final_score: TeamScoreView,
    pub extras: ExtrasTally,
    pub batsmen: Vec<BattingRecord>,
    pub bowlers: Vec<BowlingRecord>,
    pub ball_by_ball: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Defending side won; margin expressed in runs.
    RunsMargin,
    /// Chasing side won; margin expressed in wickets in hand.
    WicketsMargin,
    Tie,
}

/// Final match verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResultSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    pub result_type: ResultType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_runs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_wickets: Option<u8>,
    /// Human-readable line, e.g. `"Reds won by 5 wickets"`.
    pub summary: String,
}

/// Scorecard written once at match end (idempotent on the persistence side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub match_id: String,
    pub result: MatchResultSummary,
    pub innings: Vec<InningsSnapshot>,
    /// Post-completion award, chosen by the caller, never by the core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub man_of_the_match: Option<String>,
}
