//! Match Scoring Session
//!
//! This module owns the mutable scoring root for one live match. All
//! mutation goes through the command methods (`engine::delivery`,
//! `engine::completion`, and the selection methods here), never through
//! direct field assignment, so the session can be serialized, restored and
//! rolled back.

pub mod undo;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::clock::InningsClock;
use crate::engine::eligibility::{eligible_bowlers, BowlingHistory, OverQuota};
use crate::error::{Result, ScoringError};
use crate::models::{
    BattingLedger, BowlingLedger, CompletionPayload, ExtrasTally, InningsSnapshot, MatchConfig,
    MatchData, MatchSetup, PlayersAtCrease, ScoreSnapshot, TeamScore, TeamScoreView,
};
use crate::save::format::{current_timestamp, SessionSave};
use crate::save::SAVE_VERSION;

pub use undo::UndoLog;

/// Explicit session phase, replacing the dialog-flag booleans of scoreboard
/// UIs. Delivery commands are only accepted in `AwaitingDelivery`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingDelivery,
    AwaitingBowlerSelection,
    AwaitingBatsmanReplacement,
    InningsBreak,
    MatchComplete,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::AwaitingDelivery => "awaiting_delivery",
            SessionPhase::AwaitingBowlerSelection => "awaiting_bowler_selection",
            SessionPhase::AwaitingBatsmanReplacement => "awaiting_batsman_replacement",
            SessionPhase::InningsBreak => "innings_break",
            SessionPhase::MatchComplete => "match_complete",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the undo log must capture: match counters, both ledgers, the
/// bowling history, the dismissed set, plus the phase and commentary the
/// delivery commands themselves mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringState {
    pub phase: SessionPhase,
    /// 1 or 2.
    pub current_inning: u8,
    pub scores: [TeamScore; 2],
    pub extras: [ExtrasTally; 2],
    pub clock: InningsClock,
    pub striker: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: Option<String>,
    pub batting: [BattingLedger; 2],
    pub bowling: [BowlingLedger; 2],
    /// Batters out in the current innings; cleared on innings switch.
    pub dismissed: BTreeSet<String>,
    pub history: [BowlingHistory; 2],
    /// Commentary for the current innings.
    pub ball_by_ball: Vec<String>,
    /// Chase target, set when the second innings starts.
    pub target: Option<u32>,
}

impl ScoringState {
    pub fn new(total_overs: u16) -> Self {
        Self {
            phase: SessionPhase::AwaitingDelivery,
            current_inning: 1,
            scores: [TeamScore::default(), TeamScore::default()],
            extras: [ExtrasTally::default(), ExtrasTally::default()],
            clock: InningsClock::new(total_overs),
            striker: None,
            non_striker: None,
            bowler: None,
            batting: [BattingLedger::new(), BattingLedger::new()],
            bowling: [BowlingLedger::new(), BowlingLedger::new()],
            dismissed: BTreeSet::new(),
            history: [BowlingHistory::new(), BowlingHistory::new()],
            ball_by_ball: Vec::new(),
            target: None,
        }
    }
}

/// The authoritative scoring session for one match.
#[derive(Debug, Clone)]
pub struct MatchScoringSession {
    setup: MatchSetup,
    config: MatchConfig,
    pub(crate) state: ScoringState,
    pub(crate) undo: UndoLog,
    pub(crate) innings_snapshots: Vec<InningsSnapshot>,
    pub(crate) completion: Option<CompletionPayload>,
}

impl MatchScoringSession {
    /// Create a session for the given setup. Rosters must hold at least two
    /// uniquely-named players each.
    pub fn new(setup: MatchSetup, config: MatchConfig) -> Result<Self> {
        for team in &setup.teams {
            let mut seen = BTreeSet::new();
            for name in &team.players {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ScoringError::UnknownPlayer { name: name.clone() });
                }
                if !seen.insert(trimmed) {
                    return Err(ScoringError::DuplicatePlayer { name: trimmed.to_string() });
                }
            }
            if team.players.len() < 2 {
                return Err(ScoringError::BatsmenRequired);
            }
        }

        let undo_depth = config.undo_depth;
        let total_overs = config.total_overs;
        Ok(Self {
            setup,
            config,
            state: ScoringState::new(total_overs),
            undo: UndoLog::new(undo_depth),
            innings_snapshots: Vec::new(),
            completion: None,
        })
    }

    // ========================
    // Accessors
    // ========================

    pub fn match_id(&self) -> &str {
        &self.setup.match_id
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn state(&self) -> &ScoringState {
        &self.state
    }

    pub fn target(&self) -> Option<u32> {
        self.state.target
    }

    pub fn completion(&self) -> Option<&CompletionPayload> {
        self.completion.as_ref()
    }

    pub fn innings_snapshots(&self) -> &[InningsSnapshot] {
        &self.innings_snapshots
    }

    /// Index of the team batting this innings (0 or 1).
    pub(crate) fn batting_idx(&self) -> usize {
        (self.state.current_inning as usize - 1).min(1)
    }

    pub(crate) fn fielding_idx(&self) -> usize {
        1 - self.batting_idx()
    }

    // ========================
    // Selection commands
    // ========================

    /// Set the openers and opening bowler for the first innings. Only valid
    /// before any delivery has been scored.
    pub fn open_innings(&mut self, striker: &str, non_striker: &str, bowler: &str) -> Result<()> {
        if self.state.phase != SessionPhase::AwaitingDelivery || self.state.current_inning != 1 {
            return Err(ScoringError::WrongPhase {
                expected: "awaiting_delivery",
                actual: self.state.phase.name(),
            });
        }
        if self.state.clock.legal_balls(0) > 0 || self.state.bowler.is_some() {
            return Err(ScoringError::OverComplete);
        }
        self.place_opening_players(striker, non_striker, bowler)?;
        log::info!(
            "match {}: innings 1 open, {} and {} batting, {} bowling",
            self.setup.match_id,
            striker.trim(),
            non_striker.trim(),
            bowler.trim()
        );
        Ok(())
    }

    /// Shared opener placement for both innings; validates rosters and
    /// distinctness, registers batters, records the opening over.
    pub(crate) fn place_opening_players(
        &mut self,
        striker: &str,
        non_striker: &str,
        bowler: &str,
    ) -> Result<()> {
        let striker = striker.trim().to_string();
        let non_striker = non_striker.trim().to_string();
        let bowler = bowler.trim().to_string();

        if striker == non_striker {
            return Err(ScoringError::DuplicatePlayer { name: striker });
        }
        let batting_team = self.setup.batting_team(self.state.current_inning);
        for name in [&striker, &non_striker] {
            if name.is_empty() || !batting_team.has_player(name) {
                return Err(ScoringError::UnknownPlayer { name: name.clone() });
            }
        }
        let fielding_team = self.setup.fielding_team(self.state.current_inning);
        if bowler.is_empty() || !fielding_team.has_player(&bowler) {
            return Err(ScoringError::UnknownPlayer { name: bowler });
        }

        let idx = self.batting_idx();
        self.state.batting[idx].register(&striker);
        self.state.batting[idx].register(&non_striker);
        self.state.history[idx].record(self.state.clock.current_over(), &bowler);
        self.state.striker = Some(striker);
        self.state.non_striker = Some(non_striker);
        self.state.bowler = Some(bowler);
        Ok(())
    }

    /// Choose the bowler for the next over. Only valid while the session is
    /// blocked in `AwaitingBowlerSelection` after an over completed.
    pub fn select_next_bowler(&mut self, name: &str) -> Result<()> {
        if self.state.phase != SessionPhase::AwaitingBowlerSelection {
            return Err(ScoringError::WrongPhase {
                expected: "awaiting_bowler_selection",
                actual: self.state.phase.name(),
            });
        }
        let name = name.trim().to_string();
        let idx = self.batting_idx();
        if name.is_empty() || !self.setup.fielding_team(self.state.current_inning).has_player(&name)
        {
            return Err(ScoringError::UnknownPlayer { name });
        }
        if self.state.history[idx].last_bowler() == Some(name.as_str()) {
            return Err(ScoringError::ConsecutiveOver { name });
        }
        let quota = OverQuota { limit: self.config.max_overs_per_bowler };
        if quota.remaining(&self.state.history[idx], &name) == Some(0) {
            return Err(ScoringError::QuotaExhausted { name });
        }

        self.state.history[idx].record(self.state.clock.current_over(), &name);
        self.state.bowler = Some(name.clone());
        self.state.phase = SessionPhase::AwaitingDelivery;
        log::info!("match {}: over {} to {}", self.setup.match_id, self.state.clock.current_over(), name);
        Ok(())
    }

    /// Bowlers allowed to take the next over.
    pub fn eligible_next_bowlers(&self) -> Vec<String> {
        let quota = OverQuota { limit: self.config.max_overs_per_bowler };
        eligible_bowlers(
            &self.setup.fielding_team(self.state.current_inning).players,
            &self.state.history[self.batting_idx()],
            quota,
            None,
        )
    }

    /// Batting-roster names still available to come in: not dismissed and
    /// not currently at the crease.
    pub fn available_batsmen(&self) -> Vec<String> {
        self.setup
            .batting_team(self.state.current_inning)
            .players
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| !self.state.dismissed.contains(name))
            .filter(|name| {
                self.state.striker.as_deref() != Some(name.as_str())
                    && self.state.non_striker.as_deref() != Some(name.as_str())
            })
            .collect()
    }

    /// Resolve an `AwaitingBatsmanReplacement` block by bringing in a new
    /// batter for whichever at-crease name is in the dismissed set.
    pub fn replace_batsman(&mut self, newcomer: &str) -> Result<()> {
        if self.state.phase != SessionPhase::AwaitingBatsmanReplacement {
            return Err(ScoringError::WrongPhase {
                expected: "awaiting_batsman_replacement",
                actual: self.state.phase.name(),
            });
        }
        let newcomer = self.validate_new_batsman(newcomer)?;

        let striker_out = self
            .state
            .striker
            .as_deref()
            .map(|name| self.state.dismissed.contains(name))
            .unwrap_or(true);
        let idx = self.batting_idx();
        self.state.batting[idx].register(&newcomer);
        if striker_out {
            self.state.striker = Some(newcomer);
        } else {
            self.state.non_striker = Some(newcomer);
        }
        self.state.phase = SessionPhase::AwaitingDelivery;
        Ok(())
    }

    /// Roster/dismissal/duplication checks for an incoming batter; returns
    /// the trimmed name.
    pub(crate) fn validate_new_batsman(&self, name: &str) -> Result<String> {
        let name = name.trim().to_string();
        if name.is_empty() || !self.setup.batting_team(self.state.current_inning).has_player(&name)
        {
            return Err(ScoringError::UnknownPlayer { name });
        }
        if self.state.dismissed.contains(&name) {
            return Err(ScoringError::AlreadyDismissed { name });
        }
        if self.state.striker.as_deref() == Some(name.as_str())
            || self.state.non_striker.as_deref() == Some(name.as_str())
        {
            return Err(ScoringError::AlreadyBatting { name });
        }
        Ok(name)
    }

    // ========================
    // Undo
    // ========================

    /// Roll back the most recent accepted delivery command.
    pub fn undo(&mut self) -> Result<ScoreSnapshot> {
        let previous = self.undo.pop().ok_or(ScoringError::NoHistory)?;
        self.state = previous;
        if self.state.phase != SessionPhase::MatchComplete {
            // A rolled-back finishing ball un-finishes the match.
            self.completion = None;
        }
        log::info!("match {}: undo applied", self.setup.match_id);
        Ok(self.snapshot())
    }

    // ========================
    // Projection
    // ========================

    /// Full-state projection for broadcast after every accepted command.
    pub fn snapshot(&self) -> ScoreSnapshot {
        let idx = self.batting_idx();
        ScoreSnapshot {
            match_id: self.setup.match_id.clone(),
            team1_score: self.team_score_view(0),
            team2_score: self.team_score_view(1),
            match_data: MatchData {
                current_inning: self.state.current_inning,
                ball_by_ball: self.state.ball_by_ball.clone(),
                current_players: PlayersAtCrease {
                    striker: self.state.striker.clone(),
                    non_striker: self.state.non_striker.clone(),
                    bowler: self.state.bowler.clone(),
                },
                batting_stats: self.state.batting[idx].records().to_vec(),
                bowling_stats: self.state.bowling[idx].records().to_vec(),
            },
            target: self.state.target,
        }
    }

    pub(crate) fn team_score_view(&self, team: usize) -> TeamScoreView {
        TeamScoreView {
            runs: self.state.scores[team].runs,
            wickets: self.state.scores[team].wickets,
            overs: self.state.clock.overs_display(team),
        }
    }

    /// Defensive check for conditions that should be unreachable; a failure
    /// here indicates a core bug and is fatal to the session.
    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.state.clock.current_ball() > 5 {
            return Err(ScoringError::Invariant(format!(
                "current_ball out of range: {}",
                self.state.clock.current_ball()
            )));
        }
        if let (Some(striker), Some(non_striker)) =
            (self.state.striker.as_deref(), self.state.non_striker.as_deref())
        {
            if striker == non_striker {
                return Err(ScoringError::Invariant(format!(
                    "striker and non-striker are both {}",
                    striker
                )));
            }
        }
        for team in 0..2 {
            if self.state.scores[team].wickets > self.config.max_wickets {
                return Err(ScoringError::Invariant(format!(
                    "wickets exceed maximum: {}",
                    self.state.scores[team].wickets
                )));
            }
        }
        Ok(())
    }

    // ========================
    // Persistence conversion
    // ========================

    /// Convert runtime state to the checkpoint format.
    pub fn to_save(&self) -> SessionSave {
        SessionSave {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            setup: self.setup.clone(),
            config: self.config.clone(),
            scoring: self.state.clone(),
            innings_snapshots: self.innings_snapshots.clone(),
            completion: self.completion.clone(),
        }
    }

    /// Restore a session from a checkpoint. The undo ring restarts empty;
    /// history does not survive a crash.
    pub fn from_save(save: SessionSave) -> Self {
        let undo_depth = save.config.undo_depth;
        Self {
            setup: save.setup,
            config: save.config,
            state: save.scoring,
            undo: UndoLog::new(undo_depth),
            innings_snapshots: save.innings_snapshots,
            completion: save.completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;

    fn eleven(prefix: &str) -> Vec<String> {
        (1..=11).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn session() -> MatchScoringSession {
        let setup = MatchSetup::new(Team::new("Blues", eleven("S")), Team::new("Reds", eleven("R")));
        MatchScoringSession::new(setup, MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_duplicate_roster_name_rejected() {
        let mut players = eleven("S");
        players[5] = "S1".to_string();
        let setup = MatchSetup::new(Team::new("Blues", players), Team::new("Reds", eleven("R")));
        assert!(matches!(
            MatchScoringSession::new(setup, MatchConfig::default()),
            Err(ScoringError::DuplicatePlayer { .. })
        ));
    }

    #[test]
    fn test_open_innings_validates_rosters() {
        let mut session = session();
        assert!(matches!(
            session.open_innings("S1", "S1", "R11"),
            Err(ScoringError::DuplicatePlayer { .. })
        ));
        assert!(matches!(
            session.open_innings("S1", "S2", "S3"),
            Err(ScoringError::UnknownPlayer { .. })
        ));
        session.open_innings("S1", "S2", "R11").unwrap();
        assert_eq!(session.state().striker.as_deref(), Some("S1"));
        assert_eq!(session.state().history[0].last_bowler(), Some("R11"));
    }

    #[test]
    fn test_select_next_bowler_only_when_pending() {
        let mut session = session();
        session.open_innings("S1", "S2", "R11").unwrap();
        assert!(matches!(
            session.select_next_bowler("R10"),
            Err(ScoringError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_undo_without_history() {
        let mut session = session();
        assert!(matches!(session.undo(), Err(ScoringError::NoHistory)));
    }

    #[test]
    fn test_snapshot_shape() {
        let mut session = session();
        session.open_innings("S1", "S2", "R11").unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.team1_score.overs, "0.0");
        assert_eq!(snapshot.match_data.current_inning, 1);
        assert_eq!(snapshot.match_data.current_players.striker.as_deref(), Some("S1"));
        assert_eq!(snapshot.match_data.batting_stats.len(), 2);
        assert_eq!(snapshot.target, None);
    }

    #[test]
    fn test_save_roundtrip_preserves_scoring_state() {
        let mut session = session();
        session.open_innings("S1", "S2", "R11").unwrap();
        session.state.scores[0].runs = 37;

        let save = session.to_save();
        let restored = MatchScoringSession::from_save(save);

        assert_eq!(restored.state().scores[0].runs, 37);
        assert_eq!(restored.state().striker.as_deref(), Some("S1"));
        assert!(restored.undo.is_empty());
    }

    #[test]
    fn test_available_batsmen_excludes_crease_and_dismissed() {
        let mut session = session();
        session.open_innings("S1", "S2", "R11").unwrap();
        session.state.dismissed.insert("S3".to_string());

        let available = session.available_batsmen();
        assert!(!available.contains(&"S1".to_string()));
        assert!(!available.contains(&"S2".to_string()));
        assert!(!available.contains(&"S3".to_string()));
        assert_eq!(available.len(), 8);
    }
}
