//! Innings and match completion.
//!
//! Captures innings snapshots, computes the final verdict and handles the
//! break between innings (which needs human team-sheet input before
//! scoring can resume).

use crate::error::{Result, ScoringError};
use crate::models::{
    CompletionPayload, InningsSnapshot, MatchResultSummary, ResultType, ScoreSnapshot,
};
use crate::state::{MatchScoringSession, SessionPhase};

impl MatchScoringSession {
    /// Freeze the given innings' ledgers and score into an immutable
    /// snapshot. Re-capturing the same inning number replaces the earlier
    /// snapshot instead of appending a duplicate.
    pub fn capture_innings(&mut self, inning: u8) {
        let idx = (inning as usize - 1).min(1);
        let ball_by_ball = if inning == self.state.current_inning {
            self.state.ball_by_ball.clone()
        } else {
            // Commentary for an earlier innings only survives inside its
            // previously captured snapshot.
            self.innings_snapshots
                .iter()
                .find(|s| s.inning_number == inning)
                .map(|s| s.ball_by_ball.clone())
                .unwrap_or_default()
        };
        let snapshot = InningsSnapshot {
            inning_number: inning,
            batting_team: self.setup().batting_team(inning).name.clone(),
            final_score: self.team_score_view(idx),
            extras: self.state.extras[idx],
            batsmen: self.state.batting[idx].records().to_vec(),
            bowlers: self.state.bowling[idx].records().to_vec(),
            ball_by_ball,
        };
        match self.innings_snapshots.iter().position(|s| s.inning_number == inning) {
            Some(pos) => self.innings_snapshots[pos] = snapshot,
            None => self.innings_snapshots.push(snapshot),
        }
    }

    /// Handle the end of the current innings: break after the first, final
    /// result after the second.
    pub(crate) fn resolve_innings_end(&mut self) -> Result<()> {
        if self.state.current_inning == 1 {
            self.capture_innings(1);
            self.state.phase = SessionPhase::InningsBreak;
            log::info!(
                "match {}: first innings complete at {}/{} ({})",
                self.match_id(),
                self.state.scores[0].runs,
                self.state.scores[0].wickets,
                self.state.clock.overs_display(0)
            );
        } else {
            self.finalize_match()?;
        }
        Ok(())
    }

    /// Immediate completion when the chasing side reaches the target
    /// mid-delivery; skips the generic overs/wickets checks.
    pub(crate) fn finalize_chase(&mut self) -> Result<ScoreSnapshot> {
        self.finalize_match()?;
        Ok(self.snapshot())
    }

    /// Compute the verdict from the two innings and complete the session.
    fn finalize_match(&mut self) -> Result<()> {
        self.capture_innings(1);
        self.capture_innings(2);

        let team1 = self.state.scores[0].runs;
        let team2 = self.state.scores[1].runs;
        let target = self.state.target.unwrap_or(team1 + 1);

        let result = if team2 >= target {
            let margin = self.config().max_wickets - self.state.scores[1].wickets;
            MatchResultSummary {
                winner_id: Some(self.setup().teams[1].id.clone()),
                result_type: ResultType::WicketsMargin,
                margin_runs: None,
                margin_wickets: Some(margin),
                summary: format!("{} won by {} wickets", self.setup().teams[1].name, margin),
            }
        } else if team2 == team1 {
            MatchResultSummary {
                winner_id: None,
                result_type: ResultType::Tie,
                margin_runs: None,
                margin_wickets: None,
                summary: "Match tied".to_string(),
            }
        } else {
            let margin = team1 - team2;
            MatchResultSummary {
                winner_id: Some(self.setup().teams[0].id.clone()),
                result_type: ResultType::RunsMargin,
                margin_runs: Some(margin),
                margin_wickets: None,
                summary: format!("{} won by {} runs", self.setup().teams[0].name, margin),
            }
        };

        log::info!("match {}: complete, {}", self.match_id(), result.summary);
        self.completion = Some(CompletionPayload {
            match_id: self.match_id().to_string(),
            result,
            innings: self.innings_snapshots.clone(),
            man_of_the_match: None,
        });
        self.state.phase = SessionPhase::MatchComplete;
        Ok(())
    }

    /// Start the second innings with fresh openers and an opening bowler.
    /// Resets all innings-scoped state and surfaces the chase target.
    pub fn switch_innings(
        &mut self,
        striker: &str,
        non_striker: &str,
        bowler: &str,
    ) -> Result<ScoreSnapshot> {
        if self.state.phase != SessionPhase::InningsBreak {
            return Err(ScoringError::WrongPhase {
                expected: "innings_break",
                actual: self.state.phase.name(),
            });
        }

        // Validate the full team sheet before touching any state.
        let striker_name = striker.trim();
        let non_striker_name = non_striker.trim();
        let bowler_name = bowler.trim();
        if striker_name == non_striker_name
            || striker_name == bowler_name
            || non_striker_name == bowler_name
        {
            return Err(ScoringError::DuplicatePlayer { name: striker_name.to_string() });
        }
        for name in [striker_name, non_striker_name] {
            if name.is_empty() || !self.setup().batting_team(2).has_player(name) {
                return Err(ScoringError::UnknownPlayer { name: name.to_string() });
            }
        }
        if bowler_name.is_empty() || !self.setup().fielding_team(2).has_player(bowler_name) {
            return Err(ScoringError::UnknownPlayer { name: bowler_name.to_string() });
        }

        self.state.current_inning = 2;
        self.state.clock.reset_for_innings();
        self.state.dismissed.clear();
        self.state.ball_by_ball.clear();
        self.state.striker = None;
        self.state.non_striker = None;
        self.state.bowler = None;
        self.state.target = Some(self.state.scores[0].runs + 1);
        self.state.phase = SessionPhase::AwaitingDelivery;
        self.place_opening_players(striker_name, non_striker_name, bowler_name)?;

        log::info!(
            "match {}: second innings, target {}",
            self.match_id(),
            self.state.scores[0].runs + 1
        );
        Ok(self.snapshot())
    }

    /// Attach the post-match award to the completion payload. Only valid
    /// once the match is complete; the core never picks the player itself.
    pub fn set_man_of_the_match(&mut self, name: &str) -> Result<()> {
        match self.completion.as_mut() {
            Some(payload) => {
                payload.man_of_the_match = Some(name.trim().to_string());
                Ok(())
            }
            None => Err(ScoringError::WrongPhase {
                expected: "match_complete",
                actual: self.state.phase.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::delivery::WicketCommand;
    use crate::models::{ExtraKind, MatchConfig, MatchSetup, Team, WicketKind};

    fn eleven(prefix: &str) -> Vec<String> {
        (1..=11).map(|i| format!("{}{}", prefix, i)).collect()
    }

    /// Two-over match so innings end quickly.
    fn short_session() -> MatchScoringSession {
        let setup =
            MatchSetup::new(Team::new("Blues", eleven("S")), Team::new("Reds", eleven("R")));
        let config = MatchConfig { total_overs: 2, ..MatchConfig::default() };
        let mut session = MatchScoringSession::new(setup, config).unwrap();
        session.open_innings("S1", "S2", "R1").unwrap();
        session
    }

    fn play_full_first_innings(session: &mut MatchScoringSession, runs_per_ball: u32) {
        for over in 0..2 {
            for _ in 0..6 {
                session.add_runs(runs_per_ball).unwrap();
            }
            if over == 0 {
                session.select_next_bowler("R2").unwrap();
            }
        }
    }

    #[test]
    fn test_first_innings_end_enters_break() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 1);

        assert_eq!(session.phase(), SessionPhase::InningsBreak);
        assert!(matches!(session.add_runs(1), Err(ScoringError::FirstInningsComplete)));
        let captured = &session.innings_snapshots()[0];
        assert_eq!(captured.inning_number, 1);
        assert_eq!(captured.final_score.runs, 12);
        assert_eq!(captured.final_score.overs, "2.0");
        assert_eq!(captured.ball_by_ball.len(), 12);
    }

    #[test]
    fn test_switch_innings_sets_target_and_resets() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 1);

        let snapshot = session.switch_innings("R1", "R2", "S5").unwrap();
        assert_eq!(session.target(), Some(13));
        assert_eq!(snapshot.match_data.current_inning, 2);
        assert!(snapshot.match_data.ball_by_ball.is_empty());
        assert_eq!(session.state().clock.current_over(), 0);
        assert_eq!(session.state().striker.as_deref(), Some("R1"));
        // First-innings data survives the reset.
        assert_eq!(session.innings_snapshots()[0].final_score.runs, 12);
    }

    #[test]
    fn test_switch_innings_rejects_bad_team_sheet() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 1);

        assert!(matches!(
            session.switch_innings("R1", "R1", "S5"),
            Err(ScoringError::DuplicatePlayer { .. })
        ));
        assert!(matches!(
            session.switch_innings("S1", "R2", "S5"),
            Err(ScoringError::UnknownPlayer { .. })
        ));
        // Still at the break, nothing mutated.
        assert_eq!(session.phase(), SessionPhase::InningsBreak);
        assert_eq!(session.state().current_inning, 1);
    }

    #[test]
    fn test_chase_completes_immediately_mid_over() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 1); // 12 runs, target 13
        session.switch_innings("R1", "R2", "S5").unwrap();

        for _ in 0..2 {
            session.add_runs(4).unwrap();
        }
        // 8 so far; this boundary takes the chase past 13 mid-over.
        let snapshot = session.add_runs(6).unwrap();

        assert_eq!(session.phase(), SessionPhase::MatchComplete);
        let result = &session.completion().unwrap().result;
        assert_eq!(result.result_type, ResultType::WicketsMargin);
        assert_eq!(result.margin_wickets, Some(10));
        assert_eq!(result.summary, "Reds won by 10 wickets");
        assert_eq!(snapshot.team2_score.runs, 14);
        assert!(matches!(session.add_runs(1), Err(ScoringError::MatchAlreadyComplete)));
    }

    #[test]
    fn test_defending_side_wins_by_runs() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 2); // 24 runs, target 25
        session.switch_innings("R1", "R2", "S5").unwrap();

        for over in 0..2 {
            for _ in 0..6 {
                session.add_runs(1).unwrap();
            }
            if over == 0 {
                session.select_next_bowler("S6").unwrap();
            }
        }

        assert_eq!(session.phase(), SessionPhase::MatchComplete);
        let result = &session.completion().unwrap().result;
        assert_eq!(result.result_type, ResultType::RunsMargin);
        assert_eq!(result.margin_runs, Some(12));
        assert_eq!(result.summary, "Blues won by 12 runs");
    }

    #[test]
    fn test_level_scores_tie() {
        let mut session = short_session();
        play_full_first_innings(&mut session, 1); // 12 runs
        session.switch_innings("R1", "R2", "S5").unwrap();

        for over in 0..2 {
            for _ in 0..6 {
                session.add_runs(1).unwrap();
            }
            if over == 0 {
                session.select_next_bowler("S6").unwrap();
            }
        }

        let result = &session.completion().unwrap().result;
        assert_eq!(result.result_type, ResultType::Tie);
        assert_eq!(result.winner_id, None);
        assert_eq!(result.summary, "Match tied");
    }

    #[test]
    fn test_all_out_ends_innings() {
        let setup =
            MatchSetup::new(Team::new("Blues", eleven("S")), Team::new("Reds", eleven("R")));
        let config = MatchConfig { total_overs: 20, max_wickets: 2, ..MatchConfig::default() };
        let mut session = MatchScoringSession::new(setup, config).unwrap();
        session.open_innings("S1", "S2", "R1").unwrap();

        let cmd = WicketCommand {
            next_batsman: Some("S3".to_string()),
            ..WicketCommand::new(WicketKind::Bowled)
        };
        session.add_wicket(cmd).unwrap();
        // Second wicket is all out; no replacement required.
        session.add_wicket(WicketCommand::new(WicketKind::Caught)).unwrap();

        assert_eq!(session.phase(), SessionPhase::InningsBreak);
        assert_eq!(session.innings_snapshots()[0].final_score.wickets, 2);
    }

    #[test]
    fn test_recapture_replaces_snapshot() {
        let mut session = short_session();
        session.add_runs(4).unwrap();
        session.capture_innings(1);
        session.add_runs(2).unwrap();
        session.capture_innings(1);

        assert_eq!(session.innings_snapshots().len(), 1);
        assert_eq!(session.innings_snapshots()[0].final_score.runs, 6);
    }

    #[test]
    fn test_man_of_the_match_only_after_completion() {
        let mut session = short_session();
        assert!(session.set_man_of_the_match("S1").is_err());

        play_full_first_innings(&mut session, 1);
        session.switch_innings("R1", "R2", "S5").unwrap();
        for _ in 0..4 {
            session.add_runs(4).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::MatchComplete);

        session.set_man_of_the_match("R1").unwrap();
        assert_eq!(session.completion().unwrap().man_of_the_match.as_deref(), Some("R1"));
    }

    #[test]
    fn test_extras_counted_in_captured_innings() {
        let mut session = short_session();
        session.add_extra(ExtraKind::Wide, 1).unwrap();
        session.add_runs(2).unwrap();
        session.capture_innings(1);

        let captured = &session.innings_snapshots()[0];
        assert_eq!(captured.extras.wides, 1);
        assert_eq!(captured.final_score.runs, 3);
    }
}
