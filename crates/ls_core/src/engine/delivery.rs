//! Delivery processing - the scoring state machine.
//!
//! The three delivery commands (`add_runs`, `add_wicket`, `add_extra`) all
//! follow the same shape: check every precondition with no mutation, push
//! an undo snapshot, apply the full effect set, then re-check
//! innings-completion. A rejected command leaves the session untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::models::events::{describe_extra, describe_runs, describe_wicket};
use crate::models::{DismissedBatter, ExtraKind, ScoreSnapshot, WicketKind};
use crate::state::{MatchScoringSession, SessionPhase};

/// Inbound wicket command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WicketCommand {
    #[serde(rename = "type")]
    pub kind: WicketKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<String>,
    /// Required unless this wicket makes the side all out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_batsman: Option<String>,
    #[serde(default)]
    pub dismissed: DismissedBatter,
    /// Runs completed (or conceded) on the wicket ball.
    #[serde(default)]
    pub extra_runs: u32,
    /// For run-outs: which of the two remaining batters takes strike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_striker: Option<String>,
}

impl WicketCommand {
    pub fn new(kind: WicketKind) -> Self {
        Self {
            kind,
            fielder: None,
            next_batsman: None,
            dismissed: DismissedBatter::Striker,
            extra_runs: 0,
            new_striker: None,
        }
    }
}

/// Names at the crease once a command passes the precondition gate.
struct Crease {
    striker: String,
    non_striker: String,
    bowler: String,
}

impl MatchScoringSession {
    /// Precondition gate shared by the three delivery commands. Returns the
    /// resolved crease names so the effect code never unwraps.
    fn gate(&mut self) -> Result<Crease> {
        self.check_invariants()?;
        match self.state.phase {
            SessionPhase::AwaitingDelivery => {}
            SessionPhase::AwaitingBowlerSelection => {
                return Err(ScoringError::BowlerSelectionPending)
            }
            SessionPhase::AwaitingBatsmanReplacement => {
                return Err(ScoringError::BatsmanReplacementPending)
            }
            SessionPhase::InningsBreak => return Err(ScoringError::FirstInningsComplete),
            SessionPhase::MatchComplete => return Err(ScoringError::MatchAlreadyComplete),
        }
        let bowler = self.state.bowler.clone().ok_or(ScoringError::BowlerRequired)?;
        let striker = self.state.striker.clone().ok_or(ScoringError::BatsmenRequired)?;
        let non_striker = self.state.non_striker.clone().ok_or(ScoringError::BatsmenRequired)?;

        // A dismissed name at the crease blocks scoring until replaced.
        if self.state.dismissed.contains(&striker) || self.state.dismissed.contains(&non_striker) {
            self.state.phase = SessionPhase::AwaitingBatsmanReplacement;
            return Err(ScoringError::BatsmanReplacementPending);
        }

        let idx = self.batting_idx();
        if self.state.clock.overs_exhausted(idx)
            || self.state.scores[idx].wickets >= self.config().max_wickets
        {
            return Err(ScoringError::InningsComplete);
        }
        Ok(Crease { striker, non_striker, bowler })
    }

    fn swap_strike(&mut self) {
        std::mem::swap(&mut self.state.striker, &mut self.state.non_striker);
    }

    /// True the instant the chasing side has the winning run.
    fn target_reached(&self) -> bool {
        self.state.current_inning == 2
            && self
                .state
                .target
                .map(|target| self.state.scores[1].runs >= target)
                .unwrap_or(false)
    }

    /// Common tail: re-check innings completion, otherwise handle the
    /// over boundary, then project the snapshot.
    fn after_delivery(&mut self, over_done: bool) -> Result<ScoreSnapshot> {
        let idx = self.batting_idx();
        if self.state.clock.overs_exhausted(idx)
            || self.state.scores[idx].wickets >= self.config().max_wickets
        {
            self.resolve_innings_end()?;
            return Ok(self.snapshot());
        }
        if over_done {
            // Scoring blocks until a valid next bowler is chosen.
            self.state.bowler = None;
            self.state.phase = SessionPhase::AwaitingBowlerSelection;
            log::info!(
                "match {}: over {} complete, awaiting bowler",
                self.match_id(),
                self.state.clock.current_over()
            );
        }
        Ok(self.snapshot())
    }

    /// Score a normal delivery: `runs` off the bat, 0..=6.
    pub fn add_runs(&mut self, runs: u32) -> Result<ScoreSnapshot> {
        let crease = self.gate()?;
        if runs > 6 {
            return Err(ScoringError::InvalidRuns { runs });
        }

        self.undo.push(&self.state);
        let idx = self.batting_idx();
        let over = self.state.clock.current_over();
        let ball = self.state.clock.current_ball();

        self.state.scores[idx].runs += runs;
        self.state.batting[idx].credit(&crease.striker, runs, true, runs == 0, None);
        self.state.bowling[idx].credit(&crease.bowler, runs, false, true);
        let over_done = self.state.clock.advance_ball(idx, true);
        self.state
            .ball_by_ball
            .push(describe_runs(over, ball, &crease.bowler, &crease.striker, runs));

        if self.target_reached() {
            // The chase ends the instant the winning run is completed.
            return self.finalize_chase();
        }

        // Normal balls rotate on odd runs; the last ball of the over is
        // inverted so the non-rotating batter faces the new over.
        let rotate = if over_done { runs % 2 == 0 } else { runs % 2 == 1 };
        if rotate {
            self.swap_strike();
        }
        self.after_delivery(over_done)
    }

    /// Score an extra delivery (wide, no-ball, bye or leg-bye).
    pub fn add_extra(&mut self, kind: ExtraKind, runs: u32) -> Result<ScoreSnapshot> {
        let crease = self.gate()?;
        if runs < 1 {
            return Err(ScoringError::InvalidExtraRuns { runs });
        }

        self.undo.push(&self.state);
        let idx = self.batting_idx();
        let legal = kind.counts_as_legal_ball();
        let over = self.state.clock.current_over();
        let ball = self.state.clock.current_ball();

        self.state.scores[idx].runs += runs;
        match kind {
            ExtraKind::Wide => self.state.extras[idx].wides += runs,
            ExtraKind::NoBall => {
                // The mandatory penalty run is an extra; anything beyond it
                // was hit off the bat and belongs to the striker.
                self.state.extras[idx].no_balls += 1;
                let off_bat = runs - 1;
                if off_bat > 0 {
                    self.state.batting[idx].credit(&crease.striker, off_bat, false, false, None);
                }
            }
            ExtraKind::Bye => self.state.extras[idx].byes += runs,
            ExtraKind::LegBye => self.state.extras[idx].leg_byes += runs,
        }
        if legal {
            // Bye/leg-bye: the striker faced the ball but scored nothing.
            self.state.batting[idx].credit(&crease.striker, 0, true, false, None);
        }
        let conceded = if kind.charges_bowler() { runs } else { 0 };
        self.state.bowling[idx].credit(&crease.bowler, conceded, false, legal);
        let over_done = self.state.clock.advance_ball(idx, legal);
        self.state.ball_by_ball.push(describe_extra(over, ball, &crease.bowler, kind, runs));

        if self.target_reached() {
            return self.finalize_chase();
        }

        let rotate = match kind {
            ExtraKind::Wide => false,
            ExtraKind::NoBall => (runs - 1) % 2 == 1,
            ExtraKind::Bye | ExtraKind::LegBye => {
                if over_done {
                    runs % 2 == 0
                } else {
                    runs % 2 == 1
                }
            }
        };
        if rotate {
            self.swap_strike();
        }
        self.after_delivery(over_done)
    }

    /// Score a wicket, including the extra/wicket combination events.
    pub fn add_wicket(&mut self, cmd: WicketCommand) -> Result<ScoreSnapshot> {
        let crease = self.gate()?;
        let idx = self.batting_idx();
        let legal = cmd.kind.counts_as_legal_ball();
        let runs = if cmd.kind.forces_minimum_run() { cmd.extra_runs.max(1) } else { cmd.extra_runs };
        let all_out = self.state.scores[idx].wickets + 1 >= self.config().max_wickets;

        // Validate the incoming batter (and the run-out strike choice)
        // before any mutation.
        let newcomer = match &cmd.next_batsman {
            Some(name) => Some(self.validate_new_batsman(name)?),
            None if all_out => None,
            None => return Err(ScoringError::NextBatsmanRequired),
        };
        let out_name = match cmd.dismissed {
            DismissedBatter::Striker => crease.striker.clone(),
            DismissedBatter::NonStriker => crease.non_striker.clone(),
        };
        let survivor = match cmd.dismissed {
            DismissedBatter::Striker => crease.non_striker.clone(),
            DismissedBatter::NonStriker => crease.striker.clone(),
        };
        let last_ball = legal && self.state.clock.is_last_ball_of_over();

        let (next_striker, next_non_striker) = if all_out {
            (None, Some(survivor.clone()))
        } else {
            let incoming = newcomer.clone().unwrap_or_default();
            let pair = match (&cmd.dismissed, last_ball) {
                // Striker out on the last ball: the survivor keeps the
                // non-boundary end and takes strike for the new over.
                (DismissedBatter::Striker, true) => (survivor.clone(), incoming),
                (DismissedBatter::Striker, false) => (incoming, survivor.clone()),
                (DismissedBatter::NonStriker, _) => (survivor.clone(), incoming),
            };
            match &cmd.new_striker {
                Some(choice) => {
                    let choice = choice.trim().to_string();
                    if choice == pair.0 {
                        (Some(pair.0), Some(pair.1))
                    } else if choice == pair.1 {
                        (Some(pair.1), Some(pair.0))
                    } else {
                        return Err(ScoringError::UnknownPlayer { name: choice });
                    }
                }
                None => (Some(pair.0), Some(pair.1)),
            }
        };

        self.undo.push(&self.state);
        let over = self.state.clock.current_over();
        let ball = self.state.clock.current_ball();

        self.state.scores[idx].runs += runs;
        self.state.scores[idx].wickets += 1;

        // Combination events route runs through extras; plain wickets put
        // completed runs on the striker's card.
        let striker_runs = match cmd.kind.extra_component() {
            Some(ExtraKind::Wide) => {
                self.state.extras[idx].wides += runs;
                0
            }
            Some(ExtraKind::NoBall) => {
                self.state.extras[idx].no_balls += runs;
                0
            }
            Some(ExtraKind::Bye) => {
                self.state.extras[idx].byes += runs;
                0
            }
            Some(ExtraKind::LegBye) => {
                self.state.extras[idx].leg_byes += runs;
                0
            }
            None => runs,
        };

        // The striker is charged the ball faced on every legal delivery,
        // even when the non-striker is the one dismissed.
        let striker_dismissal =
            if cmd.dismissed == DismissedBatter::Striker { Some(cmd.kind) } else { None };
        self.state.batting[idx].credit(
            &crease.striker,
            striker_runs,
            legal,
            legal && runs == 0,
            striker_dismissal,
        );
        if cmd.dismissed == DismissedBatter::NonStriker {
            // Dismissed at the other end with no ball faced on this delivery.
            self.state.batting[idx].credit(&crease.non_striker, 0, false, false, Some(cmd.kind));
        }

        let conceded =
            if cmd.kind.extra_component().map(|e| e.charges_bowler()).unwrap_or(true) { runs } else { 0 };
        self.state.bowling[idx].credit(&crease.bowler, conceded, cmd.kind.credits_bowler(), legal);

        self.state.dismissed.insert(out_name.clone());
        let over_done = self.state.clock.advance_ball(idx, legal);

        if let Some(name) = &newcomer {
            if !all_out {
                self.state.batting[idx].register(name);
            }
        }
        self.state.striker = next_striker;
        self.state.non_striker = next_non_striker;

        self.state.ball_by_ball.push(describe_wicket(
            over,
            ball,
            &crease.bowler,
            &out_name,
            cmd.kind,
            cmd.fielder.as_deref(),
        ));
        log::info!(
            "match {}: wicket, {} {} ({}/{})",
            self.match_id(),
            out_name,
            cmd.kind.label(),
            self.state.scores[idx].runs,
            self.state.scores[idx].wickets
        );

        if self.target_reached() {
            return self.finalize_chase();
        }
        self.after_delivery(over_done)
    }
}
