use serde::{Deserialize, Serialize};

use crate::models::overs_display;

/// Over/ball bookkeeping for the match.
///
/// Two views are kept in lockstep by the single `advance_ball` entry point:
/// a cumulative legal-ball counter per team (for the overs-limit check) and
/// the shared current-over/current-ball pair (for over-boundary detection).
/// Nothing else may increment either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InningsClock {
    total_overs: u16,
    current_over: u16,
    /// Ball within the current over, always in 0..=5.
    current_ball: u8,
    legal_balls: [u32; 2],
}

impl InningsClock {
    pub fn new(total_overs: u16) -> Self {
        Self { total_overs, current_over: 0, current_ball: 0, legal_balls: [0, 0] }
    }

    /// Record one delivery for the batting team.
    ///
    /// Legal deliveries advance both counters; when the sixth legal ball of
    /// the over lands, the ball counter resets, the over increments and
    /// `true` is returned. Illegal deliveries (wide, no-ball) advance
    /// nothing and never complete an over.
    pub fn advance_ball(&mut self, team: usize, is_legal: bool) -> bool {
        if !is_legal {
            return false;
        }
        self.legal_balls[team] += 1;
        if self.current_ball == 5 {
            self.current_ball = 0;
            self.current_over += 1;
            true
        } else {
            self.current_ball += 1;
            false
        }
    }

    /// True when the team has used its full allocation of legal balls.
    pub fn overs_exhausted(&self, team: usize) -> bool {
        self.legal_balls[team] >= self.total_overs as u32 * 6
    }

    /// True before a delivery that would be the sixth legal ball.
    pub fn is_last_ball_of_over(&self) -> bool {
        self.current_ball == 5
    }

    pub fn current_over(&self) -> u16 {
        self.current_over
    }

    pub fn current_ball(&self) -> u8 {
        self.current_ball
    }

    pub fn legal_balls(&self, team: usize) -> u32 {
        self.legal_balls[team]
    }

    pub fn total_overs(&self) -> u16 {
        self.total_overs
    }

    /// `"O.B"` string for the given team's innings.
    pub fn overs_display(&self, team: usize) -> String {
        overs_display(self.legal_balls[team])
    }

    /// Reset the shared over/ball pair for a fresh innings. The per-team
    /// cumulative counters are per-team already and carry over untouched.
    pub fn reset_for_innings(&mut self) {
        self.current_over = 0;
        self.current_ball = 0;
    }
}
