use serde::{Deserialize, Serialize};

/// Running score for one team's innings.
///
/// The cumulative legal-ball count lives in `InningsClock`, not here, so
/// there is a single source of truth for over arithmetic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TeamScore {
    pub runs: u32,
    pub wickets: u8,
}

/// Runs not credited to any batter, bucketed by delivery type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExtrasTally {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl ExtrasTally {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// Format a legal-ball count as the conventional `"O.B"` overs string.
///
/// Always `completed_overs.balls_in_over`, never a decimal fraction:
/// 33 legal balls renders as `"5.3"`.
pub fn overs_display(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / 6, legal_balls % 6)
}
