use serde::{Deserialize, Serialize};

use super::score::overs_display;

/// Per-player bowling aggregate for one innings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BowlingRecord {
    pub name: String,
    /// Deliveries that count toward the over (excludes wides and no-balls).
    pub legal_balls: u32,
    /// Every delivery bowled, legal or not.
    pub total_balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// runs_conceded per over bowled, 0.0 while no legal ball bowled.
    pub economy_rate: f32,
}

impl BowlingRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            legal_balls: 0,
            total_balls: 0,
            runs_conceded: 0,
            wickets: 0,
            economy_rate: 0.0,
        }
    }

    /// Overs bowled as `"O.B"` (e.g. 14 legal balls -> `"2.2"`).
    pub fn overs_display(&self) -> String {
        overs_display(self.legal_balls)
    }

    fn recompute_economy(&mut self) {
        self.economy_rate = if self.legal_balls > 0 {
            self.runs_conceded as f32 / (self.legal_balls as f32 / 6.0)
        } else {
            0.0
        };
    }
}

/// Bowling aggregates for one innings, in order of first spell.
///
/// The session holds one ledger per innings number, so a bowler appearing
/// in both innings gets independent records.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BowlingLedger {
    records: Vec<BowlingRecord>,
}

impl BowlingLedger {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Upsert a delivery against a bowler's analysis.
    pub fn credit(&mut self, name: &str, runs_conceded: u32, is_wicket: bool, counts_as_ball: bool) {
        let idx = match self.records.iter().position(|r| r.name == name) {
            Some(idx) => idx,
            None => {
                self.records.push(BowlingRecord::new(name));
                self.records.len() - 1
            }
        };
        let record = &mut self.records[idx];

        record.runs_conceded += runs_conceded;
        record.total_balls += 1;
        if counts_as_ball {
            record.legal_balls += 1;
        }
        if is_wicket {
            record.wickets += 1;
        }
        record.recompute_economy();
    }

    pub fn get(&self, name: &str) -> Option<&BowlingRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn records(&self) -> &[BowlingRecord] {
        &self.records
    }
}
