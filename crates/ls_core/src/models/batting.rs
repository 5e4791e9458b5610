use serde::{Deserialize, Serialize};

use super::events::WicketKind;

/// Per-player batting aggregate for one innings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BattingRecord {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub dots: u32,
    pub fours: u32,
    pub sixes: u32,
    /// runs / balls * 100, 0.0 while no ball has been faced.
    pub strike_rate: f32,
    pub is_dismissed: bool,
    pub dismissal: Option<WicketKind>,
}

impl BattingRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            runs: 0,
            balls: 0,
            dots: 0,
            fours: 0,
            sixes: 0,
            strike_rate: 0.0,
            is_dismissed: false,
            dismissal: None,
        }
    }

    fn recompute_strike_rate(&mut self) {
        self.strike_rate =
            if self.balls > 0 { self.runs as f32 / self.balls as f32 * 100.0 } else { 0.0 };
    }
}

/// Batting aggregates for one innings, in order of arrival at the crease.
///
/// Vec-backed so the scorecard preserves batting order; lookups go through
/// `iter().position` on the (small) roster.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BattingLedger {
    records: Vec<BattingRecord>,
}

impl BattingLedger {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Upsert a delivery against a batter's record.
    ///
    /// Creates the record lazily on first involvement. Boundary counters
    /// recognize exactly-4 and exactly-6. Passing a dismissal marks the
    /// batter out; repeating it does not double-count.
    pub fn credit(
        &mut self,
        name: &str,
        runs: u32,
        counts_as_ball: bool,
        is_dot: bool,
        dismissal: Option<WicketKind>,
    ) {
        let idx = match self.records.iter().position(|r| r.name == name) {
            Some(idx) => idx,
            None => {
                self.records.push(BattingRecord::new(name));
                self.records.len() - 1
            }
        };
        let record = &mut self.records[idx];

        record.runs += runs;
        if counts_as_ball {
            record.balls += 1;
        }
        if is_dot {
            record.dots += 1;
        }
        match runs {
            4 => record.fours += 1,
            6 => record.sixes += 1,
            _ => {}
        }
        if let Some(kind) = dismissal {
            if !record.is_dismissed {
                record.is_dismissed = true;
                record.dismissal = Some(kind);
            }
        }
        record.recompute_strike_rate();
    }

    /// Register a new arrival with a zero-stat entry so the batter appears
    /// on the scorecard before facing a ball.
    pub fn register(&mut self, name: &str) {
        self.credit(name, 0, false, false, None);
    }

    pub fn get(&self, name: &str) -> Option<&BattingRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn records(&self) -> &[BattingRecord] {
        &self.records
    }

    /// Sum of runs scored off the bat (excludes extras).
    pub fn total_runs(&self) -> u32 {
        self.records.iter().map(|r| r.runs).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_upsert_and_strike_rate() {
        let mut ledger = BattingLedger::new();
        ledger.credit("S1", 1, true, false, None);

        let record = ledger.get("S1").unwrap();
        assert_eq!(record.runs, 1);
        assert_eq!(record.balls, 1);
        assert_eq!(record.strike_rate, 100.0);
    }

    #[test]
    fn test_zero_balls_has_zero_strike_rate() {
        let mut ledger = BattingLedger::new();
        ledger.register("S3");

        let record = ledger.get("S3").unwrap();
        assert_eq!(record.balls, 0);
        assert_eq!(record.strike_rate, 0.0);
        assert!(!record.is_dismissed);
    }

    #[test]
    fn test_boundary_counters() {
        let mut ledger = BattingLedger::new();
        ledger.credit("S1", 4, true, false, None);
        ledger.credit("S1", 6, true, false, None);
        ledger.credit("S1", 4, true, false, None);
        ledger.credit("S1", 3, true, false, None);

        let record = ledger.get("S1").unwrap();
        assert_eq!(record.fours, 2);
        assert_eq!(record.sixes, 1);
        assert_eq!(record.runs, 17);
    }

    #[test]
    fn test_dot_counter() {
        let mut ledger = BattingLedger::new();
        ledger.credit("S1", 0, true, true, None);
        ledger.credit("S1", 0, true, true, None);
        ledger.credit("S1", 2, true, false, None);

        let record = ledger.get("S1").unwrap();
        assert_eq!(record.dots, 2);
        assert_eq!(record.balls, 3);
    }

    #[test]
    fn test_dismissal_is_idempotent() {
        let mut ledger = BattingLedger::new();
        ledger.credit("S1", 0, true, true, Some(WicketKind::Bowled));
        ledger.credit("S1", 0, false, false, Some(WicketKind::RunOut));

        let record = ledger.get("S1").unwrap();
        assert!(record.is_dismissed);
        assert_eq!(record.dismissal, Some(WicketKind::Bowled));
    }

    #[test]
    fn test_arrival_order_preserved() {
        let mut ledger = BattingLedger::new();
        ledger.register("S1");
        ledger.register("S2");
        ledger.credit("S1", 4, true, false, None);
        ledger.register("S3");

        let names: Vec<&str> = ledger.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["S1", "S2", "S3"]);
        assert_eq!(ledger.total_runs(), 4);
    }
}
