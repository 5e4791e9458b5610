use serde::{Deserialize, Serialize};

/// One completed-or-started over attributed to a bowler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverEntry {
    pub over_number: u16,
    pub bowler: String,
}

/// Ordered record of who bowled which over in one innings. Used only to
/// answer "who bowled last" for the consecutive-over rule and to count
/// overs against the (optional) quota.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BowlingHistory {
    entries: Vec<OverEntry>,
}

impl BowlingHistory {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn record(&mut self, over_number: u16, bowler: &str) {
        self.entries.push(OverEntry { over_number, bowler: bowler.to_string() });
    }

    /// The bowler of the most recent over in this innings, if any.
    pub fn last_bowler(&self) -> Option<&str> {
        self.entries.last().map(|e| e.bowler.as_str())
    }

    pub fn overs_bowled_by(&self, bowler: &str) -> u16 {
        self.entries.iter().filter(|e| e.bowler == bowler).count() as u16
    }

    pub fn entries(&self) -> &[OverEntry] {
        &self.entries
    }
}

/// Per-bowler over quota. The rule is retired from the active rule set but
/// kept configurable; `limit: None` means no quota is ever enforced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OverQuota {
    pub limit: Option<u16>,
}

impl OverQuota {
    pub fn disabled() -> Self {
        Self { limit: None }
    }

    /// Overs the bowler may still bowl, `None` meaning "no quota".
    pub fn remaining(&self, history: &BowlingHistory, bowler: &str) -> Option<u16> {
        self.limit.map(|limit| limit.saturating_sub(history.overs_bowled_by(bowler)))
    }

    fn allows(&self, history: &BowlingHistory, bowler: &str) -> bool {
        match self.remaining(history, bowler) {
            None => true,
            Some(remaining) => remaining > 0,
        }
    }
}

/// Bowlers allowed to bowl the next over.
///
/// A bowler is eligible iff the trimmed name is non-empty, differs from the
/// excluded bowler (by default the previous over's bowler in this innings),
/// and has quota remaining when a quota is configured.
pub fn eligible_bowlers(
    fielding_roster: &[String],
    history: &BowlingHistory,
    quota: OverQuota,
    exclude: Option<&str>,
) -> Vec<String> {
    let excluded = exclude.or_else(|| history.last_bowler()).map(str::trim);

    fielding_roster
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| Some(*name) != excluded)
        .filter(|name| quota.allows(history, name))
        .map(str::to_string)
        .collect()
}
