use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of the match: identifier, display name and playing eleven.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Playing roster in batting-order preference. Names are the keys used
    /// by every ledger, so they must be unique within the team.
    pub players: Vec<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), name: name.into(), players }
    }

    pub fn has_player(&self, name: &str) -> bool {
        let trimmed = name.trim();
        self.players.iter().any(|p| p.trim() == trimmed)
    }
}

/// Immutable per-match configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Overs per innings.
    pub total_overs: u16,

    /// Wickets that end an innings (all-out).
    pub max_wickets: u8,

    /// Per-bowler over quota. Disabled (`None`) by default; the rule was
    /// dropped from the active rule set but kept configurable.
    pub max_overs_per_bowler: Option<u16>,

    /// Undo ring depth (snapshots retained).
    pub undo_depth: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { total_overs: 20, max_wickets: 10, max_overs_per_bowler: None, undo_depth: 10 }
    }
}

/// Static match setup: who plays, in what order.
///
/// `teams[0]` bats the first innings; the toss is decided by the caller
/// before the session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSetup {
    pub match_id: String,
    pub teams: [Team; 2],
}

impl MatchSetup {
    pub fn new(team1: Team, team2: Team) -> Self {
        Self { match_id: Uuid::new_v4().to_string(), teams: [team1, team2] }
    }

    /// Team batting in the given innings (1-based).
    pub fn batting_team(&self, inning: u8) -> &Team {
        &self.teams[(inning as usize - 1).min(1)]
    }

    /// Team fielding in the given innings (1-based).
    pub fn fielding_team(&self, inning: u8) -> &Team {
        &self.teams[1 - (inning as usize - 1).min(1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eleven(prefix: &str) -> Vec<String> {
        (1..=11).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_roster_lookup_trims_names() {
        let team = Team::new("Blues", eleven("B"));
        assert!(team.has_player("B3"));
        assert!(team.has_player(" B3 "));
        assert!(!team.has_player("Z9"));
    }

    #[test]
    fn test_batting_fielding_sides_swap_by_inning() {
        let setup = MatchSetup::new(Team::new("Blues", eleven("B")), Team::new("Reds", eleven("R")));
        assert_eq!(setup.batting_team(1).name, "Blues");
        assert_eq!(setup.fielding_team(1).name, "Reds");
        assert_eq!(setup.batting_team(2).name, "Reds");
        assert_eq!(setup.fielding_team(2).name, "Blues");
    }

    #[test]
    fn test_default_config_has_quota_disabled() {
        let config = MatchConfig::default();
        assert_eq!(config.max_overs_per_bowler, None);
        assert_eq!(config.undo_depth, 10);
        assert_eq!(config.max_wickets, 10);
    }
}
