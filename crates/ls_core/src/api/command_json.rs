use serde::Deserialize;

use crate::engine::delivery::WicketCommand;
use crate::error::{Result, ScoringError};
use crate::models::{ExtraKind, ScoreSnapshot};
use crate::state::MatchScoringSession;

/// Stable error-code prefixes for the JSON boundary.
pub mod error_codes {
    pub const INVALID_COMMAND: &str = "E_CMD_PARSE";
    pub const PRECONDITION: &str = "E_CMD_PRECONDITION";
    pub const VALIDATION: &str = "E_CMD_VALIDATION";
    pub const NO_HISTORY: &str = "E_CMD_NO_HISTORY";
    pub const INVARIANT: &str = "E_CMD_INVARIANT";
    pub const SERIALIZATION: &str = "E_CMD_SERIALIZE";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

/// Inbound command envelope, e.g. `{"command":"add_runs","runs":4}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScoringCommand {
    AddRuns {
        runs: u32,
    },
    AddWicket {
        #[serde(flatten)]
        wicket: WicketCommand,
    },
    AddExtra {
        extra: ExtraKind,
        runs: u32,
    },
    Undo,
    SwitchInnings {
        striker: String,
        non_striker: String,
        bowler: String,
    },
    SelectNextBowler {
        name: String,
    },
}

/// Dispatch one command against the session, returning the post-command
/// projection. Selection commands also project so every accepted command
/// yields exactly one snapshot for broadcast.
pub fn apply_command(
    session: &mut MatchScoringSession,
    command: ScoringCommand,
) -> Result<ScoreSnapshot> {
    match command {
        ScoringCommand::AddRuns { runs } => session.add_runs(runs),
        ScoringCommand::AddWicket { wicket } => session.add_wicket(wicket),
        ScoringCommand::AddExtra { extra, runs } => session.add_extra(extra, runs),
        ScoringCommand::Undo => session.undo(),
        ScoringCommand::SwitchInnings { striker, non_striker, bowler } => {
            session.switch_innings(&striker, &non_striker, &bowler)
        }
        ScoringCommand::SelectNextBowler { name } => {
            session.select_next_bowler(&name)?;
            Ok(session.snapshot())
        }
    }
}

fn code_for(err: &ScoringError) -> &'static str {
    match err {
        ScoringError::NoHistory => error_codes::NO_HISTORY,
        ScoringError::Invariant(_) => error_codes::INVARIANT,
        ScoringError::InvalidRuns { .. }
        | ScoringError::InvalidExtraRuns { .. }
        | ScoringError::UnknownPlayer { .. }
        | ScoringError::AlreadyDismissed { .. }
        | ScoringError::AlreadyBatting { .. }
        | ScoringError::DuplicatePlayer { .. }
        | ScoringError::NextBatsmanRequired => error_codes::VALIDATION,
        _ => error_codes::PRECONDITION,
    }
}

/// String-in/string-out boundary for callers that speak JSON only.
pub fn apply_command_json(
    session: &mut MatchScoringSession,
    json: &str,
) -> std::result::Result<String, String> {
    let command: ScoringCommand =
        serde_json::from_str(json).map_err(|e| err_code(error_codes::INVALID_COMMAND, e))?;
    let snapshot = apply_command(session, command).map_err(|e| err_code(code_for(&e), e))?;
    serde_json::to_string(&snapshot).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfig, MatchSetup, Team};

    fn eleven(prefix: &str) -> Vec<String> {
        (1..=11).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn session() -> MatchScoringSession {
        let setup =
            MatchSetup::new(Team::new("Blues", eleven("S")), Team::new("Reds", eleven("B")));
        let mut session = MatchScoringSession::new(setup, MatchConfig::default()).unwrap();
        session.open_innings("S1", "S2", "B1").unwrap();
        session
    }

    #[test]
    fn test_add_runs_json() {
        let mut session = session();
        let out = apply_command_json(&mut session, r#"{"command":"add_runs","runs":4}"#).unwrap();

        let snapshot: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(snapshot["team1_score"]["runs"], 4);
        assert_eq!(snapshot["team1_score"]["overs"], "0.1");
    }

    #[test]
    fn test_add_wicket_json_flattened() {
        let mut session = session();
        let json = r#"{
            "command": "add_wicket",
            "type": "caught",
            "fielder": "F1",
            "next_batsman": "S3"
        }"#;
        apply_command_json(&mut session, json).unwrap();
        assert_eq!(session.state().scores[0].wickets, 1);
        assert!(session.state().batting[0].get("S1").unwrap().is_dismissed);
    }

    #[test]
    fn test_add_extra_json() {
        let mut session = session();
        let json = r#"{"command":"add_extra","extra":"no-ball","runs":2}"#;
        apply_command_json(&mut session, json).unwrap();
        assert_eq!(session.state().extras[0].no_balls, 1);
        assert_eq!(session.state().batting[0].get("S1").unwrap().runs, 1);
    }

    #[test]
    fn test_undo_json() {
        let mut session = session();
        apply_command_json(&mut session, r#"{"command":"add_runs","runs":4}"#).unwrap();
        apply_command_json(&mut session, r#"{"command":"undo"}"#).unwrap();
        assert_eq!(session.state().scores[0].runs, 0);
    }

    #[test]
    fn test_parse_error_code() {
        let mut session = session();
        let err = apply_command_json(&mut session, "not json").unwrap_err();
        assert!(err.starts_with(error_codes::INVALID_COMMAND), "{err}");
    }

    #[test]
    fn test_precondition_error_code() {
        let mut session = session();
        for _ in 0..6 {
            apply_command_json(&mut session, r#"{"command":"add_runs","runs":0}"#).unwrap();
        }
        let err =
            apply_command_json(&mut session, r#"{"command":"add_runs","runs":1}"#).unwrap_err();
        assert!(err.starts_with(error_codes::PRECONDITION), "{err}");
    }

    #[test]
    fn test_validation_error_code() {
        let mut session = session();
        let err =
            apply_command_json(&mut session, r#"{"command":"add_runs","runs":9}"#).unwrap_err();
        assert!(err.starts_with(error_codes::VALIDATION), "{err}");
    }

    #[test]
    fn test_no_history_error_code() {
        let mut session = session();
        let err = apply_command_json(&mut session, r#"{"command":"undo"}"#).unwrap_err();
        assert!(err.starts_with(error_codes::NO_HISTORY), "{err}");
    }

    #[test]
    fn test_select_next_bowler_json_projects_snapshot() {
        let mut session = session();
        for _ in 0..6 {
            apply_command_json(&mut session, r#"{"command":"add_runs","runs":0}"#).unwrap();
        }
        let out = apply_command_json(
            &mut session,
            r#"{"command":"select_next_bowler","name":"B2"}"#,
        )
        .unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(snapshot["match_data"]["current_players"]["bowler"], "B2");
    }
}
