//! Replay and inspection library for scoring sessions.
//!
//! A match file carries the team sheets, the opening players and the full
//! JSON command log; replaying it through the engine reproduces the exact
//! scorecard the live session produced.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::Path;

use ls_core::{
    BattingRecord, BowlingRecord, InningsSnapshot, MatchConfig, MatchScoringSession, MatchSetup,
    SessionPhase, Team,
};

/// One side of the match file: display name plus roster.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    pub players: Vec<String>,
}

/// Players in place when the first ball is bowled.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningSpec {
    pub striker: String,
    pub non_striker: String,
    pub bowler: String,
}

/// On-disk match file. `team1` bats first; `commands` is the command log
/// in the exact order the live session accepted them.
#[derive(Debug, Deserialize)]
pub struct MatchFile {
    pub team1: TeamSpec,
    pub team2: TeamSpec,
    #[serde(default)]
    pub config: Option<MatchConfig>,
    pub opening: OpeningSpec,
    #[serde(default)]
    pub commands: Vec<serde_json::Value>,
}

/// What happened during a replay run.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub applied: usize,
    /// Rejected commands as (zero-based index, error string). A faithful
    /// log replays clean; rejections mean the log and engine disagree.
    pub rejected: Vec<(usize, String)>,
}

pub fn load_match_file(path: &Path) -> Result<MatchFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read match file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse match file: {}", path.display()))
}

/// Build a fresh session from the match file header and feed it the
/// command log. Rejections are collected, not fatal: the caller decides
/// whether a dirty replay is an error.
pub fn run_replay(file: &MatchFile) -> Result<(MatchScoringSession, ReplayReport)> {
    let setup = MatchSetup::new(
        Team::new(file.team1.name.clone(), file.team1.players.clone()),
        Team::new(file.team2.name.clone(), file.team2.players.clone()),
    );
    let config = file.config.clone().unwrap_or_default();
    let mut session =
        MatchScoringSession::new(setup, config).context("Match file has an invalid team sheet")?;
    session
        .open_innings(&file.opening.striker, &file.opening.non_striker, &file.opening.bowler)
        .context("Match file has invalid opening players")?;

    let mut report = ReplayReport::default();
    for (index, command) in file.commands.iter().enumerate() {
        let json = serde_json::to_string(command)?;
        match ls_core::apply_command_json(&mut session, &json) {
            Ok(_) => report.applied += 1,
            Err(err) => report.rejected.push((index, err)),
        }
    }
    Ok((session, report))
}

// ========================
// Scorecard rendering
// ========================

fn render_batting(out: &mut String, records: &[BattingRecord]) {
    let _ = writeln!(out, "  {:<16} {:>4} {:>4} {:>3} {:>3} {:>7}", "Batter", "R", "B", "4s", "6s", "SR");
    for r in records {
        let marker = if r.is_dismissed { "" } else { "*" };
        let _ = writeln!(
            out,
            "  {:<16} {:>4} {:>4} {:>3} {:>3} {:>7.1}",
            format!("{}{}", r.name, marker),
            r.runs,
            r.balls,
            r.fours,
            r.sixes,
            r.strike_rate,
        );
    }
}

fn render_bowling(out: &mut String, records: &[BowlingRecord]) {
    let _ = writeln!(out, "  {:<16} {:>5} {:>4} {:>3} {:>7}", "Bowler", "O", "R", "W", "Econ");
    for r in records {
        let _ = writeln!(
            out,
            "  {:<16} {:>5} {:>4} {:>3} {:>7.2}",
            r.name,
            r.overs_display(),
            r.runs_conceded,
            r.wickets,
            r.economy_rate,
        );
    }
}

fn render_innings(out: &mut String, innings: &InningsSnapshot) {
    let _ = writeln!(
        out,
        "Innings {}: {} {}/{} ({} ov)",
        innings.inning_number,
        innings.batting_team,
        innings.final_score.runs,
        innings.final_score.wickets,
        innings.final_score.overs,
    );
    let _ = writeln!(out, "  Extras: {}", innings.extras.total());
    render_batting(out, &innings.batsmen);
    render_bowling(out, &innings.bowlers);
    let _ = writeln!(out);
}

/// Text scorecard for the session as it stands. Finished innings render
/// from their captured snapshots; a live innings renders from the running
/// ledgers.
pub fn render_scorecard(session: &MatchScoringSession) -> String {
    let mut out = String::new();
    let state = session.state();

    for innings in session.innings_snapshots() {
        render_innings(&mut out, innings);
    }

    let captured_current = session
        .innings_snapshots()
        .iter()
        .any(|i| i.inning_number == state.current_inning);
    if !captured_current {
        let batting_idx = (state.current_inning as usize - 1).min(1);
        let team = session.setup().batting_team(state.current_inning);
        let _ = writeln!(
            out,
            "Innings {} (in progress): {} {}/{} ({} ov)",
            state.current_inning,
            team.name,
            state.scores[batting_idx].runs,
            state.scores[batting_idx].wickets,
            state.clock.overs_display(batting_idx),
        );
        render_batting(&mut out, state.batting[batting_idx].records());
        render_bowling(&mut out, state.bowling[batting_idx].records());
        let _ = writeln!(out);
    }

    if let Some(target) = session.target() {
        if session.phase() != SessionPhase::MatchComplete {
            let _ = writeln!(out, "Target: {}", target);
        }
    }
    match session.completion() {
        Some(completion) => {
            let _ = writeln!(out, "Result: {}", completion.result.summary);
            if let Some(mom) = &completion.man_of_the_match {
                let _ = writeln!(out, "Man of the match: {}", mom);
            }
        }
        None => {
            let _ = writeln!(out, "Match in progress ({})", session.phase());
        }
    }
    out
}

/// Canned two-innings, two-over match for the `demo` subcommand.
pub fn demo_match_file() -> MatchFile {
    let commands = [
        r#"{"command":"add_runs","runs":4}"#,
        r#"{"command":"add_runs","runs":1}"#,
        r#"{"command":"add_extra","extra":"wide","runs":1}"#,
        r#"{"command":"add_runs","runs":6}"#,
        r#"{"command":"add_wicket","type":"caught","fielder":"Smith","next_batsman":"Mendis"}"#,
        r#"{"command":"add_runs","runs":0}"#,
        r#"{"command":"add_runs","runs":2}"#,
        r#"{"command":"select_next_bowler","name":"Rashid"}"#,
        r#"{"command":"add_runs","runs":1}"#,
        r#"{"command":"add_extra","extra":"leg-bye","runs":1}"#,
        r#"{"command":"add_runs","runs":4}"#,
        r#"{"command":"add_runs","runs":0}"#,
        r#"{"command":"add_runs","runs":1}"#,
        r#"{"command":"add_runs","runs":2}"#,
        r#"{"command":"switch_innings","striker":"Finch","non_striker":"Warner","bowler":"Starc"}"#,
        r#"{"command":"add_runs","runs":6}"#,
        r#"{"command":"add_runs","runs":4}"#,
        r#"{"command":"add_runs","runs":4}"#,
        r#"{"command":"add_runs","runs":4}"#,
        r#"{"command":"add_runs","runs":6}"#,
    ]
    .iter()
    .map(|json| serde_json::from_str(json).unwrap_or_default())
    .collect();

    MatchFile {
        team1: TeamSpec {
            name: "Strikers".to_string(),
            players: ["Kohli", "Sharma", "Mendis", "Rahul", "Pant", "Jadeja", "Khan", "Starc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        team2: TeamSpec {
            name: "Chasers".to_string(),
            players: ["Finch", "Warner", "Smith", "Maxwell", "Stoinis", "Carey", "Rashid", "Boult"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        config: Some(MatchConfig { total_overs: 2, ..MatchConfig::default() }),
        opening: OpeningSpec {
            striker: "Kohli".to_string(),
            non_striker: "Sharma".to_string(),
            bowler: "Boult".to_string(),
        },
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_replay_completes_cleanly() {
        let file = demo_match_file();
        let (session, report) = run_replay(&file).unwrap();

        assert!(report.rejected.is_empty(), "rejections: {:?}", report.rejected);
        assert_eq!(report.applied, file.commands.len());
        assert_eq!(session.phase(), SessionPhase::MatchComplete);

        let card = render_scorecard(&session);
        assert!(card.contains("Innings 1: Strikers"), "{card}");
        assert!(card.contains("Result: Chasers won by"), "{card}");
    }

    #[test]
    fn test_replay_reports_rejected_commands() {
        let mut file = demo_match_file();
        file.commands.insert(3, serde_json::json!({"command": "add_runs", "runs": 9}));
        let (_, report) = run_replay(&file).unwrap();

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, 3);
        assert!(report.rejected[0].1.contains("E_CMD_VALIDATION"));
    }

    #[test]
    fn test_load_match_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        let json = r#"{
            "team1": {"name": "A", "players": ["A1", "A2", "A3"]},
            "team2": {"name": "B", "players": ["B1", "B2", "B3"]},
            "opening": {"striker": "A1", "non_striker": "A2", "bowler": "B1"},
            "commands": [{"command": "add_runs", "runs": 4}]
        }"#;
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(json.as_bytes()).unwrap();

        let file = load_match_file(&path).unwrap();
        let (session, report) = run_replay(&file).unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(session.state().scores[0].runs, 4);
    }

    #[test]
    fn test_load_match_file_missing_path() {
        let err = load_match_file(Path::new("/nonexistent/match.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read match file"));
    }

    #[test]
    fn test_scorecard_renders_live_innings() {
        let mut file = demo_match_file();
        file.commands.truncate(4);
        let (session, _) = run_replay(&file).unwrap();

        let card = render_scorecard(&session);
        assert!(card.contains("Innings 1 (in progress): Strikers 12/0"), "{card}");
        assert!(card.contains("Match in progress"), "{card}");
    }
}
