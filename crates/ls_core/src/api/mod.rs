//! Boundary contracts: the JSON command API, the snapshot broadcast hook
//! and the per-match session registry.

pub mod command_json;
pub mod registry;

use std::sync::Mutex;

use crate::error::Result;
use crate::models::ScoreSnapshot;
use crate::state::MatchScoringSession;

pub use command_json::{apply_command, apply_command_json, ScoringCommand};

/// Outbound collaborator receiving a full-state snapshot after every
/// accepted command. Fire-and-forget from the core's perspective: the core
/// hands the snapshot over in command order and never waits on delivery.
pub trait SnapshotSink {
    fn publish(&self, snapshot: &ScoreSnapshot);
}

/// Sink that writes a one-line summary to the log; the default wiring when
/// no real-time channel is attached.
pub struct LogSink;

impl SnapshotSink for LogSink {
    fn publish(&self, snapshot: &ScoreSnapshot) {
        log::info!(
            "match {}: {}/{} ({}) | {}/{} ({})",
            snapshot.match_id,
            snapshot.team1_score.runs,
            snapshot.team1_score.wickets,
            snapshot.team1_score.overs,
            snapshot.team2_score.runs,
            snapshot.team2_score.wickets,
            snapshot.team2_score.overs,
        );
    }
}

/// Sink that buffers every published snapshot, for tests and replay tools.
#[derive(Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<ScoreSnapshot>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ScoreSnapshot> {
        std::mem::take(&mut *self.snapshots.lock().expect("RecordingSink lock poisoned"))
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().expect("RecordingSink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotSink for RecordingSink {
    fn publish(&self, snapshot: &ScoreSnapshot) {
        self.snapshots.lock().expect("RecordingSink lock poisoned").push(snapshot.clone());
    }
}

/// Apply a command and broadcast the resulting snapshot. Rejected commands
/// publish nothing.
pub fn apply_and_publish(
    session: &mut MatchScoringSession,
    command: ScoringCommand,
    sink: &dyn SnapshotSink,
) -> Result<ScoreSnapshot> {
    let snapshot = apply_command(session, command)?;
    sink.publish(&snapshot);
    Ok(snapshot)
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
    fn test_snapshots_published_in_command_order() {
        let mut session = session();
        let sink = RecordingSink::new();

        apply_and_publish(&mut session, ScoringCommand::AddRuns { runs: 4 }, &sink).unwrap();
        apply_and_publish(&mut session, ScoringCommand::AddRuns { runs: 1 }, &sink).unwrap();

        let published = sink.take();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].team1_score.runs, 4);
        assert_eq!(published[1].team1_score.runs, 5);
    }

    #[test]
    fn test_rejected_command_publishes_nothing() {
        let mut session = session();
        let sink = RecordingSink::new();

        let result = apply_and_publish(&mut session, ScoringCommand::AddRuns { runs: 9 }, &sink);
        assert!(result.is_err());
        assert!(sink.is_empty());
    }
}
