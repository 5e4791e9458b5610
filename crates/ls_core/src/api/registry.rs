//! Global per-match session registry.
//!
//! One authoritative scoring session per match id: concurrent command
//! sources must go through `with_session`, which serializes them behind the
//! registry lock. A second bind for the same match is rejected rather than
//! silently replacing the authoritative session.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, ScoringError};
use crate::state::MatchScoringSession;

static SESSIONS: Lazy<RwLock<HashMap<String, MatchScoringSession>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Bind the authoritative session for its match id.
pub fn bind_session(session: MatchScoringSession) -> Result<()> {
    let mut sessions = SESSIONS.write().expect("SESSIONS lock poisoned");
    let match_id = session.match_id().to_string();
    if sessions.contains_key(&match_id) {
        return Err(ScoringError::SessionAlreadyBound { match_id });
    }
    sessions.insert(match_id, session);
    Ok(())
}

/// Run a closure against the bound session. Commands from any number of
/// callers are applied strictly one at a time.
pub fn with_session<T>(
    match_id: &str,
    f: impl FnOnce(&mut MatchScoringSession) -> Result<T>,
) -> Result<T> {
    let mut sessions = SESSIONS.write().expect("SESSIONS lock poisoned");
    let session = sessions
        .get_mut(match_id)
        .ok_or_else(|| ScoringError::SessionNotBound { match_id: match_id.to_string() })?;
    f(session)
}

/// Unbind and return the session (e.g. after the completion write).
pub fn release_session(match_id: &str) -> Option<MatchScoringSession> {
    SESSIONS.write().expect("SESSIONS lock poisoned").remove(match_id)
}

pub fn is_bound(match_id: &str) -> bool {
    SESSIONS.read().expect("SESSIONS lock poisoned").contains_key(match_id)
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
    fn test_bind_apply_release() {
        let session = session();
        let match_id = session.match_id().to_string();

        bind_session(session).unwrap();
        assert!(is_bound(&match_id));

        with_session(&match_id, |s| s.add_runs(4)).unwrap();
        with_session(&match_id, |s| s.add_runs(1)).unwrap();
        with_session(&match_id, |s| {
            assert_eq!(s.state().scores[0].runs, 5);
            Ok(())
        })
        .unwrap();

        let released = release_session(&match_id).unwrap();
        assert_eq!(released.state().scores[0].runs, 5);
        assert!(!is_bound(&match_id));
    }

    #[test]
    fn test_double_bind_rejected() {
        let session = session();
        let match_id = session.match_id().to_string();
        let imposter = session.clone();

        bind_session(session).unwrap();
        assert!(matches!(
            bind_session(imposter),
            Err(ScoringError::SessionAlreadyBound { .. })
        ));
        release_session(&match_id);
    }

    #[test]
    fn test_unbound_match_rejected() {
        assert!(matches!(
            with_session("ghost", |s| s.add_runs(1)),
            Err(ScoringError::SessionNotBound { .. })
        ));
    }
}
