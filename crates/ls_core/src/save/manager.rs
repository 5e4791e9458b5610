use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, SessionSave};
use super::migration::migrate_save;
use crate::models::CompletionPayload;
use crate::state::MatchScoringSession;

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Result of a completion write. The write is once-per-match: repeats are
/// acknowledged but change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Recorded,
    AlreadyProcessed,
}

/// Checkpoint and scorecard persistence rooted at one directory.
///
/// Checkpoints are binary session saves keyed by match id; completed
/// scorecards are JSON for external consumers. All writes are atomic
/// (temp file + rename).
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist the session at a checkpoint (innings end, match end).
    pub fn checkpoint(&self, session: &MatchScoringSession) -> Result<PathBuf, SaveError> {
        let path = self.checkpoint_path(session.match_id());
        self.save_to_path(&path, &session.to_save())?;
        log::info!("match {}: checkpoint written", session.match_id());
        Ok(path)
    }

    /// Rebuild a session from its latest checkpoint.
    pub fn recover(&self, match_id: &str) -> Result<MatchScoringSession, SaveError> {
        let path = self.checkpoint_path(match_id);
        let save = self.load_from_path(&path)?;
        log::info!("match {}: recovered from checkpoint", match_id);
        Ok(MatchScoringSession::from_save(save))
    }

    pub fn checkpoint_exists(&self, match_id: &str) -> bool {
        self.checkpoint_path(match_id).exists()
    }

    pub fn delete_checkpoint(&self, match_id: &str) -> Result<(), SaveError> {
        let path = self.checkpoint_path(match_id);
        if path.exists() {
            remove_file(&path)?;
        }
        Ok(())
    }

    /// Write the final scorecard, once. A repeat call for the same match id
    /// is a no-op reporting `AlreadyProcessed`; the stored scorecard is
    /// never altered.
    pub fn record_completion(
        &self,
        payload: &CompletionPayload,
    ) -> Result<CompletionOutcome, SaveError> {
        let path = self.completion_path(&payload.match_id);
        if path.exists() {
            log::debug!("match {}: completion already processed", payload.match_id);
            return Ok(CompletionOutcome::AlreadyProcessed);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(payload)?;
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;
        log::info!("match {}: scorecard recorded ({} bytes)", payload.match_id, data.len());
        Ok(CompletionOutcome::Recorded)
    }

    /// Read back a recorded scorecard.
    pub fn load_completion(&self, match_id: &str) -> Result<CompletionPayload, SaveError> {
        let path = self.completion_path(match_id);
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }
        let mut data = Vec::new();
        File::open(&path)?.read_to_end(&mut data)?;
        Ok(serde_json::from_slice(&data)?)
    }

    // Private helper methods

    fn checkpoint_path(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("match_{}.ckpt", match_id))
    }

    fn completion_path(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("match_{}.scorecard.json", match_id))
    }

    fn save_to_path(&self, path: &Path, save: &SessionSave) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(save)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load_from_path(&self, path: &Path) -> Result<SessionSave, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let save = decompress_and_deserialize(&data)?;
        let save = migrate_save(save)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(save)
    }
}
