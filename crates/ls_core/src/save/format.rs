use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::error::SaveError;
use super::SAVE_VERSION;
use crate::models::{CompletionPayload, InningsSnapshot, MatchConfig, MatchSetup};
use crate::state::ScoringState;

const CHECKSUM_LEN: usize = 32;

/// Durable checkpoint of one scoring session.
///
/// Written at the well-defined checkpoints (innings end, match end, or on
/// demand), never per ball; read back for mid-match crash recovery.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionSave {
    /// Save format version for migration.
    pub version: u32,

    /// Save timestamp (unix milliseconds).
    pub timestamp: u64,

    pub setup: MatchSetup,
    pub config: MatchConfig,

    /// The full mutable scoring state.
    pub scoring: ScoringState,

    /// Innings captured so far.
    pub innings_snapshots: Vec<InningsSnapshot>,

    /// Present once the match completed.
    pub completion: Option<CompletionPayload>,
}

impl SessionSave {
    /// Basic structural checks before a restored save is trusted.
    pub fn validate(&self) -> Result<(), SaveError> {
        if !(1..=2).contains(&self.scoring.current_inning) {
            return Err(SaveError::Corrupted);
        }
        if self.scoring.clock.current_ball() > 5 {
            return Err(SaveError::Corrupted);
        }
        if self.innings_snapshots.len() > 2 {
            return Err(SaveError::Corrupted);
        }
        Ok(())
    }
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// MessagePack -> LZ4, with a SHA-256 trailer over the compressed payload.
pub fn serialize_and_compress(save: &SessionSave) -> Result<Vec<u8>, SaveError> {
    let encoded = to_vec_named(save)?;
    let mut data = compress_prepend_size(&encoded);
    let checksum = Sha256::digest(&data);
    data.extend_from_slice(&checksum);
    Ok(data)
}

/// Inverse of `serialize_and_compress`; verifies the checksum before
/// touching the payload.
pub fn decompress_and_deserialize(data: &[u8]) -> Result<SessionSave, SaveError> {
    if data.len() <= CHECKSUM_LEN {
        return Err(SaveError::Corrupted);
    }
    let (payload, stored) = data.split_at(data.len() - CHECKSUM_LEN);
    let checksum = Sha256::digest(payload);
    if checksum.as_slice() != stored {
        return Err(SaveError::ChecksumMismatch);
    }
    let decompressed =
        decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let save: SessionSave = from_slice(&decompressed)?;
    save.validate()?;
    Ok(save)
}

/// Convenience constructor used by tests and the migration suite.
impl SessionSave {
    pub fn empty(setup: MatchSetup, config: MatchConfig) -> Self {
        let total_overs = config.total_overs;
        Self {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            setup,
            config,
            scoring: ScoringState::new(total_overs),
            innings_snapshots: Vec::new(),
            completion: None,
        }
    }
}
