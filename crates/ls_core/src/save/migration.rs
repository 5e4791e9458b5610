use super::error::SaveError;
use super::format::SessionSave;
use super::SAVE_VERSION;

/// Bring an older checkpoint up to the current format.
///
/// Version 1 is the first shipped format, so today this only gates the
/// version number; per-version upgrade steps slot in here as the format
/// evolves.
pub fn migrate_save(save: SessionSave) -> Result<SessionSave, SaveError> {
    match save.version {
        SAVE_VERSION => Ok(save),
        found => Err(SaveError::VersionMismatch { found, expected: SAVE_VERSION }),
    }
}
