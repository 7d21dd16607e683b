//! Persistence for the status record: whole-document JSON reads and atomic
//! overwrites at a fixed path.

use std::fs;
use std::path::PathBuf;

use super::types::StatusRecord;

/// Handle to the on-disk status record.
///
/// The store owns its path; callers construct one from
/// [`crate::paths::status_file`] (or a scratch path in tests) and pass it by
/// reference to whoever needs to read or persist state.
#[derive(Clone, Debug)]
pub struct StatusStore {
    /// Location of the JSON document.
    path: PathBuf,
}

impl StatusStore {
    /// Create a store handle for the given path.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store rooted at the default per-user location.
    pub fn at_default_location() -> Self {
        Self::new(crate::paths::status_file())
    }

    /// Path of the underlying document.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// What: Load the record if a readable one exists.
    ///
    /// Output:
    /// - `Some(record)` when the file exists and parses; `None` otherwise.
    ///
    /// Details:
    /// - Parse failures are logged and treated as absence; a corrupt store
    ///   must never block a run.
    pub fn try_load(&self) -> Option<StatusRecord> {
        let body = match fs::read_to_string(&self.path) {
            Ok(b) => b,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "failed to read status record"
                    );
                }
                return None;
            }
        };
        match serde_json::from_str::<StatusRecord>(&body) {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "status record is unreadable; treating as absent"
                );
                None
            }
        }
    }

    /// Load the record, falling back to defaults when absent or unreadable.
    pub fn load(&self) -> StatusRecord {
        self.try_load().unwrap_or_default()
    }

    /// What: Persist the record as an atomic whole-document overwrite.
    ///
    /// Inputs:
    /// - `record`: State to persist.
    ///
    /// Output:
    /// - `Ok(())` when the document was written and moved into place.
    ///
    /// Details:
    /// - Serializes to a sibling `.tmp` file first and renames it over the
    ///   target so readers never observe a half-written document.
    pub fn save(&self, record: &StatusRecord) -> Result<(), String> {
        let body = serde_json::to_string(record)
            .map_err(|e| format!("failed to serialize status record: {e}"))?;

        let tmp = self.path.with_file_name(format!(
            "{}.tmp",
            self.path
                .file_name()
                .map_or_else(|| "status.json".to_string(), |n| n.to_string_lossy().into_owned())
        ));

        tracing::debug!(
            path = %self.path.display(),
            bytes = body.len(),
            "[Persist] Writing status record to disk"
        );
        fs::write(&tmp, &body).map_err(|e| {
            tracing::warn!(
                path = %tmp.display(),
                error = %e,
                "[Persist] Failed to write status record"
            );
            format!("failed to write {}: {e}", tmp.display())
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "[Persist] Failed to move status record into place"
            );
            let _ = fs::remove_file(&tmp);
            format!("failed to replace {}: {e}", self.path.display())
        })?;
        tracing::debug!(path = %self.path.display(), "[Persist] Status record persisted");
        Ok(())
    }
}
