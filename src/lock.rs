//! Exclusive run lock preventing two scans from racing on the status store.

use std::path::PathBuf;

/// Lock file held for the lifetime of a scan run.
///
/// Acquisition creates the file with create-new semantics and records the
/// owning pid. A lock left behind by a dead process is reclaimed so a crash
/// cannot wedge the tool. The file is removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// What: Acquire the lock at `path`, reclaiming stale owners.
    ///
    /// Inputs:
    /// - `path`: Lock file location (usually [`crate::paths::lock_file`]).
    ///
    /// Output:
    /// - Guard releasing the lock on drop, or an error naming the live
    ///   owner when another scan already holds it.
    pub fn acquire(path: PathBuf) -> Result<Self, String> {
        match Self::try_create(&path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let owner = std::fs::read_to_string(&path).unwrap_or_default();
                let owner_pid = owner.trim().parse::<u32>().ok();
                if let Some(pid) = owner_pid
                    && std::path::Path::new(&format!("/proc/{pid}")).exists()
                {
                    return Err(format!(
                        "another scan is already running (pid {pid}); remove {} if that is wrong",
                        path.display()
                    ));
                }
                // Owner is gone or the file is garbage; reclaim it.
                tracing::warn!(
                    path = %path.display(),
                    owner = %owner.trim(),
                    "reclaiming stale scan lock"
                );
                let _ = std::fs::remove_file(&path);
                Self::try_create(&path)
                    .map_err(|e| format!("failed to take scan lock {}: {e}", path.display()))
            }
            Err(e) => Err(format!("failed to take scan lock {}: {e}", path.display())),
        }
    }

    fn try_create(path: &std::path::Path) -> Result<Self, std::io::Error> {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        write!(file, "{}", std::process::id())?;
        tracing::debug!(path = %path.display(), "scan lock taken");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release scan lock");
        } else {
            tracing::debug!(path = %self.path.display(), "scan lock released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_lock_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "clamward_lock_{}_{}_{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("System time is before UNIX epoch")
                .as_nanos()
        ))
    }

    #[test]
    /// What: The lock is exclusive while held and gone after drop.
    ///
    /// Inputs:
    /// - Two acquisitions of the same path, the second while the first is
    ///   held by this live process.
    ///
    /// Output:
    /// - Second acquisition fails naming the owner; after drop the path is
    ///   free again.
    fn lock_is_exclusive_and_released_on_drop() {
        let path = temp_lock_path("exclusive");
        let lock = RunLock::acquire(path.clone()).expect("first acquire");
        let second = RunLock::acquire(path.clone());
        assert!(second.is_err());
        assert!(second.expect_err("held").contains("already running"));
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    /// What: A lock from a dead pid is reclaimed.
    ///
    /// Inputs:
    /// - Lock file containing a pid that cannot be alive.
    ///
    /// Output:
    /// - Acquisition succeeds and rewrites the file.
    fn stale_lock_is_reclaimed() {
        let path = temp_lock_path("stale");
        // pid_max on Linux tops out well below this value
        std::fs::write(&path, "4194304999").expect("write stale lock");
        let lock = RunLock::acquire(path.clone()).expect("reclaim stale lock");
        let body = std::fs::read_to_string(&path).expect("read lock");
        assert_eq!(body.trim(), std::process::id().to_string());
        drop(lock);
    }

    #[test]
    fn garbage_lock_is_reclaimed() {
        let path = temp_lock_path("garbage");
        std::fs::write(&path, "not a pid").expect("write garbage lock");
        let lock = RunLock::acquire(path.clone());
        assert!(lock.is_ok());
    }
}
