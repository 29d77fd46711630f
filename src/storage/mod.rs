//! Scratch workspace
//!
//! Owns the two on-disk roots the service needs: `uploads/` for incoming
//! scans and `temp/` for per-request scratch directories holding barcode
//! PNGs. Scratch dirs are removed when the request finishes, and a startup
//! sweep clears anything a crashed process left behind.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Filesystem workspace for uploads and request scratch space.
#[derive(Debug, Clone)]
pub struct Workspace {
    upload_root: PathBuf,
    temp_root: PathBuf,
}

impl Workspace {
    /// Open (creating if needed) the workspace roots.
    pub fn open(upload_root: impl Into<PathBuf>, temp_root: impl Into<PathBuf>) -> io::Result<Self> {
        let workspace = Self {
            upload_root: upload_root.into(),
            temp_root: temp_root.into(),
        };
        std::fs::create_dir_all(&workspace.upload_root)?;
        std::fs::create_dir_all(&workspace.temp_root)?;
        Ok(workspace)
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Create a scratch directory for one request. Removed on drop.
    pub fn create_session(&self) -> io::Result<SessionDir> {
        let path = self.temp_root.join(Uuid::new_v4().to_string());
        std::fs::create_dir(&path)?;
        Ok(SessionDir { path })
    }

    /// Persist an uploaded scan under a UUID-prefixed, sanitized name and
    /// return its path.
    pub fn store_upload(&self, original_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.upload_root.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Delete uploads and scratch dirs older than `retention`. Returns how
    /// many entries were removed.
    pub fn sweep_stale(&self, retention: Duration) -> io::Result<usize> {
        let cutoff = Utc::now() - retention;
        let mut removed = 0;

        for root in [&self.temp_root, &self.upload_root] {
            for entry in std::fs::read_dir(root)? {
                let entry = entry?;
                let modified: DateTime<Utc> = match entry.metadata().and_then(|m| m.modified()) {
                    Ok(time) => time.into(),
                    Err(e) => {
                        tracing::warn!(path = %entry.path().display(), error = %e, "unreadable mtime, skipping");
                        continue;
                    }
                };
                if modified >= cutoff {
                    continue;
                }

                let path = entry.path();
                let result = if path.is_dir() {
                    std::fs::remove_dir_all(&path)
                } else {
                    std::fs::remove_file(&path)
                };
                match result {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to remove stale entry")
                    }
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, "swept stale workspace entries");
        }
        Ok(removed)
    }
}

/// Per-request scratch directory, deleted when dropped.
#[derive(Debug)]
pub struct SessionDir {
    path: PathBuf,
}

impl SessionDir {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SessionDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to clean scratch dir");
        }
    }
}

/// Strip anything that could escape the upload root or upset a filesystem.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path().join("uploads"), dir.path().join("temp")).unwrap();
        (dir, ws)
    }

    #[test]
    fn open_creates_roots() {
        let (_guard, ws) = workspace();
        assert!(ws.upload_root().is_dir());
        assert!(ws.temp_root().is_dir());
    }

    #[test]
    fn session_dir_is_removed_on_drop() {
        let (_guard, ws) = workspace();
        let session = ws.create_session().unwrap();
        let path = session.path().to_path_buf();
        assert!(path.is_dir());
        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn store_upload_sanitizes_names() {
        let (_guard, ws) = workspace();
        let path = ws.store_upload("../../etc/passwd", b"data").unwrap();
        assert!(path.starts_with(ws.upload_root()));
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("passwd"));
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn sweep_removes_only_stale_entries() {
        let (_guard, ws) = workspace();
        let stale = ws.temp_root().join("stale");
        std::fs::create_dir(&stale).unwrap();
        let fresh = ws.create_session().unwrap();

        // Zero retention makes everything written before the sweep stale.
        std::thread::sleep(std::time::Duration::from_millis(20));
        let removed = ws.sweep_stale(Duration::zero()).unwrap();
        assert!(removed >= 1);
        assert!(!stale.exists());
        drop(fresh);
    }

    #[test]
    fn sanitize_replaces_hostile_characters() {
        assert_eq!(sanitize_filename("scan 01.png"), "scan_01.png");
        assert_eq!(sanitize_filename("..\\..\\x.png"), "x.png");
        assert_eq!(sanitize_filename("///"), "upload");
    }
}
