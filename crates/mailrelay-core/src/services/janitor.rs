/// Removal of uploaded temporary files once a request is finished
use crate::constants::LOG_TARGET_CLEANUP;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Tracks the temp files of one request and deletes them exactly once
///
/// `cleanup` is the normal path. Anything still tracked when the janitor is
/// dropped (a panic or a cancelled request future) is removed synchronously.
#[derive(Debug, Default)]
pub struct TempFileJanitor {
    paths: Vec<PathBuf>,
}

impl TempFileJanitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Deletes every tracked file that still exists; returns how many were removed
    ///
    /// Failures are logged and never surface to the caller.
    pub async fn cleanup(&mut self) -> usize {
        let mut removed = 0;

        for path in self.paths.drain(..) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(target: LOG_TARGET_CLEANUP, path = %path.display(), "Removed temp file");
                    removed += 1;
                }
                Err(e) if e.kind() == IoErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        target: LOG_TARGET_CLEANUP,
                        path = %path.display(),
                        error = %e,
                        "Failed to remove temp file"
                    );
                }
            }
        }

        removed
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == IoErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                target: LOG_TARGET_CLEANUP,
                path = %path.display(),
                error = %e,
                "Failed to remove temp file on drop"
            );
        }
    }
}

impl Drop for TempFileJanitor {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            remove_quietly(&path);
        }
    }
}
