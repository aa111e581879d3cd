//! Ordered, atomic writes of the stats file from concurrent handlers.

use crate::logic::stats::StatsError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// The on-disk stats file shared by request handlers.
///
/// Each change takes a revision (while the repository lock is held) and
/// then writes its snapshot with [`StatsFile::write`]. Writes run one at a
/// time, land through a temp file and a rename, and a snapshot older than
/// the last one written is dropped.
#[derive(Debug)]
pub struct StatsFile {
    path: PathBuf,
    next_revision: AtomicU64,
    last_written: Mutex<u64>,
}

impl StatsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_revision: AtomicU64::new(1),
            last_written: Mutex::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the revision for a snapshot. Call while holding the lock the
    /// snapshot was serialized under, so revisions follow repository order.
    pub fn next_revision(&self) -> u64 {
        self.next_revision.fetch_add(1, Ordering::SeqCst)
    }

    /// Write the snapshot taken at `revision`. Returns false when a newer
    /// snapshot is already on disk and this one was skipped.
    pub async fn write(&self, revision: u64, data: &str) -> Result<bool, StatsError> {
        let mut last = self.last_written.lock().await;
        if revision <= *last {
            log::debug!(
                "Skipping stale stats snapshot {} (on disk: {})",
                revision,
                *last
            );
            return Ok(false);
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        *last = revision;
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
