//! Transient on-disk artifacts for in-flight uploads.
//!
//! Every request item gets an [`ImageArtifact`] guard owning its temp files.
//! Cleanup happens in `Drop`, so the origin file and any derived processed
//! file are removed on every exit path, including early `?` returns and
//! panics. Missing files on delete are swallowed; release is idempotent.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// Suffix appended to the origin filename for the preprocessed copy.
const PROCESSED_SUFFIX: &str = ".processed.png";

/// Writes uploads into a dedicated directory and hands out owning guards.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create the store, ensuring the upload directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist uploaded bytes under a sanitized, per-item unique filename and
    /// return the guard that owns the file.
    pub async fn acquire(&self, bytes: &[u8], suggested_name: &str) -> Result<ImageArtifact> {
        let safe = sanitize_filename(suggested_name);
        // The uuid prefix keeps concurrent uploads of the same filename from
        // colliding; sanitization must not be the uniqueness mechanism.
        let origin = self.root.join(format!("{}_{}", Uuid::new_v4(), safe));
        tokio::fs::write(&origin, bytes).await?;
        debug!(path = %origin.display(), "artifact acquired");
        Ok(ImageArtifact {
            origin,
            processed: None,
        })
    }
}

/// Owning guard over the temp files of one request item.
#[derive(Debug)]
pub struct ImageArtifact {
    origin: PathBuf,
    processed: Option<PathBuf>,
}

impl ImageArtifact {
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// The derived path the preprocessed copy is written to.
    pub fn processed_path(&self) -> PathBuf {
        let mut name = self.origin.as_os_str().to_os_string();
        name.push(PROCESSED_SUFFIX);
        PathBuf::from(name)
    }

    /// Register the processed copy for cleanup once it has been written.
    pub fn mark_processed(&mut self) {
        self.processed = Some(self.processed_path());
    }

    pub fn has_processed(&self) -> bool {
        self.processed.is_some()
    }
}

impl Drop for ImageArtifact {
    fn drop(&mut self) {
        remove_quietly(&self.origin);
        if let Some(processed) = &self.processed {
            remove_quietly(processed);
        }
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temp file"),
    }
}

/// Reduce a client-supplied filename to a safe basename: path components are
/// stripped, anything outside `[A-Za-z0-9._-]` becomes `_`, and leading dots
/// are dropped so the result is never hidden or a traversal fragment.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if safe.is_empty() {
        "upload".to_string()
    } else {
        safe
    }
}

/// Remove files in `root` whose modification time is older than
/// `older_than`. Live requests keep their files younger than any sane
/// cutoff, so this only collects debris left by crashes.
pub fn sweep_stale(root: &Path, older_than: Duration) -> Result<usize> {
    // A cutoff beyond the epoch means nothing can be stale yet.
    let Some(cutoff) = SystemTime::now().checked_sub(older_than) else {
        return Ok(0);
    };
    let mut removed = 0usize;

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if modified <= cutoff {
            remove_quietly(&path);
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(removed, root = %root.display(), "swept stale upload files");
    }
    Ok(removed)
}
