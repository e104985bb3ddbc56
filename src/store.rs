//! Transient storage for decoded-image bytes during a batch.
//!
//! The scoring pipeline itself never touches the filesystem; callers that
//! want the original bytes available after processing (previews, export of
//! the winning shots) inject a store behind this interface. Handles are
//! path-isolated per image, so concurrent writes from a parallel batch
//! never collide even when two inputs share a filename.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::raster::{Raster, decode_raster};

/// Storage collaborator: stage raw image bytes, read them back as rasters.
pub trait RasterStore: Send + Sync {
    /// Stage one image's bytes; the returned handle is unique per call.
    fn store(&self, name: &str, bytes: &[u8]) -> Result<StoreHandle>;

    /// Decode a previously staged image back into a raster.
    fn load(&self, handle: &StoreHandle) -> Result<Raster>;
}

/// Opaque reference to one staged image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHandle {
    path: PathBuf,
}

impl StoreHandle {
    /// Filesystem location of the staged bytes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// [`RasterStore`] backed by a temporary directory.
///
/// Files are removed when the store is dropped; nothing persists beyond the
/// session.
pub struct TempStore {
    dir: TempDir,
    next_id: AtomicU64,
}

impl TempStore {
    /// Create a store in a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            next_id: AtomicU64::new(0),
        })
    }
}

impl RasterStore for TempStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<StoreHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.path().join(format!("{id:04}-{}", sanitize(name)));
        std::fs::write(&path, bytes)
            .map_err(|e| Error::Store(format!("write {}: {e}", path.display())))?;
        Ok(StoreHandle { path })
    }

    fn load(&self, handle: &StoreHandle) -> Result<Raster> {
        let bytes = std::fs::read(&handle.path)
            .map_err(|e| Error::Store(format!("read {}: {e}", handle.path.display())))?;
        decode_raster(&handle.path.display().to_string(), &bytes)
    }
}

/// Reduce a client-supplied name to a safe filename component.
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}
