//! The local image store.
//!
//! One named slot holds the ordered capture sequence as a JSON array of
//! encoded strings. The slot is read once when the store opens and the whole
//! sequence is rewritten on every mutation, so the file always mirrors the
//! in-memory state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::capture::CapturedImage;
use crate::error::{Error, Result};

/// Persistent, ordered sequence of captured images.
#[derive(Debug)]
pub struct LocalImageStore {
    /// Path to the slot file.
    path: PathBuf,
    /// The sequence, oldest first.
    images: Vec<CapturedImage>,
}

impl LocalImageStore {
    /// Open the slot at `path`, loading any previously persisted sequence.
    ///
    /// A missing slot file yields an empty store; it is created on the first
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot file exists but cannot be read or does
    /// not hold a valid image sequence.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let images: Vec<CapturedImage> = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| Error::SlotParse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(Error::SlotRead { path, source }),
        };
        debug!("loaded {} image(s) from {}", images.len(), path.display());
        Ok(Self { path, images })
    }

    /// Path to the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of images in the sequence.
    #[must_use]
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// Check if the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The image at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CapturedImage> {
        self.images.get(index)
    }

    /// The full sequence, oldest first.
    #[must_use]
    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    /// Append one capture and persist the full sequence.
    ///
    /// Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot file cannot be written. The in-memory
    /// append is not rolled back on failure.
    pub fn append(&mut self, image: CapturedImage) -> Result<usize> {
        self.images.push(image);
        self.persist()?;
        Ok(self.images.len())
    }

    /// Remove every capture and persist the empty sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot file cannot be written.
    pub fn clear(&mut self) -> Result<()> {
        self.images.clear();
        self.persist()
    }

    // Overwrites the whole slot file; in-memory state is already updated
    // when this runs.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let raw = serde_json::to_string(&self.images)?;
        fs::write(&self.path, raw).map_err(|source| Error::SlotWrite {
            path: self.path.clone(),
            source,
        })
    }
}
