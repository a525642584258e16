//! Capture pipeline orchestration.
//!
//! Wires the engine, the local store, and the upload mirror together. For
//! every capture the local append completes first (the store is
//! authoritative for what the user sees); the upload is issued afterwards
//! and never awaited.

use std::sync::Arc;

use crate::config::Config;
use crate::engine::{CaptureEngine, EngineState};
use crate::error::Result;
use crate::store::LocalImageStore;
use crate::sync::{SyncClient, Uploader};

/// Owns the engine, the local store, and the upload mirror.
pub struct CapturePipeline {
    engine: CaptureEngine,
    store: LocalImageStore,
    uploader: Option<Arc<dyn Uploader>>,
}

impl std::fmt::Debug for CapturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturePipeline")
            .field("engine", &self.engine)
            .field("store", &self.store)
            .field("sync", &self.uploader.is_some())
            .finish()
    }
}

impl CapturePipeline {
    /// Assemble a pipeline from parts.
    ///
    /// Pass `None` for the uploader to keep captures local-only.
    #[must_use]
    pub fn new(
        engine: CaptureEngine,
        store: LocalImageStore,
        uploader: Option<Arc<dyn Uploader>>,
    ) -> Self {
        Self {
            engine,
            store,
            uploader,
        }
    }

    /// Assemble a pipeline from configuration, loading the persisted slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot file cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = CaptureEngine::new(config.capture.clone());
        let store = LocalImageStore::open(config.slot_path())?;
        let uploader: Option<Arc<dyn Uploader>> = if config.sync.enabled {
            Some(Arc::new(SyncClient::new(config.sync.endpoint.clone())))
        } else {
            None
        };
        Ok(Self::new(engine, store, uploader))
    }

    /// Start streaming from the configured device.
    ///
    /// # Errors
    ///
    /// Propagates the engine's acquisition failure; the store is untouched.
    pub fn start_capture(&mut self) -> Result<()> {
        self.engine.start()
    }

    /// Stop streaming and release the device.
    pub fn stop_capture(&mut self) {
        self.engine.stop();
    }

    /// Current engine state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Number of images in the local sequence.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// The local store.
    #[must_use]
    pub fn store(&self) -> &LocalImageStore {
        &self.store
    }

    /// One capture cycle: frame → local append → detached upload.
    ///
    /// Returns the new local count, or `None` when the engine is idle (the
    /// store is not mutated in that case). The append completes before the
    /// upload is issued; the upload outcome is never awaited.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be read or the slot cannot be
    /// written.
    pub fn capture(&mut self) -> Result<Option<usize>> {
        let Some(image) = self.engine.capture_frame()? else {
            return Ok(None);
        };
        let count = self.store.append(image.clone())?;
        if let Some(uploader) = &self.uploader {
            uploader.upload(&image);
        }
        Ok(Some(count))
    }

    /// Clear the local sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }
}
