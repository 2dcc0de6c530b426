//! Display-handle acquisition and release.
//!
//! The embedding shell implements [`DisplayHandleProvider`] to give each
//! ingested photo a renderable reference: an object URL in a browser shell,
//! a texture id in a native one. The engine releases every handle it
//! acquired as soon as the photo set is discarded, so providers free their
//! resources deterministically instead of waiting on collection.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use photo_guesser_core::photo::{DisplayHandle, PhotoId};

/// Issues and reclaims renderable references for photo bytes.
pub trait DisplayHandleProvider: Send + Sync {
    /// Create a handle for one photo. Called once per ingested photo,
    /// located or not.
    fn acquire(&self, id: PhotoId, name: &str, bytes: &Bytes) -> DisplayHandle;

    /// Reclaim a handle issued by [`acquire`](Self::acquire). Called exactly
    /// once per handle.
    fn release(&self, handle: &DisplayHandle);
}

/// Headless provider minting inert `mem://` handles.
#[derive(Debug, Default)]
pub struct SyntheticHandles {
    issued: AtomicU64,
}

impl SyntheticHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles issued so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

impl DisplayHandleProvider for SyntheticHandles {
    fn acquire(&self, id: PhotoId, _name: &str, _bytes: &Bytes) -> DisplayHandle {
        self.issued.fetch_add(1, Ordering::Relaxed);
        DisplayHandle::new(format!("mem://photo/{id}"))
    }

    fn release(&self, _handle: &DisplayHandle) {}
}
