//! Photo ingestion: metadata extraction fan-out and batch lifecycle.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::join_all;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use photo_guesser_core::photo::{Photo, PhotoId};
use photo_guesser_exif::gps_from_slice;

use crate::handle::DisplayHandleProvider;

/// One file as handed over by the embedding shell.
#[derive(Clone, Debug)]
pub struct PhotoSource {
    pub name: String,
    pub bytes: Bytes,
}

impl PhotoSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Outcome counts of one ingestion run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub total: usize,
    /// Photos with a usable location.
    pub playable: usize,
    /// Photos kept for display but excluded from play.
    pub excluded: usize,
}

/// An ingested photo set, owning every display handle it acquired.
///
/// Dropping the batch releases all of its handles through the provider.
pub struct UploadBatch {
    photos: Vec<Arc<Photo>>,
    provider: Arc<dyn DisplayHandleProvider>,
}

impl UploadBatch {
    /// Extract metadata for `sources` and build the batch.
    ///
    /// Extraction runs as one blocking task per photo; results keep the
    /// input order regardless of which task finishes first. A photo whose
    /// metadata cannot be read stays in the batch without a location.
    pub async fn ingest(sources: Vec<PhotoSource>, provider: Arc<dyn DisplayHandleProvider>) -> Self {
        let extractions = sources
            .iter()
            .map(|source| {
                let bytes = source.bytes.clone();
                spawn_blocking(move || gps_from_slice(&bytes))
            })
            .collect::<Vec<_>>();
        let outcomes = join_all(extractions).await;

        let photos = sources
            .into_iter()
            .zip(outcomes)
            .map(|(source, outcome)| {
                let location = match outcome {
                    Ok(Ok(Some(summary))) => Some(summary.coordinate),
                    Ok(Ok(None)) => None,
                    Ok(Err(error)) => {
                        warn!(name = %source.name, %error, "metadata extraction failed");
                        None
                    }
                    Err(error) => {
                        warn!(name = %source.name, %error, "extraction task failed");
                        None
                    }
                };

                let id = PhotoId::random();
                let handle = provider.acquire(id, &source.name, &source.bytes);
                Arc::new(Photo::new(id, source.name, source.bytes, handle, location))
            })
            .collect::<Vec<_>>();

        let batch = Self { photos, provider };
        let report = batch.report();
        info!(
            total = report.total,
            playable = report.playable,
            excluded = report.excluded,
            "ingestion finished"
        );
        batch
    }

    pub fn photos(&self) -> &[Arc<Photo>] {
        &self.photos
    }

    /// Photos eligible for a round set, in upload order.
    pub fn playable(&self) -> Vec<Arc<Photo>> {
        self.photos
            .iter()
            .filter(|photo| photo.is_playable())
            .cloned()
            .collect()
    }

    /// Photos that will stay out of any game.
    pub fn excluded_count(&self) -> usize {
        self.photos
            .iter()
            .filter(|photo| !photo.is_playable())
            .count()
    }

    pub fn report(&self) -> IngestReport {
        let excluded = self.excluded_count();
        IngestReport {
            total: self.photos.len(),
            playable: self.photos.len() - excluded,
            excluded,
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

impl Drop for UploadBatch {
    fn drop(&mut self) {
        for photo in &self.photos {
            self.provider.release(photo.handle());
        }
    }
}
