//! # photo-guesser-app
//!
//! The embeddable application layer over `photo-guesser-core`: photo
//! ingestion with GPS extraction, a guarded control surface for game flow,
//! and the seams a UI shell plugs into.
//!
//! ## Features
//!
//! - **Ingestion**: Concurrent metadata extraction; photos without a
//!   position stay visible but never enter a game
//! - **Display handles**: Every photo gets a renderable reference from the
//!   shell's provider, released deterministically on discard
//! - **Guarded controls**: Out-of-turn input is logged and dropped, never
//!   panicking through the public surface
//! - **Credential gating**: Without a map credential the interactive map is
//!   swapped for an inert placeholder and guessing stays off
//!
//! ## Example
//!
//! ```
//! use photo_guesser_app::prelude::*;
//! use std::sync::Arc;
//!
//! let availability = MapAvailability::from_credential(None);
//! assert!(!availability.is_ready());
//!
//! // Without a credential the app still builds; guessing is disabled.
//! let app = App::new(
//!     availability,
//!     Arc::new(PlaceholderMap),
//!     Arc::new(SyntheticHandles::new()),
//! );
//! assert_eq!(app.stage(), Stage::Setup);
//! ```

pub mod app;
pub mod handle;
pub mod ingest;
pub mod map;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
pub mod prelude {
    pub use crate::app::{App, RoundSummary, Stage};
    pub use crate::handle::{DisplayHandleProvider, SyntheticHandles};
    pub use crate::ingest::{IngestReport, PhotoSource, UploadBatch};
    pub use crate::map::{
        GuessMap, MAP_CREDENTIAL_VAR, MapAvailability, MapScene, PlaceholderMap,
    };
}

pub use prelude::*;
