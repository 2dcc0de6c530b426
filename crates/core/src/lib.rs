//! # photo-guesser-core
//!
//! Headless engine for a photo-location guessing game.
//!
//! ## Features
//!
//! - **Round sequencing**: guess, reveal, advance, complete, one photo per round
//! - **Scoring**: Haversine distance fed through tunable falloff curves
//! - **Typed progress**: unresolved rounds cannot carry a score by construction
//! - **Deterministic shuffles**: play order is drawn from a caller-supplied RNG
//!
//! ## Example
//!
//! ```
//! use photo_guesser_core::prelude::*;
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let photo = Arc::new(Photo::new(
//!     PhotoId::random(),
//!     "harbor.jpg",
//!     Bytes::new(),
//!     DisplayHandle::new("mem://harbor"),
//!     Some(Coordinate::new(40.7128, -74.0060)),
//! ));
//!
//! let mut session = GameSession::new(
//!     vec![photo],
//!     RoundOrder::Sequential,
//!     ScoreScale::City,
//!     &mut rand::rng(),
//! )
//! .unwrap();
//!
//! session.submit_guess(Coordinate::new(40.7128, -74.0060));
//! session.confirm_guess();
//! session.advance_round();
//!
//! assert_eq!(session.phase(), SessionPhase::Complete);
//! assert_eq!(session.total_score(), MAX_SCORE);
//! ```

pub mod geo;
pub mod photo;
pub mod round;
pub mod scoring;
pub mod session;

// Re-exports for convenience
pub mod prelude {
    pub use crate::geo::{Coordinate, EARTH_RADIUS_KM, distance_km, format_distance};
    pub use crate::photo::{DisplayHandle, Photo, PhotoId};
    pub use crate::round::{Round, RoundProgress};
    pub use crate::scoring::{MAX_SCORE, ScoreScale, score};
    pub use crate::session::{GameError, GameSession, RoundOrder, SessionPhase};
}

pub use prelude::*;
