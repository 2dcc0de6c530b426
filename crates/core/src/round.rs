//! A single photo played for points.

use std::sync::Arc;

use crate::geo::{self, Coordinate};
use crate::photo::{Photo, PhotoId};
use crate::scoring::{self, ScoreScale};

/// Play state of a round.
///
/// Distance and score exist exactly when the round is resolved, so a
/// half-scored round cannot be represented at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundProgress {
    /// No guess yet.
    Pending,
    /// A pin is on the map; it may still be moved.
    Guessed { guess: Coordinate },
    /// Locked in and scored. Final.
    Resolved {
        guess: Coordinate,
        distance_km: f64,
        score: u32,
    },
}

/// One photo's play-through.
///
/// The target is copied out of the photo when the round is built, so play
/// never has to deal with an absent location.
#[derive(Clone, Debug)]
pub struct Round {
    photo: Arc<Photo>,
    target: Coordinate,
    progress: RoundProgress,
}

impl Round {
    pub(crate) fn new(photo: Arc<Photo>, target: Coordinate) -> Self {
        Self {
            photo,
            target,
            progress: RoundProgress::Pending,
        }
    }

    /// Rounds share their photo's identity.
    pub fn id(&self) -> PhotoId {
        self.photo.id()
    }

    pub fn photo(&self) -> &Arc<Photo> {
        &self.photo
    }

    /// The true location the guess is judged against.
    pub fn target(&self) -> Coordinate {
        self.target
    }

    pub fn progress(&self) -> RoundProgress {
        self.progress
    }

    /// The pin currently on the map, if any.
    pub fn guess(&self) -> Option<Coordinate> {
        match self.progress {
            RoundProgress::Pending => None,
            RoundProgress::Guessed { guess } | RoundProgress::Resolved { guess, .. } => Some(guess),
        }
    }

    pub fn distance_km(&self) -> Option<f64> {
        match self.progress {
            RoundProgress::Resolved { distance_km, .. } => Some(distance_km),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<u32> {
        match self.progress {
            RoundProgress::Resolved { score, .. } => Some(score),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.progress, RoundProgress::Resolved { .. })
    }

    /// Place or move the pin.
    ///
    /// # Panics
    ///
    /// Panics if the round is already resolved.
    pub(crate) fn place_guess(&mut self, guess: Coordinate) {
        match self.progress {
            RoundProgress::Pending | RoundProgress::Guessed { .. } => {
                self.progress = RoundProgress::Guessed { guess };
            }
            RoundProgress::Resolved { .. } => {
                panic!("cannot move a guess on a resolved round");
            }
        }
    }

    /// Score the placed guess against the target.
    ///
    /// Returns `None` without changing anything when no guess is placed.
    ///
    /// # Panics
    ///
    /// Panics if the round is already resolved.
    pub(crate) fn resolve(&mut self, scale: ScoreScale) -> Option<(f64, u32)> {
        match self.progress {
            RoundProgress::Pending => None,
            RoundProgress::Guessed { guess } => {
                let distance_km = geo::distance_km(guess, self.target);
                let score = scoring::score(distance_km, scale);
                self.progress = RoundProgress::Resolved {
                    guess,
                    distance_km,
                    score,
                };
                Some((distance_km, score))
            }
            RoundProgress::Resolved { .. } => {
                panic!("cannot resolve a round twice");
            }
        }
    }
}
