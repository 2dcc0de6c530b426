//! The round sequencer: one game from first guess to final total.
//!
//! A session is single-owner and synchronous. Every transition happens
//! through a `&mut self` method and either completes atomically or panics
//! on a caller bug; there is no partially-applied state to observe.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::geo::Coordinate;
use crate::photo::{Photo, PhotoId};
use crate::round::Round;
use crate::scoring::ScoreScale;

/// The order photos are played in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOrder {
    /// Play in upload order.
    #[default]
    Sequential,
    /// Draw a fresh uniform permutation at game start.
    Shuffled,
}

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// The active round is accepting guesses.
    Guessing,
    /// The active round is scored and its outcome is on display.
    Resolved,
    /// Every round is scored. Totals are final.
    Complete,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("cannot start a game with no playable photos")]
    EmptyRoundSet,

    #[error("photo {0} has no location and cannot be played")]
    MissingCoordinate(PhotoId),
}

pub type Result<T> = std::result::Result<T, GameError>;

/// A running game: rounds in play order, a cursor that only moves forward,
/// and the rules fixed at start time.
#[derive(Clone, Debug)]
pub struct GameSession {
    rounds: Vec<Round>,
    active_index: usize,
    phase: SessionPhase,
    order: RoundOrder,
    scale: ScoreScale,
}

impl GameSession {
    /// Start a game over `photos`.
    ///
    /// Every photo must carry a location; filtering unplayable photos is the
    /// caller's job. `rng` drives the permutation when `order` is
    /// [`RoundOrder::Shuffled`] and is untouched otherwise.
    pub fn new<R: Rng + ?Sized>(
        photos: Vec<Arc<Photo>>,
        order: RoundOrder,
        scale: ScoreScale,
        rng: &mut R,
    ) -> Result<Self> {
        if photos.is_empty() {
            return Err(GameError::EmptyRoundSet);
        }

        let mut rounds = photos
            .into_iter()
            .map(|photo| {
                let target = photo
                    .location()
                    .ok_or_else(|| GameError::MissingCoordinate(photo.id()))?;
                Ok(Round::new(photo, target))
            })
            .collect::<Result<Vec<_>>>()?;

        if order == RoundOrder::Shuffled {
            rounds.shuffle(rng);
        }

        info!(rounds = rounds.len(), ?order, %scale, "game started");

        Ok(Self {
            rounds,
            active_index: 0,
            phase: SessionPhase::Guessing,
            order,
            scale,
        })
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Put the active round's pin at `coordinate`, replacing any earlier
    /// guess.
    ///
    /// # Panics
    ///
    /// Panics unless the session is in [`SessionPhase::Guessing`].
    pub fn submit_guess(&mut self, coordinate: Coordinate) {
        assert_eq!(
            self.phase,
            SessionPhase::Guessing,
            "guesses are only accepted while guessing"
        );
        self.rounds[self.active_index].place_guess(coordinate);
        debug!(round = self.active_index, "guess placed");
    }

    /// Lock in the active round's guess and score it.
    ///
    /// Does nothing when no guess has been placed.
    ///
    /// # Panics
    ///
    /// Panics unless the session is in [`SessionPhase::Guessing`].
    pub fn confirm_guess(&mut self) {
        assert_eq!(
            self.phase,
            SessionPhase::Guessing,
            "only an active guess can be confirmed"
        );

        let Some((distance_km, score)) = self.rounds[self.active_index].resolve(self.scale) else {
            return;
        };

        self.phase = SessionPhase::Resolved;
        debug!(round = self.active_index, distance_km, score, "round resolved");
    }

    /// Move past a resolved round: on to the next one, or to
    /// [`SessionPhase::Complete`] after the last.
    ///
    /// On completion the cursor stays on the final round so its outcome
    /// remains addressable.
    ///
    /// # Panics
    ///
    /// Panics unless the session is in [`SessionPhase::Resolved`].
    pub fn advance_round(&mut self) {
        assert_eq!(
            self.phase,
            SessionPhase::Resolved,
            "only a resolved round can be advanced past"
        );

        if self.is_last_round() {
            self.phase = SessionPhase::Complete;
            info!(total = self.total_score(), "game complete");
        } else {
            self.active_index += 1;
            self.phase = SessionPhase::Guessing;
            debug!(round = self.active_index, "advanced to next round");
        }
    }

    /// A fresh session over the same photos with the same rules.
    ///
    /// Shuffled order draws a new permutation; nothing of this game's
    /// guesses or scores carries over.
    pub fn replay<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut rounds: Vec<Round> = self
            .rounds
            .iter()
            .map(|round| Round::new(Arc::clone(round.photo()), round.target()))
            .collect();

        if self.order == RoundOrder::Shuffled {
            rounds.shuffle(rng);
        }

        info!(rounds = rounds.len(), "replaying with a fresh session");

        Self {
            rounds,
            active_index: 0,
            phase: SessionPhase::Guessing,
            order: self.order,
            scale: self.scale,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn active_round(&self) -> &Round {
        &self.rounds[self.active_index]
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn order(&self) -> RoundOrder {
        self.order
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }

    pub fn is_last_round(&self) -> bool {
        self.active_index + 1 == self.rounds.len()
    }

    /// Sum of resolved rounds' scores. Unresolved rounds contribute zero.
    pub fn total_score(&self) -> u32 {
        self.rounds.iter().filter_map(Round::score).sum()
    }

    /// Fraction of rounds entered so far, for progress displays.
    pub fn progress(&self) -> f64 {
        (self.active_index + 1) as f64 / self.rounds.len() as f64
    }
}
