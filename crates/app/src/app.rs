//! The application state machine tying ingestion, sequencing, and the map
//! together.
//!
//! [`App`] is the single owner of the photo set and the running session.
//! Control methods are guarded rather than strict: input that arrives in the
//! wrong stage, after a reveal, or without an interactive map is logged and
//! dropped, so the sequencer's preconditions are never violated through the
//! public surface no matter what a UI sends.

use std::sync::Arc;

use tracing::{debug, info, warn};

use photo_guesser_core::geo::{Coordinate, format_distance};
use photo_guesser_core::photo::Photo;
use photo_guesser_core::scoring::ScoreScale;
use photo_guesser_core::session::{GameError, GameSession, RoundOrder, SessionPhase};

use crate::handle::DisplayHandleProvider;
use crate::ingest::{IngestReport, PhotoSource, UploadBatch};
use crate::map::{GuessMap, MapAvailability, MapScene, PlaceholderMap};

/// Whole-application stage, derived from the app's shape and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Collecting photos and settings.
    Setup,
    /// A round is accepting guesses.
    Guessing,
    /// A round's outcome is on display.
    Resolved,
    /// All rounds played; totals are final.
    Complete,
}

/// One row of a progress or completion display.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub photo_name: String,
    /// Formatted miss distance, present once the round is resolved.
    pub distance: Option<String>,
    pub score: Option<u32>,
}

/// The engine behind a photo-guessing UI.
pub struct App {
    order: RoundOrder,
    scale: ScoreScale,
    availability: MapAvailability,
    map: Arc<dyn GuessMap>,
    provider: Arc<dyn DisplayHandleProvider>,
    uploads: Option<UploadBatch>,
    session: Option<GameSession>,
}

impl App {
    /// Build an app around the given collaborators.
    ///
    /// Without a usable credential the interactive map is swapped for a
    /// [`PlaceholderMap`] and guessing stays disabled; photo review, settings
    /// and scoring rules keep working.
    pub fn new(
        availability: MapAvailability,
        map: Arc<dyn GuessMap>,
        provider: Arc<dyn DisplayHandleProvider>,
    ) -> Self {
        let map: Arc<dyn GuessMap> = match availability {
            MapAvailability::Ready => map,
            MapAvailability::MissingCredential => {
                warn!("map credential missing; guessing is disabled");
                Arc::new(PlaceholderMap)
            }
        };

        Self {
            order: RoundOrder::default(),
            scale: ScoreScale::default(),
            availability,
            map,
            provider,
            uploads: None,
            session: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn stage(&self) -> Stage {
        match &self.session {
            None => Stage::Setup,
            Some(session) => match session.phase() {
                SessionPhase::Guessing => Stage::Guessing,
                SessionPhase::Resolved => Stage::Resolved,
                SessionPhase::Complete => Stage::Complete,
            },
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn round_order(&self) -> RoundOrder {
        self.order
    }

    pub fn score_scale(&self) -> ScoreScale {
        self.scale
    }

    pub fn map_availability(&self) -> MapAvailability {
        self.availability
    }

    /// Counts from the last ingestion, if one happened.
    pub fn ingest_report(&self) -> Option<IngestReport> {
        self.uploads.as_ref().map(UploadBatch::report)
    }

    /// Every ingested photo in upload order, excluded ones included.
    pub fn uploads(&self) -> &[Arc<Photo>] {
        self.uploads
            .as_ref()
            .map(|batch| batch.photos())
            .unwrap_or(&[])
    }

    /// Per-round rows for progress and completion displays.
    pub fn round_summaries(&self) -> Vec<RoundSummary> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        session
            .rounds()
            .iter()
            .map(|round| RoundSummary {
                photo_name: round.photo().name().to_owned(),
                distance: round.distance_km().map(format_distance),
                score: round.score(),
            })
            .collect()
    }

    pub fn total_score(&self) -> u32 {
        self.session
            .as_ref()
            .map(GameSession::total_score)
            .unwrap_or(0)
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Replace the photo set.
    ///
    /// The previous batch's handles are released and any running game is
    /// discarded before extraction starts.
    pub async fn ingest(&mut self, sources: Vec<PhotoSource>) -> IngestReport {
        self.session = None;
        self.uploads = None;

        let batch = UploadBatch::ingest(sources, Arc::clone(&self.provider)).await;
        let report = batch.report();
        self.uploads = Some(batch);
        report
    }

    /// Forget photos and game; back to a clean setup.
    pub fn reset(&mut self) {
        self.session = None;
        self.uploads = None;
        info!("reset to setup");
    }

    /// Takes effect at the next game start.
    pub fn set_round_order(&mut self, order: RoundOrder) {
        self.order = order;
    }

    /// Takes effect at the next game start.
    pub fn set_score_scale(&mut self, scale: ScoreScale) {
        self.scale = scale;
    }

    // ========================================================================
    // Game flow
    // ========================================================================

    /// Start a game over the playable uploads.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        let playable = self
            .uploads
            .as_ref()
            .map(UploadBatch::playable)
            .unwrap_or_default();

        let session = GameSession::new(playable, self.order, self.scale, &mut rand::rng())?;
        self.session = Some(session);
        self.refresh_map();
        Ok(())
    }

    /// Guess input from the map surface.
    ///
    /// Ignored outside guessing, after a reveal, or without an interactive
    /// map.
    pub fn place_guess(&mut self, coordinate: Coordinate) {
        if !self.map.is_interactive() {
            debug!("guess ignored: map is not interactive");
            return;
        }
        let Some(session) = &mut self.session else {
            debug!("guess ignored: no game is running");
            return;
        };
        if session.phase() != SessionPhase::Guessing {
            debug!("guess ignored: round already revealed");
            return;
        }

        session.submit_guess(coordinate);
        self.refresh_map();
    }

    /// Lock in the current guess. Ignored when there is nothing to confirm.
    pub fn confirm_guess(&mut self) {
        if !self.map.is_interactive() {
            debug!("confirm ignored: map is not interactive");
            return;
        }
        let Some(session) = &mut self.session else {
            debug!("confirm ignored: no game is running");
            return;
        };
        if session.phase() != SessionPhase::Guessing || session.active_round().guess().is_none() {
            debug!("confirm ignored: nothing to confirm");
            return;
        }

        session.confirm_guess();
        self.refresh_map();
    }

    /// Leave a revealed result: the next round, or the completion screen
    /// after the last one.
    pub fn next_round(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.phase() != SessionPhase::Resolved {
            debug!("advance ignored: no revealed round");
            return;
        }

        session.advance_round();
        self.refresh_map();
    }

    /// From the completion screen, start over with the same photos.
    pub fn replay(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if session.phase() != SessionPhase::Complete {
            debug!("replay ignored: game still running");
            return;
        }

        self.session = Some(session.replay(&mut rand::rng()));
        self.refresh_map();
    }

    /// Push the active round's current scene at the map surface.
    fn refresh_map(&self) {
        if let Some(session) = &self.session {
            let round = session.active_round();
            let scene = MapScene {
                guess: round.guess(),
                actual: round.target(),
                reveal: matches!(
                    session.phase(),
                    SessionPhase::Resolved | SessionPhase::Complete
                ),
            };
            self.map.present(&scene);
        }
    }
}
