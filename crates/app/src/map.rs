//! The map collaborator seam.
//!
//! The engine never renders a map. It pushes a [`MapScene`] at the surface
//! after every transition that changes what should be on screen, and takes
//! guess coordinates back through [`crate::App::place_guess`].

use std::env;

use photo_guesser_core::geo::Coordinate;

/// Environment variable holding the map credential.
pub const MAP_CREDENTIAL_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Whether an interactive map can be offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapAvailability {
    Ready,
    /// No credential. Guessing controls stay disabled; everything else
    /// keeps working.
    MissingCredential,
}

impl MapAvailability {
    /// Read the credential from the process environment.
    pub fn from_env() -> Self {
        Self::from_credential(env::var(MAP_CREDENTIAL_VAR).ok().as_deref())
    }

    /// Classify a credential value as usable or absent.
    pub fn from_credential(value: Option<&str>) -> Self {
        match value {
            Some(credential) if !credential.trim().is_empty() => Self::Ready,
            _ => Self::MissingCredential,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// What the map should currently show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapScene {
    /// The player's pin, if one is placed.
    pub guess: Option<Coordinate>,
    /// The photo's true location.
    pub actual: Coordinate,
    /// When set, both pins are on display and guess input must stop.
    pub reveal: bool,
}

/// Map surface implemented by the embedding shell.
///
/// Implementations must not deliver guess input while the presented scene
/// has `reveal` set; the engine drops such input regardless.
pub trait GuessMap: Send + Sync {
    /// False when the surface cannot accept pin placement.
    fn is_interactive(&self) -> bool;

    /// Replace what the map shows.
    fn present(&self, scene: &MapScene);
}

/// Inert surface used when no credential is available.
#[derive(Debug, Default)]
pub struct PlaceholderMap;

impl GuessMap for PlaceholderMap {
    fn is_interactive(&self) -> bool {
        false
    }

    fn present(&self, _scene: &MapScene) {}
}
