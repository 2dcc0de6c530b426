//! Photos and their session-scoped display resources.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::geo::Coordinate;

/// Unique photo identifier, minted once at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhotoId(Uuid);

impl PhotoId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque renderable reference to a photo's pixels.
///
/// Handles are acquired from a display provider at ingestion and must be
/// released through the same provider when the photo set is discarded.
/// Cloning a handle does not duplicate the underlying resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(Arc<str>);

impl DisplayHandle {
    pub fn new(uri: impl AsRef<str>) -> Self {
        Self(uri.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One uploaded photo: immutable bytes plus everything the game needs to
/// show and score it.
///
/// A photo never changes after ingestion. Re-reading metadata means
/// ingesting a fresh photo set, not patching this one.
#[derive(Clone, Debug)]
pub struct Photo {
    id: PhotoId,
    name: Arc<str>,
    bytes: Bytes,
    handle: DisplayHandle,
    location: Option<Coordinate>,
}

impl Photo {
    pub fn new(
        id: PhotoId,
        name: impl AsRef<str>,
        bytes: Bytes,
        handle: DisplayHandle,
        location: Option<Coordinate>,
    ) -> Self {
        Self {
            id,
            name: name.as_ref().into(),
            bytes,
            handle,
            location,
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn handle(&self) -> &DisplayHandle {
        &self.handle
    }

    /// Where the photo was taken, when metadata extraction found a position.
    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    /// Only photos with a location can enter a round set.
    pub fn is_playable(&self) -> bool {
        self.location.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_ids_are_unique() {
        let a = PhotoId::random();
        let b = PhotoId::random();
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_handle_equality_and_display() {
        let a = DisplayHandle::new("mem://photo/1");
        let b = DisplayHandle::new("mem://photo/1");
        let c = DisplayHandle::new("mem://photo/2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "mem://photo/1");
    }

    #[test]
    fn test_playability_follows_location() {
        let located = Photo::new(
            PhotoId::random(),
            "harbor.jpg",
            Bytes::from_static(b"jpeg"),
            DisplayHandle::new("mem://photo/harbor"),
            Some(Coordinate::new(40.7128, -74.0060)),
        );
        let unlocated = Photo::new(
            PhotoId::random(),
            "scan.png",
            Bytes::new(),
            DisplayHandle::new("mem://photo/scan"),
            None,
        );

        assert!(located.is_playable());
        assert_eq!(located.name(), "harbor.jpg");
        assert_eq!(located.bytes().as_ref(), b"jpeg");
        assert!(!unlocated.is_playable());
        assert_eq!(unlocated.location(), None);
    }
}
