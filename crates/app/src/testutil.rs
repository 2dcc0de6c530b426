//! Shared test doubles and fixtures.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};

use photo_guesser_core::photo::{DisplayHandle, PhotoId};

use crate::handle::DisplayHandleProvider;
use crate::map::{GuessMap, MapScene};

/// Provider that counts acquisitions and releases.
#[derive(Default)]
pub(crate) struct CountingProvider {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl CountingProvider {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl DisplayHandleProvider for CountingProvider {
    fn acquire(&self, id: PhotoId, _name: &str, _bytes: &Bytes) -> DisplayHandle {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        DisplayHandle::new(format!("test://{id}"))
    }

    fn release(&self, _handle: &DisplayHandle) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Map double that records every presented scene.
pub(crate) struct RecordingMap {
    scenes: Mutex<Vec<MapScene>>,
    interactive: bool,
}

impl RecordingMap {
    pub(crate) fn interactive() -> Arc<Self> {
        Arc::new(Self {
            scenes: Mutex::new(Vec::new()),
            interactive: true,
        })
    }

    pub(crate) fn scenes(&self) -> Vec<MapScene> {
        self.scenes.lock().unwrap().clone()
    }

    pub(crate) fn last_scene(&self) -> Option<MapScene> {
        self.scenes.lock().unwrap().last().copied()
    }
}

impl GuessMap for RecordingMap {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn present(&self, scene: &MapScene) {
        self.scenes.lock().unwrap().push(*scene);
    }
}

/// Minimal TIFF bytes carrying a GPS position for the given coordinate.
pub(crate) fn gps_bytes(latitude: f64, longitude: f64) -> Bytes {
    fn dms(value: f64) -> Value {
        let abs = value.abs();
        let degrees = abs.floor();
        let minutes = ((abs - degrees) * 60.0).floor();
        let seconds = (abs - degrees - minutes / 60.0) * 3600.0;
        Value::Rational(vec![
            Rational {
                num: degrees as u32,
                denom: 1,
            },
            Rational {
                num: minutes as u32,
                denom: 1,
            },
            Rational {
                num: (seconds * 100.0).round() as u32,
                denom: 100,
            },
        ])
    }

    fn reference(byte: u8) -> Value {
        Value::Ascii(vec![vec![byte]])
    }

    let fields = [
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: dms(latitude),
        },
        Field {
            tag: Tag::GPSLatitudeRef,
            ifd_num: In::PRIMARY,
            value: reference(if latitude < 0.0 { b'S' } else { b'N' }),
        },
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: dms(longitude),
        },
        Field {
            tag: Tag::GPSLongitudeRef,
            ifd_num: In::PRIMARY,
            value: reference(if longitude < 0.0 { b'W' } else { b'E' }),
        },
    ];

    write_tiff(&fields)
}

/// TIFF bytes with metadata but no GPS position.
pub(crate) fn plain_tiff_bytes() -> Bytes {
    write_tiff(&[Field {
        tag: Tag::DateTime,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"2024:01:01 00:00:00".to_vec()]),
    }])
}

fn write_tiff(fields: &[Field]) -> Bytes {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut cursor = std::io::Cursor::new(Vec::new());
    writer.write(&mut cursor, false).unwrap();
    Bytes::from(cursor.into_inner())
}
