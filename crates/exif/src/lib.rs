//! GPS extraction from photo metadata.
//!
//! Cameras store a position as degree/minute/second rationals in the EXIF
//! GPS directory, with hemisphere reference tags carrying the sign. This
//! crate folds those fields into signed decimal degrees and hands back a
//! [`GpsSummary`] together with capture time and altitude when present.
//!
//! Absent or incomplete GPS data is a normal outcome, not an error:
//! [`gps_from_slice`] returns `Ok(None)` for it. Errors are reserved for
//! containers that cannot be read at all, and callers ingesting photo sets
//! are expected to log those and keep going.

use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{Exif, Field, In, Tag, Value};
use tokio::task::spawn_blocking;
use tracing::debug;

use photo_guesser_core::geo::Coordinate;

mod error;

pub use error::{ExifError, Result};

/// Divisors folding a degree/minute/second triplet into decimal degrees.
const DMS_DIVISION: [f64; 3] = [1.0, 60.0, 3600.0];

const DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// GPS fix lifted from a photo's metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct GpsSummary {
    /// Where the photo was taken.
    pub coordinate: Coordinate,
    /// Meters above sea level; negative below it.
    pub altitude_m: Option<f64>,
    /// Local capture time as the camera wrote it, no zone attached.
    pub captured_at: Option<NaiveDateTime>,
}

impl GpsSummary {
    fn from_exif(exif: &Exif) -> Option<Self> {
        let latitude = signed_angle(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
        let longitude = signed_angle(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

        Some(Self {
            coordinate: Coordinate::new(latitude, longitude),
            altitude_m: altitude_m(exif),
            captured_at: captured_at(exif),
        })
    }
}

/// Extract a GPS fix from an image held in memory.
///
/// Returns `Ok(None)` when the container carries no metadata block or no
/// complete position. `Err` means the bytes could not be read as an image
/// container at all.
pub fn gps_from_slice(bytes: &[u8]) -> Result<Option<GpsSummary>> {
    let mut cursor = Cursor::new(bytes);
    match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => {
            let summary = GpsSummary::from_exif(&exif);
            if summary.is_none() {
                debug!("metadata block carries no complete GPS position");
            }
            Ok(summary)
        }
        Err(
            e @ (exif::Error::NotFound(_)
            | exif::Error::NotSupported(_)
            | exif::Error::BlankValue(_)),
        ) => {
            debug!(error = %e, "no readable metadata block");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Extract a GPS fix from an image file.
///
/// The read and the parse both run on the blocking pool.
pub async fn gps_from_path(path: impl AsRef<Path> + Send) -> Result<Option<GpsSummary>> {
    let path = path.as_ref().to_owned();
    spawn_blocking(move || {
        let bytes = std::fs::read(&path).map_err(|source| ExifError::Io { path, source })?;
        gps_from_slice(&bytes)
    })
    .await?
}

/// Fold an angle tag and its hemisphere reference into signed decimal
/// degrees. `None` unless both fields are present and well-formed.
fn signed_angle(exif: &Exif, angle: Tag, reference: Tag) -> Option<f64> {
    let degrees = dms_to_degrees(exif.get_field(angle, In::PRIMARY)?)?;
    let sign = hemisphere_sign(exif.get_field(reference, In::PRIMARY)?)?;
    Some(degrees * sign)
}

fn dms_to_degrees(field: &Field) -> Option<f64> {
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    (parts.len() == 3).then(|| {
        parts
            .iter()
            .zip(DMS_DIVISION.iter())
            .map(|(part, division)| part.to_f64() / division)
            .sum()
    })
}

fn hemisphere_sign(field: &Field) -> Option<f64> {
    let Value::Ascii(ref text) = field.value else {
        return None;
    };
    match text.first().and_then(|reference| reference.first()) {
        Some(b'N') | Some(b'E') => Some(1.0),
        Some(b'S') | Some(b'W') => Some(-1.0),
        _ => None,
    }
}

fn altitude_m(exif: &Exif) -> Option<f64> {
    let field = exif.get_field(Tag::GPSAltitude, In::PRIMARY)?;
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    let meters = parts.first()?.to_f64();

    // GPSAltitudeRef 1 marks altitudes below sea level.
    let below_sea_level = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .and_then(|reference| reference.value.get_uint(0))
        == Some(1);

    Some(if below_sea_level { -meters } else { meters })
}

fn captured_at(exif: &Exif) -> Option<NaiveDateTime> {
    [Tag::DateTimeOriginal, Tag::DateTime]
        .into_iter()
        .filter_map(|tag| exif.get_field(tag, In::PRIMARY))
        .filter_map(|field| match field.value {
            Value::Ascii(ref text) => text
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .find_map(|text| NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use exif::Rational;
    use exif::experimental::Writer;

    fn rational(num: u32, denom: u32) -> Rational {
        Rational { num, denom }
    }

    fn dms_value(degrees: u32, minutes: u32, centiseconds: u32) -> Value {
        Value::Rational(vec![
            rational(degrees, 1),
            rational(minutes, 1),
            rational(centiseconds, 100),
        ])
    }

    fn ascii_value(text: &[u8]) -> Value {
        Value::Ascii(vec![text.to_vec()])
    }

    fn write_tiff(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut cursor = Cursor::new(Vec::new());
        writer.write(&mut cursor, false).unwrap();
        cursor.into_inner()
    }

    fn gps_field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    #[test]
    fn test_north_west_quadrant_round_trips() {
        // 40 deg 42' 46.00" N, 74 deg 0' 21.60" W (lower Manhattan)
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(40, 42, 4600)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"N")),
            gps_field(Tag::GPSLongitude, dms_value(74, 0, 2160)),
            gps_field(Tag::GPSLongitudeRef, ascii_value(b"W")),
        ]);

        let summary = gps_from_slice(&bytes).unwrap().unwrap();
        assert_relative_eq!(summary.coordinate.latitude(), 40.712778, epsilon = 1e-6);
        assert_relative_eq!(summary.coordinate.longitude(), -74.006, epsilon = 1e-6);
        assert_eq!(summary.altitude_m, None);
        assert_eq!(summary.captured_at, None);
    }

    #[test]
    fn test_south_east_quadrant_round_trips() {
        // 33 deg 52' 7.68" S, 151 deg 12' 33.48" E (Sydney)
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(33, 52, 768)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"S")),
            gps_field(Tag::GPSLongitude, dms_value(151, 12, 3348)),
            gps_field(Tag::GPSLongitudeRef, ascii_value(b"E")),
        ]);

        let summary = gps_from_slice(&bytes).unwrap().unwrap();
        assert_relative_eq!(summary.coordinate.latitude(), -33.868800, epsilon = 1e-6);
        assert_relative_eq!(summary.coordinate.longitude(), 151.209300, epsilon = 1e-6);
    }

    #[test]
    fn test_altitude_and_capture_time_come_along() {
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(48, 51, 2376)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"N")),
            gps_field(Tag::GPSLongitude, dms_value(2, 21, 786)),
            gps_field(Tag::GPSLongitudeRef, ascii_value(b"E")),
            gps_field(Tag::GPSAltitude, Value::Rational(vec![rational(355, 10)])),
            gps_field(Tag::GPSAltitudeRef, Value::Byte(vec![0])),
            gps_field(
                Tag::DateTimeOriginal,
                ascii_value(b"2024:06:01 12:30:05"),
            ),
        ]);

        let summary = gps_from_slice(&bytes).unwrap().unwrap();
        assert_eq!(summary.altitude_m, Some(35.5));
        assert_eq!(
            summary.captured_at,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 30, 5)
        );
    }

    #[test]
    fn test_below_sea_level_altitude_is_negative() {
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(31, 30, 0)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"N")),
            gps_field(Tag::GPSLongitude, dms_value(35, 28, 0)),
            gps_field(Tag::GPSLongitudeRef, ascii_value(b"E")),
            gps_field(Tag::GPSAltitude, Value::Rational(vec![rational(430, 1)])),
            gps_field(Tag::GPSAltitudeRef, Value::Byte(vec![1])),
        ]);

        let summary = gps_from_slice(&bytes).unwrap().unwrap();
        assert_eq!(summary.altitude_m, Some(-430.0));
    }

    #[test]
    fn test_metadata_without_gps_is_none() {
        let bytes = write_tiff(&[gps_field(
            Tag::DateTime,
            ascii_value(b"2023:01:15 09:00:00"),
        )]);

        assert_eq!(gps_from_slice(&bytes).unwrap(), None);
    }

    #[test]
    fn test_partial_position_is_none() {
        // Latitude without longitude is not a usable fix.
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(40, 42, 4600)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"N")),
        ]);

        assert_eq!(gps_from_slice(&bytes).unwrap(), None);
    }

    #[test]
    fn test_jpeg_without_metadata_block_is_none() {
        // A well-formed but empty JPEG stream: SOI directly followed by EOI.
        let bytes = [0xFF, 0xD8, 0xFF, 0xD9];
        assert_eq!(gps_from_slice(&bytes).unwrap(), None);
    }

    #[test]
    fn test_unreadable_container_is_an_error() {
        let err = gps_from_slice(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ExifError::Parse(_)));
    }

    #[tokio::test]
    async fn test_path_extraction_round_trips() {
        let bytes = write_tiff(&[
            gps_field(Tag::GPSLatitude, dms_value(35, 40, 3432)),
            gps_field(Tag::GPSLatitudeRef, ascii_value(b"N")),
            gps_field(Tag::GPSLongitude, dms_value(139, 39, 106)),
            gps_field(Tag::GPSLongitudeRef, ascii_value(b"E")),
        ]);
        let path = std::env::temp_dir().join(format!("gps-fixture-{}.tif", std::process::id()));
        std::fs::write(&path, &bytes).unwrap();

        let summary = gps_from_path(&path).await.unwrap().unwrap();
        assert_relative_eq!(summary.coordinate.latitude(), 35.676200, epsilon = 1e-6);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_reports_io_error() {
        let err = gps_from_path("/definitely/not/here.jpg").await.unwrap_err();
        assert!(matches!(err, ExifError::Io { .. }));
    }
}
