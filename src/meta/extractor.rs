/// EXIF metadata decoder
///
/// Reads the GPS position, altitude and capture timestamp embedded in an
/// image file. To the rest of the pipeline this is a black box: it yields a
/// PhotoMeta or nothing at all, never an error. A photo without usable
/// metadata still shows in the gallery, just without a marker or chart point.

use chrono::NaiveDateTime;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::task;

/// Metadata decoded from a single image. Every field is optional because
/// cameras embed whatever subset they were configured to record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoMeta {
    /// Decimal degrees, negative in the southern hemisphere
    pub latitude: Option<f64>,
    /// Decimal degrees, negative west of the prime meridian
    pub longitude: Option<f64>,
    /// Meters relative to sea level
    pub altitude: Option<f64>,
    /// Camera-local capture time
    pub capture_time: Option<NaiveDateTime>,
}

/// Decode the metadata embedded in the image at `path`.
///
/// Spawn blocking because EXIF parsing is file I/O. Returns None when the
/// file cannot be opened, carries no EXIF block, or the blocking task fails.
pub async fn extract(path: PathBuf) -> Option<PhotoMeta> {
    task::spawn_blocking(move || extract_blocking(&path))
        .await
        .unwrap_or(None)
}

/// Blocking implementation of the EXIF decode
fn extract_blocking(path: &Path) -> Option<PhotoMeta> {
    let file = std::fs::File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    Some(PhotoMeta {
        latitude: gps_coordinate(&exif, exif::Tag::GPSLatitude, exif::Tag::GPSLatitudeRef, b"S"),
        longitude: gps_coordinate(&exif, exif::Tag::GPSLongitude, exif::Tag::GPSLongitudeRef, b"W"),
        altitude: gps_altitude(&exif),
        capture_time: capture_time(&exif),
    })
}

/// Convert a degrees/minutes/seconds rational triple into signed decimal
/// degrees. The reference tag ("N"/"S" or "E"/"W") carries the sign.
fn gps_coordinate(
    exif: &exif::Exif,
    tag: exif::Tag,
    ref_tag: exif::Tag,
    negative_ref: &[u8],
) -> Option<f64> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    let degrees = match &field.value {
        exif::Value::Rational(dms) if dms.len() >= 3 => {
            dms[0].to_f64() + dms[1].to_f64() / 60.0 + dms[2].to_f64() / 3600.0
        }
        _ => return None,
    };
    if !degrees.is_finite() {
        return None;
    }

    let sign = match exif.get_field(ref_tag, exif::In::PRIMARY).map(|f| &f.value) {
        Some(exif::Value::Ascii(refs))
            if refs.first().map(|r| r.as_slice()) == Some(negative_ref) =>
        {
            -1.0
        }
        _ => 1.0,
    };
    Some(sign * degrees)
}

/// GPSAltitude is an unsigned rational; GPSAltitudeRef 1 means below sea level
fn gps_altitude(exif: &exif::Exif) -> Option<f64> {
    let field = exif.get_field(exif::Tag::GPSAltitude, exif::In::PRIMARY)?;
    let meters = match &field.value {
        exif::Value::Rational(values) if !values.is_empty() => values[0].to_f64(),
        _ => return None,
    };
    if !meters.is_finite() {
        return None;
    }

    let below_sea_level = exif
        .get_field(exif::Tag::GPSAltitudeRef, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        == Some(1);
    Some(if below_sea_level { -meters } else { meters })
}

/// EXIF timestamps are "YYYY:MM:DD HH:MM:SS" in the camera's local time.
/// DateTimeOriginal is the capture moment; DateTime is a fallback because
/// some cameras only write the latter.
fn capture_time(exif: &exif::Exif) -> Option<NaiveDateTime> {
    for tag in [exif::Tag::DateTimeOriginal, exif::Tag::DateTime] {
        let Some(field) = exif.get_field(tag, exif::In::PRIMARY) else {
            continue;
        };
        if let exif::Value::Ascii(values) = &field.value {
            if let Some(raw) = values.first() {
                let text = String::from_utf8_lossy(raw);
                if let Ok(parsed) =
                    NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S")
                {
                    return Some(parsed);
                }
            }
        }
    }
    None
}
