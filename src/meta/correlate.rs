/// Photo-metadata correlation pipeline
///
/// Fetches metadata for every photo in the gallery concurrently and
/// reassembles one ordered dataset. Completion order carries no meaning:
/// every request is tagged with its origin index before dispatch, results
/// are collected as they settle, and the dataset is sorted afterwards.

use chrono::NaiveDateTime;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

use super::extractor::{self, PhotoMeta};

/// Bounded wait for a single extraction. A hung decode degrades that one
/// photo to "no metadata" instead of stalling the whole join.
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(10);

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One photo of the gallery with its correlated metadata.
///
/// The dataset is built once per gallery load and replaced as a whole on
/// reload; records are never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    /// Stable position in the gallery ordering, assigned at enumeration time
    pub index: usize,
    /// Path of the image file
    pub path: PathBuf,
    /// Short weekday name of the capture time, or the file name
    pub label: String,
    /// None when the image has no embedded GPS tag
    pub location: Option<GeoPoint>,
    /// Meters relative to sea level
    pub altitude: Option<f64>,
    pub capture_time: Option<NaiveDateTime>,
}

// TODO: derive total distance travelled and elevation gain/loss over the
// dataset once a record sequence is available here.

/// Correlate metadata for every photo in the gallery.
///
/// Exactly one record comes out per input path, in input order, no matter
/// how extraction interleaves or which photos have no usable metadata.
pub async fn correlate_all(paths: Vec<PathBuf>) -> Vec<PhotoRecord> {
    correlate_with(paths, extractor::extract).await
}

/// Pipeline body, generic over the metadata extractor so tests can drive it
/// with controlled completion orders.
pub async fn correlate_with<F, Fut>(paths: Vec<PathBuf>, extract: F) -> Vec<PhotoRecord>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = Option<PhotoMeta>>,
{
    let total = paths.len();

    // Tag each request with its origin index before dispatch, then drive
    // them all as concurrent in-flight futures.
    let mut in_flight: FuturesUnordered<_> = paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let request = extract(path.clone());
            async move {
                let meta = match timeout(EXTRACT_TIMEOUT, request).await {
                    Ok(meta) => meta,
                    Err(_) => {
                        eprintln!("⚠️  Metadata extraction timed out: {}", path.display());
                        None
                    }
                };
                (index, path, meta)
            }
        })
        .collect();

    // Join point: wait for every request to settle, in whatever order.
    let mut settled = Vec::with_capacity(total);
    while let Some(outcome) = in_flight.next().await {
        settled.push(outcome);
    }

    // Restore the gallery order.
    settled.sort_by_key(|(index, _, _)| *index);

    let located = settled
        .iter()
        .filter(|(_, _, meta)| {
            matches!(meta, Some(m) if m.latitude.is_some() && m.longitude.is_some())
        })
        .count();
    println!("📍 Correlated {} photos, {} with a GPS position", total, located);

    settled
        .into_iter()
        .map(|(index, path, meta)| make_record(index, path, meta))
        .collect()
}

/// Build the record for one gallery entry. A failed or empty extraction
/// still yields a record: the 1:1 mapping between gallery length and dataset
/// length is what navigation relies on.
fn make_record(index: usize, path: PathBuf, meta: Option<PhotoMeta>) -> PhotoRecord {
    let meta = meta.unwrap_or_default();

    let location = match (meta.latitude, meta.longitude) {
        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
        _ => None,
    };

    let label = match meta.capture_time {
        Some(time) => time.format("%a").to_string(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    };

    PhotoRecord {
        index,
        path,
        label,
        location,
        altitude: meta.altitude,
        capture_time: meta.capture_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    fn gallery(total: usize) -> Vec<PathBuf> {
        (0..total).map(|i| PathBuf::from(format!("{}.jpg", i))).collect()
    }

    fn origin_index(path: &Path) -> usize {
        path.file_stem().unwrap().to_string_lossy().parse().unwrap()
    }

    /// Extractor whose requests settle in reverse gallery order
    async fn reversed_completion(path: PathBuf) -> Option<PhotoMeta> {
        let index = origin_index(&path);
        tokio::time::sleep(Duration::from_millis(100 - index as u64 * 10)).await;
        Some(PhotoMeta {
            latitude: Some(40.0 + index as f64),
            longitude: Some(6.0 + index as f64),
            altitude: Some(index as f64 * 100.0),
            capture_time: None,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_independent_of_completion_order() {
        let records = correlate_with(gallery(8), reversed_completion).await;

        assert_eq!(records.len(), 8);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.index, i);
            assert_eq!(record.path, PathBuf::from(format!("{}.jpg", i)));
            assert_eq!(record.altitude, Some(i as f64 * 100.0));
        }
    }

    #[tokio::test]
    async fn test_every_input_yields_exactly_one_record() {
        // Odd photos have no metadata at all; they must not be dropped
        let records = correlate_with(gallery(5), |path| async move {
            if origin_index(&path) % 2 == 1 {
                None
            } else {
                Some(PhotoMeta {
                    latitude: Some(1.0),
                    longitude: Some(2.0),
                    ..PhotoMeta::default()
                })
            }
        })
        .await;

        assert_eq!(records.len(), 5);
        let indices: Vec<usize> = records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(records[1].location.is_none());
        assert!(records[1].altitude.is_none());
        assert!(records[2].location.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deterministic_given_deterministic_extractor() {
        let first = correlate_with(gallery(6), reversed_completion).await;
        let second = correlate_with(gallery(6), reversed_completion).await;
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_extraction_degrades_to_no_metadata() {
        let records = correlate_with(gallery(3), |path| async move {
            if origin_index(&path) == 1 {
                // Never settles within the bounded wait
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Some(PhotoMeta { altitude: Some(5.0), ..PhotoMeta::default() })
        })
        .await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].altitude, Some(5.0));
        assert_eq!(records[1].altitude, None);
        assert_eq!(records[2].altitude, Some(5.0));
    }

    #[tokio::test]
    async fn test_three_photo_scenario() {
        // Photo 0 and 2 are geotagged, photo 1 has no GPS tag
        let records = correlate_with(gallery(3), |path| async move {
            match origin_index(&path) {
                0 => Some(PhotoMeta {
                    latitude: Some(45.75),
                    longitude: Some(6.81),
                    altitude: Some(2514.0),
                    capture_time: None,
                }),
                2 => Some(PhotoMeta {
                    latitude: Some(45.80),
                    longitude: Some(6.90),
                    altitude: Some(2600.0),
                    capture_time: None,
                }),
                _ => Some(PhotoMeta::default()),
            }
        })
        .await;

        assert_eq!(records[0].location, Some(GeoPoint { lat: 45.75, lng: 6.81 }));
        assert_eq!(records[0].altitude, Some(2514.0));
        assert_eq!(records[1].location, None);
        assert_eq!(records[1].altitude, None);
        assert_eq!(records[2].location, Some(GeoPoint { lat: 45.80, lng: 6.90 }));
        assert_eq!(records[2].altitude, Some(2600.0));
    }

    #[tokio::test]
    async fn test_label_prefers_capture_weekday() {
        // 2024-07-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let records = correlate_with(gallery(2), move |path| async move {
            if origin_index(&path) == 0 {
                Some(PhotoMeta { capture_time: Some(monday), ..PhotoMeta::default() })
            } else {
                Some(PhotoMeta::default())
            }
        })
        .await;

        assert_eq!(records[0].label, "Mon");
        assert_eq!(records[1].label, "1.jpg");
    }

    #[tokio::test]
    async fn test_empty_gallery() {
        let records = correlate_with(Vec::new(), extractor::extract).await;
        assert!(records.is_empty());
    }
}
