/// Canvas-based view adapters
///
/// The map and the elevation chart render from the shared dataset and
/// selection, and emit interaction messages as their only write path:
/// - Marker pins on a fitted map projection (map.rs)
/// - Altitude line chart over the gallery index (chart.rs)

pub mod chart;
pub mod map;

use iced::Point;

/// Resolve a click to the nearest candidate point within `radius` pixels.
/// Returns the index tagged on the winning candidate.
pub(crate) fn nearest_within(candidates: &[(usize, Point)], click: Point, radius: f32) -> Option<usize> {
    let mut closest_dist = f32::MAX;
    let mut closest_idx = None;

    for (index, point) in candidates {
        let dist = point.distance(click);
        if dist < closest_dist {
            closest_dist = dist;
            closest_idx = Some(*index);
        }
    }

    if closest_dist <= radius {
        closest_idx
    } else {
        None
    }
}
