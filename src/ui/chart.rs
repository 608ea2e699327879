/// Elevation chart view adapter
///
/// Line chart of altitude per photo over the gallery index. Photos without
/// altitude leave a gap in the line, the way the dataset degrades on missing
/// metadata. Clicking a plotted point emits a chart-point-clicked event.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Theme};

use crate::meta::correlate::PhotoRecord;
use crate::state::selection::Selection;
use crate::ui::nearest_within;
use crate::Message;

/// Clicks snap to the nearest plotted point within this many pixels
const CLICK_RADIUS: f32 = 16.0;
/// Space between the plot area and the canvas edge, in pixels
const PADDING: f32 = 32.0;

const POINT_RADIUS: f32 = 5.0;
const ACTIVE_POINT_RADIUS: f32 = 7.0;

/// Altitude chart over the shared dataset and selection
pub struct ElevationChart<'a> {
    pub records: &'a [PhotoRecord],
    pub selection: Selection,
}

impl ElevationChart<'_> {
    /// Project every record with an altitude into canvas coordinates.
    /// The x axis is the gallery index, evenly spaced over the full gallery
    /// so gaps stay visible where altitude is missing.
    fn points(&self, bounds: Rectangle) -> Vec<(usize, Point)> {
        let plotted: Vec<(usize, f64)> = self
            .records
            .iter()
            .filter_map(|r| r.altitude.map(|alt| (r.index, alt)))
            .collect();
        if plotted.is_empty() {
            return Vec::new();
        }

        let mut min_alt = f64::MAX;
        let mut max_alt = f64::MIN;
        for &(_, alt) in &plotted {
            min_alt = min_alt.min(alt);
            max_alt = max_alt.max(alt);
        }
        // A flat profile still needs a finite scale
        let alt_span = (max_alt - min_alt).max(1.0);

        let width = (bounds.width - 2.0 * PADDING).max(1.0);
        let height = (bounds.height - 2.0 * PADDING).max(1.0);
        let slots = (self.records.len().saturating_sub(1)).max(1) as f32;

        plotted
            .into_iter()
            .map(|(index, alt)| {
                let x = PADDING + index as f32 / slots * width;
                let y = PADDING + ((max_alt - alt) / alt_span) as f32 * height;
                (index, Point::new(x, y))
            })
            .collect()
    }
}

impl canvas::Program<Message> for ElevationChart<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.fill_text(canvas::Text {
            content: String::from("Elevation Change Per Photo (meters)"),
            position: Point::new(frame.center().x, 10.0),
            color: Color::from_rgb(0.7, 0.7, 0.7),
            size: Pixels(14.0),
            horizontal_alignment: iced::alignment::Horizontal::Center,
            vertical_alignment: iced::alignment::Vertical::Top,
            ..canvas::Text::default()
        });

        let points = self.points(bounds);
        if points.is_empty() {
            frame.fill_text(canvas::Text {
                content: String::from("No altitude data in this gallery"),
                position: frame.center(),
                color: Color::from_rgb(0.6, 0.6, 0.6),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..canvas::Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let line_color = Color::from_rgb8(18, 79, 201);
        let point_color = Color::from_rgb8(201, 18, 201);

        // Connect only gallery-adjacent points; a photo without altitude
        // breaks the line
        let mut line = canvas::path::Builder::new();
        for pair in points.windows(2) {
            let (prev_index, from) = pair[0];
            let (next_index, to) = pair[1];
            if next_index == prev_index + 1 {
                line.move_to(from);
                line.line_to(to);
            }
        }
        frame.stroke(
            &line.build(),
            Stroke::default().with_color(line_color).with_width(2.5),
        );

        for &(index, point) in &points {
            let is_active = index == self.selection.active_index;
            let radius = if is_active { ACTIVE_POINT_RADIUS } else { POINT_RADIUS };
            frame.fill(&Path::circle(point, radius), point_color);
            if is_active {
                frame.stroke(
                    &Path::circle(point, radius),
                    Stroke::default().with_color(Color::WHITE).with_width(2.0),
                );
            }
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if let canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(click) = cursor.position_in(bounds) {
                if let Some(index) = nearest_within(&self.points(bounds), click, CLICK_RADIUS) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ChartPointClicked(index)),
                    );
                }
            }
        }
        (canvas::event::Status::Ignored, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, altitude: Option<f64>) -> PhotoRecord {
        PhotoRecord {
            index,
            path: format!("{}.jpg", index).into(),
            label: format!("{}.jpg", index),
            location: None,
            altitude,
            capture_time: None,
        }
    }

    fn canvas_bounds() -> Rectangle {
        Rectangle { x: 0.0, y: 0.0, width: 600.0, height: 200.0 }
    }

    #[test]
    fn test_missing_altitude_leaves_a_gap() {
        let records = vec![
            record(0, Some(2514.0)),
            record(1, None),
            record(2, Some(2600.0)),
        ];
        let chart = ElevationChart { records: &records, selection: Selection::new() };

        let indices: Vec<usize> = chart.points(canvas_bounds()).iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_higher_altitude_plots_higher_up() {
        let records = vec![record(0, Some(2514.0)), record(1, Some(2600.0))];
        let chart = ElevationChart { records: &records, selection: Selection::new() };

        let points = chart.points(canvas_bounds());
        assert!(points[1].1.y < points[0].1.y);
    }

    #[test]
    fn test_x_positions_follow_gallery_index() {
        let records = vec![
            record(0, Some(100.0)),
            record(1, None),
            record(2, Some(300.0)),
            record(3, Some(200.0)),
        ];
        let chart = ElevationChart { records: &records, selection: Selection::new() };

        let points = chart.points(canvas_bounds());
        // Index 2 sits two thirds of the way along the axis even though
        // index 1 is not plotted
        assert!(points[0].1.x < points[1].1.x);
        assert!(points[1].1.x < points[2].1.x);
    }

    #[test]
    fn test_flat_profile_stays_finite() {
        let records = vec![record(0, Some(1000.0)), record(1, Some(1000.0))];
        let chart = ElevationChart { records: &records, selection: Selection::new() };

        for (_, point) in chart.points(canvas_bounds()) {
            assert!(point.x.is_finite() && point.y.is_finite());
        }
    }
}
