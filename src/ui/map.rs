/// Marker map view adapter
///
/// Draws one numbered pin per geotagged photo on a flat projection fitted to
/// the gallery's bounding box, plus the trail connecting consecutive photos.
/// Clicking a pin emits a marker-clicked event; photos without a GPS tag
/// simply have no pin.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Theme};

use crate::meta::correlate::PhotoRecord;
use crate::state::selection::Selection;
use crate::ui::nearest_within;
use crate::Message;

/// Clicks snap to the nearest pin within this many pixels
const CLICK_RADIUS: f32 = 14.0;
/// Space between the fitted bounding box and the canvas edge, in pixels
const PADDING: f32 = 28.0;

const PIN_RADIUS: f32 = 7.0;
const ACTIVE_PIN_RADIUS: f32 = 9.0;

/// Map of marker pins over the shared dataset and selection
pub struct MarkerMap<'a> {
    pub records: &'a [PhotoRecord],
    pub selection: Selection,
}

impl MarkerMap<'_> {
    /// Project every located record into canvas coordinates.
    ///
    /// Equirectangular fit: latitude/longitude mapped linearly onto the
    /// canvas with north up. Good enough for the span of a day's photos;
    /// this is presentation, not geodesy.
    fn pins(&self, bounds: Rectangle) -> Vec<(usize, Point)> {
        let located: Vec<(usize, f64, f64)> = self
            .records
            .iter()
            .filter_map(|r| r.location.map(|l| (r.index, l.lat, l.lng)))
            .collect();
        if located.is_empty() {
            return Vec::new();
        }

        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;
        for &(_, lat, lng) in &located {
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lng = min_lng.min(lng);
            max_lng = max_lng.max(lng);
        }

        // Degenerate spans (a single pin, or all photos in one spot) still
        // need a finite scale
        let lat_span = (max_lat - min_lat).max(1e-6);
        let lng_span = (max_lng - min_lng).max(1e-6);

        let width = (bounds.width - 2.0 * PADDING).max(1.0) as f64;
        let height = (bounds.height - 2.0 * PADDING).max(1.0) as f64;

        located
            .into_iter()
            .map(|(index, lat, lng)| {
                let x = PADDING as f64 + (lng - min_lng) / lng_span * width;
                let y = PADDING as f64 + (max_lat - lat) / lat_span * height;
                (index, Point::new(x as f32, y as f32))
            })
            .collect()
    }
}

impl canvas::Program<Message> for MarkerMap<'_> {
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
        let pins = self.pins(bounds);

        if pins.is_empty() {
            frame.fill_text(canvas::Text {
                content: String::from("No GPS positions in this gallery"),
                position: frame.center(),
                color: Color::from_rgb(0.6, 0.6, 0.6),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..canvas::Text::default()
            });
            return vec![frame.into_geometry()];
        }

        // Trail between consecutive photos
        if pins.len() > 1 {
            let mut trail = canvas::path::Builder::new();
            trail.move_to(pins[0].1);
            for &(_, point) in &pins[1..] {
                trail.line_to(point);
            }
            frame.stroke(
                &trail.build(),
                Stroke::default()
                    .with_color(Color::from_rgba(1.0, 0.4, 0.0, 0.5))
                    .with_width(2.0),
            );
        }

        // Pins, active one on top
        let pin_fill = Color::from_rgb8(0xd6, 0x21, 0x11);
        let pin_border = Color::from_rgb8(0x7c, 0x17, 0x0d);
        let active_fill = Color::from_rgb8(0x2e, 0xb8, 0x4d);

        for &(index, point) in &pins {
            let is_active = index == self.selection.active_index;
            let radius = if is_active { ACTIVE_PIN_RADIUS } else { PIN_RADIUS };
            let fill = if is_active { active_fill } else { pin_fill };

            frame.fill(&Path::circle(point, radius), fill);
            frame.stroke(
                &Path::circle(point, radius),
                Stroke::default().with_color(pin_border).with_width(1.5),
            );
            frame.fill_text(canvas::Text {
                content: index.to_string(),
                position: point,
                color: Color::WHITE,
                size: Pixels(11.0),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..canvas::Text::default()
            });
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
                if let Some(index) = nearest_within(&self.pins(bounds), click, CLICK_RADIUS) {
                    return (canvas::event::Status::Captured, Some(Message::MarkerClicked(index)));
                }
            }
        }
        (canvas::event::Status::Ignored, None)
    }
}
