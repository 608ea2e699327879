use iced::widget::{button, canvas, column, container, image, row, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

// Declare the application modules
mod meta;
mod state;
mod ui;

use meta::correlate::{self, PhotoRecord};
use state::gallery::{self, GalleryError};
use state::selection::Selection;

/// Main application state
struct GeoGallery {
    /// The correlated dataset; None until the first gallery load settles
    records: Option<Vec<PhotoRecord>>,
    /// Shared selection read by the image pane, the map and the chart
    selection: Selection,
    /// Id of the latest requested gallery load. A settled load stamped with
    /// an older id is discarded: last writer wins on the whole dataset.
    load_run: u64,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "Open Folder" button
    OpenFolder,
    /// Background gallery load settled, stamped with its load run id
    GalleryLoaded(u64, Result<Vec<PhotoRecord>, GalleryError>),
    /// Prev/next navigation resolved to this index
    SelectPhoto(usize),
    /// A marker was clicked on the map
    MarkerClicked(usize),
    /// A point was clicked on the elevation chart
    ChartPointClicked(usize),
    /// The popup's explicit close control was clicked
    ClosePopup,
}

impl GeoGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        println!("🗺️  Geo Gallery initialized");
        (
            GeoGallery {
                records: None,
                selection: Selection::new(),
                load_run: 0,
                status: String::from("Open a folder of geotagged photos to begin."),
            },
            Task::none(),
        )
    }

    fn photo_count(&self) -> usize {
        self.records.as_ref().map(|records| records.len()).unwrap_or(0)
    }

    /// Handle application messages and update state.
    ///
    /// All selection transitions run here, on the UI actor; the three views
    /// only ever write through the messages they emit.
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::OpenFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Geotagged Photos")
                    .pick_folder();

                match folder {
                    Some(folder_path) => {
                        self.status = format!("Loading photos from {}...", folder_path.display());
                        self.load_run += 1;

                        Task::perform(
                            load_gallery(folder_path, self.load_run),
                            |(run, result)| Message::GalleryLoaded(run, result),
                        )
                    }
                    None => Task::none(),
                }
            }
            Message::GalleryLoaded(run, result) => {
                if run != self.load_run {
                    // A newer load was requested while this one was in flight
                    println!("🔄 Discarding stale gallery load {}", run);
                } else {
                    match result {
                        Ok(records) => {
                            let located = records.iter().filter(|r| r.location.is_some()).count();
                            self.status = format!(
                                "✅ Loaded {} photos, {} with a GPS position.",
                                records.len(),
                                located
                            );
                            // The dataset is replaced as a whole; selection
                            // resets to photo 0 with no popup
                            self.selection = Selection::new();
                            self.records = Some(records);
                        }
                        Err(error) => {
                            eprintln!("❌ Gallery load failed: {}", error);
                            self.status = format!("❌ {}", error);
                            self.records = None;
                            self.selection = Selection::new();
                        }
                    }
                }

                Task::none()
            }
            Message::SelectPhoto(i) => {
                self.selection.select_photo(i, self.photo_count());
                Task::none()
            }
            Message::MarkerClicked(i) => {
                self.selection.click_marker(i, self.photo_count());
                Task::none()
            }
            Message::ChartPointClicked(i) => {
                self.selection.click_chart_point(i, self.photo_count());
                Task::none()
            }
            Message::ClosePopup => {
                self.selection.close_popup();
                Task::none()
            }
        };

        // A popup is only ever shown for the active photo
        debug_assert!(self.selection.is_consistent());

        task
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let Some(records) = self.records.as_ref().filter(|records| !records.is_empty()) else {
            // Loading / empty state: no selection exists yet
            let content = column![
                text("Geo Gallery").size(48),
                button("Open Folder").on_press(Message::OpenFolder).padding(10),
                text(&self.status).size(16),
            ]
            .spacing(20)
            .padding(40)
            .align_x(Alignment::Center);

            return container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let active = &records[self.selection.active_index];

        // Wrap-around navigation targets, fed back in as select-photo events
        let prev = gallery::step(-1, self.selection.active_index, records.len());
        let next = gallery::step(1, self.selection.active_index, records.len());

        let photo_pane = column![
            image(image::Handle::from_path(&active.path))
                .width(Length::Fill)
                .height(Length::Fill),
            row![
                button("< Prev").on_press(Message::SelectPhoto(prev)).padding(8),
                text(format!("{} / {}  -  {}", active.index + 1, records.len(), active.label))
                    .size(16),
                button("Next >").on_press(Message::SelectPhoto(next)).padding(8),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let mut map_pane = column![canvas(ui::map::MarkerMap {
            records,
            selection: self.selection,
        })
        .width(Length::Fill)
        .height(Length::Fill)]
        .spacing(8);

        // Detail popup for the active marker
        if let Some(popup_index) = self.selection.popup_open_for {
            map_pane = map_pane.push(popup_panel(&records[popup_index]));
        }

        let chart_pane = canvas(ui::chart::ElevationChart {
            records,
            selection: self.selection,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let content = column![
            row![
                photo_pane.width(Length::FillPortion(1)),
                map_pane.width(Length::FillPortion(1)),
            ]
            .spacing(16)
            .height(Length::FillPortion(3)),
            container(chart_pane).height(Length::FillPortion(2)),
            row![
                button("Open Folder").on_press(Message::OpenFolder).padding(6),
                text(&self.status).size(14),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(16)
        .padding(16);

        container(content).width(Length::Fill).height(Length::Fill).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Detail popup for one photo, with its explicit close control
fn popup_panel(record: &PhotoRecord) -> Element<Message> {
    let mut details = column![
        text(format!("Image {}", record.index)).size(20),
        text(format!("Day: {}", record.label)),
    ]
    .spacing(4);

    if let Some(altitude) = record.altitude {
        details = details.push(text(format!("Elevation: {} meters", altitude)));
    }
    if let Some(time) = record.capture_time {
        details = details.push(text(format!("Taken: {}", time.format("%Y-%m-%d %H:%M"))));
    }
    if let Some(location) = record.location {
        details =
            details.push(text(format!("Position: {:.5}, {:.5}", location.lat, location.lng)));
    }
    details = details.push(button("Close").on_press(Message::ClosePopup).padding(6));

    container(details).padding(10).into()
}


fn main() -> iced::Result {
    iced::application("Geo Gallery", GeoGallery::update, GeoGallery::view)
        .theme(GeoGallery::theme)
        .centered()
        .run_with(GeoGallery::new)
}

/// Enumerate the gallery folder and correlate metadata for every photo.
///
/// Runs in the background via the iced task executor. The result carries the
/// load run id so stale runs can be discarded by the shell.
async fn load_gallery(
    folder: PathBuf,
    run: u64,
) -> (u64, Result<Vec<PhotoRecord>, GalleryError>) {
    println!("🔍 Scanning folder: {}", folder.display());

    let paths = match gallery::enumerate_photos(&folder) {
        Ok(paths) => paths,
        Err(error) => return (run, Err(error)),
    };
    println!("🖼️  Found {} photos", paths.len());

    let records = correlate::correlate_all(paths).await;
    (run, Ok(records))
}
