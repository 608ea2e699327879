/// Gallery enumeration and navigation
///
/// The gallery is the ordered list of image files to browse. Enumeration is
/// the only fatal failure of the whole pipeline: a photo with unreadable
/// metadata degrades gracefully, a folder that cannot be listed blocks all
/// views.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File extensions recognized as gallery photos
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Fatal gallery errors. Clone because they travel inside UI messages.
#[derive(Debug, Clone, Error)]
pub enum GalleryError {
    /// The gallery folder itself could not be listed
    #[error("unable to list photos in \"{path}\": {reason}")]
    Enumeration { path: String, reason: String },
}

/// List the photos in `folder` in stable gallery order.
///
/// Walks the folder tree recursively and keeps JPEG files. The sorted result
/// is the gallery ordering: origin indices are assigned from it and stay
/// stable for the lifetime of the dataset.
pub fn enumerate_photos(folder: &Path) -> Result<Vec<PathBuf>, GalleryError> {
    let mut photos = Vec::new();

    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = entry.map_err(|e| GalleryError::Enumeration {
            path: folder.display().to_string(),
            reason: e.to_string(),
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(extension) = path.extension() {
            let ext = extension.to_string_lossy().to_lowercase();
            if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
                photos.push(path.to_path_buf());
            }
        }
    }

    photos.sort();
    Ok(photos)
}

/// Wrap-around previous/next navigation.
///
/// Computes `(current + direction) mod len`, wrapping from the last photo to
/// the first and back. Pure function; the result feeds a select-photo event.
/// Returns `current` unchanged for an empty gallery.
pub fn step(direction: i64, current: usize, len: usize) -> usize {
    if len == 0 {
        return current;
    }
    (current as i64 + direction).rem_euclid(len as i64) as usize
}
