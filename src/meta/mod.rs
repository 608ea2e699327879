/// Photo metadata module
///
/// This module handles:
/// - Decoding embedded EXIF metadata from a single image (extractor.rs)
/// - Correlating per-photo extractions into one ordered dataset (correlate.rs)

pub mod correlate;
pub mod extractor;
