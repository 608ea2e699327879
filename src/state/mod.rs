/// Application state module
///
/// This module handles:
/// - Gallery enumeration and wrap-around navigation (gallery.rs)
/// - The shared selection state machine (selection.rs)

pub mod gallery;
pub mod selection;
