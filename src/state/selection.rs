/// Shared selection state for the three synchronized views
///
/// The image pane, the map and the elevation chart all read this state and
/// feed their interaction events back through the four methods below. They
/// are the only write path; no view keeps private selection or dismissal
/// state of its own.

/// Which photo is active, and whether its detail popup is open.
///
/// Invariant: `popup_open_for`, when set, always equals `active_index`. The
/// popup is a property of the active photo, so a transition that moves the
/// active index takes an open popup along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Index of the active photo, valid as long as the dataset is non-empty
    pub active_index: usize,
    /// Index whose detail popup is visible; None when no popup is shown
    pub popup_open_for: Option<usize>,
}

impl Selection {
    /// Initial selection for a freshly loaded dataset: photo 0, no popup
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate photo `i` from prev/next navigation. Popup visibility is
    /// untouched; an open popup follows the newly active photo.
    pub fn select_photo(&mut self, i: usize, len: usize) {
        if i >= len {
            return;
        }
        self.active_index = i;
        if self.popup_open_for.is_some() {
            self.popup_open_for = Some(i);
        }
    }

    /// Marker `i` was clicked on the map. Re-clicking the active marker
    /// toggles its popup; clicking any other marker activates it and opens
    /// its popup.
    pub fn click_marker(&mut self, i: usize, len: usize) {
        if i >= len {
            return;
        }
        if i == self.active_index {
            self.popup_open_for = match self.popup_open_for {
                Some(_) => None,
                None => Some(i),
            };
        } else {
            self.active_index = i;
            self.popup_open_for = Some(i);
        }
    }

    /// Point `i` was clicked on the elevation chart. The chart has no popup
    /// concept of its own; an open popup follows the newly active photo.
    pub fn click_chart_point(&mut self, i: usize, len: usize) {
        if i >= len {
            return;
        }
        self.active_index = i;
        if self.popup_open_for.is_some() {
            self.popup_open_for = Some(i);
        }
    }

    /// Close the open popup. Does nothing when no popup is shown.
    pub fn close_popup(&mut self) {
        self.popup_open_for = None;
    }

    /// The popup invariant: a popup is only ever shown for the active photo
    pub fn is_consistent(&self) -> bool {
        match self.popup_open_for {
            Some(i) => i == self.active_index,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 16;

    #[test]
    fn test_initial_state() {
        let selection = Selection::new();
        assert_eq!(selection.active_index, 0);
        assert_eq!(selection.popup_open_for, None);
    }

    #[test]
    fn test_marker_click_switches_and_opens_popup() {
        let mut selection = Selection::new();
        selection.click_marker(2, 3);
        assert_eq!(selection.active_index, 2);
        assert_eq!(selection.popup_open_for, Some(2));
    }

    #[test]
    fn test_reclick_toggles_popup() {
        let mut selection = Selection::new();
        selection.click_marker(2, 3);
        selection.click_marker(2, 3);
        assert_eq!(selection.active_index, 2);
        assert_eq!(selection.popup_open_for, None);

        // Two consecutive clicks from "popup closed" land back on "popup closed"
        selection.click_marker(2, 3);
        assert_eq!(selection.popup_open_for, Some(2));
        selection.click_marker(2, 3);
        assert_eq!(selection.popup_open_for, None);
    }

    #[test]
    fn test_chart_click_moves_active_only() {
        let mut selection = Selection::new();
        selection.click_marker(2, 3);
        selection.click_marker(2, 3);
        selection.click_chart_point(0, 3);
        assert_eq!(selection.active_index, 0);
        assert_eq!(selection.popup_open_for, None);
    }

    #[test]
    fn test_open_popup_follows_navigation() {
        let mut selection = Selection::new();
        selection.click_marker(1, N);
        selection.select_photo(4, N);
        assert_eq!(selection.active_index, 4);
        assert_eq!(selection.popup_open_for, Some(4));
        assert!(selection.is_consistent());
    }

    #[test]
    fn test_close_popup_is_idempotent() {
        let mut selection = Selection::new();
        selection.close_popup();
        assert_eq!(selection.popup_open_for, None);
        selection.click_marker(3, N);
        selection.close_popup();
        selection.close_popup();
        assert_eq!(selection.popup_open_for, None);
        assert_eq!(selection.active_index, 3);
    }

    #[test]
    fn test_out_of_range_events_are_ignored() {
        let mut selection = Selection::new();
        selection.click_marker(2, N);

        selection.select_photo(N, N);
        selection.click_marker(N + 5, N);
        selection.click_chart_point(usize::MAX, N);

        assert_eq!(selection.active_index, 2);
        assert_eq!(selection.popup_open_for, Some(2));
    }

    #[test]
    fn test_events_on_empty_dataset_are_ignored() {
        let mut selection = Selection::new();
        selection.select_photo(0, 0);
        selection.click_marker(0, 0);
        assert_eq!(selection, Selection::new());
    }

    #[test]
    fn test_invariant_holds_over_arbitrary_event_sequences() {
        // Cheap deterministic pseudo-random event stream
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut selection = Selection::new();

        for _ in 0..10_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let i = (seed >> 33) as usize % (N + 2); // occasionally out of range
            match (seed >> 13) % 4 {
                0 => selection.select_photo(i, N),
                1 => selection.click_marker(i, N),
                2 => selection.click_chart_point(i, N),
                _ => selection.close_popup(),
            }
            assert!(selection.is_consistent(), "popup open for a non-active photo");
            assert!(selection.active_index < N);
        }
    }
}
