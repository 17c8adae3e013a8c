//! Gallery selection state
//!
//! The pure state machine behind one mounted gallery: which project is
//! selected, whether its image is still loading, and which images have
//! loaded at least once. All mutation goes through named transitions so
//! the machine is testable with no timers or rendering attached; the
//! async shell in `controller` owns the clocks.

use atelier_common::catalog::{self, Category, Project};
use atelier_common::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// How the active thumbnail should be brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbAlignment {
    /// Align to the start of the strip (keeps early thumbnails visible)
    Start,
    /// Center the active thumbnail
    Center,
}

/// Why the gallery has nothing to show. The two cases are distinct,
/// user-visible empty states, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyReason {
    /// The category has no projects at all
    NoProjects,
    /// The category has projects but none with an image
    NoProjectsWithImages,
}

/// Outcome of an image-load report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAck {
    /// Index out of range for the current list (e.g. a report that
    /// raced a category switch); ignored
    Ignored,
    /// Recorded; the loaded image is not the current selection
    Recorded,
    /// Recorded for the current selection while it was loading: the
    /// caller should schedule the deferred loading-clear for this index
    ClearPending,
}

#[derive(Debug)]
pub struct GalleryState {
    category: Option<Category>,
    /// Size of the unfiltered category list (distinct empty states)
    total_in_category: usize,
    /// Projects with at least one image, catalog order
    projects: Vec<&'static Project>,
    selected: usize,
    loading: bool,
    loaded: HashSet<usize>,
    initial_mount: bool,
}

impl GalleryState {
    pub fn new(category: Option<Category>) -> Self {
        let mut state = Self {
            category: None,
            total_in_category: 0,
            projects: Vec::new(),
            selected: 0,
            loading: false,
            loaded: HashSet::new(),
            initial_mount: true,
        };
        state.reset(category);
        state
    }

    /// Mount / category change: recompute the valid-project list and
    /// drop all per-list state. The thumbnail strip returns to its
    /// absolute start on the next paint (`initial_mount`).
    pub fn reset(&mut self, category: Option<Category>) {
        let all = catalog::projects_by_category(category);
        self.total_in_category = all.len();
        self.projects = all.into_iter().filter(|p| p.has_images()).collect();
        self.category = category;
        self.selected = 0;
        self.loaded.clear();
        self.loading = !self.projects.is_empty();
        self.initial_mount = true;
    }

    /// Manual selection. Out-of-bounds is the caller's error; selecting
    /// the current index is a no-op. Otherwise the index moves
    /// immediately and the loading overlay comes up.
    pub fn select(&mut self, index: usize) -> Result<bool> {
        if index >= self.projects.len() {
            return Err(Error::InvalidInput(format!(
                "index {index} out of bounds for {} projects",
                self.projects.len()
            )));
        }
        if index == self.selected {
            return Ok(false);
        }
        self.selected = index;
        self.loading = true;
        self.initial_mount = false;
        Ok(true)
    }

    /// Timer-driven advance, wrapping at the end. Does not touch the
    /// loading flag; the auto-advance timer only runs while idle.
    pub fn advance(&mut self) -> Option<usize> {
        if self.projects.len() < 2 {
            return None;
        }
        self.selected = (self.selected + 1) % self.projects.len();
        self.initial_mount = false;
        Some(self.selected)
    }

    /// Record that the image at `index` finished loading. Completion is
    /// keyed by index: a late event for a previously-selected image
    /// never clears the loading state of the current one.
    pub fn image_loaded(&mut self, index: usize) -> LoadAck {
        if index >= self.projects.len() {
            return LoadAck::Ignored;
        }
        self.loaded.insert(index);
        if index == self.selected && self.loading {
            LoadAck::ClearPending
        } else {
            LoadAck::Recorded
        }
    }

    /// Deferred loading-clear landing point. Only clears if `index` is
    /// still the selection and it is still loading.
    pub fn clear_loading_if_selected(&mut self, index: usize) -> bool {
        if self.loading && index == self.selected {
            self.loading = false;
            true
        } else {
            false
        }
    }

    /// Safeguard landing point: the display must never stay stuck on
    /// the loading overlay because an image never reported in.
    pub fn force_clear_loading(&mut self) -> bool {
        if self.loading {
            self.loading = false;
            true
        } else {
            false
        }
    }

    pub fn thumb_alignment(&self) -> ThumbAlignment {
        if self.selected < 3 {
            ThumbAlignment::Start
        } else {
            ThumbAlignment::Center
        }
    }

    pub fn valid_count(&self) -> usize {
        self.projects.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The auto-advance timer runs only with something to advance
    /// through and nothing mid-load.
    pub fn auto_advance_enabled(&self) -> bool {
        self.projects.len() > 1 && !self.loading
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if self.total_in_category == 0 {
            Some(EmptyReason::NoProjects)
        } else if self.projects.is_empty() {
            Some(EmptyReason::NoProjectsWithImages)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> GalleryView {
        GalleryView {
            category: self.category,
            total_in_category: self.total_in_category,
            projects: self
                .projects
                .iter()
                .map(|p| ProjectView {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    image: p.images[0].clone(),
                })
                .collect(),
            selected_index: self.selected,
            is_loading: self.loading,
            loaded: {
                let mut loaded: Vec<usize> = self.loaded.iter().copied().collect();
                loaded.sort_unstable();
                loaded
            },
            initial_mount: self.initial_mount,
            alignment: self.thumb_alignment(),
            auto_advance: self.auto_advance_enabled(),
            empty: self.empty_reason(),
        }
    }
}

/// What one gallery shows right now, as sent to the client
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub category: Option<Category>,
    pub total_in_category: usize,
    pub projects: Vec<ProjectView>,
    pub selected_index: usize,
    pub is_loading: bool,
    pub loaded: Vec<usize>,
    pub initial_mount: bool,
    pub alignment: ThumbAlignment,
    pub auto_advance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: String,
    pub title: String,
    /// Canonical preview locator (first image)
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landscape() -> GalleryState {
        // 5 valid projects
        GalleryState::new(Some(Category::Landscape))
    }

    #[test]
    fn test_mount_starts_loading_at_zero() {
        let state = landscape();
        assert_eq!(state.selected(), 0);
        assert!(state.is_loading());
        assert_eq!(state.valid_count(), 5);
        assert!(state.snapshot().initial_mount);
        assert!(state.empty_reason().is_none());
        // Loading gates the advance timer
        assert!(!state.auto_advance_enabled());
    }

    #[test]
    fn test_select_moves_immediately_and_sets_loading() {
        let mut state = landscape();
        state.force_clear_loading();
        assert!(state.select(3).unwrap());
        assert_eq!(state.selected(), 3);
        assert!(state.is_loading());
        assert!(!state.snapshot().initial_mount);
    }

    #[test]
    fn test_select_same_index_is_noop() {
        let mut state = landscape();
        state.force_clear_loading();
        assert!(!state.select(0).unwrap());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_select_out_of_bounds_errors() {
        let mut state = landscape();
        assert!(state.select(5).is_err());
        assert_eq!(state.selected(), 0);
    }

    #[test]
    fn test_advance_wraps() {
        let mut state = landscape();
        state.force_clear_loading();
        state.select(4).unwrap();
        state.clear_loading_if_selected(4);
        assert_eq!(state.advance(), Some(0));
    }

    #[test]
    fn test_advance_needs_two_projects() {
        let mut empty = GalleryState::new(Some(Category::Landscape));
        empty.projects.clear();
        assert_eq!(empty.advance(), None);
    }

    #[test]
    fn test_image_loaded_keys_by_index() {
        let mut state = landscape();
        // Load report for a non-selected image: recorded, no clear
        assert_eq!(state.image_loaded(2), LoadAck::Recorded);
        assert!(state.is_loading());
        // Report for the selection: clear becomes pending
        assert_eq!(state.image_loaded(0), LoadAck::ClearPending);
        // Selection moved before the deferred clear landed
        state.select(1).unwrap();
        assert!(!state.clear_loading_if_selected(0));
        assert!(state.is_loading());
        // The clear for the new selection works
        state.image_loaded(1);
        assert!(state.clear_loading_if_selected(1));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_image_loaded_out_of_range_ignored() {
        let mut state = landscape();
        assert_eq!(state.image_loaded(99), LoadAck::Ignored);
        assert!(state.snapshot().loaded.is_empty());
    }

    #[test]
    fn test_force_clear_is_idempotent() {
        let mut state = landscape();
        assert!(state.force_clear_loading());
        assert!(!state.force_clear_loading());
    }

    #[test]
    fn test_category_switch_resets_everything() {
        let mut state = landscape();
        state.image_loaded(0);
        state.clear_loading_if_selected(0);
        state.select(3).unwrap();

        state.reset(Some(Category::Interiors));
        let view = state.snapshot();
        assert_eq!(view.selected_index, 0);
        assert!(view.loaded.is_empty());
        assert!(view.is_loading);
        assert!(view.initial_mount);
        assert_eq!(view.category, Some(Category::Interiors));
    }

    #[test]
    fn test_alignment_rule() {
        let mut state = GalleryState::new(Some(Category::Interiors));
        state.force_clear_loading();
        for index in [0, 1, 2] {
            if index > 0 {
                state.select(index).unwrap();
            }
            assert_eq!(state.thumb_alignment(), ThumbAlignment::Start);
        }
        state.select(3).unwrap();
        assert_eq!(state.thumb_alignment(), ThumbAlignment::Center);
    }

    #[test]
    fn test_empty_states_are_distinct() {
        let mut state = landscape();

        state.total_in_category = 0;
        state.projects.clear();
        assert_eq!(state.empty_reason(), Some(EmptyReason::NoProjects));

        state.total_in_category = 3;
        assert_eq!(
            state.empty_reason(),
            Some(EmptyReason::NoProjectsWithImages)
        );
        // Neither empty state may panic the snapshot path
        let view = state.snapshot();
        assert_eq!(view.selected_index, 0);
        assert!(!view.auto_advance);
    }
}
