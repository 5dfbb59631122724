//! Reader display preferences and per-series reading progress.
//!
//! # Design
//! - Both stores are flat serde structs persisted wholesale; the persistence
//!   adapter in `app::persistence` stays a narrow load/save pair.
//! - Preference writes go through a [`ReaderPatch`] so callers update one
//!   knob without re-stating the rest; `reset` restores the fixed defaults.
//! - Progress keeps exactly one entry per series, overwritten on every
//!   chapter navigation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest accepted zoom percentage.
pub const ZOOM_MIN: u16 = 50;

/// Largest accepted zoom percentage.
pub const ZOOM_MAX: u16 = 200;

/// Page backdrop behind the chapter images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderBackground {
    /// Near-black backdrop.
    #[default]
    Dark,
    /// White backdrop.
    Light,
    /// Mid-grey backdrop.
    Grey,
}

/// Vertical gap between consecutive pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSpacing {
    /// Pages touch.
    None,
    /// Small gap.
    #[default]
    Normal,
    /// Large gap.
    Wide,
}

/// Flat reader settings, persisted as one blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderPreferences {
    /// Backdrop behind the pages.
    pub background: ReaderBackground,
    /// Gap between pages.
    pub spacing: PageSpacing,
    /// Page width as a percentage, clamped to `ZOOM_MIN..=ZOOM_MAX`.
    pub zoom: u16,
    /// Whether the prev/next navigation bar is shown.
    pub show_navigation: bool,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            background: ReaderBackground::default(),
            spacing: PageSpacing::default(),
            zoom: 100,
            show_navigation: true,
        }
    }
}

/// Partial preference update; `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReaderPatch {
    /// New backdrop, if changing.
    pub background: Option<ReaderBackground>,
    /// New spacing, if changing.
    pub spacing: Option<PageSpacing>,
    /// New zoom percentage, if changing; clamped on apply.
    pub zoom: Option<u16>,
    /// New navigation-bar visibility, if changing.
    pub show_navigation: Option<bool>,
}

impl ReaderPreferences {
    /// Apply a patch, clamping zoom into its valid range.
    #[must_use]
    pub fn apply(&self, patch: &ReaderPatch) -> Self {
        Self {
            background: patch.background.unwrap_or(self.background),
            spacing: patch.spacing.unwrap_or(self.spacing),
            zoom: patch.zoom.unwrap_or(self.zoom).clamp(ZOOM_MIN, ZOOM_MAX),
            show_navigation: patch.show_navigation.unwrap_or(self.show_navigation),
        }
    }
}

/// Last-read position within one series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Slug of the chapter last opened.
    pub chapter_slug: String,
    /// Ordinal of that chapter, for "continue from chapter N" labels.
    pub chapter_number: u32,
    /// Unix epoch milliseconds of the navigation.
    pub updated_at_ms: f64,
}

/// Per-series reading positions, keyed by series slug.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgressState {
    /// One entry per series; overwritten on every chapter navigation.
    pub entries: HashMap<String, ProgressEntry>,
}

impl ReadingProgressState {
    /// Last-read position for a series, if any.
    #[must_use]
    pub fn get(&self, manga_slug: &str) -> Option<&ProgressEntry> {
        self.entries.get(manga_slug)
    }

    /// Record a chapter navigation, replacing any prior entry for the series.
    pub fn set(&mut self, manga_slug: &str, chapter_slug: &str, chapter_number: u32, now_ms: f64) {
        self.entries.insert(
            manga_slug.to_string(),
            ProgressEntry {
                chapter_slug: chapter_slug.to_string(),
                chapter_number,
                updated_at_ms: now_ms,
            },
        );
    }

    /// Forget the position for one series.
    pub fn clear(&mut self, manga_slug: &str) {
        self.entries.remove(manga_slug);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PageSpacing, ReaderBackground, ReaderPatch, ReaderPreferences, ReadingProgressState,
        ZOOM_MAX, ZOOM_MIN,
    };

    #[test]
    fn patch_changes_only_named_fields() {
        let prefs = ReaderPreferences::default();
        let next = prefs.apply(&ReaderPatch {
            background: Some(ReaderBackground::Light),
            ..ReaderPatch::default()
        });
        assert_eq!(next.background, ReaderBackground::Light);
        assert_eq!(next.spacing, PageSpacing::Normal);
        assert_eq!(next.zoom, 100);
        assert!(next.show_navigation);
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let prefs = ReaderPreferences::default();
        let low = prefs.apply(&ReaderPatch {
            zoom: Some(10),
            ..ReaderPatch::default()
        });
        assert_eq!(low.zoom, ZOOM_MIN);
        let high = prefs.apply(&ReaderPatch {
            zoom: Some(999),
            ..ReaderPatch::default()
        });
        assert_eq!(high.zoom, ZOOM_MAX);
    }

    #[test]
    fn reset_is_idempotent() {
        // Resetting means replacing with the default snapshot; doing it twice
        // yields the same value.
        assert_eq!(ReaderPreferences::default(), ReaderPreferences::default());
    }

    #[test]
    fn progress_round_trip_matches_scenario() {
        let mut progress = ReadingProgressState::default();
        progress.set("naruto", "chapter-5", 5, 1_000.0);
        let entry = progress.get("naruto").expect("entry recorded");
        assert_eq!(entry.chapter_slug, "chapter-5");
        assert_eq!(entry.chapter_number, 5);
        assert!((entry.updated_at_ms - 1_000.0).abs() < f64::EPSILON);
        progress.clear("naruto");
        assert!(progress.get("naruto").is_none());
    }

    #[test]
    fn set_overwrites_never_merges() {
        let mut progress = ReadingProgressState::default();
        progress.set("naruto", "chapter-5", 5, 1_000.0);
        progress.set("naruto", "chapter-6", 6, 2_000.0);
        assert_eq!(progress.entries.len(), 1);
        let entry = progress.get("naruto").expect("entry recorded");
        assert_eq!(entry.chapter_slug, "chapter-6");
        assert_eq!(entry.chapter_number, 6);
    }

    #[test]
    fn series_entries_are_independent() {
        let mut progress = ReadingProgressState::default();
        progress.set("naruto", "chapter-5", 5, 1_000.0);
        progress.set("bleach", "chapter-1", 1, 1_000.0);
        progress.clear("naruto");
        assert!(progress.get("naruto").is_none());
        assert!(progress.get("bleach").is_some());
    }
}
