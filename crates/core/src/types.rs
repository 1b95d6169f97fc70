//! Domain types for representing a planned presentation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum length of a slide or document title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// The structured result of segmentation, prior to visual rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Presentation title.
    pub title: String,

    /// Presentation subtitle.
    pub subtitle: String,

    /// Planned slides in presentation order (the title slide is implied).
    pub slides: Vec<SlideRecord>,
}

impl DocumentOutline {
    /// Create an empty outline with the given title and subtitle.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: cap_chars(&title.into(), MAX_TITLE_CHARS),
            subtitle: subtitle.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the outline.
    pub fn add_slide(&mut self, slide: SlideRecord) {
        self.slides.push(slide);
    }

    /// Iterate over content slides only.
    pub fn content_slides(&self) -> impl Iterator<Item = &SlideRecord> {
        self.slides.iter().filter(|s| s.kind == SlideKind::Content)
    }

    /// Total number of bullets across all slides.
    pub fn bullet_count(&self) -> usize {
        self.slides.iter().map(|s| s.bullets.len()).sum()
    }

    /// Drop trailing slides beyond `max`. Returns how many were removed.
    pub fn truncate_slides(&mut self, max: usize) -> usize {
        let removed = self.slides.len().saturating_sub(max);
        self.slides.truncate(max);
        removed
    }
}

/// What a slide is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    /// Opening slide carrying the presentation title.
    Title,
    /// Title plus bullet list.
    Content,
    /// Section break with a title only.
    SectionDivider,
}

/// One planned slide, independent of visual styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide purpose.
    pub kind: SlideKind,

    /// Short text label.
    pub title: String,

    /// Bullet points in input order; empty for title and divider slides.
    #[serde(default)]
    pub bullets: Vec<String>,

    /// Local image to embed, if one was fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl SlideRecord {
    /// Create a content slide.
    pub fn content(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            kind: SlideKind::Content,
            title: cap_chars(&title.into(), MAX_TITLE_CHARS),
            bullets,
            image: None,
        }
    }

    /// Create a section divider slide.
    pub fn section_divider(title: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::SectionDivider,
            title: cap_chars(&title.into(), MAX_TITLE_CHARS),
            bullets: Vec::new(),
            image: None,
        }
    }

    /// Attach an image path to this slide.
    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Title and bullets joined into one string.
    pub fn text(&self) -> String {
        let mut text = self.title.clone();
        for bullet in &self.bullets {
            text.push(' ');
            text.push_str(bullet);
        }
        text
    }
}

/// Minimum and maximum number of slides a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideBounds {
    /// Lower bound (guidance only for the deterministic path).
    pub min_slides: usize,

    /// Upper bound (enforced by truncation).
    pub max_slides: usize,
}

impl Default for SlideBounds {
    fn default() -> Self {
        Self {
            min_slides: 10,
            max_slides: 20,
        }
    }
}

impl SlideBounds {
    /// Create bounds; `max_slides` is raised to `min_slides` if smaller, and
    /// both are at least 1.
    pub fn new(min_slides: usize, max_slides: usize) -> Self {
        let min_slides = min_slides.max(1);
        Self {
            min_slides,
            max_slides: max_slides.max(min_slides),
        }
    }
}

/// Cap a string at `max` characters (not bytes), trimming trailing whitespace
/// left by the cut.
pub fn cap_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
