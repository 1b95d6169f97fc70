//! Text renderings of an outline.
//!
//! Used for previewing what will go into the deck before (or instead of)
//! writing a `.pptx`.

use crate::error::{Error, Result};
use crate::types::{DocumentOutline, SlideKind};

/// Output style for [`OutlineFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineStyle {
    /// `# Title`, `## Slide`, `- bullet`.
    #[default]
    Markdown,
    /// Pretty-printed JSON of the outline.
    Json,
}

/// Formatter for outline previews.
#[derive(Debug, Clone, Default)]
pub struct OutlineFormatter {
    style: OutlineStyle,
    /// Prefix slide headings with their 1-based number.
    numbered: bool,
}

impl OutlineFormatter {
    /// Create a new Markdown formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output style.
    pub fn with_style(mut self, style: OutlineStyle) -> Self {
        self.style = style;
        self
    }

    /// Number slide headings.
    pub fn with_numbering(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// Format an outline.
    ///
    /// # Example output
    /// ```text
    /// # Rust in Production
    /// _Lessons learned_
    ///
    /// ## Why Rust
    /// - Memory safety
    /// - Performance
    /// ```
    pub fn format(&self, outline: &DocumentOutline) -> Result<String> {
        match self.style {
            OutlineStyle::Markdown => Ok(self.format_markdown(outline)),
            OutlineStyle::Json => serde_json::to_string_pretty(outline)
                .map_err(|e| Error::RenderError(format!("Failed to serialize outline: {e}"))),
        }
    }

    /// Format and add a trailing newline.
    pub fn format_with_newline(&self, outline: &DocumentOutline) -> Result<String> {
        let formatted = self.format(outline)?;
        Ok(format!("{formatted}\n"))
    }

    fn format_markdown(&self, outline: &DocumentOutline) -> String {
        let mut blocks = vec![format!("# {}\n_{}_", outline.title, outline.subtitle)];

        for (idx, slide) in outline.slides.iter().enumerate() {
            let heading = if self.numbered {
                format!("{}. {}", idx + 1, slide.title)
            } else {
                slide.title.clone()
            };

            let mut block = match slide.kind {
                SlideKind::SectionDivider => format!("---\n## {heading}"),
                SlideKind::Title | SlideKind::Content => format!("## {heading}"),
            };
            for bullet in &slide.bullets {
                block.push_str("\n- ");
                block.push_str(bullet);
            }
            if let Some(image) = &slide.image {
                block.push_str(&format!("\n\n![{}]({})", slide.title, image.display()));
            }
            blocks.push(block);
        }

        blocks.join("\n\n")
    }
}
