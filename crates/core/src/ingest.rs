//! Ingestion of AI-generated outlines.
//!
//! Providers answer with loosely shaped JSON: `content` or `bullets`,
//! `title` or `slide_title`, bullet lists or newline-separated strings,
//! sometimes wrapped in a Markdown code fence. Everything is deserialized
//! into [`RawOutline`] / [`RawSlide`] and normalized once here, so the rest
//! of the crate only ever sees [`DocumentOutline`].

use crate::error::{Error, Result};
use crate::normalize::TextNormalizer;
use crate::segment::{truncate_bullet, SegmentConfig, DEFAULT_SUBTITLE, DEFAULT_TITLE};
use crate::types::{DocumentOutline, SlideBounds, SlideRecord};
use log::{debug, warn};
use serde::Deserialize;

/// Top-level shapes an outline response may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawOutline {
    /// `{"title": ..., "subtitle": ..., "slides": [...]}`
    Document {
        #[serde(default, alias = "presentation_title")]
        title: Option<String>,
        #[serde(default, alias = "presentation_subtitle")]
        subtitle: Option<String>,
        #[serde(alias = "slide_list")]
        slides: Vec<RawSlide>,
    },
    /// A bare array of slides.
    Slides(Vec<RawSlide>),
}

/// Slide shapes seen from different providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSlide {
    /// A slide with a body.
    Bulleted {
        #[serde(alias = "slide_title", alias = "heading")]
        title: String,
        #[serde(alias = "bullets", alias = "points", alias = "bullet_points")]
        content: RawBullets,
        #[serde(default, rename = "type", alias = "kind", alias = "slide_type")]
        kind: Option<String>,
    },
    /// A slide with a title only.
    Heading {
        #[serde(alias = "slide_title", alias = "heading")]
        title: String,
        #[serde(default, rename = "type", alias = "kind", alias = "slide_type")]
        kind: Option<String>,
    },
    /// Just a title string.
    Plain(String),
}

/// Bullet containers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBullets {
    List(Vec<RawBullet>),
    Text(String),
}

/// A single bullet, either a string or an object wrapping one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBullet {
    Text(String),
    Object {
        #[serde(alias = "point", alias = "content", alias = "bullet")]
        text: String,
    },
}

/// What a raw slide turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Normalized {
    Slide(SlideRecord),
    /// A title slide: supplies the document title/subtitle, not a slide.
    Cover { title: String, subtitle: Option<String> },
}

impl RawBullets {
    fn into_lines(self) -> Vec<String> {
        match self {
            RawBullets::List(items) => items
                .into_iter()
                .map(|b| match b {
                    RawBullet::Text(text) | RawBullet::Object { text } => text,
                })
                .collect(),
            RawBullets::Text(text) => text.lines().map(str::to_string).collect(),
        }
    }
}

impl RawSlide {
    fn normalize(self, config: &SegmentConfig, normalizer: &TextNormalizer) -> Option<Normalized> {
        let (title, lines, kind) = match self {
            RawSlide::Bulleted {
                title,
                content,
                kind,
            } => (title, content.into_lines(), kind),
            RawSlide::Heading { title, kind } => (title, Vec::new(), kind),
            RawSlide::Plain(title) => (title, Vec::new(), None),
        };

        let title = title.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let bullets: Vec<String> = lines
            .iter()
            .map(|l| normalizer.normalize_line(&normalizer.normalize_text(l)))
            .filter(|l| !l.is_empty())
            .map(|l| truncate_bullet(&l, config.max_bullet_chars))
            .take(config.max_bullets)
            .collect();

        let kind = kind
            .map(|k| k.trim().to_lowercase().replace(['-', ' '], "_"))
            .unwrap_or_default();

        match kind.as_str() {
            "title" | "title_slide" | "cover" => Some(Normalized::Cover {
                title,
                subtitle: bullets.into_iter().next(),
            }),
            "section" | "divider" | "section_divider" | "section_header" => {
                Some(Normalized::Slide(SlideRecord::section_divider(title)))
            }
            _ if bullets.is_empty() => Some(Normalized::Slide(SlideRecord::section_divider(title))),
            _ => Some(Normalized::Slide(SlideRecord::content(title, bullets))),
        }
    }
}

/// Locate the JSON payload inside a model response.
///
/// Prefers a fenced code block, then the widest `{...}` span, then the widest
/// `[...]` span. A response that itself opens with `[` tries the array first.
/// The first span that is valid JSON wins; when none is, the first candidate
/// is returned so the caller can report the parse error.
pub fn extract_json(response: &str) -> Option<&str> {
    if let Some(start) = response.find("```") {
        let after_fence = &response[start + 3..];
        // skip an info string such as "json"
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let span = |open: char, close: char| {
        response
            .find(open)
            .zip(response.rfind(close))
            .filter(|(start, end)| start < end)
            .map(|(start, end)| &response[start..=end])
    };
    let object = span('{', '}');
    let array = span('[', ']');

    let candidates = if response.trim_start().starts_with('[') {
        [array, object]
    } else {
        [object, array]
    };

    candidates
        .iter()
        .flatten()
        .find(|json| serde_json::from_str::<serde_json::Value>(json).is_ok())
        .or_else(|| candidates.iter().flatten().next())
        .copied()
}

/// Parse a model response into an outline.
///
/// Missing title or subtitle fall back to defaults. A response without
/// parseable JSON, without a slide list, or without any usable slide is a
/// [`Error::MalformedResponse`], which callers treat as a signal to run the
/// deterministic segmenter instead.
pub fn parse_outline(
    response: &str,
    bounds: SlideBounds,
    config: &SegmentConfig,
) -> Result<DocumentOutline> {
    let json = extract_json(response)
        .ok_or_else(|| Error::MalformedResponse("no JSON found in response".to_string()))?;

    let raw: RawOutline = serde_json::from_str(json)
        .map_err(|e| Error::MalformedResponse(format!("invalid outline JSON: {e}")))?;

    let (mut title, mut subtitle, raw_slides) = match raw {
        RawOutline::Document {
            title,
            subtitle,
            slides,
        } => (title, subtitle, slides),
        RawOutline::Slides(slides) => (None, None, slides),
    };

    let normalizer = TextNormalizer::new();
    let mut slides = Vec::new();

    for raw_slide in raw_slides {
        match raw_slide.normalize(config, &normalizer) {
            Some(Normalized::Slide(slide)) => slides.push(slide),
            Some(Normalized::Cover {
                title: cover_title,
                subtitle: cover_subtitle,
            }) => {
                if title.is_none() {
                    title = Some(cover_title);
                }
                if subtitle.is_none() {
                    subtitle = cover_subtitle;
                }
            }
            None => debug!("Skipping slide without a title"),
        }
    }

    if slides.is_empty() {
        return Err(Error::MalformedResponse(
            "outline contains no usable slides".to_string(),
        ));
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let subtitle = subtitle
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string());

    let mut outline = DocumentOutline::new(title, subtitle);
    outline.slides = slides;

    let dropped = outline.truncate_slides(bounds.max_slides);
    if dropped > 0 {
        warn!("AI outline exceeded max_slides; dropped {dropped} slides");
    }

    Ok(outline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideKind;

    fn parse(response: &str) -> Result<DocumentOutline> {
        parse_outline(response, SlideBounds::default(), &SegmentConfig::default())
    }

    #[test]
    fn test_extract_json_from_fence() {
        let response = "Here you go:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_json(response), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_json_from_prose() {
        let response = "Sure! {\"title\": \"x\"} Hope that helps.";
        assert_eq!(extract_json(response), Some("{\"title\": \"x\"}"));
    }

    #[test]
    fn test_extract_json_bare_array() {
        let response = "[{\"title\": \"x\"}]";
        assert_eq!(extract_json(response), Some(response));
    }

    #[test]
    fn test_extract_json_bracket_in_prose_before_object() {
        let response = r#"Outline [draft]: {"title": "T", "slides": [{"title": "A", "content": ["one point here"]}]}"#;
        assert_eq!(
            extract_json(response),
            Some(r#"{"title": "T", "slides": [{"title": "A", "content": ["one point here"]}]}"#)
        );

        let outline = parse(response).unwrap();
        assert_eq!(outline.title, "T");
        assert_eq!(outline.slides[0].title, "A");
    }

    #[test]
    fn test_extract_json_array_of_objects() {
        let response = r#"[{"title": "A"}, {"title": "B"}]"#;
        assert_eq!(extract_json(response), Some(response));
        assert_eq!(parse(response).unwrap().slides.len(), 2);
    }

    #[test]
    fn test_extract_json_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_parse_content_shape() {
        let response = r#"{
            "title": "Rust in Production",
            "subtitle": "Lessons learned",
            "slides": [
                {"title": "Why Rust", "content": ["Memory safety", "Performance", "Tooling"]},
                {"title": "Adoption", "content": "- Start small\n- Grow the team"}
            ]
        }"#;

        let outline = parse(response).unwrap();
        assert_eq!(outline.title, "Rust in Production");
        assert_eq!(outline.subtitle, "Lessons learned");
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.slides[0].bullets, vec!["Memory safety", "Performance", "Tooling"]);
        assert_eq!(outline.slides[1].bullets, vec!["Start small", "Grow the team"]);
    }

    #[test]
    fn test_parse_alternate_key_names() {
        let response = r#"{"slides": [
            {"slide_title": "One", "bullets": ["a point"]},
            {"heading": "Two", "points": [{"text": "object bullet"}]}
        ]}"#;

        let outline = parse(response).unwrap();
        assert_eq!(outline.slides[0].title, "One");
        assert_eq!(outline.slides[0].bullets, vec!["a point"]);
        assert_eq!(outline.slides[1].title, "Two");
        assert_eq!(outline.slides[1].bullets, vec!["object bullet"]);
        assert_eq!(outline.title, DEFAULT_TITLE);
        assert_eq!(outline.subtitle, DEFAULT_SUBTITLE);
    }

    #[test]
    fn test_parse_section_and_title_slides() {
        let response = r#"[
            {"type": "title", "title": "Deck From Cover", "content": ["Cover subtitle"]},
            {"type": "section", "title": "Part One"},
            {"title": "Details", "content": ["first detail"]},
            "Closing Thoughts"
        ]"#;

        let outline = parse(response).unwrap();
        assert_eq!(outline.title, "Deck From Cover");
        assert_eq!(outline.subtitle, "Cover subtitle");
        assert_eq!(outline.slides.len(), 3);
        assert_eq!(outline.slides[0].kind, SlideKind::SectionDivider);
        assert_eq!(outline.slides[1].kind, SlideKind::Content);
        assert_eq!(outline.slides[2].kind, SlideKind::SectionDivider);
        assert_eq!(outline.slides[2].title, "Closing Thoughts");
    }

    #[test]
    fn test_parse_caps_bullets() {
        let bullets: Vec<String> = (0..10).map(|i| format!("\"{}{i}\"", "b".repeat(300))).collect();
        let response = format!(r#"{{"slides": [{{"title": "Many", "content": [{}]}}]}}"#, bullets.join(","));

        let outline = parse(&response).unwrap();
        assert_eq!(outline.slides[0].bullets.len(), 6);
        assert!(outline.slides[0].bullets.iter().all(|b| b.chars().count() <= 150));
    }

    #[test]
    fn test_parse_enforces_max_slides() {
        let slides: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"title": "S{i}", "content": ["x"]}}"#))
            .collect();
        let response = format!(r#"{{"slides": [{}]}}"#, slides.join(","));

        let outline =
            parse_outline(&response, SlideBounds::new(1, 5), &SegmentConfig::default()).unwrap();
        assert_eq!(outline.slides.len(), 5);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse("I could not do that."), Err(Error::MalformedResponse(_))));
        assert!(matches!(parse("{\"title\": \"x\""), Err(Error::MalformedResponse(_))));
        assert!(matches!(parse("{\"title\": \"no slides\"}"), Err(Error::MalformedResponse(_))));
        assert!(matches!(parse("{\"slides\": []}"), Err(Error::MalformedResponse(_))));
        assert!(matches!(parse("{\"slides\": [{\"title\": \"  \"}]}"), Err(Error::MalformedResponse(_))));
    }
}
