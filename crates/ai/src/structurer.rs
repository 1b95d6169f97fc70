//! AI-backed outline structuring with deterministic fallback.
//!
//! Providers are tried once each, in order. The first response that parses
//! into a usable outline wins; if none does, the text goes through the
//! deterministic [`Segmenter`], which never fails.

use crate::config::AiConfig;
use crate::provider::{CompletionRequest, Provider};
use crate::providers::providers_from_config;
use deck_core::segment::DEFAULT_SUBTITLE;
use deck_core::types::{cap_chars, MAX_TITLE_CHARS};
use deck_core::{parse_outline, DocumentOutline, SegmentConfig, Segmenter, SlideBounds};
use log::{debug, info, warn};

/// Longest input sent to a model, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You turn material into presentation outlines. \
Reply with a single JSON object and nothing else.";

/// Where an outline came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineOrigin {
    /// Produced by the named provider.
    Ai(String),
    /// Produced by the deterministic segmenter.
    Deterministic,
}

/// A finished outline and its origin.
#[derive(Debug, Clone)]
pub struct Structured {
    pub outline: DocumentOutline,
    pub origin: OutlineOrigin,
}

#[derive(Debug)]
pub struct OutlineStructurer {
    providers: Vec<Box<dyn Provider>>,
    segmenter: Segmenter,
    bounds: SlideBounds,
    max_input_chars: usize,
}

impl OutlineStructurer {
    pub fn new(providers: Vec<Box<dyn Provider>>, bounds: SlideBounds) -> Self {
        Self {
            providers,
            segmenter: Segmenter::default(),
            bounds,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    /// Build every configured provider from `config`.
    pub fn from_config(config: &AiConfig, bounds: SlideBounds) -> Self {
        Self::new(providers_from_config(config), bounds)
    }

    /// A structurer with no providers; always uses the segmenter.
    pub fn deterministic(bounds: SlideBounds) -> Self {
        Self::new(Vec::new(), bounds)
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn config(&self) -> &SegmentConfig {
        self.segmenter.config()
    }

    /// Structure free text into an outline.
    pub async fn structure(&self, text: &str) -> Structured {
        let input = cap_chars(text.trim(), self.max_input_chars);
        if input.is_empty() {
            return self.fallback(text);
        }

        let request = CompletionRequest::new(self.structuring_prompt(&input)).system(SYSTEM_PROMPT);
        match self.ask_providers(&request).await {
            Some(structured) => structured,
            None => self.fallback(text),
        }
    }

    /// Ask a model to write an outline about a bare topic.
    ///
    /// With no working provider the result carries only the topic as title.
    pub async fn structure_topic(&self, topic: &str) -> Structured {
        let topic = topic.trim();
        let request = CompletionRequest::new(self.topic_prompt(topic))
            .system(SYSTEM_PROMPT)
            .temperature(0.7);

        if let Some(structured) = self.ask_providers(&request).await {
            return structured;
        }

        warn!("No provider could write about '{topic}'; producing an empty outline");
        let title = if topic.is_empty() {
            deck_core::segment::DEFAULT_TITLE
        } else {
            topic
        };
        Structured {
            outline: DocumentOutline::new(cap_chars(title, MAX_TITLE_CHARS), DEFAULT_SUBTITLE),
            origin: OutlineOrigin::Deterministic,
        }
    }

    async fn ask_providers(&self, request: &CompletionRequest) -> Option<Structured> {
        for provider in &self.providers {
            let name = provider.name();
            debug!("Requesting outline from {name}");

            let response = match provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("{name} failed: {e}");
                    continue;
                }
            };

            match parse_outline(&response, self.bounds, self.config()) {
                Ok(outline) => {
                    info!(
                        "{name} produced {} slides with {} bullets",
                        outline.content_slides().count(),
                        outline.bullet_count()
                    );
                    return Some(Structured {
                        outline,
                        origin: OutlineOrigin::Ai(name.to_string()),
                    });
                }
                Err(e) => warn!("{name} returned an unusable outline: {e}"),
            }
        }
        None
    }

    fn fallback(&self, text: &str) -> Structured {
        if !self.providers.is_empty() {
            info!("Falling back to deterministic segmentation");
        }
        Structured {
            outline: self.segmenter.segment(text, self.bounds),
            origin: OutlineOrigin::Deterministic,
        }
    }

    fn format_instructions(&self) -> String {
        let config = self.config();
        format!(
            "Use between {} and {} slides. Give each slide a short title and {} to {} \
             bullet points of at most {} characters each.\n\
             Respond with JSON only, in this form:\n\
             {{\"title\": \"...\", \"subtitle\": \"...\", \
             \"slides\": [{{\"title\": \"...\", \"content\": [\"...\", \"...\"]}}]}}",
            self.bounds.min_slides,
            self.bounds.max_slides,
            config.min_bullets,
            config.max_bullets,
            config.max_bullet_chars,
        )
    }

    fn structuring_prompt(&self, text: &str) -> String {
        format!(
            "Organize the following content into a presentation with a title and subtitle. \
             Keep the author's wording where possible and do not invent facts.\n{}\n\n\
             Content:\n{}",
            self.format_instructions(),
            text
        )
    }

    fn topic_prompt(&self, topic: &str) -> String {
        format!(
            "Write a presentation about: {}\n{}",
            topic,
            self.format_instructions()
        )
    }
}
