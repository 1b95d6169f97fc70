//! Content segmentation: unstructured text to a bounded slide outline.
//!
//! The engine is a small state machine. Lines are classified as headings or
//! body text, body text is cut into bullets, and bullets are flushed into
//! slide records when a heading arrives, when a section grows past the
//! emit threshold, or when input runs out.

use crate::normalize::TextNormalizer;
use crate::types::{cap_chars, DocumentOutline, SlideBounds, SlideRecord, MAX_TITLE_CHARS};
use log::{debug, warn};

/// Title used when the input has no lines at all.
pub const DEFAULT_TITLE: &str = "Untitled Presentation";

/// Subtitle used when the second line is missing or too long.
pub const DEFAULT_SUBTITLE: &str = "An overview";

/// What to do with a section that ends up with fewer than `min_bullets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortSlidePolicy {
    /// Append "Important aspect of <title>" filler bullets up to the minimum.
    #[default]
    Pad,
    /// Keep a short final slide as-is. A short section closed by a heading is
    /// merged into the previous slide when it fits, and padded otherwise.
    Relax,
}

/// Thresholds that drive segmentation. All lengths are in characters.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// A line with a colon is a heading only if shorter than this.
    pub heading_max_chars: usize,
    /// Text after a heading's colon becomes a bullet if longer than this.
    pub heading_lead_min_chars: usize,
    /// Body lines shorter than this are dropped as noise.
    pub noise_min_chars: usize,
    /// Body lines longer than this are split into sentences.
    pub long_line_chars: usize,
    /// Sentence fragments must be longer than this to become bullets.
    pub fragment_min_chars: usize,
    /// Hard cap on a single bullet.
    pub max_bullet_chars: usize,
    /// Fewest bullets on a content slide.
    pub min_bullets: usize,
    /// A section holding this many bullets is flushed without waiting for a heading.
    pub emit_threshold: usize,
    /// Most bullets on a content slide.
    pub max_bullets: usize,
    /// Handling of sections below `min_bullets`.
    pub short_slide_policy: ShortSlidePolicy,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            heading_max_chars: 100,
            heading_lead_min_chars: 15,
            noise_min_chars: 15,
            long_line_chars: 200,
            fragment_min_chars: 20,
            max_bullet_chars: 150,
            min_bullets: 4,
            emit_threshold: 5,
            max_bullets: 6,
            short_slide_policy: ShortSlidePolicy::default(),
        }
    }
}

impl SegmentConfig {
    /// Create a config with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bullet range for content slides. The emit threshold is kept
    /// inside the new range.
    pub fn with_bullet_range(mut self, min: usize, max: usize) -> Self {
        self.min_bullets = min.max(1);
        self.max_bullets = max.max(self.min_bullets);
        self.emit_threshold = self
            .emit_threshold
            .clamp(self.min_bullets, self.max_bullets);
        self
    }

    /// Set the per-bullet character cap.
    pub fn with_max_bullet_chars(mut self, chars: usize) -> Self {
        self.max_bullet_chars = chars.max(1);
        self
    }

    /// Set the short-slide policy.
    pub fn with_short_slide_policy(mut self, policy: ShortSlidePolicy) -> Self {
        self.short_slide_policy = policy;
        self
    }
}

/// Classification of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Section title, with optional lead text that opens the section.
    Heading { title: String, lead: Option<String> },
    /// Content to be bulletized.
    Body(String),
}

/// Classify a trimmed, non-empty line as a heading or body text.
pub fn classify_line(line: &str, config: &SegmentConfig) -> LineClass {
    let line = line.trim();
    if line.chars().count() < config.heading_max_chars {
        if let Some((title, rest)) = line.split_once(':') {
            let rest = rest.trim();
            let lead = (rest.chars().count() > config.heading_lead_min_chars)
                .then(|| rest.to_string());
            return LineClass::Heading {
                title: title.trim().to_string(),
                lead,
            };
        }
    }
    LineClass::Body(line.to_string())
}

/// Cap a bullet at `max_chars`. Applying it twice changes nothing.
pub fn truncate_bullet(text: &str, max_chars: usize) -> String {
    cap_chars(text.trim(), max_chars)
}

/// Turn one body line into zero or more bullets.
///
/// Short lines are noise, long lines are split on ". ", everything else is
/// a single capped bullet.
pub fn split_into_bullets(line: &str, config: &SegmentConfig) -> Vec<String> {
    let line = line.trim();
    let len = line.chars().count();

    if len < config.noise_min_chars {
        return Vec::new();
    }

    if len > config.long_line_chars {
        return line
            .split(". ")
            .map(str::trim)
            .filter(|s| s.chars().count() > config.fragment_min_chars)
            .map(|s| truncate_bullet(s, config.max_bullet_chars))
            .collect();
    }

    vec![truncate_bullet(line, config.max_bullet_chars)]
}

/// Title and subtitle pulled from the head of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleExtraction {
    pub title: String,
    pub subtitle: String,
    /// Number of leading lines consumed; body processing starts after them.
    pub consumed: usize,
}

/// Extract the document title and subtitle from the first two lines.
///
/// With two or more lines both are consumed even if the second is too long
/// to be a subtitle. With a single line nothing is consumed, so that line is
/// also processed as body text.
pub fn extract_title(lines: &[String]) -> TitleExtraction {
    let title = lines
        .first()
        .map(|l| cap_chars(l, MAX_TITLE_CHARS))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let subtitle = lines
        .get(1)
        .filter(|l| l.chars().count() < MAX_TITLE_CHARS)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string());

    let consumed = if lines.len() >= 2 { 2 } else { 0 };

    TitleExtraction {
        title,
        subtitle,
        consumed,
    }
}

/// Why the accumulator is about to flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitReason {
    /// A heading arrived while bullets were pending.
    NewHeading,
    /// The section reached the emit threshold.
    Threshold,
    /// Input is exhausted.
    EndOfInput,
}

/// State of the segmentation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Gathering bullets for the current section.
    Collecting,
    /// Pending bullets must be flushed before anything else happens.
    ReadyToEmit(EmitReason),
}

/// Incremental bullet accumulator and slide emitter.
///
/// Feed lines with [`push_line`](Self::push_line), then call
/// [`finish`](Self::finish) to flush the trailing section.
#[derive(Debug)]
pub struct SlideAccumulator<'a> {
    config: &'a SegmentConfig,
    current_title: Option<String>,
    bullets: Vec<String>,
    slides: Vec<SlideRecord>,
}

impl<'a> SlideAccumulator<'a> {
    /// Create an empty accumulator.
    pub fn new(config: &'a SegmentConfig) -> Self {
        Self {
            config,
            current_title: None,
            bullets: Vec::new(),
            slides: Vec::new(),
        }
    }

    /// Bullets pending for the current section.
    pub fn pending(&self) -> &[String] {
        &self.bullets
    }

    /// Slides emitted so far.
    pub fn slides(&self) -> &[SlideRecord] {
        &self.slides
    }

    /// Title of the section currently being collected.
    pub fn current_title(&self) -> Option<&str> {
        self.current_title.as_deref()
    }

    /// Current state, as seen after the last line was applied.
    pub fn state(&self) -> SegmenterState {
        if self.bullets.len() >= self.config.emit_threshold {
            SegmenterState::ReadyToEmit(EmitReason::Threshold)
        } else {
            SegmenterState::Collecting
        }
    }

    /// Transition taken when a line of the given class arrives.
    fn transition(&self, class: &LineClass) -> SegmenterState {
        match class {
            LineClass::Heading { .. } if !self.bullets.is_empty() => {
                SegmenterState::ReadyToEmit(EmitReason::NewHeading)
            }
            _ => SegmenterState::Collecting,
        }
    }

    /// Classify and apply one line, emitting slides as triggers fire.
    pub fn push_line(&mut self, line: &str) {
        let class = classify_line(line, self.config);

        if let SegmenterState::ReadyToEmit(reason) = self.transition(&class) {
            self.emit(reason);
        }

        match class {
            LineClass::Heading { title, lead } => {
                self.current_title = (!title.is_empty()).then_some(title);
                if let Some(lead) = lead {
                    self.bullets
                        .push(truncate_bullet(&lead, self.config.max_bullet_chars));
                }
            }
            LineClass::Body(text) => {
                self.bullets.extend(split_into_bullets(&text, self.config));
            }
        }

        while let SegmenterState::ReadyToEmit(reason) = self.state() {
            self.emit(reason);
        }
    }

    /// Flush the trailing section and return all slides.
    pub fn finish(mut self) -> Vec<SlideRecord> {
        if !self.bullets.is_empty() {
            self.emit(EmitReason::EndOfInput);
        }
        self.slides
    }

    fn slide_title(&self) -> String {
        self.current_title
            .clone()
            .unwrap_or_else(|| format!("Slide {}", self.slides.len() + 1))
    }

    fn emit(&mut self, reason: EmitReason) {
        let max = self.config.max_bullets;

        if reason == EmitReason::Threshold {
            let take = self.bullets.len().min(max);
            let bullets: Vec<String> = self.bullets.drain(..take).collect();
            let title = self.slide_title();
            debug!("Emitting '{}' with {} bullets (threshold)", title, bullets.len());
            self.slides.push(SlideRecord::content(title, bullets));
            return;
        }

        // Heading or end of input: the whole section goes out.
        let pending = std::mem::take(&mut self.bullets);
        let mut chunks: Vec<Vec<String>> = pending.chunks(max).map(<[String]>::to_vec).collect();
        let Some(last) = chunks.pop() else {
            return;
        };

        for chunk in chunks {
            let title = self.slide_title();
            self.slides.push(SlideRecord::content(title, chunk));
        }

        if last.len() >= self.config.min_bullets {
            let title = self.slide_title();
            debug!("Emitting '{}' with {} bullets", title, last.len());
            self.slides.push(SlideRecord::content(title, last));
        } else {
            self.emit_short(last, reason);
        }
    }

    fn emit_short(&mut self, mut bullets: Vec<String>, reason: EmitReason) {
        let title = self.slide_title();

        if self.config.short_slide_policy == ShortSlidePolicy::Relax {
            if reason == EmitReason::EndOfInput {
                warn!(
                    "Final slide '{}' has {} bullets (minimum {})",
                    title,
                    bullets.len(),
                    self.config.min_bullets
                );
                self.slides.push(SlideRecord::content(title, bullets));
                return;
            }

            if let Some(previous) = self.slides.last_mut() {
                if previous.bullets.len() + bullets.len() <= self.config.max_bullets {
                    debug!(
                        "Merging {} bullets of '{}' into '{}'",
                        bullets.len(),
                        title,
                        previous.title
                    );
                    previous.bullets.append(&mut bullets);
                    return;
                }
            }
        }

        while bullets.len() < self.config.min_bullets {
            bullets.push(truncate_bullet(
                &format!("Important aspect of {title}"),
                self.config.max_bullet_chars,
            ));
        }
        debug!("Emitting padded slide '{}'", title);
        self.slides.push(SlideRecord::content(title, bullets));
    }
}

/// Segmentation driver: raw text in, complete outline out.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentConfig,
    normalizer: TextNormalizer,
}

impl Segmenter {
    /// Create a segmenter with the given thresholds.
    pub fn new(config: SegmentConfig) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(),
        }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Segment text into an outline. Never fails.
    ///
    /// Slides beyond `bounds.max_slides` are dropped from the end. Falling
    /// short of `bounds.min_slides` is only logged; the engine does not
    /// invent sections.
    pub fn segment(&self, text: &str, bounds: SlideBounds) -> DocumentOutline {
        let lines = self.normalizer.normalize_to_lines(text);
        let head = extract_title(&lines);

        let mut accumulator = SlideAccumulator::new(&self.config);
        for line in &lines[head.consumed..] {
            accumulator.push_line(line);
        }

        let mut outline = DocumentOutline::new(head.title, head.subtitle);
        outline.slides = accumulator.finish();

        let dropped = outline.truncate_slides(bounds.max_slides);
        if dropped > 0 {
            warn!(
                "Dropped {} trailing slides to respect max_slides = {}",
                dropped, bounds.max_slides
            );
        }
        if outline.slides.len() < bounds.min_slides {
            debug!(
                "Input yielded {} slides, below min_slides = {}",
                outline.slides.len(),
                bounds.min_slides
            );
        }

        outline
    }
}

/// Segment text with default thresholds and bounds.
pub fn segment(text: &str) -> DocumentOutline {
    Segmenter::default().segment(text, SlideBounds::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideKind;

    const BODY: &str = "more body text that is long enough";

    fn topic_input(lead: bool) -> String {
        let mut text = String::from("Four Topics\nA short tour of unrelated subjects\n");
        for n in 1..=4 {
            if lead {
                text.push_str(&format!("Topic {n}: An overview of subject number {n}\n"));
            } else {
                text.push_str(&format!("Topic {n}:\n"));
            }
            for s in 1..=4 {
                text.push_str(&format!(
                    "Supporting sentence {s} explains part of topic {n} in detail.\n"
                ));
            }
        }
        text
    }

    #[test]
    fn test_classify_heading_with_lead() {
        let config = SegmentConfig::default();
        let class = classify_line("Intro: long enough content here", &config);
        assert_eq!(
            class,
            LineClass::Heading {
                title: "Intro".to_string(),
                lead: Some("long enough content here".to_string()),
            }
        );
    }

    #[test]
    fn test_classify_heading_short_lead_dropped() {
        let config = SegmentConfig::default();
        // "brief intro" is 11 characters, not a bullet
        assert_eq!(
            classify_line("Intro: brief intro", &config),
            LineClass::Heading {
                title: "Intro".to_string(),
                lead: None,
            }
        );
        // exactly 15 characters is still not enough
        assert_eq!(
            classify_line("Intro: fifteen chars!!", &config),
            LineClass::Heading {
                title: "Intro".to_string(),
                lead: None,
            }
        );
    }

    #[test]
    fn test_classify_long_colon_line_is_body() {
        let config = SegmentConfig::default();
        let line = format!("Note: {}", "x".repeat(100));
        assert!(matches!(classify_line(&line, &config), LineClass::Body(_)));
    }

    #[test]
    fn test_classify_plain_line_is_body() {
        let config = SegmentConfig::default();
        assert_eq!(
            classify_line("no colon on this line", &config),
            LineClass::Body("no colon on this line".to_string())
        );
    }

    #[test]
    fn test_split_drops_noise() {
        let config = SegmentConfig::default();
        assert!(split_into_bullets("Figure 3", &config).is_empty());
        assert!(split_into_bullets("fourteen chars", &config).is_empty());
        assert_eq!(split_into_bullets("fifteen chars!!", &config).len(), 1);
    }

    #[test]
    fn test_split_long_line_into_sentences() {
        let config = SegmentConfig::default();
        let line = format!(
            "{}. Short one. {}. {}",
            "The first sentence is comfortably longer than twenty characters",
            "The second sentence also passes the fragment length filter easily",
            "The third sentence closes out a paragraph that exceeds two hundred characters"
        );
        assert!(line.chars().count() > 200);

        let bullets = split_into_bullets(&line, &config);
        assert_eq!(bullets.len(), 3);
        assert!(bullets[0].starts_with("The first sentence"));
        assert!(bullets[1].starts_with("The second sentence"));
        assert!(bullets.iter().all(|b| !b.contains("Short one")));
    }

    #[test]
    fn test_split_caps_single_bullet() {
        let config = SegmentConfig::default();
        let line = "y".repeat(180);
        let bullets = split_into_bullets(&line, &config);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].chars().count(), 150);
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let config = SegmentConfig::default();
        let long = "word ".repeat(60);
        let once = truncate_bullet(&long, config.max_bullet_chars);
        let twice = truncate_bullet(&once, config.max_bullet_chars);
        assert_eq!(once, twice);
        assert!(once.chars().count() <= 150);

        let compliant = "Already a compliant bullet.";
        assert_eq!(truncate_bullet(compliant, 150), compliant);
        assert_eq!(split_into_bullets(compliant, &config), vec![compliant]);
    }

    #[test]
    fn test_extract_title_and_subtitle() {
        let subtitle = "A forty character subtitle for the deck!";
        assert_eq!(subtitle.chars().count(), 40);
        let lines = vec!["My Topic".to_string(), subtitle.to_string(), "body".to_string()];

        let head = extract_title(&lines);
        assert_eq!(head.title, "My Topic");
        assert_eq!(head.subtitle, subtitle);
        assert_eq!(head.consumed, 2);
    }

    #[test]
    fn test_extract_title_long_second_line_still_consumed() {
        let lines = vec!["Title".to_string(), "z".repeat(120)];
        let head = extract_title(&lines);
        assert_eq!(head.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(head.consumed, 2);
    }

    #[test]
    fn test_extract_title_single_line_not_consumed() {
        let lines = vec!["Only line".to_string()];
        let head = extract_title(&lines);
        assert_eq!(head.title, "Only line");
        assert_eq!(head.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(head.consumed, 0);
    }

    #[test]
    fn test_extract_title_empty() {
        let head = extract_title(&[]);
        assert_eq!(head.title, DEFAULT_TITLE);
        assert_eq!(head.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(head.consumed, 0);
    }

    #[test]
    fn test_heading_triggered_split() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);

        acc.push_line("Intro: long enough content here");
        for _ in 0..3 {
            acc.push_line(BODY);
        }
        assert_eq!(acc.pending().len(), 4);
        assert!(acc.slides().is_empty());
        assert_eq!(acc.state(), SegmenterState::Collecting);

        acc.push_line("Section2: next section content line one that qualifies");
        assert_eq!(acc.slides().len(), 1);
        assert_eq!(acc.slides()[0].title, "Intro");
        assert_eq!(acc.slides()[0].bullets.len(), 4);
        assert_eq!(acc.current_title(), Some("Section2"));
        assert_eq!(acc.pending(), ["next section content line one that qualifies"]);

        let slides = acc.finish();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "Section2");
    }

    #[test]
    fn test_threshold_emits_within_section() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);

        acc.push_line("Growth:");
        for _ in 0..4 {
            acc.push_line(BODY);
        }
        assert_eq!(acc.state(), SegmenterState::Collecting);
        acc.push_line(BODY);
        // the fifth bullet flushes immediately
        assert_eq!(acc.slides().len(), 1);
        assert_eq!(acc.slides()[0].bullets.len(), 5);
        assert!(acc.pending().is_empty());

        // overflow stays under the same heading
        for _ in 0..5 {
            acc.push_line(BODY);
        }
        let slides = acc.finish();
        assert_eq!(slides.len(), 2);
        assert!(slides.iter().all(|s| s.title == "Growth"));
    }

    #[test]
    fn test_threshold_caps_at_max_bullets() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);

        // one long line splitting into eight sentences
        let sentence = "This sentence is long enough to become a bullet";
        let line = vec![sentence; 8].join(". ");
        acc.push_line(&line);

        assert_eq!(acc.slides().len(), 1);
        assert_eq!(acc.slides()[0].bullets.len(), 6);
        assert_eq!(acc.pending().len(), 2);
    }

    #[test]
    fn test_untitled_sections_numbered() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);
        for _ in 0..5 {
            acc.push_line(BODY);
        }
        let slides = acc.finish();
        assert_eq!(slides[0].title, "Slide 1");
    }

    #[test]
    fn test_pad_policy_fills_final_slide() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);
        acc.push_line("Wrap up: the final remarks of the talk");
        let slides = acc.finish();

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].bullets.len(), 4);
        assert_eq!(slides[0].bullets[0], "the final remarks of the talk");
        assert_eq!(slides[0].bullets[3], "Important aspect of Wrap up");
    }

    #[test]
    fn test_custom_bullet_range_and_length() {
        let config = SegmentConfig::new()
            .with_bullet_range(2, 3)
            .with_max_bullet_chars(20);
        assert_eq!(config.emit_threshold, 3);

        let mut acc = SlideAccumulator::new(&config);
        acc.push_line("Wrap up: the final remarks of the talk");
        let slides = acc.finish();

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].bullets.len(), 2);
        assert!(slides[0].bullets.iter().all(|b| b.chars().count() <= 20));

        let clamped = SegmentConfig::new().with_bullet_range(0, 0);
        assert_eq!((clamped.min_bullets, clamped.max_bullets, clamped.emit_threshold), (1, 1, 1));
    }

    #[test]
    fn test_pad_policy_pads_short_mid_section() {
        let config = SegmentConfig::default();
        let mut acc = SlideAccumulator::new(&config);

        acc.push_line("First:");
        for _ in 0..4 {
            acc.push_line(BODY);
        }
        acc.push_line("Second:");
        acc.push_line("a short second section line");
        acc.push_line("Third:");

        let slides = acc.slides();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "First");
        assert_eq!(slides[0].bullets.len(), 4);
        assert_eq!(slides[1].title, "Second");
        assert_eq!(slides[1].bullets.len(), 4);
        assert_eq!(slides[1].bullets[0], "a short second section line");
        assert_eq!(slides[1].bullets[1], "Important aspect of Second");
    }

    #[test]
    fn test_relax_policy_keeps_short_final_slide() {
        let config = SegmentConfig::default().with_short_slide_policy(ShortSlidePolicy::Relax);
        let mut acc = SlideAccumulator::new(&config);
        acc.push_line("Wrap up: the final remarks of the talk");
        let slides = acc.finish();

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].bullets, vec!["the final remarks of the talk"]);
    }

    #[test]
    fn test_relax_policy_merges_short_section_into_previous() {
        let config = SegmentConfig::default().with_short_slide_policy(ShortSlidePolicy::Relax);
        let mut acc = SlideAccumulator::new(&config);

        acc.push_line("First:");
        for _ in 0..4 {
            acc.push_line(BODY);
        }
        acc.push_line("Second:");
        acc.push_line("a short second section line");
        acc.push_line("Third:");

        assert_eq!(acc.slides().len(), 1);
        assert_eq!(acc.slides()[0].title, "First");
        assert_eq!(acc.slides()[0].bullets.len(), 5);
    }

    #[test]
    fn test_relax_policy_pads_when_merge_does_not_fit() {
        let config = SegmentConfig::default().with_short_slide_policy(ShortSlidePolicy::Relax);
        let mut acc = SlideAccumulator::new(&config);

        acc.push_line("First:");
        for _ in 0..5 {
            acc.push_line(BODY);
        }
        acc.push_line("Second:");
        acc.push_line("a short second section line");
        acc.push_line("another short second section line");
        acc.push_line("Third:");

        assert_eq!(acc.slides().len(), 2);
        assert_eq!(acc.slides()[1].title, "Second");
        assert_eq!(acc.slides()[1].bullets.len(), 4);
    }

    #[test]
    fn test_empty_input() {
        let outline = segment("");
        assert_eq!(outline.title, DEFAULT_TITLE);
        assert_eq!(outline.subtitle, DEFAULT_SUBTITLE);
        assert!(outline.slides.is_empty());
    }

    #[test]
    fn test_garbage_input_never_panics() {
        let garbage: String = (0u8..=255).map(char::from).collect::<String>().repeat(20);
        let outline = segment(&garbage);
        assert!(!outline.title.is_empty());

        let outline = segment(":\n:\n:::\n\u{0}\u{1}\n: : :");
        assert!(outline.slides.iter().all(|s| s.bullets.len() <= 6));
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let text = topic_input(true);
        let segmenter = Segmenter::default();
        let bounds = SlideBounds::default();
        assert_eq!(segmenter.segment(&text, bounds), segmenter.segment(&text, bounds));
    }

    #[test]
    fn test_four_topics_end_to_end() {
        for lead in [true, false] {
            let outline = segment(&topic_input(lead));
            assert_eq!(outline.title, "Four Topics");
            assert_eq!(outline.subtitle, "A short tour of unrelated subjects");
            assert_eq!(outline.slides.len(), 4);

            for (i, slide) in outline.slides.iter().enumerate() {
                let n = i + 1;
                assert_eq!(slide.kind, SlideKind::Content);
                assert_eq!(slide.title, format!("Topic {n}"));
                assert!((4..=6).contains(&slide.bullets.len()));
                assert!(slide
                    .bullets
                    .iter()
                    .any(|b| b.contains(&format!("part of topic {n}"))));
            }
        }
    }

    #[test]
    fn test_bullet_bounds_and_length_cap() {
        let mut text = String::from("Deck\nSubtitle\n");
        for n in 0..7 {
            text.push_str(&format!("Section {n}:\n"));
            for i in 0..(n + 2) {
                text.push_str(&format!("Line {i} of section {n} {}\n", "pad ".repeat(i * 15)));
            }
        }
        let outline = Segmenter::default().segment(&text, SlideBounds::new(1, 100));
        let count = outline.slides.len();
        for (i, slide) in outline.slides.iter().enumerate() {
            if i + 1 < count {
                assert!((4..=6).contains(&slide.bullets.len()), "slide {i}: {:?}", slide);
            }
            assert!(slide.bullets.iter().all(|b| b.chars().count() <= 150));
        }
    }

    #[test]
    fn test_max_slides_truncates() {
        let mut text = String::from("Deck\nSubtitle\n");
        for _ in 0..30 {
            text.push_str(BODY);
            text.push('\n');
        }
        let outline = Segmenter::default().segment(&text, SlideBounds::new(1, 3));
        assert_eq!(outline.slides.len(), 3);
    }

    #[test]
    fn test_driver_with_title_lines_and_heading_split() {
        let text = format!(
            "Deck Title\nDeck subtitle\nIntro: long enough content here\n{BODY}\n{BODY}\n{BODY}\nSection2: next section content line one that qualifies"
        );
        let outline = segment(&text);
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.slides[0].title, "Intro");
        assert_eq!(outline.slides[1].title, "Section2");
    }
}
