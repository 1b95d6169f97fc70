//! Stock-photo lookup for content slides.
//!
//! An image is a nice-to-have: every failure here is logged and the slide is
//! kept without one.

use crate::config::ImageSettings;
use crate::error::Result;
use crate::providers::{check_status, http_client};
use async_trait::async_trait;
use deck_core::{DocumentOutline, SlideKind, SlideRecord};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum number of keywords in a search query.
const MAX_QUERY_WORDS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "into", "is",
    "it", "its", "of", "on", "or", "our", "the", "their", "this", "to", "vs", "what", "when",
    "why", "with", "your", "overview", "introduction", "summary", "conclusion", "slide",
];

/// A service that finds and downloads one image for a query.
#[async_trait]
pub trait ImageSource: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Image bytes for the best match, or `None` when nothing matched.
    async fn fetch(&self, query: &str) -> Result<Option<Vec<u8>>>;
}

/// Build every image source that has a key configured.
pub fn sources_from_config(settings: &ImageSettings) -> Vec<Box<dyn ImageSource>> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();

    if let Some(key) = &settings.pexels_key {
        match PexelsSource::new(key, timeout) {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => warn!("Skipping Pexels: {e}"),
        }
    }
    if let Some(key) = &settings.unsplash_key {
        match UnsplashSource::new(key, timeout) {
            Ok(source) => sources.push(Box::new(source)),
            Err(e) => warn!("Skipping Unsplash: {e}"),
        }
    }
    sources
}

async fn download(client: &Client, url: &str, service: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let response = check_status(response, service).await?;
    Ok(response.bytes().await?.to_vec())
}

#[derive(Debug)]
pub struct PexelsSource {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    large: String,
}

impl PexelsSource {
    const SEARCH_URL: &'static str = "https://api.pexels.com/v1/search";

    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ImageSource for PexelsSource {
    fn name(&self) -> &str {
        "Pexels"
    }

    async fn fetch(&self, query: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(Self::SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")])
            .send()
            .await?;
        let response = check_status(response, self.name()).await?;
        let found: PexelsResponse = response.json().await?;

        match found.photos.into_iter().next() {
            Some(photo) => Ok(Some(download(&self.client, &photo.src.large, self.name()).await?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct UnsplashSource {
    client: Client,
    access_key: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    regular: String,
}

impl UnsplashSource {
    const SEARCH_URL: &'static str = "https://api.unsplash.com/search/photos";

    pub fn new(access_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            access_key: access_key.into(),
        })
    }
}

#[async_trait]
impl ImageSource for UnsplashSource {
    fn name(&self) -> &str {
        "Unsplash"
    }

    async fn fetch(&self, query: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(Self::SEARCH_URL)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")])
            .send()
            .await?;
        let response = check_status(response, self.name()).await?;
        let found: UnsplashResponse = response.json().await?;

        match found.results.into_iter().next() {
            Some(photo) => Ok(Some(download(&self.client, &photo.urls.regular, self.name()).await?)),
            None => Ok(None),
        }
    }
}

fn keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|w| w.trim_matches('-').to_lowercase())
        .filter(|w| w.chars().count() >= 3)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Search keywords for a slide: its title words, or the whole slide text when
/// the title has none. `None` when neither yields a keyword.
pub fn image_query(slide: &SlideRecord) -> Option<String> {
    let mut words = keywords(&slide.title);
    if words.is_empty() {
        words = keywords(&slide.text());
    }

    let mut unique: Vec<String> = Vec::new();
    for word in words {
        if !unique.contains(&word) {
            unique.push(word);
        }
        if unique.len() == MAX_QUERY_WORDS {
            break;
        }
    }

    (!unique.is_empty()).then(|| unique.join(" "))
}

/// File extension from magic bytes; JPEG when unknown.
fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "png"
    } else if bytes.starts_with(b"GIF8") {
        "gif"
    } else {
        "jpg"
    }
}

async fn fetch_first(sources: &[Box<dyn ImageSource>], query: &str) -> Option<Vec<u8>> {
    for source in sources {
        match source.fetch(query).await {
            Ok(Some(bytes)) if !bytes.is_empty() => return Some(bytes),
            Ok(_) => debug!("{} had no image for '{query}'", source.name()),
            Err(e) => warn!("{} image lookup for '{query}' failed: {e}", source.name()),
        }
    }
    None
}

/// Download an image for one content slide, returning where it was written.
async fn fetch_for_slide(
    slide: &SlideRecord,
    index: usize,
    sources: &[Box<dyn ImageSource>],
    dir: &Path,
) -> Option<PathBuf> {
    if slide.kind != SlideKind::Content || slide.image.is_some() {
        return None;
    }
    let query = image_query(slide)?;
    let bytes = fetch_first(sources, &query).await?;

    let path = dir.join(format!("slide-{}.{}", index + 1, image_extension(&bytes)));
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => Some(path),
        Err(e) => {
            warn!("Cannot write {}: {e}", path.display());
            None
        }
    }
}

/// Fetch an image for every content slide into `dir`, setting
/// [`SlideRecord::image`] on success. Never fails: slides without an image
/// are returned unchanged.
pub async fn attach_images(
    mut outline: DocumentOutline,
    sources: &[Box<dyn ImageSource>],
    dir: &Path,
) -> DocumentOutline {
    if sources.is_empty() {
        return outline;
    }
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("Cannot create image directory {}: {e}", dir.display());
        return outline;
    }

    let mut attached = 0;
    let slides = std::mem::take(&mut outline.slides);
    for (index, slide) in slides.into_iter().enumerate() {
        let slide = match fetch_for_slide(&slide, index, sources, dir).await {
            Some(path) => {
                attached += 1;
                slide.with_image(path)
            }
            None => slide,
        };
        outline.add_slide(slide);
    }

    info!("Attached {attached} images");
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedSource {
        bytes: Option<Vec<u8>>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn returning(bytes: Option<Vec<u8>>) -> Self {
            Self {
                bytes,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                bytes: None,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self, _query: &str) -> Result<Option<Vec<u8>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::ConnectionError("offline".to_string()));
            }
            Ok(self.bytes.clone())
        }
    }

    fn slide(title: &str, bullets: &[&str]) -> SlideRecord {
        SlideRecord::content(title, bullets.iter().map(|b| b.to_string()).collect())
    }

    #[test]
    fn test_image_query_uses_title_keywords() {
        let s = slide("The Future of Renewable Energy in 2030", &[]);
        assert_eq!(image_query(&s).as_deref(), Some("future renewable energy"));
    }

    #[test]
    fn test_image_query_falls_back_to_slide_text() {
        let s = slide("Slide 3", &["Solar panels on rooftops", "Wind turbines offshore"]);
        assert_eq!(image_query(&s).as_deref(), Some("solar panels rooftops wind"));

        let later = slide("Slide 4", &["", "Electric buses in cities"]);
        assert_eq!(image_query(&later).as_deref(), Some("electric buses cities"));

        let empty = slide("Intro", &[]);
        assert_eq!(image_query(&empty).as_deref(), Some("intro"));

        let none = slide("Of the", &[]);
        assert_eq!(image_query(&none), None);
    }

    #[test]
    fn test_image_query_caps_and_dedupes() {
        let s = slide("Cloud cloud storage networks compute security billing", &[]);
        assert_eq!(image_query(&s).as_deref(), Some("cloud storage networks compute"));
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(&[0x89, b'P', b'N', b'G', 0x0D]), "png");
        assert_eq!(image_extension(b"GIF89a"), "gif");
        assert_eq!(image_extension(&[0xFF, 0xD8, 0xFF]), "jpg");
    }

    #[test]
    fn test_sources_from_config() {
        let mut settings = ImageSettings::default();
        assert!(sources_from_config(&settings).is_empty());

        settings.unsplash_key = Some("u".to_string());
        let sources = sources_from_config(&settings);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), "Unsplash");
    }

    #[tokio::test]
    async fn test_attach_images_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut outline = DocumentOutline::new("Deck", "Sub");
        outline.add_slide(slide("Solar Power", &["a", "b", "c", "d"]));
        outline.add_slide(SlideRecord::section_divider("Part Two"));
        outline.add_slide(slide("Wind Farms", &["a", "b", "c", "d"]));

        let sources: Vec<Box<dyn ImageSource>> = vec![
            Box::new(FixedSource::failing()),
            Box::new(FixedSource::returning(Some(vec![0x89, b'P', b'N', b'G']))),
        ];
        let outline = attach_images(outline, &sources, dir.path()).await;

        let first = outline.slides[0].image.as_ref().unwrap();
        assert_eq!(first, &dir.path().join("slide-1.png"));
        assert!(first.exists());
        assert!(outline.slides[1].image.is_none());
        assert_eq!(outline.slides[2].image, Some(dir.path().join("slide-3.png")));
    }

    #[tokio::test]
    async fn test_attach_images_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut outline = DocumentOutline::new("Deck", "Sub");
        outline.add_slide(slide("Solar Power", &["a", "b", "c", "d"]));

        let sources: Vec<Box<dyn ImageSource>> = vec![
            Box::new(FixedSource::failing()),
            Box::new(FixedSource::returning(None)),
        ];
        let result = attach_images(outline.clone(), &sources, dir.path()).await;
        assert_eq!(result, outline);
    }
}
