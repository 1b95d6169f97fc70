//! AI collaborators for deck generation: LLM providers that structure text
//! into outlines, with the deterministic segmenter as fallback, and stock
//! image services for content slides.

pub mod config;
pub mod error;
pub mod images;
pub mod provider;
pub mod providers;
pub mod structurer;

pub use config::{AiConfig, ImageSettings, ProviderKind, ProviderSettings};
pub use error::{ProviderError, Result};
pub use images::{attach_images, image_query, sources_from_config, ImageSource};
pub use provider::{CompletionRequest, Provider};
pub use structurer::{OutlineOrigin, OutlineStructurer, Structured};
