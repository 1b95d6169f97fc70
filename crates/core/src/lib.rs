//! Core domain types, text normalization, and content segmentation for
//! turning free text into slide outlines.

pub mod error;
pub mod format;
pub mod ingest;
pub mod normalize;
pub mod segment;
pub mod types;

pub use error::{Error, Result};
pub use format::{OutlineFormatter, OutlineStyle};
pub use ingest::parse_outline;
pub use normalize::TextNormalizer;
pub use segment::{
    segment, LineClass, SegmentConfig, Segmenter, SegmenterState, ShortSlidePolicy,
    SlideAccumulator,
};
pub use types::{DocumentOutline, SlideBounds, SlideKind, SlideRecord};
