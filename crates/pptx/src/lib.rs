//! Office Open XML backend: renders outlines to .pptx and extracts text from
//! uploaded .docx/.pptx documents.
//!
//! Both formats are ZIP archives containing XML documents.

pub mod reader;
pub mod theme;
pub mod writer;
mod xml;

pub use reader::{DocumentFormat, DocumentReader};
pub use theme::Theme;
pub use writer::PptxWriter;
