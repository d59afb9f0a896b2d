//! OCR of scanned pages through an external tesseract executable.

#[cfg(feature = "native")]
mod tesseract;

#[cfg(feature = "native")]
pub use tesseract::TesseractOcr;

use image::DynamicImage;

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Trait for page-level text recognition.
///
/// Implementations receive a rendered page and return its text; they are the
/// fallback for pages that carry no extractable text layer.
pub trait PageOcr {
    /// Recognize the text in a page image.
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}
