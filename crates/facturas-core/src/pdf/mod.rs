//! PDF text source: page text with OCR fallback for scanned pages.

mod extractor;

pub use extractor::PdfExtractor;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::PdfError;
use crate::ocr::PageOcr;

/// Type of PDF content, judged from where the page texts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Every page had extractable text.
    Text,
    /// Every page needed OCR (scanned document).
    Image,
    /// Some pages had text, others needed OCR.
    Hybrid,
    /// No page yielded any text.
    Empty,
}

/// Where the text of one page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Text,
    Ocr,
    Empty,
}

/// Text of a whole document, page by page.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    /// Page texts, each preceded by a newline.
    pub text: String,
    /// Source of each page, in page order.
    pub pages: Vec<PageSource>,
    /// Problems met while collecting text.
    pub warnings: Vec<String>,
}

impl DocumentText {
    pub fn pdf_type(&self) -> PdfType {
        let text = self.pages.iter().filter(|p| **p == PageSource::Text).count();
        let ocr = self.pages.iter().filter(|p| **p == PageSource::Ocr).count();

        match (text > 0, ocr > 0) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        }
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Render a page as an image for OCR.
    fn render_page(&self, page: u32) -> Result<DynamicImage>;

    /// Extract embedded images from a page.
    fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}

/// Concatenate the text of every page, running OCR on pages without text.
///
/// A page counts as blank when it has fewer than `min_page_text_length`
/// non-whitespace characters. Pages whose text or OCR fails contribute an
/// empty string and a warning; the rest of the document is still collected.
pub fn collect_text(
    pdf: &dyn PdfProcessor,
    ocr: Option<&dyn PageOcr>,
    min_page_text_length: usize,
) -> Result<DocumentText> {
    let page_count = pdf.page_count();
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }

    let mut document = DocumentText::default();

    for page in 1..=page_count {
        let page_text = match pdf.extract_page_text(page) {
            Ok(text) => text,
            Err(e) => {
                document
                    .warnings
                    .push(format!("Page {}: text extraction failed: {}", page, e));
                String::new()
            }
        };

        let visible = page_text.chars().filter(|c| !c.is_whitespace()).count();
        let (text, source) = if visible >= min_page_text_length.max(1) {
            (page_text, PageSource::Text)
        } else if let Some(ocr) = ocr {
            debug!("Page {} has no text layer, running OCR", page);
            match pdf
                .render_page(page)
                .map_err(|e| e.to_string())
                .and_then(|image| ocr.recognize(&image).map_err(|e| e.to_string()))
            {
                Ok(text) => (text, PageSource::Ocr),
                Err(e) => {
                    warn!("OCR failed for page {}: {}", page, e);
                    document
                        .warnings
                        .push(format!("Page {}: OCR failed: {}", page, e));
                    (String::new(), PageSource::Empty)
                }
            }
        } else {
            (String::new(), PageSource::Empty)
        };

        document.text.push('\n');
        document.text.push_str(&text);
        document.pages.push(source);
    }

    debug!(
        "Collected {} characters from {} pages ({:?})",
        document.text.len(),
        page_count,
        document.pdf_type()
    );

    Ok(document)
}
