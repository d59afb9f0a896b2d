//! Core library for invoice extraction from document text.
//!
//! This crate provides:
//! - Whitespace normalization of extracted text
//! - Invoice identifier and multi-currency amount matching
//! - Positional alignment of identifiers and amounts with a grand total row
//! - Regional (1.234,56) number parsing and formatting
//! - Export to XLSX, CSV and JSON
//! - PDF page text collection with OCR fallback for scanned pages

pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod preview;
pub mod text;

pub use error::{ExportError, FacturasError, OcrError, PdfError, Result};
pub use export::{export, ExportFormat};
pub use invoice::rules::{format_regional_amount, parse_regional_amount};
pub use invoice::{extract, ExtractionResult, InvoiceParser, RecordExtractor};
pub use models::config::FacturasConfig;
pub use models::table::{ResultTable, Row, MISSING_IDENTIFIER, TOTAL_LABEL};
pub use ocr::PageOcr;
#[cfg(feature = "native")]
pub use ocr::TesseractOcr;
pub use pdf::{collect_text, DocumentText, PdfExtractor, PdfProcessor, PdfType};
pub use preview::PreviewTable;
pub use text::normalize;
