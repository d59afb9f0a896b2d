//! Error types for the facturas-core library.
//!
//! Extraction itself never fails: malformed amounts become zero and missing
//! identifiers become a sentinel. The errors below belong to the collaborators
//! around it (PDF text source, OCR, export, configuration).

use thiserror::Error;

/// Main error type for the facturas library.
#[derive(Error, Debug)]
pub enum FacturasError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR of scanned pages.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR executable could not be started.
    #[error("OCR tool not found at {path}: {reason}")]
    ToolNotFound { path: String, reason: String },

    /// The OCR executable ran but reported a failure.
    #[error("OCR tool failed: {0}")]
    ToolFailed(String),

    /// The page image could not be prepared for OCR.
    #[error("invalid image: {0}")]
    Image(String),
}

/// Errors related to exporting a result table.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The requested output format is not one of the supported kinds.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workbook could not be written.
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error while writing the output buffer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the facturas library.
pub type Result<T> = std::result::Result<T, FacturasError>;
