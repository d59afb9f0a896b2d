//! Subcommands and the document loading they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use facturas_core::models::config::FacturasConfig;
use facturas_core::ocr::PageOcr;
use facturas_core::pdf::{collect_text, PdfExtractor, PdfProcessor};
use facturas_core::TesseractOcr;

/// Environment variable overriding `ocr.tesseract_cmd`.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

/// File extensions accepted as input.
pub const INPUT_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Load the configuration from `path`, or the default config file if it
/// exists, then apply environment overrides.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FacturasConfig> {
    let config = match path {
        Some(path) => FacturasConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                FacturasConfig::from_file(&default_path)?
            } else {
                FacturasConfig::default()
            }
        }
    };

    Ok(match std::env::var(TESSERACT_CMD_ENV) {
        Ok(cmd) if !cmd.trim().is_empty() => config.with_tesseract_cmd(cmd),
        _ => config,
    })
}

/// Lowercased extension of a path.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Raw text of an input document and the problems met reading it.
pub struct LoadedText {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Read the raw text of a PDF (with OCR fallback) or plain-text file.
pub fn load_document_text(
    path: &Path,
    config: &FacturasConfig,
    use_ocr: bool,
) -> anyhow::Result<LoadedText> {
    match extension_of(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let extractor = PdfExtractor::from_bytes(&data)?;
            debug!("PDF has {} pages", extractor.page_count());

            let tesseract = TesseractOcr::from_config(&config.ocr);
            let ocr: Option<&dyn PageOcr> = if use_ocr && config.pdf.ocr_fallback {
                Some(&tesseract as &dyn PageOcr)
            } else {
                None
            };

            let document = collect_text(&extractor, ocr, config.pdf.min_page_text_length)?;
            info!(
                "Collected text from {} pages ({:?})",
                document.pages.len(),
                document.pdf_type()
            );

            let mut warnings = document.warnings;
            let mut text = document.text;

            // Page-wise extraction found nothing; try the whole-document pass
            if text.trim().is_empty() {
                match extractor.extract_text() {
                    Ok(full) if !full.trim().is_empty() => {
                        debug!("Using whole-document text extraction");
                        text = full;
                    }
                    Ok(_) => warnings.push("No text could be extracted from the PDF".to_string()),
                    Err(e) => {
                        warn!("Whole-document text extraction failed: {}", e);
                        warnings.push(format!("Text extraction failed: {}", e));
                    }
                }
            }

            Ok(LoadedText { text, warnings })
        }
        "txt" => Ok(LoadedText {
            text: fs::read_to_string(path)?,
            warnings: Vec::new(),
        }),
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}
