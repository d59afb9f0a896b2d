//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::table::{MISSING_IDENTIFIER, TOTAL_LABEL};

/// Main configuration for the facturas pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturasConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration for scanned pages.
    pub ocr: OcrConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Run OCR on pages that yield no extractable text.
    pub ocr_fallback: bool,

    /// Pages with fewer non-whitespace characters are treated as blank.
    pub min_page_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            ocr_fallback: true,
            min_page_text_length: 1,
        }
    }
}

/// OCR tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the tesseract executable.
    pub tesseract_cmd: PathBuf,

    /// Tesseract language code(s), e.g. "spa" or "spa+eng".
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            language: "spa".to_string(),
        }
    }
}

/// A currency column and the markers that introduce its amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency code, used for the column name (`Importe_<code>`).
    pub code: String,

    /// Literal markers preceding an amount, e.g. `["$", "ARS"]`.
    pub markers: Vec<String>,
}

/// A named identifier pattern added after the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierPatternConfig {
    pub name: String,
    pub pattern: String,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Label for rows with no matched identifier.
    pub missing_identifier_label: String,

    /// Label of the aggregate row.
    pub total_label: String,

    /// Currency columns, in output order.
    pub currencies: Vec<CurrencyConfig>,

    /// Extra identifier patterns, lowest priority.
    pub extra_identifier_patterns: Vec<IdentifierPatternConfig>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            missing_identifier_label: MISSING_IDENTIFIER.to_string(),
            total_label: TOTAL_LABEL.to_string(),
            currencies: vec![
                CurrencyConfig {
                    code: "ARS".to_string(),
                    markers: vec!["$".to_string(), "ARS".to_string()],
                },
                CurrencyConfig {
                    code: "USD".to_string(),
                    markers: vec!["USD".to_string()],
                },
            ],
            extra_identifier_patterns: Vec::new(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    pub default_format: String,

    /// File stem of exported files (`resultado.xlsx`).
    pub file_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "xlsx".to_string(),
            file_stem: "resultado".to_string(),
        }
    }
}

impl FacturasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Replace the tesseract path, e.g. with a value taken from the
    /// environment by the caller.
    pub fn with_tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.ocr.tesseract_cmd = cmd.into();
        self
    }
}
