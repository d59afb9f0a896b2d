//! Tesseract command-line wrapper.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{PageOcr, Result};

/// OCR engine that shells out to `tesseract <image> stdout -l <language>`.
///
/// The executable path is explicit configuration; nothing is read from the
/// environment here.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: PathBuf,
    language: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.tesseract_cmd.clone(), config.language.clone())
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Run tesseract on an image file already on disk.
    pub fn recognize_file(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| OcrError::ToolNotFound {
                path: self.command.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ToolFailed(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

impl PageOcr for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let start = Instant::now();

        let temp_dir = tempfile::tempdir()
            .map_err(|e| OcrError::Image(format!("failed to create temp dir: {}", e)))?;
        let page_path = temp_dir.path().join("page.png");

        image
            .save_with_format(&page_path, image::ImageFormat::Png)
            .map_err(|e| OcrError::Image(format!("failed to write page image: {}", e)))?;
        debug!(
            "Wrote {}x{} page image to {}",
            image.width(),
            image.height(),
            page_path.display()
        );

        let text = self.recognize_file(&page_path)?;

        info!(
            "Tesseract recognized {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}
