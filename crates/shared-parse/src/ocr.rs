//! Optical character recognition seam.
//!
//! The parser talks to OCR through the [`OcrEngine`] trait so the backend
//! can be swapped (tests use a stub). The default backend shells out to
//! the `tesseract` binary, which must be on `PATH` or configured
//! explicitly.

use crate::ParseError;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Backend that turns raster image bytes into text.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String, ParseError>;
}

/// OCR via the `tesseract` command-line binary.
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("ocr-{}.img", uuid::Uuid::new_v4()))
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &[u8]) -> Result<String, ParseError> {
        let path = Self::scratch_path();
        std::fs::write(&path, image)?;

        // `stdout` as the output base makes tesseract print recognized
        // text instead of writing a sidecar file.
        let output = Command::new(&self.command)
            .arg(&path)
            .arg("stdout")
            .args(["-l", "eng", "--oem", "1", "--psm", "6"])
            .output();
        let _ = std::fs::remove_file(&path);

        let output = output.map_err(|e| ParseError::Ocr(format!("{}: {}", self.command, e)))?;
        if !output.status.success() {
            return Err(ParseError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "OCR pass complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_an_ocr_error() {
        let engine = TesseractOcr::new("definitely-not-a-real-ocr-binary");
        let err = engine.recognize(&[0xFF, 0xD8]).unwrap_err();
        assert!(matches!(err, ParseError::Ocr(_)));
    }
}
