use std::path::PathBuf;
use thiserror::Error;

/// Every way a run can end without a PDF.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{} not found!", .0.display())]
    MissingInput(PathBuf),
    #[error("No PDF generation tools found!")]
    NoToolAvailable,
    /// The chosen tool ran but did not produce a PDF. `message` is the tool's
    /// own error text, left exactly as the tool wrote it.
    #[error("{message}")]
    ToolFailed { tool: &'static str, message: String },
}

impl ConversionError {
    /// Missing input is a usage mistake, not a tooling problem, so it is the
    /// one failure that doesn't print installation instructions.
    pub fn wants_install_instructions(&self) -> bool {
        !matches!(self, ConversionError::MissingInput(_))
    }
}
