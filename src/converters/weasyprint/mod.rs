//! Fallback route: built-in Markdown rendering plus weasyprint.
//!
//! The Markdown is rendered in-process, wrapped in a standalone page and
//! written next to the stylesheet in a scratch directory. weasyprint then lays
//! the page out. Relative links and images resolve against the document's own
//! directory, not the scratch one.

mod html;
mod styles;

pub use html::render_markdown;

use super::Convert;
use crate::document::Document;
use crate::error::ConversionError;
use crate::runner::{Invocation, Runner, CONVERSION_TIMEOUT};
use anyhow::{bail, Context, Result};

pub const PROGRAM: &str = "weasyprint";

#[derive(Debug, Default)]
pub struct WeasyPrint {}

impl WeasyPrint {
    fn render(&self, document: &Document, runner: &dyn Runner) -> Result<()> {
        let input = document.input_path();
        let markdown = std::fs::read_to_string(&input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let body = html::render_markdown(&markdown);
        let page = html::render_page(&document.title, &body);
        let stylesheet = styles::generate_stylesheet();

        // removed when dropped, on every path out of this function
        let scratch = tempfile::Builder::new()
            .prefix("synopsis-pdf-")
            .tempdir()
            .with_context(|| "Failed to create scratch directory")?;
        let page_path = scratch.path().join("synopsis.html");
        let stylesheet_path = scratch.path().join("synopsis.css");
        std::fs::write(&page_path, page)
            .with_context(|| format!("Failed to write {}", page_path.display()))?;
        std::fs::write(&stylesheet_path, stylesheet)
            .with_context(|| format!("Failed to write {}", stylesheet_path.display()))?;

        let invocation = Invocation::new(PROGRAM)
            .arg("--stylesheet")
            .arg(&stylesheet_path)
            .arg("--base-url")
            .arg(&document.dir)
            .arg(&page_path)
            .arg(document.output_path())
            .current_dir(&document.dir)
            .timeout(CONVERSION_TIMEOUT);

        let output = runner.run(&invocation)?;
        if !output.success() {
            bail!("{}", output.failure_message(PROGRAM));
        }

        Ok(())
    }
}

impl Convert for WeasyPrint {
    fn convert(&self, document: &Document, runner: &dyn Runner) -> Result<(), ConversionError> {
        self.render(document, runner).map_err(|e| {
            log::warn!("weasyprint route failed: {e:#}");
            ConversionError::ToolFailed {
                tool: "WeasyPrint",
                message: format!("{e:#}"),
            }
        })
    }
}
