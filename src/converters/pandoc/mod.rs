//! Primary route: pandoc with the xelatex engine.
//!
//! Pandoc does the whole job in one call, so this converter only assembles the
//! argument list from [`PandocLayout`] and runs it from the document's
//! directory. Whatever pandoc prints on failure is passed through untouched.

mod config;

pub use config::PandocLayout;

use super::Convert;
use crate::document::Document;
use crate::error::ConversionError;
use crate::runner::{Invocation, Runner, CONVERSION_TIMEOUT};

pub const PROGRAM: &str = "pandoc";

#[derive(Debug, Default)]
pub struct Pandoc {
    pub layout: PandocLayout,
}

impl Pandoc {
    pub fn invocation(&self, document: &Document) -> Invocation {
        Invocation::new(PROGRAM)
            .args(self.layout.args(document))
            .current_dir(&document.dir)
            .timeout(CONVERSION_TIMEOUT)
    }
}

impl Convert for Pandoc {
    fn convert(&self, document: &Document, runner: &dyn Runner) -> Result<(), ConversionError> {
        let output = runner
            .run(&self.invocation(document))
            .map_err(|e| ConversionError::ToolFailed {
                tool: "Pandoc",
                message: e.to_string(),
            })?;

        if output.success() {
            Ok(())
        } else {
            log::warn!("pandoc exited with {:?}", output.code);
            Err(ConversionError::ToolFailed {
                tool: "Pandoc",
                message: output.failure_message(PROGRAM),
            })
        }
    }
}
