//! The one document this tool knows how to build.

use std::path::PathBuf;

pub const INPUT_FILE: &str = "BCA_PROJECT_SYNOPSIS.md";
pub const OUTPUT_FILE: &str = "BCA_PROJECT_SYNOPSIS.pdf";
pub const TITLE: &str = "BCA Project Synopsis - ASG-Oration";

#[derive(Debug, Clone)]
pub struct Document {
    /// Directory holding both the source and the rendered PDF
    pub dir: PathBuf,
    /// Source Markdown, relative to `dir`
    pub input: PathBuf,
    /// Output PDF, relative to `dir`
    pub output: PathBuf,
    pub title: String,
    /// Month and year stamped into the document metadata, e.g. "October 2026"
    pub date: String,
}

impl Document {
    /// The synopsis in `dir`, dated with the current month.
    pub fn synopsis<P: Into<PathBuf>>(dir: P) -> Document {
        Document {
            dir: dir.into(),
            input: PathBuf::from(INPUT_FILE),
            output: PathBuf::from(OUTPUT_FILE),
            title: TITLE.to_string(),
            date: chrono::Local::now().format("%B %Y").to_string(),
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.join(&self.input)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output)
    }

    pub fn has_input(&self) -> bool {
        self.input_path().is_file()
    }
}
