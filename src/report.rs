//! Console messages.
//!
//! Everything the user reads goes through here, written to any `Write` so the
//! same text can be captured in tests. Styling comes from `console`, which
//! drops the colour codes on its own when stdout isn't a terminal.

use crate::converters::Method;
use crate::document::{Document, INPUT_FILE};
use crate::error::ConversionError;
use console::style;
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 60;

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn section<W: Write>(out: &mut W, heading: &str) -> io::Result<()> {
    writeln!(out, "{}", style(heading).bold())?;
    writeln!(out, "{}", "-".repeat(50))
}

pub fn banner<W: Write>(out: &mut W) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "{}", style("BCA PROJECT SYNOPSIS - PDF GENERATOR").bold())?;
    rule(out)?;
    writeln!(out)
}

pub fn checking_dependencies<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Checking dependencies...")?;
    writeln!(out)
}

pub fn method_selected<W: Write>(out: &mut W, method: Method) -> io::Result<()> {
    writeln!(out, "{} Using {}", style("✔").green(), method.label())?;
    writeln!(out)?;
    writeln!(out, "Generating PDF with {}...", method.name())?;
    writeln!(out)
}

/// Installation guidance for every supported route.
pub fn install_instructions<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style("Installation Required").bold())?;
    writeln!(out)?;
    writeln!(out, "Choose one of the following methods:")?;
    writeln!(out)?;

    section(out, "Method 1: Using Pandoc (Recommended)")?;
    writeln!(out, "Ubuntu/Debian:")?;
    writeln!(out, "  sudo apt-get install pandoc texlive-xetex")?;
    writeln!(out)?;
    writeln!(out, "macOS:")?;
    writeln!(out, "  brew install pandoc basictex")?;
    writeln!(out)?;
    writeln!(out, "Windows:")?;
    writeln!(out, "  Download from: https://pandoc.org/installing.html")?;
    writeln!(out)?;

    section(out, "Method 2: Using WeasyPrint")?;
    writeln!(out, "pip3 install weasyprint")?;
    writeln!(out, "(the Markdown renderer is built in)")?;
    writeln!(out)?;

    section(out, "Method 3: Online Converter")?;
    writeln!(out, "Visit: https://cloudconvert.com/md-to-pdf")?;
    writeln!(out, "Upload: {INPUT_FILE}")?;
    writeln!(out)
}

/// Report a failed run.
pub fn failure<W: Write>(out: &mut W, error: &ConversionError) -> io::Result<()> {
    match error {
        ConversionError::MissingInput(_) => {
            writeln!(out, "{} {error}", style("Error:").red().bold())?;
            writeln!(out, "   Make sure you're in the correct directory.")?;
        }
        ConversionError::NoToolAvailable => {
            writeln!(out, "{} {error}", style("✘").red())?;
        }
        ConversionError::ToolFailed { tool, .. } => {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                style(format!("✘ Error generating PDF with {tool}:")).red()
            )?;
            writeln!(out, "   {error}")?;
        }
    }

    if error.wants_install_instructions() {
        install_instructions(out)?;
    }
    Ok(())
}

/// Human-readable size in MiB, e.g. `0.42 MiB`.
pub fn format_size(bytes: u64) -> String {
    let adjusted = byte_unit::Byte::from_u64(bytes).get_adjusted_unit(byte_unit::Unit::MiB);
    format!("{adjusted:.2}")
}

/// Report a successful run and what to do with the PDF next.
pub fn success<W: Write>(
    out: &mut W,
    document: &Document,
    location: &Path,
    size: u64,
) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(
        out,
        "{}",
        style("✔ SUCCESS! PDF Generated Successfully!").green().bold()
    )?;
    rule(out)?;
    writeln!(out)?;
    writeln!(out, "Location:  {}", location.display())?;
    writeln!(out, "File Size: {}", format_size(size))?;
    writeln!(out)?;

    writeln!(out, "{}", style("Next Steps:").bold())?;
    writeln!(out, "   1. Open {} to review", document.output.display())?;
    writeln!(out, "   2. Replace placeholders:")?;
    writeln!(out, "      - [Student Name]")?;
    writeln!(out, "      - [Your Learner ID]")?;
    writeln!(out, "      - [Guide Name with Designation]")?;
    writeln!(out, "      - [Current Date]")?;
    writeln!(out, "   3. Optional: Fine-tune in Microsoft Word")?;
    writeln!(out, "   4. Print on A4 paper for submission")?;
    writeln!(out)?;
    writeln!(out, "Tip: See FORMATTING_GUIDE.md for detailed instructions")?;
    writeln!(out)
}
