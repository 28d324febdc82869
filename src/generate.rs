//! One run of the generator, start to finish.
//!
//! The run is strictly linear: check the input, probe, pick a route, convert
//! once, report. Nothing is retried and a failed route never hands over to
//! the next one.

use crate::converters::{self, Convert, Method};
use crate::document::Document;
use crate::error::ConversionError;
use crate::probe::Availability;
use crate::report;
use crate::runner::Runner;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// A PDF that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub method: Method,
    pub location: PathBuf,
    pub size: u64,
}

/// Build `document`, reporting progress and results to `out`.
///
/// A [`ConversionError`] is reported to `out` before being returned, so callers
/// only need to turn it into an exit status. Any other error (the console
/// itself failing) is returned unreported.
pub fn run<W: Write>(
    document: &Document,
    runner: &dyn Runner,
    progress: &ProgressBar,
    out: &mut W,
) -> Result<Outcome> {
    report::banner(out)?;

    match generate(document, runner, progress, out) {
        Ok(outcome) => {
            report::success(out, document, &outcome.location, outcome.size)?;
            Ok(outcome)
        }
        Err(e) => match e.downcast::<ConversionError>() {
            Ok(conversion) => {
                report::failure(out, &conversion)?;
                Err(conversion.into())
            }
            Err(other) => Err(other),
        },
    }
}

fn generate<W: Write>(
    document: &Document,
    runner: &dyn Runner,
    progress: &ProgressBar,
    out: &mut W,
) -> Result<Outcome> {
    if !document.has_input() {
        return Err(ConversionError::MissingInput(document.input.clone()).into());
    }

    report::checking_dependencies(out)?;
    let availability = Availability::probe(runner);
    for (capability, available) in availability.iter() {
        log::info!("{capability}: {}", if available { "found" } else { "missing" });
    }

    let method = converters::select(&availability).ok_or(ConversionError::NoToolAvailable)?;
    log::info!("converting with {method}");
    report::method_selected(out, method)?;

    progress.set_message(format!("Generating PDF with {method}..."));
    progress.enable_steady_tick(Duration::from_millis(100));
    let converted = method.converter().convert(document, runner);
    progress.finish_and_clear();
    converted?;

    let output = document.output_path();
    let size = match std::fs::metadata(&output) {
        Ok(metadata) => metadata.len(),
        Err(_) => {
            return Err(ConversionError::ToolFailed {
                tool: method.name(),
                message: format!(
                    "{method} reported success but {} was not written",
                    document.output.display()
                ),
            }
            .into())
        }
    };
    let location = std::path::absolute(&output)
        .with_context(|| format!("Failed to resolve {}", output.display()))?;

    Ok(Outcome {
        method,
        location,
        size,
    })
}

/// Spinner shown on stderr while a conversion runs.
pub fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .expect("can parse progress style"),
    );
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::{failed, not_installed, succeeded, FakeRunner};
    use crate::runner::{Invocation, RunError, RunOutput};
    use tempfile::TempDir;

    fn workspace(with_input: bool) -> (TempDir, Document) {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let document = Document::synopsis(dir.path());
        if with_input {
            std::fs::write(
                document.input_path(),
                "# Introduction\n\n| A | B |\n|---|---|\n| 1 | 2 |\n",
            )
            .expect("can write input");
        }
        (dir, document)
    }

    /// Pretend to be a tool that writes a small PDF wherever it was asked to.
    fn write_pdf(invocation: &Invocation) -> Result<RunOutput, RunError> {
        let target = match invocation.program.as_str() {
            "pandoc" => invocation
                .current_dir
                .clone()
                .expect("pandoc runs in the document dir")
                .join("BCA_PROJECT_SYNOPSIS.pdf"),
            _ => PathBuf::from(invocation.args.last().expect("output path given")),
        };
        std::fs::write(target, b"%PDF-1.7\n%%EOF\n").expect("can write pdf");
        succeeded()
    }

    fn is_probe(invocation: &Invocation) -> bool {
        invocation.args.first().is_some_and(|a| a == "--version")
    }

    fn execute(document: &Document, runner: &FakeRunner) -> (Result<Outcome>, String) {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        let result = run(document, runner, &ProgressBar::hidden(), &mut out);
        (result, String::from_utf8(out).expect("report is UTF-8"))
    }

    fn conversion_error(result: Result<Outcome>) -> ConversionError {
        result
            .expect_err("run fails")
            .downcast::<ConversionError>()
            .expect("failure is a conversion error")
    }

    #[test]
    fn missing_input_stops_before_probing() {
        let (_dir, document) = workspace(false);
        let runner = FakeRunner::new(|_| panic!("nothing should run"));

        let (result, text) = execute(&document, &runner);

        assert!(matches!(
            conversion_error(result),
            ConversionError::MissingInput(_)
        ));
        assert!(runner.calls().is_empty());
        assert!(text.contains("BCA_PROJECT_SYNOPSIS.md not found!"));
        assert!(!text.contains("Checking dependencies"));
    }

    #[test]
    fn pandoc_success_skips_fallback() {
        let (_dir, document) = workspace(true);
        let runner = FakeRunner::new(|invocation| {
            if is_probe(invocation) {
                succeeded()
            } else {
                write_pdf(invocation)
            }
        });

        let (result, text) = execute(&document, &runner);
        let outcome = result.expect("run succeeds");

        assert_eq!(outcome.method, Method::Pandoc);
        assert_eq!(outcome.size, 15);
        assert!(outcome.location.is_absolute());
        assert_eq!(
            runner.summary(),
            vec![
                "pandoc --version",
                "weasyprint --version",
                "pandoc BCA_PROJECT_SYNOPSIS.md"
            ]
        );
        assert!(text.contains("Using Pandoc (Recommended)"));
        assert!(text.contains("SUCCESS! PDF Generated Successfully!"));
        assert!(!text.contains("Installation Required"));
    }

    #[test]
    fn fallback_used_when_pandoc_missing() {
        let (_dir, document) = workspace(true);
        let runner = FakeRunner::new(|invocation| match invocation.program.as_str() {
            "pandoc" => not_installed(invocation),
            _ if is_probe(invocation) => succeeded(),
            _ => write_pdf(invocation),
        });

        let (result, text) = execute(&document, &runner);
        let outcome = result.expect("run succeeds");

        assert_eq!(outcome.method, Method::WeasyPrint);
        assert_eq!(outcome.location, document.output_path());
        let conversions: Vec<_> = runner
            .calls()
            .into_iter()
            .filter(|c| !is_probe(c))
            .map(|c| c.program)
            .collect();
        assert_eq!(conversions, vec!["weasyprint"]);
        assert!(text.contains("Using WeasyPrint (Markdown renderer)"));
    }

    #[test]
    fn nothing_available_prints_instructions() {
        let (_dir, document) = workspace(true);
        let runner = FakeRunner::new(not_installed);

        let (result, text) = execute(&document, &runner);

        assert!(matches!(
            conversion_error(result),
            ConversionError::NoToolAvailable
        ));
        assert!(runner.calls().iter().all(is_probe));
        assert!(text.contains("No PDF generation tools found!"));
        assert!(text.contains("Method 1: Using Pandoc (Recommended)"));
        assert!(text.contains("Method 2: Using WeasyPrint"));
        assert!(text.contains("Method 3: Online Converter"));
    }

    #[test]
    fn pandoc_failure_is_surfaced_without_fallback() {
        let (_dir, document) = workspace(true);
        let stderr = "Error producing PDF.\n! Package fontspec Error: The font \"Times New Roman\" cannot be found.\n";
        let runner = FakeRunner::new(move |invocation| {
            if is_probe(invocation) {
                succeeded()
            } else {
                failed(43, stderr)
            }
        });

        let (result, text) = execute(&document, &runner);

        match conversion_error(result) {
            ConversionError::ToolFailed { tool, message } => {
                assert_eq!(tool, "Pandoc");
                assert_eq!(message, stderr);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let conversions: Vec<_> = runner
            .calls()
            .into_iter()
            .filter(|c| !is_probe(c))
            .map(|c| c.program)
            .collect();
        assert_eq!(conversions, vec!["pandoc"]);
        assert!(text.contains("The font \"Times New Roman\" cannot be found."));
        assert!(text.contains("Installation Required"));
        assert!(!document.output_path().exists());
    }

    #[test]
    fn success_without_output_is_a_failure() {
        let (_dir, document) = workspace(true);
        let runner = FakeRunner::new(|_| succeeded());

        let (result, text) = execute(&document, &runner);

        let err = conversion_error(result);
        assert_eq!(
            err.to_string(),
            "Pandoc reported success but BCA_PROJECT_SYNOPSIS.pdf was not written"
        );
        assert!(text.contains("Installation Required"));
    }

    #[test]
    fn repeated_runs_report_the_same_size() {
        let (_dir, document) = workspace(true);
        let runner = FakeRunner::new(|invocation| {
            if is_probe(invocation) {
                succeeded()
            } else {
                write_pdf(invocation)
            }
        });

        let (first, _) = execute(&document, &runner);
        let (second, _) = execute(&document, &runner);
        assert_eq!(
            first.expect("first run succeeds").size,
            second.expect("second run succeeds").size
        );
    }
}
