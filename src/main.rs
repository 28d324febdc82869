use anyhow::{Context, Result};
use cli::Cli;
use document::Document;
use error::ConversionError;
use runner::SystemRunner;
use std::process::ExitCode;

mod cli;
mod converters;
mod document;
mod error;
mod generate;
mod probe;
mod report;
mod runner;

fn main() -> ExitCode {
    init_logging();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        // already reported alongside the install instructions
        Err(e) if e.is::<ConversionError>() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {e:#}", console::style("Error").red());
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr through `log`; the report itself is plain stdout.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let _cli = Cli::parse();

    let dir = std::env::current_dir().with_context(|| "Failed to determine working directory")?;
    let document = Document::synopsis(dir);
    log::debug!("building {} in {}", document.input.display(), document.dir.display());

    let progress = generate::spinner();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = generate::run(&document, &SystemRunner, &progress, &mut out)?;
    log::debug!("{} wrote {} bytes", outcome.method, outcome.size);

    Ok(())
}
