use clap::Parser;

/// Typesets BCA_PROJECT_SYNOPSIS.md in the current directory into
/// BCA_PROJECT_SYNOPSIS.pdf, using pandoc when available and weasyprint
/// otherwise.
///
/// Set RUST_LOG=debug to see every probe and command line.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {}
