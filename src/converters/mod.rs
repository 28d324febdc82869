use crate::document::Document;
use crate::error::ConversionError;
use crate::probe::{Availability, Capability};
use crate::runner::Runner;
use std::fmt;

pub mod pandoc;
pub use pandoc::Pandoc;

pub mod weasyprint;
pub use weasyprint::WeasyPrint;

/// The routes from Markdown to PDF, best first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Pandoc,
    WeasyPrint,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Pandoc => "Pandoc",
            Method::WeasyPrint => "WeasyPrint",
        }
    }

    /// What the user is told when this route is picked.
    pub fn label(&self) -> &'static str {
        match self {
            Method::Pandoc => "Pandoc (Recommended)",
            Method::WeasyPrint => "WeasyPrint (Markdown renderer)",
        }
    }

    pub fn converter(&self) -> Converter {
        match self {
            Method::Pandoc => Converter::Pandoc(Pandoc::default()),
            Method::WeasyPrint => Converter::WeasyPrint(WeasyPrint::default()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pick the first usable route.
///
/// The fallback needs both halves; with only one of them present there is
/// nothing to run.
pub fn select(availability: &Availability) -> Option<Method> {
    if availability.has(Capability::Pandoc) {
        Some(Method::Pandoc)
    } else if availability.has(Capability::WeasyPrint) && availability.has(Capability::Markdown) {
        Some(Method::WeasyPrint)
    } else {
        None
    }
}

#[derive(Debug)]
pub enum Converter {
    Pandoc(Pandoc),
    WeasyPrint(WeasyPrint),
}

pub trait Convert {
    fn convert(&self, document: &Document, runner: &dyn Runner) -> Result<(), ConversionError>;
}

impl Convert for Converter {
    fn convert(&self, document: &Document, runner: &dyn Runner) -> Result<(), ConversionError> {
        match self {
            Converter::Pandoc(p) => p.convert(document, runner),
            Converter::WeasyPrint(w) => w.convert(document, runner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn availability(pandoc: bool, weasyprint: bool, markdown: bool) -> Availability {
        Availability::from_iter([
            (Capability::Pandoc, pandoc),
            (Capability::WeasyPrint, weasyprint),
            (Capability::Markdown, markdown),
        ])
    }

    #[test]
    fn pandoc_wins_when_present() {
        assert_eq!(select(&availability(true, true, true)), Some(Method::Pandoc));
        assert_eq!(select(&availability(true, false, false)), Some(Method::Pandoc));
    }

    #[test]
    fn fallback_needs_both_halves() {
        assert_eq!(
            select(&availability(false, true, true)),
            Some(Method::WeasyPrint)
        );
        assert_eq!(select(&availability(false, true, false)), None);
        assert_eq!(select(&availability(false, false, true)), None);
    }

    #[test]
    fn nothing_available_selects_nothing() {
        assert_eq!(select(&availability(false, false, false)), None);
        assert_eq!(select(&Availability::default()), None);
    }
}
