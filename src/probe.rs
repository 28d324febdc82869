//! Detection of the tools each conversion route needs.
//!
//! External capabilities are probed by running their `--version` with a short
//! timeout; anything other than a clean exit (not installed, crashed, hung)
//! counts as unavailable. The Markdown renderer is compiled in, so its probe
//! is a tiny in-process render instead of a subprocess.

use crate::converters::weasyprint::render_markdown;
use crate::runner::{Invocation, Runner, PROBE_TIMEOUT};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Document typesetter, the primary route
    Pandoc,
    /// HTML/CSS to PDF renderer
    WeasyPrint,
    /// Markdown to HTML renderer
    Markdown,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Pandoc => "pandoc",
            Capability::WeasyPrint => "weasyprint",
            Capability::Markdown => "markdown",
        }
    }

    pub fn all() -> &'static [Capability] {
        &[
            Capability::Pandoc,
            Capability::WeasyPrint,
            Capability::Markdown,
        ]
    }

    /// The command that proves the capability is usable, if it is external.
    pub fn probe_invocation(&self) -> Option<Invocation> {
        match self {
            Capability::Pandoc | Capability::WeasyPrint => Some(
                Invocation::new(self.name())
                    .arg("--version")
                    .timeout(PROBE_TIMEOUT),
            ),
            Capability::Markdown => None,
        }
    }

    pub fn probe(&self, runner: &dyn Runner) -> bool {
        match self.probe_invocation() {
            Some(invocation) => match runner.run(&invocation) {
                Ok(output) => output.success(),
                Err(e) => {
                    log::debug!("{} probe failed: {e}", self.name());
                    false
                }
            },
            None => render_markdown("# probe").contains("<h1"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which capabilities were found usable on this machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability(BTreeMap<Capability, bool>);

impl Availability {
    /// Probe every known capability once.
    pub fn probe(runner: &dyn Runner) -> Availability {
        Capability::all()
            .iter()
            .map(|&capability| {
                let available = capability.probe(runner);
                log::debug!("{capability}: available = {available}");
                (capability, available)
            })
            .collect()
    }

    /// Capabilities never probed count as missing.
    pub fn has(&self, capability: Capability) -> bool {
        self.0.get(&capability).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.0.iter().map(|(c, a)| (*c, *a))
    }
}

impl FromIterator<(Capability, bool)> for Availability {
    fn from_iter<I: IntoIterator<Item = (Capability, bool)>>(iter: I) -> Self {
        Availability(iter.into_iter().collect())
    }
}
