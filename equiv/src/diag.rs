//! Two-sided diagnostic emission. A mismatch is explained by diagnostics against both units;
//! `diag1` reports against the first unit and `diag2` against the second.

use structeq_core::Config;
use structeq_core::SourceLocation;
use structeq_core::diagnostics::{Collector, DiagId, Diagnostic, DiagnosticBuilder};

pub(crate) struct Emitter {
    complain: bool,
    // Whether the last diagnostic went to the second unit. Only used to attach notes to the
    // diagnostic they follow; it never affects a comparison.
    last_from_second: bool,
    first: Collector,
    second: Collector,
}

impl Emitter {
    pub fn new(label1: &str, label2: &str, config: &Config) -> Emitter {
        Emitter {
            complain: config.complain,
            last_from_second: false,
            first: Collector::new(label1).ignore_warnings(config.ignore_warnings),
            second: Collector::new(label2).ignore_warnings(config.ignore_warnings),
        }
    }

    pub fn complain(&self) -> bool {
        self.complain
    }

    pub fn diag1(&mut self, loc: SourceLocation, id: DiagId) -> DiagnosticBuilder<'_> {
        debug_assert!(self.complain, "diagnostics are disabled for this session");
        if self.last_from_second {
            self.first.note_prior_diagnostic_from(&self.second);
        }
        self.last_from_second = false;
        self.first.report(loc, id)
    }

    pub fn diag2(&mut self, loc: SourceLocation, id: DiagId) -> DiagnosticBuilder<'_> {
        debug_assert!(self.complain, "diagnostics are disabled for this session");
        if !self.last_from_second {
            self.second.note_prior_diagnostic_from(&self.first);
        }
        self.last_from_second = true;
        self.second.report(loc, id)
    }

    pub fn first(&self) -> &Collector {
        &self.first
    }

    pub fn second(&self) -> &Collector {
        &self.second
    }

    pub fn into_diagnostics(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.first.into_diagnostics(), self.second.into_diagnostics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structeq_core::diagnostics::{DiagArg, Severity};

    #[test]
    fn notes_attach_across_sides() {
        let config = Config::mock();
        let mut emitter = Emitter::new("a.cpp", "b.cpp", &config);
        emitter
            .diag2(SourceLocation::new("b.cpp", 2, 8), DiagId::AttributeMissing)
            .arg(DiagArg::quoted("pack"));
        emitter
            .diag1(SourceLocation::new("a.cpp", 1, 9), DiagId::AttributeHere)
            .arg(DiagArg::quoted("pack"));
        let (first, second) = emitter.into_diagnostics();
        assert_eq!(second[0].severity, Severity::Error);
        assert_eq!(first[0].severity, Severity::Note);
        assert_eq!(first[0].to_string(), "a.cpp:1:9: note: attribute 'pack' here");
    }
}
