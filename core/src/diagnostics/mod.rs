//! The diagnostic sink. Each compared source owns a [Collector]; diagnostics are built through a
//! [DiagnosticBuilder], which accumulates message arguments and hands the finished diagnostic to
//! its collector when dropped.
//!
//! Message templates use positional placeholders (`{0}`, `{1}`, ...) that are filled from the
//! arguments in the order they were added.


use crate::SourceLocation;
use std::fmt;
use tracing::{debug, trace};

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Ignored => "ignored",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Every diagnostic the equivalence checker can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagId {
    DeclKindMismatch,
    DeclKindHere,
    TagTypeInconsistent,
    TagKindHere,
    NameHere,
    DefinitionHere,
    NoDefinition,
    FieldName,
    Field,
    MissingField,
    BitField,
    NotBitField,
    NumberOfBases,
    Base,
    VirtualBase,
    Enumerator,
    MissingEnumerator,
    AttributeMissing,
    AttributeHere,
    AttributeValueInconsistent,
    DifferentNumTemplateParameters,
    TemplateParameterList,
    DifferentTemplateParameterKind,
    TemplateParameterHere,
    ParameterPackNonPack,
    ParameterPackNonPackHere,
    DefaultArgumentInconsistent,
    DefaultArgumentHere,
    NonTypeParameterTypeInconsistent,
    ValueHere,
}

impl DiagId {
    pub fn severity(self) -> Severity {
        use DiagId::*;
        match self {
            DeclKindMismatch
            | AttributeMissing
            | AttributeValueInconsistent
            | DifferentNumTemplateParameters
            | DifferentTemplateParameterKind
            | ParameterPackNonPack
            | DefaultArgumentInconsistent
            | NonTypeParameterTypeInconsistent => Severity::Error,
            TagTypeInconsistent => Severity::Warning,
            DeclKindHere | TagKindHere | NameHere | DefinitionHere | NoDefinition | FieldName
            | Field | MissingField | BitField | NotBitField | NumberOfBases | Base | VirtualBase | Enumerator | MissingEnumerator
            | AttributeHere | TemplateParameterList | TemplateParameterHere
            | ParameterPackNonPackHere | DefaultArgumentHere | ValueHere => Severity::Note,
        }
    }

    pub fn template(self) -> &'static str {
        use DiagId::*;
        match self {
            DeclKindMismatch => {
                "declaration {0} has incompatible kinds in different translation units ({1} vs. {2})"
            }
            DeclKindHere => "declared here as {0}",
            TagTypeInconsistent => {
                "type {0} has incompatible definitions in different translation units"
            }
            TagKindHere => "{0} is a {1} here",
            NameHere => "declared here with name {0}",
            DefinitionHere => "{0} is defined here",
            NoDefinition => "{0} is declared here without a definition",
            FieldName => "field has name {0} here",
            Field => "field {0} has type {1} here",
            MissingField => "no corresponding field here",
            BitField => "bit-field {0} with type {1} and length {2} here",
            NotBitField => "field {0} is not a bit-field",
            NumberOfBases => "class has {0} base class(es)",
            Base => "class has base type {0}",
            VirtualBase => "{0} derivation here",
            Enumerator => "enumerator {0} with value {1} here",
            MissingEnumerator => "no corresponding enumerator here",
            AttributeMissing => "attribute {0} is missing",
            AttributeHere => "attribute {0} here",
            AttributeValueInconsistent => {
                "type {0} declared with incompatible {1} attribute value in different translation units ({2} bits vs. {3} bits)"
            }
            DifferentNumTemplateParameters => {
                "template parameter lists have a different number of parameters ({0} vs {1})"
            }
            TemplateParameterList => "template parameter list also declared here",
            DifferentTemplateParameterKind => {
                "template parameter has different kinds in different translation units"
            }
            TemplateParameterHere => "template parameter declared here",
            ParameterPackNonPack => "parameter kind mismatch; parameter is {0} parameter pack",
            ParameterPackNonPackHere => "parameter is {0} parameter pack",
            DefaultArgumentInconsistent => {
                "template parameter default argument mismatch; parameter {0} a default argument"
            }
            DefaultArgumentHere => "parameter {0} a default argument here",
            NonTypeParameterTypeInconsistent => {
                "non-type template parameter declared with incompatible types in different translation units ({0} vs. {1})"
            }
            ValueHere => "declared here with type {0}",
        }
    }
}

/// A single argument substituted into a message template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagArg {
    /// A declaration, type, or attribute name; rendered in single quotes.
    Quoted(String),
    /// Plain text, rendered as-is.
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl DiagArg {
    pub fn quoted<S: Into<String>>(s: S) -> DiagArg {
        DiagArg::Quoted(s.into())
    }
}

impl From<&str> for DiagArg {
    fn from(s: &str) -> DiagArg {
        DiagArg::Text(s.to_string())
    }
}

impl From<u64> for DiagArg {
    fn from(v: u64) -> DiagArg {
        DiagArg::Unsigned(v)
    }
}

impl From<u32> for DiagArg {
    fn from(v: u32) -> DiagArg {
        DiagArg::Unsigned(v.into())
    }
}

impl From<usize> for DiagArg {
    fn from(v: usize) -> DiagArg {
        DiagArg::Unsigned(v as u64)
    }
}

impl From<i64> for DiagArg {
    fn from(v: i64) -> DiagArg {
        DiagArg::Signed(v)
    }
}

impl fmt::Display for DiagArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagArg::Quoted(s) => write!(f, "'{s}'"),
            DiagArg::Text(s) => f.write_str(s),
            DiagArg::Unsigned(v) => write!(f, "{v}"),
            DiagArg::Signed(v) => write!(f, "{v}"),
        }
    }
}

/// A finished diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub loc: SourceLocation,
    pub id: DiagId,
    pub severity: Severity,
    pub args: Vec<DiagArg>,
}

impl Diagnostic {
    /// Substitutes the arguments into the template. Placeholders without a matching argument are
    /// left in place.
    pub fn message(&self) -> String {
        let template = self.id.template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let arg = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((self.args.get(index)?, close))
            });
            match arg {
                Some((arg, close)) => {
                    out.push_str(&arg.to_string());
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.loc, self.severity, self.message())
    }
}

/// Collects the diagnostics reported against one source.
#[derive(Debug)]
pub struct Collector {
    label: String,
    ignore_warnings: bool,
    diagnostics: Vec<Diagnostic>,
    // Severity of the last non-note diagnostic; notes inherit its fate.
    last_severity: Option<Severity>,
}

impl Collector {
    pub fn new<S: Into<String>>(label: S) -> Collector {
        Collector {
            label: label.into(),
            ignore_warnings: false,
            diagnostics: Vec::new(),
            last_severity: None,
        }
    }

    /// Drops warning-level diagnostics (and the notes attached to them) instead of recording them.
    pub fn ignore_warnings(mut self, ignore: bool) -> Collector {
        self.ignore_warnings = ignore;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Starts a diagnostic at `loc`. It is recorded when the returned builder is dropped.
    pub fn report(&mut self, loc: SourceLocation, id: DiagId) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: self,
            diag: Some(Diagnostic {
                loc,
                id,
                severity: id.severity(),
                args: Vec::new(),
            }),
        }
    }

    /// Informs this collector that the last diagnostic came from `other`, so that notes reported
    /// here are attached to (and share the fate of) that diagnostic.
    pub fn note_prior_diagnostic_from(&mut self, other: &Collector) {
        self.last_severity = other.last_severity;
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn record(&mut self, mut diag: Diagnostic) {
        if diag.severity == Severity::Note {
            if self.last_severity == Some(Severity::Ignored) {
                trace!("{}: dropping note attached to ignored diagnostic", self.label);
                return;
            }
        } else {
            if self.ignore_warnings && diag.severity == Severity::Warning {
                diag.severity = Severity::Ignored;
            }
            self.last_severity = Some(diag.severity);
            if diag.severity == Severity::Ignored {
                trace!("{}: ignoring {diag}", self.label);
                return;
            }
        }
        debug!("{}: {diag}", self.label);
        self.diagnostics.push(diag);
    }
}

/// Accumulates the arguments of a diagnostic. The diagnostic is flushed to its collector when the
/// builder goes out of scope.
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Collector,
    diag: Option<Diagnostic>,
}

impl DiagnosticBuilder<'_> {
    /// Appends the next positional argument.
    pub fn arg<A: Into<DiagArg>>(mut self, arg: A) -> Self {
        if let Some(diag) = self.diag.as_mut() {
            diag.args.push(arg.into());
        }
        self
    }
}

impl Drop for DiagnosticBuilder<'_> {
    fn drop(&mut self) {
        if let Some(diag) = self.diag.take() {
            self.sink.record(diag);
        }
    }
}
