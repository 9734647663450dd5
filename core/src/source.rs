use std::fmt;
use std::sync::Arc;

/// A position in one of the compared sources. Diagnostics are anchored at these.
///
/// The default value is an invalid location, used for implicit declarations that were never
/// spelled out in a file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    file: Option<Arc<str>>,
    line: u32,
    col: u32,
}

impl SourceLocation {
    pub fn new<F: Into<Arc<str>>>(file: F, line: u32, col: u32) -> SourceLocation {
        SourceLocation {
            file: Some(file.into()),
            line,
            col,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.file.is_some()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn col(&self) -> u32 {
        self.col
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.col),
            None => write!(f, "<invalid loc>"),
        }
    }
}
