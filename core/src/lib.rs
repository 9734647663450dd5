//! Shared infrastructure for the structural equivalence checker: configuration, source
//! locations, the diagnostic sink, and logging setup.

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod source;
pub mod test_util;

pub use config::Config;
pub use source::SourceLocation;
