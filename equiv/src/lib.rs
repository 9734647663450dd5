//! Structural equivalence of declarations and types across two independently built units.
//!
//! A [Session] answers "are these two declarations (or types) interchangeable?" for one pair of
//! units. Declarations form a cyclic graph, so a session assumes a pair equivalent before
//! verifying it and checks the assumption later from a FIFO work queue; each declaration is
//! queued at most once. The first disagreement ends the check and, if the session was told to
//! complain, leaves a diagnostic on each side explaining it.
//!
//! Two consumers are built on top: [odr::check_units], which compares the same-named
//! definitions of two units, and [import::find_existing], which decides whether a declaration
//! being merged into a unit already exists there.

mod anon;
mod diag;
mod exprs;
pub mod import;
pub mod odr;
mod records;
mod session;
mod templates;
mod types;

pub use anon::find_anonymous_struct_or_union_index;
pub use session::{NonEquivalentSet, Session};
