//! The declaration/type model compared by the structural equivalence checker.
//!
//! A [ast::CCompUnit] holds the declarations of one independently built source. Declarations
//! refer to each other by [ast::CDeclId], so the graph may be cyclic (a record pointing to
//! itself, an enum's enumerators naming the enum).

pub mod ast;
pub mod builder;

pub use builder::UnitBuilder;
