//! The merge-side question: when a declaration of one unit is brought into another, does the
//! destination already declare an equivalent entity?

use crate::session::{NonEquivalentSet, Session};
use structeq_core::Config;
use structeq_ir::ast::{CCompUnit, CDeclId};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportDecision {
    /// The destination already has an equivalent declaration.
    Reuse(CDeclId),
    /// No equivalent declaration exists; the declaration must be imported as a new one.
    ImportNew,
}

/// Looks for a declaration of `to` that `decl` (of `from`) can be merged with: a declaration of
/// the same kind and qualified name that is structurally equivalent. Candidates are tried in
/// declaration order and the first match wins.
///
/// Comparisons are silent probes whatever `config.complain` says; the outcome is the decision.
/// Pairs found not to be equivalent are recorded in `non_equivalent` so that later probes in the
/// same batch skip them.
pub fn find_existing(
    from: &CCompUnit,
    to: &CCompUnit,
    decl: CDeclId,
    non_equivalent: &mut NonEquivalentSet,
    config: &Config,
) -> ImportDecision {
    let Some(name) = from.qualified_name(decl) else {
        debug!("{decl:?} of {} is unnamed; importing as new", from.name);
        return ImportDecision::ImportNew;
    };
    let config = config.clone().with_complain(false);
    for candidate in to.lookup(&name) {
        if !to[candidate].same_kind(&from[decl]) {
            continue;
        }
        let mut session = Session::new(from, to, non_equivalent, &config);
        if session.is_equivalent_decls(decl, candidate) {
            debug!("reusing {candidate:?} of {} for {name}", to.name);
            return ImportDecision::Reuse(candidate);
        }
        debug!("{candidate:?} of {} differs from {name}", to.name);
    }
    ImportDecision::ImportNew
}
