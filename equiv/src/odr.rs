//! The definition-rule checker: every record, enum, typedef and class template of the first unit
//! that has a counterpart of the same kind and qualified name in the second unit must be
//! equivalent to it, spelling included.

use crate::session::{NonEquivalentSet, Session};
use std::collections::HashSet;
use structeq_core::Config;
use structeq_core::diagnostics::Diagnostic;
use structeq_ir::ast::{CCompUnit, CDeclId, CDeclKind};
use tracing::{debug, info, warn};

/// A qualified name declared incompatibly in the two units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OdrViolation {
    pub name: String,
    pub first: CDeclId,
    pub second: CDeclId,
}

#[derive(Debug, Default)]
pub struct OdrReport {
    pub violations: Vec<OdrViolation>,
    /// Number of name pairs that were compared.
    pub checked: usize,
    pub first_diagnostics: Vec<Diagnostic>,
    pub second_diagnostics: Vec<Diagnostic>,
}

impl OdrReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Compares the same-named definitions of `unit1` and `unit2`. Comparisons always use strict
/// spelling; the other options come from `config`. All comparisons share one non-equivalent set,
/// so a mismatch reachable from several definitions is diagnosed once.
pub fn check_units(unit1: &CCompUnit, unit2: &CCompUnit, config: &Config) -> OdrReport {
    let config = config.clone().with_strict_spelling(true);
    let mut non_equivalent = NonEquivalentSet::new();
    let mut report = OdrReport::default();

    for d1 in checked_decls(unit1) {
        let Some(name) = unit1.qualified_name(d1) else {
            continue;
        };
        let Some(d2) = unit2
            .lookup(&name)
            .find(|&d2| unit2[d2].same_kind(&unit1[d1]))
        else {
            debug!("{name} has no counterpart in {}", unit2.name);
            continue;
        };
        report.checked += 1;

        let mut session = Session::new(unit1, unit2, &mut non_equivalent, &config);
        let equivalent = session.is_equivalent_decls(d1, d2);
        let (first, second) = session.into_diagnostics();
        report.first_diagnostics.extend(first);
        report.second_diagnostics.extend(second);
        if !equivalent {
            warn!("{name} is defined differently in {} and {}", unit1.name, unit2.name);
            report.violations.push(OdrViolation { name, first: d1, second: d2 });
        }
    }
    info!(
        "checked {} names shared by {} and {}: {} violations",
        report.checked,
        unit1.name,
        unit2.name,
        report.violations.len()
    );
    report
}

// Records, enums, typedefs and class templates at namespace scope, in declaration order. The
// record a class template declares is reached through the template.
fn checked_decls(unit: &CCompUnit) -> Vec<CDeclId> {
    let templated: HashSet<CDeclId> = unit
        .decls
        .values()
        .filter_map(|d| match &d.kind {
            CDeclKind::ClassTemplate(ct) => Some(ct.templated),
            _ => None,
        })
        .collect();
    let mut out = Vec::new();
    let mut pending: Vec<CDeclId> = unit.top_level.iter().rev().copied().collect();
    while let Some(id) = pending.pop() {
        let Some(decl) = unit.get(id) else {
            continue;
        };
        match decl.kind {
            CDeclKind::Namespace => {
                let members = unit
                    .sorted_ids()
                    .into_iter()
                    .filter(|&m| unit[m].parent == Some(id));
                pending.extend(members.collect::<Vec<_>>().into_iter().rev());
            }
            CDeclKind::Record(_) if templated.contains(&id) => {}
            CDeclKind::Record(_)
            | CDeclKind::Enum(_)
            | CDeclKind::Typedef(_)
            | CDeclKind::ClassTemplate(_) => out.push(id),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use structeq_ir::UnitBuilder;
    use structeq_ir::ast::{CPrimType, CQualType, CTagKind};

    #[test]
    fn walks_namespaces_in_order() {
        let mut b = UnitBuilder::new("a.cpp");
        let a = b.record(Some("A"), CTagKind::Struct, 1, 8);
        let ns = b.namespace("ns", 2, 11);
        let inner = b.enumeration(Some("E"), 3, 6);
        b.nest(inner, ns);
        let (tmpl, _) = b.class_template("T", CTagKind::Struct, 4, 8);
        b.nest(tmpl, ns);
        b.var("v", CQualType::prim(CPrimType::Int), 5, 5);
        let td = b.typedef("I", CQualType::prim(CPrimType::Int), 6, 13);
        let unit = b.finish();
        assert_eq!(checked_decls(&unit), vec![a, inner, tmpl, td]);
    }
}
