//! The equivalence session: the tentative-equivalence memo, the work queue, and the driver that
//! drains it.

use crate::diag::Emitter;
use std::collections::{HashMap, HashSet, VecDeque};
use structeq_core::Config;
use structeq_core::diagnostics::{Collector, DiagArg, DiagId, Diagnostic};
use structeq_ir::ast::{CCompUnit, CDeclId, CDeclKind, CQualType};
use tracing::{debug, trace};

/// Pairs (declaration of the first unit, declaration of the second unit) already known not to
/// be equivalent. Owned by the caller so that a batch of sessions reports each violation once.
pub type NonEquivalentSet = HashSet<(CDeclId, CDeclId)>;

/// One comparison run between two units.
///
/// A session is meant for a single top-level question (or a short sequence of them that all
/// succeed). After a check fails, pairs that were queued but never verified stay assumed, so the
/// session should be dropped.
pub struct Session<'a> {
    pub(crate) unit1: &'a CCompUnit,
    pub(crate) unit2: &'a CCompUnit,
    non_equivalent: &'a mut NonEquivalentSet,
    // d1 -> the d2 it is assumed equivalent to; never overwritten
    tentative: HashMap<CDeclId, CDeclId>,
    // the inverse of `tentative`, so that no d2 is paired with two declarations
    paired: HashMap<CDeclId, CDeclId>,
    // first-unit declarations whose assumed equivalence still needs checking
    queue: VecDeque<CDeclId>,
    pub(crate) strict: bool,
    pub(crate) diag: Emitter,
}

impl<'a> Session<'a> {
    pub fn new(
        unit1: &'a CCompUnit,
        unit2: &'a CCompUnit,
        non_equivalent: &'a mut NonEquivalentSet,
        config: &Config,
    ) -> Session<'a> {
        Session {
            unit1,
            unit2,
            non_equivalent,
            tentative: HashMap::new(),
            paired: HashMap::new(),
            queue: VecDeque::new(),
            strict: config.strict_spelling,
            diag: Emitter::new(&unit1.name, &unit2.name, config),
        }
    }

    /// Determines whether `d1` (of the first unit) and `d2` (of the second) are structurally
    /// equivalent. On failure the pair is added to the non-equivalent set and, if the session
    /// complains, the first mismatch found is described by the collected diagnostics.
    pub fn is_equivalent_decls(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (decl1, decl2) = (&unit1[d1], &unit2[d2]);
        if !decl1.same_kind(decl2) {
            debug!(
                "{:?} is a {} but {:?} is a {}",
                d1,
                decl1.kind.kind_name(),
                d2,
                decl2.kind.kind_name()
            );
            if self.diag.complain() {
                self.diag
                    .diag2(decl2.loc.clone(), DiagId::DeclKindMismatch)
                    .arg(DiagArg::quoted(unit2.decl_name(d2)))
                    .arg(decl1.kind.kind_name())
                    .arg(decl2.kind.kind_name());
                self.diag
                    .diag1(decl1.loc.clone(), DiagId::DeclKindHere)
                    .arg(decl1.kind.kind_name());
            }
            self.non_equivalent.insert((d1, d2));
            return false;
        }
        let equivalent = self.decls_equivalent(d1, d2) && self.finish();
        if !equivalent {
            self.non_equivalent.insert((d1, d2));
        }
        equivalent
    }

    /// Determines whether `t1` (a type of the first unit) and `t2` (of the second) are
    /// structurally equivalent.
    pub fn is_equivalent_types(&mut self, t1: &CQualType, t2: &CQualType) -> bool {
        self.types_equivalent(t1, t2) && self.finish()
    }

    pub fn diagnostics1(&self) -> &Collector {
        self.diag.first()
    }

    pub fn diagnostics2(&self) -> &Collector {
        self.diag.second()
    }

    /// The diagnostics reported against the first and the second unit.
    pub fn into_diagnostics(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        self.diag.into_diagnostics()
    }

    /// The declaration-level check used by every rule. Answers from the non-equivalent set or
    /// the memo when possible; otherwise assumes the pair equivalent and queues it. Only the
    /// verification done by `finish` can turn such an assumption into a failure.
    pub(crate) fn decls_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        if self.non_equivalent.contains(&(d1, d2)) {
            return false;
        }
        if let Some(&assumed) = self.tentative.get(&d1) {
            return assumed == d2;
        }
        if let Some(&other) = self.paired.get(&d2) {
            trace!("{d2:?} is already paired with {other:?}");
            return false;
        }
        let (unit1, unit2) = (self.unit1, self.unit2);
        match (unit1.get(d1), unit2.get(d2)) {
            (Some(decl1), Some(decl2)) if decl1.same_kind(decl2) => {}
            _ => return false,
        }
        trace!("assuming {d1:?} ~ {d2:?}");
        self.tentative.insert(d1, d2);
        self.paired.insert(d2, d1);
        self.queue.push_back(d1);
        true
    }

    /// Verifies queued pairs until the queue is empty (returns true) or one of them turns out not
    /// to be equivalent (returns false, leaving the rest of the queue).
    pub(crate) fn finish(&mut self) -> bool {
        while let Some(d1) = self.queue.pop_front() {
            let Some(&d2) = self.tentative.get(&d1) else {
                continue;
            };
            if !self.check_pair(d1, d2) {
                debug!(
                    "{} {:?} and {} {:?} are not equivalent",
                    self.unit1.name, d1, self.unit2.name, d2
                );
                self.non_equivalent.insert((d1, d2));
                return false;
            }
        }
        true
    }

    fn check_pair(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (decl1, decl2) = (&unit1[d1], &unit2[d2]);
        match (&decl1.kind, &decl2.kind) {
            (CDeclKind::Record(_), CDeclKind::Record(_)) | (CDeclKind::Enum(_), CDeclKind::Enum(_)) => {
                if !self.names_equivalent(d1, decl1.tag_name(), d2, decl2.tag_name()) {
                    return false;
                }
                match decl1.kind {
                    CDeclKind::Record(_) => self.records_equivalent(d1, d2),
                    _ => self.enums_equivalent(d1, d2),
                }
            }
            (CDeclKind::Typedef(td1), CDeclKind::Typedef(td2)) => {
                self.names_equivalent(d1, decl1.name.as_deref(), d2, decl2.name.as_deref())
                    && self.types_equivalent(&td1.typ, &td2.typ)
            }
            (CDeclKind::ClassTemplate(ct1), CDeclKind::ClassTemplate(ct2)) => {
                self.class_templates_equivalent(ct1, ct2)
            }
            (CDeclKind::TemplateTypeParm(_), CDeclKind::TemplateTypeParm(_)) => {
                self.type_parms_equivalent(d1, d2)
            }
            (CDeclKind::NonTypeTemplateParm(_), CDeclKind::NonTypeTemplateParm(_)) => {
                self.non_type_parms_equivalent(d1, d2)
            }
            (CDeclKind::TemplateTemplateParm(_), CDeclKind::TemplateTemplateParm(_)) => {
                self.template_template_parms_equivalent(d1, d2)
            }
            (CDeclKind::Field(_), CDeclKind::Field(_)) => self.fields_equivalent(d1, d2),
            (CDeclKind::Enumerator(c1), CDeclKind::Enumerator(c2)) => {
                self.names_equivalent(d1, decl1.name.as_deref(), d2, decl2.name.as_deref())
                    && c1.value.same_value(c2.value)
            }
            (CDeclKind::Namespace, CDeclKind::Namespace) => {
                self.names_equivalent(d1, decl1.name.as_deref(), d2, decl2.name.as_deref())
            }
            (CDeclKind::Var(t1), CDeclKind::Var(t2))
            | (CDeclKind::Function(t1), CDeclKind::Function(t2)) => {
                self.names_equivalent(d1, decl1.name.as_deref(), d2, decl2.name.as_deref())
                    && self.types_equivalent(t1, t2)
            }
            _ => false,
        }
    }

    // Compares the names a pair of declarations is matched by; a mismatch is reported against
    // the second declaration with the names noted on both sides.
    fn names_equivalent(
        &mut self,
        d1: CDeclId,
        name1: Option<&str>,
        d2: CDeclId,
        name2: Option<&str>,
    ) -> bool {
        if identifiers_equivalent(name1, name2) {
            return true;
        }
        if self.diag.complain() {
            let (unit1, unit2) = (self.unit1, self.unit2);
            let shown = |name: Option<&str>| match name {
                Some(name) => DiagArg::quoted(name),
                None => DiagArg::from("(anonymous)"),
            };
            self.diag
                .diag2(unit2[d2].loc.clone(), DiagId::TagTypeInconsistent)
                .arg(DiagArg::quoted(unit2.tag_type_name(d2)));
            self.diag
                .diag2(unit2[d2].loc.clone(), DiagId::NameHere)
                .arg(shown(name2));
            self.diag
                .diag1(unit1[d1].loc.clone(), DiagId::NameHere)
                .arg(shown(name1));
        }
        false
    }
}

/// Identifiers are equivalent when spelled the same; two missing names are equivalent.
pub(crate) fn identifiers_equivalent(name1: Option<&str>, name2: Option<&str>) -> bool {
    name1 == name2
}

#[cfg(test)]
mod tests {
    use super::*;
    use structeq_ir::UnitBuilder;
    use structeq_ir::ast::{CPrimType, CTagKind};

    fn pair_of_records() -> (CCompUnit, CCompUnit, CDeclId, CDeclId) {
        let mut b1 = UnitBuilder::new("a.c");
        let s1 = b1.record(Some("S"), CTagKind::Struct, 1, 8);
        b1.field(s1, Some("x"), CQualType::prim(CPrimType::Int), 1, 16);
        let mut b2 = UnitBuilder::new("b.c");
        let s2 = b2.record(Some("S"), CTagKind::Struct, 3, 8);
        b2.field(s2, Some("x"), CQualType::prim(CPrimType::Int), 3, 16);
        (b1.finish(), b2.finish(), s1, s2)
    }

    #[test]
    fn memo_is_single_assignment() {
        let (u1, u2, s1, s2) = pair_of_records();
        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(&u1, &u2, &mut set, &Config::mock());
        assert!(session.decls_equivalent(s1, s2));
        // a second target for s1 contradicts the assumption
        assert!(!session.decls_equivalent(s1, CDeclId(s2.0 + 1)));
        // and so does a second source for s2
        assert!(!session.decls_equivalent(CDeclId(s1.0 + 1), s2));
        assert!(session.decls_equivalent(s1, s2));
        assert_eq!(session.queue.len(), 1);
        assert!(session.finish());
        assert!(session.queue.is_empty());
    }

    #[test]
    fn known_failures_short_circuit() {
        let (u1, u2, s1, s2) = pair_of_records();
        let mut set = NonEquivalentSet::new();
        set.insert((s1, s2));
        let mut session = Session::new(&u1, &u2, &mut set, &Config::mock());
        assert!(!session.is_equivalent_decls(s1, s2));
        assert!(session.diagnostics1().diagnostics().is_empty());
        assert!(session.diagnostics2().diagnostics().is_empty());
    }

    #[test]
    fn root_kind_mismatch() {
        let mut b1 = UnitBuilder::new("a.c");
        let s1 = b1.record(Some("T"), CTagKind::Struct, 1, 8);
        let mut b2 = UnitBuilder::new("b.c");
        let t2 = b2.typedef("T", CQualType::prim(CPrimType::Int), 1, 13);
        let (u1, u2) = (b1.finish(), b2.finish());
        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(&u1, &u2, &mut set, &Config::mock());
        assert!(!session.is_equivalent_decls(s1, t2));
        assert!(session.queue.is_empty());
        let (first, second) = session.into_diagnostics();
        assert_eq!(
            second[0].to_string(),
            "b.c:1:13: error: declaration 'T' has incompatible kinds in different translation \
             units (record vs. typedef)"
        );
        assert_eq!(first[0].to_string(), "a.c:1:8: note: declared here as record");
        assert!(set.contains(&(s1, t2)));
    }
}
