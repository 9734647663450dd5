//! Records, their fields, and enums.

use crate::anon::find_anonymous_struct_or_union_index;
use crate::session::{Session, identifiers_equivalent};
use structeq_core::diagnostics::{DiagArg, DiagId};
use structeq_ir::ast::{CAttrKey, CDeclId, CRecord};
use tracing::trace;

impl Session<'_> {
    pub(crate) fn records_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (decl1, decl2) = (&unit1[d1], &unit2[d2]);
        let (Some(r1), Some(r2)) = (decl1.as_record(), decl2.as_record()) else {
            return false;
        };

        if r1.tag != r2.tag {
            if self.diag.complain() {
                self.warn_inconsistent_tag(d2);
                self.diag
                    .diag1(decl1.loc.clone(), DiagId::TagKindHere)
                    .arg(DiagArg::quoted(unit1.decl_name(d1)))
                    .arg(r1.tag.spelling());
            }
            return false;
        }

        // anonymous members are matched by their position in the enclosing record
        if r1.is_anonymous && r2.is_anonymous {
            let index1 = find_anonymous_struct_or_union_index(unit1, d1);
            let index2 = find_anonymous_struct_or_union_index(unit2, d2);
            if let (Some(i1), Some(i2)) = (index1, index2) {
                if i1 != i2 {
                    trace!("anonymous records at positions {i1} and {i2}");
                    return false;
                }
            }
        }

        match (&r1.specialization, &r2.specialization) {
            (Some(s1), Some(s2)) => {
                if !self.decls_equivalent(s1.template, s2.template)
                    || !self.template_arg_lists_equivalent(&s1.args, &s2.args)
                {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        let (fields1, fields2) = match (&r1.fields, &r2.fields) {
            (Some(fields1), Some(fields2)) => (fields1, fields2),
            (None, None) => return true,
            (fields1, _) => {
                self.diagnose_definition_mismatch(d1, d2, fields1.is_some());
                return false;
            }
        };

        if !self.bases_equivalent(d1, r1, d2, r2) || !self.layout_attrs_equivalent(d1, r1, d2, r2) {
            return false;
        }

        for (i, &f1) in fields1.iter().enumerate() {
            let Some(&f2) = fields2.get(i) else {
                if self.diag.complain() {
                    self.warn_inconsistent_tag(d2);
                    let field1 = &unit1[f1];
                    let typ = field1.as_field().map(|f| unit1.type_name(&f.typ)).unwrap_or_default();
                    self.diag
                        .diag1(field1.loc.clone(), DiagId::Field)
                        .arg(DiagArg::quoted(unit1.decl_name(f1)))
                        .arg(DiagArg::quoted(typ));
                    self.diag.diag2(decl2.loc.clone(), DiagId::MissingField);
                }
                return false;
            };
            if !self.fields_equivalent(f1, f2) {
                return false;
            }
        }
        if let Some(&f2) = fields2.get(fields1.len()) {
            if self.diag.complain() {
                self.warn_inconsistent_tag(d2);
                let field2 = &unit2[f2];
                let typ = field2.as_field().map(|f| unit2.type_name(&f.typ)).unwrap_or_default();
                self.diag
                    .diag2(field2.loc.clone(), DiagId::Field)
                    .arg(DiagArg::quoted(unit2.decl_name(f2)))
                    .arg(DiagArg::quoted(typ));
                self.diag.diag1(decl1.loc.clone(), DiagId::MissingField);
            }
            return false;
        }
        true
    }

    fn bases_equivalent(&mut self, d1: CDeclId, r1: &CRecord, d2: CDeclId, r2: &CRecord) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        if r1.bases.len() != r2.bases.len() {
            if self.diag.complain() {
                self.warn_inconsistent_tag(d2);
                self.diag
                    .diag2(unit2[d2].loc.clone(), DiagId::NumberOfBases)
                    .arg(r2.bases.len());
                self.diag
                    .diag1(unit1[d1].loc.clone(), DiagId::NumberOfBases)
                    .arg(r1.bases.len());
            }
            return false;
        }
        for (b1, b2) in r1.bases.iter().zip(&r2.bases) {
            if !self.types_equivalent(&b1.typ, &b2.typ) {
                if self.diag.complain() {
                    self.warn_inconsistent_tag(d2);
                    self.diag
                        .diag2(b2.loc.clone(), DiagId::Base)
                        .arg(DiagArg::quoted(unit2.type_name(&b2.typ)));
                    self.diag
                        .diag1(b1.loc.clone(), DiagId::Base)
                        .arg(DiagArg::quoted(unit1.type_name(&b1.typ)));
                }
                return false;
            }
            if b1.is_virtual != b2.is_virtual {
                if self.diag.complain() {
                    let derivation = |v: bool| if v { "virtual" } else { "non-virtual" };
                    self.warn_inconsistent_tag(d2);
                    self.diag
                        .diag2(b2.loc.clone(), DiagId::VirtualBase)
                        .arg(derivation(b2.is_virtual));
                    self.diag
                        .diag1(b1.loc.clone(), DiagId::VirtualBase)
                        .arg(derivation(b1.is_virtual));
                }
                return false;
            }
        }
        true
    }

    // Layout attributes must agree: an attribute present on one side only is reported as
    // missing on the other, and differing values are reported with both effective values.
    fn layout_attrs_equivalent(&mut self, d1: CDeclId, r1: &CRecord, d2: CDeclId, r2: &CRecord) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        for key in CAttrKey::ALL {
            let spelling = key.spelling();
            match (r1.attr(key), r2.attr(key)) {
                (None, None) => {}
                (Some(a1), None) => {
                    if self.diag.complain() {
                        self.diag
                            .diag2(unit2[d2].loc.clone(), DiagId::AttributeMissing)
                            .arg(DiagArg::quoted(spelling));
                        self.diag
                            .diag1(a1.loc().clone(), DiagId::AttributeHere)
                            .arg(DiagArg::quoted(spelling));
                    }
                    return false;
                }
                (None, Some(a2)) => {
                    if self.diag.complain() {
                        self.diag
                            .diag1(unit1[d1].loc.clone(), DiagId::AttributeMissing)
                            .arg(DiagArg::quoted(spelling));
                        self.diag
                            .diag2(a2.loc().clone(), DiagId::AttributeHere)
                            .arg(DiagArg::quoted(spelling));
                    }
                    return false;
                }
                (Some(a1), Some(a2)) => {
                    if a1.bits() != a2.bits() {
                        if self.diag.complain() {
                            self.diag
                                .diag1(unit1[d1].loc.clone(), DiagId::AttributeValueInconsistent)
                                .arg(DiagArg::quoted(unit1.tag_type_name(d1)))
                                .arg(DiagArg::quoted(spelling))
                                .arg(a1.bits().unwrap_or_default())
                                .arg(a2.bits().unwrap_or_default());
                            self.diag
                                .diag2(a2.loc().clone(), DiagId::AttributeHere)
                                .arg(DiagArg::quoted(spelling));
                        }
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Fields match by name (anonymous struct/union members by their record), type, and
    /// bit-field width.
    pub(crate) fn fields_equivalent(&mut self, f1: CDeclId, f2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (decl1, decl2) = (&unit1[f1], &unit2[f2]);
        let (Some(field1), Some(field2)) = (decl1.as_field(), decl2.as_field()) else {
            return false;
        };

        if let (Some(anon1), Some(anon2)) =
            (unit1.anonymous_member_record(f1), unit2.anonymous_member_record(f2))
        {
            return self.decls_equivalent(anon1, anon2);
        }

        // diagnostics about a field are reported against its record
        let owner2 = decl2.parent;
        let name1 = DiagArg::quoted(unit1.decl_name(f1));
        let name2 = DiagArg::quoted(unit2.decl_name(f2));

        if !identifiers_equivalent(decl1.name.as_deref(), decl2.name.as_deref()) {
            if self.diag.complain() {
                self.warn_inconsistent_owner(owner2);
                self.diag.diag2(decl2.loc.clone(), DiagId::FieldName).arg(name2);
                self.diag.diag1(decl1.loc.clone(), DiagId::FieldName).arg(name1);
            }
            return false;
        }

        if !self.types_equivalent(&field1.typ, &field2.typ) {
            if self.diag.complain() {
                self.warn_inconsistent_owner(owner2);
                self.diag
                    .diag2(decl2.loc.clone(), DiagId::Field)
                    .arg(name2)
                    .arg(DiagArg::quoted(unit2.type_name(&field2.typ)));
                self.diag
                    .diag1(decl1.loc.clone(), DiagId::Field)
                    .arg(name1)
                    .arg(DiagArg::quoted(unit1.type_name(&field1.typ)));
            }
            return false;
        }

        match (field1.bit_width, field2.bit_width) {
            (None, None) => true,
            (Some(w1), Some(w2)) if w1 == w2 => true,
            (Some(w1), Some(w2)) => {
                if self.diag.complain() {
                    self.warn_inconsistent_owner(owner2);
                    self.diag
                        .diag2(decl2.loc.clone(), DiagId::BitField)
                        .arg(name2)
                        .arg(DiagArg::quoted(unit2.type_name(&field2.typ)))
                        .arg(w2);
                    self.diag
                        .diag1(decl1.loc.clone(), DiagId::BitField)
                        .arg(name1)
                        .arg(DiagArg::quoted(unit1.type_name(&field1.typ)))
                        .arg(w1);
                }
                false
            }
            (Some(w1), None) => {
                if self.diag.complain() {
                    self.warn_inconsistent_owner(owner2);
                    self.diag
                        .diag1(decl1.loc.clone(), DiagId::BitField)
                        .arg(name1)
                        .arg(DiagArg::quoted(unit1.type_name(&field1.typ)))
                        .arg(w1);
                    self.diag.diag2(decl2.loc.clone(), DiagId::NotBitField).arg(name2);
                }
                false
            }
            (None, Some(w2)) => {
                if self.diag.complain() {
                    self.warn_inconsistent_owner(owner2);
                    self.diag
                        .diag2(decl2.loc.clone(), DiagId::BitField)
                        .arg(name2)
                        .arg(DiagArg::quoted(unit2.type_name(&field2.typ)))
                        .arg(w2);
                    self.diag.diag1(decl1.loc.clone(), DiagId::NotBitField).arg(name1);
                }
                false
            }
        }
    }

    /// Enumerators must agree in order, name and value. Two forward-declared enums are
    /// equivalent; a forward declaration never matches a definition.
    pub(crate) fn enums_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (decl1, decl2) = (&unit1[d1], &unit2[d2]);
        let (Some(e1), Some(e2)) = (decl1.as_enum(), decl2.as_enum()) else {
            return false;
        };
        let (consts1, consts2) = match (&e1.enumerators, &e2.enumerators) {
            (Some(consts1), Some(consts2)) => (consts1, consts2),
            (None, None) => return true,
            (consts1, _) => {
                self.diagnose_definition_mismatch(d1, d2, consts1.is_some());
                return false;
            }
        };

        let value_of = |unit: &structeq_ir::ast::CCompUnit, id: CDeclId| {
            unit[id].as_enumerator().map(|c| c.value.to_string()).unwrap_or_default()
        };
        for (i, &c1) in consts1.iter().enumerate() {
            let Some(&c2) = consts2.get(i) else {
                if self.diag.complain() {
                    self.warn_inconsistent_tag(d2);
                    self.diag
                        .diag1(unit1[c1].loc.clone(), DiagId::Enumerator)
                        .arg(DiagArg::quoted(unit1.decl_name(c1)))
                        .arg(value_of(unit1, c1).as_str());
                    self.diag.diag2(decl2.loc.clone(), DiagId::MissingEnumerator);
                }
                return false;
            };
            let (const1, const2) = (&unit1[c1], &unit2[c2]);
            let same_value = match (const1.as_enumerator(), const2.as_enumerator()) {
                (Some(v1), Some(v2)) => v1.value.same_value(v2.value),
                _ => false,
            };
            if !same_value || !identifiers_equivalent(const1.name.as_deref(), const2.name.as_deref()) {
                if self.diag.complain() {
                    self.warn_inconsistent_tag(d2);
                    self.diag
                        .diag2(const2.loc.clone(), DiagId::Enumerator)
                        .arg(DiagArg::quoted(unit2.decl_name(c2)))
                        .arg(value_of(unit2, c2).as_str());
                    self.diag
                        .diag1(const1.loc.clone(), DiagId::Enumerator)
                        .arg(DiagArg::quoted(unit1.decl_name(c1)))
                        .arg(value_of(unit1, c1).as_str());
                }
                return false;
            }
        }
        if let Some(&c2) = consts2.get(consts1.len()) {
            if self.diag.complain() {
                self.warn_inconsistent_tag(d2);
                self.diag
                    .diag2(unit2[c2].loc.clone(), DiagId::Enumerator)
                    .arg(DiagArg::quoted(unit2.decl_name(c2)))
                    .arg(value_of(unit2, c2).as_str());
                self.diag.diag1(decl1.loc.clone(), DiagId::MissingEnumerator);
            }
            return false;
        }
        true
    }

    // "type 'X' has incompatible definitions", against the second unit's tag declaration
    fn warn_inconsistent_tag(&mut self, d2: CDeclId) {
        let unit2 = self.unit2;
        self.diag
            .diag2(unit2[d2].loc.clone(), DiagId::TagTypeInconsistent)
            .arg(DiagArg::quoted(unit2.tag_type_name(d2)));
    }

    // One of the pair is a definition and the other only a declaration.
    fn diagnose_definition_mismatch(&mut self, d1: CDeclId, d2: CDeclId, first_defined: bool) {
        if !self.diag.complain() {
            return;
        }
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (loc1, loc2) = (unit1[d1].loc.clone(), unit2[d2].loc.clone());
        let (id1, id2) = if first_defined {
            (DiagId::DefinitionHere, DiagId::NoDefinition)
        } else {
            (DiagId::NoDefinition, DiagId::DefinitionHere)
        };
        self.warn_inconsistent_tag(d2);
        self.diag.diag2(loc2, id2).arg(DiagArg::quoted(unit2.tag_type_name(d2)));
        self.diag.diag1(loc1, id1).arg(DiagArg::quoted(unit1.tag_type_name(d1)));
    }

    fn warn_inconsistent_owner(&mut self, owner2: Option<CDeclId>) {
        if let Some(owner2) = owner2 {
            self.warn_inconsistent_tag(owner2);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{NonEquivalentSet, Session};
    use structeq_core::Config;
    use structeq_core::diagnostics::Diagnostic;
    use structeq_ir::UnitBuilder;
    use structeq_ir::ast::*;

    fn int() -> CQualType {
        CQualType::prim(CPrimType::Int)
    }

    fn compare(
        u1: &CCompUnit,
        u2: &CCompUnit,
        d1: CDeclId,
        d2: CDeclId,
    ) -> (bool, Vec<Diagnostic>, Vec<Diagnostic>) {
        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(u1, u2, &mut set, &Config::mock());
        let equivalent = session.is_equivalent_decls(d1, d2);
        let (first, second) = session.into_diagnostics();
        (equivalent, first, second)
    }

    fn messages(diags: &[Diagnostic]) -> Vec<String> {
        diags.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn tag_kind_mismatch() {
        let mut b1 = UnitBuilder::new("a.c");
        let s = b1.record(Some("U"), CTagKind::Struct, 1, 8);
        let mut b2 = UnitBuilder::new("b.c");
        let u = b2.record(Some("U"), CTagKind::Union, 1, 7);
        let (u1, u2) = (b1.finish(), b2.finish());
        let (equivalent, first, second) = compare(&u1, &u2, s, u);
        assert!(!equivalent);
        assert_eq!(
            messages(&second),
            ["b.c:1:7: warning: type 'U' has incompatible definitions in different translation units"]
        );
        assert_eq!(messages(&first), ["a.c:1:8: note: 'U' is a struct here"]);
    }

    #[test]
    fn field_type_mismatch() {
        let mut b1 = UnitBuilder::new("a.c");
        let s1 = b1.record(Some("S"), CTagKind::Struct, 1, 8);
        b1.field(s1, Some("x"), int(), 2, 7);
        let mut b2 = UnitBuilder::new("b.c");
        let s2 = b2.record(Some("S"), CTagKind::Struct, 1, 8);
        b2.field(s2, Some("x"), CQualType::ptr(int()), 2, 8);
        let (u1, u2) = (b1.finish(), b2.finish());
        let (equivalent, first, second) = compare(&u1, &u2, s1, s2);
        assert!(!equivalent);
        assert_eq!(
            messages(&second),
            [
                "b.c:1:8: warning: type 'S' has incompatible definitions in different translation units",
                "b.c:2:8: note: field 'x' has type 'int *' here",
            ]
        );
        assert_eq!(messages(&first), ["a.c:2:7: note: field 'x' has type 'int' here"]);
    }

    #[test]
    fn missing_and_extra_fields() {
        let mut b1 = UnitBuilder::new("a.c");
        let s1 = b1.record(Some("S"), CTagKind::Struct, 1, 8);
        b1.field(s1, Some("x"), int(), 2, 7);
        b1.field(s1, Some("y"), int(), 3, 7);
        let mut b2 = UnitBuilder::new("b.c");
        let s2 = b2.record(Some("S"), CTagKind::Struct, 1, 8);
        b2.field(s2, Some("x"), int(), 2, 7);
        let (u1, u2) = (b1.finish(), b2.finish());

        let (equivalent, first, second) = compare(&u1, &u2, s1, s2);
        assert!(!equivalent);
        assert_eq!(messages(&first), ["a.c:3:7: note: field 'y' has type 'int' here"]);
        assert_eq!(messages(&second)[1], "b.c:1:8: note: no corresponding field here");

        let (equivalent, first, second) = compare(&u2, &u1, s2, s1);
        assert!(!equivalent);
        assert_eq!(messages(&first), ["b.c:1:8: note: no corresponding field here"]);
        assert_eq!(messages(&second)[1], "a.c:3:7: note: field 'y' has type 'int' here");
    }

    #[test]
    fn bit_fields() {
        let build = |file: &str, width: Option<u32>| {
            let mut b = UnitBuilder::new(file);
            let s = b.record(Some("F"), CTagKind::Struct, 1, 8);
            match width {
                Some(w) => b.bit_field(s, Some("flags"), int(), w, 2, 7),
                None => b.field(s, Some("flags"), int(), 2, 7),
            };
            (b.finish(), s)
        };
        let (u3, s3) = build("a.c", Some(3));
        let (u4, s4) = build("b.c", Some(4));
        let (plain, sp) = build("c.c", None);

        let (equivalent, first, _) = compare(&u3, &u4, s3, s4);
        assert!(!equivalent);
        assert_eq!(
            messages(&first),
            ["a.c:2:7: note: bit-field 'flags' with type 'int' and length 3 here"]
        );
        let (equivalent, first, second) = compare(&u3, &plain, s3, sp);
        assert!(!equivalent);
        assert_eq!(messages(&second)[1], "c.c:2:7: note: field 'flags' is not a bit-field");
        assert_eq!(first.len(), 1);
        assert!(compare(&u3, &build("d.c", Some(3)).0, s3, s3).0);
    }

    #[test]
    fn bases() {
        let build = |file: &str, is_virtual: bool| {
            let mut b = UnitBuilder::new(file);
            let base = b.record(Some("B"), CTagKind::Class, 1, 7);
            let derived = b.record(Some("D"), CTagKind::Class, 2, 7);
            b.base(derived, CQualType::record(base), is_virtual, 2, 11);
            (b.finish(), derived)
        };
        let (u1, d1) = build("a.cpp", false);
        let (u2, d2) = build("b.cpp", true);
        let (equivalent, first, second) = compare(&u1, &u2, d1, d2);
        assert!(!equivalent);
        assert_eq!(messages(&second)[1], "b.cpp:2:11: note: virtual derivation here");
        assert_eq!(messages(&first), ["a.cpp:2:11: note: non-virtual derivation here"]);

        let (u3, d3) = build("c.cpp", false);
        assert!(compare(&u1, &u3, d1, d3).0);
    }

    #[test]
    fn enums() {
        let build = |file: &str, consts: &[(&str, i64)]| {
            let mut b = UnitBuilder::new(file);
            let e = b.enumeration(Some("E"), 1, 6);
            for (line, (name, value)) in consts.iter().enumerate() {
                b.enumerator(e, name, *value, line as u32 + 2, 3);
            }
            (b.finish(), e)
        };
        let (u1, e1) = build("a.c", &[("A", 0), ("B", 1)]);
        let (u2, e2) = build("b.c", &[("A", 0), ("B", 2)]);
        let (u3, e3) = build("c.c", &[("A", 0)]);
        let (u4, e4) = build("d.c", &[("A", 0), ("B", 1)]);

        let (equivalent, first, second) = compare(&u1, &u2, e1, e2);
        assert!(!equivalent);
        assert_eq!(messages(&second)[1], "b.c:3:3: note: enumerator 'B' with value 2 here");
        assert_eq!(messages(&first), ["a.c:3:3: note: enumerator 'B' with value 1 here"]);

        let (equivalent, _, second) = compare(&u1, &u3, e1, e3);
        assert!(!equivalent);
        assert_eq!(messages(&second)[1], "c.c:1:6: note: no corresponding enumerator here");

        assert!(compare(&u1, &u4, e1, e4).0);

        let mut b = UnitBuilder::new("e.c");
        let fwd = b.forward_enum("E", int(), 1, 6);
        let u5 = b.finish();
        assert!(!compare(&u1, &u5, e1, fwd).0);
        assert!(compare(&u5, &u5, fwd, fwd).0);
    }

    #[test]
    fn forward_declarations_only_match_forward_declarations() {
        let mut b1 = UnitBuilder::new("a.c");
        let s1 = b1.record(Some("S"), CTagKind::Struct, 1, 8);
        b1.field(s1, Some("x"), int(), 1, 16);
        let mut b2 = UnitBuilder::new("b.c");
        let s2 = b2.forward_record("S", CTagKind::Struct, 1, 8);
        let mut b3 = UnitBuilder::new("c.c");
        let s3 = b3.forward_record("S", CTagKind::Struct, 2, 8);
        let (u1, u2, u3) = (b1.finish(), b2.finish(), b3.finish());

        let (equivalent, first, second) = compare(&u1, &u2, s1, s2);
        assert!(!equivalent);
        assert_eq!(
            messages(&second),
            [
                "b.c:1:8: warning: type 'S' has incompatible definitions in different translation units",
                "b.c:1:8: note: 'S' is declared here without a definition",
            ]
        );
        assert_eq!(messages(&first), ["a.c:1:8: note: 'S' is defined here"]);

        let (equivalent, first, _) = compare(&u2, &u1, s2, s1);
        assert!(!equivalent);
        assert_eq!(messages(&first), ["b.c:1:8: note: 'S' is declared here without a definition"]);

        assert!(compare(&u2, &u3, s2, s3).0);
    }

    #[test]
    fn mismatched_names_are_reported_on_both_sides() {
        // struct S { struct A *p; };   vs   struct S { struct B *p; };
        let build = |file: &str, pointee: &str| {
            let mut b = UnitBuilder::new(file);
            let target = b.record(Some(pointee), CTagKind::Struct, 1, 8);
            b.field(target, Some("x"), int(), 1, 16);
            let s = b.record(Some("S"), CTagKind::Struct, 2, 8);
            b.field(s, Some("p"), CQualType::ptr(CQualType::record(target)), 2, 22);
            (b.finish(), s)
        };
        let (u1, s1) = build("a.c", "A");
        let (u2, s2) = build("b.c", "B");
        let (equivalent, first, second) = compare(&u1, &u2, s1, s2);
        assert!(!equivalent);
        assert_eq!(
            messages(&second),
            [
                "b.c:1:8: warning: type 'B' has incompatible definitions in different translation units",
                "b.c:1:8: note: declared here with name 'B'",
            ]
        );
        assert_eq!(messages(&first), ["a.c:1:8: note: declared here with name 'A'"]);
    }

    #[test]
    fn unnamed_records_go_by_their_typedef_name() {
        // typedef struct { int x; } P;   vs   typedef struct { int x; } Q;
        let build = |file: &str, alias: &str| {
            let mut b = UnitBuilder::new(file);
            let rec = b.record(None, CTagKind::Struct, 1, 9);
            b.field(rec, Some("x"), int(), 1, 22);
            b.typedef_name(rec, alias);
            b.typedef(alias, CQualType::record(rec), 1, 27);
            (b.finish(), rec)
        };
        let (u1, p1) = build("a.c", "P");
        let (u2, p2) = build("b.c", "P");
        let (u3, q3) = build("c.c", "Q");
        assert_eq!(u1[p1].tag_name(), Some("P"));
        assert!(compare(&u1, &u2, p1, p2).0);

        let (equivalent, first, second) = compare(&u1, &u3, p1, q3);
        assert!(!equivalent);
        assert_eq!(messages(&second)[1], "c.c:1:9: note: declared here with name 'Q'");
        assert_eq!(messages(&first), ["a.c:1:9: note: declared here with name 'P'"]);
    }
}
