//! Type comparison. Types are compared eagerly; a type that names a declaration (a record, an
//! enum, a typedef in strict mode) defers to the declaration check, which queues the pair.

use crate::session::Session;
use structeq_ir::ast::{CArraySizeMod, CCompUnit, CDeclId, CExceptionSpec, CFuncType, CQualType, CType};

impl Session<'_> {
    pub(crate) fn types_equivalent(&mut self, t1: &CQualType, t2: &CQualType) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let ((ty1, quals1), (ty2, quals2)) = if self.strict {
            ((&*t1.typ, t1.quals), (&*t2.typ, t2.quals))
        } else {
            (unit1.desugar(t1), unit2.desugar(t2))
        };
        // qualifiers are part of the type in every mode
        if quals1 != quals2 {
            return false;
        }

        if !self.strict {
            match (self.record_of(ty1), self.record_of(ty2)) {
                (Some(r1), Some(r2)) => return self.decls_equivalent(r1, r2),
                (Some(_), None) | (None, Some(_)) => return false,
                (None, None) => {}
            }
            if let (Some(p1), Some(p2)) = (pointee(unit1, ty1), pointee(unit2, ty2)) {
                return self.types_equivalent(p1, p2);
            }
        }

        self.type_structures_equivalent(ty1, ty2)
    }

    #[rustfmt::skip]
    fn type_structures_equivalent(&mut self, ty1: &CType, ty2: &CType) -> bool {
        use CType::*;

        match (ty1, ty2) {
            (Void, Void) => true,
            (Prim(p1), Prim(p2)) => p1 == p2,
            (Complex(p1), Complex(p2)) => p1 == p2,
            (Ptr(a), Ptr(b))
            | (LValueRef(a), LValueRef(b))
            | (RValueRef(a), RValueRef(b))
            | (Paren(a), Paren(b))
            | (Decayed(a), Decayed(b))
            | (PackExpansion(a), PackExpansion(b))
            | (Atomic(a), Atomic(b)) => self.types_equivalent(a, b),
            (MemberPtr(a, c1), MemberPtr(b, c2)) => {
                self.types_equivalent(a, b) && self.decls_equivalent(*c1, *c2)
            }
            (ConstSizeArray(e1, n1, m1), ConstSizeArray(e2, n2, m2)) => {
                n1 == n2 && self.arrays_equivalent(e1, *m1, e2, *m2)
            }
            (NoSizeArray(e1, m1), NoSizeArray(e2, m2))
            | (VarSizeArray(e1, _, m1), VarSizeArray(e2, _, m2))
            | (DependentSizedArray(e1, _, m1), DependentSizedArray(e2, _, m2)) => {
                self.arrays_equivalent(e1, *m1, e2, *m2)
            }
            (Vector(e1, n1), Vector(e2, n2)) => n1 == n2 && self.types_equivalent(e1, e2),
            (Func(f1), Func(f2)) => self.functions_equivalent(f1, f2),
            (Typedef(d1), Typedef(d2))
            | (Record(d1), Record(d2))
            | (Enum(d1), Enum(d2)) => self.decls_equivalent(*d1, *d2),
            (Elaborated(k1, q1, a), Elaborated(k2, q2, b)) => {
                k1 == k2
                    && self.opt_prefixes_equivalent(q1.as_ref(), q2.as_ref())
                    && self.types_equivalent(a, b)
            }
            (
                TemplateTypeParm { depth: d1, index: i1, is_pack: p1 },
                TemplateTypeParm { depth: d2, index: i2, is_pack: p2 },
            ) => d1 == d2 && i1 == i2 && p1 == p2,
            (
                TemplateSpecialization { template: n1, args: a1, .. },
                TemplateSpecialization { template: n2, args: a2, .. },
            ) => self.template_names_equivalent(n1, n2) && self.template_arg_lists_equivalent(a1, a2),
            (DependentName(q1, n1), DependentName(q2, n2)) => {
                n1 == n2 && self.opt_prefixes_equivalent(q1.as_ref(), q2.as_ref())
            }
            (TypeOfExpr(e1), TypeOfExpr(e2))
            | (Decltype(e1), Decltype(e2)) => self.exprs_equivalent(e1, e2),
            _ => false,
        }
    }

    // the record a type canonically names, looking through instantiated specializations
    fn record_of(&self, ty: &CType) -> Option<CDeclId> {
        match ty {
            CType::Record(id) => Some(*id),
            CType::TemplateSpecialization { canonical: Some(id), .. } => Some(*id),
            _ => None,
        }
    }

    /// The part common to all array types: the element type and the size modifier.
    pub(crate) fn arrays_equivalent(
        &mut self,
        elem1: &CQualType,
        mod1: CArraySizeMod,
        elem2: &CQualType,
        mod2: CArraySizeMod,
    ) -> bool {
        mod1 == mod2 && self.types_equivalent(elem1, elem2)
    }

    pub(crate) fn functions_equivalent(&mut self, f1: &CFuncType, f2: &CFuncType) -> bool {
        let (a1, a2) = (f1.annotations, f2.annotations);
        // a function without a prototype only constrains the return type
        if a1.has_prototype && a2.has_prototype {
            if f1.ptyps.len() != f2.ptyps.len() || a1.is_var_arg != a2.is_var_arg {
                return false;
            }
            for (p1, p2) in f1.ptyps.iter().zip(&f2.ptyps) {
                if !self.types_equivalent(p1, p2) {
                    return false;
                }
            }
            if self.strict
                && (f1.quals != f2.quals
                    || !self.exception_specs_equivalent(&f1.exception_spec, &f2.exception_spec))
            {
                return false;
            }
        }
        a1.is_noreturn == a2.is_noreturn && self.types_equivalent(&f1.rtyp, &f2.rtyp)
    }

    fn exception_specs_equivalent(&mut self, s1: &CExceptionSpec, s2: &CExceptionSpec) -> bool {
        match (s1, s2) {
            (CExceptionSpec::None, CExceptionSpec::None)
            | (CExceptionSpec::DynamicNone, CExceptionSpec::DynamicNone)
            | (CExceptionSpec::Noexcept, CExceptionSpec::Noexcept) => true,
            (CExceptionSpec::Dynamic(e1), CExceptionSpec::Dynamic(e2)) => {
                e1.len() == e2.len()
                    && e1.iter().zip(e2).all(|(t1, t2)| self.types_equivalent(t1, t2))
            }
            _ => false,
        }
    }
}

// What a pointer, or a parameter adjusted to one, points to: an array parameter decays to a
// pointer to its element and a function parameter to a pointer to the function.
fn pointee<'u>(unit: &'u CCompUnit, ty: &'u CType) -> Option<&'u CQualType> {
    match ty {
        CType::Ptr(p) => Some(p),
        CType::Decayed(orig) => match unit.desugar(orig).0 {
            CType::ConstSizeArray(elem, ..)
            | CType::NoSizeArray(elem, _)
            | CType::VarSizeArray(elem, ..)
            | CType::DependentSizedArray(elem, ..) => Some(elem),
            _ => Some(orig),
        },
        _ => None,
    }
}
