//! Comparison of the expressions embedded in types (array bounds, non-type template arguments,
//! `decltype`), template arguments, template names and nested-name-specifiers.
//!
//! Expression comparison is structural over constant-expression shapes: literals, references to
//! declarations, unary/binary/conditional operators, `sizeof`/`alignof` of a type, and explicit
//! casts. Parentheses and implicit conversions are looked through. Anything else is kept by the
//! model as its spelling and is only equivalent to an expression spelled the same way, up to
//! whitespace.

use crate::session::Session;
use structeq_ir::ast::{CDeclId, CExpr, CNestedNameSpec, CNestedNameSpecKind, CTemplateArg, CTemplateName};

impl Session<'_> {
    #[rustfmt::skip]
    pub(crate) fn exprs_equivalent(&mut self, e1: &CExpr, e2: &CExpr) -> bool {
        use CExpr::*;

        match (e1.ignore_parens_and_implicit(), e2.ignore_parens_and_implicit()) {
            (IntLiteral(v1), IntLiteral(v2)) => v1.same_value(*v2),
            (CharLiteral(c1), CharLiteral(c2)) => c1 == c2,
            (BoolLiteral(b1), BoolLiteral(b2)) => b1 == b2,
            (DeclRef(d1), DeclRef(d2)) => self.decls_equivalent(*d1, *d2),
            (Unary(op1, a), Unary(op2, b)) => op1 == op2 && self.exprs_equivalent(a, b),
            (Binary(op1, l1, r1), Binary(op2, l2, r2)) => {
                op1 == op2 && self.exprs_equivalent(l1, l2) && self.exprs_equivalent(r1, r2)
            }
            (Ternary(c1, t1, f1), Ternary(c2, t2, f2)) => {
                self.exprs_equivalent(c1, c2)
                    && self.exprs_equivalent(t1, t2)
                    && self.exprs_equivalent(f1, f2)
            }
            (UnaryOfType(op1, t1), UnaryOfType(op2, t2)) => {
                op1 == op2 && self.types_equivalent(t1, t2)
            }
            (ExplicitCast(t1, a), ExplicitCast(t2, b)) => {
                self.types_equivalent(t1, t2) && self.exprs_equivalent(a, b)
            }
            (Opaque(s1), Opaque(s2)) => canonical_spelling(s1) == canonical_spelling(s2),
            _ => false,
        }
    }

    pub(crate) fn opt_prefixes_equivalent(
        &mut self,
        nns1: Option<&CNestedNameSpec>,
        nns2: Option<&CNestedNameSpec>,
    ) -> bool {
        match (nns1, nns2) {
            (None, None) => true,
            (Some(n1), Some(n2)) => self.prefixes_equivalent(n1, n2),
            _ => false,
        }
    }

    /// Nested-name-specifiers are equivalent when they are of the same kind, name equivalent
    /// entities, and have equivalent prefixes.
    pub(crate) fn prefixes_equivalent(&mut self, nns1: &CNestedNameSpec, nns2: &CNestedNameSpec) -> bool {
        use CNestedNameSpecKind::*;

        if !self.opt_prefixes_equivalent(nns1.prefix.as_deref(), nns2.prefix.as_deref()) {
            return false;
        }
        match (&nns1.kind, &nns2.kind) {
            (Identifier(i1), Identifier(i2)) => i1 == i2,
            (Namespace(d1), Namespace(d2)) | (Super(d1), Super(d2)) => {
                self.decls_equivalent(*d1, *d2)
            }
            (TypeSpec(t1), TypeSpec(t2)) => self.types_equivalent(t1, t2),
            (Global, Global) => true,
            _ => false,
        }
    }

    // Outside strict mode `ns::tmpl` names the same template as `tmpl`.
    fn named_template(&self, name: &CTemplateName) -> Option<CDeclId> {
        match name {
            CTemplateName::Template(id) => Some(*id),
            CTemplateName::Qualified(_, id) if !self.strict => Some(*id),
            _ => None,
        }
    }

    pub(crate) fn template_names_equivalent(&mut self, n1: &CTemplateName, n2: &CTemplateName) -> bool {
        if let (Some(d1), Some(d2)) = (self.named_template(n1), self.named_template(n2)) {
            return self.decls_equivalent(d1, d2);
        }
        match (n1, n2) {
            (CTemplateName::Qualified(q1, d1), CTemplateName::Qualified(q2, d2)) => {
                self.prefixes_equivalent(q1, q2) && self.decls_equivalent(*d1, *d2)
            }
            (CTemplateName::Dependent(q1, i1), CTemplateName::Dependent(q2, i2)) => {
                i1 == i2 && self.prefixes_equivalent(q1, q2)
            }
            _ => false,
        }
    }

    #[rustfmt::skip]
    pub(crate) fn template_args_equivalent(&mut self, a1: &CTemplateArg, a2: &CTemplateArg) -> bool {
        use CTemplateArg::*;

        match (a1, a2) {
            (Null, Null) => true,
            (Type(t1), Type(t2))
            | (NullPtr(t1), NullPtr(t2)) => self.types_equivalent(t1, t2),
            (Declaration(d1), Declaration(d2)) => self.decls_equivalent(*d1, *d2),
            (Integral { value: v1, typ: t1 }, Integral { value: v2, typ: t2 }) => {
                v1.same_value(*v2) && self.types_equivalent(t1, t2)
            }
            (Template(n1), Template(n2))
            | (TemplateExpansion(n1), TemplateExpansion(n2)) => self.template_names_equivalent(n1, n2),
            (Expression(e1), Expression(e2)) => self.exprs_equivalent(e1, e2),
            (Pack(p1), Pack(p2)) => self.template_arg_lists_equivalent(p1, p2),
            _ => false,
        }
    }

    /// Position-sensitive comparison of two argument lists.
    pub(crate) fn template_arg_lists_equivalent(&mut self, args1: &[CTemplateArg], args2: &[CTemplateArg]) -> bool {
        args1.len() == args2.len()
            && args1.iter().zip(args2).all(|(a1, a2)| self.template_args_equivalent(a1, a2))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The spelling of an expression with whitespace removed, except a single space where it keeps
/// two identifier characters (`unsigned long`, `sizeof x`) apart.
fn canonical_spelling(spelling: &str) -> String {
    let mut out = String::with_capacity(spelling.len());
    let mut pending_space = false;
    for c in spelling.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && is_ident_char(c) && out.chars().next_back().is_some_and(is_ident_char) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NonEquivalentSet;
    use structeq_core::Config;
    use structeq_ir::UnitBuilder;
    use structeq_ir::ast::{BinOp, CCompUnit, CPrimType, CQualType, IntLiteralValue, UnaryOp};

    fn with_session<R>(u1: &CCompUnit, u2: &CCompUnit, f: impl FnOnce(&mut Session<'_>) -> R) -> R {
        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(u1, u2, &mut set, &Config::mock());
        f(&mut session)
    }

    #[test]
    fn spelling_canonicalization() {
        assert_eq!(canonical_spelling(" N  + 1 "), "N+1");
        assert_eq!(canonical_spelling("sizeof (unsigned   long)"), "sizeof(unsigned long)");
        assert_ne!(canonical_spelling("a b"), canonical_spelling("ab"));
    }

    #[test]
    fn constant_expressions() {
        let (u1, u2) = (CCompUnit::new("a.c"), CCompUnit::new("b.c"));
        let sum = |l: i64, r: i64| {
            CExpr::Binary(BinOp::Add, Box::new(CExpr::int(l)), Box::new(CExpr::int(r)))
        };
        let paren = CExpr::Paren(Box::new(CExpr::ImplicitCast(Box::new(sum(1, 2)))));
        with_session(&u1, &u2, |s| {
            assert!(s.exprs_equivalent(&paren, &sum(1, 2)));
            assert!(!s.exprs_equivalent(&sum(1, 2), &sum(2, 1)));
            assert!(s.exprs_equivalent(
                &CExpr::IntLiteral(IntLiteralValue::ULit(4)),
                &CExpr::int(4)
            ));
            let neg = CExpr::Unary(UnaryOp::Minus, Box::new(CExpr::int(1)));
            assert!(!s.exprs_equivalent(&neg, &CExpr::int(-1)));
            assert!(s.exprs_equivalent(
                &CExpr::Opaque("f( x )".to_string()),
                &CExpr::Opaque("f(x)".to_string())
            ));
            assert!(!s.exprs_equivalent(&CExpr::Opaque("3".to_string()), &CExpr::int(3)));
        });
    }

    #[test]
    fn template_arguments() {
        let (u1, u2) = (CCompUnit::new("a.cpp"), CCompUnit::new("b.cpp"));
        let int = || CQualType::prim(CPrimType::Int);
        let integral = |v| CTemplateArg::Integral { value: IntLiteralValue::ILit(v), typ: int() };
        with_session(&u1, &u2, |s| {
            assert!(s.template_args_equivalent(&integral(3), &integral(3)));
            assert!(!s.template_args_equivalent(&integral(3), &integral(4)));
            assert!(!s.template_args_equivalent(&CTemplateArg::Type(int()), &integral(3)));
            let pack = |n| CTemplateArg::Pack((0..n).map(|_| CTemplateArg::Type(int())).collect());
            assert!(s.template_args_equivalent(&pack(2), &pack(2)));
            assert!(!s.template_args_equivalent(&pack(2), &pack(1)));
        });
    }

    #[test]
    fn prefixes() {
        let mut b1 = UnitBuilder::new("a.cpp");
        let ns1 = b1.namespace("std", 1, 11);
        let mut b2 = UnitBuilder::new("b.cpp");
        let ns2 = b2.namespace("std", 1, 11);
        let other = b2.namespace("other", 2, 11);
        let (u1, u2) = (b1.finish(), b2.finish());
        let spec = |kind, prefix: Option<CNestedNameSpec>| CNestedNameSpec {
            prefix: prefix.map(Box::new),
            kind,
        };
        let global = || spec(CNestedNameSpecKind::Global, None);
        let in_ns = |ns| spec(CNestedNameSpecKind::Namespace(ns), Some(global()));

        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(&u1, &u2, &mut set, &Config::mock());
        assert!(session.prefixes_equivalent(&in_ns(ns1), &in_ns(ns2)));
        assert!(!session.prefixes_equivalent(
            &in_ns(ns1),
            &spec(CNestedNameSpecKind::Namespace(ns2), None)
        ));
        assert!(session.finish());

        let mut set = NonEquivalentSet::new();
        let mut session = Session::new(&u1, &u2, &mut set, &Config::mock());
        assert!(session.prefixes_equivalent(&in_ns(ns1), &in_ns(other)));
        // the namespaces are only told apart once the queued pair is checked
        assert!(!session.finish());
    }
}
