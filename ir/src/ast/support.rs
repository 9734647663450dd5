/*
 *  This file contains support functions for the declaration IR:
 *  id allocation, lookups, and the desugaring used to compare
 *  canonical types.
 *
 */

use crate::ast::*;
use std::ops::Index;

/*
 *
 *  Support for flattened recursion on declarations
 *
 */

impl Index<CDeclId> for CCompUnit {
  type Output = CDecl;

  fn index(&self, index: CDeclId) -> &CDecl {
    self.decls.get(&index).unwrap_or_else(||
      panic!("could not find declaration id {index:?} in {}", self.name)
    )
  }
}

impl CCompUnit {
  pub fn reserve_decl(&mut self) -> CDeclId {
    let id = CDeclId(self.decl_id_count);
    self.decl_id_count += 1;
    id
  }
  pub fn add_decl(&mut self, id: CDeclId, decl: CDecl) {
    assert!(id.0<self.decl_id_count,"{:?}",&id);
    self.decls.insert(id, decl);
  }

  pub fn get(&self, id: CDeclId) -> Option<&CDecl> {
    self.decls.get(&id)
  }

  pub fn get_mut(&mut self, id: CDeclId) -> Option<&mut CDecl> {
    self.decls.get_mut(&id)
  }

  // all ids in allocation order; hash map order is not stable
  pub fn sorted_ids(&self) -> Vec<CDeclId> {
    let mut ids: Vec<_> = self.decls.keys().copied().collect();
    ids.sort_unstable();
    ids
  }

  // `a::b::X` for a declaration nested in namespaces/records;
  // None if the declaration or one of its scopes is unnamed
  pub fn qualified_name(&self, id: CDeclId) -> Option<String> {
    let mut parts = Vec::new();
    let mut cur = Some(id);
    while let Some(cid) = cur {
      let decl = self.get(cid)?;
      parts.push(decl.tag_name()?);
      cur = decl.parent;
    }
    parts.reverse();
    Some(parts.join("::"))
  }

  // declarations (in allocation order) whose qualified name is `qname`
  pub fn lookup<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = CDeclId> + 'a {
    self.sorted_ids().into_iter()
      .filter(move |&id| self.qualified_name(id).as_deref() == Some(qname))
  }

  // If `field` is an anonymous struct/union member (`union { int a; };`),
  // the record declaration that is its type.
  pub fn anonymous_member_record(&self, field: CDeclId) -> Option<CDeclId> {
    let decl = self.get(field)?;
    if decl.name.is_some() {
      return None;
    }
    let (CType::Record(rid), _) = self.desugar(&decl.as_field()?.typ) else {
      return None;
    };
    self.get(*rid)?.as_record()?.is_anonymous.then_some(*rid)
  }

  // Strips sugar (typedefs, parentheses, elaborated keywords) from
  // the top of `qt`, merging the qualifiers found on the way down.
  pub fn desugar<'a>(&'a self, qt: &'a CQualType) -> (&'a CType, CTypeQualifiers) {
    let mut quals = qt.quals;
    let mut cur = &*qt.typ;
    loop {
      let next = match cur {
        CType::Paren(inner) |
        CType::Elaborated(_, _, inner) => inner,
        CType::Typedef(id) => match self.get(*id).map(|d| &d.kind) {
          Some(CDeclKind::Typedef(td)) => &td.typ,
          _ => return (cur, quals),
        },
        _ => return (cur, quals),
      };
      quals = quals.merge(next.quals);
      cur = &*next.typ;
    }
  }
}

impl CDecl {
  pub fn as_record(&self) -> Option<&CRecord> {
    match &self.kind { CDeclKind::Record(r) => Some(r), _ => None }
  }
  pub fn as_enum(&self) -> Option<&CEnum> {
    match &self.kind { CDeclKind::Enum(e) => Some(e), _ => None }
  }
  pub fn as_field(&self) -> Option<&CField> {
    match &self.kind { CDeclKind::Field(f) => Some(f), _ => None }
  }
  pub fn as_enumerator(&self) -> Option<&CEnumConst> {
    match &self.kind { CDeclKind::Enumerator(c) => Some(c), _ => None }
  }

  pub fn same_kind(&self, other: &CDecl) -> bool {
    self.kind.same_kind(&other.kind)
  }

  // The name used to match tag declarations across units: an unnamed
  // record named by a typedef goes by the typedef's name.
  pub fn tag_name(&self) -> Option<&str> {
    match (&self.name, &self.kind) {
      (Some(n), _) => Some(n),
      (None, CDeclKind::Record(r)) => r.typedef_name.as_deref(),
      _ => None,
    }
  }
}

impl CDeclKind {
  pub fn kind_name(&self) -> &'static str {
    match self {
      CDeclKind::Record(_) => "record",
      CDeclKind::Enum(_) => "enum",
      CDeclKind::Enumerator(_) => "enumerator",
      CDeclKind::Field(_) => "field",
      CDeclKind::Typedef(_) => "typedef",
      CDeclKind::ClassTemplate(_) => "class template",
      CDeclKind::TemplateTypeParm(_) => "template type parameter",
      CDeclKind::NonTypeTemplateParm(_) => "non-type template parameter",
      CDeclKind::TemplateTemplateParm(_) => "template template parameter",
      CDeclKind::Namespace => "namespace",
      CDeclKind::Var(_) => "variable",
      CDeclKind::Function(_) => "function",
    }
  }
}

impl CRecord {
  pub fn is_complete(&self) -> bool { self.fields.is_some() }
  pub fn is_union(&self) -> bool { self.tag == CTagKind::Union }

  pub fn attr(&self, key: CAttrKey) -> Option<&CAttr> {
    self.attrs.iter().find(|a| a.key() == key)
  }
}

impl CAttrKey {
  pub const ALL: [CAttrKey; 3] =
    [CAttrKey::MaxFieldAlignment, CAttrKey::Packed, CAttrKey::Aligned];

  // how the attribute is named in diagnostics
  pub fn spelling(self) -> &'static str {
    match self {
      CAttrKey::MaxFieldAlignment => "pack",
      CAttrKey::Packed => "packed",
      CAttrKey::Aligned => "aligned",
    }
  }
}

impl CAttr {
  pub fn key(&self) -> CAttrKey {
    match self {
      CAttr::MaxFieldAlignment{..} => CAttrKey::MaxFieldAlignment,
      CAttr::Packed{..} => CAttrKey::Packed,
      CAttr::Aligned{..} => CAttrKey::Aligned,
    }
  }

  // the effective value in bits, for attributes that carry one
  pub fn bits(&self) -> Option<u64> {
    match self {
      CAttr::MaxFieldAlignment{ bits, .. } |
      CAttr::Aligned{ bits, .. } => Some(*bits),
      CAttr::Packed{..} => None,
    }
  }

  pub fn loc(&self) -> &SourceLocation {
    match self {
      CAttr::MaxFieldAlignment{ loc, .. } |
      CAttr::Packed{ loc } |
      CAttr::Aligned{ loc, .. } => loc,
    }
  }
}

impl CTagKind {
  pub fn spelling(self) -> &'static str {
    match self {
      CTagKind::Struct => "struct",
      CTagKind::Union => "union",
      CTagKind::Class => "class",
    }
  }
}

impl CTypeQualifiers {
  pub fn merge(self, other: CTypeQualifiers) -> CTypeQualifiers {
    CTypeQualifiers{
      is_const: self.is_const || other.is_const,
      is_restrict: self.is_restrict || other.is_restrict,
      is_volatile: self.is_volatile || other.is_volatile,
      address_space: self.address_space.or(other.address_space),
    }
  }
}

impl IntLiteralValue {
  pub fn as_i128(self) -> i128 {
    match self {
      IntLiteralValue::ULit(u) => u as i128,
      IntLiteralValue::ILit(i) => i as i128,
    }
  }

  // Compares the mathematical values, so `ULit(3)` and `ILit(3)` agree
  // but `ULit(u64::MAX)` and `ILit(-1)` do not.
  pub fn same_value(self, other: IntLiteralValue) -> bool {
    self.as_i128() == other.as_i128()
  }
}

impl CExpr {
  // Looks through parentheses and implicit conversions.
  pub fn ignore_parens_and_implicit(&self) -> &CExpr {
    let mut cur = self;
    while let CExpr::Paren(inner) | CExpr::ImplicitCast(inner) = cur {
      cur = &**inner;
    }
    cur
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn desugar_merges_qualifiers() {
    let mut unit = CCompUnit::new("a.c");
    let td = unit.reserve_decl();
    unit.add_decl(td, CDecl{
      name: Some("cint".to_string()),
      loc: SourceLocation::default(),
      parent: None,
      kind: CDeclKind::Typedef(CTypedef{
        typ: CQualType::prim(CPrimType::Int).with_const() }),
    });
    let qt = CQualType::new(CType::Paren(CQualType::typedef(td).with_volatile()));
    let (ty, quals) = unit.desugar(&qt);
    assert!(matches!(ty, CType::Prim(CPrimType::Int)));
    assert!(quals.is_const && quals.is_volatile && !quals.is_restrict);
  }

  #[test]
  fn int_values() {
    assert!(IntLiteralValue::ULit(3).same_value(IntLiteralValue::ILit(3)));
    assert!(!IntLiteralValue::ULit(u64::MAX).same_value(IntLiteralValue::ILit(-1)));
  }

  #[test]
  fn ignore_parens() {
    let e = CExpr::Paren(Box::new(CExpr::ImplicitCast(Box::new(CExpr::int(4)))));
    assert!(matches!(e.ignore_parens_and_implicit(), CExpr::IntLiteral(_)));
  }
}
