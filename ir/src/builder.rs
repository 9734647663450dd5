/*
 *  A builder for CCompUnits.
 *
 *  Parsing is done elsewhere; this is how callers (and the tests of
 *  the equivalence checker) put a unit together declaration by
 *  declaration.  Locations are given as (line, col) in the unit's
 *  file.  Methods that add a child to a declaration panic if the
 *  declaration has the wrong kind, like indexing a unit with a bad
 *  id does.
 *
 */

use crate::ast::*;
use std::sync::Arc;
use structeq_core::SourceLocation;
use tracing::trace;

pub struct UnitBuilder {
  unit: CCompUnit,
  file: Arc<str>,
}

impl UnitBuilder {
  pub fn new(file: &str) -> Self {
    Self{ unit: CCompUnit::new(file), file: Arc::from(file) }
  }

  pub fn loc(&self, line: u32, col: u32) -> SourceLocation {
    SourceLocation::new(self.file.clone(), line, col)
  }

  pub fn unit(&self) -> &CCompUnit {
    &self.unit
  }

  fn add(&mut self, name: Option<&str>, parent: Option<CDeclId>,
         (line, col): (u32, u32), kind: CDeclKind) -> CDeclId {
    let id = self.unit.reserve_decl();
    self.add_reserved(id, name, parent, (line, col), kind);
    id
  }

  fn add_reserved(&mut self, id: CDeclId, name: Option<&str>, parent: Option<CDeclId>,
                  (line, col): (u32, u32), kind: CDeclKind) {
    let loc = self.loc(line, col);
    trace!("{}: adding {} {:?} as {id:?}", self.unit.name, kind.kind_name(), name);
    self.unit.add_decl(id, CDecl{ name: name.map(str::to_string), loc, parent, kind });
    if parent.is_none() {
      self.unit.top_level.push(id);
    }
  }

  fn decl_mut(&mut self, id: CDeclId) -> &mut CDecl {
    let name = &self.unit.name;
    match self.unit.decls.get_mut(&id) {
      Some(decl) => decl,
      None => panic!("could not find declaration id {id:?} in {name}"),
    }
  }

  fn record_mut(&mut self, id: CDeclId) -> &mut CRecord {
    match &mut self.decl_mut(id).kind {
      CDeclKind::Record(rec) => rec,
      other => panic!("{id:?} is a {}, not a record", other.kind_name()),
    }
  }

  /*
   *  Records
   */

  fn new_record(tag: CTagKind, fields: Option<Vec<CDeclId>>) -> CRecord {
    CRecord{
      tag,
      fields,
      bases: Vec::new(),
      attrs: Vec::new(),
      is_anonymous: false,
      typedef_name: None,
      specialization: None,
    }
  }

  /// A complete record with no fields yet.
  pub fn record(&mut self, name: Option<&str>, tag: CTagKind, line: u32, col: u32) -> CDeclId {
    let rec = Self::new_record(tag, Some(Vec::new()));
    self.add(name, None, (line, col), CDeclKind::Record(rec))
  }

  /// `struct name;`
  pub fn forward_record(&mut self, name: &str, tag: CTagKind, line: u32, col: u32) -> CDeclId {
    let rec = Self::new_record(tag, None);
    self.add(Some(name), None, (line, col), CDeclKind::Record(rec))
  }

  /// A complete record declared inside `owner`, such as the `struct { ... }`
  /// of `struct { ... } x;`.  No field is added for it.
  pub fn nested_record(&mut self, owner: CDeclId, name: Option<&str>, tag: CTagKind,
                       line: u32, col: u32) -> CDeclId {
    let rec = Self::new_record(tag, Some(Vec::new()));
    self.add(name, Some(owner), (line, col), CDeclKind::Record(rec))
  }

  /// An anonymous struct or union member of `owner`: the record and the
  /// unnamed field that has it as type.
  pub fn anonymous_record(&mut self, owner: CDeclId, tag: CTagKind,
                          line: u32, col: u32) -> CDeclId {
    let mut rec = Self::new_record(tag, Some(Vec::new()));
    rec.is_anonymous = true;
    let id = self.add(None, Some(owner), (line, col), CDeclKind::Record(rec));
    self.field(owner, None, CQualType::record(id), line, col);
    id
  }

  pub fn field(&mut self, rec: CDeclId, name: Option<&str>, typ: CQualType,
               line: u32, col: u32) -> CDeclId {
    self.add_field(rec, name, CField{ typ, bit_width: None }, (line, col))
  }

  pub fn bit_field(&mut self, rec: CDeclId, name: Option<&str>, typ: CQualType, width: u32,
                   line: u32, col: u32) -> CDeclId {
    self.add_field(rec, name, CField{ typ, bit_width: Some(width) }, (line, col))
  }

  fn add_field(&mut self, rec: CDeclId, name: Option<&str>, field: CField,
               pos: (u32, u32)) -> CDeclId {
    let id = self.add(name, Some(rec), pos, CDeclKind::Field(field));
    self.record_mut(rec).fields.get_or_insert_with(Vec::new).push(id);
    id
  }

  pub fn attr(&mut self, rec: CDeclId, attr: CAttr) {
    self.record_mut(rec).attrs.push(attr);
  }

  /// `#pragma pack(bytes)` in effect at the record, written at (line, col).
  pub fn pack(&mut self, rec: CDeclId, bytes: u64, line: u32, col: u32) {
    let attr = CAttr::pack(bytes, self.loc(line, col));
    self.attr(rec, attr);
  }

  pub fn base(&mut self, rec: CDeclId, typ: CQualType, is_virtual: bool, line: u32, col: u32) {
    let loc = self.loc(line, col);
    self.record_mut(rec).bases.push(CBaseSpec{ typ, is_virtual, loc });
  }

  /// `typedef struct { ... } name;`
  pub fn typedef_name(&mut self, rec: CDeclId, name: &str) {
    self.record_mut(rec).typedef_name = Some(name.to_string());
  }

  pub fn specialization(&mut self, rec: CDeclId, template: CDeclId, args: Vec<CTemplateArg>) {
    self.record_mut(rec).specialization = Some(CSpecialization{ template, args });
  }

  /*
   *  Enums, typedefs and other declarations
   */

  /// A complete enum with no enumerators yet.
  pub fn enumeration(&mut self, name: Option<&str>, line: u32, col: u32) -> CDeclId {
    let en = CEnum{ enumerators: Some(Vec::new()), underlying: None, is_scoped: false };
    self.add(name, None, (line, col), CDeclKind::Enum(en))
  }

  pub fn forward_enum(&mut self, name: &str, underlying: CQualType,
                      line: u32, col: u32) -> CDeclId {
    let en = CEnum{ enumerators: None, underlying: Some(underlying), is_scoped: false };
    self.add(Some(name), None, (line, col), CDeclKind::Enum(en))
  }

  pub fn enumerator(&mut self, en: CDeclId, name: &str, value: i64,
                    line: u32, col: u32) -> CDeclId {
    let cst = CEnumConst{ value: IntLiteralValue::ILit(value) };
    let id = self.add(Some(name), Some(en), (line, col), CDeclKind::Enumerator(cst));
    match &mut self.decl_mut(en).kind {
      CDeclKind::Enum(e) => e.enumerators.get_or_insert_with(Vec::new).push(id),
      other => panic!("{en:?} is a {}, not an enum", other.kind_name()),
    }
    id
  }

  pub fn typedef(&mut self, name: &str, typ: CQualType, line: u32, col: u32) -> CDeclId {
    self.add(Some(name), None, (line, col), CDeclKind::Typedef(CTypedef{ typ }))
  }

  pub fn namespace(&mut self, name: &str, line: u32, col: u32) -> CDeclId {
    self.add(Some(name), None, (line, col), CDeclKind::Namespace)
  }

  pub fn var(&mut self, name: &str, typ: CQualType, line: u32, col: u32) -> CDeclId {
    self.add(Some(name), None, (line, col), CDeclKind::Var(typ))
  }

  pub fn function(&mut self, name: &str, typ: CFuncType, line: u32, col: u32) -> CDeclId {
    let typ = CQualType::new(CType::Func(typ));
    self.add(Some(name), None, (line, col), CDeclKind::Function(typ))
  }

  /// Moves a top-level declaration into namespace `ns`.  A class
  /// template takes its templated record along.
  pub fn nest(&mut self, decl: CDeclId, ns: CDeclId) {
    self.unit.top_level.retain(|&id| id != decl);
    let d = self.decl_mut(decl);
    d.parent = Some(ns);
    if let CDeclKind::ClassTemplate(ct) = &d.kind {
      let templated = ct.templated;
      self.decl_mut(templated).parent = Some(ns);
    }
  }

  /*
   *  Templates
   */

  /// `template <> class name { };` with an empty parameter list.
  /// Returns the template and its templated record.
  pub fn class_template(&mut self, name: &str, tag: CTagKind,
                        line: u32, col: u32) -> (CDeclId, CDeclId) {
    let tmpl = self.unit.reserve_decl();
    let rec = self.unit.reserve_decl();
    let params = CTemplateParamList{ loc: self.loc(line, 1), params: Vec::new() };
    self.add_reserved(tmpl, Some(name), None, (line, col),
                      CDeclKind::ClassTemplate(CClassTemplate{ params, templated: rec }));
    // the templated record shares the template's context but is reached
    // through the template, not listed on its own
    let loc = self.loc(line, col);
    trace!("{}: adding templated record {name} as {rec:?}", self.unit.name);
    self.unit.add_decl(rec, CDecl{
      name: Some(name.to_string()),
      loc,
      parent: None,
      kind: CDeclKind::Record(Self::new_record(tag, Some(Vec::new()))),
    });
    (tmpl, rec)
  }

  // depth and index of the next parameter of `owner`, and its list
  fn param_list_mut(&mut self, owner: CDeclId) -> (u32, &mut CTemplateParamList) {
    match &mut self.decl_mut(owner).kind {
      CDeclKind::ClassTemplate(ct) => (0, &mut ct.params),
      CDeclKind::TemplateTemplateParm(ttp) => (ttp.depth + 1, &mut ttp.params),
      other => panic!("{owner:?} is a {}, not a template", other.kind_name()),
    }
  }

  fn next_param_position(&mut self, owner: CDeclId) -> (u32, u32) {
    let (depth, list) = self.param_list_mut(owner);
    (depth, list.params.len() as u32)
  }

  fn push_param(&mut self, owner: CDeclId, id: CDeclId) {
    self.param_list_mut(owner).1.params.push(id);
  }

  pub fn type_param(&mut self, owner: CDeclId, name: Option<&str>, is_pack: bool,
                    default: Option<CQualType>, line: u32, col: u32) -> CDeclId {
    let (depth, index) = self.next_param_position(owner);
    let parm = CTemplateTypeParm{ depth, index, is_pack, default };
    let id = self.add(name, Some(owner), (line, col), CDeclKind::TemplateTypeParm(parm));
    self.push_param(owner, id);
    id
  }

  pub fn non_type_param(&mut self, owner: CDeclId, name: Option<&str>, typ: CQualType,
                        is_pack: bool, default: Option<CExpr>,
                        line: u32, col: u32) -> CDeclId {
    let (depth, index) = self.next_param_position(owner);
    let parm = CNonTypeTemplateParm{ typ, depth, index, is_pack, default: default.map(Box::new) };
    let id = self.add(name, Some(owner), (line, col), CDeclKind::NonTypeTemplateParm(parm));
    self.push_param(owner, id);
    id
  }

  /// A template template parameter with an empty parameter list; add its
  /// parameters by passing the returned id as `owner`.
  pub fn template_template_param(&mut self, owner: CDeclId, name: Option<&str>, is_pack: bool,
                                 line: u32, col: u32) -> CDeclId {
    let (depth, index) = self.next_param_position(owner);
    let params = CTemplateParamList{ loc: self.loc(line, col), params: Vec::new() };
    let parm = CTemplateTemplateParm{ params, depth, index, is_pack, default: None };
    let id = self.add(name, Some(owner), (line, col), CDeclKind::TemplateTemplateParm(parm));
    self.push_param(owner, id);
    id
  }

  /// The type `T` of a template type parameter declaration.
  pub fn param_type(&self, parm: CDeclId) -> CQualType {
    match self.unit.get(parm).map(|d| &d.kind) {
      Some(CDeclKind::TemplateTypeParm(p)) => CQualType::new(CType::TemplateTypeParm{
        depth: p.depth, index: p.index, is_pack: p.is_pack }),
      _ => panic!("{parm:?} is not a template type parameter"),
    }
  }

  pub fn finish(self) -> CCompUnit {
    trace!("{}: built {} declarations", self.unit.name, self.unit.decls.len());
    self.unit
  }
}
