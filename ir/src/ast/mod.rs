/*
 *  This file contains the data structures for the C/C++ declarations
 *  compared by the structural equivalence checker.
 *
 *  Intentions for this file:
 *  - Code for building or importing this representation lives in
 *    other modules (see `builder`), as much as possible.
 *  - Code for validating invariants of the IR belongs here,
 *    rather than in a supporting file.
 *
 *  Declarations live in a per-unit table and refer to each other
 *  through `CDeclId`s.  Ids are reserved before the declaration is
 *  added, so a record can mention itself (through a pointer field)
 *  before it has been fully built.
 *
 */

pub mod print;
pub mod support;

use std::collections::{HashMap, HashSet};
use std::mem::discriminant;
use structeq_core::SourceLocation;
use thiserror::Error;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Copy, Clone)]
pub struct CDeclId(pub u64);

#[derive(Debug)]
pub struct CCompUnit {
  // file name used for the locations of this unit
  pub name: String,

  decl_id_count: u64,
  pub decls: HashMap<CDeclId, CDecl>,

  // declarations at translation-unit scope, in declaration order
  pub top_level: Vec<CDeclId>,
}

#[derive(Debug)]
pub struct CDecl {
  pub name: Option<String>,
  pub loc: SourceLocation,
  // the declaration context: a record, namespace, or template
  pub parent: Option<CDeclId>,
  pub kind: CDeclKind,
}

#[derive(Debug)]
pub enum CDeclKind {
  Record(CRecord),
  Enum(CEnum),
  Enumerator(CEnumConst),
  Field(CField),
  Typedef(CTypedef),
  ClassTemplate(CClassTemplate),
  TemplateTypeParm(CTemplateTypeParm),
  NonTypeTemplateParm(CNonTypeTemplateParm),
  TemplateTemplateParm(CTemplateTemplateParm),
  Namespace,
  Var(CQualType),
  Function(CQualType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CTagKind {
  Struct,
  Union,
  Class,
}

#[derive(Debug)]
pub struct CRecord {
  pub tag: CTagKind,
  // None means the record was only forward declared
  pub fields: Option<Vec<CDeclId>>,
  pub bases: Vec<CBaseSpec>,
  pub attrs: Vec<CAttr>,
  // `struct { ... };` inside another record, with no declarator
  pub is_anonymous: bool,
  // `typedef struct { ... } name;` gives the record this name for linkage
  pub typedef_name: Option<String>,
  pub specialization: Option<CSpecialization>,
}

#[derive(Debug)]
pub struct CBaseSpec {
  pub typ: CQualType,
  pub is_virtual: bool,
  pub loc: SourceLocation,
}

// Attributes that change the layout of a record.  Alignments are
// stored in bits, so `#pragma pack(1)` is MaxFieldAlignment{bits: 8}.
#[derive(Debug, Clone)]
pub enum CAttr {
  MaxFieldAlignment { bits: u64, loc: SourceLocation },
  Packed { loc: SourceLocation },
  Aligned { bits: u64, loc: SourceLocation },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CAttrKey {
  MaxFieldAlignment,
  Packed,
  Aligned,
}

// a record that is an instantiation of a class template
#[derive(Debug)]
pub struct CSpecialization {
  pub template: CDeclId,
  pub args: Vec<CTemplateArg>,
}

#[derive(Debug)]
pub struct CField {
  pub typ: CQualType,
  pub bit_width: Option<u32>,
}

#[derive(Debug)]
pub struct CEnum {
  // None means the enum was only forward declared
  pub enumerators: Option<Vec<CDeclId>>,
  pub underlying: Option<CQualType>,
  pub is_scoped: bool,
}

#[derive(Debug)]
pub struct CEnumConst {
  pub value: IntLiteralValue,
}

#[derive(Debug)]
pub struct CTypedef {
  pub typ: CQualType,
}

#[derive(Debug)]
pub struct CClassTemplate {
  pub params: CTemplateParamList,
  pub templated: CDeclId,
}

#[derive(Debug, Default)]
pub struct CTemplateParamList {
  // location of the `template` keyword
  pub loc: SourceLocation,
  pub params: Vec<CDeclId>,
}

#[derive(Debug)]
pub struct CTemplateTypeParm {
  pub depth: u32,
  pub index: u32,
  pub is_pack: bool,
  pub default: Option<CQualType>,
}

#[derive(Debug)]
pub struct CNonTypeTemplateParm {
  pub typ: CQualType,
  pub depth: u32,
  pub index: u32,
  pub is_pack: bool,
  pub default: Option<Box<CExpr>>,
}

#[derive(Debug)]
pub struct CTemplateTemplateParm {
  pub params: CTemplateParamList,
  pub depth: u32,
  pub index: u32,
  pub is_pack: bool,
  pub default: Option<CTemplateName>,
}


#[derive(Debug, Clone)]
pub enum CTemplateName {
  Template(CDeclId),
  // `ns::tmpl`
  Qualified(CNestedNameSpec, CDeclId),
  // `T::template tmpl`
  Dependent(CNestedNameSpec, String),
}

#[derive(Debug, Clone)]
pub enum CTemplateArg {
  Null,
  Type(CQualType),
  Declaration(CDeclId),
  NullPtr(CQualType),
  Integral { value: IntLiteralValue, typ: CQualType },
  Template(CTemplateName),
  TemplateExpansion(CTemplateName),
  Expression(Box<CExpr>),
  Pack(Vec<CTemplateArg>),
}

// `a::b::` in `a::b::c`; the prefix is the part to the left
#[derive(Debug, Clone)]
pub struct CNestedNameSpec {
  pub prefix: Option<Box<CNestedNameSpec>>,
  pub kind: CNestedNameSpecKind,
}

#[derive(Debug, Clone)]
pub enum CNestedNameSpecKind {
  Identifier(String),
  Namespace(CDeclId),
  TypeSpec(CQualType),
  // the leading `::`
  Global,
  // `__super::`
  Super(CDeclId),
}


// Expressions only show up inside types and template arguments
// (array bounds, non-type arguments, decltype), so this covers
// constant-expression shapes.  Anything else is kept as spelled.
#[derive(Debug, Clone)]
pub enum CExpr {
  IntLiteral(IntLiteralValue),
  CharLiteral(u64),
  BoolLiteral(bool),
  // enumerators, variables, non-type template parameters
  DeclRef(CDeclId),
  Unary(UnaryOp, Box<CExpr>),
  Binary(BinOp, Box<CExpr>, Box<CExpr>),
  // `(cond)? tcase : fcase`
  Ternary(Box<CExpr>, Box<CExpr>, Box<CExpr>),
  UnaryOfType(UOfTypeOp, CQualType),
  ExplicitCast(CQualType, Box<CExpr>),
  ImplicitCast(Box<CExpr>),
  Paren(Box<CExpr>),
  Opaque(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    AddressOf,  // &x
    Deref,      // *x
    Plus,       // +x
    Minus,      // -x
    BitNot,     // ~x
    Not,        // !x
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Mult,   // *
    Div,    // /
    Mod,    // %
    Add,    // +
    Sub,    // -
    ShiftL, // <<
    ShiftR, // >>
    Lt,     // <
    Gt,     // >
    Le,     // <=
    Ge,     // >=
    Eq,     // ==
    Neq,    // !=
    BitAnd, // &
    BitXor, // ^
    BitOr,  // |
    And,    // &&
    Or,     // ||
    Comma,  // ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UOfTypeOp {
    SizeOf,
    AlignOf,
}


#[derive(Debug, Clone)]
pub struct CFuncType {
  pub rtyp: CQualType,
  pub ptyps: Vec<CQualType>,
  pub annotations: CFuncTypeAnnotations,
  // cv-qualifiers of a member function (`void f() const`)
  pub quals: CTypeQualifiers,
  pub exception_spec: CExceptionSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CFuncTypeAnnotations {
  pub is_var_arg: bool,
  // note that noreturn does not mean `Void` return type.
  pub is_noreturn: bool,
  // false for K&R style `int f();` in C
  pub has_prototype: bool,
}

#[derive(Debug, Clone)]
pub enum CExceptionSpec {
  None,
  // `throw()`
  DynamicNone,
  // `throw(A, B)`
  Dynamic(Vec<CQualType>),
  Noexcept,
}

#[derive(Debug, Clone)]
pub struct CQualType {
  pub typ: Box<CType>,
  pub quals: CTypeQualifiers,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CTypeQualifiers {
  pub is_const: bool,
  pub is_restrict: bool,
  pub is_volatile: bool,
  pub address_space: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CArraySizeMod {
  Normal,
  // `int a[static 4]`
  Static,
  // `int a[*]`
  Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CElabKeyword {
  Struct,
  Union,
  Class,
  Enum,
  Typename,
  // qualified name without a keyword, e.g. `ns::T`
  None,
}

#[derive(Debug, Clone)]
pub enum CType {
  Void,

  Prim(CPrimType),

  Complex(CPrimType),

  Ptr(CQualType),
  LValueRef(CQualType),
  RValueRef(CQualType),
  // `pointee Class::*`
  MemberPtr(CQualType, CDeclId),

  // constant size array
  ConstSizeArray(CQualType, u64, CArraySizeMod),
  // array type with no size given
  NoSizeArray(CQualType, CArraySizeMod),
  // array with expression size given
  // None means that '*' was used as the expression
  VarSizeArray(CQualType, Option<Box<CExpr>>, CArraySizeMod),
  // array whose size depends on a template parameter
  DependentSizedArray(CQualType, Box<CExpr>, CArraySizeMod),

  Vector(CQualType, u32),

  Func(CFuncType),

  // sugar: stripped when comparing canonical types
  Paren(CQualType),
  Typedef(CDeclId),
  Elaborated(CElabKeyword, Option<CNestedNameSpec>, CQualType),

  // a parameter adjusted from array/function type; holds the
  // type as it was written
  Decayed(CQualType),

  // these represent types specified via declarations
  Record(CDeclId),
  Enum(CDeclId),

  TemplateTypeParm { depth: u32, index: u32, is_pack: bool },
  // `canonical` is the record of the instantiation, when there is one
  TemplateSpecialization {
    template: CTemplateName,
    args: Vec<CTemplateArg>,
    canonical: Option<CDeclId>,
  },
  // `typename T::name`
  DependentName(Option<CNestedNameSpec>, String),
  PackExpansion(CQualType),
  TypeOfExpr(Box<CExpr>),
  Decltype(Box<CExpr>),
  Atomic(CQualType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CPrimType {
  Bool,
  Char,
  WChar,

  // signed
  SChar,      // i8
  Short,      // i16
  Int,        // i16 or i32 (probably latter)
  Long,       // i32 or i64
  LongLong,   // i64 or greater

  // unsigned
  UChar,      // u8
  UShort,     // u16
  UInt,       // u16 or u32 (probably latter)
  ULong,      // u32 or u64
  ULongLong,  // u64 or greater

  // Clang specific types
  Int128,
  UInt128,

  // floating point types
  Float,      // 32-bit
  Double,     // 64-bit
  LongDouble, // 80 or 128 bit -- many possible semantics
  Half,       // 16-bit
  BFloat16,   // alternate 16-bit floating point

  NullPtr,    // decltype(nullptr)
}

#[derive(Debug, Clone, Copy)]
pub enum IntLiteralValue {
  ULit(u64),
  ILit(i64),
}


/*
 *
 *  Constructors
 *
 */

impl CCompUnit {
  pub fn new<S: Into<String>>(name: S) -> Self {
    Self{
      name: name.into(),
      decl_id_count: 1, // is a uid assignment counter, not necc. count
      decls: HashMap::new(),
      top_level: Vec::new(),
    }
  }
}

impl CFuncTypeAnnotations {
  pub fn new(varg: bool, noret: bool, has_proto: bool) -> Self {
    Self{ is_var_arg: varg, is_noreturn: noret, has_prototype: has_proto }
  }
}

impl CTypeQualifiers {
  pub fn new(is_const: bool, restrict: bool, volatile: bool) -> Self {
    Self{ is_const, is_restrict: restrict, is_volatile: volatile, address_space: None }
  }
}

impl CQualType {
  pub fn new(typ: CType) -> Self {
    Self{ typ: Box::new(typ), quals: CTypeQualifiers::default() }
  }
  pub fn prim(pt: CPrimType) -> Self { Self::new(CType::Prim(pt)) }
  pub fn ptr(pointee: CQualType) -> Self { Self::new(CType::Ptr(pointee)) }
  pub fn record(id: CDeclId) -> Self { Self::new(CType::Record(id)) }
  pub fn enumeration(id: CDeclId) -> Self { Self::new(CType::Enum(id)) }
  pub fn typedef(id: CDeclId) -> Self { Self::new(CType::Typedef(id)) }
  pub fn array(elem: CQualType, size: u64) -> Self {
    Self::new(CType::ConstSizeArray(elem, size, CArraySizeMod::Normal))
  }

  pub fn with_const(mut self) -> Self {
    self.quals.is_const = true;
    self
  }
  pub fn with_volatile(mut self) -> Self {
    self.quals.is_volatile = true;
    self
  }
}

impl CFuncType {
  // a prototyped, non-variadic function type
  pub fn new(rtyp: CQualType, ptyps: Vec<CQualType>) -> Self {
    Self{
      rtyp,
      ptyps,
      annotations: CFuncTypeAnnotations::new(false, false, true),
      quals: CTypeQualifiers::default(),
      exception_spec: CExceptionSpec::None,
    }
  }
}

impl CExpr {
  pub fn int(v: i64) -> Self { CExpr::IntLiteral(IntLiteralValue::ILit(v)) }
}

impl CAttr {
  pub fn pack(bytes: u64, loc: SourceLocation) -> Self {
    CAttr::MaxFieldAlignment{ bits: bytes * 8, loc }
  }
}


/*
 *
 *  Data Structure Validation / Invariants
 *
 */

/// An inconsistency found by [CCompUnit::validate].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("{referrer:?} refers to missing declaration {missing:?}")]
  DanglingId { referrer: CDeclId, missing: CDeclId },
  #[error("{child:?} is listed under {listed:?} but its parent is {actual:?}")]
  WrongParent { child: CDeclId, listed: CDeclId, actual: Option<CDeclId> },
  #[error("{child:?} is listed under {owner:?} but is not a {expected}")]
  WrongKind { child: CDeclId, owner: CDeclId, expected: &'static str },
  #[error("top-level declaration {0:?} is listed more than once")]
  DuplicateTopLevel(CDeclId),
}

impl CCompUnit {
  pub fn validate(&self) -> Result<(), ValidationError> {
    self.validate_top_level_disjoint()?;
    for id in self.sorted_ids() {
      self.validate_decl(id, &self[id])?;
    }
    Ok(())
  }

  fn validate_top_level_disjoint(&self) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for &id in self.top_level.iter() {
      if !seen.insert(id) {
        return Err(ValidationError::DuplicateTopLevel(id));
      }
      self.expect_id(id, id)?;
    }
    Ok(())
  }

  fn expect_id(&self, referrer: CDeclId, id: CDeclId) -> Result<(), ValidationError> {
    if self.decls.contains_key(&id) {
      Ok(())
    } else {
      Err(ValidationError::DanglingId{ referrer, missing: id })
    }
  }

  // `child` must exist, name `owner` as its parent, and be of the
  // expected kind
  fn expect_child(&self, owner: CDeclId, child: CDeclId, expected: &'static str,
                  is_kind: fn(&CDeclKind) -> bool) -> Result<(), ValidationError> {
    self.expect_id(owner, child)?;
    let decl = &self[child];
    if decl.parent != Some(owner) {
      return Err(ValidationError::WrongParent{
        child, listed: owner, actual: decl.parent });
    }
    if !is_kind(&decl.kind) {
      return Err(ValidationError::WrongKind{ child, owner, expected });
    }
    Ok(())
  }

  fn validate_decl(&self, id: CDeclId, decl: &CDecl) -> Result<(), ValidationError> {
    if let Some(parent) = decl.parent {
      self.expect_id(id, parent)?;
    }
    match &decl.kind {
      CDeclKind::Record(rec) => {
        for &f in rec.fields.iter().flatten() {
          self.expect_child(id, f, "field", |k| matches!(k, CDeclKind::Field(_)))?;
        }
        if let Some(spec) = &rec.specialization {
          self.expect_id(id, spec.template)?;
        }
      }
      CDeclKind::Enum(en) => {
        for &c in en.enumerators.iter().flatten() {
          self.expect_child(id, c, "enumerator",
                            |k| matches!(k, CDeclKind::Enumerator(_)))?;
        }
      }
      CDeclKind::ClassTemplate(ct) => {
        self.validate_params(id, &ct.params)?;
        self.expect_id(id, ct.templated)?;
      }
      CDeclKind::TemplateTemplateParm(ttp) => {
        self.validate_params(id, &ttp.params)?;
      }
      _ => {}
    }
    Ok(())
  }

  fn validate_params(&self, owner: CDeclId, list: &CTemplateParamList)
      -> Result<(), ValidationError> {
    for &p in list.params.iter() {
      self.expect_child(owner, p, "template parameter", CDeclKind::is_template_parm)?;
    }
    Ok(())
  }
}

impl CDeclKind {
  pub fn is_template_parm(&self) -> bool {
    matches!(self,
      CDeclKind::TemplateTypeParm(_) |
      CDeclKind::NonTypeTemplateParm(_) |
      CDeclKind::TemplateTemplateParm(_))
  }

  // whether two declarations are of the same kind, ignoring contents
  pub fn same_kind(&self, other: &CDeclKind) -> bool {
    discriminant(self) == discriminant(other)
  }
}
