/*
 *  Printing of types and declaration names for diagnostics.
 *
 *  Types refer to declarations by id, so printing needs the unit
 *  the type came from; the helpers here hang off CCompUnit rather
 *  than implementing Display.
 *
 */

use crate::ast::*;
use std::fmt;

impl CCompUnit {
  // How a tag declaration's type is named in diagnostics: `X`,
  // `ns::X`, or `(anonymous struct at a.cpp:3:5)`.
  pub fn tag_type_name(&self, id: CDeclId) -> String {
    if let Some(qname) = self.qualified_name(id) {
      return qname;
    }
    let Some(decl) = self.get(id) else {
      return format!("<missing {}>", id.0);
    };
    let what = match &decl.kind {
      CDeclKind::Record(r) => r.tag.spelling(),
      CDeclKind::Enum(_) => "enum",
      other => other.kind_name(),
    };
    format!("(anonymous {what} at {})", decl.loc)
  }

  pub fn decl_name(&self, id: CDeclId) -> String {
    match self.get(id).and_then(|d| d.name.clone()) {
      Some(name) => name,
      None => "(anonymous)".to_string(),
    }
  }

  pub fn type_name(&self, qt: &CQualType) -> String {
    let mut s = String::new();
    self.write_qual_type(&mut s, qt);
    s
  }

  fn write_qual_type(&self, s: &mut String, qt: &CQualType) {
    s.push_str(&qt.quals.to_string());
    self.write_type(s, &qt.typ);
  }

  fn write_type(&self, s: &mut String, ty: &CType) {
    use std::fmt::Write as _;
    match ty {
      CType::Void => s.push_str("void"),
      CType::Prim(pt) => { let _ = write!(s, "{pt}"); }
      CType::Complex(pt) => { let _ = write!(s, "_Complex {pt}"); }
      CType::Ptr(qt) => { self.write_qual_type(s, qt); s.push_str(" *"); }
      CType::LValueRef(qt) => { self.write_qual_type(s, qt); s.push_str(" &"); }
      CType::RValueRef(qt) => { self.write_qual_type(s, qt); s.push_str(" &&"); }
      CType::MemberPtr(qt, class) => {
        self.write_qual_type(s, qt);
        let _ = write!(s, " {}::*", self.tag_type_name(*class));
      }
      CType::ConstSizeArray(qt, n, _) => {
        self.write_qual_type(s, qt);
        let _ = write!(s, "[{n}]");
      }
      CType::NoSizeArray(qt, _) => { self.write_qual_type(s, qt); s.push_str("[]"); }
      CType::VarSizeArray(qt, Some(_), _) |
      CType::DependentSizedArray(qt, _, _) => {
        self.write_qual_type(s, qt);
        s.push_str("[expr]");
      }
      CType::VarSizeArray(qt, None, _) => { self.write_qual_type(s, qt); s.push_str("[*]"); }
      CType::Vector(qt, n) => {
        self.write_qual_type(s, qt);
        let _ = write!(s, " __attribute__((vector_size({n})))");
      }
      CType::Func(ft) => {
        self.write_qual_type(s, &ft.rtyp);
        s.push_str(" (");
        for (i, p) in ft.ptyps.iter().enumerate() {
          if i > 0 { s.push_str(", "); }
          self.write_qual_type(s, p);
        }
        if ft.annotations.is_var_arg {
          s.push_str(if ft.ptyps.is_empty() { "..." } else { ", ..." });
        }
        s.push(')');
      }
      CType::Paren(qt) => { s.push('('); self.write_qual_type(s, qt); s.push(')'); }
      CType::Typedef(id) => s.push_str(&self.decl_name(*id)),
      CType::Elaborated(kw, _, qt) => {
        if let Some(kw) = kw.spelling() {
          s.push_str(kw);
          s.push(' ');
        }
        self.write_qual_type(s, qt);
      }
      CType::Decayed(qt) => self.write_qual_type(s, qt),
      CType::Record(id) | CType::Enum(id) => s.push_str(&self.tag_type_name(*id)),
      CType::TemplateTypeParm{ depth, index, is_pack } => {
        let dots = if *is_pack { "..." } else { "" };
        let _ = write!(s, "type-parameter-{depth}-{index}{dots}");
      }
      CType::TemplateSpecialization{ template, args, .. } => {
        self.write_template_name(s, template);
        let _ = write!(s, "<{} args>", args.len());
      }
      CType::DependentName(_, name) => { let _ = write!(s, "typename {name}"); }
      CType::PackExpansion(qt) => { self.write_qual_type(s, qt); s.push_str("..."); }
      CType::TypeOfExpr(_) => s.push_str("typeof(expr)"),
      CType::Decltype(_) => s.push_str("decltype(expr)"),
      CType::Atomic(qt) => { s.push_str("_Atomic("); self.write_qual_type(s, qt); s.push(')'); }
    }
  }

  fn write_template_name(&self, s: &mut String, name: &CTemplateName) {
    match name {
      CTemplateName::Template(id) |
      CTemplateName::Qualified(_, id) => s.push_str(&self.decl_name(*id)),
      CTemplateName::Dependent(_, ident) => s.push_str(ident),
    }
  }
}

impl CElabKeyword {
  pub fn spelling(self) -> Option<&'static str> {
    match self {
      CElabKeyword::Struct => Some("struct"),
      CElabKeyword::Union => Some("union"),
      CElabKeyword::Class => Some("class"),
      CElabKeyword::Enum => Some("enum"),
      CElabKeyword::Typename => Some("typename"),
      CElabKeyword::None => None,
    }
  }
}

impl fmt::Display for CTypeQualifiers {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let c = if self.is_const { "const " } else { "" };
    let r = if self.is_restrict { "restrict " } else { "" };
    let v = if self.is_volatile { "volatile " } else { "" };
    write!(f, "{}{}{}", c, r, v)?;
    if let Some(space) = self.address_space {
      write!(f, "__attribute__((address_space({space}))) ")?;
    }
    Ok(())
  }
}

impl fmt::Display for CPrimType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CPrimType::Bool => { write!(f, "bool") }
      CPrimType::Char => { write!(f, "char") }
      CPrimType::WChar => { write!(f, "wchar_t") }
      CPrimType::SChar => { write!(f, "signed char") }
      CPrimType::Short => { write!(f, "short") }
      CPrimType::Int => { write!(f, "int") }
      CPrimType::Long => { write!(f, "long") }
      CPrimType::LongLong => { write!(f, "long long") }
      CPrimType::UChar => { write!(f, "unsigned char") }
      CPrimType::UShort => { write!(f, "unsigned short") }
      CPrimType::UInt => { write!(f, "unsigned int") }
      CPrimType::ULong => { write!(f, "unsigned long") }
      CPrimType::ULongLong => { write!(f, "unsigned long long") }
      CPrimType::Int128 => { write!(f, "__int128") }
      CPrimType::UInt128 => { write!(f, "unsigned __int128") }
      CPrimType::Float => { write!(f, "float") }
      CPrimType::Double => { write!(f, "double") }
      CPrimType::LongDouble => { write!(f, "long double") }
      CPrimType::Half => { write!(f, "half") }
      CPrimType::BFloat16 => { write!(f, "__bf16") }
      CPrimType::NullPtr => { write!(f, "std::nullptr_t") }
    }
  }
}

impl fmt::Display for IntLiteralValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IntLiteralValue::ULit(u) => write!(f,"{u}"),
      IntLiteralValue::ILit(i) => write!(f,"{i}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn type_names() {
    let unit = CCompUnit::new("a.c");
    let qt = CQualType::ptr(CQualType::prim(CPrimType::Char).with_const());
    assert_eq!(unit.type_name(&qt), "const char *");
    let arr = CQualType::array(CQualType::prim(CPrimType::UInt), 4);
    assert_eq!(unit.type_name(&arr), "unsigned int[4]");
    let func = CQualType::new(CType::Func(CFuncType::new(
      CQualType::new(CType::Void), vec![CQualType::prim(CPrimType::Int)])));
    assert_eq!(unit.type_name(&func), "void (int)");
  }
}
