//! Positional keys for unnamed aggregate members. An anonymous struct or union has no name to
//! match across units, so it is matched by its position among its record's unnamed members.

use structeq_ir::ast::{CCompUnit, CDeclId, CQualType, CType};

/// Finds the 0-based index of the anonymous struct or union `anon` among the unnamed aggregate
/// members of the record that contains it.
///
/// Counted members are anonymous struct/union members and fields whose type is a record declared
/// in the containing record or an unnamed record (`struct { int x; } a;`). If `anon` is not
/// among them, the next index is returned. Returns `None` when `anon` is not declared inside a
/// record, e.g. at namespace scope.
pub fn find_anonymous_struct_or_union_index(unit: &CCompUnit, anon: CDeclId) -> Option<u32> {
    let owner = unit.get(anon)?.parent?;
    let record = unit.get(owner)?.as_record()?;

    let mut index = 0;
    for &field in record.fields.iter().flatten() {
        if let Some(member) = unit.anonymous_member_record(field) {
            if member == anon {
                return Some(index);
            }
            index += 1;
            continue;
        }

        let Some(typ) = unit.get(field).and_then(|d| d.as_field()).map(|f| &f.typ) else {
            continue;
        };
        let CType::Record(rec) = strip_elaborated(typ) else {
            continue;
        };
        let Some(rec_decl) = unit.get(*rec) else {
            continue;
        };
        if rec_decl.parent == Some(owner) || rec_decl.name.is_none() {
            if *rec == anon {
                return Some(index);
            }
            index += 1;
        }
    }
    Some(index)
}

// `struct S` written as the type of a member; typedefs are not looked through
fn strip_elaborated(mut typ: &CQualType) -> &CType {
    while let CType::Elaborated(_, _, inner) = &*typ.typ {
        typ = inner;
    }
    &typ.typ
}

#[cfg(test)]
mod tests {
    use super::*;
    use structeq_ir::UnitBuilder;
    use structeq_ir::ast::{CElabKeyword, CPrimType, CTagKind};

    #[test]
    fn indexes_unnamed_members() {
        let mut b = UnitBuilder::new("a.c");
        let outer = b.record(Some("Outer"), CTagKind::Struct, 1, 8);
        b.field(outer, Some("n"), CQualType::prim(CPrimType::Int), 2, 7);
        let u0 = b.anonymous_record(outer, CTagKind::Union, 3, 3);
        let named = b.nested_record(outer, None, CTagKind::Struct, 4, 3);
        let elaborated =
            CQualType::new(CType::Elaborated(CElabKeyword::Struct, None, CQualType::record(named)));
        b.field(outer, Some("s"), elaborated, 4, 22);
        let u2 = b.anonymous_record(outer, CTagKind::Union, 5, 3);
        let stray = b.record(None, CTagKind::Union, 7, 1);
        let unit = b.finish();

        assert_eq!(find_anonymous_struct_or_union_index(&unit, u0), Some(0));
        assert_eq!(find_anonymous_struct_or_union_index(&unit, named), Some(1));
        assert_eq!(find_anonymous_struct_or_union_index(&unit, u2), Some(2));
        assert_eq!(find_anonymous_struct_or_union_index(&unit, stray), None);
    }

    #[test]
    fn unlisted_record_gets_next_index() {
        let mut b = UnitBuilder::new("a.c");
        let outer = b.record(Some("Outer"), CTagKind::Struct, 1, 8);
        b.anonymous_record(outer, CTagKind::Struct, 2, 3);
        let unused = b.nested_record(outer, Some("Unused"), CTagKind::Struct, 3, 10);
        let unit = b.finish();
        assert_eq!(find_anonymous_struct_or_union_index(&unit, unused), Some(1));
    }
}
