//! The packing scenarios: a record with `#pragma pack(1)` against one without, two different
//! pack values, and two identical ones.

use structeq::{NonEquivalentSet, Session};
use structeq_core::Config;
use structeq_core::diagnostics::Severity;
use structeq_core::test_util::init_test_logging;
use structeq_ir::UnitBuilder;
use structeq_ir::ast::{CCompUnit, CDeclId, CPrimType, CQualType, CTagKind};

struct Units {
    first: CCompUnit,
    second: CCompUnit,
    // (name, decl in first, decl in second)
    pairs: Vec<(&'static str, CDeclId, CDeclId)>,
}

// `struct NAME { char a1; int a2; };` starting at `line`, optionally under `#pragma pack(bytes)`
// written on the line before.
fn packed_struct(b: &mut UnitBuilder, name: &str, line: u32, pack: Option<u64>) -> CDeclId {
    let rec = b.record(Some(name), CTagKind::Struct, line, 8);
    b.field(rec, Some("a1"), CQualType::prim(CPrimType::Char), line + 1, 8);
    b.field(rec, Some("a2"), CQualType::prim(CPrimType::Int), line + 2, 7);
    if let Some(bytes) = pack {
        b.pack(rec, bytes, line - 1, 9);
    }
    rec
}

fn units() -> Units {
    let mut b1 = UnitBuilder::new("attributes_list1.cpp");
    let x1 = packed_struct(&mut b1, "X", 3, Some(1));
    let x2_1 = packed_struct(&mut b1, "X2", 11, Some(1));
    let x3_1 = packed_struct(&mut b1, "X3", 19, Some(1));

    let mut b2 = UnitBuilder::new("attributes_list2.cpp");
    let x2 = packed_struct(&mut b2, "X", 2, None);
    let x2_2 = packed_struct(&mut b2, "X2", 9, Some(2));
    let x3_2 = packed_struct(&mut b2, "X3", 18, Some(1));

    Units {
        first: b1.finish(),
        second: b2.finish(),
        pairs: vec![("X", x1, x2), ("X2", x2_1, x2_2), ("X3", x3_1, x3_2)],
    }
}

#[test]
fn pack_scenarios() {
    init_test_logging();
    let units = units();
    let mut non_equivalent = NonEquivalentSet::new();
    let config = Config::mock();
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut results = Vec::new();
    for &(name, d1, d2) in &units.pairs {
        let mut session = Session::new(&units.first, &units.second, &mut non_equivalent, &config);
        results.push((name, session.is_equivalent_decls(d1, d2)));
        let (diags1, diags2) = session.into_diagnostics();
        first.extend(diags1);
        second.extend(diags2);
    }
    assert_eq!(results, [("X", false), ("X2", false), ("X3", true)]);

    let first: Vec<_> = first.iter().map(ToString::to_string).collect();
    let second: Vec<_> = second.iter().map(ToString::to_string).collect();
    assert_eq!(
        second,
        [
            "attributes_list2.cpp:2:8: error: attribute 'pack' is missing",
            "attributes_list2.cpp:8:9: note: attribute 'pack' here",
        ]
    );
    assert_eq!(
        first,
        [
            "attributes_list1.cpp:2:9: note: attribute 'pack' here",
            "attributes_list1.cpp:11:8: error: type 'X2' declared with incompatible 'pack' \
             attribute value in different translation units (8 bits vs. 16 bits)",
        ]
    );
    assert_eq!(non_equivalent.len(), 2);
}

#[test]
fn errors_are_counted_per_side() {
    let units = units();
    let mut non_equivalent = NonEquivalentSet::new();
    let config = Config::mock();
    let (_, d1, d2) = units.pairs[0];
    let mut session = Session::new(&units.first, &units.second, &mut non_equivalent, &config);
    assert!(!session.is_equivalent_decls(d1, d2));
    assert_eq!(session.diagnostics1().error_count(), 0);
    assert_eq!(session.diagnostics2().error_count(), 1);
    assert_eq!(session.diagnostics1().diagnostics()[0].severity, Severity::Note);
}

#[test]
fn silent_sessions_only_answer() {
    let units = units();
    let mut non_equivalent = NonEquivalentSet::new();
    let config = Config::mock().with_complain(false);
    for &(name, d1, d2) in &units.pairs {
        let mut session = Session::new(&units.first, &units.second, &mut non_equivalent, &config);
        assert_eq!(session.is_equivalent_decls(d1, d2), name == "X3");
        let (first, second) = session.into_diagnostics();
        assert!(first.is_empty() && second.is_empty());
    }
    // failures are remembered even when nothing was reported
    assert_eq!(non_equivalent.len(), 2);
}

#[test]
fn known_violations_are_not_reported_twice() {
    let units = units();
    let mut non_equivalent = NonEquivalentSet::new();
    let config = Config::mock();
    let (_, d1, d2) = units.pairs[1];
    for expected_diagnostics in [2, 0] {
        let mut session = Session::new(&units.first, &units.second, &mut non_equivalent, &config);
        assert!(!session.is_equivalent_decls(d1, d2));
        let (first, second) = session.into_diagnostics();
        assert_eq!(first.len() + second.len(), expected_diagnostics);
    }
}
