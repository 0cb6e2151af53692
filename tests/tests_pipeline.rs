//! End-to-end pipeline tests: config in, frozen global index out.

#![allow(clippy::unwrap_used)]

mod helpers;

use helpers::{Project, ref_rows};
use rstest::rstest;
use xref::store::Index;
use xref::{SourceFileInfo, run};

#[test]
fn test_definition_and_cross_file_use_share_symbol_id() {
    let project = Project::new();
    // a.x defines f; b.x pulls in the definition and calls it.
    let a = project.source("a.x", "fn f { }\n");
    let b = project.source("b.x", "include \"a.x\"\nfn main { f(); }\n");

    let (index, diagnostics) = run(&[a.clone(), b]);
    assert!(diagnostics.is_empty());

    let rows = ref_rows(&index);
    let f_rows: Vec<_> = rows.iter().filter(|r| r.usr == "f:f").collect();
    // The definition is seen twice (once per translation unit) plus the
    // call site; all three collapse onto one usr.
    assert_eq!(f_rows.len(), 3);
    assert!(f_rows.iter().any(|r| r.kind == "CallExpr"));
    assert!(f_rows.iter().all(|r| r.usr == "f:f"));
    assert_eq!(
        f_rows.iter().filter(|r| r.kind == "FunctionDecl").count(),
        2
    );

    // One entry in the global usr table, referenced by both files' rows.
    let usrs = index.string_table("usr").unwrap();
    assert_eq!(usrs.iter().filter(|s| *s == "f:f").count(), 1);
    let decl_paths: Vec<_> = f_rows.iter().map(|r| r.path.as_str()).collect();
    assert!(decl_paths.iter().any(|p| p.ends_with("a.x")));
    assert!(decl_paths.iter().any(|p| p.ends_with("b.x")));
}

#[test]
fn test_failure_isolation_keeps_healthy_files() {
    let project = Project::new();
    let a = project.source("a.x", "var a;\n");
    let b = project.source("b.x", "fn oops {\n"); // unterminated body
    let c = project.source("c.x", "var c;\n");

    let (index, diagnostics) = run(&[a, b.clone(), c]);

    assert_eq!(diagnostics.len(), 1);
    let rows = ref_rows(&index);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].usr, "v:a");
    assert_eq!(rows[1].usr, "v:c");
    assert!(rows.iter().all(|r| !r.path.ends_with("b.x")));
}

#[test]
fn test_global_rows_follow_input_order() {
    let project = Project::new();
    let sources: Vec<_> = (0..5)
        .map(|i| project.source(&format!("f{i}.x"), &format!("var v{i};\n")))
        .collect();

    let (index, _) = run(&sources);
    let rows = ref_rows(&index);
    let usrs: Vec<_> = rows.iter().map(|r| r.usr.as_str()).collect();
    assert_eq!(usrs, vec!["v:v0", "v:v1", "v:v2", "v:v3", "v:v4"]);
}

#[test]
fn test_ref_and_loc_stay_paired_through_merge() {
    let project = Project::new();
    let a = project.source("a.x", "var x;\nfn f { x; }\n");
    let b = project.source("b.x", "var x;\nfn g { x; f(); }\n");

    let (index, _) = run(&[a, b]);
    let refs = index.table("ref").unwrap();
    let locs = index.table("loc").unwrap();
    assert_eq!(refs.row_count(), locs.row_count());
    for (ref_row, loc_row) in refs.rows().zip(locs.rows()) {
        assert_eq!(ref_row[0], loc_row[3]); // usr
        assert_eq!(ref_row[1], loc_row[0]); // path
        assert_eq!(ref_row[2], loc_row[1]); // line
        assert_eq!(ref_row[3], loc_row[2]); // column
    }
}

#[test]
fn test_frozen_global_index_rejects_writes() {
    let project = Project::new();
    let a = project.source("a.x", "var a;\n");
    let (index, _) = run(&[a]);
    assert!(index.is_frozen());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let mut index = index;
        index.intern("usr", "v:late");
    }));
    assert!(result.is_err());
}

#[rstest]
#[case("var thing;", "v:thing", "VarDecl")]
#[case("type thing;", "t:thing", "TypeDecl")]
#[case("fn thing { }", "f:thing", "FunctionDecl")]
fn test_declaration_kinds(#[case] source: &str, #[case] usr: &str, #[case] kind: &str) {
    let project = Project::new();
    let entry = project.source("decl.x", source);

    let (index, diagnostics) = run(&[entry]);
    assert!(diagnostics.is_empty());
    let rows = ref_rows(&index);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].usr, usr);
    assert_eq!(rows[0].kind, kind);
}

#[test]
fn test_per_file_flags_are_independent() {
    let project = Project::new();
    let path = project.file("shared.x", "#ifdef EXTRA\nvar extra;\n#endif\nvar base;\n");

    let plain = SourceFileInfo::with_path(path.display().to_string());
    let mut with_extra = plain.clone();
    with_extra.defines.push("EXTRA".into());

    let (index, _) = run(&[plain, with_extra]);
    let rows = ref_rows(&index);
    // First translation unit contributes one row, the second two.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|r| r.usr == "v:extra").count(), 1);
    assert_eq!(rows.iter().filter(|r| r.usr == "v:base").count(), 2);
}

#[test]
fn test_artifact_roundtrip() {
    let project = Project::new();
    let a = project.source("a.x", "fn f { }\n");
    let config = project.file(
        "sources.json",
        &format!(r#"[{{"file": "{}"}}]"#, a.file),
    );
    let artifact = project.dir.path().join("index.json");

    let diagnostics = xref::indexer::run_config_to_file(&config, &artifact).unwrap();
    assert!(diagnostics.is_empty());

    let restored = Index::load(&artifact).unwrap();
    assert!(restored.is_frozen());
    let rows = ref_rows(&restored);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].usr, "f:f");
}
