//! Behaviour of a single module's compile through the orchestrator.

mod common;

use common::{file_names, toolchain, Module};
use kiln_analysis::AnalysisStore;
use kiln_compile::CompileError;
use kiln_diagnostics::Severity;

fn module(dir: &std::path::Path) -> Module {
    Module::new(&dir.join("app"), toolchain(&dir.join("scala")))
}

#[test]
fn first_compile_builds_everything_and_commits() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    m.write("B.scala", "class b.B api=1\nref a.A\n");

    let outcome = m.compile(&[]).unwrap();
    assert_eq!(file_names(&outcome.recompiled), ["A.scala", "B.scala"]);
    assert!(outcome.diagnostics.is_empty());
    assert!(m.store_path().is_file());
    assert!(m.output_dir().join("a/A.class").is_file());
    assert_eq!(outcome.analysis.sources().len(), 2);
}

#[test]
fn second_compile_without_changes_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    m.write("B.scala", "class b.B api=1\nref a.A\n");
    m.compile(&[]).unwrap();
    let before = std::fs::read(m.store_path()).unwrap();

    let outcome = m.compile(&[]).unwrap();
    assert!(outcome.recompiled.is_empty());
    assert_eq!(m.compiler.calls(), 1);
    assert_eq!(std::fs::read(m.store_path()).unwrap(), before);
}

#[test]
fn api_change_recompiles_direct_dependents_only() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    m.write("B.scala", "class b.B api=1\nref a.A\n");
    let c = m.write("C.scala", "class c.C api=1\n");
    m.compile(&[]).unwrap();

    let store = AnalysisStore::new(m.store_path());
    let cold = store.load().unwrap();
    let cold = cold.analysis().unwrap();
    let mappings: usize = cold.sources().values().map(|info| info.classes.len()).sum();
    assert_eq!(mappings, 3);
    assert_eq!(cold.classes().len(), 3);
    let c_source = cold.source(&c).unwrap().clone();
    let c_class = cold.class("c.C").unwrap().clone();

    m.write("A.scala", "class a.A api=2\n");
    let outcome = m.compile(&[]).unwrap();
    assert_eq!(file_names(&outcome.recompiled), ["A.scala", "B.scala"]);

    let batches = m.compiler.batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(file_names(&batches[1]), ["A.scala"]);
    assert_eq!(file_names(&batches[2]), ["B.scala"]);

    let warm = store.load().unwrap();
    let warm = warm.analysis().unwrap();
    assert_eq!(warm.source(&c), Some(&c_source));
    assert_eq!(warm.class("c.C"), Some(&c_class));
    assert_ne!(warm.api_of("a.A"), cold.api_of("a.A"));
    assert_eq!(warm.classes().len(), 3);
}

#[test]
fn failed_compile_keeps_previous_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    let a = m.write("A.scala", "class a.A api=1\n");
    m.compile(&[]).unwrap();
    let before = std::fs::read(m.store_path()).unwrap();

    m.write("A.scala", "class a.A api=1\nerror type mismatch\n");
    let err = m.compile(&[]).unwrap_err();
    assert_eq!(err.stage(), "compile");
    let CompileError::DelegatedCompileFailure { diagnostics } = err else {
        panic!("expected a delegated compile failure");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].message, "type mismatch");
    assert_eq!(diagnostics[0].position.source.as_deref(), Some(a.as_path()));
    assert_eq!(diagnostics[0].position.line, Some(2));
    assert_eq!(
        diagnostics[0].position.line_content.as_deref(),
        Some("error type mismatch")
    );

    assert_eq!(std::fs::read(m.store_path()).unwrap(), before);
}

#[test]
fn source_fixed_after_failure_compiles_again() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    m.compile(&[]).unwrap();

    m.write("A.scala", "error broken\n");
    assert!(m.compile(&[]).is_err());

    m.write("A.scala", "class a.A api=3\n");
    let outcome = m.compile(&[]).unwrap();
    assert_eq!(file_names(&outcome.recompiled), ["A.scala"]);
}

#[test]
fn warnings_do_not_fail_the_compile() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\nwarning deprecated call\n");

    let outcome = m.compile(&[]).unwrap();
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
    assert!(m.store_path().is_file());
}

#[test]
fn corrupt_store_aborts_before_compiling() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    std::fs::create_dir_all(m.store_path().parent().unwrap()).unwrap();
    std::fs::write(m.store_path(), b"not an analysis").unwrap();

    let err = m.compile(&[]).unwrap_err();
    assert!(matches!(err, CompileError::CorruptStore { .. }));
    assert_eq!(err.stage(), "analysis");
    assert_eq!(m.compiler.calls(), 0);
    assert_eq!(std::fs::read(m.store_path()).unwrap(), b"not an analysis");
}

#[test]
fn output_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    assert!(!m.output_dir().exists());
    m.compile(&[]).unwrap();
    assert!(m.output_dir().is_dir());
}

#[test]
fn output_dir_is_first_on_the_compile_classpath() {
    let dir = tempfile::tempdir().unwrap();
    let m = module(dir.path());
    m.write("A.scala", "class a.A api=1\n");
    let lib = dir.path().join("lib");
    std::fs::create_dir_all(&lib).unwrap();

    m.compile(&[lib.clone(), m.output_dir()]).unwrap();
    let classpaths = m.compiler.classpaths();
    assert_eq!(classpaths[0], vec![m.output_dir(), lib]);
}
