//! End-to-end scenarios exercising the full pipeline: documents on disk, through the engine, to
//! a rendered report.

use std::fs;
use std::path::Path;
use valence::cli_files;
use valence::config::DocumentLoader;
use valence::engine::Engine;
use valence::executor::SourceFile;
use valence::overrides::OverrideStore;
use valence::plugins::PluginLoader;
use valence::report::{ReportFormat, ReportGenerator};

fn write(dir: &Path, sub: &str, name: &str, content: &str) {
    let path = dir.join(sub);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join(format!("{name}.json")), content).unwrap();
}

fn engine_with_documents(docs_root: &Path, overrides_path: &Path) -> Engine {
    let documents = DocumentLoader::new(docs_root);
    let plugins = PluginLoader::empty("/nonexistent/plugins");
    let overrides = OverrideStore::new(overrides_path);
    Engine::new(documents, plugins, overrides).unwrap()
}

#[test]
fn clean_codebase_passes_every_validator() {
    let docs = tempfile::tempdir().unwrap();
    write(
        docs.path(),
        "validators",
        "NoTodo",
        r#"{"name":"NoTodo","type":"content","rules":[{"operator":"mustContain","value":"fn main"}]}"#,
    );
    write(
        docs.path(),
        "profiles",
        "Default",
        r#"{"name":"Default","validators":["NoTodo"],"validationLevels":null}"#,
    );

    let overrides = tempfile::tempdir().unwrap();
    let mut engine = engine_with_documents(docs.path(), &overrides.path().join("overrides.json"));

    let files = vec![SourceFile::new("src/main.rs", "fn main() {}")];
    let report = engine.run("Default", &files).unwrap();

    assert!(report.passed());
    assert_eq!(report.stats.total_violations, 0);
}

#[test]
fn violating_codebase_fails_and_reports_the_violation() {
    let docs = tempfile::tempdir().unwrap();
    write(
        docs.path(),
        "validators",
        "HasHeader",
        r#"{"name":"HasHeader","type":"content","rules":[{"operator":"matchesPattern","value":"^// Copyright","message":"missing copyright header"}]}"#,
    );
    write(
        docs.path(),
        "profiles",
        "Default",
        r#"{"name":"Default","validators":["HasHeader"],"validationLevels":null}"#,
    );

    let overrides = tempfile::tempdir().unwrap();
    let mut engine = engine_with_documents(docs.path(), &overrides.path().join("overrides.json"));

    let files = vec![SourceFile::new("src/main.rs", "// TODO: finish this\nfn main() {}")];
    let report = engine.run("Default", &files).unwrap();

    assert!(!report.passed());
    assert_eq!(report.results[0].violations[0].message, "missing copyright header");
}

#[test]
fn overridden_violation_is_suppressed_on_a_subsequent_run() {
    let docs = tempfile::tempdir().unwrap();
    write(
        docs.path(),
        "validators",
        "NoTodo",
        r#"{"name":"NoTodo","type":"content","rules":[{"operator":"mustContain","value":"fn main"}]}"#,
    );
    write(
        docs.path(),
        "profiles",
        "Default",
        r#"{"name":"Default","validators":["NoTodo"],"validationLevels":null}"#,
    );

    let overrides_dir = tempfile::tempdir().unwrap();
    let overrides_path = overrides_dir.path().join("overrides.json");
    let files = vec![SourceFile::new("src/empty.rs", "// nothing here")];

    let violation = {
        let mut engine = engine_with_documents(docs.path(), &overrides_path);
        let report = engine.run("Default", &files).unwrap();
        assert!(!report.passed());
        report.results[0].violations[0].clone()
    };

    {
        let mut engine = engine_with_documents(docs.path(), &overrides_path);
        engine
            .overrides_mut()
            .add(&violation, "src/empty.rs", "tracked separately", "someone");
        engine.save_overrides().unwrap();
    }

    let mut engine = engine_with_documents(docs.path(), &overrides_path);
    let report = engine.run("Default", &files).unwrap();
    assert!(report.passed());
    assert_eq!(report.results[0].overridden_violations.len(), 1);
}

#[test]
fn unknown_profile_fails_the_whole_run_before_any_validator_executes() {
    let docs = tempfile::tempdir().unwrap();
    let overrides = tempfile::tempdir().unwrap();
    let mut engine = engine_with_documents(docs.path(), &overrides.path().join("overrides.json"));
    assert!(engine.run("DoesNotExist", &[]).is_err());
}

#[test]
fn unknown_operator_in_a_validator_produces_a_failed_result_not_a_crash() {
    let docs = tempfile::tempdir().unwrap();
    write(
        docs.path(),
        "validators",
        "Broken",
        r#"{"name":"Broken","type":"content","rules":[{"operator":"doesNotExist","value":"x"}]}"#,
    );
    write(
        docs.path(),
        "profiles",
        "Default",
        r#"{"name":"Default","validators":["Broken"],"validationLevels":null}"#,
    );

    let overrides = tempfile::tempdir().unwrap();
    let mut engine = engine_with_documents(docs.path(), &overrides.path().join("overrides.json"));
    let files = vec![SourceFile::new("a.rs", "x")];
    let report = engine.run("Default", &files).unwrap();

    assert!(!report.passed());
    assert!(report.results[0].message.starts_with("Validation error:"));
}

#[test]
fn report_renders_in_all_three_required_formats() {
    let docs = tempfile::tempdir().unwrap();
    write(
        docs.path(),
        "validators",
        "NoTodo",
        r#"{"name":"NoTodo","type":"content","rules":[{"operator":"mustContain","value":"fn main"}]}"#,
    );
    write(
        docs.path(),
        "profiles",
        "Default",
        r#"{"name":"Default","validators":["NoTodo"],"validationLevels":null}"#,
    );

    let overrides = tempfile::tempdir().unwrap();
    let mut engine = engine_with_documents(docs.path(), &overrides.path().join("overrides.json"));
    let files = vec![SourceFile::new("src/main.rs", "fn main() {}")];
    let report = engine.run("Default", &files).unwrap();

    for format in [ReportFormat::Json, ReportFormat::Markdown, ReportFormat::Html] {
        assert!(ReportGenerator::render(&report, format).is_ok());
    }
}

#[test]
fn cli_files_expand_and_load_skip_build_directories() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/main.rs"), "fn main() {}").unwrap();
    fs::create_dir_all(tmp.path().join("node_modules")).unwrap();
    fs::write(tmp.path().join("node_modules/ignored.js"), "ignored").unwrap();

    let expanded = cli_files::expand(&[tmp.path().to_path_buf()]).unwrap();
    let files = cli_files::load(&expanded).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].path.ends_with("src/main.rs"));
}
