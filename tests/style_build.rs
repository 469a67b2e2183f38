// tests/style_build.rs

use std::fs;
use std::path::Path;
use std::sync::Arc;

use assetpipe::errors::AssetpipeError;
use assetpipe::fs::RealFileSystem;
use assetpipe::orchestrator::{Project, run_css};
use assetpipe_test_utils::builders::ConfigFileBuilder;
use assetpipe_test_utils::init_tracing;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(root: &Path) -> Project {
    Project::new(root, ConfigFileBuilder::new().build(), Arc::new(RealFileSystem))
}

#[tokio::test]
async fn entry_with_reset_import_becomes_one_minified_css_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "sass/main.scss",
        "@import \"normalize\";\n$gap: 4px;\n.grid {\n  display: flex;\n  .cell { padding: $gap * 2; }\n}\n",
    );
    write(
        dir.path(),
        "vendor/_normalize.scss",
        "html {\n  line-height: 1.15;\n}\n",
    );

    let report = run_css(&project(dir.path())).await.unwrap();

    let out = dir.path().join("css/main.css");
    assert_eq!(report.written, vec![out.clone()]);
    let entries: Vec<_> = fs::read_dir(dir.path().join("css")).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let css = fs::read_to_string(out).unwrap();
    assert!(!css.is_empty());
    assert!(css.contains("html{line-height:1.15}"), "got {css}");
    assert!(css.contains(".grid .cell{padding:8px}"), "got {css}");
    assert!(!css.contains('\n'));
}

#[tokio::test]
async fn rebuilding_unchanged_sources_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "sass/main.scss",
        ".a { user-select: none; transition: opacity 1s; }\n",
    );
    let project = project(dir.path());

    run_css(&project).await.unwrap();
    let first = fs::read(dir.path().join("css/main.css")).unwrap();
    run_css(&project).await.unwrap();
    let second = fs::read(dir.path().join("css/main.css")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn old_browser_targets_get_prefixes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sass/main.scss", ".a { user-select: none; }\n");
    let cfg = ConfigFileBuilder::new().with_browsers(&["safari 8"]).build();
    let project = Project::new(dir.path(), cfg, Arc::new(RealFileSystem));

    run_css(&project).await.unwrap();

    let css = fs::read_to_string(dir.path().join("css/main.css")).unwrap();
    assert!(css.contains("-webkit-user-select:none"), "got {css}");
}

#[tokio::test]
async fn syntax_error_reports_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sass/main.scss", ".a { color: red;\n");

    let err = run_css(&project(dir.path())).await.unwrap_err();

    match err {
        AssetpipeError::CompileError { path, message } => {
            assert!(path.ends_with("sass/main.scss"));
            assert!(!message.is_empty());
        }
        other => panic!("expected CompileError, got {other:?}"),
    }
    assert!(!dir.path().join("css/main.css").exists());
}

#[tokio::test]
async fn missing_entry_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = run_css(&project(dir.path())).await.unwrap_err();

    assert!(matches!(err, AssetpipeError::IoError(_)), "got {err:?}");
}

#[tokio::test]
async fn minify_off_keeps_readable_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sass/main.scss", ".a { .b { color: red; } }\n");
    let cfg = ConfigFileBuilder::new().with_minify(false).build();

    run_css(&Project::new(dir.path(), cfg, Arc::new(RealFileSystem)))
        .await
        .unwrap();

    let css = fs::read_to_string(dir.path().join("css/main.css")).unwrap();
    assert!(css.contains(".a .b {\n"), "got {css}");
}
