// tests/image_build.rs

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use assetpipe::errors::AssetpipeError;
use assetpipe::fs::RealFileSystem;
use assetpipe::images::target_dimensions;
use assetpipe::orchestrator::{Project, run_img};
use assetpipe_test_utils::builders::ConfigFileBuilder;
use assetpipe_test_utils::fixtures::{animated_gif, dimensions, gif_frames, jpeg, png, write_image};
use assetpipe_test_utils::init_tracing;
use proptest::prelude::*;

fn project(root: &Path) -> Project {
    Project::new(root, ConfigFileBuilder::new().build(), Arc::new(RealFileSystem))
}

#[tokio::test]
async fn three_wide_jpegs_become_1260_wide() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        write_image(&dir.path().join("img_src").join(name), &jpeg(2000, 1000));
    }

    let report = run_img(&project(dir.path())).await.unwrap();

    assert_eq!(report.written.len(), 3);
    assert!(report.failed.is_empty());
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        assert_eq!(dimensions(&dir.path().join("img").join(name)), (1260, 630));
    }
}

#[tokio::test]
async fn narrow_images_are_not_upscaled() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("img_src/small.png"), &png(300, 200));

    run_img(&project(dir.path())).await.unwrap();

    assert_eq!(dimensions(&dir.path().join("img/small.png")), (300, 200));
}

#[tokio::test]
async fn upscale_flag_enlarges_narrow_images() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("img_src/small.png"), &png(100, 50));
    let cfg = ConfigFileBuilder::new()
        .with_image_width(400)
        .with_upscale(true)
        .build();

    run_img(&Project::new(dir.path(), cfg, Arc::new(RealFileSystem)))
        .await
        .unwrap();

    assert_eq!(dimensions(&dir.path().join("img/small.png")), (400, 200));
}

#[tokio::test]
async fn one_corrupt_file_does_not_stop_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("img_src/a.jpg"), &jpeg(1500, 900));
    write_image(&dir.path().join("img_src/b.png"), &png(200, 100));
    write_image(&dir.path().join("img_src/broken.jpg"), b"\xFF\xD8\xFF\xE0 truncated");
    write_image(&dir.path().join("img_src/d.jpg"), &jpeg(640, 480));

    let report = run_img(&project(dir.path())).await.unwrap();

    assert_eq!(report.written.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].path.ends_with("img_src/broken.jpg"));
    assert!(!dir.path().join("img/broken.jpg").exists());
    assert_eq!(dimensions(&dir.path().join("img/a.jpg")), (1260, 756));
}

#[tokio::test]
async fn animated_gifs_keep_their_frames() {
    let dir = tempfile::tempdir().unwrap();
    let small = animated_gif(64, 64, 4);
    write_image(&dir.path().join("img_src/small.gif"), &small);
    write_image(&dir.path().join("img_src/wide.gif"), &animated_gif(200, 100, 3));
    let cfg = ConfigFileBuilder::new().with_image_width(100).build();

    let report = run_img(&Project::new(dir.path(), cfg, Arc::new(RealFileSystem)))
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(fs::read(dir.path().join("img/small.gif")).unwrap(), small);
    let wide = fs::read(dir.path().join("img/wide.gif")).unwrap();
    assert_eq!(gif_frames(&wide), (3, (100, 50)));
}

#[tokio::test]
async fn hidden_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("img_src/.gitkeep"), b"");
    write_image(&dir.path().join("img_src/.DS_Store"), b"\0\0\0\x01Bud1");
    write_image(&dir.path().join("img_src/a.png"), &png(10, 10));

    let report = run_img(&project(dir.path())).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.written, vec![dir.path().join("img/a.png")]);
}

#[tokio::test]
async fn subdirectories_are_not_processed() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("img_src/top.png"), &png(10, 10));
    write_image(&dir.path().join("img_src/nested/deep.png"), &png(10, 10));

    let report = run_img(&project(dir.path())).await.unwrap();

    assert_eq!(report.written, vec![dir.path().join("img/top.png")]);
}

#[tokio::test]
async fn missing_source_directory_aborts() {
    let dir = tempfile::tempdir().unwrap();

    match run_img(&project(dir.path())).await {
        Err(AssetpipeError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("expected IoError, got {other:?}"),
    }
    assert!(!dir.path().join("img").exists());
}

#[tokio::test]
async fn outputs_are_never_larger_than_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("img_src/a.png");
    write_image(&src, &png(600, 400));

    run_img(&project(dir.path())).await.unwrap();

    let before = fs::metadata(&src).unwrap().len();
    let after = fs::metadata(dir.path().join("img/a.png")).unwrap().len();
    assert!(after <= before);
}

proptest! {
    #[test]
    fn width_bound_and_aspect_ratio(w in 1u32..10_000, h in 1u32..10_000, target in 1u32..4_000) {
        let (nw, nh) = target_dimensions(w, h, target, false);
        if w <= target {
            prop_assert_eq!((nw, nh), (w, h));
        } else {
            prop_assert_eq!(nw, target);
            let exact = h as f64 * target as f64 / w as f64;
            prop_assert!((nh as f64 - exact).abs() <= 1.0);
            prop_assert!(nh >= 1);
        }
    }
}
