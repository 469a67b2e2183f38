// tests/watch_end_to_end.rs

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use assetpipe::engine::{CoreRuntime, Runtime, RuntimeEvent};
use assetpipe::exec::StyleCompileBackend;
use assetpipe::fs::RealFileSystem;
use assetpipe::orchestrator::{Project, build_all, run_watch_until};
use assetpipe::types::TriggerWhileRunningBehaviour;
use assetpipe::watch::spawn_watcher;
use assetpipe::watch::watcher::WatchOptions;
use assetpipe_test_utils::builders::ConfigFileBuilder;
use assetpipe_test_utils::fixtures::{dimensions, jpeg, write_image};
use assetpipe_test_utils::{init_tracing, wait_until, with_timeout};

#[tokio::test]
async fn build_all_runs_both_tasks_independently() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sass")).unwrap();
    // Broken stylesheet: the image build must still succeed.
    fs::write(dir.path().join("sass/main.scss"), ".a {").unwrap();
    write_image(&dir.path().join("img_src/wide.jpg"), &jpeg(2000, 500));

    let project = Project::new(
        dir.path(),
        ConfigFileBuilder::new().build(),
        Arc::new(RealFileSystem),
    );
    let (css, img) = build_all(&project).await;

    assert!(css.is_err());
    assert_eq!(img.unwrap().written.len(), 1);
    assert_eq!(dimensions(&dir.path().join("img/wide.jpg")), (1260, 315));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn editing_a_partial_recompiles_the_entry() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("sass")).unwrap();
    fs::write(root.join("sass/main.scss"), "@import \"colors\";\n.a { color: $c; }\n").unwrap();
    fs::write(root.join("sass/_colors.scss"), "$c: #ff0000;\n").unwrap();

    let cfg = ConfigFileBuilder::new().build();
    let project = Project::new(&root, cfg, Arc::new(RealFileSystem));
    let out = root.join("css/main.css");

    let (tx, rx) = mpsc::channel(16);
    let _watcher = spawn_watcher(
        root.clone(),
        project.watch_profile().unwrap(),
        WatchOptions {
            debounce: Duration::from_millis(20),
            use_hash: false,
        },
        Arc::new(RealFileSystem),
        tx.clone(),
    )
    .unwrap();
    let backend = StyleCompileBackend::new(Arc::new(project.style_task().unwrap()), tx.clone());
    let runtime = Runtime::new(
        CoreRuntime::new(Default::default()),
        rx,
        backend,
    );
    let handle = tokio::spawn(runtime.run());

    // Give the OS watcher a moment to register.
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(root.join("sass/_colors.scss"), "$c: #0000ff;\n").unwrap();

    wait_until(|| {
        fs::read_to_string(&out)
            .map(|css| css.contains("color:#00f"))
            .unwrap_or(false)
    })
    .await;

    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    let core = with_timeout(handle).await.unwrap().unwrap();
    assert!(core.compiles_started() >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watch_entry_survives_a_broken_start_and_recompiles_on_fix() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("sass")).unwrap();
    fs::write(root.join("sass/main.scss"), ".a { color: red;\n").unwrap();
    write_image(&root.join("img_src/wide.jpg"), &jpeg(1500, 300));

    let cfg = ConfigFileBuilder::new()
        .with_behaviour(TriggerWhileRunningBehaviour::Queue)
        .build();
    let project = Project::new(&root, cfg, Arc::new(RealFileSystem));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        run_watch_until(&project, async move {
            let _ = stop_rx.await;
        })
        .await
    });

    // The initial image build still runs next to the failed stylesheet.
    let wide = root.join("img/wide.jpg");
    wait_until(|| wide.is_file()).await;
    let out = root.join("css/main.css");
    assert!(!out.exists());

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::write(root.join("sass/main.scss"), ".a { color: red; }\n").unwrap();

    wait_until(|| {
        fs::read_to_string(&out)
            .map(|css| css.contains("color:red"))
            .unwrap_or(false)
    })
    .await;

    stop_tx.send(()).unwrap();
    with_timeout(handle).await.unwrap().unwrap();
}
