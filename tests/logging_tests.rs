//! Logging goes to stdout and to a file in the given directory.
//!
//! A global subscriber can only be installed once per process, so this
//! binary holds a single test that walks every `init` path in order.

use vdesk_overlay::logging;
use vdesk_overlay::model::constants::LOG_FILE_NAME;

#[test]
fn init_paths_install_once_and_write_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    let guard = logging::init(Some(&log_dir));
    assert!(guard.is_some());
    tracing::info!("hello from the logging test");
    drop(guard);

    let contents = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
    assert!(contents.contains("hello from the logging test"));

    // Stdout only: no guard, and a second init must not panic
    assert!(logging::init(None).is_none());

    // A directory below a regular file cannot be created
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    assert!(logging::init(Some(&blocker.join("logs"))).is_none());
}
