use std::{env, fs, path::PathBuf, thread::sleep, time::Duration};

use tempfile::tempdir;

// Runs in its own test binary: the global subscriber can only be set once.
#[test]
fn bare_file_name_logs_into_working_directory() {
    let dir = tempdir().unwrap();
    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    face_keybinder::logging::init(false, Some(PathBuf::from("keybinder.log")));
    tracing::info!("relative log target");
    tracing::debug!("filtered out");

    sleep(Duration::from_millis(100));
    env::set_current_dir(previous).unwrap();

    let contents = fs::read_to_string(dir.path().join("keybinder.log")).unwrap();
    assert!(contents.contains("relative log target"));
    assert!(!contents.contains("filtered out"));
}
