use std::{fs, sync::Arc, thread::sleep, time::Duration};

use face_keybinder::input::{MockDisplayBackend, MockInputBackend};
use face_keybinder::settings::Settings;
use face_keybinder::Keybinder;
use serde_json::json;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn keybinder_events_reach_the_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    face_keybinder::logging::init(true, Some(path.clone()));

    let mut settings = Settings::default();
    settings
        .keyboard_bindings
        .insert("jawOpen".into(), json!(["keyboard", "space", 0.5, "hold"]));
    let mut keybinder = Keybinder::new(
        settings.into_shared(),
        Arc::new(MockInputBackend::default()),
        Arc::new(MockDisplayBackend::new(Vec::new())),
    );
    keybinder.start();
    keybinder.shutdown();

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("starting keybinder"));
    assert!(contents.contains("loaded bindings"));
    assert!(contents.contains("keybinder shut down"));
}
