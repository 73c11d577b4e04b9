use std::{path::PathBuf, sync::Mutex};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Isolated data and config locations for one test.
pub struct TestEnv {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
    pub out_dir: PathBuf,
}

impl TestEnv {
    /// A `finex` invocation pointed at this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("finex").expect("finex binary");
        cmd.arg("--data-dir")
            .arg(&self.data_dir)
            .arg("--config")
            .arg(&self.config_path)
            .env("RUST_LOG", "off");
        cmd
    }
}

pub fn setup_test_env() -> TestEnv {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    TestEnv {
        data_dir: base.join("data"),
        config_path: base.join("config.json"),
        out_dir: base.join("exports"),
    }
}
