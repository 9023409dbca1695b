//! Temporary workspaces and scenario files for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use rideshare_sim::SimulationResult;
use tempfile::TempDir;

use crate::scenario::Scenario;

pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture");
}

pub(super) fn write_scenario(path: &Utf8Path, scenario: &Scenario) {
    let payload = serde_json::to_vec_pretty(scenario).expect("encode scenario");
    write_utf8(path, &payload);
}

pub(super) fn decode_result(bytes: &[u8]) -> SimulationResult {
    serde_json::from_slice(bytes).expect("decode simulation result")
}
