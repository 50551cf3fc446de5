use std::path::{Path, PathBuf};

pub(crate) const WORKER_SCRIPT: &str = include_str!("../static/worker.js");
const WORKER_FILE: &str = "worker.js";
const WASM_BUNDLE: &str = "pkg/webpushkit_bg.wasm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub created_public_dir: bool,
    pub worker_path: PathBuf,
    /// Whether the compiled wasm bundle the worker loads is already in place.
    pub bundle_present: bool,
}

/// Writes the worker glue to `<project_dir>/public/worker.js`, creating
/// `public/` when needed. An existing worker file is overwritten.
pub fn install_worker(project_dir: &Path) -> std::io::Result<SetupReport> {
    let public_dir = project_dir.join("public");
    let created_public_dir = !public_dir.is_dir();
    if created_public_dir {
        std::fs::create_dir_all(&public_dir)?;
    }

    let worker_path = public_dir.join(WORKER_FILE);
    std::fs::write(&worker_path, WORKER_SCRIPT)?;

    Ok(SetupReport {
        created_public_dir,
        worker_path,
        bundle_present: public_dir.join(WASM_BUNDLE).is_file(),
    })
}
