//! One syllabus-server per configured port.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use syllabus_core::config::SyllabusConfig;

/// Held for the life of the server; the lock is released on drop.
pub struct LockGuard {
    _file: File,
}

/// `<runtime_dir>/syllabus/server-<port>.lock`
fn lock_path(config: &SyllabusConfig) -> Result<PathBuf> {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .context("Could not determine runtime directory")?;

    Ok(runtime_dir
        .join("syllabus")
        .join(format!("server-{}.lock", config.server_port)))
}

pub fn acquire_lock(config: &SyllabusConfig) -> Result<LockGuard> {
    lock_file(&lock_path(config)?)
}

fn lock_file(path: &Path) -> Result<LockGuard> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create lock file {}", path.display()))?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "A syllabus-server is already serving this port.\n\
            Stop it, change `server_port`, or remove the stale lock: {}",
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
