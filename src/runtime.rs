//! Runtime bookkeeping for the service process: a small JSON file recording
//! which pid serves which address, so `status`, `shutdown`, and `open` can
//! find it later.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessesToUpdate, System};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub pid: u32,
    pub addr: String,
    pub db: PathBuf,
    pub started_at: String,
}

impl RuntimeInfo {
    pub fn current(addr: &str, db: &Path) -> Self {
        Self {
            pid: std::process::id(),
            addr: addr.to_string(),
            db: db.to_path_buf(),
            started_at: Utc::now().to_rfc3339(),
        }
    }
}

pub fn default_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".studyposts").join("runtime.json")
}

pub fn write(path: &Path, info: &RuntimeInfo) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(info).map_err(std::io::Error::other)?;
    fs::write(path, content)
}

/// A missing or unreadable file reads as "no recorded service".
pub fn read(path: &Path) -> Option<RuntimeInfo> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn remove(path: &Path) {
    let _ = fs::remove_file(path);
}

/// True when the recorded pid still maps to a live process.
pub fn is_alive(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
    system.process(Pid::from_u32(pid)).is_some()
}

/// Ask the process to exit. Returns false when it was not running.
pub fn kill(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
    match system.process(Pid::from_u32(pid)) {
        Some(process) => process.kill(),
        None => false,
    }
}
