//! Real host probe implementations.
//!
//! These back the core's injected probe traits with actual host
//! introspection: a TCP bind check for port availability, `/proc/meminfo`
//! plus `available_parallelism` for capacity, and a side-effect-free
//! filesystem check for the install directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stackdock_core::{CapacityProbe, HostCapacity, InstallDirProbe, PortProbe};
use tracing::debug;

/// Port probe that attempts a localhost TCP bind. A successful bind means
/// the port is free; the listener is dropped immediately.
#[derive(Debug, Default)]
pub struct TcpPortProbe;

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_port_free(&self, port: u16) -> bool {
        match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
            Ok(_listener) => true,
            Err(err) => {
                debug!("port {port} bind failed: {err}");
                false
            }
        }
    }
}

/// Capacity probe reading CPU count from the runtime and total RAM from
/// `/proc/meminfo`. Constructed via [`detect`](SysCapacityProbe::detect),
/// which returns `None` on hosts where memory information is unavailable —
/// the validator then skips the resource check instead of reporting
/// nonsense.
#[derive(Debug)]
pub struct SysCapacityProbe {
    capacity: HostCapacity,
}

impl SysCapacityProbe {
    pub fn detect() -> Option<Self> {
        let cpu_cores = std::thread::available_parallelism().ok()?.get() as u32;
        let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
        let ram_gb = parse_mem_total_gb(&meminfo)?;
        Some(Self {
            capacity: HostCapacity { cpu_cores, ram_gb },
        })
    }
}

#[async_trait]
impl CapacityProbe for SysCapacityProbe {
    async fn capacity(&self) -> HostCapacity {
        self.capacity
    }
}

/// Extract `MemTotal` from `/proc/meminfo` text, rounded down to whole GB.
fn parse_mem_total_gb(meminfo: &str) -> Option<u32> {
    let line = meminfo.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some((kb / (1024 * 1024)) as u32)
}

/// Install-dir probe. For an existing directory it verifies writability by
/// creating and removing a probe file; for a missing path it checks the
/// nearest existing ancestor the same way, so validation leaves nothing
/// behind either way.
#[derive(Debug, Default)]
pub struct FsInstallDirProbe;

const PROBE_FILE: &str = ".stackdock-writecheck";

#[async_trait]
impl InstallDirProbe for FsInstallDirProbe {
    async fn check_writable(&self, path: &Path) -> Result<(), String> {
        let target = nearest_existing(path);
        let meta = std::fs::metadata(&target).map_err(|e| e.to_string())?;
        if !meta.is_dir() {
            return Err(format!("{} is not a directory", target.display()));
        }

        let probe = target.join(PROBE_FILE);
        std::fs::write(&probe, b"").map_err(|e| e.to_string())?;
        let _ = std::fs::remove_file(&probe);
        Ok(())
    }
}

/// Walk up from `path` to the first component that exists on disk.
fn nearest_existing(path: &Path) -> PathBuf {
    let mut current = path.to_path_buf();
    while !current.exists() {
        match current.parent() {
            Some(parent) if parent.as_os_str().is_empty() => return PathBuf::from("."),
            Some(parent) => current = parent.to_path_buf(),
            None => return current,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mem_total() {
        let meminfo = "MemTotal:       32614536 kB\nMemFree:         1161960 kB\n";
        assert_eq!(parse_mem_total_gb(meminfo), Some(31));
    }

    #[test]
    fn test_parse_mem_total_missing_line() {
        assert_eq!(parse_mem_total_gb("MemFree: 12345 kB\n"), None);
    }

    #[tokio::test]
    async fn test_existing_tempdir_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FsInstallDirProbe;
        assert!(probe.check_writable(dir.path()).await.is_ok());
        // The probe file was cleaned up.
        assert!(!dir.path().join(PROBE_FILE).exists());
    }

    #[tokio::test]
    async fn test_missing_subdir_checks_existing_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let probe = FsInstallDirProbe;
        let target = dir.path().join("ai/stack");
        assert!(probe.check_writable(&target).await.is_ok());
        // Nothing was created along the way.
        assert!(!dir.path().join("ai").exists());
    }

    #[tokio::test]
    async fn test_file_as_install_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();

        let probe = FsInstallDirProbe;
        let err = probe.check_writable(&file).await.unwrap_err();
        assert!(err.contains("not a directory"));
    }

    #[tokio::test]
    async fn test_bound_port_reported_busy() {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpPortProbe;
        assert!(!probe.is_port_free(port).await);
        drop(listener);
    }
}
