//! Resource Probe - host disk/memory/CPU, independent of the node
//!
//! Purely observational and best-effort: a metric that cannot be read on
//! this host is omitted from the snapshot, never an error. The disk figure
//! is for the filesystem holding the node's data directory.

use std::path::Path;

use serde::Serialize;
use sysinfo::{Disks, System};
use tracing::debug;

use crate::metrics::bytes_to_gb;

/// Host resource snapshot taken once per run.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSnapshot {
    pub disk: Option<DiskUsage>,
    pub memory: Option<MemoryUsage>,
    pub load: Option<LoadAverage>,
}

/// Usage of the filesystem containing the node's data directory.
#[derive(Debug, Clone, Serialize)]
pub struct DiskUsage {
    pub mount_point: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f64,
}

impl DiskUsage {
    pub fn available_gb(&self) -> f64 {
        bytes_to_gb(self.available_bytes)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryUsage {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f64,
}

/// 1/5/15-minute load averages; not available on every host.
#[derive(Debug, Clone, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub cores: usize,
}

/// Take a full snapshot. Never fails.
pub fn probe(datadir: &Path) -> ResourceSnapshot {
    ResourceSnapshot {
        disk: probe_disk(datadir),
        memory: probe_memory(),
        load: probe_load(),
    }
}

/// Longest mount-point prefix match picks the disk holding `datadir`.
fn probe_disk(datadir: &Path) -> Option<DiskUsage> {
    let disks = Disks::new_with_refreshed_list();

    let best = disks
        .list()
        .iter()
        .filter(|d| datadir.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())?;

    let total = best.total_space();
    let available = best.available_space();
    if total == 0 {
        return None;
    }
    let used_percent = ((total - available) as f64 / total as f64) * 100.0;

    debug!(
        "datadir {} lives on {} ({:.1}% used)",
        datadir.display(),
        best.mount_point().display(),
        used_percent
    );

    Some(DiskUsage {
        mount_point: best.mount_point().to_string_lossy().to_string(),
        total_bytes: total,
        available_bytes: available,
        used_percent,
    })
}

fn probe_memory() -> Option<MemoryUsage> {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    if total == 0 {
        return None;
    }
    let used = sys.used_memory();
    Some(MemoryUsage {
        total_bytes: total,
        available_bytes: sys.available_memory(),
        used_percent: (used as f64 / total as f64) * 100.0,
    })
}

fn probe_load() -> Option<LoadAverage> {
    let load = System::load_average();
    // Hosts without load averages (notably Windows) report all zeros.
    if load.one == 0.0 && load.five == 0.0 && load.fifteen == 0.0 && cfg!(target_os = "windows") {
        return None;
    }
    Some(LoadAverage {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
        cores: num_cpus::get(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_never_panics_on_odd_paths() {
        // A path that exists nowhere; disk may be None, the rest is
        // host-dependent and just must not panic.
        let snapshot = probe(Path::new("/nonexistent/deeply/nested/datadir"));
        if let Some(memory) = snapshot.memory {
            assert!(memory.used_percent >= 0.0 && memory.used_percent <= 100.0);
        }
    }

    #[cfg(unix)]
    #[test]
    fn root_datadir_finds_a_disk() {
        let snapshot = probe(Path::new("/"));
        if let Some(disk) = snapshot.disk {
            assert!(disk.total_bytes > 0);
            assert!(disk.used_percent >= 0.0 && disk.used_percent <= 100.0);
        }
    }
}
