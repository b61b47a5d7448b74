//! Metrics collection using sysinfo.

use std::path::Path;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::warn;

use crate::state::AppState;
use crate::types::{
    CpuStats, DiskStats, HostStats, InterfaceInfo, LoadStats, MemoryStats, Metrics,
    NetworkInterfaces, NetworkStats, ProcessInfo,
};

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Refresh every handle and build a full snapshot.
pub async fn collect_metrics(state: &AppState) -> Metrics {
    let mut sys = state.sys.lock().await;
    if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
    })) {
        warn!("sysinfo refresh panicked: {e:?}");
    }

    let cpu = CpuStats {
        usage: f64::from(sys.global_cpu_usage()),
    };

    let mem_total = sys.total_memory();
    let mem_available = sys.available_memory();
    let mem_used = mem_total.saturating_sub(mem_available);
    let memory = MemoryStats {
        total: mem_total,
        available: mem_available,
        used: mem_used,
        used_percent: percent(mem_used, mem_total),
    };

    // Per-process CPU is normalized to a 0..100 scale across all cores.
    let n_cpus = sys.cpus().len().max(1) as f32;
    let processes: Vec<ProcessInfo> = {
        let users = state.users.lock().await;
        sys.processes()
            .values()
            .map(|p| ProcessInfo {
                pid: p.pid().as_u32(),
                username: p
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string())
                    .unwrap_or_default(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_usage: (p.cpu_usage() / n_cpus).min(100.0),
                mem_usage: percent(p.memory(), mem_total) as f32,
            })
            .collect()
    };
    drop(sys);

    let disk = {
        let mut disks = state.disks.lock().await;
        disks.refresh(false);
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first());
        match root {
            Some(d) => {
                let total = d.total_space();
                let free = d.available_space();
                let used = total.saturating_sub(free);
                DiskStats {
                    total,
                    free,
                    used,
                    used_percent: percent(used, total),
                }
            }
            None => DiskStats::default(),
        }
    };

    let (network, network_interfaces) = {
        let mut nets = state.networks.lock().await;
        nets.refresh(true);
        let mut network = NetworkStats::default();
        let mut interfaces = Vec::new();
        for (name, data) in nets.iter() {
            network.bytes_recv = network.bytes_recv.saturating_add(data.total_received());
            network.bytes_sent = network.bytes_sent.saturating_add(data.total_transmitted());
            interfaces.push(InterfaceInfo {
                name: name.clone(),
                mac_address: data.mac_address().to_string(),
                ips: data
                    .ip_networks()
                    .iter()
                    .map(|ip| format!("{}/{}", ip.addr, ip.prefix))
                    .collect(),
            });
        }
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        (network, NetworkInterfaces { interfaces })
    };

    let avg = System::load_average();
    let load = LoadStats {
        load1: avg.one,
        load5: avg.five,
        load15: avg.fifteen,
    };

    let host = HostStats {
        uptime: System::uptime(),
        host_name: System::host_name().unwrap_or_else(|| "unknown".into()),
        os: System::long_os_version()
            .or_else(System::name)
            .unwrap_or_default(),
    };

    Metrics {
        cpu,
        memory,
        disk,
        network,
        load,
        host,
        processes,
        network_interfaces,
    }
}

/// Latest sampled snapshot. A cold cache is filled inline so the first
/// request never sees an empty payload.
pub async fn latest_metrics(state: &AppState) -> Metrics {
    if let Some(m) = state.last_metrics.read().await.as_ref() {
        return m.clone();
    }
    let m = collect_metrics(state).await;
    *state.last_metrics.write().await = Some(m.clone());
    m
}
