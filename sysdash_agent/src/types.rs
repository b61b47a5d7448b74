//! Wire types served under `/api`. Field names here are what the dashboard
//! decodes, so keep them stable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, Default)]
pub struct CpuStats {
    pub usage: f64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct MemoryStats {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub used_percent: f64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct DiskStats {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub used_percent: f64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct NetworkStats {
    // cumulative totals; the client diffs to get rates
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct LoadStats {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct HostStats {
    pub uptime: u64,
    pub host_name: String,
    pub os: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProcessInfo {
    #[serde(rename = "Pid")]
    pub pid: u32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CPUUsage")]
    pub cpu_usage: f32,
    #[serde(rename = "MemUsage")]
    pub mem_usage: f32,
}

#[derive(Debug, Serialize, Clone)]
pub struct InterfaceInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MacAddress")]
    pub mac_address: String,
    #[serde(rename = "IPs")]
    pub ips: Vec<String>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct NetworkInterfaces {
    pub interfaces: Vec<InterfaceInfo>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct Metrics {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: NetworkStats,
    pub load: LoadStats,
    pub host: HostStats,
    pub processes: Vec<ProcessInfo>,
    pub network_interfaces: NetworkInterfaces,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Installing,
    Stopped,
    Started,
    Uninstalling,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceStatus::Installing => "INSTALLING",
            ServiceStatus::Stopped => "STOPPED",
            ServiceStatus::Started => "STARTED",
            ServiceStatus::Uninstalling => "UNINSTALLING",
        })
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: ServiceStatus,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Task {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CreatedTime")]
    pub created_time: DateTime<Utc>,
    #[serde(rename = "RunTime")]
    pub run_time: DateTime<Utc>,
    #[serde(rename = "IsFinished")]
    pub is_finished: bool,
}

/// Body of `POST /api/services`. The action stays a string so an unknown
/// verb can be answered with 501 rather than a decode error.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceActionRequest {
    pub name: String,
    pub action: String,
}

/// Body of `POST /api/tasks`. A missing run time means "now".
#[derive(Debug, Deserialize, Clone)]
pub struct NewTaskRequest {
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(default, alias = "RunTime")]
    pub run_time: Option<DateTime<Utc>>,
}
