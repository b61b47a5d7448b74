//! Types that mirror the API's JSON schema.
//!
//! The API has shipped two spellings of the same payloads (PascalCase field
//! names and snake_case struct tags); every field accepts both.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CpuStats {
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct MemoryStats {
    #[serde(default)]
    pub used_percent: f64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub used: u64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct DiskStats {
    #[serde(default)]
    pub used_percent: f64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub free: u64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct NetworkStats {
    // cumulative totals; client diffs to compute rates
    #[serde(default)]
    pub bytes_sent: u64,
    #[serde(default)]
    pub bytes_recv: u64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct LoadStats {
    #[serde(default)]
    pub load1: f64,
    #[serde(default)]
    pub load5: f64,
    #[serde(default)]
    pub load15: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct HostStats {
    #[serde(default)]
    pub uptime: u64,
    #[serde(default, alias = "hostname")]
    pub host_name: String,
    #[serde(default)]
    pub os: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProcessEntry {
    #[serde(rename = "Pid", alias = "pid")]
    pub pid: i64,
    #[serde(rename = "Username", alias = "username", default)]
    pub username: String,
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "CPUUsage", alias = "cpu_usage", default)]
    pub cpu_usage: f64,
    #[serde(rename = "MemUsage", alias = "mem_usage", default)]
    pub mem_usage: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InterfaceEntry {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "MacAddress", alias = "mac", alias = "mac_address", default)]
    pub mac_address: String,
    #[serde(rename = "IPs", alias = "ips", default)]
    pub ips: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct NetworkInterfaces {
    #[serde(default)]
    pub interfaces: Vec<InterfaceEntry>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub cpu: CpuStats,
    #[serde(default)]
    pub memory: MemoryStats,
    #[serde(default)]
    pub disk: DiskStats,
    #[serde(default)]
    pub network: NetworkStats,
    #[serde(default)]
    pub load: LoadStats,
    #[serde(default)]
    pub host: HostStats,
    #[serde(default)]
    pub processes: Vec<ProcessEntry>,
    #[serde(default)]
    pub network_interfaces: NetworkInterfaces,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceEntry {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Status", alias = "status", default)]
    pub status: String,
}

/// `GET /api/services`: opaque id -> service.
pub type ServicesPayload = BTreeMap<String, ServiceEntry>;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TaskEntry {
    #[serde(rename = "ID", alias = "id")]
    pub id: u64,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
    #[serde(rename = "IsFinished", alias = "is_finished", default)]
    pub is_finished: bool,
    #[serde(rename = "RunTime", alias = "run_time", default)]
    pub run_time: Option<DateTime<Utc>>,
}

/// `GET /api/tasks`: opaque id -> task.
pub type TasksPayload = BTreeMap<String, TaskEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAction {
    Install,
    Start,
    Stop,
    Reload,
    Uninstall,
}

impl ServiceAction {
    /// Button order in the services panel.
    pub const ALL: [ServiceAction; 5] = [
        ServiceAction::Install,
        ServiceAction::Start,
        ServiceAction::Stop,
        ServiceAction::Reload,
        ServiceAction::Uninstall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Install => "install",
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Reload => "reload",
            ServiceAction::Uninstall => "uninstall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceAction::Install => "Install",
            ServiceAction::Start => "Start",
            ServiceAction::Stop => "Stop",
            ServiceAction::Reload => "Reload",
            ServiceAction::Uninstall => "Uninstall",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown service action '{s}'"))
    }
}

/// Body of `POST /api/services`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceActionRequest {
    pub name: String,
    pub action: ServiceAction,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTaskRequest {
    pub description: String,
    pub run_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_accepts_pascal_case_payload() {
        let json = r#"{
            "cpu": {"usage": 12.5},
            "memory": {"used_percent": 40.0},
            "disk": {"used_percent": 70.25},
            "network": {"bytes_sent": 1024, "bytes_recv": 2048},
            "load": {"load1": 0.5, "load5": 0.25, "load15": 0.1},
            "host": {"uptime": 90061},
            "processes": [
                {"Pid": 1, "Username": "root", "Name": "init", "CPUUsage": 0.1, "MemUsage": 0.2}
            ],
            "network_interfaces": {"interfaces": [
                {"Name": "eth0", "MacAddress": "aa:bb", "IPs": ["10.0.0.2/24"]}
            ]}
        }"#;
        let m: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(m.host.uptime, 90061);
        assert_eq!(m.processes[0].username, "root");
        assert_eq!(m.network_interfaces.interfaces[0].ips, vec!["10.0.0.2/24"]);
    }

    #[test]
    fn metrics_accepts_snake_case_tags() {
        let json = r#"{
            "cpu": {"usage": 1.0},
            "host": {"uptime": 5, "host_name": "box"},
            "processes": [
                {"pid": 7, "username": "me", "name": "sh", "cpu_usage": 3.0, "mem_usage": 1.5}
            ],
            "network_interfaces": {"interfaces": [
                {"name": "lo", "mac": "", "ips": ["127.0.0.1/8"]}
            ]}
        }"#;
        let m: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(m.processes[0].pid, 7);
        assert_eq!(m.host.host_name, "box");
        assert_eq!(m.network_interfaces.interfaces[0].name, "lo");
        assert_eq!(m.memory, MemoryStats::default());
    }

    #[test]
    fn tasks_payload_parses_with_optional_run_time() {
        let json = r#"{
            "0": {"ID": 0, "Description": "backup", "IsFinished": false},
            "3": {"ID": 3, "Description": "rotate", "IsFinished": true, "RunTime": "2024-05-01T10:00:00Z"}
        }"#;
        let tasks: TasksPayload = serde_json::from_str(json).unwrap();
        assert_eq!(tasks["0"].run_time, None);
        assert!(tasks["3"].is_finished);
        assert!(tasks["3"].run_time.is_some());
    }

    #[test]
    fn service_action_wire_names() {
        let body = ServiceActionRequest {
            name: "nginx".into(),
            action: ServiceAction::Uninstall,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"name":"nginx","action":"uninstall"}"#
        );
        assert_eq!("reload".parse::<ServiceAction>(), Ok(ServiceAction::Reload));
        assert!("restart".parse::<ServiceAction>().is_err());
    }
}
