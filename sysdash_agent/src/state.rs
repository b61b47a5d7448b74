//! Shared agent state: sysinfo handles, the cached metrics snapshot and the
//! simulated service/task stores.

use std::sync::Arc;

use sysinfo::{Disks, Networks, System, Users};
use tokio::sync::{Mutex, RwLock};

use crate::latency::Latency;
use crate::services::ServiceStore;
use crate::tasks::TaskStore;
use crate::types::Metrics;

pub type SharedSystem = Arc<Mutex<System>>;
pub type SharedNetworks = Arc<Mutex<Networks>>;
pub type SharedDisks = Arc<Mutex<Disks>>;
pub type SharedUsers = Arc<Mutex<Users>>;

#[derive(Clone)]
pub struct AppState {
    // Persistent sysinfo handles
    pub sys: SharedSystem,
    pub networks: SharedNetworks,
    pub disks: SharedDisks,
    pub users: SharedUsers,

    // Last snapshot written by the sampler
    pub last_metrics: Arc<RwLock<Option<Metrics>>>,

    pub services: ServiceStore,
    pub tasks: TaskStore,
}

impl AppState {
    pub fn new(latency: Latency) -> Self {
        Self {
            sys: Arc::new(Mutex::new(System::new())),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
            users: Arc::new(Mutex::new(Users::new_with_refreshed_list())),
            last_metrics: Arc::new(RwLock::new(None)),
            services: ServiceStore::new(latency),
            tasks: TaskStore::new(latency),
        }
    }
}
