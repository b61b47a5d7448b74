//! In-memory simulated services. Actions are accepted immediately and the
//! resulting status change lands later on a background task.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::latency::Latency;
use crate::types::{ServiceInfo, ServiceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Start,
    Stop,
    Reload,
    Uninstall,
}

impl FromStr for Action {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "install" => Action::Install,
            "start" => Action::Start,
            "stop" => Action::Stop,
            "reload" => Action::Reload,
            "uninstall" => Action::Uninstall,
            other => return Err(ServiceError::UnknownAction(other.to_string())),
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("service '{0}' already exists and cannot be installed again")]
    AlreadyInstalled(String),
    #[error("service '{0}' is not installed")]
    NotInstalled(String),
    #[error("service '{0}' is already started")]
    AlreadyStarted(String),
    #[error("service '{0}' is already stopped")]
    AlreadyStopped(String),
    #[error("invalid action '{0}'")]
    UnknownAction(String),
}

/// What the background half of an action does once its delay is over.
#[derive(Debug, Clone, Copy)]
enum Settle {
    Status(ServiceStatus),
    Reloaded,
    Remove,
}

#[derive(Clone)]
pub struct ServiceStore {
    inner: Arc<RwLock<BTreeMap<String, ServiceInfo>>>,
    latency: Latency,
}

impl ServiceStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
            latency,
        }
    }

    /// Register already-installed, stopped services.
    pub async fn seed<S: AsRef<str>>(&self, names: &[S]) {
        let mut map = self.inner.write().await;
        for name in names {
            let name = name.as_ref().to_string();
            map.entry(name.clone()).or_insert(ServiceInfo {
                name,
                status: ServiceStatus::Stopped,
            });
        }
    }

    pub async fn list(&self) -> BTreeMap<String, ServiceInfo> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, name: &str) -> Option<ServiceInfo> {
        self.inner.read().await.get(name).cloned()
    }

    pub async fn perform(&self, name: &str, action: Action) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let (delay, settle) = match action {
            Action::Install => {
                if map.contains_key(name) {
                    return Err(ServiceError::AlreadyInstalled(name.to_string()));
                }
                map.insert(
                    name.to_string(),
                    ServiceInfo {
                        name: name.to_string(),
                        status: ServiceStatus::Installing,
                    },
                );
                (self.latency.install.sample(), Settle::Status(ServiceStatus::Stopped))
            }
            Action::Start => {
                let svc = map
                    .get(name)
                    .ok_or_else(|| ServiceError::NotInstalled(name.to_string()))?;
                if svc.status == ServiceStatus::Started {
                    return Err(ServiceError::AlreadyStarted(name.to_string()));
                }
                (self.latency.start.sample(), Settle::Status(ServiceStatus::Started))
            }
            Action::Stop => {
                let svc = map
                    .get(name)
                    .ok_or_else(|| ServiceError::NotInstalled(name.to_string()))?;
                if svc.status == ServiceStatus::Stopped {
                    return Err(ServiceError::AlreadyStopped(name.to_string()));
                }
                (self.latency.stop.sample(), Settle::Status(ServiceStatus::Stopped))
            }
            Action::Reload => {
                if !map.contains_key(name) {
                    return Err(ServiceError::NotInstalled(name.to_string()));
                }
                (self.latency.reload.sample(), Settle::Reloaded)
            }
            Action::Uninstall => {
                let svc = map
                    .get_mut(name)
                    .ok_or_else(|| ServiceError::NotInstalled(name.to_string()))?;
                svc.status = ServiceStatus::Uninstalling;
                (self.latency.uninstall.sample(), Settle::Remove)
            }
        };
        drop(map);
        debug!(service = name, ?action, ?delay, "action accepted");
        self.finish_later(name.to_string(), delay, settle);
        Ok(())
    }

    fn finish_later(&self, name: String, delay: Duration, settle: Settle) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(delay).await;
            let mut map = inner.write().await;
            match settle {
                Settle::Status(to) => {
                    // an uninstall in progress wins over late start/stop completions
                    if let Some(svc) = map.get_mut(&name) {
                        if svc.status != ServiceStatus::Uninstalling {
                            svc.status = to;
                            info!(service = %name, status = %to, "service settled");
                        }
                    }
                }
                Settle::Reloaded => info!(service = %name, "service reloaded"),
                Settle::Remove => {
                    if map.remove(&name).is_some() {
                        info!(service = %name, "service removed");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(20);

    fn store() -> ServiceStore {
        ServiceStore::new(Latency::fixed(STEP))
    }

    async fn settle() {
        sleep(STEP * 5).await;
    }

    async fn status(s: &ServiceStore, name: &str) -> Option<ServiceStatus> {
        s.get(name).await.map(|svc| svc.status)
    }

    #[tokio::test]
    async fn install_goes_through_installing_to_stopped() {
        let s = store();
        s.perform("nginx", Action::Install).await.unwrap();
        assert_eq!(status(&s, "nginx").await, Some(ServiceStatus::Installing));
        settle().await;
        assert_eq!(status(&s, "nginx").await, Some(ServiceStatus::Stopped));
        assert_eq!(
            s.perform("nginx", Action::Install).await,
            Err(ServiceError::AlreadyInstalled("nginx".into()))
        );
    }

    #[tokio::test]
    async fn start_and_stop_reject_repeats() {
        let s = store();
        s.seed(&["db"]).await;
        assert_eq!(
            s.perform("db", Action::Stop).await,
            Err(ServiceError::AlreadyStopped("db".into()))
        );
        s.perform("db", Action::Start).await.unwrap();
        settle().await;
        assert_eq!(status(&s, "db").await, Some(ServiceStatus::Started));
        assert_eq!(
            s.perform("db", Action::Start).await,
            Err(ServiceError::AlreadyStarted("db".into()))
        );
        s.perform("db", Action::Reload).await.unwrap();
        settle().await;
        assert_eq!(status(&s, "db").await, Some(ServiceStatus::Started));
    }

    #[tokio::test]
    async fn unknown_service_is_rejected_for_every_other_action() {
        let s = store();
        for action in [Action::Start, Action::Stop, Action::Reload, Action::Uninstall] {
            assert_eq!(
                s.perform("ghost", action).await,
                Err(ServiceError::NotInstalled("ghost".into()))
            );
        }
    }

    #[tokio::test]
    async fn uninstall_marks_then_removes() {
        let s = store();
        s.seed(&["cache"]).await;
        s.perform("cache", Action::Start).await.unwrap();
        s.perform("cache", Action::Uninstall).await.unwrap();
        assert_eq!(status(&s, "cache").await, Some(ServiceStatus::Uninstalling));
        settle().await;
        assert!(s.list().await.is_empty());
    }

    #[test]
    fn parses_action_names() {
        assert_eq!("reload".parse::<Action>(), Ok(Action::Reload));
        assert_eq!(
            "restart".parse::<Action>(),
            Err(ServiceError::UnknownAction("restart".into()))
        );
    }
}
