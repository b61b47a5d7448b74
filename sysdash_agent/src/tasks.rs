//! In-memory scheduled tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::info;

use crate::latency::Latency;
use crate::types::Task;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task description must not be empty")]
    EmptyDescription,
    #[error("task {0} not found")]
    NotFound(u64),
}

#[derive(Default)]
struct Inner {
    tasks: BTreeMap<u64, Task>,
    // ids are never handed out twice, even after deletes
    next_id: u64,
}

#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<RwLock<Inner>>,
    latency: Latency,
}

impl TaskStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            latency,
        }
    }

    pub async fn list(&self) -> BTreeMap<u64, Task> {
        self.inner.read().await.tasks.clone()
    }

    pub async fn get(&self, id: u64) -> Option<Task> {
        self.inner.read().await.tasks.get(&id).cloned()
    }

    /// Record a task and schedule its completion: it finishes once
    /// `run_time` has passed plus a simulated working time.
    pub async fn submit(
        &self,
        description: &str,
        run_time: Option<DateTime<Utc>>,
    ) -> Result<Task, TaskError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        let now = Utc::now();
        let task = {
            let mut inner = self.inner.write().await;
            let id = inner.next_id;
            inner.next_id += 1;
            let task = Task {
                id,
                description: description.to_string(),
                created_time: now,
                run_time: run_time.unwrap_or(now),
                is_finished: false,
            };
            inner.tasks.insert(id, task.clone());
            task
        };

        let wait = (task.run_time - now).to_std().unwrap_or_default() + self.latency.task.sample();
        let inner = Arc::clone(&self.inner);
        let id = task.id;
        tokio::spawn(async move {
            sleep(wait).await;
            if let Some(t) = inner.write().await.tasks.get_mut(&id) {
                t.is_finished = true;
                info!(id, description = %t.description, "task finished");
            }
        });
        Ok(task)
    }

    pub async fn delete(&self, id: u64) -> Result<(), TaskError> {
        match self.inner.write().await.tasks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(TaskError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let s = TaskStore::new(Latency::instant());
        let a = s.submit("a", None).await.unwrap();
        let b = s.submit("b", None).await.unwrap();
        s.delete(b.id).await.unwrap();
        let c = s.submit("c", None).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (0, 1, 2));
        assert_eq!(s.list().await.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let s = TaskStore::new(Latency::instant());
        assert_eq!(s.delete(42).await, Err(TaskError::NotFound(42)));
    }

    #[tokio::test]
    async fn blank_description_is_rejected() {
        let s = TaskStore::new(Latency::instant());
        assert_eq!(s.submit("  ", None).await, Err(TaskError::EmptyDescription));
        assert!(s.list().await.is_empty());
    }

    #[tokio::test]
    async fn finishes_only_after_run_time() {
        let s = TaskStore::new(Latency::fixed(Duration::from_millis(10)));
        let past = s.submit("now", Some(Utc::now() - chrono::Duration::hours(1))).await.unwrap();
        let future = s
            .submit("later", Some(Utc::now() + chrono::Duration::hours(1)))
            .await
            .unwrap();
        assert!(!past.is_finished);
        sleep(Duration::from_millis(100)).await;
        assert!(s.get(past.id).await.unwrap().is_finished);
        assert!(!s.get(future.id).await.unwrap().is_finished);
    }
}
