//! HTTP client for the dashboard API.

use std::time::Duration;

use reqwest::{Certificate, Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::DashError;
use crate::poll::Endpoint;
use crate::types::{
    MetricsSnapshot, NewTaskRequest, ServiceAction, ServiceActionRequest, ServicesPayload,
    TasksPayload,
};

const TIMEOUT_SECS: u64 = 30;

/// Outcome of a request that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    /// The server redirected us elsewhere: the session is gone.
    Redirected,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Data(v) => Fetched::Data(f(v)),
            Fetched::Redirected => Fetched::Redirected,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, tls_ca: Option<&str>) -> Result<Self, DashError> {
        let base = Url::parse(base_url).map_err(|_| DashError::Url(base_url.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(DashError::Url(base_url.to_string()));
        }
        let mut builder = Client::builder().timeout(Duration::from_secs(TIMEOUT_SECS));
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path)
                .map_err(|e| DashError::Other(format!("failed to read CA file {path}: {e}")))?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| DashError::Other(format!("invalid CA certificate {path}: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| DashError::Other(format!("failed to create http client: {e}")))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, DashError> {
        self.base
            .join(path)
            .map_err(|_| DashError::Url(format!("{}{path}", self.base)))
    }

    /// Send and screen the response: redirects and non-2xx statuses never
    /// reach the caller as data.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        requested: &Url,
        context: &str,
    ) -> Result<Fetched<Response>, DashError> {
        let resp = req.send().await.map_err(DashError::from_reqwest)?;
        if resp.url() != requested {
            tracing::info!(from = %requested, to = %resp.url(), "redirected, session expired");
            return Ok(Fetched::Redirected);
        }
        let status = resp.status();
        if !status.is_success() {
            return Err(DashError::Http {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }
        Ok(Fetched::Data(resp))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<Fetched<T>, DashError> {
        let url = self.url(path)?;
        let req = self.client.get(url.clone());
        match self.send(req, &url, context).await? {
            Fetched::Redirected => Ok(Fetched::Redirected),
            Fetched::Data(resp) => {
                let body = resp.json::<T>().await.map_err(DashError::from_reqwest)?;
                Ok(Fetched::Data(body))
            }
        }
    }

    pub async fn metrics(&self) -> Result<Fetched<MetricsSnapshot>, DashError> {
        self.get_json(Endpoint::Metrics.path(), "fetching metrics").await
    }

    pub async fn services(&self) -> Result<Fetched<ServicesPayload>, DashError> {
        self.get_json(Endpoint::Services.path(), "fetching services").await
    }

    pub async fn tasks(&self) -> Result<Fetched<TasksPayload>, DashError> {
        self.get_json(Endpoint::Tasks.path(), "fetching tasks").await
    }

    pub async fn perform_service_action(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<Fetched<()>, DashError> {
        let url = self.url(Endpoint::Services.path())?;
        let body = ServiceActionRequest {
            name: name.to_string(),
            action,
        };
        let req = self.client.post(url.clone()).json(&body);
        let context = format!("performing service action \"{action}\" for \"{name}\"");
        Ok(self.send(req, &url, &context).await?.map(|_| ()))
    }

    pub async fn schedule_task(&self, task: &NewTaskRequest) -> Result<Fetched<()>, DashError> {
        let url = self.url(Endpoint::Tasks.path())?;
        let req = self.client.post(url.clone()).json(task);
        Ok(self
            .send(req, &url, "scheduling new task")
            .await?
            .map(|_| ()))
    }

    pub async fn remove_task(&self, id: u64) -> Result<Fetched<()>, DashError> {
        let mut url = self.url(Endpoint::Tasks.path())?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        let req = self.client.delete(url.clone());
        let context = format!("deleting task {id}");
        Ok(self.send(req, &url, &context).await?.map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            ApiClient::new("ws://127.0.0.1:3000/ws", None),
            Err(DashError::Url(_))
        ));
        assert!(matches!(ApiClient::new("not a url", None), Err(DashError::Url(_))));
    }

    #[test]
    fn endpoint_urls_are_absolute_paths() {
        let api = ApiClient::new("http://example:8080/some/prefix", None).unwrap();
        assert_eq!(api.url("/api/tasks").unwrap().as_str(), "http://example:8080/api/tasks");
    }

    #[test]
    fn fetched_map_keeps_redirect() {
        let f: Fetched<u8> = Fetched::Redirected;
        assert_eq!(f.map(|v| v + 1), Fetched::Redirected);
        assert_eq!(Fetched::Data(1u8).map(|v| v + 1), Fetched::Data(2));
    }
}
