//! Client error type and the shared fetch-error policy.

use thiserror::Error;

use crate::notify::Notification;

#[derive(Error, Debug)]
pub enum DashError {
    /// The request never reached the server.
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Error {context}: {status}")]
    Http { status: u16, context: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid API url '{0}'")]
    Url(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TransportFailure,
    ApplicationError,
}

impl DashError {
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            DashError::Transport(e.to_string())
        } else if e.is_decode() {
            DashError::Decode(e.to_string())
        } else if e.is_request() && e.status().is_none() {
            DashError::Transport(e.to_string())
        } else {
            DashError::Other(e.to_string())
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DashError::Transport(_) => ErrorKind::TransportFailure,
            DashError::Other(msg) if looks_like_network_failure(msg) => {
                ErrorKind::TransportFailure
            }
            _ => ErrorKind::ApplicationError,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DashError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn looks_like_network_failure(msg: &str) -> bool {
    msg == "Failed to fetch" || msg.starts_with("Network")
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDisposition {
    /// Connectivity or session lost: go back to the root view.
    RedirectRoot,
    Notify(Notification),
}

/// Decide what a failed request means for the UI. `context` names the
/// operation ("fetching metrics", "remove task 4", ...).
pub fn handle_fetch_error(err: &DashError, context: &str) -> ErrorDisposition {
    tracing::warn!(context, error = %err, "request failed");
    match err.kind() {
        ErrorKind::TransportFailure => ErrorDisposition::RedirectRoot,
        ErrorKind::ApplicationError => {
            let status = err
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Not found".into());
            ErrorDisposition::Notify(Notification::error(format!(
                "Http error type: {status} {context} : {err}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;

    #[test]
    fn transport_errors_redirect() {
        let e = DashError::Transport("connection refused".into());
        assert_eq!(handle_fetch_error(&e, "fetching metrics"), ErrorDisposition::RedirectRoot);
    }

    #[test]
    fn network_like_messages_redirect() {
        for msg in ["Failed to fetch", "NetworkError when attempting to fetch resource."] {
            let e = DashError::Other(msg.into());
            assert_eq!(handle_fetch_error(&e, "x"), ErrorDisposition::RedirectRoot);
        }
    }

    #[test]
    fn http_errors_notify_with_status_and_context() {
        let e = DashError::Http {
            status: 500,
            context: "fetching tasks".into(),
        };
        match handle_fetch_error(&e, "fetching tasks") {
            ErrorDisposition::Notify(n) => {
                assert_eq!(n.severity, Severity::Error);
                assert_eq!(
                    n.message,
                    "Http error type: 500 fetching tasks : Error fetching tasks: 500"
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_status_reads_not_found() {
        let e = DashError::Decode("expected value at line 1".into());
        match handle_fetch_error(&e, "service info") {
            ErrorDisposition::Notify(n) => assert!(n.message.starts_with("Http error type: Not found service info")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
