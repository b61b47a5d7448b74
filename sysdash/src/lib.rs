//! sysdash: terminal dashboard for a host-management HTTP API.

pub mod api;
pub mod app;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod history;
pub mod logging;
pub mod notify;
pub mod poll;
pub mod profiles;
pub mod router;
pub mod types;
pub mod ui;
