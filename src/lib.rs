//! Runner Web UI
//!
//! Local HTTP control surface for the self-hosted runner add-on. Serves a
//! small control page, reports registration status, and can de-register the
//! runner by invoking its configuration script as the runner user. Sits
//! behind the add-on ingress, which proxies to the fixed port.

pub mod api;
pub mod config;
pub mod service;
