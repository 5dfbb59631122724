//! Network-facing services: HTTP client, query cache driver, auth flows.
pub(crate) mod api;
pub(crate) mod query;
pub(crate) mod session;
