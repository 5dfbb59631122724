//! Core, DOM-free primitives and decision logic for the Web UI.
pub mod auth;
pub mod guard;
pub mod query;
pub mod reader;
pub mod remote;
pub mod routes;
pub mod store;
pub mod timefmt;
