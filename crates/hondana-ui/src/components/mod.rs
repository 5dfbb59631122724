pub(crate) mod admin;
pub(crate) mod auth_forms;
pub(crate) mod browse;
pub(crate) mod library;
pub(crate) mod manga;
pub(crate) mod reader;
pub(crate) mod relative_time;
pub(crate) mod shell;
pub(crate) mod toast;
