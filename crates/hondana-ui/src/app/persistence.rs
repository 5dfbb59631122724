//! Persistence and environment helpers for the app shell.
//!
//! Each blob is independently named and written wholesale on every
//! mutation; a blob that fails to decode is treated as absent.

use crate::core::auth::PersistedSession;
use crate::core::reader::{ReaderPreferences, ReadingProgressState};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use serde::Serialize;
use web_sys::Url;

pub(crate) const SESSION_KEY: &str = "hondana.session";
pub(crate) const READER_PREFS_KEY: &str = "hondana.reader_prefs";
pub(crate) const PROGRESS_KEY: &str = "hondana.reading_progress";

pub(crate) fn load_session() -> Option<PersistedSession> {
    LocalStorage::get::<PersistedSession>(SESSION_KEY).ok()
}

pub(crate) fn persist_session(session: &PersistedSession) {
    set_storage(SESSION_KEY, session);
}

pub(crate) fn clear_session_storage() {
    delete_storage(SESSION_KEY);
}

pub(crate) fn load_reader_prefs() -> ReaderPreferences {
    LocalStorage::get::<ReaderPreferences>(READER_PREFS_KEY).unwrap_or_default()
}

pub(crate) fn persist_reader_prefs(prefs: &ReaderPreferences) {
    set_storage(READER_PREFS_KEY, prefs);
}

pub(crate) fn load_progress() -> ReadingProgressState {
    LocalStorage::get::<ReadingProgressState>(PROGRESS_KEY).unwrap_or_default()
}

pub(crate) fn persist_progress(progress: &ReadingProgressState) {
    set_storage(PROGRESS_KEY, progress);
}

/// API origin derived from the page origin; the dev server runs the UI on
/// 8080 with the API on 7070.
pub(crate) fn api_base_url() -> String {
    let href = window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:8080".to_string());

    if let Ok(url) = Url::new(&href) {
        let protocol = url.protocol();
        let host = url.hostname();
        let port = url.port();
        let mapped_port = match port.as_str() {
            "" => None,
            "8080" => Some("7070"),
            other => Some(other),
        };

        let mut base = format!("{protocol}//{host}");
        if let Some(port) = mapped_port {
            base.push(':');
            base.push_str(port);
        }
        return format!("{base}/api/v1");
    }

    "http://localhost:7070/api/v1".to_string()
}

fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_storage_error("set", key, &err.to_string());
    }
}

fn delete_storage(key: &'static str) {
    LocalStorage::delete(key);
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
