//! Background token refresh lifecycle.
//!
//! # Design
//! - One interval per app boot; each tick plans via `core::auth` and acts
//!   through `services::session`, so overlapping triggers are idempotent.
//! - The handle owns the interval; dropping it on app teardown stops the
//!   loop.

use crate::services::api::ApiClient;
use crate::services::session::run_refresh_tick;
use gloo_timers::callback::Interval;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// Cadence of refresh planning ticks.
pub(crate) const REFRESH_INTERVAL_MS: u32 = 60_000;

/// Owns the running refresh interval.
pub(crate) struct RefreshHandle {
    _interval: Interval,
}

/// Start the refresh loop, running one immediate tick so a session
/// hydrated with a near-expired token renews without waiting a full
/// interval.
pub(crate) fn start_refresh_loop(client: Rc<ApiClient>) -> RefreshHandle {
    let first = Rc::clone(&client);
    spawn_local(async move {
        run_refresh_tick(&first).await;
    });
    let interval = Interval::new(REFRESH_INTERVAL_MS, move || {
        let client = Rc::clone(&client);
        spawn_local(async move {
            run_refresh_tick(&client).await;
        });
    });
    RefreshHandle {
        _interval: interval,
    }
}
