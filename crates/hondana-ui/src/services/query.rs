//! Wasm driver for the query cache: waiter channels, sweeping, optimistic
//! mutations.
//!
//! # Design
//! - All planning decisions come from `core::query`; this module supplies
//!   the clock, the network call, and the oneshot channels joined fetches
//!   wait on.
//! - Joined callers receive a clone of the owner's result, so N concurrent
//!   `fetch` calls for one key cost exactly one request.
//! - Mutations on one key queue behind each other; a settling mutation
//!   wakes the next waiter in arrival order.
//! - A background interval sweeps entries idle past the retention window.

use crate::core::query::{CacheState, FetchPlan, MutationBusy, QueryKey};
use crate::core::remote::ApiError;
use crate::services::api::ApiClient;
use futures::channel::oneshot;
use gloo::timers::callback::Interval;
use js_sys::Date;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// Sweep cadence for retention eviction.
const SWEEP_INTERVAL_MS: u32 = 60_000;

struct CacheInner {
    api: Rc<ApiClient>,
    state: RefCell<CacheState>,
    fetch_waiters: RefCell<HashMap<QueryKey, Vec<oneshot::Sender<Result<Value, ApiError>>>>>,
    mutation_waiters: RefCell<HashMap<QueryKey, VecDeque<oneshot::Sender<()>>>>,
    // The interval callback must hold only a weak handle; a strong one
    // would cycle through this field and keep the timer alive forever.
    sweeper: RefCell<Option<Interval>>,
}

/// Shared cache handle; clones point at the same state.
#[derive(Clone)]
pub(crate) struct QueryCache {
    inner: Rc<CacheInner>,
}

impl PartialEq for QueryCache {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl QueryCache {
    /// Build the cache and start its retention sweeper. The sweeper is
    /// cancelled when the last cache handle drops.
    pub(crate) fn new(api: Rc<ApiClient>) -> Self {
        let inner = Rc::new(CacheInner {
            api,
            state: RefCell::new(CacheState::default()),
            fetch_waiters: RefCell::new(HashMap::new()),
            mutation_waiters: RefCell::new(HashMap::new()),
            sweeper: RefCell::new(None),
        });
        let sweep_target = Rc::downgrade(&inner);
        let sweeper = Interval::new(SWEEP_INTERVAL_MS, move || {
            if let Some(target) = sweep_target.upgrade() {
                target.state.borrow_mut().evict_idle(Date::now());
            }
        });
        *inner.sweeper.borrow_mut() = Some(sweeper);
        Self { inner }
    }

    /// Resolve a key to its payload: fresh cache, a joined in-flight call,
    /// or a new request owned by this caller.
    pub(crate) async fn fetch(&self, key: &QueryKey) -> Result<Value, ApiError> {
        let plan = self.inner.state.borrow_mut().plan_fetch(key, Date::now());
        match plan {
            FetchPlan::Serve(value) => Ok(value),
            FetchPlan::Join => {
                let (tx, rx) = oneshot::channel();
                self.inner
                    .fetch_waiters
                    .borrow_mut()
                    .entry(key.clone())
                    .or_default()
                    .push(tx);
                rx.await
                    .unwrap_or_else(|_| Err(ApiError::network("fetch abandoned")))
            }
            FetchPlan::Fetch => {
                let result = self.inner.api.get_value(key).await;
                {
                    let mut state = self.inner.state.borrow_mut();
                    match &result {
                        Ok(value) => state.complete_fetch(key, value.clone(), Date::now()),
                        Err(_) => state.fail_fetch(key),
                    }
                }
                let waiting = self
                    .inner
                    .fetch_waiters
                    .borrow_mut()
                    .remove(key)
                    .unwrap_or_default();
                for waiter in waiting {
                    let _ = waiter.send(result.clone());
                }
                result
            }
        }
    }

    /// Typed [`Self::fetch`]; a payload that fails to deserialize is
    /// reported, not cached-poisoned (the raw value stays usable).
    pub(crate) async fn fetch_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<T, ApiError> {
        let value = self.fetch(key).await?;
        serde_json::from_value(value).map_err(|err| ApiError::network(err.to_string()))
    }

    /// Warm a key in the background without blocking the caller.
    pub(crate) fn prefetch(&self, key: QueryKey) {
        let cache = self.clone();
        spawn_local(async move {
            let _ = cache.fetch(&key).await;
        });
    }

    /// Optimistic mutation: install `optimistic` immediately, run the remote
    /// call, then reconcile via `merge` (current cached value + server
    /// payload) or roll back to the pre-mutation snapshot on failure.
    /// Concurrent mutations on one key run strictly in arrival order.
    pub(crate) async fn mutate<Fut>(
        &self,
        key: &QueryKey,
        optimistic: Value,
        remote: impl FnOnce() -> Fut,
        merge: impl FnOnce(&Value, Value) -> Value,
    ) -> Result<Value, ApiError>
    where
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let ticket = loop {
            let attempt = self
                .inner
                .state
                .borrow_mut()
                .begin_mutation(key, optimistic.clone(), Date::now());
            match attempt {
                Ok(ticket) => break ticket,
                Err(MutationBusy) => {
                    let (tx, rx) = oneshot::channel();
                    self.inner
                        .mutation_waiters
                        .borrow_mut()
                        .entry(key.clone())
                        .or_default()
                        .push_back(tx);
                    // Sender dropped means the holder settled before we
                    // parked; loop and try again either way.
                    let _ = rx.await;
                }
            }
        };
        match remote().await {
            Ok(payload) => {
                let reconciled = {
                    let state = self.inner.state.borrow();
                    let current = state.peek(key).cloned().unwrap_or(Value::Null);
                    merge(&current, payload)
                };
                self.inner
                    .state
                    .borrow_mut()
                    .settle_success(ticket, reconciled.clone(), Date::now());
                self.wake_next_mutation(key);
                Ok(reconciled)
            }
            Err(err) => {
                self.inner.state.borrow_mut().settle_failure(ticket);
                self.wake_next_mutation(key);
                Err(err)
            }
        }
    }

    /// Mark one key stale.
    pub(crate) fn invalidate(&self, key: &QueryKey) {
        self.inner.state.borrow_mut().invalidate(key);
    }

    /// Mark every key matching the predicate stale.
    pub(crate) fn invalidate_where(&self, matches: impl FnMut(&QueryKey) -> bool) {
        self.inner.state.borrow_mut().invalidate_where(matches);
    }

    fn wake_next_mutation(&self, key: &QueryKey) {
        let mut waiters = self.inner.mutation_waiters.borrow_mut();
        if let Some(queue) = waiters.get_mut(key) {
            while let Some(waiter) = queue.pop_front() {
                if waiter.send(()).is_ok() {
                    break;
                }
            }
            if queue.is_empty() {
                waiters.remove(key);
            }
        }
    }
}
