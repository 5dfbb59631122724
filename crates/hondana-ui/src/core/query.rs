//! Key-addressed cache core for remote-fetched entities.
//!
//! # Design
//! - Pure state transitions over [`CacheState`]; the wasm driver supplies the
//!   clock, the waiter channels, and the actual network calls.
//! - One slot per structurally-equal key. A fetch for a key already in
//!   flight joins the existing call instead of firing a second request.
//! - Optimistic mutations snapshot the prior value; a settled key holds
//!   either the server reconciliation or the restored snapshot, never an
//!   abandoned intermediate. Settling always leaves the key stale so the
//!   source of truth is re-fetched eventually.
//! - Payloads are type-erased [`Value`]s; typed callers deserialize at the
//!   edge, which keeps one cache for every entity family.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Duration after a fetch during which cached data is served without refetch.
pub const FRESH_MS: f64 = 60_000.0;

/// Duration a stale entry survives without reads before eviction.
pub const RETAIN_MS: f64 = 300_000.0;

/// Structured cache key: entity family plus disambiguating parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// A page of the filtered series listing.
    MangaList {
        /// Canonical filter string (already query-encoded, may be empty).
        filters: String,
        /// 1-based page index.
        page: u32,
    },
    /// Detail payload for one series.
    MangaDetail {
        /// Series slug.
        slug: String,
    },
    /// Chapter list for one series.
    ChapterList {
        /// Series slug.
        manga: String,
    },
    /// Full chapter payload for the reader.
    Chapter {
        /// Series slug.
        manga: String,
        /// Chapter slug.
        chapter: String,
    },
    /// A page of the user's favorites.
    Favorites {
        /// 1-based page index.
        page: u32,
    },
    /// A page of comments for one series.
    Comments {
        /// Series slug.
        manga: String,
        /// 1-based page index.
        page: u32,
    },
    /// Platform counters for the admin dashboard.
    Stats,
}

impl QueryKey {
    /// Request path serving this key, relative to the API base.
    #[must_use]
    pub fn request_path(&self) -> String {
        match self {
            Self::MangaList { filters, page } => {
                if filters.is_empty() {
                    format!("/manga?page={page}")
                } else {
                    format!("/manga?{filters}&page={page}")
                }
            }
            Self::MangaDetail { slug } => format!("/manga/{slug}"),
            Self::ChapterList { manga } => format!("/manga/{manga}/chapters"),
            Self::Chapter { manga, chapter } => format!("/manga/{manga}/chapters/{chapter}"),
            Self::Favorites { page } => format!("/me/favorites?page={page}"),
            Self::Comments { manga, page } => format!("/manga/{manga}/comments?page={page}"),
            Self::Stats => "/admin/stats".to_string(),
        }
    }
}

/// Cached payload plus bookkeeping timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    /// Type-erased payload.
    pub value: Value,
    /// When the payload was fetched or reconciled; negative-infinity marks
    /// an invalidated (always-stale) entry.
    pub fetched_at_ms: f64,
    /// Last read or write; drives retention eviction.
    pub last_used_ms: f64,
}

impl CacheEntry {
    /// Whether the entry is within its freshness window.
    #[must_use]
    pub fn is_fresh(&self, now_ms: f64) -> bool {
        now_ms - self.fetched_at_ms < FRESH_MS
    }
}

/// Shallow reconciliation: overlay the server payload's fields onto the
/// cached object. A null payload (bodyless mutation) keeps the cached value
/// as-is; mismatched shapes defer to the server.
#[must_use]
pub fn overlay(current: &Value, patch: Value) -> Value {
    match (current, patch) {
        (Value::Object(base), Value::Object(fields)) => {
            let mut merged = base.clone();
            for (key, value) in fields {
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (current, Value::Null) => current.clone(),
        (_, patch) => patch,
    }
}

/// Outcome of planning a fetch for a key.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchPlan {
    /// Fresh cached value; no network activity.
    Serve(Value),
    /// A fetch for this key is already in flight; wait for its result.
    Join,
    /// The caller owns the (single) remote call for this key.
    Fetch,
}

/// A mutation is already settling on this key; retry after it completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationBusy;

/// Receipt for an optimistic mutation in progress.
///
/// Holds the pre-mutation snapshot used for rollback; must be returned to
/// [`CacheState::settle_success`] or [`CacheState::settle_failure`].
#[derive(Debug)]
pub struct MutationTicket {
    key: QueryKey,
    snapshot: Option<CacheEntry>,
}

impl MutationTicket {
    /// Key this ticket settles.
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// Whole-cache state: entries, in-flight fetches, and settling mutations.
#[derive(Debug, Default)]
pub struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashSet<QueryKey>,
    mutating: HashSet<QueryKey>,
}

impl CacheState {
    /// Plan a fetch: serve fresh data, join an in-flight call, or own a new
    /// remote call. Exactly one caller per key receives [`FetchPlan::Fetch`]
    /// until that call settles.
    pub fn plan_fetch(&mut self, key: &QueryKey, now_ms: f64) -> FetchPlan {
        if let Some(entry) = self.entries.get_mut(key)
            && entry.is_fresh(now_ms)
        {
            entry.last_used_ms = now_ms;
            return FetchPlan::Serve(entry.value.clone());
        }
        if self.in_flight.contains(key) {
            return FetchPlan::Join;
        }
        self.in_flight.insert(key.clone());
        FetchPlan::Fetch
    }

    /// Store a fetched payload and release the in-flight slot.
    pub fn complete_fetch(&mut self, key: &QueryKey, value: Value, now_ms: f64) {
        self.in_flight.remove(key);
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                fetched_at_ms: now_ms,
                last_used_ms: now_ms,
            },
        );
    }

    /// Release the in-flight slot after a failed fetch, keeping any stale
    /// entry for display.
    pub fn fail_fetch(&mut self, key: &QueryKey) {
        self.in_flight.remove(key);
    }

    /// Read the cached value regardless of freshness, without touching
    /// retention bookkeeping. Used to build optimistic updates.
    #[must_use]
    pub fn peek(&self, key: &QueryKey) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Begin an optimistic mutation: record the prior entry and install the
    /// optimistic value.
    ///
    /// # Errors
    /// Returns [`MutationBusy`] while another mutation on the same key has
    /// not settled; operations on one key are serialized.
    pub fn begin_mutation(
        &mut self,
        key: &QueryKey,
        optimistic: Value,
        now_ms: f64,
    ) -> Result<MutationTicket, MutationBusy> {
        if self.mutating.contains(key) {
            return Err(MutationBusy);
        }
        self.mutating.insert(key.clone());
        let snapshot = self.entries.get(key).cloned();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value: optimistic,
                fetched_at_ms: snapshot.as_ref().map_or(now_ms, |e| e.fetched_at_ms),
                last_used_ms: now_ms,
            },
        );
        Ok(MutationTicket {
            key: key.clone(),
            snapshot,
        })
    }

    /// Settle a mutation with the reconciled (server-authoritative) value,
    /// then invalidate the key.
    pub fn settle_success(&mut self, ticket: MutationTicket, reconciled: Value, now_ms: f64) {
        self.mutating.remove(&ticket.key);
        self.entries.insert(
            ticket.key.clone(),
            CacheEntry {
                value: reconciled,
                fetched_at_ms: now_ms,
                last_used_ms: now_ms,
            },
        );
        self.invalidate(&ticket.key);
    }

    /// Roll the entry back to the pre-mutation snapshot, then invalidate the
    /// key. A key with no prior entry is removed outright.
    pub fn settle_failure(&mut self, ticket: MutationTicket) {
        self.mutating.remove(&ticket.key);
        match ticket.snapshot {
            Some(snapshot) => {
                self.entries.insert(ticket.key.clone(), snapshot);
                self.invalidate(&ticket.key);
            }
            None => {
                self.entries.remove(&ticket.key);
            }
        }
    }

    /// Mark a key stale so the next fetch goes back to the source of truth.
    /// The value stays available for display until then.
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fetched_at_ms = f64::NEG_INFINITY;
        }
    }

    /// Invalidate every key matching the predicate (e.g. a whole family
    /// after an admin write).
    pub fn invalidate_where(&mut self, mut matches: impl FnMut(&QueryKey) -> bool) {
        for (key, entry) in &mut self.entries {
            if matches(key) {
                entry.fetched_at_ms = f64::NEG_INFINITY;
            }
        }
    }

    /// Drop entries idle past the retention window. Entries mid-fetch or
    /// mid-mutation are never evicted. Returns the number removed.
    pub fn evict_idle(&mut self, now_ms: f64) -> usize {
        let before = self.entries.len();
        let in_flight = &self.in_flight;
        let mutating = &self.mutating;
        self.entries.retain(|key, entry| {
            now_ms - entry.last_used_ms < RETAIN_MS
                || in_flight.contains(key)
                || mutating.contains(key)
        });
        before - self.entries.len()
    }

    /// Number of live entries; test and diagnostics helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheState, FRESH_MS, FetchPlan, MutationBusy, QueryKey, RETAIN_MS};
    use serde_json::{Value, json};

    const NOW: f64 = 10_000_000.0;

    fn detail_key() -> QueryKey {
        QueryKey::MangaDetail {
            slug: "one-piece".to_string(),
        }
    }

    fn filled(key: &QueryKey, value: Value) -> CacheState {
        let mut state = CacheState::default();
        assert_eq!(state.plan_fetch(key, NOW), FetchPlan::Fetch);
        state.complete_fetch(key, value, NOW);
        state
    }

    #[test]
    fn request_paths_carry_disambiguators() {
        let list = QueryKey::MangaList {
            filters: "category=action".to_string(),
            page: 2,
        };
        assert_eq!(list.request_path(), "/manga?category=action&page=2");
        let bare = QueryKey::MangaList {
            filters: String::new(),
            page: 1,
        };
        assert_eq!(bare.request_path(), "/manga?page=1");
        assert_eq!(
            QueryKey::Chapter {
                manga: "naruto".to_string(),
                chapter: "chapter-5".to_string(),
            }
            .request_path(),
            "/manga/naruto/chapters/chapter-5"
        );
    }

    #[test]
    fn concurrent_fetches_collapse_to_one_call() {
        let key = detail_key();
        let mut state = CacheState::default();
        assert_eq!(state.plan_fetch(&key, NOW), FetchPlan::Fetch);
        assert_eq!(state.plan_fetch(&key, NOW), FetchPlan::Join);
        assert_eq!(state.plan_fetch(&key, NOW), FetchPlan::Join);
        state.complete_fetch(&key, json!({"title": "One Piece"}), NOW);
        assert_eq!(
            state.plan_fetch(&key, NOW + 1.0),
            FetchPlan::Serve(json!({"title": "One Piece"}))
        );
    }

    #[test]
    fn stale_entries_refetch_after_freshness_window() {
        let key = detail_key();
        let mut state = filled(&key, json!(1));
        assert!(matches!(
            state.plan_fetch(&key, NOW + FRESH_MS - 1.0),
            FetchPlan::Serve(_)
        ));
        assert_eq!(state.plan_fetch(&key, NOW + FRESH_MS), FetchPlan::Fetch);
    }

    #[test]
    fn failed_fetch_releases_slot_and_keeps_stale_value() {
        let key = detail_key();
        let mut state = filled(&key, json!(1));
        let later = NOW + FRESH_MS;
        assert_eq!(state.plan_fetch(&key, later), FetchPlan::Fetch);
        state.fail_fetch(&key);
        assert_eq!(state.peek(&key), Some(&json!(1)));
        assert_eq!(state.plan_fetch(&key, later), FetchPlan::Fetch);
    }

    #[test]
    fn mutation_settles_to_reconciliation_and_goes_stale() {
        let key = detail_key();
        let mut state = filled(&key, json!({"user_rating": null, "rating_avg": 4.0}));
        let ticket = state
            .begin_mutation(&key, json!({"user_rating": 8, "rating_avg": 4.0}), NOW)
            .expect("first mutation starts");
        assert_eq!(
            state.peek(&key),
            Some(&json!({"user_rating": 8, "rating_avg": 4.0}))
        );
        state.settle_success(ticket, json!({"user_rating": 8, "rating_avg": 4.2}), NOW);
        assert_eq!(
            state.peek(&key),
            Some(&json!({"user_rating": 8, "rating_avg": 4.2}))
        );
        // Invalidation forces the next fetch back to the server.
        assert_eq!(state.plan_fetch(&key, NOW + 1.0), FetchPlan::Fetch);
    }

    #[test]
    fn failed_mutation_restores_snapshot() {
        let key = detail_key();
        let mut state = filled(&key, json!({"is_favorite": false}));
        let ticket = state
            .begin_mutation(&key, json!({"is_favorite": true}), NOW)
            .expect("mutation starts");
        state.settle_failure(ticket);
        assert_eq!(state.peek(&key), Some(&json!({"is_favorite": false})));
    }

    #[test]
    fn failed_mutation_on_empty_slot_leaves_no_entry() {
        let key = detail_key();
        let mut state = CacheState::default();
        let ticket = state
            .begin_mutation(&key, json!({"is_favorite": true}), NOW)
            .expect("mutation starts");
        state.settle_failure(ticket);
        assert!(state.peek(&key).is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn mutations_on_one_key_are_serialized() {
        let key = detail_key();
        let mut state = filled(&key, json!(0));
        let ticket = state.begin_mutation(&key, json!(1), NOW).expect("starts");
        assert!(matches!(
            state.begin_mutation(&key, json!(2), NOW),
            Err(MutationBusy)
        ));
        state.settle_success(ticket, json!(1), NOW);
        assert!(state.begin_mutation(&key, json!(2), NOW).is_ok());
    }

    #[test]
    fn settled_value_is_reconciliation_or_snapshot_never_intermediate() {
        let key = detail_key();
        let mut state = filled(&key, json!({"score": 1}));
        // First mutation succeeds with a server value.
        let first = state
            .begin_mutation(&key, json!({"score": 5}), NOW)
            .expect("starts");
        state.settle_success(first, json!({"score": 5, "avg": 4.9}), NOW);
        // Second mutation fails; the cache must fall back to the last
        // reconciliation, not the optimistic {"score": 9}.
        let second = state
            .begin_mutation(&key, json!({"score": 9}), NOW)
            .expect("starts");
        state.settle_failure(second);
        assert_eq!(state.peek(&key), Some(&json!({"score": 5, "avg": 4.9})));
    }

    #[test]
    fn retention_evicts_idle_entries_only() {
        let key = detail_key();
        let other = QueryKey::Stats;
        let mut state = filled(&key, json!(1));
        assert_eq!(state.plan_fetch(&other, NOW), FetchPlan::Fetch);
        state.complete_fetch(&other, json!(2), NOW);
        // Touch one key later so only the other goes idle.
        let touch = NOW + RETAIN_MS - 1.0;
        assert!(matches!(state.plan_fetch(&key, touch), FetchPlan::Fetch));
        state.complete_fetch(&key, json!(1), touch);
        let evicted = state.evict_idle(NOW + RETAIN_MS);
        assert_eq!(evicted, 1);
        assert!(state.peek(&key).is_some());
        assert!(state.peek(&other).is_none());
    }

    #[test]
    fn eviction_spares_in_flight_keys() {
        let key = detail_key();
        let mut state = filled(&key, json!(1));
        let later = NOW + RETAIN_MS + FRESH_MS;
        assert_eq!(state.plan_fetch(&key, later), FetchPlan::Fetch);
        assert_eq!(state.evict_idle(later), 0);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn overlay_merges_objects_and_keeps_value_on_null() {
        let current = json!({"user_rating": 8, "rating_avg": 4.0, "title": "Naruto"});
        let merged = super::overlay(&current, json!({"rating_avg": 4.2, "rating_count": 12}));
        assert_eq!(
            merged,
            json!({"user_rating": 8, "rating_avg": 4.2, "rating_count": 12, "title": "Naruto"})
        );
        assert_eq!(super::overlay(&current, Value::Null), current);
        assert_eq!(super::overlay(&json!(1), json!([2])), json!([2]));
    }

    #[test]
    fn invalidate_where_hits_whole_family() {
        let mut state = CacheState::default();
        for page in 1..=3u32 {
            let key = QueryKey::MangaList {
                filters: String::new(),
                page,
            };
            assert_eq!(state.plan_fetch(&key, NOW), FetchPlan::Fetch);
            state.complete_fetch(&key, json!(page), NOW);
        }
        state.invalidate_where(|key| matches!(key, QueryKey::MangaList { .. }));
        for page in 1..=3u32 {
            let key = QueryKey::MangaList {
                filters: String::new(),
                page,
            };
            assert_eq!(state.plan_fetch(&key, NOW + 1.0), FetchPlan::Fetch);
        }
    }
}
