//! App-wide contexts for the request client and the query cache.
//!
//! # Design
//! - Both are built once at boot; everything downstream reaches them
//!   through context.
//! - The bearer token mutates inside the client, so neither context value
//!   ever rebuilds (pointer equality keeps renders cheap).

use crate::services::api::ApiClient;
use crate::services::query::QueryCache;
use std::rc::Rc;

/// Hands the request client to pages and service hooks.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Client every request flows through; its bearer token is swapped in
    /// place as the session changes.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Wrap a fresh client rooted at `base_url`.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Shared query cache context for page components.
#[derive(Clone, PartialEq)]
pub(crate) struct CacheCtx {
    /// Singleton cache handle.
    pub cache: QueryCache,
}

impl CacheCtx {
    /// Build the cache over the shared client.
    pub(crate) fn new(client: Rc<ApiClient>) -> Self {
        Self {
            cache: QueryCache::new(client),
        }
    }
}
