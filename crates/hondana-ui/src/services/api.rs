//! HTTP client for the platform REST API.
//!
//! # Design
//! - One client per app boot, shared through `app::api::ApiCtx`; the access
//!   token is swapped via interior mutability so the client never rebuilds.
//! - Every request races a timeout; classification and backoff come from
//!   `core::remote`, so this module only moves bytes.
//! - Reads retry transient failures; mutations are single-shot so a flaky
//!   network never double-submits a write.

use crate::core::query::QueryKey;
use crate::core::remote::{ApiError, MAX_FETCH_RETRIES, REQUEST_TIMEOUT_MS, retry_delay_ms};
use futures::future::{Either, select};
use futures::pin_mut;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use hondana_api_models::{
    AdminUserEntry, AuthorEntry, CategoryEntry, ChapterUpsert, CommentCreate, CommentEntry,
    LoginRequest, MangaUpsert, ProblemDetails, RatingResponse, RatingUpdate, RefreshRequest,
    RegisterRequest, SessionResponse, TagEntry,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use uuid::Uuid;

#[derive(Debug)]
pub(crate) struct ApiClient {
    base_url: String,
    access_token: RefCell<Option<String>>,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: RefCell::new(None),
        }
    }

    /// Swap the bearer token used on subsequent requests.
    pub(crate) fn set_access_token(&self, token: Option<String>) {
        *self.access_token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, req: Request) -> Request {
        match self.access_token.borrow().as_deref() {
            Some(token) => req.header("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }

    async fn send(req: Request) -> Result<Response, ApiError> {
        let call = req.send();
        pin_mut!(call);
        let timeout = TimeoutFuture::new(REQUEST_TIMEOUT_MS);
        let resp = match select(call, timeout).await {
            Either::Left((result, _)) => result.map_err(|err| ApiError::network(err.to_string()))?,
            Either::Right(((), _)) => return Err(ApiError::timeout()),
        };
        if resp.ok() {
            Ok(resp)
        } else {
            let status = resp.status();
            let problem = resp.json::<ProblemDetails>().await.ok();
            Err(ApiError::from_status(status, problem))
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = Self::send(self.authorize(Request::get(&self.url(path)))).await?;
        resp.json::<T>()
            .await
            .map_err(|err| ApiError::network(err.to_string()))
    }

    /// GET with bounded retry on transient failures.
    async fn get_retrying<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            match self.get_once(path).await {
                Ok(value) => return Ok(value),
                Err(err) if err.kind.is_transient() && attempt < MAX_FETCH_RETRIES => {
                    TimeoutFuture::new(retry_delay_ms(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        req: Request,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self
            .authorize(req)
            .json(body)
            .map_err(|err| ApiError::network(err.to_string()))?;
        let resp = Self::send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|err| ApiError::network(err.to_string()))
    }

    async fn send_json_empty<B: Serialize>(&self, req: Request, body: &B) -> Result<(), ApiError> {
        let req = self
            .authorize(req)
            .json(body)
            .map_err(|err| ApiError::network(err.to_string()))?;
        Self::send(req).await.map(|_| ())
    }

    async fn send_empty(&self, req: Request) -> Result<(), ApiError> {
        Self::send(self.authorize(req)).await.map(|_| ())
    }

    // --- auth ---

    pub(crate) async fn login(&self, body: &LoginRequest) -> Result<SessionResponse, ApiError> {
        self.send_json(Request::post(&self.url("/auth/login")), body)
            .await
    }

    pub(crate) async fn register(
        &self,
        body: &RegisterRequest,
    ) -> Result<SessionResponse, ApiError> {
        self.send_json(Request::post(&self.url("/auth/register")), body)
            .await
    }

    pub(crate) async fn refresh(&self, body: &RefreshRequest) -> Result<SessionResponse, ApiError> {
        self.send_json(Request::post(&self.url("/auth/refresh")), body)
            .await
    }

    /// Best-effort server-side session teardown.
    pub(crate) async fn logout(&self) -> Result<(), ApiError> {
        self.send_empty(Request::post(&self.url("/auth/logout")))
            .await
    }

    // --- cached reads ---

    /// Fetch the payload backing a cache key, retrying transient failures.
    pub(crate) async fn get_value(&self, key: &QueryKey) -> Result<Value, ApiError> {
        self.get_retrying(&key.request_path()).await
    }

    // --- reader mutations ---

    pub(crate) async fn rate_manga(
        &self,
        slug: &str,
        body: &RatingUpdate,
    ) -> Result<RatingResponse, ApiError> {
        self.send_json(Request::put(&self.url(&format!("/manga/{slug}/rating"))), body)
            .await
    }

    pub(crate) async fn set_favorite(&self, slug: &str, favorite: bool) -> Result<(), ApiError> {
        let url = self.url(&format!("/me/favorites/{slug}"));
        let req = if favorite {
            Request::put(&url)
        } else {
            Request::delete(&url)
        };
        self.send_empty(req).await
    }

    pub(crate) async fn post_comment(
        &self,
        slug: &str,
        body: &CommentCreate,
    ) -> Result<CommentEntry, ApiError> {
        self.send_json(
            Request::post(&self.url(&format!("/manga/{slug}/comments"))),
            body,
        )
        .await
    }

    // --- admin curation ---

    pub(crate) async fn upsert_manga(&self, body: &MangaUpsert) -> Result<(), ApiError> {
        self.send_json_empty(
            Request::put(&self.url(&format!("/admin/manga/{}", body.slug))),
            body,
        )
        .await
    }

    pub(crate) async fn delete_manga(&self, slug: &str) -> Result<(), ApiError> {
        self.send_empty(Request::delete(&self.url(&format!("/admin/manga/{slug}"))))
            .await
    }

    pub(crate) async fn upsert_chapter(
        &self,
        manga: &str,
        body: &ChapterUpsert,
    ) -> Result<(), ApiError> {
        self.send_json_empty(
            Request::put(&self.url(&format!("/admin/manga/{manga}/chapters/{}", body.slug))),
            body,
        )
        .await
    }

    pub(crate) async fn delete_chapter(&self, manga: &str, chapter: &str) -> Result<(), ApiError> {
        self.send_empty(Request::delete(
            &self.url(&format!("/admin/manga/{manga}/chapters/{chapter}")),
        ))
        .await
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<CategoryEntry>, ApiError> {
        self.get_retrying("/admin/categories").await
    }

    pub(crate) async fn upsert_category(&self, body: &CategoryEntry) -> Result<(), ApiError> {
        self.send_json_empty(
            Request::put(&self.url(&format!("/admin/categories/{}", body.id))),
            body,
        )
        .await
    }

    pub(crate) async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        self.send_empty(Request::delete(&self.url(&format!("/admin/categories/{id}"))))
            .await
    }

    pub(crate) async fn list_tags(&self) -> Result<Vec<TagEntry>, ApiError> {
        self.get_retrying("/admin/tags").await
    }

    pub(crate) async fn delete_tag(&self, id: Uuid) -> Result<(), ApiError> {
        self.send_empty(Request::delete(&self.url(&format!("/admin/tags/{id}"))))
            .await
    }

    pub(crate) async fn list_authors(&self) -> Result<Vec<AuthorEntry>, ApiError> {
        self.get_retrying("/admin/authors").await
    }

    pub(crate) async fn upsert_author(&self, body: &AuthorEntry) -> Result<(), ApiError> {
        self.send_json_empty(
            Request::put(&self.url(&format!("/admin/authors/{}", body.id))),
            body,
        )
        .await
    }

    pub(crate) async fn delete_author(&self, id: Uuid) -> Result<(), ApiError> {
        self.send_empty(Request::delete(&self.url(&format!("/admin/authors/{id}"))))
            .await
    }

    pub(crate) async fn list_users(&self, page: u32) -> Result<Vec<AdminUserEntry>, ApiError> {
        self.get_retrying(&format!("/admin/users?page={page}")).await
    }

    pub(crate) async fn set_user_banned(&self, id: Uuid, banned: bool) -> Result<(), ApiError> {
        let url = self.url(&format!("/admin/users/{id}/ban"));
        let req = if banned {
            Request::put(&url)
        } else {
            Request::delete(&url)
        };
        self.send_empty(req).await
    }

    pub(crate) async fn delete_comment(&self, id: Uuid) -> Result<(), ApiError> {
        self.send_empty(Request::delete(&self.url(&format!("/admin/comments/{id}"))))
            .await
    }
}
