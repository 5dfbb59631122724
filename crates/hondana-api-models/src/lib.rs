#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Hondana public API.
//!
//! These types mirror the remote REST contract consumed by the web UI. The
//! server is an external collaborator; nothing here implements behavior
//! beyond validation and (de)serialization, so the wire mapping stays a
//! single source of truth for every client surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Parameters that failed validation, if applicable.
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON Pointer to the offending field.
    pub pointer: String,
    /// Human-readable description of the validation failure.
    pub message: String,
}

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular reader account.
    Reader,
    /// Back-office administrator.
    Admin,
}

/// Public identity of an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable account identifier.
    pub id: Uuid,
    /// Display name chosen at registration.
    pub username: String,
    /// Contact e-mail for the account.
    pub email: String,
    /// Role driving admin gating in the UI.
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Avatar image URL when set.
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    /// Whether the account carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Bearer token pair issued by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    /// Short-lived access token sent on every authenticated request.
    pub access_token: String,
    /// Long-lived token exchanged for fresh access tokens.
    pub refresh_token: String,
    /// Access token validity in seconds from issuance.
    pub expires_in_secs: u64,
}

/// Credentials payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Desired display name.
    pub username: String,
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Payload for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Refresh token previously issued alongside the access token.
    pub refresh_token: String,
}

/// Response body shared by login, register, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    /// Identity of the signed-in user.
    pub user: UserIdentity,
    /// Fresh token pair for subsequent requests.
    pub tokens: AuthTokens,
}

/// Publication status of a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MangaStatus {
    /// New chapters are still being published.
    Ongoing,
    /// The series has concluded.
    Completed,
    /// Publication is paused indefinitely.
    Hiatus,
    /// Publication was cancelled before conclusion.
    Cancelled,
}

/// List-view snapshot of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangaSummary {
    /// Stable series identifier.
    pub id: Uuid,
    /// URL-safe series key.
    pub slug: String,
    /// Display title.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Cover image URL when available.
    pub cover_url: Option<String>,
    /// Publication status.
    pub status: MangaStatus,
    /// Aggregate rating, 0.0 when unrated.
    pub rating_avg: f32,
    /// Number of ratings contributing to the aggregate.
    pub rating_count: u32,
    /// Published chapter count.
    pub chapter_count: u32,
    /// Tag names applied to the series.
    pub tags: Vec<String>,
    /// Timestamp of the latest chapter or metadata update.
    pub updated_at: DateTime<Utc>,
}

/// Detail-view payload for a series page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangaDetail {
    /// List-view fields shared with the summary.
    #[serde(flatten)]
    pub summary: MangaSummary,
    /// Long-form description.
    pub description: String,
    /// Credited authors.
    pub authors: Vec<AuthorEntry>,
    /// Categories the series is filed under.
    pub categories: Vec<CategoryEntry>,
    /// Whether the requesting user has favorited the series.
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// The requesting user's own rating, when present.
    pub user_rating: Option<u8>,
}

/// Chapter row in a series' chapter list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterSummary {
    /// Stable chapter identifier.
    pub id: Uuid,
    /// URL-safe chapter key.
    pub slug: String,
    /// Ordinal within the series (fractional for extras, e.g. 10.5).
    pub number: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional chapter title.
    pub title: Option<String>,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}

/// Full chapter payload consumed by the reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterDetail {
    /// Stable chapter identifier.
    pub id: Uuid,
    /// URL-safe chapter key.
    pub slug: String,
    /// Ordinal within the series.
    pub number: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional chapter title.
    pub title: Option<String>,
    /// Page image URLs in reading order.
    pub pages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slug of the following chapter when one exists.
    pub next_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slug of the preceding chapter when one exists.
    pub prev_slug: Option<String>,
}

/// Paginated list envelope shared by every listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Items for the requested page.
    pub data: Vec<T>,
    /// 1-based page index served.
    pub page: u32,
    /// Last available page index.
    pub last_page: u32,
    /// Total item count across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Whether a further page exists after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.last_page
    }
}

/// Rejection raised when a rating score is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rating score {0} is outside 1..=10")]
pub struct InvalidScore(pub u8);

/// Payload for `PUT /manga/{slug}/rating`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingUpdate {
    /// Score in `1..=10`.
    pub score: u8,
}

impl RatingUpdate {
    /// Build a validated rating payload.
    ///
    /// # Errors
    /// Returns [`InvalidScore`] when the score falls outside `1..=10`.
    pub fn new(score: u8) -> Result<Self, InvalidScore> {
        if (1..=10).contains(&score) {
            Ok(Self { score })
        } else {
            Err(InvalidScore(score))
        }
    }
}

/// Authoritative aggregate returned after a rating mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingResponse {
    /// Updated aggregate rating.
    pub rating_avg: f32,
    /// Updated rating count.
    pub rating_count: u32,
    /// The requesting user's stored score.
    pub user_rating: u8,
}

/// Favorite row in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    /// The favorited series.
    pub manga: MangaSummary,
    /// When the favorite was added.
    pub added_at: DateTime<Utc>,
}

/// Comment attached to a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentEntry {
    /// Stable comment identifier.
    pub id: Uuid,
    /// Display name of the comment author.
    pub author: String,
    /// Comment body text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /manga/{slug}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentCreate {
    /// Comment body text.
    pub body: String,
}

/// Category reference used in detail payloads and admin curation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Stable category identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// URL-safe key.
    pub slug: String,
}

/// Tag reference used in detail payloads and admin curation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagEntry {
    /// Stable tag identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// URL-safe key.
    pub slug: String,
}

/// Author reference used in detail payloads and admin curation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorEntry {
    /// Stable author identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Admin payload creating or replacing a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MangaUpsert {
    /// Display title.
    pub title: String,
    /// URL-safe series key.
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// Publication status.
    pub status: MangaStatus,
    #[serde(default)]
    /// Credited author ids.
    pub author_ids: Vec<Uuid>,
    #[serde(default)]
    /// Category ids to file the series under.
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    /// Tag names (created on demand server-side).
    pub tag_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Cover image URL when set.
    pub cover_url: Option<String>,
}

/// Admin payload creating or replacing a chapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterUpsert {
    /// URL-safe chapter key.
    pub slug: String,
    /// Ordinal within the series.
    pub number: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional chapter title.
    pub title: Option<String>,
    /// Page image URLs in reading order.
    pub pages: Vec<String>,
}

/// Admin view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUserEntry {
    /// Stable account identifier.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Current role.
    pub role: UserRole,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the account is currently banned.
    #[serde(default)]
    pub banned: bool,
}

/// Platform counters for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Total published series.
    pub total_manga: u64,
    /// Total published chapters.
    pub total_chapters: u64,
    /// Total registered users.
    pub total_users: u64,
    /// Total comments across all series.
    pub total_comments: u64,
    /// Chapter views recorded today.
    pub views_today: u64,
}

#[cfg(test)]
mod tests {
    use super::{
        InvalidScore, Page, ProblemDetails, RatingUpdate, UserIdentity, UserRole,
    };
    use uuid::Uuid;

    fn reader(role: UserRole) -> UserIdentity {
        UserIdentity {
            id: Uuid::nil(),
            username: "mika".to_string(),
            email: "mika@example.com".to_string(),
            role,
            avatar_url: None,
        }
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).expect("serialize"),
            "\"admin\""
        );
        let parsed: UserRole = serde_json::from_str("\"reader\"").expect("parse");
        assert_eq!(parsed, UserRole::Reader);
    }

    #[test]
    fn admin_flag_follows_role() {
        assert!(reader(UserRole::Admin).is_admin());
        assert!(!reader(UserRole::Reader).is_admin());
    }

    #[test]
    fn page_has_more_compares_indexes() {
        let page = Page {
            data: vec![1, 2, 3],
            page: 1,
            last_page: 3,
            total: 9,
        };
        assert!(page.has_more());
        let last = Page {
            data: vec![7],
            page: 3,
            last_page: 3,
            total: 9,
        };
        assert!(!last.has_more());
    }

    #[test]
    fn rating_rejects_out_of_range_scores() {
        assert_eq!(RatingUpdate::new(0), Err(InvalidScore(0)));
        assert_eq!(RatingUpdate::new(11), Err(InvalidScore(11)));
        assert_eq!(RatingUpdate::new(7).map(|r| r.score), Ok(7));
    }

    #[test]
    fn problem_details_round_trips_type_field() {
        let problem = ProblemDetails {
            kind: "https://hondana.app/problems/validation".to_string(),
            title: "Validation failed".to_string(),
            status: 422,
            detail: Some("slug already taken".to_string()),
            invalid_params: None,
        };
        let json = serde_json::to_string(&problem).expect("serialize");
        assert!(json.contains("\"type\""));
        let back: ProblemDetails = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, problem);
    }
}
