//! Transport error taxonomy and retry planning.
//!
//! # Design
//! - Status classification and backoff math live here so they are natively
//!   testable; the wasm client in `services::api` only performs the calls.
//! - Errors are cloneable because one remote result may fan out to several
//!   joined cache waiters.
//! - Only transient failures (network, timeout, 5xx) retry; client errors
//!   surface immediately.

use hondana_api_models::ProblemDetails;
use std::fmt;

/// Upper bound on a single request, in milliseconds.
pub const REQUEST_TIMEOUT_MS: u32 = 15_000;

/// Retries attempted after the initial call for transient failures.
pub const MAX_FETCH_RETRIES: u32 = 3;

/// Base delay for the first retry, in milliseconds.
pub const RETRY_BASE_MS: u32 = 400;

/// Ceiling on any single retry delay, in milliseconds.
pub const RETRY_CAP_MS: u32 = 5_000;

/// Coarse failure class; drives both retry policy and user messaging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Request never completed (connection refused, DNS, aborted).
    Network,
    /// Request exceeded [`REQUEST_TIMEOUT_MS`].
    Timeout,
    /// 401: the session is missing or no longer valid.
    Unauthorized,
    /// 403: the session lacks the required role.
    Forbidden,
    /// 404: the addressed entity does not exist.
    NotFound,
    /// 422 or 400: the server rejected the payload.
    Validation,
    /// Any 5xx.
    Server,
    /// Anything else (unexpected status, undecodable body).
    Other,
}

impl ApiErrorKind {
    /// Whether a failure of this kind is worth retrying.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Server)
    }
}

/// A failed API call, optionally carrying the server's problem document.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    /// Failure class.
    pub kind: ApiErrorKind,
    /// HTTP status when one was received.
    pub status: Option<u16>,
    /// RFC 9457 body when the server sent one.
    pub problem: Option<ProblemDetails>,
    /// Fallback description when no problem document is available.
    pub message: String,
}

impl ApiError {
    /// Error for a request that never reached the server.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            problem: None,
            message: message.into(),
        }
    }

    /// Error for a request that outlived [`REQUEST_TIMEOUT_MS`].
    #[must_use]
    pub fn timeout() -> Self {
        Self {
            kind: ApiErrorKind::Timeout,
            status: None,
            problem: None,
            message: "request timed out".to_string(),
        }
    }

    /// Error for a non-success status, classified by [`classify_status`].
    #[must_use]
    pub fn from_status(status: u16, problem: Option<ProblemDetails>) -> Self {
        let message = problem
            .as_ref()
            .and_then(|p| p.detail.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self {
            kind: classify_status(status),
            status: Some(status),
            problem,
            message,
        }
    }

    /// Human-readable description, preferring the server's detail text.
    #[must_use]
    pub fn describe(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Map an HTTP status to its [`ApiErrorKind`].
#[must_use]
pub const fn classify_status(status: u16) -> ApiErrorKind {
    match status {
        401 => ApiErrorKind::Unauthorized,
        403 => ApiErrorKind::Forbidden,
        404 => ApiErrorKind::NotFound,
        400 | 422 => ApiErrorKind::Validation,
        500..=599 => ApiErrorKind::Server,
        _ => ApiErrorKind::Other,
    }
}

/// Delay before retry `attempt` (0-based): exponential from
/// [`RETRY_BASE_MS`], capped at [`RETRY_CAP_MS`].
#[must_use]
pub const fn retry_delay_ms(attempt: u32) -> u32 {
    let shift = if attempt > 4 { 4 } else { attempt };
    let exp = RETRY_BASE_MS << shift;
    if exp > RETRY_CAP_MS { RETRY_CAP_MS } else { exp }
}

#[cfg(test)]
mod tests {
    use super::{
        ApiError, ApiErrorKind, MAX_FETCH_RETRIES, RETRY_CAP_MS, classify_status, retry_delay_ms,
    };
    use hondana_api_models::ProblemDetails;

    #[test]
    fn statuses_classify_to_expected_kinds() {
        assert_eq!(classify_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(classify_status(403), ApiErrorKind::Forbidden);
        assert_eq!(classify_status(404), ApiErrorKind::NotFound);
        assert_eq!(classify_status(422), ApiErrorKind::Validation);
        assert_eq!(classify_status(400), ApiErrorKind::Validation);
        assert_eq!(classify_status(500), ApiErrorKind::Server);
        assert_eq!(classify_status(503), ApiErrorKind::Server);
        assert_eq!(classify_status(418), ApiErrorKind::Other);
    }

    #[test]
    fn only_network_timeout_and_server_retry() {
        assert!(ApiErrorKind::Network.is_transient());
        assert!(ApiErrorKind::Timeout.is_transient());
        assert!(ApiErrorKind::Server.is_transient());
        assert!(!ApiErrorKind::Unauthorized.is_transient());
        assert!(!ApiErrorKind::Forbidden.is_transient());
        assert!(!ApiErrorKind::NotFound.is_transient());
        assert!(!ApiErrorKind::Validation.is_transient());
        assert!(!ApiErrorKind::Other.is_transient());
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(retry_delay_ms(0), 400);
        assert_eq!(retry_delay_ms(1), 800);
        assert_eq!(retry_delay_ms(2), 1_600);
        assert_eq!(retry_delay_ms(4), 5_000);
        assert_eq!(retry_delay_ms(MAX_FETCH_RETRIES + 10), RETRY_CAP_MS);
    }

    #[test]
    fn error_message_prefers_problem_detail() {
        let problem = ProblemDetails {
            kind: "about:blank".to_string(),
            title: "Unprocessable".to_string(),
            status: 422,
            detail: Some("score out of range".to_string()),
            invalid_params: None,
        };
        let err = ApiError::from_status(422, Some(problem));
        assert_eq!(err.describe(), "score out of range");
        assert_eq!(err.kind, ApiErrorKind::Validation);

        let bare = ApiError::from_status(500, None);
        assert_eq!(bare.describe(), "request failed with status 500");
        assert_eq!(bare.to_string(), "request failed with status 500 (status 500)");
    }
}
