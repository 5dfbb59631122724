//! Session primitives shared across the UI.
//!
//! # Design
//! - Session state is plain data; every transition is a pure function so the
//!   "authenticated iff a non-expired access token is present" invariant can
//!   be tested off-wasm.
//! - Clock values are injected as epoch milliseconds; the wasm layer supplies
//!   `js_sys::Date::now()`.
//! - All writers funnel through these transitions via the single store
//!   dispatch; the `busy` flag serializes login/refresh so overlapping flows
//!   skip instead of racing.

use hondana_api_models::{AuthTokens, UserIdentity};
use serde::{Deserialize, Serialize};

/// Remaining validity below which the refresh lifecycle renews the token.
pub const NEAR_EXPIRY_MS: f64 = 120_000.0;

/// Consecutive refresh failures tolerated before forcing logout.
pub const MAX_REFRESH_FAILURES: u8 = 3;

/// Access token with its absolute expiry timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Raw bearer token value.
    pub value: String,
    /// Expiry as epoch milliseconds.
    pub expires_at_ms: f64,
}

impl AccessToken {
    /// Whether the token has passed its expiry.
    #[must_use]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.expires_at_ms <= now_ms
    }

    /// Whether the token is close enough to expiry to warrant a refresh.
    #[must_use]
    pub fn near_expiry(&self, now_ms: f64) -> bool {
        self.expires_at_ms - now_ms <= NEAR_EXPIRY_MS
    }
}

/// Token pair owned by an authenticated session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Access token plus expiry.
    pub access: AccessToken,
    /// Refresh token exchanged for fresh access tokens.
    pub refresh: String,
}

impl SessionTokens {
    /// Convert the wire payload into stored tokens given the current clock.
    #[must_use]
    pub fn from_wire(tokens: &AuthTokens, now_ms: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let expires_at_ms = now_ms + (tokens.expires_in_secs * 1000) as f64;
        Self {
            access: AccessToken {
                value: tokens.access_token.clone(),
                expires_at_ms,
            },
            refresh: tokens.refresh_token.clone(),
        }
    }
}

/// Session blob written to persisted storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Identity of the persisted user.
    pub user: UserIdentity,
    /// Token pair at the time of persistence.
    pub tokens: SessionTokens,
}

/// Hydration progress for persisted session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Hydration {
    /// Persisted storage has not been read yet.
    #[default]
    Pending,
    /// Storage was read; the slice reflects whatever was found.
    Ready,
}

/// Errors surfaced by login/register/refresh flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The server rejected the submitted credentials.
    InvalidCredentials,
    /// The refresh token itself was rejected; the session is gone.
    RefreshRejected,
    /// The account lacks the required role.
    Forbidden,
    /// Another login/refresh is already in flight.
    Busy,
    /// Transport-level failure with a displayable message.
    Transport(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid e-mail or password"),
            Self::RefreshRejected => write!(f, "session expired, please sign in again"),
            Self::Forbidden => write!(f, "this account is not allowed to do that"),
            Self::Busy => write!(f, "another sign-in is already in progress"),
            Self::Transport(message) => write!(f, "{message}"),
        }
    }
}

/// Derived read handed to guards: the only session facts they need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionView {
    /// A non-expired access token is present.
    pub authenticated: bool,
    /// Authenticated and the user role is admin.
    pub admin: bool,
}

/// Shared session slice held in the app store.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SessionSlice {
    /// Identity of the signed-in user, absent while signed out.
    pub user: Option<UserIdentity>,
    /// Token pair, absent while signed out.
    pub tokens: Option<SessionTokens>,
    /// Persisted-storage hydration progress.
    pub hydration: Hydration,
    /// A login/refresh is in flight; further writers must skip.
    pub busy: bool,
    /// Consecutive refresh failures since the last success.
    pub failed_refreshes: u8,
}

impl SessionSlice {
    /// Whether a non-expired access token is present.
    #[must_use]
    pub fn is_authenticated(&self, now_ms: f64) -> bool {
        self.tokens
            .as_ref()
            .is_some_and(|tokens| !tokens.access.is_expired(now_ms))
    }

    /// Whether the session belongs to an admin account.
    #[must_use]
    pub fn is_admin(&self, now_ms: f64) -> bool {
        self.is_authenticated(now_ms) && self.user.as_ref().is_some_and(UserIdentity::is_admin)
    }

    /// Snapshot the derived booleans guards care about.
    #[must_use]
    pub fn view(&self, now_ms: f64) -> SessionView {
        SessionView {
            authenticated: self.is_authenticated(now_ms),
            admin: self.is_admin(now_ms),
        }
    }

    /// The persisted form of the current session, when one exists.
    #[must_use]
    pub fn to_persisted(&self) -> Option<PersistedSession> {
        Some(PersistedSession {
            user: self.user.clone()?,
            tokens: self.tokens.clone()?,
        })
    }
}

/// Atomically install a fresh identity and token pair after login/register.
pub fn apply_login(slice: &mut SessionSlice, user: UserIdentity, tokens: SessionTokens) {
    slice.user = Some(user);
    slice.tokens = Some(tokens);
    slice.failed_refreshes = 0;
}

/// Install renewed tokens (and identity, when the server re-sends it).
pub fn apply_refresh(
    slice: &mut SessionSlice,
    user: Option<UserIdentity>,
    tokens: SessionTokens,
) {
    if let Some(user) = user {
        slice.user = Some(user);
    }
    slice.tokens = Some(tokens);
    slice.failed_refreshes = 0;
}

/// Record a failed refresh attempt without touching the session proper.
pub fn note_refresh_failure(slice: &mut SessionSlice) {
    slice.failed_refreshes = slice.failed_refreshes.saturating_add(1);
}

/// Clear every session field. Persisted storage is cleared by the caller.
pub fn apply_logout(slice: &mut SessionSlice) {
    slice.user = None;
    slice.tokens = None;
    slice.failed_refreshes = 0;
    slice.busy = false;
}

/// Install the persisted session (if any) and mark hydration complete.
pub fn apply_hydrated(slice: &mut SessionSlice, loaded: Option<PersistedSession>) {
    if let Some(persisted) = loaded {
        slice.user = Some(persisted.user);
        slice.tokens = Some(persisted.tokens);
    }
    slice.hydration = Hydration::Ready;
}

/// Claim the writer slot for a login/refresh flow.
///
/// Returns `false` when another flow is already in flight; the caller must
/// then skip instead of issuing a second concurrent auth request.
pub fn begin_auth_flow(slice: &mut SessionSlice) -> bool {
    if slice.busy {
        return false;
    }
    slice.busy = true;
    true
}

/// Release the writer slot claimed by [`begin_auth_flow`].
pub fn end_auth_flow(slice: &mut SessionSlice) {
    slice.busy = false;
}

/// Action chosen by the background refresh lifecycle on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshPlan {
    /// Nothing to do this tick.
    Skip,
    /// Exchange the refresh token for a fresh access token.
    Refresh,
    /// Too many failures; clear the session.
    ForceLogout,
}

/// Decide what the refresh lifecycle should do right now.
///
/// Idempotent under overlapping triggers: while a login/refresh is in
/// flight (`busy`), or before hydration resolves, the plan is always
/// [`RefreshPlan::Skip`].
#[must_use]
pub fn plan_refresh(slice: &SessionSlice, now_ms: f64) -> RefreshPlan {
    if slice.hydration == Hydration::Pending || slice.busy {
        return RefreshPlan::Skip;
    }
    let Some(tokens) = &slice.tokens else {
        return RefreshPlan::Skip;
    };
    if slice.failed_refreshes >= MAX_REFRESH_FAILURES {
        return RefreshPlan::ForceLogout;
    }
    if tokens.access.near_expiry(now_ms) {
        RefreshPlan::Refresh
    } else {
        RefreshPlan::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AccessToken, Hydration, MAX_REFRESH_FAILURES, PersistedSession, RefreshPlan,
        SessionSlice, SessionTokens, apply_hydrated, apply_login, apply_logout,
        begin_auth_flow, end_auth_flow, note_refresh_failure, plan_refresh,
    };
    use hondana_api_models::{AuthTokens, UserIdentity, UserRole};
    use uuid::Uuid;

    const NOW: f64 = 1_000_000.0;

    fn user(role: UserRole) -> UserIdentity {
        UserIdentity {
            id: Uuid::nil(),
            username: "rin".to_string(),
            email: "rin@example.com".to_string(),
            role,
            avatar_url: None,
        }
    }

    fn tokens(expires_at_ms: f64) -> SessionTokens {
        SessionTokens {
            access: AccessToken {
                value: "access".to_string(),
                expires_at_ms,
            },
            refresh: "refresh".to_string(),
        }
    }

    fn ready_slice(role: UserRole, expires_at_ms: f64) -> SessionSlice {
        let mut slice = SessionSlice::default();
        apply_hydrated(
            &mut slice,
            Some(PersistedSession {
                user: user(role),
                tokens: tokens(expires_at_ms),
            }),
        );
        slice
    }

    #[test]
    fn authenticated_iff_token_unexpired() {
        let slice = ready_slice(UserRole::Reader, NOW + 10_000.0);
        assert!(slice.is_authenticated(NOW));
        assert!(!slice.is_authenticated(NOW + 20_000.0));
        assert!(!SessionSlice::default().is_authenticated(NOW));
    }

    #[test]
    fn admin_requires_role_and_valid_token() {
        let admin = ready_slice(UserRole::Admin, NOW + 10_000.0);
        assert!(admin.is_admin(NOW));
        assert!(!admin.is_admin(NOW + 20_000.0));
        let reader = ready_slice(UserRole::Reader, NOW + 10_000.0);
        assert!(!reader.is_admin(NOW));
    }

    #[test]
    fn wire_tokens_pick_up_absolute_expiry() {
        let wire = AuthTokens {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in_secs: 900,
        };
        let stored = SessionTokens::from_wire(&wire, NOW);
        assert!((stored.access.expires_at_ms - (NOW + 900_000.0)).abs() < f64::EPSILON);
        assert_eq!(stored.refresh, "r");
    }

    #[test]
    fn login_resets_failure_counter() {
        let mut slice = ready_slice(UserRole::Reader, NOW + 10_000.0);
        note_refresh_failure(&mut slice);
        note_refresh_failure(&mut slice);
        apply_login(&mut slice, user(UserRole::Reader), tokens(NOW + 50_000.0));
        assert_eq!(slice.failed_refreshes, 0);
        assert!(slice.is_authenticated(NOW));
    }

    #[test]
    fn logout_clears_everything() {
        let mut slice = ready_slice(UserRole::Admin, NOW + 10_000.0);
        slice.busy = true;
        apply_logout(&mut slice);
        assert!(slice.user.is_none());
        assert!(slice.tokens.is_none());
        assert!(!slice.busy);
        assert!(slice.to_persisted().is_none());
    }

    #[test]
    fn auth_flow_slot_is_exclusive() {
        let mut slice = SessionSlice::default();
        assert!(begin_auth_flow(&mut slice));
        assert!(!begin_auth_flow(&mut slice));
        end_auth_flow(&mut slice);
        assert!(begin_auth_flow(&mut slice));
    }

    #[test]
    fn expired_persisted_session_hydrates_intact_for_renewal() {
        let slice = ready_slice(UserRole::Reader, NOW - 5_000.0);
        assert_eq!(slice.hydration, Hydration::Ready);
        assert!(!slice.is_authenticated(NOW));
        assert!(slice.tokens.is_some());
        assert_eq!(plan_refresh(&slice, NOW), RefreshPlan::Refresh);
    }

    #[test]
    fn refresh_plan_skips_until_hydrated() {
        let mut slice = SessionSlice::default();
        slice.tokens = Some(tokens(NOW + 1_000.0));
        assert_eq!(plan_refresh(&slice, NOW), RefreshPlan::Skip);
        slice.hydration = Hydration::Ready;
        assert_eq!(plan_refresh(&slice, NOW), RefreshPlan::Refresh);
    }

    #[test]
    fn refresh_plan_skips_while_busy() {
        let mut slice = ready_slice(UserRole::Reader, NOW + 1_000.0);
        slice.busy = true;
        assert_eq!(plan_refresh(&slice, NOW), RefreshPlan::Skip);
    }

    #[test]
    fn refresh_plan_renews_near_expiry_only() {
        let fresh = ready_slice(UserRole::Reader, NOW + 600_000.0);
        assert_eq!(plan_refresh(&fresh, NOW), RefreshPlan::Skip);
        let near = ready_slice(UserRole::Reader, NOW + 60_000.0);
        assert_eq!(plan_refresh(&near, NOW), RefreshPlan::Refresh);
        let expired = ready_slice(UserRole::Reader, NOW - 1.0);
        assert_eq!(plan_refresh(&expired, NOW), RefreshPlan::Refresh);
    }

    #[test]
    fn repeated_failures_force_logout() {
        let mut slice = ready_slice(UserRole::Reader, NOW - 1.0);
        for _ in 0..MAX_REFRESH_FAILURES {
            note_refresh_failure(&mut slice);
        }
        assert_eq!(plan_refresh(&slice, NOW), RefreshPlan::ForceLogout);
    }
}
