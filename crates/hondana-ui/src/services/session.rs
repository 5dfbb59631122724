//! Login, registration, refresh, and logout flows.
//!
//! # Design
//! - Every flow claims the session writer slot first; overlapping flows
//!   return [`AuthError::Busy`] instead of racing the store.
//! - All store writes go through the pure transitions in `core::auth`; this
//!   module sequences them around network calls and persistence.
//! - The access token is mirrored into the API client immediately after
//!   every transition so requests never carry a stale bearer.

use crate::app::persistence::{clear_session_storage, persist_session};
use crate::core::auth::{
    AuthError, RefreshPlan, SessionTokens, apply_login, apply_logout, apply_refresh,
    begin_auth_flow, end_auth_flow, note_refresh_failure, plan_refresh,
};
use crate::core::remote::{ApiError, ApiErrorKind};
use crate::core::store::AppStore;
use crate::services::api::ApiClient;
use hondana_api_models::{LoginRequest, RefreshRequest, RegisterRequest, SessionResponse};
use js_sys::Date;
use yewdux::dispatch::Dispatch;

/// Exchange credentials for a session.
pub(crate) async fn login(api: &ApiClient, request: LoginRequest) -> Result<(), AuthError> {
    let dispatch = Dispatch::<AppStore>::new();
    if !claim_writer(&dispatch) {
        return Err(AuthError::Busy);
    }
    let result = api.login(&request).await;
    release_writer(&dispatch);
    let response = result.map_err(map_credential_error)?;
    install_session(api, &dispatch, response, true);
    Ok(())
}

/// Create an account and sign straight in.
pub(crate) async fn register(api: &ApiClient, request: RegisterRequest) -> Result<(), AuthError> {
    let dispatch = Dispatch::<AppStore>::new();
    if !claim_writer(&dispatch) {
        return Err(AuthError::Busy);
    }
    let result = api.register(&request).await;
    release_writer(&dispatch);
    let response = result.map_err(map_credential_error)?;
    install_session(api, &dispatch, response, true);
    Ok(())
}

/// One tick of the background refresh lifecycle. Safe to call from
/// overlapping triggers: planning skips while another flow holds the
/// writer slot.
pub(crate) async fn run_refresh_tick(api: &ApiClient) {
    let dispatch = Dispatch::<AppStore>::new();
    let plan = plan_refresh(&dispatch.get().session, Date::now());
    match plan {
        RefreshPlan::Skip => {}
        RefreshPlan::ForceLogout => force_logout(api),
        RefreshPlan::Refresh => {
            if !claim_writer(&dispatch) {
                return;
            }
            let Some(refresh_token) = dispatch
                .get()
                .session
                .tokens
                .as_ref()
                .map(|tokens| tokens.refresh.clone())
            else {
                release_writer(&dispatch);
                return;
            };
            let result = api.refresh(&RefreshRequest { refresh_token }).await;
            release_writer(&dispatch);
            match result {
                Ok(response) => install_session(api, &dispatch, response, false),
                Err(err) if err.kind == ApiErrorKind::Unauthorized => {
                    // Rejected refresh token: the session is unrecoverable.
                    force_logout(api);
                }
                Err(_) => {
                    dispatch.reduce_mut(|store| note_refresh_failure(&mut store.session));
                }
            }
        }
    }
}

/// Sign out: best-effort server teardown, then local teardown.
pub(crate) async fn logout(api: &ApiClient) {
    let _ = api.logout().await;
    force_logout(api);
}

/// Local-only session teardown; used directly when the server is
/// unreachable or the refresh token is already dead.
pub(crate) fn force_logout(api: &ApiClient) {
    api.set_access_token(None);
    clear_session_storage();
    Dispatch::<AppStore>::new().reduce_mut(|store| apply_logout(&mut store.session));
}

fn install_session(
    api: &ApiClient,
    dispatch: &Dispatch<AppStore>,
    response: SessionResponse,
    is_login: bool,
) {
    let tokens = SessionTokens::from_wire(&response.tokens, Date::now());
    api.set_access_token(Some(tokens.access.value.clone()));
    dispatch.reduce_mut(|store| {
        if is_login {
            apply_login(&mut store.session, response.user.clone(), tokens.clone());
        } else {
            apply_refresh(
                &mut store.session,
                Some(response.user.clone()),
                tokens.clone(),
            );
        }
        if let Some(persisted) = store.session.to_persisted() {
            persist_session(&persisted);
        }
    });
}

fn claim_writer(dispatch: &Dispatch<AppStore>) -> bool {
    let mut claimed = false;
    dispatch.reduce_mut(|store| claimed = begin_auth_flow(&mut store.session));
    claimed
}

fn release_writer(dispatch: &Dispatch<AppStore>) {
    dispatch.reduce_mut(|store| end_auth_flow(&mut store.session));
}

fn map_credential_error(err: ApiError) -> AuthError {
    match err.kind {
        ApiErrorKind::Unauthorized | ApiErrorKind::Validation => AuthError::InvalidCredentials,
        ApiErrorKind::Forbidden => AuthError::Forbidden,
        _ => AuthError::Transport(err.to_string()),
    }
}
