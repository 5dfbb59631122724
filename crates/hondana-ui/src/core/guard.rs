//! Render-gating decisions for the three guard variants.
//!
//! # Design
//! - The decision is a pure function over session facts; the wasm components
//!   only translate the outcome into a redirect or markup.
//! - While session hydration is unresolved the outcome is always
//!   [`GuardOutcome::Pending`] so an already-signed-in user is never bounced
//!   to login by a race (anti-flicker).
//! - Guards never error toward the render tree; every input resolves to a
//!   render, a redirect, or a loading state.

use crate::core::auth::{Hydration, SessionView};

/// Bounded wait for hydration before a guard forces its decision.
pub const HYDRATION_FALLBACK_MS: u32 = 400;

/// The guard variant being evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Admin role required.
    AdminOnly,
    /// Only signed-out visitors may pass.
    GuestOnly,
    /// Any authenticated session may pass.
    Authenticated,
}

/// Resolution of a guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Hydration unresolved; show a neutral loading indicator.
    Pending,
    /// Render the gated content.
    Render,
    /// Send the visitor to login, remembering where they were headed.
    RedirectLogin {
        /// Path to return to after a successful sign-in.
        return_to: String,
    },
    /// Send an authenticated-but-unauthorized user to the default page.
    RedirectHome,
    /// Send an already-authenticated visitor to an in-app target path.
    RedirectTo(String),
}

/// Decide how a guard resolves for the current session facts.
///
/// `redirect_param` is the explicit `redirect` query value, honored only by
/// [`GuardKind::GuestOnly`] and only when it names an in-app absolute path.
#[must_use]
pub fn decide(
    kind: GuardKind,
    hydration: Hydration,
    view: SessionView,
    path: &str,
    redirect_param: Option<&str>,
) -> GuardOutcome {
    if hydration == Hydration::Pending {
        return GuardOutcome::Pending;
    }
    match kind {
        GuardKind::AdminOnly => {
            if !view.authenticated {
                GuardOutcome::RedirectLogin {
                    return_to: path.to_string(),
                }
            } else if view.admin {
                GuardOutcome::Render
            } else {
                GuardOutcome::RedirectHome
            }
        }
        GuardKind::GuestOnly => {
            if view.authenticated {
                GuardOutcome::RedirectTo(
                    redirect_param
                        .filter(|target| is_in_app_path(target))
                        .map_or_else(|| "/".to_string(), ToString::to_string),
                )
            } else {
                GuardOutcome::Render
            }
        }
        GuardKind::Authenticated => {
            if view.authenticated {
                GuardOutcome::Render
            } else {
                GuardOutcome::RedirectLogin {
                    return_to: path.to_string(),
                }
            }
        }
    }
}

/// Extract the `redirect` parameter from a raw query string (no leading `?`).
#[must_use]
pub fn redirect_param(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name == "redirect" && !value.is_empty() {
            urlencoding::decode(value).ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Build the login href carrying the caller's return path.
#[must_use]
pub fn login_href(return_to: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(return_to))
}

// Absolute in-app paths only; anything else could leave the origin.
fn is_in_app_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::{GuardKind, GuardOutcome, decide, login_href, redirect_param};
    use crate::core::auth::{Hydration, SessionView};

    const GUEST: SessionView = SessionView {
        authenticated: false,
        admin: false,
    };
    const READER: SessionView = SessionView {
        authenticated: true,
        admin: false,
    };
    const ADMIN: SessionView = SessionView {
        authenticated: true,
        admin: true,
    };

    #[test]
    fn every_variant_waits_for_hydration() {
        for kind in [
            GuardKind::AdminOnly,
            GuardKind::GuestOnly,
            GuardKind::Authenticated,
        ] {
            assert_eq!(
                decide(kind, Hydration::Pending, GUEST, "/admin", None),
                GuardOutcome::Pending
            );
        }
    }

    #[test]
    fn admin_guard_redirects_guests_to_login_with_return() {
        assert_eq!(
            decide(GuardKind::AdminOnly, Hydration::Ready, GUEST, "/admin", None),
            GuardOutcome::RedirectLogin {
                return_to: "/admin".to_string()
            }
        );
    }

    #[test]
    fn admin_guard_sends_non_admins_home() {
        assert_eq!(
            decide(GuardKind::AdminOnly, Hydration::Ready, READER, "/admin", None),
            GuardOutcome::RedirectHome
        );
        assert_eq!(
            decide(GuardKind::AdminOnly, Hydration::Ready, ADMIN, "/admin", None),
            GuardOutcome::Render
        );
    }

    #[test]
    fn guest_guard_honors_redirect_query() {
        assert_eq!(
            decide(
                GuardKind::GuestOnly,
                Hydration::Ready,
                READER,
                "/login",
                Some("/library"),
            ),
            GuardOutcome::RedirectTo("/library".to_string())
        );
        assert_eq!(
            decide(GuardKind::GuestOnly, Hydration::Ready, READER, "/login", None),
            GuardOutcome::RedirectTo("/".to_string())
        );
        assert_eq!(
            decide(GuardKind::GuestOnly, Hydration::Ready, GUEST, "/login", None),
            GuardOutcome::Render
        );
    }

    #[test]
    fn guest_guard_ignores_off_origin_targets() {
        for target in ["https://evil.example", "//evil.example", "evil"] {
            assert_eq!(
                decide(
                    GuardKind::GuestOnly,
                    Hydration::Ready,
                    READER,
                    "/login",
                    Some(target),
                ),
                GuardOutcome::RedirectTo("/".to_string()),
                "target {target}"
            );
        }
    }

    #[test]
    fn protected_guard_round_trips_current_path() {
        assert_eq!(
            decide(
                GuardKind::Authenticated,
                Hydration::Ready,
                GUEST,
                "/library",
                None,
            ),
            GuardOutcome::RedirectLogin {
                return_to: "/library".to_string()
            }
        );
        assert_eq!(
            decide(
                GuardKind::Authenticated,
                Hydration::Ready,
                READER,
                "/library",
                None,
            ),
            GuardOutcome::Render
        );
    }

    #[test]
    fn redirect_param_decodes_first_match() {
        assert_eq!(
            redirect_param("redirect=%2Flibrary&foo=bar"),
            Some("/library".to_string())
        );
        assert_eq!(redirect_param("foo=bar"), None);
        assert_eq!(redirect_param("redirect="), None);
        assert_eq!(redirect_param(""), None);
    }

    #[test]
    fn login_href_encodes_return_path() {
        assert_eq!(
            login_href("/admin/manga"),
            "/login?redirect=%2Fadmin%2Fmanga"
        );
    }
}
