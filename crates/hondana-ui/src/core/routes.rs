//! Static route classification for session gating.
//!
//! # Design
//! - The four lists are configured once here; guards consume the resulting
//!   category rather than re-matching paths themselves.
//! - Matching is exact or prefix-plus-separator; the lists are small and
//!   kept non-overlapping, so no longest-match logic is needed.

/// Category assigned to a path by [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteClass {
    /// Back-office surface, admin role required.
    Admin,
    /// Requires an authenticated session.
    Protected,
    /// Only reachable while signed out (login, register).
    AuthOnly,
    /// Reachable by anyone; also the default for unmatched paths.
    Public,
}

/// Paths reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &["/", "/browse", "/search", "/manga", "/about"];

/// Paths only shown to signed-out visitors.
pub const AUTH_ONLY_ROUTES: &[&str] = &["/login", "/register", "/forgot-password"];

/// Paths requiring an authenticated session.
pub const PROTECTED_ROUTES: &[&str] = &["/library", "/history", "/profile", "/settings"];

/// Paths requiring the admin role.
pub const ADMIN_ROUTES: &[&str] = &["/admin"];

/// Classify a path into exactly one [`RouteClass`].
///
/// A path matches a list entry `r` when `path == r` or `path` starts with
/// `r` followed by `/`. Categories are evaluated in the fixed priority
/// order admin > protected > auth-only > public, so a path that could match
/// two lists resolves to the more restrictive category. Unmatched paths are
/// treated as public.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    if matches_any(path, ADMIN_ROUTES) {
        RouteClass::Admin
    } else if matches_any(path, PROTECTED_ROUTES) {
        RouteClass::Protected
    } else if matches_any(path, AUTH_ONLY_ROUTES) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

fn matches_any(path: &str, list: &[&str]) -> bool {
    list.iter().any(|entry| matches_entry(path, entry))
}

fn matches_entry(path: &str, entry: &str) -> bool {
    path == entry
        || path
            .strip_prefix(entry)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::{PROTECTED_ROUTES, RouteClass, classify};

    #[test]
    fn protected_entries_match_exact_and_nested() {
        for entry in PROTECTED_ROUTES {
            assert_eq!(classify(entry), RouteClass::Protected, "exact {entry}");
            let nested = format!("{entry}/anything");
            assert_eq!(classify(&nested), RouteClass::Protected, "nested {nested}");
        }
    }

    #[test]
    fn prefix_requires_separator() {
        // "/librarything" must not match the "/library" entry.
        assert_eq!(classify("/librarything"), RouteClass::Public);
        assert_eq!(classify("/adminish"), RouteClass::Public);
    }

    #[test]
    fn admin_wins_over_other_lists() {
        assert_eq!(classify("/admin"), RouteClass::Admin);
        assert_eq!(classify("/admin/manga/naruto"), RouteClass::Admin);
    }

    #[test]
    fn auth_only_covers_sign_in_surfaces() {
        assert_eq!(classify("/login"), RouteClass::AuthOnly);
        assert_eq!(classify("/register"), RouteClass::AuthOnly);
    }

    #[test]
    fn unknown_paths_default_to_public() {
        assert_eq!(classify("/totally/unknown"), RouteClass::Public);
        assert_eq!(classify(""), RouteClass::Public);
    }

    #[test]
    fn root_entry_only_matches_exactly() {
        assert_eq!(classify("/"), RouteClass::Public);
        // "/" + "/" would be "//"; nested paths fall through to the default.
        assert_eq!(classify("/manga/one-piece"), RouteClass::Public);
    }
}
