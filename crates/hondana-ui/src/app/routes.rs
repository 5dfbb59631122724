//! Routing definitions for the Hondana UI.
use crate::core::routes::{RouteClass, classify};
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/browse")]
    Browse,
    #[at("/search")]
    Search,
    #[at("/manga/:slug")]
    MangaDetail { slug: String },
    #[at("/manga/:slug/:chapter")]
    Reader { slug: String, chapter: String },
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/library")]
    Library,
    #[at("/history")]
    History,
    #[at("/profile")]
    Profile,
    #[at("/admin")]
    AdminDashboard,
    #[at("/admin/manga")]
    AdminManga,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Session category of this route, from the static classifier lists.
    pub(crate) fn class(&self) -> RouteClass {
        classify(&self.to_path())
    }
}
