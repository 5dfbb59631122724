//! App shell: boot hydration, contexts, routing, background lifecycles.
//!
//! # Design
//! - Exactly one API client, one query cache, and one refresh loop per
//!   boot; everything reaches components through context.
//! - Persisted slices hydrate in a mount effect; store changes write back
//!   through effects so no component talks to storage directly.
//! - Each route is wrapped by the guard its classifier category demands.

use crate::app::api::{ApiCtx, CacheCtx};
use crate::app::guards::{AdminOnly, GuestOnly, ProtectedRoute};
use crate::app::refresh::{RefreshHandle, start_refresh_loop};
use crate::components::admin::{AdminDashboardPage, AdminMangaPage};
use crate::components::auth_forms::{LoginForm, RegisterForm};
use crate::components::browse::{BrowsePage, SearchPage};
use crate::components::library::{HistoryPage, LibraryPage, ProfilePage};
use crate::components::manga::MangaPage;
use crate::components::reader::ReaderPage;
use crate::components::shell::AppShell;
use crate::components::toast::ToastHost;
use crate::core::auth::apply_hydrated;
use crate::core::routes::RouteClass;
use crate::core::store::AppStore;
use persistence::{
    api_base_url, load_progress, load_reader_prefs, load_session, persist_progress,
    persist_reader_prefs,
};
pub(crate) use routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

pub(crate) mod api;
mod guards;
pub(crate) mod persistence;
mod refresh;
mod routes;

#[function_component(HondanaApp)]
pub(crate) fn hondana_app() -> Html {
    let dispatch = Dispatch::<AppStore>::new();
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());
    let cache_ctx = {
        let client = api_ctx.client.clone();
        use_memo(move |_| CacheCtx::new(client), ())
    };
    let refresh_handle = use_mut_ref(|| None as Option<RefreshHandle>);
    let access_token = use_selector(|store: &AppStore| {
        store
            .session
            .tokens
            .as_ref()
            .map(|tokens| tokens.access.value.clone())
    });

    // Boot hydration: persisted session, reader prefs, reading progress.
    {
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                let loaded = load_session();
                dispatch.reduce_mut(|store| {
                    store.reader = load_reader_prefs();
                    store.progress = load_progress();
                    apply_hydrated(&mut store.session, loaded);
                });
                || ()
            },
            (),
        );
    }

    // Mirror the current access token into the shared client.
    {
        let api_ctx = (*api_ctx).clone();
        use_effect_with_deps(
            move |token: &Option<String>| {
                api_ctx.client.set_access_token(token.clone());
                || ()
            },
            (*access_token).clone(),
        );
    }

    // Background token refresh for the lifetime of the app.
    {
        let api_ctx = (*api_ctx).clone();
        let refresh_handle = refresh_handle.clone();
        use_effect_with_deps(
            move |_| {
                *refresh_handle.borrow_mut() = Some(start_refresh_loop(api_ctx.client.clone()));
                move || {
                    refresh_handle.borrow_mut().take();
                }
            },
            (),
        );
    }

    // Write-through persistence for the local preference stores.
    {
        let prefs = use_selector(|store: &AppStore| store.reader.clone());
        use_effect_with_deps(
            move |prefs| {
                persist_reader_prefs(prefs);
                || ()
            },
            (*prefs).clone(),
        );
    }
    {
        let progress = use_selector(|store: &AppStore| store.progress.clone());
        use_effect_with_deps(
            move |progress| {
                persist_progress(progress);
                || ()
            },
            (*progress).clone(),
        );
    }
    // Session persistence on change, so refresh-renewed tokens survive a
    // reload even when the renewal happened outside a user flow.
    {
        let session = use_selector(|store: &AppStore| store.session.to_persisted());
        use_effect_with_deps(
            move |persisted| {
                if let Some(persisted) = persisted {
                    persistence::persist_session(persisted);
                }
                || ()
            },
            (*session).clone(),
        );
    }

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<CacheCtx> context={(*cache_ctx).clone()}>
                <BrowserRouter>
                    <AppShell>
                        <Switch<Route> render={route_content} />
                    </AppShell>
                    <ToastHost />
                </BrowserRouter>
            </ContextProvider<CacheCtx>>
        </ContextProvider<ApiCtx>>
    }
}

/// Render a route's page inside the guard its classifier category demands.
fn route_content(route: Route) -> Html {
    let page = page_for(&route);
    match route.class() {
        RouteClass::Admin => html! { <AdminOnly>{page}</AdminOnly> },
        RouteClass::Protected => html! { <ProtectedRoute>{page}</ProtectedRoute> },
        RouteClass::AuthOnly => html! { <GuestOnly>{page}</GuestOnly> },
        RouteClass::Public => page,
    }
}

fn page_for(route: &Route) -> Html {
    match route {
        Route::Home => html! { <Redirect<Route> to={Route::Browse} /> },
        Route::Browse => html! { <BrowsePage /> },
        Route::Search => html! { <SearchPage /> },
        Route::MangaDetail { slug } => html! { <MangaPage slug={slug.clone()} /> },
        Route::Reader { slug, chapter } => html! {
            <ReaderPage slug={slug.clone()} chapter={chapter.clone()} />
        },
        Route::Login => html! { <LoginForm /> },
        Route::Register => html! { <RegisterForm /> },
        Route::Library => html! { <LibraryPage /> },
        Route::History => html! { <HistoryPage /> },
        Route::Profile => html! { <ProfilePage /> },
        Route::AdminDashboard => html! { <AdminDashboardPage /> },
        Route::AdminManga => html! { <AdminMangaPage /> },
        Route::NotFound => html! {
            <div class="placeholder">
                <h2>{"Not found"}</h2>
                <p class="muted">{"Use the navigation to get back to the catalogue."}</p>
            </div>
        },
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<HondanaApp>::with_root(root).render();
    } else {
        yew::Renderer::<HondanaApp>::new().render();
    }
}
