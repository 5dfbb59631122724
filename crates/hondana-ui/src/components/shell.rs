//! App chrome: top navigation and the routed content slot.

use crate::app::api::ApiCtx;
use crate::app::routes::Route;
use crate::core::store::AppStore;
use crate::services::session;
use js_sys::Date;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct AppShellProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &AppShellProps) -> Html {
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let session = use_selector(|store: &AppStore| {
        (
            store.session.view(Date::now()),
            store
                .session
                .user
                .as_ref()
                .map(|user| user.username.clone()),
        )
    });
    let (view, username) = (*session).clone();

    let on_logout = {
        let client = api.client.clone();
        Callback::from(move |_| {
            let client = client.clone();
            spawn_local(async move {
                session::logout(&client).await;
            });
        })
    };

    html! {
        <div class="shell">
            <header class="topbar">
                <Link<Route> classes="brand" to={Route::Home}>{"Hondana"}</Link<Route>>
                <nav class="primary-nav">
                    <Link<Route> to={Route::Browse}>{"Browse"}</Link<Route>>
                    <Link<Route> to={Route::Search}>{"Search"}</Link<Route>>
                    if view.authenticated {
                        <Link<Route> to={Route::Library}>{"Library"}</Link<Route>>
                        <Link<Route> to={Route::History}>{"History"}</Link<Route>>
                    }
                    if view.admin {
                        <Link<Route> to={Route::AdminDashboard}>{"Admin"}</Link<Route>>
                    }
                </nav>
                <div class="session-controls">
                    if view.authenticated {
                        <Link<Route> classes="username" to={Route::Profile}>
                            {username.unwrap_or_else(|| "Profile".to_string())}
                        </Link<Route>>
                        <button class="ghost" onclick={on_logout}>{"Sign out"}</button>
                    } else {
                        <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
                    }
                </div>
            </header>
            <main class="content">{props.children.clone()}</main>
        </div>
    }
}
