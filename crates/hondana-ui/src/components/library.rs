//! Signed-in surfaces: favorites library, reading history, profile.

use crate::app::api::CacheCtx;
use crate::app::routes::Route;
use crate::components::relative_time::RelativeTime;
use crate::core::query::QueryKey;
use crate::core::remote::ApiError;
use crate::core::store::AppStore;
use hondana_api_models::{FavoriteEntry, Page};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(LibraryPage)]
pub(crate) fn library_page() -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let page = use_state(|| 1u32);
    let result = use_state(|| None::<Result<Page<FavoriteEntry>, ApiError>>);

    {
        let result = result.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |page: &u32| {
                result.set(None);
                let key = QueryKey::Favorites { page: *page };
                let page = *page;
                spawn_local(async move {
                    let fetched = cache.fetch_as::<Page<FavoriteEntry>>(&key).await;
                    if let Ok(data) = &fetched {
                        if data.has_more() {
                            cache.prefetch(QueryKey::Favorites { page: page + 1 });
                        }
                    }
                    result.set(Some(fetched));
                });
                || ()
            },
            *page,
        );
    }

    let current = *page;
    let prev = {
        let page = page.clone();
        Callback::from(move |_| page.set(current - 1))
    };
    let next = {
        let page = page.clone();
        Callback::from(move |_| page.set(current + 1))
    };

    html! {
        <section class="library">
            <h1>{"My library"}</h1>
            {match &*result {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(data)) => html! {
                    <>
                        if data.data.is_empty() {
                            <p class="muted">{"No favorites yet. Browse the catalogue to add some."}</p>
                        } else {
                            <ul class="favorite-list">
                                {for data.data.iter().map(render_favorite)}
                            </ul>
                        }
                        if data.last_page > 1 {
                            <nav class="pager">
                                <button disabled={data.page <= 1} onclick={prev.clone()}>{"Previous"}</button>
                                <span>{format!("Page {} of {}", data.page, data.last_page)}</span>
                                <button disabled={!data.has_more()} onclick={next.clone()}>{"Next"}</button>
                            </nav>
                        }
                    </>
                },
            }}
        </section>
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_favorite(entry: &FavoriteEntry) -> Html {
    html! {
        <li class="favorite-row" key={entry.manga.slug.clone()}>
            <Link<Route> to={Route::MangaDetail { slug: entry.manga.slug.clone() }}>
                {&entry.manga.title}
            </Link<Route>>
            <span class="chapters">{format!("{} chapters", entry.manga.chapter_count)}</span>
            <RelativeTime at_ms={entry.added_at.timestamp_millis() as f64} />
        </li>
    }
}

#[function_component(HistoryPage)]
pub(crate) fn history_page() -> Html {
    let progress = use_selector(|store: &AppStore| store.progress.clone());
    let dispatch = Dispatch::<AppStore>::new();

    // Most recent first.
    let mut entries: Vec<_> = progress
        .entries
        .iter()
        .map(|(slug, entry)| (slug.clone(), entry.clone()))
        .collect();
    entries.sort_by(|a, b| b.1.updated_at_ms.total_cmp(&a.1.updated_at_ms));

    html! {
        <section class="history">
            <h1>{"Reading history"}</h1>
            if entries.is_empty() {
                <p class="muted">{"Nothing read yet."}</p>
            } else {
                <ul class="history-list">
                    {for entries.into_iter().map(|(slug, entry)| {
                        let on_clear = {
                            let dispatch = dispatch.clone();
                            let slug = slug.clone();
                            Callback::from(move |_| {
                                let slug = slug.clone();
                                dispatch.reduce_mut(move |store| store.progress.clear(&slug));
                            })
                        };
                        html! {
                            <li class="history-row" key={slug.clone()}>
                                <Link<Route> to={Route::Reader {
                                    slug: slug.clone(),
                                    chapter: entry.chapter_slug.clone(),
                                }}>
                                    {format!("{slug}, chapter {}", entry.chapter_number)}
                                </Link<Route>>
                                <RelativeTime at_ms={entry.updated_at_ms} />
                                <button class="ghost" onclick={on_clear}>{"Forget"}</button>
                            </li>
                        }
                    })}
                </ul>
            }
        </section>
    }
}

#[function_component(ProfilePage)]
pub(crate) fn profile_page() -> Html {
    let user = use_selector(|store: &AppStore| store.session.user.clone());

    html! {
        <section class="profile">
            <h1>{"Profile"}</h1>
            {match &*user {
                Some(user) => html! {
                    <dl class="profile-card">
                        if let Some(avatar) = &user.avatar_url {
                            <img class="avatar" src={avatar.clone()} alt={user.username.clone()} />
                        }
                        <dt>{"Username"}</dt>
                        <dd>{&user.username}</dd>
                        <dt>{"E-mail"}</dt>
                        <dd>{&user.email}</dd>
                        <dt>{"Role"}</dt>
                        <dd>{format!("{:?}", user.role)}</dd>
                    </dl>
                },
                None => html! { <p class="muted">{"Not signed in."}</p> },
            }}
        </section>
    }
}
