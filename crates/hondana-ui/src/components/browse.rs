//! Series listing: filtered browse grid and search.
//!
//! Both pages read through the query cache; once a full page renders, the
//! next page is prefetched so forward pagination feels instant.

use crate::app::api::CacheCtx;
use crate::app::routes::Route;
use crate::core::query::QueryKey;
use crate::core::remote::ApiError;
use hondana_api_models::{MangaStatus, MangaSummary, Page};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

/// Canonical filter string for a listing key; empty when unfiltered.
fn build_filters(search: &str, status: Option<MangaStatus>) -> String {
    let mut parts = Vec::new();
    if !search.trim().is_empty() {
        parts.push(format!("q={}", urlencoding::encode(search.trim())));
    }
    if let Some(status) = status {
        parts.push(format!("status={}", status_key(status)));
    }
    parts.join("&")
}

const fn status_key(status: MangaStatus) -> &'static str {
    match status {
        MangaStatus::Ongoing => "ongoing",
        MangaStatus::Completed => "completed",
        MangaStatus::Hiatus => "hiatus",
        MangaStatus::Cancelled => "cancelled",
    }
}

type PageResult = Result<Page<MangaSummary>, ApiError>;

/// Load one listing page into local state, prefetching its successor once
/// it arrives with more pages behind it.
#[hook]
fn use_manga_page(filters: String, page: u32) -> UseStateHandle<Option<PageResult>> {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let result = use_state(|| None::<PageResult>);
    {
        let result = result.clone();
        use_effect_with_deps(
            move |(filters, page): &(String, u32)| {
                result.set(None);
                let key = QueryKey::MangaList {
                    filters: filters.clone(),
                    page: *page,
                };
                let cache = ctx.cache.clone();
                let filters = filters.clone();
                let page = *page;
                spawn_local(async move {
                    let fetched = cache.fetch_as::<Page<MangaSummary>>(&key).await;
                    if let Ok(data) = &fetched {
                        if data.has_more() {
                            cache.prefetch(QueryKey::MangaList {
                                filters,
                                page: page + 1,
                            });
                        }
                    }
                    result.set(Some(fetched));
                });
                || ()
            },
            (filters, page),
        );
    }
    result
}

fn render_grid(data: &Page<MangaSummary>) -> Html {
    if data.data.is_empty() {
        return html! { <p class="muted">{"Nothing here yet."}</p> };
    }
    html! {
        <ul class="manga-grid">
            {for data.data.iter().map(render_card)}
        </ul>
    }
}

fn render_card(manga: &MangaSummary) -> Html {
    html! {
        <li class="manga-card" key={manga.slug.clone()}>
            <Link<Route> to={Route::MangaDetail { slug: manga.slug.clone() }}>
                if let Some(cover) = &manga.cover_url {
                    <img src={cover.clone()} alt={manga.title.clone()} loading="lazy" />
                }
                <span class="title">{&manga.title}</span>
                <span class="rating">{format!("★ {:.1}", manga.rating_avg)}</span>
            </Link<Route>>
        </li>
    }
}

fn render_pager(page: u32, data: &Page<MangaSummary>, set_page: &Callback<u32>) -> Html {
    let prev = {
        let set_page = set_page.clone();
        Callback::from(move |_| set_page.emit(page - 1))
    };
    let next = {
        let set_page = set_page.clone();
        Callback::from(move |_| set_page.emit(page + 1))
    };
    html! {
        <nav class="pager">
            <button disabled={page <= 1} onclick={prev}>{"Previous"}</button>
            <span>{format!("Page {page} of {}", data.last_page)}</span>
            <button disabled={!data.has_more()} onclick={next}>{"Next"}</button>
        </nav>
    }
}

fn render_page_body(
    result: &Option<PageResult>,
    page: u32,
    set_page: &Callback<u32>,
) -> Html {
    match result {
        None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
        Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
        Some(Ok(data)) => html! {
            <>
                {render_grid(data)}
                {render_pager(page, data, set_page)}
            </>
        },
    }
}

#[function_component(BrowsePage)]
pub(crate) fn browse_page() -> Html {
    let page = use_state(|| 1u32);
    let status = use_state(|| None::<MangaStatus>);
    let result = use_manga_page(build_filters("", *status), *page);

    let set_page = {
        let page = page.clone();
        Callback::from(move |next: u32| page.set(next))
    };
    let on_status = {
        let status = status.clone();
        let page = page.clone();
        Callback::from(move |event: Event| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value())
                .unwrap_or_default();
            status.set(match value.as_str() {
                "ongoing" => Some(MangaStatus::Ongoing),
                "completed" => Some(MangaStatus::Completed),
                "hiatus" => Some(MangaStatus::Hiatus),
                "cancelled" => Some(MangaStatus::Cancelled),
                _ => None,
            });
            page.set(1);
        })
    };

    html! {
        <section class="browse">
            <header class="page-head">
                <h1>{"Browse"}</h1>
                <select onchange={on_status}>
                    <option value="" selected={status.is_none()}>{"All statuses"}</option>
                    {for [
                        MangaStatus::Ongoing,
                        MangaStatus::Completed,
                        MangaStatus::Hiatus,
                        MangaStatus::Cancelled,
                    ]
                    .iter()
                    .map(|s| html! {
                        <option value={status_key(*s)} selected={*status == Some(*s)}>
                            {status_key(*s)}
                        </option>
                    })}
                </select>
            </header>
            {render_page_body(&result, *page, &set_page)}
        </section>
    }
}

#[function_component(SearchPage)]
pub(crate) fn search_page() -> Html {
    let input = use_state(String::new);
    let submitted = use_state(String::new);
    let page = use_state(|| 1u32);
    let result = use_manga_page(build_filters(&submitted, None), *page);

    let on_input = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            input.set(value);
        })
    };
    let on_submit = {
        let input = input.clone();
        let submitted = submitted.clone();
        let page = page.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            submitted.set((*input).clone());
            page.set(1);
        })
    };
    let set_page = {
        let page = page.clone();
        Callback::from(move |next: u32| page.set(next))
    };

    html! {
        <section class="search">
            <form class="search-bar" onsubmit={on_submit}>
                <input
                    type="search"
                    placeholder="Search series…"
                    value={(*input).clone()}
                    oninput={on_input}
                />
                <button type="submit">{"Search"}</button>
            </form>
            if submitted.is_empty() {
                <p class="muted">{"Type a title to search the catalogue."}</p>
            } else {
                {render_page_body(&result, *page, &set_page)}
            }
        </section>
    }
}
