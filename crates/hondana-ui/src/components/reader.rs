//! Chapter reader: page strip, display preferences, progress recording.
//!
//! Opening a chapter overwrites the series' reading-progress entry; the
//! persistence effect in the app shell writes it through to storage.

use crate::app::api::CacheCtx;
use crate::app::routes::Route;
use crate::core::query::QueryKey;
use crate::core::reader::{PageSpacing, ReaderBackground, ReaderPatch, ReaderPreferences};
use crate::core::remote::ApiError;
use crate::core::store::AppStore;
use hondana_api_models::ChapterDetail;
use js_sys::Date;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

const ZOOM_STEP: u16 = 10;

#[derive(Properties, PartialEq)]
pub(crate) struct ReaderPageProps {
    pub slug: String,
    pub chapter: String,
}

#[function_component(ReaderPage)]
pub(crate) fn reader_page(props: &ReaderPageProps) -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let chapter = use_state(|| None::<Result<ChapterDetail, ApiError>>);
    let prefs = use_selector(|store: &AppStore| store.reader.clone());
    let dispatch = Dispatch::<AppStore>::new();

    {
        let chapter = chapter.clone();
        let cache = ctx.cache.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |(slug, chapter_slug): &(String, String)| {
                chapter.set(None);
                let key = QueryKey::Chapter {
                    manga: slug.clone(),
                    chapter: chapter_slug.clone(),
                };
                let slug = slug.clone();
                spawn_local(async move {
                    let fetched = cache.fetch_as::<ChapterDetail>(&key).await;
                    if let Ok(data) = &fetched {
                        record_progress(&dispatch, &slug, data);
                        if let Some(next) = &data.next_slug {
                            cache.prefetch(QueryKey::Chapter {
                                manga: slug.clone(),
                                chapter: next.clone(),
                            });
                        }
                    }
                    chapter.set(Some(fetched));
                });
                || ()
            },
            (props.slug.clone(), props.chapter.clone()),
        );
    }

    let apply_patch = {
        let dispatch = dispatch.clone();
        Callback::from(move |patch: ReaderPatch| {
            dispatch.reduce_mut(|store| store.reader = store.reader.apply(&patch));
        })
    };
    let on_reset = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| {
            dispatch.reduce_mut(|store| store.reader = ReaderPreferences::default());
        })
    };

    html! {
        <section class={classes!("reader", background_class(prefs.background))}>
            <PrefsBar prefs={(*prefs).clone()} on_patch={apply_patch} on_reset={on_reset} />
            {match &*chapter {
                None => html! { <p class="muted" aria-busy="true">{"Loading chapter…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(data)) => render_chapter(&props.slug, data, &prefs),
            }}
        </section>
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn record_progress(dispatch: &Dispatch<AppStore>, slug: &str, data: &ChapterDetail) {
    let ordinal = data.number.floor().max(0.0) as u32;
    let chapter_slug = data.slug.clone();
    let slug = slug.to_string();
    dispatch.reduce_mut(move |store| {
        store
            .progress
            .set(&slug, &chapter_slug, ordinal, Date::now());
    });
}

const fn background_class(background: ReaderBackground) -> &'static str {
    match background {
        ReaderBackground::Dark => "bg-dark",
        ReaderBackground::Light => "bg-light",
        ReaderBackground::Grey => "bg-grey",
    }
}

const fn spacing_class(spacing: PageSpacing) -> &'static str {
    match spacing {
        PageSpacing::None => "gap-none",
        PageSpacing::Normal => "gap-normal",
        PageSpacing::Wide => "gap-wide",
    }
}

fn render_chapter(slug: &str, data: &ChapterDetail, prefs: &ReaderPreferences) -> Html {
    let title = data.title.as_ref().map_or_else(
        || format!("Chapter {}", data.number),
        |title| format!("Chapter {}: {title}", data.number),
    );
    let width = format!("width: {}%;", prefs.zoom);
    let nav = prefs.show_navigation.then(|| render_nav(slug, data));
    html! {
        <>
            <header class="chapter-head">
                <Link<Route> to={Route::MangaDetail { slug: slug.to_string() }}>{"← Back"}</Link<Route>>
                <h1>{title}</h1>
            </header>
            {nav.clone().unwrap_or_default()}
            <div class={classes!("page-strip", spacing_class(prefs.spacing))}>
                {for data.pages.iter().enumerate().map(|(index, url)| html! {
                    <img
                        key={url.clone()}
                        src={url.clone()}
                        style={width.clone()}
                        alt={format!("Page {}", index + 1)}
                        loading="lazy"
                    />
                })}
            </div>
            {nav.unwrap_or_default()}
        </>
    }
}

fn render_nav(slug: &str, data: &ChapterDetail) -> Html {
    html! {
        <nav class="chapter-nav">
            if let Some(prev) = &data.prev_slug {
                <Link<Route> to={Route::Reader { slug: slug.to_string(), chapter: prev.clone() }}>
                    {"← Previous"}
                </Link<Route>>
            }
            if let Some(next) = &data.next_slug {
                <Link<Route> to={Route::Reader { slug: slug.to_string(), chapter: next.clone() }}>
                    {"Next →"}
                </Link<Route>>
            }
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct PrefsBarProps {
    prefs: ReaderPreferences,
    on_patch: Callback<ReaderPatch>,
    on_reset: Callback<MouseEvent>,
}

#[function_component(PrefsBar)]
fn prefs_bar(props: &PrefsBarProps) -> Html {
    let on_background = {
        let on_patch = props.on_patch.clone();
        Callback::from(move |event: Event| {
            let value = select_value(&event);
            let background = match value.as_str() {
                "light" => ReaderBackground::Light,
                "grey" => ReaderBackground::Grey,
                _ => ReaderBackground::Dark,
            };
            on_patch.emit(ReaderPatch {
                background: Some(background),
                ..ReaderPatch::default()
            });
        })
    };
    let on_spacing = {
        let on_patch = props.on_patch.clone();
        Callback::from(move |event: Event| {
            let value = select_value(&event);
            let spacing = match value.as_str() {
                "none" => PageSpacing::None,
                "wide" => PageSpacing::Wide,
                _ => PageSpacing::Normal,
            };
            on_patch.emit(ReaderPatch {
                spacing: Some(spacing),
                ..ReaderPatch::default()
            });
        })
    };
    let zoom = props.prefs.zoom;
    let on_zoom_out = {
        let on_patch = props.on_patch.clone();
        Callback::from(move |_| {
            on_patch.emit(ReaderPatch {
                zoom: Some(zoom.saturating_sub(ZOOM_STEP)),
                ..ReaderPatch::default()
            });
        })
    };
    let on_zoom_in = {
        let on_patch = props.on_patch.clone();
        Callback::from(move |_| {
            on_patch.emit(ReaderPatch {
                zoom: Some(zoom.saturating_add(ZOOM_STEP)),
                ..ReaderPatch::default()
            });
        })
    };
    let show_navigation = props.prefs.show_navigation;
    let on_toggle_nav = {
        let on_patch = props.on_patch.clone();
        Callback::from(move |_| {
            on_patch.emit(ReaderPatch {
                show_navigation: Some(!show_navigation),
                ..ReaderPatch::default()
            });
        })
    };

    html! {
        <div class="prefs-bar">
            <label>
                {"Background"}
                <select onchange={on_background}>
                    <option value="dark" selected={props.prefs.background == ReaderBackground::Dark}>{"Dark"}</option>
                    <option value="light" selected={props.prefs.background == ReaderBackground::Light}>{"Light"}</option>
                    <option value="grey" selected={props.prefs.background == ReaderBackground::Grey}>{"Grey"}</option>
                </select>
            </label>
            <label>
                {"Spacing"}
                <select onchange={on_spacing}>
                    <option value="none" selected={props.prefs.spacing == PageSpacing::None}>{"None"}</option>
                    <option value="normal" selected={props.prefs.spacing == PageSpacing::Normal}>{"Normal"}</option>
                    <option value="wide" selected={props.prefs.spacing == PageSpacing::Wide}>{"Wide"}</option>
                </select>
            </label>
            <div class="zoom">
                <button onclick={on_zoom_out} aria-label="Zoom out">{"−"}</button>
                <span>{format!("{zoom}%")}</span>
                <button onclick={on_zoom_in} aria-label="Zoom in">{"+"}</button>
            </div>
            <label class="nav-toggle">
                <input type="checkbox" checked={show_navigation} onchange={on_toggle_nav} />
                {"Chapter navigation"}
            </label>
            <button class="ghost" onclick={props.on_reset.clone()}>{"Reset"}</button>
        </div>
    }
}

fn select_value(event: &Event) -> String {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
        .map(|select| select.value())
        .unwrap_or_default()
}
