//! Series detail page: metadata, chapter list, rating, favorite, comments.
//!
//! Rating and favorite both go through the cache's optimistic-mutation
//! protocol; the UI reflects the change immediately and snaps back if the
//! server rejects it.

use crate::app::api::{ApiCtx, CacheCtx};
use crate::app::routes::Route;
use crate::components::relative_time::RelativeTime;
use crate::components::toast::push_toast;
use crate::core::query::{QueryKey, overlay};
use crate::core::remote::ApiError;
use crate::core::store::{AppStore, ToastKind};
use hondana_api_models::{
    ChapterSummary, CommentCreate, CommentEntry, MangaDetail, Page, RatingUpdate,
};
use js_sys::Date;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{use_selector, use_selector_with_deps};

#[derive(Properties, PartialEq)]
pub(crate) struct MangaPageProps {
    pub slug: String,
}

#[function_component(MangaPage)]
pub(crate) fn manga_page(props: &MangaPageProps) -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let detail = use_state(|| None::<Result<MangaDetail, ApiError>>);
    let chapters = use_state(|| None::<Result<Vec<ChapterSummary>, ApiError>>);
    let comments = use_state(|| None::<Result<Page<CommentEntry>, ApiError>>);
    let comments_page = use_state(|| 1u32);
    let comments_reload = use_state(|| 0u32);
    let view = use_selector(|store: &AppStore| store.session.view(Date::now()));
    let resume = use_selector_with_deps(
        |store: &AppStore, slug: &String| store.progress.get(slug).cloned(),
        props.slug.clone(),
    );

    let detail_key = QueryKey::MangaDetail {
        slug: props.slug.clone(),
    };

    {
        let detail = detail.clone();
        let chapters = chapters.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |slug: &String| {
                detail.set(None);
                chapters.set(None);
                let detail_key = QueryKey::MangaDetail { slug: slug.clone() };
                let list_key = QueryKey::ChapterList {
                    manga: slug.clone(),
                };
                spawn_local({
                    let cache = cache.clone();
                    async move {
                        detail.set(Some(cache.fetch_as::<MangaDetail>(&detail_key).await));
                    }
                });
                spawn_local(async move {
                    chapters.set(Some(cache.fetch_as::<Vec<ChapterSummary>>(&list_key).await));
                });
                || ()
            },
            props.slug.clone(),
        );
    }
    {
        let comments = comments.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |(slug, page, _reload): &(String, u32, u32)| {
                comments.set(None);
                let key = QueryKey::Comments {
                    manga: slug.clone(),
                    page: *page,
                };
                spawn_local(async move {
                    comments.set(Some(cache.fetch_as::<Page<CommentEntry>>(&key).await));
                });
                || ()
            },
            (props.slug.clone(), *comments_page, *comments_reload),
        );
    }

    let on_rate = {
        let cache = ctx.cache.clone();
        let client = api.client.clone();
        let detail = detail.clone();
        let detail_key = detail_key.clone();
        let slug = props.slug.clone();
        Callback::from(move |score: u8| {
            let Ok(update) = RatingUpdate::new(score) else {
                return;
            };
            let Some(Ok(current)) = &*detail else {
                return;
            };
            let previous = current.clone();
            let mut optimistic = current.clone();
            optimistic.user_rating = Some(score);
            let Ok(optimistic_value) = serde_json::to_value(&optimistic) else {
                return;
            };
            detail.set(Some(Ok(optimistic)));
            let cache = cache.clone();
            let client = client.clone();
            let detail = detail.clone();
            let detail_key = detail_key.clone();
            let slug = slug.clone();
            spawn_local(async move {
                let outcome = cache
                    .mutate(
                        &detail_key,
                        optimistic_value,
                        || async move {
                            client
                                .rate_manga(&slug, &update)
                                .await
                                .and_then(|response| {
                                    serde_json::to_value(response)
                                        .map_err(|err| ApiError::network(err.to_string()))
                                })
                        },
                        overlay,
                    )
                    .await;
                match outcome {
                    Ok(reconciled) => {
                        if let Ok(updated) = serde_json::from_value::<MangaDetail>(reconciled) {
                            detail.set(Some(Ok(updated)));
                        }
                        push_toast(ToastKind::Success, "Rating saved");
                    }
                    Err(err) => {
                        detail.set(Some(Ok(previous)));
                        push_toast(ToastKind::Error, format!("Rating failed: {err}"));
                    }
                }
            });
        })
    };

    let on_toggle_favorite = {
        let cache = ctx.cache.clone();
        let client = api.client.clone();
        let detail = detail.clone();
        let detail_key = detail_key.clone();
        let slug = props.slug.clone();
        Callback::from(move |_| {
            let Some(Ok(current)) = &*detail else {
                return;
            };
            let previous = current.clone();
            let target = !current.is_favorite;
            let mut optimistic = current.clone();
            optimistic.is_favorite = target;
            let Ok(optimistic_value) = serde_json::to_value(&optimistic) else {
                return;
            };
            detail.set(Some(Ok(optimistic)));
            let cache = cache.clone();
            let client = client.clone();
            let detail = detail.clone();
            let detail_key = detail_key.clone();
            let slug = slug.clone();
            spawn_local(async move {
                let outcome = cache
                    .mutate(
                        &detail_key,
                        optimistic_value,
                        || async move {
                            client.set_favorite(&slug, target).await.map(|()| Value::Null)
                        },
                        overlay,
                    )
                    .await;
                match outcome {
                    Ok(reconciled) => {
                        cache.invalidate_where(|key| matches!(key, QueryKey::Favorites { .. }));
                        if let Ok(updated) = serde_json::from_value::<MangaDetail>(reconciled) {
                            detail.set(Some(Ok(updated)));
                        }
                    }
                    Err(err) => {
                        detail.set(Some(Ok(previous)));
                        push_toast(ToastKind::Error, format!("Favorite failed: {err}"));
                    }
                }
            });
        })
    };

    // Admin-only moderation; the button renders only for admin sessions.
    let on_delete_comment = {
        let cache = ctx.cache.clone();
        let client = api.client.clone();
        let comments_reload = comments_reload.clone();
        let slug = props.slug.clone();
        Callback::from(move |id: uuid::Uuid| {
            let cache = cache.clone();
            let client = client.clone();
            let comments_reload = comments_reload.clone();
            let slug = slug.clone();
            spawn_local(async move {
                match client.delete_comment(id).await {
                    Ok(()) => {
                        cache.invalidate_where(|key| {
                            matches!(key, QueryKey::Comments { manga, .. } if *manga == slug)
                        });
                        comments_reload.set(*comments_reload + 1);
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Delete failed: {err}")),
                }
            });
        })
    };

    let on_post_comment = {
        let cache = ctx.cache.clone();
        let client = api.client.clone();
        let comments_reload = comments_reload.clone();
        let slug = props.slug.clone();
        Callback::from(move |body: String| {
            let cache = cache.clone();
            let client = client.clone();
            let comments_reload = comments_reload.clone();
            let slug = slug.clone();
            spawn_local(async move {
                match client.post_comment(&slug, &CommentCreate { body }).await {
                    Ok(_) => {
                        cache.invalidate_where(|key| {
                            matches!(key, QueryKey::Comments { manga, .. } if *manga == slug)
                        });
                        comments_reload.set(*comments_reload + 1);
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Comment failed: {err}")),
                }
            });
        })
    };

    html! {
        <article class="manga-detail">
            {match &*detail {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(data)) => render_detail(
                    data,
                    view.authenticated,
                    resume.as_ref().as_ref().map(|entry| Route::Reader {
                        slug: props.slug.clone(),
                        chapter: entry.chapter_slug.clone(),
                    }),
                    &on_rate,
                    &on_toggle_favorite,
                ),
            }}
            <section class="chapters">
                <h2>{"Chapters"}</h2>
                {match &*chapters {
                    None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                    Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                    Some(Ok(list)) => render_chapters(&props.slug, list),
                }}
            </section>
            <section class="comments">
                <h2>{"Comments"}</h2>
                if view.authenticated {
                    <CommentForm on_submit={on_post_comment} />
                }
                {match &*comments {
                    None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                    Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                    Some(Ok(page)) => render_comments(
                        page,
                        &comments_page,
                        view.admin.then_some(&on_delete_comment),
                    ),
                }}
            </section>
        </article>
    }
}

fn render_detail(
    data: &MangaDetail,
    authenticated: bool,
    resume: Option<Route>,
    on_rate: &Callback<u8>,
    on_toggle_favorite: &Callback<MouseEvent>,
) -> Html {
    html! {
        <header class="manga-head">
            if let Some(cover) = &data.summary.cover_url {
                <img class="cover" src={cover.clone()} alt={data.summary.title.clone()} />
            }
            <div class="meta">
                <h1>{&data.summary.title}</h1>
                <p class="byline">
                    {data.authors.iter().map(|author| author.name.clone()).collect::<Vec<_>>().join(", ")}
                </p>
                <p class="rating">
                    {format!("★ {:.1} ({} ratings)", data.summary.rating_avg, data.summary.rating_count)}
                </p>
                <p class="description">{&data.description}</p>
                <ul class="categories">
                    {for data.categories.iter().map(|category| html! {
                        <li key={category.slug.clone()}>{&category.name}</li>
                    })}
                </ul>
                if authenticated {
                    <div class="actions">
                        <RatingControl current={data.user_rating} on_rate={on_rate.clone()} />
                        <button class="favorite" onclick={on_toggle_favorite.clone()}>
                            {if data.is_favorite { "♥ In library" } else { "♡ Add to library" }}
                        </button>
                        if let Some(route) = resume {
                            <Link<Route> classes="resume" to={route}>{"Continue reading"}</Link<Route>>
                        }
                    </div>
                }
            </div>
        </header>
    }
}

fn render_chapters(slug: &str, list: &[ChapterSummary]) -> Html {
    if list.is_empty() {
        return html! { <p class="muted">{"No chapters published yet."}</p> };
    }
    html! {
        <ol class="chapter-list">
            {for list.iter().map(|chapter| {
                let label = chapter.title.as_ref().map_or_else(
                    || format!("Chapter {}", chapter.number),
                    |title| format!("Chapter {}: {title}", chapter.number),
                );
                html! {
                    <li key={chapter.slug.clone()}>
                        <Link<Route> to={Route::Reader {
                            slug: slug.to_string(),
                            chapter: chapter.slug.clone(),
                        }}>
                            {label}
                        </Link<Route>>
                    </li>
                }
            })}
        </ol>
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_comments(
    page: &Page<CommentEntry>,
    page_state: &UseStateHandle<u32>,
    on_delete: Option<&Callback<uuid::Uuid>>,
) -> Html {
    let prev = {
        let page_state = page_state.clone();
        Callback::from(move |_| page_state.set(**page_state - 1))
    };
    let next = {
        let page_state = page_state.clone();
        Callback::from(move |_| page_state.set(**page_state + 1))
    };
    html! {
        <>
            if page.data.is_empty() {
                <p class="muted">{"No comments yet."}</p>
            } else {
                <ul class="comment-list">
                    {for page.data.iter().map(|comment| {
                        let moderate = on_delete.map(|on_delete| {
                            let on_delete = on_delete.clone();
                            let id = comment.id;
                            Callback::from(move |_| on_delete.emit(id))
                        });
                        html! {
                            <li key={comment.id.to_string()}>
                                <span class="author">{&comment.author}</span>
                                <RelativeTime at_ms={comment.created_at.timestamp_millis() as f64} />
                                <p>{&comment.body}</p>
                                if let Some(moderate) = moderate {
                                    <button class="ghost danger" onclick={moderate}>{"Delete"}</button>
                                }
                            </li>
                        }
                    })}
                </ul>
            }
            if page.last_page > 1 {
                <nav class="pager">
                    <button disabled={page.page <= 1} onclick={prev}>{"Previous"}</button>
                    <button disabled={!page.has_more()} onclick={next}>{"Next"}</button>
                </nav>
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct RatingControlProps {
    current: Option<u8>,
    on_rate: Callback<u8>,
}

#[function_component(RatingControl)]
fn rating_control(props: &RatingControlProps) -> Html {
    html! {
        <div class="rating-control" role="radiogroup" aria-label="Rate this series">
            {for (1..=10u8).map(|score| {
                let on_rate = props.on_rate.clone();
                let selected = props.current.is_some_and(|current| current >= score);
                html! {
                    <button
                        class={classes!("star", selected.then_some("selected"))}
                        role="radio"
                        aria-checked={(props.current == Some(score)).to_string()}
                        onclick={Callback::from(move |_| on_rate.emit(score))}
                    >
                        {if selected { "★" } else { "☆" }}
                    </button>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct CommentFormProps {
    on_submit: Callback<String>,
}

#[function_component(CommentForm)]
fn comment_form(props: &CommentFormProps) -> Html {
    let body = use_state(String::new);
    let on_input = {
        let body = body.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            body.set(value);
        })
    };
    let on_submit = {
        let body = body.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let text = body.trim().to_string();
            if text.is_empty() {
                return;
            }
            submit.emit(text);
            body.set(String::new());
        })
    };
    html! {
        <form class="comment-form" onsubmit={on_submit}>
            <input
                type="text"
                placeholder="Add a comment…"
                value={(*body).clone()}
                oninput={on_input}
            />
            <button type="submit">{"Post"}</button>
        </form>
    }
}
