//! Admin back-office: platform stats, user moderation, series curation.
//!
//! Admin writes invalidate the affected listing families so the public
//! surfaces re-fetch from the source of truth on their next read.

use crate::app::api::{ApiCtx, CacheCtx};
use crate::components::toast::push_toast;
use crate::core::query::QueryKey;
use crate::core::remote::ApiError;
use crate::core::store::ToastKind;
use hondana_api_models::{
    AdminUserEntry, AuthorEntry, CategoryEntry, ChapterSummary, ChapterUpsert, MangaStatus,
    MangaSummary, MangaUpsert, Page, StatsSnapshot, TagEntry,
};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[function_component(AdminDashboardPage)]
pub(crate) fn admin_dashboard_page() -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let stats = use_state(|| None::<Result<StatsSnapshot, ApiError>>);
    let users = use_state(|| None::<Result<Vec<AdminUserEntry>, ApiError>>);
    let users_reload = use_state(|| 0u32);

    {
        let stats = stats.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    stats.set(Some(cache.fetch_as::<StatsSnapshot>(&QueryKey::Stats).await));
                });
                || ()
            },
            (),
        );
    }
    {
        let users = users.clone();
        let client = api.client.clone();
        use_effect_with_deps(
            move |_reload: &u32| {
                users.set(None);
                spawn_local(async move {
                    users.set(Some(client.list_users(1).await));
                });
                || ()
            },
            *users_reload,
        );
    }

    let on_toggle_ban = {
        let client = api.client.clone();
        let users_reload = users_reload.clone();
        Callback::from(move |(id, banned): (Uuid, bool)| {
            let client = client.clone();
            let users_reload = users_reload.clone();
            spawn_local(async move {
                match client.set_user_banned(id, banned).await {
                    Ok(()) => users_reload.set(*users_reload + 1),
                    Err(err) => push_toast(ToastKind::Error, format!("Moderation failed: {err}")),
                }
            });
        })
    };

    html! {
        <section class="admin-dashboard">
            <h1>{"Dashboard"}</h1>
            {match &*stats {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(snapshot)) => render_stats(snapshot),
            }}
            <h2>{"Users"}</h2>
            {match &*users {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(list)) => render_users(list, &on_toggle_ban),
            }}
        </section>
    }
}

fn render_stats(snapshot: &StatsSnapshot) -> Html {
    let cells = [
        ("Series", snapshot.total_manga),
        ("Chapters", snapshot.total_chapters),
        ("Users", snapshot.total_users),
        ("Comments", snapshot.total_comments),
        ("Views today", snapshot.views_today),
    ];
    html! {
        <ul class="stat-grid">
            {for cells.iter().map(|(label, value)| html! {
                <li key={*label}>
                    <span class="value">{value}</span>
                    <span class="label">{*label}</span>
                </li>
            })}
        </ul>
    }
}

fn render_users(list: &[AdminUserEntry], on_toggle_ban: &Callback<(Uuid, bool)>) -> Html {
    html! {
        <table class="user-table">
            <thead>
                <tr>
                    <th>{"Username"}</th>
                    <th>{"E-mail"}</th>
                    <th>{"Role"}</th>
                    <th>{"Status"}</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {for list.iter().map(|user| {
                    let id = user.id;
                    let target = !user.banned;
                    let on_click = {
                        let on_toggle_ban = on_toggle_ban.clone();
                        Callback::from(move |_| on_toggle_ban.emit((id, target)))
                    };
                    html! {
                        <tr key={user.id.to_string()}>
                            <td>{&user.username}</td>
                            <td>{&user.email}</td>
                            <td>{format!("{:?}", user.role)}</td>
                            <td>{if user.banned { "Banned" } else { "Active" }}</td>
                            <td>
                                <button class="ghost" onclick={on_click}>
                                    {if user.banned { "Unban" } else { "Ban" }}
                                </button>
                            </td>
                        </tr>
                    }
                })}
            </tbody>
        </table>
    }
}

#[function_component(AdminMangaPage)]
pub(crate) fn admin_manga_page() -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let listing = use_state(|| None::<Result<Page<MangaSummary>, ApiError>>);
    let page = use_state(|| 1u32);
    let reload = use_state(|| 0u32);
    let selected = use_state(|| None::<String>);

    {
        let listing = listing.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |(page, _reload): &(u32, u32)| {
                listing.set(None);
                let key = QueryKey::MangaList {
                    filters: String::new(),
                    page: *page,
                };
                spawn_local(async move {
                    listing.set(Some(cache.fetch_as::<Page<MangaSummary>>(&key).await));
                });
                || ()
            },
            (*page, *reload),
        );
    }

    let refetch = {
        let cache = ctx.cache.clone();
        let reload = reload.clone();
        Callback::from(move |()| {
            cache.invalidate_where(|key| {
                matches!(
                    key,
                    QueryKey::MangaList { .. } | QueryKey::MangaDetail { .. }
                )
            });
            reload.set(*reload + 1);
        })
    };

    let on_delete = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        Callback::from(move |slug: String| {
            let client = client.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                match client.delete_manga(&slug).await {
                    Ok(()) => {
                        push_toast(ToastKind::Success, format!("Deleted {slug}"));
                        refetch.emit(());
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Delete failed: {err}")),
                }
            });
        })
    };

    let on_upsert = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        Callback::from(move |upsert: MangaUpsert| {
            let client = client.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                match client.upsert_manga(&upsert).await {
                    Ok(()) => {
                        push_toast(ToastKind::Success, format!("Saved {}", upsert.slug));
                        refetch.emit(());
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Save failed: {err}")),
                }
            });
        })
    };

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
        <section class="admin-manga">
            <h1>{"Series curation"}</h1>
            <MangaUpsertForm on_submit={on_upsert} />
            {match &*listing {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(data)) => html! {
                    <>
                        <table class="manga-table">
                            <thead>
                                <tr>
                                    <th>{"Title"}</th>
                                    <th>{"Status"}</th>
                                    <th>{"Chapters"}</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {for data.data.iter().map(|manga| {
                                    let slug = manga.slug.clone();
                                    let on_delete = on_delete.clone();
                                    let on_click = Callback::from(move |_| on_delete.emit(slug.clone()));
                                    let on_chapters = {
                                        let selected = selected.clone();
                                        let slug = manga.slug.clone();
                                        Callback::from(move |_| selected.set(Some(slug.clone())))
                                    };
                                    html! {
                                        <tr key={manga.slug.clone()}>
                                            <td>{&manga.title}</td>
                                            <td>{format!("{:?}", manga.status)}</td>
                                            <td>{manga.chapter_count}</td>
                                            <td>
                                                <button class="ghost" onclick={on_chapters}>{"Chapters"}</button>
                                                <button class="ghost danger" onclick={on_click}>{"Delete"}</button>
                                            </td>
                                        </tr>
                                    }
                                })}
                            </tbody>
                        </table>
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
            if let Some(manga) = (*selected).clone() {
                <ChapterPanel manga={manga} />
            }
            <TaxonomyPanel />
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct MangaUpsertFormProps {
    on_submit: Callback<MangaUpsert>,
}

#[function_component(MangaUpsertForm)]
fn manga_upsert_form(props: &MangaUpsertFormProps) -> Html {
    let title = use_state(String::new);
    let slug = use_state(String::new);
    let description = use_state(String::new);
    let status = use_state(|| MangaStatus::Ongoing);

    let bind_input = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            state.set(value);
        })
    };
    let on_title = bind_input(&title);
    let on_slug = bind_input(&slug);
    let on_description = bind_input(&description);
    let on_status = {
        let status = status.clone();
        Callback::from(move |event: Event| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value())
                .unwrap_or_default();
            status.set(match value.as_str() {
                "completed" => MangaStatus::Completed,
                "hiatus" => MangaStatus::Hiatus,
                "cancelled" => MangaStatus::Cancelled,
                _ => MangaStatus::Ongoing,
            });
        })
    };

    let on_submit = {
        let title = title.clone();
        let slug = slug.clone();
        let description = description.clone();
        let status = status.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if title.trim().is_empty() || slug.trim().is_empty() {
                return;
            }
            submit.emit(MangaUpsert {
                title: title.trim().to_string(),
                slug: slug.trim().to_string(),
                description: description.trim().to_string(),
                status: *status,
                author_ids: Vec::new(),
                category_ids: Vec::new(),
                tag_names: Vec::new(),
                cover_url: None,
            });
            title.set(String::new());
            slug.set(String::new());
            description.set(String::new());
        })
    };

    html! {
        <form class="upsert-form" onsubmit={on_submit}>
            <input type="text" placeholder="Title" value={(*title).clone()} oninput={on_title} />
            <input type="text" placeholder="slug" value={(*slug).clone()} oninput={on_slug} />
            <input type="text" placeholder="Description" value={(*description).clone()} oninput={on_description} />
            <select onchange={on_status}>
                <option value="ongoing">{"Ongoing"}</option>
                <option value="completed">{"Completed"}</option>
                <option value="hiatus">{"Hiatus"}</option>
                <option value="cancelled">{"Cancelled"}</option>
            </select>
            <button type="submit">{"Save series"}</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct ChapterPanelProps {
    manga: String,
}

/// Chapter curation for one series: list, upsert, delete.
#[function_component(ChapterPanel)]
fn chapter_panel(props: &ChapterPanelProps) -> Html {
    let ctx = use_context::<CacheCtx>().expect("CacheCtx not provided");
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let chapters = use_state(|| None::<Result<Vec<ChapterSummary>, ApiError>>);
    let reload = use_state(|| 0u32);

    {
        let chapters = chapters.clone();
        let cache = ctx.cache.clone();
        use_effect_with_deps(
            move |(manga, _reload): &(String, u32)| {
                chapters.set(None);
                let key = QueryKey::ChapterList {
                    manga: manga.clone(),
                };
                spawn_local(async move {
                    chapters.set(Some(cache.fetch_as::<Vec<ChapterSummary>>(&key).await));
                });
                || ()
            },
            (props.manga.clone(), *reload),
        );
    }

    let refetch = {
        let cache = ctx.cache.clone();
        let reload = reload.clone();
        let manga = props.manga.clone();
        Callback::from(move |()| {
            cache.invalidate(&QueryKey::ChapterList {
                manga: manga.clone(),
            });
            let series = manga.clone();
            cache.invalidate_where(move |key| {
                matches!(key, QueryKey::Chapter { manga, .. } if *manga == series)
            });
            reload.set(*reload + 1);
        })
    };

    let on_save = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        let manga = props.manga.clone();
        Callback::from(move |upsert: ChapterUpsert| {
            let client = client.clone();
            let refetch = refetch.clone();
            let manga = manga.clone();
            spawn_local(async move {
                match client.upsert_chapter(&manga, &upsert).await {
                    Ok(()) => {
                        push_toast(ToastKind::Success, format!("Saved chapter {}", upsert.slug));
                        refetch.emit(());
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Save failed: {err}")),
                }
            });
        })
    };

    let on_delete = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        let manga = props.manga.clone();
        Callback::from(move |chapter: String| {
            let client = client.clone();
            let refetch = refetch.clone();
            let manga = manga.clone();
            spawn_local(async move {
                match client.delete_chapter(&manga, &chapter).await {
                    Ok(()) => {
                        push_toast(ToastKind::Success, format!("Deleted {chapter}"));
                        refetch.emit(());
                    }
                    Err(err) => push_toast(ToastKind::Error, format!("Delete failed: {err}")),
                }
            });
        })
    };

    html! {
        <section class="chapter-panel">
            <h2>{format!("Chapters: {}", props.manga)}</h2>
            <ChapterUpsertForm on_submit={on_save} />
            {match &*chapters {
                None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
                Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
                Some(Ok(list)) => html! {
                    <ol class="chapter-admin-list">
                        {for list.iter().map(|chapter| {
                            let slug = chapter.slug.clone();
                            let on_delete = on_delete.clone();
                            let on_click = Callback::from(move |_| on_delete.emit(slug.clone()));
                            html! {
                                <li key={chapter.slug.clone()}>
                                    <span>{format!("{} ({})", chapter.slug, chapter.number)}</span>
                                    <button class="ghost danger" onclick={on_click}>{"Delete"}</button>
                                </li>
                            }
                        })}
                    </ol>
                },
            }}
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct ChapterUpsertFormProps {
    on_submit: Callback<ChapterUpsert>,
}

#[function_component(ChapterUpsertForm)]
fn chapter_upsert_form(props: &ChapterUpsertFormProps) -> Html {
    let slug = use_state(String::new);
    let number = use_state(String::new);
    let title = use_state(String::new);
    let pages = use_state(String::new);

    let bind_input = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            state.set(value);
        })
    };
    let on_slug = bind_input(&slug);
    let on_number = bind_input(&number);
    let on_title = bind_input(&title);
    let on_pages = {
        let pages = pages.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlTextAreaElement>().ok())
                .map(|area| area.value())
                .unwrap_or_default();
            pages.set(value);
        })
    };

    let on_submit = {
        let slug = slug.clone();
        let number = number.clone();
        let title = title.clone();
        let pages = pages.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Ok(ordinal) = number.trim().parse::<f32>() else {
                return;
            };
            if slug.trim().is_empty() {
                return;
            }
            let page_urls: Vec<String> = pages
                .split_whitespace()
                .map(ToString::to_string)
                .collect();
            let chapter_title = {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            };
            submit.emit(ChapterUpsert {
                slug: slug.trim().to_string(),
                number: ordinal,
                title: chapter_title,
                pages: page_urls,
            });
            slug.set(String::new());
            number.set(String::new());
            title.set(String::new());
            pages.set(String::new());
        })
    };

    html! {
        <form class="upsert-form" onsubmit={on_submit}>
            <input type="text" placeholder="chapter-slug" value={(*slug).clone()} oninput={on_slug} />
            <input type="text" placeholder="Number" value={(*number).clone()} oninput={on_number} />
            <input type="text" placeholder="Title (optional)" value={(*title).clone()} oninput={on_title} />
            <textarea
                placeholder="Page URLs, one per line"
                value={(*pages).clone()}
                oninput={on_pages}
            />
            <button type="submit">{"Save chapter"}</button>
        </form>
    }
}

/// Categories, tags, and authors shared by the curation forms.
#[function_component(TaxonomyPanel)]
fn taxonomy_panel() -> Html {
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let categories = use_state(|| None::<Result<Vec<CategoryEntry>, ApiError>>);
    let tags = use_state(|| None::<Result<Vec<TagEntry>, ApiError>>);
    let authors = use_state(|| None::<Result<Vec<AuthorEntry>, ApiError>>);
    let reload = use_state(|| 0u32);

    {
        let categories = categories.clone();
        let tags = tags.clone();
        let authors = authors.clone();
        let client = api.client.clone();
        use_effect_with_deps(
            move |_reload: &u32| {
                categories.set(None);
                tags.set(None);
                authors.set(None);
                spawn_local({
                    let client = client.clone();
                    let categories = categories.clone();
                    async move {
                        categories.set(Some(client.list_categories().await));
                    }
                });
                spawn_local({
                    let client = client.clone();
                    let tags = tags.clone();
                    async move {
                        tags.set(Some(client.list_tags().await));
                    }
                });
                spawn_local(async move {
                    authors.set(Some(client.list_authors().await));
                });
                || ()
            },
            *reload,
        );
    }

    let refetch = {
        let reload = reload.clone();
        Callback::from(move |()| reload.set(*reload + 1))
    };

    let on_add_category = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        Callback::from(move |(name, slug): (String, String)| {
            let client = client.clone();
            let refetch = refetch.clone();
            let entry = CategoryEntry {
                id: Uuid::new_v4(),
                name,
                slug,
            };
            spawn_local(async move {
                match client.upsert_category(&entry).await {
                    Ok(()) => refetch.emit(()),
                    Err(err) => push_toast(ToastKind::Error, format!("Category failed: {err}")),
                }
            });
        })
    };
    let on_delete_category = delete_taxon(&api, &refetch, TaxonDelete::Category);
    let on_delete_tag = delete_taxon(&api, &refetch, TaxonDelete::Tag);
    let on_add_author = {
        let client = api.client.clone();
        let refetch = refetch.clone();
        Callback::from(move |name: String| {
            let client = client.clone();
            let refetch = refetch.clone();
            let entry = AuthorEntry {
                id: Uuid::new_v4(),
                name,
            };
            spawn_local(async move {
                match client.upsert_author(&entry).await {
                    Ok(()) => refetch.emit(()),
                    Err(err) => push_toast(ToastKind::Error, format!("Author failed: {err}")),
                }
            });
        })
    };
    let on_delete_author = delete_taxon(&api, &refetch, TaxonDelete::Author);

    html! {
        <section class="taxonomy-panel">
            <h2>{"Catalogue taxonomy"}</h2>
            <div class="taxonomy-columns">
                <div class="taxonomy-column">
                    <h3>{"Categories"}</h3>
                    <NamedSlugForm on_submit={on_add_category} />
                    {render_taxon_list(&categories, |entry: &CategoryEntry| (entry.id, entry.name.clone()), &on_delete_category)}
                </div>
                <div class="taxonomy-column">
                    <h3>{"Tags"}</h3>
                    <p class="muted">{"Tags are created through series curation."}</p>
                    {render_taxon_list(&tags, |entry: &TagEntry| (entry.id, entry.name.clone()), &on_delete_tag)}
                </div>
                <div class="taxonomy-column">
                    <h3>{"Authors"}</h3>
                    <NameForm on_submit={on_add_author} />
                    {render_taxon_list(&authors, |entry: &AuthorEntry| (entry.id, entry.name.clone()), &on_delete_author)}
                </div>
            </div>
        </section>
    }
}

#[derive(Clone, Copy)]
enum TaxonDelete {
    Category,
    Tag,
    Author,
}

fn delete_taxon(api: &ApiCtx, refetch: &Callback<()>, which: TaxonDelete) -> Callback<Uuid> {
    let client = api.client.clone();
    let refetch = refetch.clone();
    Callback::from(move |id: Uuid| {
        let client = client.clone();
        let refetch = refetch.clone();
        spawn_local(async move {
            let result = match which {
                TaxonDelete::Category => client.delete_category(id).await,
                TaxonDelete::Tag => client.delete_tag(id).await,
                TaxonDelete::Author => client.delete_author(id).await,
            };
            match result {
                Ok(()) => refetch.emit(()),
                Err(err) => push_toast(ToastKind::Error, format!("Delete failed: {err}")),
            }
        });
    })
}

fn render_taxon_list<T>(
    result: &Option<Result<Vec<T>, ApiError>>,
    describe: impl Fn(&T) -> (Uuid, String),
    on_delete: &Callback<Uuid>,
) -> Html {
    match result {
        None => html! { <p class="muted" aria-busy="true">{"Loading…"}</p> },
        Some(Err(err)) => html! { <p class="form-error" role="alert">{err.to_string()}</p> },
        Some(Ok(list)) => html! {
            <ul class="taxon-list">
                {for list.iter().map(|entry| {
                    let (id, name) = describe(entry);
                    let on_delete = on_delete.clone();
                    let on_click = Callback::from(move |_| on_delete.emit(id));
                    html! {
                        <li key={id.to_string()}>
                            <span>{name}</span>
                            <button class="ghost danger" onclick={on_click}>{"Delete"}</button>
                        </li>
                    }
                })}
            </ul>
        },
    }
}

#[derive(Properties, PartialEq)]
struct NamedSlugFormProps {
    on_submit: Callback<(String, String)>,
}

#[function_component(NamedSlugForm)]
fn named_slug_form(props: &NamedSlugFormProps) -> Html {
    let name = use_state(String::new);
    let slug = use_state(String::new);

    let bind_input = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            state.set(value);
        })
    };
    let on_name = bind_input(&name);
    let on_slug = bind_input(&slug);

    let on_submit = {
        let name = name.clone();
        let slug = slug.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if name.trim().is_empty() || slug.trim().is_empty() {
                return;
            }
            submit.emit((name.trim().to_string(), slug.trim().to_string()));
            name.set(String::new());
            slug.set(String::new());
        })
    };

    html! {
        <form class="inline-form" onsubmit={on_submit}>
            <input type="text" placeholder="Name" value={(*name).clone()} oninput={on_name} />
            <input type="text" placeholder="slug" value={(*slug).clone()} oninput={on_slug} />
            <button type="submit">{"Add"}</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct NameFormProps {
    on_submit: Callback<String>,
}

#[function_component(NameForm)]
fn name_form(props: &NameFormProps) -> Html {
    let name = use_state(String::new);
    let on_name = {
        let name = name.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|field| field.value())
                .unwrap_or_default();
            name.set(value);
        })
    };
    let on_submit = {
        let name = name.clone();
        let submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if name.trim().is_empty() {
                return;
            }
            submit.emit(name.trim().to_string());
            name.set(String::new());
        })
    };
    html! {
        <form class="inline-form" onsubmit={on_submit}>
            <input type="text" placeholder="Name" value={(*name).clone()} oninput={on_name} />
            <button type="submit">{"Add"}</button>
        </form>
    }
}
