//! Session guards gating route content.
//!
//! # Design
//! - All three variants share one gate component; the outcome comes from
//!   the pure decision in `core::guard`, keyed off the session slice.
//! - While hydration is pending the gate renders a neutral loading state
//!   and arms a bounded fallback timer, so a reload never flashes a
//!   redirect for an already-signed-in user and never hangs either.
//! - Redirects run in an effect, never during render.

use crate::app::routes::Route;
use crate::core::auth::{Hydration, apply_hydrated};
use crate::core::guard::{
    GuardKind, GuardOutcome, HYDRATION_FALLBACK_MS, decide, redirect_param,
};
use crate::core::store::AppStore;
use gloo_timers::callback::Timeout;
use js_sys::Date;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub(crate) struct GuardProps {
    #[prop_or_default]
    pub children: Children,
}

/// Renders children only for admin sessions.
#[function_component(AdminOnly)]
pub(crate) fn admin_only(props: &GuardProps) -> Html {
    html! { <GuardGate kind={GuardKind::AdminOnly}>{props.children.clone()}</GuardGate> }
}

/// Renders children only for signed-out visitors.
#[function_component(GuestOnly)]
pub(crate) fn guest_only(props: &GuardProps) -> Html {
    html! { <GuardGate kind={GuardKind::GuestOnly}>{props.children.clone()}</GuardGate> }
}

/// Renders children only for authenticated sessions.
#[function_component(ProtectedRoute)]
pub(crate) fn protected_route(props: &GuardProps) -> Html {
    html! { <GuardGate kind={GuardKind::Authenticated}>{props.children.clone()}</GuardGate> }
}

#[derive(Properties, PartialEq)]
struct GateProps {
    pub kind: GuardKind,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(GuardGate)]
fn guard_gate(props: &GateProps) -> Html {
    let snapshot = use_selector(|store: &AppStore| {
        (store.session.hydration, store.session.view(Date::now()))
    });
    let (hydration, view) = *snapshot;
    let navigator = use_navigator().expect("guard rendered outside a router");
    let location = use_location().expect("guard rendered outside a router");

    let path = location.path().to_string();
    let query = location.query_str().trim_start_matches('?').to_string();
    let outcome = decide(
        props.kind,
        hydration,
        view,
        &path,
        redirect_param(&query).as_deref(),
    );

    // Bounded wait: if hydration never resolves, force it so the guard can
    // decide instead of spinning forever.
    {
        let pending = hydration == Hydration::Pending;
        use_effect_with_deps(
            move |pending| {
                let handle = pending.then(|| {
                    Timeout::new(HYDRATION_FALLBACK_MS, || {
                        Dispatch::<AppStore>::new().reduce_mut(|store| {
                            if store.session.hydration == Hydration::Pending {
                                apply_hydrated(&mut store.session, None);
                            }
                        });
                    })
                });
                move || drop(handle)
            },
            pending,
        );
    }

    {
        let outcome = outcome.clone();
        use_effect_with_deps(
            move |outcome| {
                match outcome {
                    GuardOutcome::Pending | GuardOutcome::Render => {}
                    GuardOutcome::RedirectLogin { return_to } => {
                        let _ = navigator
                            .push_with_query(&Route::Login, &[("redirect", return_to.as_str())]);
                    }
                    GuardOutcome::RedirectHome => navigator.push(&Route::Home),
                    GuardOutcome::RedirectTo(target) => {
                        navigator.push(&Route::recognize(target).unwrap_or(Route::Home));
                    }
                }
                || ()
            },
            outcome,
        );
    }

    match outcome {
        GuardOutcome::Render => html! { <>{props.children.clone()}</> },
        _ => html! {
            <div class="guard-loading" aria-busy="true">
                <span class="spinner" />
            </div>
        },
    }
}
