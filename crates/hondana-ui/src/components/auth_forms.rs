//! Sign-in and registration forms.
//!
//! Neither form navigates on success: the guest-only guard wrapping both
//! pages performs the post-auth redirect, honoring any `redirect` query.

use crate::app::api::ApiCtx;
use crate::app::routes::Route;
use crate::core::auth::AuthError;
use crate::services::session;
use hondana_api_models::{LoginRequest, RegisterRequest};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

fn input_value(event: &InputEvent) -> String {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

#[function_component(LoginForm)]
pub(crate) fn login_form() -> Html {
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<AuthError>);
    let busy = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| email.set(input_value(&event)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| password.set(input_value(&event)))
    };
    let on_submit = {
        let api = api.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);
            error.set(None);
            let client = api.client.clone();
            let request = LoginRequest {
                email: (*email).clone(),
                password: (*password).clone(),
            };
            let error = error.clone();
            let busy = busy.clone();
            spawn_local(async move {
                if let Err(err) = session::login(&client, request).await {
                    error.set(Some(err));
                }
                busy.set(false);
            });
        })
    };

    html! {
        <form class="auth-form" onsubmit={on_submit}>
            <h1>{"Sign in"}</h1>
            if let Some(err) = &*error {
                <p class="form-error" role="alert">{err.to_string()}</p>
            }
            <label>
                {"E-mail"}
                <input type="email" required=true value={(*email).clone()} oninput={on_email} />
            </label>
            <label>
                {"Password"}
                <input type="password" required=true value={(*password).clone()} oninput={on_password} />
            </label>
            <button type="submit" disabled={*busy}>
                {if *busy { "Signing in…" } else { "Sign in" }}
            </button>
            <p class="muted">
                {"No account yet? "}
                <Link<Route> to={Route::Register}>{"Register"}</Link<Route>>
            </p>
        </form>
    }
}

#[function_component(RegisterForm)]
pub(crate) fn register_form() -> Html {
    let api = use_context::<ApiCtx>().expect("ApiCtx not provided");
    let username = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<AuthError>);
    let busy = use_state(|| false);

    let on_username = {
        let username = username.clone();
        Callback::from(move |event: InputEvent| username.set(input_value(&event)))
    };
    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| email.set(input_value(&event)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| password.set(input_value(&event)))
    };
    let on_submit = {
        let api = api.clone();
        let username = username.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);
            error.set(None);
            let client = api.client.clone();
            let request = RegisterRequest {
                username: (*username).clone(),
                email: (*email).clone(),
                password: (*password).clone(),
            };
            let error = error.clone();
            let busy = busy.clone();
            spawn_local(async move {
                if let Err(err) = session::register(&client, request).await {
                    error.set(Some(err));
                }
                busy.set(false);
            });
        })
    };

    html! {
        <form class="auth-form" onsubmit={on_submit}>
            <h1>{"Create account"}</h1>
            if let Some(err) = &*error {
                <p class="form-error" role="alert">{err.to_string()}</p>
            }
            <label>
                {"Username"}
                <input type="text" required=true minlength="3" value={(*username).clone()} oninput={on_username} />
            </label>
            <label>
                {"E-mail"}
                <input type="email" required=true value={(*email).clone()} oninput={on_email} />
            </label>
            <label>
                {"Password"}
                <input type="password" required=true minlength="8" value={(*password).clone()} oninput={on_password} />
            </label>
            <button type="submit" disabled={*busy}>
                {if *busy { "Creating…" } else { "Create account" }}
            </button>
            <p class="muted">
                {"Already registered? "}
                <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
            </p>
        </form>
    }
}
