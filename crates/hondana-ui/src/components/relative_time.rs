//! Self-updating "n minutes ago" label.

use crate::core::timefmt::relative_label;
use gloo::timers::callback::Interval;
use js_sys::Date;
use yew::prelude::*;

const TICK_MS: u32 = 30_000;

#[derive(Properties, PartialEq)]
pub(crate) struct RelativeTimeProps {
    /// Epoch milliseconds of the moment being described.
    pub at_ms: f64,
}

#[function_component(RelativeTime)]
pub(crate) fn relative_time(props: &RelativeTimeProps) -> Html {
    let now_ms = use_state(Date::now);
    {
        let now_ms = now_ms.clone();
        use_effect_with_deps(
            move |_| {
                let handle = Interval::new(TICK_MS, move || now_ms.set(Date::now()));
                move || drop(handle)
            },
            (),
        );
    }
    html! { <time class="relative-time">{relative_label(props.at_ms, *now_ms)}</time> }
}
