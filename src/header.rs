use leptos::prelude::*;

use crate::state::GlobalState;

pub const APP_TITLE: &str = "Build Fast With AI";

#[component]
pub fn Header() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState context not found");
    let theme = state.theme.theme;
    let toggle = state.theme.toggle;
    let (menu_open, set_menu_open) = signal(false);

    let is_dark = move || theme.get().is_dark();

    view! {
        <header>
            <div class="brand">
                <span class="brand-icon">"🤖"</span>
                <h1>{APP_TITLE}</h1>
            </div>
            <button
                class="desktop-only"
                data-size="compact"
                aria-label=move || {
                    if is_dark() { "Switch to light mode" } else { "Switch to dark mode" }
                }
                on:click=move |_| toggle.run(())
            >
                {move || if is_dark() { "☀" } else { "☾" }}
            </button>
            <button
                class="mobile-only"
                data-size="compact"
                aria-label="Menu"
                on:click=move |_| set_menu_open.update(|open| *open = !*open)
            >
                {move || if menu_open.get() { "✕" } else { "☰" }}
            </button>
        </header>
        <Show when=move || menu_open.get()>
            <nav class="mobile-menu mobile-only">
                <button on:click=move |_| toggle.run(())>
                    {move || if is_dark() { "☀ Light Mode" } else { "☾ Dark Mode" }}
                </button>
            </nav>
        </Show>
    }
}
