mod chat;
mod config;
mod copy_button;
mod footer;
mod gateway;
mod header;
mod markdown;
mod state;
mod theme;
mod upload;
mod utils;

use leptos::logging::log;
use leptos::prelude::*;

use chat::ChatInterface;
use config::Config;
use footer::Footer;
use gateway::Gateway;
use header::Header;
use state::GlobalState;
use theme::use_theme;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let config = Config::from_env();
    log!(
        "[INFO] [App] Backend at {} (timeout: {:?} ms).",
        config.api_base_url,
        config.request_timeout_ms
    );

    provide_context(GlobalState {
        gateway: Gateway::new(config),
        theme: use_theme(),
    });

    view! {
        <Header />
        <main>
            <ChatInterface />
        </main>
        <Footer />
    }
}
