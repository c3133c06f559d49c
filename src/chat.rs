mod controls;
mod message;
pub mod transcript;
pub mod types;

use leptos::logging::log;
use leptos::{html, prelude::*, task::spawn_local};
use leptos_use::{use_media_query, use_timeout_fn, UseTimeoutFnReturn};

use crate::state::GlobalState;
use crate::upload::{UploadModal, UploadOutcome};
use crate::utils::now_ms;
use controls::ChatControls;
use message::ChatMessage;
use transcript::Transcript;

pub const ERROR_BANNER_MS: f64 = 3000.0;

#[component]
pub fn ChatInterface() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState context not found");

    let transcript = RwSignal::new(Transcript::new(now_ms()));
    let (input, set_input) = signal(String::new());
    let (modal_open, set_modal_open) = signal(false);
    // Touch keyboards have no Shift+Enter, so Enter must stay a newline there.
    let is_mobile = use_media_query("(pointer: coarse)");

    let ref_input: NodeRef<html::Textarea> = NodeRef::new();
    let ref_history: NodeRef<html::Div> = NodeRef::new();

    let error = Memo::new(move |_| transcript.with(|t| t.error().map(str::to_string)));
    let in_flight = Memo::new(move |_| transcript.with(|t| t.is_in_flight()));
    let has_uploaded_data = Memo::new(move |_| transcript.with(|t| t.has_uploaded_data()));
    let composer_disabled = Memo::new(move |_| transcript.with(|t| t.composer_disabled()));

    let error_serial = Memo::new(move |_| transcript.with(|t| t.error_serial()));
    let UseTimeoutFnReturn { start, stop, .. } = use_timeout_fn(
        move |serial: u64| {
            transcript.try_update(|t| t.expire_error(serial));
        },
        ERROR_BANNER_MS,
    );
    Effect::new(move |_| {
        let serial = error_serial.get();
        if error.with_untracked(Option::is_some) {
            stop();
            start(serial);
        }
    });

    // Keep the newest message in view.
    Effect::new(move |_| {
        transcript.with(|t| t.messages().len());
        in_flight.track();
        if let Some(history) = ref_history.get() {
            history.set_scroll_top(history.scroll_height());
        }
    });

    Effect::new(move |_| {
        if !composer_disabled.get() {
            if let Some(ref_input) = ref_input.get() {
                let _ = ref_input.focus();
            }
        }
    });

    let gateway = state.gateway.clone();
    let submit = Callback::new(move |_: ()| {
        let content = input.get_untracked();
        let question = match transcript.try_update(|t| t.begin_query(&content, now_ms())) {
            Some(Ok(question)) => question,
            Some(Err(rejection)) => {
                log!("[DEBUG] [ChatInterface] Submission rejected: {:?}", rejection);
                return;
            }
            None => return,
        };
        set_input.set(String::new());

        let gateway = gateway.clone();
        spawn_local(async move {
            let outcome = gateway.query(&question).await;
            match &outcome {
                Ok(response) if !response.is_success() => {
                    log!("[WARN] [ChatInterface] Query answered with status '{}'.", response.status);
                }
                Err(err) => log!("[ERROR] [ChatInterface] Error querying the chatbot: {:?}", err),
                Ok(_) => {}
            }
            transcript.try_update(|t| t.finish_query(&outcome, now_ms()));
        });
    });

    let on_upload_success = Callback::new(move |outcome: UploadOutcome| {
        log!("[INFO] [ChatInterface] Data uploaded: {:?}", outcome);
        transcript.update(|t| t.record_upload(now_ms()));
        set_modal_open.set(false);
    });

    view! {
        <chat-interface>
            <div class="chat-title">
                <h2>"Chat with your data"</h2>
                <button data-role="primary" on:click=move |_| set_modal_open.set(true)>
                    "Upload Data"
                </button>
            </div>
            <UploadModal
                open=modal_open
                on_close=Callback::new(move |_| set_modal_open.set(false))
                on_upload_success=on_upload_success
            />
            {move || {
                error
                    .get()
                    .map(|error| {
                        view! {
                            <error-box role="alert">
                                <div style="font-weight: bold">"error"</div>
                                {error}
                            </error-box>
                        }
                    })
            }}
            <div class="chat-history" node_ref=ref_history>
                <For
                    each=move || transcript.with(|t| t.messages().to_vec())
                    key=|message| message.id
                    children=|message| view! { <ChatMessage message=message /> }
                />
                <Show when=move || in_flight.get()>
                    <div class="thinking">
                        <span class="spinner"></span>
                        "Thinking..."
                    </div>
                </Show>
            </div>
            <ChatControls
                input=input
                set_input=set_input
                input_disabled=composer_disabled
                in_flight=in_flight
                ref_input=ref_input
                submit=submit
                is_mobile=is_mobile
            />
            <Show when=move || !has_uploaded_data.get()>
                <div class="upload-notice">
                    "Please upload a CSV file or JSON data to start chatting."
                </div>
            </Show>
        </chat-interface>
    }
}
