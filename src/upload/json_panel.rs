use leptos::logging::log;
use leptos::{prelude::*, task::spawn_local};
use serde_json::Value;

use super::validate::{
    is_valid_json_array, parse_records, server_failure_message, INVALID_JSON_MESSAGE,
    JSON_UPLOAD_ERROR_MESSAGE,
};
use super::{SessionSignal, UploadOutcome};
use crate::state::GlobalState;

const PLACEHOLDER: &str = r#"[{"column1": "value1", "column2": "value2"}, ...]"#;
const EXAMPLE: &str = r#"[
  {"name": "Product A", "price": 10.99, "category": "Electronics"},
  {"name": "Product B", "price": 24.99, "category": "Home"}
]"#;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonPanelState {
    text: String,
    /// `None` while the buffer is blank.
    valid: Option<bool>,
    uploading: bool,
    error: Option<String>,
}

impl JsonPanelState {
    pub fn set_text(&mut self, text: String) {
        if text.trim().is_empty() {
            self.valid = None;
            self.error = None;
        } else {
            let valid = is_valid_json_array(&text);
            self.valid = Some(valid);
            self.error = (!valid).then(|| INVALID_JSON_MESSAGE.to_string());
        }
        self.text = text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn validity(&self) -> Option<bool> {
        self.valid
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn can_submit(&self) -> bool {
        self.valid == Some(true) && !self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_upload(&mut self) -> Option<Vec<Value>> {
        if !self.can_submit() {
            return None;
        }
        let records = parse_records(&self.text).ok()?;
        self.uploading = true;
        self.error = None;
        Some(records)
    }

    pub fn upload_failed(&mut self, message: impl Into<String>) {
        self.uploading = false;
        self.error = Some(message.into());
    }

    pub fn upload_succeeded(&mut self) {
        self.uploading = false;
    }
}

#[component]
pub fn JsonUploadPanel(
    session: SessionSignal,
    #[prop(into)] on_success: Callback<UploadOutcome>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState context not found");

    let on_upload = move |_: web_sys::MouseEvent| {
        let Some(records) = session.try_update(|s| s.begin_json_upload()).flatten() else {
            return;
        };
        let gateway = state.gateway.clone();
        spawn_local(async move {
            match gateway.upload_json(&records).await {
                Ok(response) if response.is_success() => {
                    log!(
                        "[INFO] [JsonUploadPanel] Upload accepted: {} ({:?} rows, {:?} columns)",
                        response.message,
                        response.rows,
                        response.columns
                    );
                    session.try_update(|s| s.json.upload_succeeded());
                    on_success.run(UploadOutcome::Json {
                        rows: response.rows,
                        columns: response.columns,
                    });
                }
                Ok(response) => {
                    log!("[WARN] [JsonUploadPanel] Upload rejected: {:?}", response);
                    let message = server_failure_message(&response.message);
                    session.try_update(|s| s.json.upload_failed(message));
                }
                Err(err) => {
                    log!("[ERROR] [JsonUploadPanel] Error uploading JSON: {:?}", err);
                    session.try_update(|s| s.json.upload_failed(JSON_UPLOAD_ERROR_MESSAGE));
                }
            }
        });
    };

    let validity = move || match session.with(|s| s.json.validity()) {
        Some(true) => "valid",
        Some(false) => "invalid",
        None => "unknown",
    };

    view! {
        <json-upload-panel>
            <label for="json-data">"Paste your JSON array data:"</label>
            <div class="json-input">
                <textarea
                    id="json-data"
                    data-validity=validity
                    placeholder=PLACEHOLDER
                    prop:value=move || session.with(|s| s.json.text().to_string())
                    on:input:target=move |ev| {
                        let text = ev.target().value();
                        session.update(|s| s.json.set_text(text));
                    }
                />
                <Show when=move || session.with(|s| s.json.validity() == Some(true))>
                    <span class="valid-mark">"✓"</span>
                </Show>
            </div>
            <p class="hint">"Data must be a JSON array of objects with the same structure"</p>
            <div class="example">
                <div class="example-title">"Example format:"</div>
                <pre>{EXAMPLE}</pre>
            </div>
            {move || {
                session
                    .with(|s| s.json.error().map(str::to_string))
                    .map(|error| view! { <error-box>{error}</error-box> })
            }}
            <div class="panel-actions">
                <button
                    data-role="primary"
                    on:click=on_upload
                    disabled=move || !session.with(|s| s.can_submit_json())
                >
                    {move || {
                        if session.with(|s| s.json.is_uploading()) {
                            view! {
                                <span class="spinner"></span>
                                "Uploading..."
                            }
                                .into_any()
                        } else {
                            view! { "Upload JSON" }.into_any()
                        }
                    }}
                </button>
            </div>
        </json-upload-panel>
    }
}
