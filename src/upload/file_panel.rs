use leptos::logging::log;
use leptos::{html, prelude::*, task::spawn_local};

use super::validate::{
    has_csv_suffix, server_failure_message, CSV_ONLY_MESSAGE, FILE_UPLOAD_ERROR_MESSAGE,
};
use super::{SessionSignal, UploadOutcome};
use crate::state::GlobalState;

#[derive(Debug, Clone, PartialEq)]
enum Phase<F> {
    NoFile,
    Selected { file: F, name: String },
    Uploading { file: F, name: String },
}

/// Selection and upload lifecycle of the CSV panel. Generic over the file handle
/// so the transitions don't depend on a browser.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePanelState<F> {
    phase: Phase<F>,
    dragging: bool,
    error: Option<String>,
}

impl<F> Default for FilePanelState<F> {
    fn default() -> Self {
        FilePanelState {
            phase: Phase::NoFile,
            dragging: false,
            error: None,
        }
    }
}

impl<F: Clone> FilePanelState<F> {
    /// Returns whether the file was accepted. A rejected file keeps whatever was
    /// selected before.
    pub fn select(&mut self, file: F, name: String) -> bool {
        if self.is_uploading() {
            return false;
        }
        if !has_csv_suffix(&name) {
            self.error = Some(CSV_ONLY_MESSAGE.to_string());
            return false;
        }
        self.phase = Phase::Selected { file, name };
        self.error = None;
        true
    }

    pub fn begin_upload(&mut self) -> Option<F> {
        match std::mem::replace(&mut self.phase, Phase::NoFile) {
            Phase::Selected { file, name } => {
                let handle = file.clone();
                self.phase = Phase::Uploading { file, name };
                self.error = None;
                Some(handle)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    pub fn upload_failed(&mut self, message: impl Into<String>) {
        self.finish_upload();
        self.error = Some(message.into());
    }

    pub fn upload_succeeded(&mut self) {
        self.finish_upload();
    }

    fn finish_upload(&mut self) {
        if let Phase::Uploading { file, name } = std::mem::replace(&mut self.phase, Phase::NoFile)
        {
            self.phase = Phase::Selected { file, name };
        }
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }
}

impl<F> FilePanelState<F> {
    pub fn file_name(&self) -> Option<&str> {
        match &self.phase {
            Phase::NoFile => None,
            Phase::Selected { name, .. } | Phase::Uploading { name, .. } => Some(name),
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, Phase::Uploading { .. })
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.phase, Phase::Selected { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[component]
pub fn FileUploadPanel(
    session: SessionSignal,
    #[prop(into)] on_success: Callback<UploadOutcome>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState context not found");
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let accept_file = move |file: web_sys::File| {
        let name = file.name();
        let accepted = session
            .try_update(|s| s.file.select(file, name.clone()))
            .unwrap_or(false);
        if accepted {
            log!("[DEBUG] [FileUploadPanel] Selected '{}'.", name);
        } else {
            log!("[WARN] [FileUploadPanel] Rejected '{}'.", name);
        }
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        session.update(|s| s.file.drag_leave());
        if let Some(file) = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0))
        {
            accept_file(file);
        }
    };

    let on_browse = move |_: web_sys::MouseEvent| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_upload = move |_: web_sys::MouseEvent| {
        let Some(file) = session.try_update(|s| s.begin_file_upload()).flatten() else {
            return;
        };
        let gateway = state.gateway.clone();
        spawn_local(async move {
            match gateway.upload_file(&file).await {
                Ok(response) if response.is_success() => {
                    log!("[INFO] [FileUploadPanel] Upload accepted: {}", response.message);
                    session.try_update(|s| s.file.upload_succeeded());
                    on_success.run(UploadOutcome::File { name: file.name() });
                }
                Ok(response) => {
                    log!("[WARN] [FileUploadPanel] Upload rejected: {:?}", response);
                    let message = server_failure_message(&response.message);
                    session.try_update(|s| s.file.upload_failed(message));
                }
                Err(err) => {
                    log!("[ERROR] [FileUploadPanel] Error uploading file: {:?}", err);
                    session.try_update(|s| s.file.upload_failed(FILE_UPLOAD_ERROR_MESSAGE));
                }
            }
        });
    };

    let drop_zone_state = move || {
        session.with(|s| {
            let p = &s.file;
            if p.is_dragging() {
                "dragging"
            } else if p.file_name().is_some() {
                "ready"
            } else {
                "idle"
            }
        })
    };

    view! {
        <file-upload-panel>
            <drop-zone
                data-state=drop_zone_state
                on:dragover=move |ev: web_sys::DragEvent| {
                    ev.prevent_default();
                    session.update(|s| s.file.drag_over());
                }
                on:dragleave=move |_| session.update(|s| s.file.drag_leave())
                on:drop=on_drop
            >
                <input
                    type="file"
                    accept=".csv"
                    style:display="none"
                    node_ref=file_input
                    on:change:target=move |ev| {
                        if let Some(file) = ev.target().files().and_then(|files| files.get(0)) {
                            accept_file(file);
                        }
                    }
                />
                {move || match session.with(|s| s.file.file_name().map(str::to_string)) {
                    Some(name) => {
                        view! {
                            <div class="drop-zone-icon" data-state="ready">"✓"</div>
                            <p class="drop-zone-title">"File ready to upload"</p>
                            <p class="drop-zone-hint">{name}</p>
                        }
                            .into_any()
                    }
                    None => {
                        view! {
                            <div class="drop-zone-icon">"⇪"</div>
                            <p class="drop-zone-title">"Drag & drop your CSV file here"</p>
                            <p class="drop-zone-hint">
                                "or "
                                <button type="button" data-role="link" on:click=on_browse>
                                    "browse files"
                                </button>
                            </p>
                        }
                            .into_any()
                    }
                }}
            </drop-zone>
            {move || {
                session
                    .with(|s| s.file.error().map(str::to_string))
                    .map(|error| view! { <error-box>{error}</error-box> })
            }}
            <div class="panel-actions">
                <button
                    data-role="primary"
                    on:click=on_upload
                    disabled=move || !session.with(|s| s.can_submit_file())
                >
                    {move || {
                        if session.with(|s| s.file.is_uploading()) {
                            view! {
                                <span class="spinner"></span>
                                "Uploading..."
                            }
                                .into_any()
                        } else {
                            view! { "Upload File" }.into_any()
                        }
                    }}
                </button>
            </div>
        </file-upload-panel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> FilePanelState<&'static str> {
        FilePanelState::default()
    }

    #[test]
    fn starts_without_a_file() {
        let p = panel();
        assert_eq!(p.file_name(), None);
        assert!(!p.can_submit());
        assert!(!p.is_uploading());
        assert_eq!(p.error(), None);
    }

    #[test]
    fn non_csv_selection_is_rejected_without_state() {
        let mut p = panel();
        assert!(!p.select("handle", "report.xlsx".to_string()));
        assert_eq!(p.file_name(), None);
        assert!(!p.can_submit());
        assert_eq!(p.error(), Some(CSV_ONLY_MESSAGE));

        assert!(!p.select("handle", "REPORT.CSV".to_string()));
        assert_eq!(p.file_name(), None);
    }

    #[test]
    fn csv_selection_clears_previous_error() {
        let mut p = panel();
        p.select("bad", "notes.txt".to_string());
        assert!(p.select("good", "sales.csv".to_string()));
        assert_eq!(p.file_name(), Some("sales.csv"));
        assert!(p.can_submit());
        assert_eq!(p.error(), None);
    }

    #[test]
    fn rejected_file_keeps_the_earlier_selection() {
        let mut p = panel();
        p.select("good", "sales.csv".to_string());
        assert!(!p.select("bad", "notes.txt".to_string()));
        assert_eq!(p.file_name(), Some("sales.csv"));
        assert_eq!(p.error(), Some(CSV_ONLY_MESSAGE));
    }

    #[test]
    fn upload_is_single_flight() {
        let mut p = panel();
        assert_eq!(p.begin_upload(), None);

        p.select("good", "sales.csv".to_string());
        assert_eq!(p.begin_upload(), Some("good"));
        assert!(p.is_uploading());
        assert!(!p.can_submit());
        assert_eq!(p.begin_upload(), None);
        assert!(!p.select("other", "other.csv".to_string()));
        assert_eq!(p.file_name(), Some("sales.csv"));
    }

    #[test]
    fn failure_returns_to_selected_with_error() {
        let mut p = panel();
        p.select("good", "sales.csv".to_string());
        p.begin_upload();
        p.upload_failed(FILE_UPLOAD_ERROR_MESSAGE);
        assert!(!p.is_uploading());
        assert!(p.can_submit());
        assert_eq!(p.error(), Some(FILE_UPLOAD_ERROR_MESSAGE));

        assert_eq!(p.begin_upload(), Some("good"));
        assert_eq!(p.error(), None);
        p.upload_succeeded();
        assert!(!p.is_uploading());
        assert_eq!(p.error(), None);
    }

    #[test]
    fn drag_flag_toggles() {
        let mut p = panel();
        p.drag_over();
        assert!(p.is_dragging());
        p.drag_leave();
        assert!(!p.is_dragging());
    }
}
