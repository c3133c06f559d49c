pub mod file_panel;
pub mod json_panel;
pub mod validate;

use leptos::prelude::*;
use serde_json::Value;

use file_panel::{FilePanelState, FileUploadPanel};
use json_panel::{JsonPanelState, JsonUploadPanel};

/// What a panel reports upward after the backend accepted its data.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    File {
        name: String,
    },
    Json {
        rows: Option<u64>,
        columns: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadTab {
    #[default]
    File,
    Json,
}

/// Everything the dialog holds between its open and its close. Both panels live
/// here so a tab switch never drops a selection or an upload in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession<F> {
    tab: UploadTab,
    pub file: FilePanelState<F>,
    pub json: JsonPanelState,
}

impl<F> Default for UploadSession<F> {
    fn default() -> Self {
        UploadSession {
            tab: UploadTab::default(),
            file: FilePanelState::default(),
            json: JsonPanelState::default(),
        }
    }
}

impl<F: Clone> UploadSession<F> {
    pub fn tab(&self) -> UploadTab {
        self.tab
    }

    /// Returns whether the tab actually changed.
    pub fn select_tab(&mut self, tab: UploadTab) -> bool {
        let changed = self.tab != tab;
        self.tab = tab;
        changed
    }

    pub fn is_uploading(&self) -> bool {
        self.file.is_uploading() || self.json.is_uploading()
    }

    pub fn can_submit_file(&self) -> bool {
        self.file.can_submit() && !self.json.is_uploading()
    }

    pub fn can_submit_json(&self) -> bool {
        self.json.can_submit() && !self.file.is_uploading()
    }

    /// One upload at a time across both panels.
    pub fn begin_file_upload(&mut self) -> Option<F> {
        if self.json.is_uploading() {
            return None;
        }
        self.file.begin_upload()
    }

    pub fn begin_json_upload(&mut self) -> Option<Vec<Value>> {
        if self.file.is_uploading() {
            return None;
        }
        self.json.begin_upload()
    }
}

pub type SessionSignal = RwSignal<UploadSession<web_sys::File>, LocalStorage>;

/// The open flag belongs to the parent. Everything inside is rebuilt on every
/// open, so panel state never outlives a close.
#[component]
pub fn UploadModal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_upload_success: Callback<UploadOutcome>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <UploadDialog on_close=on_close on_upload_success=on_upload_success />
        </Show>
    }
}

#[component]
fn UploadDialog(
    on_close: Callback<()>,
    on_upload_success: Callback<UploadOutcome>,
) -> impl IntoView {
    let session: SessionSignal = RwSignal::new_local(UploadSession::default());
    let active_tab = Memo::new(move |_| session.with(|s| s.tab()));

    let tab_button = move |tab: UploadTab, label: &'static str| {
        view! {
            <button
                type="button"
                data-active=move || (active_tab.get() == tab).to_string()
                on:click=move |_| session.maybe_update(|s| s.select_tab(tab))
            >
                {label}
            </button>
        }
    };

    // Panels stay mounted while hidden.
    let display_for = move |tab: UploadTab| {
        move || if active_tab.get() == tab { "block" } else { "none" }
    };

    view! {
        <modal-backdrop>
            <upload-modal role="dialog" aria-modal="true">
                <div class="modal-header">
                    <h3>"Upload Data"</h3>
                    <button
                        data-size="compact"
                        aria-label="Close"
                        on:click=move |_| on_close.run(())
                    >
                        "✕"
                    </button>
                </div>
                <div class="tabs">
                    {tab_button(UploadTab::File, "CSV File")}
                    {tab_button(UploadTab::Json, "JSON Data")}
                </div>
                <div style:display=display_for(UploadTab::File)>
                    <FileUploadPanel session=session on_success=on_upload_success />
                </div>
                <div style:display=display_for(UploadTab::Json)>
                    <JsonUploadPanel session=session on_success=on_upload_success />
                </div>
            </upload-modal>
        </modal-backdrop>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_upload_running() -> UploadSession<&'static str> {
        let mut session = UploadSession::default();
        assert!(session.file.select("first", "sales.csv".to_string()));
        assert_eq!(session.begin_file_upload(), Some("first"));
        session
    }

    #[test]
    fn opens_on_the_file_tab() {
        let session = UploadSession::<&str>::default();
        assert_eq!(session.tab(), UploadTab::File);
        assert!(!session.is_uploading());
    }

    #[test]
    fn reselecting_the_open_tab_is_not_a_change() {
        let mut session = UploadSession::<&str>::default();
        assert!(!session.select_tab(UploadTab::File));
        assert!(session.select_tab(UploadTab::Json));
        assert!(!session.select_tab(UploadTab::Json));
        assert_eq!(session.tab(), UploadTab::Json);
    }

    #[test]
    fn tab_switch_keeps_selection_and_running_upload() {
        let mut session = session_with_upload_running();
        session.select_tab(UploadTab::Json);
        session.select_tab(UploadTab::File);

        assert!(session.file.is_uploading());
        assert_eq!(session.file.file_name(), Some("sales.csv"));
        assert!(!session.file.select("second", "b.csv".to_string()));
        assert_eq!(session.begin_file_upload(), None);
    }

    #[test]
    fn json_upload_waits_for_a_running_file_upload() {
        let mut session = session_with_upload_running();
        session.select_tab(UploadTab::Json);
        session.json.set_text(r#"[{"a":1}]"#.to_string());

        assert!(!session.can_submit_json());
        assert_eq!(session.begin_json_upload(), None);

        session.file.upload_failed("Upload failed");
        assert!(session.can_submit_json());
        assert_eq!(session.begin_json_upload().map(|r| r.len()), Some(1));
        assert!(!session.can_submit_file());
        assert_eq!(session.begin_file_upload(), None);
    }

    #[test]
    fn json_text_survives_a_tab_switch() {
        let mut session = UploadSession::<&str>::default();
        session.select_tab(UploadTab::Json);
        session.json.set_text(r#"[{"a":1}]"#.to_string());
        session.select_tab(UploadTab::File);
        session.select_tab(UploadTab::Json);
        assert_eq!(session.json.text(), r#"[{"a":1}]"#);
        assert_eq!(session.json.validity(), Some(true));
    }

    #[test]
    fn a_fresh_session_forgets_everything() {
        let mut session = session_with_upload_running();
        session.file.upload_succeeded();
        // Closing drops the session; reopening starts from the default.
        let reopened = UploadSession::<&str>::default();
        assert_eq!(reopened.file.file_name(), None);
        assert_ne!(session, reopened);
    }
}
