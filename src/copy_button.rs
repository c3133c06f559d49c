use anyhow::anyhow;
use leptos::logging::log;
use leptos::{prelude::*, task::spawn_local};
use leptos_use::use_timeout_fn;
use wasm_bindgen_futures::JsFuture;

const FEEDBACK_MS: f64 = 1500.0;

/// Label state of a copy button. Anything but `Idle` falls back after `FEEDBACK_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyFeedback {
    #[default]
    Idle,
    Copied,
    Failed,
}

impl CopyFeedback {
    pub fn label(self) -> &'static str {
        match self {
            CopyFeedback::Idle => "copy",
            CopyFeedback::Copied => "copied",
            CopyFeedback::Failed => "failed",
        }
    }

    pub fn from_result(result: &anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => CopyFeedback::Copied,
            Err(_) => CopyFeedback::Failed,
        }
    }
}

/// Message bodies worth copying. Whitespace-only text is skipped.
fn copyable(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

async fn write_to_clipboard(text: &str) -> anyhow::Result<()> {
    // Undefined outside secure contexts.
    let clipboard = window().navigator().clipboard();
    if clipboard.is_undefined() {
        return Err(anyhow!("clipboard API not available"));
    }
    JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(|e| anyhow!("clipboard write rejected: {:?}", e))
}

#[component]
pub fn CopyButton(#[prop(into)] text_to_copy: Signal<String>) -> impl IntoView {
    let (feedback, set_feedback) = signal(CopyFeedback::Idle);
    let reset = use_timeout_fn(move |_| set_feedback.set(CopyFeedback::Idle), FEEDBACK_MS);

    let on_copy = move |_: web_sys::MouseEvent| {
        let Some(text) = copyable(text_to_copy.get_untracked()) else {
            return;
        };
        let start = reset.start.clone();
        let stop = reset.stop.clone();
        spawn_local(async move {
            let result = write_to_clipboard(&text).await;
            if let Err(err) = &result {
                log!("[ERROR] [CopyButton] {:?}", err);
            }
            stop();
            set_feedback.set(CopyFeedback::from_result(&result));
            start(());
        });
    };

    view! {
        <button class="copy-button" data-size="compact" on:click=on_copy>
            {move || feedback.get().label()}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_follows_the_write_result() {
        assert_eq!(CopyFeedback::default().label(), "copy");
        assert_eq!(CopyFeedback::from_result(&Ok(())), CopyFeedback::Copied);
        assert_eq!(
            CopyFeedback::from_result(&Err(anyhow!("denied"))).label(),
            "failed"
        );
    }

    #[test]
    fn blank_text_is_not_copied() {
        assert_eq!(copyable(String::new()), None);
        assert_eq!(copyable(" \n".to_string()), None);
        assert_eq!(copyable("42 rows".to_string()), Some("42 rows".to_string()));
    }
}
