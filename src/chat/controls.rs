use leptos::{html, prelude::*};

const MAX_INPUT_HEIGHT_PX: i32 = 120;

#[component]
pub fn ChatControls(
    #[prop(into)] input: Signal<String>,
    #[prop(into)] set_input: WriteSignal<String>,
    #[prop(into)] input_disabled: Signal<bool>,
    #[prop(into)] in_flight: Signal<bool>,
    #[prop(into)] ref_input: NodeRef<html::Textarea>,
    #[prop(into)] submit: Callback<()>,
    #[prop(into)] is_mobile: Signal<bool>,
) -> impl IntoView {
    // Enter submits, Shift+Enter breaks the line. Touch keyboards always break
    // the line and rely on the send button.
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Enter" || ev.shift_key() || is_mobile.get_untracked() {
            return;
        }
        ev.prevent_default();
        submit.run(());
    };

    // Grow with the content up to a cap, then scroll.
    Effect::new(move |_| {
        input.track();
        if let Some(textarea) = ref_input.get() {
            let style = web_sys::HtmlElement::style(&textarea);
            let _ = style.set_property("height", "auto");
            let height = textarea.scroll_height().min(MAX_INPUT_HEIGHT_PX);
            let _ = style.set_property("height", &format!("{height}px"));
        }
    });

    view! {
        <chat-controls>
            <form on:submit=move |ev| {
                ev.prevent_default();
                submit.run(());
            }>
                <div style="display:flex; padding-left: 4px; padding-right: 4px; padding-bottom: 4px; gap: 4px;">
                    <textarea
                        rows="1"
                        prop:value=input
                        on:input:target=move |ev| set_input.set(ev.target().value())
                        placeholder="Ask a question about your data..."
                        node_ref=ref_input
                        on:keydown=on_keydown
                        disabled=input_disabled
                    />
                    <button
                        type="submit"
                        data-role="primary"
                        style="flex-shrink:0"
                        disabled=move || input.get().trim().is_empty() || input_disabled.get()
                    >
                        {move || {
                            if in_flight.get() {
                                view! { <span class="spinner"></span> }.into_any()
                            } else {
                                view! { "Send" }.into_any()
                            }
                        }}
                    </button>
                </div>
            </form>
        </chat-controls>
    }
}
