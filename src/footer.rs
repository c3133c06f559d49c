use leptos::prelude::*;

use crate::header::APP_TITLE;
use crate::utils::current_year;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <span>{format!("© {} | {}", current_year(), APP_TITLE)}</span>
            <span>"Made by Bhumit Goyal ♥ and RAG technology"</span>
        </footer>
    }
}
