use leptos::prelude::*;

use super::types::{Message, Role};
use crate::copy_button::CopyButton;
use crate::markdown::Markdown;
use crate::utils::format_local_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePresentation {
    pub align: &'static str,
    pub icon: &'static str,
    pub full_width: bool,
    pub markdown: bool,
    pub copyable: bool,
}

impl RolePresentation {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => RolePresentation {
                align: "end",
                icon: "👤",
                full_width: false,
                markdown: false,
                copyable: true,
            },
            Role::Assistant => RolePresentation {
                align: "start",
                icon: "🤖",
                full_width: false,
                markdown: true,
                copyable: true,
            },
            Role::System => RolePresentation {
                align: "center",
                icon: "ℹ",
                full_width: true,
                markdown: false,
                copyable: false,
            },
        }
    }
}

#[component]
pub fn ChatMessage(#[prop(into)] message: Message) -> impl IntoView {
    let presentation = RolePresentation::for_role(message.role);
    let time = format_local_time(message.timestamp_ms);
    let content = message.content.clone();

    view! {
        <chat-message
            data-role=message.role.as_str()
            data-align=presentation.align
            data-full-width=presentation.full_width.to_string()
        >
            <div style="display: flex; align-items: center; gap: 0.5em">
                <span class="chat-message-icon">{presentation.icon}</span>
                <chat-message-role>{message.role.as_str()}</chat-message-role>
                <chat-message-buttons>
                    {presentation
                        .copyable
                        .then(|| {
                            let text = message.content.clone();
                            view! { <CopyButton text_to_copy=Signal::derive(move || text.clone()) /> }
                        })}
                </chat-message-buttons>
                <chat-message-time>{time}</chat-message-time>
            </div>
            <chat-message-content>
                {if presentation.markdown {
                    view! { <Markdown markdown_text=content /> }.into_any()
                } else {
                    view! { <pre style:white-space="pre-wrap">{content}</pre> }.into_any()
                }}
            </chat-message-content>
        </chat-message>
    }
}
