use chat_session::Message;
use yew::prelude::*;

use crate::utils::format_clock;

#[derive(Properties, PartialEq)]
pub struct MessageBubbleProps {
    pub message: Message,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let message = &props.message;
    let side = if message.is_user() { "user" } else { "assistant" };

    html! {
        <div class={classes!("chat-message", side)}>
            <div class="chat-bubble">
                <p class="chat-content">{ &message.content }</p>
                <span class="chat-time">{ format_clock(&message.timestamp) }</span>
            </div>
        </div>
    }
}

/// Placeholder bubble while an answer is pending
#[function_component(ThinkingBubble)]
pub fn thinking_bubble() -> Html {
    html! {
        <div class="chat-message assistant thinking">
            <div class="chat-bubble">
                <span class="typing-dots">
                    <span class="dot" />
                    <span class="dot" />
                    <span class="dot" />
                </span>
                <span class="thinking-label">{ "AI is thinking..." }</span>
            </div>
        </div>
    }
}
