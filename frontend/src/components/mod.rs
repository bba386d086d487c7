mod message_bubble;
mod voice_button;

pub use message_bubble::{MessageBubble, ThinkingBubble};
pub use voice_button::VoiceButton;
