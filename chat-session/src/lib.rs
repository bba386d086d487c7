//! Chat Session Library
//!
//! The platform-independent core of the event chat client: one controller
//! that creates a session for an event, exchanges questions and answers with
//! strict ordering, feeds dictated text into the input buffer, and decides
//! when the message log should follow new content.
//!
//! # Overview
//!
//! The library provides:
//! - `ChatController` - session state machine driven through `&self` intents
//! - `ChatTransport` - seam for the event backend and the query service
//! - `SpeechCapture` - seam for platform speech recognition
//! - `scroll` - the scroll-follow decision for the message log
//!
//! The controller is `!Send` and runtime agnostic: it runs on a tokio
//! `LocalSet` natively and on `wasm_bindgen_futures::spawn_local` in the
//! browser.
//!
//! # Example
//!
//! ```ignore
//! use chat_session::{ChatController, InitRequest, NoSpeech};
//!
//! let controller = ChatController::new(transport, NoSpeech);
//! controller
//!     .initialize(InitRequest::new(Some("7".into()), Some(token)))
//!     .await?;
//!
//! controller.set_input("Was the venue good?");
//! controller.send().await?;
//!
//! for message in controller.messages() {
//!     println!("{:?}: {}", message.author, message.content);
//! }
//! ```

pub mod controller;
pub mod error;
pub mod message;
pub mod scroll;
pub mod speech;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use controller::{
    ChatController, ChatView, DictationOutcome, InitRequest, Notice, Phase, SendOutcome,
};
pub use error::{ChatError, InitError, PreconditionError, QueryError, SendRejected, SpeechFailure};
pub use message::{Author, Message, Session};
pub use scroll::{FollowBehavior, ViewportMetrics};
pub use speech::{DictationState, NoSpeech, SpeechCapture, SpeechOutcome};
pub use transport::{classify_init_response, classify_query_response, Answer, ChatTransport, SessionGrant};
