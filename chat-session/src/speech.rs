//! Speech capture seam
//!
//! Platform recognition is callback driven (result, end and error handlers).
//! Adapters fold those callbacks into one future per utterance that resolves
//! to a [`SpeechOutcome`], so the controller consumes dictation through
//! ordinary suspension.

use crate::error::SpeechFailure;

/// How one listen ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Speech was recognized; recognition stops after one utterance
    Transcribed(String),
    /// Recognition ended without a transcript (stopped, or silence timeout)
    Ended,
    Failed(SpeechFailure),
}

/// Dictation state as seen by the view
///
/// `Unsupported` is fixed at controller construction; the other two alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationState {
    Unsupported,
    Idle,
    Listening,
}

/// Trait for platform speech recognition
#[allow(async_fn_in_trait)]
pub trait SpeechCapture {
    /// Whether the platform offers recognition at all. Checked once.
    fn is_supported(&self) -> bool;

    /// Start recognition and wait for a single utterance
    ///
    /// Starting while a previous listen is active replaces it: the earlier
    /// future resolves and only one recognizer stays alive.
    async fn listen(&self) -> SpeechOutcome;

    /// Cancel an active listen. Does nothing when idle.
    fn stop(&self);
}

/// Speech capture for platforms without recognition
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl SpeechCapture for NoSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    async fn listen(&self) -> SpeechOutcome {
        SpeechOutcome::Failed(SpeechFailure::Other("unsupported".to_string()))
    }

    fn stop(&self) {}
}
