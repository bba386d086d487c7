//! Chat session controller
//!
//! Owns the session, the message log, the input buffer and the
//! awaiting/dictation flags, and orchestrates a [`ChatTransport`] and a
//! [`SpeechCapture`].
//!
//! All intents take `&self`. One logical actor drives the controller, but
//! several of its operations may be suspended at once (an outstanding
//! exchange, a dictation listen) while the user keeps editing the input.
//! State lives in a `RefCell` that is never borrowed across an `.await`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{ChatError, PreconditionError, SendRejected, SpeechFailure};
use crate::message::{Message, Session, DEFAULT_LABEL, GREETING, INIT_APOLOGY};
use crate::speech::{DictationState, SpeechCapture, SpeechOutcome};
use crate::transport::ChatTransport;

/// Lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    /// One exchange is in flight; further sends are rejected
    Awaiting,
    /// Terminal: the session could not be created
    InitFailed,
}

/// Transient, non-blocking notice for the user. Never enters the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DictationUnsupported,
    DictationFailed(SpeechFailure),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DictationUnsupported => {
                write!(f, "Speech recognition is not available on this platform.")
            }
            Notice::DictationFailed(reason) => write!(f, "Voice input stopped: {}", reason),
        }
    }
}

/// Caller-supplied inputs for [`ChatController::initialize`]
#[derive(Clone, Default)]
pub struct InitRequest {
    pub event_id: Option<String>,
    pub credential: Option<String>,
    /// Display label; defaults to "Event Chat"
    pub label: Option<String>,
}

impl InitRequest {
    pub fn new(event_id: Option<String>, credential: Option<String>) -> Self {
        Self {
            event_id,
            credential,
            label: None,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    fn validate(&self) -> Result<(String, String), PreconditionError> {
        let credential =
            non_blank(self.credential.as_deref()).ok_or(PreconditionError::MissingCredential)?;
        let event_id =
            non_blank(self.event_id.as_deref()).ok_or(PreconditionError::MissingEventId)?;
        Ok((event_id, credential))
    }
}

impl fmt::Debug for InitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitRequest")
            .field("event_id", &self.event_id)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("label", &self.label)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// How an accepted send finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Answered,
    /// The exchange failed; a fallback message was appended instead
    Fallback(crate::error::QueryError),
    /// The controller was torn down before the reply arrived
    Discarded,
}

/// How a dictation toggle finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationOutcome {
    Unsupported,
    /// The toggle stopped an active listen
    Stopped,
    Transcribed(String),
    Ended,
    Failed(SpeechFailure),
    /// A later toggle stopped or replaced this listen, or the controller was torn down
    Superseded,
}

/// Snapshot of everything a view renders
#[derive(Debug, Clone, PartialEq)]
pub struct ChatView {
    pub phase: Phase,
    pub session: Option<Session>,
    pub messages: Vec<Message>,
    pub input: String,
    pub dictation: DictationState,
    pub notice: Option<Notice>,
}

impl ChatView {
    pub fn is_awaiting(&self) -> bool {
        self.phase == Phase::Awaiting
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self.phase, Phase::Uninitialized | Phase::Initializing)
    }

    /// Whether a send intent would be accepted right now
    pub fn can_send(&self) -> bool {
        self.phase == Phase::Ready && !self.input.trim().is_empty()
    }
}

struct ChatState {
    phase: Phase,
    session: Option<Session>,
    messages: Vec<Message>,
    input: String,
    dictation: DictationState,
    /// Bumped on every start and stop so stale listens can tell they lost
    listen_generation: u64,
    notice: Option<Notice>,
}

type Listener = Rc<dyn Fn()>;

/// The chat session controller
pub struct ChatController<T, S> {
    transport: T,
    speech: S,
    state: RefCell<ChatState>,
    alive: Cell<bool>,
    listener: RefCell<Option<Listener>>,
}

impl<T: ChatTransport, S: SpeechCapture> ChatController<T, S> {
    pub fn new(transport: T, speech: S) -> Self {
        let dictation = if speech.is_supported() {
            DictationState::Idle
        } else {
            DictationState::Unsupported
        };

        Self {
            transport,
            speech,
            state: RefCell::new(ChatState {
                phase: Phase::Uninitialized,
                session: None,
                messages: Vec::new(),
                input: String::new(),
                dictation,
                listen_generation: 0,
                notice: None,
            }),
            alive: Cell::new(true),
            listener: RefCell::new(None),
        }
    }

    /// Register the change listener, replacing any previous one
    ///
    /// Called after every state change, with no borrow held, so it may read
    /// the controller. Never called after [`teardown`](Self::teardown).
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn notify(&self) {
        if !self.alive.get() {
            return;
        }
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Create the session and seed the log
    ///
    /// Preconditions are checked before any network call. On success the log
    /// holds the greeting; on failure it holds a single apology and the
    /// controller stays in [`Phase::InitFailed`].
    pub async fn initialize(&self, request: InitRequest) -> Result<Session, ChatError> {
        if !self.alive.get() {
            return Err(ChatError::TornDown);
        }
        let (event_id, credential) = request.validate()?;

        {
            let mut state = self.state.borrow_mut();
            if state.phase != Phase::Uninitialized {
                return Err(ChatError::AlreadyInitialized);
            }
            state.phase = Phase::Initializing;
        }
        self.notify();

        info!(event_id = %event_id, "Initializing chat session");
        let result = self.transport.initialize(&event_id, &credential).await;

        if !self.alive.get() {
            debug!(event_id = %event_id, "Discarding session init result after teardown");
            return Err(ChatError::TornDown);
        }

        let outcome = {
            let mut state = self.state.borrow_mut();
            match result {
                Ok(grant) => {
                    let session = Session {
                        session_id: grant.session_id,
                        event_id,
                        label: non_blank(request.label.as_deref())
                            .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
                    };
                    info!(session_id = %session.session_id, "Chat session ready");
                    state.session = Some(session.clone());
                    state.messages.push(Message::assistant(GREETING));
                    state.phase = Phase::Ready;
                    Ok(session)
                }
                Err(err) => {
                    warn!(event_id = %event_id, error = %err, "Chat session init failed");
                    state.messages.push(Message::assistant(INIT_APOLOGY));
                    state.phase = Phase::InitFailed;
                    Err(ChatError::Initialization(err))
                }
            }
        };
        self.notify();
        outcome
    }

    /// Replace the input buffer. Allowed in every phase, including while awaiting.
    pub fn set_input(&self, text: impl Into<String>) {
        if !self.alive.get() {
            return;
        }
        self.state.borrow_mut().input = text.into();
        self.notify();
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    /// Send the input buffer as a question
    ///
    /// The user message is appended and the buffer cleared before the query
    /// is issued, so a second trigger finds the controller awaiting and is
    /// rejected. Exactly one assistant message is appended when the reply
    /// (or failure) arrives.
    pub async fn send(&self) -> Result<SendOutcome, SendRejected> {
        if !self.alive.get() {
            return Err(SendRejected::TornDown);
        }

        let (session_id, question) = {
            let mut state = self.state.borrow_mut();
            let session_id = match (state.phase, state.session.as_ref()) {
                (Phase::Awaiting, _) => return Err(SendRejected::Busy),
                (Phase::Ready, Some(session)) => session.session_id.clone(),
                _ => return Err(SendRejected::NoSession),
            };
            let question = state.input.trim().to_string();
            if question.is_empty() {
                return Err(SendRejected::EmptyInput);
            }

            state.messages.push(Message::user(question.clone()));
            state.input.clear();
            state.phase = Phase::Awaiting;
            (session_id, question)
        };
        self.notify();

        debug!(session_id = %session_id, "Sending question");
        let result = self.transport.query(&session_id, &question).await;

        if !self.alive.get() {
            debug!(session_id = %session_id, "Discarding answer after teardown");
            return Ok(SendOutcome::Discarded);
        }

        let outcome = {
            let mut state = self.state.borrow_mut();
            let outcome = match result {
                Ok(answer) => {
                    state.messages.push(Message::assistant(answer.text));
                    SendOutcome::Answered
                }
                Err(err) => {
                    warn!(session_id = %session_id, error = %err, "Query failed");
                    state.messages.push(Message::assistant(err.fallback_text()));
                    SendOutcome::Fallback(err)
                }
            };
            state.phase = Phase::Ready;
            outcome
        };
        self.notify();
        Ok(outcome)
    }

    /// Start dictation when idle, stop it when listening
    ///
    /// A start resolves when the utterance ends. A recognized transcript is
    /// appended to the input buffer; failures become a notice and never touch
    /// the log.
    pub async fn toggle_dictation(&self) -> DictationOutcome {
        if !self.alive.get() {
            return DictationOutcome::Superseded;
        }

        let generation = {
            let mut state = self.state.borrow_mut();
            let current = state.dictation;
            match current {
                DictationState::Unsupported => {
                    state.notice = Some(Notice::DictationUnsupported);
                    drop(state);
                    self.notify();
                    return DictationOutcome::Unsupported;
                }
                DictationState::Listening => {
                    state.dictation = DictationState::Idle;
                    state.listen_generation += 1;
                    drop(state);
                    debug!("Stopping dictation");
                    self.speech.stop();
                    self.notify();
                    return DictationOutcome::Stopped;
                }
                DictationState::Idle => {
                    state.dictation = DictationState::Listening;
                    state.listen_generation += 1;
                    state.listen_generation
                }
            }
        };
        self.notify();

        debug!("Listening for dictation");
        let outcome = self.speech.listen().await;

        if !self.alive.get() {
            return DictationOutcome::Superseded;
        }

        let result = {
            let mut state = self.state.borrow_mut();
            if state.listen_generation != generation {
                return DictationOutcome::Superseded;
            }
            state.dictation = DictationState::Idle;

            match outcome {
                SpeechOutcome::Transcribed(text) => {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        if !state.input.is_empty() {
                            state.input.push(' ');
                        }
                        state.input.push_str(&text);
                    }
                    DictationOutcome::Transcribed(text)
                }
                SpeechOutcome::Ended => DictationOutcome::Ended,
                SpeechOutcome::Failed(reason) => {
                    warn!(error = %reason, "Dictation failed");
                    state.notice = Some(Notice::DictationFailed(reason.clone()));
                    DictationOutcome::Failed(reason)
                }
            }
        };
        self.notify();
        result
    }

    /// Clear the current notice
    pub fn dismiss_notice(&self) {
        if self.state.borrow_mut().notice.take().is_some() {
            self.notify();
        }
    }

    /// Mark the controller dead
    ///
    /// Results arriving for in-flight calls are discarded, active dictation is
    /// stopped and the listener is dropped.
    pub fn teardown(&self) {
        if !self.alive.replace(false) {
            return;
        }
        let was_listening = {
            let mut state = self.state.borrow_mut();
            state.listen_generation += 1;
            std::mem::replace(&mut state.dictation, DictationState::Idle)
                == DictationState::Listening
        };
        if was_listening {
            self.speech.stop();
        }
        self.listener.borrow_mut().take();
        debug!("Chat controller torn down");
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_awaiting(&self) -> bool {
        self.phase() == Phase::Awaiting
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.state.borrow().messages.len()
    }

    pub fn dictation(&self) -> DictationState {
        self.state.borrow().dictation
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state.borrow().notice.clone()
    }

    pub fn view(&self) -> ChatView {
        let state = self.state.borrow();
        ChatView {
            phase: state.phase,
            session: state.session.clone(),
            messages: state.messages.clone(),
            input: state.input.clone(),
            dictation: state.dictation,
            notice: state.notice.clone(),
        }
    }
}
