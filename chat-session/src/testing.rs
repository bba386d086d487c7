//! Scripted transport and speech doubles for controller tests
//!
//! Replies are held back on oneshot channels until the test releases them, so
//! tests decide exactly when each suspended call resumes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::error::{InitError, QueryError, SpeechFailure};
use crate::speech::{SpeechCapture, SpeechOutcome};
use crate::transport::{Answer, ChatTransport, SessionGrant};

/// Let every spawned local task run until it suspends again
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

enum InitScript {
    Immediate(Result<SessionGrant, InitError>),
    Deferred,
}

struct TransportInner {
    init: InitScript,
    init_calls: Cell<usize>,
    pending_init: RefCell<Option<oneshot::Sender<Result<SessionGrant, InitError>>>>,
    queries: RefCell<Vec<(String, String)>>,
    pending_queries: RefCell<VecDeque<oneshot::Sender<Result<Answer, QueryError>>>>,
}

/// Transport whose replies are released by the test
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Rc<TransportInner>,
}

impl ScriptedTransport {
    fn with_init(init: InitScript) -> Self {
        Self {
            inner: Rc::new(TransportInner {
                init,
                init_calls: Cell::new(0),
                pending_init: RefCell::new(None),
                queries: RefCell::new(Vec::new()),
                pending_queries: RefCell::new(VecDeque::new()),
            }),
        }
    }

    pub fn granting(session_id: &str) -> Self {
        Self::with_init(InitScript::Immediate(Ok(SessionGrant {
            session_id: session_id.to_string(),
        })))
    }

    pub fn failing(err: InitError) -> Self {
        Self::with_init(InitScript::Immediate(Err(err)))
    }

    /// Initialization waits for [`resolve_init`](Self::resolve_init)
    pub fn deferred() -> Self {
        Self::with_init(InitScript::Deferred)
    }

    pub fn resolve_init(&self, result: Result<SessionGrant, InitError>) {
        let sender = self
            .inner
            .pending_init
            .borrow_mut()
            .take()
            .expect("no initialization in flight");
        let _ = sender.send(result);
    }

    /// Release the oldest outstanding query
    pub fn respond(&self, result: Result<Answer, QueryError>) {
        let sender = self
            .inner
            .pending_queries
            .borrow_mut()
            .pop_front()
            .expect("no query in flight");
        let _ = sender.send(result);
    }

    pub fn init_calls(&self) -> usize {
        self.inner.init_calls.get()
    }

    /// Every query issued so far, as `(session_id, question)`
    pub fn queries(&self) -> Vec<(String, String)> {
        self.inner.queries.borrow().clone()
    }
}

impl ChatTransport for ScriptedTransport {
    async fn initialize(
        &self,
        _event_id: &str,
        _credential: &str,
    ) -> Result<SessionGrant, InitError> {
        self.inner.init_calls.set(self.inner.init_calls.get() + 1);
        match &self.inner.init {
            InitScript::Immediate(result) => result.clone(),
            InitScript::Deferred => {
                let (tx, rx) = oneshot::channel();
                *self.inner.pending_init.borrow_mut() = Some(tx);
                rx.await
                    .unwrap_or_else(|_| Err(InitError::Network("dropped".to_string())))
            }
        }
    }

    async fn query(&self, session_id: &str, question: &str) -> Result<Answer, QueryError> {
        self.inner
            .queries
            .borrow_mut()
            .push((session_id.to_string(), question.to_string()));
        let (tx, rx) = oneshot::channel();
        self.inner.pending_queries.borrow_mut().push_back(tx);
        rx.await
            .unwrap_or_else(|_| Err(QueryError::Network("dropped".to_string())))
    }
}

struct SpeechInner {
    supported: bool,
    active: RefCell<Option<oneshot::Sender<SpeechOutcome>>>,
    listens: Cell<usize>,
    stops: Cell<usize>,
}

/// Speech capture whose utterances are produced by the test
#[derive(Clone)]
pub struct ScriptedSpeech {
    inner: Rc<SpeechInner>,
}

impl ScriptedSpeech {
    fn new(supported: bool) -> Self {
        Self {
            inner: Rc::new(SpeechInner {
                supported,
                active: RefCell::new(None),
                listens: Cell::new(0),
                stops: Cell::new(0),
            }),
        }
    }

    pub fn supported() -> Self {
        Self::new(true)
    }

    pub fn unsupported() -> Self {
        Self::new(false)
    }

    fn finish(&self, outcome: SpeechOutcome) {
        if let Some(sender) = self.inner.active.borrow_mut().take() {
            let _ = sender.send(outcome);
        }
    }

    pub fn speak(&self, text: &str) {
        self.finish(SpeechOutcome::Transcribed(text.to_string()));
    }

    pub fn fail(&self, reason: SpeechFailure) {
        self.finish(SpeechOutcome::Failed(reason));
    }

    pub fn listens(&self) -> usize {
        self.inner.listens.get()
    }

    pub fn stops(&self) -> usize {
        self.inner.stops.get()
    }
}

impl SpeechCapture for ScriptedSpeech {
    fn is_supported(&self) -> bool {
        self.inner.supported
    }

    async fn listen(&self) -> SpeechOutcome {
        self.inner.listens.set(self.inner.listens.get() + 1);
        self.finish(SpeechOutcome::Failed(SpeechFailure::Aborted));
        let (tx, rx) = oneshot::channel();
        *self.inner.active.borrow_mut() = Some(tx);
        rx.await.unwrap_or(SpeechOutcome::Ended)
    }

    fn stop(&self) {
        self.inner.stops.set(self.inner.stops.get() + 1);
        self.finish(SpeechOutcome::Ended);
    }
}
