//! Web Speech API adapter
//!
//! Recognition is looked up on `window` under its standard and prefixed
//! names. Each listen owns one recognizer; its result, error and end
//! callbacks race to resolve a single oneshot channel.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chat_session::{SpeechCapture, SpeechFailure, SpeechOutcome};
use futures_channel::oneshot;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const LANGUAGE: &str = "en-US";
const CONSTRUCTOR_NAMES: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];
const HANDLERS: [&str; 3] = ["onresult", "onerror", "onend"];

type OutcomeSlot = Rc<RefCell<Option<oneshot::Sender<SpeechOutcome>>>>;

/// Find the recognition constructor, if this browser has one
fn recognition_constructor() -> Option<Function> {
    let window = web_sys::window()?;
    CONSTRUCTOR_NAMES.iter().find_map(|name| {
        Reflect::get(&window, &JsValue::from_str(name))
            .ok()
            .and_then(|ctor| ctor.dyn_into::<Function>().ok())
    })
}

/// A started recognizer and the callbacks wired into it
struct ActiveRecognition {
    id: u64,
    recognition: JsValue,
    _handlers: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl ActiveRecognition {
    fn invoke(&self, method: &str) -> Result<(), JsValue> {
        let function: Function = Reflect::get(&self.recognition, &JsValue::from_str(method))?
            .dyn_into()?;
        function.call0(&self.recognition)?;
        Ok(())
    }
}

impl Drop for ActiveRecognition {
    fn drop(&mut self) {
        // Detach first so no callback runs into a dropped closure.
        for name in HANDLERS {
            let _ = Reflect::set(&self.recognition, &JsValue::from_str(name), &JsValue::NULL);
        }
        let _ = self.invoke("abort");
    }
}

/// Browser speech recognition, one utterance per listen
pub struct BrowserSpeech {
    constructor: Option<Function>,
    active: RefCell<Option<ActiveRecognition>>,
    next_id: Cell<u64>,
}

impl BrowserSpeech {
    pub fn new() -> Self {
        Self {
            constructor: recognition_constructor(),
            active: RefCell::new(None),
            next_id: Cell::new(0),
        }
    }

    fn start(&self, constructor: &Function) -> Result<oneshot::Receiver<SpeechOutcome>, JsValue> {
        let recognition = Reflect::construct(constructor, &Array::new())?;
        Reflect::set(&recognition, &"continuous".into(), &JsValue::FALSE)?;
        Reflect::set(&recognition, &"interimResults".into(), &JsValue::FALSE)?;
        Reflect::set(&recognition, &"lang".into(), &JsValue::from_str(LANGUAGE))?;

        let (tx, rx) = oneshot::channel();
        let slot: OutcomeSlot = Rc::new(RefCell::new(Some(tx)));
        let handlers = vec![
            outcome_handler(&slot, |event| {
                SpeechOutcome::Transcribed(first_transcript(&event).unwrap_or_default())
            }),
            outcome_handler(&slot, |event| {
                SpeechOutcome::Failed(SpeechFailure::from_code(&error_code(&event)))
            }),
            outcome_handler(&slot, |_| SpeechOutcome::Ended),
        ];
        for (name, handler) in HANDLERS.iter().zip(&handlers) {
            Reflect::set(&recognition, &JsValue::from_str(name), handler.as_ref())?;
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let active = ActiveRecognition {
            id,
            recognition,
            _handlers: handlers,
        };
        active.invoke("start")?;
        *self.active.borrow_mut() = Some(active);
        Ok(rx)
    }
}

impl Default for BrowserSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechCapture for BrowserSpeech {
    fn is_supported(&self) -> bool {
        self.constructor.is_some()
    }

    async fn listen(&self) -> SpeechOutcome {
        let Some(constructor) = self.constructor.as_ref() else {
            return SpeechOutcome::Failed(SpeechFailure::Other("unsupported".to_string()));
        };
        self.stop();

        let rx = match self.start(constructor) {
            Ok(rx) => rx,
            Err(e) => {
                log::error!("Failed to start speech recognition: {:?}", e);
                return SpeechOutcome::Failed(SpeechFailure::Other(
                    e.as_string().unwrap_or_else(|| "start failed".to_string()),
                ));
            }
        };
        let id = self.next_id.get();

        // A stop or a newer listen drops the sender, which reads as Ended.
        let outcome = rx.await.unwrap_or(SpeechOutcome::Ended);

        let finished = {
            let mut active = self.active.borrow_mut();
            if active.as_ref().is_some_and(|a| a.id == id) {
                active.take()
            } else {
                None
            }
        };
        drop(finished);
        outcome
    }

    fn stop(&self) {
        let active = self.active.borrow_mut().take();
        drop(active);
    }
}

fn outcome_handler(
    slot: &OutcomeSlot,
    outcome: impl Fn(JsValue) -> SpeechOutcome + 'static,
) -> Closure<dyn FnMut(JsValue)> {
    let slot = slot.clone();
    Closure::new(move |event: JsValue| {
        if let Some(tx) = slot.borrow_mut().take() {
            let _ = tx.send(outcome(event));
        }
    })
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &"results".into()).ok()?;
    let result = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&result, 0).ok()?;
    Reflect::get(&alternative, &"transcript".into())
        .ok()?
        .as_string()
}

fn error_code(event: &JsValue) -> String {
    Reflect::get(event, &"error".into())
        .ok()
        .and_then(|code| code.as_string())
        .unwrap_or_default()
}
