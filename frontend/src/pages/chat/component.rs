//! EventChat component: renders a [`ChatController`] and forwards intents

use std::rc::Rc;

use chat_session::message::DEFAULT_LABEL;
use chat_session::scroll::follow_behavior;
use chat_session::{
    ChatController, ChatError, ChatView, FollowBehavior, InitRequest, Notice, Phase,
    ViewportMetrics,
};
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlTextAreaElement, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use super::route::redirect_target;
use crate::components::{MessageBubble, ThinkingBubble, VoiceButton};
use crate::config;
use crate::speech::BrowserSpeech;
use crate::transport::GlooTransport;
use crate::utils;

/// How long a notice stays up before clearing itself
const NOTICE_DURATION_MS: u32 = 4_000;

const BROWSER_UNSUPPORTED: &str =
    "Speech recognition is not supported in your browser. Please use Chrome, Edge, or Safari.";

/// Notice text as worded for the browser
pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::DictationUnsupported => BROWSER_UNSUPPORTED.to_string(),
        other => other.to_string(),
    }
}

/// Whether the auto-dismiss countdown starts over
fn restarts_notice_timer(previous: Option<&Notice>, current: Option<&Notice>) -> bool {
    current.is_some() && previous != current
}

type Controller = ChatController<GlooTransport, BrowserSpeech>;

#[derive(Properties, PartialEq)]
pub struct EventChatProps {
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub dashboard_url: String,
    pub credential: Option<String>,
}

pub enum EventChatMsg {
    /// Controller state changed
    Refresh,
    UpdateInput(String),
    Send,
    ToggleDictation,
    DismissNotice,
    Redirect(String),
    GoBack,
}

pub struct EventChat {
    controller: Rc<Controller>,
    view: ChatView,
    messages_ref: NodeRef,
    input_ref: NodeRef,
    /// Scroll decided before the DOM update, applied after it
    pending_follow: Option<FollowBehavior>,
    /// Input appears once initialization settles
    focus_input: bool,
    notice_timer: Option<Timeout>,
}

impl Component for EventChat {
    type Message = EventChatMsg;
    type Properties = EventChatProps;

    fn create(ctx: &Context<Self>) -> Self {
        let controller = Rc::new(ChatController::new(
            GlooTransport::new(config::service_config()),
            BrowserSpeech::new(),
        ));

        let refresh = ctx.link().callback(|_: ()| EventChatMsg::Refresh);
        controller.subscribe(move || refresh.emit(()));

        let props = ctx.props();
        let request = InitRequest::new(props.event_id.clone(), props.credential.clone())
            .with_label(props.event_name.clone());
        let dashboard_url = props.dashboard_url.clone();
        let link = ctx.link().clone();
        let init_controller = controller.clone();

        spawn_local(async move {
            match init_controller.initialize(request).await {
                Ok(session) => {
                    log::info!("Chat session {} ready", session.short_id());
                }
                Err(ChatError::Precondition(reason)) => {
                    log::warn!("Cannot start chat: {}", reason);
                    link.send_message(EventChatMsg::Redirect(redirect_target(
                        &reason,
                        &dashboard_url,
                    )));
                }
                Err(e) => {
                    log::error!("Error initializing chat: {}", e);
                }
            }
        });

        let view = controller.view();
        Self {
            controller,
            view,
            messages_ref: NodeRef::default(),
            input_ref: NodeRef::default(),
            pending_follow: None,
            focus_input: false,
            notice_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            EventChatMsg::Refresh => {
                let previous_count = self.view.messages.len();
                let previous_notice = self.view.notice.clone();
                let was_initializing = self.view.is_initializing();
                self.view = self.controller.view();
                if was_initializing && !self.view.is_initializing() {
                    self.focus_input = true;
                }
                if self.view.messages.len() != previous_count {
                    self.pending_follow = self.sample_follow();
                }
                self.arm_notice_timer(ctx, previous_notice.as_ref());
                true
            }
            EventChatMsg::UpdateInput(text) => {
                self.controller.set_input(text);
                false
            }
            EventChatMsg::Send => {
                let controller = self.controller.clone();
                spawn_local(async move {
                    if let Err(reason) = controller.send().await {
                        log::debug!("Send ignored: {}", reason);
                    }
                });
                false
            }
            EventChatMsg::ToggleDictation => {
                let controller = self.controller.clone();
                spawn_local(async move {
                    let outcome = controller.toggle_dictation().await;
                    log::debug!("Dictation finished: {:?}", outcome);
                });
                false
            }
            EventChatMsg::DismissNotice => {
                self.notice_timer = None;
                self.controller.dismiss_notice();
                false
            }
            EventChatMsg::Redirect(url) => {
                utils::redirect(&url);
                false
            }
            EventChatMsg::GoBack => {
                utils::redirect(&ctx.props().dashboard_url);
                false
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.focus_input) {
            if let Some(input) = self.input_ref.cast::<HtmlTextAreaElement>() {
                let _ = input.focus();
            }
        }

        if let Some(behavior) = self.pending_follow.take() {
            if let Some(element) = self.messages_ref.cast::<Element>() {
                let options = ScrollToOptions::new();
                options.set_top(f64::from(element.scroll_height()));
                options.set_behavior(match behavior {
                    FollowBehavior::Instant => ScrollBehavior::Instant,
                    FollowBehavior::Smooth => ScrollBehavior::Smooth,
                });
                element.scroll_to_with_scroll_to_options(&options);
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.notice_timer = None;
        self.controller.teardown();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.view.is_initializing() {
            return html! {
                <div class="event-chat loading">
                    <div class="spinner" />
                    <p>{ "Initializing chat..." }</p>
                </div>
            };
        }

        let link = ctx.link();

        let handle_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            EventChatMsg::Send
        });

        let handle_input = link.callback(|e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            EventChatMsg::UpdateInput(input.value())
        });

        let handle_keydown = link.batch_callback(|e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                // Enter without Shift submits
                e.prevent_default();
                Some(EventChatMsg::Send)
            } else {
                None
            }
        });

        let toggle_dictation = link.callback(|_: ()| EventChatMsg::ToggleDictation);
        let go_back = link.callback(|_: MouseEvent| EventChatMsg::GoBack);
        let awaiting = self.view.is_awaiting();

        html! {
            <div class="event-chat">
                <div class="chat-header">
                    <button class="back-button" type="button" onclick={go_back}>
                        { "\u{2190} Back to Dashboard" }
                    </button>
                    <div class="chat-title">
                        <h1>{ self.label(ctx) }</h1>
                        if let Some(session) = &self.view.session {
                            <span class="session-id">{ format!("ID: {}", session.short_id()) }</span>
                        }
                    </div>
                </div>

                { self.render_notice(ctx) }

                <div class="chat-messages" ref={self.messages_ref.clone()}>
                    {
                        self.view.messages.iter().map(|message| {
                            html! { <MessageBubble message={message.clone()} /> }
                        }).collect::<Html>()
                    }
                    if awaiting {
                        <ThinkingBubble />
                    }
                </div>

                <form class="chat-input" onsubmit={handle_submit}>
                    <textarea
                        ref={self.input_ref.clone()}
                        class="message-input"
                        placeholder="Ask a question about this event... (Shift+Enter for new line)"
                        value={self.view.input.clone()}
                        oninput={handle_input}
                        onkeydown={handle_keydown}
                        disabled={self.view.phase == Phase::InitFailed}
                        rows="1"
                    />
                    <VoiceButton
                        dictation={self.view.dictation}
                        on_toggle={toggle_dictation}
                        disabled={self.view.phase == Phase::InitFailed}
                    />
                    <button type="submit" class="send-button" disabled={!self.view.can_send()}>
                        { if awaiting { "Sending..." } else { "Send" } }
                    </button>
                </form>
            </div>
        }
    }
}

impl EventChat {
    fn label(&self, ctx: &Context<Self>) -> String {
        match &self.view.session {
            Some(session) => session.label.clone(),
            None => ctx
                .props()
                .event_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        }
    }

    /// Decide against the log as currently laid out, before new messages land
    fn sample_follow(&self) -> Option<FollowBehavior> {
        let count = self.view.messages.len();
        let metrics = self
            .messages_ref
            .cast::<Element>()
            .map(|element| ViewportMetrics {
                scroll_top: element.scroll_top(),
                scroll_height: element.scroll_height(),
                client_height: element.client_height(),
            })
            .unwrap_or_default();
        follow_behavior(metrics, count)
    }

    fn render_notice(&self, ctx: &Context<Self>) -> Html {
        match &self.view.notice {
            Some(notice) => {
                let dismiss = ctx.link().callback(|_: MouseEvent| EventChatMsg::DismissNotice);
                html! {
                    <div class="chat-notice" role="alert" onclick={dismiss}>
                        { notice_text(notice) }
                    </div>
                }
            }
            None => html! {},
        }
    }

    /// Clear a visible notice after a few seconds
    ///
    /// A replacement notice gets its own full duration; dropping the old
    /// `Timeout` cancels it.
    fn arm_notice_timer(&mut self, ctx: &Context<Self>, previous: Option<&Notice>) {
        let current = self.view.notice.as_ref();
        if current.is_none() {
            self.notice_timer = None;
        } else if restarts_notice_timer(previous, current) || self.notice_timer.is_none() {
            let link = ctx.link().clone();
            self.notice_timer = Some(Timeout::new(NOTICE_DURATION_MS, move || {
                link.send_message(EventChatMsg::DismissNotice);
            }));
        }
    }
}
