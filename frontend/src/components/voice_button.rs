use chat_session::DictationState;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct VoiceButtonProps {
    pub dictation: DictationState,
    pub on_toggle: Callback<()>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// Microphone toggle for dictation
///
/// Stays clickable when recognition is unsupported so the press can explain
/// why nothing happens.
#[function_component(VoiceButton)]
pub fn voice_button(props: &VoiceButtonProps) -> Html {
    let recording = props.dictation == DictationState::Listening;
    let unsupported = props.dictation == DictationState::Unsupported;

    let onclick = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(()))
    };

    let button_class = classes!(
        "voice-button",
        recording.then_some("recording"),
        props.disabled.then_some("disabled"),
        unsupported.then_some("unsupported"),
    );

    let title = match props.dictation {
        DictationState::Unsupported => "Voice input not supported in this browser",
        DictationState::Listening => "Stop recording",
        DictationState::Idle => "Start voice input",
    };

    html! {
        <button
            class={button_class}
            onclick={onclick}
            disabled={props.disabled}
            title={title}
            type="button"
        >
            if recording {
                <span class="voice-icon recording-icon">{ "\u{1F534}" }</span> // Red circle
            } else if unsupported {
                <span class="voice-icon mic-icon unsupported">{ "\u{1F507}" }</span> // Muted speaker
            } else {
                <span class="voice-icon mic-icon">{ "\u{1F3A4}" }</span> // Microphone
            }
        </button>
    }
}
