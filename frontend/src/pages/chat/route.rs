use chat_session::PreconditionError;
use serde::Deserialize;
use yew::prelude::*;
use yew_router::prelude::*;

use super::component::EventChat;
use crate::utils;

/// Where to send users who cannot chat without signing in
pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_URL: &str = "/events-dashboard";

/// `?event_id=..&event_name=..&dashboard_url=..`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatQuery {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
}

impl ChatQuery {
    pub fn dashboard_url(&self) -> String {
        self.dashboard_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_DASHBOARD_URL)
            .to_string()
    }
}

/// Redirect target for a chat that cannot start
pub fn redirect_target(reason: &PreconditionError, dashboard_url: &str) -> String {
    match reason {
        PreconditionError::MissingCredential => LOGIN_PATH.to_string(),
        PreconditionError::MissingEventId => dashboard_url.to_string(),
    }
}

#[function_component(EventChatPage)]
pub fn event_chat_page() -> Html {
    let location = use_location();
    let query = location
        .as_ref()
        .and_then(|loc| loc.query::<ChatQuery>().ok())
        .unwrap_or_default();
    let credential = use_memo((), |_| utils::stored_credential());

    html! {
        <EventChat
            event_id={query.event_id.clone()}
            event_name={query.event_name.clone()}
            dashboard_url={query.dashboard_url()}
            credential={(*credential).clone()}
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_url_defaults() {
        assert_eq!(ChatQuery::default().dashboard_url(), DEFAULT_DASHBOARD_URL);

        let blank = ChatQuery {
            dashboard_url: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank.dashboard_url(), DEFAULT_DASHBOARD_URL);

        let custom = ChatQuery {
            dashboard_url: Some("/org/42/events".into()),
            ..Default::default()
        };
        assert_eq!(custom.dashboard_url(), "/org/42/events");
    }

    #[test]
    fn missing_credential_goes_to_login() {
        assert_eq!(
            redirect_target(&PreconditionError::MissingCredential, "/events-dashboard"),
            LOGIN_PATH
        );
    }

    #[test]
    fn missing_event_goes_to_dashboard() {
        assert_eq!(
            redirect_target(&PreconditionError::MissingEventId, "/org/42/events"),
            "/org/42/events"
        );
    }

    #[test]
    fn query_params_deserialize() {
        let query: ChatQuery =
            serde_json::from_value(serde_json::json!({ "event_id": "17", "event_name": "Hack Night" }))
                .unwrap();
        assert_eq!(query.event_id.as_deref(), Some("17"));
        assert_eq!(query.event_name.as_deref(), Some("Hack Night"));
        assert_eq!(query.dashboard_url, None);
    }
}
