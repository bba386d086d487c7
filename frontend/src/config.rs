//! Backend locations for the browser build
//!
//! Both services are fixed at compile time through `EVENT_CHAT_API_URL` and
//! `EVENT_CHAT_QUERY_URL`. Without them the event backend is assumed to share
//! the page origin and the query service runs on its local default port.

use std::time::Duration;

use shared::{ServiceConfig, DEFAULT_REQUEST_TIMEOUT_SECS};

use crate::utils;

const DEFAULT_QUERY_URL: &str = "http://localhost:8001";

pub fn service_config() -> ServiceConfig {
    let api = resolve(option_env!("EVENT_CHAT_API_URL"), utils::get_base_url);
    let query = resolve(option_env!("EVENT_CHAT_QUERY_URL"), || {
        DEFAULT_QUERY_URL.to_string()
    });
    let timeout = option_env!("EVENT_CHAT_TIMEOUT_SECS")
        .and_then(|secs| secs.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    ServiceConfig::new(api, query).with_timeout(Duration::from_secs(timeout))
}

fn resolve(configured: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .unwrap_or_else(fallback)
}
