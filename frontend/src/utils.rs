use web_sys::window;

/// Local storage key holding the event backend credential
pub const CREDENTIAL_KEY: &str = "token";

/// Get the base HTTP URL (e.g., "http://localhost:3000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let Some(window) = window() else {
        return "http://localhost:3000".to_string();
    };
    let location = window.location();

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:3000".to_string());

    format!("{}//{}", protocol, host)
}

/// Read the stored credential. Stored as a raw string, not JSON.
pub fn stored_credential() -> Option<String> {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(CREDENTIAL_KEY).ok().flatten())
}

/// Full page navigation, used for targets outside this app
pub fn redirect(url: &str) {
    if let Some(window) = window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("Failed to navigate to {}: {:?}", url, e);
        }
    }
}

/// Format a message time for display (e.g., "14:05")
pub fn format_clock(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string()
}
