//! Event chat page
//!
//! `route` reads the page inputs (query string and stored credential);
//! `component` owns the controller for the lifetime of the page.

mod component;
mod route;

pub use route::{EventChatPage, DEFAULT_DASHBOARD_URL};
