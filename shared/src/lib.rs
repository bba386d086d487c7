//! Types shared between the browser app, the terminal client and the chat core.
//!
//! Everything here must stay WASM compatible: plain serde types and string
//! helpers, no runtime or I/O.

// Wire types for the event backend and the query service
pub mod api;
pub use api::{endpoints, ErrorBody, QueryRequest, QueryResponse, SessionInitResponse};

// Backend locations and request timeout
pub mod config;
pub use config::{ServiceConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
