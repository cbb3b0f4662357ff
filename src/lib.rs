//! # API Explorer
//!
//! A terminal explorer for HTTP APIs: pick an operation, fill in its
//! declared fields, preview the outgoing request and read the response.
//!
//! ## Features
//! - Path, query, header, form, file, body and model fields
//! - JSON, url-encoded and multipart payloads
//! - API key (from a registry or typed), Bearer and Basic auth
//! - Syntax highlighted JSON/XML/HTML/text responses
//! - cURL export
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)
//!
//! Request building ([`request`]) and response rendering ([`render`]) are
//! pure and usable without the TUI.

pub mod app;
pub mod auth;
pub mod config;
pub mod constants;
pub mod curl;
pub mod messages;
pub mod models;
pub mod network;
pub mod render;
pub mod request;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use auth::{Augment, Augmentation, AuthSettings, KeyPlacement};
pub use config::{ApiKeyRegistry, ExplorerConfig};
pub use constants::{APP_NAME, APP_VERSION};
pub use curl::to_curl;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Field, FieldDeclaration, FieldKind, FieldValue, HttpMethod, Operation};
pub use network::NetworkActor;
pub use render::{RenderResult, RenderedBody, ResponseRenderer, ResponseSnapshot};
pub use request::{ExploreError, FieldError, RequestBuilder, RequestDraft, RequestPreview};
