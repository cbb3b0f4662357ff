//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::FieldInput;
use crate::auth::AuthSettings;
use crate::messages::ui_events::{AuthField, InputMode, Panel};
use crate::models::Operation;
use crate::render::RenderResult;
use crate::request::RequestPreview;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Operations
    pub operations: Vec<Operation>,
    pub selected_operation: usize,

    // Form
    pub fields: Vec<FieldInput>,
    pub selected_field: usize,

    // Auth panel
    pub auth: AuthSettings,
    pub auth_field: AuthField,
    pub api_key_names: Vec<String>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Outgoing request
    pub preview: Option<RequestPreview>,
    pub curl: Option<String>,
    /// Problem that kept the request from being built
    pub notice: Option<String>,

    // Response
    pub result: Option<RenderResult>,
    pub time_ms: u64,
    pub response_scroll: u16,
    pub is_loading: bool,

    // Popups
    pub show_help: bool,
}
