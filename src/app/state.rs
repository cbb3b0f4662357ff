//! App state - pure data structure with no I/O logic

use crate::auth::{ApiKeySource, AuthSettings};
use crate::config::ExplorerConfig;
use crate::messages::ui_events::{AuthField, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{FieldDeclaration, Operation};
use crate::render::RenderResult;
use crate::request::RequestPreview;

/// One form input: a declared field, what the user typed and its last error
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInput {
    pub declaration: FieldDeclaration,
    /// Text value, or a path for `file` fields
    pub value: String,
    pub error: Option<String>,
}

impl FieldInput {
    pub fn new(declaration: FieldDeclaration) -> Self {
        let value = declaration.default.clone().unwrap_or_default();
        FieldInput {
            declaration,
            value,
            error: None,
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Operations
    pub operations: Vec<Operation>,
    pub selected_operation: usize,

    // Form, rebuilt whenever another operation is selected
    pub fields: Vec<FieldInput>,
    pub selected_field: usize,
    pub cursor_position: usize,

    // Auth
    pub auth: AuthSettings,
    pub auth_field: AuthField,
    pub config: ExplorerConfig,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub response_scroll: u16,

    // Outgoing request
    pub preview: Option<RequestPreview>,
    pub curl: Option<String>,
    pub notice: Option<String>,

    // Response
    pub result: Option<RenderResult>,
    pub time_ms: u64,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // Popups
    pub show_help: bool,
}

impl AppState {
    pub fn new(config: ExplorerConfig, operations: Vec<Operation>) -> Self {
        let auth = initial_auth(&config);
        let mut state = AppState {
            operations,
            selected_operation: 0,
            fields: Vec::new(),
            selected_field: 0,
            cursor_position: 0,
            auth,
            auth_field: AuthField::Primary,
            config,
            active_panel: Panel::Operations,
            input_mode: InputMode::Normal,
            response_scroll: 0,
            preview: None,
            curl: None,
            notice: None,
            result: None,
            time_ms: 0,
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            show_help: false,
        };
        state.load_fields();
        state
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn current_operation(&self) -> Option<&Operation> {
        self.operations.get(self.selected_operation)
    }

    /// Reset the form to the selected operation's declared fields
    pub fn load_fields(&mut self) {
        self.fields = self
            .current_operation()
            .map(|op| op.fields.iter().cloned().map(FieldInput::new).collect())
            .unwrap_or_default();
        self.selected_field = 0;
        self.cursor_position = 0;
        self.preview = None;
        self.curl = None;
        self.notice = None;
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Fields => self
                .fields
                .get(self.selected_field)
                .map(|f| f.value.as_str())
                .unwrap_or(""),
            Panel::Auth => match &self.auth {
                AuthSettings::ApiKey(ApiKeySource::Manual(key)) => key.as_str(),
                AuthSettings::Bearer(token) => token.as_str(),
                AuthSettings::Basic { username, password } => match self.auth_field {
                    AuthField::Primary => username.as_str(),
                    AuthField::Password => password.as_str(),
                },
                _ => "",
            },
            _ => "",
        }
    }

    /// Get mutable reference to current input field, if the panel has one
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Fields => self.fields.get_mut(self.selected_field).map(|f| &mut f.value),
            Panel::Auth => {
                let auth_field = self.auth_field;
                match &mut self.auth {
                    AuthSettings::ApiKey(ApiKeySource::Manual(key)) => Some(key),
                    AuthSettings::Bearer(token) => Some(token),
                    AuthSettings::Basic { username, password } => match auth_field {
                        AuthField::Primary => Some(username),
                        AuthField::Password => Some(password),
                    },
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            operations: self.operations.clone(),
            selected_operation: self.selected_operation,
            fields: self.fields.clone(),
            selected_field: self.selected_field,
            auth: self.auth.clone(),
            auth_field: self.auth_field,
            api_key_names: self.config.api_keys.names().map(String::from).collect(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            preview: self.preview.clone(),
            curl: self.curl.clone(),
            notice: self.notice.clone(),
            result: self.result.clone(),
            time_ms: self.time_ms,
            response_scroll: self.response_scroll,
            is_loading: self.is_loading,
            show_help: self.show_help,
        }
    }
}

/// Configured default auth, or the first registered API key when none is set
fn initial_auth(config: &ExplorerConfig) -> AuthSettings {
    match (&config.default_auth, config.api_keys.names().next()) {
        (AuthSettings::None, Some(name)) => {
            AuthSettings::ApiKey(ApiKeySource::Registry(name.to_string()))
        }
        (auth, _) => auth.clone(),
    }
}
