//! Command handlers - business logic for processing UI events

use std::path::Path;

use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::auth::{ApiKeySource, AuthSettings};
use crate::curl;
use crate::messages::ui_events::{AuthField, InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Field, FieldKind, FieldValue, FileAttachment};
use crate::render::ResponseRenderer;
use crate::request::{ExploreError, FieldError, RequestBuilder, RequestDraft, RequestPreview};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn next_operation(&mut self) {
        if !self.operations.is_empty() {
            self.selected_operation = (self.selected_operation + 1) % self.operations.len();
            self.load_fields();
        }
    }

    pub fn prev_operation(&mut self) {
        if !self.operations.is_empty() {
            self.selected_operation = self
                .selected_operation
                .checked_sub(1)
                .unwrap_or(self.operations.len() - 1);
            self.load_fields();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected_field = (self.selected_field + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected_field = self
                .selected_field
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.current_input_mut().is_some() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        let cursor_pos = self.cursor_position;
        if cursor_pos == 0 {
            return;
        }
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    // ========================
    // Auth
    // ========================

    pub fn cycle_auth(&mut self) {
        self.auth = match &self.auth {
            AuthSettings::None => AuthSettings::ApiKey(self.first_api_key()),
            AuthSettings::ApiKey(_) => AuthSettings::Bearer(String::new()),
            AuthSettings::Bearer(_) => AuthSettings::Basic {
                username: String::new(),
                password: String::new(),
            },
            AuthSettings::Basic { .. } => AuthSettings::None,
        };
        self.auth_field = AuthField::Primary;
    }

    /// Step through the registered keys, then manual entry
    pub fn cycle_api_key(&mut self) {
        let AuthSettings::ApiKey(source) = &self.auth else {
            return;
        };
        if self.config.api_keys.is_empty() {
            return;
        }

        let names: Vec<&str> = self.config.api_keys.names().collect();
        let next = match source {
            ApiKeySource::Registry(current) => {
                match names.iter().position(|name| *name == current.as_str()) {
                    Some(i) if i + 1 < names.len() => ApiKeySource::Registry(names[i + 1].to_string()),
                    _ => ApiKeySource::Manual(String::new()),
                }
            }
            ApiKeySource::Manual(_) => ApiKeySource::Registry(names[0].to_string()),
        };
        self.auth = AuthSettings::ApiKey(next);
    }

    pub fn next_auth_field(&mut self) {
        if matches!(self.auth, AuthSettings::Basic { .. }) {
            self.auth_field = match self.auth_field {
                AuthField::Primary => AuthField::Password,
                AuthField::Password => AuthField::Primary,
            };
            self.cursor_position = self.current_input().len();
        }
    }

    fn first_api_key(&self) -> ApiKeySource {
        match self.config.api_keys.names().next() {
            Some(name) => ApiKeySource::Registry(name.to_string()),
            None => ApiKeySource::Manual(String::new()),
        }
    }

    // ========================
    // Request building
    // ========================

    /// Read the form, loading file fields from disk
    fn read_fields(&self) -> (Vec<Field>, Vec<FieldError>) {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for input in &self.fields {
            let declaration = input.declaration.clone();
            if declaration.kind == FieldKind::File && !input.value.is_empty() {
                match FileAttachment::read(Path::new(&input.value)) {
                    Ok(attachment) => fields.push(Field::new(declaration, FieldValue::File(attachment))),
                    Err(e) => errors.push(FieldError::UnreadableFile {
                        field: declaration.name,
                        message: e.to_string(),
                    }),
                }
            } else {
                fields.push(Field::new(declaration, input.value.as_str()));
            }
        }

        (fields, errors)
    }

    fn field_position(&self, name: &str) -> usize {
        self.fields
            .iter()
            .position(|f| f.declaration.name == name)
            .unwrap_or(self.fields.len())
    }

    fn mark_errors(&mut self, errors: &[FieldError]) {
        for error in errors {
            for input in self.fields.iter_mut().filter(|f| f.declaration.name == error.field()) {
                input.error = Some(error.to_string());
            }
        }
    }

    /// Build the request for the current form, flagging invalid fields
    fn prepare_draft(&mut self) -> Option<RequestDraft> {
        let mut builder = RequestBuilder::for_operation(self.current_operation()?);
        if let Some(augmenter) = self
            .auth
            .augmenter(&self.config.api_keys, &self.config.api_key_placement)
        {
            builder = builder.with_augmenter(augmenter);
        }

        for input in &mut self.fields {
            input.error = None;
        }
        self.notice = None;

        let (fields, mut errors) = self.read_fields();
        let draft = match builder.build(&fields) {
            Ok(draft) => Some(draft),
            Err(ExploreError::Validation(found)) => {
                errors.extend(found);
                None
            }
            Err(e) => {
                warn!(error = %e, "could not build request");
                self.notice = Some(e.to_string());
                None
            }
        };

        if !errors.is_empty() {
            errors.sort_by_key(|error| self.field_position(error.field()));
            debug!(count = errors.len(), "form has invalid fields");
            self.mark_errors(&errors);
            let names = errors
                .iter()
                .map(|error| error.field())
                .collect::<Vec<_>>()
                .join(", ");
            self.notice = Some(format!("{}: {}", ExploreError::Validation(errors), names));
            return None;
        }
        draft
    }

    // ========================
    // Request sending
    // ========================

    pub fn explore(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }

        let draft = self.prepare_draft()?;
        let preview = match RequestPreview::of(&draft) {
            Ok(preview) => preview,
            Err(e) => {
                self.notice = Some(format!("invalid URL '{}': {}", draft.url, e));
                return None;
            }
        };

        self.preview = Some(preview);
        self.curl = None;
        self.result = None;
        self.is_loading = true;

        let id = self.next_id();
        self.pending_request_id = Some(id);
        info!(id, method = %draft.method, url = %draft.url, "Exploring");

        Some(NetworkCommand::Explore { id, draft })
    }

    pub fn export_curl(&mut self) {
        if let Some(draft) = self.prepare_draft() {
            self.curl = Some(curl::to_curl(&draft));
            self.active_panel = Panel::Preview;
        }
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let response_id = response.id();
        if self.pending_request_id != Some(response_id) {
            debug!(id = response_id, "ignoring stale response");
            return;
        }
        self.finish_request();

        match response {
            NetworkResponse::Completed { snapshot, time_ms, .. } => {
                self.time_ms = time_ms;
                self.result = Some(ResponseRenderer.render(&snapshot));
            }
        }
    }

    /// Runs on every completion of the pending request, whatever its outcome
    fn finish_request(&mut self) {
        self.is_loading = false;
        self.pending_request_id = None;
        self.response_scroll = 0;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
