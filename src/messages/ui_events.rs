//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Operations
    NextOperation,
    PrevOperation,

    // Fields
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Request actions
    Explore,
    ExportCurl,

    // Auth
    CycleAuth,
    CycleApiKey,
    NextAuthField,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    Operations,
    Fields,
    Auth,
    Preview,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Operations => Panel::Fields,
            Panel::Fields => Panel::Auth,
            Panel::Auth => Panel::Preview,
            Panel::Preview => Panel::Response,
            Panel::Response => Panel::Operations,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Operations => Panel::Response,
            Panel::Fields => Panel::Operations,
            Panel::Auth => Panel::Fields,
            Panel::Preview => Panel::Auth,
            Panel::Response => Panel::Preview,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Auth editing field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AuthField {
    /// API key, bearer token or basic username
    #[default]
    Primary,
    /// Basic password
    Password,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('c') => Some(UiEvent::ExportCurl),
            KeyCode::Char('s') => Some(UiEvent::Explore),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('e') | KeyCode::Enter => match active_panel {
                Panel::Fields | Panel::Auth => Some(UiEvent::StartEditing),
                Panel::Operations => Some(UiEvent::NextPanel),
                Panel::Preview | Panel::Response => None,
            },
            KeyCode::Up => match active_panel {
                Panel::Operations => Some(UiEvent::PrevOperation),
                Panel::Fields => Some(UiEvent::PrevField),
                Panel::Response => Some(UiEvent::ScrollUp),
                _ => None,
            },
            KeyCode::Down => match active_panel {
                Panel::Operations => Some(UiEvent::NextOperation),
                Panel::Fields => Some(UiEvent::NextField),
                Panel::Response => Some(UiEvent::ScrollDown),
                _ => None,
            },
            KeyCode::Char('t') if active_panel == Panel::Auth => Some(UiEvent::CycleAuth),
            KeyCode::Char('k') if active_panel == Panel::Auth => Some(UiEvent::CycleApiKey),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            KeyCode::Tab if active_panel == Panel::Auth => Some(UiEvent::NextAuthField),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            _ => None,
        },
    }
}
