use ratatui::{prelude::*, widgets::*};

use crate::app::FieldInput;
use crate::auth::{ApiKeySource, AuthSettings};
use crate::messages::ui_events::AuthField;
use crate::models::{FieldKind, HttpMethod};
use crate::render::{Highlighted, RenderedBody, StyledSpan};

/// Border style for a panel given focus and editing state
pub fn panel_border(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn span_style(span: &StyledSpan) -> Style {
    let mut style = Style::default();
    if let Some((r, g, b)) = span.fg {
        style = style.fg(Color::Rgb(r, g, b));
    }
    if span.bold {
        style = style.bold();
    }
    style
}

/// Highlighted text as ratatui lines
pub fn highlighted_lines(highlighted: &Highlighted) -> Vec<Line<'static>> {
    highlighted
        .lines
        .iter()
        .map(|line| {
            Line::from(
                line.iter()
                    .map(|span| Span::styled(span.text.clone(), span_style(span)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Response body lines; advisories and failures stand out
pub fn body_lines(body: &RenderedBody) -> Vec<Line<'static>> {
    match body {
        RenderedBody::Highlighted(h) | RenderedBody::Html(h) => highlighted_lines(h),
        RenderedBody::Advisory(text) => text
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(Color::Yellow)))
            .collect(),
        RenderedBody::Failure(text) => text
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(Color::Red)))
            .collect(),
    }
}

/// One form row: kind tag, name, value and any error underneath
pub fn field_item(input: &FieldInput, is_selected: bool) -> ListItem<'static> {
    let declaration = &input.declaration;
    let name_style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };
    let required = if declaration.required { "*" } else { " " };

    let value = if input.value.is_empty() {
        Span::styled(
            declaration.description.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(input.value.clone())
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:7}", kind_tag(declaration.kind)), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}: ", declaration.name, required), name_style),
        value,
    ])];
    if let Some(error) = &input.error {
        lines.push(Line::styled(format!("        ! {}", error), Style::default().fg(Color::Red)));
    }
    ListItem::new(lines)
}

fn kind_tag(kind: FieldKind) -> String {
    format!("[{}]", kind.as_str())
}

/// Mask a secret for display
pub fn masked(secret: &str) -> String {
    if secret.is_empty() {
        "<empty>".to_string()
    } else {
        "*".repeat(secret.chars().count())
    }
}

/// Auth panel text and the cursor offset of the field being edited.
/// Every secret is masked.
pub fn auth_summary(auth: &AuthSettings, field: AuthField, registered: usize) -> (String, usize) {
    match auth {
        AuthSettings::None => (String::from("Press 't' to cycle auth type"), 0),
        AuthSettings::ApiKey(ApiKeySource::Registry(name)) => (
            format!("Key: {}  ({} registered, k:next)", name, registered),
            5,
        ),
        AuthSettings::ApiKey(ApiKeySource::Manual(key)) => {
            let hint = if registered == 0 { "" } else { "  (k:registry)" };
            (format!("Key: {}{}", masked(key), hint), 5)
        }
        AuthSettings::Bearer(token) => (format!("Token: {}", masked(token)), 7),
        AuthSettings::Basic { username, password } => {
            let user = format!("User: {}  Pass: ", username);
            let prefix_len = match field {
                AuthField::Primary => 6,
                AuthField::Password => user.chars().count(),
            };
            (format!("{}{}", user, masked(password)), prefix_len)
        }
    }
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        HttpMethod::HEAD | HttpMethod::OPTIONS => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{highlight, Language};

    #[test]
    fn test_highlighted_lines_keep_text() {
        let lines = highlighted_lines(&highlight(Language::Json, "{\n  \"a\": 1\n}"));
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["{", "  \"a\": 1", "}"]);
    }

    #[test]
    fn test_auth_summary_masks_every_secret() {
        let (key, _) = auth_summary(
            &AuthSettings::ApiKey(ApiKeySource::Manual("abc".into())),
            AuthField::Primary,
            0,
        );
        assert_eq!(key, "Key: ***");

        let (token, offset) = auth_summary(&AuthSettings::Bearer("tok1".into()), AuthField::Primary, 0);
        assert_eq!(token, "Token: ****");
        assert_eq!(offset, 7);

        let basic = AuthSettings::Basic {
            username: "jane".into(),
            password: "pw".into(),
        };
        let (text, offset) = auth_summary(&basic, AuthField::Password, 0);
        assert_eq!(text, "User: jane  Pass: **");
        assert_eq!(offset, "User: jane  Pass: ".len());
    }

    #[test]
    fn test_registry_key_shows_name_only() {
        let (text, _) = auth_summary(
            &AuthSettings::ApiKey(ApiKeySource::Registry("main".into())),
            AuthField::Primary,
            2,
        );
        assert_eq!(text, "Key: main  (2 registered, k:next)");
    }

    #[test]
    fn test_masked() {
        assert_eq!(masked(""), "<empty>");
        assert_eq!(masked("pässword"), "********");
    }

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(0), Color::Yellow);
    }
}
