//! API Explorer - fill in an operation's fields, send it, read the response
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use api_explorer::app::{AppActor, AppState};
use api_explorer::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use api_explorer::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use api_explorer::network::NetworkActor;
use api_explorer::storage::Storage;
use api_explorer::ui::{self, body_lines, highlighted_lines, method_color, panel_border, status_color};
use api_explorer::{APP_NAME, APP_VERSION};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let storage = Storage::new();
    let config = storage.load_config()?;

    // Initialize logging to file; the terminal belongs to the UI
    let log_path = storage.log_path(&config);
    let log_dir = log_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| storage.config_dir().to_path_buf());
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_file = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| api_explorer::constants::DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    storage.init()?;
    let operations = storage.load_operations()?;
    tracing::info!(
        version = APP_VERSION,
        dir = %storage.config_dir().display(),
        operations = operations.len(),
        api_keys = config.api_keys.len(),
        "Starting"
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, config.timeout());
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(config, operations), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = event == UiEvent::Quit;
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Title
            Constraint::Percentage(45), // Operations + form
            Constraint::Min(8),         // Preview + response
            Constraint::Length(1),      // Status bar
        ])
        .split(area);

    draw_title(f, state, rows[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);
    draw_operations(f, state, top[0]);

    let form = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(top[1]);
    draw_fields(f, state, form[0]);
    draw_auth(f, state, form[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);
    draw_preview(f, state, bottom[0]);
    draw_response(f, state, bottom[1]);

    draw_status_bar(f, state, rows[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", APP_NAME),
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    )];
    if let Some(op) = state.operations.get(state.selected_operation) {
        spans.push(Span::styled(
            format!(" {} ", op.method),
            Style::default().fg(method_color(op.method)).bold(),
        ));
        spans.push(Span::raw(op.url.clone()));
        if let Some(description) = &op.description {
            spans.push(Span::styled(
                format!("  {}", description),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_operations(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Operations;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, false))
        .title(format!(" Operations ({}) ", state.operations.len()));

    if state.operations.is_empty() {
        let hint = Paragraph::new("No operations found.\n\nAdd YAML files to the operations directory.")
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .operations
        .iter()
        .map(|op| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:7}", op.method.as_str()),
                    Style::default().fg(method_color(op.method)).bold(),
                ),
                Span::raw(op.name.clone()),
            ]))
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().bold()
    };
    let list = List::new(items).block(block).highlight_style(highlight_style);

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_operation));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_fields(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Fields;
    let is_editing = is_focused && state.input_mode == InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, is_editing))
        .title(" Fields (* required, e:edit) ");

    if state.fields.is_empty() {
        f.render_widget(Paragraph::new("This operation has no fields.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, input)| ui::field_item(input, is_focused && i == state.selected_field))
        .collect();
    f.render_widget(List::new(items).block(block), area);

    // Cursor
    if is_editing {
        let row: u16 = state.fields[..state.selected_field]
            .iter()
            .map(|input| if input.error.is_some() { 2 } else { 1 })
            .sum();
        let name_len = state.fields[state.selected_field].declaration.name.chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 1 + 7 + name_len + 3 + state.cursor_position as u16).min(max_x);
        let cursor_y = (area.y + 1 + row).min(area.y + area.height.saturating_sub(2));
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_auth(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Auth;
    let is_editing = is_focused && state.input_mode == InputMode::Editing;

    let (content, prefix_len) =
        ui::auth_summary(&state.auth, state.auth_field, state.api_key_names.len());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, is_editing))
        .title(format!(" Auth: {} (t:cycle) ", state.auth.label()));
    f.render_widget(Paragraph::new(content).block(block), area);

    if is_editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 1 + prefix_len as u16 + state.cursor_position as u16).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_preview(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Preview;

    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = &state.notice {
        lines.push(Line::styled(notice.clone(), Style::default().fg(Color::Red).bold()));
        lines.push(Line::raw(""));
    }

    let title = if let Some(curl) = &state.curl {
        lines.extend(curl.lines().map(|l| Line::raw(l.to_string())));
        " cURL "
    } else if let Some(preview) = &state.preview {
        lines.extend(preview.head.lines().map(|l| Line::raw(l.to_string())));
        if let Some(body) = &preview.body {
            lines.push(Line::raw(""));
            lines.extend(body.lines().map(|l| Line::raw(l.to_string())));
        }
        " Request "
    } else {
        if lines.is_empty() {
            lines.push(Line::styled(
                "Press 's' to send, 'c' to copy as cURL.",
                Style::default().fg(Color::DarkGray),
            ));
        }
        " Request "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, false))
        .title(title);
    let preview = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(preview, area);
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Response;
    let border_style = panel_border(is_focused, false);

    let Some(result) = &state.result else {
        let text = if state.is_loading { "Loading..." } else { "" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Response ");
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let code = result.status_line.split(' ').next().and_then(|c| c.parse().ok()).unwrap_or(0);
    let status_text = Span::styled(
        format!(" {} ", result.status_line),
        Style::default().fg(status_color(code)).bold(),
    );
    let time_text = if state.time_ms > 0 {
        format!(" {}ms ", state.time_ms)
    } else {
        String::new()
    };

    let header_height = (result.headers.lines.len() as u16 + 2).min(area.height / 3).max(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(3)])
        .split(area);

    let headers_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(status_text);
    let headers = Paragraph::new(highlighted_lines(&result.headers)).block(headers_block);
    f.render_widget(headers, chunks[0]);

    let body_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Body (↑/↓ scroll) ")
        .title_bottom(Line::from(time_text).right_aligned());
    let body = Paragraph::new(body_lines(&result.body))
        .block(body_block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(body, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next auth field "
    } else {
        " Tab:panel | ↑/↓:select | e:edit | s:send | c:cURL | ?:help | q:quit "
    };
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = format!(
        r#"
 {} {} - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓              Select operation / field, scroll response

 REQUEST
   e / Enter          Edit selected field
   s                  Send request
   c                  Copy as cURL

 FIELDS
   file fields take a path, read when sending
   body/model fields take JSON

 AUTH
   t                  Cycle auth type (None/API key/Bearer/Basic)
   k                  Next registered API key, then manual entry
   Tab                Switch between username/password

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#,
        APP_NAME, APP_VERSION
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
