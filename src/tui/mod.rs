//! Ratatui-based terminal form.
//!
//! The form lists the six applicant inputs and a Predict action. Reference
//! options are loaded once at startup (with fallbacks), and a prediction is
//! requested only when the user explicitly submits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::info;

use crate::api::ApiClient;
use crate::app::pipeline::{self, PredictionOutcome};
use crate::data::{ReferenceData, References, load_all};
use crate::error::AppError;
use crate::form::{Field, FormState};

const PROGRESS_TEXT: &str = "Fetching prediction....";

/// Start the TUI.
pub fn run(client: ApiClient) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    terminal
        .draw(|f| {
            let p = Paragraph::new("Loading reference data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, f.area());
        })
        .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;

    let mut app = App::new(client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    None,
    Submit,
    Quit,
}

struct App {
    client: ApiClient,
    refs: References,
    form: FormState,
    selected_field: usize,
    /// Typed input for the selected numeric field, while editing.
    edit_buffer: Option<String>,
    submitting: bool,
    outcome: Option<PredictionOutcome>,
    status: String,
}

impl App {
    fn new(client: ApiClient) -> Self {
        let refs = load_all(&client);
        let status = startup_status(&refs);
        Self {
            client,
            refs,
            form: FormState::default(),
            selected_field: 0,
            edit_buffer: None,
            submitting: false,
            outcome: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        KeyAction::Quit => break,
                        KeyAction::Submit => {
                            // Show the progress line before the blocking request.
                            self.begin_submit();
                            self.redraw(terminal)?;
                            self.finish_submit();
                        }
                        KeyAction::None => {}
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn redraw<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        if self.edit_buffer.is_some() {
            self.handle_edit(code);
            return KeyAction::None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_selected(-1),
            KeyCode::Right => self.adjust_selected(1),
            KeyCode::Enter => {
                let field = self.selected();
                if field == Field::Submit {
                    return KeyAction::Submit;
                }
                if field.is_numeric() {
                    self.edit_buffer = Some(String::new());
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
                } else {
                    self.adjust_selected(1);
                }
            }
            KeyCode::Char('p') => return KeyAction::Submit,
            KeyCode::Char('r') => self.reload_references(),
            _ => {}
        }

        KeyAction::None
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let field = self.selected();
        match code {
            KeyCode::Esc => {
                self.edit_buffer = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let input = self.edit_buffer.take().unwrap_or_default();
                match self.form.set_numeric(field, &input) {
                    Ok(()) => {
                        self.outcome = None;
                        self.status = format!("{}: {}", field.label(), self.form.display_value(field, &self.refs));
                    }
                    Err(err) => {
                        self.status = err.to_string();
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.edit_buffer.as_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                let accepted = c.is_ascii_digit() || (c == '.' && field == Field::Bmi);
                if accepted {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn adjust_selected(&mut self, delta: i32) {
        let field = self.selected();
        if field == Field::Submit {
            return;
        }
        self.form.adjust(field, delta, &self.refs);
        // Any change returns the form to the unsubmitted state.
        self.outcome = None;
        self.status = format!("{}: {}", field.label(), self.form.display_value(field, &self.refs));
    }

    fn reload_references(&mut self) {
        let refs = load_all(&self.client);
        self.form.reselect(&self.refs, &refs);
        self.refs = refs;
        // The old result was computed against the previous options.
        self.outcome = None;
        self.status = startup_status(&self.refs);
    }

    fn begin_submit(&mut self) {
        self.submitting = true;
        self.outcome = None;
        self.status = PROGRESS_TEXT.to_string();
    }

    fn finish_submit(&mut self) {
        let outcome = pipeline::submit(&self.client, &self.form, &self.refs);
        info!(success = outcome.is_success(), "form submission finished");
        self.status = if outcome.is_success() {
            "Prediction received.".to_string()
        } else {
            "Prediction failed.".to_string()
        };
        self.outcome = Some(outcome);
        self.submitting = false;
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(Field::ALL.len() as u16 + 2),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        self.draw_result(frame, chunks[2]);
        self.draw_warnings(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Insurance Charges Prediction",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw("Easily "),
                Span::styled("predict insurance charges", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" based on filling out the form below!"),
            ]),
            Line::from(Span::styled(
                format!("service: {}", self.client.base_url()),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| ListItem::new(self.field_line(field)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("User Details").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn field_line(&self, field: Field) -> Line<'static> {
        let label = format!("{:<22}", field.label());
        let value = match field {
            Field::Submit => return Line::from(Span::styled(
                "[ Predict ]",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Field::Sex => radio(&self.refs.sex, self.form.sex),
            Field::Smoker => radio(&self.refs.smoker, self.form.smoker),
            Field::Region => format!("< {} >", self.form.region.label()),
            _ => match (&self.edit_buffer, field == self.selected()) {
                (Some(buf), true) => format!("{buf}_"),
                _ => self.form.display_value(field, &self.refs),
            },
        };
        Line::from(vec![Span::raw(label), Span::raw(value)])
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (text, style) = if self.submitting {
            (PROGRESS_TEXT.to_string(), Style::default().fg(Color::Yellow))
        } else {
            match &self.outcome {
                Some(outcome @ PredictionOutcome::Success { .. }) => (
                    crate::report::format_outcome(outcome),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Some(PredictionOutcome::Failed { message }) => {
                    (message.clone(), Style::default().fg(Color::Red))
                }
                None => (
                    "Press Enter on Predict (or p) to request a prediction.".to_string(),
                    Style::default().fg(Color::Gray),
                ),
            }
        };

        let p = Paragraph::new(text)
            .style(style)
            .block(Block::default().title("Result").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_warnings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            format!(
                "options: sex {} | smoker {} | region fixed list (service: {})",
                self.refs.sex.source_name(),
                self.refs.smoker.source_name(),
                self.refs.region.source_name(),
            ),
            Style::default().fg(Color::Gray),
        )));
        for warning in self.refs.warnings() {
            lines.push(Line::from(Span::styled(
                warning.to_string(),
                Style::default().fg(Color::Yellow),
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Reference data").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit/submit  p predict  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn startup_status(refs: &References) -> String {
    if refs.warnings().is_empty() {
        "Reference data loaded.".to_string()
    } else {
        "Some reference data unavailable; using defaults.".to_string()
    }
}

/// Radio-style rendering of a choice list, e.g. `(*) Male  ( ) Female`.
fn radio(data: &ReferenceData, selected: usize) -> String {
    if data.entities().is_empty() {
        return "(no options)".to_string();
    }
    data.entities()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mark = if i == selected { "(*)" } else { "( )" };
            format!("{mark} {}", e.label)
        })
        .collect::<Vec<_>>()
        .join("  ")
}
