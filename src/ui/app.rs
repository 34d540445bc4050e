use crate::calc::{CalendarDate, PickerError, Range};
use crate::data::PickerSettings;
use crate::ui::picker::{PickerConfig, PickerEvent, PickerShell};
use anyhow::Result;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration as StdDuration;

/// Host around the picker: owns the highlight range and decides whether
/// emitted ranges come back as the highlight.
pub struct App {
    shell: PickerShell,
    range: Range,
    settings: PickerSettings,
    last_selected: Option<CalendarDate>,
}

impl App {
    pub fn new(settings: PickerSettings, saved: Range, today: CalendarDate) -> Result<Self> {
        let config = PickerConfig {
            week_start: settings.week_start()?,
            highlight: saved,
            ..PickerConfig::default()
        };
        Ok(App {
            shell: PickerShell::new(config, today),
            range: saved,
            settings,
            last_selected: None,
        })
    }

    /// The range the host currently holds.
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn last_selected(&self) -> Option<CalendarDate> {
        self.last_selected
    }

    pub fn shell(&self) -> &PickerShell {
        &self.shell
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if !self.shell.selector_open() {
            match code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
                KeyCode::Char('c') => {
                    self.clear();
                    return false;
                }
                _ => {}
            }
        }
        let result = self.shell.handle_key(code, modifiers);
        self.absorb(result);
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let result = self.shell.handle_click(mouse.column, mouse.row);
            self.absorb(result);
        }
    }

    fn absorb(&mut self, result: Result<Vec<PickerEvent>, PickerError>) {
        match result {
            Ok(events) => self.apply(events),
            Err(err) => {
                tracing::warn!(error = %err, "picker rejected input");
                self.shell.set_status(err.to_string());
            }
        }
    }

    fn apply(&mut self, events: Vec<PickerEvent>) {
        for event in events {
            match event {
                PickerEvent::RangeChanged(range) => {
                    tracing::info!(?range, "range changed");
                    if self.settings.follow_emitted_range {
                        self.range = range;
                        self.shell.set_highlight_range(range);
                    }
                }
                PickerEvent::DateSelected(date) => {
                    tracing::info!(%date, "date selected");
                    self.last_selected = Some(date);
                }
            }
        }
    }

    /// Drops the host range. The picker's own anchor is untouched.
    pub fn clear(&mut self) {
        tracing::info!("range cleared");
        self.range = Range::cleared();
        self.shell.set_highlight_range(self.range);
    }

    pub fn render(&mut self, f: &mut Frame) {
        let size = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(12), // picker: 10 rows + borders
                Constraint::Length(3),  // readout
                Constraint::Min(6),     // help table
            ])
            .split(size);

        let block = Block::default().borders(Borders::ALL).title(" Date Range ");
        let inner = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);
        self.shell.render(f, inner);

        let readout = self.range.display_with(&self.settings.date_format);
        let selected = self
            .last_selected
            .map(|d| d.format(&self.settings.date_format).to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = Line::from(vec![
            Span::styled("Range: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(readout),
            Span::raw("    "),
            Span::styled("Last: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(selected),
        ]);
        if let Some(focused) = self.shell.focused() {
            line.push_span(Span::raw("    "));
            line.push_span(Span::styled("Focus: ", Style::default().add_modifier(Modifier::BOLD)));
            line.push_span(Span::raw(focused.format(&self.settings.date_format).to_string()));
        }
        f.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );

        let key_rows: Vec<Row> = vec![
            Row::new(vec!["Tab", "Focus grid", "Esc", "Leave grid"]),
            Row::new(vec!["← → ↑ ↓", "Move focus", "Enter/Space", "Pick day"]),
            Row::new(vec!["PgUp / p", "Prev month", "PgDn / n", "Next month"]),
            Row::new(vec!["P / N", "Prev/next year", "m / y", "Pick month/year"]),
            Row::new(vec!["t", "Today", "c", "Clear range"]),
            Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
        ];
        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(10),
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(16),
            ],
        )
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);
        f.render_widget(help_table, chunks[2]);
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}
