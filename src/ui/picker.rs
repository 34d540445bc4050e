//! Two-month date range picker drawn with ratatui.
//!
//! The shell owns the reference month, one [`SelectionController`] and one
//! [`FocusNavigator`]. It reports commits as [`PickerEvent`]s and draws the
//! highlight the host hands it through [`PickerShell::set_highlight_range`];
//! it never feeds its own emitted ranges back into the highlight.

use crate::calc::dates::{add_months, add_years, short_month_name, weekday_headers};
use crate::calc::selector::{self, YEARS_BEFORE, YEAR_WINDOW};
use crate::calc::{
    generate, CalendarDate, CellContext, DayCell, FocusMove, FocusNavigator, MonthView,
    PickerError, Range, SelectionController,
};
use chrono::{Datelike, Weekday};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

const IN_RANGE_BG: Color = Color::Indexed(24); // muted blue

/// Seven two-character day columns with single-space gaps.
const PANE_WIDTH: u16 = 20;
const PANE_GAP: u16 = 4;
/// Title line plus weekday header above the first week row.
const PANE_HEADER_ROWS: u16 = 2;

/// Construction-time options. Every field has a usable default.
#[derive(Debug, Clone)]
pub struct PickerConfig {
    /// Initially selected day and first reference month; today when `None`.
    pub initial_selected: Option<CalendarDate>,
    pub week_start: Weekday,
    /// Host-controlled highlight at startup.
    pub highlight: Range,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig {
            initial_selected: None,
            week_start: Weekday::Mon,
            highlight: Range::cleared(),
        }
    }
}

/// Notifications for the host. Hosts that ignore them get no-op behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// The anchor opened or closed. The highlight does not follow until the
    /// host passes a range back through `set_highlight_range`.
    RangeChanged(Range),
    DateSelected(CalendarDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectorKind {
    Month,
    Year,
}

#[derive(Debug, Clone)]
struct SelectorState {
    kind: SelectorKind,
    cursor: usize,
    /// Raw value typed while the popup is open; applied instead of the cursor when non-empty.
    typed: String,
}

impl SelectorState {
    fn option_count(&self) -> usize {
        match self.kind {
            SelectorKind::Month => 12,
            SelectorKind::Year => YEAR_WINDOW as usize,
        }
    }
}

pub struct PickerShell {
    reference_month: CalendarDate,
    today: CalendarDate,
    week_start: Weekday,
    selection: SelectionController,
    focus: FocusNavigator,
    highlight: Range,
    /// The day cell holding input focus (the terminal cursor).
    input_focus: Option<CalendarDate>,
    selector: Option<SelectorState>,
    /// Week-row area of each pane from the last draw, for mouse hit-testing.
    pane_rows: [Option<Rect>; 2],
    /// Error from the last rejected input. Cleared on the next keypress.
    status: Option<String>,
}

impl PickerShell {
    pub fn new(config: PickerConfig, today: CalendarDate) -> Self {
        let selected = config.initial_selected.unwrap_or(today);
        let mut shell = PickerShell {
            reference_month: selected,
            today,
            week_start: config.week_start,
            selection: SelectionController::new(selected),
            focus: FocusNavigator::new(),
            highlight: Range::cleared(),
            input_focus: None,
            selector: None,
            pane_rows: [None, None],
            status: None,
        };
        shell.set_highlight_range(config.highlight);
        shell
    }

    pub fn reference_month(&self) -> CalendarDate {
        self.reference_month
    }

    pub fn selected(&self) -> CalendarDate {
        self.selection.selected()
    }

    pub fn anchor(&self) -> Range {
        self.selection.anchor()
    }

    pub fn highlight(&self) -> Range {
        self.highlight
    }

    pub fn focused(&self) -> Option<CalendarDate> {
        self.focus.focused()
    }

    pub fn input_focus(&self) -> Option<CalendarDate> {
        self.input_focus
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn selector_open(&self) -> bool {
        self.selector.is_some()
    }

    /// Replaces the highlight. Only the host calls this.
    pub fn set_highlight_range(&mut self, range: Range) {
        if !range.is_well_formed() {
            tracing::warn!(?range, "highlight range starts after it ends; nothing will be marked");
        }
        self.highlight = range;
    }

    /// The reference month and the month after it.
    pub fn views(&self) -> Result<[MonthView; 2], PickerError> {
        views_for(self.reference_month, self.week_start)
    }

    fn cell_context(&self) -> CellContext {
        CellContext {
            today: self.today,
            selected: Some(self.selection.selected()),
            highlight: self.highlight,
        }
    }

    pub fn step_month(&mut self, delta: i32) -> Result<(), PickerError> {
        let target = add_months(self.reference_month, delta)?;
        self.set_reference(target)
    }

    pub fn step_year(&mut self, delta: i32) -> Result<(), PickerError> {
        let target = add_years(self.reference_month, delta)?;
        self.set_reference(target)
    }

    pub fn reset_to_today(&mut self) -> Result<(), PickerError> {
        self.set_reference(self.today)
    }

    /// Moves to `date` only if both panes can be built for it.
    fn set_reference(&mut self, date: CalendarDate) -> Result<(), PickerError> {
        views_for(date, self.week_start)?;
        tracing::info!(from = %self.reference_month, to = %date, "reference month changed");
        self.reference_month = date;
        self.sync_focus()
    }

    /// Routes a commit through the selection controller.
    pub fn commit(&mut self, date: CalendarDate) -> Vec<PickerEvent> {
        let outcome = self.selection.on_commit(date);
        let mut events = Vec::with_capacity(2);
        if let Some(range) = outcome.range_changed {
            events.push(PickerEvent::RangeChanged(range));
        }
        events.push(PickerEvent::DateSelected(outcome.selected));
        tracing::trace!(anchor = ?outcome.anchor, ?events, "picker commit");
        events
    }

    /// Gives `date`'s cell input focus, as a pointer press or Tab would.
    pub fn focus_day(&mut self, date: CalendarDate) -> Result<(), PickerError> {
        self.input_focus = Some(date);
        self.focus.on_day_focused(date);
        self.sync_focus()
    }

    /// Drops input focus from the grid. The navigator keeps its date.
    pub fn blur(&mut self) {
        self.input_focus = None;
    }

    /// Drops input focus if its cell is gone, then applies any pending focus request.
    fn sync_focus(&mut self) -> Result<(), PickerError> {
        let views = self.views()?;
        if let Some(date) = self.input_focus {
            if !views.iter().any(|view| view.days().contains(&date)) {
                tracing::debug!(%date, "focused cell no longer drawn");
                self.input_focus = None;
            }
        }
        if let Some(request) = self.focus.poll_request(&views, self.input_focus) {
            self.input_focus = Some(request.date);
        }
        Ok(())
    }

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<Vec<PickerEvent>, PickerError> {
        self.status = None;

        // Ctrl/Alt chords are not picker keys; Shift is (P/N).
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Ok(Vec::new());
        }

        if self.selector.is_some() {
            self.handle_selector_key(code)?;
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        match code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                if self.input_focus.is_some() {
                    let mv = match code {
                        KeyCode::Up => FocusMove::Up,
                        KeyCode::Down => FocusMove::Down,
                        KeyCode::Left => FocusMove::Left,
                        _ => FocusMove::Right,
                    };
                    self.focus.on_key(mv)?;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.input_focus.is_some() {
                    if let Some(date) = self.focus.commit_target() {
                        events = self.commit(date);
                    }
                }
            }
            KeyCode::Tab => {
                let target = self.tab_target()?;
                self.focus_day(target)?;
            }
            KeyCode::Esc => self.blur(),
            KeyCode::PageUp | KeyCode::Char('p') => self.step_month(-1)?,
            KeyCode::PageDown | KeyCode::Char('n') => self.step_month(1)?,
            KeyCode::Char('P') => self.step_year(-1)?,
            KeyCode::Char('N') => self.step_year(1)?,
            KeyCode::Char('t') => self.reset_to_today()?,
            KeyCode::Char('m') => self.open_selector(SelectorKind::Month),
            KeyCode::Char('y') => self.open_selector(SelectorKind::Year),
            _ => {}
        }
        self.sync_focus()?;
        Ok(events)
    }

    /// Tab lands on the selected day when it is drawn, otherwise on the 1st of the reference month.
    fn tab_target(&self) -> Result<CalendarDate, PickerError> {
        let selected = self.selection.selected();
        let views = self.views()?;
        if views.iter().any(|view| view.shows_in_month(selected)) {
            Ok(selected)
        } else {
            Ok(views[0].first_of_month())
        }
    }

    /// Left click at a terminal position. Commits the day under the pointer and focuses it.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Result<Vec<PickerEvent>, PickerError> {
        if self.selector.is_some() {
            return Ok(Vec::new());
        }
        let Some(date) = self.day_at(column, row)? else {
            return Ok(Vec::new());
        };
        self.status = None;
        self.focus_day(date)?;
        Ok(self.commit(date))
    }

    fn day_at(&self, column: u16, row: u16) -> Result<Option<CalendarDate>, PickerError> {
        let views = self.views()?;
        for (view, rows) in views.iter().zip(self.pane_rows.iter()) {
            let Some(rows) = rows else { continue };
            if row < rows.y || row >= rows.y + rows.height {
                continue;
            }
            if column < rows.x || column >= rows.x + PANE_WIDTH {
                continue;
            }
            let offset = column - rows.x;
            if offset % 3 == 2 {
                return Ok(None);
            }
            let index = (row - rows.y) as usize * 7 + (offset / 3) as usize;
            return Ok(view.days().get(index).copied());
        }
        Ok(None)
    }

    // ── Month / year selector ───────────────────────────────────────────────

    fn open_selector(&mut self, kind: SelectorKind) {
        let cursor = match kind {
            SelectorKind::Month => self.reference_month.month0() as usize,
            SelectorKind::Year => YEARS_BEFORE as usize,
        };
        self.selector = Some(SelectorState {
            kind,
            cursor,
            typed: String::new(),
        });
    }

    fn handle_selector_key(&mut self, code: KeyCode) -> Result<(), PickerError> {
        let Some(sel) = self.selector.as_mut() else {
            return Ok(());
        };
        match code {
            KeyCode::Up => sel.cursor = sel.cursor.saturating_sub(1),
            KeyCode::Down => {
                if sel.cursor + 1 < sel.option_count() {
                    sel.cursor += 1;
                }
            }
            KeyCode::Char(c) => sel.typed.push(c),
            KeyCode::Backspace => {
                sel.typed.pop();
            }
            KeyCode::Esc => self.selector = None,
            KeyCode::Enter => {
                if let Some(sel) = self.selector.take() {
                    self.apply_selector(&sel)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_selector(&mut self, sel: &SelectorState) -> Result<(), PickerError> {
        let reference = self.reference_month;
        let chosen = match (sel.kind, sel.typed.is_empty()) {
            (SelectorKind::Month, true) => selector::select_month(sel.cursor as u32, reference),
            (SelectorKind::Month, false) => selector::apply_month_input(&sel.typed, reference),
            (SelectorKind::Year, true) => match selector::year_options(reference).get(sel.cursor) {
                Some(&year) => selector::select_year(year, reference),
                None => Ok(reference),
            },
            (SelectorKind::Year, false) => selector::apply_year_input(&sel.typed, reference),
        };
        if let Err(err) = chosen.and_then(|date| self.set_reference(date)) {
            tracing::warn!(error = %err, "selector input rejected");
            self.status = Some(err.to_string());
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let views = match self.views() {
            Ok(views) => views,
            Err(err) => {
                f.render_widget(Paragraph::new(err.to_string()), area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(PANE_HEADER_ROWS + 6), // title, weekdays, up to six weeks
                Constraint::Length(1),                    // controls
                Constraint::Length(1),                    // status
            ])
            .split(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(PANE_WIDTH),
                Constraint::Length(PANE_GAP),
                Constraint::Length(PANE_WIDTH),
                Constraint::Min(0),
            ])
            .split(chunks[0]);
        let pane_rects = [panes[0], panes[2]];

        let ctx = self.cell_context();
        for (i, view) in views.iter().enumerate() {
            let title = if i == 0 {
                self.selector_header(view)
            } else {
                Line::from(Span::styled(
                    format!(
                        "{:^20}",
                        format!("{} {}", short_month_name(view.month()), view.year())
                    ),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            };
            let mut lines = vec![title, Line::from(weekday_headers(view.week_start()).join(" "))];
            for week in view.cells(&ctx).chunks(7) {
                let mut spans = Vec::with_capacity(14);
                for (col, cell) in week.iter().enumerate() {
                    let focused_here = self.input_focus == Some(cell.date)
                        && self.draws_focus_in(i, &views, cell.date);
                    spans.push(Span::styled(
                        format!("{:>2}", cell.label()),
                        day_cell_style(cell, focused_here),
                    ));
                    if col < 6 {
                        spans.push(Span::raw(" "));
                    }
                }
                lines.push(Line::from(spans));
            }

            let rect = pane_rects[i];
            self.pane_rows[i] = Some(Rect {
                x: rect.x,
                y: rect.y + PANE_HEADER_ROWS,
                width: rect.width,
                height: (view.len() / 7) as u16,
            });
            f.render_widget(Paragraph::new(lines), rect);
        }

        let mut hints = vec![Span::styled(
            "PgUp/p prev   t today   PgDn/n next   P/N year",
            Style::default().fg(Color::DarkGray),
        )];
        // Text only; the open end never feeds the highlight.
        if let (Some(start), None) = (self.anchor().start, self.anchor().end) {
            hints.push(Span::styled(
                format!("   from {} {}", start.day(), short_month_name(start.month())),
                Style::default().fg(Color::Yellow),
            ));
        }
        let controls = Paragraph::new(Line::from(hints));
        f.render_widget(controls, chunks[1]);

        if let Some(msg) = &self.status {
            f.render_widget(
                Paragraph::new(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
                chunks[2],
            );
        }

        if let Some(sel) = &self.selector {
            render_selector_popup(f, pane_rects[0], sel, self.reference_month);
        }
    }

    /// The input-focus marker goes on the in-month copy of a date when both panes show it.
    fn draws_focus_in(&self, pane: usize, views: &[MonthView; 2], date: CalendarDate) -> bool {
        match views.iter().position(|view| view.shows_in_month(date)) {
            Some(owner) => owner == pane,
            None => views.iter().position(|view| view.days().contains(&date)) == Some(pane),
        }
    }

    fn selector_header(&self, view: &MonthView) -> Line<'static> {
        let open = |kind| self.selector.as_ref().is_some_and(|s| s.kind == kind);
        let style_for = |active: bool| {
            if active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            }
        };
        Line::from(vec![
            Span::styled(
                format!("[{} ▾]", short_month_name(view.month())),
                style_for(open(SelectorKind::Month)),
            ),
            Span::raw(" "),
            Span::styled(format!("[{} ▾]", view.year()), style_for(open(SelectorKind::Year))),
        ])
    }
}

fn views_for(reference: CalendarDate, week_start: Weekday) -> Result<[MonthView; 2], PickerError> {
    let next = add_months(reference, 1)?;
    Ok([generate(reference, week_start)?, generate(next, week_start)?])
}

fn render_selector_popup(
    f: &mut Frame,
    anchor: Rect,
    sel: &SelectorState,
    reference: CalendarDate,
) {
    let rows: Vec<Row> = match sel.kind {
        SelectorKind::Month => selector::month_options()
            .into_iter()
            .map(|opt| {
                Row::new(vec![
                    Cell::from(format!("{:>2}", opt.index)),
                    Cell::from(opt.label),
                ])
            })
            .collect(),
        SelectorKind::Year => selector::year_options(reference)
            .into_iter()
            .enumerate()
            .map(|(i, year)| {
                Row::new(vec![
                    Cell::from(format!("{:>2}", i)),
                    Cell::from(year.to_string()),
                ])
            })
            .collect(),
    };
    let title = match (sel.kind, sel.typed.is_empty()) {
        (SelectorKind::Month, true) => " Month ".to_string(),
        (SelectorKind::Year, true) => " Year ".to_string(),
        (_, false) => format!(" > {}_ ", sel.typed),
    };

    let height = (rows.len() as u16 + 2).min(anchor.height.saturating_add(4));
    let popup = Rect {
        x: anchor.x,
        y: anchor.y + 1,
        width: 14.min(anchor.width),
        height,
    }
    .intersection(f.area());

    let mut state = TableState::default();
    state.select(Some(sel.cursor));
    let table = Table::new(rows, [Constraint::Length(3), Constraint::Length(6)])
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(Clear, popup);
    f.render_stateful_widget(table, popup, &mut state);
}

/// Maps the five cell flags onto a style, plus the input-focus marker.
pub(crate) fn day_cell_style(cell: &DayCell, has_input_focus: bool) -> Style {
    let mut style = Style::default();
    if cell.is_outside_displayed_month {
        style = style.fg(Color::DarkGray);
    } else if cell.is_weekend {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.is_in_highlight_range {
        style = style.bg(IN_RANGE_BG);
    }
    if cell.is_selected {
        style = style.fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD);
    }
    if cell.is_today {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if has_input_focus {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}
