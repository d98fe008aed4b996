//! Full-screen browser for stored objectives
//!
//! Three filter selectors (area, status, responsible) over a scrolling
//! table. `e` writes the filtered view to an Excel file.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use std::io;
use std::path::PathBuf;

use crate::model::ObjectiveTable;
use crate::report::{DisplayTable, FilterOptions, ObjectiveFilter, Summary};

const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Area,
    Status,
    Responsible,
}

impl FilterField {
    fn next(self) -> Self {
        match self {
            FilterField::Area => FilterField::Status,
            FilterField::Status => FilterField::Responsible,
            FilterField::Responsible => FilterField::Area,
        }
    }

    fn title(self) -> &'static str {
        match self {
            FilterField::Area => "Area",
            FilterField::Status => "Status",
            FilterField::Responsible => "Responsible",
        }
    }
}

/// Selector over one filter's options; index 0 means "all"
#[derive(Debug, Clone, Default)]
struct Selector {
    options: Vec<String>,
    selected: usize,
}

impl Selector {
    fn new(options: Vec<String>) -> Self {
        Self { options, selected: 0 }
    }

    fn step(&mut self, forward: bool) {
        let count = self.options.len() + 1;
        self.selected = if forward {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    fn value(&self) -> Option<String> {
        match self.selected {
            0 => None,
            n => self.options.get(n - 1).cloned(),
        }
    }

    fn label(&self) -> &str {
        match self.selected {
            0 => ALL,
            n => self.options.get(n - 1).map_or(ALL, String::as_str),
        }
    }
}

/// Browser state, independent of the terminal
pub struct BrowserState {
    table: ObjectiveTable,
    area: Selector,
    status: Selector,
    responsible: Selector,
    focus: FilterField,
    view: DisplayTable,
    filtered_count: usize,
    table_state: TableState,
    message: Option<String>,
}

impl BrowserState {
    pub fn new(table: ObjectiveTable) -> Self {
        let options = FilterOptions::from_table(&table);
        let mut state = Self {
            area: Selector::new(options.areas),
            status: Selector::new(options.statuses),
            responsible: Selector::new(options.responsibles),
            table,
            focus: FilterField::Area,
            view: DisplayTable::default(),
            filtered_count: 0,
            table_state: TableState::default(),
            message: None,
        };
        state.refresh();
        state
    }

    pub fn filter(&self) -> ObjectiveFilter {
        ObjectiveFilter {
            area: self.area.value(),
            status: self.status.value(),
            responsible: self.responsible.value(),
        }
    }

    pub fn view(&self) -> &DisplayTable {
        &self.view
    }

    pub fn focus(&self) -> FilterField {
        self.focus
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move the focused selector to its next/previous option
    pub fn step_filter(&mut self, forward: bool) {
        match self.focus {
            FilterField::Area => self.area.step(forward),
            FilterField::Status => self.status.step(forward),
            FilterField::Responsible => self.responsible.step(forward),
        }
        self.refresh();
    }

    pub fn scroll(&mut self, down: bool) {
        if self.view.is_empty() {
            return;
        }
        let last = self.view.len() - 1;
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(last)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn refresh(&mut self) {
        let filtered = self.filter().apply(&self.table);
        self.filtered_count = filtered.len();
        self.view = DisplayTable::project(&filtered);
        self.table_state
            .select(if self.view.is_empty() { None } else { Some(0) });
    }

    fn selector(&self, field: FilterField) -> &Selector {
        match field {
            FilterField::Area => &self.area,
            FilterField::Status => &self.status,
            FilterField::Responsible => &self.responsible,
        }
    }
}

/// Run the browser until the user quits. `export` receives the filtered
/// view and returns the path it was written to.
pub fn run_browser<E>(table: ObjectiveTable, mut export: E) -> Result<()>
where
    E: FnMut(&DisplayTable) -> Result<PathBuf>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, BrowserState::new(table), &mut export);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<E>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: BrowserState,
    export: &mut E,
) -> Result<()>
where
    E: FnMut(&DisplayTable) -> Result<PathBuf>,
{
    loop {
        terminal.draw(|f| render(f, &mut state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => state.cycle_focus(),
                KeyCode::Right => state.step_filter(true),
                KeyCode::Left => state.step_filter(false),
                KeyCode::Down => state.scroll(true),
                KeyCode::Up => state.scroll(false),
                KeyCode::Char('e') => {
                    if state.view().is_empty() {
                        state.set_message("No objectives match the current filters");
                    } else {
                        match export(state.view()) {
                            Ok(path) => state.set_message(format!("Exported to {}", path.display())),
                            Err(e) => state.set_message(format!("Export failed: {:#}", e)),
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn render(f: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let summary = Summary::from_table(&state.table);
    let title = Paragraph::new(format!(
        "Objectives {}  ·  Areas {}  ·  Responsibles {}  ·  Active {}",
        summary.total, summary.areas, summary.responsibles, summary.active
    ))
    .style(Style::default().fg(Color::Cyan))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Productivity objectives"));
    f.render_widget(title, chunks[0]);

    let filters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    for (i, field) in [FilterField::Area, FilterField::Status, FilterField::Responsible]
        .into_iter()
        .enumerate()
    {
        let focused = state.focus() == field;
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("◀ "),
            Span::styled(state.selector(field).label().to_string(), style),
            Span::raw(" ▶"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(field.title()));
        f.render_widget(selector, filters[i]);
    }

    let header = Row::new(
        state
            .view
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(Style::default().add_modifier(Modifier::BOLD))),
    );
    let rows = state
        .view
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|c| Cell::from(c.clone()))));
    let widths: Vec<Constraint> = state
        .view
        .headers
        .iter()
        .map(|h| match h.as_str() {
            "Objetivo" => Constraint::Percentage(30),
            "Fecha" => Constraint::Length(16),
            _ => Constraint::Fill(1),
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Objectives found ({})", state.filtered_count)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");
    f.render_stateful_widget(table, chunks[2], &mut state.table_state);

    let footer_text = state.message.clone().unwrap_or_else(|| {
        "Tab: next filter  ←/→: change value  ↑/↓: scroll  e: export to Excel  q/Esc: quit".to_string()
    });
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectiveRecord;

    fn record(area: &str, status: &str, responsible: &str) -> ObjectiveRecord {
        ObjectiveRecord {
            timestamp: "2024-03-01 10:00:00".into(),
            area: area.into(),
            objective: "Mejorar".into(),
            responsible: responsible.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    fn state() -> BrowserState {
        BrowserState::new(ObjectiveTable::with_all_columns(vec![
            record("HACIENDA", "ACTIVO", "Ana"),
            record("URBANISMO", "ACTIVO", "Luis"),
            record("HACIENDA", "CERRADO", "Luis"),
        ]))
    }

    #[test]
    fn test_starts_unfiltered() {
        let state = state();
        assert!(state.filter().is_empty());
        assert_eq!(state.view().len(), 3);
    }

    #[test]
    fn test_stepping_filters_narrows_view() {
        let mut state = state();
        state.step_filter(true);
        assert_eq!(state.filter().area.as_deref(), Some("HACIENDA"));
        assert_eq!(state.view().len(), 2);

        state.cycle_focus();
        state.step_filter(false);
        assert_eq!(state.filter().status.as_deref(), Some("CERRADO"));
        assert_eq!(state.view().len(), 1);
    }

    #[test]
    fn test_selector_wraps_back_to_all() {
        let mut state = state();
        state.step_filter(true);
        state.step_filter(true);
        state.step_filter(true);
        assert!(state.filter().area.is_none());
        assert_eq!(state.focus(), FilterField::Area);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = state();
        state.scroll(false);
        assert_eq!(state.table_state.selected(), Some(0));
        for _ in 0..10 {
            state.scroll(true);
        }
        assert_eq!(state.table_state.selected(), Some(2));
    }
}
