//! Trip list screen: existing trips and the entry point to the create form.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::model::{FieldConfig, FieldWidget, TRIP_ID_KEY, TripRecord};
use crate::tui::action::Action;
use crate::tui::app::Screen;

/// Columns shown after the identifier.
const EXTRA_COLUMNS: usize = 4;

/// A table column: JSON property and header text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    key: String,
    header: String,
}

/// State for the trip list screen.
#[derive(Debug, Clone)]
pub struct TripListState {
    trips: Vec<TripRecord>,
    /// Index of the highlighted trip, or `None` if the list is empty.
    selected: Option<usize>,
    columns: Vec<Column>,
    loading: bool,
    error: Option<String>,
}

impl TripListState {
    /// Creates an empty list whose columns follow the form layout, skipping
    /// the identifier field and the route relation.
    pub fn new(config: &FieldConfig) -> Self {
        let mut columns = vec![Column {
            key: TRIP_ID_KEY.to_string(),
            header: "Id".to_string(),
        }];
        columns.extend(
            config
                .fields()
                .filter(|f| {
                    !matches!(f.widget(), FieldWidget::ReadOnly | FieldWidget::RouteSelect)
                })
                .take(EXTRA_COLUMNS)
                .map(|f| Column {
                    key: f.key.clone(),
                    header: f.label.clone(),
                }),
        );
        Self {
            trips: Vec::new(),
            selected: None,
            columns,
            loading: false,
            error: None,
        }
    }

    /// Marks a fetch as in flight.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Applies a finished fetch.
    pub fn set_trips(&mut self, result: Result<Vec<TripRecord>, String>) {
        self.loading = false;
        match result {
            Ok(trips) => {
                self.selected = if trips.is_empty() { None } else { Some(0) };
                self.trips = trips;
                self.error = None;
            }
            Err(e) => self.error = Some(format!("Could not load trips: {e}")),
        }
    }

    /// Returns the loaded trips.
    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    /// Returns the selected index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the last load error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.selected = match self.selected {
                    Some(i) if i > 0 => Some(i - 1),
                    other => other,
                };
                Action::None
            }
            KeyCode::Down => {
                self.selected = match self.selected {
                    Some(i) if i + 1 < self.trips.len() => Some(i + 1),
                    other => other,
                };
                Action::None
            }
            KeyCode::Char('n') => Action::Navigate(Screen::TripCreate),
            KeyCode::Char('r') => Action::ReloadTrips,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }
}

/// Renders the trip list screen.
#[mutants::skip]
pub fn draw_trip_list(state: &TripListState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Trips ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    if state.trips().is_empty() {
        let message = if state.is_loading() {
            "Loading trips..."
        } else {
            "No trips found. Press 'n' to create one."
        };
        let lines = vec![Line::from(""), Line::from(message)];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            table_area,
        );
    } else {
        let header = Row::new(state.columns.iter().map(|c| c.header.clone()))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows: Vec<Row> = state
            .trips()
            .iter()
            .enumerate()
            .map(|(i, trip)| {
                let style = if state.selected() == Some(i) {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(state.columns.iter().map(|c| trip.column(&c.key))).style(style)
            })
            .collect();
        let widths = vec![Constraint::Fill(1); state.columns.len()];
        frame.render_widget(Table::new(rows, widths).header(header), table_area);
    }

    let footer = Paragraph::new("n: new trip  r: reload  q: quit  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if let Some(err) = state.error() {
        let err_line = Paragraph::new(err)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(err_line, footer_area);
    }
}
