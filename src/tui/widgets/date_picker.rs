//! Calendar popup for date fields.

use chrono::{Datelike, Days, Months, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::popup_area;

/// Result of a key press inside the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Picked(NaiveDate),
    Closed,
}

/// Open picker state: the day under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    cursor: NaiveDate,
}

impl DatePicker {
    /// Opens the picker on `start`.
    pub fn new(start: NaiveDate) -> Self {
        Self { cursor: start }
    }

    /// Returns the day under the cursor.
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Handles a key while the picker is open. Moves past the calendar range are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        let moved = match key.code {
            KeyCode::Left => self.cursor.checked_sub_days(Days::new(1)),
            KeyCode::Right => self.cursor.checked_add_days(Days::new(1)),
            KeyCode::Up => self.cursor.checked_sub_days(Days::new(7)),
            KeyCode::Down => self.cursor.checked_add_days(Days::new(7)),
            KeyCode::PageUp => self.cursor.checked_sub_months(Months::new(1)),
            KeyCode::PageDown => self.cursor.checked_add_months(Months::new(1)),
            KeyCode::Enter => return PickerOutcome::Picked(self.cursor),
            KeyCode::Esc => return PickerOutcome::Closed,
            _ => None,
        };
        if let Some(day) = moved {
            self.cursor = day;
        }
        PickerOutcome::Pending
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .map_or(31, |next| (next - first).num_days() as u32)
}

/// Builds the week rows of the cursor's month, Monday first.
fn month_grid(cursor: NaiveDate) -> Vec<Line<'static>> {
    let Some(first) = cursor.with_day(1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_monday() as usize;
    let mut lines = Vec::new();
    let mut spans: Vec<Span> = vec![Span::raw("   "); offset];

    for day in 1..=days_in_month(first) {
        let style = if day == cursor.day() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{day:>2}"), style));
        spans.push(Span::raw(" "));
        if (offset + day as usize) % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

/// Renders the picker as a popup over `area`.
#[mutants::skip]
pub fn draw_date_picker(picker: &DatePicker, frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 26, 12);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Pick Date ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [title_area, grid_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let title = Paragraph::new(picker.cursor().format("%B %Y").to_string())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, title_area);

    let mut lines = vec![Line::from(Span::styled(
        "Mo Tu We Th Fr Sa Su",
        Style::default().fg(Color::Cyan),
    ))];
    lines.extend(month_grid(picker.cursor()));
    frame.render_widget(Paragraph::new(lines), grid_area);

    let footer = Paragraph::new("Enter: pick  Esc: close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
