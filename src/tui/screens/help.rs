//! Help screen: the key bindings of whichever screen opened it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::action::Action;
use crate::tui::app::Screen;

/// Lines moved by PgUp/PgDn.
const PAGE: u16 = 10;

/// A titled group of key bindings.
struct KeyGroup {
    title: &'static str,
    bindings: &'static [(&'static str, &'static str)],
}

const TRIP_LIST: KeyGroup = KeyGroup {
    title: "Trip List",
    bindings: &[
        ("↑/↓", "navigate"),
        ("n", "new trip"),
        ("r", "reload trips"),
        ("q / Esc", "quit"),
        ("F1", "help"),
    ],
};

const TRIP_CREATE: KeyGroup = KeyGroup {
    title: "Create Trip",
    bindings: &[
        ("Tab / Shift-Tab", "next / prev field"),
        ("↑/↓", "prev / next field"),
        ("Space / Enter", "toggle checkbox, open route or date picker"),
        ("Enter", "in a text field: next field"),
        ("Ctrl+S", "save trip"),
        ("Esc", "cancel, back to trip list"),
        ("F1", "help"),
    ],
};

const ROUTE_SELECT: KeyGroup = KeyGroup {
    title: "Route Selector",
    bindings: &[
        ("type", "filter routes by name"),
        ("↑/↓", "move highlight"),
        ("Enter", "choose route"),
        ("Esc", "close without choosing"),
    ],
};

const DATE_PICKER: KeyGroup = KeyGroup {
    title: "Date Picker",
    bindings: &[
        ("←/→", "previous / next day"),
        ("↑/↓", "previous / next week"),
        ("PgUp / PgDn", "previous / next month"),
        ("Enter", "confirm date"),
        ("Esc", "close without choosing"),
    ],
};

const HELP: KeyGroup = KeyGroup {
    title: "Help",
    bindings: &[
        ("↑/↓", "scroll"),
        ("PgUp / PgDn", "scroll a page"),
        ("Home", "top"),
        ("q / Esc", "back"),
    ],
};

fn groups(origin: Screen) -> &'static [KeyGroup] {
    match origin {
        Screen::TripList => &[TRIP_LIST],
        Screen::TripCreate => &[TRIP_CREATE, ROUTE_SELECT, DATE_PICKER],
        Screen::Help => &[HELP],
    }
}

fn origin_title(origin: Screen) -> &'static str {
    match origin {
        Screen::TripList => "Trip List",
        Screen::TripCreate => "Create Trip",
        Screen::Help => "Help",
    }
}

fn help_lines(origin: Screen) -> Vec<Line<'static>> {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);

    groups(origin)
        .iter()
        .flat_map(|group| {
            let heading = [
                Line::from(""),
                Line::from(Span::styled(group.title, title_style)),
            ];
            let rows = group.bindings.iter().map(move |(key, what)| {
                Line::from(vec![
                    Span::styled(format!("  {key:<20}"), key_style),
                    Span::raw(*what),
                ])
            });
            heading.into_iter().chain(rows)
        })
        .collect()
}

/// Which bindings are shown and how far they are scrolled.
#[derive(Debug, Clone)]
pub struct HelpState {
    origin: Screen,
    scroll: u16,
}

impl Default for HelpState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpState {
    pub fn new() -> Self {
        Self {
            origin: Screen::TripList,
            scroll: 0,
        }
    }

    /// Shows the bindings of `origin` from the top.
    pub fn open(&mut self, origin: Screen) {
        self.origin = origin;
        self.scroll = 0;
    }

    /// The screen help returns to.
    pub fn origin(&self) -> Screen {
        self.origin
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn max_scroll(&self) -> u16 {
        let len = help_lines(self.origin).len();
        u16::try_from(len.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let scroll = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Navigate(self.origin),
            KeyCode::Up => self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll.saturating_add(PAGE),
            KeyCode::Home => 0,
            _ => return Action::None,
        };
        self.scroll = scroll.min(self.max_scroll());
        Action::None
    }
}

/// Renders the help screen.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Help: {} ", origin_title(state.origin())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let [body, hint] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(block.inner(area));
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(help_lines(state.origin())).scroll((state.scroll(), 0)),
        body,
    );
    frame.render_widget(
        Paragraph::new("↑/↓ PgUp/PgDn: scroll  q/Esc: back")
            .style(Style::default().fg(Color::DarkGray)),
        hint,
    );
}
