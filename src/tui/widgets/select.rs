//! Searchable route selector popup.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use super::popup_area;
use crate::model::{Route, filter_routes};

/// Result of a key press inside the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Still open.
    Pending,
    /// The user chose a route.
    Chosen(Route),
    /// Dismissed without choosing.
    Closed,
}

/// Open selector state: the search text and the highlighted option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSelect {
    query: String,
    highlighted: usize,
}

impl RouteSelect {
    /// Opens with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens with `query` already typed.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            highlighted: 0,
        }
    }

    /// Returns the search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the highlighted index into [`options`](Self::options).
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Routes matching the current query.
    pub fn options<'a>(&self, routes: &'a [Route]) -> Vec<&'a Route> {
        filter_routes(routes, &self.query)
    }

    /// Handles a key while the selector is open.
    pub fn handle_key(&mut self, key: KeyEvent, routes: &[Route]) -> SelectOutcome {
        match key.code {
            KeyCode::Up => {
                self.highlighted = self.highlighted.saturating_sub(1);
                SelectOutcome::Pending
            }
            KeyCode::Down => {
                let count = self.options(routes).len();
                if self.highlighted + 1 < count {
                    self.highlighted += 1;
                }
                SelectOutcome::Pending
            }
            KeyCode::Enter => self
                .options(routes)
                .get(self.highlighted)
                .map_or(SelectOutcome::Pending, |r| {
                    SelectOutcome::Chosen((*r).clone())
                }),
            KeyCode::Esc => SelectOutcome::Closed,
            KeyCode::Backspace => {
                self.query.pop();
                self.highlighted = 0;
                SelectOutcome::Pending
            }
            KeyCode::Char(ch) => {
                self.query.push(ch);
                self.highlighted = 0;
                SelectOutcome::Pending
            }
            _ => SelectOutcome::Pending,
        }
    }
}

/// Renders the selector as a popup over `area`.
#[mutants::skip]
pub fn draw_route_select(
    select: &RouteSelect,
    routes: &[Route],
    current: Option<&Route>,
    frame: &mut Frame,
    area: Rect,
) {
    let popup = popup_area(area, 50, 14);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Select Route ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [search_area, list_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let search = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::raw(select.query()),
        Span::styled(
            "\u{2588}",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);
    frame.render_widget(Paragraph::new(search), search_area);

    let options = select.options(routes);
    if options.is_empty() {
        let empty = Paragraph::new("No routes").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
    } else {
        let items: Vec<ListItem> = options
            .iter()
            .map(|r| {
                let marker = if current.is_some_and(|c| c.id == r.id) {
                    "\u{2713} "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{}", r.name))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow));
        let mut state = ListState::default().with_selected(Some(select.highlighted()));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    let footer = Paragraph::new("type: filter  \u{2191}/\u{2193}: move  Enter: choose  Esc: close")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::model::RouteId;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn routes() -> Vec<Route> {
        vec![
            Route {
                id: RouteId::Number(1),
                name: "Airport Express".into(),
            },
            Route {
                id: RouteId::Number(2),
                name: "Harbor Loop".into(),
            },
            Route {
                id: RouteId::Number(3),
                name: "Airport Night".into(),
            },
        ]
    }

    mod navigation {
        use super::*;

        #[test]
        fn down_and_up_move_highlight() {
            let mut select = RouteSelect::new();
            select.handle_key(press(KeyCode::Down), &routes());
            select.handle_key(press(KeyCode::Down), &routes());
            assert_eq!(select.highlighted(), 2);
            select.handle_key(press(KeyCode::Up), &routes());
            assert_eq!(select.highlighted(), 1);
        }

        #[test]
        fn highlight_stops_at_ends() {
            let mut select = RouteSelect::new();
            select.handle_key(press(KeyCode::Up), &routes());
            assert_eq!(select.highlighted(), 0);
            for _ in 0..5 {
                select.handle_key(press(KeyCode::Down), &routes());
            }
            assert_eq!(select.highlighted(), 2);
        }

        #[test]
        fn esc_closes() {
            let mut select = RouteSelect::new();
            assert_eq!(
                select.handle_key(press(KeyCode::Esc), &routes()),
                SelectOutcome::Closed
            );
        }
    }

    mod search {
        use super::*;

        #[test]
        fn typing_filters_and_resets_highlight() {
            let mut select = RouteSelect::new();
            let all = routes();
            select.handle_key(press(KeyCode::Down), &all);
            for ch in "airport".chars() {
                select.handle_key(press(KeyCode::Char(ch)), &all);
            }
            assert_eq!(select.highlighted(), 0);
            let names: Vec<&str> = select
                .options(&all)
                .iter()
                .map(|r| r.name.as_str())
                .collect();
            assert_eq!(names, vec!["Airport Express", "Airport Night"]);
        }

        #[test]
        fn backspace_widens_filter() {
            let mut select = RouteSelect::with_query("harbx");
            let routes = routes();
            assert!(select.options(&routes).is_empty());
            select.handle_key(press(KeyCode::Backspace), &routes);
            assert_eq!(select.query(), "harb");
            assert_eq!(select.options(&routes).len(), 1);
        }
    }

    mod choosing {
        use super::*;

        #[test]
        fn enter_chooses_highlighted_filtered_option() {
            let mut select = RouteSelect::with_query("night");
            let outcome = select.handle_key(press(KeyCode::Enter), &routes());
            match outcome {
                SelectOutcome::Chosen(route) => assert_eq!(route.id, RouteId::Number(3)),
                other => panic!("expected Chosen, got {other:?}"),
            }
        }

        #[test]
        fn enter_with_no_options_stays_open() {
            let mut select = RouteSelect::new();
            assert_eq!(
                select.handle_key(press(KeyCode::Enter), &[]),
                SelectOutcome::Pending
            );
        }

        #[test]
        fn single_fetched_route_is_the_only_option() {
            let routes = vec![Route {
                id: RouteId::Number(1),
                name: "A".into(),
            }];
            let select = RouteSelect::new();
            assert_eq!(select.options(&routes), vec![&routes[0]]);
        }
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        fn render(select: &RouteSelect, routes: &[Route]) -> String {
            let backend = TestBackend::new(70, 20);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_route_select(select, routes, None, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        #[test]
        fn renders_options() {
            let output = render(&RouteSelect::new(), &routes());
            assert!(output.contains("Select Route"));
            assert!(output.contains("Airport Express"));
            assert!(output.contains("Harbor Loop"));
        }

        #[test]
        fn renders_empty_message() {
            let output = render(&RouteSelect::new(), &[]);
            assert!(output.contains("No routes"));
        }
    }
}
