//! Trip creation screen: a configuration-driven form posted as a new trip.

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::debug;

use crate::model::{
    FieldConfig, FieldValue, FieldWidget, FormData, InputType, Route, check_validity,
    find_route, format_timestamp, parse_timestamp,
};
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::{
    DatePicker, FieldForm, PickerOutcome, RouteSelect, SelectOutcome, draw_date_picker,
    draw_field_form, draw_route_select,
};

/// A popup editor open over the form.
#[derive(Debug, Clone)]
enum Popup {
    Route(RouteSelect),
    Date(DatePicker),
}

/// State for the trip creation screen.
#[derive(Debug, Clone)]
pub struct TripCreateState {
    form: FieldForm,
    data: FormData,
    routes: Vec<Route>,
    popup: Option<Popup>,
    visit: u64,
}

impl TripCreateState {
    /// Creates an empty form laid out by `config`.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            form: FieldForm::new(config),
            data: FormData::new(),
            routes: Vec::new(),
            popup: None,
            visit: 0,
        }
    }

    /// Starts a fresh visit: discards the draft, the loaded routes and any popup.
    pub fn reset(&mut self, visit: u64) {
        self.form.reset();
        self.data = FormData::new();
        self.routes.clear();
        self.popup = None;
        self.visit = visit;
    }

    /// Returns the current visit number.
    pub fn visit(&self) -> u64 {
        self.visit
    }

    /// Stores routes fetched for `visit`. Results for an earlier visit are dropped.
    pub fn set_routes(&mut self, visit: u64, routes: Vec<Route>) -> bool {
        if visit != self.visit {
            return false;
        }
        self.routes = routes;
        true
    }

    /// Returns the loaded routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the draft.
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Returns the form for rendering.
    pub fn form(&self) -> &FieldForm {
        &self.form
    }

    /// Returns the open route selector, if any.
    pub fn route_select(&self) -> Option<&RouteSelect> {
        match &self.popup {
            Some(Popup::Route(select)) => Some(select),
            _ => None,
        }
    }

    /// Returns the open date picker, if any.
    pub fn date_picker(&self) -> Option<&DatePicker> {
        match &self.popup {
            Some(Popup::Date(picker)) => Some(picker),
            _ => None,
        }
    }

    /// Stores `value` under `key`; every other key is left as it was.
    pub fn handle_change(&mut self, key: impl Into<String>, value: FieldValue) {
        self.data.set(key, value);
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.popup.is_some() {
            self.handle_popup_key(key);
            return Action::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => self.submit(),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Esc => Action::Navigate(Screen::TripList),
            _ => {
                self.handle_field_key(key);
                Action::None
            }
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        let Some(field) = self.form.focused().map(|f| f.key.clone()) else {
            self.popup = None;
            return;
        };
        let value = match &mut self.popup {
            Some(Popup::Route(select)) => match select.handle_key(key, &self.routes) {
                SelectOutcome::Pending => return,
                SelectOutcome::Chosen(route) => Some(FieldValue::from(&route.id)),
                SelectOutcome::Closed => None,
            },
            Some(Popup::Date(picker)) => match picker.handle_key(key) {
                PickerOutcome::Pending => return,
                PickerOutcome::Picked(day) => Some(FieldValue::Text(format_timestamp(day))),
                PickerOutcome::Closed => None,
            },
            None => return,
        };
        self.popup = None;
        if let Some(value) = value {
            self.handle_change(field, value);
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(spec) = self.form.focused() else {
            return;
        };
        let field = spec.key.clone();
        if key.modifiers.contains(KeyModifiers::ALT) {
            return;
        }
        match (spec.widget(), key.code) {
            (FieldWidget::ReadOnly, _) => {}
            (FieldWidget::RouteSelect, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.popup = Some(Popup::Route(RouteSelect::new()));
            }
            (FieldWidget::RouteSelect, KeyCode::Char(ch)) => {
                self.popup = Some(Popup::Route(RouteSelect::with_query(ch)));
            }
            (FieldWidget::DatePicker, KeyCode::Enter | KeyCode::Char(' ')) => {
                let start = parse_timestamp(self.data.text(&field)).unwrap_or_else(today);
                self.popup = Some(Popup::Date(DatePicker::new(start)));
            }
            (FieldWidget::Checkbox, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.data.toggle(&field);
            }
            (FieldWidget::TextInput(input), KeyCode::Char(ch)) => {
                let mut candidate = self.data.text(&field).to_string();
                candidate.push(ch);
                self.edit_text(field, input, candidate);
            }
            (FieldWidget::TextInput(input), KeyCode::Backspace) => {
                let mut candidate = self.data.text(&field).to_string();
                candidate.pop();
                self.edit_text(field, input, candidate);
            }
            (FieldWidget::TextInput(_), KeyCode::Enter) => self.form.focus_next(),
            _ => {}
        }
    }

    /// Applies a text edit only if the result passes the input type's validity check.
    fn edit_text(&mut self, field: String, input: InputType, candidate: String) {
        match check_validity(input, &candidate) {
            Ok(()) => {
                self.form.clear_error(&field);
                self.handle_change(field, FieldValue::Text(candidate));
            }
            Err(e) => self.form.set_error(field, e.to_string()),
        }
    }

    /// Builds the submission: the draft without the trip identifier. Nothing is validated.
    fn submit(&self) -> Action {
        let payload = self.data.submission_payload();
        debug!(fields = payload.len(), "submit requested");
        Action::SubmitTrip(payload)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Renders the trip creation screen.
#[mutants::skip]
pub fn draw_trip_create(state: &TripCreateState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Create Trip ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    draw_field_form(state.form(), state.data(), state.routes(), frame, form_area);

    let footer = Paragraph::new(Line::from(
        "Tab/Shift+Tab: next/prev  Space: toggle/open  Ctrl+S: save  Esc: cancel  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if let Some(select) = state.route_select() {
        let current = state
            .form()
            .focused()
            .and_then(|f| state.data().get(&f.key))
            .and_then(|v| find_route(state.routes(), v));
        draw_route_select(select, state.routes(), current, frame, area);
    } else if let Some(picker) = state.date_picker() {
        draw_date_picker(picker, frame, area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use crossterm::event::{KeyEventKind, KeyEventState};
    use regex::Regex;

    use super::*;
    use crate::model::{ROUTE_KEY, RouteId, TRIP_ID_KEY};

    static TIMESTAMP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").unwrap());

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn new_state() -> TripCreateState {
        TripCreateState::new(FieldConfig::builtin())
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
        ]
    }

    fn focus_on(state: &mut TripCreateState, key: &str) {
        for _ in 0..state.form().config().len() {
            if state.form().focused().is_some_and(|f| f.key == key) {
                return;
            }
            state.handle_key(press(KeyCode::Tab));
        }
        panic!("no field {key}");
    }

    fn type_string(state: &mut TripCreateState, s: &str) {
        for ch in s.chars() {
            state.handle_key(press(KeyCode::Char(ch)));
        }
    }

    mod typing {
        use super::*;

        #[test]
        fn chars_fill_focused_text_field() {
            let mut state = new_state();
            focus_on(&mut state, "TripName");
            type_string(&mut state, "Morning run");
            assert_eq!(state.data().text("TripName"), "Morning run");
        }

        #[test]
        fn backspace_deletes_char() {
            let mut state = new_state();
            focus_on(&mut state, "TripName");
            type_string(&mut state, "AB");
            state.handle_key(press(KeyCode::Backspace));
            assert_eq!(state.data().text("TripName"), "A");
        }

        #[test]
        fn read_only_trip_id_ignores_typing() {
            let mut state = new_state();
            focus_on(&mut state, TRIP_ID_KEY);
            type_string(&mut state, "42");
            assert_eq!(state.data().get(TRIP_ID_KEY), None);
        }

        #[test]
        fn enter_in_text_field_moves_focus() {
            let mut state = new_state();
            focus_on(&mut state, "TripName");
            state.handle_key(press(KeyCode::Enter));
            assert_eq!(
                state.form().focused().map(|f| f.key.as_str()),
                Some(ROUTE_KEY)
            );
        }

        #[test]
        fn alt_chars_are_ignored() {
            let mut state = new_state();
            focus_on(&mut state, "TripName");
            state.handle_key(KeyEvent {
                code: KeyCode::Char('x'),
                modifiers: KeyModifiers::ALT,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            });
            assert_eq!(state.data().text("TripName"), "");
        }
    }

    mod validity {
        use super::*;

        #[test]
        fn number_field_refuses_letters_and_marks_error() {
            let mut state = new_state();
            focus_on(&mut state, "SeatCapacity");
            type_string(&mut state, "4x");
            assert_eq!(state.data().text("SeatCapacity"), "4");
            assert_eq!(
                state.form().error("SeatCapacity"),
                Some("Please enter a number.")
            );
        }

        #[test]
        fn accepted_edit_clears_error() {
            let mut state = new_state();
            focus_on(&mut state, "SeatCapacity");
            type_string(&mut state, "x");
            assert!(state.form().has_errors());
            type_string(&mut state, "5");
            assert!(!state.form().has_errors());
            assert_eq!(state.data().text("SeatCapacity"), "5");
        }

        #[test]
        fn tel_field_accepts_phone_characters() {
            let mut state = new_state();
            focus_on(&mut state, "ContactPhone");
            type_string(&mut state, "+1 555-0100");
            assert_eq!(state.data().text("ContactPhone"), "+1 555-0100");
        }
    }

    mod checkbox {
        use super::*;

        #[test]
        fn space_toggles_only_that_field() {
            let mut state = new_state();
            focus_on(&mut state, "TripName");
            type_string(&mut state, "X");
            let before = state.data().clone();

            focus_on(&mut state, "IsActive");
            state.handle_key(press(KeyCode::Char(' ')));
            assert_eq!(state.data().get("IsActive"), Some(&FieldValue::Bool(true)));
            assert_eq!(state.data().text("TripName"), before.text("TripName"));
            assert_eq!(state.data().len(), before.len() + 1);

            state.handle_key(press(KeyCode::Enter));
            assert_eq!(state.data().get("IsActive"), Some(&FieldValue::Bool(false)));
        }
    }

    mod route_select {
        use super::*;

        #[test]
        fn enter_opens_selector_with_loaded_routes() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            let select = state.route_select().expect("selector open");
            assert_eq!(select.options(state.routes()).len(), 2);
        }

        #[test]
        fn choosing_stores_route_id() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Enter));
            assert!(state.route_select().is_none());
            assert_eq!(state.data().get(ROUTE_KEY), Some(&FieldValue::Integer(2)));
        }

        #[test]
        fn typing_opens_selector_with_query() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, ROUTE_KEY);
            type_string(&mut state, "harb");
            let select = state.route_select().expect("selector open");
            assert_eq!(select.query(), "harb");
            state.handle_key(press(KeyCode::Enter));
            assert_eq!(state.data().get(ROUTE_KEY), Some(&FieldValue::Integer(2)));
        }

        #[test]
        fn esc_closes_without_change_and_stays_on_form() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            let action = state.handle_key(press(KeyCode::Esc));
            assert_eq!(action, Action::None);
            assert!(state.route_select().is_none());
            assert_eq!(state.data().get(ROUTE_KEY), None);
        }

        #[test]
        fn no_routes_means_no_options() {
            let mut state = new_state();
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            state.handle_key(press(KeyCode::Enter));
            assert!(state.route_select().is_some());
            assert_eq!(state.data().get(ROUTE_KEY), None);
        }
    }

    mod date_picker {
        use super::*;

        #[test]
        fn picking_stores_wire_timestamp() {
            let mut state = new_state();
            focus_on(&mut state, "TripDate");
            state.handle_key(press(KeyCode::Enter));
            assert!(state.date_picker().is_some());
            state.handle_key(press(KeyCode::Right));
            state.handle_key(press(KeyCode::Enter));
            assert!(state.date_picker().is_none());
            let stored = state.data().text("TripDate");
            assert!(TIMESTAMP_RE.is_match(stored), "got {stored}");
            assert!(stored.ends_with("T00:00:00Z"));
        }

        #[test]
        fn reopening_starts_on_stored_date() {
            let mut state = new_state();
            state.handle_change("TripDate", FieldValue::Text("2026-03-09T00:00:00Z".into()));
            focus_on(&mut state, "TripDate");
            state.handle_key(press(KeyCode::Char(' ')));
            assert_eq!(
                state.date_picker().map(DatePicker::cursor),
                NaiveDate::from_ymd_opt(2026, 3, 9)
            );
            state.handle_key(press(KeyCode::Down));
            state.handle_key(press(KeyCode::Enter));
            assert_eq!(state.data().text("TripDate"), "2026-03-16T00:00:00Z");
        }

        #[test]
        fn esc_closes_without_change() {
            let mut state = new_state();
            focus_on(&mut state, "TripDate");
            state.handle_key(press(KeyCode::Enter));
            state.handle_key(press(KeyCode::Esc));
            assert!(state.date_picker().is_none());
            assert_eq!(state.data().get("TripDate"), None);
        }
    }

    mod submit {
        use super::*;

        #[test]
        fn ctrl_s_submits_draft_without_trip_id() {
            let mut state = new_state();
            state.handle_change(TRIP_ID_KEY, FieldValue::Integer(5));
            state.handle_change("Name", FieldValue::Text("X".into()));
            let action = state.handle_key(ctrl('s'));
            let mut expected = FormData::new();
            expected.set("Name", FieldValue::Text("X".into()));
            assert_eq!(action, Action::SubmitTrip(expected));
        }

        #[test]
        fn empty_required_fields_are_not_enforced() {
            let mut state = new_state();
            let action = state.handle_key(ctrl('s'));
            assert_eq!(action, Action::SubmitTrip(FormData::new()));
        }

        #[test]
        fn submit_keeps_draft() {
            let mut state = new_state();
            state.handle_change(TRIP_ID_KEY, FieldValue::Integer(5));
            state.handle_key(ctrl('s'));
            assert_eq!(state.data().get(TRIP_ID_KEY), Some(&FieldValue::Integer(5)));
        }

        #[test]
        fn other_ctrl_keys_do_nothing() {
            let mut state = new_state();
            assert_eq!(state.handle_key(ctrl('x')), Action::None);
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn esc_cancels_to_trip_list() {
            let mut state = new_state();
            assert_eq!(
                state.handle_key(press(KeyCode::Esc)),
                Action::Navigate(Screen::TripList)
            );
        }

        #[test]
        fn tab_and_arrows_cycle_focus() {
            let mut state = new_state();
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(state.form().focus(), 1);
            state.handle_key(press(KeyCode::Down));
            assert_eq!(state.form().focus(), 2);
            state.handle_key(press(KeyCode::Up));
            state.handle_key(press(KeyCode::BackTab));
            assert_eq!(state.form().focus(), 0);
        }
    }

    mod visits {
        use super::*;

        #[test]
        fn stale_routes_are_dropped() {
            let mut state = new_state();
            state.reset(2);
            assert!(!state.set_routes(1, routes()));
            assert!(state.routes().is_empty());
            assert!(state.set_routes(2, routes()));
            assert_eq!(state.routes().len(), 2);
        }

        #[test]
        fn reset_discards_draft_routes_and_popup() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, "TripName");
            type_string(&mut state, "X");
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            state.reset(1);
            assert!(state.data().is_empty());
            assert!(state.routes().is_empty());
            assert!(state.route_select().is_none());
            assert_eq!(state.form().focus(), 0);
            assert_eq!(state.visit(), 1);
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

        fn render(state: &TripCreateState) -> String {
            let backend = TestBackend::new(100, 30);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_trip_create(state, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        #[test]
        fn renders_title_fields_and_footer() {
            let output = render(&new_state());
            assert!(output.contains("Create Trip"));
            assert!(output.contains("Trip Name*:"));
            assert!(output.contains("Ctrl+S: save"));
        }

        #[test]
        fn renders_route_popup() {
            let mut state = new_state();
            state.set_routes(0, routes());
            focus_on(&mut state, ROUTE_KEY);
            state.handle_key(press(KeyCode::Enter));
            let output = render(&state);
            assert!(output.contains("Select Route"));
            assert!(output.contains("Harbor Loop"));
        }

        #[test]
        fn renders_date_popup() {
            let mut state = new_state();
            focus_on(&mut state, "TripDate");
            state.handle_key(press(KeyCode::Enter));
            let output = render(&state);
            assert!(output.contains("Pick Date"));
        }
    }
}
