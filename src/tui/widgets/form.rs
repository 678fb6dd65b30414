//! Sectioned form widget: focus and per-field errors over a [`FieldConfig`].

use std::collections::BTreeMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{FieldConfig, FieldSpec, FieldWidget, FormData, Route, find_route};

/// Field key → message shown next to the field.
pub type ErrorData = BTreeMap<String, String>;

/// Focus and error state of a form laid out by a [`FieldConfig`].
#[derive(Debug, Clone)]
pub struct FieldForm {
    config: FieldConfig,
    focus: usize,
    errors: ErrorData,
}

impl FieldForm {
    /// Creates a form over `config`. Focus starts on the first field.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            focus: 0,
            errors: ErrorData::new(),
        }
    }

    /// Returns the layout.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Returns the flat index of the focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Returns the focused field, or `None` for an empty layout.
    pub fn focused(&self) -> Option<&FieldSpec> {
        self.config.field(self.focus)
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        let len = self.config.len();
        if len == 0 {
            return;
        }
        self.focus = (self.focus + 1) % len;
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        let len = self.config.len();
        if len == 0 {
            return;
        }
        self.focus = (self.focus + len - 1) % len;
    }

    /// Sets the error message for a field.
    pub fn set_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(key.into(), message.into());
    }

    /// Clears the error for a field.
    pub fn clear_error(&mut self, key: &str) {
        self.errors.remove(key);
    }

    /// Returns the error for a field.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Returns `true` if any field has an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns focus to the first field and clears all errors.
    pub fn reset(&mut self) {
        self.focus = 0;
        self.errors.clear();
    }
}

fn value_spans(
    spec: &FieldSpec,
    data: &FormData,
    routes: &[Route],
    focused: bool,
) -> Vec<Span<'static>> {
    let placeholder = Style::default().fg(Color::DarkGray);
    match spec.widget() {
        FieldWidget::ReadOnly => {
            let text = data.get(&spec.key).map(ToString::to_string).unwrap_or_default();
            vec![Span::styled(text, Style::default().fg(Color::Gray))]
        }
        FieldWidget::RouteSelect => {
            let chosen = data
                .get(&spec.key)
                .and_then(|v| find_route(routes, v))
                .map(|r| r.name.clone());
            match chosen {
                Some(name) => vec![Span::raw(name), Span::styled(" \u{25be}", placeholder)],
                None => vec![Span::styled("Select a route \u{25be}", placeholder)],
            }
        }
        FieldWidget::DatePicker => match data.get(&spec.key) {
            Some(v) => vec![Span::raw(v.to_string())],
            None => vec![Span::styled("Pick a date", placeholder)],
        },
        FieldWidget::Checkbox => {
            let mark = if data.flag(&spec.key) { "[x]" } else { "[ ]" };
            vec![Span::raw(mark)]
        }
        FieldWidget::TextInput(_) => {
            let mut spans = vec![Span::raw(data.text(&spec.key).to_string())];
            if focused {
                spans.push(Span::styled(
                    "\u{2588}",
                    Style::default().add_modifier(Modifier::SLOW_BLINK),
                ));
            }
            spans
        }
    }
}

/// Renders every section of the form within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_field_form(
    form: &FieldForm,
    data: &FormData,
    routes: &[Route],
    frame: &mut Frame,
    area: Rect,
) {
    let sections = form.config().sections();
    let mut constraints: Vec<Constraint> = sections
        .iter()
        .map(|s| Constraint::Length(s.fields.len() as u16 + 2))
        .collect();
    constraints.push(Constraint::Min(0));
    let areas = Layout::vertical(constraints).split(area);

    let mut index = 0;
    for (section, section_area) in sections.iter().zip(areas.iter()) {
        let block = Block::default()
            .title(format!(" {} ", section.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(*section_area);
        frame.render_widget(block, *section_area);

        let rows = Layout::vertical(vec![Constraint::Length(1); section.fields.len()]).split(inner);
        for (spec, row) in section.fields.iter().zip(rows.iter()) {
            let focused = index == form.focus();
            let [label_area, value_area] =
                Layout::horizontal([Constraint::Percentage(35), Constraint::Min(0)]).areas(*row);

            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let label = Paragraph::new(format!("{} ", spec.display_label()))
                .style(label_style)
                .alignment(Alignment::Right);
            frame.render_widget(label, label_area);

            let mut spans = value_spans(spec, data, routes, focused);
            if let Some(err) = form.error(&spec.key) {
                spans.push(Span::styled(
                    format!("  {err}"),
                    Style::default().fg(Color::Red),
                ));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), value_area);
            index += 1;
        }
    }
}
