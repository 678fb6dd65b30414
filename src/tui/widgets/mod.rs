//! Reusable TUI widgets.

pub mod date_picker;
pub mod form;
pub mod notification;
pub mod select;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub use date_picker::{DatePicker, PickerOutcome, draw_date_picker};
pub use form::{ErrorData, FieldForm, draw_field_form};
pub use notification::{Notification, NotificationKind, Notifications, draw_notification};
pub use select::{RouteSelect, SelectOutcome, draw_route_select};

/// A `width` × `height` rectangle centered in `area`, clamped to fit.
pub(crate) fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
