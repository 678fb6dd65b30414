//! Notification bar: one-line success and error toasts that expire.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
}

impl Notification {
    /// Creates a success notification shown from now.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    /// Creates an error notification shown from now.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }
}

/// Holds the visible notification. A newer one replaces the current one.
#[derive(Debug, Clone)]
pub struct Notifications {
    current: Option<Notification>,
    ttl: Duration,
}

impl Notifications {
    /// Creates an empty queue whose notifications live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Shows `notification`, replacing any visible one.
    pub fn push(&mut self, notification: Notification) {
        self.current = Some(notification);
    }

    /// Drops the visible notification once it is older than the TTL.
    pub fn expire(&mut self, now: Instant) {
        if let Some(n) = &self.current
            && now.saturating_duration_since(n.shown_at) >= self.ttl
        {
            self.current = None;
        }
    }

    /// Returns the visible notification.
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

/// Renders the visible notification, or nothing.
#[mutants::skip]
pub fn draw_notification(notifications: &Notifications, frame: &mut Frame, area: Rect) {
    let Some(n) = notifications.current() else {
        return;
    };
    let (tag, color) = match n.kind {
        NotificationKind::Success => ("OK", Color::Green),
        NotificationKind::Error => ("ERROR", Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {tag} "),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", n.message), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
