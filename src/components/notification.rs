//! Toast notifications, stacked in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::config::Theme;

const DEFAULT_DURATION_MS: u64 = 4000;
const MAX_VISIBLE: usize = 4;
const TOAST_WIDTH: u16 = 42;
const TOAST_HEIGHT: u16 = 3;
const TOAST_MARGIN: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "󰋼",
            NotificationLevel::Success => "󰄬",
            NotificationLevel::Warning => "󰀦",
            NotificationLevel::Error => "󰅚",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub title: String,
    pub message: Option<String>,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            level,
            title: title.into(),
            message: None,
            created_at: Instant::now(),
            duration: Duration::from_millis(DEFAULT_DURATION_MS),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    fn remaining_ratio(&self) -> f32 {
        let elapsed = self.created_at.elapsed().as_millis() as f32;
        let total = self.duration.as_millis() as f32;
        (1.0 - elapsed / total).max(0.0)
    }
}

pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn push(&mut self, mut notification: Notification) {
        notification.id = self.next_id;
        self.next_id += 1;
        self.notifications.push_back(notification);

        while self.notifications.len() > MAX_VISIBLE * 2 {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, title: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, title));
    }

    pub fn success(&mut self, title: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Success, title));
    }

    pub fn success_with_message(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Success, title).with_message(message));
    }

    pub fn warning(&mut self, title: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Warning, title));
    }

    pub fn error(&mut self, title: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, title));
    }

    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn count(&self) -> usize {
        self.notifications.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().take(MAX_VISIBLE)
    }

    pub fn render(&self, frame: &mut Frame, screen: Rect, theme: &Theme) {
        if self.notifications.is_empty() {
            return;
        }

        for (idx, notification) in self.visible().enumerate() {
            let height = if notification.message.is_some() {
                TOAST_HEIGHT + 1
            } else {
                TOAST_HEIGHT
            };

            let y_offset = (idx as u16) * (height + TOAST_MARGIN);
            let x = screen.width.saturating_sub(TOAST_WIDTH + 2);
            let y = screen.y + 1 + y_offset;

            if y + height > screen.height {
                break;
            }

            let area = Rect::new(x, y, TOAST_WIDTH, height);
            self.render_toast(frame, area, notification, theme);
        }
    }

    fn render_toast(
        &self,
        frame: &mut Frame,
        area: Rect,
        notification: &Notification,
        theme: &Theme,
    ) {
        frame.render_widget(Clear, area);

        let (fg, bg) = match notification.level {
            NotificationLevel::Info => (
                theme.notifications.info_fg.to_color(),
                theme.notifications.info_bg.to_color(),
            ),
            NotificationLevel::Success => (
                theme.notifications.success_fg.to_color(),
                theme.notifications.success_bg.to_color(),
            ),
            NotificationLevel::Warning => (
                theme.notifications.warning_fg.to_color(),
                theme.notifications.warning_bg.to_color(),
            ),
            NotificationLevel::Error => (
                theme.notifications.error_fg.to_color(),
                theme.notifications.error_bg.to_color(),
            ),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(fg).bg(bg))
            .style(Style::default().bg(bg));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = format!("{} {}", notification.level.icon(), notification.title);
        let mut lines = vec![Line::from(Span::styled(
            truncate_string(&title, inner.width as usize),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        ))];

        if let Some(ref msg) = notification.message {
            lines.push(Line::from(Span::styled(
                truncate_string(msg, inner.width as usize),
                Style::default().fg(fg).bg(bg),
            )));
        }

        let progress_width = ((inner.width as f32) * notification.remaining_ratio()) as usize;
        lines.push(Line::from(Span::styled(
            "─".repeat(progress_width),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::DIM),
        )));

        let para = Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .wrap(Wrap { trim: true });
        frame.render_widget(para, inner);
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_new() {
        let n = Notification::new(NotificationLevel::Info, "Test");
        assert_eq!(n.title, "Test");
        assert!(n.message.is_none());
    }

    #[test]
    fn test_notification_with_message() {
        let n = Notification::new(NotificationLevel::Success, "Request sent")
            .with_message("Harbor (1989)");
        assert_eq!(n.message.as_deref(), Some("Harbor (1989)"));
    }

    #[test]
    fn test_manager_tick_removes_expired() {
        let mut mgr = NotificationManager::new();
        let mut n = Notification::new(NotificationLevel::Info, "Test");
        n.duration = Duration::from_millis(1);
        mgr.push(n);
        std::thread::sleep(Duration::from_millis(10));
        mgr.tick();
        assert!(!mgr.has_notifications());
    }

    #[test]
    fn test_manager_visible_limit() {
        let mut mgr = NotificationManager::new();
        for i in 0..10 {
            mgr.info(format!("Notification {}", i));
        }
        assert_eq!(mgr.visible().count(), MAX_VISIBLE);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long string", 10), "a very lo…");
        assert_eq!(truncate_string("abc", 3), "abc");
    }
}
