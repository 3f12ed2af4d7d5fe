//! List-with-actions modal machine.
//!
//! A vertical list of existing entries, a "new item" button, and Cancel.
//! Enter on a list entry arms a delete confirmation; pressing Enter on the
//! same entry again inside the confirmation window deletes it. Used by the
//! request manager.

use crate::modal::ModalLocalFocus;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Consumed,
    Cancelled,
    /// Open the child modal that creates a new entry.
    NewItem,
    /// Deletion confirmation started for the entry.
    ConfirmArmed(usize),
    Deleted(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingConfirm {
    index: usize,
    armed_at: Instant,
}

#[derive(Debug)]
pub struct ListActions {
    len: usize,
    pub focus: ModalLocalFocus,
    pending: Option<PendingConfirm>,
    confirm_window: Duration,
}

impl ListActions {
    pub fn new(len: usize, confirm_window: Duration) -> Self {
        let focus = if len > 0 {
            ModalLocalFocus::List(0)
        } else {
            ModalLocalFocus::NewItemButton
        };
        Self {
            len,
            focus,
            pending: None,
            confirm_window,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn pending_confirm(&self) -> Option<usize> {
        self.pending.map(|p| p.index)
    }

    /// Remaining confirmation time, for the countdown label.
    pub fn confirm_remaining(&self, now: Instant) -> Option<Duration> {
        let pending = self.pending?;
        self.confirm_window.checked_sub(now.duration_since(pending.armed_at))
    }

    /// Called on every app tick; reverts an expired confirmation.
    pub fn tick(&mut self, now: Instant) {
        if let Some(p) = self.pending {
            if now.duration_since(p.armed_at) >= self.confirm_window {
                debug!(index = p.index, "delete confirmation expired");
                self.pending = None;
            }
        }
    }

    /// An entry was removed or added externally; clamp focus and reset any
    /// pending confirmation.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.pending = None;
        if let ModalLocalFocus::List(i) = self.focus {
            self.focus = if len == 0 {
                ModalLocalFocus::NewItemButton
            } else {
                ModalLocalFocus::List(i.min(len - 1))
            };
        }
    }

    pub fn up(&mut self, _now: Instant) -> ListOutcome {
        let next = match self.focus {
            ModalLocalFocus::List(i) if i > 0 => ModalLocalFocus::List(i - 1),
            ModalLocalFocus::CancelButton | ModalLocalFocus::NewItemButton if self.len > 0 => {
                ModalLocalFocus::List(self.len - 1)
            }
            other => other,
        };
        self.move_focus(next)
    }

    pub fn down(&mut self, _now: Instant) -> ListOutcome {
        let next = match self.focus {
            ModalLocalFocus::List(i) if i + 1 < self.len => ModalLocalFocus::List(i + 1),
            ModalLocalFocus::List(_) => ModalLocalFocus::CancelButton,
            other => other,
        };
        self.move_focus(next)
    }

    pub fn left(&mut self, _now: Instant) -> ListOutcome {
        if self.focus == ModalLocalFocus::NewItemButton {
            return self.move_focus(ModalLocalFocus::CancelButton);
        }
        ListOutcome::Consumed
    }

    pub fn right(&mut self, _now: Instant) -> ListOutcome {
        if self.focus == ModalLocalFocus::CancelButton {
            return self.move_focus(ModalLocalFocus::NewItemButton);
        }
        ListOutcome::Consumed
    }

    pub fn enter(&mut self, now: Instant) -> ListOutcome {
        match self.focus {
            ModalLocalFocus::List(i) => {
                if let Some(p) = self.pending {
                    if p.index == i && now.duration_since(p.armed_at) < self.confirm_window {
                        self.pending = None;
                        return ListOutcome::Deleted(i);
                    }
                }
                // First press, a different entry, or an expired window all
                // arm a fresh confirmation.
                self.pending = Some(PendingConfirm { index: i, armed_at: now });
                ListOutcome::ConfirmArmed(i)
            }
            ModalLocalFocus::NewItemButton => ListOutcome::NewItem,
            ModalLocalFocus::CancelButton => ListOutcome::Cancelled,
            _ => ListOutcome::Consumed,
        }
    }

    /// Any focus movement disarms a pending confirmation.
    fn move_focus(&mut self, next: ModalLocalFocus) -> ListOutcome {
        if next != self.focus {
            self.pending = None;
        }
        self.focus = next;
        ListOutcome::Consumed
    }
}
