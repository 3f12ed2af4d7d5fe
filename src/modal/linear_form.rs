//! Linear form modal machine.
//!
//! A vertical column of widgets walked with Up/Down: an option list with a
//! leading "none" entry, a free-text field, and a Cancel/Submit button row
//! at the bottom. Used by the request form and the issue report modal.

use crate::modal::ModalLocalFocus;
use tracing::debug;

/// Where a completed form ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Index into the option list, `None` when the "none" entry was kept.
    pub option: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Key handled, modal stays open.
    Consumed,
    Cancelled,
    Submitted(FormSubmission),
}

#[derive(Debug)]
pub struct LinearForm {
    options: Vec<String>,
    /// Highlighted option list entry; -1 is the leading "none" row.
    cursor: i32,
    /// Committed choice (set by Enter on the option list).
    selected_option: Option<usize>,
    pub focus: ModalLocalFocus,
    capturing: bool,
    text: String,
    validation: Option<String>,
}

impl LinearForm {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            cursor: -1,
            selected_option: None,
            focus: ModalLocalFocus::OptionList(-1),
            capturing: false,
            text: String::new(),
            validation: None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Text capture eats every key except the ones that leave it; the
    /// arbiter must check this before running its back guard.
    pub fn is_capturing_text(&self) -> bool {
        self.capturing
    }

    pub fn insert_char(&mut self, c: char) {
        if self.capturing {
            self.text.push(c);
            self.validation = None;
        }
    }

    pub fn backspace(&mut self) {
        if self.capturing {
            self.text.pop();
        }
    }

    pub fn up(&mut self) -> FormOutcome {
        if self.capturing {
            return FormOutcome::Consumed;
        }
        self.focus = match self.focus {
            ModalLocalFocus::OptionList(i) => {
                self.cursor = (i - 1).max(-1);
                ModalLocalFocus::OptionList(self.cursor)
            }
            ModalLocalFocus::TextField => {
                ModalLocalFocus::OptionList(self.cursor)
            }
            ModalLocalFocus::CancelButton | ModalLocalFocus::SubmitButton => {
                ModalLocalFocus::TextField
            }
            other => other,
        };
        FormOutcome::Consumed
    }

    pub fn down(&mut self) -> FormOutcome {
        if self.capturing {
            return FormOutcome::Consumed;
        }
        self.focus = match self.focus {
            ModalLocalFocus::OptionList(i) => {
                if (i + 1) < self.options.len() as i32 {
                    self.cursor = i + 1;
                    ModalLocalFocus::OptionList(self.cursor)
                } else {
                    ModalLocalFocus::TextField
                }
            }
            ModalLocalFocus::TextField => ModalLocalFocus::CancelButton,
            other => other,
        };
        FormOutcome::Consumed
    }

    pub fn left(&mut self) -> FormOutcome {
        if !self.capturing && self.focus == ModalLocalFocus::SubmitButton {
            self.focus = ModalLocalFocus::CancelButton;
        }
        FormOutcome::Consumed
    }

    pub fn right(&mut self) -> FormOutcome {
        if !self.capturing && self.focus == ModalLocalFocus::CancelButton {
            self.focus = ModalLocalFocus::SubmitButton;
        }
        FormOutcome::Consumed
    }

    pub fn enter(&mut self) -> FormOutcome {
        if self.capturing {
            // Enter commits the text and returns focus to the field.
            self.capturing = false;
            return FormOutcome::Consumed;
        }
        match self.focus {
            ModalLocalFocus::OptionList(i) => {
                self.selected_option = if i < 0 { None } else { Some(i as usize) };
                self.validation = None;
                FormOutcome::Consumed
            }
            ModalLocalFocus::TextField => {
                self.capturing = true;
                FormOutcome::Consumed
            }
            ModalLocalFocus::CancelButton => FormOutcome::Cancelled,
            ModalLocalFocus::SubmitButton => self.submit(),
            _ => FormOutcome::Consumed,
        }
    }

    /// Back while capturing leaves capture; otherwise the arbiter handles
    /// dismissal and never calls us.
    pub fn back(&mut self) -> FormOutcome {
        if self.capturing {
            self.capturing = false;
        }
        FormOutcome::Consumed
    }

    fn submit(&mut self) -> FormOutcome {
        let has_text = !self.text.trim().is_empty();
        if self.selected_option.is_none() && !has_text {
            debug!("form rejected: no option and empty text");
            self.validation = Some("Select an option or enter a note".to_string());
            return FormOutcome::Consumed;
        }
        FormOutcome::Submitted(FormSubmission {
            option: self.selected_option,
            text: self.text.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> LinearForm {
        LinearForm::new(vec!["1080p".into(), "4K".into()])
    }

    #[test]
    fn test_starts_on_none_entry() {
        let f = form();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(-1));
    }

    #[test]
    fn test_up_from_none_is_noop() {
        let mut f = form();
        f.up();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(-1));
    }

    #[test]
    fn test_down_walks_options_then_field_then_buttons() {
        let mut f = form();
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(0));
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(1));
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::TextField);
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::CancelButton);
        // Down on the button row stays put.
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::CancelButton);
    }

    #[test]
    fn test_up_from_buttons_returns_to_field_then_list() {
        let mut f = form();
        f.down();
        f.down();
        f.down();
        f.down();
        f.right();
        assert_eq!(f.focus, ModalLocalFocus::SubmitButton);
        f.up();
        assert_eq!(f.focus, ModalLocalFocus::TextField);
        // Returning to the list remembers the last cursor row.
        f.up();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(1));
    }

    #[test]
    fn test_left_right_only_swaps_buttons() {
        let mut f = form();
        f.right();
        assert_eq!(f.focus, ModalLocalFocus::OptionList(-1));
        f.down();
        f.down();
        f.down();
        f.down();
        f.right();
        assert_eq!(f.focus, ModalLocalFocus::SubmitButton);
        f.left();
        assert_eq!(f.focus, ModalLocalFocus::CancelButton);
    }

    #[test]
    fn test_enter_on_option_commits_choice() {
        let mut f = form();
        f.down();
        assert_eq!(f.enter(), FormOutcome::Consumed);
        assert_eq!(f.selected_option(), Some(0));
    }

    #[test]
    fn test_text_capture_round_trip() {
        let mut f = form();
        f.down();
        f.down();
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::TextField);
        f.enter();
        assert!(f.is_capturing_text());
        f.insert_char('h');
        f.insert_char('i');
        f.backspace();
        f.insert_char('i');
        // Directions are consumed without moving focus while capturing.
        f.down();
        assert_eq!(f.focus, ModalLocalFocus::TextField);
        f.enter();
        assert!(!f.is_capturing_text());
        assert_eq!(f.text(), "hi");
    }

    #[test]
    fn test_back_exits_capture_without_closing() {
        let mut f = form();
        f.down();
        f.down();
        f.down();
        f.enter();
        assert!(f.is_capturing_text());
        assert_eq!(f.back(), FormOutcome::Consumed);
        assert!(!f.is_capturing_text());
        assert_eq!(f.focus, ModalLocalFocus::TextField);
    }

    #[test]
    fn test_submit_requires_option_or_text() {
        let mut f = form();
        f.down();
        f.down();
        f.down();
        f.down();
        f.right();
        assert_eq!(f.enter(), FormOutcome::Consumed);
        assert!(f.validation().is_some());
    }

    #[test]
    fn test_submit_with_selected_option() {
        let mut f = form();
        f.down();
        f.down();
        f.enter();
        f.down();
        f.down();
        f.right();
        assert_eq!(
            f.enter(),
            FormOutcome::Submitted(FormSubmission {
                option: Some(1),
                text: String::new(),
            })
        );
    }

    #[test]
    fn test_cancel_button() {
        let mut f = form();
        f.down();
        f.down();
        f.down();
        f.down();
        assert_eq!(f.enter(), FormOutcome::Cancelled);
    }
}
