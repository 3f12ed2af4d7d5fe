pub mod arbiter;
pub mod back;
pub mod linear_form;
pub mod list_actions;

pub use arbiter::{ArbiterOutcome, ModalArbiter};
pub use back::BackGuard;

/// The modals this app can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalId {
    /// Request a movie or series (linear form).
    RequestForm,
    /// Report a playback or metadata issue (linear form).
    IssueReport,
    /// Manage outstanding requests (list with actions).
    RequestManager,
}

impl std::fmt::Display for ModalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RequestForm => "request-form",
            Self::IssueReport => "issue-report",
            Self::RequestManager => "request-manager",
        };
        write!(f, "{name}")
    }
}

/// Focusable positions inside a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalLocalFocus {
    /// Option list row; -1 is the leading "none" entry.
    OptionList(i32),
    TextField,
    CancelButton,
    SubmitButton,
    List(usize),
    NewItemButton,
}
