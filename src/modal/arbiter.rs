//! Modal stack arbitration.
//!
//! One arbiter owns the stack of open modals, decides which keys a modal
//! consumes, and restores focus and routing when modals close. While any
//! modal is open every navigation key goes through here; the screen router
//! never sees them because the parent screen's config is pulled out of the
//! router on open and handed back on close.

use crate::event::NavKey;
use crate::input::{FocusRegistry, FocusTarget};
use crate::modal::back::BackGuard;
use crate::modal::linear_form::{FormOutcome, FormSubmission, LinearForm};
use crate::modal::list_actions::{ListActions, ListOutcome};
use crate::modal::{ModalId, ModalLocalFocus};
use crate::nav::{ScreenConfig, ScreenRouter};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Timing windows for modal input, sourced from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct ModalTiming {
    pub back_debounce: Duration,
    pub child_back_window: Duration,
    /// Enter presses are ignored for this long after a modal opens, so the
    /// press that opened it cannot also activate its first widget.
    pub enter_guard: Duration,
    pub confirm_window: Duration,
}

impl Default for ModalTiming {
    fn default() -> Self {
        Self {
            back_debounce: Duration::from_millis(500),
            child_back_window: Duration::from_millis(600),
            enter_guard: Duration::from_millis(1000),
            confirm_window: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug)]
pub enum ModalMachine {
    Form(LinearForm),
    List(ListActions),
}

impl ModalMachine {
    fn focus(&self) -> ModalLocalFocus {
        match self {
            Self::Form(f) => f.focus,
            Self::List(l) => l.focus,
        }
    }

    fn is_capturing_text(&self) -> bool {
        match self {
            Self::Form(f) => f.is_capturing_text(),
            Self::List(_) => false,
        }
    }
}

#[derive(Debug)]
struct ModalEntry {
    id: ModalId,
    machine: ModalMachine,
    back: BackGuard,
    opened_at: Instant,
    prior_focus: FocusTarget,
    /// The screen config pulled from the router when this modal opened.
    /// Only the outermost entry holds one.
    parent_config: Option<ScreenConfig>,
}

/// What the arbiter decided for a key it handled. `None` from
/// [`ModalArbiter::handle_key`] means no modal is open and the key belongs
/// to the screen layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbiterOutcome {
    Consumed,
    Closed(ModalId),
    Submitted { id: ModalId, submission: FormSubmission },
    /// The list modal wants its child creation modal opened.
    NewItemRequested,
    ConfirmArmed(usize),
    Deleted(usize),
}

enum MachineOut {
    Form(FormOutcome),
    List(ListOutcome),
}

#[derive(Debug)]
pub struct ModalArbiter {
    stack: Vec<ModalEntry>,
    timing: ModalTiming,
}

impl ModalArbiter {
    pub fn new(timing: ModalTiming) -> Self {
        Self {
            stack: Vec::new(),
            timing,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn top_id(&self) -> Option<ModalId> {
        self.stack.last().map(|e| e.id)
    }

    pub fn top_machine(&self) -> Option<&ModalMachine> {
        self.stack.last().map(|e| &e.machine)
    }

    pub fn is_capturing_text(&self) -> bool {
        self.stack
            .last()
            .map(|e| e.machine.is_capturing_text())
            .unwrap_or(false)
    }

    /// Open a modal on top of the stack. Captures the current focus for
    /// restoration on close; the outermost open also pulls the current
    /// screen config out of the router so screen navigation goes inert.
    pub fn open(
        &mut self,
        id: ModalId,
        machine: ModalMachine,
        now: Instant,
        registry: &mut FocusRegistry,
        router: &mut ScreenRouter,
    ) {
        let prior_focus = registry.get().clone();
        let parent_config = if self.stack.is_empty() {
            router
                .current_route()
                .cloned()
                .and_then(|key| router.unregister_screen(&key))
        } else {
            None
        };
        info!(modal = %id, depth = self.stack.len() + 1, "modal open");
        let local = machine.focus();
        self.stack.push(ModalEntry {
            id,
            machine,
            back: BackGuard::new(self.timing.back_debounce, self.timing.child_back_window),
            opened_at: now,
            prior_focus,
            parent_config,
        });
        registry.set(FocusTarget::Modal { id, local });
    }

    /// Route one navigation key. Returns `None` when no modal is open.
    pub fn handle_key(
        &mut self,
        key: NavKey,
        now: Instant,
        registry: &mut FocusRegistry,
        router: &mut ScreenRouter,
    ) -> Option<ArbiterOutcome> {
        if self.stack.is_empty() {
            return None;
        }

        // Text capture owns Back before the dismissal guard ever runs.
        if key == NavKey::Back && self.is_capturing_text() {
            if let Some(ModalMachine::Form(form)) = self.stack.last_mut().map(|e| &mut e.machine) {
                form.back();
            }
            self.sync_focus(registry);
            return Some(ArbiterOutcome::Consumed);
        }

        if key == NavKey::Back {
            let allowed = {
                let entry = self.stack.last_mut()?;
                entry.back.allow(now)
            };
            if !allowed {
                return Some(ArbiterOutcome::Consumed);
            }
            let id = self.close_top(now, true, registry, router);
            return Some(ArbiterOutcome::Closed(id));
        }

        if key == NavKey::Enter {
            let entry = self.stack.last()?;
            if now.duration_since(entry.opened_at) < self.timing.enter_guard {
                debug!(modal = %entry.id, "enter suppressed by open guard");
                return Some(ArbiterOutcome::Consumed);
            }
        }

        let machine_out = {
            let entry = self.stack.last_mut()?;
            match &mut entry.machine {
                ModalMachine::Form(form) => MachineOut::Form(match key {
                    NavKey::Up => form.up(),
                    NavKey::Down => form.down(),
                    NavKey::Left => form.left(),
                    NavKey::Right => form.right(),
                    NavKey::Enter => form.enter(),
                    NavKey::Back => unreachable!("back handled above"),
                }),
                ModalMachine::List(list) => MachineOut::List(match key {
                    NavKey::Up => list.up(now),
                    NavKey::Down => list.down(now),
                    NavKey::Left => list.left(now),
                    NavKey::Right => list.right(now),
                    NavKey::Enter => list.enter(now),
                    NavKey::Back => unreachable!("back handled above"),
                }),
            }
        };

        let outcome = match machine_out {
            MachineOut::Form(FormOutcome::Consumed) | MachineOut::List(ListOutcome::Consumed) => {
                ArbiterOutcome::Consumed
            }
            MachineOut::Form(FormOutcome::Cancelled) | MachineOut::List(ListOutcome::Cancelled) => {
                let id = self.close_top(now, false, registry, router);
                return Some(ArbiterOutcome::Closed(id));
            }
            MachineOut::Form(FormOutcome::Submitted(submission)) => {
                let id = self.close_top(now, false, registry, router);
                return Some(ArbiterOutcome::Submitted { id, submission });
            }
            MachineOut::List(ListOutcome::NewItem) => ArbiterOutcome::NewItemRequested,
            MachineOut::List(ListOutcome::ConfirmArmed(i)) => ArbiterOutcome::ConfirmArmed(i),
            MachineOut::List(ListOutcome::Deleted(i)) => ArbiterOutcome::Deleted(i),
        };
        self.sync_focus(registry);
        Some(outcome)
    }

    /// Feed a typed character to a capturing text field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(ModalMachine::Form(form)) = self.stack.last_mut().map(|e| &mut e.machine) {
            form.insert_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(ModalMachine::Form(form)) = self.stack.last_mut().map(|e| &mut e.machine) {
            form.backspace();
        }
    }

    /// Drive time-based state (delete confirmation expiry).
    pub fn tick(&mut self, now: Instant) {
        if let Some(ModalMachine::List(list)) = self.stack.last_mut().map(|e| &mut e.machine) {
            list.tick(now);
        }
    }

    /// Update the top list machine after entries changed externally.
    pub fn set_list_len(&mut self, len: usize, registry: &mut FocusRegistry) {
        if let Some(ModalMachine::List(list)) = self.stack.last_mut().map(|e| &mut e.machine) {
            list.set_len(len);
        }
        self.sync_focus(registry);
    }

    /// Pop the top modal, restoring the focus it captured and, for the
    /// outermost modal, re-registering the parent screen with the router.
    /// Only when the close was Back-initiated is a surviving parent told,
    /// so its guard suppresses the trailing press; submit and cancel
    /// closes must not arm that window.
    pub fn close_top(
        &mut self,
        now: Instant,
        via_back: bool,
        registry: &mut FocusRegistry,
        router: &mut ScreenRouter,
    ) -> ModalId {
        let entry = self.stack.pop().expect("close_top on empty stack");
        info!(modal = %entry.id, depth = self.stack.len(), "modal close");
        if let Some(config) = entry.parent_config {
            router.register_screen(config);
        }
        registry.set(entry.prior_focus);
        if via_back {
            if let Some(parent) = self.stack.last_mut() {
                parent.back.note_child_back(now);
            }
        }
        entry.id
    }

    fn sync_focus(&self, registry: &mut FocusRegistry) {
        if let Some(entry) = self.stack.last() {
            registry.set(FocusTarget::Modal {
                id: entry.id,
                local: entry.machine.focus(),
            });
        }
    }
}
