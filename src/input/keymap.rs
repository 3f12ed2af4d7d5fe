//! Raw key event classification.
//!
//! Terminal key events arrive as `crossterm::event::KeyEvent`; remote or
//! set-top-box front ends tunnel vendor key codes through the config's
//! `extra_enter_codes`. Both funnel into the small [`NavKey`] alphabet
//! before anything else looks at them.

use crate::event::NavKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Vendor-specific select/enter code emitted by some CEC remotes.
pub const VENDOR_ENTER_KEY_CODE: u64 = 98_784_247_808;

/// Map a terminal key press onto the navigation alphabet. Non-press events
/// and unmapped keys return `None` and are dropped by the caller.
pub fn classify(event: &KeyEvent) -> Option<NavKey> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(NavKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(NavKey::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(NavKey::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(NavKey::Right),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Esc | KeyCode::Backspace => Some(NavKey::Back),
        _ => None,
    }
}

/// Normalize a raw numeric key code from a non-terminal front end.
/// Codes listed in `extra_enter_codes` count as Enter alongside the
/// known vendor code.
///
/// Crossterm never surfaces raw 64-bit codes, so nothing in the terminal
/// binary calls this; it is the entry point for embedders (CEC daemons,
/// remote-control bridges) that deliver platform key codes directly and
/// read `InputConfig::extra_enter_codes` for site-specific remotes.
pub fn classify_raw(code: u64, extra_enter_codes: &[u64]) -> Option<NavKey> {
    if code == VENDOR_ENTER_KEY_CODE || extra_enter_codes.contains(&code) {
        return Some(NavKey::Enter);
    }
    None
}

/// Ctrl+C always quits, regardless of focus or capture state.
pub fn is_quit(event: &KeyEvent) -> bool {
    event.kind == KeyEventKind::Press
        && event.modifiers.contains(KeyModifiers::CONTROL)
        && event.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[rstest]
    #[case(KeyCode::Up, NavKey::Up)]
    #[case(KeyCode::Char('j'), NavKey::Down)]
    #[case(KeyCode::Enter, NavKey::Enter)]
    #[case(KeyCode::Esc, NavKey::Back)]
    #[case(KeyCode::Backspace, NavKey::Back)]
    fn test_classify_maps_navigation_keys(#[case] code: KeyCode, #[case] expected: NavKey) {
        assert_eq!(classify(&press(code)), Some(expected));
    }

    #[test]
    fn test_classify_drops_release_events() {
        let mut event = press(KeyCode::Enter);
        event.kind = KeyEventKind::Release;
        assert_eq!(classify(&event), None);
    }

    #[test]
    fn test_classify_drops_unmapped_keys() {
        assert_eq!(classify(&press(KeyCode::Tab)), None);
        assert_eq!(classify(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_vendor_enter_code_normalizes() {
        assert_eq!(classify_raw(VENDOR_ENTER_KEY_CODE, &[]), Some(NavKey::Enter));
        assert_eq!(classify_raw(13, &[]), None);
        assert_eq!(classify_raw(13, &[13]), Some(NavKey::Enter));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit(&event));
        assert!(!is_quit(&press(KeyCode::Char('c'))));
    }
}
