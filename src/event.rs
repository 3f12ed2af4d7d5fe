// Event types for the async parts of the app: background data pages and
// watchdog pings are delivered over channels and polled by the event loop.

#![allow(dead_code)]

use crate::data::MediaItem;
use crate::screens::ScreenKey;

/// Directional input after classification. Everything the navigation engine
/// consumes is one of these six kinds; raw key identity is resolved earlier
/// by the keymap (several physical codes collapse into `Enter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
}

/// Events produced by the simulated paged catalog loader.
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// A page of items finished loading for the given screen.
    PageLoaded {
        key: ScreenKey,
        page: usize,
        items: Vec<MediaItem>,
        /// True when this was the final page (`has_more` becomes false).
        end_of_list: bool,
    },
}

/// Ping from the focus watchdog task. The loop re-asserts input capture for
/// the named screen when no modal is open.
#[derive(Debug, Clone)]
pub struct CapturePing {
    pub key: ScreenKey,
}
