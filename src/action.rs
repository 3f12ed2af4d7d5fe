use std::path::PathBuf;

use crate::event::{CapturePing, DataEvent, NavKey};

/// Everything the event loop can ask the app to do. Input, background
/// loaders, and the config watcher all funnel into this one dispatch
/// alphabet.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,

    /// A classified navigation key press.
    Nav(NavKey),
    /// A printable character while some text field is capturing.
    Char(char),
    Backspace,

    /// A page of items arrived from a background loader.
    Data(DataEvent),
    /// Focus watchdog fired for a screen.
    Ping(CapturePing),

    ConfigChanged(PathBuf),
}
