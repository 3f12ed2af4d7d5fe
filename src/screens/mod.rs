pub mod browse;
pub mod person;

pub use browse::{BrowseKind, BrowseScreen, FilterSet, SortKey};
pub use person::PersonScreen;

use serde::{Deserialize, Serialize};

/// Stable identity for a screen instance. Two visits to "browse movies"
/// share a key (and therefore persisted position); each person screen gets
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenKey(String);

impl ScreenKey {
    pub fn browse_movies() -> Self {
        Self("browse:movies".to_string())
    }

    pub fn browse_series() -> Self {
        Self("browse:series".to_string())
    }

    pub fn search() -> Self {
        Self("search".to_string())
    }

    pub fn person(id: u64) -> Self {
        Self(format!("person:{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScreenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keys_are_stable_and_distinct() {
        assert_eq!(ScreenKey::browse_movies(), ScreenKey::browse_movies());
        assert_ne!(ScreenKey::browse_movies(), ScreenKey::browse_series());
        assert_ne!(ScreenKey::person(1), ScreenKey::person(2));
        assert_eq!(ScreenKey::person(7).as_str(), "person:7");
    }
}
