//! Person details screen.
//!
//! A vertical stack: action buttons at the top, a bio with a Read More
//! toggle, then two horizontal credit strips (known-for and crew roles).
//! Left/Right inside a strip is handled by the router; this type only
//! supplies the config and the screen's own state.

use crate::data::PersonInfo;
use crate::event::NavKey;
use crate::input::ScreenLocalFocus;
use crate::nav::{ScreenConfig, Section};
use crate::screens::ScreenKey;
use std::collections::HashMap;

#[derive(Debug)]
pub struct PersonScreen {
    pub key: ScreenKey,
    pub person: PersonInfo,
    /// Browse screen to return to on Back.
    pub origin: ScreenKey,
    pub bio_expanded: bool,
}

impl PersonScreen {
    pub fn new(person: PersonInfo, origin: ScreenKey) -> Self {
        Self {
            key: ScreenKey::person(person.id),
            person,
            origin,
            bio_expanded: false,
        }
    }

    pub fn toggle_bio(&mut self) {
        self.bio_expanded = !self.bio_expanded;
    }

    pub fn config(&self) -> ScreenConfig {
        let mut transitions = HashMap::new();
        transitions.insert((Section::Top, NavKey::Up), Section::TopBar);
        transitions.insert((Section::Top, NavKey::Down), Section::ReadMore);
        transitions.insert((Section::ReadMore, NavKey::Up), Section::Top);
        transitions.insert((Section::ReadMore, NavKey::Down), Section::KnownFor);
        transitions.insert((Section::KnownFor, NavKey::Up), Section::ReadMore);
        transitions.insert((Section::KnownFor, NavKey::Down), Section::Crew);
        transitions.insert((Section::Crew, NavKey::Up), Section::KnownFor);

        ScreenConfig {
            key: self.key.clone(),
            sections: vec![Section::Top, Section::ReadMore, Section::KnownFor, Section::Crew],
            transitions,
            columns: 0,
            total_items: 0,
            known_for_len: self.person.known_for.len(),
            crew_len: self.person.crew_credits.len(),
            default_entry: ScreenLocalFocus::Top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{RouteOutcome, ScreenRouter};
    use pretty_assertions::assert_eq;

    fn router() -> ScreenRouter {
        let screen = PersonScreen::new(PersonInfo::demo(3), ScreenKey::browse_movies());
        let mut router = ScreenRouter::new();
        router.register_screen(screen.config());
        router
    }

    #[test]
    fn test_vertical_walk_top_to_crew() {
        let r = router();
        assert_eq!(
            r.dispatch(NavKey::Down, &ScreenLocalFocus::Top),
            Some(RouteOutcome::Focus(ScreenLocalFocus::ReadMore))
        );
        assert_eq!(
            r.dispatch(NavKey::Down, &ScreenLocalFocus::ReadMore),
            Some(RouteOutcome::Focus(ScreenLocalFocus::KnownFor(0)))
        );
        assert_eq!(
            r.dispatch(NavKey::Down, &ScreenLocalFocus::KnownFor(2)),
            Some(RouteOutcome::Focus(ScreenLocalFocus::Crew(0)))
        );
        // Bottom of the stack.
        assert_eq!(r.dispatch(NavKey::Down, &ScreenLocalFocus::Crew(1)), None);
    }

    #[test]
    fn test_strip_moves_saturate() {
        let r = router();
        assert_eq!(
            r.dispatch(NavKey::Right, &ScreenLocalFocus::KnownFor(0)),
            Some(RouteOutcome::Focus(ScreenLocalFocus::KnownFor(1)))
        );
        // Demo person carries six known-for credits.
        assert_eq!(
            r.dispatch(NavKey::Right, &ScreenLocalFocus::KnownFor(5)),
            Some(RouteOutcome::Focus(ScreenLocalFocus::KnownFor(5)))
        );
        assert_eq!(
            r.dispatch(NavKey::Left, &ScreenLocalFocus::Crew(0)),
            Some(RouteOutcome::Focus(ScreenLocalFocus::Crew(0)))
        );
    }

    #[test]
    fn test_top_exits_to_top_bar() {
        let r = router();
        assert_eq!(
            r.dispatch(NavKey::Up, &ScreenLocalFocus::Top),
            Some(RouteOutcome::ExitTop)
        );
    }
}
