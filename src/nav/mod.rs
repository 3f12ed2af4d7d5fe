pub mod grid;
pub mod position;
pub mod restore;
pub mod router;
pub mod watchdog;

pub use position::PositionStore;
pub use router::{RouteOutcome, ScreenConfig, ScreenRouter, Section};
