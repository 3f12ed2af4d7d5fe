pub mod catalog;
pub mod paged;

pub use catalog::MediaKind;
pub use paged::PagedList;

use serde::{Deserialize, Serialize};

/// One entry in a browse grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub title: String,
    pub year: u16,
    pub kind: MediaKind,
    pub genre: String,
}

/// Details for a person screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInfo {
    pub id: u64,
    pub name: String,
    pub bio: String,
    pub known_for: Vec<MediaItem>,
    pub crew_credits: Vec<MediaItem>,
}

impl PersonInfo {
    /// Demo person derived from the catalog; the id picks which credits
    /// they carry so distinct people look distinct.
    pub fn demo(id: u64) -> Self {
        let movies = catalog::catalog(MediaKind::Movie, 24);
        let series = catalog::catalog(MediaKind::Series, 12);
        let start = (id as usize) % 8;
        Self {
            id,
            name: format!("Performer {id}"),
            bio: "Stage-trained actor with two decades of film and television \
                  work, best known for understated leads in slow-burn dramas."
                .to_string(),
            known_for: movies[start..start + 6].to_vec(),
            crew_credits: series[start / 2..start / 2 + 4].to_vec(),
        }
    }
}
