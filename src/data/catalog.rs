//! Built-in demo catalog.
//!
//! Stands in for a metadata backend: titles are generated
//! deterministically, page loads are served from a background task with
//! simulated latency so the restoration path sees realistic partial data.

use crate::data::MediaItem;
use crate::event::DataEvent;
use crate::screens::ScreenKey;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

pub const GENRES: [&str; 6] = ["Drama", "Comedy", "Thriller", "Sci-Fi", "Documentary", "Animation"];

const MOVIE_STEMS: [&str; 12] = [
    "Harbor", "Meridian", "Afterglow", "Northbound", "Paper Moons", "The Long Field",
    "Static", "Driftwood", "Second Winter", "Glass River", "Low Tide", "Signal Fire",
];

const SERIES_STEMS: [&str; 10] = [
    "Wardline", "The Annex", "Copper Creek", "Night Dispatch", "Fathoms", "Borrowed Time",
    "The Understudy", "Easterly", "Switchyard", "Cold Open",
];

/// Deterministic catalog for one media kind. `seed` keeps runs stable so
/// saved positions still point at the same titles next launch.
pub fn catalog(kind: MediaKind, count: usize) -> Vec<MediaItem> {
    let stems: &[&str] = match kind {
        MediaKind::Movie => &MOVIE_STEMS,
        MediaKind::Series => &SERIES_STEMS,
    };
    (0..count)
        .map(|i| {
            let stem = stems[i % stems.len()];
            let title = if i < stems.len() {
                stem.to_string()
            } else {
                format!("{} {}", stem, i / stems.len() + 1)
            };
            MediaItem {
                id: match kind {
                    MediaKind::Movie => 1_000 + i as u64,
                    MediaKind::Series => 5_000 + i as u64,
                },
                title,
                year: 1978 + ((i * 7) % 48) as u16,
                kind,
                genre: GENRES[i % GENRES.len()].to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

/// Serve one page of `source` after a jittered delay, delivering it as a
/// [`DataEvent::PageLoaded`] on the app channel. Dropped receivers are
/// fine; the task just exits.
pub fn spawn_page_load(
    key: ScreenKey,
    source: Vec<MediaItem>,
    page: usize,
    page_size: usize,
    tx: UnboundedSender<DataEvent>,
) {
    tokio::spawn(async move {
        let delay = Duration::from_millis(80 + fastrand::u64(0..220));
        tokio::time::sleep(delay).await;

        let start = page * page_size;
        let end = (start + page_size).min(source.len());
        let items: Vec<MediaItem> = source.get(start..end).unwrap_or(&[]).to_vec();
        let end_of_list = end >= source.len();
        trace!(key = %key, page, count = items.len(), end_of_list, "page loaded");
        let _ = tx.send(DataEvent::PageLoaded {
            key,
            page,
            items,
            end_of_list,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_is_deterministic() {
        let a = catalog(MediaKind::Movie, 30);
        let b = catalog(MediaKind::Movie, 30);
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
    }

    #[test]
    fn test_movie_and_series_ids_disjoint() {
        let movies = catalog(MediaKind::Movie, 50);
        let series = catalog(MediaKind::Series, 50);
        for m in &movies {
            assert!(series.iter().all(|s| s.id != m.id));
        }
    }

    #[tokio::test]
    async fn test_page_load_delivers_slice() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let source = catalog(MediaKind::Movie, 10);
        spawn_page_load(ScreenKey::browse_movies(), source.clone(), 1, 4, tx);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("event in time")
            .expect("channel open");
        let DataEvent::PageLoaded { page, items, end_of_list, .. } = event;
        assert_eq!(page, 1);
        assert_eq!(items, source[4..8].to_vec());
        assert!(!end_of_list);
    }

    #[tokio::test]
    async fn test_final_page_flags_end() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let source = catalog(MediaKind::Series, 6);
        spawn_page_load(ScreenKey::browse_series(), source, 1, 4, tx);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("event in time")
            .expect("channel open");
        let DataEvent::PageLoaded { items, end_of_list, .. } = event;
        assert_eq!(items.len(), 2);
        assert!(end_of_list);
    }
}
