//! Startup pass that pins every episode date to local midnight.

use crate::core::dates::normalize_to_local_midnight;
use crate::document::Document;

/// The document with normalized episode dates, or `None` when nothing changed.
pub fn normalize_episode_dates(doc: &Document) -> Option<Document> {
    let items: Vec<_> = doc
        .podcast
        .items
        .iter()
        .map(|episode| {
            let mut episode = episode.clone();
            episode.date = normalize_to_local_midnight(&episode.date);
            episode
        })
        .collect();
    if items == doc.podcast.items {
        return None;
    }
    let mut next = doc.clone();
    next.podcast.items = items;
    Some(next)
}
