//! Document checks that are reported, never enforced.
//!
//! Every problem listed here is tolerated by the mutation operations; the
//! checks exist so an operator can see them before they cause ambiguous edits.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::dates::parse_local_date;
use crate::document::Document;

fn time_of_day() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time-of-day pattern compiles")
    })
}

fn is_time_of_day(value: &str) -> bool {
    time_of_day().is_match(value)
}

/// Check document invariants:
/// - Episode dates are normalized `YYYY-MM-DD`
/// - Variant ids and post ids are unique
/// - Suggested window lists are non-empty
/// - Times of day are `HH:MM`
pub fn validate_invariants(doc: &Document) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_time_of_day(&doc.podcast.release_time_local) {
        errors.push(format!(
            "podcast.releaseTimeLocal '{}' is not HH:MM",
            doc.podcast.release_time_local
        ));
    }

    for (index, episode) in doc.podcast.items.iter().enumerate() {
        if !is_iso_date(&episode.date) {
            errors.push(format!(
                "podcast.items[{}]: date '{}' is not a YYYY-MM-DD calendar date",
                index, episode.date
            ));
        }
    }

    let variant_ids = doc.thumbs.variants.iter().map(|variant| variant.id.as_str());
    for (id, count) in duplicates(variant_ids) {
        errors.push(format!("duplicate variant id '{}' ({} variants)", id, count));
    }

    let post_ids = doc.socials.posts.iter().map(|post| post.id.as_str());
    for (id, count) in duplicates(post_ids) {
        errors.push(format!("duplicate post id '{}' ({} posts)", id, count));
    }

    for (index, post) in doc.socials.posts.iter().enumerate() {
        if !is_time_of_day(&post.time) {
            errors.push(format!(
                "socials.posts[{}] ({}): time '{}' is not HH:MM",
                index, post.id, post.time
            ));
        }
    }

    for (platform, slots) in doc.socials.suggested_windows.iter() {
        if slots.is_empty() {
            errors.push(format!("socials.suggestedWindows.{}: no posting times", platform));
        }
        for slot in slots.iter().filter(|slot| !is_time_of_day(slot)) {
            errors.push(format!(
                "socials.suggestedWindows.{}: '{}' is not HH:MM",
                platform, slot
            ));
        }
    }

    errors
}

fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && parse_local_date(value).is_some() && !value.contains('/')
}

/// Ids seen more than once, in first-seen order.
fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut order = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter_map(|id| {
            let count = counts[id];
            (count > 1).then_some((id, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::socials::generate_week;
    use crate::core::thumbs::{add_variant, delete_variant};
    use crate::document::default_document;

    #[test]
    fn seeded_document_is_clean() {
        assert!(validate_invariants(&default_document()).is_empty());
    }

    #[test]
    fn reports_duplicate_ids_and_bad_dates() {
        let mut doc = default_document();
        doc.podcast.items[0].date = "2025-10-28T00:00".to_string();
        let variants = add_variant(&add_variant(&[]));
        let variants = delete_variant(&variants, 0).expect("delete");
        doc.thumbs.variants = add_variant(&variants);
        let week = generate_week(&[], &doc.socials.suggested_windows, "2025-10-28").expect("week");
        doc.socials.posts = generate_week(&week, &doc.socials.suggested_windows, "2025-10-28")
            .expect("week");

        let errors = validate_invariants(&doc);
        assert!(errors.iter().any(|err| err.starts_with("podcast.items[0]")));
        assert!(errors.iter().any(|err| err == "duplicate variant id 'B' (2 variants)"));
        assert!(
            errors
                .iter()
                .any(|err| err == "duplicate post id '2025-10-28_TikTok' (2 posts)")
        );
    }

    #[test]
    fn reports_malformed_times() {
        let mut doc = default_document();
        doc.podcast.release_time_local = "midnight".to_string();
        let errors = validate_invariants(&doc);
        assert_eq!(
            errors,
            vec!["podcast.releaseTimeLocal 'midnight' is not HH:MM".to_string()]
        );
    }
}
