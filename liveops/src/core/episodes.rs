//! Episode list operations.
//!
//! Storage order is insertion order. Every read path shows episodes in
//! ascending `date` string order, which is chronological for ISO dates; the
//! two orders are allowed to differ.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::dates::{format_iso_date, next_tuesday, parse_local_date};
use crate::core::records::{append, remove_at, update_at};
use crate::core::types::{EpisodePatch, MutationError, Section};
use crate::document::{Episode, PodcastPlan};

/// Length prefilled on new episodes.
pub const DEFAULT_LENGTH: &str = "45–60 min";

/// Numeric value of an episode number, if it has one.
///
/// Surrounding whitespace is ignored; blank text is not numeric.
pub fn numeric_episode_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Render a number the way episode numbers are written (`3`, not `3.0`).
pub fn format_episode_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Episodes paired with their storage index, in display (date) order.
pub fn episodes_in_display_order(plan: &PodcastPlan) -> Vec<(usize, &Episode)> {
    let mut rows: Vec<(usize, &Episode)> = plan.items.iter().enumerate().collect();
    rows.sort_by(|(_, a), (_, b)| a.date.cmp(&b.date));
    rows
}

/// Release date per episode number. Later entries win on duplicate numbers.
pub fn episode_dates_by_number(episodes: &[Episode]) -> HashMap<String, String> {
    episodes
        .iter()
        .map(|episode| (episode.episode_number.clone(), episode.date.clone()))
        .collect()
}

/// Append a new episode.
///
/// With `prefill_next`, the new row follows the chronologically last episode:
/// dated the next Tuesday and numbered one past it. Otherwise it is dated
/// `today` and numbered `count + 1`.
pub fn add_episode(plan: &PodcastPlan, prefill_next: bool, today: NaiveDate) -> PodcastPlan {
    let mut date = format_iso_date(&today);
    let mut episode_number = (plan.items.len() + 1).to_string();

    let last = episodes_in_display_order(plan)
        .last()
        .map(|(_, episode)| *episode);
    if let (true, Some(last)) = (prefill_next, last) {
        let anchor = parse_local_date(&last.date).unwrap_or(today);
        // Past the last representable date, schedule from today instead.
        let scheduled = next_tuesday(anchor)
            .or_else(|| next_tuesday(today))
            .unwrap_or(today);
        date = format_iso_date(&scheduled);
        episode_number = match numeric_episode_number(&last.episode_number) {
            Some(number) => format_episode_number(number + 1.0),
            None => {
                let numeric = plan
                    .items
                    .iter()
                    .filter(|episode| numeric_episode_number(&episode.episode_number).is_some())
                    .count();
                (numeric + 1).to_string()
            }
        };
    }

    let episode = Episode {
        date,
        episode_number,
        length: DEFAULT_LENGTH.to_string(),
        content: String::new(),
        potential_guest: String::new(),
        tags: None,
        guest_booking: None,
    };
    PodcastPlan {
        items: append(&plan.items, episode),
        ..plan.clone()
    }
}

/// Merge `patch` into the episode at storage `index`.
pub fn update_episode(
    plan: &PodcastPlan,
    index: usize,
    patch: &EpisodePatch,
) -> Result<PodcastPlan, MutationError> {
    let items = update_at(&plan.items, Section::Episodes, index, |episode| {
        patch.apply(episode);
    })?;
    Ok(PodcastPlan {
        items,
        ..plan.clone()
    })
}

/// Remove the episode at storage `index`.
pub fn delete_episode(plan: &PodcastPlan, index: usize) -> Result<PodcastPlan, MutationError> {
    let items = remove_at(&plan.items, Section::Episodes, index)?;
    Ok(PodcastPlan {
        items,
        ..plan.clone()
    })
}
