//! Per-episode platform tracking rows.

use chrono::NaiveDate;

use crate::core::dates::format_iso_date;
use crate::core::episodes::{episode_dates_by_number, numeric_episode_number};
use crate::core::records::{append, remove_at, update_at};
use crate::core::types::{MutationError, PlatformRowPatch, Section};
use crate::document::{Episode, Platform, PlatformRecord, Utm};

/// Watch time prefilled on new rows.
pub const ZERO_WATCH_TIME: &str = "00:00:00";

/// Append a tracking row for `episode_number`.
///
/// A blank episode number selects the first numerically-numbered episode in
/// storage order (or `"1"`). The date comes from that episode, or `today`
/// when no episode carries the number.
pub fn add_platform_row(
    rows: &[PlatformRecord],
    episode_number: Option<&str>,
    platform: Platform,
    episodes: &[Episode],
    today: NaiveDate,
) -> Vec<PlatformRecord> {
    let episode_number = match episode_number.map(str::trim) {
        Some(number) if !number.is_empty() => number.to_string(),
        _ => default_episode_number(episodes),
    };
    let date = episode_dates_by_number(episodes)
        .remove(&episode_number)
        .unwrap_or_else(|| format_iso_date(&today));
    let row = PlatformRecord {
        episode_number,
        date,
        platform,
        views: 0,
        awt: ZERO_WATCH_TIME.to_string(),
        utm: Utm::default(),
    };
    append(rows, row)
}

fn default_episode_number(episodes: &[Episode]) -> String {
    episodes
        .iter()
        .map(|episode| episode.episode_number.as_str())
        .find(|number| numeric_episode_number(number).is_some())
        .unwrap_or("1")
        .to_string()
}

pub fn update_platform_row(
    rows: &[PlatformRecord],
    index: usize,
    patch: &PlatformRowPatch,
) -> Result<Vec<PlatformRecord>, MutationError> {
    update_at(rows, Section::PlatformRows, index, |row| patch.apply(row))
}

pub fn delete_platform_row(
    rows: &[PlatformRecord],
    index: usize,
) -> Result<Vec<PlatformRecord>, MutationError> {
    remove_at(rows, Section::PlatformRows, index)
}

/// Coerce edited views text: non-digits are dropped, failure yields 0.
pub fn coerce_views(input: &str) -> u64 {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, episode};

    #[test]
    fn explicit_episode_takes_its_release_date() {
        let episodes = vec![episode("2025-11-04", "1"), episode("2025-11-11", "2")];
        let rows = add_platform_row(
            &[],
            Some("2"),
            Platform::YouTube,
            &episodes,
            date("2026-01-01"),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].episode_number, "2");
        assert_eq!(rows[0].date, "2025-11-11");
        assert_eq!(rows[0].platform, Platform::YouTube);
        assert_eq!(rows[0].views, 0);
        assert_eq!(rows[0].awt, ZERO_WATCH_TIME);
        assert_eq!(rows[0].utm, Utm::default());
    }

    #[test]
    fn blank_episode_picks_first_numeric_in_storage_order() {
        let episodes = vec![
            episode("2025-10-28", "Teaser"),
            episode("2025-11-11", "2"),
            episode("2025-11-04", "1"),
        ];
        let rows = add_platform_row(
            &[],
            Some("  "),
            Platform::Spotify,
            &episodes,
            date("2026-01-01"),
        );
        assert_eq!(rows[0].episode_number, "2");
        assert_eq!(rows[0].date, "2025-11-11");
    }

    #[test]
    fn unknown_episode_falls_back_to_today() {
        let episodes = vec![episode("2025-10-28", "Teaser")];
        let rows = add_platform_row(&[], None, Platform::Rss, &episodes, date("2026-10-18"));
        assert_eq!(rows[0].episode_number, "1");
        assert_eq!(rows[0].date, "2026-10-18");
    }

    #[test]
    fn views_coercion_strips_non_digits() {
        assert_eq!(coerce_views("1,234"), 1234);
        assert_eq!(coerce_views(" 98 plays"), 98);
        assert_eq!(coerce_views(""), 0);
        assert_eq!(coerce_views("n/a"), 0);
        assert_eq!(coerce_views("99999999999999999999999"), 0);
    }

    #[test]
    fn stale_row_index_is_reported() {
        assert!(delete_platform_row(&[], 0).is_err());
    }
}
