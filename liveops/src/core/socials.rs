//! Social posting calendar.
//!
//! Post ids are `date_platform` strings built at creation time. Generating the
//! same week twice yields duplicate ids; update and delete both act on every
//! post carrying the id.

use crate::core::dates::{
    add_days, format_iso_date, normalize_to_local_midnight, parse_local_date,
};
use crate::core::types::{MutationError, PostPatch};
use crate::document::{
    PostStatus, SocialCalendar, SocialPlatform, SocialPost, SuggestedWindows, Utm,
};

/// Days covered by one generated week.
pub const WEEK_DAYS: u64 = 7;

/// Composite post id.
pub fn post_id(date: &str, platform: SocialPlatform) -> String {
    format!("{date}_{platform}")
}

/// Append one planned post per day and platform for the week starting at `start_date`.
///
/// Platforms follow the key order of `windows`; each day takes the next slot
/// of its platform's windows, wrapping around. Existing posts are kept and no
/// deduplication happens.
pub fn generate_week(
    posts: &[SocialPost],
    windows: &SuggestedWindows,
    start_date: &str,
) -> Result<Vec<SocialPost>, MutationError> {
    let invalid = || MutationError::InvalidDate {
        value: start_date.to_string(),
    };
    let start = parse_local_date(start_date).ok_or_else(invalid)?;
    // The whole week must be representable before anything is generated.
    let days = (0..WEEK_DAYS)
        .map(|offset| add_days(start, offset))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    let mut next = Vec::with_capacity(posts.len() + (WEEK_DAYS as usize) * windows.len());
    next.extend_from_slice(posts);
    for (offset, day) in days.iter().enumerate() {
        let date = format_iso_date(day);
        for (platform, slots) in windows.iter() {
            // Empty window lists still get a post, with no suggested time.
            let time = if slots.is_empty() {
                String::new()
            } else {
                slots[offset % slots.len()].clone()
            };
            next.push(SocialPost {
                id: post_id(&date, platform),
                date: date.clone(),
                platform,
                time,
                copy: String::new(),
                asset: String::new(),
                status: PostStatus::Planned,
                link: None,
                utm: Utm::default(),
            });
        }
    }
    Ok(next)
}

/// Merge `patch` into every post with `id`.
pub fn update_post(
    posts: &[SocialPost],
    id: &str,
    patch: &PostPatch,
) -> Result<Vec<SocialPost>, MutationError> {
    ensure_present(posts, id)?;
    Ok(posts
        .iter()
        .cloned()
        .map(|mut post| {
            if post.id == id {
                patch.apply(&mut post);
            }
            post
        })
        .collect())
}

/// Remove every post with `id`.
pub fn delete_post(posts: &[SocialPost], id: &str) -> Result<Vec<SocialPost>, MutationError> {
    ensure_present(posts, id)?;
    Ok(posts.iter().filter(|post| post.id != id).cloned().collect())
}

fn ensure_present(posts: &[SocialPost], id: &str) -> Result<(), MutationError> {
    if posts.iter().any(|post| post.id == id) {
        return Ok(());
    }
    Err(MutationError::PostNotFound { id: id.to_string() })
}

/// Posts in display order: ascending `date + platform`.
pub fn posts_in_display_order(posts: &[SocialPost]) -> Vec<&SocialPost> {
    let mut sorted: Vec<&SocialPost> = posts.iter().collect();
    sorted.sort_by_cached_key(|post| format!("{}{}", post.date, post.platform));
    sorted
}

/// Calendar with a new start date, normalized when it parses.
pub fn set_start_date(calendar: &SocialCalendar, start_date: &str) -> SocialCalendar {
    SocialCalendar {
        start_date: normalize_to_local_midnight(start_date),
        ..calendar.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::default_suggested_windows;
    use crate::test_support::post;

    #[test]
    fn week_has_one_post_per_day_and_platform() {
        let windows = default_suggested_windows();
        let posts = generate_week(&[], &windows, "2025-10-28").expect("generate");
        assert_eq!(posts.len(), 7 * windows.len());
        assert_eq!(posts[0].id, "2025-10-28_Instagram");
        assert_eq!(posts[0].status, PostStatus::Planned);
        assert_eq!(posts.last().expect("last").id, "2025-11-03_YouTube");
    }

    #[test]
    fn times_cycle_through_windows() {
        let windows = default_suggested_windows();
        let posts = generate_week(&[], &windows, "2025-10-28").expect("generate");
        let tiktok: Vec<&str> = posts
            .iter()
            .filter(|p| p.platform == SocialPlatform::TikTok)
            .map(|p| p.time.as_str())
            .collect();
        assert_eq!(
            tiktok,
            vec!["12:00", "20:00", "12:00", "20:00", "12:00", "20:00", "12:00"]
        );
    }

    #[test]
    fn platform_order_follows_window_keys() {
        let windows = SuggestedWindows::new(vec![
            (SocialPlatform::X, vec!["07:30".to_string()]),
            (SocialPlatform::Facebook, Vec::new()),
        ]);
        let posts = generate_week(&[], &windows, "2025-12-30").expect("generate");
        assert_eq!(posts.len(), 14);
        assert_eq!(posts[0].platform, SocialPlatform::X);
        assert_eq!(posts[1].platform, SocialPlatform::Facebook);
        assert_eq!(posts[1].time, "");
        assert_eq!(posts[13].date, "2026-01-05");
    }

    #[test]
    fn regenerating_a_week_duplicates_ids() {
        let windows = default_suggested_windows();
        let once = generate_week(&[], &windows, "2025-10-28").expect("generate");
        let twice = generate_week(&once, &windows, "2025-10-28").expect("generate");
        assert_eq!(twice.len(), 2 * once.len());
        let dupes = twice
            .iter()
            .filter(|p| p.id == "2025-10-28_TikTok")
            .count();
        assert_eq!(dupes, 2);
    }

    #[test]
    fn invalid_start_date_is_reported() {
        let err = generate_week(&[], &default_suggested_windows(), "someday").expect_err("invalid");
        assert_eq!(
            err,
            MutationError::InvalidDate {
                value: "someday".to_string()
            }
        );
    }

    #[test]
    fn update_and_delete_act_on_all_duplicates() {
        let posts = vec![
            post("2025-10-28", SocialPlatform::X, "07:30"),
            post("2025-10-28", SocialPlatform::X, "07:30"),
            post("2025-10-29", SocialPlatform::X, "12:30"),
        ];
        let patch = PostPatch {
            copy: Some("Episode 1 is live".to_string()),
            ..PostPatch::default()
        };
        let updated = update_post(&posts, "2025-10-28_X", &patch).expect("update");
        assert_eq!(updated[0].copy, "Episode 1 is live");
        assert_eq!(updated[1].copy, "Episode 1 is live");
        assert_eq!(updated[2].copy, "");

        let deleted = delete_post(&updated, "2025-10-28_X").expect("delete");
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, "2025-10-29_X");
    }

    #[test]
    fn week_running_past_the_last_date_is_rejected() {
        let err = generate_week(&[], &default_suggested_windows(), "+262142-12-30")
            .expect_err("week does not fit");
        assert_eq!(
            err,
            MutationError::InvalidDate {
                value: "+262142-12-30".to_string()
            }
        );
    }

    #[test]
    fn unknown_id_is_reported() {
        let posts = vec![post("2025-10-28", SocialPlatform::X, "07:30")];
        assert!(update_post(&posts, "nope", &PostPatch::default()).is_err());
        assert!(delete_post(&posts, "nope").is_err());
    }

    #[test]
    fn display_order_is_date_then_platform() {
        let posts = vec![
            post("2025-10-29", SocialPlatform::Facebook, "08:00"),
            post("2025-10-28", SocialPlatform::X, "07:30"),
            post("2025-10-28", SocialPlatform::Instagram, "08:00"),
        ];
        let ids: Vec<&str> = posts_in_display_order(&posts)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["2025-10-28_Instagram", "2025-10-28_X", "2025-10-29_Facebook"]
        );
    }
}
