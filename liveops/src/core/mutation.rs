//! Every document edit as a value, and the pure function that applies it.

use chrono::NaiveDate;

use crate::core::dates::format_iso_date;
use crate::core::episodes::{add_episode, delete_episode, update_episode};
use crate::core::platforms::{add_platform_row, delete_platform_row, update_platform_row};
use crate::core::socials::{delete_post, generate_week, set_start_date, update_post};
use crate::core::thumbs::{add_variant, delete_variant, update_variant};
use crate::core::types::{EpisodePatch, MutationError, PlatformRowPatch, PostPatch, VariantPatch};
use crate::document::{Document, Platform};

/// Which day a generated week starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekStart {
    /// The calendar's stored start date.
    CalendarStart,
    Today,
    Date(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddEpisode {
        prefill_next: bool,
    },
    UpdateEpisode {
        index: usize,
        patch: EpisodePatch,
    },
    DeleteEpisode {
        index: usize,
    },
    SetReleaseTime {
        time: String,
    },
    AddPlatformRow {
        episode_number: Option<String>,
        platform: Platform,
    },
    UpdatePlatformRow {
        index: usize,
        patch: PlatformRowPatch,
    },
    DeletePlatformRow {
        index: usize,
    },
    AddVariant,
    UpdateVariant {
        index: usize,
        patch: VariantPatch,
    },
    DeleteVariant {
        index: usize,
    },
    GenerateWeek {
        start: WeekStart,
    },
    UpdatePost {
        id: String,
        patch: PostPatch,
    },
    DeletePost {
        id: String,
    },
    SetSocialStartDate {
        date: String,
    },
    /// Replace the whole document (JSON import).
    ReplaceDocument(Box<Document>),
}

impl Mutation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddEpisode { .. } => "add_episode",
            Mutation::UpdateEpisode { .. } => "update_episode",
            Mutation::DeleteEpisode { .. } => "delete_episode",
            Mutation::SetReleaseTime { .. } => "set_release_time",
            Mutation::AddPlatformRow { .. } => "add_platform_row",
            Mutation::UpdatePlatformRow { .. } => "update_platform_row",
            Mutation::DeletePlatformRow { .. } => "delete_platform_row",
            Mutation::AddVariant => "add_variant",
            Mutation::UpdateVariant { .. } => "update_variant",
            Mutation::DeleteVariant { .. } => "delete_variant",
            Mutation::GenerateWeek { .. } => "generate_week",
            Mutation::UpdatePost { .. } => "update_post",
            Mutation::DeletePost { .. } => "delete_post",
            Mutation::SetSocialStartDate { .. } => "set_social_start_date",
            Mutation::ReplaceDocument(_) => "replace_document",
        }
    }
}

/// Apply `mutation` to `doc`, producing a new document.
///
/// `doc` is never modified. On error the caller keeps `doc` as is.
pub fn apply_mutation(
    doc: &Document,
    mutation: Mutation,
    today: NaiveDate,
) -> Result<Document, MutationError> {
    let mut next = doc.clone();
    match mutation {
        Mutation::AddEpisode { prefill_next } => {
            next.podcast = add_episode(&doc.podcast, prefill_next, today);
        }
        Mutation::UpdateEpisode { index, patch } => {
            next.podcast = update_episode(&doc.podcast, index, &patch)?;
        }
        Mutation::DeleteEpisode { index } => {
            next.podcast = delete_episode(&doc.podcast, index)?;
        }
        Mutation::SetReleaseTime { time } => {
            next.podcast.release_time_local = time;
        }
        Mutation::AddPlatformRow {
            episode_number,
            platform,
        } => {
            next.platforms = add_platform_row(
                &doc.platforms,
                episode_number.as_deref(),
                platform,
                &doc.podcast.items,
                today,
            );
        }
        Mutation::UpdatePlatformRow { index, patch } => {
            next.platforms = update_platform_row(&doc.platforms, index, &patch)?;
        }
        Mutation::DeletePlatformRow { index } => {
            next.platforms = delete_platform_row(&doc.platforms, index)?;
        }
        Mutation::AddVariant => {
            next.thumbs.variants = add_variant(&doc.thumbs.variants);
        }
        Mutation::UpdateVariant { index, patch } => {
            next.thumbs.variants = update_variant(&doc.thumbs.variants, index, &patch)?;
        }
        Mutation::DeleteVariant { index } => {
            next.thumbs.variants = delete_variant(&doc.thumbs.variants, index)?;
        }
        Mutation::GenerateWeek { start } => {
            let start_date = match start {
                WeekStart::CalendarStart => doc.socials.start_date.clone(),
                WeekStart::Today => format_iso_date(&today),
                WeekStart::Date(date) => date,
            };
            next.socials.posts = generate_week(
                &doc.socials.posts,
                &doc.socials.suggested_windows,
                &start_date,
            )?;
        }
        Mutation::UpdatePost { id, patch } => {
            next.socials.posts = update_post(&doc.socials.posts, &id, &patch)?;
        }
        Mutation::DeletePost { id } => {
            next.socials.posts = delete_post(&doc.socials.posts, &id)?;
        }
        Mutation::SetSocialStartDate { date } => {
            next.socials = set_start_date(&doc.socials, &date);
        }
        Mutation::ReplaceDocument(replacement) => {
            next = *replacement;
        }
    }
    Ok(next)
}
