//! Shared deterministic types for document mutations.
//!
//! Patches carry only the fields being edited: `None` leaves the stored value
//! untouched. Applying a patch never rewrites identifiers.

use std::fmt;

use thiserror::Error;

use crate::document::{
    Episode, GuestBooking, Platform, PlatformRecord, PostStatus, SocialPlatform, SocialPost,
    ThumbVariant, Utm, VariantStatus,
};

/// Index-addressed collections of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Episodes,
    PlatformRows,
    Variants,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Episodes => "podcast.items",
            Section::PlatformRows => "platforms",
            Section::Variants => "thumbs.variants",
        })
    }
}

/// Why a mutation left the document unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("{section}[{index}] is out of range (len {len})")]
    IndexOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },
    #[error("no social post with id '{id}'")]
    PostNotFound { id: String },
    #[error("'{value}' is not a calendar date")]
    InvalidDate { value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodePatch {
    pub date: Option<String>,
    pub episode_number: Option<String>,
    pub length: Option<String>,
    pub content: Option<String>,
    pub potential_guest: Option<String>,
    pub tags: Option<String>,
    pub guest_booking: Option<GuestBooking>,
}

impl EpisodePatch {
    pub fn apply(&self, episode: &mut Episode) {
        merge(&mut episode.date, &self.date);
        merge(&mut episode.episode_number, &self.episode_number);
        merge(&mut episode.length, &self.length);
        merge(&mut episode.content, &self.content);
        merge(&mut episode.potential_guest, &self.potential_guest);
        merge_optional(&mut episode.tags, &self.tags);
        if let Some(booking) = self.guest_booking {
            episode.guest_booking = Some(booking);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtmPatch {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub content: Option<String>,
}

impl UtmPatch {
    pub fn apply(&self, utm: &mut Utm) {
        merge_optional(&mut utm.source, &self.source);
        merge_optional(&mut utm.medium, &self.medium);
        merge_optional(&mut utm.campaign, &self.campaign);
        merge_optional(&mut utm.content, &self.content);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformRowPatch {
    pub episode_number: Option<String>,
    pub date: Option<String>,
    pub platform: Option<Platform>,
    pub views: Option<u64>,
    pub awt: Option<String>,
    pub utm: UtmPatch,
}

impl PlatformRowPatch {
    pub fn apply(&self, row: &mut PlatformRecord) {
        merge(&mut row.episode_number, &self.episode_number);
        merge(&mut row.date, &self.date);
        if let Some(platform) = self.platform {
            row.platform = platform;
        }
        if let Some(views) = self.views {
            row.views = views;
        }
        merge(&mut row.awt, &self.awt);
        self.utm.apply(&mut row.utm);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantPatch {
    pub episode_number: Option<String>,
    pub hypothesis: Option<String>,
    pub status: Option<VariantStatus>,
    pub ctr: Option<f64>,
    pub notes: Option<String>,
}

impl VariantPatch {
    pub fn apply(&self, variant: &mut ThumbVariant) {
        merge(&mut variant.episode_number, &self.episode_number);
        merge(&mut variant.hypothesis, &self.hypothesis);
        if let Some(status) = self.status {
            variant.status = status;
        }
        if let Some(ctr) = self.ctr {
            variant.ctr = ctr;
        }
        merge(&mut variant.notes, &self.notes);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub date: Option<String>,
    pub platform: Option<SocialPlatform>,
    pub time: Option<String>,
    pub copy: Option<String>,
    pub asset: Option<String>,
    pub status: Option<PostStatus>,
    pub link: Option<String>,
    pub utm: UtmPatch,
}

impl PostPatch {
    /// Merge into `post`. The `id` keeps its creation-time value even when the
    /// date or platform changes.
    pub fn apply(&self, post: &mut SocialPost) {
        merge(&mut post.date, &self.date);
        if let Some(platform) = self.platform {
            post.platform = platform;
        }
        merge(&mut post.time, &self.time);
        merge(&mut post.copy, &self.copy);
        merge(&mut post.asset, &self.asset);
        if let Some(status) = self.status {
            post.status = status;
        }
        merge_optional(&mut post.link, &self.link);
        self.utm.apply(&mut post.utm);
    }
}

fn merge(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn merge_optional(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{episode, post};

    #[test]
    fn episode_patch_only_touches_given_fields() {
        let mut ep = episode("2025-11-04", "1");
        let patch = EpisodePatch {
            content: Some("Sleep and recovery".to_string()),
            guest_booking: Some(GuestBooking::Invited),
            ..EpisodePatch::default()
        };
        patch.apply(&mut ep);
        assert_eq!(ep.date, "2025-11-04");
        assert_eq!(ep.content, "Sleep and recovery");
        assert_eq!(ep.guest_booking, Some(GuestBooking::Invited));
        assert_eq!(ep.tags, None);
    }

    #[test]
    fn post_patch_keeps_id() {
        let mut p = post("2025-10-28", SocialPlatform::TikTok, "12:00");
        let patch = PostPatch {
            date: Some("2025-10-29".to_string()),
            utm: UtmPatch {
                campaign: Some("launch".to_string()),
                ..UtmPatch::default()
            },
            ..PostPatch::default()
        };
        patch.apply(&mut p);
        assert_eq!(p.id, "2025-10-28_TikTok");
        assert_eq!(p.date, "2025-10-29");
        assert_eq!(p.utm.campaign.as_deref(), Some("launch"));
    }

    #[test]
    fn errors_name_the_section() {
        let err = MutationError::IndexOutOfRange {
            section: Section::Variants,
            index: 4,
            len: 2,
        };
        assert_eq!(err.to_string(), "thumbs.variants[4] is out of range (len 2)");
    }
}
