//! Read-time defaults for optional fields.
//!
//! Stored records keep absent fields absent. Listings resolve defaults here so
//! every view agrees; exports never call into this module. Empty strings count
//! as absent.

use crate::document::{PlatformRecord, SocialPost, Utm};

/// UTM values with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUtm {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub content: String,
}

pub fn resolve_platform_utm(row: &PlatformRecord) -> ResolvedUtm {
    let utm = &row.utm;
    ResolvedUtm {
        source: or_default(&utm.source, String::new),
        medium: or_default(&utm.medium, || "podcast".to_string()),
        campaign: or_default(&utm.campaign, || {
            format!("ep{}", row.episode_number.to_lowercase())
        }),
        content: or_default(&utm.content, || "default".to_string()),
    }
}

pub fn resolve_post_utm(post: &SocialPost) -> ResolvedUtm {
    let utm: &Utm = &post.utm;
    ResolvedUtm {
        source: or_default(&utm.source, || post.platform.to_string().to_lowercase()),
        medium: or_default(&utm.medium, || "social".to_string()),
        campaign: or_default(&utm.campaign, String::new),
        content: or_default(&utm.content, String::new),
    }
}

pub fn resolve_post_link(post: &SocialPost) -> String {
    or_default(&post.link, String::new)
}

fn or_default(value: &Option<String>, fallback: impl FnOnce() -> String) -> String {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback(),
    }
}
