//! Root document: podcast plan, platform rows, thumbnail tests, social calendar.
//!
//! The whole document is persisted as one JSON object. Field names follow the
//! stored camelCase layout; UTM fields keep their `utm_*` spelling.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of display labels shared by the enum fields of the document.
pub trait Label: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

/// Match `value` against the labels of `T`, ignoring case, spaces and punctuation.
fn parse_label<T: Label>(kind: &str, value: &str) -> Result<T, String> {
    let wanted = squash(value);
    T::ALL
        .iter()
        .copied()
        .find(|item| squash(item.label()) == wanted)
        .ok_or_else(|| {
            let options = T::ALL
                .iter()
                .map(|item| item.label())
                .collect::<Vec<_>>()
                .join(", ");
            format!("unknown {kind} '{value}' (expected one of: {options})")
        })
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! labelled {
    ($ty:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl Label for $ty {
            const ALL: &'static [Self] = &[$($ty::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                parse_label($kind, value)
            }
        }
    };
}

/// Release rhythm assumed by the scheduling helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    #[default]
    #[serde(rename = "TUESDAY")]
    Tuesday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuestBooking {
    Planned,
    Invited,
    Confirmed,
    Recorded,
    #[serde(rename = "N/A")]
    NotApplicable,
}

labelled!(GuestBooking, "guest booking", {
    Planned => "Planned",
    Invited => "Invited",
    Confirmed => "Confirmed",
    Recorded => "Recorded",
    NotApplicable => "N/A",
});

/// Listening platform tracked per episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Spotify,
    #[serde(rename = "Apple Podcasts")]
    ApplePodcasts,
    #[serde(rename = "iHeartPodcasts")]
    IHeartPodcasts,
    YouTube,
    #[serde(rename = "Amazon Music")]
    AmazonMusic,
    #[serde(rename = "RSS")]
    Rss,
}

labelled!(Platform, "platform", {
    Spotify => "Spotify",
    ApplePodcasts => "Apple Podcasts",
    IHeartPodcasts => "iHeartPodcasts",
    YouTube => "YouTube",
    AmazonMusic => "Amazon Music",
    Rss => "RSS",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantStatus {
    Planned,
    #[serde(rename = "In Test")]
    InTest,
    Winner,
    Retired,
}

labelled!(VariantStatus, "variant status", {
    Planned => "Planned",
    InTest => "In Test",
    Winner => "Winner",
    Retired => "Retired",
});

/// Social network a post is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    TikTok,
    X,
    Snapchat,
    YouTube,
}

labelled!(SocialPlatform, "social platform", {
    Instagram => "Instagram",
    Facebook => "Facebook",
    TikTok => "TikTok",
    X => "X",
    Snapchat => "Snapchat",
    YouTube => "YouTube",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Planned,
    Scheduled,
    Posted,
    #[serde(rename = "Needs Asset")]
    NeedsAsset,
}

labelled!(PostStatus, "post status", {
    Planned => "Planned",
    Scheduled => "Scheduled",
    Posted => "Posted",
    NeedsAsset => "Needs Asset",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub podcast: PodcastPlan,
    pub platforms: Vec<PlatformRecord>,
    pub thumbs: ThumbTest,
    pub socials: SocialCalendar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastPlan {
    /// Time of day releases go live, local time (`HH:MM`).
    pub release_time_local: String,
    pub cadence: Cadence,
    /// Storage order is insertion order, not release order.
    pub items: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// ISO calendar date (`YYYY-MM-DD`) of the release day.
    pub date: String,
    /// Free-form; numeric values drive next-episode numbering.
    pub episode_number: String,
    pub length: String,
    pub content: String,
    pub potential_guest: String,
    /// Comma-separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_booking: Option<GuestBooking>,
}

/// Campaign-tracking parameters. Absent fields stay absent in storage; display
/// defaults come from [`crate::core::defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utm {
    #[serde(
        rename = "utm_source",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        rename = "utm_medium",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub medium: Option<String>,
    #[serde(
        rename = "utm_campaign",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign: Option<String>,
    #[serde(
        rename = "utm_content",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRecord {
    pub episode_number: String,
    pub date: String,
    pub platform: Platform,
    pub views: u64,
    /// Average watch time, `HH:MM:SS`.
    pub awt: String,
    #[serde(flatten)]
    pub utm: Utm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbTest {
    pub variants: Vec<ThumbVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbVariant {
    /// Positional letter; not unique.
    pub id: String,
    pub episode_number: String,
    pub hypothesis: String,
    pub status: VariantStatus,
    /// Click-through rate, percent.
    pub ctr: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialCalendar {
    pub start_date: String,
    pub posts: Vec<SocialPost>,
    pub suggested_windows: SuggestedWindows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    /// `date_platform`; not unique.
    pub id: String,
    pub date: String,
    pub platform: SocialPlatform,
    pub time: String,
    pub copy: String,
    pub asset: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub utm: Utm,
}

/// Ordered platform → posting times mapping.
///
/// Serialized as a JSON object; key order is preserved in both directions
/// because it drives post generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestedWindows(Vec<(SocialPlatform, Vec<String>)>);

impl SuggestedWindows {
    pub fn new(entries: Vec<(SocialPlatform, Vec<String>)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SocialPlatform, &[String])> {
        self.0
            .iter()
            .map(|(platform, times)| (*platform, times.as_slice()))
    }

    pub fn get(&self, platform: SocialPlatform) -> Option<&[String]> {
        self.iter()
            .find(|(candidate, _)| *candidate == platform)
            .map(|(_, times)| times)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SuggestedWindows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (platform, times) in &self.0 {
            map.serialize_entry(platform, times)?;
        }
        map.end()
    }
}

struct WindowsVisitor;

impl<'de> Visitor<'de> for WindowsVisitor {
    type Value = SuggestedWindows;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of social platform to posting times")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(SocialPlatform, Vec<String>)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((platform, times)) = access.next_entry::<SocialPlatform, Vec<String>>()? {
            // Last occurrence wins, first position is kept.
            match entries.iter_mut().find(|entry| entry.0 == platform) {
                Some(entry) => entry.1 = times,
                None => entries.push((platform, times)),
            }
        }
        Ok(SuggestedWindows(entries))
    }
}

impl<'de> Deserialize<'de> for SuggestedWindows {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WindowsVisitor)
    }
}

fn times(slots: &[&str]) -> Vec<String> {
    slots.iter().map(|slot| (*slot).to_string()).collect()
}

fn seed_episode(date: &str, number: &str, length: &str, content: &str, guest: &str) -> Episode {
    Episode {
        date: date.to_string(),
        episode_number: number.to_string(),
        length: length.to_string(),
        content: content.to_string(),
        potential_guest: guest.to_string(),
        tags: None,
        guest_booking: None,
    }
}

/// Default suggested posting windows, in generation order.
pub fn default_suggested_windows() -> SuggestedWindows {
    SuggestedWindows::new(vec![
        (SocialPlatform::Instagram, times(&["08:00", "12:00", "19:00"])),
        (SocialPlatform::Facebook, times(&["08:00", "12:00", "19:00"])),
        (SocialPlatform::TikTok, times(&["12:00", "20:00"])),
        (SocialPlatform::X, times(&["07:30", "12:30", "18:30"])),
        (SocialPlatform::Snapchat, times(&["15:00", "20:30"])),
        (SocialPlatform::YouTube, times(&["09:00", "17:00"])),
    ])
}

/// Seeded document used on first run and when the stored blob is unreadable.
pub fn default_document() -> Document {
    Document {
        podcast: PodcastPlan {
            release_time_local: "00:00".to_string(),
            cadence: Cadence::Tuesday,
            items: vec![
                seed_episode(
                    "2025-10-28",
                    "Teaser",
                    "~3–5 min",
                    "Series teaser and show promise",
                    "N/A",
                ),
                seed_episode(
                    "2025-11-04",
                    "1",
                    "45–60 min",
                    "Peptides for men, science, safety, protocols",
                    "TBD",
                ),
                seed_episode(
                    "2025-11-11",
                    "2",
                    "45–60 min",
                    "Peptides for women, science, safety, protocols",
                    "TBD",
                ),
            ],
        },
        platforms: Vec::new(),
        thumbs: ThumbTest {
            variants: Vec::new(),
        },
        socials: SocialCalendar {
            start_date: "2025-10-28".to_string(),
            posts: Vec::new(),
            suggested_windows: default_suggested_windows(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_document_round_trips_through_json() {
        let doc = default_document();
        let raw = serde_json::to_string(&doc).expect("serialize");
        let parsed: Document = serde_json::from_str(&raw).expect("parse");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn suggested_windows_keep_key_order() {
        let raw = r#"{"YouTube":["09:00"],"Instagram":["08:00","12:00"],"X":[]}"#;
        let windows: SuggestedWindows = serde_json::from_str(raw).expect("parse");
        let order: Vec<SocialPlatform> = windows.iter().map(|(platform, _)| platform).collect();
        assert_eq!(
            order,
            vec![
                SocialPlatform::YouTube,
                SocialPlatform::Instagram,
                SocialPlatform::X
            ]
        );
        assert_eq!(serde_json::to_string(&windows).expect("serialize"), raw);
    }

    #[test]
    fn stored_field_names_match_persisted_layout() {
        let record = PlatformRecord {
            episode_number: "1".to_string(),
            date: "2025-11-04".to_string(),
            platform: Platform::ApplePodcasts,
            views: 12,
            awt: "00:10:00".to_string(),
            utm: Utm {
                medium: Some("podcast".to_string()),
                ..Utm::default()
            },
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "episodeNumber": "1",
                "date": "2025-11-04",
                "platform": "Apple Podcasts",
                "views": 12,
                "awt": "00:10:00",
                "utm_medium": "podcast",
            })
        );
    }

    #[test]
    fn labels_parse_loosely() {
        assert_eq!(
            "apple-podcasts".parse::<Platform>(),
            Ok(Platform::ApplePodcasts)
        );
        assert_eq!("needs asset".parse::<PostStatus>(), Ok(PostStatus::NeedsAsset));
        assert_eq!(
            "n/a".parse::<GuestBooking>(),
            Ok(GuestBooking::NotApplicable)
        );
        assert!("Myspace".parse::<SocialPlatform>().is_err());
    }
}
