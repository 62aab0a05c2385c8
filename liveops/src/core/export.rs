//! JSON and CSV renderings of the document.
//!
//! CSV output quotes every field, doubles embedded quotes, and joins lines
//! with `\n` (no trailing newline). Absent optional fields render as empty
//! strings; read-time defaults are never applied here.

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::document::{Document, PlatformRecord, SocialPost};

pub const DOCUMENT_FILENAME: &str = "dr_dwayne_jackson_podcast_live_ops.json";
pub const PLATFORMS_FILENAME: &str = "platform_tracking.csv";
pub const SOCIALS_FILENAME: &str = "social_calendar.csv";

pub const PLATFORM_HEADER: [&str; 9] = [
    "episodeNumber",
    "date",
    "platform",
    "views",
    "averageWatchTime",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
];

pub const SOCIAL_HEADER: [&str; 11] = [
    "date",
    "platform",
    "time",
    "copy",
    "asset",
    "status",
    "link",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
];

/// The three fixed export actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Document,
    Platforms,
    Socials,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [
        ExportKind::Document,
        ExportKind::Platforms,
        ExportKind::Socials,
    ];

    pub fn filename(self) -> &'static str {
        match self {
            ExportKind::Document => DOCUMENT_FILENAME,
            ExportKind::Platforms => PLATFORMS_FILENAME,
            ExportKind::Socials => SOCIALS_FILENAME,
        }
    }

    pub fn render(self, doc: &Document) -> Result<String> {
        match self {
            ExportKind::Document => document_json(doc),
            ExportKind::Platforms => platforms_csv(&doc.platforms),
            ExportKind::Socials => socials_csv(&doc.socials.posts),
        }
    }
}

/// Full document, pretty-printed with a trailing newline.
pub fn document_json(doc: &Document) -> Result<String> {
    let mut buf = serde_json::to_string_pretty(doc).context("serialize document json")?;
    buf.push('\n');
    Ok(buf)
}

/// Parse a full document from exported JSON.
pub fn parse_document(raw: &str) -> Result<Document> {
    serde_json::from_str(raw).context("parse document json")
}

pub fn platforms_csv(rows: &[PlatformRecord]) -> Result<String> {
    let records = rows.iter().map(|row| {
        vec![
            row.episode_number.clone(),
            row.date.clone(),
            row.platform.to_string(),
            row.views.to_string(),
            row.awt.clone(),
            text(&row.utm.source),
            text(&row.utm.medium),
            text(&row.utm.campaign),
            text(&row.utm.content),
        ]
    });
    write_csv(&PLATFORM_HEADER, records)
}

pub fn socials_csv(posts: &[SocialPost]) -> Result<String> {
    let records = posts.iter().map(|post| {
        vec![
            post.date.clone(),
            post.platform.to_string(),
            post.time.clone(),
            post.copy.clone(),
            post.asset.clone(),
            post.status.to_string(),
            text(&post.link),
            text(&post.utm.source),
            text(&post.utm.medium),
            text(&post.utm.campaign),
            text(&post.utm.content),
        ]
    });
    write_csv(&SOCIAL_HEADER, records)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn write_csv(header: &[&str], records: impl Iterator<Item = Vec<String>>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header).context("write csv header")?;
    for record in records {
        writer.write_record(&record).context("write csv row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flush csv: {}", err.error()))?;
    let mut out = String::from_utf8(bytes).context("csv output is not utf-8")?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}
