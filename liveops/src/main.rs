//! Podcast live-ops planner.
//!
//! Keeps the release plan, platform tracking, thumbnail tests and social
//! calendar in one persisted document. Every editing command applies exactly
//! one mutation and saves; `show` lists sections with the storage indices the
//! editing commands expect.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use liveops::core::defaults::{resolve_platform_utm, resolve_post_link, resolve_post_utm};
use liveops::core::episodes::episodes_in_display_order;
use liveops::core::export::{ExportKind, parse_document};
use liveops::core::invariants::validate_invariants;
use liveops::core::mutation::{Mutation, WeekStart};
use liveops::core::platforms::coerce_views;
use liveops::core::socials::posts_in_display_order;
use liveops::core::thumbs::coerce_ctr;
use liveops::core::types::{EpisodePatch, PlatformRowPatch, PostPatch, UtmPatch, VariantPatch};
use liveops::document::{
    Document, GuestBooking, Platform, PostStatus, SocialPlatform, VariantStatus,
    default_document,
};
use liveops::exit_codes;
use liveops::io::config::{CONFIG_FILENAME, LiveOpsConfig, load_config, write_config};
use liveops::io::export_sink::{DirectorySink, export};
use liveops::io::storage::FileStorage;
use liveops::io::store::{ApplyOutcome, Store};
use liveops::logging;

#[derive(Parser)]
#[command(
    name = "liveops",
    version,
    about = "Plan and track a weekly podcast's releases, platforms, thumbnails and socials"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the config file and seed the document if missing.
    Init {
        /// Overwrite the config and reset the document to the seeded example.
        #[arg(short, long)]
        force: bool,
    },
    /// List a section in display order, with storage indices.
    Show {
        #[arg(value_enum, default_value_t = ShowSection::All)]
        section: ShowSection,
    },
    /// Edit the release plan.
    #[command(subcommand)]
    Episode(EpisodeCommand),
    /// Set the local release time (`HH:MM`).
    ReleaseTime { time: String },
    /// Edit platform tracking rows.
    #[command(subcommand)]
    Platform(PlatformCommand),
    /// Edit thumbnail test variants.
    #[command(subcommand)]
    Variant(VariantCommand),
    /// Edit the social calendar.
    #[command(subcommand)]
    Social(SocialCommand),
    /// Save export files into the configured export directory.
    Export {
        #[arg(value_enum, default_value_t = ExportTarget::All)]
        target: ExportTarget,
    },
    /// Replace the document with an exported JSON file.
    Import { file: PathBuf },
    /// Report duplicate ids, unnormalized dates and malformed times.
    Validate,
}

#[derive(Subcommand)]
enum EpisodeCommand {
    /// Append an episode (blank, or the next Tuesday after the latest release).
    Add {
        #[arg(long)]
        next: bool,
    },
    Update {
        index: usize,
        #[command(flatten)]
        fields: EpisodeFields,
    },
    Delete { index: usize },
}

#[derive(Args)]
struct EpisodeFields {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    length: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    guest: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    booking: Option<GuestBooking>,
}

impl From<EpisodeFields> for EpisodePatch {
    fn from(fields: EpisodeFields) -> Self {
        Self {
            date: fields.date,
            episode_number: fields.number,
            length: fields.length,
            content: fields.content,
            potential_guest: fields.guest,
            tags: fields.tags,
            guest_booking: fields.booking,
        }
    }
}

#[derive(Args)]
struct UtmFields {
    #[arg(long)]
    utm_source: Option<String>,
    #[arg(long)]
    utm_medium: Option<String>,
    #[arg(long)]
    utm_campaign: Option<String>,
    #[arg(long)]
    utm_content: Option<String>,
}

impl From<UtmFields> for UtmPatch {
    fn from(fields: UtmFields) -> Self {
        Self {
            source: fields.utm_source,
            medium: fields.utm_medium,
            campaign: fields.utm_campaign,
            content: fields.utm_content,
        }
    }
}

#[derive(Subcommand)]
enum PlatformCommand {
    /// Append a row; without `--episode` the first numbered episode is used.
    Add {
        #[arg(long)]
        episode: Option<String>,
        #[arg(long, default_value = "Spotify")]
        platform: Platform,
    },
    Update {
        index: usize,
        #[command(flatten)]
        fields: PlatformFields,
    },
    Delete { index: usize },
}

#[derive(Args)]
struct PlatformFields {
    #[arg(long)]
    episode: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    platform: Option<Platform>,
    /// Views as typed; non-digits are dropped.
    #[arg(long)]
    views: Option<String>,
    /// Average watch time, `HH:MM:SS`.
    #[arg(long)]
    awt: Option<String>,
    #[command(flatten)]
    utm: UtmFields,
}

impl From<PlatformFields> for PlatformRowPatch {
    fn from(fields: PlatformFields) -> Self {
        Self {
            episode_number: fields.episode,
            date: fields.date,
            platform: fields.platform,
            views: fields.views.as_deref().map(coerce_views),
            awt: fields.awt,
            utm: fields.utm.into(),
        }
    }
}

#[derive(Subcommand)]
enum VariantCommand {
    Add,
    Update {
        index: usize,
        #[command(flatten)]
        fields: VariantFields,
    },
    Delete { index: usize },
}

#[derive(Args)]
struct VariantFields {
    #[arg(long)]
    episode: Option<String>,
    #[arg(long)]
    hypothesis: Option<String>,
    #[arg(long)]
    status: Option<VariantStatus>,
    /// Click-through rate in percent, as typed.
    #[arg(long)]
    ctr: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<VariantFields> for VariantPatch {
    fn from(fields: VariantFields) -> Self {
        Self {
            episode_number: fields.episode,
            hypothesis: fields.hypothesis,
            status: fields.status,
            ctr: fields.ctr.as_deref().map(coerce_ctr),
            notes: fields.notes,
        }
    }
}

#[derive(Subcommand)]
enum SocialCommand {
    /// Add a week of planned posts from the calendar start date.
    Generate {
        /// Start today instead of the calendar start date.
        #[arg(long, conflicts_with = "from")]
        today: bool,
        /// Start on this date instead of the calendar start date.
        #[arg(long)]
        from: Option<String>,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete every post with this id.
    Delete { id: String },
    /// Set the calendar start date.
    StartDate { date: String },
}

#[derive(Args)]
struct PostFields {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    platform: Option<SocialPlatform>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    copy: Option<String>,
    #[arg(long)]
    asset: Option<String>,
    #[arg(long)]
    status: Option<PostStatus>,
    #[arg(long)]
    link: Option<String>,
    #[command(flatten)]
    utm: UtmFields,
}

impl From<PostFields> for PostPatch {
    fn from(fields: PostFields) -> Self {
        Self {
            date: fields.date,
            platform: fields.platform,
            time: fields.time,
            copy: fields.copy,
            asset: fields.asset,
            status: fields.status,
            link: fields.link,
            utm: fields.utm.into(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShowSection {
    Episodes,
    Platforms,
    Variants,
    Posts,
    Utm,
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportTarget {
    Json,
    Platforms,
    Socials,
    All,
}

impl ExportTarget {
    fn kinds(self) -> Vec<ExportKind> {
        match self {
            ExportTarget::Json => vec![ExportKind::Document],
            ExportTarget::Platforms => vec![ExportKind::Platforms],
            ExportTarget::Socials => vec![ExportKind::Socials],
            ExportTarget::All => ExportKind::ALL.to_vec(),
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.config;
    match cli.command {
        Command::Init { force } => cmd_init(&config, force),
        Command::Show { section } => cmd_show(&load_config(&config)?, section),
        Command::Export { target } => cmd_export(&load_config(&config)?, target),
        Command::Import { file } => cmd_import(&load_config(&config)?, &file),
        Command::Validate => cmd_validate(&load_config(&config)?),
        Command::Episode(command) => cmd_apply(&load_config(&config)?, episode_edit(command)),
        Command::ReleaseTime { time } => cmd_apply(
            &load_config(&config)?,
            (Mutation::SetReleaseTime { time }, ShowSection::Episodes),
        ),
        Command::Platform(command) => cmd_apply(&load_config(&config)?, platform_edit(command)),
        Command::Variant(command) => cmd_apply(&load_config(&config)?, variant_edit(command)),
        Command::Social(command) => cmd_apply(&load_config(&config)?, social_edit(command)),
    }
}

/// A mutation and the section to list once it is applied.
type Edit = (Mutation, ShowSection);

fn episode_edit(command: EpisodeCommand) -> Edit {
    let mutation = match command {
        EpisodeCommand::Add { next } => Mutation::AddEpisode { prefill_next: next },
        EpisodeCommand::Update { index, fields } => Mutation::UpdateEpisode {
            index,
            patch: fields.into(),
        },
        EpisodeCommand::Delete { index } => Mutation::DeleteEpisode { index },
    };
    (mutation, ShowSection::Episodes)
}

fn platform_edit(command: PlatformCommand) -> Edit {
    let mutation = match command {
        PlatformCommand::Add { episode, platform } => Mutation::AddPlatformRow {
            episode_number: episode,
            platform,
        },
        PlatformCommand::Update { index, fields } => Mutation::UpdatePlatformRow {
            index,
            patch: fields.into(),
        },
        PlatformCommand::Delete { index } => Mutation::DeletePlatformRow { index },
    };
    (mutation, ShowSection::Platforms)
}

fn variant_edit(command: VariantCommand) -> Edit {
    let mutation = match command {
        VariantCommand::Add => Mutation::AddVariant,
        VariantCommand::Update { index, fields } => Mutation::UpdateVariant {
            index,
            patch: fields.into(),
        },
        VariantCommand::Delete { index } => Mutation::DeleteVariant { index },
    };
    (mutation, ShowSection::Variants)
}

fn social_edit(command: SocialCommand) -> Edit {
    let mutation = match command {
        SocialCommand::Generate { today, from } => {
            let start = match (today, from) {
                (true, _) => WeekStart::Today,
                (false, Some(date)) => WeekStart::Date(date),
                (false, None) => WeekStart::CalendarStart,
            };
            Mutation::GenerateWeek { start }
        }
        SocialCommand::Update { id, fields } => Mutation::UpdatePost {
            id,
            patch: fields.into(),
        },
        SocialCommand::Delete { id } => Mutation::DeletePost { id },
        SocialCommand::StartDate { date } => Mutation::SetSocialStartDate { date },
    };
    (mutation, ShowSection::Posts)
}

fn open_store(cfg: &LiveOpsConfig) -> Store<FileStorage> {
    Store::open(FileStorage::new(&cfg.data_dir), &cfg.storage_key)
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if force || !config_path.exists() {
        write_config(config_path, &LiveOpsConfig::default())
            .with_context(|| format!("write {}", config_path.display()))?;
    }
    let cfg = load_config(config_path)?;
    let mut store = open_store(&cfg);
    if force {
        let outcome = store.apply(Mutation::ReplaceDocument(Box::new(default_document())));
        return finish(store, outcome, &cfg, ShowSection::All);
    }
    store.flush().context("save document")?;
    let path = store.storage().path_for(&cfg.storage_key);
    println!("document: {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_apply(cfg: &LiveOpsConfig, (mutation, section): Edit) -> Result<i32> {
    let mut store = open_store(cfg);
    let outcome = store.apply(mutation);
    finish(store, outcome, cfg, section)
}

fn cmd_import(cfg: &LiveOpsConfig, file: &Path) -> Result<i32> {
    let raw = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let document = parse_document(&raw).with_context(|| format!("import {}", file.display()))?;
    let mut store = open_store(cfg);
    let outcome = store.apply(Mutation::ReplaceDocument(Box::new(document)));
    finish(store, outcome, cfg, ShowSection::All)
}

/// Report the outcome, retry a failed write once, then list `section`.
fn finish(
    mut store: Store<FileStorage>,
    outcome: ApplyOutcome,
    cfg: &LiveOpsConfig,
    section: ShowSection,
) -> Result<i32> {
    match outcome {
        ApplyOutcome::Applied { revision } => debug!(revision, "mutation applied"),
        ApplyOutcome::Unchanged(err) => {
            eprintln!("no change: {err}");
            return Ok(exit_codes::INVALID);
        }
        ApplyOutcome::Unpersisted { error, .. } => {
            eprintln!("warning: change not saved yet: {:#}", error);
        }
    }
    store
        .flush()
        .with_context(|| format!("save document under '{}'", cfg.storage_key))?;
    print_section(store.get(), section);
    Ok(exit_codes::OK)
}

fn cmd_show(cfg: &LiveOpsConfig, section: ShowSection) -> Result<i32> {
    let store = open_store(cfg);
    print_section(store.get(), section);
    Ok(exit_codes::OK)
}

fn cmd_export(cfg: &LiveOpsConfig, target: ExportTarget) -> Result<i32> {
    let store = open_store(cfg);
    let sink = DirectorySink::new(&cfg.export_dir);
    for kind in target.kinds() {
        let path = export(store.get(), kind, &sink)?;
        println!("{}", path.display());
    }
    Ok(exit_codes::OK)
}

fn cmd_validate(cfg: &LiveOpsConfig) -> Result<i32> {
    let store = open_store(cfg);
    let warnings = validate_invariants(store.get());
    if warnings.is_empty() {
        println!("ok");
        return Ok(exit_codes::OK);
    }
    for warning in &warnings {
        println!("- {}", warning);
    }
    Ok(exit_codes::WARNINGS)
}

fn print_section(doc: &Document, section: ShowSection) {
    let all = section == ShowSection::All;
    if all || section == ShowSection::Episodes {
        print_episodes(doc);
    }
    if all || section == ShowSection::Platforms {
        print_platforms(doc);
    }
    if all || section == ShowSection::Variants {
        print_variants(doc);
    }
    if all || section == ShowSection::Posts {
        print_posts(doc);
    }
    if all || section == ShowSection::Utm {
        print_utm(doc);
    }
}

fn print_episodes(doc: &Document) {
    println!(
        "Releases (weekly on Tuesday at {} local)",
        doc.podcast.release_time_local
    );
    for (index, episode) in episodes_in_display_order(&doc.podcast) {
        let booking = episode
            .guest_booking
            .map(|booking| booking.to_string())
            .unwrap_or_default();
        println!(
            "  [{index}] {} #{:<7} {:<10} {} | guest: {} {} | tags: {}",
            episode.date,
            episode.episode_number,
            episode.length,
            episode.content,
            episode.potential_guest,
            booking,
            episode.tags.as_deref().unwrap_or(""),
        );
    }
}

fn print_platforms(doc: &Document) {
    println!("Platform tracking");
    for (index, row) in doc.platforms.iter().enumerate() {
        println!(
            "  [{index}] #{:<7} {} {:<15} views {:>8}  awt {}",
            row.episode_number, row.date, row.platform, row.views, row.awt
        );
    }
}

fn print_variants(doc: &Document) {
    println!("Thumbnail variants");
    for (index, variant) in doc.thumbs.variants.iter().enumerate() {
        println!(
            "  [{index}] {} #{:<7} {:<8} ctr {:>6.2}%  {} | {}",
            variant.id,
            variant.episode_number,
            variant.status,
            variant.ctr,
            variant.hypothesis,
            variant.notes
        );
    }
}

fn print_posts(doc: &Document) {
    println!("Social calendar (start {})", doc.socials.start_date);
    for post in posts_in_display_order(&doc.socials.posts) {
        println!(
            "  {:<22} {:>5} {:<11} {} | {}",
            post.id, post.time, post.status, post.copy, post.asset
        );
    }
}

fn print_utm(doc: &Document) {
    println!("UTM, platforms");
    for (index, row) in doc.platforms.iter().enumerate() {
        let utm = resolve_platform_utm(row);
        println!(
            "  [{index}] #{} {}: source={} medium={} campaign={} content={}",
            row.episode_number, row.platform, utm.source, utm.medium, utm.campaign, utm.content
        );
    }
    println!("UTM, socials");
    for post in posts_in_display_order(&doc.socials.posts) {
        let utm = resolve_post_utm(post);
        println!(
            "  {}: link={} source={} medium={} campaign={} content={}",
            post.id,
            resolve_post_link(post),
            utm.source,
            utm.medium,
            utm.campaign,
            utm.content
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_for(args: &[&str]) -> Edit {
        match Cli::parse_from(args).command {
            Command::Episode(command) => episode_edit(command),
            Command::Platform(command) => platform_edit(command),
            Command::Variant(command) => variant_edit(command),
            Command::Social(command) => social_edit(command),
            _ => panic!("not an editing command: {args:?}"),
        }
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["liveops", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILENAME));
    }

    #[test]
    fn parse_episode_add_next() {
        let (mutation, section) = edit_for(&["liveops", "episode", "add", "--next"]);
        assert_eq!(mutation, Mutation::AddEpisode { prefill_next: true });
        assert!(section == ShowSection::Episodes);
    }

    #[test]
    fn platform_update_coerces_views() {
        let (mutation, section) = edit_for(&[
            "liveops",
            "platform",
            "update",
            "2",
            "--views",
            "1,204 plays",
            "--platform",
            "apple podcasts",
            "--utm-campaign",
            "launch",
        ]);
        let Mutation::UpdatePlatformRow { index, patch } = mutation else {
            panic!("expected platform update");
        };
        assert!(section == ShowSection::Platforms);
        assert_eq!(index, 2);
        assert_eq!(patch.views, Some(1204));
        assert_eq!(patch.platform, Some(Platform::ApplePodcasts));
        assert_eq!(patch.utm.campaign.as_deref(), Some("launch"));
    }

    #[test]
    fn variant_update_coerces_ctr() {
        let (mutation, _) = edit_for(&[
            "liveops", "variant", "update", "1", "--ctr", "4.5%", "--status", "in test",
        ]);
        let Mutation::UpdateVariant { index, patch } = mutation else {
            panic!("expected variant update");
        };
        assert_eq!(index, 1);
        assert_eq!(patch.ctr, Some(4.5));
        assert_eq!(patch.status, Some(VariantStatus::InTest));
    }

    #[test]
    fn social_generate_start_choices() {
        let (mutation, section) =
            edit_for(&["liveops", "social", "generate", "--from", "2025-11-03"]);
        assert!(section == ShowSection::Posts);
        assert_eq!(
            mutation,
            Mutation::GenerateWeek {
                start: WeekStart::Date("2025-11-03".to_string())
            }
        );

        let (mutation, _) = edit_for(&["liveops", "social", "generate"]);
        assert_eq!(
            mutation,
            Mutation::GenerateWeek {
                start: WeekStart::CalendarStart
            }
        );

        let parsed = Cli::try_parse_from([
            "liveops", "social", "generate", "--today", "--from", "2025-11-03",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_unknown_enum_labels() {
        let parsed =
            Cli::try_parse_from(["liveops", "variant", "update", "0", "--status", "Shipped"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn release_time_is_a_top_level_command() {
        let cli = Cli::parse_from(["liveops", "release-time", "06:30"]);
        assert!(matches!(cli.command, Command::ReleaseTime { time } if time == "06:30"));
    }
}
