//! Test-only helpers: in-memory storage, a fixed clock and record builders.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::core::socials::post_id;
use crate::document::{
    Cadence, Episode, Platform, PlatformRecord, PodcastPlan, PostStatus, SocialPlatform,
    SocialPost, Utm,
};
use crate::io::clock::Clock;
use crate::io::storage::Storage;

/// Storage held in memory, with switchable write failures.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Make every following write fail (e.g. quota exceeded).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow!("storage quota exceeded"));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse a `YYYY-MM-DD` literal.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// Episode with the given date and number and blank text fields.
pub fn episode(date: &str, number: &str) -> Episode {
    Episode {
        date: date.to_string(),
        episode_number: number.to_string(),
        length: "45–60 min".to_string(),
        content: String::new(),
        potential_guest: String::new(),
        tags: None,
        guest_booking: None,
    }
}

pub fn plan(items: Vec<Episode>) -> PodcastPlan {
    PodcastPlan {
        release_time_local: "00:00".to_string(),
        cadence: Cadence::Tuesday,
        items,
    }
}

pub fn platform_row(number: &str, date: &str, platform: Platform) -> PlatformRecord {
    PlatformRecord {
        episode_number: number.to_string(),
        date: date.to_string(),
        platform,
        views: 0,
        awt: "00:00:00".to_string(),
        utm: Utm::default(),
    }
}

/// Planned post with a composite id and blank copy.
pub fn post(date: &str, platform: SocialPlatform, time: &str) -> SocialPost {
    SocialPost {
        id: post_id(date, platform),
        date: date.to_string(),
        platform,
        time: time.to_string(),
        copy: String::new(),
        asset: String::new(),
        status: PostStatus::Planned,
        link: None,
        utm: Utm::default(),
    }
}
