//! The live document: loaded once, edited through mutations, persisted on change.
//!
//! The store is the only owner of the document. Every accepted mutation
//! replaces it wholesale, bumps the revision, notifies subscribers and writes
//! it back to storage. A failed write is reported but never rolls back the
//! in-memory document; it stays dirty until the next successful write.

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::core::export::parse_document;
use crate::core::mutation::{Mutation, apply_mutation};
use crate::core::normalize::normalize_episode_dates;
use crate::core::types::MutationError;
use crate::document::{Document, default_document};
use crate::io::clock::{Clock, SystemClock};
use crate::io::storage::Storage;

/// Where the document came from when the store opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Parsed from storage.
    Stored,
    /// Nothing stored yet; seeded.
    Missing,
    /// Stored text could not be read or parsed; seeded, storage left as is.
    Unreadable,
}

/// Events published to subscribers after the document changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    DocumentChanged { revision: u64 },
    /// The document at `revision` is held in memory only.
    PersistFailed { revision: u64, message: String },
}

/// Result of [`Store::apply`].
#[derive(Debug)]
#[must_use]
pub enum ApplyOutcome {
    /// Document replaced and persisted.
    Applied { revision: u64 },
    /// Mutation rejected; document untouched.
    Unchanged(MutationError),
    /// Document replaced in memory, but the write failed.
    Unpersisted { revision: u64, error: anyhow::Error },
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, ApplyOutcome::Unchanged(_))
    }
}

pub struct Store<S: Storage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    key: String,
    document: Document,
    origin: Origin,
    revision: u64,
    dirty: bool,
    subscribers: Vec<Sender<ChangeEvent>>,
}

impl<S: Storage> Store<S> {
    /// Open the store with the system clock.
    pub fn open(storage: S, key: &str) -> Self {
        Self::open_with_clock(storage, key, SystemClock)
    }
}

impl<S: Storage, C: Clock> Store<S, C> {
    /// Load the document for `key` and run the startup normalization pass.
    ///
    /// Unreadable or malformed stored text falls back to the seeded document.
    /// The seed is written back only when nothing was stored, so a damaged
    /// blob is never overwritten before the first real edit.
    #[instrument(skip(storage, clock))]
    pub fn open_with_clock(storage: S, key: &str, clock: C) -> Self {
        let (document, origin) = load_document(&storage, key);
        let mut store = Self {
            storage,
            clock,
            key: key.to_string(),
            document,
            origin,
            revision: 0,
            dirty: origin == Origin::Missing,
            subscribers: Vec::new(),
        };

        if let Some(normalized) = normalize_episode_dates(&store.document) {
            info!("normalized episode dates to local midnight");
            store.document = normalized;
            store.dirty = true;
        }

        if store.dirty {
            if let Err(err) = store.persist() {
                warn!(error = %format!("{err:#}"), "initial write failed; continuing in memory");
            }
        }
        store
    }

    pub fn get(&self) -> &Document {
        &self.document
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Number of mutations accepted since the store opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the in-memory document has not been written yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receive a [`ChangeEvent`] for every change from now on.
    pub fn subscribe(&mut self) -> Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Apply `mutation`, replace the document, persist and notify.
    #[instrument(skip_all, fields(mutation = mutation.name()))]
    pub fn apply(&mut self, mutation: Mutation) -> ApplyOutcome {
        let today = self.clock.today();
        let next = match apply_mutation(&self.document, mutation, today) {
            Ok(next) => next,
            Err(err) => {
                warn!(error = %err, "mutation ignored");
                return ApplyOutcome::Unchanged(err);
            }
        };

        self.document = next;
        self.revision += 1;
        self.dirty = true;
        let revision = self.revision;
        debug!(revision, "document replaced");
        self.publish(ChangeEvent::DocumentChanged { revision });

        match self.persist() {
            Ok(()) => ApplyOutcome::Applied { revision },
            Err(error) => {
                let message = format!("{error:#}");
                error!(revision, error = %message, "document not persisted");
                self.publish(ChangeEvent::PersistFailed { revision, message });
                ApplyOutcome::Unpersisted { revision, error }
            }
        }
    }

    /// Write the document if an earlier write failed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    /// Final write at shutdown; a clean store is left untouched.
    pub fn close(mut self) -> Result<()> {
        self.flush()
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.document).context("serialize document")?;
        self.storage
            .write(&self.key, &raw)
            .with_context(|| format!("persist document under key '{}'", self.key))?;
        self.dirty = false;
        Ok(())
    }

    fn publish(&mut self, event: ChangeEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn load_document<S: Storage>(storage: &S, key: &str) -> (Document, Origin) {
    match storage.read(key) {
        Ok(Some(raw)) => match parse_document(&raw) {
            Ok(document) => {
                debug!(key, "document loaded");
                (document, Origin::Stored)
            }
            Err(err) => {
                warn!(
                    key,
                    error = %format!("{err:#}"),
                    "stored document is malformed; using seeded document"
                );
                (default_document(), Origin::Unreadable)
            }
        },
        Ok(None) => {
            info!(key, "no stored document; seeding");
            (default_document(), Origin::Missing)
        }
        Err(err) => {
            warn!(key, error = %format!("{err:#}"), "storage read failed; using seeded document");
            (default_document(), Origin::Unreadable)
        }
    }
}
