//! Scope cache: roster/game snapshots keyed by team, season and gender.
//!
//! Scope fetches are asynchronous from the caller's point of view and
//! can overlap when the user changes team or season quickly. Every
//! fetch takes a sequence ticket; a completion presenting a stale
//! ticket is rejected, so a slow earlier response can never overwrite
//! the snapshot of the scope the user actually landed on.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::models::{ScopeKey, ScopeSnapshot};

/// Proof that a fetch was started, presented back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: ScopeKey,
    seq: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }
}

/// Snapshot store with per-key fetch sequencing.
#[derive(Debug, Default)]
pub struct ScopeCache {
    entries: HashMap<ScopeKey, ScopeSnapshot>,
    sequences: HashMap<ScopeKey, u64>,
}

impl ScopeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot for a scope, if any.
    pub fn get(&self, key: &ScopeKey) -> Option<&ScopeSnapshot> {
        self.entries.get(key)
    }

    /// Register the start of a fetch for `key`. Starting a new fetch
    /// invalidates any ticket still outstanding for the same key.
    pub fn begin_fetch(&mut self, key: &ScopeKey) -> FetchTicket {
        let seq = self.sequences.entry(key.clone()).or_insert(0);
        *seq += 1;
        debug!(team = %key.team, year = %key.year, seq = *seq, "scope fetch started");
        FetchTicket {
            key: key.clone(),
            seq: *seq,
        }
    }

    /// Store a fetched snapshot. Returns false (and stores nothing)
    /// when the ticket is no longer the newest for its key.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, snapshot: ScopeSnapshot) -> bool {
        let current = self.sequences.get(&ticket.key).copied().unwrap_or(0);
        if ticket.seq != current {
            warn!(
                team = %ticket.key.team,
                stale = ticket.seq,
                current,
                "dropping stale scope fetch result"
            );
            return false;
        }
        self.entries.insert(ticket.key.clone(), snapshot);
        true
    }

    /// Drop a cached snapshot, forcing the next user to refetch.
    pub fn invalidate(&mut self, key: &ScopeKey) {
        self.entries.remove(key);
    }
}

/// Trailing-edge debouncer for submission-triggering edits.
///
/// `poll` answers whether enough quiet time has passed since the last
/// accepted event; callers re-poll when their timer fires.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record an event at `now`; true when it should fire immediately.
    pub fn poll(&mut self, now: Instant) -> bool {
        let fire = match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= self.window,
        };
        if fire {
            self.last = Some(now);
        }
        fire
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
