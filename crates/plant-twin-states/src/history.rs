//! Rolling history of condition reads

use std::collections::VecDeque;
use std::io::Write;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::{Condition, StateRecord};

/// Oldest records are dropped beyond this many
pub const MAX_HISTORY: usize = 100;

const MINUTE_MS: u64 = 60_000;

/// Bounded, time-ordered record store (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: VecDeque<StateRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest when full
    pub fn push(&mut self, record: StateRecord) {
        if self.records.len() == MAX_HISTORY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Vec<&StateRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Replace the contents with `MAX_HISTORY` random conditions, one minute
    /// apart, the last one at `now_ms`.
    pub fn seed_random<R: Rng>(&mut self, rng: &mut R, now_ms: u64) {
        self.records.clear();
        let last = (MAX_HISTORY - 1) as u64;
        for i in 0..=last {
            let condition = Condition::ALL[rng.random_range(0..Condition::ALL.len())];
            let timestamp = now_ms.saturating_sub((last - i) * MINUTE_MS);
            self.records.push_back(condition.record(timestamp));
        }
        log::debug!("Seeded {} history records", self.records.len());
    }

    /// Write the newest `limit` records as a JSON array
    pub fn write_json<W: Write>(&self, writer: W, limit: usize) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.recent(limit))
    }
}
