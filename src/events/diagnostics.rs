//! Bus introspection for debug tooling.
//!
//! Counts publishes per event type and keeps a bounded ring of the most
//! recent publishes (oldest evicted first). None of this feeds back into
//! dispatch; it exists for diagnostic UIs and logs only.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{DiagnosticsConfig, MAX_HISTORY_CAPACITY};

/// One entry of the recent-publish history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishRecord {
    /// Monotonic publish number since the bus was created (or last reset).
    pub sequence: u64,
    /// `std::any::type_name` of the payload.
    pub event_type: &'static str,
    /// Handlers in the snapshot that received this publish.
    pub subscribers: usize,
    pub published_at: DateTime<Utc>,
}

/// Point-in-time view of a bus, serializable for debug overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusSnapshot {
    pub subscriber_counts: BTreeMap<&'static str, usize>,
    pub publish_counts: BTreeMap<&'static str, u64>,
    pub recent: Vec<PublishRecord>,
}

impl BusSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Mutable diagnostics state owned by an `EventBus`.
#[derive(Debug)]
pub(crate) struct Diagnostics {
    enabled: bool,
    capacity: usize,
    sequence: u64,
    publish_counts: HashMap<TypeId, (&'static str, u64)>,
    history: VecDeque<PublishRecord>,
}

impl Diagnostics {
    pub(crate) fn new(config: &DiagnosticsConfig) -> Self {
        Self {
            enabled: config.enabled,
            capacity: config.history_capacity.min(MAX_HISTORY_CAPACITY),
            sequence: 0,
            publish_counts: HashMap::new(),
            history: VecDeque::new(),
        }
    }

    pub(crate) fn record(&mut self, key: TypeId, event_type: &'static str, subscribers: usize) {
        if !self.enabled {
            return;
        }

        self.sequence += 1;
        self.publish_counts.entry(key).or_insert((event_type, 0)).1 += 1;

        if self.capacity == 0 {
            return;
        }
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(PublishRecord {
            sequence: self.sequence,
            event_type,
            subscribers,
            published_at: Utc::now(),
        });
    }

    pub(crate) fn publish_count(&self, key: TypeId) -> u64 {
        self.publish_counts.get(&key).map_or(0, |(_, count)| *count)
    }

    pub(crate) fn publish_counts(&self) -> BTreeMap<&'static str, u64> {
        self.publish_counts.values().copied().collect()
    }

    pub(crate) fn history(&self) -> Vec<PublishRecord> {
        self.history.iter().cloned().collect()
    }

    pub(crate) fn reset(&mut self) {
        self.sequence = 0;
        self.publish_counts.clear();
        self.history.clear();
    }
}
