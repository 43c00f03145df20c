use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Default boundary between service-issued ids and client-synthesized ids
pub const DEFAULT_LOCAL_ID_THRESHOLD: u64 = 100;

/// Where an id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrigin {
    /// Issued by the remote service; addressable by remote update/delete
    Remote,
    /// Synthesized by this client; the remote service never persisted it
    Local,
}

/// Classifies ids by magnitude.
///
/// Origin is inferred purely from `id >= threshold`. A real service that
/// issues ids at or above the threshold will have its records treated as
/// local; this matches the mock backend the dashboard was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginPolicy {
    threshold: u64,
}

impl OriginPolicy {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn classify(&self, id: u64) -> IdOrigin {
        if id < self.threshold {
            IdOrigin::Remote
        } else {
            IdOrigin::Local
        }
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_ID_THRESHOLD)
    }
}

/// Time-derived id source: `max(now_millis, previous + 1)`.
///
/// Unique among the ids it hands out in one session. Nothing keeps it
/// disjoint from ids the remote service may issue later.
#[derive(Debug, Default)]
pub struct SyntheticIds {
    last: AtomicU64,
}

impl SyntheticIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after `floor`, e.g. to resume past ids already in use
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    pub fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev.saturating_add(1)))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev.saturating_add(1))
    }
}
