//! Shared state for the webhook handlers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use zapi_adapters::ZapiTrigger;

/// Capacity of the emitted-event channel.  Slow subscribers that fall
/// further behind than this see `RecvError::Lagged`.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// State shared by every handler, wrapped in an `Arc`.
#[derive(Debug)]
pub struct AppState {
    /// Filter applied to each incoming callback.
    pub trigger: ZapiTrigger,
    /// Emitted payloads, `_metadata` attached.
    pub events: broadcast::Sender<Value>,
    pub counters: Counters,
}

impl AppState {
    pub fn new(trigger: ZapiTrigger) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            trigger,
            events,
            counters: Counters::default(),
        }
    }
}

/// Running totals of webhook decisions.
#[derive(Debug, Default)]
pub struct Counters {
    received: AtomicU64,
    emitted: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub received: u64,
    pub emitted: u64,
    pub dropped: u64,
}

impl Counters {
    pub fn record(&self, emitted: bool) {
        self.received.fetch_add(1, Ordering::Relaxed);
        let slot = if emitted { &self.emitted } else { &self.dropped };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            received: self.received.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
