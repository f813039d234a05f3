use serde::{Deserialize, Serialize};
use strum::Display;

use crate::catalog::{Item, PriceBucket};

/// Current wall-clock time as milliseconds since the epoch.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

// Action — committed swipe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Like,
    Nope,
    SuperLike,
}

impl Action {
    /// Likes and super-likes count as positive outcomes in the rolling
    /// history.
    pub fn is_positive(self) -> bool {
        matches!(self, Action::Like | Action::SuperLike)
    }
}

/// Modifiers carried alongside a decision: dwell measurement, the soft-like
/// flag, and the super-like escalation. Super overrides soft overrides plain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub dwell_ms: u64,
    pub soft: bool,
    pub superlike: bool,
}

impl Modifiers {
    pub fn dwell(dwell_ms: u64) -> Self {
        Self {
            dwell_ms,
            ..Self::default()
        }
    }
}

/// One committed decision. Created exactly once per gesture commit (or
/// equivalent programmatic call), never mutated, appended to the bounded
/// analytics log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub ts_ms: u64,
    pub action: Action,
    pub item_id: Option<String>,
    pub dwell_ms: u64,
    pub soft: bool,
    pub brand: String,
    pub kind: String,
    pub color: String,
    pub price_bucket: PriceBucket,
    /// Match score at decision time, before this decision's weight update.
    pub match_score: f64,
    pub item_name: String,
}

impl DecisionEvent {
    pub fn build(
        item: &Item,
        action: Action,
        modifiers: Modifiers,
        match_score: f64,
        ts_ms: u64,
    ) -> Self {
        Self {
            ts_ms,
            action,
            item_id: item.id().map(str::to_owned),
            dwell_ms: modifiers.dwell_ms,
            soft: modifiers.soft,
            brand: item.brand().unwrap_or_default().to_owned(),
            kind: item.kind().unwrap_or_default().to_owned(),
            color: item.color().unwrap_or_default().to_owned(),
            price_bucket: item.price_bucket(),
            match_score,
            item_name: item.name.clone(),
        }
    }
}
