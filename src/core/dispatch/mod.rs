// Decision dispatcher — the single funnel every committed decision flows
// through: analytics, preference update, and the best-effort feedback sink.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::Item;
use crate::core::analytics::Analytics;
use crate::core::decision::{Action, DecisionEvent, Modifiers};
use crate::core::prefs::PreferenceState;

/// Wire payload for the feed backend's feedback endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub user: String,
    pub pid: Option<String>,
    /// 1 for any like flavor, -1 for nope.
    pub like: i8,
    pub dwell_ms: u64,
    pub soft_like: bool,
    pub super_like: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

/// Best-effort delivery seam. Contract: at-most-once, never retried;
/// callers log failures and move on. Tests assert the sink was *called*,
/// never its outcome.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn deliver(&self, feedback: Feedback) -> anyhow::Result<()>;
}

pub struct Dispatcher {
    user: String,
    prefs: PreferenceState,
    analytics: Analytics,
    sink: Arc<dyn FeedbackSink>,
}

impl Dispatcher {
    pub fn new(user: impl Into<String>, sink: Arc<dyn FeedbackSink>) -> Self {
        Self {
            user: user.into(),
            prefs: PreferenceState::new(),
            analytics: Analytics::new(),
            sink,
        }
    }

    pub fn prefs(&self) -> &PreferenceState {
        &self.prefs
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn score(&self, item: &Item) -> f64 {
        self.prefs.score(item)
    }

    /// Commits one decision: resolves the effective action (super overrides
    /// soft overrides plain), snapshots the match score *before* the weight
    /// update, records analytics, applies the preference update, and fires
    /// the feedback payload without waiting on it.
    pub fn dispatch(
        &mut self,
        item: &Item,
        action: Action,
        modifiers: Modifiers,
        now_ms: u64,
    ) -> DecisionEvent {
        let action = if modifiers.superlike {
            Action::SuperLike
        } else {
            action
        };

        let event =
            DecisionEvent::build(item, action, modifiers, self.prefs.score(item), now_ms);
        self.analytics.record(event.clone());
        self.prefs.apply(item, action, modifiers.soft);

        self.fire(Feedback {
            user: self.user.clone(),
            pid: item.id().map(str::to_owned),
            like: if action == Action::Nope { -1 } else { 1 },
            dwell_ms: modifiers.dwell_ms,
            soft_like: modifiers.soft,
            super_like: action == Action::SuperLike,
            saved: None,
        });

        event
    }

    /// Wishlist save: feedback only. Does not touch the preference model,
    /// the analytics log, or the deck.
    pub fn save(&self, item: &Item) {
        self.fire(Feedback {
            user: self.user.clone(),
            pid: item.id().map(str::to_owned),
            like: 1,
            dwell_ms: 0,
            soft_like: false,
            super_like: false,
            saved: Some(true),
        });
    }

    // Fire-and-forget: delivery happens on a detached task, errors are
    // logged and swallowed.
    fn fire(&self, feedback: Feedback) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.deliver(feedback).await {
                tracing::warn!(error = %err, "feedback delivery failed");
            }
        });
    }
}
