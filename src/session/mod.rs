// Session orchestrator — owns the deck, dispatcher, and gesture machine and
// sequences the async flows (load, refill, calibration, outfit lookup).
// Single logical thread: every mutation happens on the session task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::catalog::Item;
use crate::config::FlowConfig;
use crate::core::analytics::SessionStats;
use crate::core::deck::Deck;
use crate::core::decision::{now_ms, Action, DecisionEvent, Modifiers};
use crate::core::dispatch::{Dispatcher, FeedbackSink};
use crate::core::gesture::{Commit, GestureMachine, Point};
use crate::core::prefs::{Facet, PreferenceState};
use crate::error::{Result, SessionError};
use crate::feed::{FeedClient, FeedSource, OutfitSuggestion};

// Phase — what replaces the card slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// Initial load (or calibration) failed; persistent until retried.
    LoadFailed(String),
}

pub struct Session {
    cfg: FlowConfig,
    deck: Deck,
    dispatcher: Dispatcher,
    feed: Arc<dyn FeedSource>,
    gesture: GestureMachine,
    phase: Phase,
    notice: Option<String>,
    outfit: Option<OutfitSuggestion>,
    outfit_in_flight: bool,
    refill_tx: mpsc::UnboundedSender<Vec<Item>>,
    refill_rx: mpsc::UnboundedReceiver<Vec<Item>>,
}

impl Session {
    pub fn new(cfg: FlowConfig, feed: Arc<dyn FeedSource>, sink: Arc<dyn FeedbackSink>) -> Self {
        let gesture = GestureMachine::new(cfg.gesture.clone(), now_ms());
        let (refill_tx, refill_rx) = mpsc::unbounded_channel();
        Self {
            deck: Deck::new(cfg.deck.low_watermark),
            dispatcher: Dispatcher::new(cfg.feed.user.clone(), sink),
            feed,
            gesture,
            phase: Phase::Loading,
            notice: None,
            outfit: None,
            outfit_in_flight: false,
            refill_tx,
            refill_rx,
            cfg,
        }
    }

    /// Wires a session against the real HTTP backend, using one client for
    /// both the feed source and the feedback sink.
    pub fn connect(cfg: FlowConfig) -> Self {
        let client = Arc::new(FeedClient::new(cfg.feed.base_url.clone()));
        Self::new(cfg, client.clone(), client)
    }

    // ── Reads for the rendering layer ───────────────────────────────────

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    pub fn current(&self) -> Option<&Item> {
        self.deck.current()
    }

    /// Match score of the currently displayed item against learned weights.
    pub fn current_score(&self) -> f64 {
        self.current().map_or(0.0, |item| self.dispatcher.score(item))
    }

    pub fn prefs(&self) -> &PreferenceState {
        self.dispatcher.prefs()
    }

    pub fn top_facets(&self, facet: Facet, k: usize) -> Vec<(String, f64)> {
        self.dispatcher.prefs().top_k(facet, k)
    }

    pub fn stats(&self) -> SessionStats {
        self.dispatcher.analytics().stats()
    }

    pub fn sparkline(&self) -> Vec<u8> {
        self.dispatcher.analytics().sparkline()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    // ── Load & refill ───────────────────────────────────────────────────

    /// Initial deck load. Blocks behind `Phase::Loading`; a failure is a
    /// persistent error state replacing the card.
    pub async fn start(&mut self) {
        self.phase = Phase::Loading;
        match self
            .feed
            .next_batch(&self.cfg.feed.user, self.cfg.feed.batch_size)
            .await
        {
            Ok(items) => {
                self.deck.replace(items);
                self.gesture.mount(now_ms());
                self.phase = Phase::Ready;
                self.maybe_refill();
            }
            Err(err) => {
                self.phase = Phase::LoadFailed(err.to_string());
            }
        }
    }

    /// Lookahead refill: fires whenever the deck is below its watermark.
    /// Fire-and-forget: the fetch runs on its own task and the batch lands
    /// back on the session task through the refill channel, so a slow feed
    /// never stalls the decision funnel. Failures are logged and swallowed,
    /// and triggers are not deduplicated.
    fn maybe_refill(&mut self) {
        while let Ok(batch) = self.refill_rx.try_recv() {
            self.deck.append(batch);
        }
        if !self.deck.needs_refill() {
            return;
        }
        let feed = Arc::clone(&self.feed);
        let user = self.cfg.feed.user.clone();
        let n = self.cfg.feed.batch_size;
        let tx = self.refill_tx.clone();
        tokio::spawn(async move {
            match feed.next_batch(&user, n).await {
                // receiver only drops with the whole session
                Ok(batch) => {
                    let _ = tx.send(batch);
                }
                Err(err) => tracing::warn!(error = %err, "deck refill failed"),
            }
        });
    }

    // ── Decision funnel ─────────────────────────────────────────────────

    /// Commits a decision about the currently displayed item, then advances
    /// the deck after the configured delay (letting the exit animation
    /// play) and re-checks the refill watermark.
    pub async fn decide_current(
        &mut self,
        action: Action,
        modifiers: Modifiers,
    ) -> Option<DecisionEvent> {
        let item = self.deck.current()?.clone();
        let event = self.dispatcher.dispatch(&item, action, modifiers, now_ms());
        tokio::time::sleep(Duration::from_millis(self.cfg.gesture.advance_delay_ms)).await;
        self.deck.advance();
        self.gesture.mount(now_ms());
        self.maybe_refill();
        Some(event)
    }

    /// Commits a decision about some *other* item (an accepted or declined
    /// suggestion). The deck does not advance.
    pub async fn decide_other(
        &mut self,
        item: &Item,
        action: Action,
        modifiers: Modifiers,
    ) -> DecisionEvent {
        self.dispatcher.dispatch(item, action, modifiers, now_ms())
    }

    /// Wishlist save for the current item: feedback only, plus a notice.
    pub fn save_current(&mut self) {
        let Some(item) = self.deck.current() else {
            return;
        };
        let name = if item.name.is_empty() {
            "Item".to_owned()
        } else {
            item.name.clone()
        };
        self.dispatcher.save(item);
        self.set_notice(format!("{name} saved to wishlist"));
    }

    // ── Gesture entry points ────────────────────────────────────────────

    pub fn on_press(&mut self, at: Option<Point>) {
        self.gesture.press(at);
    }

    pub fn on_drag(&mut self, to: Option<Point>) {
        self.gesture.drag(to);
    }

    /// Pointer released: if the drag crossed a commit threshold, the card
    /// settles off-screen and the decision fires after the settle delay.
    pub async fn on_release(&mut self) -> Option<DecisionEvent> {
        let commit = self.gesture.release(now_ms());
        match commit {
            Some(commit) => {
                tokio::time::sleep(Duration::from_millis(self.cfg.gesture.settle_ms)).await;
                self.commit_current(commit).await
            }
            None => {
                self.gesture.settled();
                None
            }
        }
    }

    pub async fn on_image_tap(&mut self) -> Option<DecisionEvent> {
        let commit = self.gesture.image_tap(now_ms())?;
        self.commit_current(commit).await
    }

    pub async fn on_super_control(&mut self) -> Option<DecisionEvent> {
        let commit = self.gesture.super_control(now_ms());
        self.commit_current(commit).await
    }

    pub async fn on_tap_like(&mut self) -> Option<DecisionEvent> {
        let commit = self.gesture.tap_like(now_ms());
        self.commit_current(commit).await
    }

    pub async fn on_tap_nope(&mut self) -> Option<DecisionEvent> {
        let commit = self.gesture.tap_nope(now_ms());
        self.commit_current(commit).await
    }

    async fn commit_current(&mut self, commit: Commit) -> Option<DecisionEvent> {
        let modifiers = Modifiers {
            dwell_ms: commit.dwell_ms,
            soft: commit.soft,
            superlike: commit.action == Action::SuperLike,
        };
        self.decide_current(commit.action, modifiers).await
    }

    // ── Calibration ─────────────────────────────────────────────────────

    /// Strictly sequential: submit the category, await it, then fetch a
    /// fresh deck and reset the cursor. The session stays in
    /// `Phase::Loading` until the whole sequence completes or visibly
    /// fails.
    pub async fn calibrate(&mut self, category: &str) -> Result<()> {
        self.phase = Phase::Loading;
        if let Err(err) = self.feed.calibrate(&self.cfg.feed.user, category).await {
            self.phase = Phase::LoadFailed(err.to_string());
            return Err(SessionError::Calibration(err.to_string()).into());
        }
        match self
            .feed
            .next_batch(&self.cfg.feed.user, self.cfg.feed.batch_size)
            .await
        {
            Ok(items) => {
                self.deck.replace(items);
                self.gesture.mount(now_ms());
                self.phase = Phase::Ready;
                self.maybe_refill();
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::LoadFailed(err.to_string());
                Err(SessionError::Calibration(err.to_string()).into())
            }
        }
    }

    // ── Outfit suggestion ───────────────────────────────────────────────

    pub fn outfit(&self) -> Option<&OutfitSuggestion> {
        self.outfit.as_ref()
    }

    pub fn dismiss_outfit(&mut self) {
        self.outfit = None;
    }

    /// Fetches a complementary-item suggestion for the current item.
    /// Single-flight: refused while a request is outstanding. An item
    /// without an identifier is refused with a notice rather than sending
    /// a malformed request. Soft failures become transient notices.
    pub async fn request_outfit(&mut self) -> Result<Option<OutfitSuggestion>> {
        if self.outfit_in_flight {
            return Err(SessionError::OutfitInFlight.into());
        }
        let Some(item) = self.deck.current() else {
            return Err(SessionError::NoCurrentItem.into());
        };
        let Some(pid) = item.id().map(str::to_owned) else {
            self.set_notice("Can't determine product id for outfit suggestion.");
            return Err(SessionError::MissingItemId.into());
        };

        self.outfit_in_flight = true;
        let result = self.feed.outfit_for(&pid).await;
        self.outfit_in_flight = false;

        match result {
            Ok(Some(suggestion)) => {
                self.outfit = Some(suggestion.clone());
                Ok(Some(suggestion))
            }
            Ok(None) => {
                self.set_notice("No complementary item found.");
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "outfit fetch failed");
                self.set_notice("Could not fetch outfit suggestion.");
                Ok(None)
            }
        }
    }

    /// Accepting a suggestion counts as a super-like on the suggested item;
    /// the displayed deck is unaffected.
    pub async fn accept_outfit(&mut self) -> Option<DecisionEvent> {
        let suggestion = self.outfit.take()?;
        let modifiers = Modifiers {
            superlike: true,
            ..Modifiers::default()
        };
        Some(
            self.decide_other(&suggestion.suggested_item, Action::Like, modifiers)
                .await,
        )
    }

    pub async fn decline_outfit(&mut self) -> Option<DecisionEvent> {
        let suggestion = self.outfit.take()?;
        Some(
            self.decide_other(&suggestion.suggested_item, Action::Nope, Modifiers::default())
                .await,
        )
    }

    #[cfg(test)]
    pub(crate) fn force_outfit_in_flight(&mut self) {
        self.outfit_in_flight = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::core::dispatch::Feedback;
    use crate::error::{FeedError, FlowError};

    struct StubFeed;

    #[async_trait]
    impl FeedSource for StubFeed {
        async fn next_batch(&self, _user: &str, _n: u32) -> std::result::Result<Vec<Item>, FeedError> {
            Ok(vec![Item::anonymous().with_name("Mystery Scarf")])
        }

        async fn calibrate(&self, _user: &str, _category: &str) -> std::result::Result<(), FeedError> {
            Ok(())
        }

        async fn outfit_for(&self, _pid: &str) -> std::result::Result<Option<OutfitSuggestion>, FeedError> {
            Ok(None)
        }
    }

    struct NullSink;

    #[async_trait]
    impl FeedbackSink for NullSink {
        async fn deliver(&self, _feedback: Feedback) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new(
            FlowConfig::default(),
            Arc::new(StubFeed),
            Arc::new(NullSink),
        )
    }

    #[tokio::test]
    async fn outfit_is_single_flight() {
        let mut s = session();
        s.start().await;
        s.force_outfit_in_flight();
        let err = s.request_outfit().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Session(SessionError::OutfitInFlight)
        ));
    }

    #[tokio::test]
    async fn outfit_refused_without_item_id() {
        let mut s = session();
        s.start().await;
        // the stub deck's only item carries no identifier
        let err = s.request_outfit().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Session(SessionError::MissingItemId)
        ));
        assert_eq!(
            s.notice(),
            Some("Can't determine product id for outfit suggestion.")
        );
    }

    #[tokio::test]
    async fn save_sets_notice_without_recording() {
        let mut s = session();
        s.start().await;
        s.save_current();
        assert_eq!(s.notice(), Some("Mystery Scarf saved to wishlist"));
        assert_eq!(s.stats().total, 0);
        assert!(s.take_notice().is_some());
        assert!(s.notice().is_none());
    }
}
