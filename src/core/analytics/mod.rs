// Analytics aggregator — bounded event log plus rolling outcome history,
// with derived counts, rates, and lift.

pub mod ring;

use serde::Serialize;

use crate::core::decision::{Action, DecisionEvent};
use ring::RingLog;

const EVENT_LOG_CAP: usize = 200;
const HISTORY_CAP: usize = 60;
const WINDOW: usize = 10;

/// Rolling snapshot over the currently retained event log.
///
/// `first10_rate` is the like-rate of the 10 *oldest retained* events and
/// `last10_rate` that of the 10 newest. Because storage is newest-first,
/// "first" is a tail slice and "last" a head slice; the naming follows the
/// shipped client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    /// Likes including super-likes.
    pub likes: usize,
    pub supers: usize,
    pub nopes: usize,
    /// Events whose soft-dwell flag was set.
    pub softs: usize,
    /// round(100 × likes / total); 0 when the log is empty.
    pub like_rate: u32,
    /// Whole milliseconds; 0 when the group is empty.
    pub avg_dwell_like_ms: u64,
    pub avg_dwell_nope_ms: u64,
    pub first10_rate: u32,
    pub last10_rate: u32,
    /// `last10_rate − first10_rate`, signed percentage points.
    pub lift: i32,
}

#[derive(Debug, Clone)]
pub struct Analytics {
    events: RingLog<DecisionEvent>,
    history: RingLog<bool>,
}

impl Analytics {
    pub fn new() -> Self {
        Self {
            events: RingLog::new(EVENT_LOG_CAP),
            history: RingLog::new(HISTORY_CAP),
        }
    }

    pub fn record(&mut self, event: DecisionEvent) {
        self.history.push(event.action.is_positive());
        self.events.push(event);
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The `n` most recent events, newest first (activity feed).
    pub fn recent(&self, n: usize) -> Vec<&DecisionEvent> {
        self.events.iter().take(n).collect()
    }

    /// Outcome history in chronological order, 1 for like/super-like,
    /// 0 for nope (sparkline series).
    pub fn sparkline(&self) -> Vec<u8> {
        self.history
            .iter_chronological()
            .map(|&hit| u8::from(hit))
            .collect()
    }

    pub fn stats(&self) -> SessionStats {
        let total = self.events.len();
        let mut likes = 0;
        let mut supers = 0;
        let mut nopes = 0;
        let mut softs = 0;
        let mut dwell_like = 0u64;
        let mut dwell_nope = 0u64;

        for e in self.events.iter() {
            match e.action {
                Action::Like => likes += 1,
                Action::SuperLike => {
                    likes += 1;
                    supers += 1;
                }
                Action::Nope => nopes += 1,
            }
            if e.soft {
                softs += 1;
            }
            if e.action.is_positive() {
                dwell_like += e.dwell_ms;
            } else {
                dwell_nope += e.dwell_ms;
            }
        }

        let avg = |sum: u64, count: usize| -> u64 {
            if count == 0 {
                0
            } else {
                ((sum as f64) / (count as f64)).round() as u64
            }
        };

        // newest-first storage: first10 = oldest retained (tail slice),
        // last10 = newest (head slice)
        let first10_rate = like_rate(self.events.iter().rev().take(WINDOW));
        let last10_rate = like_rate(self.events.iter().take(WINDOW));

        SessionStats {
            total,
            likes,
            supers,
            nopes,
            softs,
            like_rate: pct(likes, total),
            avg_dwell_like_ms: avg(dwell_like, likes),
            avg_dwell_nope_ms: avg(dwell_nope, nopes),
            first10_rate,
            last10_rate,
            lift: last10_rate as i32 - first10_rate as i32,
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new()
    }
}

fn like_rate<'a>(events: impl Iterator<Item = &'a DecisionEvent>) -> u32 {
    let mut total = 0;
    let mut likes = 0;
    for e in events {
        total += 1;
        if e.action.is_positive() {
            likes += 1;
        }
    }
    pct(likes, total)
}

fn pct(n: usize, d: usize) -> u32 {
    if d == 0 {
        0
    } else {
        ((n as f64 / d as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;
    use crate::core::decision::Modifiers;

    fn event(action: Action, dwell_ms: u64, soft: bool) -> DecisionEvent {
        let item = Item::new("p").with_brand("Acme");
        DecisionEvent::build(
            &item,
            action,
            Modifiers {
                dwell_ms,
                soft,
                superlike: matches!(action, Action::SuperLike),
            },
            0.0,
            0,
        )
    }

    #[test]
    fn logs_are_bounded_under_sustained_load() {
        let mut analytics = Analytics::new();
        for _ in 0..250 {
            analytics.record(event(Action::Like, 100, false));
        }
        assert_eq!(analytics.event_count(), 200);
        assert_eq!(analytics.history_len(), 60);
    }

    #[test]
    fn counts_and_like_rate() {
        let mut analytics = Analytics::new();
        analytics.record(event(Action::Like, 1000, false));
        analytics.record(event(Action::SuperLike, 6000, true));
        analytics.record(event(Action::Nope, 500, false));

        let stats = analytics.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.likes, 2);
        assert_eq!(stats.supers, 1);
        assert_eq!(stats.nopes, 1);
        assert_eq!(stats.softs, 1);
        assert_eq!(stats.like_rate, 67);
        assert_eq!(stats.avg_dwell_like_ms, 3500);
        assert_eq!(stats.avg_dwell_nope_ms, 500);
    }

    #[test]
    fn empty_log_yields_zeros() {
        let stats = Analytics::new().stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.like_rate, 0);
        assert_eq!(stats.avg_dwell_like_ms, 0);
        assert_eq!(stats.first10_rate, 0);
        assert_eq!(stats.last10_rate, 0);
        assert_eq!(stats.lift, 0);
    }

    #[test]
    fn lift_compares_oldest_against_newest_window() {
        let mut analytics = Analytics::new();
        // 10 oldest all nopes, then 10 newest all likes
        for _ in 0..10 {
            analytics.record(event(Action::Nope, 100, false));
        }
        for _ in 0..10 {
            analytics.record(event(Action::Like, 100, false));
        }
        let stats = analytics.stats();
        assert_eq!(stats.first10_rate, 0);
        assert_eq!(stats.last10_rate, 100);
        assert_eq!(stats.lift, 100);
    }

    #[test]
    fn lift_can_be_negative() {
        let mut analytics = Analytics::new();
        for _ in 0..10 {
            analytics.record(event(Action::Like, 100, false));
        }
        for _ in 0..10 {
            analytics.record(event(Action::Nope, 100, false));
        }
        assert_eq!(analytics.stats().lift, -100);
    }

    #[test]
    fn sparkline_is_chronological() {
        let mut analytics = Analytics::new();
        analytics.record(event(Action::Nope, 0, false));
        analytics.record(event(Action::Like, 0, false));
        analytics.record(event(Action::SuperLike, 0, false));
        assert_eq!(analytics.sparkline(), vec![0, 1, 1]);
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut analytics = Analytics::new();
        analytics.record(event(Action::Nope, 0, false));
        analytics.record(event(Action::Like, 0, false));
        let recent = analytics.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].action, Action::Like);
    }
}
