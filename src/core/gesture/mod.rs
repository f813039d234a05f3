// Gesture state machine — converts pointer motion and tap timing into
// committed decisions. Pure transitions over a tagged state; callers feed
// an explicit clock and read state, never drive it.

use crate::config::GestureConfig;
use crate::core::decision::Action;

/// Visual rotation divisor: rotation (degrees) = horizontal offset / 22.
/// Feedback only, carries no decision weight.
const ROTATION_DIVISOR: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging { origin: Point, current: Point },
    Settling { target: SettleTarget },
}

// SettleTarget — where the card animates once released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleTarget {
    Like,
    Nope,
    Center,
}

/// A decision produced by a gesture, ready for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub action: Action,
    pub dwell_ms: u64,
    pub soft: bool,
}

#[derive(Debug, Clone)]
pub struct GestureMachine {
    cfg: GestureConfig,
    state: GestureState,
    impression_start_ms: u64,
    last_image_tap_ms: Option<u64>,
}

impl GestureMachine {
    pub fn new(cfg: GestureConfig, now_ms: u64) -> Self {
        Self {
            cfg,
            state: GestureState::Idle,
            impression_start_ms: now_ms,
            last_image_tap_ms: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// A new card became current: clear residual offset and restart the
    /// dwell clock. Dwell is always per-card, never cumulative.
    pub fn mount(&mut self, now_ms: u64) {
        self.state = GestureState::Idle;
        self.impression_start_ms = now_ms;
        self.last_image_tap_ms = None;
    }

    fn dwell(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.impression_start_ms)
    }

    fn is_soft(&self, dwell_ms: u64) -> bool {
        dwell_ms >= self.cfg.dwell_threshold_ms
    }

    /// Pointer/touch down on the card body. Presses without coordinates
    /// (malformed events) are ignored.
    pub fn press(&mut self, at: Option<Point>) {
        if let (GestureState::Idle, Some(at)) = (self.state, at) {
            self.state = GestureState::Dragging {
                origin: at,
                current: at,
            };
        }
    }

    /// Pointer/touch move. Outside `Dragging` this is a no-op; a move
    /// without coordinates leaves the offset unchanged, no error.
    pub fn drag(&mut self, to: Option<Point>) {
        if let (GestureState::Dragging { origin, .. }, Some(to)) = (self.state, to) {
            self.state = GestureState::Dragging {
                origin,
                current: to,
            };
        }
    }

    /// Live drag offset; (0, 0) outside `Dragging`.
    pub fn offset(&self) -> (f64, f64) {
        match self.state {
            GestureState::Dragging { origin, current } => {
                (current.x - origin.x, current.y - origin.y)
            }
            _ => (0.0, 0.0),
        }
    }

    /// Derived card rotation in degrees, proportional to horizontal offset.
    pub fn rotation_deg(&self) -> f64 {
        self.offset().0 / ROTATION_DIVISOR
    }

    /// Pointer released. Commits strictly beyond the horizontal threshold;
    /// exactly at the threshold the card settles back to center with no
    /// decision.
    pub fn release(&mut self, now_ms: u64) -> Option<Commit> {
        let GestureState::Dragging { .. } = self.state else {
            return None;
        };
        let (dx, _) = self.offset();
        let dwell_ms = self.dwell(now_ms);
        if dx > self.cfg.commit_threshold_px {
            self.state = GestureState::Settling {
                target: SettleTarget::Like,
            };
            Some(Commit {
                action: Action::Like,
                dwell_ms,
                soft: self.is_soft(dwell_ms),
            })
        } else if dx < -self.cfg.commit_threshold_px {
            self.state = GestureState::Settling {
                target: SettleTarget::Nope,
            };
            Some(Commit {
                action: Action::Nope,
                dwell_ms,
                soft: false,
            })
        } else {
            self.state = GestureState::Settling {
                target: SettleTarget::Center,
            };
            None
        }
    }

    /// Settle animation finished. A center settle returns to rest without
    /// touching the dwell clock; swiped cards are replaced via `mount`.
    pub fn settled(&mut self) {
        if let GestureState::Settling { .. } = self.state {
            self.state = GestureState::Idle;
        }
    }

    /// Activation of the image area. Two activations within the double-tap
    /// window commit a super-like, independent of any drag.
    pub fn image_tap(&mut self, now_ms: u64) -> Option<Commit> {
        let commit = self
            .last_image_tap_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.cfg.double_tap_window_ms)
            .then(|| self.super_commit(now_ms));
        self.last_image_tap_ms = Some(now_ms);
        commit
    }

    /// The designated super-like control: short-circuits straight to a
    /// super-like, bypassing drag entirely.
    pub fn super_control(&mut self, now_ms: u64) -> Commit {
        self.super_commit(now_ms)
    }

    fn super_commit(&self, now_ms: u64) -> Commit {
        let dwell_ms = self.dwell(now_ms);
        Commit {
            action: Action::SuperLike,
            dwell_ms,
            soft: self.is_soft(dwell_ms),
        }
    }

    /// Left-quarter tap zone: direct nope with measured dwell.
    pub fn tap_nope(&self, now_ms: u64) -> Commit {
        Commit {
            action: Action::Nope,
            dwell_ms: self.dwell(now_ms),
            soft: false,
        }
    }

    /// Right-quarter tap zone: direct like with measured dwell.
    pub fn tap_like(&self, now_ms: u64) -> Commit {
        let dwell_ms = self.dwell(now_ms);
        Commit {
            action: Action::Like,
            dwell_ms,
            soft: self.is_soft(dwell_ms),
        }
    }
}
