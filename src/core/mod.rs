// Session core — the parts with real invariants: preference engine,
// analytics aggregator, gesture state machine, deck manager, dispatcher.

pub mod analytics;
pub mod deck;
pub mod decision;
pub mod dispatch;
pub mod gesture;
pub mod prefs;
