#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod feed;
pub mod session;

pub use crate::catalog::{bucketize, Item, PriceBucket};
pub use crate::config::FlowConfig;
pub use crate::core::analytics::{Analytics, SessionStats};
pub use crate::core::deck::Deck;
pub use crate::core::decision::{Action, DecisionEvent, Modifiers};
pub use crate::core::dispatch::{Dispatcher, Feedback, FeedbackSink};
pub use crate::core::gesture::{Commit, GestureMachine, GestureState, Point, SettleTarget};
pub use crate::core::prefs::{Facet, PreferenceState};
pub use crate::error::{FlowError, Result};
pub use crate::feed::{FeedClient, FeedSource, OutfitSuggestion};
pub use crate::session::{Phase, Session};
