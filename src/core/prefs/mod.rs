use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::catalog::Item;
use crate::core::decision::Action;

// Per-facet importance applied when scoring an item.
const SCORE_BRAND: f64 = 1.0;
const SCORE_KIND: f64 = 1.2;
const SCORE_COLOR: f64 = 0.8;
const SCORE_PRICE: f64 = 0.6;

// Per-facet scale applied to the decision magnitude on update. Brand and
// kind absorb the full magnitude; color and price are damped.
const UPDATE_COLOR: f64 = 0.8;
const UPDATE_PRICE: f64 = 0.6;

const MAGNITUDE_NOPE: f64 = -0.7;
const MAGNITUDE_SUPER: f64 = 2.0;
const MAGNITUDE_SOFT_LIKE: f64 = 1.25;
const MAGNITUDE_LIKE: f64 = 1.0;

// Facet — categorical item attribute keyed into the weight tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    Brand,
    Kind,
    Color,
    Price,
}

/// Signed update magnitude for a decision. Exactly one case applies;
/// super-like takes precedence over the soft flag.
pub fn magnitude(action: Action, soft: bool) -> f64 {
    match action {
        Action::Nope => MAGNITUDE_NOPE,
        Action::SuperLike => MAGNITUDE_SUPER,
        Action::Like if soft => MAGNITUDE_SOFT_LIKE,
        Action::Like => MAGNITUDE_LIKE,
    }
}

/// Online additive preference model: one weight table per facet, session
/// lifetime, never reset or normalized. Absent entries read as 0. Weights
/// can grow without bound over a long session by design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceState {
    brand: HashMap<String, f64>,
    kind: HashMap<String, f64>,
    color: HashMap<String, f64>,
    price: HashMap<String, f64>,
}

impl PreferenceState {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, facet: Facet) -> &HashMap<String, f64> {
        match facet {
            Facet::Brand => &self.brand,
            Facet::Kind => &self.kind,
            Facet::Color => &self.color,
            Facet::Price => &self.price,
        }
    }

    /// Current weight for a facet value; 0 when the value has never been
    /// seen.
    pub fn weight(&self, facet: Facet, value: &str) -> f64 {
        self.table(facet).get(value).copied().unwrap_or(0.0)
    }

    /// Match score for an item against the current weights. Blank facet
    /// values contribute 0 and never create table entries.
    pub fn score(&self, item: &Item) -> f64 {
        let mut s = 0.0;
        if let Some(brand) = item.brand() {
            s += self.weight(Facet::Brand, brand) * SCORE_BRAND;
        }
        if let Some(kind) = item.kind() {
            s += self.weight(Facet::Kind, kind) * SCORE_KIND;
        }
        if let Some(color) = item.color() {
            s += self.weight(Facet::Color, color) * SCORE_COLOR;
        }
        s += self.weight(Facet::Price, &item.price_bucket().to_string()) * SCORE_PRICE;
        s
    }

    /// Applies one decision to the weight tables. This is the entire
    /// learning rule: no decay, no regularization.
    pub fn apply(&mut self, item: &Item, action: Action, soft: bool) {
        let m = magnitude(action, soft);
        if let Some(brand) = item.brand() {
            inc(&mut self.brand, brand, m);
        }
        if let Some(kind) = item.kind() {
            inc(&mut self.kind, kind, m);
        }
        if let Some(color) = item.color() {
            inc(&mut self.color, color, m * UPDATE_COLOR);
        }
        // the bucket label is always present ("unknown" is a real value)
        inc(&mut self.price, &item.price_bucket().to_string(), m * UPDATE_PRICE);
    }

    /// The `k` highest-weighted values of a facet, descending.
    pub fn top_k(&self, facet: Facet, k: usize) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .table(facet)
            .iter()
            .map(|(value, weight)| (value.clone(), *weight))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(k);
        entries
    }
}

fn inc(table: &mut HashMap<String, f64>, key: &str, by: f64) {
    *table.entry(key.to_owned()).or_insert(0.0) += by;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceBucket;

    fn coat() -> Item {
        Item::new("p1")
            .with_brand("Acme")
            .with_kind("jacket")
            .with_color("navy")
            .with_price("180")
    }

    #[test]
    fn weights_accumulate_monotonically() {
        let mut prefs = PreferenceState::new();
        prefs.apply(&coat(), Action::Nope, false);
        prefs.apply(&coat(), Action::Like, false);
        assert!((prefs.weight(Facet::Brand, "Acme") - 0.3).abs() < 1e-12);
    }

    #[test]
    fn super_like_scales_per_facet() {
        let mut prefs = PreferenceState::new();
        prefs.apply(&coat(), Action::SuperLike, false);
        assert!((prefs.weight(Facet::Brand, "Acme") - 2.0).abs() < 1e-12);
        assert!((prefs.weight(Facet::Kind, "jacket") - 2.0).abs() < 1e-12);
        assert!((prefs.weight(Facet::Color, "navy") - 1.6).abs() < 1e-12);
        assert!((prefs.weight(Facet::Price, "$100–199") - 1.2).abs() < 1e-12);
    }

    #[test]
    fn super_like_takes_precedence_over_soft() {
        assert!((magnitude(Action::SuperLike, true) - 2.0).abs() < f64::EPSILON);
        assert!((magnitude(Action::Like, true) - 1.25).abs() < f64::EPSILON);
        assert!((magnitude(Action::Like, false) - 1.0).abs() < f64::EPSILON);
        assert!((magnitude(Action::Nope, true) + 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn score_is_linear_in_matching_facets_only() {
        let mut prefs = PreferenceState::new();
        // build up weights for the target brand and kind
        let seed = Item::new("s").with_brand("Acme").with_kind("jacket");
        prefs.apply(&seed, Action::Like, false);
        prefs.apply(&seed, Action::SuperLike, false);
        // unrelated entries must not leak into the score
        let noise = Item::new("n").with_brand("Other").with_color("red");
        prefs.apply(&noise, Action::SuperLike, false);

        let target = Item::new("t").with_brand("Acme").with_kind("jacket");
        let w_brand = prefs.weight(Facet::Brand, "Acme");
        let w_kind = prefs.weight(Facet::Kind, "jacket");
        let w_price = prefs.weight(Facet::Price, "unknown");
        let expected = 1.0 * w_brand + 1.2 * w_kind + 0.6 * w_price;
        assert!((prefs.score(&target) - expected).abs() < 1e-12);
    }

    #[test]
    fn blank_facets_never_create_entries() {
        let mut prefs = PreferenceState::new();
        let bare = Item::anonymous();
        prefs.apply(&bare, Action::Like, false);
        assert_eq!(prefs.top_k(Facet::Brand, 5).len(), 0);
        assert_eq!(prefs.top_k(Facet::Kind, 5).len(), 0);
        assert_eq!(prefs.top_k(Facet::Color, 5).len(), 0);
        // the price bucket still registers, as "unknown"
        assert_eq!(bare.price_bucket(), PriceBucket::Unknown);
        assert!((prefs.weight(Facet::Price, "unknown") - 0.6).abs() < 1e-12);
    }

    #[test]
    fn top_k_sorts_descending_and_truncates() {
        let mut prefs = PreferenceState::new();
        for (brand, action) in [
            ("Acme", Action::SuperLike),
            ("Blink", Action::Like),
            ("Crest", Action::Nope),
        ] {
            prefs.apply(&Item::new("x").with_brand(brand), action, false);
        }
        let top = prefs.top_k(Facet::Brand, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Acme");
        assert_eq!(top[1].0, "Blink");
    }
}
