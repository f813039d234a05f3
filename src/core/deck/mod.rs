// Deck manager — append-only item sequence with a clamped read cursor and
// a low-watermark refill trigger.

use crate::catalog::Item;

#[derive(Debug, Clone)]
pub struct Deck {
    items: Vec<Item>,
    cursor: usize,
    low_watermark: usize,
}

impl Deck {
    pub fn new(low_watermark: usize) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            low_watermark,
        }
    }

    /// Replace the whole deck and reset the cursor (calibration flow).
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Append a refill batch. Ordering across overlapping refills is not an
    /// invariant.
    pub fn append(&mut self, batch: Vec<Item>) {
        self.items.extend(batch);
    }

    /// Element at the cursor, or `None` once the deck is exhausted.
    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    /// Move the cursor forward one, clamped to the sequence length.
    /// Advancing past the end yields "no current item", never an error.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.items.len());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items at or past the cursor.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    /// True whenever fewer than `low_watermark` items remain. Checked after
    /// every cursor change and after the initial load; level-triggered, so
    /// overlapping refill fetches are the caller's to tolerate.
    pub fn needs_refill(&self) -> bool {
        self.remaining() < self.low_watermark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item> {
        (0..n).map(|i| Item::new(format!("p{i}"))).collect()
    }

    #[test]
    fn cursor_clamps_at_length() {
        let mut deck = Deck::new(10);
        deck.replace(items(2));
        deck.advance();
        deck.advance();
        assert_eq!(deck.cursor(), 2);
        assert!(deck.current().is_none());
        deck.advance();
        assert_eq!(deck.cursor(), 2);
        assert!(deck.current().is_none());
    }

    #[test]
    fn refill_fires_only_below_watermark() {
        let mut deck = Deck::new(10);
        deck.replace(items(12));
        deck.advance();
        deck.advance();
        // 10 remaining: at the watermark, no refill
        assert_eq!(deck.remaining(), 10);
        assert!(!deck.needs_refill());
        deck.advance();
        // 9 remaining: below the watermark
        assert_eq!(deck.remaining(), 9);
        assert!(deck.needs_refill());
    }

    #[test]
    fn append_restores_headroom() {
        let mut deck = Deck::new(10);
        deck.replace(items(12));
        for _ in 0..5 {
            deck.advance();
        }
        assert!(deck.needs_refill());
        deck.append(items(30));
        assert_eq!(deck.len(), 42);
        assert!(!deck.needs_refill());
    }

    #[test]
    fn empty_deck_wants_refill_immediately() {
        let deck = Deck::new(10);
        assert!(deck.needs_refill());
        assert!(deck.current().is_none());
    }

    #[test]
    fn replace_resets_cursor() {
        let mut deck = Deck::new(10);
        deck.replace(items(5));
        deck.advance();
        deck.advance();
        deck.replace(items(3));
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.current().map(Item::id).flatten(), Some("p0"));
    }
}
