//! Ways-pay paytable: (symbol, match count) → payout multiplier.

use crate::{ConfigError, Symbol, MIN_MATCH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payout multipliers keyed by (symbol, adjacent-reel match count).
///
/// Multipliers are expressed in units of the total bet. Keys are held in
/// a `BTreeMap` so iteration order, and therefore win-cluster emission
/// order during evaluation, is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paytable {
    entries: BTreeMap<(Symbol, u8), f64>,
}

impl Paytable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a paytable from (count, symbol, multiplier) triples.
    pub fn from_entries(entries: &[(u8, Symbol, f64)]) -> Self {
        let mut paytable = Self::new();
        for &(count, symbol, multiplier) in entries {
            paytable.insert(count, symbol, multiplier);
        }
        paytable
    }

    pub fn insert(&mut self, count: u8, symbol: Symbol, multiplier: f64) {
        self.entries.insert((symbol, count), multiplier);
    }

    /// Multiplier for `count` adjacent reels of `symbol`, if the entry exists.
    pub fn multiplier(&self, count: u8, symbol: Symbol) -> Option<f64> {
        self.entries.get(&(symbol, count)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct paying symbols, in symbol order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.entries.keys().map(|&(symbol, _)| symbol).collect();
        symbols.dedup();
        symbols
    }

    /// The symbol with the highest full-length multiplier.
    ///
    /// Used for the all-wild board, which pays the best symbol's
    /// full-length entry exactly once.
    pub fn best_full_length(&self, num_reels: usize) -> Option<(Symbol, f64)> {
        self.entries
            .iter()
            .filter(|&(&(_, count), _)| count as usize == num_reels)
            .map(|(&(symbol, _), &multiplier)| (symbol, multiplier))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Check that every entry is well-formed and that, for a fixed
    /// symbol, payouts are non-decreasing in match count.
    pub fn validate(&self, num_reels: usize) -> Result<(), ConfigError> {
        for (&(symbol, count), &multiplier) in &self.entries {
            if count < MIN_MATCH || count as usize > num_reels || !multiplier.is_finite() || multiplier < 0.0 {
                return Err(ConfigError::InvalidPaytableEntry {
                    count,
                    symbol,
                    multiplier,
                });
            }
        }
        // Keys are ordered (symbol, count), so adjacent entries with the
        // same symbol are consecutive counts.
        let mut prev: Option<(Symbol, u8, f64)> = None;
        for (&(symbol, count), &multiplier) in &self.entries {
            if let Some((prev_symbol, prev_count, prev_multiplier)) = prev {
                if prev_symbol == symbol && multiplier < prev_multiplier {
                    return Err(ConfigError::NonMonotonicPaytable {
                        symbol,
                        low_count: prev_count,
                        low: prev_multiplier,
                        high_count: count,
                        high: multiplier,
                    });
                }
            }
            prev = Some((symbol, count, multiplier));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let paytable = Paytable::from_entries(&[
            (3, Symbol::SpaceOutlaw, 5.0),
            (4, Symbol::SpaceOutlaw, 20.0),
            (5, Symbol::SpaceOutlaw, 50.0),
        ]);

        assert_eq!(paytable.multiplier(4, Symbol::SpaceOutlaw), Some(20.0));
        assert_eq!(paytable.multiplier(2, Symbol::SpaceOutlaw), None);
        assert_eq!(paytable.multiplier(3, Symbol::Ace), None);
    }

    #[test]
    fn test_symbols_deduplicated() {
        let paytable = Paytable::from_entries(&[
            (3, Symbol::Ace, 0.5),
            (4, Symbol::Ace, 2.5),
            (3, Symbol::King, 0.4),
        ]);
        assert_eq!(paytable.symbols(), vec![Symbol::Ace, Symbol::King]);
    }

    #[test]
    fn test_best_full_length() {
        let paytable = Paytable::from_entries(&[
            (5, Symbol::SpaceOutlaw, 50.0),
            (5, Symbol::Spaceship, 25.0),
            (3, Symbol::Ace, 0.5),
        ]);
        assert_eq!(
            paytable.best_full_length(5),
            Some((Symbol::SpaceOutlaw, 50.0))
        );
    }

    #[test]
    fn test_validate_rejects_non_monotonic() {
        let paytable = Paytable::from_entries(&[
            (3, Symbol::Ace, 2.0),
            (4, Symbol::Ace, 1.0),
        ]);
        assert!(matches!(
            paytable.validate(5),
            Err(ConfigError::NonMonotonicPaytable { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_short_match() {
        let paytable = Paytable::from_entries(&[(2, Symbol::Ace, 0.5)]);
        assert!(matches!(
            paytable.validate(5),
            Err(ConfigError::InvalidPaytableEntry { .. })
        ));
    }
}
