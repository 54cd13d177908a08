//! Reel strips: the ordered symbol sequences sampled at spin time.

use crate::{ConfigError, Symbol};
use serde::{Deserialize, Serialize};

/// One reel's ordered symbol sequence.
///
/// Strip length and composition determine stop probabilities; duplicate
/// symbols encode weighting. Stops wrap modulo the strip length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStrip(Vec<Symbol>);

impl ReelStrip {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Symbol at a stop index, wrapping modulo the strip length.
    ///
    /// Panics on an empty strip; [`ReelSet::validate`] rejects those
    /// before any simulation starts.
    pub fn symbol_at(&self, stop: usize) -> Symbol {
        self.0[stop % self.0.len()]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}

/// All reel strips for one game mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelSet {
    strips: Vec<ReelStrip>,
}

impl ReelSet {
    pub fn new(strips: Vec<ReelStrip>) -> Self {
        Self { strips }
    }

    pub fn num_reels(&self) -> usize {
        self.strips.len()
    }

    /// The strip for a reel index.
    pub fn strip(&self, reel: usize) -> Result<&ReelStrip, ConfigError> {
        self.strips.get(reel).ok_or(ConfigError::ReelIndexOutOfRange {
            reel,
            reels: self.strips.len(),
        })
    }

    /// Symbol at (reel, stop), wrapping the stop modulo strip length.
    pub fn symbol_at(&self, reel: usize, stop: usize) -> Result<Symbol, ConfigError> {
        Ok(self.strip(reel)?.symbol_at(stop))
    }

    /// Check strip count and per-strip length against the board shape.
    pub fn validate(&self, mode: &str, num_reels: usize, num_rows: &[usize]) -> Result<(), ConfigError> {
        if self.strips.len() != num_reels {
            return Err(ConfigError::WrongReelCount {
                mode: mode.to_string(),
                got: self.strips.len(),
                expected: num_reels,
            });
        }
        for (reel, strip) in self.strips.iter().enumerate() {
            if strip.is_empty() {
                return Err(ConfigError::EmptyStrip {
                    mode: mode.to_string(),
                    reel,
                });
            }
            if strip.len() < num_rows[reel] {
                return Err(ConfigError::StripShorterThanBoard {
                    mode: mode.to_string(),
                    reel,
                    len: strip.len(),
                    rows: num_rows[reel],
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(symbols: &[Symbol]) -> ReelStrip {
        ReelStrip::new(symbols.to_vec())
    }

    #[test]
    fn test_symbol_at_wraps() {
        let strip = strip(&[Symbol::Ace, Symbol::King, Symbol::Queen]);
        assert_eq!(strip.symbol_at(0), Symbol::Ace);
        assert_eq!(strip.symbol_at(2), Symbol::Queen);
        assert_eq!(strip.symbol_at(3), Symbol::Ace);
        assert_eq!(strip.symbol_at(7), Symbol::King);
    }

    #[test]
    fn test_reel_index_out_of_range() {
        let set = ReelSet::new(vec![strip(&[Symbol::Ace, Symbol::King])]);
        assert!(set.strip(0).is_ok());
        assert_eq!(
            set.strip(1),
            Err(ConfigError::ReelIndexOutOfRange { reel: 1, reels: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_short_strip() {
        let set = ReelSet::new(vec![strip(&[Symbol::Ace, Symbol::King])]);
        let err = set.validate("base", 1, &[4]).unwrap_err();
        assert!(matches!(err, ConfigError::StripShorterThanBoard { .. }));
    }

    #[test]
    fn test_validate_rejects_wrong_reel_count() {
        let set = ReelSet::new(vec![strip(&[Symbol::Ace; 4])]);
        let err = set.validate("base", 5, &[4; 5]).unwrap_err();
        assert!(matches!(err, ConfigError::WrongReelCount { .. }));
    }
}
