//! The ephemeral symbol grid one spin produces.

use heist_types::{ConfigError, ReelSet, Symbol};
use serde::{Deserialize, Serialize};

/// A sampled board: one column of symbols per reel, read from the
/// strips at the sampled stops. Lives for one evaluation; feature
/// effects (quantum wilds, expanding wilds) may overwrite cells before
/// the board is evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    stops: Vec<usize>,
    columns: Vec<Vec<Symbol>>,
}

impl Board {
    /// Read the board window for the given stops: `num_rows[reel]`
    /// consecutive symbols per reel, wrapping at the strip end.
    pub fn from_stops(
        reels: &ReelSet,
        num_rows: &[usize],
        stops: Vec<usize>,
    ) -> Result<Self, ConfigError> {
        let mut columns = Vec::with_capacity(stops.len());
        for (reel, &stop) in stops.iter().enumerate() {
            let mut column = Vec::with_capacity(num_rows[reel]);
            for row in 0..num_rows[reel] {
                column.push(reels.symbol_at(reel, stop + row)?);
            }
            columns.push(column);
        }
        Ok(Self { stops, columns })
    }

    pub fn num_reels(&self) -> usize {
        self.columns.len()
    }

    /// The stops this board was read at.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// The symbols on one reel, top row first.
    pub fn reel(&self, reel: usize) -> &[Symbol] {
        &self.columns[reel]
    }

    pub fn get(&self, reel: usize, row: usize) -> Symbol {
        self.columns[reel][row]
    }

    pub fn set(&mut self, reel: usize, row: usize, symbol: Symbol) {
        self.columns[reel][row] = symbol;
    }

    /// Iterate all cells as (reel, row, symbol).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Symbol)> + '_ {
        self.columns.iter().enumerate().flat_map(|(reel, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(row, &symbol)| (reel, row, symbol))
        })
    }

    /// Total cells on the board equal to `symbol`.
    pub fn count_symbol(&self, symbol: Symbol) -> usize {
        self.cells().filter(|&(_, _, s)| s == symbol).count()
    }

    /// Total cells matching any of `symbols` (e.g. all scatters).
    pub fn count_any(&self, symbols: &[Symbol]) -> usize {
        self.cells().filter(|(_, _, s)| symbols.contains(s)).count()
    }

    /// The symbol columns, for replay serialization.
    pub fn columns(&self) -> &[Vec<Symbol>] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_types::ReelStrip;
    use Symbol::*;

    fn small_set() -> ReelSet {
        ReelSet::new(vec![
            ReelStrip::new(vec![Ace, King, Queen, Jack, Ten]),
            ReelStrip::new(vec![King, Queen, Jack, Ten, Ace]),
        ])
    }

    #[test]
    fn test_window_wraps() {
        let set = small_set();
        let board = Board::from_stops(&set, &[3, 3], vec![4, 0]).unwrap();
        // Reel 0 starts at the last strip position and wraps to the front.
        assert_eq!(board.reel(0), &[Ten, Ace, King]);
        assert_eq!(board.reel(1), &[King, Queen, Jack]);
    }

    #[test]
    fn test_counts() {
        let set = small_set();
        let mut board = Board::from_stops(&set, &[3, 3], vec![0, 0]).unwrap();
        assert_eq!(board.count_symbol(King), 2);
        board.set(0, 0, King);
        assert_eq!(board.count_symbol(King), 3);
        assert_eq!(board.count_any(&[King, Queen]), 5);
    }

    #[test]
    fn test_from_stops_rejects_missing_reel() {
        let set = small_set();
        let err = Board::from_stops(&set, &[3, 3, 3], vec![0, 0, 0]).unwrap_err();
        assert!(matches!(err, ConfigError::ReelIndexOutOfRange { .. }));
    }
}
