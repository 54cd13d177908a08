//! Ways-pay win evaluation.
//!
//! A "way" exists for a symbol through reel `i` when reel `i` holds at
//! least one cell showing the symbol or a wild. The match length is the
//! number of consecutive qualifying reels starting at reel 0, and the
//! ways count is the product of per-reel qualifying-cell counts over the
//! matched reels. Wilds substitute for every paying class, never for
//! scatters, bonuses or each other.

use crate::Board;
use heist_types::{GameConfig, Symbol, MIN_MATCH};
use serde::{Deserialize, Serialize};

/// One realized payout event on a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinCluster {
    pub symbol: Symbol,
    /// Consecutive qualifying reels from the leftmost reel.
    pub count: u8,
    /// Product of per-reel qualifying-cell counts.
    pub ways: u64,
    /// Qualifying (reel, row) cells on the matched reels.
    pub positions: Vec<(u8, u8)>,
    /// Multiplier contributed: paytable entry × ways.
    pub amount: f64,
}

/// The result of evaluating one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinEvaluation {
    /// Total win multiplier, clamped at the wincap.
    pub total: f64,
    pub clusters: Vec<WinCluster>,
    /// True when the raw total exceeded the wincap and was clamped.
    pub capped: bool,
}

impl WinEvaluation {
    fn empty() -> Self {
        Self {
            total: 0.0,
            clusters: Vec::new(),
            capped: false,
        }
    }
}

/// Count cells on `reel` showing `symbol` or a wild, collecting positions.
fn qualifying_cells(
    board: &Board,
    config: &GameConfig,
    reel: usize,
    symbol: Symbol,
    positions: &mut Vec<(u8, u8)>,
) -> u64 {
    let mut count = 0;
    for (row, &cell) in board.reel(reel).iter().enumerate() {
        if cell == symbol || config.specials.is_wild(cell) {
            count += 1;
            positions.push((reel as u8, row as u8));
        }
    }
    count
}

/// Evaluate every ways-pay win on `board`.
///
/// Cluster order follows paytable symbol order, so evaluating the same
/// board twice yields identical sequences.
pub fn evaluate(board: &Board, config: &GameConfig) -> WinEvaluation {
    // An all-wild board qualifies for every paying class at full length;
    // it pays the single best full-length entry instead of stacking them.
    if board.cells().all(|(_, _, s)| config.specials.is_wild(s)) {
        return evaluate_all_wild(board, config);
    }

    let mut evaluation = WinEvaluation::empty();
    for symbol in config.paytable.symbols() {
        // Specials never form their own ways clusters.
        if config.specials.is_special(symbol) {
            continue;
        }
        let mut ways: u64 = 1;
        let mut count: u8 = 0;
        let mut positions = Vec::new();
        for reel in 0..board.num_reels() {
            let cells = qualifying_cells(board, config, reel, symbol, &mut positions);
            if cells == 0 {
                break;
            }
            ways *= cells;
            count += 1;
        }
        if count < MIN_MATCH {
            continue;
        }
        if let Some(multiplier) = config.paytable.multiplier(count, symbol) {
            let amount = multiplier * ways as f64;
            evaluation.total += amount;
            evaluation.clusters.push(WinCluster {
                symbol,
                count,
                ways,
                positions,
                amount,
            });
        }
    }

    clamp(&mut evaluation, config.wincap);
    evaluation
}

fn evaluate_all_wild(board: &Board, config: &GameConfig) -> WinEvaluation {
    let mut evaluation = WinEvaluation::empty();
    if let Some((symbol, multiplier)) = config.paytable.best_full_length(config.num_reels) {
        let mut ways: u64 = 1;
        let mut positions = Vec::new();
        for reel in 0..board.num_reels() {
            ways *= board.reel(reel).len() as u64;
            for row in 0..board.reel(reel).len() {
                positions.push((reel as u8, row as u8));
            }
        }
        let amount = multiplier * ways as f64;
        evaluation.total = amount;
        evaluation.clusters.push(WinCluster {
            symbol,
            count: config.num_reels as u8,
            ways,
            positions,
            amount,
        });
    }
    clamp(&mut evaluation, config.wincap);
    evaluation
}

fn clamp(evaluation: &mut WinEvaluation, wincap: f64) {
    if evaluation.total > wincap {
        evaluation.total = wincap;
        evaluation.capped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sample, RoundRng};
    use heist_types::{ReelSet, ReelStrip};
    use Symbol::*;

    /// Build a board directly from columns by constructing strips that
    /// read back the wanted window at stop 0.
    fn board_of(columns: &[&[Symbol]]) -> (Board, GameConfig) {
        let mut config = GameConfig::cosmic_heist();
        config.num_reels = columns.len();
        config.num_rows = columns.iter().map(|c| c.len()).collect();
        let set = ReelSet::new(
            columns
                .iter()
                .map(|c| ReelStrip::new(c.to_vec()))
                .collect(),
        );
        let stops = vec![0; columns.len()];
        let board = Board::from_stops(&set, &config.num_rows, stops).unwrap();
        (board, config)
    }

    #[test]
    fn test_three_of_a_kind_single_way() {
        // One SpaceOutlaw on each of reels 0-2, nothing on reels 3-4.
        let (board, config) = board_of(&[
            &[SpaceOutlaw, Ten, Jack, Queen],
            &[King, SpaceOutlaw, Ten, Jack],
            &[Ten, Jack, SpaceOutlaw, King],
            &[Queen, Ten, Jack, King],
            &[Jack, Queen, Ten, King],
        ]);
        let evaluation = evaluate(&board, &config);
        let cluster = evaluation
            .clusters
            .iter()
            .find(|c| c.symbol == SpaceOutlaw)
            .expect("SpaceOutlaw cluster");
        assert_eq!(cluster.count, 3);
        assert_eq!(cluster.ways, 1);
        assert_eq!(cluster.amount, 5.0);
    }

    #[test]
    fn test_ways_multiply_per_reel() {
        // Two aces on reel 0, one on reel 1, two on reel 2: 2*1*2 = 4 ways.
        let (board, config) = board_of(&[
            &[Ace, Ace, Jack, Queen],
            &[King, Ace, Ten, Jack],
            &[Ace, Jack, Ace, King],
            &[Queen, Ten, Jack, King],
            &[Jack, Queen, Ten, King],
        ]);
        let evaluation = evaluate(&board, &config);
        let cluster = evaluation.clusters.iter().find(|c| c.symbol == Ace).unwrap();
        assert_eq!(cluster.count, 3);
        assert_eq!(cluster.ways, 4);
        assert_eq!(cluster.amount, 0.5 * 4.0);
    }

    #[test]
    fn test_wild_substitutes_and_counts_for_multiple_classes() {
        // A wild on reel 2 completes both the Ace and the King runs.
        let (board, config) = board_of(&[
            &[Ace, King, Jack, Queen],
            &[King, Ace, Ten, Jack],
            &[CosmicWild, Jack, Ten, Queen],
            &[Queen, Ten, Jack, Ten],
            &[Jack, Queen, Ten, Ten],
        ]);
        let evaluation = evaluate(&board, &config);
        let ace = evaluation.clusters.iter().find(|c| c.symbol == Ace).unwrap();
        let king = evaluation.clusters.iter().find(|c| c.symbol == King).unwrap();
        assert_eq!(ace.count, 3);
        assert_eq!(king.count, 3);
        // The wild cell appears in both clusters' positions.
        assert!(ace.positions.contains(&(2, 0)));
        assert!(king.positions.contains(&(2, 0)));
    }

    #[test]
    fn test_wild_never_completes_scatter_runs() {
        // Scatters are positional triggers, not ways symbols; wilds must
        // not manufacture scatter clusters.
        let (board, config) = board_of(&[
            &[GalacticVault, King, Jack, Queen],
            &[CosmicWild, Ace, Ten, Jack],
            &[CosmicWild, Jack, Ten, Queen],
            &[Queen, Ten, Jack, Ten],
            &[Jack, Queen, Ten, Ten],
        ]);
        let evaluation = evaluate(&board, &config);
        assert!(evaluation
            .clusters
            .iter()
            .all(|c| c.symbol != GalacticVault));
    }

    #[test]
    fn test_run_stops_at_gap() {
        // Queen on reels 0, 1 and 3: the gap at reel 2 stops the run below
        // the minimum match, so no cluster forms.
        let (board, config) = board_of(&[
            &[Queen, King, Jack, Ten],
            &[Queen, Ace, Ten, Jack],
            &[Ace, Jack, Ten, King],
            &[Queen, Ten, Jack, King],
            &[Jack, King, Ten, King],
        ]);
        let evaluation = evaluate(&board, &config);
        assert!(evaluation.clusters.iter().all(|c| c.symbol != Queen));
    }

    #[test]
    fn test_all_wild_pays_best_symbol_once() {
        let (board, config) = board_of(&[
            &[CosmicWild; 4],
            &[CosmicWild; 4],
            &[CosmicWild; 4],
            &[CosmicWild; 4],
            &[CosmicWild; 4],
        ]);
        let evaluation = evaluate(&board, &config);
        assert_eq!(evaluation.clusters.len(), 1);
        let cluster = &evaluation.clusters[0];
        assert_eq!(cluster.symbol, SpaceOutlaw);
        assert_eq!(cluster.count, 5);
        assert_eq!(cluster.ways, 4u64.pow(5));
        // 50 × 1024 ways blows past the cap.
        assert!(evaluation.capped);
        assert_eq!(evaluation.total, config.wincap);
    }

    #[test]
    fn test_total_never_exceeds_wincap() {
        let config = GameConfig::cosmic_heist();
        for seed in 0..200 {
            let mut rng = RoundRng::from_seed_value(seed);
            let board = sample(&config, "base", &mut rng).unwrap();
            let evaluation = evaluate(&board, &config);
            assert!(evaluation.total >= 0.0);
            assert!(evaluation.total <= config.wincap);
        }
    }

    #[test]
    fn test_evaluation_idempotent() {
        let config = GameConfig::cosmic_heist();
        for seed in 0..50 {
            let mut rng = RoundRng::from_seed_value(seed);
            let board = sample(&config, "base", &mut rng).unwrap();
            assert_eq!(evaluate(&board, &config), evaluate(&board, &config));
        }
    }

    #[test]
    fn test_multiplier_monotonic_in_match_count() {
        // Property over generated boards: extending a run never pays less.
        let config = GameConfig::cosmic_heist();
        for seed in 0..100 {
            let mut rng = RoundRng::from_seed_value(seed);
            let board = sample(&config, "base", &mut rng).unwrap();
            for cluster in evaluate(&board, &config).clusters {
                for shorter in MIN_MATCH..cluster.count {
                    let (Some(low), Some(high)) = (
                        config.paytable.multiplier(shorter, cluster.symbol),
                        config.paytable.multiplier(cluster.count, cluster.symbol),
                    ) else {
                        continue;
                    };
                    assert!(high >= low);
                }
            }
        }
    }
}
