//! Feature lifecycle: free spins, retriggers and the vault bonus.
//!
//! One [`FeatureState`] exists per round, created at round start and
//! consumed at round end; it is never shared across rounds or threads.
//! Board effects (quantum wilds, expanding wilds) are a closed set of
//! named variants dispatched by the current stage rather than ad hoc
//! hooks.

use crate::{Board, EngineError, Result, RoundRng};
use heist_types::GameConfig;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a round's feature state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureStage {
    Base,
    TriggeredPending,
    FreespinActive,
    Retriggered,
    BonusPending,
    BonusActive,
    Complete,
}

/// Board-mutating feature effects, applied before win evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureEffect {
    /// Transform 2–5 random non-special cells into wilds.
    QuantumWilds,
    /// Cover every reel holding a wild entirely with wilds.
    ExpandingWilds,
}

/// Per-round feature state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureState {
    stage: FeatureStage,
    spins_remaining: u32,
    accumulated_win: f64,
    retriggers: u32,
}

impl Default for FeatureState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureState {
    pub fn new() -> Self {
        Self {
            stage: FeatureStage::Base,
            spins_remaining: 0,
            accumulated_win: 0.0,
            retriggers: 0,
        }
    }

    pub fn stage(&self) -> FeatureStage {
        self.stage
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn accumulated_win(&self) -> f64 {
        self.accumulated_win
    }

    pub fn retriggers(&self) -> u32 {
        self.retriggers
    }

    /// Board effects active for the next spin at the current stage.
    pub fn board_effects(&self) -> &'static [FeatureEffect] {
        match self.stage {
            FeatureStage::Base => &[FeatureEffect::QuantumWilds],
            FeatureStage::FreespinActive => {
                &[FeatureEffect::QuantumWilds, FeatureEffect::ExpandingWilds]
            }
            _ => &[],
        }
    }

    /// Base board met the scatter threshold: `Base → TriggeredPending`.
    pub fn trigger_free_spins(&mut self, award: u32) -> Result<()> {
        if self.stage != FeatureStage::Base {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "trigger_free_spins",
            });
        }
        self.stage = FeatureStage::TriggeredPending;
        self.spins_remaining = award;
        Ok(())
    }

    /// `TriggeredPending → FreespinActive`.
    pub fn begin_free_spins(&mut self) -> Result<()> {
        if self.stage != FeatureStage::TriggeredPending {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "begin_free_spins",
            });
        }
        self.stage = FeatureStage::FreespinActive;
        Ok(())
    }

    /// Consume one free spin. Requires `FreespinActive` with spins left.
    pub fn consume_spin(&mut self) -> Result<()> {
        if self.stage != FeatureStage::FreespinActive || self.spins_remaining == 0 {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "consume_spin",
            });
        }
        self.spins_remaining -= 1;
        Ok(())
    }

    /// A free-spin board re-met the scatter threshold:
    /// `FreespinActive → Retriggered → FreespinActive`, adding `award`
    /// spins without resetting the accumulated win. Fails fast once the
    /// configured retrigger limit is exceeded.
    pub fn retrigger(&mut self, award: u32, limit: u32) -> Result<()> {
        if self.stage != FeatureStage::FreespinActive {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "retrigger",
            });
        }
        if self.retriggers >= limit {
            return Err(EngineError::RetriggerLimitExceeded {
                limit,
                trace: Vec::new(),
            });
        }
        // Pass through Retriggered and settle back on FreespinActive;
        // the intermediate stage is observable only in the round trace.
        self.stage = FeatureStage::Retriggered;
        self.retriggers += 1;
        self.spins_remaining += award;
        self.stage = FeatureStage::FreespinActive;
        Ok(())
    }

    /// Base board met the bonus threshold: `Base → BonusPending`.
    pub fn trigger_bonus(&mut self) -> Result<()> {
        if self.stage != FeatureStage::Base {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "trigger_bonus",
            });
        }
        self.stage = FeatureStage::BonusPending;
        Ok(())
    }

    /// `BonusPending → BonusActive`.
    pub fn begin_bonus(&mut self) -> Result<()> {
        if self.stage != FeatureStage::BonusPending {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                op: "begin_bonus",
            });
        }
        self.stage = FeatureStage::BonusActive;
        Ok(())
    }

    /// Add a spin's win to the feature total.
    pub fn add_win(&mut self, amount: f64) {
        self.accumulated_win += amount;
    }

    /// Finish the feature, returning the accumulated win.
    pub fn complete(&mut self) -> f64 {
        self.stage = FeatureStage::Complete;
        self.accumulated_win
    }
}

/// Quantum wilds: transform 2–5 random non-special cells into wilds.
///
/// Fires with the configured per-spin chance; returns the transformed
/// (reel, row) cells, empty when the effect did not fire. Wild, scatter
/// and bonus cells are never replaced.
pub fn apply_quantum_wilds(
    board: &mut Board,
    config: &GameConfig,
    rng: &mut RoundRng,
) -> Vec<(u8, u8)> {
    if config.specials.wilds.is_empty() || !rng.chance(config.quantum_wild_chance) {
        return Vec::new();
    }
    let mut candidates: Vec<(u8, u8)> = board
        .cells()
        .filter(|&(_, _, s)| !config.specials.is_special(s))
        .map(|(reel, row, _)| (reel as u8, row as u8))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }
    let (lo, hi) = config.quantum_wild_range;
    let wanted = rng.range(lo, hi) as usize;
    let wild = config.specials.wilds[0];
    let mut transformed = Vec::with_capacity(wanted);
    for _ in 0..wanted.min(candidates.len()) {
        let pick = rng.index(candidates.len());
        let (reel, row) = candidates.swap_remove(pick);
        board.set(reel as usize, row as usize, wild);
        transformed.push((reel, row));
    }
    transformed.sort_unstable();
    transformed
}

/// Expanding wilds: every reel holding at least one wild is covered by
/// wilds entirely. Returns the expanded reel indices.
pub fn apply_expanding_wilds(board: &mut Board, config: &GameConfig) -> Vec<u8> {
    let Some(&wild) = config.specials.wilds.first() else {
        return Vec::new();
    };
    let mut expanded = Vec::new();
    for reel in 0..board.num_reels() {
        let has_wild = board.reel(reel).iter().any(|&s| config.specials.is_wild(s));
        if !has_wild {
            continue;
        }
        for row in 0..board.reel(reel).len() {
            board.set(reel, row, wild);
        }
        expanded.push(reel as u8);
    }
    expanded
}

/// Draw one prize from the weighted vault table.
pub fn vault_payout(config: &GameConfig, rng: &mut RoundRng) -> f64 {
    let weights: Vec<u32> = config.vault_prizes.iter().map(|p| p.weight).collect();
    config.vault_prizes[rng.pick_weighted(&weights)].multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use heist_types::GameConfig;

    #[test]
    fn test_free_spin_lifecycle() {
        let mut state = FeatureState::new();
        assert_eq!(state.stage(), FeatureStage::Base);

        state.trigger_free_spins(8).unwrap();
        assert_eq!(state.stage(), FeatureStage::TriggeredPending);
        state.begin_free_spins().unwrap();
        assert_eq!(state.stage(), FeatureStage::FreespinActive);
        assert_eq!(state.spins_remaining(), 8);

        state.consume_spin().unwrap();
        state.add_win(2.5);
        assert_eq!(state.spins_remaining(), 7);

        state.retrigger(4, 12).unwrap();
        assert_eq!(state.stage(), FeatureStage::FreespinActive);
        assert_eq!(state.spins_remaining(), 11);
        assert_eq!(state.retriggers(), 1);
        // The accumulated win survives the retrigger.
        assert_eq!(state.accumulated_win(), 2.5);

        assert_eq!(state.complete(), 2.5);
        assert_eq!(state.stage(), FeatureStage::Complete);
    }

    #[test]
    fn test_retrigger_limit() {
        let mut state = FeatureState::new();
        state.trigger_free_spins(8).unwrap();
        state.begin_free_spins().unwrap();
        for _ in 0..3 {
            state.retrigger(4, 3).unwrap();
        }
        assert!(matches!(
            state.retrigger(4, 3),
            Err(EngineError::RetriggerLimitExceeded { limit: 3, .. })
        ));
    }

    #[test]
    fn test_illegal_transitions() {
        let mut state = FeatureState::new();
        assert!(matches!(
            state.consume_spin(),
            Err(EngineError::InvalidTransition { .. })
        ));
        state.trigger_bonus().unwrap();
        assert!(matches!(
            state.trigger_free_spins(8),
            Err(EngineError::InvalidTransition { .. })
        ));
        state.begin_bonus().unwrap();
        assert_eq!(state.stage(), FeatureStage::BonusActive);
    }

    #[test]
    fn test_board_effects_by_stage() {
        let mut state = FeatureState::new();
        assert_eq!(state.board_effects(), &[FeatureEffect::QuantumWilds]);
        state.trigger_free_spins(8).unwrap();
        assert!(state.board_effects().is_empty());
        state.begin_free_spins().unwrap();
        assert_eq!(
            state.board_effects(),
            &[FeatureEffect::QuantumWilds, FeatureEffect::ExpandingWilds]
        );
    }

    #[test]
    fn test_quantum_wilds_preserve_specials() {
        let config = GameConfig::cosmic_heist();
        // Scan seeds until the effect fires, then check the transform.
        for seed in 0..500 {
            let mut rng = crate::RoundRng::from_seed_value(seed);
            let mut board = sample(&config, "base", &mut rng).unwrap();
            let specials_before: Vec<_> = board
                .cells()
                .filter(|&(_, _, s)| config.specials.is_special(s))
                .collect();
            let transformed = apply_quantum_wilds(&mut board, &config, &mut rng);
            if transformed.is_empty() {
                continue;
            }
            let (_, hi) = config.quantum_wild_range;
            assert!(!transformed.is_empty());
            assert!(transformed.len() <= hi as usize);
            for &(reel, row) in &transformed {
                assert!(config.specials.is_wild(board.get(reel as usize, row as usize)));
                assert!(!specials_before
                    .iter()
                    .any(|&(r, w, _)| r == reel as usize && w == row as usize));
            }
            return;
        }
        panic!("quantum wilds never fired across 500 seeds");
    }

    #[test]
    fn test_expanding_wilds_cover_wild_reels() {
        let config = GameConfig::cosmic_heist();
        for seed in 0..200 {
            let mut rng = crate::RoundRng::from_seed_value(seed);
            let mut board = sample(&config, "free", &mut rng).unwrap();
            let wild_reels: Vec<u8> = (0..board.num_reels())
                .filter(|&r| board.reel(r).iter().any(|&s| config.specials.is_wild(s)))
                .map(|r| r as u8)
                .collect();
            let expanded = apply_expanding_wilds(&mut board, &config);
            assert_eq!(expanded, wild_reels);
            for &reel in &expanded {
                assert!(board
                    .reel(reel as usize)
                    .iter()
                    .all(|&s| config.specials.is_wild(s)));
            }
            if !expanded.is_empty() {
                return;
            }
        }
        panic!("no wild landed across 200 seeds");
    }

    #[test]
    fn test_vault_payout_draws_from_table() {
        let config = GameConfig::cosmic_heist();
        let mut rng = crate::RoundRng::from_seed_value(11);
        for _ in 0..200 {
            let prize = vault_payout(&config, &mut rng);
            assert!(config.vault_prizes.iter().any(|p| p.multiplier == prize));
        }
    }
}
