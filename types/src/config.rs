//! The assembled game configuration consumed by the engine and simulator.

use crate::{
    BetMode, ConfigError, Paytable, ReelSet, SpecialSymbols, FREESPIN_REEL_MODE, QUOTA_EPSILON,
    RTP_SHARE_EPSILON,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One prize in the Grand Heist vault bonus: a payout multiplier and
/// its selection weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaultPrize {
    pub multiplier: f64,
    pub weight: u32,
}

/// Immutable static configuration for one game.
///
/// Built once, validated with [`GameConfig::validate`], then shared by
/// reference across every component of a simulation run. Multiple runs
/// (e.g. parallel bet modes) each borrow the same value; nothing here
/// is mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_id: String,
    /// Overall target return to player, as a fraction.
    pub rtp: f64,
    /// Maximum total win per round, in units of total bet.
    pub wincap: f64,
    pub num_reels: usize,
    /// Board height per reel.
    pub num_rows: Vec<usize>,
    pub paytable: Paytable,
    pub specials: SpecialSymbols,
    /// Scatter count → free spins awarded on trigger. The smallest key
    /// is the trigger threshold; deeper counts award more spins.
    pub scatter_triggers: BTreeMap<u8, u32>,
    /// Extra spins granted when a free-spin board re-meets the scatter threshold.
    pub retrigger_award: u32,
    /// Retrigger count after which a round fails fast.
    pub max_retriggers: u32,
    /// Bonus symbols required on the base board to enter the vault bonus.
    pub bonus_trigger_count: u8,
    /// Chance per spin that quantum wilds fire.
    pub quantum_wild_chance: f64,
    /// Inclusive range of cells transformed when quantum wilds fire.
    pub quantum_wild_range: (u8, u8),
    /// Weighted prize table for the vault bonus.
    pub vault_prizes: Vec<VaultPrize>,
    /// Reel strips per mode name ("base", "free").
    pub reels: BTreeMap<String, ReelSet>,
    pub bet_modes: Vec<BetMode>,
}

impl GameConfig {
    /// The reel set for a mode name.
    pub fn reel_set(&self, mode: &str) -> Result<&ReelSet, ConfigError> {
        self.reels
            .get(mode)
            .ok_or_else(|| ConfigError::UnknownReelMode(mode.to_string()))
    }

    /// The bet mode with the given name.
    pub fn bet_mode(&self, name: &str) -> Result<&BetMode, ConfigError> {
        self.bet_modes
            .iter()
            .find(|mode| mode.name == name)
            .ok_or_else(|| ConfigError::UnknownBetMode(name.to_string()))
    }

    /// Minimum scatter count that triggers free spins.
    pub fn scatter_trigger_count(&self) -> u8 {
        self.scatter_triggers.keys().next().copied().unwrap_or(u8::MAX)
    }

    /// Spins awarded for landing `scatters` scatters, if at or above the
    /// trigger threshold. Counts deeper than the table use its last entry.
    pub fn spins_for_scatters(&self, scatters: u8) -> Option<u32> {
        self.scatter_triggers
            .range(..=scatters)
            .next_back()
            .map(|(_, &spins)| spins)
    }

    /// Check the whole configuration for consistency.
    ///
    /// Fatal on failure: a run must not start from a malformed config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rows.len() != self.num_reels {
            return Err(ConfigError::Invalid(format!(
                "num_rows has {} entries for {} reels",
                self.num_rows.len(),
                self.num_reels
            )));
        }
        if !self.wincap.is_finite() || self.wincap <= 0.0 {
            return Err(ConfigError::Invalid(format!("wincap {} is invalid", self.wincap)));
        }
        if !(0.0..=1.0).contains(&self.rtp) {
            return Err(ConfigError::Invalid(format!("rtp {} is invalid", self.rtp)));
        }
        if !(0.0..=1.0).contains(&self.quantum_wild_chance) {
            return Err(ConfigError::Invalid(format!(
                "quantum wild chance {} is invalid",
                self.quantum_wild_chance
            )));
        }
        let (lo, hi) = self.quantum_wild_range;
        if lo == 0 || hi < lo {
            return Err(ConfigError::Invalid(format!(
                "quantum wild range {lo}..={hi} is invalid"
            )));
        }
        if self.scatter_triggers.is_empty() {
            return Err(ConfigError::Invalid("empty scatter trigger table".into()));
        }
        if self.vault_prizes.is_empty() || self.vault_prizes.iter().all(|p| p.weight == 0) {
            return Err(ConfigError::Invalid("vault prize table has no weight".into()));
        }

        self.paytable.validate(self.num_reels)?;
        for (mode, set) in &self.reels {
            set.validate(mode, self.num_reels, &self.num_rows)?;
        }
        // Free spins sample from their own strips; they must exist up front.
        self.reel_set(FREESPIN_REEL_MODE)?;

        let mut rtp_sum = 0.0;
        for mode in &self.bet_modes {
            if mode.cost <= 0.0 {
                return Err(ConfigError::NonPositiveCost {
                    mode: mode.name.clone(),
                    cost: mode.cost,
                });
            }
            let sum = mode.quota_sum();
            if (sum - 1.0).abs() > QUOTA_EPSILON {
                return Err(ConfigError::QuotaSumMismatch {
                    mode: mode.name.clone(),
                    sum,
                });
            }
            // Base spins of this bet mode must have strips to sample from.
            self.reel_set(&mode.reel_mode)?;
            rtp_sum += mode.rtp;
        }
        if !self.bet_modes.is_empty() && (rtp_sum - self.rtp).abs() > RTP_SHARE_EPSILON {
            return Err(ConfigError::RtpShareMismatch {
                sum: rtp_sum,
                expected: self.rtp,
            });
        }
        Ok(())
    }
}
