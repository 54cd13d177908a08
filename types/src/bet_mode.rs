//! Bet modes and their outcome-distribution declarations.

use serde::{Deserialize, Serialize};

/// A forcing condition a distribution bucket can impose on sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceOutcome {
    /// The base board must contain enough scatters to trigger free spins.
    FreeGame,
    /// The base board must contain enough bonus symbols to trigger the vault bonus.
    Bonus,
}

/// A named outcome bucket within a bet mode.
///
/// `quota` is the fraction of all simulated rounds for the mode that
/// must land in this bucket. `win_criteria` restricts membership to
/// rounds whose total win equals the given value exactly (the zero-win
/// bucket uses 0.0). `force` makes the sampler construct qualifying
/// boards directly instead of waiting for them to occur.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub criteria: String,
    pub quota: f64,
    pub win_criteria: Option<f64>,
    pub force: Option<ForceOutcome>,
}

impl Distribution {
    pub fn new(criteria: &str, quota: f64) -> Self {
        Self {
            criteria: criteria.to_string(),
            quota,
            win_criteria: None,
            force: None,
        }
    }

    pub fn with_win_criteria(mut self, win: f64) -> Self {
        self.win_criteria = Some(win);
        self
    }

    pub fn with_force(mut self, force: ForceOutcome) -> Self {
        self.force = Some(force);
        self
    }

    /// True if the fitting pass may rescale this bucket's weights.
    ///
    /// Only unforced zero-win buckets qualify: scaling them moves the
    /// wagered-amount denominator without touching any win totals or
    /// bucket populations.
    pub fn is_reweightable(&self) -> bool {
        self.force.is_none() && self.win_criteria == Some(0.0)
    }
}

/// A named wagering context: cost per round, RTP sub-target, win cap,
/// and the ordered outcome buckets its simulated rounds must fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetMode {
    pub name: String,
    pub cost: f64,
    pub rtp: f64,
    pub max_win: f64,
    /// Reel-set mode this bet mode's base spins sample from.
    pub reel_mode: String,
    pub distributions: Vec<Distribution>,
}

impl BetMode {
    pub fn new(
        name: &str,
        cost: f64,
        rtp: f64,
        max_win: f64,
        reel_mode: &str,
        distributions: Vec<Distribution>,
    ) -> Self {
        Self {
            name: name.to_string(),
            cost,
            rtp,
            max_win,
            reel_mode: reel_mode.to_string(),
            distributions,
        }
    }

    /// Sum of the declared quotas.
    pub fn quota_sum(&self) -> f64 {
        self.distributions.iter().map(|d| d.quota).sum()
    }
}
