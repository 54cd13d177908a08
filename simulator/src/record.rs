//! The accepted-round record handed from the distribution manager to
//! the lookup-table builder.

use heist_engine::RoundResult;
use serde::{Deserialize, Serialize};

/// One finished, accepted round with its bucket assignment and weight.
///
/// Owned by the [`crate::DistributionManager`] until the run completes,
/// then by the [`crate::LookupTableBuilder`] for serialization. The
/// fitting pass mutates only `weight`; win and cost are frozen at
/// acceptance time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Position in the final table, assigned after all buckets fill.
    pub index: u64,
    /// Criteria label of the bucket that accepted the round.
    pub criteria: String,
    /// Total round win in units of total bet.
    pub win: f64,
    /// Cost of the round (the bet mode's cost).
    pub cost: f64,
    pub capped: bool,
    pub weight: f64,
    /// Full replay trace.
    pub round: RoundResult,
}
