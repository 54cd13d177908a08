//! Round mechanics for the Cosmic Heist math engine.
//!
//! This crate turns static configuration into single simulated rounds:
//! - [`rng`]: deterministic, derivable random streams
//! - [`board`]: the ephemeral symbol grid one spin produces
//! - [`sampler`]: free and forced board sampling
//! - [`ways`]: ways-pay win evaluation with wild substitution
//! - [`feature`]: the free-spin / bonus state machine and board effects
//! - [`round`]: the full-round driver producing a replayable trace
//!
//! Everything is deterministic: a fixed seed and a fixed call sequence
//! reproduce every board bit-for-bit, which is what makes generated
//! lookup tables auditable.

pub mod board;
pub mod feature;
pub mod rng;
pub mod round;
pub mod sampler;
pub mod ways;


pub use board::Board;
pub use feature::{FeatureEffect, FeatureStage, FeatureState};
pub use rng::RoundRng;
pub use round::{play_round, RoundEvent, RoundResult};
pub use sampler::{sample, sample_forced, FORCE_RETRY_LIMIT};
pub use ways::{evaluate, WinCluster, WinEvaluation};

use heist_types::{ConfigError, ForceOutcome};
use thiserror::Error;

/// Error during round generation or evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("forcing condition {force:?} not satisfied after {attempts} samples")]
    ForceUnsatisfiable { force: ForceOutcome, attempts: usize },
    #[error("retrigger limit {limit} exceeded")]
    RetriggerLimitExceeded {
        limit: u32,
        /// Replay trace of the offending round, for reproduction.
        trace: Vec<RoundEvent>,
    },
    #[error("illegal feature transition: {op} while {from:?}")]
    InvalidTransition { from: FeatureStage, op: &'static str },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
