//! Batch simulation and fitting for the Cosmic Heist math engine.
//!
//! The [`manager::DistributionManager`] simulates rounds per bet mode,
//! fills the declared outcome buckets to their exact quotas, and hands
//! the resulting population to the fitting pass
//! ([`fitting::fit_rtp`]), which rescales zero-win weights until the
//! realized RTP matches the mode's sub-target. The
//! [`lookup::LookupTableBuilder`] then freezes the accepted records
//! into an indexed, weighted table plus a replay log ("books") that a
//! serving layer can pay from deterministically.

pub mod fitting;
pub mod lookup;
pub mod manager;
pub mod record;

pub use fitting::{fit_rtp, FitReport};
pub use lookup::{Book, LookupEntry, LookupTable, LookupTableBuilder};
pub use manager::{CancelToken, DistributionManager, RunOutput};
pub use record::OutcomeRecord;

use heist_engine::EngineError;
use heist_types::ConfigError;
use thiserror::Error;

/// Error during batch simulation, fitting or table emission.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(
        "round generation failed in mode {mode:?} bucket {bucket:?} at attempt {attempt} \
         (seed {seed}): {source}"
    )]
    Round {
        mode: String,
        bucket: String,
        attempt: u64,
        seed: u64,
        #[source]
        source: EngineError,
    },
    #[error(
        "bucket {bucket:?} in mode {mode:?} unfillable: {accepted}/{needed} rounds \
         after {attempts} attempts (seed {seed})"
    )]
    QuotaUnfillable {
        mode: String,
        bucket: String,
        needed: usize,
        accepted: usize,
        attempts: u64,
        seed: u64,
    },
    #[error(
        "RTP fit for mode {mode:?} did not converge: realized {realized:.6} vs \
         target {target:.6} after {iterations} iterations"
    )]
    RtpConvergence {
        mode: String,
        realized: f64,
        target: f64,
        iterations: u32,
    },
    #[error("run aborted before bucket {bucket:?} in mode {mode:?}")]
    Aborted { mode: String, bucket: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("book codec error: {0}")]
    BookCodec(#[from] serde_json::Error),
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;
