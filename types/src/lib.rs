//! Static configuration and data model for the Cosmic Heist math engine.
//!
//! Everything in this crate is read-only input to a simulation run: the
//! symbol alphabet and capability tags, the ways-pay paytable, the reel
//! strips for each game mode, and the bet-mode/distribution declarations
//! that drive quota and RTP fitting. A [`GameConfig`] is built once,
//! validated, and then shared by reference across all components; there
//! is no process-wide configuration singleton.

mod bet_mode;
mod config;
mod constants;
mod cosmic;
mod paytable;
mod reels;
mod symbol;

pub use bet_mode::{BetMode, Distribution, ForceOutcome};
pub use config::{GameConfig, VaultPrize};
pub use constants::*;
pub use paytable::Paytable;
pub use reels::{ReelSet, ReelStrip};
pub use symbol::{SpecialSymbols, Symbol};

use thiserror::Error;

/// Error raised by malformed or inconsistent static configuration.
///
/// Configuration errors are fatal: they abort a run before any
/// simulation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("reel index {reel} out of range (mode has {reels} reels)")]
    ReelIndexOutOfRange { reel: usize, reels: usize },
    #[error("reel {reel} in mode {mode:?} has an empty strip")]
    EmptyStrip { mode: String, reel: usize },
    #[error("reel {reel} in mode {mode:?} has {len} symbols but the board needs {rows} rows")]
    StripShorterThanBoard {
        mode: String,
        reel: usize,
        len: usize,
        rows: usize,
    },
    #[error("mode {mode:?} defines {got} reel strips, expected {expected}")]
    WrongReelCount {
        mode: String,
        got: usize,
        expected: usize,
    },
    #[error("unknown reel mode {0:?}")]
    UnknownReelMode(String),
    #[error("unknown bet mode {0:?}")]
    UnknownBetMode(String),
    #[error("paytable entry ({count}, {symbol:?}) pays {multiplier} which is invalid")]
    InvalidPaytableEntry {
        count: u8,
        symbol: Symbol,
        multiplier: f64,
    },
    #[error("paytable for {symbol:?} is not monotonic: ({low_count}) pays {low} but ({high_count}) pays {high}")]
    NonMonotonicPaytable {
        symbol: Symbol,
        low_count: u8,
        low: f64,
        high_count: u8,
        high: f64,
    },
    #[error("bet mode {mode:?} quotas sum to {sum}, expected 1.0")]
    QuotaSumMismatch { mode: String, sum: f64 },
    #[error("bet mode {mode:?} has non-positive cost {cost}")]
    NonPositiveCost { mode: String, cost: f64 },
    #[error("bet mode RTP sub-targets sum to {sum}, expected {expected}")]
    RtpShareMismatch { sum: f64, expected: f64 },
    #[error("{0}")]
    Invalid(String),
}

/// Result type for configuration validation and lookups.
pub type Result<T> = std::result::Result<T, ConfigError>;
