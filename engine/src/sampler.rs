//! Free and forced board sampling.

use crate::{Board, EngineError, Result, RoundRng};
use heist_types::{ForceOutcome, GameConfig};

/// Samples per forcing condition before giving up.
pub const FORCE_RETRY_LIMIT: usize = 100_000;

/// Draw one board: a uniform stop per reel, window read from the strips.
pub fn sample(config: &GameConfig, reel_mode: &str, rng: &mut RoundRng) -> Result<Board> {
    let reels = config.reel_set(reel_mode)?;
    let mut stops = Vec::with_capacity(config.num_reels);
    for reel in 0..config.num_reels {
        stops.push(rng.stop(reels.strip(reel)?.len()));
    }
    Ok(Board::from_stops(reels, &config.num_rows, stops)?)
}

/// True if `board` satisfies the forcing condition.
pub fn satisfies(config: &GameConfig, board: &Board, force: ForceOutcome) -> bool {
    match force {
        ForceOutcome::FreeGame => {
            board.count_any(&config.specials.scatters) >= config.scatter_trigger_count() as usize
        }
        ForceOutcome::Bonus => {
            board.count_any(&config.specials.bonuses) >= config.bonus_trigger_count as usize
        }
    }
}

/// Draw boards until one satisfies `force`, bounded by [`FORCE_RETRY_LIMIT`].
///
/// Rejection sampling keeps the conditional stop distribution exact:
/// the result is distributed as "a uniform board, given the condition".
pub fn sample_forced(
    config: &GameConfig,
    reel_mode: &str,
    force: ForceOutcome,
    rng: &mut RoundRng,
) -> Result<Board> {
    for _ in 0..FORCE_RETRY_LIMIT {
        let board = sample(config, reel_mode, rng)?;
        if satisfies(config, &board, force) {
            return Ok(board);
        }
    }
    tracing::warn!(?force, attempts = FORCE_RETRY_LIMIT, "forcing condition unsatisfied");
    Err(EngineError::ForceUnsatisfiable {
        force,
        attempts: FORCE_RETRY_LIMIT,
    })
}
