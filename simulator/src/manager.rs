//! Bucketed round generation per bet mode.
//!
//! Rounds within a bucket are mutually independent, so they are
//! generated on a rayon pool. Each attempt derives its own RNG stream
//! from (master seed, mode, bucket, attempt) and acceptance depends
//! only on the attempt's own round, so the accepted set, taken in
//! attempt order, is identical no matter how many workers run.

use crate::{fit_rtp, FitReport, OutcomeRecord, Result, SimError};
use heist_engine::{play_round, RoundResult, RoundRng};
use heist_types::{BetMode, Distribution, ForceOutcome, GameConfig, RTP_FIT_TOLERANCE};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Attempts allowed per needed round before a bucket is declared unfillable.
const RETRY_BUDGET_FACTOR: u64 = 500;

/// Attempts dispatched to the worker pool per batch.
const BATCH_SIZE: u64 = 4096;

/// Iteration bound for the RTP fitting pass.
const MAX_FIT_ITERATIONS: u32 = 64;

/// Cooperative cancellation flag, checked between buckets.
///
/// Cancelling mid-bucket discards that bucket's partial results; buckets
/// already filled are still lost with the run, since a partial run is
/// never persisted.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A completed run for one bet mode.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub mode: String,
    pub records: Vec<OutcomeRecord>,
    pub fit: FitReport,
}

impl RunOutput {
    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight).sum()
    }

    /// Realized RTP over the weighted record set.
    pub fn realized_rtp(&self) -> f64 {
        let wins: f64 = self.records.iter().map(|r| r.win * r.weight).sum();
        let costs: f64 = self.records.iter().map(|r| r.cost * r.weight).sum();
        wins / costs
    }
}

/// Runs batches of simulated rounds per bet mode, classifies them into
/// the declared criteria buckets, and fits bucket weights to the
/// configured quota and RTP targets.
pub struct DistributionManager<'a> {
    config: &'a GameConfig,
    master_seed: u64,
}

impl<'a> DistributionManager<'a> {
    /// Validates the configuration up front; a malformed config aborts
    /// before any simulation starts.
    pub fn new(config: &'a GameConfig, master_seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            master_seed,
        })
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Simulate `target_rounds` rounds for the bet mode, fill every
    /// bucket to its exact quota share, and fit the RTP.
    pub fn run(&self, mode_name: &str, target_rounds: usize) -> Result<RunOutput> {
        self.run_cancellable(mode_name, target_rounds, &CancelToken::new())
    }

    /// [`DistributionManager::run`] with a cancellation checkpoint
    /// between buckets.
    pub fn run_cancellable(
        &self,
        mode_name: &str,
        target_rounds: usize,
        cancel: &CancelToken,
    ) -> Result<RunOutput> {
        let bet_mode = self.config.bet_mode(mode_name)?;
        let mode_index = self
            .config
            .bet_modes
            .iter()
            .position(|m| m.name == mode_name)
            .unwrap_or(0) as u32;

        let counts = bucket_counts(&bet_mode.distributions, target_rounds);
        let mut records: Vec<OutcomeRecord> = Vec::with_capacity(target_rounds);
        for (bucket_index, (bucket, &count)) in
            bet_mode.distributions.iter().zip(&counts).enumerate()
        {
            if cancel.is_cancelled() {
                return Err(SimError::Aborted {
                    mode: bet_mode.name.clone(),
                    bucket: bucket.criteria.clone(),
                });
            }
            info!(
                mode = %bet_mode.name,
                bucket = %bucket.criteria,
                count,
                "filling bucket"
            );
            let rounds =
                self.fill_bucket(bet_mode, mode_index, bucket_index as u32, bucket, count)?;
            records.extend(rounds.into_iter().map(|round| OutcomeRecord {
                index: 0,
                criteria: bucket.criteria.clone(),
                win: round.total_win,
                cost: bet_mode.cost,
                capped: round.capped,
                weight: 1.0,
                round,
            }));
        }
        for (index, record) in records.iter_mut().enumerate() {
            record.index = index as u64;
        }

        // Fitting runs after the worker barrier: it needs the whole
        // realized population and mutates only weights.
        let fit = fit_rtp(
            &mut records,
            bet_mode,
            RTP_FIT_TOLERANCE,
            MAX_FIT_ITERATIONS,
            target_rounds as f64,
        )?;
        info!(
            mode = %bet_mode.name,
            realized = fit.realized_rtp,
            target = fit.target_rtp,
            iterations = fit.iterations,
            "rtp fit complete"
        );

        Ok(RunOutput {
            mode: bet_mode.name.clone(),
            records,
            fit,
        })
    }

    fn fill_bucket(
        &self,
        bet_mode: &BetMode,
        mode_index: u32,
        bucket_index: u32,
        bucket: &Distribution,
        count: usize,
    ) -> Result<Vec<RoundResult>> {
        let budget = (count as u64).saturating_mul(RETRY_BUDGET_FACTOR).max(BATCH_SIZE);
        let mut accepted: Vec<RoundResult> = Vec::with_capacity(count);
        let mut attempt: u64 = 0;
        while accepted.len() < count && attempt < budget {
            let batch = BATCH_SIZE.min(budget - attempt);
            let results: Vec<Result<Option<RoundResult>>> = (attempt..attempt + batch)
                .into_par_iter()
                .map(|i| {
                    let mut rng = RoundRng::new(self.master_seed, mode_index, bucket_index, i);
                    let round = play_round(self.config, bet_mode, bucket.force, &mut rng)
                        .map_err(|source| SimError::Round {
                            mode: bet_mode.name.clone(),
                            bucket: bucket.criteria.clone(),
                            attempt: i,
                            seed: self.master_seed,
                            source,
                        })?;
                    Ok(accepts(bucket, &round).then_some(round))
                })
                .collect();
            for result in results {
                if let Some(round) = result? {
                    if accepted.len() < count {
                        accepted.push(round);
                    }
                }
            }
            attempt += batch;
            debug!(
                bucket = %bucket.criteria,
                accepted = accepted.len(),
                attempted = attempt,
                "bucket progress"
            );
        }
        if accepted.len() < count {
            return Err(SimError::QuotaUnfillable {
                mode: bet_mode.name.clone(),
                bucket: bucket.criteria.clone(),
                needed: count,
                accepted: accepted.len(),
                attempts: attempt,
                seed: self.master_seed,
            });
        }
        Ok(accepted)
    }
}

/// Bucket membership for a finished round.
///
/// Forced buckets take only rounds that actually entered the forced
/// outcome; unforced buckets take only rounds that stayed out of free
/// spins (so quota shapes stay disjoint). An exact win criteria must
/// match the round's total win.
fn accepts(bucket: &Distribution, round: &RoundResult) -> bool {
    match bucket.force {
        Some(ForceOutcome::FreeGame) => {
            if !round.feature {
                return false;
            }
        }
        Some(ForceOutcome::Bonus) => {
            if !round.bonus {
                return false;
            }
        }
        None => {
            if round.feature {
                return false;
            }
        }
    }
    match bucket.win_criteria {
        Some(win) => round.total_win == win,
        None => true,
    }
}

/// Bucket sizes: quota share of `target`, with the rounding remainder
/// distributed by largest fractional part so the sizes sum exactly to
/// `target`.
fn bucket_counts(distributions: &[Distribution], target: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::with_capacity(distributions.len());
    let mut fractions: Vec<(f64, usize)> = Vec::with_capacity(distributions.len());
    for (i, d) in distributions.iter().enumerate() {
        let exact = d.quota * target as f64;
        counts.push(exact.floor() as usize);
        fractions.push((exact - exact.floor(), i));
    }
    let assigned: usize = counts.iter().sum();
    let deficit = target.saturating_sub(assigned);
    fractions.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in fractions.iter().take(deficit) {
        counts[i] += 1;
    }
    counts
}
