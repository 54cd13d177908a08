//! RTP reweighting: the fitting pass that pulls a filled population's
//! realized RTP onto the bet mode's sub-target.
//!
//! Bucketed sampling fixes the population *counts*; this pass rescales
//! the *weights* of records in reweightable buckets (unforced zero-win
//! buckets) until Σ(win·w)/Σ(cost·w) lands on the target. Zero-win
//! records add wagered amount without adding wins, so inflating or
//! shrinking their weight moves the quotient without touching any win,
//! cost or population count. Runs single-threaded after the worker
//! barrier; weights are the only thing it mutates.

use crate::{OutcomeRecord, Result, SimError};
use heist_types::BetMode;
use tracing::debug;

/// Outcome of a fitting pass.
#[derive(Clone, Debug)]
pub struct FitReport {
    pub mode: String,
    pub target_rtp: f64,
    /// Realized RTP of the raw population, before any reweighting.
    pub unweighted_rtp: f64,
    /// Realized RTP after fitting.
    pub realized_rtp: f64,
    pub iterations: u32,
    /// Cumulative scale applied to reweightable records.
    pub scale: f64,
}

fn realized(records: &[OutcomeRecord]) -> f64 {
    let wins: f64 = records.iter().map(|r| r.win * r.weight).sum();
    let costs: f64 = records.iter().map(|r| r.cost * r.weight).sum();
    wins / costs
}

/// Reweight `records` until the realized RTP is within `tolerance`
/// (relative) of the bet mode's sub-target, then normalize total weight
/// to `total_weight`.
///
/// Fails with [`SimError::RtpConvergence`] when the mode declares no
/// reweightable bucket to move, when the target is unreachable from the
/// realized population (the reweightable wagered amount would have to
/// go negative), or when the iteration bound is exhausted.
pub fn fit_rtp(
    records: &mut [OutcomeRecord],
    bet_mode: &BetMode,
    tolerance: f64,
    max_iterations: u32,
    total_weight: f64,
) -> Result<FitReport> {
    let target = bet_mode.rtp;
    let unweighted_rtp = realized(records);

    let reweightable: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            bet_mode
                .distributions
                .iter()
                .any(|d| d.criteria == r.criteria && d.is_reweightable())
        })
        .map(|(i, _)| i)
        .collect();

    let mut iterations = 0;
    let mut scale = 1.0;
    loop {
        let current = realized(records);
        if (current - target).abs() <= tolerance * target {
            break;
        }
        if iterations >= max_iterations {
            return Err(SimError::RtpConvergence {
                mode: bet_mode.name.clone(),
                realized: current,
                target,
                iterations,
            });
        }

        // Solve for the reweightable wagered amount that lands the
        // quotient on the target: wins / (fixed + adjustable) = target.
        let wins: f64 = records.iter().map(|r| r.win * r.weight).sum();
        let adjustable: f64 = reweightable
            .iter()
            .map(|&i| records[i].cost * records[i].weight)
            .sum();
        let fixed: f64 = records.iter().map(|r| r.cost * r.weight).sum::<f64>() - adjustable;
        let needed = wins / target - fixed;
        if reweightable.is_empty() || adjustable <= 0.0 || needed <= 0.0 {
            return Err(SimError::RtpConvergence {
                mode: bet_mode.name.clone(),
                realized: current,
                target,
                iterations,
            });
        }
        let factor = needed / adjustable;
        for &i in &reweightable {
            records[i].weight *= factor;
        }
        scale *= factor;
        iterations += 1;
        debug!(
            mode = %bet_mode.name,
            iteration = iterations,
            factor,
            "reweighted zero-win buckets"
        );
    }

    // A uniform rescale leaves the quotient untouched; pin the total
    // weight to the configured simulation count.
    let sum: f64 = records.iter().map(|r| r.weight).sum();
    let normalize = total_weight / sum;
    for record in records.iter_mut() {
        record.weight *= normalize;
    }

    Ok(FitReport {
        mode: bet_mode.name.clone(),
        target_rtp: target,
        unweighted_rtp,
        realized_rtp: realized(records),
        iterations,
        scale,
    })
}
