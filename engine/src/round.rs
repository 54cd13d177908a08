//! Full-round driver: base spin, feature sequence, replayable trace.

use crate::{
    feature::{apply_expanding_wilds, apply_quantum_wilds, vault_payout},
    sample, sample_forced,
    ways::evaluate,
    Board, EngineError, FeatureEffect, FeatureState, Result, RoundRng, WinCluster,
};
use heist_types::{BetMode, ForceOutcome, GameConfig, Symbol, FREESPIN_REEL_MODE};
use serde::{Deserialize, Serialize};

/// One entry of a round's replay trace. The sequence of events is
/// sufficient to reconstruct every board shown and every feature
/// transition taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    BaseSpin {
        stops: Vec<usize>,
        board: Vec<Vec<Symbol>>,
        win: f64,
        clusters: Vec<WinCluster>,
    },
    QuantumWilds {
        cells: Vec<(u8, u8)>,
    },
    FreeSpinsTriggered {
        scatters: u8,
        spins: u32,
    },
    FreeSpin {
        index: u32,
        stops: Vec<usize>,
        board: Vec<Vec<Symbol>>,
        win: f64,
        clusters: Vec<WinCluster>,
    },
    WildExpansion {
        reels: Vec<u8>,
    },
    Retrigger {
        scatters: u8,
        extra_spins: u32,
    },
    FreeSpinsComplete {
        total: f64,
    },
    BonusTriggered {
        bonuses: u8,
    },
    VaultPrize {
        multiplier: f64,
    },
}

/// A finished round: its replay trace and summary figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub events: Vec<RoundEvent>,
    /// Total round win in units of total bet, clamped at the mode's cap.
    pub total_win: f64,
    pub capped: bool,
    /// The round entered free spins.
    pub feature: bool,
    /// The round entered the vault bonus.
    pub bonus: bool,
}

impl RoundResult {
    /// True when the round produced any win.
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }
}

/// Apply the stage's board effects in order, recording events.
fn apply_effects(
    state: &FeatureState,
    board: &mut Board,
    config: &GameConfig,
    rng: &mut RoundRng,
    events: &mut Vec<RoundEvent>,
) {
    for effect in state.board_effects() {
        match effect {
            FeatureEffect::QuantumWilds => {
                let cells = apply_quantum_wilds(board, config, rng);
                if !cells.is_empty() {
                    events.push(RoundEvent::QuantumWilds { cells });
                }
            }
            FeatureEffect::ExpandingWilds => {
                let reels = apply_expanding_wilds(board, config);
                if !reels.is_empty() {
                    events.push(RoundEvent::WildExpansion { reels });
                }
            }
        }
    }
}

/// Play one complete round for a bet mode.
///
/// `force` constrains the base board (used by distribution buckets that
/// must land in the feature). The scatter trigger takes precedence when
/// a board satisfies both the scatter and bonus thresholds; the two
/// branches never stack within one round.
pub fn play_round(
    config: &GameConfig,
    bet_mode: &BetMode,
    force: Option<ForceOutcome>,
    rng: &mut RoundRng,
) -> Result<RoundResult> {
    let mut events = Vec::new();
    let mut state = FeatureState::new();

    let mut board = match force {
        Some(force) => sample_forced(config, &bet_mode.reel_mode, force, rng)?,
        None => sample(config, &bet_mode.reel_mode, rng)?,
    };
    let stops = board.stops().to_vec();

    apply_effects(&state, &mut board, config, rng, &mut events);
    let base_eval = evaluate(&board, config);
    let mut total_win = base_eval.total;

    let scatters = board.count_any(&config.specials.scatters) as u8;
    let bonuses = board.count_any(&config.specials.bonuses) as u8;

    events.push(RoundEvent::BaseSpin {
        stops,
        board: board.columns().to_vec(),
        win: base_eval.total,
        clusters: base_eval.clusters,
    });

    if let Some(spins) = config.spins_for_scatters(scatters) {
        events.push(RoundEvent::FreeSpinsTriggered { scatters, spins });
        state.trigger_free_spins(spins)?;
        state.begin_free_spins()?;
        run_free_spins(config, &mut state, rng, &mut events)?;
        total_win += state.complete();
    } else if bonuses >= config.bonus_trigger_count {
        events.push(RoundEvent::BonusTriggered { bonuses });
        state.trigger_bonus()?;
        state.begin_bonus()?;
        let multiplier = vault_payout(config, rng);
        events.push(RoundEvent::VaultPrize { multiplier });
        state.add_win(multiplier);
        total_win += state.complete();
    } else {
        state.complete();
    }

    let mut capped = false;
    if total_win > bet_mode.max_win {
        tracing::debug!(total_win, cap = bet_mode.max_win, "round win capped");
        total_win = bet_mode.max_win;
        capped = true;
    }

    let feature = events_contain_feature(&events);
    let bonus = events_contain_bonus(&events);
    Ok(RoundResult {
        events,
        total_win,
        capped,
        feature,
        bonus,
    })
}

fn run_free_spins(
    config: &GameConfig,
    state: &mut FeatureState,
    rng: &mut RoundRng,
    events: &mut Vec<RoundEvent>,
) -> Result<()> {
    let threshold = config.scatter_trigger_count();
    let mut index = 0;
    while state.spins_remaining() > 0 {
        state.consume_spin()?;
        let mut board = sample(config, FREESPIN_REEL_MODE, rng)?;
        let stops = board.stops().to_vec();
        apply_effects(state, &mut board, config, rng, events);
        let eval = evaluate(&board, config);
        state.add_win(eval.total);

        let scatters = board.count_any(&config.specials.scatters) as u8;
        events.push(RoundEvent::FreeSpin {
            index,
            stops,
            board: board.columns().to_vec(),
            win: eval.total,
            clusters: eval.clusters,
        });
        index += 1;

        if scatters >= threshold {
            state
                .retrigger(config.retrigger_award, config.max_retriggers)
                .map_err(|err| match err {
                    // Attach the trace accumulated so far for reproduction.
                    EngineError::RetriggerLimitExceeded { limit, .. } => {
                        EngineError::RetriggerLimitExceeded {
                            limit,
                            trace: events.clone(),
                        }
                    }
                    other => other,
                })?;
            events.push(RoundEvent::Retrigger {
                scatters,
                extra_spins: config.retrigger_award,
            });
        }
    }
    events.push(RoundEvent::FreeSpinsComplete {
        total: state.accumulated_win(),
    });
    Ok(())
}

fn events_contain_feature(events: &[RoundEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, RoundEvent::FreeSpinsTriggered { .. }))
}

fn events_contain_bonus(events: &[RoundEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, RoundEvent::BonusTriggered { .. }))
}
