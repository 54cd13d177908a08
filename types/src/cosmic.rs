//! The stock Cosmic Heist game definition.
//!
//! A 5×4 high-volatility ways game: ten paying symbols, one wild, one
//! scatter (Galactic Vault → Black Hole free spins) and one bonus symbol
//! (Heist Target → Grand Heist vault pick). The strip contents and quota
//! fractions here are tuning placeholders: the mechanism around them is
//! exact, the numbers are refined through simulation.

use crate::{
    BetMode, Distribution, ForceOutcome, GameConfig, Paytable, ReelSet, ReelStrip,
    SpecialSymbols, Symbol, VaultPrize,
};
use std::collections::BTreeMap;

use Symbol::*;

/// Base-game strip template. Duplicated low pays weight the bottom of
/// the paytable; one wild, scatter and bonus per strip cycle.
const BASE_STRIP: [Symbol; 23] = [
    SpaceOutlaw, Spaceship, LaserGun, TreasureChest, HoloMap, Ace, King, Queen, Jack, Ten,
    CosmicWild, GalacticVault, HeistTarget, Ace, King, Queen, Jack, Ten, Ace, King, Queen, Jack,
    Ten,
];

/// Free-game strip template: the base mix plus extra wilds. Scatter
/// density stays at one per strip; any denser and retriggers snowball
/// past the retrigger limit.
const FREE_STRIP: [Symbol; 25] = [
    SpaceOutlaw, Spaceship, LaserGun, TreasureChest, HoloMap, Ace, King, Queen, Jack, Ten,
    CosmicWild, GalacticVault, HeistTarget, CosmicWild, CosmicWild, Ace, King, Queen, Jack, Ten,
    Ace, King, Queen, Jack, Ten,
];

/// Build one mode's reel set from a strip template, rotating each reel
/// by a different offset so the five reels are not phase-locked.
fn reel_set(template: &[Symbol], num_reels: usize) -> ReelSet {
    let strips = (0..num_reels)
        .map(|reel| {
            let mut strip = template.to_vec();
            strip.rotate_left((reel * 7) % template.len());
            ReelStrip::new(strip)
        })
        .collect();
    ReelSet::new(strips)
}

impl GameConfig {
    /// The stock Cosmic Heist configuration.
    pub fn cosmic_heist() -> Self {
        let paytable = Paytable::from_entries(&[
            // High pays
            (5, SpaceOutlaw, 50.0),
            (4, SpaceOutlaw, 20.0),
            (3, SpaceOutlaw, 5.0),
            (5, Spaceship, 25.0),
            (4, Spaceship, 10.0),
            (3, Spaceship, 3.0),
            (5, LaserGun, 15.0),
            (4, LaserGun, 5.0),
            (3, LaserGun, 2.0),
            (5, TreasureChest, 12.0),
            (4, TreasureChest, 4.0),
            (3, TreasureChest, 1.5),
            (5, HoloMap, 10.0),
            (4, HoloMap, 3.0),
            (3, HoloMap, 1.0),
            // Low pays
            (5, Ace, 5.0),
            (4, Ace, 2.5),
            (3, Ace, 0.5),
            (5, King, 4.0),
            (4, King, 2.0),
            (3, King, 0.4),
            (5, Queen, 3.0),
            (4, Queen, 1.5),
            (3, Queen, 0.3),
            (5, Jack, 2.5),
            (4, Jack, 1.0),
            (3, Jack, 0.2),
            (5, Ten, 2.0),
            (4, Ten, 0.8),
            (3, Ten, 0.2),
        ]);

        let num_reels = 5;
        let num_rows = vec![4; num_reels];
        let rtp = 0.965;
        let wincap = 10_000.0;

        let mut reels = BTreeMap::new();
        reels.insert("base".to_string(), reel_set(&BASE_STRIP, num_reels));
        reels.insert("free".to_string(), reel_set(&FREE_STRIP, num_reels));

        let mut scatter_triggers = BTreeMap::new();
        scatter_triggers.insert(3, 8);
        scatter_triggers.insert(4, 12);
        scatter_triggers.insert(5, 16);

        GameConfig {
            game_id: "cosmic_heist".to_string(),
            rtp,
            wincap,
            num_reels,
            num_rows,
            paytable,
            specials: SpecialSymbols {
                wilds: vec![CosmicWild],
                scatters: vec![GalacticVault],
                bonuses: vec![HeistTarget],
            },
            scatter_triggers,
            retrigger_award: 4,
            max_retriggers: 12,
            bonus_trigger_count: 3,
            quantum_wild_chance: 0.04,
            quantum_wild_range: (2, 5),
            reels,
            vault_prizes: vec![
                VaultPrize { multiplier: 10.0, weight: 400 },
                VaultPrize { multiplier: 25.0, weight: 280 },
                VaultPrize { multiplier: 50.0, weight: 160 },
                VaultPrize { multiplier: 100.0, weight: 100 },
                VaultPrize { multiplier: 500.0, weight: 45 },
                VaultPrize { multiplier: 2_500.0, weight: 12 },
                VaultPrize { multiplier: 10_000.0, weight: 3 },
            ],
            bet_modes: vec![
                BetMode::new(
                    "base",
                    1.0,
                    rtp * 0.8,
                    wincap,
                    "base",
                    vec![
                        Distribution::new("feature", 0.1).with_force(ForceOutcome::FreeGame),
                        Distribution::new("0", 0.5).with_win_criteria(0.0),
                        Distribution::new("basegame", 0.4),
                    ],
                ),
                // Feature buy: pays 100× for a near-guaranteed trigger.
                // The small unforced zero bucket is the fitting lever;
                // a mode of nothing but forced rounds would leave the
                // RTP fit with no weights it may move.
                BetMode::new(
                    "free",
                    100.0,
                    rtp * 0.2,
                    wincap,
                    "base",
                    vec![
                        Distribution::new("freegame", 0.9).with_force(ForceOutcome::FreeGame),
                        Distribution::new("0", 0.1).with_win_criteria(0.0),
                    ],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_cover_board() {
        let config = GameConfig::cosmic_heist();
        for (mode, set) in &config.reels {
            for reel in 0..config.num_reels {
                let strip = set.strip(reel).unwrap();
                assert!(
                    strip.len() >= config.num_rows[reel],
                    "{mode} reel {reel} too short"
                );
            }
        }
    }

    #[test]
    fn test_reels_are_rotated_copies() {
        let config = GameConfig::cosmic_heist();
        let base = config.reel_set("base").unwrap();
        let first = base.strip(0).unwrap();
        let second = base.strip(1).unwrap();
        assert_ne!(first.symbols(), second.symbols());
        // Same composition, different phase.
        let mut a = first.symbols().to_vec();
        let mut b = second.symbols().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_free_strip_richer_in_wilds() {
        let config = GameConfig::cosmic_heist();
        let count = |set: &ReelSet, symbol: Symbol| -> usize {
            (0..config.num_reels)
                .map(|r| {
                    set.strip(r)
                        .unwrap()
                        .symbols()
                        .iter()
                        .filter(|&&s| s == symbol)
                        .count()
                })
                .sum()
        };
        let base = config.reel_set("base").unwrap();
        let free = config.reel_set("free").unwrap();
        assert!(count(free, CosmicWild) > count(base, CosmicWild));
        // One scatter per strip in both modes: free-game scatter density
        // must not snowball retriggers.
        assert_eq!(count(free, GalacticVault), count(base, GalacticVault));
    }
}
