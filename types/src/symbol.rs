//! Symbol alphabet and capability tags.

use serde::{Deserialize, Serialize};

/// Symbols of the Cosmic Heist alphabet.
///
/// Five high pays, five low pays, and three specials. Capability tags
/// (wild/scatter/bonus) are not encoded here: they are looked up from
/// the [`SpecialSymbols`] map supplied by the game configuration.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Symbol {
    SpaceOutlaw = 0,
    Spaceship = 1,
    LaserGun = 2,
    TreasureChest = 3,
    HoloMap = 4,
    Ace = 5,
    King = 6,
    Queen = 7,
    Jack = 8,
    Ten = 9,
    CosmicWild = 10,
    GalacticVault = 11,
    HeistTarget = 12,
}

impl Symbol {
    /// Number of symbols in the alphabet.
    pub const COUNT: usize = 13;

    /// All symbols, in declaration order.
    pub const ALL: [Symbol; Symbol::COUNT] = [
        Symbol::SpaceOutlaw,
        Symbol::Spaceship,
        Symbol::LaserGun,
        Symbol::TreasureChest,
        Symbol::HoloMap,
        Symbol::Ace,
        Symbol::King,
        Symbol::Queen,
        Symbol::Jack,
        Symbol::Ten,
        Symbol::CosmicWild,
        Symbol::GalacticVault,
        Symbol::HeistTarget,
    ];
}

impl TryFrom<u8> for Symbol {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Symbol::SpaceOutlaw),
            1 => Ok(Symbol::Spaceship),
            2 => Ok(Symbol::LaserGun),
            3 => Ok(Symbol::TreasureChest),
            4 => Ok(Symbol::HoloMap),
            5 => Ok(Symbol::Ace),
            6 => Ok(Symbol::King),
            7 => Ok(Symbol::Queen),
            8 => Ok(Symbol::Jack),
            9 => Ok(Symbol::Ten),
            10 => Ok(Symbol::CosmicWild),
            11 => Ok(Symbol::GalacticVault),
            12 => Ok(Symbol::HeistTarget),
            i => Err(i),
        }
    }
}

/// Capability map: which symbols carry the wild, scatter and bonus tags.
///
/// Tags are static configuration; a symbol may carry more than one tag,
/// though the Cosmic Heist definition assigns exactly one special symbol
/// per capability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialSymbols {
    pub wilds: Vec<Symbol>,
    pub scatters: Vec<Symbol>,
    pub bonuses: Vec<Symbol>,
}

impl SpecialSymbols {
    pub fn is_wild(&self, symbol: Symbol) -> bool {
        self.wilds.contains(&symbol)
    }

    pub fn is_scatter(&self, symbol: Symbol) -> bool {
        self.scatters.contains(&symbol)
    }

    pub fn is_bonus(&self, symbol: Symbol) -> bool {
        self.bonuses.contains(&symbol)
    }

    /// True if the symbol carries any capability tag. Special symbols
    /// are never replaced by feature effects such as quantum wilds.
    pub fn is_special(&self, symbol: Symbol) -> bool {
        self.is_wild(symbol) || self.is_scatter(symbol) || self.is_bonus(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for symbol in Symbol::ALL {
            let byte = symbol as u8;
            assert_eq!(Symbol::try_from(byte), Ok(symbol));
        }
        assert_eq!(Symbol::try_from(13), Err(13));
    }

    #[test]
    fn test_capability_tags() {
        let specials = SpecialSymbols {
            wilds: vec![Symbol::CosmicWild],
            scatters: vec![Symbol::GalacticVault],
            bonuses: vec![Symbol::HeistTarget],
        };

        assert!(specials.is_wild(Symbol::CosmicWild));
        assert!(!specials.is_wild(Symbol::GalacticVault));
        assert!(specials.is_scatter(Symbol::GalacticVault));
        assert!(specials.is_bonus(Symbol::HeistTarget));
        assert!(specials.is_special(Symbol::HeistTarget));
        assert!(!specials.is_special(Symbol::Ace));
    }
}
