//! Fruit catalog, level newtype, and the `Fruit` component carried by every
//! live fruit body.
//!
//! ## Tiers
//!
//! | Level | Fruit      | Radius | Score |
//! |-------|------------|--------|-------|
//! | 0     | cherry     | 17     | 1     |
//! | 1     | strawberry | 25     | 3     |
//! | 2     | grape      | 33     | 6     |
//! | 3     | dekopon    | 40     | 10    |
//! | 4     | persimmon  | 50     | 15    |
//! | 5     | apple      | 58     | 21    |
//! | 6     | pear       | 68     | 28    |
//! | 7     | peach      | 78     | 36    |
//! | 8     | pineapple  | 90     | 45    |
//! | 9     | melon      | 104    | 55    |
//! | 10    | watermelon | 120    | 66    |
//!
//! The score column is what a merge *into* that tier awards.

use bevy::prelude::*;
use rand::Rng;

/// Immutable description of one fruit tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitTier {
    pub level: u8,
    pub name: &'static str,
    pub radius: f32,
    /// Points awarded when two fruit of the previous tier merge into this one.
    pub score_value: u32,
    /// Base fill colour (sRGB bytes).
    pub rgb: [u8; 3],
}

impl FruitTier {
    #[inline]
    pub fn color(&self) -> Color {
        Color::srgb_u8(self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

const fn tier(level: u8, name: &'static str, radius: f32, score_value: u32, rgb: [u8; 3]) -> FruitTier {
    FruitTier {
        level,
        name,
        radius,
        score_value,
        rgb,
    }
}

/// Every tier, indexed by level.
pub const FRUITS: [FruitTier; 11] = [
    tier(0, "cherry", 17.0, 1, [0xE8, 0x40, 0x57]),
    tier(1, "strawberry", 25.0, 3, [0xFF, 0x6B, 0x6B]),
    tier(2, "grape", 33.0, 6, [0x9B, 0x59, 0xB6]),
    tier(3, "dekopon", 40.0, 10, [0xF3, 0x9C, 0x12]),
    tier(4, "persimmon", 50.0, 15, [0xE6, 0x7E, 0x22]),
    tier(5, "apple", 58.0, 21, [0xE7, 0x4C, 0x3C]),
    tier(6, "pear", 68.0, 28, [0xA8, 0xD6, 0x48]),
    tier(7, "peach", 78.0, 36, [0xFF, 0xB6, 0xC1]),
    tier(8, "pineapple", 90.0, 45, [0xF1, 0xC4, 0x0F]),
    tier(9, "melon", 104.0, 55, [0x2E, 0xCC, 0x71]),
    tier(10, "watermelon", 120.0, 66, [0x27, 0xAE, 0x60]),
];

/// A validated fruit level in `0..=FruitLevel::TERMINAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FruitLevel(u8);

impl FruitLevel {
    /// The largest tier; fruit at this level never merge.
    pub const TERMINAL: FruitLevel = FruitLevel(FRUITS.len() as u8 - 1);

    /// Returns `None` for levels outside the catalog.
    #[inline]
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::TERMINAL.0).then_some(Self(level))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn tier(self) -> &'static FruitTier {
        &FRUITS[self.0 as usize]
    }

    #[inline]
    pub fn radius(self) -> f32 {
        self.tier().radius
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// The level a merge of two fruit at `self` produces.
    #[inline]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Uniformly pick a drop level in `0..=max_drop`, clamped to the catalog.
    pub fn random_drop<R: Rng + ?Sized>(rng: &mut R, max_drop: FruitLevel) -> Self {
        Self(rng.gen_range(0..=max_drop.0))
    }
}

/// Live fruit body marker.
///
/// Position and velocity belong to the physics engine (`Transform`,
/// `Velocity`); the game only owns the level and the transient merge flag.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    pub level: FruitLevel,
    /// Set when this body has been claimed by a merge.  A claimed body is
    /// ignored by every further collision batch and game-over poll until the
    /// despawn lands.
    pub merging: bool,
}

impl Fruit {
    pub fn new(level: FruitLevel) -> Self {
        Self {
            level,
            merging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn catalog_is_indexed_by_level() {
        for (i, tier) in FRUITS.iter().enumerate() {
            assert_eq!(tier.level as usize, i);
        }
    }

    #[test]
    fn radius_and_score_grow_with_level() {
        for pair in FRUITS.windows(2) {
            assert!(pair[1].radius > pair[0].radius, "{} vs {}", pair[1].name, pair[0].name);
            assert!(pair[1].score_value > pair[0].score_value);
        }
    }

    #[test]
    fn next_is_none_only_at_terminal() {
        for level in 0..FruitLevel::TERMINAL.get() {
            let l = FruitLevel::new(level).unwrap();
            assert_eq!(l.next().unwrap().get(), level + 1);
            assert!(!l.is_terminal());
        }
        assert!(FruitLevel::TERMINAL.is_terminal());
        assert_eq!(FruitLevel::TERMINAL.next(), None);
        assert_eq!(FruitLevel::new(11), None);
    }

    #[test]
    fn random_drop_stays_in_range_and_covers_it() {
        let mut rng = StdRng::seed_from_u64(7);
        let max = FruitLevel::new(4).unwrap();
        let mut seen = [false; 5];
        for _ in 0..500 {
            let level = FruitLevel::random_drop(&mut rng, max);
            assert!(level <= max);
            seen[level.get() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every drop level should appear: {seen:?}");
    }
}
