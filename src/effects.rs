//! Merge ring effects: an expanding, fading circle drawn where two fruit merged.
//!
//! Purely cosmetic.  Rings are queued from [`crate::merge::FruitMerged`]
//! messages, grown and faded by [`merge_effect_decay_system`], and dropped once
//! spent.  [`crate::rendering`] draws whatever is left in [`MergeEffects`].

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::fruit::FruitLevel;
use crate::merge::FruitMerged;

/// One expanding ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeEffect {
    pub position: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub color: Color,
    pub alpha: f32,
}

impl MergeEffect {
    /// Ring for a merge that produced a fruit of `level` at `position`.
    pub fn for_merge(position: Vec2, level: FruitLevel, config: &GameConfig) -> Self {
        let tier = level.tier();
        Self {
            position,
            radius: config.merge_effect_start_radius,
            max_radius: tier.radius * config.merge_effect_radius_factor,
            color: tier.color(),
            alpha: config.merge_effect_start_alpha,
        }
    }

    /// Advance the animation by `dt` seconds.
    pub fn decayed(self, dt: f32, config: &GameConfig) -> Self {
        Self {
            radius: self.radius + config.merge_effect_growth_per_sec * dt,
            alpha: self.alpha - config.merge_effect_fade_per_sec * dt,
            ..self
        }
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.alpha <= 0.0 || self.radius >= self.max_radius
    }
}

/// Active merge rings, oldest first.
#[derive(Resource, Debug, Default, Clone)]
pub struct MergeEffects(pub Vec<MergeEffect>);

/// Queue a ring for every merge reported this frame.
pub fn queue_merge_effects_system(
    mut merges: MessageReader<FruitMerged>,
    mut effects: ResMut<MergeEffects>,
) {
    for merged in merges.read() {
        effects.0.push(merged.effect);
    }
}

/// Grow and fade every ring; drop the spent ones.
pub fn merge_effect_decay_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut effects: ResMut<MergeEffects>,
) {
    if effects.0.is_empty() {
        return;
    }
    let dt = time.delta_secs();
    effects.0 = effects
        .0
        .iter()
        .map(|effect| effect.decayed(dt, &config))
        .filter(|effect| !effect.is_spent())
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_starts_small_and_scales_with_tier() {
        let config = GameConfig::default();
        let level = FruitLevel::new(3).unwrap();
        let ring = MergeEffect::for_merge(Vec2::new(10.0, 20.0), level, &config);
        assert_eq!(ring.radius, 5.0);
        assert_eq!(ring.max_radius, level.radius() * 1.5);
        assert_eq!(ring.alpha, 0.8);
        assert!(!ring.is_spent());
    }

    #[test]
    fn ring_grows_and_fades() {
        let config = GameConfig::default();
        let ring = MergeEffect::for_merge(Vec2::ZERO, FruitLevel::new(8).unwrap(), &config);
        let later = ring.decayed(1.0 / 60.0, &config);
        assert!(later.radius > ring.radius);
        assert!(later.alpha < ring.alpha);
    }

    #[test]
    fn small_tier_ring_is_spent_by_radius() {
        let config = GameConfig::default();
        // Cherry ring: max radius 25.5, reached well before alpha runs out.
        let mut ring = MergeEffect::for_merge(Vec2::ZERO, FruitLevel::new(0).unwrap(), &config);
        let mut frames = 0;
        while !ring.is_spent() {
            ring = ring.decayed(1.0 / 60.0, &config);
            frames += 1;
        }
        assert!(ring.radius >= ring.max_radius);
        assert!(ring.alpha > 0.0);
        assert!(frames < 20, "took {frames} frames");
    }

    #[test]
    fn large_tier_ring_is_spent_by_alpha() {
        let config = GameConfig::default();
        let mut ring = MergeEffect::for_merge(Vec2::ZERO, FruitLevel::TERMINAL, &config);
        while !ring.is_spent() {
            ring = ring.decayed(1.0 / 60.0, &config);
        }
        assert!(ring.alpha <= 0.0);
        assert!(ring.radius < ring.max_radius);
    }
}
