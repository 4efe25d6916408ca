//! Game phase state machine.
//!
//! ## Phases
//!
//! | From       | Trigger                         | To         |
//! |------------|---------------------------------|------------|
//! | `Ready`    | drop accepted (cooldown elapsed) | `Dropping` |
//! | `Dropping` | drop cooldown elapsed           | `Ready`    |
//! | any        | settled fruit above danger line  | `GameOver` |
//! | `GameOver` | player taps / clicks            | `Ready` (fresh game) |
//!
//! [`GameState`] is a plain value.  Every transition consumes the old value
//! and returns a new one, and systems overwrite the resource wholesale, so no
//! consumer ever observes a half-applied transition.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fruit::FruitLevel;
use crate::merge::FruitMerged;

/// Gameplay phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for the player to drop the current fruit.
    #[default]
    Ready,
    /// A fruit was just dropped; the next one is not available yet.
    Dropping,
    /// A settled fruit breached the danger line.  Only a reset leaves this phase.
    GameOver,
}

/// Snapshot of the round: phase, running score and the drop queue.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub phase: Phase,
    pub score: u32,
    /// Level of the fruit the next accepted drop spawns.
    pub current_level: FruitLevel,
    /// Level shown in the "next" preview.
    pub next_level: FruitLevel,
}

impl GameState {
    /// A fresh round: `Ready`, zero score, two random drop levels.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, max_drop: FruitLevel) -> Self {
        Self {
            phase: Phase::Ready,
            score: 0,
            current_level: FruitLevel::random_drop(rng, max_drop),
            next_level: FruitLevel::random_drop(rng, max_drop),
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// `Ready → Dropping`.  Levels stay put until the cooldown elapses.
    pub fn with_dropping(self) -> Self {
        Self {
            phase: Phase::Dropping,
            ..self
        }
    }

    /// `Dropping → Ready`: promote the preview and draw a new one.
    ///
    /// A round that ended while the drop was in flight stays `GameOver`.
    pub fn advance_to_next_fruit<R: Rng + ?Sized>(self, rng: &mut R, max_drop: FruitLevel) -> Self {
        if self.is_game_over() {
            return self;
        }
        Self {
            phase: Phase::Ready,
            current_level: self.next_level,
            next_level: FruitLevel::random_drop(rng, max_drop),
            ..self
        }
    }

    /// Add merge points.  The final score is frozen once the round is over.
    pub fn with_score_added(self, points: u32) -> Self {
        if self.is_game_over() {
            return self;
        }
        Self {
            score: self.score.saturating_add(points),
            ..self
        }
    }

    /// Any phase → `GameOver`.  Idempotent.
    pub fn with_game_over(self) -> Self {
        Self {
            phase: Phase::GameOver,
            ..self
        }
    }
}

/// Random source for drop levels.
///
/// Seeded from [`crate::config::GameConfig::rng_seed`] when set so tests and
/// tuning sessions can reproduce a drop sequence.
#[derive(Resource, Debug, Clone)]
pub struct DropRng(pub StdRng);

impl DropRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Add the points of every merge reported this frame to the running score.
pub fn apply_merge_score_system(
    mut merges: MessageReader<FruitMerged>,
    mut state: ResMut<GameState>,
) {
    let points: u32 = merges.read().map(|merged| merged.points).sum();
    if points > 0 {
        *state = state.with_score_added(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_drop() -> FruitLevel {
        FruitLevel::new(4).unwrap()
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn new_round_is_ready_with_zero_score() {
        let state = GameState::new(&mut seeded(), max_drop());
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.score, 0);
        assert!(state.current_level <= max_drop());
        assert!(state.next_level <= max_drop());
    }

    #[test]
    fn drop_then_cooldown_promotes_next_level() {
        let mut rng = seeded();
        let start = GameState::new(&mut rng, max_drop());

        let dropping = start.with_dropping();
        assert_eq!(dropping.phase, Phase::Dropping);
        assert_eq!(dropping.current_level, start.current_level);
        assert_eq!(dropping.next_level, start.next_level);

        let ready = dropping.advance_to_next_fruit(&mut rng, max_drop());
        assert_eq!(ready.phase, Phase::Ready);
        assert_eq!(ready.current_level, start.next_level);
        assert!(ready.next_level <= max_drop());
    }

    #[test]
    fn game_over_is_idempotent() {
        let state = GameState::new(&mut seeded(), max_drop()).with_score_added(12);
        let over = state.with_game_over();
        assert_eq!(over.phase, Phase::GameOver);
        assert_eq!(over.with_game_over(), over);
    }

    #[test]
    fn game_over_reachable_from_dropping() {
        let over = GameState::new(&mut seeded(), max_drop())
            .with_dropping()
            .with_game_over();
        assert!(over.is_game_over());
    }

    #[test]
    fn pending_advance_does_not_revive_finished_round() {
        let mut rng = seeded();
        let over = GameState::new(&mut rng, max_drop())
            .with_dropping()
            .with_game_over();
        assert_eq!(over.advance_to_next_fruit(&mut rng, max_drop()), over);
    }

    #[test]
    fn score_accumulates_without_changing_phase() {
        let state = GameState::new(&mut seeded(), max_drop()).with_dropping();
        let scored = state.with_score_added(6).with_score_added(10);
        assert_eq!(scored.score, 16);
        assert_eq!(scored.phase, Phase::Dropping);
    }

    #[test]
    fn score_is_frozen_after_game_over() {
        let over = GameState::new(&mut seeded(), max_drop())
            .with_score_added(5)
            .with_game_over();
        assert_eq!(over.with_score_added(100).score, 5);
    }

    #[test]
    fn seeded_rng_reproduces_drop_queue() {
        let a = GameState::new(&mut DropRng::from_seed(Some(3)).0, max_drop());
        let b = GameState::new(&mut DropRng::from_seed(Some(3)).0, max_drop());
        assert_eq!(a, b);
    }
}
