//! Round session: drop cooldown, game-over watch, and the drop / reset controller.
//!
//! ## Timers
//!
//! | Timer            | Starts                  | Effect when it runs out                 |
//! |------------------|-------------------------|-----------------------------------------|
//! | `DropClock`      | accepted drop           | next drop allowed; `Dropping → Ready`    |
//! | `GameOverWatch`  | session start           | grace delay, then one poll per interval |
//!
//! Both live in the [`Session`] resource, and every system that depends on them
//! (merge processing included) is gated on `resource_exists::<Session>`.
//! Removing the resource cancels all of them at once; replacing it (reset)
//! restarts them from zero, so a cooldown pending from the previous round can
//! never advance the new round's drop queue.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::effects::MergeEffects;
use crate::fruit::Fruit;
use crate::input::{DropCursor, DropRequested};
use crate::physics::{despawn_all_fruit, spawn_fruit};
use crate::state::{DropRng, GameState, Phase};

/// Cooldown gating drops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropClock {
    cooldown_secs: f32,
    remaining: f32,
}

impl DropClock {
    pub fn new(cooldown_secs: f32) -> Self {
        Self {
            cooldown_secs,
            remaining: 0.0,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Start a cooldown if none is running.  Returns `false` if still cooling.
    pub fn try_start(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = self.cooldown_secs;
        true
    }

    /// Advance by `dt`; `true` on the tick the cooldown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_ready() {
            return false;
        }
        self.remaining -= dt;
        self.is_ready()
    }
}

/// Grace delay followed by a fixed poll interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverWatch {
    grace_remaining: f32,
    poll_secs: f32,
    since_poll: f32,
}

impl GameOverWatch {
    pub fn new(grace_secs: f32, poll_secs: f32) -> Self {
        Self {
            grace_remaining: grace_secs.max(0.0),
            poll_secs,
            since_poll: 0.0,
        }
    }

    /// Advance by `dt`; `true` when a poll is due.
    pub fn tick(&mut self, mut dt: f32) -> bool {
        if self.grace_remaining > 0.0 {
            self.grace_remaining -= dt;
            if self.grace_remaining > 0.0 {
                return false;
            }
            // Only the part of the frame past the grace boundary counts.
            dt = -self.grace_remaining;
            self.grace_remaining = 0.0;
        }
        self.since_poll += dt;
        if self.since_poll >= self.poll_secs {
            self.since_poll = 0.0;
            return true;
        }
        false
    }
}

/// Per-round timers.  See the module docs for the cancellation contract.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Session {
    pub drop_clock: DropClock,
    pub watch: GameOverWatch,
    /// The fruit dropped by the running cooldown.  It spawns above the danger
    /// line at rest, so the game-over poll ignores it until the cooldown ends.
    pub in_flight: Option<Entity>,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            drop_clock: DropClock::new(config.drop_cooldown_secs),
            watch: GameOverWatch::new(config.game_over_grace_secs, config.game_over_poll_secs),
            in_flight: None,
        }
    }
}

/// Startup system: seed the RNG and open the first round.
pub fn begin_session(mut commands: Commands, config: Res<GameConfig>) {
    let mut rng = DropRng::from_seed(config.rng_seed);
    let state = GameState::new(&mut rng.0, config.max_drop());
    commands.insert_resource(state);
    commands.insert_resource(rng);
    commands.insert_resource(Session::new(&config));
    commands.insert_resource(DropCursor::centered(&config));
    info!(
        "Session started: current {}, next {}",
        state.current_level.tier().name,
        state.next_level.tier().name
    );
}

/// Handle commit-drop actions.
///
/// - `Ready` and cooldown elapsed → spawn the current fruit at `(x, drop_y)`
///   and enter `Dropping`.
/// - `Dropping`, or still cooling down → ignored.
/// - `GameOver` → the tap restarts: every fruit is removed, the score is
///   cleared, a fresh drop queue is drawn and the session timers restart.
///   Further requests of the same frame are discarded with it.
///
/// Runs after [`drop_cooldown_system`] so a cooldown started here is first
/// ticked on the next frame.
#[allow(clippy::too_many_arguments)]
pub fn drop_request_system(
    mut commands: Commands,
    mut requests: MessageReader<DropRequested>,
    config: Res<GameConfig>,
    mut state: ResMut<GameState>,
    mut session: ResMut<Session>,
    mut rng: ResMut<DropRng>,
    mut effects: ResMut<MergeEffects>,
    fruits: Query<Entity, With<Fruit>>,
) {
    let requests: Vec<DropRequested> = requests.read().copied().collect();
    for request in requests {
        match state.phase {
            Phase::GameOver => {
                let removed = despawn_all_fruit(&mut commands, &fruits);
                *state = GameState::new(&mut rng.0, config.max_drop());
                *session = Session::new(&config);
                effects.0.clear();
                info!("New round ({removed} fruit cleared)");
                break;
            }
            Phase::Dropping => {
                debug!("Drop at x={:.1} ignored: previous drop in flight", request.x);
                continue;
            }
            Phase::Ready => {}
        }

        if !session.drop_clock.try_start() {
            debug!("Drop at x={:.1} ignored: cooling down", request.x);
            continue;
        }

        let dropped = spawn_fruit(
            &mut commands,
            Vec2::new(request.x, config.drop_y),
            state.current_level,
            &config,
        );
        session.in_flight = Some(dropped);
        *state = state.with_dropping();
    }
}

/// Tick the drop cooldown and return to `Ready` with the next fruit when it ends.
pub fn drop_cooldown_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut state: ResMut<GameState>,
    mut rng: ResMut<DropRng>,
) {
    if !session.drop_clock.tick(time.delta_secs()) {
        return;
    }
    session.in_flight = None;
    if state.phase == Phase::Dropping {
        *state = state.advance_to_next_fruit(&mut rng.0, config.max_drop());
    }
}

/// Tear the round down on app exit: drop the timers and release every body.
pub fn end_session_system(
    mut commands: Commands,
    mut exits: MessageReader<AppExit>,
    fruits: Query<Entity, With<Fruit>>,
) {
    if exits.read().next().is_none() {
        return;
    }
    commands.remove_resource::<Session>();
    despawn_all_fruit(&mut commands, &fruits);
    info!("Session ended");
}
