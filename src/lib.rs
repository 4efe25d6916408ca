//! Suika: a falling-fruit merge puzzle.
//!
//! The player drops fruit into a walled container.  Two fruit of the same tier
//! that touch merge into one fruit of the next tier, and the round ends when a
//! resting fruit pokes above the danger line.
//!
//! Gameplay lives in [`SuikaPlugin`]; drawing lives in
//! [`rendering::RenderingPlugin`].  Both expect Rapier
//! (`RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0)`) to be added by
//! the binary.

pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod fruit;
pub mod game_over;
pub mod graphics;
pub mod high_score;
pub mod input;
pub mod merge;
pub mod physics;
pub mod rendering;
pub mod session;
pub mod state;

use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;

use config::GameConfig;
use effects::MergeEffects;
use high_score::HighScore;
use input::DropRequested;
use merge::FruitMerged;
use session::Session;

/// Gameplay: config, container, drop controller, merging, scoring and
/// game-over detection.
pub struct SuikaPlugin;

impl Plugin for SuikaPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DropRequested>()
            .add_message::<FruitMerged>()
            // Compiled defaults; load_game_config overwrites them from
            // assets/suika.toml before any other startup system runs.
            .insert_resource(GameConfig::default())
            .init_resource::<MergeEffects>()
            .add_systems(
                Startup,
                (
                    config::load_game_config,
                    (
                        session::begin_session,
                        physics::spawn_container,
                        physics::configure_gravity,
                        high_score::load_high_score_system,
                        graphics::setup_camera,
                    ),
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    graphics::fit_camera_system,
                    effects::merge_effect_decay_system,
                    (
                        input::keyboard_aim_system,
                        input::pointer_input_system,
                        session::drop_cooldown_system,
                        game_over::game_over_poll_system,
                        session::drop_request_system,
                    )
                        .chain()
                        .run_if(resource_exists::<Session>),
                ),
            )
            // Collision events are written by the Rapier step, so merging runs
            // once they are available in the same frame.
            .add_systems(
                PostUpdate,
                (
                    merge::fruit_merge_system,
                    (
                        state::apply_merge_score_system,
                        effects::queue_merge_effects_system,
                    ),
                    high_score::track_high_score_system.run_if(resource_exists::<HighScore>),
                )
                    .chain()
                    .after(PhysicsSet::Writeback)
                    .run_if(resource_exists::<Session>),
            )
            .add_systems(Last, session::end_session_system);
    }
}
