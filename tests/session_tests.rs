//! Headless tests for the drop / reset controller, game-over polling and
//! high-score tracking.
//!
//! Like the merge tests these run on [`MinimalPlugins`] only.  Drop requests
//! are written as messages; time is driven with a fixed
//! [`TimeUpdateStrategy::ManualDuration`] where a test depends on it.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::rngs::StdRng;
use rand::SeedableRng;

use suika::config::GameConfig;
use suika::effects::{MergeEffect, MergeEffects};
use suika::fruit::{Fruit, FruitLevel};
use suika::game_over::game_over_poll_system;
use suika::high_score::{read_high_score, track_high_score_system, HighScore};
use suika::input::DropRequested;
use suika::physics::fruit_body;
use suika::session::{
    begin_session, drop_cooldown_system, drop_request_system, end_session_system, Session,
};
use suika::state::{GameState, Phase};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Drop controller app, wired in the same order as `SuikaPlugin`.  The
/// cooldown is long enough that it never elapses between two `update` calls in
/// real time.
fn drop_app() -> App {
    let config = GameConfig {
        drop_cooldown_secs: 10.0,
        rng_seed: Some(11),
        ..Default::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_message::<DropRequested>()
        .insert_resource(config)
        .init_resource::<MergeEffects>()
        .add_systems(Startup, begin_session)
        .add_systems(
            Update,
            (drop_cooldown_system, drop_request_system)
                .chain()
                .run_if(resource_exists::<Session>),
        );
    app.update(); // run Startup so the session exists
    app
}

/// Drop controller plus game-over poll in `SuikaPlugin` order, on fixed
/// 250 ms frames with a 500 ms cooldown.  With `grace_secs = 0` the poll is
/// due on every frame.
fn timed_drop_app(grace_secs: f32) -> App {
    let config = GameConfig {
        drop_cooldown_secs: 0.5,
        game_over_grace_secs: grace_secs,
        game_over_poll_secs: 0.25,
        rng_seed: Some(21),
        ..Default::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_message::<DropRequested>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
        .insert_resource(config)
        .init_resource::<MergeEffects>()
        .add_systems(Startup, begin_session)
        .add_systems(
            Update,
            (drop_cooldown_system, game_over_poll_system, drop_request_system)
                .chain()
                .run_if(resource_exists::<Session>),
        );
    app.update();
    app
}

fn request_drop(app: &mut App, x: f32) {
    app.world_mut()
        .resource_mut::<Messages<DropRequested>>()
        .write(DropRequested { x });
}

fn fruit_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query::<&Fruit>();
    query.iter(app.world()).count()
}

fn state(app: &App) -> GameState {
    *app.world().resource::<GameState>()
}

/// Frames that cover several poll intervals.  Virtual time clamps each frame
/// to 250 ms, so this is at least two seconds of game time.
const POLL_FRAMES: usize = 10;

/// Game-over poll app: grace 0, poll every second.
fn watch_app() -> App {
    let config = GameConfig {
        game_over_grace_secs: 0.0,
        game_over_poll_secs: 1.0,
        ..Default::default()
    };
    let state = GameState::new(&mut StdRng::seed_from_u64(3), config.max_drop());
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(500)))
        .insert_resource(Session::new(&config))
        .insert_resource(state)
        .insert_resource(config)
        .add_systems(Update, game_over_poll_system.run_if(resource_exists::<Session>));
    app
}

fn spawn_resting(app: &mut App, y: f32, level: u8) -> Entity {
    let config = app.world().resource::<GameConfig>().clone();
    let level = FruitLevel::new(level).unwrap();
    app.world_mut()
        .spawn(fruit_body(Vec2::new(320.0, y), level, &config))
        .id()
}

// ── Drop / reset ──────────────────────────────────────────────────────────────

#[test]
fn accepted_drop_spawns_current_fruit_and_enters_dropping() {
    let mut app = drop_app();
    let before = state(&app);
    assert_eq!(before.phase, Phase::Ready);

    request_drop(&mut app, 200.0);
    app.update();

    assert_eq!(fruit_count(&mut app), 1);
    let after = state(&app);
    assert_eq!(after.phase, Phase::Dropping);
    assert_eq!(after.current_level, before.current_level);

    let drop_y = app.world().resource::<GameConfig>().drop_y;
    let mut query = app.world_mut().query::<(&Fruit, &Transform)>();
    let (fruit, transform) = query.single(app.world()).unwrap();
    assert_eq!(fruit.level, before.current_level);
    assert_eq!(transform.translation.truncate(), Vec2::new(200.0, drop_y));
}

#[test]
fn second_drop_inside_cooldown_is_ignored() {
    let mut app = drop_app();
    request_drop(&mut app, 200.0);
    app.update();
    request_drop(&mut app, 400.0);
    app.update();

    assert_eq!(fruit_count(&mut app), 1);
    assert_eq!(state(&app).phase, Phase::Dropping);
}

#[test]
fn drop_after_game_over_resets_the_round() {
    let mut app = drop_app();
    request_drop(&mut app, 200.0);
    app.update();
    {
        let mut state = app.world_mut().resource_mut::<GameState>();
        *state = state.with_score_added(42).with_game_over();
    }
    app.world_mut()
        .resource_mut::<MergeEffects>()
        .0
        .push(MergeEffect::for_merge(
            Vec2::ZERO,
            FruitLevel::new(1).unwrap(),
            &GameConfig::default(),
        ));

    request_drop(&mut app, 300.0);
    app.update();

    assert_eq!(fruit_count(&mut app), 0);
    let fresh = state(&app);
    assert_eq!(fresh.phase, Phase::Ready);
    assert_eq!(fresh.score, 0);
    assert!(app.world().resource::<MergeEffects>().0.is_empty());
    assert!(
        app.world().resource::<Session>().drop_clock.is_ready(),
        "old cooldown does not leak into the new round"
    );

    // The new round accepts a drop straight away.
    request_drop(&mut app, 300.0);
    app.update();
    assert_eq!(fruit_count(&mut app), 1);
}

#[test]
fn reset_swallows_extra_requests_of_the_same_frame() {
    let mut app = drop_app();
    {
        let mut state = app.world_mut().resource_mut::<GameState>();
        *state = state.with_game_over();
    }

    request_drop(&mut app, 200.0);
    request_drop(&mut app, 300.0);
    app.update();

    assert_eq!(fruit_count(&mut app), 0, "a reset never drops a fruit");
    assert_eq!(state(&app).phase, Phase::Ready);
    assert!(app.world().resource::<Session>().drop_clock.is_ready());

    // Nothing left over for the next frame either.
    app.update();
    assert_eq!(fruit_count(&mut app), 0);
}

#[test]
fn cooldown_runs_its_full_length_then_promotes_next_fruit() {
    let mut app = timed_drop_app(60.0);
    let before = state(&app);

    request_drop(&mut app, 320.0);
    app.update();
    assert_eq!(state(&app).phase, Phase::Dropping);

    // 250 ms into a 500 ms cooldown: the drop frame itself is not counted.
    app.update();
    assert_eq!(state(&app).phase, Phase::Dropping);

    app.update();
    let after = state(&app);
    assert_eq!(after.phase, Phase::Ready);
    assert_eq!(after.current_level, before.next_level);
    assert!(after.next_level <= app.world().resource::<GameConfig>().max_drop());
    assert!(app.world().resource::<Session>().in_flight.is_none());
}

#[test]
fn fresh_drop_is_not_a_game_over_while_in_flight() {
    let mut app = timed_drop_app(0.0);

    request_drop(&mut app, 320.0);
    app.update();
    // The poll fires on this frame too; the new fruit sits above the line
    // with zero velocity but is still in flight.
    app.update();
    assert_eq!(state(&app).phase, Phase::Dropping);
    assert!(app.world().resource::<Session>().in_flight.is_some());

    // Without a physics step the fruit never moves, so once the cooldown ends
    // it is an ordinary resting fruit above the line.
    app.update();
    assert!(state(&app).is_game_over());
}

#[test]
fn app_exit_removes_session_and_fruit() {
    let mut app = drop_app();
    app.add_systems(Last, end_session_system);
    request_drop(&mut app, 200.0);
    app.update();
    assert_eq!(fruit_count(&mut app), 1);

    app.world_mut()
        .resource_mut::<Messages<AppExit>>()
        .write(AppExit::Success);
    app.update();

    assert!(!app.world().contains_resource::<Session>());
    assert_eq!(fruit_count(&mut app), 0);

    // Gated systems stay idle without a session.
    request_drop(&mut app, 200.0);
    app.update();
    assert_eq!(fruit_count(&mut app), 0);
}

// ── Game-over polling ─────────────────────────────────────────────────────────

#[test]
fn settled_fruit_above_danger_line_ends_the_round() {
    let mut app = watch_app();
    let line = app.world().resource::<GameConfig>().danger_line_y;
    spawn_resting(&mut app, line + 10.0, 2);

    for _ in 0..POLL_FRAMES {
        app.update();
    }

    assert!(state(&app).is_game_over());
}

#[test]
fn fruit_below_danger_line_keeps_playing() {
    let mut app = watch_app();
    let line = app.world().resource::<GameConfig>().danger_line_y;
    spawn_resting(&mut app, line - 200.0, 2);

    for _ in 0..POLL_FRAMES {
        app.update();
    }

    assert_eq!(state(&app).phase, Phase::Ready);
}

#[test]
fn removing_the_session_cancels_polling() {
    let mut app = watch_app();
    app.world_mut().remove_resource::<Session>();
    let line = app.world().resource::<GameConfig>().danger_line_y;
    spawn_resting(&mut app, line + 10.0, 2);

    for _ in 0..POLL_FRAMES {
        app.update();
    }

    assert_eq!(state(&app).phase, Phase::Ready);
}

// ── High score ────────────────────────────────────────────────────────────────

#[test]
fn beating_the_best_score_persists_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("high_score.toml");
    let config = GameConfig {
        high_score_path: path.clone(),
        ..Default::default()
    };
    let state = GameState::new(&mut StdRng::seed_from_u64(1), config.max_drop()).with_score_added(12);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config)
        .insert_resource(state)
        .insert_resource(HighScore { best: 5 })
        .add_systems(Update, track_high_score_system);
    app.update();

    assert_eq!(app.world().resource::<HighScore>().best, 12);
    assert_eq!(read_high_score(&path).unwrap(), 12);
}

#[test]
fn lower_score_leaves_best_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("high_score.toml");
    let config = GameConfig {
        high_score_path: path.clone(),
        ..Default::default()
    };
    let state = GameState::new(&mut StdRng::seed_from_u64(1), config.max_drop()).with_score_added(3);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config)
        .insert_resource(state)
        .insert_resource(HighScore { best: 50 })
        .add_systems(Update, track_high_score_system);
    app.update();

    assert_eq!(app.world().resource::<HighScore>().best, 50);
    assert!(!path.exists());
}
