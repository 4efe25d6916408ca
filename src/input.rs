//! Pointer input: where the next fruit will fall, and when to drop it.
//!
//! Mouse, touch and keyboard all reduce to two actions:
//! - **move preview**: update [`DropCursor`] with a clamped world-space x;
//! - **commit drop**: write a [`DropRequested`] message at the cursor x.
//!
//! The clamp keeps the current fruit's edge `drop_edge_margin` away from both
//! walls.  Whether a drop is actually accepted is decided by
//! [`crate::session::drop_request_system`].

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::CursorMoved;

use crate::config::GameConfig;
use crate::state::GameState;

/// Clamped horizontal drop position in world units.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DropCursor(pub f32);

impl DropCursor {
    pub fn centered(config: &GameConfig) -> Self {
        Self(config.container_width / 2.0)
    }
}

/// The player committed a drop at `x` (already clamped).
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DropRequested {
    pub x: f32,
}

/// Clamp `x` so a fruit of `radius` stays `drop_edge_margin` inside both walls.
///
/// Falls back to the container centre when the fruit is too wide to fit or `x`
/// is not a number.
pub fn clamp_drop_x(x: f32, radius: f32, config: &GameConfig) -> f32 {
    let min = radius + config.drop_edge_margin;
    let max = config.container_width - radius - config.drop_edge_margin;
    if min > max || !x.is_finite() {
        return config.container_width / 2.0;
    }
    x.clamp(min, max)
}

/// Map the cursor / touches into drop-cursor moves and drop requests.
#[allow(clippy::too_many_arguments)]
pub fn pointer_input_system(
    mut cursor_moves: MessageReader<CursorMoved>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    state: Res<GameState>,
    config: Res<GameConfig>,
    mut cursor: ResMut<DropCursor>,
    mut requests: MessageWriter<DropRequested>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let radius = state.current_level.radius();
    let to_drop_x = |screen: Vec2| {
        camera
            .viewport_to_world_2d(camera_transform, screen)
            .ok()
            .map(|world| clamp_drop_x(world.x, radius, &config))
    };

    // Only actual pointer motion moves the cursor so keyboard aiming sticks.
    if let Some(x) = cursor_moves.read().last().and_then(|moved| to_drop_x(moved.position)) {
        cursor.0 = x;
    }
    for touch in touches.iter() {
        if let Some(x) = to_drop_x(touch.position()) {
            cursor.0 = x;
        }
    }
    // The current fruit may have grown since the cursor last moved.
    cursor.0 = clamp_drop_x(cursor.0, radius, &config);

    let pressed = buttons.just_released(MouseButton::Left)
        || keys.just_pressed(KeyCode::Space)
        || keys.just_pressed(KeyCode::Enter);
    if pressed {
        requests.write(DropRequested { x: cursor.0 });
    }
    for touch in touches.iter_just_released() {
        if let Some(x) = to_drop_x(touch.position()) {
            cursor.0 = x;
            requests.write(DropRequested { x });
        }
    }
}

/// Nudge the drop cursor with the arrow keys / A-D.
pub fn keyboard_aim_system(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<GameState>,
    config: Res<GameConfig>,
    mut cursor: ResMut<DropCursor>,
) {
    const AIM_SPEED: f32 = 420.0;
    let mut dir = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA) {
        dir -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD) {
        dir += 1.0;
    }
    if dir == 0.0 {
        return;
    }
    let moved = cursor.0 + dir * AIM_SPEED * time.delta_secs();
    cursor.0 = clamp_drop_x(moved, state.current_level.radius(), &config);
}
