use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::GameConfig;

/// Space kept around the container (walls included) when fitting the view.
const VIEW_MARGIN: f32 = 40.0;

/// Setup the 2D camera centred on the container.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    let center = Vec2::new(config.container_width / 2.0, config.container_height / 2.0);
    commands.spawn((Camera2d, Transform::from_translation(center.extend(0.0))));
    info!("Camera spawned");
}

/// World units per screen pixel needed to show the whole container in a
/// `window` sized viewport.
pub fn fit_scale(window: Vec2, config: &GameConfig) -> f32 {
    let content = Vec2::new(
        config.container_width + 2.0 * (config.wall_thickness + VIEW_MARGIN),
        config.container_height + config.wall_thickness + 2.0 * VIEW_MARGIN,
    );
    if window.x <= 0.0 || window.y <= 0.0 {
        return 1.0;
    }
    (content.x / window.x).max(content.y / window.y)
}

/// Keep the container fully visible as the window is resized.
pub fn fit_camera_system(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    config: Res<GameConfig>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let scale = fit_scale(window.size(), &config);
    for mut transform in cameras.iter_mut() {
        transform.scale = Vec3::new(scale, scale, 1.0);
    }
}
