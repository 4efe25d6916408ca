use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use suika::rendering::RenderingPlugin;
use suika::SuikaPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Suika".into(),
                resolution: WindowResolution::new(480, 800),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.98, 0.92, 0.80)))
        // pixels_per_meter(1.0) keeps world units equal to Rapier units, so
        // gravity, radii and speed thresholds are all in the same scale.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins((SuikaPlugin, RenderingPlugin))
        .run();
}
