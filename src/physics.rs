//! Rapier glue: gravity, the static container, and fruit body construction.
//!
//! Everything that creates or configures a physics body lives here so the
//! merge processor, drop controller and reset path all build identical fruit.
//!
//! ## Container layout (y-up)
//!
//! ```text
//!   x = 0                 x = container_width
//!   │▒│                           │▒│   ← walls, wall_thickness wide
//!   │▒│                           │▒│
//!   │▒└───────────────────────────┘▒│
//!   └▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒┘   ← floor, top face at y = 0
//! ```

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::GameConfig;
use crate::fruit::{Fruit, FruitLevel};

/// Static wall or floor piece.  `half_extents` is shared with the renderer.
#[derive(Component, Debug, Clone, Copy)]
pub struct Boundary {
    pub half_extents: Vec2,
}

/// Startup system: point Rapier gravity down with the configured strength.
pub fn configure_gravity(config: Res<GameConfig>, mut rapier: Query<&mut RapierConfiguration>) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity);
    }
}

/// Centre and half-extents of the left wall, right wall and floor.
pub fn container_pieces(config: &GameConfig) -> [(Vec2, Vec2); 3] {
    let w = config.container_width;
    let h = config.container_height;
    let t = config.wall_thickness;
    [
        (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
        (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
        (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w / 2.0 + t, t / 2.0)),
    ]
}

/// Startup system: spawn the three fixed container colliders.
pub fn spawn_container(mut commands: Commands, config: Res<GameConfig>) {
    for (center, half_extents) in container_pieces(&config) {
        commands.spawn((
            Boundary { half_extents },
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            Friction::coefficient(config.fruit_friction),
            Transform::from_translation(center.extend(0.0)),
            Visibility::default(),
        ));
    }
    info!("Container spawned ({} x {})", config.container_width, config.container_height);
}

/// Component set for a dynamic fruit body of `level` at `position`.
pub fn fruit_body(position: Vec2, level: FruitLevel, config: &GameConfig) -> impl Bundle {
    (
        Fruit::new(level),
        RigidBody::Dynamic,
        Collider::ball(level.radius()),
        Friction::coefficient(config.fruit_friction),
        Restitution::coefficient(config.fruit_restitution),
        Damping {
            linear_damping: config.fruit_linear_damping,
            angular_damping: config.fruit_angular_damping,
        },
        Velocity::zero(),
        // Fruit–fruit contacts drive merging; walls never need to report.
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_translation(position.extend(0.0)),
        Visibility::default(),
    )
}

/// Spawn a dynamic fruit body and return its entity.
pub fn spawn_fruit(
    commands: &mut Commands,
    position: Vec2,
    level: FruitLevel,
    config: &GameConfig,
) -> Entity {
    commands.spawn(fruit_body(position, level, config)).id()
}

/// Despawn every fruit body, leaving the container in place.
pub fn despawn_all_fruit(commands: &mut Commands, fruits: &Query<Entity, With<Fruit>>) -> usize {
    let mut count = 0;
    for entity in fruits.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    count
}
