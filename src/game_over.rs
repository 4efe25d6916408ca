//! Settled-fruit game-over detection.
//!
//! A fruit resting above the danger line fires no further collision events, so
//! the check polls the world on a coarse timer instead of reacting to contacts.
//! Polling starts only after the session's grace delay (see
//! [`crate::session::GameOverWatch`]).
//!
//! A fruit breaches when its top edge (`y + radius`, y-up) is above
//! `danger_line_y` **and** its speed is under `settle_speed_threshold`.  Fruit
//! still falling past the line, mid-merge, or just dropped (see
//! [`Session::in_flight`]) never count.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::GameConfig;
use crate::fruit::Fruit;
use crate::merge::BodyView;
use crate::session::Session;
use crate::state::GameState;

/// Danger line and settle threshold for one poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DangerZone {
    pub line_y: f32,
    pub settle_speed: f32,
}

impl DangerZone {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            line_y: config.danger_line_y,
            settle_speed: config.settle_speed_threshold,
        }
    }

    /// `true` when `body` is a live fruit resting above the line.
    pub fn is_breached_by(&self, body: &BodyView) -> bool {
        if body.is_static {
            return false;
        }
        let Some(fruit) = body.fruit else {
            return false;
        };
        if fruit.merging {
            return false;
        }
        let top = body.position.y + fruit.level.radius();
        top > self.line_y && body.velocity.length() < self.settle_speed
    }
}

/// First body that breaches `zone`, in iteration order.
pub fn find_settled_breach<H, I>(bodies: I, zone: &DangerZone) -> Option<H>
where
    I: IntoIterator<Item = (H, BodyView)>,
{
    bodies
        .into_iter()
        .find(|(_, body)| zone.is_breached_by(body))
        .map(|(handle, _)| handle)
}

/// Poll the world when the watch fires and end the round on a breach.
pub fn game_over_poll_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut state: ResMut<GameState>,
    bodies: Query<(Entity, &RigidBody, &Transform, &Velocity, &Fruit)>,
) {
    if !session.watch.tick(time.delta_secs()) || state.is_game_over() {
        return;
    }

    let zone = DangerZone::from_config(&config);
    let in_flight = session.in_flight;
    let views = bodies
        .iter()
        .filter(|(entity, ..)| Some(*entity) != in_flight)
        .map(|(entity, body, transform, velocity, fruit)| {
            (
                entity,
                BodyView {
                    position: transform.translation.truncate(),
                    velocity: velocity.linvel,
                    is_static: *body == RigidBody::Fixed,
                    fruit: Some(*fruit),
                },
            )
        });

    if let Some(offender) = find_settled_breach(views, &zone) {
        info!("Game over: {offender} settled above the danger line (score {})", state.score);
        *state = state.with_game_over();
    }
}
