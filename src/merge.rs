//! Collision-driven fruit merging.
//!
//! ## Flow
//!
//! 1. Rapier reports `CollisionEvent::Started(a, b)` for every new contact.
//!    All events read in one frame form a single batch.
//! 2. [`fruit_merge_system`] snapshots the bodies named in the batch into
//!    [`BodyView`]s and hands them to [`plan_merges`].
//! 3. `plan_merges` walks the pairs in order and claims both bodies of every
//!    eligible pair by setting `merging` on their views *before* looking at the
//!    next pair.  A body touching several same-level neighbours therefore
//!    merges at most once per batch; the first eligible pair wins.
//! 4. The system applies each [`MergePlan`]: flags the components, despawns
//!    both sources, spawns one fruit a level up at their midpoint and writes a
//!    [`FruitMerged`] message (score + ring effect).
//!
//! A pair is eligible when both bodies are dynamic fruit of the same,
//! non-terminal level and neither is already merging.

use std::collections::HashMap;
use std::hash::Hash;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::GameConfig;
use crate::effects::MergeEffect;
use crate::fruit::{Fruit, FruitLevel};
use crate::physics::spawn_fruit;

/// What the merge processor and game-over detector need to know about a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Walls and floor.
    pub is_static: bool,
    /// `None` for bodies that are not fruit.
    pub fruit: Option<Fruit>,
}

impl BodyView {
    /// The fruit on this body if it can still take part in a merge.
    #[inline]
    fn mergeable_fruit(&self) -> Option<Fruit> {
        if self.is_static {
            return None;
        }
        self.fruit.filter(|fruit| !fruit.merging)
    }
}

/// One decided merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePlan<H> {
    pub sources: (H, H),
    /// Midpoint of the two source positions.
    pub position: Vec2,
    /// Level of the fruit that replaces the sources.
    pub level: FruitLevel,
}

impl<H> MergePlan<H> {
    /// Points awarded for this merge: the new tier's score value.
    #[inline]
    pub fn points(&self) -> u32 {
        self.level.tier().score_value
    }
}

/// Level produced by merging `a` with `b`, or `None` if the pair must be skipped.
pub fn merge_result(a: &BodyView, b: &BodyView) -> Option<FruitLevel> {
    let fa = a.mergeable_fruit()?;
    let fb = b.mergeable_fruit()?;
    if fa.level != fb.level {
        return None;
    }
    fa.level.next()
}

/// Decide which pairs of one collision batch merge.
///
/// Bodies missing from `bodies` are treated as gone and skipped.  Every body in
/// a returned plan has `merging` set in `bodies`.
pub fn plan_merges<H, I>(bodies: &mut HashMap<H, BodyView>, pairs: I) -> Vec<MergePlan<H>>
where
    H: Copy + Eq + Hash,
    I: IntoIterator<Item = (H, H)>,
{
    let mut plans = Vec::new();
    for (a, b) in pairs {
        if a == b {
            continue;
        }
        let (Some(view_a), Some(view_b)) = (bodies.get(&a).copied(), bodies.get(&b).copied()) else {
            continue;
        };
        let Some(level) = merge_result(&view_a, &view_b) else {
            continue;
        };

        for handle in [a, b] {
            if let Some(fruit) = bodies.get_mut(&handle).and_then(|view| view.fruit.as_mut()) {
                fruit.merging = true;
            }
        }

        plans.push(MergePlan {
            sources: (a, b),
            position: (view_a.position + view_b.position) * 0.5,
            level,
        });
    }
    plans
}

/// Emitted once per merge.
#[derive(Message, Debug, Clone, Copy)]
pub struct FruitMerged {
    pub position: Vec2,
    pub level: FruitLevel,
    pub points: u32,
    pub effect: MergeEffect,
}

/// Consume this frame's collision batch and carry out the merges it contains.
pub fn fruit_merge_system(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionEvent>,
    mut bodies: Query<(&RigidBody, &Transform, Option<&Velocity>, Option<&mut Fruit>)>,
    config: Res<GameConfig>,
    mut merged: MessageWriter<FruitMerged>,
) {
    let pairs: Vec<(Entity, Entity)> = collisions
        .read()
        .filter_map(|event| match event {
            CollisionEvent::Started(e1, e2, _) => Some((*e1, *e2)),
            CollisionEvent::Stopped(..) => None,
        })
        .collect();
    if pairs.is_empty() {
        return;
    }

    let mut views = HashMap::with_capacity(pairs.len() * 2);
    for entity in pairs.iter().flat_map(|&(a, b)| [a, b]) {
        if views.contains_key(&entity) {
            continue;
        }
        if let Ok((body, transform, velocity, fruit)) = bodies.get(entity) {
            views.insert(
                entity,
                BodyView {
                    position: transform.translation.truncate(),
                    velocity: velocity.map_or(Vec2::ZERO, |v| v.linvel),
                    is_static: *body == RigidBody::Fixed,
                    fruit: fruit.copied(),
                },
            );
        }
    }

    for plan in plan_merges(&mut views, pairs) {
        let (a, b) = plan.sources;
        for entity in [a, b] {
            if let Ok((_, _, _, Some(mut fruit))) = bodies.get_mut(entity) {
                fruit.merging = true;
            }
            commands.entity(entity).despawn();
        }

        spawn_fruit(&mut commands, plan.position, plan.level, &config);
        merged.write(FruitMerged {
            position: plan.position,
            level: plan.level,
            points: plan.points(),
            effect: MergeEffect::for_merge(plan.position, plan.level, &config),
        });
        debug!(
            "Merge → {} (level {}) at {:?}, +{}",
            plan.level.tier().name,
            plan.level.get(),
            plan.position,
            plan.points()
        );
    }
}
