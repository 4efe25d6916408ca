//! Rendering: fruit and container meshes, gizmo overlays, and the score HUD.
//!
//! Nothing here feeds back into gameplay; every system only reads game state.
//!
//! ## Layer Model
//!
//! | Layer              | Technology | Source                                  |
//! |--------------------|------------|-----------------------------------------|
//! | Fruit fills        | `Mesh2d`   | one shared circle mesh + material/tier  |
//! | Container pieces   | `Mesh2d`   | [`Boundary`] half extents               |
//! | Danger line        | Gizmos     | `GameConfig::danger_line_y`             |
//! | Drop preview       | Gizmos     | [`DropCursor`] + current level (`Ready`) |
//! | Next-fruit preview | Gizmos     | `GameState::next_level`                 |
//! | Merge rings        | Gizmos     | [`MergeEffects`]                        |
//! | Score HUD          | Bevy UI    | [`GameState`] + [`HighScore`]           |
//! | Game-over banner   | Bevy UI    | shown while `Phase::GameOver`           |

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::effects::MergeEffects;
use crate::fruit::{Fruit, FRUITS};
use crate::high_score::HighScore;
use crate::input::DropCursor;
use crate::physics::Boundary;
use crate::session::Session;
use crate::state::{GameState, Phase};

const WALL_COLOR: Color = Color::srgb(0.55, 0.42, 0.30);
const DANGER_COLOR: Color = Color::srgba(1.0, 0.25, 0.25, 0.7);
const HUD_COLOR: Color = Color::srgb(0.95, 0.88, 0.45);
const PREVIEW_ALPHA: f32 = 0.5;

/// Registers every rendering system.  Add after [`crate::SuikaPlugin`].
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup_fruit_assets,
                setup_hud.after(crate::config::load_game_config),
            ),
        )
        .add_systems(
            Update,
            (
                attach_fruit_mesh_system,
                attach_boundary_mesh_system,
                danger_line_gizmo_system,
                merge_effect_gizmo_system,
                (drop_preview_gizmo_system, hud_text_system, game_over_banner_system)
                    .run_if(resource_exists::<Session>),
            ),
        );
    }
}

// ── Shared assets ─────────────────────────────────────────────────────────────

/// Per-tier fruit mesh and material handles, indexed by level.
#[derive(Resource, Default)]
pub struct FruitAssets {
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<ColorMaterial>>,
}

/// Build one circle mesh and one colour material per tier.
pub fn setup_fruit_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let assets = FruitAssets {
        meshes: FRUITS
            .iter()
            .map(|tier| meshes.add(Circle::new(tier.radius)))
            .collect(),
        materials: FRUITS
            .iter()
            .map(|tier| materials.add(ColorMaterial::from_color(tier.color())))
            .collect(),
    };
    commands.insert_resource(assets);
}

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Attach the tier mesh to every newly spawned fruit.
///
/// Fruit spawned by a merge and by a drop both pass through here exactly once.
pub fn attach_fruit_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Fruit), Added<Fruit>>,
    assets: Option<Res<FruitAssets>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for (entity, fruit) in query.iter() {
        let level = usize::from(fruit.level.get());
        let (Some(mesh), Some(material)) = (assets.meshes.get(level), assets.materials.get(level))
        else {
            continue;
        };
        commands
            .entity(entity)
            .insert((Mesh2d(mesh.clone()), MeshMaterial2d(material.clone())));
    }
}

pub fn attach_boundary_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Boundary), Added<Boundary>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if query.is_empty() {
        return;
    }
    let material = materials.add(ColorMaterial::from_color(WALL_COLOR));
    for (entity, boundary) in query.iter() {
        let size = boundary.half_extents * 2.0;
        let mesh = meshes.add(Rectangle::new(size.x, size.y));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(material.clone())));
    }
}

// ── Gizmo overlays ────────────────────────────────────────────────────────────

pub fn danger_line_gizmo_system(mut gizmos: Gizmos, config: Res<GameConfig>) {
    let y = config.danger_line_y;
    gizmos.line_2d(
        Vec2::new(0.0, y),
        Vec2::new(config.container_width, y),
        DANGER_COLOR,
    );
}

/// Ghost of the current fruit at the drop cursor, a guide line below it, and
/// a small preview of the next fruit in the top-right corner.
pub fn drop_preview_gizmo_system(
    mut gizmos: Gizmos,
    config: Res<GameConfig>,
    state: Res<GameState>,
    cursor: Res<DropCursor>,
) {
    let next = state.next_level.tier();
    let corner = Vec2::new(
        config.container_width - 30.0,
        config.container_height - 30.0,
    );
    gizmos.circle_2d(corner, (next.radius * 0.5).min(20.0), next.color());

    if state.phase != Phase::Ready {
        return;
    }
    let current = state.current_level.tier();
    let at = Vec2::new(cursor.0, config.drop_y);
    gizmos.circle_2d(at, current.radius, current.color().with_alpha(PREVIEW_ALPHA));
    gizmos.line_2d(
        at - Vec2::Y * current.radius,
        Vec2::new(cursor.0, 0.0),
        Color::srgba(1.0, 1.0, 1.0, 0.15),
    );
}

pub fn merge_effect_gizmo_system(mut gizmos: Gizmos, effects: Res<MergeEffects>) {
    for ring in &effects.0 {
        gizmos.circle_2d(ring.position, ring.radius, ring.color.with_alpha(ring.alpha));
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct HudScoreText;

#[derive(Component)]
pub struct HudBestText;

#[derive(Component)]
pub struct HudNextText;

/// Centred "Game Over" banner; hidden outside `Phase::GameOver`.
#[derive(Component)]
pub struct GameOverBanner;

pub fn setup_hud(mut commands: Commands, config: Res<GameConfig>) {
    let font = TextFont {
        font_size: config.hud_font_size,
        ..default()
    };
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((Text::new("Score: 0"), font.clone(), TextColor(HUD_COLOR), HudScoreText));
            parent.spawn((Text::new("Best: 0"), font.clone(), TextColor(HUD_COLOR), HudBestText));
            parent.spawn((Text::new("Next: -"), font.clone(), TextColor(HUD_COLOR), HudNextText));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Percent(40.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            GameOverBanner,
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Game Over - click to play again"),
                TextFont {
                    font_size: config.hud_font_size * 2.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Refresh HUD text when the score, the queue or the best score changes.
pub fn hud_text_system(
    state: Res<GameState>,
    high: Option<Res<HighScore>>,
    mut score_text: Query<&mut Text, (With<HudScoreText>, Without<HudBestText>, Without<HudNextText>)>,
    mut best_text: Query<&mut Text, (With<HudBestText>, Without<HudNextText>)>,
    mut next_text: Query<&mut Text, With<HudNextText>>,
) {
    let high_changed = high.as_ref().is_some_and(|h| h.is_changed());
    if !state.is_changed() && !high_changed {
        return;
    }
    for mut text in score_text.iter_mut() {
        *text = Text::new(format!("Score: {}", state.score));
    }
    let best = high.map_or(0, |h| h.best);
    for mut text in best_text.iter_mut() {
        *text = Text::new(format!("Best: {best}"));
    }
    for mut text in next_text.iter_mut() {
        *text = Text::new(format!("Next: {}", state.next_level.tier().name));
    }
}

pub fn game_over_banner_system(
    state: Res<GameState>,
    mut query: Query<&mut Visibility, With<GameOverBanner>>,
) {
    if !state.is_changed() {
        return;
    }
    let vis = if state.is_game_over() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut v in query.iter_mut() {
        *v = vis;
    }
}
