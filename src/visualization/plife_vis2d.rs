use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::driver::{Command, Flow};
use crate::simulation::projection::Projection;
use crate::simulation::scenario::Simulation;
use crate::simulation::species::Species;
use crate::simulation::states::NVec2;

/// Component tagging each dot with its slot in the particle store
#[derive(Component)]
struct SlotIndex(pub usize);

/// Input gathered during `Update`, applied before the next fixed step
#[derive(Resource, Default)]
struct PendingCommands(Vec<Command>);

/// One material per species, indexed by `Species::index`
#[derive(Resource)]
struct SpeciesMaterials(Vec<Handle<ColorMaterial>>);

const DOT_RADIUS: f32 = 2.5;
const BACKGROUND: Color = Color::srgb(0.133, 0.133, 0.133);

pub fn run_2d(simulation: Simulation) {
    let projection = *simulation.projection();
    tracing::info!(
        particles = simulation.store().capacity(),
        width = projection.pixel_width,
        height = projection.pixel_height,
        "starting Bevy 2D viewer"
    );

    App::new()
        .insert_resource(ClearColor(BACKGROUND))
        .insert_resource(Time::<Fixed>::from_hz(simulation.engine.frame_rate))
        .insert_resource(simulation)
        .init_resource::<PendingCommands>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Particle life".into(),
                        resolution: WindowResolution::new(
                            projection.pixel_width as f32,
                            projection.pixel_height as f32,
                        ),
                        resizable: false,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                // the subscriber installed in main stays in charge
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, setup_particles_system)
        .add_systems(Update, (input_system, sync_transforms_system))
        .add_systems(FixedUpdate, physics_step_system)
        .run();
}

/// Screen-space translation of a world position (origin at canvas centre, y up)
fn to_screen(projection: &Projection, position: &NVec2) -> Vec2 {
    let (px, py) = projection.world_to_pixel(position);
    Vec2::new(
        (px - projection.pixel_width as f64 / 2.0) as f32,
        (projection.pixel_height as f64 / 2.0 - py) as f32,
    )
}

fn setup_particles_system(
    mut commands: Commands,
    simulation: Res<Simulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    let dot = Mesh2dHandle(meshes.add(Circle::new(DOT_RADIUS)));
    let palette: Vec<Handle<ColorMaterial>> = Species::ALL
        .iter()
        .map(|s| {
            let [r, g, b] = s.color_f32();
            materials.add(ColorMaterial::from(Color::srgb(r, g, b)))
        })
        .collect();

    let projection = simulation.projection();
    for (i, p) in simulation.store().particles().iter().enumerate() {
        let at = to_screen(projection, &p.position);
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: dot.clone(),
                material: palette[p.species.index()].clone(),
                transform: Transform::from_xyz(at.x, at.y, 0.0),
                ..Default::default()
            },
            SlotIndex(i),
        ));
    }

    commands.insert_resource(SpeciesMaterials(palette));
}

/// Left click spawns the first species, right click the last one,
/// `R` reseeds the matrix, `Q` / `Esc` quits
fn input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    simulation: Res<Simulation>,
    mut pending: ResMut<PendingCommands>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        pending.0.push(Command::Reseed);
    }
    if keys.just_pressed(KeyCode::KeyQ) || keys.just_pressed(KeyCode::Escape) {
        pending.0.push(Command::Terminate);
    }

    let species = simulation.species();
    let chosen = if buttons.just_pressed(MouseButton::Left) {
        species.first()
    } else if buttons.just_pressed(MouseButton::Right) {
        species.last()
    } else {
        None
    };
    let Some(&species) = chosen else {
        return;
    };

    let Ok(window) = windows.get_single() else {
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        pending.0.push(Command::Spawn {
            pixel_x: cursor.x as f64,
            pixel_y: cursor.y as f64,
            species,
        });
    }
}

fn physics_step_system(
    mut simulation: ResMut<Simulation>,
    mut pending: ResMut<PendingCommands>,
    mut exit: EventWriter<AppExit>,
) {
    for cmd in pending.0.drain(..) {
        if simulation.apply(cmd) == Flow::Terminate {
            exit.send(AppExit::Success);
            return;
        }
    }
    simulation.step();
}

fn sync_transforms_system(
    simulation: Res<Simulation>,
    palette: Res<SpeciesMaterials>,
    mut query: Query<(&SlotIndex, &mut Transform, &mut Handle<ColorMaterial>)>,
) {
    let frame = simulation.snapshot();
    let projection = simulation.projection();

    for (SlotIndex(i), mut transform, mut material) in &mut query {
        let Some(p) = frame.get(*i) else {
            continue;
        };
        let at = to_screen(projection, &p.position);
        transform.translation.x = at.x;
        transform.translation.y = at.y;

        // spawns may have changed the slot's species
        let wanted = &palette.0[p.species.index()];
        if *material != *wanted {
            *material = wanted.clone();
        }
    }
}
