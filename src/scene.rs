use bevy::prelude::*;

use crate::vehicle::VehicleConfig;
use crate::zones::TriggerZones;

const GROUND_MARGIN: f32 = 15.0;
const PAD_RADIUS: f32 = 3.5;

/// Glowing disc marking a trigger zone
#[derive(Component)]
pub struct ZonePad {
    index: usize,
}

/// Plugin for the static world: ground, lights, zone pads
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.53, 0.68, 0.86)))
            .add_systems(Startup, spawn_scene)
            .add_systems(
                Update,
                highlight_zone_pads.run_if(resource_changed::<TriggerZones>),
            );
    }
}

fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    zones: Res<TriggerZones>,
) {
    let bound = VehicleConfig::default().bound;
    let extent = (bound + GROUND_MARGIN) * 2.0;

    // ── Ground ───────────────────────────────────────────────────
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(extent, extent))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.52, 0.34),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::default(),
    ));

    // Low kerbs along the driving bound
    let kerb_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.85, 0.8),
        ..default()
    });
    let kerb_long = meshes.add(Cuboid::new(bound * 2.0 + 1.0, 0.4, 0.5));
    for (x, z, turned) in [
        (0.0, -bound - 0.5, false),
        (0.0, bound + 0.5, false),
        (-bound - 0.5, 0.0, true),
        (bound + 0.5, 0.0, true),
    ] {
        let rotation = if turned {
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
        } else {
            Quat::IDENTITY
        };
        commands.spawn((
            Mesh3d(kerb_long.clone()),
            MeshMaterial3d(kerb_mat.clone()),
            Transform::from_xyz(x, 0.2, z).with_rotation(rotation),
        ));
    }

    // ── Zone pads ────────────────────────────────────────────────
    let pad_mesh = meshes.add(Cylinder::new(PAD_RADIUS, 0.05));
    for (index, (zone, _)) in zones.iter().enumerate() {
        commands.spawn((
            ZonePad { index },
            Mesh3d(pad_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: zone.color,
                ..default()
            })),
            Transform::from_translation(zone.center + Vec3::Y * 0.03),
        ));
    }

    // ── Lighting ─────────────────────────────────────────────────
    commands.spawn((
        DirectionalLight {
            illuminance: 12000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    commands.spawn(AmbientLight {
        color: Color::srgb(0.7, 0.75, 0.9),
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });
}

/// Lights up pads the car is parked on
fn highlight_zone_pads(
    zones: Res<TriggerZones>,
    pads: Query<(&ZonePad, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (pad, material) in &pads {
        let (Some(zone), Some(material)) = (zones.get(pad.index), materials.get_mut(&material.0))
        else {
            continue;
        };
        material.emissive = if zones.is_active(pad.index) {
            LinearRgba::from(zone.color) * 4.0
        } else {
            LinearRgba::BLACK
        };
    }
}
