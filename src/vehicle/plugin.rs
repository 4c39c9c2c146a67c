use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::audio::VehicleAudioMessage;
use super::input::{
    clear_drive_edges, handle_hold_end, handle_hold_start, handle_interact_start, handle_reset_end,
    handle_reset_start, AccelerateAction, BoostAction, DriveInput, InteractAction, ResetAction,
    ReverseAction, SteerLeftAction, SteerRightAction,
};
use super::movement::*;
use super::state::*;
use crate::section::ActiveSection;

/// Plugin for the drivable car
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin);

        // Register input context for the car
        app.add_input_context::<Car>();

        // Input observers
        app.add_observer(handle_hold_start::<AccelerateAction>);
        app.add_observer(handle_hold_end::<AccelerateAction>);
        app.add_observer(handle_hold_start::<ReverseAction>);
        app.add_observer(handle_hold_end::<ReverseAction>);
        app.add_observer(handle_hold_start::<SteerLeftAction>);
        app.add_observer(handle_hold_end::<SteerLeftAction>);
        app.add_observer(handle_hold_start::<SteerRightAction>);
        app.add_observer(handle_hold_end::<SteerRightAction>);
        app.add_observer(handle_hold_start::<BoostAction>);
        app.add_observer(handle_hold_end::<BoostAction>);
        app.add_observer(handle_reset_start);
        app.add_observer(handle_reset_end);
        app.add_observer(handle_interact_start);

        app.add_message::<VehicleAudioMessage>();

        app.add_systems(Startup, spawn_car);

        // Driving pauses while an overlay is open
        app.add_systems(
            FixedUpdate,
            (drive_vehicle, sync_vehicle_transform)
                .chain()
                .run_if(in_state(ActiveSection::Home)),
        );
        app.add_systems(Update, update_brake_lights);
        app.add_systems(OnEnter(ActiveSection::Home), clear_drive_edges);
    }
}

/// Spawns the car body, its visuals and its key bindings
fn spawn_car(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = VehicleConfig::default();

    let paint = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.18, 0.15),
        perceptual_roughness: 0.35,
        metallic: 0.4,
        ..default()
    });
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.12, 0.16, 0.22),
        perceptual_roughness: 0.1,
        ..default()
    });
    let tyre = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.08, 0.08),
        perceptual_roughness: 0.95,
        ..default()
    });
    let brake_idle = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.05, 0.05),
        ..default()
    });
    let brake_lit = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.1, 0.1),
        emissive: LinearRgba::rgb(8.0, 0.4, 0.4),
        ..default()
    });
    commands.insert_resource(BrakeLightMaterials {
        idle: brake_idle.clone(),
        lit: brake_lit,
    });

    let body_mesh = meshes.add(Cuboid::new(1.8, 0.6, 3.6));
    let cabin_mesh = meshes.add(Cuboid::new(1.5, 0.5, 1.8));
    let wheel_mesh = meshes.add(Cylinder::new(0.38, 0.3));
    let light_mesh = meshes.add(Cuboid::new(0.4, 0.15, 0.05));

    let car = commands
        .spawn((
            Car,
            config,
            VehicleState::at(config.origin),
            DriveInput::default(),
            Transform::from_translation(config.origin),
            Visibility::default(),
        ))
        .insert(
            // Input bindings
            actions!(Car[
                (
                    Action::<AccelerateAction>::new(),
                    bindings![KeyCode::KeyW, KeyCode::ArrowUp],
                ),
                (
                    Action::<ReverseAction>::new(),
                    bindings![KeyCode::KeyS, KeyCode::ArrowDown],
                ),
                (
                    Action::<SteerLeftAction>::new(),
                    bindings![KeyCode::KeyA, KeyCode::ArrowLeft],
                ),
                (
                    Action::<SteerRightAction>::new(),
                    bindings![KeyCode::KeyD, KeyCode::ArrowRight],
                ),
                (
                    Action::<BoostAction>::new(),
                    bindings![KeyCode::ShiftLeft, KeyCode::ShiftRight],
                ),
                (
                    Action::<ResetAction>::new(),
                    bindings![KeyCode::KeyR],
                ),
                (
                    Action::<InteractAction>::new(),
                    bindings![KeyCode::KeyE, KeyCode::Enter],
                ),
            ]),
        )
        .id();

    // Chassis visuals sit above the ground contact point
    commands.entity(car).with_children(|parent| {
        parent.spawn((
            Mesh3d(body_mesh),
            MeshMaterial3d(paint),
            Transform::from_xyz(0.0, 0.6, 0.0),
        ));
        parent.spawn((
            Mesh3d(cabin_mesh),
            MeshMaterial3d(glass),
            Transform::from_xyz(0.0, 1.15, 0.25),
        ));

        for (x, z) in [(-0.95, -1.15), (0.95, -1.15), (-0.95, 1.15), (0.95, 1.15)] {
            parent.spawn((
                Mesh3d(wheel_mesh.clone()),
                MeshMaterial3d(tyre.clone()),
                Transform::from_xyz(x, 0.38, z)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
            ));
        }

        // Tail is +Z since the nose faces -Z
        for x in [-0.6, 0.6] {
            parent.spawn((
                BrakeLight,
                Mesh3d(light_mesh.clone()),
                MeshMaterial3d(brake_idle.clone()),
                Transform::from_xyz(x, 0.7, 1.81),
            ));
        }
    });
}
