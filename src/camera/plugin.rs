use bevy::prelude::*;

use super::rig::*;
use crate::section::ActiveSection;

/// Plugin for the chase camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);

        app.add_systems(
            Update,
            (
                // Wheel input only zooms while driving
                zoom_camera.run_if(in_state(ActiveSection::Home)),
                follow_car,
            )
                .chain(),
        );
    }
}

fn spawn_camera(mut commands: Commands) {
    let rig = ChaseCamera::default();
    let start = rig.desired_position(Vec3::ZERO);

    commands.spawn((
        rig,
        Camera3d::default(),
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
