use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::vehicle::{Car, VehicleState};

/// Pixel scroll deltas per wheel notch
const PIXELS_PER_LINE: f32 = 40.0;

/// Chase camera that trails the car from a fixed elevation
#[derive(Component, Clone, Debug)]
pub struct ChaseCamera {
    /// Current zoom; scales both the height and the trailing offset
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining gap closed each frame
    pub blend: f32,
    /// Distance change per wheel notch
    pub zoom_step: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            distance: 15.0,
            min_distance: 5.0,
            max_distance: 40.0,
            blend: 0.1,
            zoom_step: 1.5,
        }
    }
}

impl ChaseCamera {
    /// Moves the zoom by `lines` notches; positive lines zoom in.
    pub fn apply_zoom(&mut self, lines: f32) {
        self.distance = zoom_distance(
            self.distance,
            lines * self.zoom_step,
            self.min_distance,
            self.max_distance,
        );
    }

    /// Where the camera wants to be for a given target
    pub fn desired_position(&self, target: Vec3) -> Vec3 {
        target + Vec3::new(0.0, self.distance, self.distance)
    }
}

/// Shrinks `distance` by `delta` and clamps the result to `[min, max]`.
pub fn zoom_distance(distance: f32, delta: f32, min: f32, max: f32) -> f32 {
    (distance - delta).clamp(min, max)
}

/// Moves `current` a fixed fraction of the way to `desired`
pub fn smooth_toward(current: Vec3, desired: Vec3, blend: f32) -> Vec3 {
    current.lerp(desired, blend)
}

/// Reads the mouse wheel into the zoom distance
pub fn zoom_camera(
    mut wheel: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut ChaseCamera>,
) {
    let lines: f32 = wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
        })
        .sum();

    if lines == 0.0 {
        return;
    }

    for mut camera in &mut camera_query {
        camera.apply_zoom(lines);
    }
}

/// Eases the camera toward its chase position and aims it at the car
pub fn follow_car(
    car_query: Query<&VehicleState, With<Car>>,
    mut camera_query: Query<(&mut Transform, &ChaseCamera), Without<Car>>,
) {
    let Ok(car) = car_query.single() else {
        return;
    };

    for (mut transform, camera) in &mut camera_query {
        let desired = camera.desired_position(car.position);
        transform.translation = smooth_toward(transform.translation, desired, camera.blend);
        transform.look_at(car.position, Vec3::Y);
    }
}
