use bevy::prelude::*;

use crate::vehicle::{Car, VehicleAudioMessage, VehicleConfig, VehicleState};

/// Paint options for crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrateColor {
    Amber,
    Teal,
    Violet,
    Slate,
}

impl CrateColor {
    pub const ALL: [CrateColor; 4] = [
        CrateColor::Amber,
        CrateColor::Teal,
        CrateColor::Violet,
        CrateColor::Slate,
    ];

    pub fn color(self) -> Color {
        match self {
            CrateColor::Amber => Color::srgb(0.93, 0.62, 0.18),
            CrateColor::Teal => Color::srgb(0.12, 0.66, 0.64),
            CrateColor::Violet => Color::srgb(0.52, 0.32, 0.82),
            CrateColor::Slate => Color::srgb(0.42, 0.46, 0.52),
        }
    }
}

/// Crate physics tuning, shared by every crate
#[derive(Resource, Clone, Copy, Debug)]
pub struct CrateConfig {
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Height of a crate's center when it sits on the ground
    pub resting_height: f32,
    /// Horizontal velocity multiplier per grounded step
    pub ground_damping: f32,
    /// Cosmetic rotation per unit of travel
    pub spin_factor: f32,
    /// Impulse handed over per m/s of car speed
    pub impulse_scale: f32,
    /// Share of the impulse turned into upward pop
    pub pop_scale: f32,
    /// Cap on the upward pop
    pub max_pop: f32,
    /// Impulses above this are audible
    pub impact_threshold: f32,
    /// Edge length of the crate cube
    pub crate_size: f32,
}

impl Default for CrateConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            resting_height: 0.5,
            ground_damping: 0.9,
            spin_factor: 1.5,
            impulse_scale: 1.2,
            pop_scale: 0.4,
            max_pop: 6.0,
            impact_threshold: 4.0,
            crate_size: 1.0,
        }
    }
}

/// A knock-about prop. Crates are displaced, never removed.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CrateState {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler XYZ angles, visual only
    pub rotation: Vec3,
    pub color: CrateColor,
    /// Added to the car radius to get the contact distance
    pub margin: f32,
}

impl CrateState {
    pub fn new(id: u32, position: Vec3, color: CrateColor, margin: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            color,
            margin,
        }
    }

    pub fn is_grounded(&self, config: &CrateConfig) -> bool {
        self.position.y <= config.resting_height
    }
}

/// Applies gravity, ground contact and cosmetic spin for one step.
pub fn integrate_crate(crate_state: &mut CrateState, config: &CrateConfig, dt: f32) {
    if crate_state.position.y > config.resting_height {
        crate_state.velocity.y -= config.gravity * dt;
    }

    crate_state.position += crate_state.velocity * dt;

    if crate_state.position.y <= config.resting_height {
        crate_state.position.y = config.resting_height;
        crate_state.velocity.y = 0.0;
        crate_state.velocity.x *= config.ground_damping;
        crate_state.velocity.z *= config.ground_damping;
    }

    crate_state.rotation.x += crate_state.velocity.z * dt * config.spin_factor;
    crate_state.rotation.z -= crate_state.velocity.x * dt * config.spin_factor;
}

/// Pushes a crate out of the car and hands it an impulse.
///
/// Returns the impulse magnitude when the two overlapped. Each crate is
/// resolved on its own; crates never push each other.
pub fn resolve_vehicle_contact(
    crate_state: &mut CrateState,
    vehicle: &VehicleState,
    vehicle_radius: f32,
    config: &CrateConfig,
) -> Option<f32> {
    let reach = vehicle_radius + crate_state.margin;
    let offset = crate_state.position - vehicle.position;
    let distance = offset.length();
    if distance >= reach {
        return None;
    }

    // Dead-center overlap has no direction of its own
    let direction = if distance > f32::EPSILON {
        offset / distance
    } else {
        vehicle.forward()
    };

    let force = vehicle.speed() * config.impulse_scale;
    crate_state.velocity.x += direction.x * force;
    crate_state.velocity.z += direction.z * force;
    crate_state.velocity.y += (force * config.pop_scale).min(config.max_pop);

    crate_state.position += direction * (reach - distance);
    crate_state.position.y = crate_state.position.y.max(config.resting_height);

    Some(force)
}

/// Runs gravity and car contact for every crate
pub fn step_crates(
    car_query: Query<(&VehicleState, &VehicleConfig), With<Car>>,
    mut crate_query: Query<&mut CrateState>,
    mut writer: MessageWriter<VehicleAudioMessage>,
    config: Res<CrateConfig>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let car = car_query.single().ok();

    for mut crate_state in &mut crate_query {
        integrate_crate(&mut crate_state, &config, dt);

        let Some((vehicle, vehicle_config)) = car else {
            continue;
        };

        if let Some(force) =
            resolve_vehicle_contact(&mut crate_state, vehicle, vehicle_config.radius, &config)
        {
            if force > config.impact_threshold {
                debug!("crate {} hit with force {:.1}", crate_state.id, force);
                writer.write(VehicleAudioMessage::CrateHit { strength: force });
            }
        }
    }
}

/// Copies crate state onto transforms
pub fn sync_crate_transforms(mut query: Query<(&CrateState, &mut Transform), Changed<CrateState>>) {
    for (crate_state, mut transform) in &mut query {
        transform.translation = crate_state.position;
        transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            crate_state.rotation.x,
            crate_state.rotation.y,
            crate_state.rotation.z,
        );
    }
}
