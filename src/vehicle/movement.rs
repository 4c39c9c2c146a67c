use bevy::prelude::*;

use super::audio::VehicleAudioMessage;
use super::input::{DriveControls, DriveInput};
use super::state::*;

/// What a single integration step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Car was put back at the origin and nothing else ran
    Reset,
    /// Normal integration; `bounced` is set when a bound was hit
    Moved { bounced: bool },
}

/// Advances the car by one step of explicit Euler integration.
pub fn step_vehicle(
    state: &mut VehicleState,
    controls: &DriveControls,
    config: &VehicleConfig,
    dt: f32,
) -> StepOutcome {
    if controls.reset {
        state.velocity = Vec3::ZERO;
        state.position = config.origin;
        state.heading = 0.0;
        state.braking = false;
        return StepOutcome::Reset;
    }

    let accel = if controls.throttle > 0.0 {
        if controls.boost {
            config.boost_accel
        } else {
            config.forward_accel
        }
    } else if controls.throttle < 0.0 {
        config.reverse_accel
    } else {
        0.0
    };

    let push = -controls.throttle * accel * dt;
    state.velocity.x += state.heading.sin() * push;
    state.velocity.z += state.heading.cos() * push;

    state.heading += controls.steer * config.turn_rate * dt;
    state.braking = controls.throttle < 0.0;

    state.position += state.velocity * dt;

    let mut bounced = false;
    bounced |= reflect_axis(&mut state.position.x, &mut state.velocity.x, config);
    bounced |= reflect_axis(&mut state.position.z, &mut state.velocity.z, config);

    state.velocity *= config.friction;

    StepOutcome::Moved { bounced }
}

/// Clamps one planar axis to the bound and reflects its velocity.
fn reflect_axis(position: &mut f32, velocity: &mut f32, config: &VehicleConfig) -> bool {
    if position.abs() <= config.bound {
        return false;
    }
    *position = position.clamp(-config.bound, config.bound);
    *velocity = -*velocity * config.restitution;
    true
}

/// Below this speed a wall contact is too soft to be heard
const WALL_HIT_MIN_SPEED: f32 = 2.0;

/// Integrates input into the car state
pub fn drive_vehicle(
    mut query: Query<(&mut DriveInput, &VehicleConfig, &mut VehicleState), With<Car>>,
    mut writer: MessageWriter<VehicleAudioMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut input, config, mut state) in &mut query {
        let controls = input.controls(config.reset_mode);
        input.reset_pressed = false;

        let speed_before = state.speed();
        match step_vehicle(&mut state, &controls, config, dt) {
            StepOutcome::Reset => debug!("vehicle reset to {:?}", config.origin),
            StepOutcome::Moved { bounced: true } => {
                trace!("vehicle bounced off bound at {:?}", state.position);
                if speed_before > WALL_HIT_MIN_SPEED {
                    writer.write(VehicleAudioMessage::WallHit {
                        strength: speed_before,
                    });
                }
            }
            StepOutcome::Moved { bounced: false } => {}
        }
    }
}

/// Copies the car state onto its transform
pub fn sync_vehicle_transform(mut query: Query<(&VehicleState, &mut Transform), With<Car>>) {
    for (state, mut transform) in &mut query {
        transform.translation = state.position;
        transform.rotation = Quat::from_rotation_y(state.heading);
    }
}

/// Swaps brake light materials when the braking flag flips
pub fn update_brake_lights(
    car_query: Query<&VehicleState, (With<Car>, Changed<VehicleState>)>,
    mut light_query: Query<&mut MeshMaterial3d<StandardMaterial>, With<BrakeLight>>,
    materials: Option<Res<BrakeLightMaterials>>,
) {
    let (Ok(state), Some(materials)) = (car_query.single(), materials) else {
        return;
    };

    let wanted = if state.braking {
        &materials.lit
    } else {
        &materials.idle
    };

    for mut material in &mut light_query {
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 64.0;

    fn throttle(value: f32) -> DriveControls {
        DriveControls {
            throttle: value,
            ..Default::default()
        }
    }

    #[test]
    fn reset_returns_to_origin_and_skips_integration() {
        let config = VehicleConfig {
            origin: Vec3::new(1.0, 0.0, 2.0),
            ..Default::default()
        };
        let mut state = VehicleState {
            position: Vec3::new(10.0, 0.0, -4.0),
            velocity: Vec3::new(3.0, 0.0, 5.0),
            heading: 1.2,
            braking: true,
        };
        let controls = DriveControls {
            throttle: 1.0,
            steer: 1.0,
            reset: true,
            ..Default::default()
        };

        let outcome = step_vehicle(&mut state, &controls, &config, DT);

        assert_eq!(outcome, StepOutcome::Reset);
        assert_eq!(state.position, config.origin);
        assert_eq!(state.velocity, Vec3::ZERO);
        assert_eq!(state.heading, 0.0);
        assert!(!state.braking);
    }

    #[test]
    fn forward_throttle_moves_along_negative_z_at_zero_heading() {
        let config = VehicleConfig::default();
        let mut state = VehicleState::default();

        step_vehicle(&mut state, &throttle(1.0), &config, DT);

        let expected = config.forward_accel * DT * config.friction;
        assert!(state.velocity.x.abs() < 1e-6);
        assert!((state.velocity.z + expected).abs() < 1e-5);
        assert!(state.position.z < 0.0);
        assert!(!state.braking);
    }

    #[test]
    fn boost_uses_larger_acceleration() {
        let config = VehicleConfig::default();
        let mut plain = VehicleState::default();
        let mut boosted = VehicleState::default();
        let boost = DriveControls {
            throttle: 1.0,
            boost: true,
            ..Default::default()
        };

        step_vehicle(&mut plain, &throttle(1.0), &config, DT);
        step_vehicle(&mut boosted, &boost, &config, DT);

        let ratio = boosted.speed() / plain.speed();
        assert!((ratio - config.boost_accel / config.forward_accel).abs() < 1e-4);
    }

    #[test]
    fn reverse_sets_braking_and_ignores_boost() {
        let config = VehicleConfig::default();
        let mut state = VehicleState::default();
        let controls = DriveControls {
            throttle: -1.0,
            boost: true,
            ..Default::default()
        };

        step_vehicle(&mut state, &controls, &config, DT);

        assert!(state.braking);
        let expected = config.reverse_accel * DT * config.friction;
        assert!((state.velocity.z - expected).abs() < 1e-5);
    }

    #[test]
    fn steering_turns_without_throttle() {
        let config = VehicleConfig::default();
        let mut state = VehicleState::default();
        let left = DriveControls {
            steer: 1.0,
            ..Default::default()
        };

        step_vehicle(&mut state, &left, &config, DT);

        assert!((state.heading - config.turn_rate * DT).abs() < 1e-6);
        assert_eq!(state.velocity, Vec3::ZERO);
    }

    #[test]
    fn speed_decays_geometrically_without_input() {
        let config = VehicleConfig::default();
        let mut state = VehicleState {
            velocity: Vec3::new(4.0, 0.0, -7.0),
            ..Default::default()
        };
        let initial = state.speed();
        let idle = DriveControls::default();

        let mut previous = initial;
        for n in 1..=120 {
            step_vehicle(&mut state, &idle, &config, DT);
            let speed = state.speed();
            let expected = initial * config.friction.powi(n);
            assert!(speed < previous);
            assert!((speed - expected).abs() <= expected * 1e-4 + 1e-6);
            previous = speed;
        }
    }

    #[test]
    fn bound_clamps_position_and_halves_reflected_velocity() {
        let config = VehicleConfig {
            friction: 1.0,
            ..Default::default()
        };
        let mut state = VehicleState {
            position: Vec3::new(config.bound - 0.1, 0.0, -(config.bound - 0.1)),
            velocity: Vec3::new(20.0, 0.0, -12.0),
            ..Default::default()
        };

        let outcome = step_vehicle(&mut state, &DriveControls::default(), &config, 0.1);

        assert_eq!(outcome, StepOutcome::Moved { bounced: true });
        assert_eq!(state.position.x, config.bound);
        assert_eq!(state.position.z, -config.bound);
        assert_eq!(state.velocity.x, -10.0);
        assert_eq!(state.velocity.z, 6.0);
    }

    #[test]
    fn friction_applies_after_bounce() {
        let config = VehicleConfig::default();
        let mut state = VehicleState {
            position: Vec3::new(-(config.bound - 0.05), 0.0, 0.0),
            velocity: Vec3::new(-8.0, 0.0, 0.0),
            ..Default::default()
        };

        step_vehicle(&mut state, &DriveControls::default(), &config, 0.1);

        assert!(state.position.x >= -config.bound);
        assert!((state.velocity.x - 4.0 * config.friction).abs() < 1e-5);
    }
}
