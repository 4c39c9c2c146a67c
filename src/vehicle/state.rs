use bevy::prelude::*;

/// Marker component for the car entity (also used as input context)
#[derive(Component, Default)]
pub struct Car;

/// How the reset key is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetMode {
    /// Reset every step while the key is down
    #[default]
    Held,
    /// Reset once per key press
    OnPress,
}

/// Vehicle handling configuration
#[derive(Component, Clone, Copy, Debug)]
pub struct VehicleConfig {
    /// Forward acceleration in m/s²
    pub forward_accel: f32,
    /// Forward acceleration while boost is held
    pub boost_accel: f32,
    /// Reverse acceleration
    pub reverse_accel: f32,
    /// Steering rate in rad/s
    pub turn_rate: f32,
    /// Half-width of the drivable square
    pub bound: f32,
    /// Fraction of wall-normal velocity kept after hitting the bound
    pub restitution: f32,
    /// Per-step velocity multiplier
    pub friction: f32,
    /// Collision radius used against props
    pub radius: f32,
    /// Where reset puts the car
    pub origin: Vec3,
    pub reset_mode: ResetMode,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            forward_accel: 30.0,
            boost_accel: 60.0,
            reverse_accel: 20.0,
            turn_rate: 2.5,
            bound: 45.0,
            restitution: 0.5,
            friction: 0.96,
            radius: 1.5,
            origin: Vec3::ZERO,
            reset_mode: ResetMode::Held,
        }
    }
}

/// Kinematic state of the car, advanced once per fixed step
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw in radians; 0 faces -Z
    pub heading: f32,
    /// True while reversing against the throttle
    pub braking: bool,
}

impl VehicleState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    /// Planar speed in m/s
    pub fn speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }

    /// Unit vector the nose points along
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.heading.sin(), 0.0, -self.heading.cos())
    }
}

/// Rear light mesh that lights up while braking
#[derive(Component)]
pub struct BrakeLight;

/// Materials swapped onto [`BrakeLight`] meshes
#[derive(Resource)]
pub struct BrakeLightMaterials {
    pub idle: Handle<StandardMaterial>,
    pub lit: Handle<StandardMaterial>,
}
