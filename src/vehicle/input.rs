use bevy::ecs::observer::On;
use bevy::prelude::{Component, EntityEvent, Query};
use bevy_enhanced_input::prelude::*;

use super::state::ResetMode;

/// Drive forward (W / Up)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct AccelerateAction;

/// Brake and reverse (S / Down)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ReverseAction;

/// Steer left (A / Left)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SteerLeftAction;

/// Steer right (D / Right)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SteerRightAction;

/// Boost modifier (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct BoostAction;

/// Return to the spawn point
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct ResetAction;

/// Enter the zone the car is parked in
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct InteractAction;

/// Keys currently held, plus edge flags that consumers clear once handled.
#[derive(Component, Default, Debug, Clone)]
pub struct DriveInput {
    pub accelerate: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub boost: bool,
    pub reset_held: bool,
    /// Set on the frame reset went down
    pub reset_pressed: bool,
    /// Set on the frame interact went down
    pub interact_pressed: bool,
}

/// Per-step control values derived from [`DriveInput`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveControls {
    /// +1 forward, -1 reverse, 0 when neither or both are held
    pub throttle: f32,
    /// +1 left, -1 right
    pub steer: f32,
    pub boost: bool,
    pub reset: bool,
}

impl DriveInput {
    pub fn controls(&self, reset_mode: ResetMode) -> DriveControls {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        DriveControls {
            throttle: axis(self.accelerate, self.reverse),
            steer: axis(self.steer_left, self.steer_right),
            boost: self.boost,
            reset: match reset_mode {
                ResetMode::Held => self.reset_held,
                ResetMode::OnPress => self.reset_pressed,
            },
        }
    }

    /// Drops pending press edges, keeping held keys.
    pub fn clear_edges(&mut self) {
        self.reset_pressed = false;
        self.interact_pressed = false;
    }
}

/// An action whose held state maps onto one flag of [`DriveInput`].
pub trait HeldControl: InputAction {
    fn flag(input: &mut DriveInput) -> &mut bool;
}

impl HeldControl for AccelerateAction {
    fn flag(input: &mut DriveInput) -> &mut bool {
        &mut input.accelerate
    }
}

impl HeldControl for ReverseAction {
    fn flag(input: &mut DriveInput) -> &mut bool {
        &mut input.reverse
    }
}

impl HeldControl for SteerLeftAction {
    fn flag(input: &mut DriveInput) -> &mut bool {
        &mut input.steer_left
    }
}

impl HeldControl for SteerRightAction {
    fn flag(input: &mut DriveInput) -> &mut bool {
        &mut input.steer_right
    }
}

impl HeldControl for BoostAction {
    fn flag(input: &mut DriveInput) -> &mut bool {
        &mut input.boost
    }
}

/// Marks a held control as down
pub fn handle_hold_start<A: HeldControl>(trigger: On<Start<A>>, mut query: Query<&mut DriveInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        *A::flag(&mut input) = true;
    }
}

/// Marks a held control as released
pub fn handle_hold_end<A: HeldControl>(trigger: On<Complete<A>>, mut query: Query<&mut DriveInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        *A::flag(&mut input) = false;
    }
}

/// Handle reset press
pub fn handle_reset_start(trigger: On<Start<ResetAction>>, mut query: Query<&mut DriveInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.reset_held = true;
        input.reset_pressed = true;
    }
}

/// Handle reset release
pub fn handle_reset_end(trigger: On<Complete<ResetAction>>, mut query: Query<&mut DriveInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.reset_held = false;
    }
}

/// Handle interact press
pub fn handle_interact_start(trigger: On<Start<InteractAction>>, mut query: Query<&mut DriveInput>) {
    if let Ok(mut input) = query.get_mut(trigger.event_target()) {
        input.interact_pressed = true;
    }
}

/// Drops presses that arrived while the car was not listening, e.g. typing into an overlay
pub fn clear_drive_edges(mut query: Query<&mut DriveInput>) {
    for mut input in &mut query {
        input.clear_edges();
    }
}
