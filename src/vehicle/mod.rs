mod audio;
pub mod input;
mod movement;
mod plugin;
mod state;

pub use audio::VehicleAudioMessage;
pub use input::{DriveControls, DriveInput};
pub use movement::{step_vehicle, StepOutcome};
pub use plugin::VehiclePlugin;
pub use state::*;
