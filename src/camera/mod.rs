mod plugin;
mod rig;

pub use plugin::CameraPlugin;
pub use rig::*;
