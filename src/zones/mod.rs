mod plugin;
mod trigger;

pub use plugin::ZonesPlugin;
pub use trigger::*;
