mod crates;
mod layout;
mod plugin;

pub use crates::*;
pub use layout::CrateLayout;
pub use plugin::PropsPlugin;
