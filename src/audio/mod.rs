mod plugin;
mod synth;
pub mod wave;

pub use plugin::{EngineHum, SynthOutput, SynthPlugin};
pub use synth::*;
