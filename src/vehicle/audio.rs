use bevy::prelude::*;

/// Audio event messages emitted by the vehicle and the props it hits.
///
/// Consumers subscribe with `MessageReader<VehicleAudioMessage>` to trigger
/// impact sounds or other feedback.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum VehicleAudioMessage {
    /// Car pushed a crate; strength is the impulse handed to it
    CrateHit { strength: f32 },
    /// Car bounced off the edge of the drivable area
    WallHit { strength: f32 },
}

impl VehicleAudioMessage {
    pub fn strength(&self) -> f32 {
        match self {
            Self::CrateHit { strength } | Self::WallHit { strength } => *strength,
        }
    }
}
