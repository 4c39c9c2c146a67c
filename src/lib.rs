pub mod audio;
pub mod camera;
pub mod gateway;
pub mod props;
pub mod scene;
pub mod section;
pub mod ui;
pub mod vehicle;
pub mod zones;

pub use audio::SynthPlugin;
pub use camera::CameraPlugin;
pub use props::PropsPlugin;
pub use scene::ScenePlugin;
pub use section::SectionPlugin;
pub use ui::UiPlugin;
pub use vehicle::VehiclePlugin;
pub use zones::ZonesPlugin;

use bevy::prelude::*;

/// Unified plugin that adds the drivable scene, its audio, and the overlay UI.
///
/// Insert a [`ui::Gateway`] resource to enable the studio panels; without one
/// a submitted request fails with a message instead of calling out.
pub struct FolioDrivePlugin;

impl Plugin for FolioDrivePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<SectionPlugin>() {
            app.add_plugins(SectionPlugin);
        }
        if !app.is_plugin_added::<VehiclePlugin>() {
            app.add_plugins(VehiclePlugin);
        }
        if !app.is_plugin_added::<PropsPlugin>() {
            app.add_plugins(PropsPlugin);
        }
        if !app.is_plugin_added::<ZonesPlugin>() {
            app.add_plugins(ZonesPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
        if !app.is_plugin_added::<SynthPlugin>() {
            app.add_plugins(SynthPlugin);
        }
        if !app.is_plugin_added::<ScenePlugin>() {
            app.add_plugins(ScenePlugin);
        }
        if !app.is_plugin_added::<UiPlugin>() {
            app.add_plugins(UiPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::audio::{EngineParams, ImpactParams, SynthConfig, SynthOutput, SynthPlugin};
    pub use crate::camera::{CameraPlugin, ChaseCamera};
    pub use crate::gateway::{
        CredentialStore, GatewayConfig, GatewayError, HttpGateway, MediaGateway, MediaHandle,
    };
    pub use crate::props::{CrateConfig, CrateState, PropsPlugin};
    pub use crate::section::{ActiveSection, Section, SectionClosed, SectionEntered, SectionPlugin};
    pub use crate::ui::{Credentials, Gateway, StudioSession, UiPlugin};
    pub use crate::vehicle::{
        Car, DriveInput, ResetMode, VehicleAudioMessage, VehicleConfig, VehiclePlugin,
        VehicleState,
    };
    pub use crate::zones::{TriggerZone, TriggerZones, ZonesPlugin};
    pub use crate::FolioDrivePlugin;
}
