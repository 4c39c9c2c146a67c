use bevy::prelude::*;

use super::trigger::*;
use crate::section::{ActiveSection, SectionEntered};

/// Plugin for proximity zones and the interact key
pub struct ZonesPlugin;

impl Plugin for ZonesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoneSettings>()
            .init_resource::<TriggerZones>()
            .add_message::<SectionEntered>();

        app.add_systems(
            Update,
            (
                update_zone_activity,
                enter_nearest_zone.run_if(in_state(ActiveSection::Home)),
            )
                .chain(),
        );
    }
}
