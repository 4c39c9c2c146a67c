use bevy::prelude::*;

use super::form_input::{load_dropped_image, type_into_session};
use super::hud::*;
use super::panels::*;
use super::studio::{GenerationPlugin, poll_generation, start_generation};
use crate::section::ActiveSection;

/// Plugin for the HUD and the overlay panels
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<GenerationPlugin>() {
            app.add_plugins(GenerationPlugin);
        }

        app.add_systems(Startup, spawn_hud);

        app.add_systems(
            Update,
            (
                (rebuild_overlay, toggle_hud).run_if(state_changed::<ActiveSection>),
                (update_zone_labels, update_interact_hint)
                    .run_if(in_state(ActiveSection::Home)),
                (
                    close_on_escape,
                    (type_into_session, load_dropped_image, handle_panel_buttons)
                        .before(start_generation),
                )
                    .run_if(not(in_state(ActiveSection::Home))),
                refresh_studio_view.after(poll_generation),
                update_button_colors,
            ),
        );
    }
}
