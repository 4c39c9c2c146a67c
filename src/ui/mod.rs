//! Screen-space interface: HUD while driving, overlay panels otherwise.

pub mod content;
mod form_input;
mod hud;
mod panels;
mod plugin;
pub mod studio;

pub use form_input::read_image;
pub use panels::{OverlayRoot, PanelButton, ShownImages, StudioImage, refresh_studio_view};
pub use plugin::UiPlugin;
pub use studio::{
    Credentials, Gateway, GenerationJob, GenerationPlugin, GenerationState, PendingGeneration,
    StudioKind, StudioSession, SubmitGeneration, poll_generation,
};
