//! Boundary to the generative media service.
//!
//! Two operations are exposed through [`MediaGateway`]: turning a still
//! image into a short video, and editing an image from a text instruction.
//! Calls block the calling thread; the UI gives each request its own worker
//! thread so the scene keeps rendering while it is in flight.

mod client;
mod config;
mod error;
pub mod wire;

use std::path::PathBuf;

pub use client::HttpGateway;
pub use config::{CredentialStore, GatewayConfig};
pub use error::GatewayError;

/// Raw media bytes plus their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaPayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// An image the user supplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// File name shown back to the user
    pub name: String,
    pub payload: MediaPayload,
}

impl ImageInput {
    /// Guesses the MIME type from a file extension.
    pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Output framing for generated video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AspectRatio::Landscape => AspectRatio::Portrait,
            AspectRatio::Portrait => AspectRatio::Landscape,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub image: ImageInput,
    pub prompt: String,
    pub aspect: AspectRatio,
}

#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    pub image: ImageInput,
    pub prompt: String,
}

/// Something the UI can show or play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaHandle {
    /// Video written to disk
    Video { path: PathBuf },
    /// Image returned inline
    Image(MediaPayload),
}

/// Generative media backend
pub trait MediaGateway: Send + Sync + 'static {
    /// Animates `request.image`, waiting for the long-running job to finish.
    fn generate_video(&self, request: &VideoRequest) -> Result<MediaHandle, GatewayError>;

    /// Applies a text instruction to `request.image`.
    fn edit_image(&self, request: &ImageEditRequest) -> Result<MediaHandle, GatewayError>;
}
