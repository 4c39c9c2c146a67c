use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No API key is configured. Select a key to continue.")]
    MissingCredential,

    #[error("The API key was rejected: {0}")]
    InvalidCredential(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Video generation failed: {0}")]
    Operation(String),

    #[error("Video generation finished but no video link was returned")]
    MissingVideo,

    #[error("Failed to download the generated video (status {0})")]
    Download(u16),

    #[error("No image was returned by the model")]
    MissingImage,

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Could not save the video: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// True when the user should be asked for a (new) API key
    pub fn needs_credential(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingCredential | GatewayError::InvalidCredential(_)
        )
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for GatewayError {
    fn from(err: base64::DecodeError) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
