use std::env;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Where and how to reach the media service
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub video_model: String,
    pub image_model: String,
    /// Wait between operation status checks
    pub poll_interval: Duration,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Directory downloaded videos are written to
    pub output_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            video_model: "veo-3.1-fast-generate-preview".into(),
            image_model: "gemini-2.5-flash-image".into(),
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            output_dir: env::temp_dir().join("folio_drive"),
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `FOLIO_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("FOLIO_GATEWAY_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("FOLIO_VIDEO_MODEL") {
            config.video_model = model;
        }
        if let Ok(model) = env::var("FOLIO_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(secs) = env::var("FOLIO_POLL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Ok(dir) = env::var("FOLIO_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config
    }
}

/// API key shared between the UI (which can set it) and the gateway (which reads it)
#[derive(Debug, Clone, Default)]
pub struct CredentialStore(Arc<RwLock<Option<String>>>);

impl CredentialStore {
    pub fn new(key: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(key.filter(|k| !k.trim().is_empty()))))
    }

    /// Reads `FOLIO_API_KEY`, falling back to `GEMINI_API_KEY`
    pub fn from_env() -> Self {
        Self::new(
            env::var("FOLIO_API_KEY")
                .or_else(|_| env::var("GEMINI_API_KEY"))
                .ok(),
        )
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().ok().and_then(|key| key.clone())
    }

    pub fn set(&self, key: impl Into<String>) {
        let key = key.into();
        if let Ok(mut slot) = self.0.write() {
            *slot = Some(key.trim().to_string()).filter(|k| !k.is_empty());
        }
    }
}
