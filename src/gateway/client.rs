use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::wire::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, Operation,
    PredictLongRunningRequest,
};
use super::{
    CredentialStore, GatewayConfig, GatewayError, ImageEditRequest, MediaGateway, MediaHandle,
    VideoRequest,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const STALE_KEY_MARKER: &str = "Requested entity was not found";

/// Blocking HTTP client for the generative media REST API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    config: GatewayConfig,
    credentials: CredentialStore,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig, credentials: CredentialStore) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    fn api_key(&self) -> Result<String, GatewayError> {
        self.credentials.get().ok_or(GatewayError::MissingCredential)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url, model, method)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = check_status(request.send()?)?;
        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn poll_operation(&self, mut operation: Operation, key: &str) -> Result<Operation, GatewayError> {
        let url = format!("{}/{}", self.config.base_url, operation.name);
        let mut polls = 0u32;

        while !operation.done {
            thread::sleep(self.config.poll_interval);
            polls += 1;
            operation = self.send(self.http.get(&url).header(API_KEY_HEADER, key))?;
            debug!(name = %operation.name, polls, done = operation.done, "polled video operation");
        }

        Ok(operation)
    }

    fn download(&self, uri: &str, key: &str) -> Result<PathBuf, GatewayError> {
        let response = self.http.get(uri).header(API_KEY_HEADER, key).send()?;
        if !response.status().is_success() {
            return Err(GatewayError::Download(response.status().as_u16()));
        }
        let bytes = response.bytes()?;

        fs::create_dir_all(&self.config.output_dir)?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let path = self.config.output_dir.join(format!("video-{millis}.mp4"));
        fs::write(&path, &bytes)?;

        info!(path = %path.display(), size = bytes.len(), "saved generated video");
        Ok(path)
    }
}

impl MediaGateway for HttpGateway {
    #[instrument(skip_all, fields(model = %self.config.video_model, aspect = request.aspect.as_str()))]
    fn generate_video(&self, request: &VideoRequest) -> Result<MediaHandle, GatewayError> {
        let key = self.api_key()?;
        let body = PredictLongRunningRequest::video(request);

        let started: Operation = self.send(
            self.http
                .post(self.model_url(&self.config.video_model, "predictLongRunning"))
                .header(API_KEY_HEADER, &key)
                .json(&body),
        )?;
        info!(name = %started.name, "video operation started");

        let finished = self.poll_operation(started, &key)?;
        if let Some(error) = finished.error {
            warn!(message = %error.message, "video operation failed");
            return Err(GatewayError::Operation(error.message));
        }

        let uri = finished.video_uri().ok_or(GatewayError::MissingVideo)?;
        let path = self.download(uri, &key)?;
        Ok(MediaHandle::Video { path })
    }

    #[instrument(skip_all, fields(model = %self.config.image_model))]
    fn edit_image(&self, request: &ImageEditRequest) -> Result<MediaHandle, GatewayError> {
        let key = self.api_key()?;
        let body = GenerateContentRequest::image_edit(request);

        let response: GenerateContentResponse = self.send(
            self.http
                .post(self.model_url(&self.config.image_model, "generateContent"))
                .header(API_KEY_HEADER, &key)
                .json(&body),
        )?;

        let blob = response.first_image().ok_or(GatewayError::MissingImage)?;
        let payload = blob.decode()?;
        info!(mime = %payload.mime_type, size = payload.bytes.len(), "received edited image");
        Ok(MediaHandle::Image(payload))
    }
}

fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    Err(classify_failure(status, message))
}

fn classify_failure(status: StatusCode, message: String) -> GatewayError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || message.contains(STALE_KEY_MARKER)
    {
        GatewayError::InvalidCredential(message)
    } else {
        GatewayError::Service {
            status: status.as_u16(),
            message,
        }
    }
}
