//! JSON shapes exchanged with the media service.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{ImageEditRequest, MediaPayload, VideoRequest};

/// Inline binary data as carried by `generateContent`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<&'static str>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Image first, then the instruction
    pub fn image_edit(request: &ImageEditRequest) -> Self {
        let image = &request.image.payload;
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(Blob {
                            mime_type: image.mime_type.clone(),
                            data: STANDARD.encode(&image.bytes),
                        }),
                        ..Default::default()
                    },
                    Part {
                        text: Some(request.prompt.clone()),
                        ..Default::default()
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First inline image across all candidates
    pub fn first_image(&self) -> Option<&Blob> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .find(|blob| blob.mime_type.starts_with("image/"))
    }
}

impl Blob {
    pub fn decode(&self) -> Result<MediaPayload, base64::DecodeError> {
        Ok(MediaPayload::new(self.mime_type.clone(), STANDARD.decode(&self.data)?))
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

#[derive(Serialize, Debug)]
pub struct VideoInstance {
    pub prompt: String,
    pub image: InlineImage,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    pub aspect_ratio: &'static str,
}

#[derive(Serialize, Debug)]
pub struct PredictLongRunningRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}

impl PredictLongRunningRequest {
    pub fn video(request: &VideoRequest) -> Self {
        let image = &request.image.payload;
        Self {
            instances: vec![VideoInstance {
                prompt: request.prompt.clone(),
                image: InlineImage {
                    bytes_base64_encoded: STANDARD.encode(&image.bytes),
                    mime_type: image.mime_type.clone(),
                },
            }],
            parameters: VideoParameters {
                aspect_ratio: request.aspect.as_str(),
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct OperationError {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// A long-running job handle
#[derive(Deserialize, Debug, Default)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

impl Operation {
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .iter()
            .find_map(|sample| sample.video.as_ref()?.uri.as_deref())
    }
}

/// Error envelope returned with non-success statuses
#[derive(Deserialize, Debug, Default)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: OperationError,
}
