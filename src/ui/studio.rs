use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use bevy::prelude::*;

use crate::gateway::{
    AspectRatio, CredentialStore, GatewayError, ImageEditRequest, ImageInput, MediaGateway,
    MediaHandle, VideoRequest,
};

/// Which generator a studio panel drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioKind {
    Video,
    Image,
}

/// Lifecycle of one studio request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Succeeded(MediaHandle),
    /// Message shown verbatim; the form stays editable
    Failed(String),
    /// Waiting for the user to supply an API key
    NeedsCredential,
}

impl GenerationState {
    pub fn is_generating(&self) -> bool {
        matches!(self, GenerationState::Generating)
    }
}

/// Form state of an open studio panel
#[derive(Component, Debug, Clone)]
pub struct StudioSession {
    pub kind: StudioKind,
    pub prompt: String,
    pub source: Option<ImageInput>,
    pub aspect: AspectRatio,
    pub key_draft: String,
    pub state: GenerationState,
    /// Bumped on every accepted `set_source`
    pub source_revision: u64,
}

/// A validated request ready to hand to the gateway
#[derive(Debug, Clone)]
pub enum GenerationJob {
    Video(VideoRequest),
    Image(ImageEditRequest),
}

impl GenerationJob {
    pub fn run(&self, gateway: &dyn MediaGateway) -> Result<MediaHandle, GatewayError> {
        match self {
            GenerationJob::Video(request) => gateway.generate_video(request),
            GenerationJob::Image(request) => gateway.edit_image(request),
        }
    }
}

impl StudioSession {
    pub fn new(kind: StudioKind) -> Self {
        Self {
            kind,
            prompt: String::new(),
            source: None,
            aspect: AspectRatio::default(),
            key_draft: String::new(),
            state: GenerationState::Idle,
            source_revision: 0,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.state.is_generating()
    }

    /// The finished media, if the last request succeeded
    pub fn result(&self) -> Option<&MediaHandle> {
        match &self.state {
            GenerationState::Succeeded(handle) => Some(handle),
            _ => None,
        }
    }

    /// Text field that keyboard input currently edits
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.state {
            GenerationState::Generating => None,
            GenerationState::NeedsCredential => Some(&mut self.key_draft),
            _ => Some(&mut self.prompt),
        }
    }

    pub fn set_source(&mut self, image: ImageInput) {
        if self.is_generating() {
            return;
        }
        self.source = Some(image);
        self.source_revision += 1;
        if matches!(self.state, GenerationState::Failed(_)) {
            self.state = GenerationState::Idle;
        }
    }

    pub fn toggle_aspect(&mut self) {
        if self.kind == StudioKind::Video && !self.is_generating() {
            self.aspect = self.aspect.toggled();
        }
    }

    /// Validates the form and moves to `Generating`.
    ///
    /// On a validation failure the state becomes `Failed` and nothing is returned.
    pub fn begin(&mut self) -> Option<GenerationJob> {
        if self.is_generating() {
            return None;
        }

        let prompt = self.prompt.trim();
        let job = match (&self.source, prompt.is_empty()) {
            (None, _) => Err("Select an image first: drag one onto the window."),
            (Some(_), true) => Err("Enter a prompt first."),
            (Some(image), false) => Ok(match self.kind {
                StudioKind::Video => GenerationJob::Video(VideoRequest {
                    image: image.clone(),
                    prompt: prompt.to_string(),
                    aspect: self.aspect,
                }),
                StudioKind::Image => GenerationJob::Image(ImageEditRequest {
                    image: image.clone(),
                    prompt: prompt.to_string(),
                }),
            }),
        };

        match job {
            Ok(job) => {
                self.state = GenerationState::Generating;
                Some(job)
            }
            Err(message) => {
                self.state = GenerationState::Failed(message.to_string());
                None
            }
        }
    }

    pub fn finish(&mut self, result: Result<MediaHandle, GatewayError>) {
        self.state = match result {
            Ok(handle) => GenerationState::Succeeded(handle),
            Err(err) if err.needs_credential() => GenerationState::NeedsCredential,
            Err(err) => GenerationState::Failed(err.to_string()),
        };
    }

    /// Stores the typed key and returns to `Idle`. Blank drafts are ignored.
    pub fn save_key(&mut self, credentials: &CredentialStore) -> bool {
        if self.key_draft.trim().is_empty() {
            return false;
        }
        credentials.set(std::mem::take(&mut self.key_draft));
        self.state = GenerationState::Idle;
        true
    }
}

/// The media backend shared with background tasks
#[derive(Resource, Clone)]
pub struct Gateway(pub Arc<dyn MediaGateway>);

/// Key storage shared with the gateway
#[derive(Resource, Clone, Default)]
pub struct Credentials(pub CredentialStore);

/// Asks the session on `session` to submit its form
#[derive(Message, Debug, Clone, Copy)]
pub struct SubmitGeneration {
    pub session: Entity,
}

/// In-flight gateway call; the worker's result arrives on the channel.
/// Dropping it with its session entity discards the result.
#[derive(Component)]
pub struct PendingGeneration(Mutex<Receiver<Result<MediaHandle, GatewayError>>>);

/// Runs studio requests off the render loop
pub struct GenerationPlugin;

impl Plugin for GenerationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Credentials>()
            .add_message::<SubmitGeneration>()
            .add_systems(Update, (start_generation, poll_generation).chain());
    }
}

/// Gateway calls block until the request completes, video for minutes.
/// Each job gets its own thread.
fn spawn_worker(
    job: GenerationJob,
    gateway: Arc<dyn MediaGateway>,
) -> std::io::Result<PendingGeneration> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("studio-generation".into())
        .spawn(move || {
            // The receiver is gone when the panel closed mid-request
            let _ = tx.send(job.run(gateway.as_ref()));
        })?;
    Ok(PendingGeneration(Mutex::new(rx)))
}

pub fn start_generation(
    mut commands: Commands,
    mut submissions: MessageReader<SubmitGeneration>,
    gateway: Option<Res<Gateway>>,
    mut sessions: Query<&mut StudioSession, Without<PendingGeneration>>,
) {
    for submit in submissions.read() {
        let Ok(mut session) = sessions.get_mut(submit.session) else {
            continue;
        };
        let Some(job) = session.begin() else {
            continue;
        };
        let Some(gateway) = gateway.as_ref() else {
            warn!("no media gateway configured");
            session.state = GenerationState::Failed("No media service is configured.".into());
            continue;
        };

        info!(kind = ?session.kind, "submitting generation request");
        match spawn_worker(job, Arc::clone(&gateway.0)) {
            Ok(pending) => {
                commands.entity(submit.session).insert(pending);
            }
            Err(err) => {
                error!("could not start generation worker: {err}");
                session.state =
                    GenerationState::Failed(format!("Could not start the request: {err}"));
            }
        }
    }
}

pub fn poll_generation(
    mut commands: Commands,
    mut sessions: Query<(Entity, &mut StudioSession, &mut PendingGeneration)>,
) {
    for (entity, mut session, mut pending) in &mut sessions {
        let received = match pending.0.get_mut() {
            Ok(rx) => rx.try_recv(),
            Err(_) => Err(TryRecvError::Disconnected),
        };

        match received {
            Err(TryRecvError::Empty) => continue,
            Ok(result) => {
                match &result {
                    Ok(_) => info!(kind = ?session.kind, "generation finished"),
                    Err(err) => warn!(kind = ?session.kind, "generation failed: {err}"),
                }
                session.finish(result);
            }
            Err(TryRecvError::Disconnected) => {
                error!(kind = ?session.kind, "generation worker exited without a result");
                session.state =
                    GenerationState::Failed("The request stopped unexpectedly.".into());
            }
        }
        commands.entity(entity).remove::<PendingGeneration>();
    }
}
