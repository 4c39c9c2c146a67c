use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bevy::prelude::*;
use folio_drive::gateway::{
    GatewayError, ImageEditRequest, ImageInput, MediaGateway, MediaHandle, MediaPayload,
    VideoRequest,
};
use folio_drive::ui::{
    Gateway, GenerationPlugin, GenerationState, PendingGeneration, ShownImages, StudioImage,
    StudioKind, StudioSession, SubmitGeneration, poll_generation, refresh_studio_view,
};

/// A single opaque red pixel
const RED_PIXEL_PNG: [u8; 70] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xf8, 0xcf, 0xc0, 0xf0,
    0x1f, 0x00, 0x05, 0x00, 0x01, 0xff, 0x56, 0xc7, 0x2f, 0x0d, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Answers image edits with a fixed payload; video calls sleep then fail
struct StubGateway {
    payload: MediaPayload,
    fail_with_missing_key: bool,
    video_delay: Duration,
}

impl StubGateway {
    fn answering(payload: MediaPayload) -> Self {
        Self {
            payload,
            fail_with_missing_key: false,
            video_delay: Duration::ZERO,
        }
    }
}

impl MediaGateway for StubGateway {
    fn generate_video(&self, _request: &VideoRequest) -> Result<MediaHandle, GatewayError> {
        thread::sleep(self.video_delay);
        Err(GatewayError::MissingVideo)
    }

    fn edit_image(&self, request: &ImageEditRequest) -> Result<MediaHandle, GatewayError> {
        if self.fail_with_missing_key {
            return Err(GatewayError::MissingCredential);
        }
        if request.prompt != "remove the background" {
            return Err(GatewayError::Operation(format!("unexpected prompt {}", request.prompt)));
        }
        Ok(MediaHandle::Image(self.payload.clone()))
    }
}

fn stub_payload() -> MediaPayload {
    MediaPayload::new("image/png", RED_PIXEL_PNG.to_vec())
}

fn app_with(gateway: StubGateway) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, GenerationPlugin))
        .insert_resource(Gateway(Arc::new(gateway)));
    app
}

fn spawn_session(app: &mut App, kind: StudioKind) -> Entity {
    let mut session = StudioSession::new(kind);
    session.prompt = "remove the background".into();
    session.set_source(ImageInput {
        name: "portrait.png".into(),
        payload: MediaPayload::new("image/png", vec![7; 16]),
    });
    app.world_mut().spawn(session).id()
}

fn run_until_settled(app: &mut App, session: Entity) -> StudioSession {
    for _ in 0..400 {
        app.update();
        let world = app.world();
        let current = world.get::<StudioSession>(session).unwrap();
        if !current.is_generating() && world.get::<PendingGeneration>(session).is_none() {
            return current.clone();
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("generation never finished");
}

#[test]
fn edit_image_shows_the_returned_payload() {
    let mut app = app_with(StubGateway::answering(stub_payload()));
    app.init_resource::<Assets<Image>>()
        .add_systems(Update, refresh_studio_view.after(poll_generation));

    let session = spawn_session(&mut app, StudioKind::Image);
    app.world_mut().entity_mut(session).insert(ShownImages::default());
    let slot = app
        .world_mut()
        .spawn((
            StudioImage::Result,
            ImageNode::default(),
            Node {
                display: Display::None,
                ..default()
            },
        ))
        .id();

    app.world_mut().write_message(SubmitGeneration { session });
    let settled = run_until_settled(&mut app, session);
    assert!(!settled.is_generating());
    assert_eq!(settled.result(), Some(&MediaHandle::Image(stub_payload())));

    let world = app.world();
    assert_eq!(world.get::<Node>(slot).unwrap().display, Display::Flex);
    let handle = &world.get::<ImageNode>(slot).unwrap().image;
    assert_ne!(*handle, Handle::default());
    assert!(world.resource::<Assets<Image>>().get(handle).is_some());
}

#[test]
fn missing_key_switches_to_the_key_prompt() {
    let mut app = app_with(StubGateway {
        fail_with_missing_key: true,
        ..StubGateway::answering(stub_payload())
    });
    let session = spawn_session(&mut app, StudioKind::Image);

    app.world_mut().write_message(SubmitGeneration { session });
    let settled = run_until_settled(&mut app, session);

    assert_eq!(settled.state, GenerationState::NeedsCredential);
    assert!(settled.result().is_none());
}

#[test]
fn incomplete_form_never_reaches_the_gateway() {
    let mut app = app_with(StubGateway::answering(stub_payload()));
    let session = app
        .world_mut()
        .spawn(StudioSession::new(StudioKind::Image))
        .id();

    app.world_mut().write_message(SubmitGeneration { session });
    app.update();

    let world = app.world();
    assert!(world.get::<PendingGeneration>(session).is_none());
    assert!(matches!(
        world.get::<StudioSession>(session).unwrap().state,
        GenerationState::Failed(_)
    ));
}

#[test]
fn slow_video_does_not_hold_up_an_image_edit() {
    let video_delay = Duration::from_secs(3);
    let mut app = app_with(StubGateway {
        video_delay,
        ..StubGateway::answering(stub_payload())
    });

    // Start a long video job, then close its panel while it runs
    let video = spawn_session(&mut app, StudioKind::Video);
    app.world_mut().write_message(SubmitGeneration { session: video });
    app.update();
    assert!(app.world().get::<PendingGeneration>(video).is_some());
    app.world_mut().despawn(video);

    let started = Instant::now();
    let image = spawn_session(&mut app, StudioKind::Image);
    app.world_mut().write_message(SubmitGeneration { session: image });
    let settled = run_until_settled(&mut app, image);

    assert_eq!(settled.result(), Some(&MediaHandle::Image(stub_payload())));
    assert!(started.elapsed() < video_delay);
}
