use std::fs;
use std::path::Path;

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy::window::FileDragAndDrop;

use super::studio::{Credentials, GenerationState, StudioSession, SubmitGeneration};
use crate::gateway::{ImageInput, MediaPayload};

const MAX_TEXT_CHARS: usize = 400;

/// Routes typed characters into the open studio form
pub fn type_into_session(
    mut keys: MessageReader<KeyboardInput>,
    mut sessions: Query<(Entity, &mut StudioSession)>,
    credentials: Res<Credentials>,
    mut submit: MessageWriter<SubmitGeneration>,
) {
    let Ok((entity, mut session)) = sessions.single_mut() else {
        keys.clear();
        return;
    };

    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        match &event.logical_key {
            Key::Enter if session.state == GenerationState::NeedsCredential => {
                if session.save_key(&credentials.0) {
                    info!("API key updated");
                }
            }
            Key::Enter => {
                submit.write(SubmitGeneration { session: entity });
            }
            Key::Backspace => {
                if let Some(text) = session.focused_text() {
                    text.pop();
                }
            }
            Key::Space => push_text(&mut session, " "),
            Key::Character(chars) => push_text(&mut session, chars),
            _ => {}
        }
    }
}

fn push_text(session: &mut StudioSession, chars: &str) {
    let Some(text) = session.focused_text() else {
        return;
    };
    for c in chars.chars().filter(|c| !c.is_control()) {
        if text.chars().count() >= MAX_TEXT_CHARS {
            break;
        }
        text.push(c);
    }
}

/// Uses a file dropped on the window as the studio's source image
pub fn load_dropped_image(
    mut drops: MessageReader<FileDragAndDrop>,
    mut sessions: Query<&mut StudioSession>,
) {
    for drop in drops.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = drop else {
            continue;
        };
        let Ok(mut session) = sessions.single_mut() else {
            continue;
        };
        if session.is_generating() {
            continue;
        }

        match read_image(path_buf) {
            Ok(image) => {
                info!(name = %image.name, size = image.payload.bytes.len(), "source image selected");
                session.set_source(image);
            }
            Err(message) => {
                warn!("{message}");
                session.state = GenerationState::Failed(message);
            }
        }
    }
}

/// Loads an image file, typing it by extension.
pub fn read_image(path: &Path) -> Result<ImageInput, String> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageInput::mime_for_extension)
        .ok_or_else(|| format!("{name} is not a PNG, JPEG or WebP image."))?;
    let bytes = fs::read(path).map_err(|err| format!("Could not read {name}: {err}"))?;

    Ok(ImageInput {
        name,
        payload: MediaPayload::new(mime, bytes),
    })
}
