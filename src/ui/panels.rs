use std::ffi::OsStr;

use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageSampler, ImageType};
use bevy::prelude::*;

use super::content::{CONTACT_BLURB, CONTACT_LINKS, PROFILE, SKILLS};
use super::studio::{Credentials, GenerationState, StudioKind, StudioSession, SubmitGeneration};
use crate::gateway::{MediaHandle, MediaPayload};
use crate::section::{ActiveSection, Section, SectionClosed};

const BACKDROP: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);
const PANEL_BG: Color = Color::srgba(0.08, 0.09, 0.12, 0.96);
const BUTTON_IDLE: Color = Color::srgb(0.2, 0.24, 0.32);
const BUTTON_HOVER: Color = Color::srgb(0.28, 0.34, 0.46);
const BUTTON_PRESSED: Color = Color::srgb(0.36, 0.5, 0.7);
const MUTED: Color = Color::srgb(0.7, 0.72, 0.78);
const ERROR: Color = Color::srgb(1.0, 0.45, 0.4);

/// Root of the one overlay currently on screen
#[derive(Component)]
pub struct OverlayRoot;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    Close,
    Generate,
    ToggleAspect,
    SaveKey,
    OpenVideo,
    OpenLink(&'static str),
}

/// Studio text nodes rewritten from the session
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioText {
    Source,
    Prompt,
    Aspect,
    GenerateLabel,
    Status,
    KeyDraft,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioImage {
    Source,
    Result,
}

/// Studio nodes that only show in some states
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioReveal {
    KeyPrompt,
    OpenVideo,
}

/// What the studio image slots currently hold
#[derive(Component, Debug, Default)]
pub struct ShownImages {
    /// `StudioSession::source_revision` of the uploaded preview
    source: u64,
    result: bool,
}

fn label(text: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

fn spawn_button<'a>(
    parent: &'a mut ChildSpawnerCommands,
    text: impl Bundle,
    action: PanelButton,
) -> EntityCommands<'a> {
    let mut button = parent.spawn((Button, action, button_node(), BackgroundColor(BUTTON_IDLE)));
    button.with_children(|inner| {
        inner.spawn(text);
    });
    button
}

fn button_node() -> Node {
    Node {
        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn row() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        column_gap: Val::Px(10.0),
        align_items: AlignItems::Center,
        ..default()
    }
}

/// Despawns the old overlay and builds the one for the new state
pub fn rebuild_overlay(
    mut commands: Commands,
    state: Res<State<ActiveSection>>,
    roots: Query<Entity, With<OverlayRoot>>,
) {
    for root in &roots {
        commands.entity(root).despawn();
    }

    let Some(section) = state.get().section() else {
        return;
    };

    let mut root = commands.spawn((
        OverlayRoot,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BACKDROP),
        GlobalZIndex(10),
    ));

    match section {
        Section::VideoStudio => {
            root.insert((StudioSession::new(StudioKind::Video), ShownImages::default()));
        }
        Section::ImageStudio => {
            root.insert((StudioSession::new(StudioKind::Image), ShownImages::default()));
        }
        _ => {}
    }

    root.with_children(|backdrop| {
        backdrop
            .spawn((
                Node {
                    width: Val::Px(640.0),
                    max_height: Val::Percent(90.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(24.0)),
                    overflow: Overflow::clip_y(),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
            ))
            .with_children(|card| {
                card.spawn(Node {
                    justify_content: JustifyContent::SpaceBetween,
                    ..row()
                })
                .with_children(|header| {
                    header.spawn(label(section.title(), 30.0, Color::WHITE));
                    spawn_button(header, label("Close", 18.0, Color::WHITE), PanelButton::Close);
                });

                match section {
                    Section::About => about_body(card),
                    Section::Skills => skills_body(card),
                    Section::Contact => contact_body(card),
                    Section::VideoStudio => studio_body(card, StudioKind::Video),
                    Section::ImageStudio => studio_body(card, StudioKind::Image),
                }
            });
    });
}

fn about_body(card: &mut ChildSpawnerCommands) {
    card.spawn(label(PROFILE.name, 24.0, Color::WHITE));
    card.spawn(label(PROFILE.role, 18.0, MUTED));
    for paragraph in PROFILE.bio {
        card.spawn(label(*paragraph, 17.0, Color::WHITE));
    }
}

fn skills_body(card: &mut ChildSpawnerCommands) {
    for group in SKILLS {
        card.spawn(label(group.title, 20.0, Color::WHITE));
        card.spawn(label(group.items.join("  ·  "), 17.0, MUTED));
    }
}

fn contact_body(card: &mut ChildSpawnerCommands) {
    card.spawn(label(CONTACT_BLURB, 17.0, Color::WHITE));
    card.spawn(row()).with_children(|links| {
        for link in CONTACT_LINKS {
            spawn_button(
                links,
                label(link.label, 18.0, Color::WHITE),
                PanelButton::OpenLink(link.url),
            );
        }
    });
}

fn studio_body(card: &mut ChildSpawnerCommands, kind: StudioKind) {
    let intro = match kind {
        StudioKind::Video => "Turn a still image into a short video clip.",
        StudioKind::Image => "Describe a change and the image is edited for you.",
    };
    card.spawn(label(intro, 17.0, MUTED));

    card.spawn((label("", 16.0, Color::WHITE), StudioText::Source));
    card.spawn((
        StudioImage::Source,
        ImageNode::default(),
        Node {
            height: Val::Px(140.0),
            display: Display::None,
            ..default()
        },
    ));

    card.spawn((label("", 18.0, Color::WHITE), StudioText::Prompt));

    card.spawn(row()).with_children(|actions| {
        if kind == StudioKind::Video {
            spawn_button(
                actions,
                (label("", 18.0, Color::WHITE), StudioText::Aspect),
                PanelButton::ToggleAspect,
            );
        }
        spawn_button(
            actions,
            (label("", 18.0, Color::WHITE), StudioText::GenerateLabel),
            PanelButton::Generate,
        );
    });

    card.spawn((
        StudioReveal::KeyPrompt,
        Node {
            display: Display::None,
            ..row()
        },
    ))
    .with_children(|prompt| {
        prompt.spawn(label("API key:", 17.0, Color::WHITE));
        prompt.spawn((label("", 17.0, Color::WHITE), StudioText::KeyDraft));
        spawn_button(
            prompt,
            label("Save key", 18.0, Color::WHITE),
            PanelButton::SaveKey,
        );
    });

    card.spawn((label("", 16.0, MUTED), StudioText::Status));

    spawn_button(
        card,
        label("Open video", 18.0, Color::WHITE),
        PanelButton::OpenVideo,
    )
    .insert((
        StudioReveal::OpenVideo,
        Node {
            display: Display::None,
            ..button_node()
        },
    ));

    card.spawn((
        StudioImage::Result,
        ImageNode::default(),
        Node {
            height: Val::Px(280.0),
            display: Display::None,
            ..default()
        },
    ));
}

/// Escape closes whatever overlay is open
pub fn close_on_escape(keys: Res<ButtonInput<KeyCode>>, mut closed: MessageWriter<SectionClosed>) {
    if keys.just_pressed(KeyCode::Escape) {
        closed.write(SectionClosed);
    }
}

pub fn handle_panel_buttons(
    buttons: Query<(&PanelButton, &Interaction), Changed<Interaction>>,
    mut sessions: Query<(Entity, &mut StudioSession)>,
    credentials: Res<Credentials>,
    mut closed: MessageWriter<SectionClosed>,
    mut submit: MessageWriter<SubmitGeneration>,
) {
    for (button, interaction) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }

        if let PanelButton::Close = button {
            closed.write(SectionClosed);
            continue;
        }
        if let PanelButton::OpenLink(url) = button {
            open_external(url);
            continue;
        }

        let Ok((entity, mut session)) = sessions.single_mut() else {
            continue;
        };
        match button {
            PanelButton::Generate => {
                submit.write(SubmitGeneration { session: entity });
            }
            PanelButton::ToggleAspect => session.toggle_aspect(),
            PanelButton::SaveKey => {
                if session.save_key(&credentials.0) {
                    info!("API key updated");
                }
            }
            PanelButton::OpenVideo => {
                if let Some(MediaHandle::Video { path }) = session.result() {
                    open_external(path);
                }
            }
            PanelButton::Close | PanelButton::OpenLink(_) => {}
        }
    }
}

fn open_external(target: impl AsRef<OsStr>) {
    let target = target.as_ref();
    if let Err(err) = open::that(target) {
        warn!("could not open {}: {err}", target.to_string_lossy());
    }
}

pub fn update_button_colors(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<PanelButton>)>,
) {
    for (interaction, mut color) in &mut buttons {
        *color = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        }
        .into();
    }
}

fn status_line(session: &StudioSession) -> (String, Color) {
    match &session.state {
        GenerationState::Idle => (
            "Press Enter or Generate when ready.".into(),
            MUTED,
        ),
        GenerationState::Generating => match session.kind {
            StudioKind::Video => (
                "Generating video. This can take a few minutes...".into(),
                MUTED,
            ),
            StudioKind::Image => ("Editing image...".into(), MUTED),
        },
        GenerationState::Succeeded(MediaHandle::Video { path }) => {
            (format!("Video saved to {}", path.display()), Color::WHITE)
        }
        GenerationState::Succeeded(MediaHandle::Image(_)) => ("Done.".into(), Color::WHITE),
        GenerationState::Failed(message) => (message.clone(), ERROR),
        GenerationState::NeedsCredential => (
            "An API key is required. Type it below and press Enter.".into(),
            ERROR,
        ),
    }
}

fn text_for(kind: StudioText, session: &StudioSession) -> (String, Option<Color>) {
    match kind {
        StudioText::Source => (
            match &session.source {
                Some(image) => format!("Image: {}", image.name),
                None => "No image yet. Drag a PNG or JPEG onto the window.".into(),
            },
            None,
        ),
        StudioText::Prompt => (format!("Prompt: {}_", session.prompt), None),
        StudioText::Aspect => (format!("Aspect {}", session.aspect.as_str()), None),
        StudioText::GenerateLabel => (
            match (session.is_generating(), session.kind) {
                (true, _) => "Working...",
                (false, StudioKind::Video) => "Generate video",
                (false, StudioKind::Image) => "Edit image",
            }
            .into(),
            None,
        ),
        StudioText::Status => {
            let (text, color) = status_line(session);
            (text, Some(color))
        }
        StudioText::KeyDraft => (
            if session.key_draft.is_empty() {
                "(type to enter)".into()
            } else {
                "*".repeat(session.key_draft.chars().count())
            },
            None,
        ),
    }
}

/// Mirrors the studio session into its panel
pub fn refresh_studio_view(
    mut sessions: Query<(&StudioSession, &mut ShownImages), Changed<StudioSession>>,
    mut texts: Query<(&StudioText, &mut Text, &mut TextColor)>,
    mut reveals: Query<(&StudioReveal, &mut Node), Without<StudioImage>>,
    mut slots: Query<(&StudioImage, &mut ImageNode, &mut Node), Without<StudioReveal>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Ok((session, mut shown)) = sessions.single_mut() else {
        return;
    };

    for (kind, mut text, mut color) in &mut texts {
        let (content, tint) = text_for(*kind, session);
        **text = content;
        if let Some(tint) = tint {
            color.0 = tint;
        }
    }

    for (reveal, mut node) in &mut reveals {
        let visible = match reveal {
            StudioReveal::KeyPrompt => session.state == GenerationState::NeedsCredential,
            StudioReveal::OpenVideo => matches!(session.result(), Some(MediaHandle::Video { .. })),
        };
        node.display = if visible { Display::Flex } else { Display::None };
    }

    let result_image = match session.result() {
        Some(MediaHandle::Image(payload)) => Some(payload),
        _ => None,
    };

    for (slot, mut image_node, mut node) in &mut slots {
        let payload = match slot {
            StudioImage::Source if shown.source != session.source_revision => {
                session.source.as_ref().map(|image| &image.payload)
            }
            StudioImage::Result if shown.result != result_image.is_some() => result_image,
            _ => continue,
        };

        let handle = payload.and_then(|payload| upload(&mut images, payload));
        node.display = if handle.is_some() {
            Display::Flex
        } else {
            Display::None
        };
        image_node.image = handle.unwrap_or_default();
    }

    shown.source = session.source_revision;
    shown.result = result_image.is_some();
}

fn upload(images: &mut Assets<Image>, payload: &MediaPayload) -> Option<Handle<Image>> {
    match Image::from_buffer(
        &payload.bytes,
        ImageType::MimeType(&payload.mime_type),
        CompressedImageFormats::NONE,
        true,
        ImageSampler::Default,
        RenderAssetUsages::RENDER_WORLD,
    ) {
        Ok(image) => Some(images.add(image)),
        Err(err) => {
            warn!("could not decode {}: {err}", payload.mime_type);
            None
        }
    }
}
