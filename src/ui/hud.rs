use bevy::prelude::*;

use crate::camera::ChaseCamera;
use crate::section::ActiveSection;
use crate::vehicle::{Car, VehicleState};
use crate::zones::{TriggerZones, ZoneSettings};

/// Labels float this far above a zone's center
const LABEL_HEIGHT: f32 = 3.0;

/// Screen-space caption that follows a zone
#[derive(Component)]
pub struct ZoneLabel {
    index: usize,
    world_pos: Vec3,
}

/// "Press E" prompt shown while parked on a zone
#[derive(Component)]
pub struct InteractHint;

/// Everything hidden while an overlay is up
#[derive(Component)]
pub struct HudElement;

pub fn spawn_hud(mut commands: Commands, zones: Res<TriggerZones>) {
    for (index, (zone, _)) in zones.iter().enumerate() {
        commands.spawn((
            HudElement,
            ZoneLabel {
                index,
                world_pos: zone.center + Vec3::Y * LABEL_HEIGHT,
            },
            Text::new(format!("{}\n{}", zone.label, zone.subtext)),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::WHITE),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
                ..default()
            },
        ));
    }

    commands.spawn((
        HudElement,
        InteractHint,
        Text::new(""),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(40.0),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-140.0)),
            padding: UiRect::all(Val::Px(10.0)),
            ..default()
        },
        Visibility::Hidden,
    ));

    commands.spawn((
        HudElement,
        Text::new("WASD / arrows: drive   Shift: boost   R: reset   E: enter   Wheel: zoom"),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.85, 0.85)),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
    ));
}

/// Projects zone positions to the screen; active zones take their color
pub fn update_zone_labels(
    camera_query: Query<(&Camera, &GlobalTransform), With<ChaseCamera>>,
    zones: Res<TriggerZones>,
    mut labels: Query<(&mut Node, &mut Visibility, &mut TextColor, &ZoneLabel)>,
) {
    let Ok((camera, camera_gt)) = camera_query.single() else {
        return;
    };

    for (mut node, mut vis, mut color, label) in &mut labels {
        match camera.world_to_viewport(camera_gt, label.world_pos) {
            Ok(vp) => {
                *vis = Visibility::Inherited;
                node.left = Val::Px(vp.x - 50.0);
                node.top = Val::Px(vp.y - 20.0);
            }
            Err(_) => {
                *vis = Visibility::Hidden;
            }
        }

        color.0 = match zones.get(label.index) {
            Some(zone) if zones.is_active(label.index) => zone.color,
            _ => Color::WHITE,
        };
    }
}

pub fn update_interact_hint(
    car_query: Query<&VehicleState, With<Car>>,
    zones: Res<TriggerZones>,
    settings: Res<ZoneSettings>,
    mut hint: Query<(&mut Text, &mut Visibility), With<InteractHint>>,
) {
    let Ok((mut text, mut vis)) = hint.single_mut() else {
        return;
    };
    let nearest = car_query
        .single()
        .ok()
        .and_then(|car| zones.nearest(car.position, settings.activation_radius));

    match nearest {
        Some(zone) => {
            **text = format!("Press E to open {}", zone.label);
            *vis = Visibility::Inherited;
        }
        None => *vis = Visibility::Hidden,
    }
}

/// Hides the HUD under overlays
pub fn toggle_hud(
    state: Res<State<ActiveSection>>,
    mut hud: Query<&mut Node, With<HudElement>>,
) {
    let display = match state.get() {
        ActiveSection::Home => Display::Flex,
        ActiveSection::Open(_) => Display::None,
    };
    for mut node in &mut hud {
        node.display = display;
    }
}
