use bevy::prelude::*;

use super::crates::*;
use super::layout::CrateLayout;
use crate::section::ActiveSection;
use crate::vehicle::VehicleAudioMessage;

/// Plugin for the knock-about crates
pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CrateConfig>()
            .init_resource::<CrateLayout>()
            .add_message::<VehicleAudioMessage>();

        app.add_systems(Startup, spawn_crates);

        app.add_systems(
            FixedUpdate,
            (step_crates, sync_crate_transforms)
                .chain()
                .run_if(in_state(ActiveSection::Home)),
        );
    }
}

/// Spawns every crate once; the set never changes afterwards
fn spawn_crates(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<CrateConfig>,
    layout: Res<CrateLayout>,
) {
    let size = config.crate_size;
    let mesh = meshes.add(Cuboid::new(size, size, size));
    let palette: Vec<(CrateColor, Handle<StandardMaterial>)> = CrateColor::ALL
        .iter()
        .map(|&color| {
            let material = materials.add(StandardMaterial {
                base_color: color.color(),
                perceptual_roughness: 0.7,
                ..default()
            });
            (color, material)
        })
        .collect();

    let crates = layout.build(&config);
    info!("spawning {} crates", crates.len());

    for crate_state in crates {
        let material = palette
            .iter()
            .find(|(color, _)| *color == crate_state.color)
            .map(|(_, material)| material.clone())
            .unwrap_or_default();

        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(crate_state.position),
            crate_state,
        ));
    }
}
