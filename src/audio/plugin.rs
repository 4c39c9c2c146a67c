use std::collections::VecDeque;

use bevy::audio::Volume;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::synth::*;
use super::wave::{encode_wav, render_hum_loop, render_impact};
use crate::vehicle::{Car, VehicleAudioMessage, VehicleState};

/// Synthesis parameters waiting for the audio backend
#[derive(Resource, Debug, Default)]
pub struct SynthOutput {
    pub engine: Option<EngineParams>,
    pub impacts: VecDeque<ImpactParams>,
}

/// Noise source for impact bursts
#[derive(Resource)]
pub struct SynthRng(pub StdRng);

impl Default for SynthRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(0x1a7c))
    }
}

/// The looping engine voice
#[derive(Component)]
pub struct EngineHum;

/// Plugin for the procedural engine hum and impact sounds
pub struct SynthPlugin;

impl Plugin for SynthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SynthConfig>()
            .init_resource::<SynthOutput>()
            .init_resource::<SynthRng>()
            .add_message::<VehicleAudioMessage>();

        app.add_systems(Startup, spawn_engine_hum);
        app.add_systems(
            Update,
            (
                (update_engine_params, queue_impacts),
                (drive_engine_hum, play_impacts),
            )
                .chain(),
        );
    }
}

/// Derives hum parameters from the car's speed
pub fn update_engine_params(
    car_query: Query<&VehicleState, With<Car>>,
    config: Res<SynthConfig>,
    mut output: ResMut<SynthOutput>,
) {
    output.engine = car_query
        .single()
        .ok()
        .map(|car| engine_params(car.speed(), &config));
}

/// Turns collision messages into impact bursts
pub fn queue_impacts(
    mut reader: MessageReader<VehicleAudioMessage>,
    config: Res<SynthConfig>,
    mut output: ResMut<SynthOutput>,
) {
    for message in reader.read() {
        let params = impact_params(message.strength(), &config);
        if params.gain > 0.0 {
            output.impacts.push_back(params);
        }
    }
}

fn spawn_engine_hum(
    mut commands: Commands,
    mut sources: ResMut<Assets<AudioSource>>,
    config: Res<SynthConfig>,
) {
    let samples = render_hum_loop(config.idle_frequency, config.hum_cutoff, config.sample_rate);
    let source = sources.add(AudioSource {
        bytes: encode_wav(&samples, config.sample_rate).into(),
    });

    commands.spawn((
        EngineHum,
        AudioPlayer(source),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.0)),
    ));
}

/// Retunes the looping hum by resampling and sets its volume
fn drive_engine_hum(
    mut sinks: Query<&mut AudioSink, With<EngineHum>>,
    config: Res<SynthConfig>,
    output: Res<SynthOutput>,
) {
    let (speed, gain) = match output.engine {
        Some(params) => (params.frequency / config.idle_frequency, params.gain),
        None => (1.0, 0.0),
    };

    for mut sink in &mut sinks {
        sink.set_speed(speed);
        sink.set_volume(Volume::Linear(gain));
    }
}

/// Renders and fires one-shot voices for queued impacts
fn play_impacts(
    mut commands: Commands,
    mut sources: ResMut<Assets<AudioSource>>,
    mut output: ResMut<SynthOutput>,
    mut rng: ResMut<SynthRng>,
    config: Res<SynthConfig>,
) {
    while let Some(params) = output.impacts.pop_front() {
        let samples = render_impact(&params, config.sample_rate, &mut rng.0);
        let source = sources.add(AudioSource {
            bytes: encode_wav(&samples, config.sample_rate).into(),
        });

        commands.spawn((
            AudioPlayer(source),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(params.gain)),
        ));
    }
}
