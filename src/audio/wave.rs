//! Offline rendering of the synth voices into PCM buffers.

use std::f32::consts::TAU;

use rand::Rng;

use super::synth::ImpactParams;

/// Number of waveform periods in the hum loop; even so the sub-octave wraps cleanly
const HUM_PERIODS: usize = 44;

/// Single-pole low-pass filter
struct OnePole {
    alpha: f32,
    state: f32,
}

impl OnePole {
    fn new(cutoff: f32, sample_rate: u32) -> Self {
        Self {
            alpha: 1.0 - (-TAU * cutoff / sample_rate as f32).exp(),
            state: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        self.state += self.alpha * (input - self.state);
        self.state
    }
}

/// Renders a seamless loop of a filtered sawtooth with a sine sub-octave.
///
/// Pitch is changed at playback time by resampling, so the loop is rendered
/// once at `frequency`.
pub fn render_hum_loop(frequency: f32, cutoff: f32, sample_rate: u32) -> Vec<f32> {
    let period = (sample_rate as f32 / frequency).round().max(2.0) as usize;
    let len = period * HUM_PERIODS;
    let mut filter = OnePole::new(cutoff, sample_rate);

    let sample = |i: usize| {
        let phase = (i % period) as f32 / period as f32;
        let saw = 2.0 * phase - 1.0;
        let sub = (TAU * phase * 0.5 + TAU * ((i / period) % 2) as f32 * 0.5).sin();
        0.7 * saw + 0.3 * sub
    };

    // First pass settles the filter so the loop seam has no transient
    for i in 0..len {
        filter.process(sample(i));
    }

    (0..len).map(|i| filter.process(sample(i))).collect()
}

/// Renders a filtered noise burst with an exponential decay.
pub fn render_impact(params: &ImpactParams, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let len = ((params.duration * sample_rate as f32) as usize).max(1);
    let mut filter = OnePole::new(params.cutoff, sample_rate);
    // Decays to about -60 dB by the end of the burst
    let decay = 6.9 / len as f32;

    (0..len)
        .map(|i| {
            let noise: f32 = rng.gen_range(-1.0..1.0);
            filter.process(noise) * (-decay * i as f32).exp()
        })
        .collect()
}

/// Encodes mono samples in [-1, 1] as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;

    let block_align = CHANNELS * BITS / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_len = (samples.len() * block_align as usize) as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn wav_header_describes_the_data() {
        let bytes = encode_wav(&[0.0, 1.0, -1.0], 22_050);

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 22_050);
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 6);
        assert_eq!(bytes.len(), 44 + 6);

        let peak = i16::from_le_bytes(bytes[46..48].try_into().unwrap());
        let trough = i16::from_le_bytes(bytes[48..50].try_into().unwrap());
        assert_eq!(peak, i16::MAX);
        assert_eq!(trough, -i16::MAX);
    }

    #[test]
    fn hum_loop_holds_whole_periods() {
        let samples = render_hum_loop(45.0, 600.0, 22_050);
        assert_eq!(samples.len(), 490 * HUM_PERIODS);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn impact_decays() {
        let params = ImpactParams {
            gain: 1.0,
            duration: 0.2,
            cutoff: 2_000.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let samples = render_impact(&params, 22_050, &mut rng);

        assert_eq!(samples.len(), 4_410);
        let head: f32 = samples[..400].iter().map(|s| s.abs()).sum();
        let tail: f32 = samples[samples.len() - 400..].iter().map(|s| s.abs()).sum();
        assert!(tail < head * 0.05);
    }
}
