use bevy::prelude::*;

/// Procedural audio tuning
#[derive(Resource, Clone, Copy, Debug)]
pub struct SynthConfig {
    /// Output sample rate for rendered buffers
    pub sample_rate: u32,
    /// Hum pitch at standstill, in Hz
    pub idle_frequency: f32,
    /// Extra Hz per m/s of speed
    pub frequency_per_speed: f32,
    /// Hum gain at standstill
    pub idle_gain: f32,
    /// Hum gain at `max_speed`
    pub full_gain: f32,
    /// Speed at which the hum stops rising
    pub max_speed: f32,
    /// Low-pass cutoff the hum loop is rendered with
    pub hum_cutoff: f32,
    /// Impact strength that maps to full gain
    pub impact_full_strength: f32,
    /// Overall volume multiplier
    pub master_gain: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22_050,
            idle_frequency: 45.0,
            frequency_per_speed: 4.0,
            idle_gain: 0.05,
            full_gain: 0.25,
            max_speed: 30.0,
            hum_cutoff: 600.0,
            impact_full_strength: 30.0,
            master_gain: 0.8,
        }
    }
}

/// Engine hum settings for the current speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub frequency: f32,
    pub gain: f32,
}

/// Settings for one impact burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactParams {
    pub gain: f32,
    /// Seconds until the burst has decayed
    pub duration: f32,
    pub cutoff: f32,
}

/// Maps car speed onto hum pitch and loudness.
pub fn engine_params(speed: f32, config: &SynthConfig) -> EngineParams {
    let speed = speed.clamp(0.0, config.max_speed);
    let t = speed / config.max_speed;

    EngineParams {
        frequency: config.idle_frequency + speed * config.frequency_per_speed,
        gain: (config.idle_gain + (config.full_gain - config.idle_gain) * t) * config.master_gain,
    }
}

/// Maps collision strength onto a noise burst; harder hits are louder, longer and brighter.
pub fn impact_params(strength: f32, config: &SynthConfig) -> ImpactParams {
    let t = (strength / config.impact_full_strength).clamp(0.0, 1.0);

    ImpactParams {
        gain: t * config.master_gain,
        duration: 0.12 + 0.25 * t,
        cutoff: 400.0 + 2_400.0 * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_engine_uses_base_values() {
        let config = SynthConfig::default();
        let params = engine_params(0.0, &config);
        assert_eq!(params.frequency, config.idle_frequency);
        assert!((params.gain - config.idle_gain * config.master_gain).abs() < 1e-6);
    }

    #[test]
    fn engine_rises_with_speed_and_caps() {
        let config = SynthConfig::default();
        let slow = engine_params(5.0, &config);
        let fast = engine_params(20.0, &config);
        let capped = engine_params(config.max_speed * 4.0, &config);
        let top = engine_params(config.max_speed, &config);

        assert!(fast.frequency > slow.frequency);
        assert!(fast.gain > slow.gain);
        assert_eq!(capped, top);
    }

    #[test]
    fn impact_scales_and_clamps() {
        let config = SynthConfig::default();
        let soft = impact_params(3.0, &config);
        let hard = impact_params(20.0, &config);
        let huge = impact_params(1_000.0, &config);

        assert!(hard.gain > soft.gain);
        assert!(hard.duration > soft.duration);
        assert_eq!(huge.gain, config.master_gain);
        assert_eq!(impact_params(-5.0, &config).gain, 0.0);
    }
}
