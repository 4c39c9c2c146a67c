use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::crates::{CrateColor, CrateConfig, CrateState};

/// Where crates are placed at startup
#[derive(Resource, Clone, Debug)]
pub struct CrateLayout {
    /// Center of the wall's front row
    pub wall_origin: Vec3,
    pub wall_columns: u32,
    pub wall_rows: u32,
    /// Gap between neighbouring wall crates
    pub wall_spacing: f32,
    pub scattered: u32,
    /// Half extent of the square scattered crates land in
    pub scatter_extent: f32,
    /// Height scattered crates are dropped from
    pub drop_height: f32,
    pub seed: u64,
}

impl Default for CrateLayout {
    fn default() -> Self {
        Self {
            wall_origin: Vec3::new(0.0, 0.0, -10.0),
            wall_columns: 6,
            wall_rows: 3,
            wall_spacing: 1.1,
            scattered: 12,
            scatter_extent: 35.0,
            drop_height: 6.0,
            seed: 0x5eed_c8a7,
        }
    }
}

impl CrateLayout {
    /// Builds the initial crate set: a grid on the ground followed by scattered drops.
    pub fn build(&self, config: &CrateConfig) -> Vec<CrateState> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let margin = config.crate_size * 0.6;
        let mut crates = Vec::with_capacity((self.wall_columns * self.wall_rows + self.scattered) as usize);

        let half_width = (self.wall_columns.saturating_sub(1)) as f32 * self.wall_spacing * 0.5;
        for row in 0..self.wall_rows {
            for column in 0..self.wall_columns {
                let position = Vec3::new(
                    self.wall_origin.x - half_width + column as f32 * self.wall_spacing,
                    config.resting_height,
                    self.wall_origin.z - row as f32 * self.wall_spacing,
                );
                let color = CrateColor::ALL[((row + column) as usize) % CrateColor::ALL.len()];
                crates.push(CrateState::new(crates.len() as u32, position, color, margin));
            }
        }

        for _ in 0..self.scattered {
            let position = Vec3::new(
                rng.gen_range(-self.scatter_extent..self.scatter_extent),
                config.resting_height + rng.gen_range(0.0..self.drop_height),
                rng.gen_range(-self.scatter_extent..self.scatter_extent),
            );
            let color = CrateColor::ALL[rng.gen_range(0..CrateColor::ALL.len())];
            crates.push(CrateState::new(crates.len() as u32, position, color, margin));
        }

        crates
    }
}
