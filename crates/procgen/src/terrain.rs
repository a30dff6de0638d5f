//! Coherent 1-D terrain noise.
//!
//! **Seed-based determinism:** the Perlin source is derived only from the world
//! seed, so the same seed always yields the same height profile regardless of
//! how far ahead generation has run.

use noise::{NoiseFn, Perlin};

/// Divisor applied to the generation cursor before sampling, scaled by biome frequency.
pub const NOISE_SMOOTHING: f64 = 15.0;

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
pub fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Fractal Perlin noise sampled along a single line.
#[derive(Debug, Clone)]
pub struct TerrainNoise {
    perlin: Perlin,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
}

impl TerrainNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            perlin: Perlin::new(deterministic_noise_seed(seed, 0)),
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Noise at `x`, normalised to [-1, 1].
    pub fn sample(&self, x: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for octave in 0..self.octaves {
            // Each octave walks its own line so octaves stay decorrelated.
            let lane = 0.5 + octave as f64 * 17.0;
            value += self.perlin.get([x * frequency, lane]) * amplitude;
            max_value += amplitude;

            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        (value / max_value).clamp(-1.0, 1.0)
    }

    /// Noise for a generated column under a biome's frequency.
    pub fn sample_column(&self, column: i64, frequency: f64) -> f64 {
        self.sample(column as f64 / (NOISE_SMOOTHING * frequency))
    }
}
