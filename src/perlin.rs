//! Fractal Perlin noise field.
//!
//! Layers several octaves of 2D Perlin noise (fBm) and normalizes the sum by
//! the total amplitude so the result stays in [0, 1] for any octave count.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

pub const MAX_OCTAVES: u32 = 8;

/// Parameters for fractal Perlin noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Feature size in pixels, must be > 0
    pub scale: f32,
    /// Number of layers (1-8)
    pub octaves: u32,
    /// Amplitude falloff per octave (0.0-1.0)
    pub persistence: f32,
    /// Frequency growth per octave (1.0-4.0)
    pub lacunarity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Permutation seed for the base Perlin primitive
    pub seed: u32,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        NoiseParameters {
            scale: 20.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
            seed: 0,
        }
    }
}

impl NoiseParameters {
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SynthError::InvalidParameter(format!(
                "scale must be > 0, got {}",
                self.scale
            )));
        }
        if !(1..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(SynthError::InvalidParameter(format!(
                "octaves must be in [1, {}], got {}",
                MAX_OCTAVES, self.octaves
            )));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(SynthError::InvalidParameter(format!(
                "persistence must be in [0, 1], got {}",
                self.persistence
            )));
        }
        if !(1.0..=4.0).contains(&self.lacunarity) {
            return Err(SynthError::InvalidParameter(format!(
                "lacunarity must be in [1, 4], got {}",
                self.lacunarity
            )));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(SynthError::InvalidParameter("offsets must be finite".into()));
        }
        Ok(())
    }
}

/// Multi-octave Perlin noise sampler bound to one parameter set
#[derive(Clone)]
pub struct ValueNoiseField {
    params: NoiseParameters,
    perlin: Perlin,
}

impl Default for ValueNoiseField {
    fn default() -> Self {
        Self::new(&NoiseParameters::default())
    }
}

impl ValueNoiseField {
    /// Build the field; `params.seed` picks the Perlin permutation
    pub fn new(params: &NoiseParameters) -> Self {
        ValueNoiseField {
            params: *params,
            perlin: Perlin::new(params.seed),
        }
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    /// Single octave of Perlin noise remapped from [-1, 1] to [0, 1]
    fn base(&self, x: f64, y: f64) -> f64 {
        ((self.perlin.get([x, y]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample the fractal field at a point
    ///
    /// Sums `octaves` layers of Perlin noise, each at `lacunarity^i` times the
    /// base frequency and weighted by `persistence^i`, then divides by the
    /// summed weights.
    ///
    /// # Arguments
    /// * `x` - X coordinate in pixel space
    /// * `y` - Y coordinate in pixel space
    ///
    /// # Returns
    /// * `f32` - Noise value in [0, 1]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let params = &self.params;

        // Shift, then shrink to noise space
        let scale = params.scale as f64;
        let nx = (x as f64 + params.offset_x as f64) / scale;
        let ny = (y as f64 + params.offset_y as f64) / scale;

        let mut value = 0.0;
        let mut max_amplitude = 0.0;
        for i in 0..params.octaves as i32 {
            let frequency = (params.lacunarity as f64).powi(i);
            let amplitude = (params.persistence as f64).powi(i);
            value += amplitude * self.base(nx * frequency, ny * frequency);
            max_amplitude += amplitude;
        }

        // Normalize so the octave count does not change overall brightness
        if max_amplitude > 0.0 {
            (value / max_amplitude).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

/// One-off sample of the fractal field described by `params`
///
/// Builds the permutation table on every call; use [`ValueNoiseField`] when
/// sampling many points.
///
/// # Arguments
/// * `x` - X coordinate in pixel space
/// * `y` - Y coordinate in pixel space
/// * `params` - Noise parameters, including the permutation seed
///
/// # Returns
/// * `f32` - Noise value in [0, 1]
pub fn sample(x: f32, y: f32, params: &NoiseParameters) -> f32 {
    ValueNoiseField::new(params).sample(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_range() {
        let field = ValueNoiseField::default();
        for y in 0..64 {
            for x in 0..64 {
                let v = field.sample(x as f32 * 1.37, y as f32 * 0.91);
                assert!((0.0..=1.0).contains(&v), "sample out of range at ({},{}): {}", x, y, v);
            }
        }
    }

    #[test]
    fn test_sample_range_extreme_params() {
        let params = NoiseParameters {
            scale: 0.5,
            octaves: MAX_OCTAVES,
            persistence: 1.0,
            lacunarity: 4.0,
            offset_x: -1234.5,
            offset_y: 987.25,
            seed: 7,
        };
        let field = ValueNoiseField::new(&params);
        for y in 0..32 {
            for x in 0..32 {
                let v = field.sample(x as f32, y as f32);
                assert!((0.0..=1.0).contains(&v), "sample out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_sample_deterministic() {
        let params = NoiseParameters {
            seed: 3,
            ..NoiseParameters::default()
        };
        let a = ValueNoiseField::new(&params);
        let b = ValueNoiseField::new(&params);
        for i in 0..100 {
            let (x, y) = (i as f32 * 3.3, i as f32 * 1.7);
            assert_eq!(a.sample(x, y), b.sample(x, y));
            assert_eq!(a.sample(x, y), sample(x, y, &params));
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let seeded = NoiseParameters {
            seed: 12345,
            ..NoiseParameters::default()
        };
        let plain = NoiseParameters::default();

        let differs = (0..64).any(|i| {
            let (x, y) = (i as f32 * 2.3 + 0.5, i as f32 * 1.1 + 0.5);
            sample(x, y, &seeded) != sample(x, y, &plain)
        });
        assert!(differs, "Different seeds should give different noise");

        let field = ValueNoiseField::new(&seeded);
        assert_eq!(field.params().seed, 12345);
        assert_eq!(field.sample(7.5, 3.5), sample(7.5, 3.5, &seeded));
    }

    #[test]
    fn test_sample_varies() {
        let field = ValueNoiseField::default();
        let first = field.sample(3.0, 5.0);
        let has_variation = (0..64).any(|i| field.sample(i as f32 * 2.5, 11.0) != first);
        assert!(has_variation, "Noise should vary across the field");
    }

    #[test]
    fn test_offset_shifts_field() {
        let shifted = NoiseParameters {
            offset_x: 10.0,
            offset_y: -4.0,
            ..NoiseParameters::default()
        };
        assert_eq!(
            sample(0.0, 0.0, &shifted),
            sample(10.0, -4.0, &NoiseParameters::default())
        );
    }

    #[test]
    fn test_zero_persistence_is_single_octave() {
        let one = NoiseParameters {
            octaves: 1,
            ..NoiseParameters::default()
        };
        let flat = NoiseParameters {
            octaves: 6,
            persistence: 0.0,
            ..NoiseParameters::default()
        };
        let a = sample(13.0, 29.0, &one);
        let b = sample(13.0, 29.0, &flat);
        assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
    }

    #[test]
    fn test_validate() {
        assert!(NoiseParameters::default().validate().is_ok());

        let bad = [
            NoiseParameters {
                scale: 0.0,
                ..Default::default()
            },
            NoiseParameters {
                scale: -1.0,
                ..Default::default()
            },
            NoiseParameters {
                scale: f32::NAN,
                ..Default::default()
            },
            NoiseParameters {
                octaves: 0,
                ..Default::default()
            },
            NoiseParameters {
                octaves: 9,
                ..Default::default()
            },
            NoiseParameters {
                persistence: 1.5,
                ..Default::default()
            },
            NoiseParameters {
                lacunarity: 0.5,
                ..Default::default()
            },
            NoiseParameters {
                offset_x: f32::INFINITY,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(SynthError::InvalidParameter(_))),
                "expected rejection for {:?}",
                params
            );
        }
    }
}
