//! Worley (cellular) noise field.
//!
//! Scatters a deterministic set of feature points over the texture and shades
//! each pixel by its distance to the nearest one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

/// Empirical tuning factor applied to the average cell radius
pub const CELL_RADIUS_FACTOR: f32 = 1.5;

/// Parameters for Worley noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularParameters {
    /// Number of feature points, at least 2
    pub cell_count: u32,
    /// Exponent applied to the normalized distance, must be > 0
    pub falloff: f32,
    /// Seeds the point scatter; same type as the Perlin seed
    pub seed: u32,
    /// Swap dark cell centers for bright ones
    pub invert: bool,
}

impl Default for CellularParameters {
    fn default() -> Self {
        CellularParameters {
            cell_count: 16,
            falloff: 1.0,
            seed: 0,
            invert: false,
        }
    }
}

impl CellularParameters {
    pub fn validate(&self) -> Result<()> {
        if self.cell_count < 2 {
            return Err(SynthError::InvalidParameter(format!(
                "cell count must be >= 2, got {}",
                self.cell_count
            )));
        }
        if !self.falloff.is_finite() || self.falloff <= 0.0 {
            return Err(SynthError::InvalidParameter(format!(
                "falloff must be > 0, got {}",
                self.falloff
            )));
        }
        Ok(())
    }
}

/// Scatter feature points uniformly over the texture
///
/// The sequence depends only on the arguments: the same seed always yields
/// the same positions in the same order.
///
/// # Arguments
/// * `seed` - Seed for the ChaCha8 stream
/// * `cell_count` - Number of points to generate
/// * `width` - Texture width, points land in `[0, width)`
/// * `height` - Texture height, points land in `[0, height)`
///
/// # Returns
/// * `Vec<Vec2>` - `cell_count` points in generation order
pub fn build_points(seed: u32, cell_count: u32, width: u32, height: u32) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
    (0..cell_count)
        .map(|_| {
            let x = rng.r#gen::<f32>() * width as f32;
            let y = rng.r#gen::<f32>() * height as f32;
            Vec2::new(x, y)
        })
        .collect()
}

/// Nearest-point distance field over a fixed point set
#[derive(Debug, Clone)]
pub struct CellularNoiseField {
    points: Vec<Vec2>,
    avg_cell_radius: f32,
}

impl CellularNoiseField {
    /// Build the point set for a `width` x `height` texture
    pub fn new(params: &CellularParameters, width: u32, height: u32) -> Self {
        let points = build_points(params.seed, params.cell_count, width, height);
        Self::with_points(points, width)
    }

    /// Use an explicit point set; the normalization radius follows `width`
    pub fn with_points(points: Vec<Vec2>, width: u32) -> Self {
        let count = points.len().max(1) as f32;
        let avg_cell_radius = width as f32 / count.sqrt() * CELL_RADIUS_FACTOR;
        CellularNoiseField {
            points,
            avg_cell_radius,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn avg_cell_radius(&self) -> f32 {
        self.avg_cell_radius
    }

    /// Sample the field at a point
    ///
    /// # Arguments
    /// * `x` - X coordinate in pixel space
    /// * `y` - Y coordinate in pixel space
    /// * `falloff` - Exponent applied to the normalized distance
    /// * `invert` - Return `1 - value` instead
    ///
    /// # Returns
    /// * `f32` - Distance value in [0, 1], 0 on a feature point unless inverted
    pub fn sample(&self, x: f32, y: f32, falloff: f32, invert: bool) -> f32 {
        let p = Vec2::new(x, y);
        let min_distance = self
            .points
            .iter()
            .map(|q| p.distance(*q))
            .fold(f32::INFINITY, f32::min);

        // Distance to the nearest point, relative to a typical cell size
        let value = if self.avg_cell_radius > 0.0 {
            (min_distance / self.avg_cell_radius).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let value = value.powf(falloff);

        if invert { 1.0 - value } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_points_deterministic() {
        let a = build_points(42, 10, 256, 256);
        let b = build_points(42, 10, 256, 256);
        assert_eq!(a.len(), 10);
        assert_eq!(a, b, "Same seed should give the same point sequence");
    }

    #[test]
    fn test_build_points_seed_changes_points() {
        let a = build_points(1, 10, 256, 256);
        let b = build_points(2, 10, 256, 256);
        assert_ne!(a, b);
    }

    #[test]
    fn test_build_points_in_bounds() {
        for p in build_points(9, 200, 128, 64) {
            assert!(p.x >= 0.0 && p.x < 128.0, "x out of bounds: {}", p.x);
            assert!(p.y >= 0.0 && p.y < 64.0, "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn test_sample_at_point_is_zero() {
        let points = vec![Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0)];
        let field = CellularNoiseField::with_points(points, 64);
        assert_eq!(field.sample(10.0, 10.0, 1.0, false), 0.0);
        assert_eq!(field.sample(10.0, 10.0, 1.0, true), 1.0);
    }

    #[test]
    fn test_sample_normalization() {
        // 4 points over width 40 -> radius 40 / 2 * 1.5 = 30
        let points = vec![Vec2::ZERO; 4];
        let field = CellularNoiseField::with_points(points, 40);
        assert_eq!(field.avg_cell_radius(), 30.0);

        let v = field.sample(15.0, 0.0, 1.0, false);
        assert!((v - 0.5).abs() < 1e-6, "expected 0.5, got {}", v);

        let squared = field.sample(15.0, 0.0, 2.0, false);
        assert!((squared - 0.25).abs() < 1e-6, "expected 0.25, got {}", squared);

        // Far away clamps to 1
        assert_eq!(field.sample(500.0, 500.0, 1.0, false), 1.0);
    }

    #[test]
    fn test_invert_complements() {
        let params = CellularParameters {
            cell_count: 12,
            falloff: 1.7,
            seed: 5,
            invert: false,
        };
        let field = CellularNoiseField::new(&params, 64, 64);
        for y in 0..64 {
            for x in 0..64 {
                let (fx, fy) = (x as f32, y as f32);
                let plain = field.sample(fx, fy, params.falloff, false);
                let inverted = field.sample(fx, fy, params.falloff, true);
                assert_eq!(inverted, 1.0 - plain);
                assert!((0.0..=1.0).contains(&plain));
            }
        }
    }

    #[test]
    fn test_validate() {
        assert!(CellularParameters::default().validate().is_ok());

        let one_cell = CellularParameters {
            cell_count: 1,
            ..Default::default()
        };
        assert!(one_cell.validate().is_err());

        for falloff in [0.0, -1.0, f32::NAN] {
            let params = CellularParameters {
                falloff,
                ..Default::default()
            };
            assert!(params.validate().is_err(), "falloff {} should be rejected", falloff);
        }
    }
}
