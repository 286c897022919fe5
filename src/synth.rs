//! Texture synthesis: turns the noise fields and gradients into pixel buffers.
//!
//! Every call validates its inputs, then fills a fresh buffer. Rows are
//! independent so they are filled in parallel; the output does not depend
//! on scheduling.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cellular::{CellularNoiseField, CellularParameters};
use crate::color::Color;
use crate::error::{check_dimensions, Result, SynthError};
use crate::gradient::Gradient;
use crate::perlin::{NoiseParameters, ValueNoiseField};

/// Row-major RGBA float image owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    fn filled(width: u32, height: u32, color: Color) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Raw view of the pixel data as native-endian `f32` RGBA quadruples
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Which field a noise texture is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseKind {
    Perlin(NoiseParameters),
    Worley(CellularParameters),
}

impl NoiseKind {
    pub fn validate(&self) -> Result<()> {
        match self {
            NoiseKind::Perlin(params) => params.validate(),
            NoiseKind::Worley(params) => params.validate(),
        }
    }
}

/// Square texture sizes offered by the noise generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    R128,
    #[default]
    R256,
    R512,
    R1024,
    R2048,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::R128,
        Resolution::R256,
        Resolution::R512,
        Resolution::R1024,
        Resolution::R2048,
    ];

    pub fn size(&self) -> u32 {
        match self {
            Resolution::R128 => 128,
            Resolution::R256 => 256,
            Resolution::R512 => 512,
            Resolution::R1024 => 1024,
            Resolution::R2048 => 2048,
        }
    }
}

impl TryFrom<u32> for Resolution {
    type Error = SynthError;

    fn try_from(size: u32) -> Result<Self> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.size() == size)
            .ok_or(SynthError::InvalidDimension { width: size, height: size })
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let size: u32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
        Resolution::try_from(size).map_err(|_| {
            let sizes: Vec<_> = Resolution::ALL.iter().map(|r| r.size().to_string()).collect();
            format!("unsupported resolution {}, expected one of: {}", size, sizes.join(", "))
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size())
    }
}

/// Generate a grayscale noise texture
///
/// Every pixel `(x, y)` is sampled at its integer coordinates and written as
/// `RGBA(v, v, v, 1)`. Parameters are validated before any pixel is touched.
///
/// # Arguments
/// * `width` - Texture width in pixels, must be > 0
/// * `height` - Texture height in pixels, must be > 0
/// * `kind` - Which field to sample, with its parameters
///
/// # Returns
/// * `Result<PixelBuffer>` - The texture, or `InvalidDimension` / `InvalidParameter`
pub fn generate_noise(width: u32, height: u32, kind: &NoiseKind) -> Result<PixelBuffer> {
    check_dimensions(width, height)?;
    kind.validate()?;

    log::debug!("Generating {}x{} noise: {:?}", width, height, kind);

    let mut buffer = PixelBuffer::filled(width, height, Color::BLACK);
    match kind {
        NoiseKind::Perlin(params) => {
            let field = ValueNoiseField::new(params);
            fill_rows(&mut buffer, |x, y| field.sample(x as f32, y as f32));
        }
        NoiseKind::Worley(params) => {
            let field = CellularNoiseField::new(params, width, height);
            fill_rows(&mut buffer, |x, y| {
                field.sample(x as f32, y as f32, params.falloff, params.invert)
            });
        }
    }

    Ok(buffer)
}

/// Bake a gradient into a ramp lookup texture
///
/// Column `i` holds the gradient evaluated at `i / (width - 1)`, so the first
/// and last columns hit the end stops exactly.
///
/// # Arguments
/// * `width` - Ramp width in pixels, must be > 0
/// * `gradient` - Gradient to bake
///
/// # Returns
/// * `Result<PixelBuffer>` - A `width` x 1 texture, or `InvalidDimension`
pub fn generate_ramp(width: u32, gradient: &Gradient) -> Result<PixelBuffer> {
    check_dimensions(width, 1)?;

    log::debug!(
        "Baking {}px ramp from {} color / {} alpha stops",
        width,
        gradient.color_stops().len(),
        gradient.alpha_stops().len()
    );

    // A single column would divide by zero below
    if width == 1 {
        return Ok(PixelBuffer::filled(1, 1, gradient.evaluate(0.0)));
    }

    let last = (width - 1) as f32;
    let pixels = (0..width)
        .map(|i| gradient.evaluate(i as f32 / last))
        .collect();

    Ok(PixelBuffer {
        width,
        height: 1,
        pixels,
    })
}

fn fill_rows<F>(buffer: &mut PixelBuffer, sample: F)
where
    F: Fn(u32, u32) -> f32 + Sync,
{
    let width = buffer.width as usize;
    buffer
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = Color::gray(sample(x as u32, y as u32));
            }
        });
}
