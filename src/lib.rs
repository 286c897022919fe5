//! Procedural texture synthesis for toon shading.
//!
//! Generates fractal Perlin and Worley noise textures and bakes color
//! gradients into ramp lookup textures. Everything here is a pure function of
//! its parameters; encoding the results is left to [`export`].

pub mod cellular;
pub mod color;
pub mod error;
pub mod export;
pub mod gradient;
pub mod perlin;
pub mod synth;

pub use cellular::{build_points, CellularNoiseField, CellularParameters};
pub use color::Color;
pub use error::{Result, SynthError};
pub use gradient::{AlphaStop, ColorStop, Gradient, GradientDef, GradientPreset};
pub use perlin::{NoiseParameters, ValueNoiseField};
pub use synth::{generate_noise, generate_ramp, NoiseKind, PixelBuffer, Resolution};
