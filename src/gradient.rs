//! Two-channel color gradients.
//!
//! A gradient keeps color stops and alpha stops in separate sequences, each
//! with its own positions. Evaluation interpolates each sequence linearly and
//! clamps outside the first and last stop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, SynthError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: [f32; 3],
}

impl ColorStop {
    pub fn new(position: f32, color: [f32; 3]) -> Self {
        ColorStop { position, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaStop {
    pub position: f32,
    pub alpha: f32,
}

impl AlphaStop {
    pub fn new(position: f32, alpha: f32) -> Self {
        AlphaStop { position, alpha }
    }
}

/// Stop lists as read from disk, before sorting and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientDef {
    pub color_stops: Vec<ColorStop>,
    #[serde(default = "opaque_alpha")]
    pub alpha_stops: Vec<AlphaStop>,
}

fn opaque_alpha() -> Vec<AlphaStop> {
    vec![AlphaStop::new(0.0, 1.0)]
}

/// Piecewise-linear color and alpha gradient with sorted stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GradientDef")]
pub struct Gradient {
    color_stops: Vec<ColorStop>,
    alpha_stops: Vec<AlphaStop>,
}

impl TryFrom<GradientDef> for Gradient {
    type Error = SynthError;

    fn try_from(raw: GradientDef) -> Result<Self> {
        Gradient::new(raw.color_stops, raw.alpha_stops)
    }
}

fn check_position(position: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&position) {
        return Err(SynthError::InvalidParameter(format!(
            "stop position must be in [0, 1], got {}",
            position
        )));
    }
    Ok(())
}

impl Gradient {
    /// Build a gradient, sorting both stop lists by position.
    ///
    /// Stops sharing a position keep their given order, which makes a hard step.
    pub fn new(mut color_stops: Vec<ColorStop>, mut alpha_stops: Vec<AlphaStop>) -> Result<Self> {
        if color_stops.is_empty() {
            return Err(SynthError::InvalidParameter(
                "gradient needs at least one color stop".into(),
            ));
        }
        if alpha_stops.is_empty() {
            return Err(SynthError::InvalidParameter(
                "gradient needs at least one alpha stop".into(),
            ));
        }
        for stop in &color_stops {
            check_position(stop.position)?;
        }
        for stop in &alpha_stops {
            check_position(stop.position)?;
        }

        color_stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        alpha_stops.sort_by(|a, b| a.position.total_cmp(&b.position));

        Ok(Gradient {
            color_stops,
            alpha_stops,
        })
    }

    /// Opaque blend from `start` at 0 to `end` at 1
    pub fn linear(start: [f32; 3], end: [f32; 3]) -> Self {
        Gradient {
            color_stops: vec![ColorStop::new(0.0, start), ColorStop::new(1.0, end)],
            alpha_stops: opaque_alpha(),
        }
    }

    pub fn color_stops(&self) -> &[ColorStop] {
        &self.color_stops
    }

    pub fn alpha_stops(&self) -> &[AlphaStop] {
        &self.alpha_stops
    }

    /// Evaluate the gradient at a position
    ///
    /// Color and alpha are looked up independently, each against its own
    /// stops. Positions before the first stop or after the last one return
    /// that end stop unchanged.
    ///
    /// # Arguments
    /// * `t` - Position along the gradient, nominally in [0, 1]
    ///
    /// # Returns
    /// * `Color` - Interpolated RGBA color
    pub fn evaluate(&self, t: f32) -> Color {
        // Color channels
        let (i, j, f) = bracket(&self.color_stops, t, |s| s.position);
        let (a, b) = (self.color_stops[i].color, self.color_stops[j].color);

        // Alpha channel, keyed separately
        let (k, l, g) = bracket(&self.alpha_stops, t, |s| s.position);
        let alpha = lerp(self.alpha_stops[k].alpha, self.alpha_stops[l].alpha, g);

        Color::new(lerp(a[0], b[0], f), lerp(a[1], b[1], f), lerp(a[2], b[2], f), alpha)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Find the stops surrounding `t` and the blend factor between them.
///
/// Zero-width spans are skipped, so at a shared position the later stop wins.
fn bracket<S>(stops: &[S], t: f32, position: impl Fn(&S) -> f32) -> (usize, usize, f32) {
    let last = stops.len() - 1;
    if t <= position(&stops[0]) {
        return (0, 0, 0.0);
    }
    if t >= position(&stops[last]) {
        return (last, last, 0.0);
    }
    for (i, pair) in stops.windows(2).enumerate() {
        let (a, b) = (position(&pair[0]), position(&pair[1]));
        if t >= a && t < b {
            return (i, i + 1, (t - a) / (b - a));
        }
    }
    (last, last, 0.0)
}

/// Built-in toon ramps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientPreset {
    /// Black to white
    Linear,
    /// Hard shadow/light split at the midpoint
    TwoTone,
    /// Shadow, midtone and light bands
    ThreeBand,
    /// Smooth shadow to light blend through a warm midtone
    Soft,
}

const SHADOW: [f32; 3] = [0.22, 0.2, 0.3];
const MIDTONE: [f32; 3] = [0.6, 0.55, 0.6];
const LIGHT: [f32; 3] = [1.0, 0.97, 0.92];

impl GradientPreset {
    pub const ALL: [GradientPreset; 4] = [
        GradientPreset::Linear,
        GradientPreset::TwoTone,
        GradientPreset::ThreeBand,
        GradientPreset::Soft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GradientPreset::Linear => "linear",
            GradientPreset::TwoTone => "two-tone",
            GradientPreset::ThreeBand => "three-band",
            GradientPreset::Soft => "soft",
        }
    }

    pub fn gradient(&self) -> Gradient {
        let color_stops = match self {
            GradientPreset::Linear => return Gradient::linear([0.0; 3], [1.0; 3]),
            GradientPreset::TwoTone => vec![
                ColorStop::new(0.0, SHADOW),
                ColorStop::new(0.5, SHADOW),
                ColorStop::new(0.5, LIGHT),
                ColorStop::new(1.0, LIGHT),
            ],
            GradientPreset::ThreeBand => vec![
                ColorStop::new(0.0, SHADOW),
                ColorStop::new(0.33, SHADOW),
                ColorStop::new(0.33, MIDTONE),
                ColorStop::new(0.66, MIDTONE),
                ColorStop::new(0.66, LIGHT),
                ColorStop::new(1.0, LIGHT),
            ],
            GradientPreset::Soft => vec![
                ColorStop::new(0.0, SHADOW),
                ColorStop::new(0.5, MIDTONE),
                ColorStop::new(1.0, LIGHT),
            ],
        };
        Gradient {
            color_stops,
            alpha_stops: opaque_alpha(),
        }
    }
}

impl fmt::Display for GradientPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GradientPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GradientPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = GradientPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{}', expected one of: {}", s, names.join(", "))
            })
    }
}
