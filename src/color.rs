use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Linear RGBA color with float channels, nominally in [0, 1]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque grayscale color
    pub const fn gray(v: f32) -> Self {
        Color::new(v, v, v, 1.0)
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Color::new(v.x, v.y, v.z, v.w)
    }

    /// Blend towards `other`; `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Color::from_vec4(self.to_vec4().lerp(other.to_vec4(), t))
    }

    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
