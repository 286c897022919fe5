use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::synth::PixelBuffer;

/// Quantize a float channel to 8 bits
fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts the given PixelBuffer to an 8-bit RGBA image
///
/// Channels are clamped to [0, 1] before quantization.
pub fn to_rgba8(buffer: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        let c = buffer.get(x, y).unwrap_or_default();
        Rgba([quantize(c.r), quantize(c.g), quantize(c.b), quantize(c.a)])
    })
}

/// Exports the given PixelBuffer as a PNG file
///
/// # Arguments
/// * `buffer` - The synthesized texture
/// * `output_path` - Path where the PNG file will be saved
pub fn save_png(buffer: &PixelBuffer, output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    to_rgba8(buffer)
        .save(output_path)
        .with_context(|| format!("failed to write PNG to {}", output_path.display()))?;
    Ok(())
}

/// Dumps the raw `f32` RGBA data, row-major, without a header
pub fn save_raw(buffer: &PixelBuffer, output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    let file = File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(buffer.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::GradientPreset;
    use crate::synth::generate_ramp;

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 128);
        assert_eq!(quantize(-2.0), 0);
        assert_eq!(quantize(3.0), 255);
    }

    #[test]
    fn test_to_rgba8() {
        let ramp = generate_ramp(3, &GradientPreset::Linear.gradient()).unwrap();
        let img = to_rgba8(&ramp);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 1);
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([128, 128, 128, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_png_and_raw() {
        let ramp = generate_ramp(16, &GradientPreset::ThreeBand.gradient()).unwrap();
        let dir = std::env::temp_dir();

        let png_path = dir.join(format!("toon_textures_test_{}.png", std::process::id()));
        save_png(&ramp, &png_path).unwrap();
        let decoded = image::open(&png_path).unwrap().to_rgba8();
        assert_eq!(decoded, to_rgba8(&ramp));
        std::fs::remove_file(&png_path).unwrap();

        let raw_path = dir.join(format!("toon_textures_test_{}.bin", std::process::id()));
        save_raw(&ramp, &raw_path).unwrap();
        let bytes = std::fs::read(&raw_path).unwrap();
        assert_eq!(bytes.as_slice(), ramp.as_bytes());
        std::fs::remove_file(&raw_path).unwrap();
    }
}
