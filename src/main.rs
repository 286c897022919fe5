use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use toon_textures::export::{save_png, save_raw};
use toon_textures::{
    generate_noise, generate_ramp, CellularParameters, Gradient, GradientPreset, NoiseKind,
    NoiseParameters, PixelBuffer, Resolution,
};

/// Toon shading texture generator
#[derive(Debug, Parser)]
#[command(name = "toon-textures", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a grayscale noise texture
    Noise {
        #[command(subcommand)]
        kind: NoiseCommand,
    },
    /// Bake a gradient into a ramp texture (width x 1)
    Ramp(RampArgs),
}

#[derive(Debug, Subcommand)]
enum NoiseCommand {
    /// Fractal Perlin noise
    Perlin {
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value_t = NoiseParameters::default().scale)]
        scale: f32,
        #[arg(long, default_value_t = NoiseParameters::default().octaves)]
        octaves: u32,
        #[arg(long, default_value_t = NoiseParameters::default().persistence)]
        persistence: f32,
        #[arg(long, default_value_t = NoiseParameters::default().lacunarity)]
        lacunarity: f32,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_x: f32,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_y: f32,
        #[arg(long, default_value_t = 0)]
        seed: u32,
    },
    /// Worley (cellular) noise
    Worley {
        #[command(flatten)]
        output: OutputArgs,
        /// Number of feature points
        #[arg(long, default_value_t = CellularParameters::default().cell_count)]
        cells: u32,
        #[arg(long, default_value_t = CellularParameters::default().falloff)]
        falloff: f32,
        #[arg(long, default_value_t = 0)]
        seed: u32,
        /// Bright cell centers instead of dark ones
        #[arg(long)]
        invert: bool,
    },
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Square texture size: 128, 256, 512, 1024 or 2048
    #[arg(short, long, default_value_t = Resolution::default())]
    resolution: Resolution,
    #[arg(short, long, default_value = "noise.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,
}

#[derive(Debug, Args)]
struct RampArgs {
    #[arg(short, long, default_value_t = 256)]
    width: u32,
    /// Built-in ramp: linear, two-tone, three-band or soft
    #[arg(long, conflicts_with = "gradient", default_value_t = GradientPreset::TwoTone)]
    preset: GradientPreset,
    /// JSON file with `color_stops` and optional `alpha_stops`
    #[arg(long)]
    gradient: Option<PathBuf>,
    #[arg(short, long, default_value = "ramp.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Raw,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Noise { kind } => run_noise(kind),
        Command::Ramp(args) => run_ramp(args),
    }
}

fn run_noise(command: NoiseCommand) -> Result<()> {
    let (output, kind) = match command {
        NoiseCommand::Perlin {
            output,
            scale,
            octaves,
            persistence,
            lacunarity,
            offset_x,
            offset_y,
            seed,
        } => {
            let params = NoiseParameters {
                scale,
                octaves,
                persistence,
                lacunarity,
                offset_x,
                offset_y,
                seed,
            };
            (output, NoiseKind::Perlin(params))
        }
        NoiseCommand::Worley {
            output,
            cells,
            falloff,
            seed,
            invert,
        } => {
            let params = CellularParameters {
                cell_count: cells,
                falloff,
                seed,
                invert,
            };
            (output, NoiseKind::Worley(params))
        }
    };

    let size = output.resolution.size();
    println!("Generating {}x{} noise texture...", size, size);
    let texture = generate_noise(size, size, &kind)?;

    write_texture(&texture, &output.output, output.format)
}

fn run_ramp(args: RampArgs) -> Result<()> {
    let gradient = match &args.gradient {
        Some(path) => load_gradient(path)?,
        None => {
            log::info!("Using preset '{}'", args.preset);
            args.preset.gradient()
        }
    };

    println!("Baking {}px ramp texture...", args.width);
    let ramp = generate_ramp(args.width, &gradient)?;

    write_texture(&ramp, &args.output, args.format)
}

fn load_gradient(path: &Path) -> Result<Gradient> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read gradient file {}", path.display()))?;
    let gradient: Gradient = serde_json::from_str(&text)
        .with_context(|| format!("invalid gradient in {}", path.display()))?;
    log::info!(
        "Loaded gradient with {} color stops and {} alpha stops",
        gradient.color_stops().len(),
        gradient.alpha_stops().len()
    );
    Ok(gradient)
}

fn write_texture(texture: &PixelBuffer, path: &Path, format: Format) -> Result<()> {
    match format {
        Format::Png => save_png(texture, path)?,
        Format::Raw => save_raw(texture, path)?,
    }
    println!("Saved {}x{} texture to {}", texture.width(), texture.height(), path.display());
    Ok(())
}
