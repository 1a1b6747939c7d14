//! ascii_planet - spin a day/night textured planet in the terminal
//!
//! Controls (run mode):
//! - Space: Pause
//! - Q, Escape or Ctrl-C: Quit
//!
//! Usage:
//!   ascii_planet run                    - Animate in the terminal
//!   ascii_planet export -o frames.json  - Render one revolution to JSON
//!   ascii_planet texture map.png out.txt - Convert an image into a texture
//!   ascii_planet check-config           - Validate config and textures

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use ascii_planet::config::AppConfig;
use ascii_planet::export::FrameSequence;
use ascii_planet::terminal::{parse_key_event, Action, TerminalDisplay};
use ascii_planet::texgen::{self, TexgenOptions};
use ascii_planet::{Renderer, Revolution, Spin};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "ascii_planet")]
#[command(version)]
#[command(about = "Ray-cast a spinning ASCII planet")]
struct Cli {
    /// Path to config file (defaults to ./config.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by the rendering subcommands
#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Planet radius multiplier
    #[arg(long)]
    scale: Option<f64>,

    /// Allow a scale above the advisory maximum
    #[arg(long)]
    force_scale: bool,

    /// Fraction of the default rotation step per frame
    #[arg(long)]
    speed: Option<f64>,

    /// Axial tilt in degrees
    #[arg(long, allow_negative_numbers = true)]
    tilt: Option<f64>,

    /// Render the whole surface in daylight
    #[arg(long)]
    no_lighting: bool,

    /// Day texture file
    #[arg(long)]
    day: Option<PathBuf>,

    /// Night texture file
    #[arg(long)]
    night: Option<PathBuf>,
}

impl RenderArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(scale) = self.scale {
            config.render.scale = scale;
        }
        if self.force_scale {
            config.render.force_scale = true;
        }
        if let Some(speed) = self.speed {
            config.render.speed = speed;
        }
        if let Some(tilt) = self.tilt {
            config.render.tilt = tilt;
        }
        if self.no_lighting {
            config.render.lighting = false;
        }
        if let Some(ref day) = self.day {
            config.textures.day = day.clone();
        }
        if let Some(ref night) = self.night {
            config.textures.night = night.clone();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the planet in the terminal
    Run {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render exactly one revolution and write it as JSON
    Export {
        #[command(flatten)]
        render: RenderArgs,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an image into an ASCII texture
    Texture {
        /// Input image (PNG or JPEG)
        input: PathBuf,

        /// Output text file
        output: PathBuf,

        #[arg(long, default_value_t = 202)]
        width: u32,

        #[arg(long, default_value_t = 80)]
        height: u32,

        /// Ocean colour as R,G,B
        #[arg(long, value_parser = parse_rgb, default_value = "1,4,19")]
        ocean_color: [u8; 3],

        /// Character used for ocean pixels
        #[arg(long, default_value_t = '.')]
        ocean_char: char,

        /// Per-channel colour tolerance for ocean matching
        #[arg(long, default_value_t = 20)]
        threshold: u32,
    },

    /// Validate configuration and textures
    CheckConfig {
        #[command(flatten)]
        render: RenderArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { render } => {
            let config = load_config(cli.config, &render)?;
            run_streaming(&config)?;
        }
        Commands::Export { render, output } => {
            let mut config = load_config(cli.config, &render)?;
            if let Some(output) = output {
                config.export.output = output;
            }
            run_export(&config)?;
        }
        Commands::Texture {
            input,
            output,
            width,
            height,
            ocean_color,
            ocean_char,
            threshold,
        } => {
            let palette = AppConfig::load_or_default(cli.config.as_deref())?.textures.palette;
            let options = TexgenOptions {
                palette,
                width,
                height,
                ocean_color,
                ocean_char,
                color_threshold: threshold,
            };
            texgen::convert_file(&input, &output, &options)
                .with_context(|| format!("converting {}", input.display()))?;
            println!("ASCII texture has been saved to {}", output.display());
        }
        Commands::CheckConfig { render } => {
            let config = load_config(cli.config, &render)?;
            check_config(&config)?;
        }
    }

    Ok(())
}

fn parse_rgb(value: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got {value:?}"));
    }
    let mut rgb = [0u8; 3];
    for (channel, part) in rgb.iter_mut().zip(parts) {
        *channel = part
            .parse()
            .map_err(|e| format!("invalid colour channel {part:?}: {e}"))?;
    }
    Ok(rgb)
}

/// Load the config file, apply CLI overrides and validate
fn load_config(path: Option<PathBuf>, overrides: &RenderArgs) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_or_default(path.as_deref())
        .context("Error loading configuration")?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn build_renderer(config: &AppConfig) -> anyhow::Result<Renderer> {
    let textures = config.load_textures().context("Failed to load textures")?;
    Ok(Renderer::new(config.viewport, config.build_camera(), config.planet(), textures)
        .with_background(config.render.background))
}

/// Streaming mode: render, draw, wait, advance until the user quits
fn run_streaming(config: &AppConfig) -> anyhow::Result<()> {
    let renderer = build_renderer(config)?;
    let frame_interval = Duration::from_millis(config.display.frame_interval_ms);


    if let Ok((width, height)) = TerminalDisplay::size() {
        // one extra row for the status line
        if width < config.viewport.columns() || height < config.viewport.rows() + 1 {
            tracing::warn!(
                width,
                height,
                "Terminal is smaller than the frame; output will be clipped"
            );
        }
    }

    let mut terminal = TerminalDisplay::new().context("Failed to initialize terminal")?;
    let mut frames = Spin::new(&renderer, config.render.speed);
    tracing::info!(
        columns = config.viewport.columns(),
        rows = config.viewport.rows(),
        speed = config.render.speed,
        step_degrees = frames.step().to_degrees(),
        "Starting animation"
    );
    let mut paused = false;
    let mut current = frames.next();

    'main_loop: loop {
        let started = Instant::now();

        if let Some((angle, canvas)) = &current {
            let status = format!(
                "{:>6.1}°{} | [SPACE] Pause  [Q]uit",
                angle.to_degrees() % 360.0,
                if paused { " (paused)" } else { "" }
            );
            if let Err(e) = terminal.render(&canvas.to_frame(), &status) {
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    break;
                }
                return Err(e.into());
            }
        }

        // Input is only checked between frames
        loop {
            let remaining = frame_interval.saturating_sub(started.elapsed());
            match terminal.poll_input(remaining)? {
                Some(key) => match parse_key_event(key) {
                    Action::Quit => break 'main_loop,
                    Action::Pause => {
                        paused = !paused;
                        break;
                    }
                    Action::None => {}
                },
                None => break,
            }
            if remaining.is_zero() {
                break;
            }
        }

        if !paused {
            current = frames.next();
        }
    }

    drop(terminal);
    println!("Exiting...");
    Ok(())
}

/// Export mode: one revolution, closing duplicate dropped
fn run_export(config: &AppConfig) -> anyhow::Result<()> {
    let renderer = build_renderer(config)?;
    let canvases = Revolution::new(&renderer, config.render.speed).map(|(angle, canvas)| {
        tracing::debug!(angle, "Captured frame");
        canvas
    });
    let sequence = FrameSequence::from_canvases(canvases)?;
    sequence
        .write_json(&config.export.output)
        .with_context(|| format!("writing {}", config.export.output.display()))?;
    println!(
        "Saved {} frames to {}",
        sequence.count,
        config.export.output.display()
    );
    Ok(())
}

fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let textures = config.load_textures()?;
    println!("✓ Configuration is valid\n");
    println!("Textures:");
    println!("  Day:     {}", config.textures.day.display());
    println!("  Night:   {}", config.textures.night.display());
    println!("  Size:    {}x{}", textures.width(), textures.height());
    println!("  Palette: {:?} ({} ranks)", config.textures.palette, textures.palette.len());
    println!("\nRender:");
    println!("  Scale:    {}", config.render.scale);
    println!("  Speed:    {}", config.render.speed);
    println!("  Tilt:     {}°", config.render.tilt);
    println!("  Lighting: {}", if config.render.lighting { "on" } else { "off" });
    println!("\nOutput:");
    println!(
        "  Grid:     {}x{} cells ({}x{} px, {}x{} per cell)",
        config.viewport.columns(),
        config.viewport.rows(),
        config.viewport.width_px,
        config.viewport.height_px,
        config.viewport.cell_width,
        config.viewport.cell_height
    );
    println!(
        "  Frames per revolution: {}",
        Revolution::angles(config.render.speed).len()
    );
    Ok(())
}
