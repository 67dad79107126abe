use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use hough_annotate::{
    annotate_with_policy, unwrap_polar, AnnotateConfig, AnnotateReport, UnwrapParams,
};
use image::{DynamicImage, ImageReader};
use log::{info, LevelFilter};
use nalgebra::Point2;

#[derive(Parser, Debug)]
#[command(name = "hough-annotate", version, about = "Detect circles in photos and draw them")]
struct Cli {
    /// Log verbosity.
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect circles and write an annotated copy of the image.
    Annotate {
        /// Input image (any format the `image` crate decodes).
        input: Option<PathBuf>,
        /// Output image; the format follows the extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON config overriding passes and marker style.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write a JSON report of the detected circles.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Detect circles and print the JSON report without writing an image.
    Detect {
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Unwrap a circular region into a rectangular strip.
    Unwrap {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        cx: f32,
        #[arg(long)]
        cy: f32,
        #[arg(long)]
        radius: f32,
        /// Output height; the output is twice as wide.
        #[arg(long, default_value_t = 300)]
        height: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_level: LogLevel) {
    hough_annotate::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) {
    let _ = hough_annotate::core::init_with_level(level.into());
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Annotate {
            input,
            output,
            config,
            report,
        } => {
            let cfg = load_config(config.as_deref())?;
            let input = input
                .or_else(|| cfg.image_path.as_ref().map(PathBuf::from))
                .ok_or("no input image: pass INPUT or set image_path in --config")?;
            let output = output.unwrap_or_else(|| cfg.output_path(&input));
            let report_path = report.or_else(|| cfg.report_path.as_ref().map(PathBuf::from));

            let (annotated, summary) = annotate_file(&input, &cfg)?;
            save_image(annotated, &output)?;
            info!("wrote {}", output.display());
            println!("found {} circles", summary.total_circles);

            if let Some(path) = report_path {
                summary.write_json(&path)?;
                info!("wrote report {}", path.display());
            }
        }
        Command::Detect { input, config } => {
            let cfg = load_config(config.as_deref())?;
            let (_, summary) = annotate_file(&input, &cfg)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Unwrap {
            input,
            output,
            cx,
            cy,
            radius,
            height,
        } => {
            let img = ImageReader::open(&input)?.decode()?.to_rgba8();
            let params = UnwrapParams {
                center: Point2::new(cx, cy),
                radius,
                output_height: height,
            };
            let strip = unwrap_polar(&img, &params)?;
            save_image(strip, &output)?;
            info!("wrote {}", output.display());
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnnotateConfig, hough_annotate::IoError> {
    match path {
        Some(path) => AnnotateConfig::load_json(path),
        None => Ok(AnnotateConfig::default()),
    }
}

fn annotate_file(
    input: &Path,
    cfg: &AnnotateConfig,
) -> Result<(image::RgbaImage, AnnotateReport), Box<dyn std::error::Error>> {
    let policy = cfg.build_policy()?;
    let started = Instant::now();
    let mut img = ImageReader::open(input)?.decode()?.to_rgba8();
    let annotation = annotate_with_policy(&mut img, &policy)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    Ok((img, AnnotateReport::new(input, annotation, elapsed_ms)))
}

/// Save as RGBA, dropping alpha for formats that cannot store it.
fn save_image(img: image::RgbaImage, path: &Path) -> image::ImageResult<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => DynamicImage::ImageRgba8(img).to_rgb8().save(path),
        _ => img.save(path),
    }
}
