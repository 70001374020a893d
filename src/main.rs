use clap::{Parser, Subcommand};
use imgrs::config::{self, AppConfig};
use imgrs::imaging::{OutputFormat, ResizeAlgorithm, RustBackend, Size, fit_image_rect};
use imgrs::output;
use imgrs::session::Session;
use imgrs::types::OperationMode;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "IMGRS_LOG";

#[derive(Parser)]
#[command(name = "imgrs")]
#[command(about = "Resize or crop an image through validated requests")]
#[command(long_about = "\
Resize or crop an image through validated requests

Width and height are typed as free text: anything that is not a digit is
dropped, and with the aspect lock on the other side follows the source ratio.
Crops are placed on a letterboxed preview and mapped back to source pixels.

Outputs are written next to the input unless --output is given:

  photos/dawn.jpg  resize             → photos/dawn_resized.jpg
  photos/dawn.jpg  crop --format webp → photos/dawn_cropped.webp

Defaults come from ./imgrs.toml when present.
Run 'imgrs gen-config' to generate a documented imgrs.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./imgrs.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug events to stderr (IMGRS_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output choice shared by resize and crop.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output encoding: sameAsInput, png, jpeg or webp
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output file (default: derived from the input name)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print dimensions, format and size of an image
    Probe {
        path: PathBuf,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// List readable formats, output formats and algorithms
    Formats,
    /// Resize an image
    Resize {
        input: PathBuf,
        /// Target width, as typed
        #[arg(long)]
        width: Option<String>,
        /// Target height, as typed (with the lock on, this drives width)
        #[arg(long)]
        height: Option<String>,
        /// Edit width and height independently
        #[arg(long)]
        unlock: bool,
        /// Resampling filter: nearest, bilinear or lanczos3
        #[arg(long)]
        algorithm: Option<ResizeAlgorithm>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Crop an image with the configured frame
    Crop {
        input: PathBuf,
        /// Preview area the image is fitted into, as WxH
        #[arg(long, default_value = "600x400", value_parser = parse_size)]
        container: Size,
        /// Frame left edge, relative to the displayed image
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        /// Frame top edge, relative to the displayed image
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print a stock imgrs.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{}", error_line(err.as_ref()));
        std::process::exit(1);
    }
}

/// The line shown for a failed command: the error's own message, never its
/// internal structure.
fn error_line(err: &dyn std::error::Error) -> String {
    format!("Error: {err}")
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::new();

    match cli.command {
        Command::Probe { path, json } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            let mut session = Session::start(&backend, app_config.session_settings());
            let descriptor = session.select_image(&backend, &path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(descriptor)?);
            } else {
                output::print_descriptor(descriptor);
            }
        }
        Command::Formats => {
            let session = Session::start(&backend, AppConfig::default().session_settings());
            output::print_formats(session.supported_formats());
        }
        Command::Resize {
            input,
            width,
            height,
            unlock,
            algorithm,
            output: target,
        } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            let mut session = Session::start(&backend, app_config.session_settings());
            session.select_image(&backend, &input)?;

            if unlock && session.dimensions().locked {
                session.toggle_lock();
            }
            if let Some(raw) = width {
                session.edit_width(&raw);
            }
            if let Some(raw) = height {
                session.edit_height(&raw);
            }
            if let Some(algorithm) = algorithm {
                session.set_algorithm(algorithm);
            }
            if let Some(format) = target.format {
                session.set_resize_format(format);
            }
            if let Some(path) = target.output {
                session.set_output_path(path);
            }

            let written = session.submit(&backend)?;
            output::print_outcome(OperationMode::Resize, written);
        }
        Command::Crop {
            input,
            container,
            x,
            y,
            output: target,
        } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            let mut session = Session::start(&backend, app_config.session_settings());
            let source = session.select_image(&backend, &input)?.dimensions();

            session.set_mode(OperationMode::Crop);
            if let Some(format) = target.format {
                session.set_crop_format(format);
            }
            if let Some(path) = target.output {
                session.set_output_path(path);
            }

            let image = Size::new(source.0 as f64, source.1 as f64);
            let displayed = fit_image_rect(container, image).size();
            session.move_crop_to(displayed, x, y);

            let written = session.submit(&backend)?;
            output::print_outcome(OperationMode::Crop, written);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `IMGRS_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config` must exist; the implicit `./imgrs.toml` is optional.
fn load_app_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) if !path.exists() => {
            Err(format!("config file not found: {}", path.display()).into())
        }
        Some(path) => Ok(config::load_config_file(path)?),
        None => Ok(config::load_config(Path::new("."))?),
    }
}

/// Parse `WxH` (also `W×H`) into a non-empty size.
fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |part: &str| -> Result<f64, String> {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("'{part}' is not a positive number"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}
