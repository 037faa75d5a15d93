/// Lensview - live point cloud projection in the terminal
///
/// Controls:
///   - Up/Down: Select a parameter
///   - Left/Right, PageUp/PageDown: Adjust it
///   - Enter: Type an exact value
///   - O: Load a point file
///   - Q/ESC: Quit

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use env_logger::{Env, Target};
use lensview_core::Variant;
use lensview_terminal::{TerminalApp, ViewerConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Project point clouds through tunable camera models")]
struct Args {
    /// Point file to load at startup (one point per line).
    #[arg(long, short)]
    points: Option<PathBuf>,

    /// Projection model: a (perspective), b (split-distortion) or c (field-distortion).
    #[arg(long, short)]
    variant: Option<Variant>,

    /// Optional path to a JSON ViewerConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quiet period in milliseconds before edits are applied.
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Write logs to this file; logging is off otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<ViewerConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.debounce_ms = debounce_ms;
        }
        if self.points.is_some() {
            config.points = self.points;
        }
        Ok(config)
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    // The alternate screen owns stderr, so logs only go to a file.
    let mut builder = match log_file {
        Some(path) => {
            let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(File::create(path)?)));
            builder
        }
        None => env_logger::Builder::from_env(Env::default().default_filter_or("off")),
    };
    builder.try_init()?;
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = args.into_config()?;
    log::info!("Starting with {config:?}");

    let mut app = TerminalApp::new(&config)?;
    if let Some(path) = &config.points {
        app.load(path);
    }
    app.run()?;

    println!("{}", app.status());
    Ok(())
}
