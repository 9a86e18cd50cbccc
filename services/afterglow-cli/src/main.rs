//! Afterglow command-line driver.
//!
//! Runs the dynamics, spectra and projection stages for one configuration
//! and writes every grid and light curve as delimited text.

mod output;

use afterglow::{run, PipelineConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "afterglow")]
#[command(about = "Relativistic blast-wave afterglow light curves")]
struct Args {
    /// YAML configuration file; defaults plus AFTERGLOW_* variables otherwise
    #[arg(short, long, env = "AFTERGLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for output files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// File name prefix
    #[arg(long, default_value = "afterglow")]
    prefix: String,

    /// Override the viewing angle, rad
    #[arg(long)]
    theta_obs: Option<f64>,

    /// Solve the reverse shock as well
    #[arg(long)]
    reverse_shock: bool,

    /// Also write the shock and spectral grids
    #[arg(long)]
    grids: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::from_env(),
    };
    if let Some(theta_obs) = args.theta_obs {
        config.observer.theta_obs = theta_obs;
    }
    config.reverse_shock |= args.reverse_shock;
    info!(
        config = ?args.config,
        theta_obs = config.observer.theta_obs,
        reverse_shock = config.reverse_shock,
        "Loaded configuration"
    );

    let out = run(&config)?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let writer = output::Writer::new(&args.output_dir, &args.prefix);
    writer.write_light_curves(&out.light_curves)?;
    writer.write_band_curves(&out.band_curves)?;
    writer.write_views(&out.views)?;
    if args.grids {
        writer.write_coord(&out.coord)?;
        writer.write_shock("fs", &out.dynamics.forward)?;
        writer.write_spectra("fs", &out.forward_spectra)?;
        if let (Some(shock), Some(spectra)) = (&out.dynamics.reverse, &out.reverse_spectra) {
            writer.write_shock("rs", shock)?;
            writer.write_spectra("rs", spectra)?;
        }
    }

    info!(dir = %args.output_dir.display(), "Output written");
    Ok(())
}
