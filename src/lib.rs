pub mod commands;
pub mod device;
pub mod protocol;
pub mod serial;
pub mod settings;

use std::path::PathBuf;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use protocol::DeviceKind;
use settings::AppSettings;

/// Serial diagnostic toolbox for barcode scanners and weighing scales
#[derive(Debug, Parser)]
#[command(name = "sak-toolbox", version, about)]
pub struct Cli {
    /// Serial port to open, e.g. COM3 or /dev/ttyUSB0
    #[arg(short, long)]
    pub port: Option<String>,

    /// Device protocol to run
    #[arg(short, long, value_enum)]
    pub device: Option<DeviceKind>,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long)]
    pub log_level: Option<String>,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// List supported device types and exit
    #[arg(long)]
    pub list_devices: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Also installs the log -> tracing bridge used by the library's log macros
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => AppSettings::load(path)?,
        None => AppSettings::default(),
    }
    .merge(cli.port, cli.device, cli.log_level);

    init_logging(&settings.log_level);
    log::debug!("Settings: {:?}", settings);

    if cli.list_ports {
        commands::list_ports();
        return Ok(());
    }
    if cli.list_devices {
        commands::list_devices();
        return Ok(());
    }

    commands::run_device(&settings).await
}
