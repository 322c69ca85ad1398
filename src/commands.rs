use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use anyhow::{anyhow, Context};
use clap::ValueEnum;

use crate::device::{run_session, Device};
use crate::protocol::{self, DeviceKind};
use crate::serial;
use crate::settings::AppSettings;

/// Print the serial ports the OS reports
pub fn list_ports() {
    let ports = serial::list_available_ports();
    if ports.is_empty() {
        println!("No serial ports found");
        return;
    }
    for port in ports {
        println!("{}", port);
    }
}

/// Print every supported device kind with its line settings
pub fn list_devices() {
    for kind in DeviceKind::ALL {
        let (config, _) = protocol::resolve(kind);
        let name = kind
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        println!("{:<24} {:<34} {} baud", name, kind.label(), config.baud_rate);
    }
}

/// Run a session on the configured port until Ctrl-C or a transport error
pub async fn run_device(settings: &AppSettings) -> anyhow::Result<()> {
    let port = settings
        .port
        .as_deref()
        .ok_or_else(|| anyhow!("No port given; use --port or list ports with --list-ports"))?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::Relaxed);
        }
    });

    let mut device = Device::with_settings(port, settings.device);
    device
        .connect()
        .with_context(|| format!("Failed to open {}", port))?;
    println!("{} on {} - press Ctrl-C to stop", settings.device, port);

    let summary = run_session(
        &mut device,
        || cancelled.load(Ordering::Relaxed),
        |reading| {
            println!(
                "{} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                reading.trim_end()
            );
        },
    )
    .await
    .with_context(|| format!("Session on {} ended", port))?;

    println!("Stopped after {} readings", summary.readings);
    Ok(())
}
