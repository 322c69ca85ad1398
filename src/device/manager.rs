use serde::{Deserialize, Serialize};

use super::{Device, Result};

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Non-empty readings handed to the sink
    pub readings: u64,
    /// True when the caller's cancel signal ended the session
    pub cancelled: bool,
}

/// Connect `device`, feed every non-empty reading to `sink` and disconnect
/// when `cancel` fires or a transport error ends the session.
///
/// `cancel` is polled between `process` calls only, so a frame in flight
/// always runs to completion or to its read timeout.
pub async fn run_session<C, S>(
    device: &mut Device,
    mut cancel: C,
    mut sink: S,
) -> Result<SessionSummary>
where
    C: FnMut() -> bool,
    S: FnMut(&str),
{
    if !device.is_connected() {
        device.connect()?;
    }

    let mut summary = SessionSummary { readings: 0, cancelled: false };

    loop {
        // Let other tasks on a current-thread runtime (signal handlers) run
        tokio::task::yield_now().await;
        if cancel() {
            log::info!(
                "Session on {} cancelled after {} readings",
                device.port_name(),
                summary.readings
            );
            summary.cancelled = true;
            break;
        }

        match device.process().await {
            Ok(reading) if reading.is_empty() => {}
            Ok(reading) => {
                summary.readings += 1;
                sink(&reading);
            }
            Err(e) => {
                device.disconnect();
                return Err(e);
            }
        }
    }

    device.disconnect();
    Ok(summary)
}
