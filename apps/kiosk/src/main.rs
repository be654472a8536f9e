use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use screensaver_core::{DashboardBackend, HttpBackend, Screensaver, ScreensaverHandle};
use shared::domain::ScreensaverTimeout;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod surfaces;

use crate::{
    console::{parse_command, ConsoleCommand},
    surfaces::TracingSurfaces,
};

#[derive(Parser, Debug)]
struct Args {
    /// Dashboard backend base URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Idle timeout in milliseconds; 0 disables. Read from backend settings when omitted.
    #[arg(long)]
    timeout_ms: Option<String>,
    /// Re-read backend settings this often; 0 disables polling.
    #[arg(long)]
    settings_poll_secs: Option<u64>,
    #[arg(long, default_value = "kiosk.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config);
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if let Some(v) = args.timeout_ms.as_deref() {
        settings.screensaver_timeout = Some(ScreensaverTimeout::parse(v).unwrap_or_else(|err| {
            warn!(error = %err, "kiosk: invalid --timeout-ms, screensaver disabled");
            ScreensaverTimeout::DISABLED
        }));
    }
    if let Some(v) = args.settings_poll_secs {
        settings.settings_poll_secs = v;
    }

    let backend = Arc::new(HttpBackend::new(&settings.server_url)?);
    let pinned = settings.screensaver_timeout;
    let timeout = match pinned {
        Some(timeout) => timeout,
        None => timeout_from_backend(backend.as_ref())
            .await
            .unwrap_or(ScreensaverTimeout::DISABLED),
    };
    info!(
        server_url = %settings.server_url,
        timeout_ms = timeout.as_millis(),
        "kiosk: starting screensaver"
    );

    let surfaces = TracingSurfaces::default();
    let (handle, task) = Screensaver::spawn(backend.clone(), surfaces.clone(), timeout);

    let poller = (pinned.is_none() && settings.settings_poll_secs > 0).then(|| {
        tokio::spawn(poll_settings(
            backend.clone(),
            handle.clone(),
            Duration::from_secs(settings.settings_poll_secs),
            timeout,
        ))
    });

    run_console(&handle, &surfaces).await?;

    if let Some(poller) = poller {
        poller.abort();
    }
    handle.shutdown()?;
    task.await?;
    Ok(())
}

/// Reads the timeout the dashboard's settings page stores. `None` when the
/// backend cannot be reached; invalid values count as disabled.
async fn timeout_from_backend(backend: &dyn DashboardBackend) -> Option<ScreensaverTimeout> {
    match backend.fetch_settings().await {
        Ok(remote) => Some(remote.screensaver_timeout().unwrap_or_else(|err| {
            warn!(error = %err, "kiosk: invalid screensaverTimeout setting, treating as disabled");
            ScreensaverTimeout::DISABLED
        })),
        Err(err) => {
            warn!(error = %err, "kiosk: could not read backend settings");
            None
        }
    }
}

async fn poll_settings(
    backend: Arc<HttpBackend>,
    handle: ScreensaverHandle,
    every: Duration,
    mut current: ScreensaverTimeout,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(timeout) = timeout_from_backend(backend.as_ref()).await else {
            continue;
        };
        if timeout == current {
            continue;
        }
        info!(
            from_ms = current.as_millis(),
            to_ms = timeout.as_millis(),
            "kiosk: screensaver timeout changed"
        );
        if handle.reconfigure(timeout).is_err() {
            break;
        }
        current = timeout;
    }
}

async fn run_console(handle: &ScreensaverHandle, surfaces: &TracingSurfaces) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(console::ConsoleError::Empty) => continue,
            Err(err) => {
                warn!(error = %err, "kiosk: ignoring console line");
                continue;
            }
        };

        match command {
            ConsoleCommand::Input(kind) => handle.input(kind)?,
            ConsoleCommand::VideoEnded => handle.video_ended()?,
            ConsoleCommand::VideoError(reason) => handle.video_error(reason)?,
            ConsoleCommand::Timeout(timeout) => handle.reconfigure(timeout)?,
            ConsoleCommand::Off => handle.teardown()?,
            ConsoleCommand::Status => {
                let status = handle.status().await?;
                let slots = surfaces.visibility();
                println!(
                    "state={:?} timeout_ms={} epoch={} cursor={}/{} current={} container={} image={} video={} playing={}",
                    status.state,
                    status.timeout.as_millis(),
                    status.epoch,
                    status.cursor,
                    status.playlist_len,
                    status
                        .current
                        .as_ref()
                        .map(|item| item.url.as_str())
                        .unwrap_or("-"),
                    slots.container,
                    slots.image.as_deref().unwrap_or("-"),
                    slots.video.as_deref().unwrap_or("-"),
                    slots.video_playing,
                );
            }
            ConsoleCommand::Quit => break,
        }
    }
    Ok(())
}
