use std::sync::Arc;

use anyhow::{anyhow, Result};
use shared::domain::{Playlist, PlaylistItem, ScreensaverTimeout};
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    backend::DashboardBackend,
    loader::PlaylistLoader,
    monitor::{IdleMonitor, InputKind, MonitorState},
    surface::DisplaySurfaces,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreensaverEvent {
    StateChanged(MonitorState),
    PlaylistLoaded { epoch: u64, items: usize },
    PlaylistUnavailable { epoch: u64 },
    ItemShown { cursor: usize, item: PlaylistItem },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreensaverStatus {
    pub state: MonitorState,
    pub timeout: ScreensaverTimeout,
    pub epoch: u64,
    pub cursor: usize,
    pub playlist_len: usize,
    pub current: Option<PlaylistItem>,
}

enum Command {
    Reconfigure(ScreensaverTimeout),
    Input(InputKind),
    VideoEnded,
    VideoError(String),
    Teardown,
    Status(oneshot::Sender<ScreensaverStatus>),
    Shutdown,
}

struct PlaylistLoad {
    epoch: u64,
    playlist: Option<Playlist>,
}

/// Cheap, cloneable front door to the screensaver task. Every call is queued
/// and applied in order on that task.
#[derive(Clone)]
pub struct ScreensaverHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<MonitorState>,
    events: broadcast::Sender<ScreensaverEvent>,
}

impl ScreensaverHandle {
    pub fn reconfigure(&self, timeout: ScreensaverTimeout) -> Result<()> {
        self.send(Command::Reconfigure(timeout))
    }

    pub fn input(&self, kind: InputKind) -> Result<()> {
        self.send(Command::Input(kind))
    }

    pub fn video_ended(&self) -> Result<()> {
        self.send(Command::VideoEnded)
    }

    pub fn video_error(&self, reason: impl Into<String>) -> Result<()> {
        self.send(Command::VideoError(reason.into()))
    }

    pub fn teardown(&self) -> Result<()> {
        self.send(Command::Teardown)
    }

    /// Asks the task to tear down and exit. Await the `JoinHandle` returned by
    /// [`Screensaver::spawn`] to wait for it.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    pub async fn status(&self) -> Result<ScreensaverStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Status(tx))?;
        rx.await.map_err(|_| anyhow!("screensaver task has stopped"))
    }

    pub fn current_state(&self) -> MonitorState {
        *self.state.borrow()
    }

    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ScreensaverEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("screensaver task has stopped"))
    }
}

pub struct Screensaver<S: DisplaySurfaces> {
    monitor: IdleMonitor<S>,
    loader: PlaylistLoader,
    commands: mpsc::UnboundedReceiver<Command>,
    loads_tx: mpsc::UnboundedSender<PlaylistLoad>,
    loads: mpsc::UnboundedReceiver<PlaylistLoad>,
    state: watch::Sender<MonitorState>,
    events: broadcast::Sender<ScreensaverEvent>,
    fetch: Option<JoinHandle<()>>,
    published_dispatches: u64,
}

impl<S: DisplaySurfaces> Screensaver<S> {
    /// Starts the screensaver task with an initial timeout. The task owns the
    /// surfaces until it exits.
    pub fn spawn(
        backend: Arc<dyn DashboardBackend>,
        surfaces: S,
        timeout: ScreensaverTimeout,
    ) -> (ScreensaverHandle, JoinHandle<()>) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (loads_tx, loads) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(MonitorState::Disabled);
        let (events, _) = broadcast::channel(1024);

        let handle = ScreensaverHandle {
            commands: commands_tx,
            state: state_rx,
            events: events.clone(),
        };
        let mut screensaver = Self {
            monitor: IdleMonitor::new(surfaces),
            loader: PlaylistLoader::new(backend),
            commands,
            loads_tx,
            loads,
            state: state_tx,
            events,
            fetch: None,
            published_dispatches: 0,
        };
        screensaver.monitor.reconfigure(timeout, Instant::now());
        screensaver.publish();

        let task = tokio::spawn(screensaver.run());
        (handle, task)
    }

    async fn run(mut self) {
        loop {
            let deadline = self.monitor.next_deadline();
            tokio::select! {
                biased;
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Some(load) = self.loads.recv() => self.handle_load(load),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.handle_deadline();
                }
            }
            self.publish();
        }

        self.monitor.teardown();
        self.abort_fetch();
        self.publish();
        info!("screensaver: task stopped");
    }

    fn handle_command(&mut self, command: Command) -> bool {
        let now = Instant::now();
        match command {
            Command::Reconfigure(timeout) => self.monitor.reconfigure(timeout, now),
            Command::Input(kind) => self.monitor.on_input(kind, now),
            Command::VideoEnded => self.monitor.on_video_ended(now),
            Command::VideoError(reason) => self.monitor.on_video_error(&reason, now),
            Command::Teardown => self.monitor.teardown(),
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
            Command::Shutdown => return false,
        }
        if !self.monitor.is_awaiting_playlist() {
            self.abort_fetch();
        }
        true
    }

    fn handle_deadline(&mut self) {
        let Some(request) = self.monitor.fire_due(Instant::now()) else {
            return;
        };
        self.abort_fetch();

        let loader = self.loader.clone();
        let loads = self.loads_tx.clone();
        let epoch = request.epoch;
        self.fetch = Some(tokio::spawn(async move {
            let playlist = loader.load().await;
            let _ = loads.send(PlaylistLoad { epoch, playlist });
        }));
    }

    fn handle_load(&mut self, load: PlaylistLoad) {
        if load.epoch == self.monitor.epoch() {
            self.fetch = None;
            let event = match &load.playlist {
                Some(playlist) => ScreensaverEvent::PlaylistLoaded {
                    epoch: load.epoch,
                    items: playlist.len(),
                },
                None => ScreensaverEvent::PlaylistUnavailable { epoch: load.epoch },
            };
            let _ = self.events.send(event);
        }
        self.monitor
            .complete_activation(load.epoch, load.playlist, Instant::now());
    }

    fn abort_fetch(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            debug!("screensaver: cancelling in-flight playlist load");
            fetch.abort();
        }
    }

    fn status(&self) -> ScreensaverStatus {
        ScreensaverStatus {
            state: self.monitor.state(),
            timeout: self.monitor.timeout(),
            epoch: self.monitor.epoch(),
            cursor: self.monitor.cursor(),
            playlist_len: self.monitor.playlist().len(),
            current: self.monitor.current_item().cloned(),
        }
    }

    fn publish(&mut self) {
        let state = self.monitor.state();
        let changed = self.state.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
        if changed {
            let _ = self.events.send(ScreensaverEvent::StateChanged(state));
        }

        let dispatches = self.monitor.dispatches();
        if dispatches != self.published_dispatches {
            self.published_dispatches = dispatches;
            if let Some(item) = self.monitor.current_item() {
                let _ = self.events.send(ScreensaverEvent::ItemShown {
                    cursor: self.monitor.cursor(),
                    item: item.clone(),
                });
            }
        }
    }
}
