//! Frame driver – runs a [`SimulationService`] on a tokio interval.
//!
//! ## Channels
//!
//! | Direction          | Channel             | Payload                          |
//! |--------------------|---------------------|----------------------------------|
//! | client → driver    | `mpsc`              | [`DriverCommand`]                |
//! | driver → client    | `watch`             | latest [`RenderFrame`]           |
//! | driver → requester | `oneshot`           | [`SimSnapshot`] / [`SimStats`]   |
//!
//! The service is ticked with a fixed `dt = 1 / tick_rate_hz` regardless of
//! wall-clock jitter, so a driven run and an `advance` run of the same
//! length agree.

use crate::error::SimError;
use crate::input::InputEvent;
use crate::protocol::{RenderFrame, SimSnapshot};
use crate::service::SimulationService;
use crate::types::SimStats;
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 64;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DriverCommand {
    Input(InputEvent),
    Interact,
    UseChest,
    Reset,
    Pause,
    Resume,
    Snapshot(oneshot::Sender<SimSnapshot>),
    Stats(oneshot::Sender<SimStats>),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Frames per second.
    pub tick_rate_hz: f32,
    /// Stop after this many frames; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            max_ticks: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Client handle
// ---------------------------------------------------------------------------

/// Cloneable client side of a running [`SimDriver`].
#[derive(Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<DriverCommand>,
    frames: watch::Receiver<Option<RenderFrame>>,
}

impl DriverHandle {
    pub async fn send(&self, command: DriverCommand) -> crate::error::Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SimError::DriverClosed)
    }

    pub async fn input(&self, event: InputEvent) -> crate::error::Result<()> {
        self.send(DriverCommand::Input(event)).await
    }

    pub async fn interact(&self) -> crate::error::Result<()> {
        self.send(DriverCommand::Interact).await
    }

    pub async fn reset(&self) -> crate::error::Result<()> {
        self.send(DriverCommand::Reset).await
    }

    pub async fn pause(&self) -> crate::error::Result<()> {
        self.send(DriverCommand::Pause).await
    }

    pub async fn resume(&self) -> crate::error::Result<()> {
        self.send(DriverCommand::Resume).await
    }

    pub async fn snapshot(&self) -> crate::error::Result<SimSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(DriverCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| SimError::DriverClosed)
    }

    pub async fn stats(&self) -> crate::error::Result<SimStats> {
        let (tx, rx) = oneshot::channel();
        self.send(DriverCommand::Stats(tx)).await?;
        rx.await.map_err(|_| SimError::DriverClosed)
    }

    pub async fn shutdown(&self) -> crate::error::Result<()> {
        self.send(DriverCommand::Shutdown).await
    }

    /// A fresh receiver for the render-frame stream.
    pub fn frames(&self) -> watch::Receiver<Option<RenderFrame>> {
        self.frames.clone()
    }

    pub fn latest_frame(&self) -> Option<RenderFrame> {
        self.frames.borrow().clone()
    }
}

// ---------------------------------------------------------------------------
// SimDriver
// ---------------------------------------------------------------------------

/// Owns the frame loop around a shared [`SimulationService`].
///
/// Call [`SimDriver::run`] inside a Tokio task to start it.
pub struct SimDriver {
    config: DriverConfig,
    service: Arc<Mutex<SimulationService>>,
    commands: mpsc::Receiver<DriverCommand>,
    frames: watch::Sender<Option<RenderFrame>>,
}

impl SimDriver {
    pub fn new(
        config: DriverConfig,
        service: Arc<Mutex<SimulationService>>,
    ) -> (Self, DriverHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (frame_tx, frame_rx) = watch::channel(None);
        let driver = Self {
            config,
            service,
            commands: cmd_rx,
            frames: frame_tx,
        };
        let handle = DriverHandle {
            commands: cmd_tx,
            frames: frame_rx,
        };
        (driver, handle)
    }

    /// Run the frame loop until a `Shutdown` command, every handle is
    /// dropped, `max_ticks` is reached or SIGINT arrives. Returns the number
    /// of frames ticked.
    pub async fn run(mut self) -> Result<u64> {
        if !(self.config.tick_rate_hz > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "tick_rate_hz must be positive, got {}",
                self.config.tick_rate_hz
            ))
            .into());
        }
        let dt = 1.0 / self.config.tick_rate_hz;
        let mut timer = tokio::time::interval(std::time::Duration::from_secs_f32(dt));
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        info!("SimDriver running at {:.0}Hz", self.config.tick_rate_hz);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    // Hold the lock only long enough to tick and build the frame.
                    let (events, frame) = {
                        let mut svc = self.service.lock();
                        let events = svc.tick(dt);
                        (events, svc.frame())
                    };
                    for fb in &events.feedback {
                        info!(tick = events.tick, "{}", fb);
                    }
                    if let Some(summary) = &events.summary {
                        info!(
                            outcome = %summary.outcome,
                            delivered = summary.delivered,
                            total = summary.total,
                            "Run finished"
                        );
                    }
                    self.frames.send_replace(Some(frame));

                    ticks += 1;
                    if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                        debug!("Reached {} ticks", ticks);
                        break;
                    }
                }
                cmd = self.commands.recv() => match cmd {
                    Some(DriverCommand::Shutdown) | None => {
                        info!("SimDriver shutting down");
                        break;
                    }
                    Some(cmd) => self.apply(cmd),
                },
                _ = &mut ctrl_c => {
                    info!("SimDriver shutting down (SIGINT)");
                    break;
                }
            }
        }
        Ok(ticks)
    }

    fn apply(&self, command: DriverCommand) {
        let mut svc = self.service.lock();
        let feedback = match command {
            DriverCommand::Input(event) => svc.handle_input(event),
            DriverCommand::Interact => svc.interact(),
            DriverCommand::UseChest => svc.use_chest().into_iter().collect(),
            DriverCommand::Reset => {
                svc.reset();
                Vec::new()
            }
            DriverCommand::Pause => {
                svc.pause();
                Vec::new()
            }
            DriverCommand::Resume => {
                svc.resume();
                Vec::new()
            }
            DriverCommand::Snapshot(reply) => {
                if reply.send(svc.snapshot()).is_err() {
                    warn!("Snapshot requester went away");
                }
                Vec::new()
            }
            DriverCommand::Stats(reply) => {
                if reply.send(svc.stats()).is_err() {
                    warn!("Stats requester went away");
                }
                Vec::new()
            }
            DriverCommand::Shutdown => Vec::new(),
        };
        for fb in feedback {
            info!("{}", fb);
        }
    }
}
