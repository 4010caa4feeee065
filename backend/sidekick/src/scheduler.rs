use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use petpal_config::defaults::{DEFAULT_DETECTION_INTERVAL_SECS, DEFAULT_SUGGESTION_INTERVAL_SECS};
use petpal_config::SidekickConfig;
use petpal_core::{Command, Frame, Notification, PetPalError, TriggerSource};
use petpal_vision::{Camera, CameraSession};

use crate::sidekick::Sidekick;

/// Produces a fresh, unstarted camera each time detection is switched on.
pub type CameraFactory = Box<dyn Fn() -> Result<Box<dyn Camera>> + Send + Sync>;

/// Drives the sidekick: periodic suggestions, camera-paced detection, and
/// commands from the front end. Every outcome goes out as a [`Notification`].
pub struct Scheduler {
    sidekick: Arc<Sidekick>,
    suggestion_interval: Duration,
    detection_interval: Duration,
    notify_tx: mpsc::Sender<Notification>,
    camera_factory: Option<CameraFactory>,
}

impl Scheduler {
    pub fn new(sidekick: Arc<Sidekick>, notify_tx: mpsc::Sender<Notification>) -> Self {
        Self {
            sidekick,
            suggestion_interval: Duration::from_secs(DEFAULT_SUGGESTION_INTERVAL_SECS),
            detection_interval: Duration::from_secs(DEFAULT_DETECTION_INTERVAL_SECS),
            notify_tx,
            camera_factory: None,
        }
    }

    pub fn with_config(mut self, config: &SidekickConfig) -> Self {
        if let Some(secs) = config.suggestion_interval_secs {
            self.suggestion_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = config.detection_interval_secs {
            self.detection_interval = Duration::from_secs(secs);
        }
        self
    }

    pub fn with_intervals(mut self, suggestion: Duration, detection: Duration) -> Self {
        self.suggestion_interval = suggestion;
        self.detection_interval = detection;
        self
    }

    pub fn with_camera(mut self, factory: CameraFactory) -> Self {
        self.camera_factory = Some(factory);
        self
    }

    /// Run until `Shutdown` arrives or the command channel closes. In-flight
    /// cycles are aborted and the camera released on the way out.
    pub async fn run(self, mut rx: mpsc::Receiver<Command>) -> Result<()> {
        info!(
            session_id = %self.sidekick.session_id(),
            suggestion_secs = self.suggestion_interval.as_secs(),
            detection_secs = self.detection_interval.as_secs(),
            "Scheduler started"
        );

        let mut suggestion_ticker = time::interval_at(
            Instant::now() + self.suggestion_interval,
            self.suggestion_interval,
        );
        suggestion_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut detection_ticker = time::interval(self.detection_interval);
        detection_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut camera: Option<CameraSession> = None;
        let mut cycles: JoinSet<Vec<Notification>> = JoinSet::new();

        loop {
            tokio::select! {
                _ = suggestion_ticker.tick() => {
                    self.spawn_suggestion(&mut cycles, TriggerSource::Timer);
                }
                _ = detection_ticker.tick(), if camera.is_some() => {
                    let Some(session) = camera.as_mut() else { continue };
                    match session.capture() {
                        Ok(frame) => self.spawn_detection(&mut cycles, frame),
                        Err(e) => warn!(error = %e, "Frame capture failed, skipping detection"),
                    }
                }
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    match joined {
                        Ok(notes) => {
                            for note in notes {
                                self.notify(note).await;
                            }
                        }
                        Err(e) if e.is_cancelled() => debug!("Cycle cancelled"),
                        Err(e) => error!(error = %e, "Cycle task failed"),
                    }
                }
                cmd = rx.recv() => {
                    match cmd {
                        Some(Command::SuggestNow) => {
                            self.spawn_suggestion(&mut cycles, TriggerSource::OnDemand);
                        }
                        Some(Command::StartCamera) => {
                            if camera.is_some() {
                                debug!("Camera already running");
                                continue;
                            }
                            match self.open_camera() {
                                Ok(session) => {
                                    camera = Some(session);
                                    detection_ticker.reset();
                                    self.notify(Notification::CameraStarted).await;
                                }
                                Err(e) => {
                                    warn!(error = %e, "Could not start camera");
                                    self.notify(Notification::Rejected {
                                        reason: format!("{e:#}"),
                                    })
                                    .await;
                                }
                            }
                        }
                        Some(Command::StopCamera) => {
                            if let Some(session) = camera.take() {
                                session.stop();
                                self.notify(Notification::CameraStopped).await;
                            }
                        }
                        Some(Command::CompleteTask { task_type }) => {
                            let note = match self.sidekick.complete_task(task_type) {
                                Ok(done) => Notification::TaskCompleted {
                                    task_type: done.task_type,
                                    streak: done.streak,
                                    tier: done.tier,
                                    message: done.message,
                                },
                                Err(e) => {
                                    info!(error = %e, "Completion rejected");
                                    Notification::Rejected { reason: e.to_string() }
                                }
                            };
                            self.notify(note).await;
                        }
                        Some(Command::Shutdown) => {
                            info!("Shutdown requested");
                            break;
                        }
                        None => {
                            info!("Command channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        cycles.shutdown().await;
        if let Some(session) = camera.take() {
            session.stop();
        }
        info!("Scheduler stopped");
        Ok(())
    }

    fn open_camera(&self) -> Result<CameraSession> {
        let factory = self
            .camera_factory
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no camera configured"))?;
        CameraSession::open(factory()?)
    }

    fn spawn_suggestion(&self, cycles: &mut JoinSet<Vec<Notification>>, source: TriggerSource) {
        let sidekick = self.sidekick.clone();
        cycles.spawn(async move {
            match sidekick.suggest_task(source).await {
                Ok(s) => vec![Notification::TaskSuggested {
                    task_type: s.task_type,
                    message: s.message,
                    source: s.source,
                }],
                Err(e) => rejection(e, source),
            }
        });
    }

    fn spawn_detection(&self, cycles: &mut JoinSet<Vec<Notification>>, frame: Frame) {
        let sidekick = self.sidekick.clone();
        cycles.spawn(async move {
            match sidekick.detect_mood(&frame, TriggerSource::Timer).await {
                Ok(d) => vec![
                    Notification::MoodUpdated(d.observation),
                    Notification::Translation {
                        message: d.translation,
                    },
                ],
                Err(e) => rejection(e, TriggerSource::Timer),
            }
        });
    }

    async fn notify(&self, note: Notification) {
        if self.notify_tx.send(note).await.is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

/// Timer triggers that lose the race are dropped quietly; the child hears
/// about rejected taps.
fn rejection(e: PetPalError, source: TriggerSource) -> Vec<Notification> {
    match source {
        TriggerSource::Timer => Vec::new(),
        TriggerSource::OnDemand => vec![Notification::Rejected {
            reason: e.to_string(),
        }],
    }
}
