use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use binocular_core::{
    poll_once, AnalysisState, ClinicalMetrics, FrameReport, LandmarkSource, PollOutcome,
    TrackingFrame, Transition, VisionPipeline,
};

use crate::config::Config;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::session::events::AnalysisEvent;
use crate::session::snapshot::{LiveSnapshot, SessionInfo};
use crate::session::SessionError;
use crate::simulator::SyntheticSource;

#[derive(Debug)]
enum SessionCommand {
    Frames {
        frames: Vec<TrackingFrame>,
        reply: oneshot::Sender<BatchOutcome>,
    },
    SetRecording {
        recording: bool,
        reply: oneshot::Sender<TransitionOutcome>,
    },
    Toggle {
        reply: oneshot::Sender<TransitionOutcome>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRejection {
    pub index: usize,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub accepted: usize,
    pub recorded: usize,
    pub rejected: Vec<FrameRejection>,
    pub latest: Option<FrameReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub changed: bool,
    pub is_recording: bool,
    pub session: Option<SessionInfo>,
    /// 仅在本次调用停止了会话时返回
    pub clinical: Option<ClinicalMetrics>,
}

/// 会话 worker 的句柄，可在各请求间克隆共享
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: watch::Receiver<LiveSnapshot>,
    events: broadcast::Sender<AnalysisEvent>,
}

impl SessionHandle {
    pub async fn submit_frames(
        &self,
        frames: Vec<TrackingFrame>,
    ) -> Result<BatchOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Frames { frames, reply }).await?;
        rx.await.map_err(|_| SessionError::WorkerGone)
    }

    pub async fn set_recording(&self, recording: bool) -> Result<TransitionOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::SetRecording { recording, reply })
            .await?;
        rx.await.map_err(|_| SessionError::WorkerGone)
    }

    pub async fn toggle_recording(&self) -> Result<TransitionOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Toggle { reply }).await?;
        rx.await.map_err(|_| SessionError::WorkerGone)
    }

    /// 丢弃当前会话与全部滤波状态，不产生临床汇总
    pub async fn reset(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Reset { reply }).await?;
        rx.await.map_err(|_| SessionError::WorkerGone)
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<LiveSnapshot> {
        self.snapshot.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::WorkerGone)
    }
}

struct SessionWorker {
    pipeline: VisionPipeline,
    state: AnalysisState,
    session: Option<SessionInfo>,
    no_detection: u64,
    source_faults: u64,
    snapshot_tx: watch::Sender<LiveSnapshot>,
    events: broadcast::Sender<AnalysisEvent>,
}

/// 启动会话 worker；配置开启时同时以固定帧率轮询合成关键点源
pub fn spawn_session_worker(
    config: &Config,
    shutdown_rx: broadcast::Receiver<()>,
) -> (SessionHandle, JoinHandle<()>) {
    let source: Option<Box<dyn LandmarkSource + Send>> = if config.simulator.enabled {
        tracing::info!(
            fps = config.simulator.fps,
            seed = config.simulator.seed,
            "Synthetic landmark source enabled"
        );
        Some(Box::new(SyntheticSource::new(&config.simulator)))
    } else {
        None
    };
    let tick = Duration::from_secs_f64(1.0 / f64::from(config.simulator.fps.max(1)));
    spawn_with_source(config.session.command_buffer, source, tick, shutdown_rx)
}

pub fn spawn_with_source(
    command_buffer: usize,
    source: Option<Box<dyn LandmarkSource + Send>>,
    tick: Duration,
    shutdown_rx: broadcast::Receiver<()>,
) -> (SessionHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(command_buffer.max(1));
    let (snapshot_tx, snapshot_rx) = watch::channel(LiveSnapshot::default());
    let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

    let worker = SessionWorker {
        pipeline: VisionPipeline::new(),
        state: AnalysisState::new(),
        session: None,
        no_detection: 0,
        source_faults: 0,
        snapshot_tx,
        events: events_tx.clone(),
    };

    let handle = tokio::spawn(worker.run(commands_rx, source, tick, shutdown_rx));

    (
        SessionHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            events: events_tx,
        },
        handle,
    )
}

impl SessionWorker {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut source: Option<Box<dyn LandmarkSource + Send>>,
        tick: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Session worker started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = ticker.tick(), if source.is_some() => {
                    if let Some(src) = source.as_mut() {
                        self.poll_source(src.as_mut());
                    }
                }
                _ = shutdown_rx.recv() => break,
            }
        }
        tracing::info!(
            frames_processed = self.pipeline.frames_processed(),
            "Session worker stopped"
        );
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Frames { frames, reply } => {
                let outcome = self.process_batch(&frames);
                let _ = reply.send(outcome);
            }
            SessionCommand::SetRecording { recording, reply } => {
                let transition = self.pipeline.set_recording(recording, &mut self.state);
                let _ = reply.send(self.apply_transition(transition));
            }
            SessionCommand::Toggle { reply } => {
                let transition = self.pipeline.toggle_recording(&mut self.state);
                let _ = reply.send(self.apply_transition(transition));
            }
            SessionCommand::Reset { reply } => {
                if let Some(info) = self.session.take() {
                    tracing::info!(session_id = %info.id, "Session discarded by reset");
                }
                self.pipeline = VisionPipeline::new();
                self.state = AnalysisState::new();
                self.no_detection = 0;
                self.source_faults = 0;
                let _ = reply.send(());
            }
        }
        self.publish_snapshot();
    }

    fn process_batch(&mut self, frames: &[TrackingFrame]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, frame) in frames.iter().enumerate() {
            match self.pipeline.process_frame(frame, &mut self.state) {
                Ok(report) => {
                    outcome.accepted += 1;
                    if report.recorded {
                        outcome.recorded += 1;
                    }
                    self.emit(AnalysisEvent::from(&report));
                    outcome.latest = Some(report);
                }
                Err(e) => {
                    tracing::debug!(index, error = %e, "Rejected tracking frame");
                    outcome.rejected.push(FrameRejection {
                        index,
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    fn poll_source(&mut self, source: &mut (dyn LandmarkSource + Send)) {
        match poll_once(source, &mut self.pipeline, &mut self.state) {
            PollOutcome::Processed(report) => self.emit(AnalysisEvent::from(&report)),
            PollOutcome::NoDetection => self.no_detection += 1,
            PollOutcome::Faulted => self.source_faults += 1,
            PollOutcome::Rejected => {}
        }
        self.publish_snapshot();
    }

    fn apply_transition(&mut self, transition: Transition) -> TransitionOutcome {
        match transition {
            Transition::Started => {
                let info = SessionInfo::begin();
                tracing::info!(session_id = %info.id, "Session started");
                self.emit(AnalysisEvent::SessionStarted {
                    session_id: info.id,
                    started_at: info.started_at,
                });
                self.session = Some(info.clone());
                TransitionOutcome {
                    changed: true,
                    is_recording: true,
                    session: Some(info),
                    clinical: None,
                }
            }
            Transition::Stopped {
                sample_count,
                clinical,
            } => {
                let stopped_at = Utc::now();
                if let Some(info) = self.session.as_mut() {
                    info.stopped_at = Some(stopped_at);
                    info.sample_count = sample_count;
                    tracing::info!(
                        session_id = %info.id,
                        sample_count,
                        duration_ms = info.duration_ms().unwrap_or_default(),
                        "Session stopped"
                    );
                    let session_id = info.id;
                    self.emit(AnalysisEvent::SessionStopped {
                        session_id,
                        stopped_at,
                        sample_count,
                        clinical,
                    });
                }
                TransitionOutcome {
                    changed: true,
                    is_recording: false,
                    session: self.session.clone(),
                    clinical: Some(clinical),
                }
            }
            Transition::Unchanged => TransitionOutcome {
                changed: false,
                is_recording: self.pipeline.is_recording(),
                session: self.current_session(),
                clinical: None,
            },
        }
    }

    fn current_session(&self) -> Option<SessionInfo> {
        let mut info = self.session.clone()?;
        if self.pipeline.is_recording() {
            info.sample_count = self.pipeline.buffer().len();
        }
        Some(info)
    }

    fn emit(&self, event: AnalysisEvent) {
        // 没有订阅者时发送失败，属于正常情况
        let _ = self.events.send(event);
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(LiveSnapshot {
            velocity: self.state.velocity,
            symmetry: self.state.symmetry,
            is_recording: self.state.is_recording,
            session: self.current_session(),
            history: self.state.history.to_vec(),
            session_trend: self.state.session_trend.clone(),
            clinical: self.state.clinical,
            frames_processed: self.pipeline.frames_processed(),
            frames_rejected: self.pipeline.frames_rejected(),
            no_detection: self.no_detection,
            source_faults: self.source_faults,
        });
    }
}
