//! The recognition session: a tick-driven Idle/Running/Stopped state machine.
//!
//! One tick = pull a frame, embed its faces, match each against the
//! registry, annotate, persist evidence and audit rows, hand the frame to
//! the presenter. Per-face persistence trouble never aborts a tick; losing
//! the frame source always does.

use crate::annotate;
use crate::presenter::{Presenter, SessionEvent};
use crate::source::{FrameSource, SourceError};
use chrono::Local;
use facewatch_core::{EuclideanMatcher, FaceEmbedder, IdentityRegistry, MatchPolicy};
use facewatch_store::{AuditLog, EvidenceStore, LogRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("recognition is already running")]
    AlreadyRunning,
    #[error("recognition is not running")]
    NotRunning,
    #[error("refusing to start with an empty identity registry")]
    EmptyRegistry,
    #[error("frame acquisition failed: {0}")]
    Acquisition(#[from] SourceError),
}

/// Lifecycle of a recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never started, or terminated by a fatal failure.
    Idle,
    /// Processing ticks.
    Running,
    /// Terminated by an explicit stop request.
    Stopped,
}

/// Clone-safe handle that requests a cooperative stop.
///
/// The request takes effect at the next tick boundary, never mid-tick.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// What one call to [`RecognitionSession::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was pulled and processed.
    Processed(TickSummary),
    /// A stop request was honored; no frame was pulled.
    Stopped,
}

/// Per-tick accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Faces detected in the frame.
    pub faces: usize,
    /// Faces matched to a registered identity.
    pub known: usize,
    /// Evidence or audit writes that failed.
    pub persist_failures: usize,
}

/// Resources owned only while Running. Dropping this releases the source.
struct ActiveRun {
    source: Box<dyn FrameSource>,
    registry: IdentityRegistry,
}

/// Drives the watch pipeline.
///
/// The embedder, presenter, and both stores live for the whole session; the
/// frame source and registry are per-run, handed over at [`start`] and
/// dropped when the run ends.
///
/// [`start`]: Self::start
pub struct RecognitionSession<E, P> {
    embedder: E,
    presenter: P,
    evidence: EvidenceStore,
    log: AuditLog,
    matcher: EuclideanMatcher,
    interval: Duration,
    tolerance: f32,
    state: SessionState,
    active: Option<ActiveRun>,
    stop_flag: Arc<AtomicBool>,
}

impl<E: FaceEmbedder, P: Presenter> RecognitionSession<E, P> {
    pub fn new(
        embedder: E,
        presenter: P,
        evidence: EvidenceStore,
        log: AuditLog,
        interval: Duration,
        tolerance: f32,
    ) -> Self {
        Self {
            embedder,
            presenter,
            evidence,
            log,
            matcher: EuclideanMatcher,
            interval,
            tolerance,
            state: SessionState::Idle,
            active: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle for requesting a cooperative stop, e.g. from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { flag: Arc::clone(&self.stop_flag) }
    }

    /// Request a cooperative stop; equivalent to [`StopHandle::stop`].
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Begin a run over `source` against `registry`.
    ///
    /// Fails fast, without touching the source, when the registry is empty
    /// or a run is already active. Allowed from both Idle and Stopped.
    pub fn start(
        &mut self,
        registry: IdentityRegistry,
        source: Box<dyn FrameSource>,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Running {
            return Err(SessionError::AlreadyRunning);
        }
        if registry.is_empty() {
            return Err(SessionError::EmptyRegistry);
        }

        // A stop requested against a previous run must not cancel this one.
        self.stop_flag.store(false, Ordering::Relaxed);
        let identities = registry.len();
        self.active = Some(ActiveRun { source, registry });
        self.state = SessionState::Running;
        tracing::info!(identities, "recognition started");
        self.presenter.notify(SessionEvent::Started { identities });
        Ok(())
    }

    /// Run one pipeline iteration.
    ///
    /// A pending stop request is honored before any frame is pulled. A frame
    /// acquisition failure ends the run: the source is dropped, the state
    /// returns to Idle, and the failure is reported exactly once — here.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }

        if self.stop_flag.load(Ordering::Relaxed) {
            self.active = None;
            self.state = SessionState::Stopped;
            tracing::info!("recognition stopped");
            self.presenter.notify(SessionEvent::Stopped);
            return Ok(TickOutcome::Stopped);
        }

        let Some(run) = self.active.as_mut() else {
            return Err(SessionError::NotRunning);
        };

        let mut frame = match run.source.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                self.active = None;
                self.state = SessionState::Idle;
                tracing::error!(error = %err, "frame acquisition failed, ending session");
                self.presenter
                    .notify(SessionEvent::AcquisitionFailed { error: err.to_string() });
                return Err(SessionError::Acquisition(err));
            }
        };

        let faces = self.embedder.embed(&frame);
        let mut summary = TickSummary { faces: faces.len(), ..TickSummary::default() };

        for face in &faces {
            let result = match self.matcher.compare(&face.embedding, &run.registry, self.tolerance)
            {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(error = %err, "match failed, skipping face");
                    continue;
                }
            };
            if result.identity.is_some() {
                summary.known += 1;
            }

            // Draw first: the evidence crop is taken from the annotated frame.
            annotate::annotate_match(&mut frame, &face.location, &result);

            let now = Local::now();
            let name = result.display_name();
            let filename = EvidenceStore::filename_for(name, &now);
            if let Err(err) = self.evidence.save(&frame, &face.location, name, &now) {
                summary.persist_failures += 1;
                tracing::warn!(name, error = %err, "evidence save failed");
                self.presenter.notify(SessionEvent::PersistFailed {
                    name: name.to_string(),
                    error: err.to_string(),
                });
            }

            // The audit row cites the evidence filename whether or not the
            // image write went through.
            let record = LogRecord::new(&now, name, result.confidence, &filename);
            if let Err(err) = self.log.append(&record) {
                summary.persist_failures += 1;
                tracing::warn!(name, error = %err, "audit append failed");
                self.presenter.notify(SessionEvent::PersistFailed {
                    name: name.to_string(),
                    error: err.to_string(),
                });
            }
        }

        tracing::debug!(
            faces = summary.faces,
            known = summary.known,
            persist_failures = summary.persist_failures,
            "tick processed"
        );
        self.presenter.show_frame(&frame);
        Ok(TickOutcome::Processed(summary))
    }

    /// Drive [`tick`](Self::tick) until a stop request or a fatal error.
    ///
    /// The interval is a minimum gap between ticks, not a fixed period: the
    /// sleep starts after a tick finishes.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            match self.tick()? {
                TickOutcome::Stopped => return Ok(()),
                TickOutcome::Processed(_) => std::thread::sleep(self.interval),
            }
        }
    }
}
