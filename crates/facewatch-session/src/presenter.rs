//! Seam for the host's display surface: annotated frames plus discrete
//! text events with a severity the host can map to its own styling.

use facewatch_core::registry::LoadReport;
use facewatch_core::Frame;
use std::fmt;
use std::path::Path;

/// How urgent an event is for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Discrete pipeline notifications.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A reference image contributed an identity.
    IdentityRegistered { file: String, name: String },
    /// A reference image was skipped during registration.
    RegistrationSkipped { file: String, reason: String },
    /// The recognition loop started with this many identities.
    Started { identities: usize },
    /// Frame acquisition failed; the session is over.
    AcquisitionFailed { error: String },
    /// Evidence image or log row could not be written for one face.
    PersistFailed { name: String, error: String },
    /// The loop observed a stop request and shut down.
    Stopped,
}

impl SessionEvent {
    pub fn severity(&self) -> Severity {
        match self {
            SessionEvent::IdentityRegistered { .. }
            | SessionEvent::Started { .. }
            | SessionEvent::Stopped => Severity::Info,
            SessionEvent::RegistrationSkipped { .. } | SessionEvent::PersistFailed { .. } => {
                Severity::Warning
            }
            SessionEvent::AcquisitionFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::IdentityRegistered { file, name } => {
                write!(f, "registered {name} from {file}")
            }
            SessionEvent::RegistrationSkipped { file, reason } => {
                write!(f, "skipped {file}: {reason}")
            }
            SessionEvent::Started { identities } => {
                write!(f, "recognition started with {identities} known face(s)")
            }
            SessionEvent::AcquisitionFailed { error } => {
                write!(f, "frame acquisition failed: {error}")
            }
            SessionEvent::PersistFailed { name, error } => {
                write!(f, "could not persist detection of {name}: {error}")
            }
            SessionEvent::Stopped => write!(f, "recognition finished"),
        }
    }
}

/// Host display surface.
pub trait Presenter: Send {
    /// Show the latest annotated frame.
    fn show_frame(&mut self, frame: &Frame);
    /// Surface one discrete event.
    fn notify(&mut self, event: SessionEvent);
}

/// Forward the outcome of a registration pass to the presenter, one event
/// per reference file.
pub fn report_registry_load(presenter: &mut dyn Presenter, report: &LoadReport) {
    for file in &report.registered {
        let name = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string();
        presenter.notify(SessionEvent::IdentityRegistered { file: file.clone(), name });
    }
    for (file, reason) in &report.skipped {
        presenter.notify(SessionEvent::RegistrationSkipped {
            file: file.clone(),
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewatch_core::registry::SkipReason;
    use facewatch_core::{Embedding, IdentityRegistry};

    #[derive(Default)]
    struct RecordingPresenter {
        events: Vec<SessionEvent>,
    }

    impl Presenter for RecordingPresenter {
        fn show_frame(&mut self, _frame: &Frame) {}
        fn notify(&mut self, event: SessionEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn test_severities() {
        assert_eq!(SessionEvent::Stopped.severity(), Severity::Info);
        assert_eq!(
            SessionEvent::RegistrationSkipped { file: "x.png".into(), reason: "no face".into() }
                .severity(),
            Severity::Warning
        );
        assert_eq!(
            SessionEvent::AcquisitionFailed { error: "gone".into() }.severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_display_wording() {
        let event = SessionEvent::IdentityRegistered { file: "alice.png".into(), name: "alice".into() };
        assert_eq!(event.to_string(), "registered alice from alice.png");
        assert_eq!(SessionEvent::Stopped.to_string(), "recognition finished");
    }

    #[test]
    fn test_report_registry_load_emits_per_file_events() {
        let report = LoadReport {
            registry: IdentityRegistry::from_entries([(
                "alice".to_string(),
                Embedding::new(vec![0.0]),
            )]),
            registered: vec!["alice.png".to_string()],
            skipped: vec![("group.jpg".to_string(), SkipReason::NoFace)],
        };

        let mut presenter = RecordingPresenter::default();
        report_registry_load(&mut presenter, &report);

        assert_eq!(presenter.events.len(), 2);
        match &presenter.events[0] {
            SessionEvent::IdentityRegistered { file, name } => {
                assert_eq!(file, "alice.png");
                assert_eq!(name, "alice");
            }
            other => panic!("expected IdentityRegistered, got {other:?}"),
        }
        match &presenter.events[1] {
            SessionEvent::RegistrationSkipped { file, .. } => assert_eq!(file, "group.jpg"),
            other => panic!("expected RegistrationSkipped, got {other:?}"),
        }
    }
}
