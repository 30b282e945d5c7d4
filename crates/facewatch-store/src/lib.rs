//! facewatch-store — durable audit trail for recognition events.
//!
//! Two append-only stores: a fixed-schema CSV log ([`AuditLog`]) and a
//! directory of JPEG face crops ([`EvidenceStore`]). Both survive the whole
//! session and are safe to read while a session is writing.

pub mod audit;
pub mod evidence;

pub use audit::{AuditError, AuditLog, LogRecord, CSV_HEADER, DEFAULT_TAIL_LINES};
pub use evidence::{EvidenceError, EvidenceStore};
