//! Downstream telemetry sinks.

use std::sync::Mutex;

use thiserror::Error;

use crate::event::{EnrichedEvent, ErrorReport};

/// Errors a sink may report. The pipeline logs and discards them.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The payload could not be encoded.
    #[error("failed to encode telemetry payload")]
    Encode {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// No async runtime was available to deliver the payload.
    #[error("no runtime available for telemetry delivery")]
    NoRuntime,
    /// The sink rejected or could not dispatch the payload.
    #[error("telemetry sink unavailable")]
    Unavailable {
        /// Sink-specific detail.
        detail: String,
    },
}

/// Fire-and-forget destination for enriched events.
///
/// Implementations must not block: network delivery is dispatched in the
/// background and its outcome is never reported back.
pub trait EventSink: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Forward an enriched event.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the event could not be dispatched.
    fn send_event(&self, event: &EnrichedEvent) -> Result<(), SinkError>;

    /// Forward an error report. Sinks without error tracking ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the report could not be dispatched.
    fn send_error(&self, report: &ErrorReport) -> Result<(), SinkError> {
        let _ = report;
        Ok(())
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn send_event(&self, _event: &EnrichedEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that keeps everything in memory, for tests and debugging overlays.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EnrichedEvent>>,
    errors: Mutex<Vec<ErrorReport>>,
}

impl RecordingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<EnrichedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded events with the given action.
    #[must_use]
    pub fn events_named(&self, action: &str) -> Vec<EnrichedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.action == action)
            .collect()
    }

    /// Snapshot of recorded error reports.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorReport> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn send_event(&self, event: &EnrichedEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .map_err(|err| SinkError::Unavailable {
                detail: err.to_string(),
            })?
            .push(event.clone());
        Ok(())
    }

    fn send_error(&self, report: &ErrorReport) -> Result<(), SinkError> {
        self.errors
            .lock()
            .map_err(|err| SinkError::Unavailable {
                detail: err.to_string(),
            })?
            .push(report.clone());
        Ok(())
    }
}

/// Sink that always fails, for exercising failure isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl EventSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn send_event(&self, _event: &EnrichedEvent) -> Result<(), SinkError> {
        Err(SinkError::Unavailable {
            detail: "sink offline".to_string(),
        })
    }

    fn send_error(&self, _report: &ErrorReport) -> Result<(), SinkError> {
        Err(SinkError::Unavailable {
            detail: "sink offline".to_string(),
        })
    }
}
