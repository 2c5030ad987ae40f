//! JSON bodies posted by network sinks.

use serde_json::{Value, json};

use crate::event::{EnrichedEvent, ErrorReport};
use crate::sink::SinkError;

/// Body shape expected by the receiving endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStyle {
    /// `{"event": <action>, "params": {...flat params}}`; error reports are ignored.
    Keyed,
    /// `{"type": "event", "event": {...enriched event}}` and
    /// `{"type": "error", "error": {...report}}`.
    Structured,
}

impl PayloadStyle {
    /// Body for an enriched event.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Encode`] if the event cannot be serialised.
    pub fn event_body(self, event: &EnrichedEvent) -> Result<Value, SinkError> {
        Ok(match self {
            Self::Keyed => json!({
                "event": event.action,
                "params": event.flat_params(),
            }),
            Self::Structured => json!({
                "type": "event",
                "event": serde_json::to_value(event).map_err(|source| SinkError::Encode { source })?,
            }),
        })
    }

    /// Body for an error report, or `None` when the style does not carry errors.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Encode`] if the report cannot be serialised.
    pub fn error_body(self, report: &ErrorReport) -> Result<Option<Value>, SinkError> {
        match self {
            Self::Keyed => Ok(None),
            Self::Structured => Ok(Some(json!({
                "type": "error",
                "error": serde_json::to_value(report).map_err(|source| SinkError::Encode { source })?,
            }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn report() -> ErrorReport {
        ErrorReport {
            error_type: "api_error".into(),
            message: "boom".into(),
            page_url: "/pricing".into(),
            timestamp_ms: 7,
            context: Map::new(),
        }
    }

    #[test]
    fn keyed_style_drops_error_reports() -> Result<(), SinkError> {
        assert!(PayloadStyle::Keyed.error_body(&report())?.is_none());
        Ok(())
    }

    #[test]
    fn structured_error_body_is_tagged() -> Result<(), SinkError> {
        let body = PayloadStyle::Structured.error_body(&report())?;
        let body = body.unwrap_or_default();
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["message"], "boom");
        Ok(())
    }
}
