//! HTTP sinks that post JSON in the background on the current tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::event::{EnrichedEvent, ErrorReport};
use crate::payload::PayloadStyle;
use crate::sink::{EventSink, SinkError};

/// Default per-request timeout for telemetry posts.
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(2);

/// Endpoints for the two downstream sinks.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// General-purpose event collector.
    pub general_endpoint: Option<Url>,
    /// Page and error tracking collector.
    pub insights_endpoint: Option<Url>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            general_endpoint: None,
            insights_endpoint: None,
            timeout: DEFAULT_SINK_TIMEOUT,
        }
    }
}

/// Fire-and-forget JSON poster.
///
/// Short-lived processes call [`HttpSink::flush`] before exiting so in-flight
/// posts are not cut off.
#[derive(Debug, Clone)]
pub struct HttpSink {
    name: &'static str,
    client: Client,
    endpoint: Url,
    style: PayloadStyle,
    inflight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl HttpSink {
    /// Build a sink posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(
        name: &'static str,
        endpoint: Url,
        style: PayloadStyle,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SinkError::Unavailable {
                detail: err.to_string(),
            })?;
        Ok(Self {
            name,
            client,
            endpoint,
            style,
            inflight: Arc::default(),
        })
    }

    /// Endpoint this sink posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn dispatch(&self, body: Value) -> Result<(), SinkError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| SinkError::NoRuntime)?;
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let name = self.name;
        let task = handle.spawn(async move {
            match client.post(endpoint).json(&body).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::debug!(sink = name, status = %response.status(), "telemetry sink rejected payload");
                }
                Ok(_) => {}
                Err(err) => tracing::debug!(sink = name, error = %err, "telemetry emit failed"),
            }
        });
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.retain(|task| !task.is_finished());
        inflight.push(task);
        Ok(())
    }

    /// Wait for every post dispatched so far to finish.
    pub async fn flush(&self) {
        let pending = std::mem::take(
            &mut *self.inflight.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for task in pending {
            if let Err(err) = task.await {
                tracing::debug!(sink = self.name, error = %err, "telemetry task aborted");
            }
        }
    }
}

impl EventSink for HttpSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn send_event(&self, event: &EnrichedEvent) -> Result<(), SinkError> {
        self.dispatch(self.style.event_body(event)?)
    }

    fn send_error(&self, report: &ErrorReport) -> Result<(), SinkError> {
        match self.style.error_body(report)? {
            Some(body) => self.dispatch(body),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::UtmParams;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::{Map, json};

    fn event() -> EnrichedEvent {
        EnrichedEvent {
            action: "cta_click".into(),
            category: "cta".into(),
            label: Some("hero".into()),
            value: None,
            page_title: "Home".into(),
            page_url: "https://launchpad.dev/".into(),
            attribution: UtmParams::default(),
            session_duration: 3,
            timestamp_ms: 42,
            custom_parameters: Map::new(),
        }
    }

    #[tokio::test]
    async fn keyed_sink_posts_flat_params() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/collect")
                .json_body(json!({
                    "event": "cta_click",
                    "params": {
                        "event_category": "cta",
                        "event_label": "hero",
                        "page_title": "Home",
                        "page_location": "https://launchpad.dev/",
                        "session_duration": 3
                    }
                }));
            then.status(204);
        });

        let sink = HttpSink::new(
            "general",
            server.url("/collect").parse()?,
            PayloadStyle::Keyed,
            DEFAULT_SINK_TIMEOUT,
        )?;
        sink.send_event(&event())?;
        sink.flush().await;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn structured_sink_posts_errors() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/insights");
            then.status(200);
        });

        let sink = HttpSink::new(
            "insights",
            server.url("/insights").parse()?,
            PayloadStyle::Structured,
            DEFAULT_SINK_TIMEOUT,
        )?;
        sink.send_error(&ErrorReport {
            error_type: "api_error".into(),
            message: "boom".into(),
            page_url: "/".into(),
            timestamp_ms: 1,
            context: Map::new(),
        })?;
        sink.flush().await;
        mock.assert();
        Ok(())
    }

    #[test]
    fn dispatch_without_runtime_reports_no_runtime() -> Result<()> {
        let sink = HttpSink::new(
            "general",
            "http://127.0.0.1:9/collect".parse()?,
            PayloadStyle::Keyed,
            DEFAULT_SINK_TIMEOUT,
        )?;
        assert!(matches!(sink.send_event(&event()), Err(SinkError::NoRuntime)));
        Ok(())
    }
}
