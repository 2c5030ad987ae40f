//! Fire-and-forget network sink for the browser.

use gloo::console;
use gloo_net::http::Request;
use launchpad_analytics::{EnrichedEvent, ErrorReport, EventSink, PayloadStyle, SinkError};
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

/// Posts JSON payloads with `fetch` on the page's event loop.
#[derive(Debug, Clone)]
pub struct BeaconSink {
    name: &'static str,
    endpoint: String,
    style: PayloadStyle,
}

impl BeaconSink {
    /// Sink posting to `endpoint` (absolute or same-origin path).
    pub fn new(name: &'static str, endpoint: impl Into<String>, style: PayloadStyle) -> Self {
        Self {
            name,
            endpoint: endpoint.into(),
            style,
        }
    }

    fn dispatch(&self, body: Value) {
        let name = self.name;
        let endpoint = self.endpoint.clone();
        spawn_local(async move {
            let request = match Request::post(&endpoint).json(&body) {
                Ok(request) => request,
                Err(err) => {
                    console::debug!("telemetry encode failed", name, err.to_string());
                    return;
                }
            };
            match request.send().await {
                Ok(response) if !response.ok() => {
                    console::debug!("telemetry sink rejected payload", name, response.status());
                }
                Ok(_) => {}
                Err(err) => console::debug!("telemetry emit failed", name, err.to_string()),
            }
        });
    }
}

impl EventSink for BeaconSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn send_event(&self, event: &EnrichedEvent) -> Result<(), SinkError> {
        self.dispatch(self.style.event_body(event)?);
        Ok(())
    }

    fn send_error(&self, report: &ErrorReport) -> Result<(), SinkError> {
        if let Some(body) = self.style.error_body(report)? {
            self.dispatch(body);
        }
        Ok(())
    }
}
