//! Event shapes flowing from callers to sinks.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::attribution::UtmParams;

/// Page currently shown to the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Full URL including query string.
    pub url: String,
    /// Document title.
    pub title: String,
}

impl PageInfo {
    /// Page from a URL and title.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Path component of the URL (`/` when it cannot be parsed).
    #[must_use]
    pub fn path(&self) -> String {
        crate::attribution::parse_page_url(&self.url)
            .map_or_else(|| "/".to_string(), |url| url.path().to_string())
    }
}

/// Caller-supplied event, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    /// Action name; sinks key events by it.
    pub action: String,
    /// Coarse grouping (`engagement`, `form`, `cta`, ...).
    pub category: String,
    /// Optional free-form label.
    pub label: Option<String>,
    /// Optional numeric value.
    pub value: Option<f64>,
    /// Extra parameters merged into the payload.
    pub custom_parameters: Map<String, Value>,
}

impl AnalyticsEvent {
    /// Event with an action and category.
    pub fn new(action: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            category: category.into(),
            label: None,
            value: None,
            custom_parameters: Map::new(),
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a numeric value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a custom parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_parameters.insert(key.into(), value.into());
        self
    }

    /// Merge a map of custom parameters.
    #[must_use]
    pub fn params(mut self, extra: Map<String, Value>) -> Self {
        self.custom_parameters.extend(extra);
        self
    }
}

/// Event after enrichment with page, attribution and session context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEvent {
    /// Action name.
    pub action: String,
    /// Category.
    pub category: String,
    /// Label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Document title at emission time.
    pub page_title: String,
    /// Page URL at emission time.
    pub page_url: String,
    /// Session attribution.
    pub attribution: UtmParams,
    /// Seconds since the session started.
    pub session_duration: u64,
    /// Emission timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Caller-supplied parameters.
    pub custom_parameters: Map<String, Value>,
}

impl EnrichedEvent {
    /// Flat parameter map in the shape tag-manager style sinks expect.
    ///
    /// Custom parameters are written last and win on key collisions.
    #[must_use]
    pub fn flat_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(
            "event_category".to_string(),
            Value::String(self.category.clone()),
        );
        if let Some(label) = &self.label {
            params.insert("event_label".to_string(), Value::String(label.clone()));
        }
        if let Some(value) = self.value {
            params.insert("value".to_string(), Value::from(value));
        }
        params.insert(
            "page_title".to_string(),
            Value::String(self.page_title.clone()),
        );
        params.insert(
            "page_location".to_string(),
            Value::String(self.page_url.clone()),
        );
        self.attribution.write_params(&mut params);
        params.insert(
            "session_duration".to_string(),
            Value::from(self.session_duration),
        );
        for (key, value) in &self.custom_parameters {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// Look up a custom parameter.
    #[must_use]
    pub fn custom(&self, key: &str) -> Option<&Value> {
        self.custom_parameters.get(key)
    }
}

/// Error routed to the dedicated error-tracking sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Error classification (`api_error`, `form_validation`, ...).
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
    /// Page URL at emission time.
    pub page_url: String,
    /// Emission timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Additional context supplied by the caller.
    pub context: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnrichedEvent {
        EnrichedEvent {
            action: "button_click".into(),
            category: "interaction".into(),
            label: Some("join".into()),
            value: None,
            page_title: "Home".into(),
            page_url: "https://launchpad.dev/".into(),
            attribution: UtmParams {
                source: Some("twitter".into()),
                ..UtmParams::default()
            },
            session_duration: 12,
            timestamp_ms: 1,
            custom_parameters: Map::new(),
        }
    }

    #[test]
    fn builder_collects_fields() {
        let event = AnalyticsEvent::new("cta_click", "cta")
            .label("hero")
            .value(1.0)
            .param("section", "hero");
        assert_eq!(event.label.as_deref(), Some("hero"));
        assert_eq!(event.value, Some(1.0));
        assert_eq!(event.custom_parameters.get("section"), Some(&Value::from("hero")));
    }

    #[test]
    fn flat_params_include_context() {
        let params = sample().flat_params();
        assert_eq!(params["event_category"], "interaction");
        assert_eq!(params["event_label"], "join");
        assert_eq!(params["page_location"], "https://launchpad.dev/");
        assert_eq!(params["utm_source"], "twitter");
        assert_eq!(params["session_duration"], 12);
        assert!(!params.contains_key("value"));
    }

    #[test]
    fn page_path_handles_relative_urls() {
        assert_eq!(PageInfo::new("/blog/launch?x=1", "Blog").path(), "/blog/launch");
        assert_eq!(PageInfo::new("https://a.dev/pricing", "P").path(), "/pricing");
    }
}
