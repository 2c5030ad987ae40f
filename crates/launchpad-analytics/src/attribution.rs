//! UTM attribution extraction and session persistence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::storage::{SessionStore, UTM_STORAGE_KEY};

/// Attribution parameters identifying where a session came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    /// `utm_source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// `utm_medium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// `utm_campaign`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    /// `utm_term`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// `utm_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UtmParams {
    /// Extract attribution from a page URL. Relative URLs (`/?utm_source=x`) are accepted.
    #[must_use]
    pub fn from_url(raw: &str) -> Self {
        let Some(url) = parse_page_url(raw) else {
            return Self::default();
        };
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match &*key {
                "utm_source" => &mut params.source,
                "utm_medium" => &mut params.medium,
                "utm_campaign" => &mut params.campaign,
                "utm_term" => &mut params.term,
                "utm_content" => &mut params.content,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        params
    }

    /// Whether no parameter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.medium.is_none()
            && self.campaign.is_none()
            && self.term.is_none()
            && self.content.is_none()
    }

    /// Flatten into `utm_*` event parameters.
    pub fn write_params(&self, params: &mut Map<String, Value>) {
        for (key, value) in [
            ("utm_source", &self.source),
            ("utm_medium", &self.medium),
            ("utm_campaign", &self.campaign),
            ("utm_term", &self.term),
            ("utm_content", &self.content),
        ] {
            if let Some(value) = value {
                params.insert(key.to_string(), Value::String(value.clone()));
            }
        }
    }
}

/// Parse a page URL that may be relative to the current origin.
pub(crate) fn parse_page_url(raw: &str) -> Option<Url> {
    let base = Url::parse("http://localhost/").ok()?;
    base.join(raw.trim()).ok()
}

/// Read the attribution stored for this session, if any.
pub(crate) fn load_stored(store: &dyn SessionStore) -> Option<UtmParams> {
    let raw = match store.get(UTM_STORAGE_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::debug!(error = %err, "attribution read failed");
            return None;
        }
    };
    match serde_json::from_str::<UtmParams>(&raw) {
        Ok(params) if !params.is_empty() => Some(params),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(error = %err, "stored attribution was not valid json");
            None
        }
    }
}

/// Resolve the session's attribution for a newly visited URL.
///
/// Stored attribution wins (first touch per session). Otherwise a non-empty
/// set from `url` is persisted; an empty set never overwrites anything.
pub(crate) fn capture(store: &dyn SessionStore, url: &str) -> UtmParams {
    if let Some(existing) = load_stored(store) {
        return existing;
    }
    let incoming = UtmParams::from_url(url);
    if incoming.is_empty() {
        return incoming;
    }
    match serde_json::to_string(&incoming) {
        Ok(encoded) => {
            if let Err(err) = store.set(UTM_STORAGE_KEY, &encoded) {
                tracing::debug!(error = %err, "attribution write failed");
            }
        }
        Err(err) => tracing::debug!(error = %err, "attribution encode failed"),
    }
    incoming
}
