//! Browser-backed adapters: storage, clock, network sink and DOM listeners.

pub mod clock;
pub mod listeners;
pub mod sink;
pub mod storage;

use std::sync::Arc;

use launchpad_analytics::{Analytics, AnalyticsDeps, PageInfo, PayloadStyle};

pub use clock::BrowserClock;
pub use listeners::{PageListeners, install_listeners};
pub use sink::BeaconSink;
pub use storage::{BrowserSessionStore, LocalPreferenceStore};

/// General event collector, overridable at build time.
pub const GENERAL_ENDPOINT: &str = match option_env!("LAUNCHPAD_TELEMETRY_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "/api/analytics/collect",
};

/// Page and error collector, overridable at build time.
pub const INSIGHTS_ENDPOINT: &str = match option_env!("LAUNCHPAD_INSIGHTS_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "/api/analytics/insights",
};

/// Analytics service wired to browser storage, `Date.now()` and `fetch` sinks.
#[must_use]
pub fn browser_analytics() -> Analytics {
    Analytics::new(AnalyticsDeps {
        clock: Arc::new(BrowserClock),
        storage: Arc::new(BrowserSessionStore),
        general_sink: Arc::new(BeaconSink::new(
            "general",
            GENERAL_ENDPOINT,
            PayloadStyle::Keyed,
        )),
        page_sink: Arc::new(BeaconSink::new(
            "insights",
            INSIGHTS_ENDPOINT,
            PayloadStyle::Structured,
        )),
    })
}

/// Current location and document title.
#[must_use]
pub fn current_page() -> PageInfo {
    let Some(window) = web_sys::window() else {
        return PageInfo::default();
    };
    let url = window.location().href().unwrap_or_default();
    let title = window.document().map(|document| document.title()).unwrap_or_default();
    PageInfo::new(url, title)
}

/// Set the document title.
pub fn set_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        document.set_title(title);
    }
}
