//! The analytics service: session state, enrichment and the typed wrappers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::attribution::{self, UtmParams};
use crate::clock::{Clock, elapsed_secs};
use crate::event::{AnalyticsEvent, EnrichedEvent, ErrorReport, PageInfo};
use crate::scroll::{FrameRequest, FrameThrottle, ScrollMetrics, Section, crossed_milestones};
use crate::sink::EventSink;
use crate::storage::SessionStore;
use crate::timing::PageTimingEntries;

/// Collaborators injected into [`Analytics`].
#[derive(Clone)]
pub struct AnalyticsDeps {
    /// Time source for session and form timing.
    pub clock: Arc<dyn Clock>,
    /// Session-scoped storage for attribution.
    pub storage: Arc<dyn SessionStore>,
    /// General-purpose event collector.
    pub general_sink: Arc<dyn EventSink>,
    /// Page and error tracking collector.
    pub page_sink: Arc<dyn EventSink>,
}

/// Document visibility as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The page is shown.
    Visible,
    /// The page is backgrounded or being unloaded.
    Hidden,
}

#[derive(Debug)]
struct SessionState {
    started_ms: u64,
    initialized: bool,
    page: PageInfo,
    attribution: UtmParams,
    milestones_seen: Vec<u8>,
    scroll_top: f64,
    scroll_percent: u8,
    max_scroll_percent: u8,
    exit_intent_tracked: bool,
    page_exit_latched: bool,
    throttle: FrameThrottle,
    form_starts: HashMap<String, u64>,
}

impl SessionState {
    fn new(started_ms: u64) -> Self {
        Self {
            started_ms,
            initialized: false,
            page: PageInfo::default(),
            attribution: UtmParams::default(),
            milestones_seen: Vec::with_capacity(4),
            scroll_top: 0.0,
            scroll_percent: 0,
            max_scroll_percent: 0,
            exit_intent_tracked: false,
            page_exit_latched: false,
            throttle: FrameThrottle::default(),
            form_starts: HashMap::new(),
        }
    }
}

/// Per-session analytics pipeline.
///
/// Every tracking call is best-effort: sink failures, storage failures and a
/// poisoned state lock are logged at `debug` and otherwise ignored. The state
/// lock is never held while sinks run.
pub struct Analytics {
    clock: Arc<dyn Clock>,
    storage: Arc<dyn SessionStore>,
    general_sink: Arc<dyn EventSink>,
    page_sink: Arc<dyn EventSink>,
    state: Mutex<SessionState>,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("general_sink", &self.general_sink.name())
            .field("page_sink", &self.page_sink.name())
            .finish_non_exhaustive()
    }
}

impl Analytics {
    /// Start a session at the clock's current time.
    #[must_use]
    pub fn new(deps: AnalyticsDeps) -> Self {
        let started_ms = deps.clock.now_ms();
        Self {
            clock: deps.clock,
            storage: deps.storage,
            general_sink: deps.general_sink,
            page_sink: deps.page_sink,
            state: Mutex::new(SessionState::new(started_ms)),
        }
    }

    /// Capture attribution for the landing page and record it as current.
    ///
    /// Calling `init` more than once keeps the first attribution seen.
    pub fn init(&self, page: &PageInfo) {
        let captured = attribution::capture(self.storage.as_ref(), &page.url);
        let first = self.with_state(|state| {
            state.page = page.clone();
            if state.attribution.is_empty() {
                state.attribution = captured;
            }
            !std::mem::replace(&mut state.initialized, true)
        });
        if first == Some(true) {
            tracing::info!(url = %page.url, "analytics session initialised");
        }
    }

    /// Record an internal navigation and emit `page_view`.
    pub fn navigate(&self, page: &PageInfo) {
        let captured = attribution::capture(self.storage.as_ref(), &page.url);
        self.with_state(|state| {
            state.page = page.clone();
            if state.attribution.is_empty() {
                state.attribution = captured;
            }
        });
        self.track_page_view();
    }

    /// Enrich `event` with session context and forward it to both sinks.
    pub fn track_event(&self, event: AnalyticsEvent) {
        let now = self.clock.now_ms();
        let Some(enriched) = self.with_state(|state| EnrichedEvent {
            action: event.action,
            category: event.category,
            label: event.label,
            value: event.value,
            page_title: state.page.title.clone(),
            page_url: state.page.url.clone(),
            attribution: state.attribution.clone(),
            session_duration: elapsed_secs(state.started_ms, now),
            timestamp_ms: now,
            custom_parameters: event.custom_parameters,
        }) else {
            return;
        };
        for sink in [&self.general_sink, &self.page_sink] {
            if let Err(err) = sink.send_event(&enriched) {
                tracing::debug!(
                    sink = sink.name(),
                    action = %enriched.action,
                    error = %err,
                    "telemetry sink failed"
                );
            }
        }
    }

    /// Report a scroll event. The host schedules an animation frame when
    /// [`FrameRequest::Schedule`] is returned.
    pub fn on_scroll(&self, metrics: ScrollMetrics) -> FrameRequest {
        self.with_state(|state| state.throttle.submit(metrics))
            .unwrap_or(FrameRequest::AlreadyPending)
    }

    /// Process the latest scroll metrics for the frame that just fired.
    pub fn on_animation_frame(&self) {
        if let Some(metrics) = self.with_state(|state| state.throttle.take()).flatten() {
            self.record_scroll(metrics);
        }
    }

    /// Compute scroll depth and emit any milestones not yet reported.
    pub fn record_scroll(&self, metrics: ScrollMetrics) {
        let percent = metrics.percent();
        let crossed = self
            .with_state(|state| {
                state.scroll_top = metrics.scroll_top;
                let Some(percent) = percent else {
                    return Vec::new();
                };
                state.scroll_percent = percent;
                state.max_scroll_percent = state.max_scroll_percent.max(percent);
                let crossed = crossed_milestones(percent, &state.milestones_seen);
                state.milestones_seen.extend_from_slice(&crossed);
                crossed
            })
            .unwrap_or_default();

        for milestone in crossed {
            self.track_event(
                AnalyticsEvent::new("scroll_depth", "engagement")
                    .label(format!("{milestone}%"))
                    .value(f64::from(milestone))
                    .param("scroll_percentage", milestone),
            );
        }
    }

    /// Pointer left the document at vertical position `client_y`.
    pub fn on_mouse_leave(&self, client_y: f64) {
        if client_y > 0.0 {
            return;
        }
        let fire = self.with_state(|state| !std::mem::replace(&mut state.exit_intent_tracked, true));
        if fire == Some(true) {
            self.track_event(
                AnalyticsEvent::new("exit_intent", "engagement")
                    .param("time_on_page", self.session_duration_secs()),
            );
        }
    }

    /// Emit `page_load_time` from the page's timing entries.
    #[allow(clippy::cast_precision_loss)]
    pub fn on_page_load(&self, entries: &PageTimingEntries) {
        let Some(metrics) = entries.metrics() else {
            tracing::debug!("navigation timing unavailable; skipping page_load_time");
            return;
        };
        let mut event = AnalyticsEvent::new("page_load_time", "performance")
            .value(metrics.load_time as f64)
            .param("load_time", metrics.load_time)
            .param("dom_content_loaded", metrics.dom_content_loaded);
        if let Some(fcp) = metrics.first_contentful_paint {
            event = event.param("first_contentful_paint", fcp);
        }
        self.track_event(event);
    }

    /// Visibility changed. `Hidden` emits `page_exit` once until the page is
    /// visible again.
    pub fn on_visibility_change(&self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.page_exit_once(),
            Visibility::Visible => {
                self.with_state(|state| state.page_exit_latched = false);
            }
        }
    }

    /// `beforeunload` fallback for `page_exit`.
    pub fn on_before_unload(&self) {
        self.page_exit_once();
    }

    fn page_exit_once(&self) {
        // Hidden tabs never run the pending frame.
        self.on_animation_frame();
        let max_scroll = self.with_state(|state| {
            if std::mem::replace(&mut state.page_exit_latched, true) {
                None
            } else {
                Some(state.max_scroll_percent)
            }
        });
        if let Some(Some(max_scroll)) = max_scroll {
            self.track_event(
                AnalyticsEvent::new("page_exit", "engagement")
                    .param("time_on_page", self.session_duration_secs())
                    .param("max_scroll_depth", max_scroll),
            );
        }
    }

    /// Emit `page_view` for the current page.
    pub fn track_page_view(&self) {
        let path = self
            .with_state(|state| state.page.path())
            .unwrap_or_else(|| "/".to_string());
        self.track_event(
            AnalyticsEvent::new("page_view", "navigation")
                .label(path.clone())
                .param("page_path", path),
        );
    }

    /// Emit `button_click` with the current scroll offset.
    #[allow(clippy::cast_possible_truncation)]
    pub fn track_button_click(&self, button: &str, location: &str) {
        let scroll_top = self.with_state(|state| state.scroll_top).unwrap_or(0.0);
        self.track_event(
            AnalyticsEvent::new("button_click", "interaction")
                .label(button)
                .param("button_location", location)
                .param("scroll_position", scroll_top.round() as i64),
        );
    }

    /// Emit `form_start` and remember when `form` was started.
    pub fn track_form_start(&self, form: &str) {
        let now = self.clock.now_ms();
        let since_session = self
            .with_state(|state| {
                state.form_starts.insert(form.to_string(), now);
                elapsed_secs(state.started_ms, now)
            })
            .unwrap_or_default();
        self.track_event(
            AnalyticsEvent::new("form_start", "form")
                .label(form)
                .param("time_to_start", since_session),
        );
    }

    /// Emit `form_complete` with the time since the form was started.
    pub fn track_form_complete(&self, form: &str, success: bool) {
        let elapsed = self.form_elapsed(form);
        self.track_event(
            AnalyticsEvent::new("form_complete", "form")
                .label(form)
                .param("success", success)
                .param("time_to_complete", elapsed),
        );
    }

    /// Emit `form_abandon` with the last step reached.
    pub fn track_form_abandon(&self, form: &str, last_step: &str) {
        let elapsed = self.form_elapsed(form);
        self.track_event(
            AnalyticsEvent::new("form_abandon", "form")
                .label(form)
                .param("last_step", last_step)
                .param("time_to_complete", elapsed),
        );
    }

    fn form_elapsed(&self, form: &str) -> u64 {
        let now = self.clock.now_ms();
        self.with_state(|state| {
            let started = state.form_starts.remove(form).unwrap_or(state.started_ms);
            elapsed_secs(started, now)
        })
        .unwrap_or_default()
    }

    /// Emit `feature_interaction`.
    pub fn track_feature_interaction(&self, feature: &str, interaction: &str) {
        self.track_event(
            AnalyticsEvent::new("feature_interaction", "engagement")
                .label(feature)
                .param("interaction_type", interaction),
        );
    }

    /// Emit `cta_view` with the section inferred from scroll position.
    pub fn track_cta_view(&self, cta: &str) {
        self.track_event(
            AnalyticsEvent::new("cta_view", "cta")
                .label(cta)
                .param("section", self.current_section().as_str()),
        );
    }

    /// Emit `cta_click` with the section and click destination.
    pub fn track_cta_click(&self, cta: &str, destination: &str) {
        self.track_event(
            AnalyticsEvent::new("cta_click", "cta")
                .label(cta)
                .param("section", self.current_section().as_str())
                .param("destination", destination),
        );
    }

    /// Emit `media_interaction`.
    pub fn track_media(&self, media_type: &str, action: &str, title: &str) {
        self.track_event(
            AnalyticsEvent::new("media_interaction", "media")
                .label(title)
                .param("media_type", media_type)
                .param("media_action", action),
        );
    }

    /// Emit a conversion, e.g. `waitlist_signup`.
    pub fn track_conversion(&self, kind: &str, value: Option<f64>) {
        let mut event = AnalyticsEvent::new("conversion", "conversion")
            .label(kind)
            .param("conversion_type", kind);
        if let Some(value) = value {
            event = event.value(value);
        }
        self.track_event(event);
    }

    /// Report an error both as an `error` event and to the page sink's
    /// error tracking.
    pub fn track_error(&self, error_type: &str, message: &str, context: Map<String, Value>) {
        self.track_event(
            AnalyticsEvent::new("error", "error")
                .label(error_type)
                .param("error_message", message)
                .params(context.clone()),
        );
        let report = ErrorReport {
            error_type: error_type.to_string(),
            message: message.to_string(),
            page_url: self
                .with_state(|state| state.page.url.clone())
                .unwrap_or_default(),
            timestamp_ms: self.clock.now_ms(),
            context,
        };
        if let Err(err) = self.page_sink.send_error(&report) {
            tracing::debug!(sink = self.page_sink.name(), error = %err, "error report dropped");
        }
    }

    /// Whole seconds since the session started.
    #[must_use]
    pub fn session_duration_secs(&self) -> u64 {
        let now = self.clock.now_ms();
        self.with_state(|state| elapsed_secs(state.started_ms, now))
            .unwrap_or_default()
    }

    /// Attribution attached to events in this session.
    #[must_use]
    pub fn attribution(&self) -> UtmParams {
        self.with_state(|state| state.attribution.clone())
            .unwrap_or_default()
    }

    /// Deepest scroll percentage seen so far.
    #[must_use]
    pub fn max_scroll_depth(&self) -> u8 {
        self.with_state(|state| state.max_scroll_percent)
            .unwrap_or_default()
    }

    /// Section inferred from the latest scroll position.
    #[must_use]
    pub fn current_section(&self) -> Section {
        let percent = self.with_state(|state| state.scroll_percent).unwrap_or(0);
        Section::from_scroll_percent(percent)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let Ok(mut guard) = self.state.lock() else {
            tracing::debug!("analytics state poisoned; dropping call");
            return None;
        };
        Some(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::RecordingSink;
    use crate::storage::MemorySessionStore;

    fn harness() -> (Analytics, Arc<ManualClock>, Arc<RecordingSink>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let sink = Arc::new(RecordingSink::new());
        let analytics = Analytics::new(AnalyticsDeps {
            clock: clock.clone(),
            storage: Arc::new(MemorySessionStore::new()),
            general_sink: sink.clone(),
            page_sink: Arc::new(crate::sink::NoopSink),
        });
        analytics.init(&PageInfo::new("https://launchpad.dev/", "Home"));
        (analytics, clock, sink)
    }

    #[test]
    fn enrichment_carries_page_and_duration() {
        let (analytics, clock, sink) = harness();
        clock.advance_secs(7);
        analytics.track_event(AnalyticsEvent::new("custom", "misc").param("k", "v"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.page_title, "Home");
        assert_eq!(event.page_url, "https://launchpad.dev/");
        assert_eq!(event.session_duration, 7);
        assert_eq!(event.timestamp_ms, 8_000);
        assert_eq!(event.custom("k"), Some(&Value::from("v")));
    }

    #[test]
    fn throttle_coalesces_scroll_events_into_one_frame() {
        let (analytics, _, sink) = harness();
        assert_eq!(
            analytics.on_scroll(ScrollMetrics::new(100.0, 1100.0, 100.0)),
            FrameRequest::Schedule
        );
        assert_eq!(
            analytics.on_scroll(ScrollMetrics::new(600.0, 1100.0, 100.0)),
            FrameRequest::AlreadyPending
        );
        analytics.on_animation_frame();
        analytics.on_animation_frame();

        let labels: Vec<_> = sink
            .events_named("scroll_depth")
            .into_iter()
            .filter_map(|event| event.label)
            .collect();
        assert_eq!(labels, ["25%", "50%"]);
        assert_eq!(analytics.max_scroll_depth(), 60);
    }

    #[test]
    fn exit_intent_ignores_moves_below_top_edge() {
        let (analytics, _, sink) = harness();
        analytics.on_mouse_leave(12.0);
        assert!(sink.events_named("exit_intent").is_empty());
        analytics.on_mouse_leave(0.0);
        assert_eq!(sink.events_named("exit_intent").len(), 1);
    }

    #[test]
    fn page_exit_latches_until_visible_again() {
        let (analytics, _, sink) = harness();
        analytics.on_visibility_change(Visibility::Hidden);
        analytics.on_before_unload();
        assert_eq!(sink.events_named("page_exit").len(), 1);

        analytics.on_visibility_change(Visibility::Visible);
        analytics.on_visibility_change(Visibility::Hidden);
        assert_eq!(sink.events_named("page_exit").len(), 2);
    }

    #[test]
    fn form_timing_measures_from_form_start() {
        let (analytics, clock, sink) = harness();
        clock.advance_secs(5);
        analytics.track_form_start("waitlist");
        clock.advance_secs(12);
        analytics.track_form_complete("waitlist", true);

        let start = &sink.events_named("form_start")[0];
        assert_eq!(start.custom("time_to_start"), Some(&Value::from(5_u64)));
        let complete = &sink.events_named("form_complete")[0];
        assert_eq!(complete.custom("time_to_complete"), Some(&Value::from(12_u64)));
        assert_eq!(complete.custom("success"), Some(&Value::Bool(true)));
    }

    #[test]
    fn cta_section_follows_scroll_position() {
        let (analytics, _, sink) = harness();
        analytics.record_scroll(ScrollMetrics::new(40.0, 200.0, 100.0));
        analytics.track_cta_click("start-trial", "/waitlist");

        let click = &sink.events_named("cta_click")[0];
        assert_eq!(click.custom("section"), Some(&Value::from("pricing")));
        assert_eq!(click.custom("destination"), Some(&Value::from("/waitlist")));
    }

    #[test]
    fn page_load_without_navigation_entry_is_skipped() {
        let (analytics, _, sink) = harness();
        analytics.on_page_load(&PageTimingEntries::default());
        assert!(sink.events_named("page_load_time").is_empty());
    }
}
