use std::sync::Arc;

use launchpad_analytics::{
    Analytics, AnalyticsDeps, FailingSink, ManualClock, MemorySessionStore, NavigationTiming,
    PageInfo, PageTimingEntries, PaintTiming, RecordingSink, ScrollMetrics, SessionStore,
    UTM_STORAGE_KEY, UnavailableSessionStore, Visibility,
};
use serde_json::{Map, Value, json};

struct Harness {
    analytics: Analytics,
    clock: Arc<ManualClock>,
    general: Arc<RecordingSink>,
    page: Arc<RecordingSink>,
}

fn harness_with(storage: Arc<dyn SessionStore>, url: &str) -> Harness {
    let clock = Arc::new(ManualClock::new(0));
    let general = Arc::new(RecordingSink::new());
    let page = Arc::new(RecordingSink::new());
    let analytics = Analytics::new(AnalyticsDeps {
        clock: clock.clone(),
        storage,
        general_sink: general.clone(),
        page_sink: page.clone(),
    });
    analytics.init(&PageInfo::new(url, "Launchpad"));
    Harness {
        analytics,
        clock,
        general,
        page,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(MemorySessionStore::new()), "https://launchpad.dev/")
}

fn at_percent(percent: f64) -> ScrollMetrics {
    ScrollMetrics::new(percent * 10.0, 1_500.0, 500.0)
}

fn milestone_labels(sink: &RecordingSink) -> Vec<String> {
    sink.events_named("scroll_depth")
        .into_iter()
        .filter_map(|event| event.label)
        .collect()
}

#[test]
fn scroll_sequence_fires_each_milestone_once_in_order() {
    let h = harness();
    for percent in [30.0, 60.0, 95.0] {
        h.analytics.record_scroll(at_percent(percent));
    }
    assert_eq!(milestone_labels(&h.general), ["25%", "50%", "75%", "90%"]);
}

#[test]
fn jumping_straight_to_bottom_fires_every_milestone() {
    let h = harness();
    h.analytics.record_scroll(at_percent(95.0));
    assert_eq!(milestone_labels(&h.general), ["25%", "50%", "75%", "90%"]);
}

#[test]
fn revisiting_scroll_positions_does_not_refire() {
    let h = harness();
    for percent in [60.0, 10.0, 55.0, 0.0, 60.0] {
        h.analytics.record_scroll(at_percent(percent));
    }
    assert_eq!(milestone_labels(&h.general), ["25%", "50%"]);
    assert_eq!(h.analytics.max_scroll_depth(), 60);
}

#[test]
fn unscrollable_page_emits_no_milestones() {
    let h = harness();
    h.analytics.record_scroll(ScrollMetrics::new(0.0, 400.0, 800.0));
    assert!(milestone_labels(&h.general).is_empty());
}

#[test]
fn exit_intent_fires_once_per_session() {
    let h = harness();
    h.clock.advance_secs(30);
    for _ in 0..3 {
        h.analytics.on_mouse_leave(-4.0);
        h.analytics.on_mouse_leave(0.0);
    }
    let exits = h.general.events_named("exit_intent");
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].custom("time_on_page"), Some(&Value::from(30_u64)));
}

#[test]
fn attribution_survives_internal_navigation() {
    let storage = Arc::new(MemorySessionStore::new());
    let h = harness_with(
        storage.clone(),
        "https://launchpad.dev/?utm_source=twitter&utm_campaign=launch",
    );
    h.analytics
        .navigate(&PageInfo::new("https://launchpad.dev/pricing", "Pricing"));
    h.analytics.track_cta_click("start", "/waitlist");

    let click = &h.general.events_named("cta_click")[0];
    assert_eq!(click.attribution.source.as_deref(), Some("twitter"));
    assert_eq!(click.attribution.campaign.as_deref(), Some("launch"));
    assert_eq!(click.page_url, "https://launchpad.dev/pricing");
    assert!(
        storage
            .get(UTM_STORAGE_KEY)
            .ok()
            .flatten()
            .is_some_and(|raw| raw.contains("twitter"))
    );
}

#[test]
fn attribution_is_shared_by_a_new_service_in_the_same_session() {
    let storage = Arc::new(MemorySessionStore::new());
    let _first = harness_with(storage.clone(), "/?utm_source=newsletter&utm_medium=email");
    let second = harness_with(storage, "/blog");
    second.analytics.track_page_view();

    let view = &second.general.events_named("page_view")[0];
    assert_eq!(view.attribution.source.as_deref(), Some("newsletter"));
    assert_eq!(view.attribution.medium.as_deref(), Some("email"));
}

#[test]
fn unavailable_storage_keeps_attribution_in_memory() {
    let h = harness_with(Arc::new(UnavailableSessionStore), "/?utm_source=ads");
    h.analytics.navigate(&PageInfo::new("/pricing", "Pricing"));
    let view = &h.general.events_named("page_view")[0];
    assert_eq!(view.attribution.source.as_deref(), Some("ads"));
}

#[test]
fn events_reach_both_sinks() {
    let h = harness();
    h.analytics.track_button_click("join", "hero");
    assert_eq!(h.general.events_named("button_click").len(), 1);
    assert_eq!(h.page.events_named("button_click").len(), 1);
}

#[test]
fn errors_are_dual_routed() {
    let h = harness();
    let mut context = Map::new();
    context.insert("endpoint".to_string(), json!("/waitlist"));
    h.analytics
        .track_error("api_error", "request failed", context);

    let events = h.general.events_named("error");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label.as_deref(), Some("api_error"));
    assert_eq!(events[0].custom("endpoint"), Some(&json!("/waitlist")));

    let reports = h.page.errors();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "request failed");
    assert!(h.general.errors().is_empty());
}

#[test]
fn failing_sink_does_not_block_the_other() {
    let clock = Arc::new(ManualClock::new(0));
    let page = Arc::new(RecordingSink::new());
    let analytics = Analytics::new(AnalyticsDeps {
        clock,
        storage: Arc::new(UnavailableSessionStore),
        general_sink: Arc::new(FailingSink),
        page_sink: page.clone(),
    });
    analytics.init(&PageInfo::new("/", "Home"));
    analytics.track_conversion("waitlist_signup", Some(1.0));
    analytics.track_error("form_validation", "email invalid", Map::new());

    assert_eq!(page.events_named("conversion").len(), 1);
    assert_eq!(page.errors().len(), 1);
}

#[test]
fn page_load_reports_timing_breakdown() {
    let h = harness();
    h.analytics.on_page_load(&PageTimingEntries {
        navigation: Some(NavigationTiming {
            fetch_start: 10.0,
            dom_content_loaded_event_end: 410.0,
            load_event_end: 910.0,
        }),
        paint: vec![PaintTiming {
            name: "first-contentful-paint".to_string(),
            start_time: 250.4,
        }],
    });

    let load = &h.general.events_named("page_load_time")[0];
    assert_eq!(load.custom("load_time"), Some(&Value::from(900_u64)));
    assert_eq!(load.custom("dom_content_loaded"), Some(&Value::from(400_u64)));
    assert_eq!(load.custom("first_contentful_paint"), Some(&Value::from(250_u64)));
}

#[test]
fn page_exit_carries_max_scroll_and_uses_unload_as_fallback() {
    let h = harness();
    h.analytics.record_scroll(at_percent(80.0));
    h.analytics.record_scroll(at_percent(20.0));
    h.analytics.on_before_unload();
    h.analytics.on_visibility_change(Visibility::Hidden);

    let exits = h.general.events_named("page_exit");
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].custom("max_scroll_depth"), Some(&Value::from(80_u8)));
}

#[test]
fn page_exit_applies_scroll_still_waiting_for_a_frame() {
    let h = harness();
    h.analytics.on_scroll(at_percent(95.0));
    h.analytics.on_visibility_change(Visibility::Hidden);

    assert_eq!(milestone_labels(&h.general), ["25%", "50%", "75%", "90%"]);
    let exits = h.general.events_named("page_exit");
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].custom("max_scroll_depth"), Some(&json!(95)));
    assert_eq!(h.analytics.max_scroll_depth(), 95);
}
