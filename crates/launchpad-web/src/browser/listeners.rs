//! DOM listeners feeding the analytics pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use launchpad_analytics::{
    Analytics, FrameRequest, NavigationTiming, PageTimingEntries, PaintTiming, ScrollMetrics,
    Visibility,
};
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, PerformanceEntry, PerformanceNavigationTiming, Window};

/// Listeners attached by [`install_listeners`]. Dropping this detaches them.
pub struct PageListeners {
    listeners: Vec<EventListener>,
}

impl PageListeners {
    /// Keep every listener attached for the rest of the page session.
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

/// Attach scroll, exit-intent, page-load and page-exit listeners.
///
/// Returns `None` outside a browsing context.
pub fn install_listeners(analytics: &Rc<Analytics>) -> Option<PageListeners> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let load_timer: Rc<RefCell<Option<Timeout>>> = Rc::default();

    let listeners = vec![
        scroll_listener(&window, analytics),
        EventListener::new(&document, "mouseleave", {
            let analytics = Rc::clone(analytics);
            move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    analytics.on_mouse_leave(f64::from(event.client_y()));
                }
            }
        }),
        EventListener::new(&window, "load", {
            let analytics = Rc::clone(analytics);
            let load_timer = Rc::clone(&load_timer);
            move |_| schedule_page_load(&analytics, &load_timer)
        }),
        EventListener::new(&document, "visibilitychange", {
            let analytics = Rc::clone(analytics);
            let document = document.clone();
            move |_| {
                let visibility = if document.hidden() {
                    Visibility::Hidden
                } else {
                    Visibility::Visible
                };
                analytics.on_visibility_change(visibility);
            }
        }),
        EventListener::new(&window, "beforeunload", {
            let analytics = Rc::clone(analytics);
            move |_| analytics.on_before_unload()
        }),
    ];

    if document.ready_state() == "complete" {
        schedule_page_load(analytics, &load_timer);
    }

    Some(PageListeners { listeners })
}

// loadEventEnd is only populated once the load handlers have returned.
fn schedule_page_load(analytics: &Rc<Analytics>, slot: &Rc<RefCell<Option<Timeout>>>) {
    let analytics = Rc::clone(analytics);
    let timeout = Timeout::new(0, move || analytics.on_page_load(&timing_entries()));
    *slot.borrow_mut() = Some(timeout);
}

fn scroll_listener(window: &Window, analytics: &Rc<Analytics>) -> EventListener {
    let analytics = Rc::clone(analytics);
    let frame: Rc<RefCell<Option<AnimationFrame>>> = Rc::default();
    // gloo listeners are registered as passive.
    EventListener::new(window, "scroll", move |_| {
        let Some(metrics) = scroll_metrics() else {
            return;
        };
        if analytics.on_scroll(metrics) == FrameRequest::Schedule {
            let analytics = Rc::clone(&analytics);
            let handle = request_animation_frame(move |_| analytics.on_animation_frame());
            *frame.borrow_mut() = Some(handle);
        }
    })
}

fn scroll_metrics() -> Option<ScrollMetrics> {
    let window = web_sys::window()?;
    let root = window.document()?.document_element()?;
    let scroll_top = window.scroll_y().ok()?;
    Some(ScrollMetrics::new(
        scroll_top,
        f64::from(root.scroll_height()),
        f64::from(root.client_height()),
    ))
}

fn timing_entries() -> PageTimingEntries {
    let Some(performance) = web_sys::window().and_then(|window| window.performance()) else {
        return PageTimingEntries::default();
    };
    let navigation = performance
        .get_entries_by_type("navigation")
        .iter()
        .find_map(|entry| entry.dyn_into::<PerformanceNavigationTiming>().ok())
        .map(|entry| NavigationTiming {
            fetch_start: entry.fetch_start(),
            dom_content_loaded_event_end: entry.dom_content_loaded_event_end(),
            load_event_end: entry.load_event_end(),
        });
    let paint = performance
        .get_entries_by_type("paint")
        .iter()
        .filter_map(|entry| entry.dyn_into::<PerformanceEntry>().ok())
        .map(|entry| PaintTiming {
            name: entry.name(),
            start_time: entry.start_time(),
        })
        .collect();
    PageTimingEntries { navigation, paint }
}
