//! Page-load performance entries.

/// Subset of a navigation timing entry, in milliseconds relative to time origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationTiming {
    /// `fetchStart`.
    pub fetch_start: f64,
    /// `domContentLoadedEventEnd`.
    pub dom_content_loaded_event_end: f64,
    /// `loadEventEnd`.
    pub load_event_end: f64,
}

/// A paint timing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintTiming {
    /// Entry name (`first-paint`, `first-contentful-paint`).
    pub name: String,
    /// `startTime` in milliseconds.
    pub start_time: f64,
}

/// Performance entries available after the `load` event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTimingEntries {
    /// Navigation entry, when the browser exposes one.
    pub navigation: Option<NavigationTiming>,
    /// Paint entries.
    pub paint: Vec<PaintTiming>,
}

/// Derived load metrics, whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoadMetrics {
    /// `loadEventEnd - fetchStart`.
    pub load_time: u64,
    /// `domContentLoadedEventEnd - fetchStart`.
    pub dom_content_loaded: u64,
    /// First contentful paint, when reported.
    pub first_contentful_paint: Option<u64>,
}

const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

impl PageTimingEntries {
    /// Derive load metrics. Missing or inconsistent navigation data yields `None`.
    #[must_use]
    pub fn metrics(&self) -> Option<PageLoadMetrics> {
        let navigation = self.navigation?;
        let load_time = duration_ms(navigation.fetch_start, navigation.load_event_end)?;
        let dom_content_loaded =
            duration_ms(navigation.fetch_start, navigation.dom_content_loaded_event_end)?;
        let first_contentful_paint = self
            .paint
            .iter()
            .find(|entry| entry.name == FIRST_CONTENTFUL_PAINT)
            .and_then(|entry| duration_ms(0.0, entry.start_time));
        Some(PageLoadMetrics {
            load_time,
            dom_content_loaded,
            first_contentful_paint,
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_ms(start: f64, end: f64) -> Option<u64> {
    if !start.is_finite() || !end.is_finite() || end < start {
        return None;
    }
    Some((end - start).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigation() -> NavigationTiming {
        NavigationTiming {
            fetch_start: 10.0,
            dom_content_loaded_event_end: 610.4,
            load_event_end: 1_210.6,
        }
    }

    #[test]
    fn derives_metrics_from_entries() {
        let entries = PageTimingEntries {
            navigation: Some(navigation()),
            paint: vec![
                PaintTiming {
                    name: "first-paint".into(),
                    start_time: 300.0,
                },
                PaintTiming {
                    name: "first-contentful-paint".into(),
                    start_time: 420.2,
                },
            ],
        };
        assert_eq!(
            entries.metrics(),
            Some(PageLoadMetrics {
                load_time: 1_201,
                dom_content_loaded: 600,
                first_contentful_paint: Some(420),
            })
        );
    }

    #[test]
    fn fcp_is_optional() {
        let entries = PageTimingEntries {
            navigation: Some(navigation()),
            paint: Vec::new(),
        };
        assert_eq!(entries.metrics().and_then(|m| m.first_contentful_paint), None);
    }

    #[test]
    fn malformed_entries_yield_none() {
        assert_eq!(PageTimingEntries::default().metrics(), None);
        let entries = PageTimingEntries {
            navigation: Some(NavigationTiming {
                fetch_start: 10.0,
                dom_content_loaded_event_end: 50.0,
                load_event_end: 0.0,
            }),
            paint: Vec::new(),
        };
        assert_eq!(entries.metrics(), None);
        let entries = PageTimingEntries {
            navigation: Some(NavigationTiming {
                fetch_start: f64::NAN,
                ..navigation()
            }),
            paint: Vec::new(),
        };
        assert_eq!(entries.metrics(), None);
    }
}
