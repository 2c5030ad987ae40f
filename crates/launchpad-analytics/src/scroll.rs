//! Scroll depth milestones, frame throttling and the section heuristic.

use serde::Serialize;

/// Scroll percentages reported at most once per session.
pub const SCROLL_MILESTONES: [u8; 4] = [25, 50, 75, 90];

/// Raw scroll geometry read from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical scroll offset in pixels.
    pub scroll_top: f64,
    /// Total document height in pixels.
    pub scroll_height: f64,
    /// Viewport height in pixels.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Geometry for a page of `scroll_height` viewed through `viewport_height`.
    #[must_use]
    pub const fn new(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            viewport_height,
        }
    }

    /// Scroll position as a whole percentage of the scrollable range.
    ///
    /// Returns `None` for pages that cannot scroll or for non-finite input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> Option<u8> {
        let scrollable = self.scroll_height - self.viewport_height;
        if !scrollable.is_finite() || scrollable <= 0.0 || !self.scroll_top.is_finite() {
            return None;
        }
        let percent = (self.scroll_top / scrollable * 100.0).round().clamp(0.0, 100.0);
        Some(percent as u8)
    }
}

/// Milestones reached at `percent` that are not yet in `seen`, in ascending order.
#[must_use]
pub fn crossed_milestones(percent: u8, seen: &[u8]) -> Vec<u8> {
    SCROLL_MILESTONES
        .iter()
        .copied()
        .filter(|milestone| percent >= *milestone && !seen.contains(milestone))
        .collect()
}

/// Outcome of reporting a scroll event to the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// No frame is pending; the host should schedule one.
    Schedule,
    /// A frame is already scheduled and will pick up the latest metrics.
    AlreadyPending,
}

/// Coalesces scroll events so at most one computation happens per frame.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    pending: Option<ScrollMetrics>,
    scheduled: bool,
}

impl FrameThrottle {
    /// Record the latest metrics.
    pub const fn submit(&mut self, metrics: ScrollMetrics) -> FrameRequest {
        self.pending = Some(metrics);
        if self.scheduled {
            FrameRequest::AlreadyPending
        } else {
            self.scheduled = true;
            FrameRequest::Schedule
        }
    }

    /// Take the metrics for the frame that just fired.
    pub const fn take(&mut self) -> Option<ScrollMetrics> {
        self.scheduled = false;
        self.pending.take()
    }
}

/// Landing page section inferred from scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Above the fold.
    Hero,
    /// Feature grid.
    Features,
    /// Pricing table.
    Pricing,
    /// Social proof.
    Testimonials,
    /// Closing call to action.
    Cta,
    /// Footer.
    Footer,
}

impl Section {
    /// Classify a scroll percentage using fixed thresholds.
    #[must_use]
    pub const fn from_scroll_percent(percent: u8) -> Self {
        match percent {
            0..15 => Self::Hero,
            15..35 => Self::Features,
            35..55 => Self::Pricing,
            55..75 => Self::Testimonials,
            75..90 => Self::Cta,
            _ => Self::Footer,
        }
    }

    /// Identifier used in event parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Features => "features",
            Self::Pricing => "pricing",
            Self::Testimonials => "testimonials",
            Self::Cta => "cta",
            Self::Footer => "footer",
        }
    }
}
