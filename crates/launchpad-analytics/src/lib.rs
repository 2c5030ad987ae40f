#![forbid(unsafe_code)]
#![deny(
    warnings,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Client analytics pipeline for the Launchpad site.
//!
//! [`Analytics`] is constructed explicitly with a [`Clock`], a
//! [`SessionStore`] and two [`EventSink`]s. Hosts call [`Analytics::init`]
//! once per page load and forward DOM events to the `on_*` methods; the
//! service enriches every event with page, attribution and session timing
//! before handing it to both sinks. Delivery is best-effort and failures
//! never reach the caller.

pub mod attribution;
pub mod clock;
pub mod event;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod payload;
pub mod scroll;
pub mod service;
pub mod sink;
pub mod storage;
pub mod timing;

pub use attribution::UtmParams;
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{AnalyticsEvent, EnrichedEvent, ErrorReport, PageInfo};
#[cfg(not(target_arch = "wasm32"))]
pub use http::{DEFAULT_SINK_TIMEOUT, HttpSink, SinkConfig};
pub use payload::PayloadStyle;
pub use scroll::{FrameRequest, SCROLL_MILESTONES, ScrollMetrics, Section};
pub use service::{Analytics, AnalyticsDeps, Visibility};
pub use sink::{EventSink, FailingSink, NoopSink, RecordingSink, SinkError};
pub use storage::{
    MemorySessionStore, SessionStore, StorageError, UTM_STORAGE_KEY, UnavailableSessionStore,
};
pub use timing::{NavigationTiming, PageLoadMetrics, PageTimingEntries, PaintTiming};
