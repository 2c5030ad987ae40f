//! Browser time source.

use launchpad_analytics::Clock;

/// [`Clock`] reading `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }
}
