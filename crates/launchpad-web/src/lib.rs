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
#![allow(clippy::multiple_crate_versions)]
//! Browser front-end for the Launchpad site.
//!
//! The route table and theme context compile on every target so they can be
//! unit tested natively; the browser adapters, DOM listeners and the Yew
//! application shell are wasm32-only.

pub mod routes;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

pub use routes::Route;
pub use theme::{ThemeContext, use_theme, use_theme_styles};
