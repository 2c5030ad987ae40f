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
//! Structured logging setup shared by Launchpad binaries.
//!
//! Layout: `init.rs` (subscriber installation and format selection),
//! `error.rs` (typed failures).

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
