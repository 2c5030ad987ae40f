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
//! Data access for the Launchpad site: waitlist, feedback, blog and API keys.
//!
//! Layout: `models.rs` (records), `store.rs` (per-domain store traits),
//! `rest.rs` and `memory.rs` (backends), `services.rs` (validation, rate
//! limiting and access policy), `config.rs` (environment settings).

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod rate_limit;
pub mod rest;
pub mod services;
pub mod store;
pub mod validate;

pub use config::BackendConfig;
pub use error::{DataError, Result};
pub use memory::MemoryBackend;
pub use models::{
    ApiKeyRecord, ApiScope, BlogDraft, BlogPage, BlogPatch, BlogPost, BlogQuery, Caller,
    CreateApiKey, CreatedApiKey, FeedbackCategory, FeedbackItem, NewApiKey, NewFeedback,
    WaitlistEntry, WaitlistResponse, WaitlistSignup,
};
pub use rate_limit::{RateLimit, RateLimitStatus, RateLimiter};
pub use rest::RestBackend;
pub use services::{ApiKeyService, BlogService, DataServices, FeedbackService, WaitlistService};
pub use store::{ApiKeyStore, BlogStore, FeedbackStore, WaitlistStore};
