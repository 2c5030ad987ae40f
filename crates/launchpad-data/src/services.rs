//! Validation and policy in front of the stores.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::{DataError, Result};
use crate::memory::MemoryBackend;
use crate::models::{
    ApiKeyRecord, ApiScope, BlogDraft, BlogPage, BlogPatch, BlogPost, BlogQuery, Caller,
    CreateApiKey, CreatedApiKey, FeedbackItem, NewApiKey, NewFeedback, WaitlistResponse,
    WaitlistSignup,
};
use crate::rate_limit::{RateLimit, RateLimiter};
use crate::rest::RestBackend;
use crate::store::{ApiKeyStore, BlogStore, FeedbackStore, WaitlistStore};
use crate::validate::{
    FEEDBACK_BODY_LEN, FEEDBACK_TITLE_LEN, MAX_KEY_LIFETIME_DAYS, MAX_KEY_NAME_LEN, bounded_text,
    check_slug, normalize_email, slugify,
};

/// Source recorded when a signup does not name one.
pub const DEFAULT_SIGNUP_SOURCE: &str = "website";
/// Feedback items returned when the caller asks for zero.
pub const DEFAULT_FEEDBACK_LIMIT: u32 = 20;
/// Largest feedback page.
pub const MAX_FEEDBACK_LIMIT: u32 = 100;
/// Largest blog page.
pub const MAX_BLOG_PAGE_SIZE: u32 = 50;
/// Prefix of every issued API key.
pub const API_KEY_PREFIX: &str = "lp";

const KEY_PREFIX_LEN: usize = 8;
const KEY_SECRET_LEN: usize = 32;
const MAX_REFERRAL_LEN: usize = 64;

/// Waitlist signups with validation and a shared rate limit.
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
    limiter: Mutex<RateLimiter>,
    mock: bool,
}

impl WaitlistService {
    /// Service over `store` admitting signups at `limit`.
    #[must_use]
    pub fn new(store: Arc<dyn WaitlistStore>, limit: RateLimit) -> Self {
        Self {
            store,
            limiter: Mutex::new(RateLimiter::new(limit, Instant::now())),
            mock: false,
        }
    }

    /// Service answering from an in-memory list with a random head start.
    #[must_use]
    pub fn mock(limit: RateLimit) -> Self {
        Self {
            mock: true,
            ..Self::new(Arc::new(MemoryBackend::mock()), limit)
        }
    }

    /// Whether signups are only simulated.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        self.mock
    }

    /// Validate and submit a signup.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] for malformed input,
    /// [`DataError::RateLimited`] when throttled, or a backend error.
    pub async fn join(&self, signup: WaitlistSignup) -> Result<WaitlistResponse> {
        let email = normalize_email(&signup.email)?;
        let source = match signup.source.trim() {
            "" => DEFAULT_SIGNUP_SOURCE.to_string(),
            source => source.to_string(),
        };
        let referral_code = signup
            .referral_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| {
                let well_formed = code.len() <= MAX_REFERRAL_LEN
                    && code.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
                if well_formed {
                    Ok(code.to_string())
                } else {
                    Err(DataError::Validation {
                        field: "referral_code",
                        reason: "must be letters, digits or hyphens",
                    })
                }
            })
            .transpose()?;

        self.admit(Instant::now())?;

        let normalized = WaitlistSignup {
            email,
            source,
            referral_code,
            metadata: signup.metadata,
        };
        let response = self.store.join(&normalized).await?;
        tracing::info!(
            source = %normalized.source,
            position = ?response.position,
            mock = self.mock,
            "waitlist signup accepted"
        );
        Ok(response)
    }

    fn admit(&self, now: Instant) -> Result<()> {
        let status = self
            .limiter
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .check(now);
        if status.allowed {
            Ok(())
        } else {
            tracing::warn!(retry_after = ?status.retry_after, "waitlist signup throttled");
            Err(DataError::RateLimited {
                retry_after: status.retry_after,
            })
        }
    }
}

/// Feedback board.
pub struct FeedbackService {
    store: Arc<dyn FeedbackStore>,
}

impl FeedbackService {
    /// Service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Most upvoted items. `limit` is clamped to `1..=100`; zero means the default.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub async fn list(&self, limit: u32) -> Result<Vec<FeedbackItem>> {
        let limit = match limit {
            0 => DEFAULT_FEEDBACK_LIMIT,
            limit => limit.min(MAX_FEEDBACK_LIMIT),
        };
        self.store.list(limit).await
    }

    /// Submit new feedback.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] for out-of-range title or body.
    pub async fn create(&self, feedback: NewFeedback) -> Result<FeedbackItem> {
        let feedback = NewFeedback {
            title: bounded_text("title", &feedback.title, FEEDBACK_TITLE_LEN)?,
            body: bounded_text("body", &feedback.body, FEEDBACK_BODY_LEN)?,
            category: feedback.category,
        };
        self.store.create(&feedback).await
    }

    /// Upvote an item once per voter.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::AlreadyVoted`] on a repeat vote.
    pub async fn vote(&self, id: Uuid, voter: &str) -> Result<FeedbackItem> {
        let voter = voter.trim();
        if voter.is_empty() {
            return Err(DataError::Validation {
                field: "voter",
                reason: "is required",
            });
        }
        self.store.vote(id, voter).await
    }
}

/// Blog reads for everyone, writes for privileged callers.
pub struct BlogService {
    store: Arc<dyn BlogStore>,
}

impl BlogService {
    /// Service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Published posts matching `query`, with pagination clamped.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub async fn list(&self, query: BlogQuery) -> Result<BlogPage> {
        let clean = |value: Option<String>| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let query = BlogQuery {
            search: clean(query.search),
            tag: clean(query.tag).map(|tag| tag.to_lowercase()),
            page: query.page.max(1),
            per_page: query.per_page.clamp(1, MAX_BLOG_PAGE_SIZE),
        };
        self.store.list(&query).await
    }

    /// Published post by slug or id.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] for an empty key.
    pub async fn get(&self, slug_or_id: &str) -> Result<Option<BlogPost>> {
        let key = slug_or_id.trim();
        if key.is_empty() {
            return Err(DataError::Validation {
                field: "slug",
                reason: "is required",
            });
        }
        self.store.get(key).await
    }

    /// Create a post, deriving the slug from the title when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers and
    /// [`DataError::Validation`] for malformed drafts.
    pub async fn create(&self, caller: &Caller, draft: BlogDraft) -> Result<BlogPost> {
        require_privileged(caller, "blog.create")?;
        let title = bounded_text("title", &draft.title, (1, 200))?;
        if draft.content.trim().is_empty() {
            return Err(DataError::Validation {
                field: "content",
                reason: "is required",
            });
        }
        let slug = match draft.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => {
                check_slug(slug)?;
                slug.to_string()
            }
            _ => slugify(&title),
        };
        if slug.is_empty() {
            return Err(DataError::Validation {
                field: "slug",
                reason: "could not be derived from the title",
            });
        }
        let draft = BlogDraft {
            title,
            slug: Some(slug),
            excerpt: draft
                .excerpt
                .map(|excerpt| excerpt.trim().to_string())
                .filter(|excerpt| !excerpt.is_empty()),
            content: draft.content,
            tags: normalize_tags(draft.tags),
            published: draft.published,
        };
        self.store.create(caller, &draft).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers and
    /// [`DataError::Validation`] for an empty patch.
    pub async fn update(&self, caller: &Caller, id: Uuid, patch: BlogPatch) -> Result<BlogPost> {
        require_privileged(caller, "blog.update")?;
        if patch.is_empty() {
            return Err(DataError::Validation {
                field: "patch",
                reason: "contains no changes",
            });
        }
        let patch = BlogPatch {
            title: patch
                .title
                .map(|title| bounded_text("title", &title, (1, 200)))
                .transpose()?,
            tags: patch.tags.map(normalize_tags),
            ..patch
        };
        self.store.update(caller, id, &patch).await
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()> {
        require_privileged(caller, "blog.delete")?;
        self.store.delete(caller, id).await
    }
}

/// API key management.
pub struct ApiKeyService {
    store: Arc<dyn ApiKeyStore>,
}

impl ApiKeyService {
    /// Service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }

    /// Keys visible to `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<ApiKeyRecord>> {
        require_privileged(caller, "api_keys.list")?;
        self.store.list(caller).await
    }

    /// Issue a key. The plaintext is only returned here.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers and
    /// [`DataError::Validation`] for a bad name, scope set or lifetime.
    pub async fn create(&self, caller: &Caller, request: CreateApiKey) -> Result<CreatedApiKey> {
        require_privileged(caller, "api_keys.create")?;
        let name = bounded_text("name", &request.name, (1, MAX_KEY_NAME_LEN))?;
        let scopes = normalize_scopes(request.scopes)?;
        let expires_at = match request.expires_in_days {
            None => None,
            Some(days) if (1..=MAX_KEY_LIFETIME_DAYS).contains(&days) => {
                Some(Utc::now() + ChronoDuration::days(i64::from(days)))
            }
            Some(_) => {
                return Err(DataError::Validation {
                    field: "expires_in_days",
                    reason: "must be between 1 and 365",
                });
            }
        };

        let prefix = generate_token(KEY_PREFIX_LEN).to_lowercase();
        let secret = generate_token(KEY_SECRET_LEN);
        let key_hash = hash_secret(&secret)?;
        let record = self
            .store
            .create(
                caller,
                &NewApiKey {
                    name,
                    prefix: prefix.clone(),
                    key_hash,
                    scopes,
                    expires_at,
                },
            )
            .await?;
        tracing::info!(key_id = %record.id, prefix = %record.prefix, "api key issued");
        Ok(CreatedApiKey {
            record,
            key: format!("{API_KEY_PREFIX}_{prefix}_{secret}"),
        })
    }

    /// Revoke a key.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Forbidden`] for anonymous callers.
    pub async fn revoke(&self, caller: &Caller, id: Uuid) -> Result<()> {
        require_privileged(caller, "api_keys.revoke")?;
        self.store.revoke(caller, id).await
    }

    /// Resolve a presented key to its record when it is valid and active.
    ///
    /// # Errors
    ///
    /// Propagates backend and hashing failures; malformed keys yield `None`.
    pub async fn verify(&self, presented: &str) -> Result<Option<ApiKeyRecord>> {
        let Some((prefix, secret)) = split_key(presented.trim()) else {
            return Ok(None);
        };
        let Some((record, key_hash)) = self.store.find_by_prefix(prefix).await? else {
            return Ok(None);
        };
        if !record.is_active(Utc::now()) || !verify_secret(&key_hash, secret)? {
            return Ok(None);
        }
        Ok(Some(record))
    }
}

/// Every data service, wired for the configured backend.
///
/// Without a backend the waitlist runs in mock mode and the other services
/// are absent, so the UI renders nothing for them.
pub struct DataServices {
    /// Waitlist signups.
    pub waitlist: WaitlistService,
    /// Feedback board.
    pub feedback: Option<FeedbackService>,
    /// Blog.
    pub blog: Option<BlogService>,
    /// API key management.
    pub api_keys: Option<ApiKeyService>,
}

impl DataServices {
    /// Build services from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured backend cannot be initialised.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        match (&config.url, &config.anon_key) {
            (Some(url), Some(anon_key)) => {
                let backend = RestBackend::new(url, anon_key.clone(), config.service_key.clone())?;
                tracing::info!(backend = %url, "data services using hosted backend");
                Ok(Self::with_backend(Arc::new(backend)))
            }
            _ => {
                tracing::warn!(
                    "backend not configured; waitlist is simulated and other data services are disabled"
                );
                Ok(Self {
                    waitlist: WaitlistService::mock(RateLimit::default()),
                    feedback: None,
                    blog: None,
                    api_keys: None,
                })
            }
        }
    }

    /// Every service over one backend.
    #[must_use]
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: WaitlistStore + FeedbackStore + BlogStore + ApiKeyStore + 'static,
    {
        Self {
            waitlist: WaitlistService::new(backend.clone(), RateLimit::default()),
            feedback: Some(FeedbackService::new(backend.clone())),
            blog: Some(BlogService::new(backend.clone())),
            api_keys: Some(ApiKeyService::new(backend)),
        }
    }
}

fn require_privileged(caller: &Caller, operation: &'static str) -> Result<()> {
    if caller.is_privileged() {
        Ok(())
    } else {
        tracing::debug!(operation, "rejected anonymous write");
        Err(DataError::Forbidden { operation })
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

fn normalize_scopes(scopes: Vec<ApiScope>) -> Result<Vec<ApiScope>> {
    let mut normalized: Vec<ApiScope> = Vec::with_capacity(scopes.len());
    for scope in scopes {
        if !normalized.contains(&scope) {
            normalized.push(scope);
        }
    }
    if normalized.is_empty() {
        return Err(DataError::Validation {
            field: "scopes",
            reason: "at least one scope is required",
        });
    }
    Ok(normalized)
}

fn split_key(presented: &str) -> Option<(&str, &str)> {
    let rest = presented.strip_prefix(API_KEY_PREFIX)?.strip_prefix('_')?;
    let (prefix, secret) = rest.split_once('_')?;
    (prefix.len() == KEY_PREFIX_LEN && secret.len() == KEY_SECRET_LEN).then_some((prefix, secret))
}

fn generate_token(length: usize) -> String {
    let mut rng = rand::rng();
    std::iter::repeat_with(|| char::from(rng.sample(Alphanumeric)))
        .take(length)
        .collect()
}

fn hash_secret(input: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(input.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| DataError::Hashing {
            detail: err.to_string(),
        })
}

fn verify_secret(expected_hash: &str, candidate: &str) -> Result<bool> {
    let parsed = PasswordHash::new(expected_hash).map_err(|err| DataError::Hashing {
        detail: err.to_string(),
    })?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(DataError::Hashing {
            detail: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_split_into_prefix_and_secret() {
        let secret = "a".repeat(KEY_SECRET_LEN);
        let key = format!("lp_abcd1234_{secret}");
        assert_eq!(split_key(&key), Some(("abcd1234", secret.as_str())));
        assert_eq!(split_key("lp_short_secret"), None);
        assert_eq!(split_key("xx_abcd1234_secret"), None);
    }

    #[test]
    fn secrets_round_trip_through_argon2() -> anyhow::Result<()> {
        let hash = hash_secret("correct horse")?;
        assert!(verify_secret(&hash, "correct horse")?);
        assert!(!verify_secret(&hash, "battery staple")?);
        Ok(())
    }

    #[test]
    fn tags_and_scopes_are_deduplicated() -> anyhow::Result<()> {
        assert_eq!(
            normalize_tags(vec![" Rust ".into(), "rust".into(), String::new(), "Yew".into()]),
            ["rust", "yew"]
        );
        assert_eq!(
            normalize_scopes(vec![ApiScope::Read, ApiScope::Read, ApiScope::Write])?,
            [ApiScope::Read, ApiScope::Write]
        );
        assert!(normalize_scopes(Vec::new()).is_err());
        Ok(())
    }
}
