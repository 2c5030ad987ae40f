//! Records exchanged with the backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DataError;

/// Who is performing a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Visitor without a session.
    Anonymous,
    /// Signed-in user.
    Authenticated {
        /// User identifier.
        user_id: String,
        /// Session access token forwarded to the backend.
        access_token: String,
    },
    /// Trusted server-side caller using the service-role key.
    ServiceRole,
}

impl Caller {
    /// Whether the caller may perform privileged writes.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        matches!(self, Self::Authenticated { .. } | Self::ServiceRole)
    }
}

/// Waitlist signup request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistSignup {
    /// Email address; normalised to lowercase before storage.
    pub email: String,
    /// Where the signup originated (`landing`, `footer`, ...).
    pub source: String,
    /// Optional referral code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// Free-form metadata such as attribution.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl WaitlistSignup {
    /// Signup for `email` from `source` without referral or metadata.
    pub fn new(email: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            source: source.into(),
            referral_code: None,
            metadata: Map::new(),
        }
    }
}

/// Stored waitlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Record identifier.
    pub id: Uuid,
    /// Normalised email.
    pub email: String,
    /// Signup source.
    pub source: String,
    /// Referral code used at signup.
    #[serde(default)]
    pub referral_code: Option<String>,
    /// Position in the queue, starting at 1.
    pub position: u64,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Outcome of a waitlist signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistResponse {
    /// Whether the signup was accepted (also `true` for duplicates).
    pub success: bool,
    /// Stored entry, when the backend returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WaitlistEntry>,
    /// Error message for rejected signups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Queue position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

/// Feedback category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    /// Feature request.
    Feature,
    /// Bug report.
    Bug,
    /// Improvement to something existing.
    Improvement,
    /// Anything else.
    Other,
}

impl FeedbackCategory {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::Improvement => "improvement",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackCategory {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "feature" => Ok(Self::Feature),
            "bug" => Ok(Self::Bug),
            "improvement" => Ok(Self::Improvement),
            "other" => Ok(Self::Other),
            _ => Err(DataError::Validation {
                field: "category",
                reason: "expected feature, bug, improvement or other",
            }),
        }
    }
}

/// Feedback item as listed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    /// Record identifier.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Description.
    pub body: String,
    /// Category.
    pub category: FeedbackCategory,
    /// Upvote count.
    #[serde(default)]
    pub upvotes: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// New feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    /// Short title.
    pub title: String,
    /// Description.
    pub body: String,
    /// Category.
    pub category: FeedbackCategory,
}

/// Blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Record identifier.
    pub id: Uuid,
    /// URL slug, unique.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Short summary for listings.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Markdown body.
    pub content: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the post is publicly visible.
    #[serde(default)]
    pub published: bool,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Whether the post carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }

    /// Whether `term` occurs in the title, excerpt or body (case-insensitive).
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self
                .excerpt
                .as_deref()
                .is_some_and(|excerpt| excerpt.to_lowercase().contains(&needle))
    }
}

/// Blog listing filters and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogQuery {
    /// Full-text search term.
    pub search: Option<String>,
    /// Tag filter.
    pub tag: Option<String>,
    /// Page number starting at 1.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for BlogQuery {
    fn default() -> Self {
        Self {
            search: None,
            tag: None,
            page: 1,
            per_page: 10,
        }
    }
}

impl BlogQuery {
    /// Zero-based row offset of the first post on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// One page of blog posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPage {
    /// Posts on this page.
    pub posts: Vec<BlogPost>,
    /// Total matching posts.
    pub total: u64,
    /// Page number starting at 1.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl BlogPage {
    /// Number of pages needed for `total` posts.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }
}

/// New blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    /// Title.
    pub title: String,
    /// Explicit slug; derived from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Markdown body.
    pub content: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publish immediately.
    #[serde(default)]
    pub published: bool,
}

/// Partial update of a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replacement tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Publication flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl BlogPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.published.is_none()
    }
}

/// Permission granted to an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiScope {
    /// Read-only access.
    Read,
    /// Create and update access.
    Write,
    /// Full access including key management.
    Admin,
}

impl ApiScope {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ApiScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiScope {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(DataError::Validation {
                field: "scopes",
                reason: "expected read, write or admin",
            }),
        }
    }
}

/// API key metadata. The secret itself is never returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Public prefix shown in listings and used for lookup.
    pub prefix: String,
    /// Granted scopes.
    pub scopes: Vec<ApiScope>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry, if any.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the key has been revoked.
    #[serde(default)]
    pub revoked: bool,
    /// Last successful use.
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// Whether the key is usable at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at.is_none_or(|expiry| expiry > now)
    }
}

/// API key creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApiKey {
    /// Human-readable name.
    pub name: String,
    /// Scopes to grant.
    pub scopes: Vec<ApiScope>,
    /// Lifetime in days; no expiry when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_days: Option<u32>,
}

/// Row handed to a store when persisting a new key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewApiKey {
    /// Human-readable name.
    pub name: String,
    /// Public prefix.
    pub prefix: String,
    /// Argon2 hash of the secret part.
    pub key_hash: String,
    /// Granted scopes.
    pub scopes: Vec<ApiScope>,
    /// Expiry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Newly created key with its one-time plaintext value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedApiKey {
    /// Stored metadata.
    pub record: ApiKeyRecord,
    /// Full key; shown once and never retrievable again.
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn categories_and_scopes_parse_case_insensitively() {
        assert_eq!("Bug".parse::<FeedbackCategory>().ok(), Some(FeedbackCategory::Bug));
        assert!("praise".parse::<FeedbackCategory>().is_err());
        assert_eq!(" ADMIN ".parse::<ApiScope>().ok(), Some(ApiScope::Admin));
        assert!("root".parse::<ApiScope>().is_err());
    }

    #[test]
    fn blog_query_offsets_and_page_counts() {
        let query = BlogQuery {
            page: 3,
            per_page: 10,
            ..BlogQuery::default()
        };
        assert_eq!(query.offset(), 20);
        assert_eq!(BlogQuery { page: 0, ..BlogQuery::default() }.offset(), 0);

        let page = BlogPage {
            posts: Vec::new(),
            total: 21,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn api_key_activity_respects_revocation_and_expiry() {
        let now = Utc::now();
        let mut record = ApiKeyRecord {
            id: Uuid::new_v4(),
            name: "ci".into(),
            prefix: "abcd1234".into(),
            scopes: vec![ApiScope::Read],
            created_at: now,
            expires_at: Some(now + Duration::days(1)),
            revoked: false,
            last_used_at: None,
        };
        assert!(record.is_active(now));
        assert!(!record.is_active(now + Duration::days(2)));
        record.revoked = true;
        assert!(!record.is_active(now));
    }

    #[test]
    fn waitlist_response_tolerates_sparse_payloads() -> anyhow::Result<()> {
        let response: WaitlistResponse =
            serde_json::from_str(r#"{"success":true,"position":12}"#)?;
        assert!(response.success);
        assert_eq!(response.position, Some(12));
        assert!(response.data.is_none());
        Ok(())
    }
}
