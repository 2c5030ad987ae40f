//! Storage traits implemented by the REST and in-memory backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ApiKeyRecord, BlogDraft, BlogPage, BlogPatch, BlogPost, BlogQuery, Caller, FeedbackItem,
    NewApiKey, NewFeedback, WaitlistResponse, WaitlistSignup,
};

/// Waitlist persistence.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Add `signup` to the list. A duplicate email must return the existing
    /// entry's position with `success = true`.
    async fn join(&self, signup: &WaitlistSignup) -> Result<WaitlistResponse>;
}

/// Feedback board persistence.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Most upvoted items first, at most `limit`.
    async fn list(&self, limit: u32) -> Result<Vec<FeedbackItem>>;

    /// Store a new item.
    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackItem>;

    /// Record `voter`'s upvote. Repeat votes fail with
    /// [`DataError::AlreadyVoted`](crate::DataError::AlreadyVoted).
    async fn vote(&self, id: Uuid, voter: &str) -> Result<FeedbackItem>;
}

/// Blog persistence. Listing and lookup only see published posts.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Filtered, paginated published posts, newest first.
    async fn list(&self, query: &BlogQuery) -> Result<BlogPage>;

    /// Published post by slug or id.
    async fn get(&self, slug_or_id: &str) -> Result<Option<BlogPost>>;

    /// Insert a post. `draft.slug` is always set by the caller.
    async fn create(&self, caller: &Caller, draft: &BlogDraft) -> Result<BlogPost>;

    /// Apply a partial update.
    async fn update(&self, caller: &Caller, id: Uuid, patch: &BlogPatch) -> Result<BlogPost>;

    /// Delete a post.
    async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()>;
}

/// API key persistence.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Keys visible to `caller`, newest first.
    async fn list(&self, caller: &Caller) -> Result<Vec<ApiKeyRecord>>;

    /// Persist a new key.
    async fn create(&self, caller: &Caller, key: &NewApiKey) -> Result<ApiKeyRecord>;

    /// Mark a key revoked.
    async fn revoke(&self, caller: &Caller, id: Uuid) -> Result<()>;

    /// Record and stored hash for a key prefix.
    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<(ApiKeyRecord, String)>>;
}
