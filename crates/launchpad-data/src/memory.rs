//! In-process backend used when no hosted backend is configured, and in tests.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::error::{DataError, Result};
use crate::models::{
    ApiKeyRecord, BlogDraft, BlogPage, BlogPatch, BlogPost, BlogQuery, Caller, FeedbackItem,
    NewApiKey, NewFeedback, WaitlistEntry, WaitlistResponse, WaitlistSignup,
};
use crate::store::{ApiKeyStore, BlogStore, FeedbackStore, WaitlistStore};

#[derive(Debug, Default)]
struct MemoryState {
    waitlist: Vec<WaitlistEntry>,
    feedback: Vec<FeedbackItem>,
    votes: HashSet<(Uuid, String)>,
    posts: Vec<BlogPost>,
    keys: Vec<(ApiKeyRecord, String)>,
}

/// Backend holding every record in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    base_position: u64,
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Empty backend whose first waitlist position is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty backend whose waitlist positions start after `base_position`.
    #[must_use]
    pub fn with_base_position(base_position: u64) -> Self {
        Self {
            base_position,
            state: Mutex::default(),
        }
    }

    /// Mock waitlist with a random head start so demo positions look plausible.
    #[must_use]
    pub fn mock() -> Self {
        Self::with_base_position(rand::rng().random_range(100..=500))
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl WaitlistStore for MemoryBackend {
    async fn join(&self, signup: &WaitlistSignup) -> Result<WaitlistResponse> {
        let mut state = self.lock();
        if let Some(existing) = state
            .waitlist
            .iter()
            .find(|entry| entry.email == signup.email)
        {
            return Ok(WaitlistResponse {
                success: true,
                position: Some(existing.position),
                data: Some(existing.clone()),
                error: None,
            });
        }
        let position = self.base_position + state.waitlist.len() as u64 + 1;
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            email: signup.email.clone(),
            source: signup.source.clone(),
            referral_code: signup.referral_code.clone(),
            position,
            created_at: Utc::now(),
        };
        state.waitlist.push(entry.clone());
        Ok(WaitlistResponse {
            success: true,
            position: Some(position),
            data: Some(entry),
            error: None,
        })
    }
}

#[async_trait]
impl FeedbackStore for MemoryBackend {
    async fn list(&self, limit: u32) -> Result<Vec<FeedbackItem>> {
        let mut items = self.lock().feedback.clone();
        items.sort_by(|a, b| {
            b.upvotes
                .cmp(&a.upvotes)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(items)
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackItem> {
        let item = FeedbackItem {
            id: Uuid::new_v4(),
            title: feedback.title.clone(),
            body: feedback.body.clone(),
            category: feedback.category,
            upvotes: 0,
            created_at: Utc::now(),
        };
        self.lock().feedback.push(item.clone());
        Ok(item)
    }

    async fn vote(&self, id: Uuid, voter: &str) -> Result<FeedbackItem> {
        let mut state = self.lock();
        let MemoryState { feedback, votes, .. } = &mut *state;
        let item = feedback
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| DataError::NotFound {
                resource: "feedback",
                id: id.to_string(),
            })?;
        if !votes.insert((id, voter.to_string())) {
            return Err(DataError::AlreadyVoted { id: id.to_string() });
        }
        item.upvotes = item.upvotes.saturating_add(1);
        Ok(item.clone())
    }
}

#[async_trait]
impl BlogStore for MemoryBackend {
    async fn list(&self, query: &BlogQuery) -> Result<BlogPage> {
        let mut matching: Vec<BlogPost> = self
            .lock()
            .posts
            .iter()
            .filter(|post| post.published)
            .filter(|post| query.tag.as_deref().is_none_or(|tag| post.has_tag(tag)))
            .filter(|post| query.search.as_deref().is_none_or(|term| post.matches(term)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        let total = matching.len() as u64;
        let posts = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.per_page).unwrap_or(usize::MAX))
            .collect();
        Ok(BlogPage {
            posts,
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn get(&self, slug_or_id: &str) -> Result<Option<BlogPost>> {
        let id = Uuid::parse_str(slug_or_id).ok();
        Ok(self
            .lock()
            .posts
            .iter()
            .find(|post| post.published && (Some(post.id) == id || post.slug == slug_or_id))
            .cloned())
    }

    async fn create(&self, _caller: &Caller, draft: &BlogDraft) -> Result<BlogPost> {
        let slug = draft.slug.clone().unwrap_or_default();
        let mut state = self.lock();
        if state.posts.iter().any(|post| post.slug == slug) {
            return Err(DataError::Validation {
                field: "slug",
                reason: "is already taken",
            });
        }
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            slug,
            title: draft.title.clone(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            tags: draft.tags.clone(),
            published: draft.published,
            published_at: draft.published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, _caller: &Caller, id: Uuid, patch: &BlogPatch) -> Result<BlogPost> {
        let mut state = self.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| DataError::NotFound {
                resource: "blog post",
                id: id.to_string(),
            })?;
        let now = Utc::now();
        if let Some(title) = &patch.title {
            post.title.clone_from(title);
        }
        if let Some(excerpt) = &patch.excerpt {
            post.excerpt = Some(excerpt.clone());
        }
        if let Some(content) = &patch.content {
            post.content.clone_from(content);
        }
        if let Some(tags) = &patch.tags {
            post.tags.clone_from(tags);
        }
        if let Some(published) = patch.published {
            if published && !post.published {
                post.published_at = Some(now);
            }
            post.published = published;
        }
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn delete(&self, _caller: &Caller, id: Uuid) -> Result<()> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        if state.posts.len() == before {
            return Err(DataError::NotFound {
                resource: "blog post",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ApiKeyStore for MemoryBackend {
    async fn list(&self, _caller: &Caller) -> Result<Vec<ApiKeyRecord>> {
        let mut records: Vec<ApiKeyRecord> =
            self.lock().keys.iter().map(|(record, _)| record.clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn create(&self, _caller: &Caller, key: &NewApiKey) -> Result<ApiKeyRecord> {
        let record = ApiKeyRecord {
            id: Uuid::new_v4(),
            name: key.name.clone(),
            prefix: key.prefix.clone(),
            scopes: key.scopes.clone(),
            created_at: Utc::now(),
            expires_at: key.expires_at,
            revoked: false,
            last_used_at: None,
        };
        self.lock().keys.push((record.clone(), key.key_hash.clone()));
        Ok(record)
    }

    async fn revoke(&self, _caller: &Caller, id: Uuid) -> Result<()> {
        let mut state = self.lock();
        let (record, _) = state
            .keys
            .iter_mut()
            .find(|(record, _)| record.id == id)
            .ok_or_else(|| DataError::NotFound {
                resource: "api key",
                id: id.to_string(),
            })?;
        record.revoked = true;
        Ok(())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<(ApiKeyRecord, String)>> {
        Ok(self
            .lock()
            .keys
            .iter()
            .find(|(record, _)| record.prefix == prefix)
            .cloned())
    }
}
