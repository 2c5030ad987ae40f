//! Backend speaking the hosted database's REST dialect.
//!
//! Tables live under `rest/v1/<table>`, stored procedures under
//! `rest/v1/rpc/<name>`. Every request carries the anon key in `apikey`;
//! `Authorization` carries the caller's token, the service-role key, or the
//! anon key for anonymous callers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::HeaderValue;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

use crate::error::{DataError, Result};
use crate::models::{
    ApiKeyRecord, BlogDraft, BlogPage, BlogPatch, BlogPost, BlogQuery, Caller, FeedbackItem,
    NewApiKey, NewFeedback, WaitlistResponse, WaitlistSignup,
};
use crate::store::{ApiKeyStore, BlogStore, FeedbackStore, WaitlistStore};

const HEADER_API_KEY: &str = "apikey";
const HEADER_PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";
const API_KEY_COLUMNS: &str = "id,name,prefix,scopes,created_at,expires_at,revoked,last_used_at";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct StoredKey {
    #[serde(flatten)]
    record: ApiKeyRecord,
    key_hash: String,
}

/// REST implementation of every store trait.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    rest_root: Url,
    anon_key: String,
    service_key: Option<String>,
}

impl RestBackend {
    /// Backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Validation`] when the URL cannot serve as a base,
    /// or [`DataError::Request`] when the HTTP client cannot be built.
    pub fn new(base_url: &Url, anon_key: String, service_key: Option<String>) -> Result<Self> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let rest_root = base.join("rest/v1/").map_err(|_| DataError::Validation {
            field: "backend url",
            reason: "cannot be used as a base url",
        })?;
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|source| DataError::Request {
                operation: "client.build",
                source,
            })?;
        Ok(Self {
            client,
            rest_root,
            anon_key,
            service_key,
        })
    }

    fn bearer<'a>(&'a self, caller: &'a Caller) -> &'a str {
        match caller {
            Caller::Anonymous => &self.anon_key,
            Caller::Authenticated { access_token, .. } => access_token,
            Caller::ServiceRole => self.service_key.as_deref().unwrap_or(&self.anon_key),
        }
    }

    fn request(&self, method: Method, path: &str, caller: &Caller) -> Result<RequestBuilder> {
        let url = self.rest_root.join(path).map_err(|_| DataError::Validation {
            field: "backend path",
            reason: "is not a valid url path",
        })?;
        Ok(self
            .client
            .request(method, url)
            .header(HEADER_API_KEY, &self.anon_key)
            .bearer_auth(self.bearer(caller)))
    }

    async fn send(operation: &'static str, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| DataError::Request { operation, source })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(operation, status = status.as_u16(), "backend rejected request");
        Err(DataError::Status {
            operation,
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T> {
        Self::send(operation, builder)
            .await?
            .json::<T>()
            .await
            .map_err(|source| DataError::Request { operation, source })
    }

    async fn fetch_one<T: DeserializeOwned>(
        operation: &'static str,
        resource: &'static str,
        id: String,
        builder: RequestBuilder,
    ) -> Result<T> {
        let rows: Vec<T> = Self::fetch(operation, builder).await?;
        rows.into_iter()
            .next()
            .ok_or(DataError::NotFound { resource, id })
    }
}

fn search_filter(term: &str) -> String {
    let cleaned: String = term
        .chars()
        .filter(|ch| !matches!(ch, ',' | '(' | ')' | '*' | '"'))
        .collect();
    format!("(title.ilike.*{cleaned}*,excerpt.ilike.*{cleaned}*,content.ilike.*{cleaned}*)")
}

fn total_from_content_range(header: Option<&HeaderValue>) -> Option<u64> {
    header?.to_str().ok()?.rsplit_once('/')?.1.parse().ok()
}

#[async_trait]
impl WaitlistStore for RestBackend {
    async fn join(&self, signup: &WaitlistSignup) -> Result<WaitlistResponse> {
        let builder = self
            .request(Method::POST, "rpc/join_waitlist", &Caller::Anonymous)?
            .json(signup);
        Self::fetch("waitlist.join", builder).await
    }
}

#[async_trait]
impl FeedbackStore for RestBackend {
    async fn list(&self, limit: u32) -> Result<Vec<FeedbackItem>> {
        let limit = limit.to_string();
        let builder = self
            .request(Method::GET, "feedback", &Caller::Anonymous)?
            .query(&[
                ("select", "*"),
                ("order", "upvotes.desc,created_at.desc"),
                ("limit", limit.as_str()),
            ]);
        Self::fetch("feedback.list", builder).await
    }

    async fn create(&self, feedback: &NewFeedback) -> Result<FeedbackItem> {
        let builder = self
            .request(Method::POST, "feedback", &Caller::Anonymous)?
            .header(HEADER_PREFER, RETURN_REPRESENTATION)
            .json(feedback);
        Self::fetch_one("feedback.create", "feedback", String::new(), builder).await
    }

    async fn vote(&self, id: Uuid, voter: &str) -> Result<FeedbackItem> {
        let builder = self
            .request(Method::POST, "rpc/vote_feedback", &Caller::Anonymous)?
            .json(&json!({ "feedback_id": id, "voter_id": voter }));
        match Self::fetch("feedback.vote", builder).await {
            Err(DataError::Status { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                Err(DataError::AlreadyVoted { id: id.to_string() })
            }
            Err(DataError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(DataError::NotFound {
                    resource: "feedback",
                    id: id.to_string(),
                })
            }
            other => other,
        }
    }
}

#[async_trait]
impl BlogStore for RestBackend {
    async fn list(&self, query: &BlogQuery) -> Result<BlogPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("published", "eq.true".to_string()),
            ("order", "published_at.desc".to_string()),
            ("offset", query.offset().to_string()),
            ("limit", query.per_page.to_string()),
        ];
        if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
            params.push(("or", search_filter(term.trim())));
        }
        if let Some(tag) = query.tag.as_deref() {
            params.push(("tags", format!("cs.{{{tag}}}")));
        }
        let builder = self
            .request(Method::GET, "blog_posts", &Caller::Anonymous)?
            .header(HEADER_PREFER, COUNT_EXACT)
            .query(&params);
        let response = Self::send("blog.list", builder).await?;
        let total = total_from_content_range(response.headers().get(reqwest::header::CONTENT_RANGE));
        let posts: Vec<BlogPost> = response
            .json()
            .await
            .map_err(|source| DataError::Request {
                operation: "blog.list",
                source,
            })?;
        Ok(BlogPage {
            total: total.unwrap_or(posts.len() as u64),
            posts,
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn get(&self, slug_or_id: &str) -> Result<Option<BlogPost>> {
        let filter = match Uuid::parse_str(slug_or_id) {
            Ok(id) => ("id", format!("eq.{id}")),
            Err(_) => ("slug", format!("eq.{slug_or_id}")),
        };
        let builder = self
            .request(Method::GET, "blog_posts", &Caller::Anonymous)?
            .query(&[
                ("select", "*".to_string()),
                ("published", "eq.true".to_string()),
                ("limit", "1".to_string()),
            ])
            .query(&[filter]);
        let rows: Vec<BlogPost> = Self::fetch("blog.get", builder).await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, caller: &Caller, draft: &BlogDraft) -> Result<BlogPost> {
        let now = Utc::now();
        let row = json!({
            "title": draft.title,
            "slug": draft.slug,
            "excerpt": draft.excerpt,
            "content": draft.content,
            "tags": draft.tags,
            "published": draft.published,
            "published_at": draft.published.then_some(now),
        });
        let builder = self
            .request(Method::POST, "blog_posts", caller)?
            .header(HEADER_PREFER, RETURN_REPRESENTATION)
            .json(&row);
        Self::fetch_one("blog.create", "blog post", String::new(), builder).await
    }

    async fn update(&self, caller: &Caller, id: Uuid, patch: &BlogPatch) -> Result<BlogPost> {
        let mut row = serde_json::to_value(patch).unwrap_or_else(|_| json!({}));
        if let Value::Object(fields) = &mut row {
            fields.insert("updated_at".to_string(), json!(Utc::now()));
            if patch.published == Some(true) {
                fields.insert("published_at".to_string(), json!(Utc::now()));
            }
        }
        let builder = self
            .request(Method::PATCH, "blog_posts", caller)?
            .query(&[("id", format!("eq.{id}"))])
            .header(HEADER_PREFER, RETURN_REPRESENTATION)
            .json(&row);
        Self::fetch_one("blog.update", "blog post", id.to_string(), builder).await
    }

    async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()> {
        let builder = self
            .request(Method::DELETE, "blog_posts", caller)?
            .query(&[("id", format!("eq.{id}"))])
            .header(HEADER_PREFER, RETURN_REPRESENTATION);
        Self::fetch_one::<Value>("blog.delete", "blog post", id.to_string(), builder)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ApiKeyStore for RestBackend {
    async fn list(&self, caller: &Caller) -> Result<Vec<ApiKeyRecord>> {
        let builder = self
            .request(Method::GET, "api_keys", caller)?
            .query(&[("select", API_KEY_COLUMNS), ("order", "created_at.desc")]);
        Self::fetch("api_keys.list", builder).await
    }

    async fn create(&self, caller: &Caller, key: &NewApiKey) -> Result<ApiKeyRecord> {
        let builder = self
            .request(Method::POST, "api_keys", caller)?
            .query(&[("select", API_KEY_COLUMNS)])
            .header(HEADER_PREFER, RETURN_REPRESENTATION)
            .json(key);
        Self::fetch_one("api_keys.create", "api key", String::new(), builder).await
    }

    async fn revoke(&self, caller: &Caller, id: Uuid) -> Result<()> {
        let builder = self
            .request(Method::PATCH, "api_keys", caller)?
            .query(&[("id", format!("eq.{id}")), ("select", API_KEY_COLUMNS.to_string())])
            .header(HEADER_PREFER, RETURN_REPRESENTATION)
            .json(&json!({ "revoked": true }));
        Self::fetch_one::<ApiKeyRecord>("api_keys.revoke", "api key", id.to_string(), builder)
            .await
            .map(|_| ())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<(ApiKeyRecord, String)>> {
        let builder = self
            .request(Method::GET, "api_keys", &Caller::ServiceRole)?
            .query(&[
                ("select", format!("{API_KEY_COLUMNS},key_hash")),
                ("prefix", format!("eq.{prefix}")),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<StoredKey> = Self::fetch("api_keys.find", builder).await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|stored| (stored.record, stored.key_hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_total_is_parsed() {
        let header = HeaderValue::from_static("0-9/42");
        assert_eq!(total_from_content_range(Some(&header)), Some(42));
        let unknown = HeaderValue::from_static("0-9/*");
        assert_eq!(total_from_content_range(Some(&unknown)), None);
        assert_eq!(total_from_content_range(None), None);
    }

    #[test]
    fn search_filter_strips_reserved_characters() {
        assert_eq!(
            search_filter("rust, (yew)"),
            "(title.ilike.*rust yew*,excerpt.ilike.*rust yew*,content.ilike.*rust yew*)"
        );
    }

    #[test]
    fn rest_root_keeps_base_path() -> anyhow::Result<()> {
        let base: Url = "https://db.launchpad.dev/project".parse()?;
        let backend = RestBackend::new(&base, "anon".into(), None)?;
        assert_eq!(
            backend.rest_root.as_str(),
            "https://db.launchpad.dev/project/rest/v1/"
        );
        assert_eq!(backend.bearer(&Caller::ServiceRole), "anon");
        Ok(())
    }
}
