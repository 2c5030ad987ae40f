use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use launchpad_data::{
    ApiScope, BackendConfig, BlogDraft, BlogQuery, Caller, CreateApiKey, DataError, DataServices,
    FeedbackCategory, MemoryBackend, NewFeedback, RateLimit, WaitlistService, WaitlistSignup,
};

fn services() -> DataServices {
    DataServices::with_backend(Arc::new(MemoryBackend::new()))
}

fn admin() -> Caller {
    Caller::Authenticated {
        user_id: "admin".into(),
        access_token: "token".into(),
    }
}

#[tokio::test]
async fn duplicate_waitlist_email_keeps_original_position() -> Result<()> {
    let services = services();
    let first = services
        .waitlist
        .join(WaitlistSignup::new("ada@launchpad.dev", "hero"))
        .await?;
    services
        .waitlist
        .join(WaitlistSignup::new("grace@launchpad.dev", "hero"))
        .await?;
    let again = services
        .waitlist
        .join(WaitlistSignup::new("  ADA@launchpad.dev ", "footer"))
        .await?;

    assert!(again.success);
    assert_eq!(again.position, first.position);
    assert_eq!(first.position, Some(1));
    Ok(())
}

#[tokio::test]
async fn invalid_email_is_rejected_before_the_store() {
    let services = services();
    let err = services
        .waitlist
        .join(WaitlistSignup::new("not-an-email", "hero"))
        .await;
    assert!(matches!(
        err,
        Err(DataError::Validation { field: "email", .. })
    ));
}

#[tokio::test]
async fn waitlist_signups_are_rate_limited() -> Result<()> {
    let waitlist = WaitlistService::new(
        Arc::new(MemoryBackend::new()),
        RateLimit {
            burst: 2,
            replenish_period: Duration::from_secs(3_600),
        },
    );
    waitlist.join(WaitlistSignup::new("a@launchpad.dev", "hero")).await?;
    waitlist.join(WaitlistSignup::new("b@launchpad.dev", "hero")).await?;
    let throttled = waitlist.join(WaitlistSignup::new("c@launchpad.dev", "hero")).await;
    assert!(matches!(throttled, Err(DataError::RateLimited { .. })));
    Ok(())
}

#[tokio::test]
async fn repeat_votes_are_rejected_without_double_counting() -> Result<()> {
    let services = services();
    let Some(feedback) = services.feedback.as_ref() else {
        anyhow::bail!("feedback service should be enabled");
    };
    let item = feedback
        .create(NewFeedback {
            title: "Team workspaces".into(),
            body: "Let several people share one account.".into(),
            category: FeedbackCategory::Feature,
        })
        .await?;

    let voted = feedback.vote(item.id, "user-1").await?;
    assert_eq!(voted.upvotes, 1);
    let repeat = feedback.vote(item.id, "user-1").await;
    assert!(matches!(repeat, Err(DataError::AlreadyVoted { .. })));
    let other = feedback.vote(item.id, "user-2").await?;
    assert_eq!(other.upvotes, 2);

    let listed = feedback.list(10).await?;
    assert_eq!(listed[0].upvotes, 2);
    Ok(())
}

#[tokio::test]
async fn short_feedback_is_rejected() {
    let services = services();
    let Some(feedback) = services.feedback.as_ref() else {
        panic!("feedback service should be enabled");
    };
    let result = feedback
        .create(NewFeedback {
            title: "ok".into(),
            body: "too short".into(),
            category: FeedbackCategory::Bug,
        })
        .await;
    assert!(matches!(
        result,
        Err(DataError::Validation { field: "title", .. })
    ));
}

#[tokio::test]
async fn blog_writes_require_a_privileged_caller() -> Result<()> {
    let services = services();
    let Some(blog) = services.blog.as_ref() else {
        anyhow::bail!("blog service should be enabled");
    };
    let draft = BlogDraft {
        title: "Shipping Launchpad 1.0!".into(),
        slug: None,
        excerpt: Some("  What is new  ".into()),
        content: "Everything.".into(),
        tags: vec!["Release".into(), "release".into()],
        published: true,
    };

    let denied = blog.create(&Caller::Anonymous, draft.clone()).await;
    assert!(matches!(denied, Err(DataError::Forbidden { .. })));

    let post = blog.create(&admin(), draft).await?;
    assert_eq!(post.slug, "shipping-launchpad-1-0");
    assert_eq!(post.tags, ["release"]);
    assert_eq!(post.excerpt.as_deref(), Some("What is new"));

    let fetched = blog.get("shipping-launchpad-1-0").await?;
    assert_eq!(fetched.map(|post| post.id), Some(post.id));

    let page = blog
        .list(BlogQuery {
            tag: Some("RELEASE".into()),
            per_page: 500,
            ..BlogQuery::default()
        })
        .await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.per_page, 50);

    blog.delete(&Caller::ServiceRole, post.id).await?;
    assert!(blog.get(&post.id.to_string()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn issued_api_keys_verify_until_revoked() -> Result<()> {
    let services = services();
    let Some(keys) = services.api_keys.as_ref() else {
        anyhow::bail!("api key service should be enabled");
    };
    let created = keys
        .create(
            &Caller::ServiceRole,
            CreateApiKey {
                name: "ci".into(),
                scopes: vec![ApiScope::Read, ApiScope::Read],
                expires_in_days: Some(30),
            },
        )
        .await?;
    assert!(created.key.starts_with("lp_"));
    assert_eq!(created.record.scopes, [ApiScope::Read]);
    assert!(created.record.expires_at.is_some());

    let verified = keys.verify(&created.key).await?;
    assert_eq!(verified.map(|record| record.id), Some(created.record.id));
    assert!(keys.verify("lp_wrong").await?.is_none());

    keys.revoke(&Caller::ServiceRole, created.record.id).await?;
    assert!(keys.verify(&created.key).await?.is_none());
    assert!(keys.list(&Caller::ServiceRole).await?[0].revoked);
    Ok(())
}

#[tokio::test]
async fn api_key_lifetime_is_bounded() {
    let services = services();
    let Some(keys) = services.api_keys.as_ref() else {
        panic!("api key service should be enabled");
    };
    let result = keys
        .create(
            &admin(),
            CreateApiKey {
                name: "forever".into(),
                scopes: vec![ApiScope::Admin],
                expires_in_days: Some(10_000),
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataError::Validation {
            field: "expires_in_days",
            ..
        })
    ));
}

#[tokio::test]
async fn unconfigured_backend_simulates_waitlist_and_disables_the_rest() -> Result<()> {
    let services = DataServices::from_config(&BackendConfig::default())?;
    assert!(services.waitlist.is_mock());
    assert!(services.feedback.is_none());
    assert!(services.blog.is_none());
    assert!(services.api_keys.is_none());

    let first = services
        .waitlist
        .join(WaitlistSignup::new("ada@launchpad.dev", "hero"))
        .await?;
    let again = services
        .waitlist
        .join(WaitlistSignup::new("ada@launchpad.dev", "hero"))
        .await?;
    assert!(first.success);
    assert!(first.position.is_some_and(|position| position > 100));
    assert_eq!(again.position, first.position);
    Ok(())
}
