//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use launchpad_data::{
    ApiKeyRecord, BlogPage, BlogPost, CreatedApiKey, FeedbackItem, WaitlistResponse,
};
use launchpad_theme::Theme;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_waitlist_response(
    response: &WaitlistResponse,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Table => {
            if response.success {
                match response.position {
                    Some(position) => println!("joined waitlist at position #{position}"),
                    None => println!("joined waitlist"),
                }
                Ok(())
            } else {
                Err(CliError::validation(
                    response
                        .error
                        .clone()
                        .unwrap_or_else(|| "signup was rejected".to_string()),
                ))
            }
        }
    }
}

pub(crate) fn render_feedback_list(items: &[FeedbackItem], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok(());
            }
            println!("{:<36} {:>5} {:<12} TITLE", "ID", "VOTES", "CATEGORY");
            for item in items {
                println!(
                    "{:<36} {:>5} {:<12} {}",
                    item.id,
                    item.upvotes,
                    item.category.as_str(),
                    truncate(&item.title, 60)
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_feedback_item(item: &FeedbackItem, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(item),
        OutputFormat::Table => {
            println!("id: {}", item.id);
            println!("title: {}", item.title);
            println!("category: {}", item.category);
            println!("votes: {}", item.upvotes);
            println!("created: {}", item.created_at);
            Ok(())
        }
    }
}

pub(crate) fn render_blog_page(page: &BlogPage, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table => {
            println!("{:<40} {:<20} TITLE", "SLUG", "PUBLISHED");
            for post in &page.posts {
                let published = post
                    .published_at
                    .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
                println!(
                    "{:<40} {:<20} {}",
                    truncate(&post.slug, 40),
                    published,
                    post.title
                );
            }
            println!(
                "page {}/{} ({} posts)",
                page.page,
                page.total_pages().max(1),
                page.total
            );
            Ok(())
        }
    }
}

pub(crate) fn render_blog_post(post: &BlogPost, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(post),
        OutputFormat::Table => {
            println!("# {}", post.title);
            println!("slug: {}", post.slug);
            if !post.tags.is_empty() {
                println!("tags: {}", post.tags.join(", "));
            }
            if let Some(excerpt) = &post.excerpt {
                println!("\n{excerpt}");
            }
            println!("\n{}", post.content);
            Ok(())
        }
    }
}

pub(crate) fn render_api_keys(keys: &[ApiKeyRecord], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(keys),
        OutputFormat::Table => {
            println!("{:<36} {:<10} {:<8} {:<18} NAME", "ID", "PREFIX", "STATUS", "SCOPES");
            for key in keys {
                let status = if key.revoked { "revoked" } else { "active" };
                let scopes = key
                    .scopes
                    .iter()
                    .map(|scope| scope.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{:<36} {:<10} {:<8} {:<18} {}",
                    key.id, key.prefix, status, scopes, key.name
                );
            }
            Ok(())
        }
    }
}

pub(crate) fn render_created_key(created: &CreatedApiKey, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(created),
        OutputFormat::Table => {
            println!("id: {}", created.record.id);
            println!("name: {}", created.record.name);
            if let Some(expiry) = created.record.expires_at {
                println!("expires: {expiry}");
            }
            println!("key: {}", created.key);
            println!("store this key now; it will not be shown again");
            Ok(())
        }
    }
}

pub(crate) fn render_theme(theme: &Theme, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(theme),
        OutputFormat::Table => {
            println!("mode: {}", theme.mode.as_str());
            for (name, value) in theme.css_variables() {
                println!("{name:<32} {value}");
            }
            Ok(())
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
