use launchpad_data::BlogQuery;

use crate::cli::{BlogGetArgs, BlogListArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_blog_page, render_blog_post};

pub(crate) async fn handle_blog_list(
    ctx: &AppContext,
    args: BlogListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let Some(blog) = ctx.services.blog.as_ref() else {
        return Err(CliError::validation(
            "blog is unavailable: backend not configured",
        ));
    };
    let page = blog
        .list(BlogQuery {
            search: args.search,
            tag: args.tag,
            page: args.page,
            per_page: args.per_page,
        })
        .await?;
    render_blog_page(&page, format)
}

pub(crate) async fn handle_blog_get(
    ctx: &AppContext,
    args: &BlogGetArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let Some(blog) = ctx.services.blog.as_ref() else {
        return Err(CliError::validation(
            "blog is unavailable: backend not configured",
        ));
    };
    let post = blog
        .get(&args.slug_or_id)
        .await?
        .ok_or_else(|| CliError::validation(format!("post '{}' not found", args.slug_or_id)))?;
    render_blog_post(&post, format)
}
