use launchpad_data::NewFeedback;

use crate::cli::{FeedbackCreateArgs, FeedbackListArgs, FeedbackVoteArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_feedback_item, render_feedback_list};

fn disabled() -> CliError {
    CliError::validation("feedback is unavailable: backend not configured")
}

pub(crate) async fn handle_feedback_list(
    ctx: &AppContext,
    args: &FeedbackListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let Some(feedback) = ctx.services.feedback.as_ref() else {
        // Unconfigured boards render nothing.
        return render_feedback_list(&[], format);
    };
    let items = feedback.list(args.limit).await?;
    render_feedback_list(&items, format)
}

pub(crate) async fn handle_feedback_create(
    ctx: &AppContext,
    args: FeedbackCreateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let feedback = ctx.services.feedback.as_ref().ok_or_else(disabled)?;
    let item = feedback
        .create(NewFeedback {
            title: args.title,
            body: args.body,
            category: args.category,
        })
        .await?;
    render_feedback_item(&item, format)
}

pub(crate) async fn handle_feedback_vote(
    ctx: &AppContext,
    args: &FeedbackVoteArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let feedback = ctx.services.feedback.as_ref().ok_or_else(disabled)?;
    let voter = args.voter.as_deref().unwrap_or(&ctx.user_id);
    let item = feedback.vote(args.id, voter).await?;
    render_feedback_item(&item, format)
}
