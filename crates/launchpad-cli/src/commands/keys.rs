use launchpad_data::{ApiKeyService, CreateApiKey};

use crate::cli::{KeysCreateArgs, KeysRevokeArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_api_keys, render_created_key};

fn service(ctx: &AppContext) -> CliResult<&ApiKeyService> {
    ctx.services
        .api_keys
        .as_ref()
        .ok_or_else(|| CliError::validation("api keys are unavailable: backend not configured"))
}

pub(crate) async fn handle_keys_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let keys = service(ctx)?.list(&ctx.caller).await?;
    render_api_keys(&keys, format)
}

pub(crate) async fn handle_keys_create(
    ctx: &AppContext,
    args: KeysCreateArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let created = service(ctx)?
        .create(
            &ctx.caller,
            CreateApiKey {
                name: args.name,
                scopes: args.scopes,
                expires_in_days: args.expires_in_days,
            },
        )
        .await?;
    render_created_key(&created, format)
}

pub(crate) async fn handle_keys_revoke(ctx: &AppContext, args: &KeysRevokeArgs) -> CliResult<()> {
    service(ctx)?.revoke(&ctx.caller, args.id).await?;
    println!("revoked {}", args.id);
    Ok(())
}
