use launchpad_data::WaitlistSignup;
use serde_json::{Map, Value};

use crate::cli::{OutputFormat, WaitlistJoinArgs};
use crate::client::{AppContext, CliResult};
use crate::output::render_waitlist_response;

pub(crate) async fn handle_waitlist_join(
    ctx: &AppContext,
    args: WaitlistJoinArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let mut metadata = Map::new();
    metadata.insert("channel".to_string(), Value::from("cli"));
    let signup = WaitlistSignup {
        email: args.email,
        source: args.source,
        referral_code: args.referral_code,
        metadata,
    };
    let response = ctx.services.waitlist.join(signup).await?;
    if ctx.services.waitlist.is_mock() {
        eprintln!("note: backend not configured; signup was simulated");
    }
    render_waitlist_response(&response, format)
}
