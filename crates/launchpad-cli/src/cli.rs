//! Argument parsing and command dispatch.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use launchpad_analytics::SinkConfig;
use launchpad_data::{ApiScope, FeedbackCategory};
use launchpad_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, Connection, TelemetryEmitter, parse_url};
use crate::commands::blog::{handle_blog_get, handle_blog_list};
use crate::commands::feedback::{handle_feedback_create, handle_feedback_list, handle_feedback_vote};
use crate::commands::keys::{handle_keys_create, handle_keys_list, handle_keys_revoke};
use crate::commands::theme::{handle_theme_css, handle_theme_show};
use crate::commands::waitlist::handle_waitlist_join;

const DEFAULT_USER_ID: &str = "cli";
const DEFAULT_TELEMETRY_TIMEOUT_MS: u64 = 2_000;

/// Parses CLI arguments, executes the requested command, and forwards the
/// outcome to telemetry. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        build_sha: option_env!("LAUNCHPAD_BUILD_SHA").unwrap_or("dev"),
    }) {
        eprintln!("warning: logging disabled: {err}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let telemetry = TelemetryEmitter::new(&cli.sink_config());

    let result = dispatch(cli).await;

    let (exit_code, message, outcome) = match result {
        Ok(()) => (0, None, "success"),
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            eprintln!("error: {message}");
            (exit_code, Some(message), "error")
        }
    };

    if let Some(emitter) = &telemetry {
        emitter
            .emit(
                &trace_id,
                command_name,
                outcome,
                exit_code,
                message.as_deref(),
            )
            .await;
    }

    exit_code
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let format = cli.output;
    let connection = Connection {
        backend_url: cli.backend_url,
        anon_key: cli.anon_key,
        service_key: cli.service_key,
        access_token: cli.access_token,
        user_id: cli.user_id,
    };
    let ctx = || AppContext::from_connection(&connection);

    match cli.command {
        Command::Waitlist(WaitlistCommand::Join(args)) => {
            handle_waitlist_join(&ctx()?, args, format).await
        }
        Command::Feedback(feedback) => match feedback {
            FeedbackCommand::List(args) => handle_feedback_list(&ctx()?, &args, format).await,
            FeedbackCommand::Create(args) => handle_feedback_create(&ctx()?, args, format).await,
            FeedbackCommand::Vote(args) => handle_feedback_vote(&ctx()?, &args, format).await,
        },
        Command::Blog(blog) => match blog {
            BlogCommand::List(args) => handle_blog_list(&ctx()?, args, format).await,
            BlogCommand::Get(args) => handle_blog_get(&ctx()?, &args, format).await,
        },
        Command::Keys(keys) => match keys {
            KeysCommand::List => handle_keys_list(&ctx()?, format).await,
            KeysCommand::Create(args) => handle_keys_create(&ctx()?, args, format).await,
            KeysCommand::Revoke(args) => handle_keys_revoke(&ctx()?, &args).await,
        },
        Command::Theme(theme) => match theme {
            ThemeCommand::Show(args) => handle_theme_show(&args, format),
            ThemeCommand::Css(args) => handle_theme_css(&args),
        },
    }
}

#[derive(Parser)]
#[command(name = "launchpad", about = "Operator CLI for the Launchpad site")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "LAUNCHPAD_BACKEND_URL", value_parser = parse_url)]
    pub(crate) backend_url: Option<Url>,
    #[arg(long, global = true, env = "LAUNCHPAD_BACKEND_ANON_KEY", hide_env_values = true)]
    pub(crate) anon_key: Option<String>,
    #[arg(long, global = true, env = "LAUNCHPAD_BACKEND_SERVICE_KEY", hide_env_values = true)]
    pub(crate) service_key: Option<String>,
    #[arg(long, global = true, env = "LAUNCHPAD_ACCESS_TOKEN", hide_env_values = true)]
    pub(crate) access_token: Option<String>,
    #[arg(long, global = true, env = "LAUNCHPAD_USER_ID", default_value = DEFAULT_USER_ID)]
    pub(crate) user_id: String,
    #[arg(long, global = true, env = "LAUNCHPAD_TELEMETRY_ENDPOINT", value_parser = parse_url)]
    pub(crate) telemetry_endpoint: Option<Url>,
    #[arg(long, global = true, env = "LAUNCHPAD_INSIGHTS_ENDPOINT", value_parser = parse_url)]
    pub(crate) insights_endpoint: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "LAUNCHPAD_TELEMETRY_TIMEOUT_MS",
        default_value_t = DEFAULT_TELEMETRY_TIMEOUT_MS
    )]
    pub(crate) telemetry_timeout_ms: u64,
    #[arg(long, global = true, env = "LAUNCHPAD_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "LAUNCHPAD_LOG_FORMAT",
        default_value = "auto",
        value_parser = parse_log_format
    )]
    pub(crate) log_format: LogFormat,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            general_endpoint: self.telemetry_endpoint.clone(),
            insights_endpoint: self.insights_endpoint.clone(),
            timeout: Duration::from_millis(self.telemetry_timeout_ms),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(subcommand)]
    Waitlist(WaitlistCommand),
    #[command(subcommand)]
    Feedback(FeedbackCommand),
    #[command(subcommand)]
    Blog(BlogCommand),
    #[command(subcommand)]
    Keys(KeysCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand)]
pub(crate) enum WaitlistCommand {
    /// Add an email to the waitlist.
    Join(WaitlistJoinArgs),
}

#[derive(Args)]
pub(crate) struct WaitlistJoinArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, default_value = "cli")]
    pub(crate) source: String,
    #[arg(long)]
    pub(crate) referral_code: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum FeedbackCommand {
    /// List the most upvoted feedback.
    List(FeedbackListArgs),
    /// Submit feedback.
    Create(FeedbackCreateArgs),
    /// Upvote a feedback item.
    Vote(FeedbackVoteArgs),
}

#[derive(Args)]
pub(crate) struct FeedbackListArgs {
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: u32,
}

#[derive(Args)]
pub(crate) struct FeedbackCreateArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long)]
    pub(crate) body: String,
    #[arg(long, value_parser = parse_category, default_value = "other")]
    pub(crate) category: FeedbackCategory,
}

#[derive(Args)]
pub(crate) struct FeedbackVoteArgs {
    #[arg(long)]
    pub(crate) id: Uuid,
    /// Voter identity; defaults to --user-id.
    #[arg(long)]
    pub(crate) voter: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum BlogCommand {
    /// List published posts.
    List(BlogListArgs),
    /// Show one post by slug or id.
    Get(BlogGetArgs),
}

#[derive(Args)]
pub(crate) struct BlogListArgs {
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) tag: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, default_value_t = 10)]
    pub(crate) per_page: u32,
}

#[derive(Args)]
pub(crate) struct BlogGetArgs {
    pub(crate) slug_or_id: String,
}

#[derive(Subcommand)]
pub(crate) enum KeysCommand {
    /// List API keys.
    List,
    /// Issue a new API key.
    Create(KeysCreateArgs),
    /// Revoke an API key.
    Revoke(KeysRevokeArgs),
}

#[derive(Args)]
pub(crate) struct KeysCreateArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long = "scope", value_parser = parse_scope, required = true)]
    pub(crate) scopes: Vec<ApiScope>,
    #[arg(long)]
    pub(crate) expires_in_days: Option<u32>,
}

#[derive(Args)]
pub(crate) struct KeysRevokeArgs {
    pub(crate) id: Uuid,
}

#[derive(Subcommand)]
pub(crate) enum ThemeCommand {
    /// Print the token tree for a mode.
    Show(ThemeArgs),
    /// Print the CSS custom properties for a mode.
    Css(ThemeArgs),
}

#[derive(Args)]
pub(crate) struct ThemeArgs {
    #[arg(long, default_value = "light")]
    pub(crate) mode: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}

fn parse_category(input: &str) -> Result<FeedbackCategory, String> {
    input.parse::<FeedbackCategory>().map_err(|err| err.to_string())
}

fn parse_scope(input: &str) -> Result<ApiScope, String> {
    input.parse::<ApiScope>().map_err(|err| err.to_string())
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Waitlist(WaitlistCommand::Join(_)) => "waitlist_join",
        Command::Feedback(FeedbackCommand::List(_)) => "feedback_list",
        Command::Feedback(FeedbackCommand::Create(_)) => "feedback_create",
        Command::Feedback(FeedbackCommand::Vote(_)) => "feedback_vote",
        Command::Blog(BlogCommand::List(_)) => "blog_list",
        Command::Blog(BlogCommand::Get(_)) => "blog_get",
        Command::Keys(KeysCommand::List) => "keys_list",
        Command::Keys(KeysCommand::Create(_)) => "keys_create",
        Command::Keys(KeysCommand::Revoke(_)) => "keys_revoke",
        Command::Theme(ThemeCommand::Show(_)) => "theme_show",
        Command::Theme(ThemeCommand::Css(_)) => "theme_css",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("launchpad").chain(args.iter().copied()))
    }

    #[test]
    fn keys_create_collects_repeated_scopes() -> Result<(), clap::Error> {
        let cli = parse(&["keys", "create", "--name", "ci", "--scope", "read", "--scope", "write"])?;
        match cli.command {
            Command::Keys(KeysCommand::Create(args)) => {
                assert_eq!(args.scopes, [ApiScope::Read, ApiScope::Write]);
                assert_eq!(args.expires_in_days, None);
            }
            _ => panic!("expected keys create"),
        }
        Ok(())
    }

    #[test]
    fn unknown_category_is_rejected_by_the_parser() {
        assert!(
            parse(&[
                "feedback", "create", "--title", "t", "--body", "b", "--category", "praise"
            ])
            .is_err()
        );
    }

    #[test]
    fn global_flags_parse_after_subcommands() -> Result<(), clap::Error> {
        let cli = parse(&["theme", "show", "--mode", "dark", "--output", "json"])?;
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(command_label(&cli.command), "theme_show");
        Ok(())
    }

    #[test]
    fn telemetry_flags_build_sink_config() -> Result<(), clap::Error> {
        let cli = parse(&[
            "theme",
            "css",
            "--telemetry-endpoint",
            "https://collect.launchpad.dev/events",
            "--telemetry-timeout-ms",
            "500",
        ])?;
        let config = cli.sink_config();
        assert_eq!(
            config.general_endpoint.as_ref().map(Url::as_str),
            Some("https://collect.launchpad.dev/events")
        );
        assert!(config.insights_endpoint.is_none());
        assert_eq!(config.timeout, Duration::from_millis(500));
        Ok(())
    }

    #[test]
    fn command_labels_are_snake_case() {
        let command = Command::Feedback(FeedbackCommand::Vote(FeedbackVoteArgs {
            id: Uuid::nil(),
            voter: None,
        }));
        assert_eq!(command_label(&command), "feedback_vote");
        assert_eq!(command_label(&Command::Keys(KeysCommand::List)), "keys_list");
    }
}
