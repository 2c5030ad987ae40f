//! Shared error types, caller resolution and telemetry wiring for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use launchpad_analytics::{
    Analytics, AnalyticsDeps, AnalyticsEvent, EventSink, HttpSink, MemorySessionStore, NoopSink,
    PageInfo, PayloadStyle, SinkConfig, SystemClock,
};
use launchpad_data::{BackendConfig, Caller, DataError, DataServices};
use serde_json::{Map, Value};
use url::Url;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<DataError> for CliError {
    fn from(error: DataError) -> Self {
        if error.is_user_error() {
            Self::Validation(error.to_string())
        } else {
            Self::Failure(anyhow::Error::new(error))
        }
    }
}

/// Credentials and endpoints gathered from flags and environment.
#[derive(Debug, Clone, Default)]
pub(crate) struct Connection {
    pub(crate) backend_url: Option<Url>,
    pub(crate) anon_key: Option<String>,
    pub(crate) service_key: Option<String>,
    pub(crate) access_token: Option<String>,
    pub(crate) user_id: String,
}

impl Connection {
    pub(crate) fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            url: self.backend_url.clone(),
            anon_key: self.anon_key.clone(),
            service_key: self.service_key.clone(),
        }
    }

    /// Service-role key wins over a user session; neither means anonymous.
    pub(crate) fn caller(&self) -> Caller {
        if self.service_key.is_some() {
            Caller::ServiceRole
        } else if let Some(token) = &self.access_token {
            Caller::Authenticated {
                user_id: self.user_id.clone(),
                access_token: token.clone(),
            }
        } else {
            Caller::Anonymous
        }
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) services: DataServices,
    pub(crate) caller: Caller,
    pub(crate) user_id: String,
}

impl AppContext {
    pub(crate) fn from_connection(connection: &Connection) -> CliResult<Self> {
        let services = DataServices::from_config(&connection.backend_config())?;
        Ok(Self {
            services,
            caller: connection.caller(),
            user_id: connection.user_id.clone(),
        })
    }
}

/// Analytics pipeline used to forward CLI outcomes.
pub(crate) struct TelemetryEmitter {
    analytics: Analytics,
    sinks: Vec<HttpSink>,
}

impl TelemetryEmitter {
    /// Build an emitter when at least one endpoint is configured.
    #[must_use]
    pub(crate) fn new(config: &SinkConfig) -> Option<Self> {
        if config.general_endpoint.is_none() && config.insights_endpoint.is_none() {
            return None;
        }
        let build = |endpoint: Option<&Url>, name: &'static str, style: PayloadStyle| {
            let url = endpoint?;
            match HttpSink::new(name, url.clone(), style, config.timeout) {
                Ok(sink) => Some(sink),
                Err(err) => {
                    tracing::debug!(error = %err, sink = name, "telemetry sink disabled");
                    None
                }
            }
        };
        let general = build(
            config.general_endpoint.as_ref(),
            "general",
            PayloadStyle::Keyed,
        );
        let insights = build(
            config.insights_endpoint.as_ref(),
            "insights",
            PayloadStyle::Structured,
        );
        let as_sink = |sink: Option<&HttpSink>| -> Arc<dyn EventSink> {
            sink.map_or_else(
                || Arc::new(NoopSink) as Arc<dyn EventSink>,
                |sink| Arc::new(sink.clone()),
            )
        };

        let analytics = Analytics::new(AnalyticsDeps {
            clock: Arc::new(SystemClock),
            storage: Arc::new(MemorySessionStore::new()),
            general_sink: as_sink(general.as_ref()),
            page_sink: as_sink(insights.as_ref()),
        });
        Some(Self {
            analytics,
            sinks: general.into_iter().chain(insights).collect(),
        })
    }

    pub(crate) async fn emit(
        &self,
        trace_id: &str,
        command: &str,
        outcome: &str,
        exit_code: i32,
        message: Option<&str>,
    ) {
        self.analytics
            .init(&PageInfo::new(format!("cli://launchpad/{command}"), command));
        let mut event = AnalyticsEvent::new("cli_command", "cli")
            .label(command)
            .param("outcome", outcome)
            .param("exit_code", exit_code)
            .param("trace_id", trace_id);
        if let Some(message) = message {
            event = event.param("message", message);
        }
        self.analytics.track_event(event);

        if let Some(message) = message {
            let mut context = Map::new();
            context.insert("command".to_string(), Value::from(command));
            context.insert("exit_code".to_string(), Value::from(exit_code));
            context.insert("trace_id".to_string(), Value::from(trace_id));
            self.analytics.track_error("cli_error", message, context);
        }

        for sink in &self.sinks {
            sink.flush().await;
        }
    }
}

/// Parse a URL flag.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;

    #[test]
    fn data_errors_map_to_exit_codes() {
        let validation = CliError::from(DataError::Validation {
            field: "email",
            reason: "is required",
        });
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "invalid email: is required");

        let failure = CliError::from(DataError::Status {
            operation: "feedback.list",
            status: 500,
            body: String::new(),
        });
        assert_eq!(failure.exit_code(), 3);
    }

    #[test]
    fn caller_prefers_service_role() {
        let mut connection = Connection {
            access_token: Some("token".into()),
            user_id: "ops".into(),
            ..Connection::default()
        };
        assert!(matches!(
            connection.caller(),
            Caller::Authenticated { ref user_id, .. } if user_id == "ops"
        ));
        connection.service_key = Some("service".into());
        assert_eq!(connection.caller(), Caller::ServiceRole);
        assert_eq!(Connection::default().caller(), Caller::Anonymous);
    }

    #[test]
    fn emitter_requires_an_endpoint() {
        assert!(TelemetryEmitter::new(&SinkConfig::default()).is_none());
    }

    #[tokio::test]
    async fn telemetry_emitter_forwards_outcome_and_error() -> Result<()> {
        let server = MockServer::start_async().await;
        let event = server.mock(|when, then| {
            when.method(POST)
                .path("/collect")
                .json_body_includes(r#"{"event":"cli_command"}"#);
            then.status(204);
        });
        let error = server.mock(|when, then| {
            when.method(POST)
                .path("/insights")
                .json_body_includes(r#"{"type":"error"}"#);
            then.status(204);
        });

        let config = SinkConfig {
            general_endpoint: Some(server.url("/collect").parse()?),
            insights_endpoint: Some(server.url("/insights").parse()?),
            ..SinkConfig::default()
        };
        let Some(emitter) = TelemetryEmitter::new(&config) else {
            anyhow::bail!("emitter should be configured");
        };
        emitter
            .emit("trace", "feedback_list", "error", 3, Some("backend down"))
            .await;

        event.assert();
        error.assert();
        Ok(())
    }
}
