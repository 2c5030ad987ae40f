//! Backend connection settings.

use url::Url;

/// Environment variable holding the backend base URL.
pub const ENV_BACKEND_URL: &str = "LAUNCHPAD_BACKEND_URL";
/// Environment variable holding the public (anon) key.
pub const ENV_BACKEND_ANON_KEY: &str = "LAUNCHPAD_BACKEND_ANON_KEY";
/// Environment variable holding the service-role key.
pub const ENV_BACKEND_SERVICE_KEY: &str = "LAUNCHPAD_BACKEND_SERVICE_KEY";

/// Connection settings for the hosted backend.
///
/// A config without both a URL and an anon key is *unconfigured*; services
/// then fall back to mock or disabled mode instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://project.backend.example`.
    pub url: Option<Url>,
    /// Public key sent with every request.
    pub anon_key: Option<String>,
    /// Privileged key used for service-role callers.
    pub service_key: Option<String>,
}

impl BackendConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup. Blank and unparsable values
    /// are treated as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let url = read(ENV_BACKEND_URL).and_then(|raw| match raw.parse::<Url>() {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed backend url");
                None
            }
        });
        Self {
            url,
            anon_key: read(ENV_BACKEND_ANON_KEY),
            service_key: read(ENV_BACKEND_SERVICE_KEY),
        }
    }

    /// Whether both the URL and the anon key are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}
