use std::time::Duration;

use railyard_tracker::TrackerError;

/// Connection settings for a TestRail instance.
#[derive(Clone)]
pub struct HttpTrackerConfig {
    /// Base URL, e.g. `https://example.testrail.io`.
    pub host: String,
    pub user: String,
    /// Account password or API key.
    pub password: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpTrackerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for HttpTrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTrackerConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `(preferred, legacy)` variable names for each setting.
const HOST_VARS: (&str, &str) = ("TESTRAIL_HOST", "NETWORK_URL");
const USER_VARS: (&str, &str) = ("TESTRAIL_USER", "USERNAME");
const PASSWORD_VARS: (&str, &str) = ("TESTRAIL_PASSWORD", "PASSWORD");

impl HttpTrackerConfig {
    /// Read host and credentials from the process environment.
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Each `TESTRAIL_*` name wins
    /// over its legacy counterpart.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TrackerError> {
        let read = |(preferred, legacy): (&str, &str)| {
            lookup(preferred)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(legacy).filter(|v| !v.is_empty()))
                .ok_or_else(|| TrackerError::Config(format!("{preferred} (or {legacy}) is not set")))
        };

        Ok(Self {
            host: read(HOST_VARS)?,
            user: read(USER_VARS)?,
            password: read(PASSWORD_VARS)?,
            ..Default::default()
        })
    }
}
