//! Configuration for the dashboard client.

use crate::client::DashboardClient;
use crate::error::SyncResult;
use crate::http::ReqwestClient;
use std::fmt;
use std::time::Duration;

/// Connection settings for a dashboard.
///
/// The secret travels with the configuration value; nothing is read from
/// process-wide state.
#[derive(Clone)]
pub struct DashboardConfig {
    /// Dashboard base URL (e.g. "https://dashboard.example.com").
    pub base_url: String,
    /// Shared secret sent in the `Authorization` header.
    pub secret: String,
    /// Request timeout, applied by the HTTP transport.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl DashboardConfig {
    /// Creates a new dashboard configuration.
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret: secret.into(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("dashsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds a dashboard client backed by reqwest.
    pub fn build_client(&self) -> SyncResult<DashboardClient<ReqwestClient>> {
        let http = ReqwestClient::new(self.timeout, &self.user_agent)?;
        Ok(DashboardClient::new(self, http))
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DashboardConfig::new("https://dash.example.com", "s3cret")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("ci-sync/1");

        assert_eq!(config.base_url, "https://dash.example.com");
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "ci-sync/1");
    }

    #[test]
    fn default_timeout() {
        let config = DashboardConfig::new("http://localhost:3000", "x");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("dashsync/"));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = DashboardConfig::new("http://localhost:3000", "top-secret-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("top-secret-value"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn build_client_uses_base_url() {
        let client = DashboardConfig::new("http://localhost:3000/", "x")
            .build_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
