use report_client::ClientConfig;
use shared::models::DEFAULT_DATA_SOURCE;

/// Designer configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|--------|------|
/// | REPORT_API_URL | http://localhost:8080/api | Report backend base URL |
/// | REPORT_API_TOKEN | - | Bearer token |
/// | REPORT_DEFAULT_DATA_SOURCE | incidents | Data source when the template has no table |
/// | REPORT_PREVIEW_ROW_LIMIT | 10 | Rows rendered in previews |
/// | REPORT_NOTICE_TTL_MS | 3000 | Notice lifetime (ms) |
/// | REPORT_REQUEST_TIMEOUT_SECS | 30 | Request timeout (s) |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false | JSON log output |
#[derive(Debug, Clone)]
pub struct DesignerConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub default_data_source: String,
    pub preview_row_limit: u32,
    pub notice_ttl_ms: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".into(),
            api_token: None,
            default_data_source: DEFAULT_DATA_SOURCE.into(),
            preview_row_limit: 10,
            notice_ttl_ms: 3000,
            request_timeout_secs: 30,
            log_level: "info".into(),
            log_json: false,
        }
    }
}

impl DesignerConfig {
    /// Load from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("REPORT_API_URL").unwrap_or(defaults.api_url),
            api_token: lookup("REPORT_API_TOKEN").filter(|t| !t.trim().is_empty()),
            default_data_source: lookup("REPORT_DEFAULT_DATA_SOURCE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.default_data_source),
            preview_row_limit: lookup("REPORT_PREVIEW_ROW_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.preview_row_limit),
            notice_ttl_ms: lookup("REPORT_NOTICE_TTL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.notice_ttl_ms),
            request_timeout_secs: lookup("REPORT_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
        }
    }

    /// HTTP client settings derived from this configuration
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone()).with_timeout(self.request_timeout_secs);
        match &self.api_token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }
}
