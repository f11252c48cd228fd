// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Static site configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Directory the landing page is served from
    #[serde(default = "default_site_root")]
    pub root: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Serve the root index for unknown extension-less paths
    #[serde(default = "default_true")]
    pub fallback_to_index: bool,
    #[serde(default)]
    pub health: HealthConfig,
}

#[allow(clippy::missing_const_for_fn)]
fn default_site_root() -> String {
    "public".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            index_files: default_index_files(),
            fallback_to_index: true,
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Contact form endpoint and email provider configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContactConfig {
    /// Path of the submission endpoint
    #[serde(default = "default_contact_endpoint")]
    pub endpoint: String,
    /// Provider send URL (Resend `POST /emails`)
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Name of the environment variable holding the provider API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: Vec<String>,
    /// Outbound request timeout; transport default when unset
    #[serde(default)]
    pub provider_timeout_secs: Option<u64>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_contact_endpoint() -> String {
    "/api/contact".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_provider_url() -> String {
    "https://api.resend.com/emails".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_api_key_env() -> String {
    "RESEND_API_KEY".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_from() -> String {
    "Website Contact Form <noreply@dcinfrastructures.io>".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_to() -> Vec<String> {
    vec!["dcruz@dcinfrastructures.io".to_string()]
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: default_contact_endpoint(),
            provider_url: default_provider_url(),
            api_key_env: default_api_key_env(),
            from: default_from(),
            to: default_to(),
            provider_timeout_secs: None,
        }
    }
}
