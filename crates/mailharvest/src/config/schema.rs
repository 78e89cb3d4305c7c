use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Contents of `appsettings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    pub authentication: AuthenticationConfig,
    #[serde(rename = "WebAPI", default)]
    pub web_api: WebApiConfig,
}

/// Public client application registered with the identity platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationConfig {
    pub client_id: String,
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,
    #[serde(default = "default_instance")]
    pub instance: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_tenant_id() -> String {
    "organizations".to_string()
}

fn default_instance() -> String {
    "https://login.microsoftonline.com/".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["Mail.Read".to_string(), "Mail.Read.Shared".to_string()]
}

impl AuthenticationConfig {
    /// Token endpoint of the configured tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.instance.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebApiConfig {
    #[serde(default = "default_graph_endpoint")]
    pub microsoft_graph_base_endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_graph_endpoint() -> String {
    "https://graph.microsoft.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl WebApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            microsoft_graph_base_endpoint: default_graph_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
