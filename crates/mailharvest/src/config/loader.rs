use std::path::{Path, PathBuf};

use crate::config::schema::AppSettings;
use crate::error::ConfigError;

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "appsettings.json";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppSettings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<AppSettings, ConfigError> {
    let config: AppSettings = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Candidate config locations, in lookup order: next to the executable,
/// the working directory, then the user config directory.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }

    if let Ok(dir) = std::env::current_dir() {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mailharvest").join(CONFIG_FILE_NAME));
    }

    paths
}

/// Returns `explicit` if given, else the first existing default location.
pub fn find_config(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let candidates = default_config_paths();
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn validate_config(config: &AppSettings) -> Result<(), ConfigError> {
    let auth = &config.authentication;

    if auth.client_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Authentication.ClientId must not be empty".to_string(),
        });
    }

    if auth.tenant_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Authentication.TenantId must not be empty".to_string(),
        });
    }

    if auth.scopes.iter().all(|s| s.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "Authentication.Scopes must name at least one scope".to_string(),
        });
    }

    validate_http_url("Authentication.Instance", &auth.instance)?;
    validate_http_url(
        "WebAPI.MicrosoftGraphBaseEndpoint",
        &config.web_api.microsoft_graph_base_endpoint,
    )?;

    if config.web_api.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "WebAPI.TimeoutSecs must be greater than zero".to_string(),
        });
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value).map_err(|e| ConfigError::Validation {
        message: format!("{} is not a valid URL ('{}'): {}", field, value, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            message: format!("{} must be an http(s) URL, got '{}'", field, value),
        });
    }

    Ok(())
}
