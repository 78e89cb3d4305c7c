//! Resolution of the account secret passed on the command line.
//!
//! The secret argument is the password itself unless a [`SecretSource`]
//! says it names a file or an environment variable holding the password.
//! That keeps the password out of the process list and shell history
//! without reserving any prefix of the literal value.

use secrecy::SecretString;
use std::fs;

/// How the secret argument is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretSource {
    /// The argument is the password, taken verbatim.
    #[default]
    Literal,
    /// The argument is a path to a file containing the password.
    File,
    /// The argument is the name of an environment variable holding the password.
    Env,
}

/// Error type for secret resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Secret is empty")]
    Empty,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret argument into a `SecretString`.
///
/// File contents and environment values are trimmed of surrounding
/// whitespace; a literal value is used verbatim.
pub fn resolve_secret(source: SecretSource, arg: &str) -> Result<SecretString> {
    let value = match source {
        SecretSource::Literal => arg.to_string(),
        SecretSource::File => {
            let expanded = expand_home(arg);
            let content =
                fs::read_to_string(&expanded).map_err(|e| SecretError::FileReadError {
                    path: expanded.clone(),
                    source: e,
                })?;
            content.trim().to_string()
        }
        SecretSource::Env => match std::env::var(arg) {
            Ok(value) => value.trim().to_string(),
            Err(std::env::VarError::NotPresent) => {
                return Err(SecretError::EnvVarNotSet {
                    name: arg.to_string(),
                })
            }
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(SecretError::EnvVarNotUnicode {
                    name: arg.to_string(),
                })
            }
        },
    };

    if value.is_empty() {
        return Err(SecretError::Empty);
    }

    Ok(SecretString::from(value))
}

/// Expands `~` to the user's home directory.
///
/// Checks HOME (Unix) then USERPROFILE (Windows). `~user/path` is not
/// supported.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            if path == "~" {
                return home.to_string_lossy().into_owned();
            }
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
