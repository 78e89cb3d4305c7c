pub mod loader;
pub mod schema;

pub use loader::{default_config_paths, find_config, load_config, load_config_from_str};
pub use schema::{AppSettings, AuthenticationConfig, WebApiConfig};
