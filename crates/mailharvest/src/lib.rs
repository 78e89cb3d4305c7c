//! Harvest file attachments from a Microsoft Graph mailbox.
//!
//! A run lists the inbox, downloads every attachment whose name ends with an
//! allowed extension into a local directory, and deletes each message from
//! which at least one file was saved.

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod harvester;
pub mod mailbox;
pub mod mapper;
pub mod models;
pub mod sanitize;
pub mod secrets;
pub mod storage;

pub use auth::{AuthError, PasswordGrantAuth};
pub use config::{load_config, AppSettings};
pub use error::{ConfigError, HarvestError, Result, StorageError};
pub use filter::ExtensionSet;
pub use gateway::{AccessToken, ApiGateway, GatewayError};
pub use harvester::{HarvestReport, Harvester, MessageOutcome};
pub use mailbox::{GraphMailbox, MailApi};
pub use mapper::{MapError, Page};
pub use models::{Attachment, FileAttachment, Mailbox, Message};
pub use secrets::{resolve_secret, SecretError, SecretSource};
pub use storage::FileWriter;
