//! Typed records for the mail API payloads.

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of messages requested from the inbox in a single call.
pub const MESSAGE_PAGE_SIZE: usize = 1000;

/// The mailbox whose inbox is harvested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    address: String,
    base_url: String,
}

impl Mailbox {
    /// Creates a mailbox rooted at the inbox message collection of `address`.
    ///
    /// `graph_endpoint` is the API root, e.g. `https://graph.microsoft.com`.
    pub fn new(address: impl Into<String>, graph_endpoint: &str) -> Self {
        let address = address.into();
        let base_url = format!(
            "{}/v1.0/users/{}/mailFolders/inbox/messages/",
            graph_endpoint.trim_end_matches('/'),
            address
        );
        Self { address, base_url }
    }

    /// Creates a mailbox with an explicit message collection URL.
    pub fn with_base_url(address: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            address: address.into(),
            base_url,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn messages_url(&self) -> String {
        format!("{}?$top={}", self.base_url, MESSAGE_PAGE_SIZE)
    }

    pub fn attachments_url(&self, message_id: &str) -> String {
        format!("{}{}/attachments", self.base_url, message_id)
    }

    pub fn attachment_url(&self, message_id: &str, attachment_id: &str) -> String {
        format!("{}{}/attachments/{}", self.base_url, message_id, attachment_id)
    }

    pub fn message_url(&self, message_id: &str) -> String {
        format!("{}{}", self.base_url, message_id)
    }
}

/// A message in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,

    #[serde(default)]
    pub has_attachments: bool,
}

/// Attachment metadata, scoped to its parent message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
}

/// The materialized content of a file attachment.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub name: String,

    /// Raw bytes, decoded from the base64 `contentBytes` field.
    #[serde(deserialize_with = "base64_bytes")]
    pub content_bytes: Vec<u8>,
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("name", &self.name)
            .field("content_bytes.len", &self.content_bytes.len())
            .finish()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn base64_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}
