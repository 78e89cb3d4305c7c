//! Mail API operations used by the harvester.

use async_trait::async_trait;

use crate::error::Result;
use crate::gateway::{AccessToken, ApiGateway};
use crate::mapper::{self, Page};
use crate::models::{Attachment, FileAttachment, Mailbox, Message};

/// The four mail operations a harvest run needs.
///
/// Implementations return empty results when the API had nothing usable to
/// give, and errors only for payloads that do not have the expected shape.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Address of the mailbox being harvested.
    fn address(&self) -> &str;

    /// Lists the most recent inbox messages (one page).
    async fn list_messages(&self) -> Result<Page<Message>>;

    /// Lists attachment metadata of a message.
    async fn list_attachments(&self, message_id: &str) -> Result<Vec<Attachment>>;

    /// Fetches the full content of one attachment.
    async fn get_file_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Option<FileAttachment>>;

    /// Deletes a message; returns whether the API confirmed the deletion.
    async fn delete_message(&self, message_id: &str) -> Result<bool>;
}

/// [`MailApi`] backed by Microsoft Graph through an [`ApiGateway`].
pub struct GraphMailbox {
    gateway: ApiGateway,
    mailbox: Mailbox,
    token: AccessToken,
}

impl GraphMailbox {
    pub fn new(gateway: ApiGateway, mailbox: Mailbox, token: AccessToken) -> Self {
        Self {
            gateway,
            mailbox,
            token,
        }
    }
}

#[async_trait]
impl MailApi for GraphMailbox {
    fn address(&self) -> &str {
        self.mailbox.address()
    }

    async fn list_messages(&self) -> Result<Page<Message>> {
        let json = self
            .gateway
            .get(&self.mailbox.messages_url(), &self.token)
            .await?;
        Ok(mapper::to_page(json)?)
    }

    async fn list_attachments(&self, message_id: &str) -> Result<Vec<Attachment>> {
        let json = self
            .gateway
            .get(&self.mailbox.attachments_url(message_id), &self.token)
            .await?;
        Ok(mapper::to_collection(json)?)
    }

    async fn get_file_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Option<FileAttachment>> {
        let json = self
            .gateway
            .get(
                &self.mailbox.attachment_url(message_id, attachment_id),
                &self.token,
            )
            .await?;
        Ok(mapper::to_object(json)?)
    }

    async fn delete_message(&self, message_id: &str) -> Result<bool> {
        let json = self
            .gateway
            .delete(&self.mailbox.message_url(message_id), &self.token)
            .await?;
        Ok(json.is_some())
    }
}
