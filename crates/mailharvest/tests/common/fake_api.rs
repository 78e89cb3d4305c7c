//! In-memory `MailApi` that records every call it receives.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use mailharvest::{
    Attachment, FileAttachment, GatewayError, HarvestError, MailApi, MapError, Message, Page,
    Result,
};

/// A call observed by [`FakeMailApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListMessages,
    ListAttachments(String),
    GetFile(String, String),
    Delete(String),
}

/// Mailbox contents served from memory.
///
/// Anything not configured behaves like the gateway's NotAvailable: empty
/// collections and missing files.
#[derive(Default)]
pub struct FakeMailApi {
    messages: Option<Vec<Message>>,
    next_link: Option<String>,
    unreadable_message_list: bool,
    attachments: HashMap<String, Vec<Attachment>>,
    unreadable_attachment_lists: HashSet<String>,
    files: HashMap<(String, String), FileAttachment>,
    unmappable_files: HashSet<(String, String)>,
    failing_deletes: HashSet<String>,
    erroring_deletes: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeMailApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox whose message listing is NotAvailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Adds a message with its attachments; `Some(bytes)` makes the
    /// attachment's content fetchable.
    pub fn with_message(
        mut self,
        message: Message,
        attachments: Vec<(Attachment, Option<&[u8]>)>,
    ) -> Self {
        for (attachment, content) in &attachments {
            if let Some(bytes) = content {
                self.files.insert(
                    (message.id.clone(), attachment.id.clone()),
                    file(&attachment.name, bytes),
                );
            }
        }
        if !attachments.is_empty() {
            self.attachments.insert(
                message.id.clone(),
                attachments.into_iter().map(|(a, _)| a).collect(),
            );
        }
        self.messages.get_or_insert_with(Vec::new).push(message);
        self
    }

    pub fn with_next_link(mut self, link: &str) -> Self {
        self.next_link = Some(link.to_string());
        self
    }

    pub fn with_unreadable_message_list(mut self) -> Self {
        self.unreadable_message_list = true;
        self
    }

    pub fn with_unreadable_attachment_list(mut self, message_id: &str) -> Self {
        self.unreadable_attachment_lists.insert(message_id.to_string());
        self
    }

    pub fn with_failing_delete(mut self, message_id: &str) -> Self {
        self.failing_deletes.insert(message_id.to_string());
        self
    }

    /// The attachment's payload lacks `contentBytes`, as item attachments do.
    pub fn with_unmappable_file(mut self, message_id: &str, attachment_id: &str) -> Self {
        self.unmappable_files
            .insert((message_id.to_string(), attachment_id.to_string()));
        self
    }

    /// The delete call answers with a success body that is not JSON.
    pub fn with_erroring_delete(mut self, message_id: &str) -> Self {
        self.erroring_deletes.insert(message_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MailApi for FakeMailApi {
    fn address(&self) -> &str {
        "fake@example.com"
    }

    async fn list_messages(&self) -> Result<Page<Message>> {
        self.record(Call::ListMessages);
        if self.unreadable_message_list {
            return Err(HarvestError::Map(MapError::MissingCollection));
        }
        Ok(match &self.messages {
            Some(messages) => Page {
                items: messages.clone(),
                next_link: self.next_link.clone(),
            },
            None => Page::default(),
        })
    }

    async fn list_attachments(&self, message_id: &str) -> Result<Vec<Attachment>> {
        self.record(Call::ListAttachments(message_id.to_string()));
        if self.unreadable_attachment_lists.contains(message_id) {
            return Err(HarvestError::Map(MapError::MissingCollection));
        }
        Ok(self.attachments.get(message_id).cloned().unwrap_or_default())
    }

    async fn get_file_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Option<FileAttachment>> {
        self.record(Call::GetFile(
            message_id.to_string(),
            attachment_id.to_string(),
        ));
        let key = (message_id.to_string(), attachment_id.to_string());
        if self.unmappable_files.contains(&key) {
            let source = serde_json::from_value::<FileAttachment>(serde_json::json!({
                "@odata.type": "#microsoft.graph.itemAttachment",
                "name": "Forwarded message"
            }))
            .unwrap_err();
            return Err(HarvestError::Map(MapError::Object(source)));
        }
        Ok(self.files.get(&key).cloned())
    }

    async fn delete_message(&self, message_id: &str) -> Result<bool> {
        self.record(Call::Delete(message_id.to_string()));
        if self.erroring_deletes.contains(message_id) {
            let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            return Err(HarvestError::Gateway(GatewayError::Decode {
                url: format!("https://graph.example/messages/{}", message_id),
                source,
            }));
        }
        Ok(!self.failing_deletes.contains(message_id))
    }
}

pub fn message(id: &str, subject: &str, has_attachments: bool) -> Message {
    Message {
        id: id.to_string(),
        subject: subject.to_string(),
        has_attachments,
    }
}

pub fn attachment(id: &str, name: &str) -> Attachment {
    Attachment {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn file(name: &str, content: &[u8]) -> FileAttachment {
    FileAttachment {
        name: name.to_string(),
        content_bytes: content.to_vec(),
    }
}
