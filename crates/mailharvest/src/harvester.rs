//! Mailbox traversal: messages, attachments, downloads and deletions.
//!
//! Every entity is handled one at a time and every call is awaited before
//! the next one starts. A failure on one message or attachment is logged and
//! skipped; it never stops the traversal.

use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};

use crate::filter::ExtensionSet;
use crate::mailbox::MailApi;
use crate::models::{Attachment, Message, MESSAGE_PAGE_SIZE};
use crate::storage::FileWriter;

/// Counters describing one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    pub messages_seen: usize,
    pub messages_without_attachments: usize,
    pub attachments_ignored: usize,
    pub files_written: usize,
    pub downloads_failed: usize,
    pub messages_deleted: usize,
    pub messages_kept: usize,
    pub delete_failures: usize,
    pub mapping_errors: usize,
    /// The inbox held more messages than one page; the rest waits for the next run.
    pub truncated: bool,
}

/// What happened to a message after its attachments were processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Deleted,
    Kept,
}

pub struct Harvester<A> {
    api: A,
    extensions: ExtensionSet,
    writer: FileWriter,
}

impl<A: MailApi> Harvester<A> {
    pub fn new(api: A, extensions: ExtensionSet, writer: FileWriter) -> Self {
        Self {
            api,
            extensions,
            writer,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Walks the inbox once and returns what was done.
    pub async fn run(&self) -> HarvestReport {
        let span = info_span!("harvest", mailbox = %self.api.address());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> HarvestReport {
        let mut report = HarvestReport::default();

        info!("Mailbox \"{}\"", self.api.address());

        if self.extensions.is_empty() {
            warn!("No file extensions given; nothing will be downloaded");
        }

        let page = match self.api.list_messages().await {
            Ok(page) => page,
            Err(e) => {
                error!("Could not read the message list: {}", e);
                report.mapping_errors += 1;
                return report;
            }
        };

        if page.next_link.is_some() {
            warn!(
                "Inbox holds more than {} messages; the remainder is left for the next run",
                MESSAGE_PAGE_SIZE
            );
            report.truncated = true;
        }

        for message in &page.items {
            report.messages_seen += 1;
            let span = info_span!("message", id = %message.id);
            self.process_message(message, &mut report)
                .instrument(span)
                .await;
        }

        info!(
            "Run complete: {} messages, {} files written, {} messages deleted",
            report.messages_seen, report.files_written, report.messages_deleted
        );

        report
    }

    /// Processes a message and deletes it if any attachment was saved.
    pub async fn process_message(
        &self,
        message: &Message,
        report: &mut HarvestReport,
    ) -> MessageOutcome {
        info!("Message \"{}\"", message.subject);

        if !self.download_attachments(message, report).await {
            report.messages_kept += 1;
            return MessageOutcome::Kept;
        }

        match self.api.delete_message(&message.id).await {
            Ok(true) => {
                info!("Message \"{}\" deleted", message.subject);
                report.messages_deleted += 1;
                MessageOutcome::Deleted
            }
            Ok(false) => {
                warn!("Message \"{}\" could not be deleted", message.subject);
                report.delete_failures += 1;
                report.messages_kept += 1;
                MessageOutcome::Kept
            }
            Err(e) => {
                warn!("Message \"{}\" could not be deleted: {}", message.subject, e);
                report.delete_failures += 1;
                report.messages_kept += 1;
                MessageOutcome::Kept
            }
        }
    }

    /// Returns true if at least one attachment of `message` was written.
    async fn download_attachments(&self, message: &Message, report: &mut HarvestReport) -> bool {
        if !message.has_attachments {
            info!("No attachments available!");
            report.messages_without_attachments += 1;
            return false;
        }

        let attachments = match self.api.list_attachments(&message.id).await {
            Ok(attachments) => attachments,
            Err(e) => {
                warn!(
                    "Skipping message \"{}\": attachment list unreadable: {}",
                    message.subject, e
                );
                report.mapping_errors += 1;
                return false;
            }
        };

        let mut downloaded = false;
        for attachment in &attachments {
            // Every attachment is attempted, even after one succeeded.
            downloaded |= self.download_attachment(message, attachment, report).await;
        }
        downloaded
    }

    async fn download_attachment(
        &self,
        message: &Message,
        attachment: &Attachment,
        report: &mut HarvestReport,
    ) -> bool {
        if !self.extensions.matches(&attachment.name) {
            info!("File \"{}\" ignored", attachment.name);
            report.attachments_ignored += 1;
            return false;
        }

        let file = match self
            .api
            .get_file_attachment(&message.id, &attachment.id)
            .await
        {
            Ok(Some(file)) => file,
            Ok(None) => {
                warn!("File \"{}\" is not available", attachment.name);
                report.downloads_failed += 1;
                return false;
            }
            Err(e) => {
                warn!("File \"{}\" could not be read: {}", attachment.name, e);
                report.mapping_errors += 1;
                report.downloads_failed += 1;
                return false;
            }
        };

        if self.writer.write(&file) {
            report.files_written += 1;
            true
        } else {
            report.downloads_failed += 1;
            false
        }
    }
}
