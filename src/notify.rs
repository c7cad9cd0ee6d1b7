// src/notify.rs

//! Report delivery seam.
//!
//! The orchestrator produces a report string and named log artifacts; this
//! module composes them into a [`Message`] and hands it to a [`Notifier`].
//! Actual network transport (SMTP etc.) is deliberately out of scope: the
//! shipped notifiers print to stdout or write a local outbox directory,
//! and a transport can be plugged in behind the same trait.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::EmailSettings;
use crate::engine::{Artifact, Orchestration};

/// Subject line used for every results message.
pub const SUBJECT: &str = "Test suite results [remotest]";

/// A fully composed results message, transport-agnostic.
#[derive(Debug, Clone)]
pub struct Message {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Artifact>,
}

/// Compose the final message from an orchestration's output.
pub fn compose(
    settings: &EmailSettings,
    recipients: &[String],
    orchestration: Orchestration,
) -> Message {
    Message {
        sender: settings.sender.clone(),
        recipients: recipients.to_vec(),
        subject: SUBJECT.to_string(),
        body: orchestration.report,
        attachments: orchestration.artifacts,
    }
}

/// Anything that can deliver a composed message.
pub trait Notifier {
    fn deliver(&self, message: &Message) -> Result<()>;
}

/// Prints the message to stdout and lists attachment names.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn deliver(&self, message: &Message) -> Result<()> {
        println!("From: {}", message.sender);
        println!("To: {}", message.recipients.join(", "));
        println!("Subject: {}", message.subject);
        println!();
        println!("{}", message.body);
        for attachment in &message.attachments {
            println!("[attachment: {}]", attachment.name);
        }
        Ok(())
    }
}

/// Writes the message body and every attachment into a directory.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    pub dir: PathBuf,
}

impl Notifier for OutboxNotifier {
    fn deliver(&self, message: &Message) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating outbox directory {:?}", self.dir))?;

        let body_path = self.dir.join("message.txt");
        let mut rendered = format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            message.sender,
            message.recipients.join(", "),
            message.subject,
            message.body
        );
        for attachment in &message.attachments {
            rendered.push_str(&format!("[attachment: {}]\n", attachment.name));
        }
        fs::write(&body_path, rendered)
            .with_context(|| format!("writing message to {body_path:?}"))?;

        for attachment in &message.attachments {
            let path = self.dir.join(&attachment.name);
            fs::write(&path, &attachment.contents)
                .with_context(|| format!("writing attachment to {path:?}"))?;
        }

        info!(dir = ?self.dir, attachments = message.attachments.len(), "message written to outbox");
        Ok(())
    }
}
