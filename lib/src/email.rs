use std::path::{Path, PathBuf};

use chrono::Local;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::Error;

const ATTACHMENT_MIME: &str = "application/octet-stream";

/// Splits a comma-separated argument into its trimmed, non-empty entries
pub fn split_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// An email waiting to be sent.
///
/// Addresses are validated on construction. Attachment files are only read
/// when the message is built, so every send attempt reads them afresh.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub sender: Mailbox,
    pub recipients: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

impl Outgoing {
    pub fn new<S: AsRef<str>>(
        sender: &str,
        recipients: &[S],
        subject: &str,
        body: &str,
    ) -> Result<Self, Error> {
        if recipients.is_empty() {
            return Err(Error::Address("no recipients given".to_string()));
        }

        let recipients = recipients
            .iter()
            .map(|r| r.as_ref().parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sender: sender.parse()?,
            recipients,
            subject: subject.to_string(),
            body: body.to_string(),
            attachments: Vec::new(),
        })
    }

    pub fn with_attachments<P: Into<PathBuf>>(mut self, paths: Vec<P>) -> Self {
        self.attachments = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Same message, minus the attachments
    pub fn without_attachments(&self) -> Self {
        Self {
            attachments: Vec::new(),
            ..self.clone()
        }
    }

    /// Build the MIME message: a text part followed by one part per
    /// attachment, in order.
    pub fn build(&self) -> Result<Message, Error> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(self.subject.as_str());

        for recipient in self.recipients.iter() {
            builder = builder.to(recipient.clone());
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(self.body.clone()));

        for path in self.attachments.iter() {
            parts = parts.singlepart(read_attachment(path)?);
        }

        let mut message = builder.multipart(parts)?;

        // lettre only writes UTC dates; stamp the local time instead
        message.headers_mut().insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("Date"),
            Local::now().to_rfc2822(),
        ));

        Ok(message)
    }
}

/// Declared filename of an attachment: the path with directories stripped
pub fn attachment_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

fn read_attachment(path: &Path) -> Result<SinglePart, Error> {
    let data = std::fs::read(path).map_err(|e| Error::Attachment {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })?;

    let name = attachment_name(path);
    log::debug!("Attaching {} ({} bytes)", name, data.len());

    let content_type = ContentType::parse(ATTACHMENT_MIME).map_err(|e| Error::Attachment {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })?;

    Ok(Attachment::new(name).body(data, content_type))
}
