//! File attachments.

use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{DeliveryError, DeliveryResult};

/// How an attachment is presented to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentKind {
    /// Regular attachment.
    #[default]
    Attachment,
    /// Inline content, referenced from the HTML body by filename.
    Inline,
}

impl AttachmentKind {
    /// Returns the multipart field name this kind is sent under.
    pub fn field_name(&self) -> &'static str {
        match self {
            AttachmentKind::Attachment => "attachment",
            AttachmentKind::Inline => "inline",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Where attachment content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// File on disk, read when the message is encoded.
    Path(PathBuf),
    /// Content already in memory.
    Data(Bytes),
}

/// File attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    source: AttachmentSource,
    filename: String,
    kind: AttachmentKind,
    content_type: Option<String>,
}

impl Attachment {
    /// Creates an attachment read from `path`, named after the file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            source: AttachmentSource::Path(path.to_path_buf()),
            filename,
            kind: AttachmentKind::Attachment,
            content_type: None,
        }
    }

    /// Creates an attachment from in-memory content.
    pub fn from_data(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            source: AttachmentSource::Data(data.into()),
            filename: filename.into(),
            kind: AttachmentKind::Attachment,
            content_type: None,
        }
    }

    /// Overrides the filename sent to the provider.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Marks the attachment as inline.
    pub fn inline(mut self) -> Self {
        self.kind = AttachmentKind::Inline;
        self
    }

    /// Sets an explicit content type instead of guessing from the filename.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the content source.
    pub fn source(&self) -> &AttachmentSource {
        &self.source
    }

    /// Returns the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the attachment kind.
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// Returns the content type, guessed from the filename when not set.
    pub fn content_type(&self) -> String {
        match &self.content_type {
            Some(content_type) => content_type.clone(),
            None => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .to_string(),
        }
    }

    /// Loads the full attachment content.
    ///
    /// Path sources are opened, read completely and closed before this
    /// returns, on success and on failure alike.
    pub async fn load(&self) -> DeliveryResult<Bytes> {
        match &self.source {
            AttachmentSource::Data(data) => Ok(data.clone()),
            AttachmentSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| DeliveryError::Attachment {
                    filename: self.filename.clone(),
                    message: format!("failed to read {}: {}", path.display(), e),
                }),
        }
    }
}
