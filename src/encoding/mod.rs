//! Message body encoding.
//!
//! A [`Message`] becomes the form fields Mailgun's messages endpoint expects.
//! Messages without attachments are sent `application/x-www-form-urlencoded`;
//! as soon as one attachment is present the same fields travel as
//! `multipart/form-data` together with one file part per attachment.
//!
//! The field set is produced by [`ENCODE_STEPS`], a fixed sequence of small
//! functions. Each one checks for the presence of its input and appends
//! zero or more fields to a [`FormFields`] accumulator.

mod fields;

pub use fields::FormFields;

use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

use crate::codec::JsonCodec;
use crate::errors::DeliveryResult;
use crate::transport::{MultipartPart, RequestBody};
use crate::types::{Message, Recipient};

/// A single encoding step.
pub type EncodeStep = fn(&Message, &dyn JsonCodec, &mut FormFields) -> DeliveryResult<()>;

/// Encoding steps, applied in this order.
pub const ENCODE_STEPS: &[EncodeStep] = &[
    put_from,
    put_to,
    put_cc,
    put_bcc,
    put_subject,
    put_text,
    put_html,
    put_reply_to,
    put_headers,
    put_custom_vars,
    put_recipient_vars,
    put_tags,
    put_sending_options,
    put_template,
    put_template_variables,
];

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name (`attachment` or `inline`).
    pub field: &'static str,
    /// Original filename.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// File content.
    pub data: Bytes,
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedBody {
    /// URL-encoded form.
    UrlEncoded(FormFields),
    /// Multipart form with file parts.
    Multipart {
        /// Text fields.
        fields: FormFields,
        /// File parts, in attachment order.
        files: Vec<FilePart>,
    },
}

impl EncodedBody {
    /// Returns the `Content-Type` this body is sent with.
    pub fn content_type(&self) -> mime::Mime {
        match self {
            EncodedBody::UrlEncoded(_) => mime::APPLICATION_WWW_FORM_URLENCODED,
            EncodedBody::Multipart { .. } => mime::MULTIPART_FORM_DATA,
        }
    }

    /// Returns true for multipart bodies.
    pub fn is_multipart(&self) -> bool {
        matches!(self, EncodedBody::Multipart { .. })
    }

    /// Returns the text fields.
    pub fn fields(&self) -> &FormFields {
        match self {
            EncodedBody::UrlEncoded(fields) | EncodedBody::Multipart { fields, .. } => fields,
        }
    }

    /// Returns the file parts (empty for url-encoded bodies).
    pub fn files(&self) -> &[FilePart] {
        match self {
            EncodedBody::UrlEncoded(_) => &[],
            EncodedBody::Multipart { files, .. } => files,
        }
    }

    /// Converts into the transport's body representation.
    pub fn into_request_body(self) -> RequestBody {
        match self {
            EncodedBody::UrlEncoded(fields) => {
                RequestBody::Form(fields.to_urlencoded().into_bytes())
            }
            EncodedBody::Multipart { fields, files } => {
                let mut parts: Vec<MultipartPart> = fields
                    .into_iter()
                    .map(|(name, value)| MultipartPart::Text { name, value })
                    .collect();
                parts.extend(files.into_iter().map(|file| MultipartPart::File {
                    name: file.field.to_string(),
                    filename: file.filename,
                    content_type: file.content_type,
                    data: file.data,
                }));
                RequestBody::Multipart(parts)
            }
        }
    }
}

/// Encodes messages into request bodies.
#[derive(Clone)]
pub struct BodyEncoder {
    codec: Arc<dyn JsonCodec>,
}

impl BodyEncoder {
    /// Creates an encoder using `codec` for JSON-valued fields.
    pub fn new(codec: Arc<dyn JsonCodec>) -> Self {
        Self { codec }
    }

    /// Builds the text fields for a message.
    pub fn encode_fields(&self, message: &Message) -> DeliveryResult<FormFields> {
        let mut fields = FormFields::new();
        for step in ENCODE_STEPS {
            step(message, self.codec.as_ref(), &mut fields)?;
        }
        Ok(fields)
    }

    /// Encodes a message, loading attachment content when there is any.
    pub async fn encode(&self, message: &Message) -> DeliveryResult<EncodedBody> {
        let fields = self.encode_fields(message)?;

        if message.attachments().is_empty() {
            return Ok(EncodedBody::UrlEncoded(fields));
        }

        let mut files = Vec::with_capacity(message.attachments().len());
        for attachment in message.attachments() {
            let data = attachment.load().await?;
            files.push(FilePart {
                field: attachment.kind().field_name(),
                filename: attachment.filename().to_string(),
                content_type: attachment.content_type(),
                data,
            });
        }

        Ok(EncodedBody::Multipart { fields, files })
    }
}

impl std::fmt::Debug for BodyEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyEncoder").finish()
    }
}

fn put_from(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    fields.push("from", message.from().render());
    Ok(())
}

fn put_to(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    fields.push("to", Recipient::render_list(message.to()));
    Ok(())
}

fn put_cc(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    if !message.cc().is_empty() {
        fields.push("cc", Recipient::render_list(message.cc()));
    }
    Ok(())
}

fn put_bcc(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    if !message.bcc().is_empty() {
        fields.push("bcc", Recipient::render_list(message.bcc()));
    }
    Ok(())
}

fn put_subject(
    message: &Message,
    _: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    fields.push("subject", message.subject());
    Ok(())
}

fn put_text(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    if let Some(text) = message.text_body() {
        fields.push("text", text);
    }
    Ok(())
}

fn put_html(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    if let Some(html) = message.html_body() {
        fields.push("html", html);
    }
    Ok(())
}

// Mailgun takes the bare address here, never the display name.
fn put_reply_to(
    message: &Message,
    _: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    if let Some(reply_to) = message.reply_to() {
        fields.push("h:Reply-To", reply_to.address());
    }
    Ok(())
}

fn put_headers(
    message: &Message,
    _: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    for (name, value) in message.headers() {
        fields.push(format!("h:{}", name), value.as_str());
    }
    Ok(())
}

fn put_custom_vars(
    message: &Message,
    codec: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    for (name, value) in &message.provider_options().custom_vars {
        fields.push(format!("v:{}", name), codec.encode(value)?);
    }
    Ok(())
}

fn put_recipient_vars(
    message: &Message,
    codec: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    if let Some(vars) = &message.provider_options().recipient_vars {
        fields.push("recipient-variables", codec.encode(&Value::Object(vars.clone()))?);
    }
    Ok(())
}

fn put_tags(message: &Message, _: &dyn JsonCodec, fields: &mut FormFields) -> DeliveryResult<()> {
    for tag in &message.provider_options().tags {
        fields.push("o:tag", tag.as_str());
    }
    Ok(())
}

fn put_sending_options(
    message: &Message,
    _: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    for (name, value) in message.provider_options().sending.fields() {
        fields.push(name, value);
    }
    Ok(())
}

fn put_template(
    message: &Message,
    _: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    if let Some(template) = &message.provider_options().template {
        fields.push("template", template.as_str());
    }
    Ok(())
}

fn put_template_variables(
    message: &Message,
    codec: &dyn JsonCodec,
    fields: &mut FormFields,
) -> DeliveryResult<()> {
    if let Some(vars) = &message.provider_options().template_variables {
        fields.push("t:variables", codec.encode(&Value::Object(vars.clone()))?);
    }
    Ok(())
}
