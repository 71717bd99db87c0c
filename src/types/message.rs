//! Provider-agnostic email message.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::attachment::Attachment;
use super::options::{ProviderOptions, SendingOptions};
use crate::errors::{DeliveryError, DeliveryResult};

/// Email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipient {
    name: Option<String>,
    address: String,
}

impl Recipient {
    /// Creates a recipient from a bare address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// Creates a recipient with a display name.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    /// Returns the address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Renders `Name <address>`, or the bare address when there is no name.
    pub fn render(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.address),
            _ => self.address.clone(),
        }
    }

    /// Renders a list as a comma-separated header value.
    pub fn render_list(recipients: &[Recipient]) -> String {
        recipients
            .iter()
            .map(Recipient::render)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Recipient {
    fn from(address: &str) -> Self {
        Recipient::new(address)
    }
}

impl From<String> for Recipient {
    fn from(address: String) -> Self {
        Recipient::new(address)
    }
}

impl<N: Into<String>, A: Into<String>> From<(N, A)> for Recipient {
    fn from((name, address): (N, A)) -> Self {
        Recipient::with_name(name, address)
    }
}

/// An email to deliver.
///
/// Built once through [`Message::builder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    from: Recipient,
    to: Vec<Recipient>,
    cc: Vec<Recipient>,
    bcc: Vec<Recipient>,
    subject: String,
    text_body: Option<String>,
    html_body: Option<String>,
    reply_to: Option<Recipient>,
    headers: BTreeMap<String, String>,
    attachments: Vec<Attachment>,
    provider_options: ProviderOptions,
}

impl Message {
    /// Creates a new message builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Returns the sender.
    pub fn from(&self) -> &Recipient {
        &self.from
    }

    /// Returns the primary recipients (never empty).
    pub fn to(&self) -> &[Recipient] {
        &self.to
    }

    /// Returns the carbon-copy recipients.
    pub fn cc(&self) -> &[Recipient] {
        &self.cc
    }

    /// Returns the blind carbon-copy recipients.
    pub fn bcc(&self) -> &[Recipient] {
        &self.bcc
    }

    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the plain text body.
    pub fn text_body(&self) -> Option<&str> {
        self.text_body.as_deref()
    }

    /// Returns the HTML body.
    pub fn html_body(&self) -> Option<&str> {
        self.html_body.as_deref()
    }

    /// Returns the reply-to address.
    pub fn reply_to(&self) -> Option<&Recipient> {
        self.reply_to.as_ref()
    }

    /// Returns the custom headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the attachments in insertion order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the provider options.
    pub fn provider_options(&self) -> &ProviderOptions {
        &self.provider_options
    }

    /// Total number of addressed recipients (to + cc + bcc).
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

/// Builder for [`Message`].
#[derive(Debug, Default)]
pub struct MessageBuilder {
    from: Option<Recipient>,
    to: Vec<Recipient>,
    cc: Vec<Recipient>,
    bcc: Vec<Recipient>,
    subject: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
    reply_to: Option<Recipient>,
    headers: BTreeMap<String, String>,
    attachments: Vec<Attachment>,
    provider_options: ProviderOptions,
}

impl MessageBuilder {
    /// Sets the sender.
    pub fn from(mut self, from: impl Into<Recipient>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Adds a primary recipient.
    pub fn to(mut self, to: impl Into<Recipient>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Adds a carbon-copy recipient.
    pub fn cc(mut self, cc: impl Into<Recipient>) -> Self {
        self.cc.push(cc.into());
        self
    }

    /// Adds a blind carbon-copy recipient.
    pub fn bcc(mut self, bcc: impl Into<Recipient>) -> Self {
        self.bcc.push(bcc.into());
        self
    }

    /// Sets the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain text body.
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    /// Sets the HTML body.
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Sets the reply-to address.
    pub fn reply_to(mut self, reply_to: impl Into<Recipient>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Adds a custom header. A repeated name replaces the earlier value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds an attachment.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a custom variable, sent as `v:<name>`.
    pub fn custom_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.provider_options
            .custom_vars
            .insert(name.into(), value.into());
        self
    }

    /// Sets the per-recipient variables.
    pub fn recipient_vars(mut self, vars: Map<String, Value>) -> Self {
        self.provider_options.recipient_vars = Some(vars);
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.provider_options.tags.push(tag.into());
        self
    }

    /// Sets the `o:` sending options.
    pub fn sending_options(mut self, options: SendingOptions) -> Self {
        self.provider_options.sending = options;
        self
    }

    /// Renders a stored template instead of (or in addition to) the bodies.
    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.provider_options.template = Some(name.into());
        self
    }

    /// Sets the variables passed to the stored template.
    pub fn template_variables(mut self, vars: Map<String, Value>) -> Self {
        self.provider_options.template_variables = Some(vars);
        self
    }

    /// Replaces all provider options at once.
    pub fn provider_options(mut self, options: ProviderOptions) -> Self {
        self.provider_options = options;
        self
    }

    /// Builds the message.
    pub fn build(self) -> DeliveryResult<Message> {
        let from = self
            .from
            .ok_or_else(|| DeliveryError::validation("Sender (from) is required"))?;

        if self.to.is_empty() {
            return Err(DeliveryError::validation(
                "At least one recipient (to) is required",
            ));
        }

        let blank = std::iter::once(&from)
            .chain(&self.to)
            .chain(&self.cc)
            .chain(&self.bcc)
            .chain(&self.reply_to)
            .find(|r| r.address.trim().is_empty());
        if blank.is_some() {
            return Err(DeliveryError::validation("Email address cannot be empty"));
        }

        if let Some(attachment) = self
            .attachments
            .iter()
            .find(|a| a.content_type().parse::<mime::Mime>().is_err())
        {
            return Err(DeliveryError::Validation {
                message: format!(
                    "Attachment '{}' has invalid content type '{}'",
                    attachment.filename(),
                    attachment.content_type()
                ),
            });
        }

        if let Some(name) = self.headers.keys().find(|name| !is_header_name(name)) {
            return Err(DeliveryError::Validation {
                message: format!("Invalid header name '{}'", name),
            });
        }

        Ok(Message {
            from,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject.unwrap_or_default(),
            text_body: self.text_body,
            html_body: self.html_body,
            reply_to: self.reply_to,
            headers: self.headers,
            attachments: self.attachments,
            provider_options: self.provider_options,
        })
    }
}

// RFC 5322 field-name: printable ASCII except ':'
fn is_header_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':')
}
