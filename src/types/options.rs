//! Mailgun-specific message options.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Provider options attached to a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOptions {
    /// Custom variables, sent as `v:<name>` with a JSON-encoded value.
    pub custom_vars: BTreeMap<String, Value>,
    /// Per-recipient substitutions for batch sending, sent as `recipient-variables`.
    pub recipient_vars: Option<Map<String, Value>>,
    /// Tags, sent as one `o:tag` field each.
    pub tags: Vec<String>,
    /// `o:` sending options.
    pub sending: SendingOptions,
    /// Name of a stored template to render, sent as `template`.
    pub template: Option<String>,
    /// Variables for the stored template, sent as `t:variables`.
    pub template_variables: Option<Map<String, Value>>,
}

/// Delivery-time switches Mailgun accepts as `o:` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendingOptions {
    /// Accept the message without delivering it (`o:testmode`).
    pub test_mode: Option<bool>,
    /// Toggle all tracking (`o:tracking`).
    pub tracking: Option<bool>,
    /// Toggle click tracking (`o:tracking-clicks`).
    pub tracking_clicks: Option<bool>,
    /// Toggle open tracking (`o:tracking-opens`).
    pub tracking_opens: Option<bool>,
    /// Toggle DKIM signing (`o:dkim`).
    pub dkim: Option<bool>,
    /// Scheduled delivery time (`o:deliverytime`, RFC 2822).
    pub delivery_time: Option<DateTime<Utc>>,
}

impl SendingOptions {
    /// Returns the `o:` fields for every option that is set.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let flags = [
            ("o:testmode", self.test_mode),
            ("o:tracking", self.tracking),
            ("o:tracking-clicks", self.tracking_clicks),
            ("o:tracking-opens", self.tracking_opens),
            ("o:dkim", self.dkim),
        ];

        let mut fields: Vec<(&'static str, String)> = flags
            .into_iter()
            .filter_map(|(name, flag)| flag.map(|on| (name, yes_no(on).to_string())))
            .collect();

        if let Some(at) = self.delivery_time {
            fields.push(("o:deliverytime", at.to_rfc2822()));
        }

        fields
    }
}

fn yes_no(on: bool) -> &'static str {
    if on {
        "yes"
    } else {
        "no"
    }
}
