//! Type definitions for the Mailgun client.

pub mod attachment;
pub mod message;
pub mod options;
pub mod receipt;

pub use attachment::{Attachment, AttachmentKind, AttachmentSource};
pub use message::{Message, MessageBuilder, Recipient};
pub use options::{ProviderOptions, SendingOptions};
pub use receipt::Receipt;
