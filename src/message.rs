//! Wire types for the delivery gateway.
//!
//! Field names follow the provider's JSON schema exactly (`HTMLPart`,
//! `Base64Content`, `ContentID`, `InlinedAttachments`), so these structs
//! serialize straight into the send payload.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::attachments::{Attachment, InlineAttachment};

/// An address/display-name pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party {
    pub email: String,
    pub name: String,
}

/// A downloadable attachment, base64-encoded for transport.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttachment {
    pub content_type: String,
    pub filename: String,
    pub base64_content: String,
}

impl MessageAttachment {
    pub fn from_attachment(attachment: &Attachment) -> Self {
        Self {
            content_type: attachment.content_type.to_string(),
            filename: attachment.filename.clone(),
            base64_content: STANDARD.encode(&attachment.content),
        }
    }
}

/// An attachment embedded in the body, referenced by content id from the
/// HTML (`cid:` URLs); distinct from the downloadable list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinedAttachment {
    pub content_type: String,
    pub filename: String,
    pub base64_content: String,
    #[serde(rename = "ContentID")]
    pub content_id: String,
}

impl InlinedAttachment {
    pub fn from_inline(inline: &InlineAttachment) -> Self {
        let encoded = MessageAttachment::from_attachment(&inline.attachment);
        Self {
            content_type: encoded.content_type,
            filename: encoded.filename,
            base64_content: encoded.base64_content,
            content_id: inline.content_id.clone(),
        }
    }
}

/// One fully composed outgoing message, consumed immediately by the
/// gateway and never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComposedMessage {
    pub from: Party,
    pub to: Vec<Party>,
    pub subject: String,
    #[serde(rename = "HTMLPart", skip_serializing_if = "Option::is_none")]
    pub html_part: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_part: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MessageAttachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inlined_attachments: Vec<InlinedAttachment>,
}

impl ComposedMessage {
    /// Plain-text message with no attachments (used for the run summary).
    pub fn text(from: Party, to: Party, subject: &str, body: &str) -> Self {
        Self {
            from,
            to: vec![to],
            subject: subject.to_string(),
            html_part: None,
            text_part: Some(body.to_string()),
            attachments: Vec::new(),
            inlined_attachments: Vec::new(),
        }
    }
}
