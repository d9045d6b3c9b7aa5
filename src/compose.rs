//! Template variants and message composition.
//!
//! Each variant fixes the roster columns it needs, the attachment naming
//! plan, and the subject/body renderers; the orchestrator is parameterized
//! by the variant instead of duplicating the pipeline.

use serde::Deserialize;

use crate::attachments::AttachmentSet;
use crate::config::Config;
use crate::message::{ComposedMessage, InlinedAttachment, MessageAttachment, Party};
use crate::roster::RecipientRecord;

// Body templates compiled in; placeholders are filled by `fill`.
const CERTIFICATE_BODY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/certificate_body.html"
));
const COURSE_BODY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/course_body.html"
));

const CERTIFICATE_SUBJECT: &str = "Congratulations! Your Certificate is Ready";

/// Message template variant selected in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Single certificate document, fixed subject line.
    #[default]
    Certificate,
    /// Certificate plus scorecard and an inline logo, parameterized subject.
    Course,
}

impl Template {
    /// Roster columns that must exist for this variant (exact names,
    /// case-sensitive).
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::Certificate => &["full_name", "email", "cert_no"],
            Self::Course => &[
                "full_name",
                "email",
                "cert_no",
                "father_name",
                "course_name",
                "start_date",
                "end_date",
                "issue_date",
                "roll_no",
            ],
        }
    }

    fn subject(self, record: &RecipientRecord) -> String {
        match self {
            Self::Certificate => CERTIFICATE_SUBJECT.to_string(),
            Self::Course => format!(
                "Your {} Certificate ({})",
                record.course_name.as_deref().unwrap_or("Course"),
                record.cert_no
            ),
        }
    }

    fn body_html(self, record: &RecipientRecord, config: &Config) -> String {
        let template = match self {
            Self::Certificate => CERTIFICATE_BODY,
            Self::Course => COURSE_BODY,
        };
        fill(template, record, config)
    }
}

/// Build the outgoing message for one recipient.
///
/// Pure construction: all file and network activity happens elsewhere. The
/// variant comes from the configuration.
pub fn compose(
    record: &RecipientRecord,
    attachments: &AttachmentSet,
    config: &Config,
) -> ComposedMessage {
    ComposedMessage {
        from: Party {
            email: config.from_email.clone(),
            name: config.from_name.clone(),
        },
        to: vec![Party {
            email: record.email.clone(),
            name: record.full_name.clone(),
        }],
        subject: config.template.subject(record),
        html_part: Some(config.template.body_html(record, config)),
        text_part: None,
        attachments: attachments
            .documents
            .iter()
            .map(MessageAttachment::from_attachment)
            .collect(),
        inlined_attachments: attachments
            .inline
            .iter()
            .map(InlinedAttachment::from_inline)
            .collect(),
    }
}

// Placeholder substitution with HTML-escaped values. Placeholders a
// variant's template does not contain are simply never produced.
fn fill(template: &str, record: &RecipientRecord, config: &Config) -> String {
    let optional = |value: &Option<String>| escape_html(value.as_deref().unwrap_or(""));
    template
        .replace("{full_name}", &escape_html(&record.full_name))
        .replace("{cert_no}", &escape_html(&record.cert_no))
        .replace("{father_name}", &optional(&record.father_name))
        .replace("{course_name}", &optional(&record.course_name))
        .replace("{start_date}", &optional(&record.start_date))
        .replace("{end_date}", &optional(&record.end_date))
        .replace("{issue_date}", &optional(&record.issue_date))
        .replace("{roll_no}", &optional(&record.roll_no))
        .replace("{org_name}", &escape_html(&config.from_name))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
