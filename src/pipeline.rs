//! Batch orchestration: the per-row state machine and run-level counters.

use tracing::{debug, error, info, warn};

use crate::attachments::{ResolutionError, Resolver};
use crate::compose::compose;
use crate::config::Config;
use crate::gateway::{DeliveryGateway, DeliveryResult};
use crate::message::{ComposedMessage, Party};
use crate::roster::{RecipientRecord, Roster};
use crate::validate::{validate, ValidationError};

/// Terminal state of one roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Delivered by the gateway.
    Sent,
    /// Rejected before any file or network activity.
    SkippedInvalid(ValidationError),
    /// A required attachment file was absent.
    SkippedMissingFiles { path: String },
    /// The gateway refused the message, or an unexpected error hit the row.
    Failed { detail: String },
}

/// Aggregate counters, finalized once after the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Body of the administrative summary message.
    pub fn report_text(&self) -> String {
        format!(
            "Total emails: {}\nSent: {}\nFailed: {}",
            self.total, self.sent, self.failed
        )
    }
}

/// Everything a finished run reports back to the caller.
#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Per-row outcomes in roster order.
    pub outcomes: Vec<RowOutcome>,
    /// Whether the summary message itself was accepted by the gateway.
    pub summary_delivered: bool,
}

/// Drive the full batch: validate, resolve, compose, and send each row in
/// roster order, then deliver the aggregate summary through the same
/// gateway.
///
/// Row failures never abort the batch: every error is caught at row scope,
/// logged with the recipient's identity and record key, and processing
/// moves to the next row.
pub fn run(
    config: &Config,
    roster: &Roster,
    resolver: &Resolver,
    gateway: &dyn DeliveryGateway,
) -> RunReport {
    let total = roster.len();
    let mut sent = 0usize;
    let mut outcomes = Vec::with_capacity(total);

    for (row, record) in roster.iter().enumerate() {
        let outcome = process_row(config, resolver, gateway, record);
        if matches!(outcome, RowOutcome::Sent) {
            sent += 1;
        }
        debug!(processed = row + 1, total, "roster progress");
        outcomes.push(outcome);
    }

    let summary = RunSummary {
        total,
        sent,
        failed: total - sent,
    };
    info!(
        total = summary.total,
        sent = summary.sent,
        failed = summary.failed,
        "batch complete"
    );

    let summary_delivered = send_summary(config, gateway, &summary);
    RunReport {
        summary,
        outcomes,
        summary_delivered,
    }
}

fn process_row(
    config: &Config,
    resolver: &Resolver,
    gateway: &dyn DeliveryGateway,
    record: &RecipientRecord,
) -> RowOutcome {
    if let Err(err) = validate(record, config.template) {
        error!(
            recipient = %record.full_name,
            email = %record.email,
            key = %record.key(),
            %err,
            "row skipped: invalid record"
        );
        return RowOutcome::SkippedInvalid(err);
    }

    let attachments = match resolver.resolve(record) {
        Ok(set) => set,
        Err(ResolutionError::FileNotFound { path }) => {
            warn!(
                recipient = %record.full_name,
                key = %record.key(),
                path = %path.display(),
                "row skipped: missing attachment"
            );
            return RowOutcome::SkippedMissingFiles {
                path: path.display().to_string(),
            };
        }
        Err(err) => {
            error!(
                recipient = %record.full_name,
                key = %record.key(),
                %err,
                "row failed: attachment error"
            );
            return RowOutcome::Failed {
                detail: err.to_string(),
            };
        }
    };

    let message = compose(record, &attachments, config);
    match gateway.send(&message) {
        DeliveryResult::Delivered => {
            info!(email = %record.email, key = %record.key(), "email sent");
            RowOutcome::Sent
        }
        DeliveryResult::Rejected { detail } => {
            error!(
                recipient = %record.full_name,
                email = %record.email,
                key = %record.key(),
                detail = %detail,
                "row failed: gateway rejected message"
            );
            RowOutcome::Failed { detail }
        }
    }
}

// The batch is already complete when this runs; a rejected summary is
// logged and dropped, never retried.
fn send_summary(config: &Config, gateway: &dyn DeliveryGateway, summary: &RunSummary) -> bool {
    let message = ComposedMessage::text(
        Party {
            email: config.from_email.clone(),
            name: config.from_name.clone(),
        },
        Party {
            email: config.summary_recipient().to_string(),
            name: "Administrator".to_string(),
        },
        "Email Sending Summary",
        &summary.report_text(),
    );
    match gateway.send(&message) {
        DeliveryResult::Delivered => true,
        DeliveryResult::Rejected { detail } => {
            warn!(detail = %detail, "summary message not delivered");
            false
        }
    }
}

/// Row counts from a non-sending preflight over the roster.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    pub total: usize,
    pub ready: usize,
    pub invalid: usize,
    pub missing_files: usize,
}

/// Validate and resolve every row without composing or sending anything.
pub fn audit(config: &Config, roster: &Roster, resolver: &Resolver) -> AuditReport {
    let mut report = AuditReport {
        total: roster.len(),
        ..AuditReport::default()
    };
    for record in roster.iter() {
        if let Err(err) = validate(record, config.template) {
            warn!(
                recipient = %record.full_name,
                email = %record.email,
                %err,
                "row not ready: invalid record"
            );
            report.invalid += 1;
            continue;
        }
        match resolver.resolve(record) {
            Ok(_) => report.ready += 1,
            Err(err) => {
                warn!(
                    recipient = %record.full_name,
                    key = %record.key(),
                    %err,
                    "row not ready: attachment problem"
                );
                report.missing_files += 1;
            }
        }
    }
    info!(
        total = report.total,
        ready = report.ready,
        invalid = report.invalid,
        missing_files = report.missing_files,
        "roster check complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_report_text_shape() {
        let summary = RunSummary {
            total: 3,
            sent: 1,
            failed: 2,
        };
        assert_eq!(
            summary.report_text(),
            "Total emails: 3\nSent: 1\nFailed: 2"
        );
    }
}
