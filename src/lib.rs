//! Roster-driven batch certificate mailer.
//!
//! The pipeline loads a recipient roster and, for each row, validates the
//! record, resolves its attachments from a content folder, composes a
//! personalized message, and hands it to a delivery gateway. Failures are
//! isolated per row; a run always ends with an aggregate summary delivered
//! through the same gateway.

pub mod attachments;
pub mod cli;
pub mod compose;
pub mod config;
pub mod gateway;
pub mod message;
pub mod pipeline;
pub mod roster;
pub mod validate;

pub use compose::Template;
pub use config::Config;
pub use gateway::{DeliveryGateway, DeliveryResult};
pub use pipeline::{RowOutcome, RunReport, RunSummary};
pub use roster::{RecipientRecord, Roster};
