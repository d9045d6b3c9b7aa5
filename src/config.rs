//! Run configuration, loaded once at startup and passed by reference.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::compose::Template;

/// Sender identity, credentials, and input paths for one run.
///
/// Deserialized from a JSON file before the pipeline starts; there is no
/// ambient configuration state. The aliases accept the older flat config
/// spelling (`excel_file`, `mailjet_api_key`, `mailjet_api_secret`).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sender address placed on every outgoing message.
    pub from_email: String,
    /// Sender display name, also used as the issuing organization in bodies.
    pub from_name: String,
    /// Recipient of the end-of-run summary; defaults to the sender.
    #[serde(default)]
    pub admin_email: Option<String>,
    /// Roster file with a header row and one recipient per row.
    #[serde(alias = "excel_file")]
    pub roster_path: PathBuf,
    /// Root folder holding per-recipient documents.
    pub attachments_folder: PathBuf,
    /// Gateway API key.
    #[serde(alias = "mailjet_api_key")]
    pub api_key: String,
    /// Gateway API secret.
    #[serde(alias = "mailjet_api_secret")]
    pub api_secret: String,
    /// Template variant driving required columns, attachments, and body.
    #[serde(default)]
    pub template: Template,
}

impl Config {
    /// Read and validate a configuration file. Any problem here is fatal:
    /// nothing has been sent yet.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Recipient of the end-of-run summary message.
    pub fn summary_recipient(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(&self.from_email)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("from_email", &self.from_email),
            ("from_name", &self.from_name),
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                bail!("config field {name} must not be empty");
            }
        }
        Ok(())
    }
}
