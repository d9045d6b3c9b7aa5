//! Shared on-disk fixtures and scripted gateways for pipeline tests.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use certmail::compose::Template;
use certmail::config::Config;
use certmail::gateway::{DeliveryGateway, DeliveryResult};
use certmail::message::ComposedMessage;
use tempfile::TempDir;

/// A roster CSV plus an attachments folder laid out in a tempdir.
pub struct Fixture {
    // Held for its Drop; the tempdir lives as long as the fixture.
    #[allow(dead_code)]
    dir: TempDir,
    pub roster_path: PathBuf,
    pub attachments_dir: PathBuf,
}

impl Fixture {
    pub fn new(roster_csv: &str) -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let roster_path = dir.path().join("roster.csv");
        fs::write(&roster_path, roster_csv).expect("write roster");
        let attachments_dir = dir.path().join("certificates");
        fs::create_dir(&attachments_dir).expect("create attachments dir");
        Self {
            dir,
            roster_path,
            attachments_dir,
        }
    }

    /// Drop a `{cert_no}.pdf` under the attachments root.
    pub fn add_certificate(&self, cert_no: &str) {
        fs::write(
            self.attachments_dir.join(format!("{cert_no}.pdf")),
            b"%PDF-1.4 fixture",
        )
        .expect("write certificate");
    }

    /// Lay out the course variant's per-recipient folder with both
    /// documents.
    pub fn add_course_documents(&self, roll_no: &str, full_name: &str) {
        let stem = format!("{roll_no}_{full_name}");
        let folder = self.attachments_dir.join(&stem);
        fs::create_dir_all(&folder).expect("create recipient folder");
        for kind in ["certificate", "scorecard"] {
            fs::write(folder.join(format!("{stem}_{kind}.pdf")), b"%PDF-1.4 fixture")
                .expect("write document");
        }
    }

    pub fn add_logo(&self) {
        fs::write(self.attachments_dir.join("logo.png"), b"\x89PNG fixture")
            .expect("write logo");
    }

    pub fn config(&self, template: Template) -> Config {
        Config {
            from_email: "sender@example.org".to_string(),
            from_name: "Registrar".to_string(),
            admin_email: Some("admin@example.org".to_string()),
            roster_path: self.roster_path.clone(),
            attachments_folder: self.attachments_dir.clone(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            template,
        }
    }
}

/// Scripted gateway: records every message it is handed and rejects the
/// addresses it was told to fail.
pub struct StubGateway {
    pub sent: RefCell<Vec<ComposedMessage>>,
    reject: Vec<String>,
}

impl StubGateway {
    pub fn accepting() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            reject: Vec::new(),
        }
    }

    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            reject: addresses.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Messages whose subject marks them as the run summary.
    pub fn summaries(&self) -> Vec<ComposedMessage> {
        self.sent
            .borrow()
            .iter()
            .filter(|m| m.subject == "Email Sending Summary")
            .cloned()
            .collect()
    }
}

impl DeliveryGateway for StubGateway {
    fn send(&self, message: &ComposedMessage) -> DeliveryResult {
        self.sent.borrow_mut().push(message.clone());
        if message.to.iter().any(|to| self.reject.contains(&to.email)) {
            DeliveryResult::Rejected {
                detail: "stubbed provider failure".to_string(),
            }
        } else {
            DeliveryResult::Delivered
        }
    }
}
