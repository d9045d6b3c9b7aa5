//! Attachment resolution from the content folder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::compose::Template;
use crate::roster::RecipientRecord;

const CONTENT_TYPE_PDF: &str = "application/pdf";
const CONTENT_TYPE_PNG: &str = "image/png";

/// Content id the HTML body uses to reference the inline logo.
pub const LOGO_CONTENT_ID: &str = "logo";
const LOGO_FILENAME: &str = "logo.png";

/// One resolved binary document.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

/// An attachment embedded in the message body, referenced by content id.
#[derive(Debug, Clone)]
pub struct InlineAttachment {
    pub content_id: String,
    pub attachment: Attachment,
}

/// Everything attached to one recipient's message.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSet {
    pub documents: Vec<Attachment>,
    pub inline: Vec<InlineAttachment>,
}

/// Per-recipient resolution failures. `FileNotFound` skips the row;
/// anything else counts as a row failure.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("attachment not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("cannot read attachment {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locates per-recipient documents under a root folder using the naming
/// convention of the active template variant.
#[derive(Debug)]
pub struct Resolver {
    root: PathBuf,
    template: Template,
    logo: OnceLock<Vec<u8>>,
}

impl Resolver {
    pub fn new(root: &Path, template: Template) -> Self {
        Self {
            root: root.to_path_buf(),
            template,
            logo: OnceLock::new(),
        }
    }

    /// Resolve every required file for one recipient, all-or-nothing: the
    /// first missing file fails the whole recipient so nothing is partially
    /// sent. Nothing is cached between recipients except the shared logo.
    pub fn resolve(&self, record: &RecipientRecord) -> Result<AttachmentSet, ResolutionError> {
        match self.template {
            Template::Certificate => {
                let filename = format!("{}.pdf", record.cert_no);
                let content = read_required(&self.root.join(&filename))?;
                Ok(AttachmentSet {
                    documents: vec![Attachment {
                        filename,
                        content_type: CONTENT_TYPE_PDF,
                        content,
                    }],
                    inline: Vec::new(),
                })
            }
            Template::Course => {
                let stem = format!(
                    "{}_{}",
                    record.roll_no.as_deref().unwrap_or(""),
                    record.full_name
                );
                let folder = self.root.join(&stem);
                let mut documents = Vec::new();
                for kind in ["certificate", "scorecard"] {
                    let filename = format!("{stem}_{kind}.pdf");
                    let content = read_required(&folder.join(&filename))?;
                    documents.push(Attachment {
                        filename,
                        content_type: CONTENT_TYPE_PDF,
                        content,
                    });
                }
                let logo = self.logo()?;
                Ok(AttachmentSet {
                    documents,
                    inline: vec![InlineAttachment {
                        content_id: LOGO_CONTENT_ID.to_string(),
                        attachment: Attachment {
                            filename: LOGO_FILENAME.to_string(),
                            content_type: CONTENT_TYPE_PNG,
                            content: logo.to_vec(),
                        },
                    }],
                })
            }
        }
    }

    // The logo is constant across the run: loaded on first use, then shared
    // read-only.
    fn logo(&self) -> Result<&[u8], ResolutionError> {
        if let Some(bytes) = self.logo.get() {
            return Ok(bytes);
        }
        let bytes = read_required(&self.root.join(LOGO_FILENAME))?;
        Ok(self.logo.get_or_init(|| bytes))
    }
}

// Missing files are an expected, common condition; check explicitly instead
// of reading and mapping the failure afterwards.
fn read_required(path: &Path) -> Result<Vec<u8>, ResolutionError> {
    if !path.is_file() {
        return Err(ResolutionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|source| ResolutionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cert_no: &str, roll_no: Option<&str>) -> RecipientRecord {
        RecipientRecord {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.org".to_string(),
            cert_no: cert_no.to_string(),
            father_name: None,
            course_name: None,
            start_date: None,
            end_date: None,
            issue_date: None,
            roll_no: roll_no.map(str::to_string),
        }
    }

    #[test]
    fn certificate_variant_finds_document_by_number() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        fs::write(dir.path().join("007.pdf"), b"%PDF-1.4").expect("write pdf");

        let resolver = Resolver::new(dir.path(), Template::Certificate);
        let set = resolver.resolve(&record("007", None)).expect("resolve");
        assert_eq!(set.documents.len(), 1);
        assert_eq!(set.documents[0].filename, "007.pdf");
        assert_eq!(set.documents[0].content_type, "application/pdf");
        assert!(set.inline.is_empty());
    }

    #[test]
    fn missing_certificate_reports_path() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let resolver = Resolver::new(dir.path(), Template::Certificate);
        let err = resolver
            .resolve(&record("CERT-404", None))
            .expect_err("must fail");
        match err {
            ResolutionError::FileNotFound { path } => {
                assert!(path.ends_with("CERT-404.pdf"), "got {}", path.display());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn course_variant_is_all_or_nothing() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let folder = dir.path().join("R-42_Asha Rao");
        fs::create_dir(&folder).expect("mkdir");
        fs::write(folder.join("R-42_Asha Rao_certificate.pdf"), b"%PDF-1.4").expect("write");
        // Scorecard deliberately absent.
        fs::write(dir.path().join("logo.png"), b"\x89PNG").expect("write logo");

        let resolver = Resolver::new(dir.path(), Template::Course);
        let err = resolver
            .resolve(&record("CERT-001", Some("R-42")))
            .expect_err("must fail");
        match err {
            ResolutionError::FileNotFound { path } => {
                assert!(
                    path.ends_with("R-42_Asha Rao_scorecard.pdf"),
                    "got {}",
                    path.display()
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn course_variant_inlines_the_logo() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let folder = dir.path().join("R-42_Asha Rao");
        fs::create_dir(&folder).expect("mkdir");
        fs::write(folder.join("R-42_Asha Rao_certificate.pdf"), b"%PDF-1.4").expect("write");
        fs::write(folder.join("R-42_Asha Rao_scorecard.pdf"), b"%PDF-1.4").expect("write");
        fs::write(dir.path().join("logo.png"), b"\x89PNG").expect("write logo");

        let resolver = Resolver::new(dir.path(), Template::Course);
        let set = resolver
            .resolve(&record("CERT-001", Some("R-42")))
            .expect("resolve");
        assert_eq!(set.documents.len(), 2);
        assert_eq!(set.inline.len(), 1);
        assert_eq!(set.inline[0].content_id, LOGO_CONTENT_ID);
        assert_eq!(set.inline[0].attachment.content_type, "image/png");
    }

    #[test]
    fn missing_logo_skips_the_row_not_the_run() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let folder = dir.path().join("R-42_Asha Rao");
        fs::create_dir(&folder).expect("mkdir");
        fs::write(folder.join("R-42_Asha Rao_certificate.pdf"), b"%PDF-1.4").expect("write");
        fs::write(folder.join("R-42_Asha Rao_scorecard.pdf"), b"%PDF-1.4").expect("write");

        let resolver = Resolver::new(dir.path(), Template::Course);
        let err = resolver
            .resolve(&record("CERT-001", Some("R-42")))
            .expect_err("must fail");
        assert!(matches!(err, ResolutionError::FileNotFound { .. }));
    }
}
