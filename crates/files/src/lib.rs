//! Health Advisor File Storage
//!
//! This crate owns everything the advisor writes to disk:
//!
//! - Profile files: one flat YAML mapping per user profile
//! - Exported reports: plain text, PDF and JSON renderings of an analysis
//! - Medical-history attachments: documents copied into the advisor's own folder
//!
//! ## Directory Layout
//!
//! ```text
//! <data_dir>/
//! ├── user_profiles/
//! │   └── Jane_Doe.yaml
//! ├── health_reports/
//! │   ├── report_Jane_Doe_20260114_093000.txt
//! │   └── report_Jane_Doe_20260114_093000.pdf
//! └── medical_history/
//!     └── 20260114_093000_bloodwork.pdf
//! ```
//!
//! Directories are created on first write; nothing is created when a service is constructed.
//!
//! ## Example Usage
//!
//! ```no_run
//! use advisor_files::ProfileFiles;
//! use advisor_types::NonEmptyText;
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let files = ProfileFiles::new(Path::new("user_profiles"));
//! let mut fields = BTreeMap::new();
//! fields.insert("name", "Jane Doe");
//! files.save(&NonEmptyText::new("Jane Doe")?, &fields)?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod pdf;

pub use constants::{
    MEDICAL_HISTORY_DIR_NAME, PROFILES_DIR_NAME, PROFILE_FILE_EXTENSION, REPORTS_DIR_NAME,
};
pub use files::{sanitise_file_stem, AttachmentStore, ExportFormat, ProfileFiles, ReportExporter};
pub use pdf::render_pdf;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Source path does not point at a readable file
    #[error("Invalid source file: {0}")]
    InvalidSource(String),

    /// No profile file exists under the requested name
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Unrecognised export format name
    #[error("Unknown export format '{0}' (expected txt, pdf or json)")]
    UnknownFormat(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile YAML could not be written or read
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON export failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF rendering failed
    #[error("PDF error: {0}")]
    Pdf(String),
}
