//! Directory-scoped file services.
//!
//! Each service is bound to one folder and performs no I/O in its constructor. Folders are
//! created lazily on the first write so that read-only commands never touch the disk layout.
//!
//! File names derived from user input (profile names) pass through [`sanitise_file_stem`], so
//! a name can never escape its folder.

use crate::constants::{
    FALLBACK_FILE_STEM, FILE_TIMESTAMP_FORMAT, PROFILE_FILE_EXTENSION, REPORT_FILE_PREFIX,
};
use crate::FilesError;
use advisor_types::NonEmptyText;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Reduces arbitrary text to a safe file stem.
///
/// Whitespace becomes `_`, and anything outside `[A-Za-z0-9_-]` is removed.
pub fn sanitise_file_stem(text: &str) -> String {
    let stem: String = text
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    if stem.trim_matches('_').is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem
    }
}

fn ensure_dir(directory: &Path) -> Result<(), FilesError> {
    fs::create_dir_all(directory).map_err(|e| {
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create directory {}: {}", directory.display(), e),
        ))
    })
}

/// Stores user profiles as flat YAML mappings, one file per profile.
#[derive(Debug, Clone)]
pub struct ProfileFiles {
    directory: PathBuf,
}

impl ProfileFiles {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file that holds (or would hold) the named profile.
    pub fn path_for(&self, name: &NonEmptyText) -> PathBuf {
        self.directory.join(format!(
            "{}.{}",
            sanitise_file_stem(name.as_str()),
            PROFILE_FILE_EXTENSION
        ))
    }

    /// Writes `value` as YAML under the profile name, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if serialisation fails or the folder/file cannot be written.
    pub fn save<T: Serialize>(&self, name: &NonEmptyText, value: &T) -> Result<PathBuf, FilesError> {
        ensure_dir(&self.directory)?;
        let yaml = serde_yaml::to_string(value)?;
        let path = self.path_for(name);
        fs::write(&path, yaml)?;
        tracing::info!("saved profile to {}", path.display());
        Ok(path)
    }

    /// Reads the named profile back.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::ProfileNotFound` when no file exists for the name, or a YAML/I/O
    /// error when the file cannot be read or parsed.
    pub fn load<T: DeserializeOwned>(&self, name: &NonEmptyText) -> Result<T, FilesError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(FilesError::ProfileNotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Lists saved profile stems in alphabetical order.
    ///
    /// A missing folder simply means no profiles have been saved yet.
    pub fn list(&self) -> Result<Vec<String>, FilesError> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FilesError::Io(e)),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(PROFILE_FILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Output format for an exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            other => Err(FilesError::UnknownFormat(other.to_string())),
        }
    }
}

/// Writes rendered reports into the reports folder.
///
/// File names follow `report_<owner>_<YYYYmmdd_HHMMSS>.<ext>`.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    directory: PathBuf,
}

impl ReportExporter {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    pub fn report_path(&self, owner: &str, format: ExportFormat, at: NaiveDateTime) -> PathBuf {
        self.directory.join(format!(
            "{}_{}_{}.{}",
            REPORT_FILE_PREFIX,
            sanitise_file_stem(owner),
            at.format(FILE_TIMESTAMP_FORMAT),
            format.extension()
        ))
    }

    /// Writes the plain-text rendering of a report.
    pub fn export_text(
        &self,
        owner: &str,
        body: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf, FilesError> {
        self.write(owner, ExportFormat::Text, at, body.as_bytes())
    }

    /// Renders the report body into an A4 PDF and writes it.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Pdf` if the document cannot be produced.
    pub fn export_pdf(
        &self,
        owner: &str,
        title: &str,
        body: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf, FilesError> {
        let bytes = crate::pdf::render_pdf(title, body)?;
        self.write(owner, ExportFormat::Pdf, at, &bytes)
    }

    /// Writes any serialisable report as pretty-printed JSON.
    pub fn export_json<T: Serialize>(
        &self,
        owner: &str,
        value: &T,
        at: NaiveDateTime,
    ) -> Result<PathBuf, FilesError> {
        let json = serde_json::to_string_pretty(value)?;
        self.write(owner, ExportFormat::Json, at, json.as_bytes())
    }

    fn write(
        &self,
        owner: &str,
        format: ExportFormat,
        at: NaiveDateTime,
        bytes: &[u8],
    ) -> Result<PathBuf, FilesError> {
        ensure_dir(&self.directory)?;
        let path = self.report_path(owner, format, at);
        fs::write(&path, bytes).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write report to {}: {}", path.display(), e),
            ))
        })?;
        tracing::info!("exported report to {}", path.display());
        Ok(path)
    }
}

/// Copies user documents (scans, lab results) into the medical-history folder.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    directory: PathBuf,
}

impl AttachmentStore {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    /// Copies `source` into the folder as `<YYYYmmdd_HHMMSS>_<original name>`.
    ///
    /// The source file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidSource` if `source` is not a regular file, or an I/O error
    /// if the copy fails.
    pub fn attach(&self, source: &Path, at: NaiveDateTime) -> Result<PathBuf, FilesError> {
        if !source.is_file() {
            return Err(FilesError::InvalidSource(format!(
                "Not a regular file: {}",
                source.display()
            )));
        }

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .map(sanitise_file_stem)
            .unwrap_or_else(|| FALLBACK_FILE_STEM.to_string());
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", sanitise_file_stem(e)))
            .unwrap_or_default();

        ensure_dir(&self.directory)?;
        let destination = self.directory.join(format!(
            "{}_{}{}",
            at.format(FILE_TIMESTAMP_FORMAT),
            stem,
            extension
        ));
        fs::copy(source, &destination)?;
        tracing::info!(
            "attached {} as {}",
            source.display(),
            destination.display()
        );
        Ok(destination)
    }
}
