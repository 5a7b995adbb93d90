//! Core runtime configuration.
//!
//! Paths are resolved once at process startup (by the binaries, from flags and environment)
//! and then passed into core services. Nothing in the core reads environment variables.

use crate::constants::{DEFAULT_DATA_DIR, HOSPITALS_CSV_FILENAME, SYMPTOMS_CSV_FILENAME};
use crate::{AdvisorError, AdvisorResult};
use advisor_files::{MEDICAL_HISTORY_DIR_NAME, PROFILES_DIR_NAME, REPORTS_DIR_NAME};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    symptoms_csv: PathBuf,
    hospitals_csv: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `symptoms_csv` and `hospitals_csv` default to files inside `data_dir` when `None`.
    pub fn new(
        data_dir: PathBuf,
        symptoms_csv: Option<PathBuf>,
        hospitals_csv: Option<PathBuf>,
    ) -> AdvisorResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(AdvisorError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(AdvisorError::InvalidInput(format!(
                "data directory is not a directory: {}",
                data_dir.display()
            )));
        }

        let symptoms_csv = symptoms_csv.unwrap_or_else(|| data_dir.join(SYMPTOMS_CSV_FILENAME));
        let hospitals_csv = hospitals_csv.unwrap_or_else(|| data_dir.join(HOSPITALS_CSV_FILENAME));

        Ok(Self {
            data_dir,
            symptoms_csv,
            hospitals_csv,
        })
    }

    /// Build from raw optional values, as read from flags or environment variables.
    ///
    /// Blank values are treated as unset.
    pub fn from_values(
        data_dir: Option<String>,
        symptoms_csv: Option<String>,
        hospitals_csv: Option<String>,
    ) -> AdvisorResult<Self> {
        fn non_blank(value: Option<String>) -> Option<PathBuf> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        }

        Self::new(
            non_blank(data_dir).unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            non_blank(symptoms_csv),
            non_blank(hospitals_csv),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn symptoms_csv(&self) -> &Path {
        &self.symptoms_csv
    }

    pub fn hospitals_csv(&self) -> &Path {
        &self.hospitals_csv
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR_NAME)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join(PROFILES_DIR_NAME)
    }

    pub fn medical_history_dir(&self) -> PathBuf {
        self.data_dir.join(MEDICAL_HISTORY_DIR_NAME)
    }
}
