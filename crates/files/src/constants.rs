//! Folder and file naming constants.

/// Folder holding one YAML file per saved profile.
pub const PROFILES_DIR_NAME: &str = "user_profiles";

/// Folder holding exported reports.
pub const REPORTS_DIR_NAME: &str = "health_reports";

/// Folder holding attached medical-history documents.
pub const MEDICAL_HISTORY_DIR_NAME: &str = "medical_history";

/// Extension used for profile files.
pub const PROFILE_FILE_EXTENSION: &str = "yaml";

/// Prefix for exported report files.
pub(crate) const REPORT_FILE_PREFIX: &str = "report";

/// Timestamp layout used in generated file names.
pub(crate) const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Stem used when sanitising leaves nothing usable.
pub(crate) const FALLBACK_FILE_STEM: &str = "anonymous";
