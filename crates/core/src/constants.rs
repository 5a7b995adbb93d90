//! Constants used throughout the advisor core crate.
//!
//! File names, report markers and fallback strings live here so the loaders, the assembler
//! and the shells agree on them.

/// Default file name of the tabular symptom store, relative to the data directory.
pub const SYMPTOMS_CSV_FILENAME: &str = "symptoms_data.csv";

/// Default file name of the optional hospital table, relative to the data directory.
pub const HOSPITALS_CSV_FILENAME: &str = "hospitals.csv";

/// Default data directory when none is configured.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Severity advice used when a symptom has no entry for the requested level.
pub const SEVERITY_FALLBACK_ADVICE: &str = "Consult a doctor";

/// Title line of a rendered report.
pub const REPORT_TITLE: &str = "=== HEALTH RECOMMENDATIONS ===";

/// Width of the rule printed after each symptom section.
pub const SECTION_RULE_WIDTH: usize = 50;

/// Title used for exported PDF documents.
pub const PDF_DOCUMENT_TITLE: &str = "Health Advisor Report";

/// Country used when an emergency lookup has no specific entry.
pub const INTERNATIONAL_COUNTRY: &str = "International";

/// Cycle length assumed when none is recorded.
pub const DEFAULT_CYCLE_LENGTH_DAYS: u32 = 28;
