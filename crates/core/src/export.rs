//! Report export to the reports folder.

use crate::constants::PDF_DOCUMENT_TITLE;
use crate::profile::UserProfile;
use crate::report::AnalysisReport;
use crate::AdvisorResult;
use advisor_files::{ExportFormat, ReportExporter};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<&'a UserProfile>,
    report: &'a AnalysisReport,
}

/// Exports analysis reports, optionally headed by the user's profile.
#[derive(Debug, Clone)]
pub struct ReportExport {
    exporter: ReportExporter,
}

impl ReportExport {
    pub fn new(reports_dir: &Path) -> Self {
        Self {
            exporter: ReportExporter::new(reports_dir),
        }
    }

    /// Text body shared by the text and PDF formats.
    pub fn body(report: &AnalysisReport, profile: Option<&UserProfile>) -> String {
        let mut body = String::new();
        if let Some(profile) = profile {
            body.push_str("PATIENT PROFILE:\n");
            for line in profile.summary_lines() {
                body.push_str(&line);
                body.push('\n');
            }
            body.push('\n');
        }
        body.push_str(&report.render());
        body
    }

    pub fn export(
        &self,
        report: &AnalysisReport,
        profile: Option<&UserProfile>,
        format: ExportFormat,
        at: NaiveDateTime,
    ) -> AdvisorResult<PathBuf> {
        let owner = profile.map_or("", |p| p.name.as_str());
        Ok(match format {
            ExportFormat::Text => {
                self.exporter
                    .export_text(owner, &Self::body(report, profile), at)?
            }
            ExportFormat::Pdf => self.exporter.export_pdf(
                owner,
                PDF_DOCUMENT_TITLE,
                &Self::body(report, profile),
                at,
            )?,
            ExportFormat::Json => self
                .exporter
                .export_json(owner, &ExportDocument { profile, report }, at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{AnalysisRequest, Assembler};
    use crate::knowledge::KnowledgeBase;
    use crate::links::LinkTable;
    use crate::store::SymptomStore;
    use advisor_types::{NonEmptyText, Severity};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn report() -> AnalysisReport {
        let kb = KnowledgeBase::builtin();
        let store = SymptomStore::empty();
        let links = LinkTable::builtin();
        let request = AnalysisRequest::new(["Fever"], Severity::High).unwrap();
        Assembler::new(&kb, &store, &links).analyze(&request)
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
    }

    #[test]
    fn test_text_export_is_named_after_profile() {
        let temp = TempDir::new().unwrap();
        let export = ReportExport::new(temp.path());
        let profile = UserProfile::named(NonEmptyText::new("Jo Bloggs").unwrap());

        let path = export
            .export(&report(), Some(&profile), ExportFormat::Text, at())
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "report_Jo_Bloggs_20260304_050607.txt"
        );

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("PATIENT PROFILE:\nName: Jo Bloggs\n\n=== HEALTH RECOMMENDATIONS ==="));
        assert!(text.contains("FOR FEVER:"));
    }

    #[test]
    fn test_body_without_profile_is_plain_report() {
        let report = report();
        assert_eq!(ReportExport::body(&report, None), report.render());
    }

    #[test]
    fn test_pdf_export_writes_pdf() {
        let temp = TempDir::new().unwrap();
        let path = ReportExport::new(temp.path())
            .export(&report(), None, ExportFormat::Pdf, at())
            .unwrap();
        assert_eq!(path.extension().unwrap(), "pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_json_export_contains_report() {
        let temp = TempDir::new().unwrap();
        let path = ReportExport::new(temp.path())
            .export(&report(), None, ExportFormat::Json, at())
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["report"]["severity"], "High");
        assert!(json.get("profile").is_none());
    }
}
