//! Recommendation assembly.
//!
//! Merges the tabular store, the knowledge base and the link table into an
//! [`AnalysisReport`]. Assembly is a pure function of the request and the three read-only
//! sources: the same request against the same sources always yields the same report.
//!
//! Every distinct selected symptom gets exactly one section, in selection order. A symptom
//! that neither source knows about still gets its (empty) section, so nothing the user
//! selected disappears from the output.

use crate::knowledge::KnowledgeBase;
use crate::links::LinkTable;
use crate::report::{AnalysisReport, KnowledgeAdvice, RecordedData, SymptomSection};
use crate::store::SymptomStore;
use crate::{AdvisorError, AdvisorResult};
use advisor_types::{NonEmptyText, Severity};

/// Validated analysis input: a non-empty, duplicate-free symptom list and one severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    symptoms: Vec<NonEmptyText>,
    severity: Severity,
}

impl AnalysisRequest {
    /// Builds a request from raw selections.
    ///
    /// Blank names are ignored and repeated names (case-insensitive) keep their first
    /// position.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidRequest` when no usable symptom remains.
    pub fn new<I, S>(symptoms: I, severity: Severity) -> AdvisorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<NonEmptyText> = Vec::new();
        for raw in symptoms {
            let Ok(name) = NonEmptyText::new(raw) else {
                continue;
            };
            if !unique.iter().any(|seen| seen.eq_ignore_case(name.as_str())) {
                unique.push(name);
            }
        }

        if unique.is_empty() {
            return Err(AdvisorError::InvalidRequest(
                "select at least one symptom".into(),
            ));
        }

        Ok(Self {
            symptoms: unique,
            severity,
        })
    }

    pub fn symptoms(&self) -> &[NonEmptyText] {
        &self.symptoms
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Borrowed view over the read-only data sources.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    knowledge: &'a KnowledgeBase,
    store: &'a SymptomStore,
    links: &'a LinkTable,
}

impl<'a> Assembler<'a> {
    pub fn new(knowledge: &'a KnowledgeBase, store: &'a SymptomStore, links: &'a LinkTable) -> Self {
        Self {
            knowledge,
            store,
            links,
        }
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let severity = request.severity();
        let sections = request
            .symptoms()
            .iter()
            .map(|symptom| self.section(symptom, severity))
            .collect::<Vec<_>>();

        for section in sections.iter().filter(|s| s.is_empty()) {
            tracing::debug!("no data for symptom '{}'", section.symptom);
        }

        let links = self.links.relevant_to(request.symptoms());

        AnalysisReport {
            severity,
            sections,
            links,
        }
    }

    fn section(&self, symptom: &NonEmptyText, severity: Severity) -> SymptomSection {
        let recorded = self.store.find(symptom.as_str()).map(|record| RecordedData {
            fields: record
                .present_fields()
                .into_iter()
                .map(|(field, value)| (field, value.to_string()))
                .collect(),
        });

        let advice = self
            .knowledge
            .get(symptom.as_str())
            .map(|entry| KnowledgeAdvice {
                medicines: entry.medicines.clone(),
                natural_remedies: entry.natural_remedies.clone(),
                lifestyle_tips: entry.lifestyle_tips.clone(),
                severity_advice: entry.advice_for(severity).to_string(),
            });

        SymptomSection {
            symptom: symptom.to_string(),
            recorded,
            advice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEVERITY_FALLBACK_ADVICE;
    use crate::knowledge::SymptomEntry;
    use crate::store::RecordField;

    const CSV: &str = "\
Symptom,Condition,Severity,Recommendation,Notes
Fever,Viral infection,,Rest and fluids,
Rash,Contact dermatitis,Mild,,Avoid new soaps
";

    fn sources() -> (KnowledgeBase, SymptomStore, LinkTable) {
        (
            KnowledgeBase::builtin(),
            SymptomStore::from_reader(CSV.as_bytes(), "test").unwrap(),
            LinkTable::builtin(),
        )
    }

    fn run(symptoms: &[&str], severity: Severity) -> AnalysisReport {
        let (kb, store, links) = sources();
        let request = AnalysisRequest::new(symptoms.iter().copied(), severity).unwrap();
        Assembler::new(&kb, &store, &links).analyze(&request)
    }

    #[test]
    fn test_empty_selection_is_invalid_request() {
        let err = AnalysisRequest::new(Vec::<String>::new(), Severity::Low).expect_err("empty");
        assert!(matches!(err, AdvisorError::InvalidRequest(_)));

        let err = AnalysisRequest::new(["  ", ""], Severity::Low).expect_err("blank");
        assert!(matches!(err, AdvisorError::InvalidRequest(_)));
    }

    #[test]
    fn test_sections_follow_selection_order() {
        let report = run(&["Headache", "Rash", "Fever", "Insomnia"], Severity::Low);
        assert_eq!(
            report.symptoms(),
            vec!["Headache", "Rash", "Fever", "Insomnia"]
        );
    }

    #[test]
    fn test_duplicates_collapse_to_first_occurrence() {
        let report = run(&["Fever", "Headache", "fever", " FEVER "], Severity::Low);
        assert_eq!(report.symptoms(), vec!["Fever", "Headache"]);
    }

    #[test]
    fn test_fever_medium_example() {
        let report = run(&["Fever"], Severity::Medium);
        let section = report.section("fever").unwrap();
        assert_eq!(section.header(), "FOR FEVER:");

        let advice = section.advice.as_ref().unwrap();
        assert_eq!(
            advice.medicines,
            vec![
                "Paracetamol (Crocin/Panadol) - 500mg every 6 hours",
                "Ibuprofen (Brufen) - 200-400mg every 6-8 hours",
            ]
        );
        assert_eq!(advice.natural_remedies.len(), 2);
        assert_eq!(advice.lifestyle_tips.len(), 2);
        assert_eq!(
            advice.severity_advice,
            "Take antipyretics if temperature > 100.4°F"
        );
    }

    #[test]
    fn test_recorded_condition_appears_verbatim() {
        let report = run(&["Fever"], Severity::Low);
        let recorded = report.sections[0].recorded.as_ref().unwrap();
        assert_eq!(
            recorded.fields,
            vec![
                (RecordField::Condition, "Viral infection".to_string()),
                (RecordField::Recommendation, "Rest and fluids".to_string()),
            ]
        );
        assert!(report.render().contains("Possible Condition: Viral infection"));
    }

    #[test]
    fn test_store_only_symptom_has_no_knowledge_advice() {
        let report = run(&["rash"], Severity::High);
        let section = &report.sections[0];
        assert!(section.recorded.is_some());
        assert!(section.advice.is_none());
    }

    #[test]
    fn test_unknown_symptom_is_kept_without_content() {
        let report = run(&["Fever", "Insomnia"], Severity::Low);
        assert_eq!(report.sections.len(), 2);

        let section = report.section("Insomnia").unwrap();
        assert!(section.is_empty());

        let text = report.render();
        let start = text.find("FOR INSOMNIA:").expect("header present");
        let tail = &text[start..];
        let end = tail.find(&"=".repeat(50)).unwrap();
        let body = &tail[..end];
        assert!(!body.contains("MEDICINES"));
        assert!(!body.contains("NATURAL REMEDIES"));
        assert!(!body.contains("LIFESTYLE TIPS"));
    }

    #[test]
    fn test_unmapped_severity_uses_fallback() {
        let kb = KnowledgeBase::from_entries([SymptomEntry::new(
            NonEmptyText::new("Cough").unwrap(),
        )
        .with_medicines(["Honey"])
        .with_severity_advice(Severity::Low, "Warm fluids")]);
        let store = SymptomStore::empty();
        let links = LinkTable::default();
        let assembler = Assembler::new(&kb, &store, &links);

        let low = assembler.analyze(&AnalysisRequest::new(["Cough"], Severity::Low).unwrap());
        let high = assembler.analyze(&AnalysisRequest::new(["Cough"], Severity::High).unwrap());

        assert_eq!(
            low.sections[0].advice.as_ref().unwrap().severity_advice,
            "Warm fluids"
        );
        assert_eq!(
            high.sections[0].advice.as_ref().unwrap().severity_advice,
            SEVERITY_FALLBACK_ADVICE
        );
    }

    #[test]
    fn test_fever_and_headache_high_example() {
        let report = run(&["Fever", "Headache"], Severity::High);
        let text = report.render();

        let fever = text.find("FOR FEVER:").unwrap();
        let headache = text.find("FOR HEADACHE:").unwrap();
        let fever_advice = text
            .find("- Seek medical attention if temperature > 103°F")
            .unwrap();
        let headache_advice = text
            .find("- Seek medical help for persistent headaches")
            .unwrap();
        let links = text.find("🔗 RELEVANT WHO RESOURCES:").unwrap();

        assert!(fever < fever_advice);
        assert!(fever_advice < headache);
        assert!(headache < headache_advice);
        assert!(headache_advice < links);
        assert_eq!(text.matches("⚠️ HIGH SEVERITY ADVICE:").count(), 2);
        assert_eq!(
            text.matches("- General Health: https://www.who.int/health-topics")
                .count(),
            1
        );
        assert!(text.contains("- Headache Disorders: "));
    }

    #[test]
    fn test_each_symptom_has_exactly_one_header() {
        let report = run(&["Fever", "Rash", "Headache"], Severity::Medium);
        let text = report.render();
        assert_eq!(text.matches("FOR FEVER").count(), 1);
        assert_eq!(text.matches("FOR RASH").count(), 1);
        assert_eq!(text.matches("FOR HEADACHE").count(), 1);
    }

    #[test]
    fn test_render_header_lines() {
        let text = run(&["Fever", "Headache"], Severity::Medium).render();
        assert!(text.starts_with(
            "=== HEALTH RECOMMENDATIONS ===\n\nAnalysis for: Fever, Headache\nSeverity Level: Medium\n\n"
        ));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let first = run(&["Headache", "Fever", "Unknown"], Severity::High);
        let second = run(&["Headache", "Fever", "Unknown"], Severity::High);
        assert_eq!(first, second);
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_report_serialises_to_json() {
        let report = run(&["Fever"], Severity::Low);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["severity"], "Low");
        assert_eq!(json["sections"][0]["symptom"], "Fever");
        assert_eq!(json["links"][0]["title"], "General Health");
    }
}
