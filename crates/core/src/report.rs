//! Analysis report types and their plain-text rendering.
//!
//! A report holds one [`SymptomSection`] per distinct selected symptom, in selection order,
//! followed by the reference links relevant to the whole selection.
//!
//! Text layout produced by [`AnalysisReport::render`]:
//!
//! ```text
//! === HEALTH RECOMMENDATIONS ===
//!
//! Analysis for: Fever, Headache
//! Severity Level: High
//!
//! FOR FEVER:
//! 📋 RECORDED DATA:
//! Possible Condition: Viral infection
//!
//! 💊 MEDICINES:
//! - ...
//!
//! 🌿 NATURAL REMEDIES:
//! - ...
//!
//! 🏡 LIFESTYLE TIPS:
//! - ...
//!
//! ⚠️ HIGH SEVERITY ADVICE:
//! - ...
//!
//! ==================================================
//!
//! 🔗 RELEVANT WHO RESOURCES:
//! - General Health: https://www.who.int/health-topics
//! ```

use crate::constants::{REPORT_TITLE, SECTION_RULE_WIDTH};
use crate::links::ReferenceLink;
use crate::store::RecordField;
use crate::{AdvisorError, AdvisorResult};
use advisor_types::Severity;
use serde::Serialize;
use std::fmt;

/// Fields taken from the tabular store for one symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedData {
    pub fields: Vec<(RecordField, String)>,
}

/// Knowledge-base advice for one symptom at the requested severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeAdvice {
    pub medicines: Vec<String>,
    pub natural_remedies: Vec<String>,
    pub lifestyle_tips: Vec<String>,
    pub severity_advice: String,
}

/// Everything known about one selected symptom.
///
/// Both parts are optional: a symptom unknown to every source still gets a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomSection {
    pub symptom: String,
    pub recorded: Option<RecordedData>,
    pub advice: Option<KnowledgeAdvice>,
}

impl SymptomSection {
    pub fn header(&self) -> String {
        format!("FOR {}:", self.symptom.to_uppercase())
    }

    /// True when neither the store nor the knowledge base contributed anything.
    pub fn is_empty(&self) -> bool {
        self.recorded.is_none() && self.advice.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub severity: Severity,
    pub sections: Vec<SymptomSection>,
    pub links: Vec<ReferenceLink>,
}

impl AnalysisReport {
    /// Symptom names in report order.
    pub fn symptoms(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.symptom.as_str()).collect()
    }

    pub fn section(&self, symptom: &str) -> Option<&SymptomSection> {
        let wanted = symptom.trim().to_lowercase();
        self.sections
            .iter()
            .find(|s| s.symptom.to_lowercase() == wanted)
    }

    pub fn to_json(&self) -> AdvisorResult<String> {
        serde_json::to_string_pretty(self).map_err(AdvisorError::Serialization)
    }

    /// Plain-text rendering for display and text export.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, section: &SymptomSection) -> fmt::Result {
        writeln!(f, "{}", section.header())?;

        if let Some(recorded) = &section.recorded {
            writeln!(f, "📋 RECORDED DATA:")?;
            for (field, value) in &recorded.fields {
                writeln!(f, "{}: {}", field.label(), value)?;
            }
        }

        if let Some(advice) = &section.advice {
            let lists = [
                ("💊 MEDICINES:", &advice.medicines),
                ("🌿 NATURAL REMEDIES:", &advice.natural_remedies),
                ("🏡 LIFESTYLE TIPS:", &advice.lifestyle_tips),
            ];
            for (label, items) in lists {
                if items.is_empty() {
                    continue;
                }
                writeln!(f, "\n{label}")?;
                for item in items {
                    writeln!(f, "- {item}")?;
                }
            }

            writeln!(
                f,
                "\n⚠️ {} SEVERITY ADVICE:\n- {}",
                self.severity.as_str().to_uppercase(),
                advice.severity_advice
            )?;
        }

        writeln!(f, "\n{}\n", "=".repeat(SECTION_RULE_WIDTH))
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}\n")?;
        writeln!(f, "Analysis for: {}", self.symptoms().join(", "))?;
        writeln!(f, "Severity Level: {}\n", self.severity)?;

        for section in &self.sections {
            self.write_section(f, section)?;
        }

        if !self.links.is_empty() {
            writeln!(f, "🔗 RELEVANT WHO RESOURCES:")?;
            for link in &self.links {
                writeln!(f, "- {}: {}", link.title, link.url)?;
            }
        }
        Ok(())
    }
}
