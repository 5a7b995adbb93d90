//! # Advisor Core
//!
//! Core logic for the health advisor.
//!
//! This crate contains pure data operations:
//! - Symptom analysis that merges the static knowledge base, the optional tabular symptom
//!   store and the reference-link table into one report
//! - Health profile validation, metric classification and the intake wizard
//! - The care directory (nearby hospitals, emergency numbers)
//! - Profile, report and attachment persistence via `advisor_files`
//!
//! **No UI concerns**: prompting, menus and argument parsing belong in the binaries.

pub mod assembler;
pub mod care;
pub mod config;
pub mod constants;
mod error;
pub mod export;
pub mod knowledge;
pub mod links;
pub mod metrics;
pub mod profile;
pub mod report;
pub mod store;
pub mod validation;
pub mod wizard;

pub use assembler::{AnalysisRequest, Assembler};
pub use care::{EmergencyDirectory, EmergencyNumber, Hospital, HospitalDirectory, NearbyHospital};
pub use config::CoreConfig;
pub use error::{AdvisorError, AdvisorResult};
pub use export::ReportExport;
pub use knowledge::{KnowledgeBase, SymptomEntry};
pub use links::{LinkTable, ReferenceLink};
pub use metrics::{HealthAssessment, HealthMetrics, MetricsForm, RiskLevel};
pub use profile::{ProfileForm, ProfileService, StoredProfile, UserProfile};
pub use report::AnalysisReport;
pub use store::SymptomStore;
pub use wizard::{Wizard, WizardStep};

pub use advisor_files::ExportFormat;
pub use advisor_types::{NonEmptyText, Severity};

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A selectable symptom and which sources cover it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownSymptom {
    pub name: String,
    pub in_knowledge_base: bool,
    pub in_store: bool,
}

/// Read-only advisor service shared by both binaries.
///
/// All data sources are loaded once in [`Advisor::new`]. A source that fails to load is
/// replaced by its empty or built-in form, and the failure is kept in
/// [`Advisor::load_warnings`] for the shell to display.
#[derive(Clone, Debug)]
pub struct Advisor {
    knowledge: Arc<KnowledgeBase>,
    store: Arc<SymptomStore>,
    links: Arc<LinkTable>,
    hospitals: Arc<HospitalDirectory>,
    emergency: Arc<EmergencyDirectory>,
    warnings: Vec<String>,
}

impl Advisor {
    /// Loads every data source named in `cfg`.
    pub fn new(cfg: &CoreConfig) -> Self {
        let (store, store_warning) = SymptomStore::load_or_empty(cfg.symptoms_csv());
        let (hospitals, hospital_warning) = HospitalDirectory::load_or_builtin(cfg.hospitals_csv());

        let warnings = [store_warning, hospital_warning]
            .into_iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();

        let advisor = Self {
            warnings,
            ..Self::from_parts(KnowledgeBase::builtin(), store, LinkTable::builtin(), hospitals)
        };
        tracing::info!(
            "advisor ready: {} knowledge entries, {} recorded symptoms, {} hospitals",
            advisor.knowledge.len(),
            advisor.store.len(),
            advisor.hospitals.hospitals().len()
        );
        advisor
    }

    /// Builds the service from already-loaded sources.
    pub fn from_parts(
        knowledge: KnowledgeBase,
        store: SymptomStore,
        links: LinkTable,
        hospitals: HospitalDirectory,
    ) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
            store: Arc::new(store),
            links: Arc::new(links),
            hospitals: Arc::new(hospitals),
            emergency: Arc::new(EmergencyDirectory::builtin()),
            warnings: Vec::new(),
        }
    }

    /// Analyses a symptom selection at one severity.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidRequest` if the selection has no usable symptom.
    pub fn analyze<I, S>(&self, symptoms: I, severity: Severity) -> AdvisorResult<AnalysisReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = AnalysisRequest::new(symptoms, severity)?;
        tracing::debug!(
            "analysing {} symptoms at {} severity",
            request.symptoms().len(),
            severity
        );
        Ok(Assembler::new(&self.knowledge, &self.store, &self.links).analyze(&request))
    }

    /// Every symptom either source knows, sorted case-insensitively.
    pub fn known_symptoms(&self) -> Vec<KnownSymptom> {
        let mut known: BTreeMap<String, KnownSymptom> = BTreeMap::new();

        for entry in self.knowledge.entries() {
            known
                .entry(entry.name.as_str().to_lowercase())
                .or_insert_with(|| KnownSymptom {
                    name: entry.name.to_string(),
                    in_knowledge_base: false,
                    in_store: false,
                })
                .in_knowledge_base = true;
        }
        for record in self.store.records() {
            known
                .entry(record.symptom.as_str().to_lowercase())
                .or_insert_with(|| KnownSymptom {
                    name: record.symptom.to_string(),
                    in_knowledge_base: false,
                    in_store: false,
                })
                .in_store = true;
        }

        known.into_values().collect()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn links(&self) -> &[ReferenceLink] {
        self.links.all()
    }

    /// The reference link with the given title.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidInput` listing the known titles when none matches.
    pub fn link(&self, title: &str) -> AdvisorResult<&ReferenceLink> {
        self.links.find(title).ok_or_else(|| {
            let known: Vec<&str> = self.links.all().iter().map(|l| l.title.as_str()).collect();
            AdvisorError::InvalidInput(format!(
                "unknown link '{}' (expected one of: {})",
                title.trim(),
                known.join(", ")
            ))
        })
    }

    /// The reference link at a 1-based menu position.
    pub fn link_at(&self, number: usize) -> AdvisorResult<&ReferenceLink> {
        number
            .checked_sub(1)
            .and_then(|index| self.links.all().get(index))
            .ok_or_else(|| {
                AdvisorError::InvalidInput(format!(
                    "choose a link between 1 and {}",
                    self.links.all().len()
                ))
            })
    }

    pub fn assess_metrics(
        &self,
        metrics: &HealthMetrics,
        age: Option<u32>,
    ) -> AdvisorResult<HealthAssessment> {
        metrics.assess(age)
    }

    pub fn nearest_hospitals(
        &self,
        latitude: f64,
        longitude: f64,
        specialty: Option<&str>,
        limit: usize,
    ) -> AdvisorResult<Vec<NearbyHospital>> {
        self.hospitals.nearest(latitude, longitude, specialty, limit)
    }

    /// All known numbers, or the one for `country` (falling back to the international number).
    pub fn emergency_contacts(&self, country: Option<&str>) -> Vec<EmergencyNumber> {
        match country {
            Some(country) => vec![self.emergency.lookup(country).clone()],
            None => self.emergency.all().to_vec(),
        }
    }
}
