//! Static knowledge base of symptom advice.
//!
//! The knowledge base maps a symptom name to medicines, natural remedies, lifestyle tips and
//! one advice line per [`Severity`]. It is built once at startup and never mutated; lookups
//! are case-insensitive on the trimmed symptom name.

use crate::constants::SEVERITY_FALLBACK_ADVICE;
use advisor_types::{NonEmptyText, Severity};
use std::collections::BTreeMap;

/// Structured advice for one symptom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomEntry {
    pub name: NonEmptyText,
    pub medicines: Vec<String>,
    pub natural_remedies: Vec<String>,
    pub lifestyle_tips: Vec<String>,
    pub severity_advice: BTreeMap<Severity, String>,
}

impl SymptomEntry {
    pub fn new(name: NonEmptyText) -> Self {
        Self {
            name,
            medicines: Vec::new(),
            natural_remedies: Vec::new(),
            lifestyle_tips: Vec::new(),
            severity_advice: BTreeMap::new(),
        }
    }

    pub fn with_medicines<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.medicines = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_natural_remedies<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.natural_remedies = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_lifestyle_tips<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lifestyle_tips = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severity_advice(mut self, level: Severity, advice: impl Into<String>) -> Self {
        self.severity_advice.insert(level, advice.into());
        self
    }

    /// Advice for `level`, or the generic "consult a doctor" line when unmapped.
    pub fn advice_for(&self, level: Severity) -> &str {
        self.severity_advice
            .get(&level)
            .map(String::as_str)
            .unwrap_or(SEVERITY_FALLBACK_ADVICE)
    }
}

/// Immutable symptom → advice table.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: BTreeMap<String, SymptomEntry>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl KnowledgeBase {
    /// Builds a knowledge base from arbitrary entries.
    ///
    /// A later entry with the same (case-insensitive) name replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = SymptomEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (key(entry.name.as_str()), entry))
            .collect();
        Self { entries }
    }

    /// The advice shipped with the application.
    pub fn builtin() -> Self {
        Self::from_entries([fever(), headache()])
    }

    pub fn get(&self, symptom: &str) -> Option<&SymptomEntry> {
        self.entries.get(&key(symptom))
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.entries.contains_key(&key(symptom))
    }

    /// Entries ordered by lower-cased name.
    pub fn entries(&self) -> impl Iterator<Item = &SymptomEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn named(name: &'static str) -> NonEmptyText {
    NonEmptyText::new(name).expect("builtin symptom name is non-empty")
}

fn fever() -> SymptomEntry {
    SymptomEntry::new(named("Fever"))
        .with_medicines([
            "Paracetamol (Crocin/Panadol) - 500mg every 6 hours",
            "Ibuprofen (Brufen) - 200-400mg every 6-8 hours",
        ])
        .with_natural_remedies([
            "Basil leaf tea: Boil 10-15 leaves in water",
            "Ginger-honey tea: Boil 1 inch ginger, add honey",
        ])
        .with_lifestyle_tips([
            "Stay hydrated with water/electrolytes",
            "Use cool compresses on forehead",
        ])
        .with_severity_advice(Severity::Low, "Rest and monitor temperature")
        .with_severity_advice(
            Severity::Medium,
            "Take antipyretics if temperature > 100.4°F",
        )
        .with_severity_advice(
            Severity::High,
            "Seek medical attention if temperature > 103°F",
        )
}

fn headache() -> SymptomEntry {
    SymptomEntry::new(named("Headache"))
        .with_medicines([
            "Paracetamol (Crocin) - 500mg every 6 hours",
            "Aspirin (Disprin) - 325-650mg every 4 hours",
            "Ibuprofen (Advil) - 200-400mg every 6-8 hours",
        ])
        .with_natural_remedies([
            "Peppermint oil: Apply on temples",
            "Cold compress: On forehead for 15 mins",
            "Ginger tea: Anti-inflammatory properties",
        ])
        .with_lifestyle_tips([
            "Rest in dark room",
            "Reduce screen time",
            "Maintain regular sleep schedule",
        ])
        .with_severity_advice(Severity::Low, "Try relaxation techniques")
        .with_severity_advice(Severity::Medium, "Use OTC pain relievers")
        .with_severity_advice(
            Severity::High,
            "Seek medical help for persistent headaches",
        )
}
