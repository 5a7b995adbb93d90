//! User profiles and their persistence.
//!
//! A profile is saved together with the latest metrics as one flat YAML mapping per user
//! (see [`StoredProfile`]), in the profiles folder managed by `advisor_files`.

use crate::metrics::HealthMetrics;
use crate::validation::{validate_age, validate_blood_type, validate_contact_number};
use crate::AdvisorResult;
use advisor_files::{AttachmentStore, ProfileFiles};
use advisor_types::NonEmptyText;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw profile form values, exactly as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub location: String,
    pub medical_history: String,
    pub blood_type: String,
    pub allergies: String,
    pub emergency_contact: String,
}

/// Validated personal health profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

fn optional_text(raw: &str) -> Option<String> {
    NonEmptyText::optional(Some(raw)).map(NonEmptyText::into_inner)
}

impl UserProfile {
    /// Profile with only a name.
    pub fn named(name: NonEmptyText) -> Self {
        Self {
            name,
            age: None,
            gender: None,
            location: None,
            medical_history: None,
            medical_history_file: None,
            blood_type: None,
            allergies: None,
            emergency_contact: None,
        }
    }

    /// Validates a submitted form.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidInput` if the name is blank or the age, blood type or
    /// emergency contact are malformed.
    pub fn from_form(form: &ProfileForm) -> AdvisorResult<Self> {
        let name = NonEmptyText::new(&form.name)?;
        Ok(Self {
            age: validate_age(&form.age)?,
            gender: optional_text(&form.gender),
            location: optional_text(&form.location),
            medical_history: optional_text(&form.medical_history),
            blood_type: validate_blood_type(&form.blood_type)?,
            allergies: optional_text(&form.allergies),
            emergency_contact: validate_contact_number(&form.emergency_contact)?,
            ..Self::named(name)
        })
    }

    /// Display lines for the profile summary, skipping unset fields.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Name: {}", self.name)];
        let optional = [
            ("Age", self.age.map(|a| a.to_string())),
            ("Gender", self.gender.clone()),
            ("Location", self.location.clone()),
            ("Blood Type", self.blood_type.clone()),
            ("Allergies", self.allergies.clone()),
            ("Medical History", self.medical_history.clone()),
            (
                "Medical History File",
                self.medical_history_file
                    .as_ref()
                    .map(|p| p.display().to_string()),
            ),
            ("Emergency Contact", self.emergency_contact.clone()),
        ];
        lines.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))),
        );
        lines
    }
}

/// On-disk shape of a profile file: profile and metrics fields side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(flatten)]
    pub metrics: HealthMetrics,
    pub saved_at: NaiveDateTime,
}

/// Saves, loads and lists profiles, and attaches medical-history documents.
#[derive(Debug, Clone)]
pub struct ProfileService {
    files: ProfileFiles,
    attachments: AttachmentStore,
}

impl ProfileService {
    pub fn new(profiles_dir: &Path, medical_history_dir: &Path) -> Self {
        Self {
            files: ProfileFiles::new(profiles_dir),
            attachments: AttachmentStore::new(medical_history_dir),
        }
    }

    pub fn save(
        &self,
        profile: &UserProfile,
        metrics: &HealthMetrics,
        at: NaiveDateTime,
    ) -> AdvisorResult<PathBuf> {
        let stored = StoredProfile {
            profile: profile.clone(),
            metrics: metrics.clone(),
            saved_at: at,
        };
        Ok(self.files.save(&profile.name, &stored)?)
    }

    pub fn load(&self, name: &NonEmptyText) -> AdvisorResult<StoredProfile> {
        Ok(self.files.load(name)?)
    }

    pub fn list(&self) -> AdvisorResult<Vec<String>> {
        Ok(self.files.list()?)
    }

    /// Copies `source` into the medical-history folder and records it on the profile.
    pub fn attach_medical_history(
        &self,
        profile: &mut UserProfile,
        source: &Path,
        at: NaiveDateTime,
    ) -> AdvisorResult<PathBuf> {
        let stored = self.attachments.attach(source, at)?;
        profile.medical_history_file = Some(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BloodPressure;
    use crate::AdvisorError;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn form() -> ProfileForm {
        ProfileForm {
            name: " Jane Doe ".into(),
            age: "34".into(),
            gender: "Female".into(),
            location: "Bengaluru".into(),
            blood_type: "o+".into(),
            allergies: "".into(),
            emergency_contact: "+91 98450 00000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_form_normalises_fields() {
        let profile = UserProfile::from_form(&form()).unwrap();
        assert_eq!(profile.name.as_str(), "Jane Doe");
        assert_eq!(profile.age, Some(34));
        assert_eq!(profile.blood_type.as_deref(), Some("O+"));
        assert_eq!(profile.allergies, None);
        assert_eq!(profile.medical_history, None);
    }

    #[test]
    fn test_from_form_requires_name() {
        let mut bad = form();
        bad.name = "   ".into();
        assert!(matches!(
            UserProfile::from_form(&bad),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_form_rejects_bad_age() {
        let mut bad = form();
        bad.age = "two hundred".into();
        assert!(UserProfile::from_form(&bad).is_err());
    }

    #[test]
    fn test_summary_skips_unset_fields() {
        let profile = UserProfile::named(NonEmptyText::new("Sam").unwrap());
        assert_eq!(profile.summary_lines(), vec!["Name: Sam"]);
    }

    #[test]
    fn test_save_and_load_flat_profile() {
        let temp = TempDir::new().unwrap();
        let service = ProfileService::new(
            &temp.path().join("user_profiles"),
            &temp.path().join("medical_history"),
        );
        let profile = UserProfile::from_form(&form()).unwrap();
        let metrics = HealthMetrics {
            blood_pressure: Some(BloodPressure::new(120, 80).unwrap()),
            weight_kg: Some(61.5),
            last_period: NaiveDate::from_ymd_opt(2026, 1, 20),
            ..Default::default()
        };

        let path = service.save(&profile, &metrics, at()).unwrap();
        assert!(path.ends_with("Jane_Doe.yaml"));

        // Flat mapping: profile and metrics keys at the top level.
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(yaml.contains("name: Jane Doe"));
        assert!(yaml.contains("weight_kg: 61.5"));
        assert!(!yaml.contains("profile:"));
        assert!(!yaml.contains("metrics:"));

        let loaded = service.load(&profile.name).unwrap();
        assert_eq!(loaded.profile, profile);
        assert_eq!(loaded.metrics, metrics);
        assert_eq!(loaded.saved_at, at());
        assert_eq!(service.list().unwrap(), vec!["Jane_Doe"]);
    }

    #[test]
    fn test_load_unknown_profile() {
        let temp = TempDir::new().unwrap();
        let service = ProfileService::new(temp.path(), temp.path());
        let err = service
            .load(&NonEmptyText::new("ghost").unwrap())
            .expect_err("missing");
        assert!(matches!(err, AdvisorError::Files(_)));
    }

    #[test]
    fn test_attach_medical_history_records_path() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("xray.png");
        std::fs::write(&source, b"png").unwrap();

        let service = ProfileService::new(
            &temp.path().join("user_profiles"),
            &temp.path().join("medical_history"),
        );
        let mut profile = UserProfile::named(NonEmptyText::new("Sam").unwrap());
        let stored = service
            .attach_medical_history(&mut profile, &source, at())
            .unwrap();

        assert!(stored.starts_with(temp.path().join("medical_history")));
        assert_eq!(profile.medical_history_file, Some(stored));
    }
}
