//! Three-step intake wizard: profile, then metrics, then the main application.
//!
//! Steps only move forward. Submitting data for a step other than the current one is an
//! [`AdvisorError::OutOfOrderStep`].

use crate::metrics::{HealthAssessment, HealthMetrics};
use crate::profile::UserProfile;
use crate::{AdvisorError, AdvisorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Profile,
    Metrics,
    MainApp,
}

impl WizardStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Metrics => "metrics",
            Self::MainApp => "main app",
        }
    }

    /// Position shown to the user ("Step 1 of 3").
    pub const fn number(self) -> u8 {
        match self {
            Self::Profile => 1,
            Self::Metrics => 2,
            Self::MainApp => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    profile: Option<UserProfile>,
    metrics: Option<HealthMetrics>,
    assessment: Option<HealthAssessment>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Profile,
            profile: None,
            metrics: None,
            assessment: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn profile_mut(&mut self) -> Option<&mut UserProfile> {
        self.profile.as_mut()
    }

    pub fn metrics(&self) -> Option<&HealthMetrics> {
        self.metrics.as_ref()
    }

    pub fn assessment(&self) -> Option<&HealthAssessment> {
        self.assessment.as_ref()
    }

    fn expect_step(&self, wanted: WizardStep, attempted: &'static str) -> AdvisorResult<()> {
        if self.step != wanted {
            return Err(AdvisorError::OutOfOrderStep {
                actual: self.step.as_str(),
                attempted,
            });
        }
        Ok(())
    }

    /// Completes step 1.
    pub fn submit_profile(&mut self, profile: UserProfile) -> AdvisorResult<()> {
        self.expect_step(WizardStep::Profile, "a profile")?;
        tracing::debug!("profile submitted for {}", profile.name);
        self.profile = Some(profile);
        self.step = WizardStep::Metrics;
        Ok(())
    }

    /// Completes step 2, assessing the metrics against the profile's age.
    ///
    /// A failed assessment leaves the wizard on the metrics step.
    pub fn submit_metrics(&mut self, metrics: HealthMetrics) -> AdvisorResult<&HealthAssessment> {
        self.expect_step(WizardStep::Metrics, "metrics")?;
        let age = self.profile.as_ref().and_then(|p| p.age);
        let assessment = metrics.assess(age)?;

        self.metrics = Some(metrics);
        self.step = WizardStep::MainApp;
        Ok(self.assessment.insert(assessment))
    }
}
