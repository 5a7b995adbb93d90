//! Vital-sign metrics and their classification.
//!
//! Thresholds:
//!
//! | Measure | Bands |
//! |---|---|
//! | Blood pressure (mmHg) | crisis > 180/120, stage 2 ≥ 140/90, stage 1 ≥ 130/80, elevated ≥ 120 systolic, low < 90/60 |
//! | Fasting glucose (mg/dL) | low < 70, normal < 100, prediabetes < 126, diabetes otherwise |
//! | BMI (kg/m²) | underweight < 18.5, normal < 25, overweight < 30, obese otherwise |
//!
//! The overall risk level is a simple additive score over those bands plus age.

use crate::constants::DEFAULT_CYCLE_LENGTH_DAYS;
use crate::{AdvisorError, AdvisorResult};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SYSTOLIC_RANGE: std::ops::RangeInclusive<u16> = 50..=300;
const DIASTOLIC_RANGE: std::ops::RangeInclusive<u16> = 30..=200;
const CYCLE_LENGTH_RANGE: std::ops::RangeInclusive<u32> = 15..=60;
const SENIOR_AGE: u32 = 60;

/// A blood pressure reading written as `systolic/diastolic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub fn new(systolic: u16, diastolic: u16) -> AdvisorResult<Self> {
        if !SYSTOLIC_RANGE.contains(&systolic) || !DIASTOLIC_RANGE.contains(&diastolic) {
            return Err(AdvisorError::InvalidInput(format!(
                "blood pressure {systolic}/{diastolic} is outside the plausible range"
            )));
        }
        if systolic <= diastolic {
            return Err(AdvisorError::InvalidInput(
                "systolic pressure must be higher than diastolic".into(),
            ));
        }
        Ok(Self {
            systolic,
            diastolic,
        })
    }

    pub fn status(&self) -> BloodPressureStatus {
        let (sys, dia) = (self.systolic, self.diastolic);
        if sys > 180 || dia > 120 {
            BloodPressureStatus::HypertensiveCrisis
        } else if sys >= 140 || dia >= 90 {
            BloodPressureStatus::Stage2Hypertension
        } else if sys >= 130 || dia >= 80 {
            BloodPressureStatus::Stage1Hypertension
        } else if sys >= 120 {
            BloodPressureStatus::Elevated
        } else if sys < 90 || dia < 60 {
            BloodPressureStatus::Low
        } else {
            BloodPressureStatus::Normal
        }
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

impl FromStr for BloodPressure {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AdvisorError::InvalidInput(format!(
                "blood pressure '{}' must look like 120/80",
                s.trim()
            ))
        };
        let (sys, dia) = s.trim().split_once('/').ok_or_else(invalid)?;
        let systolic = sys.trim().parse::<u16>().map_err(|_| invalid())?;
        let diastolic = dia.trim().parse::<u16>().map_err(|_| invalid())?;
        Self::new(systolic, diastolic)
    }
}

impl TryFrom<String> for BloodPressure {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodPressure> for String {
    fn from(value: BloodPressure) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BloodPressureStatus {
    Low,
    Normal,
    Elevated,
    Stage1Hypertension,
    Stage2Hypertension,
    HypertensiveCrisis,
}

impl BloodPressureStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::Elevated => "Elevated",
            Self::Stage1Hypertension => "Stage 1 Hypertension",
            Self::Stage2Hypertension => "Stage 2 Hypertension",
            Self::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }

    const fn risk_points(self) -> u32 {
        match self {
            Self::HypertensiveCrisis => 3,
            Self::Stage2Hypertension => 2,
            Self::Stage1Hypertension => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GlucoseStatus {
    Low,
    Normal,
    Prediabetes,
    Diabetes,
}

impl GlucoseStatus {
    pub fn classify(fasting_mg_dl: f64) -> Self {
        if fasting_mg_dl < 70.0 {
            Self::Low
        } else if fasting_mg_dl < 100.0 {
            Self::Normal
        } else if fasting_mg_dl < 126.0 {
            Self::Prediabetes
        } else {
            Self::Diabetes
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::Prediabetes => "Prediabetes",
            Self::Diabetes => "Diabetes",
        }
    }

    const fn risk_points(self) -> u32 {
        match self {
            Self::Diabetes => 2,
            Self::Prediabetes => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }

    const fn risk_points(self) -> u32 {
        match self {
            Self::Obese => 2,
            Self::Overweight | Self::Underweight => 1,
            Self::Normal => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    fn from_score(score: u32) -> Self {
        match score {
            0 => Self::Low,
            1..=2 => Self::Moderate,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Body-mass index rounded to one decimal place.
///
/// # Errors
///
/// Returns `AdvisorError::InvalidInput` for non-positive or non-finite measurements.
pub fn bmi(weight_kg: f64, height_cm: f64) -> AdvisorResult<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(AdvisorError::InvalidInput(
            "weight must be a positive number of kilograms".into(),
        ));
    }
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(AdvisorError::InvalidInput(
            "height must be a positive number of centimetres".into(),
        ));
    }
    let metres = height_cm / 100.0;
    Ok((weight_kg / (metres * metres) * 10.0).round() / 10.0)
}

/// Raw metrics as entered by the user. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fasting_glucose_mg_dl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_period: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_length_days: Option<u32>,
}

/// Metric fields exactly as typed. Blank fields mean "not measured".
#[derive(Debug, Clone, Default)]
pub struct MetricsForm {
    pub blood_pressure: String,
    pub fasting_glucose: String,
    pub weight_kg: String,
    pub height_cm: String,
    pub last_period: String,
    pub cycle_length_days: String,
}

fn parse_optional<T: FromStr>(raw: &str, what: &str) -> AdvisorResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AdvisorError::InvalidInput(format!("{what} '{raw}' is not a valid value")))
}

impl MetricsForm {
    /// Parses the form. Dates use `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidInput` naming the first malformed field.
    pub fn parse(&self) -> AdvisorResult<HealthMetrics> {
        Ok(HealthMetrics {
            blood_pressure: parse_optional(&self.blood_pressure, "blood pressure")?,
            fasting_glucose_mg_dl: parse_optional(&self.fasting_glucose, "blood glucose")?,
            weight_kg: parse_optional(&self.weight_kg, "weight")?,
            height_cm: parse_optional(&self.height_cm, "height")?,
            last_period: parse_optional(&self.last_period, "last period date")?,
            cycle_length_days: parse_optional(&self.cycle_length_days, "cycle length")?,
        })
    }
}

/// Classified view of [`HealthMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAssessment {
    pub blood_pressure: Option<(BloodPressure, BloodPressureStatus)>,
    pub glucose: Option<(f64, GlucoseStatus)>,
    pub bmi: Option<(f64, BmiCategory)>,
    pub risk_level: RiskLevel,
    pub next_period: Option<NaiveDate>,
}

impl HealthMetrics {
    /// Classifies every recorded metric and derives the overall risk level.
    ///
    /// BMI needs both weight and height; with only one of them it is omitted.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidInput` for impossible values (negative glucose,
    /// non-positive weight or height, cycle length outside 15-60 days).
    pub fn assess(&self, age: Option<u32>) -> AdvisorResult<HealthAssessment> {
        let blood_pressure = self.blood_pressure.map(|bp| (bp, bp.status()));

        let glucose = match self.fasting_glucose_mg_dl {
            Some(value) if !(value.is_finite() && value > 0.0) => {
                return Err(AdvisorError::InvalidInput(
                    "blood glucose must be a positive number".into(),
                ))
            }
            Some(value) => Some((value, GlucoseStatus::classify(value))),
            None => None,
        };

        let bmi = match (self.weight_kg, self.height_cm) {
            (Some(w), Some(h)) => {
                let value = bmi(w, h)?;
                Some((value, BmiCategory::classify(value)))
            }
            _ => None,
        };

        let next_period = self.next_period()?;

        let score = blood_pressure.map_or(0, |(_, s)| s.risk_points())
            + glucose.map_or(0, |(_, s)| s.risk_points())
            + bmi.map_or(0, |(_, c)| c.risk_points())
            + u32::from(age.is_some_and(|a| a >= SENIOR_AGE));

        Ok(HealthAssessment {
            blood_pressure,
            glucose,
            bmi,
            risk_level: RiskLevel::from_score(score),
            next_period,
        })
    }

    /// Predicted start of the next period, if a last period is recorded.
    pub fn next_period(&self) -> AdvisorResult<Option<NaiveDate>> {
        let Some(last) = self.last_period else {
            return Ok(None);
        };
        let cycle = self.cycle_length_days.unwrap_or(DEFAULT_CYCLE_LENGTH_DAYS);
        if !CYCLE_LENGTH_RANGE.contains(&cycle) {
            return Err(AdvisorError::InvalidInput(format!(
                "cycle length must be between {} and {} days",
                CYCLE_LENGTH_RANGE.start(),
                CYCLE_LENGTH_RANGE.end()
            )));
        }
        last.checked_add_days(Days::new(u64::from(cycle)))
            .map(Some)
            .ok_or_else(|| AdvisorError::InvalidInput("period date out of range".into()))
    }
}

impl HealthAssessment {
    /// Human-readable summary lines.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some((bp, status)) = &self.blood_pressure {
            lines.push(format!("Blood Pressure: {} mmHg ({})", bp, status.label()));
        }
        if let Some((value, status)) = &self.glucose {
            lines.push(format!("Blood Sugar: {} mg/dL ({})", value, status.label()));
        }
        if let Some((value, category)) = &self.bmi {
            lines.push(format!("BMI: {:.1} ({})", value, category.label()));
        }
        if let Some(date) = &self.next_period {
            lines.push(format!("Next Period: {}", date.format("%Y-%m-%d")));
        }
        lines.push(format!("Overall Risk Level: {}", self.risk_level.label()));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(s: &str) -> BloodPressure {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_blood_pressure() {
        let reading = bp(" 120 / 80 ");
        assert_eq!(reading.systolic, 120);
        assert_eq!(reading.diastolic, 80);
        assert_eq!(reading.to_string(), "120/80");
    }

    #[test]
    fn test_metrics_form_parses_filled_fields() {
        let form = MetricsForm {
            blood_pressure: "135/85".into(),
            weight_kg: " 70 ".into(),
            last_period: "2026-01-05".into(),
            ..Default::default()
        };
        let metrics = form.parse().unwrap();
        assert_eq!(metrics.blood_pressure, Some(bp("135/85")));
        assert_eq!(metrics.weight_kg, Some(70.0));
        assert_eq!(metrics.height_cm, None);
        assert_eq!(metrics.last_period, NaiveDate::from_ymd_opt(2026, 1, 5));
    }

    #[test]
    fn test_metrics_form_names_bad_field() {
        let form = MetricsForm {
            last_period: "05/01/2026".into(),
            ..Default::default()
        };
        let err = form.parse().expect_err("bad date");
        assert!(matches!(err, AdvisorError::InvalidInput(msg) if msg.contains("last period")));
    }

    #[test]
    fn test_parse_blood_pressure_rejects_garbage() {
        for input in ["120", "abc/80", "80/120", "400/80", ""] {
            assert!(
                matches!(input.parse::<BloodPressure>(), Err(AdvisorError::InvalidInput(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_blood_pressure_bands() {
        assert_eq!(bp("185/100").status(), BloodPressureStatus::HypertensiveCrisis);
        assert_eq!(bp("150/85").status(), BloodPressureStatus::Stage2Hypertension);
        assert_eq!(bp("118/92").status(), BloodPressureStatus::Stage2Hypertension);
        assert_eq!(bp("132/78").status(), BloodPressureStatus::Stage1Hypertension);
        assert_eq!(bp("124/76").status(), BloodPressureStatus::Elevated);
        assert_eq!(bp("85/55").status(), BloodPressureStatus::Low);
        assert_eq!(bp("110/70").status(), BloodPressureStatus::Normal);
    }

    #[test]
    fn test_glucose_bands() {
        assert_eq!(GlucoseStatus::classify(65.0), GlucoseStatus::Low);
        assert_eq!(GlucoseStatus::classify(99.9), GlucoseStatus::Normal);
        assert_eq!(GlucoseStatus::classify(100.0), GlucoseStatus::Prediabetes);
        assert_eq!(GlucoseStatus::classify(126.0), GlucoseStatus::Diabetes);
    }

    #[test]
    fn test_bmi_value_and_category() {
        let value = bmi(70.0, 175.0).unwrap();
        assert_eq!(value, 22.9);
        assert_eq!(BmiCategory::classify(value), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_rejects_non_positive() {
        assert!(bmi(0.0, 170.0).is_err());
        assert!(bmi(70.0, -1.0).is_err());
        assert!(bmi(f64::NAN, 170.0).is_err());
    }

    #[test]
    fn test_assess_low_risk() {
        let metrics = HealthMetrics {
            blood_pressure: Some(bp("110/70")),
            fasting_glucose_mg_dl: Some(90.0),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..Default::default()
        };
        let assessment = metrics.assess(Some(30)).unwrap();
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.bmi, Some((22.9, BmiCategory::Normal)));
    }

    #[test]
    fn test_assess_high_risk() {
        let metrics = HealthMetrics {
            blood_pressure: Some(bp("145/92")),
            fasting_glucose_mg_dl: Some(130.0),
            ..Default::default()
        };
        let assessment = metrics.assess(None).unwrap();
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_assess_age_adds_risk() {
        let metrics = HealthMetrics::default();
        assert_eq!(metrics.assess(Some(59)).unwrap().risk_level, RiskLevel::Low);
        assert_eq!(
            metrics.assess(Some(60)).unwrap().risk_level,
            RiskLevel::Moderate
        );
    }

    #[test]
    fn test_assess_skips_bmi_without_height() {
        let metrics = HealthMetrics {
            weight_kg: Some(80.0),
            ..Default::default()
        };
        assert_eq!(metrics.assess(None).unwrap().bmi, None);
    }

    #[test]
    fn test_assess_rejects_negative_glucose() {
        let metrics = HealthMetrics {
            fasting_glucose_mg_dl: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(
            metrics.assess(None),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_next_period_prediction() {
        let metrics = HealthMetrics {
            last_period: NaiveDate::from_ymd_opt(2026, 1, 20),
            cycle_length_days: Some(30),
            ..Default::default()
        };
        assert_eq!(
            metrics.next_period().unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 19)
        );

        let default_cycle = HealthMetrics {
            last_period: NaiveDate::from_ymd_opt(2026, 1, 20),
            ..Default::default()
        };
        assert_eq!(
            default_cycle.next_period().unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 17)
        );
    }

    #[test]
    fn test_next_period_rejects_implausible_cycle() {
        let metrics = HealthMetrics {
            last_period: NaiveDate::from_ymd_opt(2026, 1, 20),
            cycle_length_days: Some(90),
            ..Default::default()
        };
        assert!(metrics.next_period().is_err());
    }

    #[test]
    fn test_summary_lines() {
        let metrics = HealthMetrics {
            blood_pressure: Some(bp("132/78")),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..Default::default()
        };
        let lines = metrics.assess(None).unwrap().summary_lines();
        assert_eq!(
            lines,
            vec![
                "Blood Pressure: 132/78 mmHg (Stage 1 Hypertension)",
                "BMI: 22.9 (Normal)",
                "Overall Risk Level: Moderate",
            ]
        );
    }

    #[test]
    fn test_blood_pressure_serialises_as_text() {
        let metrics = HealthMetrics {
            blood_pressure: Some(bp("120/80")),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&metrics).unwrap();
        assert!(yaml.contains("120/80"));
        let back: HealthMetrics = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, metrics);
    }
}
