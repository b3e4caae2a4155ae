//! Patient rows as read from the dataset and as fed to the classifier.

use crate::error::{DiagnosisError, Result};
use serde::Deserialize;
use std::str::FromStr;

/// Number of symptom slots per patient.
pub const SYMPTOM_SLOTS: usize = 3;

/// A single dataset row.
///
/// Empty cells deserialize to `None`. `patient_id`, `severity` and
/// `treatment_plan` are carried along but never become features: the first is
/// an identifier and the other two are only known once a diagnosis exists.
#[derive(Debug, Deserialize, Clone)]
pub struct PatientRecord {
    #[serde(rename = "Patient_ID")]
    pub patient_id: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<f64>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Symptom_1")]
    pub symptom_1: Option<String>,
    #[serde(rename = "Symptom_2")]
    pub symptom_2: Option<String>,
    #[serde(rename = "Symptom_3")]
    pub symptom_3: Option<String>,
    #[serde(rename = "Heart_Rate_bpm")]
    pub heart_rate_bpm: Option<f64>,
    #[serde(rename = "Body_Temperature_C")]
    pub body_temperature_c: Option<f64>,
    #[serde(rename = "Blood_Pressure_mmHg")]
    pub blood_pressure_mmhg: Option<String>,
    #[serde(rename = "Oxygen_Saturation_%")]
    pub oxygen_saturation: Option<f64>,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    #[serde(rename = "Severity")]
    pub severity: Option<String>,
    #[serde(rename = "Treatment_Plan")]
    pub treatment_plan: Option<String>,
}

impl PatientRecord {
    pub fn symptoms(&self) -> [Option<&str>; SYMPTOM_SLOTS] {
        [
            self.symptom_1.as_deref(),
            self.symptom_2.as_deref(),
            self.symptom_3.as_deref(),
        ]
    }

    /// Converts the row into classifier input, splitting the blood pressure
    /// field and replacing missing numbers with zero.
    pub fn to_sample(&self) -> Result<PatientSample> {
        let bp = match self.blood_pressure_mmhg.as_deref() {
            Some(raw) => raw.parse::<BloodPressure>()?,
            None => BloodPressure::default(),
        };

        Ok(PatientSample {
            age: self.age.unwrap_or(0.0),
            heart_rate_bpm: self.heart_rate_bpm.unwrap_or(0.0),
            body_temperature_c: self.body_temperature_c.unwrap_or(0.0),
            oxygen_saturation: self.oxygen_saturation.unwrap_or(0.0),
            systolic_bp: bp.systolic,
            diastolic_bp: bp.diastolic,
            gender: self.gender.clone(),
            symptoms: [
                self.symptom_1.clone(),
                self.symptom_2.clone(),
                self.symptom_3.clone(),
            ],
        })
    }
}

/// A blood pressure reading split out of its `"systolic/diastolic"` form.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

impl FromStr for BloodPressure {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || DiagnosisError::BloodPressure(s.to_string());

        let (systolic, diastolic) = s.split_once('/').ok_or_else(malformed)?;
        let systolic = systolic.trim().parse().map_err(|_| malformed())?;
        let diastolic = diastolic.trim().parse().map_err(|_| malformed())?;

        Ok(BloodPressure {
            systolic,
            diastolic,
        })
    }
}

/// One patient in the shape the feature schema consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientSample {
    pub age: f64,
    pub heart_rate_bpm: f64,
    pub body_temperature_c: f64,
    pub oxygen_saturation: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub gender: Option<String>,
    pub symptoms: [Option<String>; SYMPTOM_SLOTS],
}
