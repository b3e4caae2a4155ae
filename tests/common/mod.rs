#![allow(dead_code)]

use diagnosis_predictor::{DiagnosisModel, PatientSample};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "Patient_ID,Age,Gender,Symptom_1,Symptom_2,Symptom_3,Heart_Rate_bpm,Body_Temperature_C,Blood_Pressure_mmHg,Oxygen_Saturation_%,Diagnosis,Severity,Treatment_Plan";

pub fn dataset_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/disease_diagnosis.csv")
}

pub fn bundled_model() -> DiagnosisModel {
    DiagnosisModel::from_csv(&dataset_path()).unwrap()
}

/// Trains on CSV rows given without the header line.
pub fn model_from_rows(rows: &[&str]) -> DiagnosisModel {
    let mut data = String::from(HEADER);
    for row in rows {
        data.push('\n');
        data.push_str(row);
    }
    data.push('\n');
    DiagnosisModel::from_reader(data.as_bytes()).unwrap()
}

pub fn sample(gender: &str, symptoms: [&str; 3]) -> PatientSample {
    PatientSample {
        age: 40.0,
        heart_rate_bpm: 80.0,
        body_temperature_c: 37.0,
        oxygen_saturation: 97.0,
        systolic_bp: 120.0,
        diastolic_bp: 80.0,
        gender: Some(gender.to_string()),
        symptoms: symptoms.map(|s| (!s.is_empty()).then(|| s.to_string())),
    }
}
