//! Feature layout shared by training and inference.
//!
//! The schema fixes the column order once, from the training vocabularies, so
//! that a single submitted form encodes to a row the fitted tree can read
//! positionally. Categorical attributes are one-hot encoded into columns named
//! `<attribute>_<value>`; a row starts at zero and only the columns matching
//! the sample are filled in.

use crate::record::{PatientRecord, PatientSample, SYMPTOM_SLOTS};
use ndarray::{Array1, ArrayViewMut1};
use std::collections::{BTreeMap, BTreeSet};

/// Numeric columns, in dataset order with the split blood pressure last.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "Age",
    "Heart_Rate_bpm",
    "Body_Temperature_C",
    "Oxygen_Saturation_%",
    "Systolic_BP",
    "Diastolic_BP",
];

pub const GENDER_ATTRIBUTE: &str = "Gender";
pub const SYMPTOM_ATTRIBUTES: [&str; SYMPTOM_SLOTS] = ["Symptom_1", "Symptom_2", "Symptom_3"];

/// Sorted distinct categorical values seen in the training data.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub genders: Vec<String>,
    /// Values from all three symptom slots.
    pub symptoms: Vec<String>,
}

impl Vocabulary {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        let mut genders = BTreeSet::new();
        let mut symptoms = BTreeSet::new();

        for r in records {
            if let Some(g) = r.gender.as_deref() {
                genders.insert(g);
            }
            for s in r.symptoms().into_iter().flatten() {
                symptoms.insert(s);
            }
        }

        Vocabulary {
            genders: genders.into_iter().map(String::from).collect(),
            symptoms: symptoms.into_iter().map(String::from).collect(),
        }
    }
}

fn indicator(attribute: &str, value: &str) -> String {
    format!("{attribute}_{value}")
}

/// A sample encoded against a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow {
    pub values: Array1<f64>,
    /// Indicator columns the sample asked for that the schema does not have.
    pub unseen: Vec<String>,
}

/// Ordered feature columns plus a name index.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl FeatureSchema {
    /// Numeric columns first, then `Gender_*`, then every symptom slot over
    /// the full symptom vocabulary, so any value offered by the form has a
    /// column regardless of which slot it was seen in during training.
    pub fn new(vocab: &Vocabulary) -> Self {
        let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();

        columns.extend(vocab.genders.iter().map(|g| indicator(GENDER_ATTRIBUTE, g)));
        for attribute in SYMPTOM_ATTRIBUTES {
            columns.extend(vocab.symptoms.iter().map(|s| indicator(attribute, s)));
        }

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        FeatureSchema { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Encodes a sample into a fresh zero row of schema width.
    pub fn encode(&self, sample: &PatientSample) -> EncodedRow {
        let mut values = Array1::zeros(self.len());
        let unseen = self.encode_into(sample, values.view_mut());
        EncodedRow { values, unseen }
    }

    /// Writes a sample into `row`, which must be zeroed and of schema width.
    /// Returns the indicator columns that had no slot.
    pub fn encode_into(&self, sample: &PatientSample, mut row: ArrayViewMut1<f64>) -> Vec<String> {
        let numeric = [
            sample.age,
            sample.heart_rate_bpm,
            sample.body_temperature_c,
            sample.oxygen_saturation,
            sample.systolic_bp,
            sample.diastolic_bp,
        ];
        // Numeric columns always occupy the first positions.
        for (i, v) in numeric.into_iter().enumerate() {
            row[i] = v;
        }

        let categorical = std::iter::once((GENDER_ATTRIBUTE, sample.gender.as_deref())).chain(
            SYMPTOM_ATTRIBUTES
                .into_iter()
                .zip(sample.symptoms.iter().map(Option::as_deref)),
        );

        let mut unseen = Vec::new();
        for (attribute, value) in categorical {
            let Some(value) = value else { continue };
            let column = indicator(attribute, value);
            match self.index.get(&column) {
                Some(&i) => row[i] = 1.0,
                None => unseen.push(column),
            }
        }
        unseen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary {
            genders: vec!["F".into(), "M".into()],
            symptoms: vec!["Cough".into(), "Fever".into()],
        }
    }

    fn sample(gender: &str, symptoms: [Option<&str>; 3]) -> PatientSample {
        PatientSample {
            age: 30.0,
            heart_rate_bpm: 70.0,
            body_temperature_c: 36.6,
            oxygen_saturation: 99.0,
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            gender: Some(gender.into()),
            symptoms: symptoms.map(|s| s.map(String::from)),
        }
    }

    #[test]
    fn column_layout_is_numeric_then_indicators() {
        let schema = FeatureSchema::new(&vocab());
        assert_eq!(
            schema.columns(),
            [
                "Age",
                "Heart_Rate_bpm",
                "Body_Temperature_C",
                "Oxygen_Saturation_%",
                "Systolic_BP",
                "Diastolic_BP",
                "Gender_F",
                "Gender_M",
                "Symptom_1_Cough",
                "Symptom_1_Fever",
                "Symptom_2_Cough",
                "Symptom_2_Fever",
                "Symptom_3_Cough",
                "Symptom_3_Fever",
            ]
        );
    }

    #[test]
    fn encodes_numbers_and_indicators() {
        let schema = FeatureSchema::new(&vocab());
        let row = schema.encode(&sample("M", [Some("Fever"), None, Some("Cough")]));

        assert!(row.unseen.is_empty());
        assert_eq!(row.values.len(), schema.len());
        assert_eq!(row.values[0], 30.0);
        assert_eq!(row.values[4], 120.0);
        assert_eq!(row.values[5], 80.0);
        assert_eq!(row.values[schema.position("Gender_M").unwrap()], 1.0);
        assert_eq!(row.values[schema.position("Gender_F").unwrap()], 0.0);
        assert_eq!(row.values[schema.position("Symptom_1_Fever").unwrap()], 1.0);
        assert_eq!(row.values[schema.position("Symptom_3_Cough").unwrap()], 1.0);
        assert_eq!(row.values.iter().filter(|&&v| v == 1.0).count(), 3);
    }

    #[test]
    fn unseen_values_are_zero_filled() {
        let schema = FeatureSchema::new(&vocab());
        let row = schema.encode(&sample("X", [Some("Rash"), Some("Fever"), None]));

        assert_eq!(row.values.len(), schema.len());
        assert_eq!(row.unseen, ["Gender_X", "Symptom_1_Rash"]);
        assert_eq!(row.values.slice(ndarray::s![6..8]).sum(), 0.0);
        assert_eq!(row.values[schema.position("Symptom_2_Fever").unwrap()], 1.0);
    }

    #[test]
    fn vocabulary_is_sorted_and_distinct() {
        let data = "\
Patient_ID,Age,Gender,Symptom_1,Symptom_2,Symptom_3,Heart_Rate_bpm,Body_Temperature_C,Blood_Pressure_mmHg,Oxygen_Saturation_%,Diagnosis,Severity,Treatment_Plan
1,30,M,Headache,Cough,,70,36.8,120/80,98,Cold,Mild,Rest
2,40,F,Cough,Fever,Body ache,95,38.9,130/85,94,Flu,Moderate,Antivirals
3,50,M,Fever,,,90,38.2,125/82,95,Flu,Mild,Rest
";
        let records: Vec<PatientRecord> = csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        let vocab = Vocabulary::from_records(&records);

        assert_eq!(vocab.genders, ["F", "M"]);
        assert_eq!(vocab.symptoms, ["Body ache", "Cough", "Fever", "Headache"]);
    }
}
