//! # diagnosis-predictor 🩺
//!
//! Predict a preliminary diagnosis from patient vitals and symptoms using a decision tree.
//!
//! The model is trained once from a CSV dataset (see [`PatientRecord`] for the columns). Blood
//! pressure is split into systolic/diastolic, gender and the three symptom slots are one-hot
//! encoded through a fixed [`FeatureSchema`], and the diagnosis is label-encoded before fitting a
//! [`linfa-trees`](https://crates.io/crates/linfa-trees) decision tree on the whole dataset.
//!
//! ## Features
//! - Explicit feature schema shared by training and inference
//! - Gini decision tree classifier
//! - Label encoding of diagnoses
//! - Training accuracy and feature importance reporting
//! - A small axum web form in front of the model (see [`web`])
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//! use diagnosis_predictor::{DiagnosisModel, PatientSample};
//! let model = DiagnosisModel::from_csv(Path::new("data/disease_diagnosis.csv")).unwrap();
//! let sample = PatientSample {
//!     age: 34.0,
//!     heart_rate_bpm: 102.0,
//!     body_temperature_c: 39.1,
//!     oxygen_saturation: 95.0,
//!     systolic_bp: 118.0,
//!     diastolic_bp: 76.0,
//!     gender: Some("Female".into()),
//!     symptoms: [Some("Fever".into()), Some("Cough".into()), None],
//! };
//! println!("Diagnosis: {}", model.predict(&sample).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod record;
pub mod schema;
pub mod web;

pub use error::{DiagnosisError, Result};
pub use labels::LabelEncoder;
pub use record::{BloodPressure, PatientRecord, PatientSample};
pub use schema::{EncodedRow, FeatureSchema, Vocabulary};

use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn encode_matrix(schema: &FeatureSchema, records: &[PatientRecord]) -> Result<Array2<f64>> {
    let mut x = Array2::zeros((records.len(), schema.len()));
    for (r, row) in records.iter().zip(x.rows_mut()) {
        schema.encode_into(&r.to_sample()?, row);
    }
    Ok(x)
}

/// Rows with identical features, merged into one weighted training row.
#[derive(Debug, Clone, PartialEq)]
struct CollapsedRows {
    /// Index of the first occurrence of each distinct row.
    rows: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<f32>,
}

fn row_key(row: ArrayView1<f64>) -> Vec<u64> {
    // `+ 0.0` folds -0.0 into 0.0
    row.iter().map(|v| (v + 0.0).to_bits()).collect()
}

/// Merges rows whose encoded features are identical. Each group keeps its
/// most frequent class id, ties going to the lowest id, and is weighted by
/// its size. Every distinct feature row then carries exactly one label.
fn collapse_duplicates(x: &Array2<f64>, y: &[usize]) -> CollapsedRows {
    let mut groups: HashMap<Vec<u64>, usize> = HashMap::new();
    let mut rows = Vec::new();
    let mut counts: Vec<BTreeMap<usize, usize>> = Vec::new();

    for (i, (row, &class)) in x.rows().into_iter().zip(y).enumerate() {
        let group = *groups.entry(row_key(row)).or_insert_with(|| {
            rows.push(i);
            counts.push(BTreeMap::new());
            rows.len() - 1
        });
        *counts[group].entry(class).or_insert(0) += 1;
    }

    let targets = counts
        .iter()
        .map(|c| {
            // `max_by_key` keeps the last maximum; descending ids make that the lowest.
            c.iter()
                .rev()
                .max_by_key(|(_, n)| **n)
                .map(|(&class, _)| class)
                .unwrap_or_default()
        })
        .collect();
    let weights = counts
        .iter()
        .map(|c| c.values().sum::<usize>() as f32)
        .collect();

    CollapsedRows {
        rows,
        targets,
        weights,
    }
}

/// Trained diagnosis classifier and everything needed to feed it.
pub struct DiagnosisModel {
    model: DecisionTree<f64, usize>,
    schema: FeatureSchema,
    labels: LabelEncoder,
    vocab: Vocabulary,
    records: Vec<PatientRecord>,
}

impl DiagnosisModel {
    /// Loads the dataset at `path` and trains on all of it.
    pub fn from_csv(path: &Path) -> Result<Self> {
        info!("Loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Trains from CSV data with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<PatientRecord>, _>>()?;
        Self::train_from_records(&records)
    }

    /// Fits the decision tree on every record.
    pub fn train_from_records(records: &[PatientRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(DiagnosisError::EmptyDataset);
        }

        let vocab = Vocabulary::from_records(records);
        let schema = FeatureSchema::new(&vocab);
        let (labels, targets) =
            LabelEncoder::fit_transform(records.iter().map(|r| r.diagnosis.as_str()));

        let x = encode_matrix(&schema, records)?;
        let collapsed = collapse_duplicates(&x, &targets);
        if collapsed.rows.len() < records.len() {
            info!(
                "Merged {} duplicate feature rows into their majority diagnosis",
                records.len() - collapsed.rows.len()
            );
        }

        let dataset = Dataset::new(
            x.select(Axis(0), &collapsed.rows),
            Array1::from_vec(collapsed.targets),
        )
        .with_weights(Array1::from_vec(collapsed.weights));

        // Splits continue while any threshold lowers impurity, so distinct
        // training rows end in leaves predicting their own label.
        let model = DecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(None)
            .min_weight_split(2.0)
            .min_weight_leaf(1.0)
            .min_impurity_decrease(1e-10)
            .fit(&dataset)?;

        info!(
            "Model trained on {} records: {} classes, {} features, depth {}, {} leaves",
            records.len(),
            labels.len(),
            schema.len(),
            model.max_depth(),
            model.num_leaves()
        );

        Ok(DiagnosisModel {
            model,
            schema,
            labels,
            vocab,
            records: records.to_vec(),
        })
    }

    /// Predicts the diagnosis name for one patient.
    ///
    /// Gender or symptom values the model never saw are logged and left as
    /// all-zero indicators.
    pub fn predict(&self, sample: &PatientSample) -> Result<&str> {
        let encoded = self.schema.encode(sample);
        for column in &encoded.unseen {
            warn!("Ignoring unseen category {column:?}");
        }

        let input = encoded.values.insert_axis(Axis(0));
        let class = self.model.predict(&input)[0];
        self.labels.decode(class)
    }

    /// Predicts the diagnosis for a dataset row, ignoring its recorded diagnosis.
    pub fn predict_record(&self, record: &PatientRecord) -> Result<&str> {
        self.predict(&record.to_sample()?)
    }

    /// Fraction of `records` whose diagnosis is predicted correctly.
    pub fn evaluate_on(&self, records: &[PatientRecord]) -> Result<f64> {
        if records.is_empty() {
            return Err(DiagnosisError::EmptyDataset);
        }

        let x = encode_matrix(&self.schema, records)?;
        let predicted = self.model.predict(&x);

        let correct = records
            .iter()
            .zip(predicted.iter())
            .filter(|(r, class)| self.labels.encode(&r.diagnosis) == Some(**class))
            .count();

        Ok(correct as f64 / records.len() as f64)
    }

    /// The `n` columns with the highest impurity-based importance, most important first.
    pub fn top_features(&self, n: usize) -> Vec<(&str, f64)> {
        let importance = self.model.feature_importance();

        let mut features: Vec<(&str, f64)> = self
            .schema
            .columns()
            .iter()
            .zip(importance.iter())
            .map(|(name, &v)| (name.as_str(), v))
            .filter(|(_, v)| v.is_finite() && *v > 0.0)
            .collect();

        features.sort_by(|a, b| b.1.total_cmp(&a.1));
        features.truncate(n);
        features
    }

    /// Column layout every encoded row follows.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Diagnosis names and their class ids.
    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    /// Genders and symptoms seen in training, as offered by the form.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Records the model was trained on.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }
}
