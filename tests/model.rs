mod common;

use common::{bundled_model, model_from_rows, sample, HEADER};
use diagnosis_predictor::{DiagnosisError, DiagnosisModel};

#[test]
fn two_row_dataset_predicts_training_rows() {
    let model = model_from_rows(&[
        "1,40,M,,,,80,37.0,120/80,97,Gout,Mild,Rest",
        "2,40,F,,,,80,37.0,120/80,97,Migraine,Mild,Rest",
    ]);

    assert_eq!(model.labels().classes(), ["Gout", "Migraine"]);
    assert_eq!(model.predict(&sample("M", ["", "", ""])).unwrap(), "Gout");
    assert_eq!(model.predict(&sample("F", ["", "", ""])).unwrap(), "Migraine");

    for record in model.records() {
        assert_eq!(model.predict_record(record).unwrap(), record.diagnosis);
    }
}

#[test]
fn inference_rows_match_training_layout() {
    let model = bundled_model();
    let schema = model.schema();

    let vocab = model.vocabulary();
    let expected = 6 + vocab.genders.len() + 3 * vocab.symptoms.len();
    assert_eq!(schema.len(), expected);

    for s in [
        sample("Female", ["Fever", "Cough", ""]),
        sample("Unknown", ["Rash", "", "Hiccups"]),
        sample("Male", ["", "", ""]),
    ] {
        let row = schema.encode(&s);
        assert_eq!(row.values.len(), schema.len());
    }
    assert_eq!(
        &schema.columns()[..6],
        [
            "Age",
            "Heart_Rate_bpm",
            "Body_Temperature_C",
            "Oxygen_Saturation_%",
            "Systolic_BP",
            "Diastolic_BP",
        ]
    );
}

#[test]
fn every_diagnosis_round_trips_through_labels() {
    let model = bundled_model();
    let labels = model.labels();

    for record in model.records() {
        let id = labels.encode(&record.diagnosis).unwrap();
        assert_eq!(labels.decode(id).unwrap(), record.diagnosis);
    }
    assert_eq!(labels.len(), 5);
}

#[test]
fn unseen_categories_still_predict() {
    let model = bundled_model();
    let known = model.labels().classes().to_vec();

    let diagnosis = model
        .predict(&sample("Nonbinary", ["Hiccups", "Rash", "Fever"]))
        .unwrap();
    assert!(known.iter().any(|c| c == diagnosis));

    let row = model
        .schema()
        .encode(&sample("Nonbinary", ["Hiccups", "Rash", "Fever"]));
    assert_eq!(
        row.unseen,
        ["Gender_Nonbinary", "Symptom_1_Hiccups", "Symptom_2_Rash"]
    );
}

#[test]
fn identical_inputs_give_identical_predictions() {
    let model = bundled_model();
    let s = sample("Male", ["Shortness of breath", "Fever", "Cough"]);

    let first = model.predict(&s).unwrap().to_string();
    for _ in 0..10 {
        assert_eq!(model.predict(&s).unwrap(), first);
    }
}

fn training_predictions(model: &DiagnosisModel) -> Vec<String> {
    model
        .records()
        .iter()
        .map(|r| model.predict_record(r).unwrap().to_string())
        .collect()
}

#[test]
fn training_is_deterministic() {
    let expected = training_predictions(&bundled_model());

    for _ in 0..30 {
        assert_eq!(training_predictions(&bundled_model()), expected);
    }
}

#[test]
fn conflicting_duplicates_resolve_to_the_lowest_class() {
    let rows = [
        "1,40,M,Cough,,,80,37.0,120/80,97,Migraine,Mild,Rest",
        "2,40,M,Cough,,,80,37.0,120/80,97,Gout,Mild,Rest",
        "3,65,F,Fever,,,110,39.0,140/90,91,Pneumonia,Severe,Antibiotics",
    ];

    for _ in 0..30 {
        let model = model_from_rows(&rows);
        assert_eq!(model.predict(&sample("M", ["Cough", "", ""])).unwrap(), "Gout");
        assert_eq!(model.predict_record(&model.records()[2]).unwrap(), "Pneumonia");
    }
}

#[test]
fn conflicting_duplicates_resolve_to_the_majority() {
    let rows = [
        "1,40,M,Cough,,,80,37.0,120/80,97,Migraine,Mild,Rest",
        "2,40,M,Cough,,,80,37.0,120/80,97,Gout,Mild,Rest",
        "3,40,M,Cough,,,80,37.0,120/80,97,Migraine,Mild,Rest",
        "4,40,F,Cough,,,80,37.0,120/80,97,Gout,Mild,Rest",
    ];

    for _ in 0..30 {
        let model = model_from_rows(&rows);
        assert_eq!(model.predict(&sample("M", ["Cough", "", ""])).unwrap(), "Migraine");
        assert_eq!(model.predict(&sample("F", ["Cough", "", ""])).unwrap(), "Gout");
    }
}

#[test]
fn fits_the_bundled_dataset() {
    let model = bundled_model();
    let accuracy = model.evaluate_on(model.records()).unwrap();
    assert!(accuracy > 0.9, "training accuracy {accuracy}");

    let top = model.top_features(5);
    assert!(!top.is_empty() && top.len() <= 5);
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    for (name, _) in &top {
        assert!(model.schema().position(name).is_some());
    }
}

#[test]
fn vocabularies_are_sorted() {
    let model = bundled_model();
    let vocab = model.vocabulary();

    assert_eq!(vocab.genders, ["Female", "Male"]);
    let mut sorted = vocab.symptoms.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(vocab.symptoms, sorted);
    assert!(vocab.symptoms.iter().any(|s| s == "Shortness of breath"));
}

#[test]
fn empty_dataset_is_rejected() {
    let data = format!("{HEADER}\n");
    assert!(matches!(
        DiagnosisModel::from_reader(data.as_bytes()),
        Err(DiagnosisError::EmptyDataset)
    ));
}

#[test]
fn malformed_blood_pressure_fails_training() {
    let data = format!("{HEADER}\n1,40,M,Cough,,,80,37.0,120-80,97,Cold,Mild,Rest\n");
    assert!(matches!(
        DiagnosisModel::from_reader(data.as_bytes()),
        Err(DiagnosisError::BloodPressure(ref s)) if s == "120-80"
    ));
}

#[test]
fn missing_dataset_is_an_io_error() {
    let err = DiagnosisModel::from_csv(std::path::Path::new("does/not/exist.csv"));
    assert!(matches!(err, Err(DiagnosisError::Io(_))));
}
