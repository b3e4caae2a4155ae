//! HTML form in front of a trained [`DiagnosisModel`].
//!
//! `GET /` renders the input form with gender and symptom dropdowns filled from
//! the training vocabulary; `POST /predict` takes the submitted form and
//! renders the predicted diagnosis.

use crate::error::{DiagnosisError, Result};
use crate::record::PatientSample;
use crate::schema::Vocabulary;
use crate::DiagnosisModel;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<DiagnosisModel>,
}

pub fn router(model: Arc<DiagnosisModel>) -> Router {
    Router::new()
        .route("/", get(form))
        .route("/predict", post(predict))
        .with_state(AppState { model })
}

/// A form submission. Every field arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictForm {
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Symptom_1", default)]
    pub symptom_1: String,
    #[serde(rename = "Symptom_2", default)]
    pub symptom_2: String,
    #[serde(rename = "Symptom_3", default)]
    pub symptom_3: String,
    #[serde(rename = "Heart_Rate_bpm")]
    pub heart_rate_bpm: String,
    #[serde(rename = "Body_Temperature_C")]
    pub body_temperature_c: String,
    #[serde(rename = "Oxygen_Saturation_%")]
    pub oxygen_saturation: String,
    #[serde(rename = "Systolic_BP")]
    pub systolic_bp: String,
    #[serde(rename = "Diastolic_BP")]
    pub diastolic_bp: String,
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| DiagnosisError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl PredictForm {
    pub fn into_sample(self) -> Result<PatientSample> {
        Ok(PatientSample {
            age: parse_number("Age", &self.age)?,
            heart_rate_bpm: parse_number("Heart_Rate_bpm", &self.heart_rate_bpm)?,
            body_temperature_c: parse_number("Body_Temperature_C", &self.body_temperature_c)?,
            oxygen_saturation: parse_number("Oxygen_Saturation_%", &self.oxygen_saturation)?,
            systolic_bp: parse_number("Systolic_BP", &self.systolic_bp)?,
            diastolic_bp: parse_number("Diastolic_BP", &self.diastolic_bp)?,
            gender: non_empty(self.gender),
            symptoms: [
                non_empty(self.symptom_1),
                non_empty(self.symptom_2),
                non_empty(self.symptom_3),
            ],
        })
    }
}

/// Renders a [`DiagnosisError`] as an error page.
#[derive(Debug)]
pub struct WebError(pub DiagnosisError);

impl From<DiagnosisError> for WebError {
    fn from(e: DiagnosisError) -> Self {
        WebError(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = if self.0.is_bad_input() {
            warn!("Rejected submission: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Prediction failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Html(render_error(&self.0.to_string()))).into_response()
    }
}

pub async fn form(State(state): State<AppState>) -> Html<String> {
    Html(render_form(state.model.vocabulary()))
}

pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> std::result::Result<Html<String>, WebError> {
    let sample = form.into_sample()?;
    let diagnosis = state.model.predict(&sample)?;
    info!("Predicted {diagnosis:?}");
    Ok(Html(render_result(diagnosis)))
}

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn options(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        let item = escape_html(item);
        out.push_str(&format!(r#"<option value="{item}">{item}</option>"#));
    }
    out
}

const FORM_STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
form { background: #f4f4f4; padding: 1em; border-radius: 5px; }
.form-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1em; }
label { font-weight: bold; }
input, select { width: 100%; padding: 8px; box-sizing: border-box; }
.submit-btn { grid-column: span 2; padding: 10px; background-color: #007bff; color: white; border: none; cursor: pointer; }";

const RESULT_STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; text-align: center; }
.result-box { background: #e7f3fe; border-left: 6px solid #2196F3; padding: 20px; margin: 20px auto; max-width: 500px; }
h2 { color: #2196F3; }";

fn number_input(id: &str, name: &str, label: &str, kind: &str) -> String {
    format!(
        r#"<div><label for="{id}">{label}:</label><input type="{kind}" id="{id}" name="{name}" required></div>"#
    )
}

fn select(id: &str, name: &str, label: &str, items: &str) -> String {
    format!(
        r#"<div><label for="{id}">{label}:</label><select name="{name}" id="{id}">{items}</select></div>"#
    )
}

pub fn render_form(vocab: &Vocabulary) -> String {
    let genders = options(&vocab.genders);
    let symptoms = options(&vocab.symptoms);

    let fields = [
        number_input("age", "Age", "Age", "number"),
        select("gender", "Gender", "Gender", &genders),
        select("symptom1", "Symptom_1", "Symptom 1", &symptoms),
        select("symptom2", "Symptom_2", "Symptom 2", &symptoms),
        select("symptom3", "Symptom_3", "Symptom 3", &symptoms),
        number_input("heart_rate", "Heart_Rate_bpm", "Heart Rate (bpm)", "number"),
        number_input("temp", "Body_Temperature_C", "Body Temp (&deg;C)", "text"),
        number_input("oxygen", "Oxygen_Saturation_%", "Oxygen Saturation (%)", "number"),
        number_input("systolic", "Systolic_BP", "Systolic BP (top #)", "number"),
        number_input("diastolic", "Diastolic_BP", "Diastolic BP (bottom #)", "number"),
    ]
    .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Disease Diagnosis Predictor</title>
<style>
{FORM_STYLE}
</style>
</head>
<body>
<h1>Preliminary Diagnosis Assistant</h1>
<p>Enter patient data below to get a predicted diagnosis.</p>
<form action="/predict" method="post">
<div class="form-grid">
{fields}
</div>
<br>
<input class="submit-btn" type="submit" value="Predict Diagnosis">
</form>
</body>
</html>
"#
    )
}

pub fn render_result(diagnosis: &str) -> String {
    let diagnosis = escape_html(diagnosis);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Prediction Result</title>
<style>
{RESULT_STYLE}
</style>
</head>
<body>
<div class="result-box">
<h1>Predicted Diagnosis</h1>
<h2>{diagnosis}</h2>
<p><em>This is a prediction based on a machine learning model and is not a substitute for professional medical advice.</em></p>
</div>
<a href="/">Make another prediction</a>
</body>
</html>
"#
    )
}

fn render_error(message: &str) -> String {
    let message = escape_html(message);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Prediction Failed</title></head>
<body>
<h1>Prediction failed</h1>
<p>{message}</p>
<a href="/">Back to the form</a>
</body>
</html>
"#
    )
}
