use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use riskscan::application::system::Application;
use riskscan::config::Config;
use riskscan::domain::ml::FEATURE_NAMES;
use riskscan::interfaces::http::router;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

struct TempArtifact(PathBuf);

impl TempArtifact {
    fn write(contents: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("riskscan-startup-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        std::fs::remove_file(&self.0).ok();
    }
}

fn artifact_json() -> String {
    json!({
        "name": "heart-risk",
        "version": "0.9.1",
        "condition": "heart disease",
        "feature_names": FEATURE_NAMES,
        "classifier": {"type": "logistic_regression", "coefficients": vec![0.0; 21], "intercept": 3.0}
    })
    .to_string()
}

fn sample_payload() -> Value {
    json!({
        "highBP": 0, "highChol": 0, "cholCheck": 1, "bmi": 22.1, "smoker": 0,
        "stroke": 0, "heartDiseaseorAttack": 0, "physActivity": 1, "fruits": 1,
        "veggies": 1, "hvyAlcoholConsump": 0, "anyHealthcare": 1, "noDocbcCost": 0,
        "genHlth": 1, "mentHlth": 0, "physHlth": 0, "diffWalk": 0, "sex": 0,
        "age": 4, "education": 6, "income": 8
    })
}

async fn predict(app: &Application) -> (StatusCode, Value) {
    let response = router(app.service.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(sample_payload().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_startup_loads_artifact_from_disk() {
    let artifact = TempArtifact::write(&artifact_json());
    let mut config = Config::default();
    config.model.path = artifact.0.clone();

    let app = Application::build(config).await.unwrap();
    assert!(app.service.is_model_loaded());

    let (status, body) = predict(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["message"], "High risk of heart disease");
    let p = body["probability"].as_f64().unwrap();
    assert!((p - 1.0 / (1.0 + (-3.0f64).exp())).abs() < 1e-9);
}

#[tokio::test]
async fn test_condition_override() {
    let artifact = TempArtifact::write(&artifact_json());
    let mut config = Config::default();
    config.model.path = artifact.0.clone();
    config.model.condition = Some("diabetes".to_string());

    let app = Application::build(config).await.unwrap();
    let (_, body) = predict(&app).await;
    assert_eq!(body["message"], "High risk of diabetes");
}

#[tokio::test]
async fn test_corrupt_artifact_degrades_service() {
    let artifact = TempArtifact::write("{\"name\": \"truncated\"");
    let mut config = Config::default();
    config.model.path = artifact.0.clone();

    let app = Application::build(config).await.unwrap();
    assert!(!app.service.is_model_loaded());

    let (status, body) = predict(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Model not loaded");
}

#[tokio::test]
async fn test_misordered_artifact_is_rejected_at_startup() {
    let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
    names.swap(0, 1);
    let contents = json!({
        "name": "misordered",
        "feature_names": names,
        "classifier": {"type": "logistic_regression", "coefficients": vec![0.0; 21], "intercept": 0.0}
    })
    .to_string();
    let artifact = TempArtifact::write(&contents);
    let mut config = Config::default();
    config.model.path = artifact.0.clone();

    let app = Application::build(config).await.unwrap();
    assert!(!app.service.is_model_loaded());
}

#[tokio::test]
async fn test_cached_predictions_are_identical() {
    let artifact = TempArtifact::write(&artifact_json());
    let mut config = Config::default();
    config.model.path = artifact.0.clone();
    config.model.cache_capacity = 16;

    let app = Application::build(config).await.unwrap();
    let (_, first) = predict(&app).await;
    let (_, second) = predict(&app).await;
    assert_eq!(first, second);
    assert_eq!(app.metrics.cache_hits_total.get(), 1);
}

#[tokio::test]
async fn test_bundled_artifact_serves_scenario() {
    let mut config = Config::default();
    config.model.path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/diabetes.json");

    let app = Application::build(config).await.unwrap();
    assert!(app.service.is_model_loaded());

    let (status, body) = predict(&app).await;
    assert_eq!(status, StatusCode::OK);
    let prediction = body["prediction"].as_i64().unwrap();
    assert!(prediction == 0 || prediction == 1);
    let p = body["probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
}
