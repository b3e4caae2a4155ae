use anyhow::Context;
use diagnosis_predictor::config::Config;
use diagnosis_predictor::{web, DiagnosisModel};
use log::info;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    info!("🧠 Loading data and training model...");
    let start = Instant::now();
    let model = DiagnosisModel::from_csv(&config.dataset_path)
        .with_context(|| format!("failed to train from {}", config.dataset_path.display()))?;
    info!("Model trained and ready in {:?}", start.elapsed());

    let train_acc = model.evaluate_on(model.records())?;
    info!("✅ Training accuracy: {:.2}%", train_acc * 100.0);

    info!("Most informative features:");
    for (feature, importance) in model.top_features(10) {
        info!("{:>30} | importance: {:.3}", feature, importance);
    }

    let app = web::router(Arc::new(model));
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("Serving on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
