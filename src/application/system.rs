use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::ml::try_load_model;
use crate::application::prediction_service::PredictionService;
use crate::config::Config;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::persistence::{Database, Lifecycle};

/// Wired-up process state: the prediction service and its collaborators.
pub struct Application {
    pub config: Config,
    pub service: Arc<PredictionService>,
    pub metrics: Metrics,
    pub database: Option<Database>,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building riskscan application...");

        // 1. Metrics
        let metrics = Metrics::new().context("Failed to create metrics registry")?;

        // 2. Model artifact. A failed load leaves the service degraded, not dead.
        let model = try_load_model(&config.model.path).map(|handle| {
            match config.model.condition.as_deref() {
                Some(condition) => handle.with_condition(condition),
                None => handle,
            }
        });
        if model.is_none() {
            warn!(
                "Serving without a model: every /predict call will fail until restart (path: {})",
                config.model.path.display()
            );
        }

        // 3. Database collaborator (not on the prediction path)
        let database = match config.database.url.as_deref() {
            Some(url) => {
                info!("Initializing database at {}", url);
                Some(
                    Database::connect(url)
                        .await
                        .context("Failed to initialize database")?,
                )
            }
            None => {
                info!("DATABASE_URL not set; database connector disabled");
                None
            }
        };

        // 4. Prediction service
        let service = PredictionService::new(model, metrics.clone())
            .with_cache(config.model.cache_capacity);
        if config.model.cache_capacity > 0 {
            info!(
                "Prediction cache enabled (capacity: {})",
                config.model.cache_capacity
            );
        }

        Ok(Self {
            config,
            service: Arc::new(service),
            metrics,
            database,
        })
    }

    /// Release collaborators on process stop
    pub async fn shutdown(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
        info!("Application shut down");
    }
}
