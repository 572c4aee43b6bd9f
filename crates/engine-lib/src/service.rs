//! Caller-facing prediction service
//!
//! Resolves a vehicle and its history through the repositories, runs the
//! prediction engine once, persists the timestamped result, and returns it.

use crate::config::EngineConfig;
use crate::models::StoredPrediction;
use crate::predictor::MaintenancePredictor;
use crate::repository::{
    HistoryRepository, PredictionStore, RepositoryError, VehicleRepository,
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors a prediction request can surface to the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Orchestrates one synchronous prediction per request.
pub struct PredictionService {
    vehicles: Arc<dyn VehicleRepository>,
    history: Arc<dyn HistoryRepository>,
    store: Arc<dyn PredictionStore>,
    predictor: MaintenancePredictor,
    config: EngineConfig,
}

impl PredictionService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        history: Arc<dyn HistoryRepository>,
        store: Arc<dyn PredictionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            vehicles,
            history,
            store,
            predictor: MaintenancePredictor::from_config(&config),
            config,
        }
    }

    /// Generate, persist, and return a prediction for one vehicle.
    pub async fn predict(
        &self,
        vehicle_id: &str,
        service_type: Option<&str>,
    ) -> Result<StoredPrediction, ServiceError> {
        let vehicle = self
            .vehicles
            .get_by_id(vehicle_id)
            .await?
            .ok_or_else(|| ServiceError::VehicleNotFound(vehicle_id.to_string()))?;
        let history = self.history.list_by_vehicle(vehicle_id).await?;

        let prediction = self
            .predictor
            .predict(&vehicle, &history, service_type, &self.config);

        let record = StoredPrediction {
            vehicle_id: vehicle_id.to_string(),
            prediction,
            created_at: Utc::now(),
        };
        self.store.append(record.clone()).await?;

        info!(
            vehicle_id,
            cost_tier = %record.prediction.cost_prediction.model_used,
            interval_tier = %record
                .prediction
                .maintenance_schedule
                .optimized_oil_interval
                .model_used,
            "Prediction generated"
        );

        Ok(record)
    }

    /// Previously generated predictions for a vehicle, newest first.
    pub async fn list_predictions(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<StoredPrediction>, ServiceError> {
        Ok(self.store.list_by_vehicle(vehicle_id).await?)
    }
}
