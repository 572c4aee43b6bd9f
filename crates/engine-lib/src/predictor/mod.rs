//! Maintenance prediction engine

mod cost;
mod features;
mod gateway;
mod interval;
mod schedule;

pub use cost::{
    CostEstimator, DEFAULT_SERVICE_TYPE, FALLBACK_MODEL_LABEL, MIN_COST_FLOOR,
};
pub use features::{
    historical_avg_cost, CostFeatureSet, IntervalFeatureSet, COST_FEATURE_WIDTH,
    INTERVAL_FEATURE_WIDTH,
};
pub use gateway::{LoadedPredictor, ModelGateway, PredictorKind};
pub use interval::{
    IntervalOptimizer, FALLBACK_INTERVAL_MAX_KM, FALLBACK_INTERVAL_MIN_KM,
    MODEL_INTERVAL_MAX_KM, MODEL_INTERVAL_MIN_KM,
};
pub use schedule::{ScheduleComposer, SCHEDULE_CONFIDENCE};

use crate::config::EngineConfig;
use crate::models::{
    CostEstimate, IntervalRecommendation, MaintenancePrediction, MaintenanceSchedule,
    ServiceRecord, VehicleProfile,
};
use std::sync::Arc;

/// Single dispatch point for all prediction requests.
///
/// Owns one [`ModelGateway`] shared across the estimators so each predictor
/// artifact is loaded at most once per process.
pub struct MaintenancePredictor {
    cost: CostEstimator,
    intervals: IntervalOptimizer,
    schedule: ScheduleComposer,
}

impl MaintenancePredictor {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            cost: CostEstimator::new(Arc::clone(&gateway)),
            intervals: IntervalOptimizer::new(Arc::clone(&gateway)),
            schedule: ScheduleComposer::new(gateway),
        }
    }

    /// Build a predictor whose gateway reads artifacts from the configured
    /// model directory.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(Arc::new(ModelGateway::new(config.model_dir.clone())))
    }

    /// Estimate the cost of the next service of `service_type`.
    pub fn estimate_cost(
        &self,
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        service_type: Option<&str>,
    ) -> CostEstimate {
        self.cost.estimate(vehicle, history, service_type)
    }

    /// Recommend an oil-change distance interval.
    pub fn optimize_oil_interval(
        &self,
        vehicle: &VehicleProfile,
        default_interval_km: u32,
    ) -> IntervalRecommendation {
        self.intervals.optimize(vehicle, default_interval_km)
    }

    /// Compose the next-due maintenance schedule.
    pub fn predict_next_maintenance(
        &self,
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        config: &EngineConfig,
    ) -> MaintenanceSchedule {
        self.schedule.predict_next_maintenance(vehicle, history, config)
    }

    /// Combined schedule + cost prediction for one request.
    pub fn predict(
        &self,
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        service_type: Option<&str>,
        config: &EngineConfig,
    ) -> MaintenancePrediction {
        MaintenancePrediction {
            maintenance_schedule: self.predict_next_maintenance(vehicle, history, config),
            cost_prediction: self.estimate_cost(vehicle, history, service_type),
        }
    }
}
