//! Maintenance cost estimation
//!
//! Two-tier strategy: a trained cost regressor when the gateway can supply
//! one, otherwise a deterministic rule-based formula. Both tiers label the
//! result with the tier that produced it.

use crate::models::{CostEstimate, ServiceRecord, VehicleProfile};
use crate::predictor::features::CostFeatureSet;
use crate::predictor::gateway::{ModelGateway, PredictorKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Label attached to estimates produced by the rule-based tier.
pub const FALLBACK_MODEL_LABEL: &str = "rule_based_fallback";

/// Service type assumed when the caller supplies none.
pub const DEFAULT_SERVICE_TYPE: &str = "major_service";

/// Lowest cost the model tier may report.
pub const MIN_COST_FLOOR: f64 = 500.0;

/// Blend weights between table base cost and historical average.
pub const BASE_COST_WEIGHT: f64 = 0.7;
pub const HISTORY_COST_WEIGHT: f64 = 0.3;

/// Mileage beyond this no longer increases the mileage factor.
const MILEAGE_FACTOR_CAP_KM: u64 = 300_000;

/// Age beyond this no longer increases the age factor.
const AGE_FACTOR_CAP_YEARS: u32 = 25;

/// Per-year increment of the age factor.
const AGE_FACTOR_STEP: f64 = 0.015;

/// Surcharge applied to severe city usage.
const SEVERE_CITY_FACTOR: f64 = 1.12;

/// Default base costs per service type, in currency units.
const DEFAULT_SERVICE_COSTS: &[(&str, f64)] = &[
    ("oil_change", 1_400.0),
    ("minor_service", 3_200.0),
    ("major_service", 8_500.0),
    ("brake_service", 4_200.0),
    ("tire_service", 2_600.0),
];

fn base_cost_for(service_type: &str) -> f64 {
    DEFAULT_SERVICE_COSTS
        .iter()
        .find(|(name, _)| *name == service_type)
        .or_else(|| {
            DEFAULT_SERVICE_COSTS
                .iter()
                .find(|(name, _)| *name == DEFAULT_SERVICE_TYPE)
        })
        .map(|(_, cost)| *cost)
        .unwrap_or(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimates future maintenance cost for a requested service type.
pub struct CostEstimator {
    gateway: Arc<ModelGateway>,
}

impl CostEstimator {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Estimate the cost of the next service of `service_type`.
    ///
    /// Never fails: a missing or misbehaving predictor downgrades to the
    /// rule-based formula within the same call.
    pub fn estimate(
        &self,
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        service_type: Option<&str>,
    ) -> CostEstimate {
        let service_type = match service_type {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SERVICE_TYPE,
        };
        let features = CostFeatureSet::build(vehicle, history, service_type);

        if let Some(predictor) = self.gateway.load(PredictorKind::Cost) {
            match predictor.predict_scalar(&features.to_row()) {
                Ok(raw) => {
                    let estimated_cost = round2(f64::from(raw).max(MIN_COST_FLOOR));
                    debug!(
                        service_type,
                        estimated_cost,
                        model = predictor.name(),
                        "Cost estimated by trained model"
                    );
                    return CostEstimate {
                        estimated_cost,
                        service_type: service_type.to_string(),
                        model_used: predictor.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(error = %e, "Cost inference failed, using rule-based fallback");
                }
            }
        }

        self.fallback_estimate(vehicle, &features)
    }

    /// Deterministic rule-based tier.
    fn fallback_estimate(
        &self,
        vehicle: &VehicleProfile,
        features: &CostFeatureSet,
    ) -> CostEstimate {
        let base_cost = base_cost_for(&features.service_type);

        let mileage_factor =
            1.0 + features.current_mileage.min(MILEAGE_FACTOR_CAP_KM) as f64
                / MILEAGE_FACTOR_CAP_KM as f64;
        let age_factor =
            1.0 + f64::from(features.vehicle_age.min(AGE_FACTOR_CAP_YEARS)) * AGE_FACTOR_STEP;

        let severe_city = vehicle.usage_type.as_deref() == Some("city")
            && vehicle.driving_conditions.as_deref() == Some("severe");
        let usage_factor = if severe_city { SEVERE_CITY_FACTOR } else { 1.0 };

        let blended_base = if features.historical_avg_cost <= 0.0 {
            base_cost
        } else {
            BASE_COST_WEIGHT * base_cost + HISTORY_COST_WEIGHT * features.historical_avg_cost
        };

        let estimate = blended_base * mileage_factor * age_factor * usage_factor;

        CostEstimate {
            estimated_cost: round2(estimate),
            service_type: features.service_type.clone(),
            model_used: FALLBACK_MODEL_LABEL.to_string(),
        }
    }
}
