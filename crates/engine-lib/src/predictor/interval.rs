//! Oil-change interval optimization
//!
//! Mirrors the cost estimator's two-tier strategy: trained interval model
//! when available, penalty-based formula otherwise. Every result is clamped
//! into the window of its tier no matter how extreme the inputs are.

use crate::models::{IntervalRecommendation, VehicleProfile};
use crate::predictor::features::IntervalFeatureSet;
use crate::predictor::gateway::{ModelGateway, PredictorKind};
use crate::predictor::cost::FALLBACK_MODEL_LABEL;
use std::sync::Arc;
use tracing::{debug, warn};

/// Clamp window for the model tier, in km.
pub const MODEL_INTERVAL_MIN_KM: u32 = 4_000;
pub const MODEL_INTERVAL_MAX_KM: u32 = 15_000;

/// Clamp window for the rule-based tier, in km.
pub const FALLBACK_INTERVAL_MIN_KM: u32 = 5_000;
pub const FALLBACK_INTERVAL_MAX_KM: u32 = 12_000;

/// Penalty subtracted for city usage.
const CITY_USAGE_PENALTY_KM: i64 = 1_200;

/// Penalty subtracted for severe driving conditions.
const SEVERE_CONDITIONS_PENALTY_KM: i64 = 1_800;

/// Penalty for odometers past this reading.
const HIGH_MILEAGE_THRESHOLD_KM: u64 = 120_000;
const HIGH_MILEAGE_PENALTY_KM: i64 = 800;

/// Penalty for monthly averages past this distance.
const HIGH_MONTHLY_THRESHOLD_KM: u64 = 2_500;
const HIGH_MONTHLY_PENALTY_KM: i64 = 700;

const FALLBACK_REASON: &str = "Interval adjusted for usage pattern and driving conditions";
const MODEL_REASON: &str = "Interval personalized by trained model";
const CITY_QUALIFIER: &str = " and urban usage";

/// Recommends an oil-change distance interval for a vehicle.
pub struct IntervalOptimizer {
    gateway: Arc<ModelGateway>,
}

impl IntervalOptimizer {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Recommend an oil-change interval, starting from the configured
    /// default distance. Never fails; degraded inputs produce a clamped
    /// rule-based answer.
    pub fn optimize(&self, vehicle: &VehicleProfile, default_interval_km: u32) -> IntervalRecommendation {
        let features = IntervalFeatureSet::build(vehicle);

        if let Some(predictor) = self.gateway.load(PredictorKind::Interval) {
            match predictor.predict_scalar(&features.to_row()) {
                Ok(raw) => {
                    let km = (f64::from(raw).round() as i64)
                        .clamp(i64::from(MODEL_INTERVAL_MIN_KM), i64::from(MODEL_INTERVAL_MAX_KM))
                        as u32;
                    let mut reason = MODEL_REASON.to_string();
                    if features.usage_type == "city" {
                        reason.push_str(CITY_QUALIFIER);
                    }
                    debug!(km, model = predictor.name(), "Interval recommended by trained model");
                    return IntervalRecommendation {
                        recommended_oil_change_interval_km: km,
                        model_used: predictor.name().to_string(),
                        reason,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "Interval inference failed, using rule-based fallback");
                }
            }
        }

        Self::fallback_interval(&features, default_interval_km)
    }

    /// Penalty-based tier. Arithmetic is signed so stacked penalties can
    /// never underflow before the clamp.
    fn fallback_interval(
        features: &IntervalFeatureSet,
        default_interval_km: u32,
    ) -> IntervalRecommendation {
        let mut penalty: i64 = 0;
        if features.usage_type == "city" {
            penalty += CITY_USAGE_PENALTY_KM;
        }
        if features.driving_conditions == "severe" {
            penalty += SEVERE_CONDITIONS_PENALTY_KM;
        }
        if features.current_mileage > HIGH_MILEAGE_THRESHOLD_KM {
            penalty += HIGH_MILEAGE_PENALTY_KM;
        }
        if features.average_mileage_monthly > HIGH_MONTHLY_THRESHOLD_KM {
            penalty += HIGH_MONTHLY_PENALTY_KM;
        }

        let recommended = (i64::from(default_interval_km) - penalty).clamp(
            i64::from(FALLBACK_INTERVAL_MIN_KM),
            i64::from(FALLBACK_INTERVAL_MAX_KM),
        ) as u32;

        IntervalRecommendation {
            recommended_oil_change_interval_km: recommended,
            model_used: FALLBACK_MODEL_LABEL.to_string(),
            reason: FALLBACK_REASON.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer() -> IntervalOptimizer {
        IntervalOptimizer::new(Arc::new(ModelGateway::new("/nonexistent/models")))
    }

    #[test]
    fn city_severe_penalties_are_additive() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(80_000),
            usage_type: Some("city".to_string()),
            driving_conditions: Some("severe".to_string()),
            ..Default::default()
        };
        let rec = optimizer().optimize(&vehicle, 10_000);
        // 10000 - 1200 - 1800, no mileage or monthly penalty
        assert_eq!(rec.recommended_oil_change_interval_km, 7_000);
        assert_eq!(rec.model_used, FALLBACK_MODEL_LABEL);
    }

    #[test]
    fn all_penalties_stack() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(150_000),
            average_mileage_monthly: Some(3_000),
            usage_type: Some("city".to_string()),
            driving_conditions: Some("severe".to_string()),
            ..Default::default()
        };
        let rec = optimizer().optimize(&vehicle, 10_000);
        // 10000 - 1200 - 1800 - 800 - 700 = 5500
        assert_eq!(rec.recommended_oil_change_interval_km, 5_500);
    }

    #[test]
    fn fallback_clamps_to_lower_bound() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(500_000),
            average_mileage_monthly: Some(9_000),
            usage_type: Some("city".to_string()),
            driving_conditions: Some("severe".to_string()),
            ..Default::default()
        };
        // 6000 - 4500 = 1500, clamped up to the window floor
        let rec = optimizer().optimize(&vehicle, 6_000);
        assert_eq!(
            rec.recommended_oil_change_interval_km,
            FALLBACK_INTERVAL_MIN_KM
        );
    }

    #[test]
    fn fallback_clamps_to_upper_bound() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let rec = optimizer().optimize(&vehicle, 50_000);
        assert_eq!(
            rec.recommended_oil_change_interval_km,
            FALLBACK_INTERVAL_MAX_KM
        );
    }

    #[test]
    fn pathological_inputs_stay_in_window() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            year: Some(3000),
            current_mileage: Some(u64::MAX),
            average_mileage_monthly: Some(u64::MAX),
            usage_type: Some("city".to_string()),
            driving_conditions: Some("severe".to_string()),
            ..Default::default()
        };
        let rec = optimizer().optimize(&vehicle, 0);
        assert!(
            (FALLBACK_INTERVAL_MIN_KM..=FALLBACK_INTERVAL_MAX_KM)
                .contains(&rec.recommended_oil_change_interval_km)
        );
    }

    #[test]
    fn defaulted_categoricals_incur_no_penalty() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(50_000),
            ..Default::default()
        };
        let rec = optimizer().optimize(&vehicle, 10_000);
        assert_eq!(rec.recommended_oil_change_interval_km, 10_000);
    }
}
