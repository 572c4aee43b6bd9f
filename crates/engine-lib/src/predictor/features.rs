//! Feature construction for cost and interval estimation
//!
//! Turns a vehicle profile plus its service history into the flat feature
//! sets consumed by the predictors and the fallback formulas. Feature sets
//! are ephemeral: computed fresh on every call, never cached, and building
//! them has no side effects on the inputs.

use crate::models::{ServiceRecord, VehicleProfile};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Width of the numeric row encoding of [`CostFeatureSet`].
pub const COST_FEATURE_WIDTH: usize = 9;

/// Width of the numeric row encoding of [`IntervalFeatureSet`].
pub const INTERVAL_FEATURE_WIDTH: usize = 7;

/// Fallback label for absent categorical fields on the cost side.
const UNKNOWN: &str = "unknown";

/// Flat feature set for cost estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostFeatureSet {
    pub service_type: String,
    pub make: String,
    pub model: String,
    pub fuel_type: String,
    pub transmission: String,
    pub vehicle_type: String,
    pub current_mileage: u64,
    pub average_mileage_monthly: u64,
    pub cylinders: u32,
    pub vehicle_age: u32,
    pub historical_avg_cost: f64,
}

impl CostFeatureSet {
    /// Build cost features against the current UTC calendar year.
    pub fn build(vehicle: &VehicleProfile, history: &[ServiceRecord], service_type: &str) -> Self {
        Self::build_for_year(vehicle, history, service_type, Utc::now().year())
    }

    /// Build cost features against an explicit reference year.
    pub fn build_for_year(
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        service_type: &str,
        current_year: i32,
    ) -> Self {
        // Absent model year means the vehicle is treated as brand-new.
        let vehicle_age = vehicle
            .year
            .map(|year| (current_year - year).max(0) as u32)
            .unwrap_or(0);

        Self {
            service_type: service_type.to_string(),
            make: categorical(&vehicle.make, UNKNOWN),
            model: categorical(&vehicle.model, UNKNOWN),
            fuel_type: categorical(&vehicle.fuel_type, UNKNOWN),
            transmission: categorical(&vehicle.transmission, UNKNOWN),
            vehicle_type: categorical(&vehicle.vehicle_type, UNKNOWN),
            current_mileage: vehicle.effective_mileage(),
            average_mileage_monthly: vehicle.average_mileage_monthly.unwrap_or(0),
            cylinders: vehicle.cylinders.unwrap_or(0),
            vehicle_age,
            historical_avg_cost: historical_avg_cost(history),
        }
    }

    /// Fixed-width numeric encoding consumed by the cost predictor.
    ///
    /// High-cardinality `make`/`model` stay out of the row; categorical
    /// fields map to stable small-integer codes.
    pub fn to_row(&self) -> Vec<f32> {
        vec![
            service_type_code(&self.service_type),
            fuel_type_code(&self.fuel_type),
            transmission_code(&self.transmission),
            vehicle_type_code(&self.vehicle_type),
            self.current_mileage as f32,
            self.average_mileage_monthly as f32,
            self.cylinders as f32,
            self.vehicle_age as f32,
            self.historical_avg_cost as f32,
        ]
    }
}

/// Flat feature set for interval optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalFeatureSet {
    pub usage_type: String,
    pub driving_conditions: String,
    pub fuel_type: String,
    pub vehicle_type: String,
    pub current_mileage: u64,
    pub average_mileage_monthly: u64,
    pub engine_hours: u64,
}

impl IntervalFeatureSet {
    /// Build interval features. Absent categoricals fall back to the domain
    /// defaults rather than "unknown".
    pub fn build(vehicle: &VehicleProfile) -> Self {
        Self {
            usage_type: categorical(&vehicle.usage_type, "mixed"),
            driving_conditions: categorical(&vehicle.driving_conditions, "normal"),
            fuel_type: categorical(&vehicle.fuel_type, "gasoline"),
            vehicle_type: categorical(&vehicle.vehicle_type, "sedan"),
            current_mileage: vehicle.effective_mileage(),
            average_mileage_monthly: vehicle.average_mileage_monthly.unwrap_or(0),
            engine_hours: vehicle.engine_hours.unwrap_or(0),
        }
    }

    /// Fixed-width numeric encoding consumed by the interval predictor.
    pub fn to_row(&self) -> Vec<f32> {
        vec![
            usage_type_code(&self.usage_type),
            driving_conditions_code(&self.driving_conditions),
            fuel_type_code(&self.fuel_type),
            vehicle_type_code(&self.vehicle_type),
            self.current_mileage as f32,
            self.average_mileage_monthly as f32,
            self.engine_hours as f32,
        ]
    }
}

/// Arithmetic mean of the strictly positive costs in a history, 0.0 if none.
/// Non-positive and missing costs are excluded from the mean, not zeroed.
pub fn historical_avg_cost(history: &[ServiceRecord]) -> f64 {
    let costs: Vec<f64> = history
        .iter()
        .filter_map(|record| record.cost)
        .filter(|cost| *cost > 0.0)
        .collect();
    if costs.is_empty() {
        return 0.0;
    }
    costs.iter().sum::<f64>() / costs.len() as f64
}

fn categorical(value: &Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => default.to_string(),
    }
}

fn service_type_code(value: &str) -> f32 {
    match value {
        "oil_change" => 0.0,
        "minor_service" => 1.0,
        "major_service" => 2.0,
        "brake_service" => 3.0,
        "tire_service" => 4.0,
        _ => 5.0,
    }
}

fn fuel_type_code(value: &str) -> f32 {
    match value {
        "gasoline" => 0.0,
        "diesel" => 1.0,
        "electric" => 2.0,
        "hybrid" => 3.0,
        _ => 4.0,
    }
}

fn transmission_code(value: &str) -> f32 {
    match value {
        "manual" => 0.0,
        "automatic" => 1.0,
        _ => 2.0,
    }
}

fn vehicle_type_code(value: &str) -> f32 {
    match value {
        "sedan" => 0.0,
        "suv" => 1.0,
        "pickup" => 2.0,
        "hatchback" => 3.0,
        "coupe" => 4.0,
        "van" => 5.0,
        "wagon" => 6.0,
        _ => 7.0,
    }
}

fn usage_type_code(value: &str) -> f32 {
    match value {
        "city" => 0.0,
        "highway" => 1.0,
        "mixed" => 2.0,
        _ => 3.0,
    }
}

fn driving_conditions_code(value: &str) -> f32 {
    match value {
        "severe" => 0.0,
        "normal" => 1.0,
        "mild" => 2.0,
        _ => 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cost: Option<f64>) -> ServiceRecord {
        ServiceRecord {
            cost,
            ..Default::default()
        }
    }

    #[test]
    fn historical_average_excludes_non_positive_costs() {
        let history = vec![
            record(Some(0.0)),
            record(Some(-5.0)),
            record(Some(1000.0)),
            record(Some(2000.0)),
        ];
        assert_eq!(historical_avg_cost(&history), 1500.0);
    }

    #[test]
    fn historical_average_zero_when_no_usable_costs() {
        assert_eq!(historical_avg_cost(&[]), 0.0);
        assert_eq!(historical_avg_cost(&[record(None), record(Some(0.0))]), 0.0);
    }

    #[test]
    fn vehicle_age_from_model_year() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            year: Some(2019),
            ..Default::default()
        };
        let features = CostFeatureSet::build_for_year(&vehicle, &[], "major_service", 2024);
        assert_eq!(features.vehicle_age, 5);
    }

    #[test]
    fn future_model_year_clamps_age_to_zero() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            year: Some(2030),
            ..Default::default()
        };
        let features = CostFeatureSet::build_for_year(&vehicle, &[], "major_service", 2024);
        assert_eq!(features.vehicle_age, 0);
    }

    #[test]
    fn absent_year_means_brand_new() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let features = CostFeatureSet::build_for_year(&vehicle, &[], "major_service", 2024);
        assert_eq!(features.vehicle_age, 0);
    }

    #[test]
    fn cost_categoricals_fall_back_to_unknown() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            fuel_type: Some(String::new()),
            ..Default::default()
        };
        let features = CostFeatureSet::build_for_year(&vehicle, &[], "major_service", 2024);
        assert_eq!(features.make, "unknown");
        assert_eq!(features.fuel_type, "unknown");
        assert_eq!(features.transmission, "unknown");
        assert_eq!(features.vehicle_type, "unknown");
    }

    #[test]
    fn interval_categoricals_use_domain_defaults() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let features = IntervalFeatureSet::build(&vehicle);
        assert_eq!(features.usage_type, "mixed");
        assert_eq!(features.driving_conditions, "normal");
        assert_eq!(features.fuel_type, "gasoline");
        assert_eq!(features.vehicle_type, "sedan");
    }

    #[test]
    fn mileage_precedence_current_then_legacy() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            mileage: Some(42_000),
            ..Default::default()
        };
        let features = IntervalFeatureSet::build(&vehicle);
        assert_eq!(features.current_mileage, 42_000);
    }

    #[test]
    fn building_features_is_pure() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            year: Some(2018),
            make: Some("Toyota".to_string()),
            current_mileage: Some(90_000),
            usage_type: Some("city".to_string()),
            ..Default::default()
        };
        let history = vec![record(Some(1200.0)), record(Some(800.0))];

        let first = CostFeatureSet::build_for_year(&vehicle, &history, "oil_change", 2024);
        let second = CostFeatureSet::build_for_year(&vehicle, &history, "oil_change", 2024);
        assert_eq!(first, second);

        let interval_first = IntervalFeatureSet::build(&vehicle);
        let interval_second = IntervalFeatureSet::build(&vehicle);
        assert_eq!(interval_first, interval_second);
    }

    #[test]
    fn row_widths_match_declared_constants() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let cost = CostFeatureSet::build_for_year(&vehicle, &[], "major_service", 2024);
        assert_eq!(cost.to_row().len(), COST_FEATURE_WIDTH);

        let interval = IntervalFeatureSet::build(&vehicle);
        assert_eq!(interval.to_row().len(), INTERVAL_FEATURE_WIDTH);
    }
}
