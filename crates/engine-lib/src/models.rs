//! Core data models for the maintenance prediction engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle profile as supplied by the owning collaborator.
///
/// Every field except `id` is optional; the feature builder substitutes
/// neutral defaults so missing data never reaches arithmetic as a null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: String,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub cylinders: Option<u32>,
    #[serde(default)]
    pub current_mileage: Option<u64>,
    /// Legacy mileage field, read only when `current_mileage` is absent.
    #[serde(default)]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub average_mileage_monthly: Option<u64>,
    #[serde(default)]
    pub usage_type: Option<String>,
    #[serde(default)]
    pub driving_conditions: Option<String>,
    #[serde(default)]
    pub engine_hours: Option<u64>,
}

impl VehicleProfile {
    /// Effective odometer reading: `current_mileage`, then the legacy
    /// `mileage` field, then 0.
    pub fn effective_mileage(&self) -> u64 {
        self.current_mileage.or(self.mileage).unwrap_or(0)
    }
}

/// A single entry in a vehicle's service history.
///
/// Histories are ordered most-recent first and treated as read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub mileage: Option<u64>,
    /// ISO calendar date (`YYYY-MM-DD`).
    #[serde(default)]
    pub service_date: Option<String>,
}

/// Cost estimate for one service type, labelled with the tier that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub estimated_cost: f64,
    pub service_type: String,
    pub model_used: String,
}

/// Recommended oil-change distance interval, labelled with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalRecommendation {
    pub recommended_oil_change_interval_km: u32,
    pub model_used: String,
    pub reason: String,
}

/// Next-due schedule composed from the interval recommendation and the
/// vehicle's current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub recommended_next_oil_change_km: u64,
    pub recommended_general_check_date: NaiveDate,
    pub optimized_oil_interval: IntervalRecommendation,
    pub confidence: f32,
    pub notes: String,
}

/// Combined schedule + cost artifact returned per prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    pub maintenance_schedule: MaintenanceSchedule,
    pub cost_prediction: CostEstimate,
}

/// A prediction as persisted by the prediction store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub vehicle_id: String,
    pub prediction: MaintenancePrediction,
    pub created_at: DateTime<Utc>,
}
