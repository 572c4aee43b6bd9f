//! Maintenance schedule composition
//!
//! Combines the optimized oil-change interval with the vehicle's current
//! mileage and last service date into next-due mileage and next-due date.

use crate::config::EngineConfig;
use crate::models::{MaintenanceSchedule, ServiceRecord, VehicleProfile};
use crate::predictor::gateway::ModelGateway;
use crate::predictor::interval::IntervalOptimizer;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

/// Fixed confidence attached to every schedule. Not derived from model
/// uncertainty; documented limitation.
pub const SCHEDULE_CONFIDENCE: f32 = 0.72;

const SCHEDULE_NOTES: &str = "Baseline prediction with personalized interval";

/// Composes the next-due schedule for a vehicle.
pub struct ScheduleComposer {
    intervals: IntervalOptimizer,
}

impl ScheduleComposer {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self {
            intervals: IntervalOptimizer::new(gateway),
        }
    }

    /// Predict the next maintenance schedule.
    ///
    /// The general-check base date is the most recent record's service date
    /// when it parses as an ISO calendar date, otherwise today (UTC).
    pub fn predict_next_maintenance(
        &self,
        vehicle: &VehicleProfile,
        history: &[ServiceRecord],
        config: &EngineConfig,
    ) -> MaintenanceSchedule {
        let mileage = vehicle.effective_mileage();

        let optimized = self.intervals.optimize(vehicle, config.oil_change_km);
        let next_oil_due_km =
            mileage + u64::from(optimized.recommended_oil_change_interval_km);

        let base_date = history
            .first()
            .and_then(|record| record.service_date.as_deref())
            .and_then(parse_service_date)
            .unwrap_or_else(|| Utc::now().date_naive());
        let next_check_date = base_date + Duration::days(config.general_check_days);

        debug!(
            vehicle_id = %vehicle.id,
            next_oil_due_km,
            next_check = %next_check_date,
            "Schedule composed"
        );

        MaintenanceSchedule {
            recommended_next_oil_change_km: next_oil_due_km,
            recommended_general_check_date: next_check_date,
            optimized_oil_interval: optimized,
            confidence: SCHEDULE_CONFIDENCE,
            notes: SCHEDULE_NOTES.to_string(),
        }
    }
}

fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> ScheduleComposer {
        ScheduleComposer::new(Arc::new(ModelGateway::new("/nonexistent/models")))
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn next_oil_due_adds_optimized_interval_to_mileage() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(50_000),
            usage_type: Some("city".to_string()),
            driving_conditions: Some("severe".to_string()),
            ..Default::default()
        };
        let schedule = composer().predict_next_maintenance(&vehicle, &[], &config());
        // Fallback interval for city/severe is 10000 - 3000 = 7000
        assert_eq!(
            schedule
                .optimized_oil_interval
                .recommended_oil_change_interval_km,
            7_000
        );
        assert_eq!(schedule.recommended_next_oil_change_km, 57_000);
    }

    #[test]
    fn empty_history_bases_check_date_on_today() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            current_mileage: Some(50_000),
            ..Default::default()
        };
        let schedule = composer().predict_next_maintenance(&vehicle, &[], &config());
        let expected = Utc::now().date_naive() + Duration::days(180);
        assert_eq!(schedule.recommended_general_check_date, expected);
    }

    #[test]
    fn check_date_counts_from_last_service() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let history = vec![ServiceRecord {
            service_date: Some("2024-03-10".to_string()),
            ..Default::default()
        }];
        let schedule = composer().predict_next_maintenance(&vehicle, &history, &config());
        assert_eq!(
            schedule.recommended_general_check_date,
            NaiveDate::from_ymd_opt(2024, 9, 6).unwrap()
        );
    }

    #[test]
    fn unparseable_service_date_falls_back_to_today() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let history = vec![ServiceRecord {
            service_date: Some("last spring".to_string()),
            ..Default::default()
        }];
        let schedule = composer().predict_next_maintenance(&vehicle, &history, &config());
        let expected = Utc::now().date_naive() + Duration::days(180);
        assert_eq!(schedule.recommended_general_check_date, expected);
    }

    #[test]
    fn confidence_is_fixed() {
        let vehicle = VehicleProfile {
            id: "v1".to_string(),
            ..Default::default()
        };
        let schedule = composer().predict_next_maintenance(&vehicle, &[], &config());
        assert_eq!(schedule.confidence, SCHEDULE_CONFIDENCE);
    }
}
