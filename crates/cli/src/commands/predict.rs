//! Combined prediction command

use crate::input;
use crate::output::{color_tier, format_confidence, format_currency, format_km, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use engine_lib::config::EngineConfig;
use engine_lib::models::ServiceRecord;
use engine_lib::repository::{
    InMemoryHistoryRepository, InMemoryPredictionStore, InMemoryVehicleRepository,
};
use engine_lib::service::PredictionService;
use std::path::Path;
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};

/// Row for the verbose service-history table
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Mileage")]
    mileage: String,
}

impl From<&ServiceRecord> for HistoryRow {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            date: record.service_date.clone().unwrap_or_else(|| "-".to_string()),
            service: record
                .service_type
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            cost: record
                .cost
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string()),
            mileage: record
                .mileage
                .map(format_km)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn run(
    config: &EngineConfig,
    vehicle_path: &Path,
    history_path: Option<&Path>,
    service_type: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let vehicle = input::load_vehicle(vehicle_path)?;
    let history = input::load_history(history_path)?;
    let vehicle_id = vehicle.id.clone();

    // Wire the engine exactly the way a request handler would, over
    // in-memory repositories seeded from the loaded documents.
    let vehicles = Arc::new(InMemoryVehicleRepository::new());
    vehicles.insert(vehicle);
    let history_repo = Arc::new(InMemoryHistoryRepository::new());
    history_repo.replace(&vehicle_id, history.clone());
    let store = Arc::new(InMemoryPredictionStore::new());

    let service = PredictionService::new(vehicles, history_repo, store, config.clone());
    let record = service.predict(&vehicle_id, service_type).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Table => {
            let schedule = &record.prediction.maintenance_schedule;
            let cost = &record.prediction.cost_prediction;

            println!("{}", "Maintenance Prediction".bold());
            println!("{}", "=".repeat(50));
            println!("Vehicle:                {}", record.vehicle_id.cyan());
            println!();

            println!("{}", "Schedule".bold());
            println!("{}", "-".repeat(50));
            println!(
                "Next oil change:        {}",
                format_km(schedule.recommended_next_oil_change_km)
            );
            println!(
                "Oil interval:           {}",
                format_km(u64::from(
                    schedule
                        .optimized_oil_interval
                        .recommended_oil_change_interval_km
                ))
            );
            println!(
                "Next general check:     {}",
                schedule.recommended_general_check_date
            );
            println!(
                "Confidence:             {}",
                format_confidence(schedule.confidence)
            );
            println!(
                "Interval tier:          {}",
                color_tier(&schedule.optimized_oil_interval.model_used)
            );
            println!("Reason:                 {}", schedule.optimized_oil_interval.reason);
            println!();

            println!("{}", "Cost".bold());
            println!("{}", "-".repeat(50));
            println!("Service type:           {}", cost.service_type);
            println!(
                "Estimated cost:         {}",
                format_currency(cost.estimated_cost).green().bold()
            );
            println!("Cost tier:              {}", color_tier(&cost.model_used));

            if verbose && !history.is_empty() {
                println!();
                println!("{}", "Service history used".bold());
                let rows: Vec<HistoryRow> = history.iter().map(HistoryRow::from).collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{}", table);
            }

            println!();
            println!(
                "Generated: {}",
                record.created_at.to_rfc3339().dimmed()
            );
        }
    }

    Ok(())
}
