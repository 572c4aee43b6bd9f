//! Interval recommendation command

use crate::input;
use crate::output::{color_tier, format_km, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use engine_lib::config::EngineConfig;
use engine_lib::predictor::MaintenancePredictor;
use std::path::Path;

pub fn run(
    config: &EngineConfig,
    vehicle_path: &Path,
    default_km: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let vehicle = input::load_vehicle(vehicle_path)?;
    let default_interval = default_km.unwrap_or(config.oil_change_km);

    let predictor = MaintenancePredictor::from_config(config);
    let recommendation = predictor.optimize_oil_interval(&vehicle, default_interval);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        }
        OutputFormat::Table => {
            println!("{}", "Oil Interval Recommendation".bold());
            println!("{}", "=".repeat(50));
            println!("Vehicle:                {}", vehicle.id.cyan());
            println!(
                "Recommended interval:   {}",
                format_km(u64::from(recommendation.recommended_oil_change_interval_km))
                    .green()
                    .bold()
            );
            println!(
                "Tier:                   {}",
                color_tier(&recommendation.model_used)
            );
            println!("Reason:                 {}", recommendation.reason);
        }
    }

    Ok(())
}
