//! Cost estimation command

use crate::input;
use crate::output::{color_tier, format_currency, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use engine_lib::config::EngineConfig;
use engine_lib::predictor::MaintenancePredictor;
use std::path::Path;

pub fn run(
    config: &EngineConfig,
    vehicle_path: &Path,
    history_path: Option<&Path>,
    service_type: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let vehicle = input::load_vehicle(vehicle_path)?;
    let history = input::load_history(history_path)?;

    let predictor = MaintenancePredictor::from_config(config);
    let estimate = predictor.estimate_cost(&vehicle, &history, service_type);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
        OutputFormat::Table => {
            println!("{}", "Cost Estimate".bold());
            println!("{}", "=".repeat(50));
            println!("Vehicle:                {}", vehicle.id.cyan());
            println!("Service type:           {}", estimate.service_type);
            println!(
                "Estimated cost:         {}",
                format_currency(estimate.estimated_cost).green().bold()
            );
            println!("Tier:                   {}", color_tier(&estimate.model_used));
        }
    }

    Ok(())
}
