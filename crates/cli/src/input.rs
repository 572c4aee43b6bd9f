//! Loading vehicle and history documents from disk

use anyhow::{Context, Result};
use engine_lib::models::{ServiceRecord, VehicleProfile};
use std::path::Path;

pub fn load_vehicle(path: &Path) -> Result<VehicleProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read vehicle document {:?}", path))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse vehicle document {:?}", path))
}

/// Load a service history document. No path means an empty history.
pub fn load_history(path: Option<&Path>) -> Result<Vec<ServiceRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history document {:?}", path))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse history document {:?}", path))
}
