//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Format a monetary amount
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a distance in kilometers
pub fn format_km(km: u64) -> String {
    format!("{} km", km)
}

/// Format confidence as percentage
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Color a tier label: trained models green, the rule-based tier yellow
pub fn color_tier(model_used: &str) -> String {
    if model_used == "rule_based_fallback" {
        model_used.yellow().to_string()
    } else {
        model_used.green().to_string()
    }
}
