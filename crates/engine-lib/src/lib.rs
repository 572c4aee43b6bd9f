//! Engine library for vehicle maintenance prediction
//!
//! This crate provides the core functionality for:
//! - Feature construction from vehicle profiles and service history
//! - Loading trained predictor artifacts with graceful degradation
//! - Two-tier cost estimation and oil-interval optimization
//! - Next-due schedule composition
//! - Repository abstractions and the caller-facing prediction service

pub mod config;
pub mod models;
pub mod predictor;
pub mod repository;
pub mod service;

pub use config::{EngineConfig, DEFAULT_GENERAL_CHECK_DAYS, DEFAULT_OIL_CHANGE_KM};
pub use models::*;
pub use predictor::MaintenancePredictor;
pub use service::{PredictionService, ServiceError};
