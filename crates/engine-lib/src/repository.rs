//! Repository abstractions over vehicle, history, and prediction storage
//!
//! The engine consumes these as opaque collaborators; durable backends live
//! elsewhere. DashMap-backed in-memory implementations ship with the crate
//! for the CLI and for tests.

use crate::models::{ServiceRecord, StoredPrediction, VehicleProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Storage-level failure surfaced by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Lookup of vehicle profiles by id.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn get_by_id(&self, vehicle_id: &str)
        -> Result<Option<VehicleProfile>, RepositoryError>;
}

/// Lookup of a vehicle's service history, most recent first.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn list_by_vehicle(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<ServiceRecord>, RepositoryError>;
}

/// Append-only store of generated predictions.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn append(&self, record: StoredPrediction) -> Result<(), RepositoryError>;

    /// Stored predictions for a vehicle, newest first.
    async fn list_by_vehicle(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<StoredPrediction>, RepositoryError>;
}

/// In-memory vehicle repository.
#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: DashMap<String, VehicleProfile>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, vehicle: VehicleProfile) {
        self.vehicles.insert(vehicle.id.clone(), vehicle);
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn get_by_id(
        &self,
        vehicle_id: &str,
    ) -> Result<Option<VehicleProfile>, RepositoryError> {
        Ok(self.vehicles.get(vehicle_id).map(|entry| entry.clone()))
    }
}

/// In-memory history repository. Records are sorted most-recent-first on
/// insert so reads match the contract without re-sorting.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    histories: DashMap<String, Vec<ServiceRecord>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, vehicle_id: &str, record: ServiceRecord) {
        let mut entry = self.histories.entry(vehicle_id.to_string()).or_default();
        entry.push(record);
        entry.sort_by(|a, b| b.service_date.cmp(&a.service_date));
    }

    pub fn replace(&self, vehicle_id: &str, mut records: Vec<ServiceRecord>) {
        records.sort_by(|a, b| b.service_date.cmp(&a.service_date));
        self.histories.insert(vehicle_id.to_string(), records);
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn list_by_vehicle(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<ServiceRecord>, RepositoryError> {
        Ok(self
            .histories
            .get(vehicle_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}

/// In-memory prediction store.
#[derive(Default)]
pub struct InMemoryPredictionStore {
    predictions: DashMap<String, Vec<StoredPrediction>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionStore for InMemoryPredictionStore {
    async fn append(&self, record: StoredPrediction) -> Result<(), RepositoryError> {
        self.predictions
            .entry(record.vehicle_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn list_by_vehicle(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<StoredPrediction>, RepositoryError> {
        let mut records = self
            .predictions
            .get(vehicle_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vehicle_repository_round_trip() {
        let repo = InMemoryVehicleRepository::new();
        repo.insert(VehicleProfile {
            id: "v1".to_string(),
            make: Some("Nissan".to_string()),
            ..Default::default()
        });

        let found = repo.get_by_id("v1").await.unwrap();
        assert_eq!(found.unwrap().make.as_deref(), Some("Nissan"));
        assert!(repo.get_by_id("v2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_listed_most_recent_first() {
        let repo = InMemoryHistoryRepository::new();
        repo.insert(
            "v1",
            ServiceRecord {
                service_date: Some("2023-01-15".to_string()),
                ..Default::default()
            },
        );
        repo.insert(
            "v1",
            ServiceRecord {
                service_date: Some("2024-06-01".to_string()),
                ..Default::default()
            },
        );

        let history = repo.list_by_vehicle("v1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].service_date.as_deref(), Some("2024-06-01"));
    }

    #[tokio::test]
    async fn unknown_vehicle_has_empty_history() {
        let repo = InMemoryHistoryRepository::new();
        assert!(repo.list_by_vehicle("missing").await.unwrap().is_empty());
    }
}
