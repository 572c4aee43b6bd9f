//! Predictor artifact gateway
//!
//! Locates and deserializes trained ONNX predictors from a fixed location
//! under the configured model directory. Every load failure (missing file,
//! checksum mismatch, parse error) is swallowed and reported as absence so
//! the estimators can degrade to their rule-based tiers.

use crate::predictor::features::{COST_FEATURE_WIDTH, INTERVAL_FEATURE_WIDTH};
use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// The two predictor artifacts the engine knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictorKind {
    Cost,
    Interval,
}

impl PredictorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorKind::Cost => "cost",
            PredictorKind::Interval => "interval",
        }
    }

    /// File stem of the artifact under the model directory.
    fn artifact_stem(&self) -> &'static str {
        match self {
            PredictorKind::Cost => "cost_model",
            PredictorKind::Interval => "interval_model",
        }
    }

    /// Label reported as `model_used` when the artifact carries no name.
    pub fn default_label(&self) -> &'static str {
        match self {
            PredictorKind::Cost => "trained_regressor",
            PredictorKind::Interval => "trained_interval_model",
        }
    }

    /// Expected input row width for the artifact.
    fn input_width(&self) -> usize {
        match self {
            PredictorKind::Cost => COST_FEATURE_WIDTH,
            PredictorKind::Interval => INTERVAL_FEATURE_WIDTH,
        }
    }
}

/// Optional sidecar metadata shipped next to an artifact.
#[derive(Debug, Default, Deserialize)]
struct ArtifactMeta {
    #[serde(default)]
    model_name: Option<String>,
}

/// A fitted predictor loaded from disk. Immutable once loaded.
pub struct LoadedPredictor {
    plan: TractModel,
    name: String,
    input_width: usize,
}

impl LoadedPredictor {
    /// Declared name of the underlying model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a single-row query and return the predicted scalar.
    pub fn predict_scalar(&self, row: &[f32]) -> Result<f32> {
        if row.len() != self.input_width {
            anyhow::bail!(
                "feature row has {} values, predictor expects {}",
                row.len(),
                self.input_width
            );
        }

        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.input_width), row.to_vec())
            .context("Failed to shape feature row")?
            .into();

        let result = self.plan.run(tvec!(input.into()))?;
        let output = result.get(0).context("No output from model")?;
        let view = output.to_array_view::<f32>()?;
        view.iter()
            .next()
            .copied()
            .context("Model produced an empty output tensor")
    }
}

/// Process-wide gateway to the trained predictors.
///
/// Successful loads are cached per kind for the process lifetime; artifacts
/// are not expected to change while the process runs. Misses re-probe the
/// filesystem, which is idempotent and side-effect-free.
pub struct ModelGateway {
    model_dir: PathBuf,
    cache: DashMap<PredictorKind, Arc<LoadedPredictor>>,
}

impl ModelGateway {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            cache: DashMap::new(),
        }
    }

    /// Attempt to load the predictor for `kind`. `None` means unavailable;
    /// callers must fall back rather than fail.
    pub fn load(&self, kind: PredictorKind) -> Option<Arc<LoadedPredictor>> {
        if let Some(cached) = self.cache.get(&kind) {
            return Some(Arc::clone(&cached));
        }

        match self.try_load(kind) {
            Ok(predictor) => {
                // First successful load wins; a concurrent duplicate is
                // discarded, which is harmless since artifacts are immutable.
                let entry = self
                    .cache
                    .entry(kind)
                    .or_insert_with(|| Arc::new(predictor));
                Some(Arc::clone(&entry))
            }
            Err(e) => {
                debug!(kind = kind.as_str(), error = %e, "Predictor unavailable");
                None
            }
        }
    }

    fn try_load(&self, kind: PredictorKind) -> Result<LoadedPredictor> {
        let path = self
            .model_dir
            .join(format!("{}.onnx", kind.artifact_stem()));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read model artifact {:?}", path))?;

        verify_checksum(&path, &bytes)?;

        let input_width = kind.input_width();
        let plan = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(&bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;

        let name =
            read_declared_name(&path).unwrap_or_else(|| kind.default_label().to_string());

        debug!(kind = kind.as_str(), name = %name, "Predictor loaded");

        Ok(LoadedPredictor {
            plan,
            name,
            input_width,
        })
    }
}

/// Verify the artifact against its `.sha256` sidecar if one is present.
fn verify_checksum(artifact: &Path, bytes: &[u8]) -> Result<()> {
    let sidecar = artifact.with_extension("onnx.sha256");
    if !sidecar.exists() {
        return Ok(());
    }

    let expected = std::fs::read_to_string(&sidecar)
        .with_context(|| format!("Failed to read checksum sidecar {:?}", sidecar))?
        .trim()
        .to_lowercase();
    let actual = hex::encode(Sha256::digest(bytes));

    if actual != expected {
        warn!(
            artifact = %artifact.display(),
            expected = %expected,
            actual = %actual,
            "Model artifact checksum mismatch"
        );
        anyhow::bail!("Checksum mismatch: expected {}, got {}", expected, actual);
    }
    Ok(())
}

/// Read the declared model name from the `.meta.json` sidecar, if any.
fn read_declared_name(artifact: &Path) -> Option<String> {
    let sidecar = artifact.with_extension("meta.json");
    let raw = std::fs::read_to_string(sidecar).ok()?;
    let meta: ArtifactMeta = serde_json::from_str(&raw).ok()?;
    meta.model_name.filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_returns_none_when_artifact_missing() {
        let gateway = ModelGateway::new("/nonexistent/models");
        assert!(gateway.load(PredictorKind::Cost).is_none());
        assert!(gateway.load(PredictorKind::Interval).is_none());
    }

    #[test]
    fn load_swallows_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cost_model.onnx"), b"not an onnx graph").unwrap();

        let gateway = ModelGateway::new(dir.path());
        assert!(gateway.load(PredictorKind::Cost).is_none());
    }

    #[test]
    fn checksum_sidecar_accepts_matching_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost_model.onnx");
        let bytes = b"model bytes";
        fs::write(&path, bytes).unwrap();
        fs::write(
            dir.path().join("cost_model.onnx.sha256"),
            hex::encode(Sha256::digest(bytes)),
        )
        .unwrap();

        assert!(verify_checksum(&path, bytes).is_ok());
    }

    #[test]
    fn checksum_sidecar_rejects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost_model.onnx");
        fs::write(&path, b"model bytes").unwrap();
        fs::write(dir.path().join("cost_model.onnx.sha256"), "0".repeat(64)).unwrap();

        assert!(verify_checksum(&path, b"model bytes").is_err());
    }

    #[test]
    fn checksum_missing_sidecar_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost_model.onnx");
        fs::write(&path, b"model bytes").unwrap();

        assert!(verify_checksum(&path, b"model bytes").is_ok());
    }

    #[test]
    fn checksum_mismatch_makes_predictor_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("interval_model.onnx"), b"bytes").unwrap();
        fs::write(dir.path().join("interval_model.onnx.sha256"), "0".repeat(64)).unwrap();

        let gateway = ModelGateway::new(dir.path());
        assert!(gateway.load(PredictorKind::Interval).is_none());
    }

    #[test]
    fn declared_name_read_from_meta_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost_model.onnx");
        fs::write(&path, b"bytes").unwrap();
        fs::write(
            dir.path().join("cost_model.meta.json"),
            r#"{"model_name": "RandomForestRegressor"}"#,
        )
        .unwrap();

        assert_eq!(
            read_declared_name(&path).as_deref(),
            Some("RandomForestRegressor")
        );
    }

    #[test]
    fn declared_name_absent_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost_model.onnx");
        fs::write(&path, b"bytes").unwrap();

        assert!(read_declared_name(&path).is_none());
    }
}
