//! ONNX Runtime oracle
//!
//! For regressors exported with skl2onnx: one `(1, n_features)` float input,
//! the first element of the first output is the prediction.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::oracle::{check_finite, check_width, ModelOracle};
use crate::error::{ArtifactLoadError, OracleError};
use crate::logic::features::FeatureVector;

pub struct OnnxOracle {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    n_features: usize,
}

impl OnnxOracle {
    /// Load ONNX model từ bytes
    pub fn from_memory(model_bytes: &[u8], n_features: usize) -> Result<Self, ArtifactLoadError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| onnx_load_error(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| onnx_load_error(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| onnx_load_error(format!("Load from memory error: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            n_features,
        })
    }
}

fn onnx_load_error(reason: String) -> ArtifactLoadError {
    ArtifactLoadError::InvalidModel(reason)
}

impl ModelOracle for OnnxOracle {
    fn predict(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        check_width(self.n_features, features)?;

        let input_data: Vec<f32> = features.as_slice().iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, self.n_features), input_data)
            .map_err(|e| OracleError::Backend(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| OracleError::Backend(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| OracleError::Backend("No output defined".to_string()))?;

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| OracleError::Backend(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&output_name)
            .ok_or_else(|| OracleError::Backend("No output".to_string()))?;

        let output_tensor = output.try_extract_tensor::<f32>()
            .map_err(|e| OracleError::Backend(format!("Extract error: {}", e)))?;

        let value = output_tensor.1.first()
            .copied()
            .ok_or_else(|| OracleError::Backend("Empty output tensor".to_string()))?;

        check_finite(f64::from(value))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
