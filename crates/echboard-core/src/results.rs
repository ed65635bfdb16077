//! Saved simulation results (`simulate --save`, `show`, `export`)

use std::path::Path;

use echboard_types::SimulationResult;
use tracing::debug;

use crate::error::{CoreError, LoadError, LoadReport};

/// Read a simulation result saved as JSON
pub async fn load_result(path: &Path) -> Result<SimulationResult, CoreError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CoreError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let result: SimulationResult =
        serde_json::from_str(&content).map_err(|e| CoreError::JsonParse {
            path: path.to_path_buf(),
            message: e.to_string(),
            source: e,
        })?;

    debug!(
        path = %path.display(),
        scenario_id = result.scenario_id,
        dates = result.dates.len(),
        "Loaded simulation result"
    );
    Ok(result)
}

/// Load, recording the failure in `report` instead of returning it
pub async fn load_result_graceful(path: &Path, report: &mut LoadReport) -> Option<SimulationResult> {
    match load_result(path).await {
        Ok(result) => Some(result),
        Err(e) => {
            report.add_error(LoadError::from_core_error("result", &e));
            None
        }
    }
}

/// Write a result as pretty JSON, creating parent directories
pub async fn save_result(result: &SimulationResult, path: &Path) -> Result<(), CoreError> {
    let write_error = |e: std::io::Error| CoreError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let content = serde_json::to_string_pretty(result).map_err(|e| CoreError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: e,
    })?;
    tokio::fs::write(path, content).await.map_err(write_error)
}
