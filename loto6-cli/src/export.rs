use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use loto6_scoring::PredictionResult;

/// Document JSON exporté par `predict --json`.
#[derive(Debug, Serialize)]
pub struct PredictionExport<'a> {
    pub generated_at: DateTime<Local>,
    #[serde(flatten)]
    pub prediction: &'a PredictionResult,
}

pub fn export_prediction(result: &PredictionResult, path: &Path) -> Result<()> {
    let doc = PredictionExport {
        generated_at: Local::now(),
        prediction: result,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire l'export {:?}", path))?;
    Ok(())
}
