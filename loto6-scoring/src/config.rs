use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::scoring::Indicator;

/// Poids des cinq sous-scores dans le score total. Leur somme doit valoir 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub frequency: f64,
    pub trend: f64,
    pub interval: f64,
    pub balance: f64,
    pub carryover: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            frequency: 0.20,
            trend: 0.30,
            interval: 0.20,
            balance: 0.10,
            carryover: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn weight(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Frequency => self.frequency,
            Indicator::Trend => self.trend,
            Indicator::Interval => self.interval,
            Indicator::Balance => self.balance,
            Indicator::Carryover => self.carryover,
        }
    }

    pub fn sum(&self) -> f64 {
        Indicator::ALL.iter().map(|&i| self.weight(i)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Nombre de tirages récents utilisés pour le score de tendance.
    pub recent_window: usize,
    /// Plafond par catégorie (pair, impair, bas, haut) lors de la sélection.
    pub max_per_category: usize,
    /// Score de report attribué à un numéro dont le taux de report égale la moyenne.
    pub carryover_factor: f64,
    /// Seuil à partir duquel un indicateur secondaire justifie une phrase combinée.
    pub strong_indicator_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            recent_window: 50,
            max_per_category: 4,
            carryover_factor: 0.7,
            strong_indicator_threshold: 0.7,
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        for indicator in Indicator::ALL {
            let w = self.weights.weight(indicator);
            if !w.is_finite() || w < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "poids {} négatif ou non fini : {}",
                    indicator, w
                )));
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidConfig(format!(
                "la somme des poids vaut {:.6} au lieu de 1",
                sum
            )));
        }
        if self.recent_window == 0 {
            return Err(ScoringError::InvalidConfig(
                "la fenêtre récente doit contenir au moins un tirage".into(),
            ));
        }
        if self.max_per_category == 0 {
            return Err(ScoringError::InvalidConfig(
                "le plafond par catégorie doit être au moins 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.carryover_factor) {
            return Err(ScoringError::InvalidConfig(format!(
                "facteur de report hors de [0, 1] : {}",
                self.carryover_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.strong_indicator_threshold) {
            return Err(ScoringError::InvalidConfig(format!(
                "seuil d'indicateur fort hors de [0, 1] : {}",
                self.strong_indicator_threshold
            )));
        }
        Ok(())
    }
}

pub fn save_config(config: &ScoringConfig, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire la configuration {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> anyhow::Result<ScoringConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
    let config: ScoringConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration illisible {:?}", path))?;
    config.validate()?;
    Ok(config)
}
