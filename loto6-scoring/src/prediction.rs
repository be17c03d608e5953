use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use loto6_db::models::{Draw, PICK_COUNT};

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::ranking::rank_scores;
use crate::reasons::{assign_reasons, DefaultCatalogue, PhraseCatalogue, Reason};
use crate::scoring::{ordered_desc, NumberScore, ScoringEngine};
use crate::selection::{rescore_balance, select_balanced};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Les six numéros recommandés, par ordre croissant.
    pub recommended: Vec<u8>,
    /// Les 43 scores finaux, du meilleur au moins bon.
    pub scores: Vec<NumberScore>,
    pub reasons: Vec<Reason>,
    /// Date du tirage le plus récent de l'historique.
    pub analysis_date: NaiveDate,
    pub total_draws: usize,
    /// Taille effective de la fenêtre récente : min(fenêtre, nombre de tirages).
    pub recent_window: usize,
    pub latest_draw_number: u32,
    pub latest_numbers: [u8; PICK_COUNT],
    pub latest_bonus: u8,
}

impl PredictionResult {
    pub fn reason_for(&self, number: u8) -> Option<&str> {
        self.reasons
            .iter()
            .find(|r| r.number == number)
            .map(|r| r.text.as_str())
    }
}

pub struct Predictor {
    engine: ScoringEngine,
    catalogue: Box<dyn PhraseCatalogue>,
}

impl Predictor {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        Self::with_catalogue(config, Box::new(DefaultCatalogue))
    }

    pub fn with_catalogue(
        config: ScoringConfig,
        catalogue: Box<dyn PhraseCatalogue>,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            engine: ScoringEngine::new(config)?,
            catalogue,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        self.engine.config()
    }

    /// Scores provisoires → sélection équilibrée → recalcul de l'équilibre →
    /// classement → justifications.
    pub fn predict(&self, draws: &[Draw]) -> Result<PredictionResult, ScoringError> {
        let config = self.engine.config();
        let mut scores = self.engine.score(draws)?;

        let latest = ordered_desc(draws)
            .first()
            .copied()
            .ok_or(ScoringError::InsufficientData)?;

        let selected = select_balanced(&scores, config.max_per_category);
        rescore_balance(&mut scores, &selected, &config.weights);
        let ranked = rank_scores(scores);

        let reasons = assign_reasons(
            &selected,
            &ranked,
            self.catalogue.as_ref(),
            config.strong_indicator_threshold,
        );

        let mut recommended = selected;
        recommended.sort_unstable();

        info!(
            draws = draws.len(),
            latest = latest.draw_number,
            ?recommended,
            "prédiction terminée"
        );

        Ok(PredictionResult {
            recommended,
            scores: ranked,
            reasons,
            analysis_date: latest.date,
            total_draws: draws.len(),
            recent_window: config.recent_window.min(draws.len()),
            latest_draw_number: latest.draw_number,
            latest_numbers: latest.numbers,
            latest_bonus: latest.bonus,
        })
    }
}

/// Raccourci : pipeline complet avec le catalogue de phrases par défaut.
pub fn predict(draws: &[Draw], config: &ScoringConfig) -> Result<PredictionResult, ScoringError> {
    Predictor::new(config.clone())?.predict(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_test_draws, test_draw as draw};

    #[test]
    fn test_predict_recommends_six_sorted() {
        let result = predict(&make_test_draws(120), &ScoringConfig::default()).unwrap();
        assert_eq!(result.recommended.len(), 6);
        assert!(result.recommended.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(result.scores.len(), 43);
        assert_eq!(result.reasons.len(), 6);
        for n in &result.recommended {
            assert!(result.reason_for(*n).is_some());
        }
    }

    #[test]
    fn test_predict_reports_latest_draw() {
        let draws = vec![
            draw(3, [8, 9, 10, 11, 12, 13]),
            draw(1, [1, 2, 3, 4, 5, 6]),
            draw(2, [1, 2, 3, 4, 5, 7]),
        ];
        let result = predict(&draws, &ScoringConfig::default()).unwrap();
        assert_eq!(result.latest_draw_number, 3);
        assert_eq!(result.latest_numbers, [8, 9, 10, 11, 12, 13]);
        assert_eq!(result.analysis_date, draws[0].date);
        assert_eq!(result.total_draws, 3);
        assert_eq!(result.recent_window, 3);
    }

    #[test]
    fn test_recent_window_capped_by_history() {
        let result = predict(&make_test_draws(80), &ScoringConfig::default()).unwrap();
        assert_eq!(result.recent_window, 50);
        let result = predict(&make_test_draws(12), &ScoringConfig::default()).unwrap();
        assert_eq!(result.recent_window, 12);
    }

    #[test]
    fn test_scores_ranked_after_rescore() {
        let config = ScoringConfig::default();
        let result = predict(&make_test_draws(90), &config).unwrap();
        for pair in result.scores.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
        for s in &result.scores {
            assert!((s.total - s.weighted_total(&config.weights)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_predict_empty_history() {
        assert_eq!(
            predict(&[], &ScoringConfig::default()),
            Err(ScoringError::InsufficientData)
        );
    }

    #[test]
    fn test_invalid_config_rejected_before_scoring() {
        let config = ScoringConfig { max_per_category: 0, ..ScoringConfig::default() };
        assert!(matches!(
            Predictor::new(config),
            Err(ScoringError::InvalidConfig(_))
        ));
    }
}
