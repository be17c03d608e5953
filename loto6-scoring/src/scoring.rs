use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use loto6_db::models::{validate_numbers, Draw, POOL_SIZE};

use crate::config::{ScoreWeights, ScoringConfig};
use crate::error::ScoringError;

/// Les cinq indicateurs qui composent le score d'un numéro.
/// L'ordre de déclaration sert de départage stable entre sous-scores égaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Frequency,
    Trend,
    Interval,
    Balance,
    Carryover,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Frequency,
        Indicator::Trend,
        Indicator::Interval,
        Indicator::Balance,
        Indicator::Carryover,
    ];
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indicator::Frequency => write!(f, "fréquence"),
            Indicator::Trend => write!(f, "tendance"),
            Indicator::Interval => write!(f, "intervalle"),
            Indicator::Balance => write!(f, "équilibre"),
            Indicator::Carryover => write!(f, "report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberScore {
    pub number: u8,
    pub total_appearances: u32,
    pub recent_appearances: u32,
    /// Tirages écoulés depuis la dernière sortie (0 = sorti au dernier tirage).
    pub gap: u32,
    /// Présent dans le tirage le plus récent.
    pub carried_over: bool,
    pub frequency: f64,
    pub trend: f64,
    pub interval: f64,
    pub balance: f64,
    pub carryover: f64,
    pub total: f64,
}

impl NumberScore {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            total_appearances: 0,
            recent_appearances: 0,
            gap: 0,
            carried_over: false,
            frequency: 0.0,
            trend: 0.0,
            interval: 0.0,
            balance: 0.0,
            carryover: 0.0,
            total: 0.0,
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Frequency => self.frequency,
            Indicator::Trend => self.trend,
            Indicator::Interval => self.interval,
            Indicator::Balance => self.balance,
            Indicator::Carryover => self.carryover,
        }
    }

    pub fn weighted_total(&self, weights: &ScoreWeights) -> f64 {
        Indicator::ALL
            .iter()
            .map(|&i| self.indicator(i) * weights.weight(i))
            .sum()
    }

    pub fn recompute_total(&mut self, weights: &ScoreWeights) {
        self.total = self.weighted_total(weights);
    }

    /// Indicateurs triés par sous-score décroissant (tri stable sur l'ordre de déclaration).
    pub fn ranked_indicators(&self) -> Vec<(Indicator, f64)> {
        let mut ranked: Vec<(Indicator, f64)> = Indicator::ALL
            .iter()
            .map(|&i| (i, self.indicator(i)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// Index zéro-based d'un numéro : `number - 1`. Les numéros 0 et 44 n'existent pas.
pub(crate) fn index_of(number: u8) -> usize {
    debug_assert!((1..=POOL_SIZE).contains(&number), "numéro {} hors de 1..=43", number);
    (number - 1) as usize
}

/// Compteurs de report : pour chaque numéro, combien de fois il figurait dans un
/// tirage suivi d'un autre (`eligible`) et combien de fois il est ressorti au
/// tirage suivant (`carried`).
#[derive(Debug, Clone, PartialEq)]
pub struct CarryCounts {
    pub eligible: Vec<u32>,
    pub carried: Vec<u32>,
}

impl CarryCounts {
    /// Taux de report d'un numéro ; 0 s'il n'a jamais été éligible ou hors de 1..=43.
    pub fn rate(&self, number: u8) -> f64 {
        if !(1..=POOL_SIZE).contains(&number) {
            return 0.0;
        }
        let idx = index_of(number);
        if self.eligible[idx] == 0 {
            0.0
        } else {
            self.carried[idx] as f64 / self.eligible[idx] as f64
        }
    }
}

/// Vérifie l'historique avant tout calcul : non vide, et chaque tirage porte
/// six numéros distincts dans 1..=43.
pub fn validate_history(draws: &[Draw]) -> Result<(), ScoringError> {
    if draws.is_empty() {
        return Err(ScoringError::InsufficientData);
    }
    for draw in draws {
        validate_numbers(&draw.numbers).map_err(|source| ScoringError::MalformedDraw {
            draw_number: draw.draw_number,
            source,
        })?;
    }
    Ok(())
}

/// Tirages du plus récent au plus ancien (par numéro de tirage).
pub fn ordered_desc(draws: &[Draw]) -> Vec<&Draw> {
    let mut ordered: Vec<&Draw> = draws.iter().collect();
    ordered.sort_by(|a, b| b.draw_number.cmp(&a.draw_number));
    ordered
}

/// Normalisation min-max vers [0, 1]. Si toutes les valeurs sont égales, chacune vaut 0.5.
pub fn min_max_normalize(values: &[u32]) -> Vec<f64> {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    if max == min {
        return vec![0.5; values.len()];
    }
    let range = (max - min) as f64;
    values.iter().map(|&v| (v - min) as f64 / range).collect()
}

/// Position (0 = plus récent) de la dernière sortie de chaque numéro,
/// ou le nombre total de tirages s'il n'est jamais sorti.
pub fn compute_gaps(ordered: &[&Draw]) -> Vec<u32> {
    (1..=POOL_SIZE)
        .map(|number| {
            ordered
                .iter()
                .position(|d| d.contains(number))
                .unwrap_or(ordered.len()) as u32
        })
        .collect()
}

/// `ordered` doit aller du plus récent au plus ancien : chaque tirage i est
/// comparé à son prédécesseur i + 1.
pub fn carry_counts(ordered: &[&Draw]) -> CarryCounts {
    let size = POOL_SIZE as usize;
    let mut eligible = vec![0u32; size];
    let mut carried = vec![0u32; size];

    for pair in ordered.windows(2) {
        let (current, previous) = (pair[0], pair[1]);
        for &n in &previous.numbers {
            let idx = index_of(n);
            eligible[idx] += 1;
            if current.contains(n) {
                carried[idx] += 1;
            }
        }
    }

    CarryCounts { eligible, carried }
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Calcule les 43 scores provisoires (équilibre fixé à 0.5).
    /// Le résultat est indexé par `index_of(number)`.
    pub fn score(&self, draws: &[Draw]) -> Result<Vec<NumberScore>, ScoringError> {
        validate_history(draws)?;

        let ordered = ordered_desc(draws);
        let mut scores: Vec<NumberScore> = (1..=POOL_SIZE).map(NumberScore::new).collect();

        // Apparitions sur tout l'historique et sur la fenêtre récente
        for draw in draws {
            for &n in &draw.numbers {
                scores[index_of(n)].total_appearances += 1;
            }
        }
        for draw in ordered.iter().take(self.config.recent_window) {
            for &n in &draw.numbers {
                scores[index_of(n)].recent_appearances += 1;
            }
        }

        for (score, gap) in scores.iter_mut().zip(compute_gaps(&ordered)) {
            score.gap = gap;
        }

        let totals: Vec<u32> = scores.iter().map(|s| s.total_appearances).collect();
        let recents: Vec<u32> = scores.iter().map(|s| s.recent_appearances).collect();
        let gaps: Vec<u32> = scores.iter().map(|s| s.gap).collect();

        let frequency = min_max_normalize(&totals);
        let trend = min_max_normalize(&recents);
        let interval = min_max_normalize(&gaps);

        for (i, score) in scores.iter_mut().enumerate() {
            score.frequency = frequency[i];
            score.trend = trend[i];
            score.interval = interval[i];
            score.balance = 0.5;
        }

        self.apply_carryover(&ordered, &mut scores);

        for score in &mut scores {
            score.recompute_total(&self.config.weights);
        }

        debug!(
            draws = draws.len(),
            recent_window = self.config.recent_window.min(draws.len()),
            "scores provisoires calculés"
        );

        Ok(scores)
    }

    fn apply_carryover(&self, ordered: &[&Draw], scores: &mut [NumberScore]) {
        let counts = carry_counts(ordered);
        let rates: Vec<f64> = (1..=POOL_SIZE).map(|n| counts.rate(n)).collect();
        let mean_rate = rates.iter().sum::<f64>() / rates.len() as f64;

        let last_numbers: HashSet<u8> = ordered
            .first()
            .map(|d| d.numbers.iter().copied().collect())
            .unwrap_or_default();

        for (i, score) in scores.iter_mut().enumerate() {
            score.carried_over = last_numbers.contains(&score.number);
            score.carryover = if score.carried_over && mean_rate > 0.0 {
                (self.config.carryover_factor * (rates[i] / mean_rate)).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }

        debug!(mean_rate, "taux de report moyen");
    }
}
