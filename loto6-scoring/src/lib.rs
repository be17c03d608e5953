pub mod config;
pub mod error;
pub mod prediction;
pub mod ranking;
pub mod reasons;
pub mod scoring;
pub mod selection;
pub mod stats;

pub use config::{load_config, save_config, ScoreWeights, ScoringConfig};
pub use error::ScoringError;
pub use prediction::{predict, PredictionResult, Predictor};
pub use reasons::{DefaultCatalogue, PhraseCatalogue, Reason};
pub use scoring::{Indicator, NumberScore, ScoringEngine};
pub use stats::{analyze, StatisticsReport};

use chrono::{Duration, NaiveDate};
use loto6_db::models::{Draw, PRIZE_TIERS};

/// Historique synthétique déterministe de `n` tirages valides, un par semaine.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    let start = NaiveDate::from_ymd_opt(2000, 10, 5).unwrap_or_default();
    (0..n)
        .map(|i| {
            let mut numbers = [0u8; 6];
            for (k, slot) in numbers.iter_mut().enumerate() {
                // 11 et 43 premiers entre eux : six valeurs distinctes
                *slot = ((i * 7 + k * 11) % 43 + 1) as u8;
            }
            Draw {
                draw_number: i as u32 + 1,
                date: start + Duration::days(7 * i as i64),
                numbers,
                bonus: ((i * 5) % 43 + 1) as u8,
                prize_counts: [0; PRIZE_TIERS],
                prize_amounts: [0; PRIZE_TIERS],
                carryover: 0,
                sales: 0,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_draw(draw_number: u32, numbers: [u8; 6]) -> Draw {
    Draw {
        draw_number,
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(draw_number as i64),
        numbers,
        bonus: 1,
        prize_counts: [0; PRIZE_TIERS],
        prize_amounts: [0; PRIZE_TIERS],
        carryover: 0,
        sales: 0,
    }
}
