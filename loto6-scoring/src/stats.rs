use serde::{Deserialize, Serialize};
use tracing::debug;

use loto6_db::models::{Draw, PICK_COUNT};

use crate::error::ScoringError;
use crate::scoring::validate_history;

/// Plages de sommes des six numéros. La plus petite somme possible est
/// 1+2+…+6 = 21, la plus grande 38+39+…+43 = 243.
pub const SUM_RANGES: [(u32, u32); 8] = [
    (21, 50),
    (51, 80),
    (81, 110),
    (111, 140),
    (141, 170),
    (171, 200),
    (201, 230),
    (231, 258),
];

/// Six numéros triés ont au plus cinq écarts : de 0 à 5 paires consécutives.
pub const CONSECUTIVE_BUCKETS: usize = PICK_COUNT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: u32,
    /// Pourcentage des tirages (0-100).
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub buckets: Vec<Bucket>,
    /// Index de la classe la plus fréquente (la première en cas d'égalité).
    pub modal_index: usize,
}

impl Distribution {
    fn from_counts(labels: Vec<String>, counts: &[u32], total: usize) -> Self {
        let buckets = labels
            .into_iter()
            .zip(counts)
            .map(|(label, &count)| Bucket {
                label,
                count,
                percentage: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        let max = counts.iter().copied().max().unwrap_or(0);
        let modal_index = counts.iter().position(|&c| c == max).unwrap_or(0);

        Self { buckets, modal_index }
    }

    pub fn modal(&self) -> Option<&Bucket> {
        self.buckets.get(self.modal_index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumDistribution {
    pub distribution: Distribution,
    pub average: f64,
    pub median: f64,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub parity: Distribution,
    pub high_low: Distribution,
    pub sums: SumDistribution,
    pub consecutive: Distribution,
}

/// Les quatre analyses sur le même historique.
pub fn analyze(draws: &[Draw]) -> Result<StatisticsReport, ScoringError> {
    let report = StatisticsReport {
        parity: parity_distribution(draws)?,
        high_low: high_low_distribution(draws)?,
        sums: sum_distribution(draws)?,
        consecutive: consecutive_distribution(draws)?,
    };
    debug!(draws = draws.len(), "statistiques calculées");
    Ok(report)
}

/// Répartition des tirages selon leur nombre de numéros pairs (0 à 6).
pub fn parity_distribution(draws: &[Draw]) -> Result<Distribution, ScoringError> {
    validate_history(draws)?;
    let mut counts = [0u32; PICK_COUNT + 1];
    for draw in draws {
        counts[draw.even_count()] += 1;
    }
    let labels = (0..=PICK_COUNT)
        .map(|k| format!("Pairs {} : Impairs {}", k, PICK_COUNT - k))
        .collect();
    Ok(Distribution::from_counts(labels, &counts, draws.len()))
}

/// Répartition des tirages selon leur nombre de numéros bas (1-21), de 0 à 6.
pub fn high_low_distribution(draws: &[Draw]) -> Result<Distribution, ScoringError> {
    validate_history(draws)?;
    let mut counts = [0u32; PICK_COUNT + 1];
    for draw in draws {
        counts[draw.low_count()] += 1;
    }
    let labels = (0..=PICK_COUNT)
        .map(|k| format!("Bas {} : Hauts {}", k, PICK_COUNT - k))
        .collect();
    Ok(Distribution::from_counts(labels, &counts, draws.len()))
}

pub fn sum_distribution(draws: &[Draw]) -> Result<SumDistribution, ScoringError> {
    validate_history(draws)?;

    let mut counts = [0u32; SUM_RANGES.len()];
    let mut sums: Vec<u32> = Vec::with_capacity(draws.len());

    for draw in draws {
        let sum = draw.sum();
        sums.push(sum);
        let bucket = SUM_RANGES
            .iter()
            .position(|&(from, to)| sum >= from && sum <= to);
        debug_assert!(bucket.is_some(), "somme {} hors des plages", sum);
        if let Some(i) = bucket {
            counts[i] += 1;
        }
    }

    sums.sort_unstable();
    let n = sums.len();
    let average = sums.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        sums[n / 2] as f64
    } else {
        (sums[n / 2 - 1] + sums[n / 2]) as f64 / 2.0
    };

    let labels = SUM_RANGES
        .iter()
        .map(|(from, to)| format!("{}-{}", from, to))
        .collect();

    Ok(SumDistribution {
        distribution: Distribution::from_counts(labels, &counts, n),
        average,
        median,
        min: sums[0],
        max: sums[n - 1],
    })
}

/// Nombre de paires de numéros consécutifs (écart de 1) dans un tirage trié.
pub fn consecutive_pairs(draw: &Draw) -> usize {
    draw.sorted_numbers()
        .windows(2)
        .filter(|w| w[1] - w[0] == 1)
        .count()
}

pub fn consecutive_distribution(draws: &[Draw]) -> Result<Distribution, ScoringError> {
    validate_history(draws)?;
    let mut counts = [0u32; CONSECUTIVE_BUCKETS];
    for draw in draws {
        let pairs = consecutive_pairs(draw);
        debug_assert!(pairs < CONSECUTIVE_BUCKETS);
        counts[pairs.min(CONSECUTIVE_BUCKETS - 1)] += 1;
    }
    let labels = (0..CONSECUTIVE_BUCKETS)
        .map(|k| format!("{} paire(s)", k))
        .collect();
    Ok(Distribution::from_counts(labels, &counts, draws.len()))
}
