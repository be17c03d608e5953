use tracing::{debug, warn};

use loto6_db::models::{is_even, is_low, PICK_COUNT};

use crate::config::ScoreWeights;
use crate::scoring::NumberScore;

/// Ordre canonique : score total décroissant, puis numéro croissant à égalité.
pub fn by_total_desc(a: &NumberScore, b: &NumberScore) -> std::cmp::Ordering {
    b.total
        .partial_cmp(&a.total)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.number.cmp(&b.number))
}

/// Compteurs pair/impair/bas/haut d'une sélection en cours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BalanceTally {
    even: usize,
    odd: usize,
    low: usize,
    high: usize,
}

impl BalanceTally {
    fn admits(&self, number: u8, cap: usize) -> bool {
        let parity_ok = if is_even(number) { self.even < cap } else { self.odd < cap };
        let range_ok = if is_low(number) { self.low < cap } else { self.high < cap };
        parity_ok && range_ok
    }

    fn add(&mut self, number: u8) {
        if is_even(number) {
            self.even += 1;
        } else {
            self.odd += 1;
        }
        if is_low(number) {
            self.low += 1;
        } else {
            self.high += 1;
        }
    }
}

/// Sélection gloutonne des six numéros sous plafonds d'équilibre.
/// Retourne les numéros dans leur ordre d'admission.
pub fn select_balanced(scores: &[NumberScore], max_per_category: usize) -> Vec<u8> {
    let mut candidates: Vec<&NumberScore> = scores.iter().collect();
    candidates.sort_by(|a, b| by_total_desc(a, b));

    let mut selected: Vec<u8> = Vec::with_capacity(PICK_COUNT);
    let mut tally = BalanceTally::default();

    for candidate in &candidates {
        if selected.len() >= PICK_COUNT {
            break;
        }
        if tally.admits(candidate.number, max_per_category) {
            selected.push(candidate.number);
            tally.add(candidate.number);
        }
    }

    // Fallback : les plafonds ont bloqué la sélection, on complète sans contrainte
    if selected.len() < PICK_COUNT {
        warn!(
            admitted = selected.len(),
            max_per_category, "plafonds d'équilibre bloquants, complément sans contrainte"
        );
        for candidate in &candidates {
            if selected.len() >= PICK_COUNT {
                break;
            }
            if !selected.contains(&candidate.number) {
                selected.push(candidate.number);
            }
        }
    }

    debug!(?selected, "sélection équilibrée");
    selected
}

/// Recalcule le score d'équilibre et le score total de tous les numéros une
/// fois la sélection connue : bonus de 0.25 par catégorie encore minoritaire
/// (au plus la moitié de la sélection).
pub fn rescore_balance(scores: &mut [NumberScore], selected: &[u8], weights: &ScoreWeights) {
    let half = PICK_COUNT / 2;
    let even_selected = selected.iter().filter(|&&n| is_even(n)).count();
    let odd_selected = PICK_COUNT - even_selected;
    let low_selected = selected.iter().filter(|&&n| is_low(n)).count();
    let high_selected = PICK_COUNT - low_selected;

    for score in scores.iter_mut() {
        let mut bonus: f64 = 0.0;
        if is_even(score.number) && even_selected <= half {
            bonus += 0.25;
        }
        if !is_even(score.number) && odd_selected <= half {
            bonus += 0.25;
        }
        if is_low(score.number) && low_selected <= half {
            bonus += 0.25;
        }
        if !is_low(score.number) && high_selected <= half {
            bonus += 0.25;
        }
        score.balance = (0.5 + bonus).min(1.0);
        score.recompute_total(weights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::scoring::{index_of, ScoringEngine};
    use crate::make_test_draws;

    /// Scores synthétiques : le total décroît avec le numéro, sauf surcharge.
    fn scores_with_totals(overrides: &[(u8, f64)]) -> Vec<NumberScore> {
        let draws = make_test_draws(10);
        let mut scores = ScoringEngine::new(ScoringConfig::default())
            .unwrap()
            .score(&draws)
            .unwrap();
        for s in &mut scores {
            s.total = 1.0 - s.number as f64 / 100.0;
        }
        for &(n, total) in overrides {
            scores[index_of(n)].total = total;
        }
        scores
    }

    #[test]
    fn test_select_top_when_balanced() {
        // 1..4 remplissent le plafond bas, 5..21 sont refusés, 22 et 23 complètent
        let scores = scores_with_totals(&[]);
        let selected = select_balanced(&scores, 4);
        assert_eq!(selected, vec![1, 2, 3, 4, 22, 23]);
    }

    #[test]
    fn test_select_respects_parity_cap() {
        let scores = scores_with_totals(&[
            (2, 2.0),
            (4, 1.9),
            (24, 1.8),
            (26, 1.7),
            (28, 1.6),
            (30, 1.5),
        ]);
        let selected = select_balanced(&scores, 4);
        assert_eq!(selected.len(), 6);
        let even = selected.iter().filter(|&&n| is_even(n)).count();
        assert_eq!(even, 4);
        assert_eq!(&selected[..4], &[2, 4, 24, 26]);
        // 28 et 30 refusés (plafond pair), 1 et 3 complètent
        assert_eq!(&selected[4..], &[1, 3]);
    }

    #[test]
    fn test_fallback_fills_to_six() {
        // Plafond de 2 : au plus 2 pairs + 2 impairs, le second passage complète
        let scores = scores_with_totals(&[]);
        let selected = select_balanced(&scores, 2);
        assert_eq!(selected.len(), 6);
        let mut unique = selected.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 6);
        assert_eq!(selected, vec![1, 2, 22, 23, 3, 4]);
    }

    #[test]
    fn test_ties_break_on_number() {
        let mut scores = scores_with_totals(&[]);
        for s in &mut scores {
            s.total = 0.5;
        }
        let selected = select_balanced(&scores, 4);
        assert_eq!(selected, vec![1, 2, 3, 4, 22, 23]);
    }

    #[test]
    fn test_rescore_balance_even_split() {
        let mut scores = scores_with_totals(&[]);
        let weights = ScoreWeights::default();
        // 3 pairs / 3 impairs, 3 bas / 3 hauts : chaque numéro gagne deux bonus
        rescore_balance(&mut scores, &[1, 2, 3, 22, 24, 25], &weights);
        assert!(scores.iter().all(|s| s.balance == 1.0));
    }

    #[test]
    fn test_rescore_balance_skewed_selection() {
        let mut scores = scores_with_totals(&[]);
        let weights = ScoreWeights::default();
        // 4 pairs / 2 impairs, 4 bas / 2 hauts
        rescore_balance(&mut scores, &[2, 4, 6, 8, 23, 25], &weights);
        // Pair et bas : aucune catégorie minoritaire
        assert_eq!(scores[index_of(10)].balance, 0.5);
        // Impair et haut : deux bonus
        assert_eq!(scores[index_of(27)].balance, 1.0);
        // Impair et bas : un bonus
        assert_eq!(scores[index_of(3)].balance, 0.75);
        for s in &scores {
            assert!((s.total - s.weighted_total(&weights)).abs() < 1e-12);
        }
    }
}
