pub mod catalogue;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::scoring::{Indicator, NumberScore};

pub use catalogue::DefaultCatalogue;

/// Source des phrases de justification, indexées par indicateur seul ou par
/// paire non ordonnée d'indicateurs.
pub trait PhraseCatalogue {
    fn single(&self, indicator: Indicator) -> &[&'static str];
    fn pair(&self, a: Indicator, b: Indicator) -> &[&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub number: u8,
    pub text: String,
}

/// Liste ordonnée des phrases candidates pour un numéro, d'après le classement
/// de ses sous-scores :
/// paire (1er, 2e) si le 2e est fort, 1er seul, paire (1er, 3e) si le 3e est
/// fort, 2e seul, puis chaque indicateur restant seul.
pub fn candidate_phrases(
    score: &NumberScore,
    catalogue: &dyn PhraseCatalogue,
    strong_threshold: f64,
) -> Vec<&'static str> {
    let ranked = score.ranked_indicators();
    let (top, _) = ranked[0];
    let (second, second_value) = ranked[1];
    let (third, third_value) = ranked[2];

    let mut candidates = Vec::new();
    if second_value >= strong_threshold {
        candidates.extend_from_slice(catalogue.pair(top, second));
    }
    candidates.extend_from_slice(catalogue.single(top));
    if third_value >= strong_threshold {
        candidates.extend_from_slice(catalogue.pair(top, third));
    }
    candidates.extend_from_slice(catalogue.single(second));
    for &(indicator, _) in &ranked[2..] {
        candidates.extend_from_slice(catalogue.single(indicator));
    }
    candidates
}

/// Première candidate pas encore utilisée ; à défaut, la première de la liste.
pub fn first_unused<'a>(candidates: &[&'a str], used: &HashSet<&str>) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|c| !used.contains(c))
        .or_else(|| candidates.first().copied())
}

/// Attribue une justification à chaque numéro recommandé, dans l'ordre
/// croissant des numéros, en évitant de répéter une phrase déjà attribuée
/// tant qu'une alternative existe.
///
/// Chaque numéro recommandé doit avoir son score dans `scores`.
pub fn assign_reasons(
    recommended: &[u8],
    scores: &[NumberScore],
    catalogue: &dyn PhraseCatalogue,
    strong_threshold: f64,
) -> Vec<Reason> {
    let mut numbers = recommended.to_vec();
    numbers.sort_unstable();

    let mut used: HashSet<&str> = HashSet::new();
    let mut reasons = Vec::with_capacity(numbers.len());

    for number in numbers {
        let Some(score) = scores.iter().find(|s| s.number == number) else {
            debug_assert!(false, "numéro recommandé {} sans score", number);
            continue;
        };
        let candidates = candidate_phrases(score, catalogue, strong_threshold);
        if let Some(text) = first_unused(&candidates, &used) {
            used.insert(text);
            reasons.push(Reason {
                number,
                text: text.to_string(),
            });
        }
    }

    reasons
}
