use crate::scoring::NumberScore;
use crate::selection::by_total_desc;

/// Classement final des 43 numéros : score total décroissant, numéro croissant à égalité.
pub fn rank_scores(mut scores: Vec<NumberScore>) -> Vec<NumberScore> {
    scores.sort_by(by_total_desc);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::make_test_draws;
    use crate::scoring::ScoringEngine;

    #[test]
    fn test_rank_is_descending_with_numeric_ties() {
        let scores = ScoringEngine::new(ScoringConfig::default())
            .unwrap()
            .score(&make_test_draws(60))
            .unwrap();
        let ranked = rank_scores(scores);
        assert_eq!(ranked.len(), 43);
        for pair in ranked.windows(2) {
            assert!(pair[0].total >= pair[1].total);
            if pair[0].total == pair[1].total {
                assert!(pair[0].number < pair[1].number);
            }
        }
    }

    #[test]
    fn test_rank_all_equal_is_numeric() {
        let mut scores = ScoringEngine::new(ScoringConfig::default())
            .unwrap()
            .score(&make_test_draws(5))
            .unwrap();
        for s in &mut scores {
            s.total = 0.42;
        }
        scores.reverse();
        let ranked = rank_scores(scores);
        let numbers: Vec<u8> = ranked.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=43).collect::<Vec<u8>>());
    }
}
