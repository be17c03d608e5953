use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plus grand numéro tirable (les numéros vont de 1 à 43).
pub const POOL_SIZE: u8 = 43;
/// Nombre de numéros principaux par tirage.
pub const PICK_COUNT: usize = 6;
/// Borne haute de la moitié « basse » du pool (1-21), 22-43 étant la moitié haute.
pub const LOW_MAX: u8 = 21;
/// Nombre de rangs de gains publiés pour chaque tirage.
pub const PRIZE_TIERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_number: u32,
    pub date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: u8,
    pub prize_counts: [u32; PRIZE_TIERS],
    pub prize_amounts: [i64; PRIZE_TIERS],
    pub carryover: i64,
    pub sales: i64,
}

impl Draw {
    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    /// Numéros principaux triés par ordre croissant.
    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut sorted = self.numbers;
        sorted.sort_unstable();
        sorted
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }

    pub fn even_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| is_even(n)).count()
    }

    pub fn low_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| is_low(n)).count()
    }
}

pub fn is_even(number: u8) -> bool {
    number % 2 == 0
}

pub fn is_low(number: u8) -> bool {
    number <= LOW_MAX
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("{0} numéros principaux au lieu de 6")]
    WrongCount(usize),
    #[error("numéro {0} hors limites (1-43)")]
    OutOfRange(u8),
    #[error("numéro en double : {0}")]
    Duplicate(u8),
    #[error("numéro bonus {0} hors limites (1-43)")]
    BonusOutOfRange(u8),
}

/// Vérifie qu'une liste de numéros principaux forme un ensemble valide :
/// exactement six numéros, distincts, tous dans 1..=43.
pub fn validate_numbers(numbers: &[u8]) -> Result<(), DrawError> {
    if numbers.len() != PICK_COUNT {
        return Err(DrawError::WrongCount(numbers.len()));
    }
    let mut seen = [false; POOL_SIZE as usize + 1];
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            return Err(DrawError::OutOfRange(n));
        }
        if seen[n as usize] {
            return Err(DrawError::Duplicate(n));
        }
        seen[n as usize] = true;
    }
    Ok(())
}

/// Validation complète d'un tirage à l'import : numéros principaux et bonus.
/// Le bonus peut coïncider avec un numéro principal, seule sa plage est contrôlée.
pub fn validate_draw(numbers: &[u8; PICK_COUNT], bonus: u8) -> Result<(), DrawError> {
    validate_numbers(numbers)?;
    if bonus < 1 || bonus > POOL_SIZE {
        return Err(DrawError::BonusOutOfRange(bonus));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: [u8; 6]) -> Draw {
        Draw {
            draw_number: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            numbers,
            bonus: 7,
            prize_counts: [0; PRIZE_TIERS],
            prize_amounts: [0; PRIZE_TIERS],
            carryover: 0,
            sales: 0,
        }
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[43, 42, 41, 40, 39, 38], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_bonus_may_repeat_main_number() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 6).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert_eq!(validate_draw(&[0, 2, 3, 4, 5, 6], 7), Err(DrawError::OutOfRange(0)));
        assert_eq!(validate_draw(&[1, 2, 3, 4, 5, 44], 7), Err(DrawError::OutOfRange(44)));
    }

    #[test]
    fn test_validate_draw_duplicate() {
        assert_eq!(validate_draw(&[1, 1, 3, 4, 5, 6], 7), Err(DrawError::Duplicate(1)));
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        assert_eq!(validate_draw(&[1, 2, 3, 4, 5, 6], 0), Err(DrawError::BonusOutOfRange(0)));
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert_eq!(validate_numbers(&[1, 2, 3]), Err(DrawError::WrongCount(3)));
    }

    #[test]
    fn test_draw_helpers() {
        let d = draw([12, 2, 43, 21, 22, 7]);
        assert_eq!(d.sorted_numbers(), [2, 7, 12, 21, 22, 43]);
        assert_eq!(d.sum(), 107);
        assert_eq!(d.even_count(), 3);
        assert_eq!(d.low_count(), 4);
        assert!(d.contains(43));
        assert!(!d.contains(1));
    }

    #[test]
    fn test_low_high_boundary() {
        assert!(is_low(21));
        assert!(!is_low(22));
    }
}
