use crate::scoring::Indicator;

use super::PhraseCatalogue;

/// Catalogue de phrases par défaut, en français.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalogue;

const FREQUENCY: &[&str] = &[
    "Sort régulièrement sur tout l'historique, un numéro solide",
    "Présence stable sur l'ensemble des tirages",
    "Fiable sur le long terme",
];

const TREND: &[&str] = &[
    "En forme sur les 50 derniers tirages",
    "Très présent lors des tirages récents",
    "Fréquence de sortie en hausse ces derniers temps",
];

const INTERVAL: &[&str] = &[
    "Absent depuis un moment, son retour se rapproche",
    "Écart qui se creuse, un rebond est possible",
    "Plusieurs tirages sans sortie, le moment est peut-être venu",
];

const BALANCE: &[&str] = &[
    "Très bien équilibré, un profil complet",
    "Bons résultats sur tous les indicateurs",
    "Peu de points faibles, évaluation globale stable",
];

const CARRYOVER: &[&str] = &[
    "Sorti au dernier tirage et souvent reconduit",
    "Forte tendance à ressortir d'un tirage à l'autre",
    "Prolonge l'élan du tirage précédent",
];

const FREQUENCY_TREND: &[&str] = &[
    "En forme récemment et régulier sur tout l'historique",
    "Bonne dynamique récente doublée d'une stabilité de long terme",
];

const FREQUENCY_INTERVAL: &[&str] = &[
    "Sort souvent et son écart actuel promet un retour",
    "Fréquence élevée et bon timing d'écart",
];

const FREQUENCY_BALANCE: &[&str] = &[
    "Régulier sur tout l'historique et bien équilibré",
    "Fréquence élevée et profil équilibré",
];

const FREQUENCY_CARRYOVER: &[&str] = &[
    "Souvent reconduit et régulier sur tout l'historique",
    "Tendance au report et stabilité de long terme",
];

const TREND_INTERVAL: &[&str] = &[
    "En forme récemment et bien placé côté écart",
    "Dynamique récente et écart favorable réunis",
];

const TREND_BALANCE: &[&str] = &[
    "Allie dynamique récente et équilibre",
    "En forme récemment avec un profil équilibré",
];

const TREND_CARRYOVER: &[&str] = &[
    "Reconduit du tirage précédent et toujours en forme",
    "Élan du dernier tirage et bonne dynamique récente",
];

const INTERVAL_BALANCE: &[&str] = &[
    "Absent depuis un moment mais bien équilibré, un retour est attendu",
    "Écart et équilibre jouent en sa faveur",
];

const INTERVAL_CARRYOVER: &[&str] = &[
    "Tendance au report et écart favorable",
    "Dans l'élan du dernier tirage avec un bon timing d'écart",
];

const BALANCE_CARRYOVER: &[&str] = &[
    "Tendance au report et profil équilibré",
    "Souvent reconduit et bien équilibré",
];

impl PhraseCatalogue for DefaultCatalogue {
    fn single(&self, indicator: Indicator) -> &[&'static str] {
        match indicator {
            Indicator::Frequency => FREQUENCY,
            Indicator::Trend => TREND,
            Indicator::Interval => INTERVAL,
            Indicator::Balance => BALANCE,
            Indicator::Carryover => CARRYOVER,
        }
    }

    fn pair(&self, a: Indicator, b: Indicator) -> &[&'static str] {
        use Indicator::*;
        // Paire non ordonnée : on normalise sur l'ordre de déclaration
        let key = if a <= b { (a, b) } else { (b, a) };
        match key {
            (Frequency, Trend) => FREQUENCY_TREND,
            (Frequency, Interval) => FREQUENCY_INTERVAL,
            (Frequency, Balance) => FREQUENCY_BALANCE,
            (Frequency, Carryover) => FREQUENCY_CARRYOVER,
            (Trend, Interval) => TREND_INTERVAL,
            (Trend, Balance) => TREND_BALANCE,
            (Trend, Carryover) => TREND_CARRYOVER,
            (Interval, Balance) => INTERVAL_BALANCE,
            (Interval, Carryover) => INTERVAL_CARRYOVER,
            (Balance, Carryover) => BALANCE_CARRYOVER,
            _ => &[],
        }
    }
}
