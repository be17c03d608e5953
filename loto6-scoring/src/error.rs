use loto6_db::models::DrawError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("données insuffisantes : l'historique ne contient aucun tirage")]
    InsufficientData,

    #[error("tirage n°{draw_number} malformé : {source}")]
    MalformedDraw {
        draw_number: u32,
        #[source]
        source: DrawError,
    },

    #[error("configuration invalide : {0}")]
    InvalidConfig(String),
}
