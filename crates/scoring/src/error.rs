use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a submitted catch is refused before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("a species is required")]
    MissingSpecies,

    #[error("a size in cm is required")]
    MissingSize,

    #[error("size must not be negative")]
    NegativeSize,

    #[error("size is too large")]
    SizeOutOfRange,

    #[error("weight must be greater than zero")]
    NonPositiveWeight,

    #[error("carp weight {weight_kg} kg is below the contest minimum of {min_kg} kg")]
    BelowCarpMinimum { weight_kg: Decimal, min_kg: Decimal },

    #[error("count must be greater than zero")]
    NonPositiveCount,

    #[error("weight is too large")]
    WeightOutOfRange,
}

pub type Result<T> = std::result::Result<T, EntryError>;
