use thiserror::Error;

/// Largest value set the document store accepts for an `in` filter.
pub const MAX_IN_VALUES: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("`in` filter takes at most {MAX_IN_VALUES} values, got {0}")]
    TooManyValues(usize),

    #[error("`in` filter needs at least one value")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Name is required")]
    MissingName,

    #[error("Price is required")]
    MissingPrice,

    #[error("Glass price is required for housepouring items")]
    MissingGlassPrice,

    #[error("Bottle price is required for housepouring items")]
    MissingBottlePrice,

    #[error("{field} must be a non-negative number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Failure of a form submission. Upload failures never show up here.
#[derive(Debug, Error)]
pub enum SubmitError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error("Store error: {0}")]
    Store(#[source] E),
}
