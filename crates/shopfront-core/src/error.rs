use thiserror::Error;

/// Storefront failure taxonomy.
///
/// Transport and Parse failures on the static data sources are absorbed by
/// the callers (logged, collection degrades to empty). Validation failures
/// are surfaced to the user before any simulated submission. NotFound
/// drives navigation, never an in-page error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Failed to parse data source: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
