use thiserror::Error;

/// Errors surfaced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend itself failed.
    #[error("store backend: {0}")]
    Backend(String),

    /// A stored document could not be decoded into its record type.
    ///
    /// Never papered over with a default record: a corrupt document means
    /// some other writer broke the store contract.
    #[error("stored document under '{key}' is corrupt: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
