use thiserror::Error;

/// Errors that can occur while extracting territorial areas from a map.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("failed to parse document: {0}")]
    Document(#[from] roxmltree::Error),

    #[error("malformed path data: {0}")]
    MalformedPath(String),

    #[error("layer not found: {0}")]
    LayerNotFound(String),

    #[error("geometry repair failed: {0}")]
    GeometryRepair(String),

    /// Both resolved faction areas are zero, so no percentage exists.
    #[error("both faction areas are zero")]
    DegenerateArea,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from reading or writing the persisted control snapshot.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StateError {
    #[error("state file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file json: {0}")]
    Json(#[from] serde_json::Error),
}
