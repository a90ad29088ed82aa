use thiserror::Error;

/// Top-level error type for uvkit.
#[derive(Debug, Error)]
pub enum UvkitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric parameters and computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to the mesh store.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid face: {0}")]
    InvalidFace(String),
}

/// Errors related to analysis and modification operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`UvkitError`].
pub type Result<T> = std::result::Result<T, UvkitError>;
