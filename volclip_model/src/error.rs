use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("polygon has {0} distinct vertices, needs at least 3")]
    TooFewVertices(usize),

    #[error("polygon vertices are collinear; no normal")]
    DegenerateNormal,
}
