use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A request field violated its range contract. Raised at
    /// construction; fields are never silently clamped.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
