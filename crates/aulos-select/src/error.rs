use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SelectError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub type SelectResult<T> = Result<T, SelectError>;
