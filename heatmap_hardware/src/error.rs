use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("serial error: {0}")]
    Serial(String),
    #[error("line read timeout (partial line of {0} bytes)")]
    Timeout(usize),
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
