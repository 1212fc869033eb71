use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodSimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario file: {0}")]
    Scenario(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, PodSimError>;
