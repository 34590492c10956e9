use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no save destination: post has no file reference and no vault is connected")]
    NoDestination,

    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}
