use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid maze size: {0}. Must be between {min} and {max}", min = crate::config::MIN_MAZE_SIZE, max = crate::config::MAX_MAZE_SIZE)]
    InvalidSize(usize),

    #[error("Invalid security level: {0}. Must be low, medium, or high")]
    InvalidSecurityLevel(String),

    #[error("Invalid seed: {0} bytes. Must be at least {min} bytes", min = crate::maze::MIN_SEED_LEN)]
    InvalidSeed(usize),

    #[error("Invalid time window: {0}. Must be at least one second")]
    InvalidTimeWindow(u64),

    #[error("Invalid maze format: {0}")]
    InvalidFormat(String),

    // One message for every cause so callers cannot tell nonce, tag and key apart.
    #[error("Invalid ciphertext")]
    InvalidCiphertext,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Entropy source exhausted")]
    EntropySourceExhausted,
}

pub type Result<T> = std::result::Result<T, MazeError>;
