use crate::tlsh::TlshError;

/// Errors raised while loading, storing or presenting an index.
///
/// Building and searching a `VPTree` never fail; everything here comes
/// from the I/O and parsing layers around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid TLSH digest: {0}")]
    Tlsh(#[from] TlshError),

    #[error("failed to encode index: {0}")]
    Encode(bincode::Error),

    #[error("failed to decode index: {0}")]
    Decode(bincode::Error),

    #[error("corrupt index file: {0}")]
    Corrupt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
