#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Failed to parse input: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid bridge config: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(feature = "napi")]
impl From<BridgeError> for napi::Error {
    fn from(err: BridgeError) -> Self {
        napi::Error::from_reason(err.to_string())
    }
}
