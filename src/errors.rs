#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("native boundary channel is closed")]
    BoundaryGone,

    #[error("malformed reply payload: {0}")]
    MalformedReply(String),

    #[error("unknown element tag: {0}")]
    UnknownElement(String),

    #[error("session is already mounted")]
    AlreadyMounted,

    #[error("local render mode requires an attached renderer")]
    MissingRenderer,
}
