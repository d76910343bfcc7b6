use std::time::Duration;

/// Failure raised at the transport seam. Both halves of a split connection
/// map their native error type into this before the session sees it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Typed error hierarchy for session operations.
///
/// Everything except `Encode` and `Closed` is terminal for the session that
/// observes it: the loops stop and the transport is closed. `Closed` is
/// returned to senders racing a teardown; `Encode` is returned before the
/// payload ever reaches the outbound channel.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unsupported message type: {0}")]
    UnsupportedType(String),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("deadline expired after {0:?}")]
    Timeout(Duration),
    #[error("session closed")]
    Closed,
}

impl SessionError {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::UnsupportedType(_) | Self::Transport(_) | Self::Timeout(_)
        )
    }

    /// Short classification string for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encode(_) => "encode",
            Self::Decode(_) => "decode",
            Self::UnsupportedType(_) => "unsupported_type",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Closed => "closed",
        }
    }
}
