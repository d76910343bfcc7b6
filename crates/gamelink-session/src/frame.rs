/// Frame kinds at the transport boundary.
///
/// The session is generic over any transport whose halves speak this type:
/// a `futures::Sink<Frame>` for the writer loop and a
/// `futures::Stream<Item = Result<Frame, TransportError>>` for the reader
/// loop. The server glue adapts a real WebSocket into this shape; tests use
/// channel-backed fakes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// A data frame carrying one encoded envelope.
    Text(String),
    Binary(Vec<u8>),
    /// Liveness probe. Carries no application payload.
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

impl Frame {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::Ping(_) => "ping",
            Self::Pong(_) => "pong",
            Self::Close => "close",
        }
    }
}
