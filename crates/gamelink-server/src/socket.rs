use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{Sink, SinkExt, Stream, StreamExt};
use gamelink_core::errors::TransportError;
use gamelink_session::Frame;

/// Adapt the writer half of an upgraded socket to the session frame type.
pub fn frame_sink(
    half: SplitSink<WebSocket, Message>,
) -> impl Sink<Frame, Error = TransportError> + Unpin + Send + 'static {
    half.sink_map_err(|e: axum::Error| TransportError::new(e.to_string()))
        .with(|frame: Frame| futures::future::ready(Ok::<_, TransportError>(to_ws(frame))))
}

/// Adapt the reader half of an upgraded socket to the session frame type.
pub fn frame_stream(
    half: SplitStream<WebSocket>,
) -> impl Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static {
    half.map(|item| {
        item.map(from_ws)
            .map_err(|e| TransportError::new(e.to_string()))
    })
}

fn to_ws(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.into()),
        Frame::Binary(data) => Message::Binary(data.into()),
        Frame::Ping(data) => Message::Ping(data.into()),
        Frame::Pong(data) => Message::Pong(data.into()),
        Frame::Close => Message::Close(None),
    }
}

fn from_ws(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text.to_string()),
        Message::Binary(data) => Frame::Binary(data.to_vec()),
        Message::Ping(data) => Frame::Ping(data.to_vec()),
        Message::Pong(data) => Frame::Pong(data.to_vec()),
        Message::Close(_) => Frame::Close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_map_to_ws_messages() {
        assert!(matches!(
            to_ws(Frame::Text("{}".into())),
            Message::Text(t) if t.as_str() == "{}"
        ));
        assert!(matches!(to_ws(Frame::Ping(Vec::new())), Message::Ping(p) if p.is_empty()));
        assert!(matches!(to_ws(Frame::Close), Message::Close(None)));
    }

    #[test]
    fn ws_messages_map_to_frames() {
        assert_eq!(
            from_ws(Message::Text("{}".into())),
            Frame::Text("{}".into())
        );
        assert_eq!(from_ws(Message::Pong(vec![1].into())), Frame::Pong(vec![1]));
        assert_eq!(from_ws(Message::Close(None)), Frame::Close);
        assert_eq!(
            from_ws(Message::Binary(vec![0xde, 0xad].into())),
            Frame::Binary(vec![0xde, 0xad])
        );
    }
}
