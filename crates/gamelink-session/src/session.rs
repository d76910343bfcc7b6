use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use gamelink_core::envelope::{Envelope, OutboundMessage};
use gamelink_core::errors::{SessionError, TransportError};
use gamelink_core::ids::SessionId;
use gamelink_core::messages::{
    AddGameChar, GetGameBalance, MessageSet, SendGameBalance, SetServerStatus,
};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::frame::Frame;

/// Liveness and queue tuning for one session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How long the peer has to produce a pong before the read side gives up.
    pub pong_wait: Duration,
    /// Deadline applied to every individual frame write.
    pub write_wait: Duration,
    /// Capacity of the outbound queue feeding the writer loop.
    pub max_send_queue: usize,
}

impl SessionConfig {
    /// Ping cadence, derived from `pong_wait` so at least one ping lands
    /// before the peer's read deadline would expire.
    pub fn ping_period(&self) -> Duration {
        self.pong_wait * 9 / 10
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pong_wait: Duration::from_secs(60),
            write_wait: Duration::from_secs(10),
            max_send_queue: 256,
        }
    }
}

/// One full-duplex message session over an established transport.
///
/// The session owns the transport exclusively: the writer half is consumed
/// by an internal writer/heartbeat task spawned at construction, and the
/// reader half is consumed by [`Session::listen`], driven once by the
/// caller. Outbound messages funnel through a bounded FIFO queue with a
/// single consumer, so frames are never interleaved on the wire.
///
/// Teardown is failure-driven and terminal: the first write error, read
/// error, expired deadline, or unsupported inbound tag cancels the shared
/// token, both loops exit, and the transport is closed. A session is never
/// reused after that.
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    messages: Arc<MessageSet>,
    outbound: Mutex<mpsc::Sender<String>>,
    shutdown: CancellationToken,
}

impl Session {
    /// Create the session and spawn its writer/heartbeat loop on `writer`.
    pub fn new<W>(writer: W, config: SessionConfig, messages: Arc<MessageSet>) -> Self
    where
        W: Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
    {
        let id = SessionId::new();
        let (tx, rx) = mpsc::channel(config.max_send_queue);
        let shutdown = CancellationToken::new();

        tokio::spawn(write_loop(
            writer,
            rx,
            config.clone(),
            shutdown.clone(),
            id.clone(),
        ));

        Self {
            id,
            config,
            messages,
            outbound: Mutex::new(tx),
            shutdown,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// True once either loop has begun tearing the session down.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Resolves when the session has begun tearing down.
    pub async fn closed(&self) {
        self.shutdown.cancelled().await;
    }

    pub async fn send_set_server_status(&self, status: SetServerStatus) -> Result<(), SessionError> {
        self.enqueue(OutboundMessage::SetServerStatus(status)).await
    }

    pub async fn send_add_game_char(&self, character: AddGameChar) -> Result<(), SessionError> {
        self.enqueue(OutboundMessage::AddGameChar(character)).await
    }

    pub async fn send_send_game_balance(
        &self,
        balance: SendGameBalance,
    ) -> Result<(), SessionError> {
        self.enqueue(OutboundMessage::SendGameBalance(balance)).await
    }

    pub async fn send_get_game_balance(&self, req: GetGameBalance) -> Result<(), SessionError> {
        self.enqueue(OutboundMessage::GetGameBalance(req)).await
    }

    /// Encode and admit one message to the outbound queue.
    ///
    /// The mutex serializes admission across concurrent callers (frames from
    /// two logical sends can never interleave) and shields the enqueue from
    /// a teardown racing it. Fails with `Closed` once the writer loop is
    /// gone.
    async fn enqueue(&self, message: OutboundMessage) -> Result<(), SessionError> {
        tracing::debug!(session_id = %self.id, kind = message.kind(), "send message");
        let text = message.to_json()?;
        let tx = self.outbound.lock().await;
        tx.send(text).await.map_err(|_| SessionError::Closed)
    }

    /// Drive the reader loop until the connection dies. Call once, with the
    /// transport's reader half.
    ///
    /// A read deadline of `pong_wait` is armed at entry and re-armed only
    /// when a pong arrives; a peer that produces neither pongs nor frames
    /// within that window ends the session. Recognized data frames are
    /// forwarded to `inbound`; an unrecognized tag is terminal. A close
    /// frame is logged but does not itself end the loop, which keeps reading
    /// until the torn-down transport fails the next read.
    ///
    /// Returns the error that ended the session.
    pub async fn listen<R>(&self, mut stream: R, inbound: mpsc::Sender<Envelope>) -> SessionError
    where
        R: Stream<Item = Result<Frame, TransportError>> + Unpin,
    {
        let mut deadline = Instant::now() + self.config.pong_wait;

        let error = loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => break SessionError::Closed,
                next = time::timeout_at(deadline, stream.next()) => next,
            };

            let frame = match next {
                Err(_) => break SessionError::Timeout(self.config.pong_wait),
                Ok(None) => break TransportError::new("connection closed").into(),
                Ok(Some(Err(e))) => break e.into(),
                Ok(Some(Ok(frame))) => frame,
            };

            match frame {
                Frame::Text(text) => {
                    if let Err(e) = self.dispatch(&text, &inbound).await {
                        break e;
                    }
                }
                Frame::Pong(_) => {
                    deadline = Instant::now() + self.config.pong_wait;
                    tracing::trace!(session_id = %self.id, "pong received");
                }
                Frame::Close => {
                    // The transport fails the next read once actually torn
                    // down; until then the loop keeps reading.
                    tracing::info!(session_id = %self.id, "received close frame");
                }
                other => {
                    tracing::debug!(session_id = %self.id, frame = other.name(), "ignoring frame");
                }
            }
        };

        if error.is_terminal() {
            tracing::warn!(
                session_id = %self.id,
                error = %error,
                kind = error.kind(),
                "read loop terminated"
            );
        } else {
            tracing::info!(session_id = %self.id, "read loop stopped");
        }
        self.shutdown.cancel();
        error
    }

    /// Decode one inbound data frame and forward it if its tag is known.
    async fn dispatch(
        &self,
        raw: &str,
        inbound: &mpsc::Sender<Envelope>,
    ) -> Result<(), SessionError> {
        let envelope = Envelope::from_json(raw)?;
        if !self.messages.contains(&envelope.kind) {
            return Err(SessionError::UnsupportedType(envelope.kind));
        }

        tracing::info!(session_id = %self.id, kind = %envelope.kind, "receive message");
        // The consumer may have gone away; dispatch stays best-effort.
        let _ = inbound.send(envelope).await;
        Ok(())
    }
}

/// The sole writer of the transport: drains the outbound queue and keeps
/// the connection alive with pings, every write bounded by `write_wait`.
async fn write_loop<W>(
    mut sink: W,
    mut rx: mpsc::Receiver<String>,
    config: SessionConfig,
    shutdown: CancellationToken,
    id: SessionId,
) where
    W: Sink<Frame, Error = TransportError> + Unpin + Send,
{
    let mut ping = time::interval(config.ping_period());
    ping.tick().await; // consume first immediate tick

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(text) => {
                    if let Err(e) = write_frame(&mut sink, Frame::Text(text), config.write_wait).await {
                        tracing::warn!(session_id = %id, error = %e, "write message failed");
                        break;
                    }
                }
                None => {
                    // Every sender is gone: announce the close and stop.
                    let _ = write_frame(&mut sink, Frame::Close, config.write_wait).await;
                    break;
                }
            },
            _ = ping.tick() => {
                tracing::trace!(session_id = %id, "push ping");
                if let Err(e) = write_frame(&mut sink, Frame::Ping(Vec::new()), config.write_wait).await {
                    tracing::warn!(session_id = %id, error = %e, "ping failed");
                    break;
                }
            }
            _ = shutdown.cancelled() => break,
        }
    }

    let _ = sink.close().await;
    shutdown.cancel();
}

async fn write_frame<W>(sink: &mut W, frame: Frame, write_wait: Duration) -> Result<(), SessionError>
where
    W: Sink<Frame, Error = TransportError> + Unpin,
{
    match time::timeout(write_wait, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(SessionError::Timeout(write_wait)),
    }
}
