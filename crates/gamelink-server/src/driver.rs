use std::sync::Arc;
use std::time::Duration;

use gamelink_core::envelope::Envelope;
use gamelink_core::messages::GetGameBalance;
use gamelink_session::Session;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Push a balance request to the peer on a fixed cadence until a send
/// fails, which means the session is gone.
pub fn spawn_balance_requests(session: Arc<Session>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // consume first immediate tick

        loop {
            ticker.tick().await;
            let request = GetGameBalance {
                user_id: chrono::Utc::now().to_rfc3339(),
                server_name: "server_name".into(),
            };
            if let Err(e) = session.send_get_game_balance(request).await {
                tracing::info!(session_id = %session.id(), error = %e, "balance ticker stopped");
                return;
            }
        }
    })
}

/// Drain dispatched inbound envelopes. Receipt is logged by the session at
/// dispatch time; this end keeps the channel flowing.
pub fn spawn_inbound_consumer(mut inbound: mpsc::Receiver<Envelope>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(envelope) = inbound.recv().await {
            tracing::debug!(kind = %envelope.kind, "inbound message consumed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use gamelink_core::errors::TransportError;
    use gamelink_core::messages::MessageSet;
    use gamelink_session::{Frame, SessionConfig};

    fn fake_writer() -> (
        impl futures::Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
        futures::channel::mpsc::UnboundedReceiver<Frame>,
    ) {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        (tx.sink_map_err(|e| TransportError::new(e.to_string())), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn balance_request_sent_each_period() {
        let (writer, mut written) = fake_writer();
        let session = Arc::new(Session::new(
            writer,
            SessionConfig::default(),
            Arc::new(MessageSet::standard()),
        ));
        let _ticker = spawn_balance_requests(Arc::clone(&session), Duration::from_secs(3));

        for _ in 0..2 {
            let frame = written.next().await.unwrap();
            let Frame::Text(text) = frame else {
                panic!("expected text frame, got {frame:?}");
            };
            let json: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["type"], "get_game_balance");
            assert_eq!(json["data"]["server_name"], "server_name");
        }
    }

    #[tokio::test]
    async fn ticker_stops_once_session_is_torn_down() {
        let (writer, written) = fake_writer();
        // Dead peer: the first write fails and closes the session.
        drop(written);
        let session = Arc::new(Session::new(
            writer,
            SessionConfig::default(),
            Arc::new(MessageSet::standard()),
        ));
        let ticker = spawn_balance_requests(Arc::clone(&session), Duration::from_millis(1));

        ticker.await.unwrap();
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn inbound_consumer_drains_until_channel_closes() {
        let (tx, rx) = mpsc::channel(4);
        let consumer = spawn_inbound_consumer(rx);

        let envelope = Envelope::from_json(r#"{"type":"get_game_balance","data":{}}"#).unwrap();
        tx.send(envelope).await.unwrap();
        drop(tx);

        consumer.await.unwrap();
    }
}
