//! Bridge channel
//!
//! Unbounded async channel carrying raw posted strings from the content to
//! the host, delivered in arrival order.

use smol::channel::{self, Receiver, Sender, TryRecvError};

use crate::BridgeMessage;

/// Create a connected sender/receiver pair
pub fn bridge_channel() -> (BridgeSender, BridgeReceiver) {
    let (tx, rx) = channel::unbounded();
    (BridgeSender { tx }, BridgeReceiver { rx, dropped: 0 })
}

/// Content end: the surface's message-posting primitive
#[derive(Debug, Clone)]
pub struct BridgeSender {
    tx: Sender<String>,
}

impl BridgeSender {
    /// Post a raw message. Returns `false` once the host has gone away.
    pub fn post_message(&self, raw: impl Into<String>) -> bool {
        self.tx.try_send(raw.into()).is_ok()
    }
}

/// Host end
#[derive(Debug)]
pub struct BridgeReceiver {
    rx: Receiver<String>,
    dropped: u64,
}

impl BridgeReceiver {
    /// Next raw message, `None` once every sender is gone
    pub async fn recv_raw(&self) -> Option<String> {
        self.rx.recv().await.ok()
    }

    /// Next raw message without waiting
    pub fn try_recv_raw(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(raw) => Some(raw),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }

    /// Next decodable message; undecodable ones are logged and skipped
    pub async fn next_message(&mut self) -> Option<BridgeMessage> {
        loop {
            let raw = self.rx.recv().await.ok()?;
            match BridgeMessage::decode(&raw) {
                Ok(message) => return Some(message),
                Err(err) => {
                    self.dropped += 1;
                    tracing::warn!("Dropping bridge message: {}", err);
                }
            }
        }
    }

    /// Messages skipped by [`Self::next_message`]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnav_geo::{Coordinate, Court};

    fn click(id: &str) -> String {
        BridgeMessage::CourtMarkerClick {
            court: Court {
                id: id.into(),
                name: format!("Court {id}"),
                coordinate: Coordinate::new_unchecked(10.3, 123.9),
                location: "Cebu".into(),
                rating: 4.0,
                image_url: String::new(),
                phone_number: None,
            },
        }
        .encode()
        .unwrap()
    }

    #[test]
    fn test_arrival_order_and_skipping() {
        let (tx, mut rx) = bridge_channel();
        assert!(tx.post_message(click("a")));
        assert!(tx.post_message("garbage"));
        assert!(tx.post_message(click("b")));
        drop(tx);

        let ids: Vec<String> = smol::block_on(async {
            let mut ids = Vec::new();
            while let Some(BridgeMessage::CourtMarkerClick { court }) = rx.next_message().await {
                ids.push(court.id);
            }
            ids
        });

        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(rx.dropped(), 1);
    }

    #[test]
    fn test_post_after_host_gone() {
        let (tx, rx) = bridge_channel();
        drop(rx);
        assert!(!tx.post_message(click("a")));
    }

    #[test]
    fn test_try_recv_raw() {
        let (tx, rx) = bridge_channel();
        assert!(rx.try_recv_raw().is_none());
        tx.post_message("raw");
        assert_eq!(rx.try_recv_raw().as_deref(), Some("raw"));
    }
}
