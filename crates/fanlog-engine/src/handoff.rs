//! Socket hand-off from the network server to the engine.
//!
//! The engine never listens on a socket of its own. When a privileged client
//! asks the server for a live log tail, the server wraps the accepted socket
//! and the requested mode in a [`RemoteOffer`] and publishes it on an
//! [`OfferChannel`]. The engine's subscriber extracts the socket, queues a
//! `Connect` for the pipeline and drops the offer, which releases the server.
//! From that moment the server must not touch the socket again.
//!
//! Release is tied to `Drop`, so the server is unblocked on every path,
//! including a subscriber that bails out early.

use fanlog_sinks::RemoteStream;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Callback installed by the engine while remote logging is enabled.
pub type OfferHandler = Arc<dyn Fn(RemoteOffer) + Send + Sync>;

/// The single event channel the engine subscribes to.
pub trait OfferChannel: Send + Sync {
    fn subscribe(&self, handler: OfferHandler);
    fn unsubscribe(&self);
}

pub struct RemoteOffer {
    stream: Option<Box<dyn RemoteStream>>,
    mode: String,
    release: Option<oneshot::Sender<()>>,
}

impl RemoteOffer {
    /// Wrap an accepted socket. The returned [`Released`] resolves once the
    /// subscriber is done with the offer.
    pub fn new(stream: Box<dyn RemoteStream>, mode: impl Into<String>) -> (Self, Released) {
        let (tx, rx) = oneshot::channel();
        let offer = Self {
            stream: Some(stream),
            mode: mode.into(),
            release: Some(tx),
        };
        (offer, Released(rx))
    }

    /// Mode requested by the client, unvalidated.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Take the socket. Only the first call returns it.
    pub fn extract(&mut self) -> Option<Box<dyn RemoteStream>> {
        self.stream.take()
    }

    pub fn release(&mut self) {
        if let Some(tx) = self.release.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for RemoteOffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for RemoteOffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOffer")
            .field("peer", &self.stream.as_ref().map(|s| s.peer()))
            .field("mode", &self.mode)
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Server side of the acquire/release handshake.
#[derive(Debug)]
pub struct Released(oneshot::Receiver<()>);

impl Released {
    /// Block until the offer is released. Must not be called from inside an
    /// async runtime; use [`Released::released`] there.
    pub fn wait(self) {
        let _ = self.0.blocking_recv();
    }

    pub async fn released(self) {
        let _ = self.0.await;
    }

    pub fn is_released(&mut self) -> bool {
        !matches!(self.0.try_recv(), Err(oneshot::error::TryRecvError::Empty))
    }
}

// ---------------------------------------------------------------------------
// In-process channel
// ---------------------------------------------------------------------------

/// Minimal [`OfferChannel`]: one optional subscriber, published to directly
/// by the server.
#[derive(Clone, Default)]
pub struct OfferSlot {
    handler: Arc<Mutex<Option<OfferHandler>>>,
}

impl OfferSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Hand `offer` to the subscriber. With nobody subscribed the offer comes
    /// back untouched and the server keeps the socket.
    pub fn publish(&self, offer: RemoteOffer) -> Result<(), RemoteOffer> {
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match handler {
            Some(handler) => {
                handler(offer);
                Ok(())
            }
            None => Err(offer),
        }
    }
}

impl OfferChannel for OfferSlot {
    fn subscribe(&self, handler: OfferHandler) {
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
    }

    fn unsubscribe(&self) {
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl std::fmt::Debug for OfferSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferSlot")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
