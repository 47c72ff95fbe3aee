use bytes::Bytes;
use std::future::Future;
use tokio::sync::mpsc;

use super::session::SessionError;

/// Outbound frames buffered per client before `push` waits.
pub const DEFAULT_BUFFER: usize = 16;

/// The write side of one client's push stream.
///
/// Every streaming connection can flush and report disconnects; there is no
/// runtime capability check.
pub trait StreamConnection: Send + Sync + 'static {
    /// Writes one complete frame and flushes it to the client.
    ///
    /// Fails with [`SessionError::TransportFailure`] once the client is gone.
    fn push(&self, frame: Bytes) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Resolves once the client has disconnected.
    fn disconnected(&self) -> impl Future<Output = ()> + Send;
}

/// Connection backed by a bounded channel whose receiver feeds the HTTP
/// response body. The server dropping the body (client gone) closes the
/// channel.
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelConnection {
    /// Creates a connection and the receiver to hand to the response body.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl StreamConnection for ChannelConnection {
    fn push(&self, frame: Bytes) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move {
            self.tx
                .send(frame)
                .await
                .map_err(|_| SessionError::TransportFailure)
        }
    }

    fn disconnected(&self) -> impl Future<Output = ()> + Send {
        self.tx.closed()
    }
}
