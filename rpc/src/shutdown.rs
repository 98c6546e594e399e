//! Shutdown coordination between the signal handler and the API server.
//!
//! The request is held in a `watch` channel, so a listener created after
//! shutdown was requested still sees it.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// What stopped the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    Requested,
}

pub struct ShutdownController {
    tx: watch::Sender<Option<ShutdownReason>>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Request shutdown. The first reason recorded wins.
    pub fn request(&self, reason: ShutdownReason) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    pub fn requested(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }

    /// Wait for SIGINT or SIGTERM and request shutdown.
    pub async fn watch_signals(&self) {
        let reason = next_signal().await;
        info!(?reason, "shutdown signal received");
        self.request(reason);
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to the server.
pub struct ShutdownListener {
    rx: watch::Receiver<Option<ShutdownReason>>,
}

impl ShutdownListener {
    /// Resolve once shutdown is requested. A dropped controller counts as a
    /// request.
    pub async fn wait(mut self) -> ShutdownReason {
        match self.rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or(ShutdownReason::Requested),
            Err(_) => ShutdownReason::Requested,
        }
    }
}

async fn next_signal() -> ShutdownReason {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => ShutdownReason::Interrupt,
        _ = terminate => ShutdownReason::Terminate,
    }
}
