//! A minimal cancellation token (§5): every long-running operation accepts
//! one and must observe cancellation as the dedicated `Aborted` error kind.

use tokio::sync::watch;

#[derive(Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    pub fn new() -> (Self, CancellationToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancellationToken { rx })
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new().0
    }
}

impl CancellationToken {
    /// A token that never cancels, for callers that don't need the feature.
    pub fn never() -> Self {
        CancellationSource::new().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation has been signalled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                // Sender dropped without ever cancelling: never resolves.
                futures::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_cancel_is_called() {
        let (source, token) = CancellationSource::new();
        assert!(!token.is_cancelled());
        source.cancel();
        token.cancelled().await;
        assert!(token.is_cancelled());
    }

    #[test]
    fn never_is_never_cancelled() {
        assert!(!CancellationToken::never().is_cancelled());
    }
}
