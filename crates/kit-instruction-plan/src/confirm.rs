//! The confirmation core (§4.10): races signature confirmation against
//! blockhash expiry or nonce invalidation, with the "first to settle, then
//! reconcile" policy §5 requires for the nonce case.

use std::time::Duration;

use async_trait::async_trait;
use kit_addresses::{Address, Signature};

use crate::cancel::CancellationToken;
use crate::error::{ConfirmError, ConfirmResult, SharedRpcError};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommitmentLevel {
    Processed,
    Confirmed,
    Finalized,
}

impl CommitmentLevel {
    pub fn meets(self, required: CommitmentLevel) -> bool {
        self >= required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub confirmation_status: Option<CommitmentLevel>,
    pub err: Option<SharedRpcError>,
}

/// Abstract RPC capability: `getSignatureStatuses`.
#[async_trait]
pub trait SignatureStatusSource: Send + Sync {
    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> ConfirmResult<Vec<Option<SignatureStatus>>>;
}

/// Abstract RPC capability: `getEpochInfo`, narrowed to the block height it
/// carries.
#[async_trait]
pub trait BlockHeightSource: Send + Sync {
    async fn get_block_height(&self) -> ConfirmResult<u64>;
}

/// Abstract RPC capability: reading a nonce account's current stored value.
#[async_trait]
pub trait NonceAccountSource: Send + Sync {
    async fn get_nonce_value(&self, nonce_account_address: Address) -> ConfirmResult<Option<[u8; 32]>>;
}

async fn lookup_status(
    signature: &Signature,
    source: &dyn SignatureStatusSource,
) -> ConfirmResult<Option<SignatureStatus>> {
    Ok(source
        .get_signature_statuses(std::slice::from_ref(signature))
        .await?
        .into_iter()
        .next()
        .flatten())
}

/// Confirms a blockhash-lifetime transaction: races signature confirmation
/// against the blockhash's expiry.
pub async fn confirm_blockhash_lifetime(
    signature: &Signature,
    required_commitment: CommitmentLevel,
    last_valid_block_height: u64,
    signatures: &dyn SignatureStatusSource,
    block_heights: &dyn BlockHeightSource,
    cancel: &CancellationToken,
) -> ConfirmResult<()> {
    loop {
        if cancel.is_cancelled() {
            return Err(ConfirmError::Aborted);
        }
        if let Some(resolution) = check_signature(signature, required_commitment, signatures).await? {
            return resolution;
        }

        let observed = block_heights.get_block_height().await?;
        if observed > last_valid_block_height {
            // A skipped-slot gap can make the height look exceeded when it
            // isn't yet; re-read once before declaring expiry.
            let rechecked = block_heights.get_block_height().await?;
            if rechecked > last_valid_block_height {
                return Err(ConfirmError::BlockHeightExceeded {
                    current_block_height: rechecked,
                    last_valid_block_height,
                });
            }
        }

        wait_or_cancel(cancel).await?;
    }
}

/// Confirms a durable-nonce transaction: races signature confirmation
/// against the nonce account's value changing, reconciling the benign case
/// where the transaction actually landed before the nonce rolled.
pub async fn confirm_durable_nonce(
    signature: &Signature,
    required_commitment: CommitmentLevel,
    nonce_account_address: Address,
    expected_nonce: [u8; 32],
    signatures: &dyn SignatureStatusSource,
    nonces: &dyn NonceAccountSource,
    cancel: &CancellationToken,
) -> ConfirmResult<()> {
    loop {
        if cancel.is_cancelled() {
            return Err(ConfirmError::Aborted);
        }
        if let Some(resolution) = check_signature(signature, required_commitment, signatures).await? {
            return resolution;
        }

        match nonces.get_nonce_value(nonce_account_address).await? {
            None => {
                return Err(ConfirmError::NonceAccountNotFound {
                    nonce_account_address: nonce_account_address.to_base58(),
                })
            }
            Some(actual) if actual != expected_nonce => {
                match reconcile_nonce_invalidation(
                    signature,
                    required_commitment,
                    nonce_account_address,
                    expected_nonce,
                    actual,
                    signatures,
                )
                .await
                {
                    NonceReconciliation::Resolved(result) => return result,
                    NonceReconciliation::KeepWaiting => {}
                }
            }
            Some(_) => {}
        }

        wait_or_cancel(cancel).await?;
    }
}

/// `None` means "keep waiting"; `Some(Ok(()))`/`Some(Err(..))` is a final
/// answer from the signature side of the race.
async fn check_signature(
    signature: &Signature,
    required_commitment: CommitmentLevel,
    signatures: &dyn SignatureStatusSource,
) -> ConfirmResult<Option<ConfirmResult<()>>> {
    let Some(status) = lookup_status(signature, signatures).await? else {
        return Ok(None);
    };
    if let Some(err) = status.err {
        return Ok(Some(Err(ConfirmError::LandedWithError { cause: err })));
    }
    if status.confirmation_status.is_some_and(|c| c.meets(required_commitment)) {
        return Ok(Some(Ok(())));
    }
    Ok(None)
}

async fn wait_or_cancel(cancel: &CancellationToken) -> ConfirmResult<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ConfirmError::Aborted),
        _ = tokio::time::sleep(POLL_INTERVAL) => Ok(()),
    }
}

pub enum NonceReconciliation {
    Resolved(ConfirmResult<()>),
    KeepWaiting,
}

/// The critical correctness rule from §4.10: when a nonce-invalidation event
/// fires, consult `getSignatureStatuses` before declaring failure. If the
/// signature already landed at the requested commitment, the race resolves
/// successfully despite the nonce having rolled.
pub async fn reconcile_nonce_invalidation(
    signature: &Signature,
    required_commitment: CommitmentLevel,
    nonce_account_address: Address,
    expected_nonce: [u8; 32],
    actual_nonce: [u8; 32],
    signatures: &dyn SignatureStatusSource,
) -> NonceReconciliation {
    let invalid_nonce = || {
        NonceReconciliation::Resolved(Err(ConfirmError::InvalidNonce {
            nonce_account_address: nonce_account_address.to_base58(),
            expected: expected_nonce,
            actual: Some(actual_nonce),
        }))
    };

    let status = match lookup_status(signature, signatures).await {
        Ok(status) => status,
        Err(_) => return invalid_nonce(),
    };

    match status {
        None => invalid_nonce(),
        Some(status) => {
            if let Some(err) = status.err {
                NonceReconciliation::Resolved(Err(ConfirmError::LandedWithError { cause: err }))
            } else if status.confirmation_status.is_some_and(|c| c.meets(required_commitment)) {
                NonceReconciliation::Resolved(Ok(()))
            } else {
                NonceReconciliation::KeepWaiting
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    fn sig() -> Signature {
        Signature::new_from_array([7u8; 64])
    }

    struct FixedStatusSource {
        status: Mutex<Option<SignatureStatus>>,
    }

    #[async_trait]
    impl SignatureStatusSource for FixedStatusSource {
        async fn get_signature_statuses(
            &self,
            signatures: &[Signature],
        ) -> ConfirmResult<Vec<Option<SignatureStatus>>> {
            Ok(signatures
                .iter()
                .map(|_| self.status.lock().unwrap().clone())
                .collect())
        }
    }

    #[tokio::test]
    async fn nonce_invalidation_resolves_successfully_when_signature_is_finalized() {
        let source = FixedStatusSource {
            status: Mutex::new(Some(SignatureStatus {
                confirmation_status: Some(CommitmentLevel::Finalized),
                err: None,
            })),
        };
        let outcome = reconcile_nonce_invalidation(
            &sig(),
            CommitmentLevel::Finalized,
            addr(1),
            [0u8; 32],
            [1u8; 32],
            &source,
        )
        .await;
        assert!(matches!(outcome, NonceReconciliation::Resolved(Ok(()))));
    }

    #[tokio::test]
    async fn nonce_invalidation_fails_with_invalid_nonce_when_status_is_unknown() {
        let source = FixedStatusSource {
            status: Mutex::new(None),
        };
        let outcome = reconcile_nonce_invalidation(
            &sig(),
            CommitmentLevel::Finalized,
            addr(1),
            [0u8; 32],
            [1u8; 32],
            &source,
        )
        .await;
        assert!(matches!(
            outcome,
            NonceReconciliation::Resolved(Err(ConfirmError::InvalidNonce { .. }))
        ));
    }

    #[tokio::test]
    async fn nonce_invalidation_keeps_waiting_when_status_is_known_but_not_yet_committed() {
        let source = FixedStatusSource {
            status: Mutex::new(Some(SignatureStatus {
                confirmation_status: Some(CommitmentLevel::Processed),
                err: None,
            })),
        };
        let outcome = reconcile_nonce_invalidation(
            &sig(),
            CommitmentLevel::Finalized,
            addr(1),
            [0u8; 32],
            [1u8; 32],
            &source,
        )
        .await;
        assert!(matches!(outcome, NonceReconciliation::KeepWaiting));
    }

    #[tokio::test]
    async fn nonce_invalidation_surfaces_the_landed_transaction_error() {
        let source = FixedStatusSource {
            status: Mutex::new(Some(SignatureStatus {
                confirmation_status: Some(CommitmentLevel::Finalized),
                err: Some(SharedRpcError::new("custom program error: 0x1")),
            })),
        };
        let outcome = reconcile_nonce_invalidation(
            &sig(),
            CommitmentLevel::Finalized,
            addr(1),
            [0u8; 32],
            [1u8; 32],
            &source,
        )
        .await;
        assert!(matches!(
            outcome,
            NonceReconciliation::Resolved(Err(ConfirmError::LandedWithError { .. }))
        ));
    }
}
