use kit_errors::ErrorCode;
use thiserror::Error;

/// Errors from the instruction planner and executor (C8, C9).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("a single instruction does not fit in any achievable message")]
    InstructionCannotFit,

    #[error("a plan could not be packed into any achievable transaction")]
    TransactionTooLarge,

    #[error("a non-divisible sequential subtree does not fit in one message")]
    NonDivisibleSequentialTooLarge,

    #[error("the operation was cancelled")]
    Aborted,

    #[error(transparent)]
    Transaction(#[from] kit_transactions::TransactionError),
}

impl ErrorCode for PlanError {
    fn code(&self) -> &'static str {
        match self {
            Self::InstructionCannotFit => "InstructionCannotFit",
            Self::TransactionTooLarge => "TransactionTooLarge",
            Self::NonDivisibleSequentialTooLarge => "NonDivisibleSequentialTooLarge",
            Self::Aborted => "Aborted",
            Self::Transaction(inner) => inner.code(),
        }
    }
}

/// Not named `PlanResult` — that name is reserved for the executor's result
/// tree (isomorphic to `TransactionPlan`), defined in `transaction_plan.rs`.
pub type PlanOutcome<T> = Result<T, PlanError>;

/// Errors from the confirmation core (C10).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfirmError {
    #[error("block height {current_block_height} exceeded lifetime bound {last_valid_block_height}")]
    BlockHeightExceeded {
        current_block_height: u64,
        last_valid_block_height: u64,
    },

    #[error("nonce account {nonce_account_address} held {actual:?}, transaction was signed against {expected:?}")]
    InvalidNonce {
        nonce_account_address: String,
        expected: [u8; 32],
        actual: Option<[u8; 32]>,
    },

    #[error("nonce account {nonce_account_address} does not exist")]
    NonceAccountNotFound { nonce_account_address: String },

    #[error("simulation failed while estimating the compute unit limit")]
    TransactionFailedWhenSimulatingToEstimateComputeLimit {
        #[source]
        cause: SharedRpcError,
    },

    #[error("sendTransaction preflight check failed")]
    SendTransactionPreflightFailure {
        #[source]
        cause: SharedRpcError,
    },

    #[error("the confirmation wait was cancelled")]
    Aborted,

    #[error("the transaction landed with an on-chain error")]
    LandedWithError { cause: SharedRpcError },
}

impl ErrorCode for ConfirmError {
    fn code(&self) -> &'static str {
        match self {
            Self::BlockHeightExceeded { .. } => "BlockHeightExceeded",
            Self::InvalidNonce { .. } => "InvalidNonce",
            Self::NonceAccountNotFound { .. } => "NonceAccountNotFound",
            Self::TransactionFailedWhenSimulatingToEstimateComputeLimit { .. } => {
                "TransactionFailedWhenSimulatingToEstimateComputeLimit"
            }
            Self::SendTransactionPreflightFailure { .. } => "SendTransactionPreflightFailure",
            Self::Aborted => "Aborted",
            Self::LandedWithError { .. } => "LandedWithError",
        }
    }
}

pub type ConfirmResult<T> = Result<T, ConfirmError>;

/// An opaque, cloneable stand-in for a transport-level RPC error. The
/// confirmation core never interprets these beyond carrying them as a cause;
/// `unwrap_simulation_error` peels them back to a caller-matchable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SharedRpcError {
    pub message: String,
}

impl SharedRpcError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Peels wrapping simulation/preflight layers off a [`ConfirmError`], per
/// §7's `unwrapSimulationError`, returning the innermost message a caller can
/// match on.
pub fn unwrap_simulation_error(err: &ConfirmError) -> String {
    match err {
        ConfirmError::TransactionFailedWhenSimulatingToEstimateComputeLimit { cause }
        | ConfirmError::SendTransactionPreflightFailure { cause }
        | ConfirmError::LandedWithError { cause } => {
            kit_errors::root_cause(cause).to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_simulation_error_peels_the_shared_cause() {
        let err = ConfirmError::SendTransactionPreflightFailure {
            cause: SharedRpcError::new("insufficient funds"),
        };
        assert_eq!(unwrap_simulation_error(&err), "insufficient funds");
    }

    #[test]
    fn unwrap_simulation_error_passes_through_other_variants() {
        let err = ConfirmError::Aborted;
        assert_eq!(unwrap_simulation_error(&err), "the confirmation wait was cancelled");
    }
}
