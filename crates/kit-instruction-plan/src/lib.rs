//! The instruction planner, transaction executor, and confirmation core
//! (C8, C9, C10).

pub mod cancel;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod plan;
pub mod planner;
pub mod transaction_plan;

pub use cancel::{CancellationSource, CancellationToken};
pub use confirm::{
    confirm_blockhash_lifetime, confirm_durable_nonce, reconcile_nonce_invalidation,
    BlockHeightSource, CommitmentLevel, NonceAccountSource, NonceReconciliation, SignatureStatus,
    SignatureStatusSource,
};
pub use error::{unwrap_simulation_error, ConfirmError, ConfirmResult, PlanError, PlanOutcome, SharedRpcError};
pub use executor::{execute_plan, MessageExecutor};
pub use plan::{InstructionPacker, InstructionPlan};
pub use planner::{plan, MessageFactory};
pub use transaction_plan::{PlanResult, SingleResult, TransactionPlan};
