//! The `TransactionPlan` tree (§4.8): the planner's output, and the
//! isomorphic result tree the executor produces from it (§4.9).

use kit_transactions::TransactionMessage;

use crate::error::PlanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPlan {
    Single(TransactionMessage),
    Sequential(Vec<TransactionPlan>),
    Parallel(Vec<TransactionPlan>),
}

impl TransactionPlan {
    /// Counts the `Single` leaves (i.e. the transactions) in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequential(plans) | Self::Parallel(plans) => {
                plans.iter().map(TransactionPlan::leaf_count).sum()
            }
        }
    }

    /// Counts the instructions carried across every transaction in the tree.
    /// Used to check the planner preservation invariant: this must equal the
    /// count of `Single`/`MessagePacker`-produced leaves in the input plan.
    pub fn total_instruction_count(&self) -> usize {
        match self {
            Self::Single(message) => message.instructions().len(),
            Self::Sequential(plans) | Self::Parallel(plans) => {
                plans.iter().map(TransactionPlan::total_instruction_count).sum()
            }
        }
    }
}

/// The outcome of executing one `Single` leaf (§4.9).
#[derive(Debug, Clone)]
pub enum SingleResult<T> {
    Successful { transaction: T },
    Failed { cause: PlanError },
}

/// Isomorphic to `TransactionPlan`: every `Single` node becomes a
/// [`SingleResult`].
#[derive(Debug, Clone)]
pub enum PlanResult<T> {
    Single(SingleResult<T>),
    Sequential(Vec<PlanResult<T>>),
    Parallel(Vec<PlanResult<T>>),
}

impl<T> PlanResult<T> {
    /// True if every `Single` leaf in this subtree succeeded.
    pub fn is_successful(&self) -> bool {
        match self {
            Self::Single(SingleResult::Successful { .. }) => true,
            Self::Single(SingleResult::Failed { .. }) => false,
            Self::Sequential(results) | Self::Parallel(results) => {
                results.iter().all(PlanResult::is_successful)
            }
        }
    }

    /// The first failure cause found by an in-order walk, if any.
    pub fn first_failure(&self) -> Option<&PlanError> {
        match self {
            Self::Single(SingleResult::Failed { cause }) => Some(cause),
            Self::Single(SingleResult::Successful { .. }) => None,
            Self::Sequential(results) | Self::Parallel(results) => {
                results.iter().find_map(PlanResult::first_failure)
            }
        }
    }
}
