//! The transaction executor (§4.9): walks a `TransactionPlan`, invoking a
//! caller-supplied callback for each message, and produces an isomorphic
//! `PlanResult` tree.

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use kit_transactions::TransactionMessage;

use crate::cancel::CancellationToken;
use crate::error::PlanError;
use crate::transaction_plan::{PlanResult, SingleResult, TransactionPlan};

/// Finalizes, signs and sends a single message, per §4.9's `executeMessage`.
/// `T` is whatever the caller wants to record for a landed transaction (a
/// signature, a full `VersionedTransaction`, etc).
#[async_trait]
pub trait MessageExecutor<T>: Send + Sync {
    async fn execute_message(
        &self,
        message: TransactionMessage,
        cancel: CancellationToken,
    ) -> Result<T, PlanError>;
}

/// Executes `plan` against `executor`, honoring the ordering guarantees of
/// §5: sequential children run strictly in order and stop at the first
/// failure; parallel children run concurrently and are all awaited.
pub async fn execute_plan<T>(
    plan: &TransactionPlan,
    executor: &(dyn MessageExecutor<T> + '_),
    cancel: &CancellationToken,
) -> PlanResult<T>
where
    T: Send + 'static,
{
    execute_boxed(plan, executor, cancel).await
}

fn execute_boxed<'a, T>(
    plan: &'a TransactionPlan,
    executor: &'a (dyn MessageExecutor<T> + 'a),
    cancel: &'a CancellationToken,
) -> BoxFuture<'a, PlanResult<T>>
where
    T: Send + 'static,
{
    Box::pin(async move {
        match plan {
            TransactionPlan::Single(message) => {
                if cancel.is_cancelled() {
                    return PlanResult::Single(SingleResult::Failed {
                        cause: PlanError::Aborted,
                    });
                }
                match executor.execute_message(message.clone(), cancel.clone()).await {
                    Ok(transaction) => PlanResult::Single(SingleResult::Successful { transaction }),
                    Err(cause) => PlanResult::Single(SingleResult::Failed { cause }),
                }
            }
            TransactionPlan::Sequential(children) => {
                let mut results = Vec::with_capacity(children.len());
                let mut aborted_rest = false;
                for child in children {
                    if aborted_rest {
                        results.push(aborted_subtree(child));
                        continue;
                    }
                    let result = execute_boxed(child, executor, cancel).await;
                    if !result.is_successful() {
                        aborted_rest = true;
                    }
                    results.push(result);
                }
                PlanResult::Sequential(results)
            }
            TransactionPlan::Parallel(children) => {
                let futures = children
                    .iter()
                    .map(|child| execute_boxed(child, executor, cancel));
                let results = join_all(futures).await;
                PlanResult::Parallel(results)
            }
        }
    })
}

/// Fills in an `Aborted` result for every `Single` leaf of a subtree that was
/// never executed because an earlier sequential sibling failed.
fn aborted_subtree<T>(plan: &TransactionPlan) -> PlanResult<T> {
    match plan {
        TransactionPlan::Single(_) => PlanResult::Single(SingleResult::Failed {
            cause: PlanError::Aborted,
        }),
        TransactionPlan::Sequential(children) => {
            PlanResult::Sequential(children.iter().map(aborted_subtree).collect())
        }
        TransactionPlan::Parallel(children) => {
            PlanResult::Parallel(children.iter().map(aborted_subtree).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit_addresses::Address;
    use kit_transactions::TransactionMessageVersion;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    fn message() -> TransactionMessage {
        TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([0u8; 32], 1)
    }

    struct CountingExecutor {
        calls: Arc<AtomicUsize>,
        fail_on_call: Option<usize>,
    }

    #[async_trait]
    impl MessageExecutor<u64> for CountingExecutor {
        async fn execute_message(
            &self,
            _message: TransactionMessage,
            _cancel: CancellationToken,
        ) -> Result<u64, PlanError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                Err(PlanError::TransactionTooLarge)
            } else {
                Ok(call as u64)
            }
        }
    }

    #[tokio::test]
    async fn sequential_stops_after_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = CountingExecutor {
            calls: calls.clone(),
            fail_on_call: Some(1),
        };
        let plan = TransactionPlan::Sequential(vec![
            TransactionPlan::Single(message()),
            TransactionPlan::Single(message()),
            TransactionPlan::Single(message()),
        ]);
        let cancel = CancellationToken::never();
        let result = execute_plan(&plan, &executor, &cancel).await;

        assert!(!result.is_successful());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        if let PlanResult::Sequential(results) = &result {
            assert!(matches!(results[0], PlanResult::Single(SingleResult::Successful { .. })));
            assert!(matches!(results[1], PlanResult::Single(SingleResult::Failed { .. })));
            assert!(matches!(results[2], PlanResult::Single(SingleResult::Failed { .. })));
        } else {
            panic!("expected a sequential result");
        }
    }

    #[tokio::test]
    async fn parallel_runs_every_child_even_after_a_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = CountingExecutor {
            calls: calls.clone(),
            fail_on_call: Some(0),
        };
        let plan = TransactionPlan::Parallel(vec![
            TransactionPlan::Single(message()),
            TransactionPlan::Single(message()),
            TransactionPlan::Single(message()),
        ]);
        let cancel = CancellationToken::never();
        let result = execute_plan(&plan, &executor, &cancel).await;

        assert!(!result.is_successful());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn a_pre_cancelled_token_fails_without_calling_the_executor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = CountingExecutor {
            calls: calls.clone(),
            fail_on_call: None,
        };
        let (source, cancel) = crate::cancel::CancellationSource::new();
        source.cancel();
        let plan = TransactionPlan::Single(message());
        let result = execute_plan(&plan, &executor, &cancel).await;

        assert!(matches!(
            result,
            PlanResult::Single(SingleResult::Failed {
                cause: PlanError::Aborted
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
