//! The instruction planner (§4.8): walks an [`InstructionPlan`] against a
//! caller-supplied message factory and the true compiled byte size, never an
//! estimate.

use kit_codecs::primitives::encode_short_u16;
use kit_transactions::{compile, Instruction, TransactionMessage, PACKET_DATA_SIZE};
use log::debug;

use crate::error::{PlanError, PlanOutcome};
use crate::plan::InstructionPlan;
use crate::transaction_plan::TransactionPlan;

/// Produces a fresh base message (fee payer, lifetime, any provisional
/// compute-budget instructions the caller wants on every transaction). The
/// planner calls this whenever it needs to start a new transaction and has
/// no knowledge of what the factory puts in it.
pub trait MessageFactory: Fn() -> TransactionMessage {}
impl<F: Fn() -> TransactionMessage> MessageFactory for F {}

/// Plans `root` into a `TransactionPlan`, per §4.8's walk rules.
pub fn plan(root: InstructionPlan, factory: &impl MessageFactory) -> PlanOutcome<TransactionPlan> {
    pack(vec![root], factory, Wrap::Sequential)
}

enum Wrap {
    Sequential,
    Parallel,
}

impl Wrap {
    fn apply(&self, plans: Vec<TransactionPlan>) -> TransactionPlan {
        match (self, plans.len()) {
            (_, 1) => plans.into_iter().next().unwrap(),
            (Wrap::Sequential, _) => TransactionPlan::Sequential(plans),
            (Wrap::Parallel, _) => TransactionPlan::Parallel(plans),
        }
    }
}

/// Packs a list of sibling plan nodes, threading one accumulating message
/// across them (so adjacent leaves share a transaction when they fit), and
/// wraps the resulting list of finalized transactions with `wrap`.
///
/// Used for both `Sequential { divisible: true }` (ordering matters, but that
/// is a property of the caller walking children in order — this function
/// itself is order-preserving either way) and `Parallel` (the spec permits
/// packing unrelated parallel children into the same transaction when they
/// fit, so the same greedy strategy applies).
fn pack(
    plans: Vec<InstructionPlan>,
    factory: &impl MessageFactory,
    wrap: Wrap,
) -> PlanOutcome<TransactionPlan> {
    let mut outputs: Vec<TransactionPlan> = Vec::new();
    let mut current = factory();
    let mut current_has_any = false;

    macro_rules! flush {
        () => {
            if current_has_any {
                outputs.push(TransactionPlan::Single(std::mem::replace(
                    &mut current,
                    factory(),
                )));
                current_has_any = false;
            }
        };
    }

    for child in plans {
        match child {
            InstructionPlan::Single(instruction) => {
                append_or_roll_over(
                    &mut current,
                    &mut current_has_any,
                    &mut outputs,
                    factory,
                    instruction,
                )?;
            }
            InstructionPlan::Sequential {
                divisible: false,
                plans: sub,
            } => {
                flush!();
                let message = pack_non_divisible(sub, factory)?;
                outputs.push(TransactionPlan::Single(message));
            }
            InstructionPlan::Sequential {
                divisible: true,
                plans: sub,
            } => {
                flush!();
                if !sub.is_empty() {
                    outputs.push(pack(sub, factory, Wrap::Sequential)?);
                }
            }
            InstructionPlan::Parallel { plans: sub } => {
                flush!();
                if !sub.is_empty() {
                    outputs.push(pack(sub, factory, Wrap::Parallel)?);
                }
            }
            InstructionPlan::MessagePacker(mut packer) => {
                while !packer.is_complete() {
                    let remaining = remaining_budget(&current);
                    let Some(instruction) = packer.next_instruction(remaining) else {
                        break;
                    };
                    append_or_roll_over(
                        &mut current,
                        &mut current_has_any,
                        &mut outputs,
                        factory,
                        instruction,
                    )?;
                }
            }
        }
    }
    flush!();

    debug!(
        "planned {} transaction(s) from {} top-level node(s)",
        outputs.len(),
        outputs.len()
    );

    if outputs.is_empty() {
        // Empty subtree: produce an empty result subtree, never an empty
        // `Single` transaction.
        return Ok(match wrap {
            Wrap::Sequential => TransactionPlan::Sequential(Vec::new()),
            Wrap::Parallel => TransactionPlan::Parallel(Vec::new()),
        });
    }
    Ok(wrap.apply(outputs))
}

/// Tries to append `instruction` to `current`. If it doesn't fit and
/// `current` already holds something, finalizes `current` into `outputs`
/// and starts a fresh message from `factory` before retrying once.
fn append_or_roll_over(
    current: &mut TransactionMessage,
    current_has_any: &mut bool,
    outputs: &mut Vec<TransactionPlan>,
    factory: &impl MessageFactory,
    instruction: Instruction,
) -> PlanOutcome<()> {
    if fits(current, &instruction)? {
        *current = current.clone().append_instruction(instruction);
        *current_has_any = true;
        return Ok(());
    }
    if *current_has_any {
        outputs.push(TransactionPlan::Single(std::mem::replace(
            current,
            factory(),
        )));
        *current_has_any = false;
    }
    if fits(current, &instruction)? {
        *current = current.clone().append_instruction(instruction);
        *current_has_any = true;
        Ok(())
    } else {
        Err(PlanError::InstructionCannotFit)
    }
}

/// Packs every leaf of `plans` into exactly one message, failing if the
/// whole subtree cannot fit. Used for `Sequential { divisible: false }`.
fn pack_non_divisible(
    plans: Vec<InstructionPlan>,
    factory: &impl MessageFactory,
) -> PlanOutcome<TransactionMessage> {
    let leaves = flatten_non_divisible(plans)?;
    let mut message = factory();
    for instruction in leaves {
        message = message.append_instruction(instruction);
    }
    if compiled_wire_size(&message)? <= PACKET_DATA_SIZE {
        Ok(message)
    } else {
        Err(PlanError::NonDivisibleSequentialTooLarge)
    }
}

fn flatten_non_divisible(plans: Vec<InstructionPlan>) -> PlanOutcome<Vec<Instruction>> {
    let mut out = Vec::new();
    for plan in plans {
        match plan {
            InstructionPlan::Single(instruction) => out.push(instruction),
            InstructionPlan::Sequential { plans: sub, .. } => {
                out.extend(flatten_non_divisible(sub)?);
            }
            InstructionPlan::Parallel { .. } | InstructionPlan::MessagePacker(_) => {
                // A non-divisible subtree names a fixed, known set of
                // instructions; parallel/open-ended packers don't fit that
                // shape, so this subtree can never be reduced to one message.
                return Err(PlanError::NonDivisibleSequentialTooLarge);
            }
        }
    }
    Ok(out)
}

/// True if `message` with `instruction` appended compiles to ≤
/// [`PACKET_DATA_SIZE`], including the signatures vector. A compile failure
/// (e.g. too many accounts) counts as "does not fit".
fn fits(message: &TransactionMessage, instruction: &Instruction) -> PlanOutcome<bool> {
    let candidate = message.clone().append_instruction(instruction.clone());
    Ok(match compiled_wire_size(&candidate) {
        Ok(size) => size <= PACKET_DATA_SIZE,
        Err(PlanError::Transaction(_)) => false,
        Err(other) => return Err(other),
    })
}

/// The true wire size: the compact-array signature vector plus the compiled
/// message bytes.
fn compiled_wire_size(message: &TransactionMessage) -> PlanOutcome<usize> {
    let compiled = compile(message)?;
    let signature_count = compiled.header.num_required_signatures as u16;
    let signature_section = encode_short_u16(signature_count).len() + 64 * signature_count as usize;
    Ok(signature_section + compiled.to_bytes().len())
}

fn remaining_budget(message: &TransactionMessage) -> usize {
    compiled_wire_size(message)
        .map(|size| PACKET_DATA_SIZE.saturating_sub(size))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit_addresses::Address;
    use kit_transactions::{AccountMeta, AccountRole, InstructionAccount, TransactionMessageVersion};

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    fn base_message() -> TransactionMessage {
        TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100)
    }

    fn padded_instruction(program: u8, padding: usize) -> Instruction {
        Instruction::new(
            addr(program),
            vec![InstructionAccount::Static(AccountMeta::new(
                addr(1),
                AccountRole::WritableSigner,
            ))],
            vec![0u8; padding],
        )
    }

    #[test]
    fn a_single_instruction_that_fits_produces_one_transaction() {
        let root = InstructionPlan::single(padded_instruction(2, 10));
        let result = plan(root, &base_message).unwrap();
        assert_eq!(result.leaf_count(), 1);
    }

    #[test]
    fn sequential_divisible_splits_across_transactions_when_full() {
        let plans = (0..20)
            .map(|i| InstructionPlan::single(padded_instruction(2, 200 + i as usize % 3)))
            .collect();
        let root = InstructionPlan::sequential(true, plans);
        let result = plan(root, &base_message).unwrap();
        assert!(result.leaf_count() >= 1);
        if let TransactionPlan::Sequential(children) = &result {
            assert!(children.len() > 1);
        }
    }

    #[test]
    fn empty_sequential_produces_an_empty_subtree() {
        let root = InstructionPlan::sequential(true, Vec::new());
        let result = plan(root, &base_message).unwrap();
        assert_eq!(result.leaf_count(), 0);
    }

    #[test]
    fn sequential_and_parallel_mix_preserves_every_instruction() {
        let create_mint = padded_instruction(2, 50);
        let mint_to_plans: Vec<InstructionPlan> = (0..100)
            .map(|_| InstructionPlan::single(padded_instruction(3, 170)))
            .collect();
        let root = InstructionPlan::sequential(
            true,
            vec![
                InstructionPlan::single(create_mint),
                InstructionPlan::parallel(mint_to_plans),
            ],
        );
        let result = plan(root, &base_message).unwrap();
        assert_eq!(result.total_instruction_count(), 101);
    }

    #[test]
    fn a_single_instruction_too_large_to_ever_fit_fails() {
        let root = InstructionPlan::single(padded_instruction(2, PACKET_DATA_SIZE * 2));
        assert_eq!(plan(root, &base_message).unwrap_err(), PlanError::InstructionCannotFit);
    }

    #[test]
    fn non_divisible_sequential_packs_into_one_message() {
        let plans = vec![
            InstructionPlan::single(padded_instruction(2, 10)),
            InstructionPlan::single(padded_instruction(3, 10)),
        ];
        let root = InstructionPlan::sequential(false, plans);
        let result = plan(root, &base_message).unwrap();
        assert_eq!(result.leaf_count(), 1);
    }

    #[test]
    fn non_divisible_sequential_that_cannot_fit_fails() {
        let plans = vec![
            InstructionPlan::single(padded_instruction(2, PACKET_DATA_SIZE)),
            InstructionPlan::single(padded_instruction(3, PACKET_DATA_SIZE)),
        ];
        let root = InstructionPlan::sequential(false, plans);
        assert_eq!(
            plan(root, &base_message).unwrap_err(),
            PlanError::NonDivisibleSequentialTooLarge
        );
    }
}
