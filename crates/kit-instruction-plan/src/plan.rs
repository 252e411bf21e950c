//! The `InstructionPlan` tree (§4.8): what a caller wants executed, before
//! the planner decides how to pack it into transactions.

use kit_transactions::Instruction;

/// Produces instructions on demand, one at a time, against a shrinking byte
/// budget. Used for open-ended batches (e.g. "mint to N recipients") whose
/// exact instruction count the caller doesn't want to precompute by hand.
pub trait InstructionPacker: Send {
    /// Returns the next instruction to try packing, or `None` if the packer
    /// has nothing left to offer regardless of budget. `remaining_budget` is
    /// a hint only — the planner always re-verifies fit by compiling.
    fn next_instruction(&mut self, remaining_budget: usize) -> Option<Instruction>;

    /// True once the packer has emitted everything it has.
    fn is_complete(&self) -> bool;
}

pub enum InstructionPlan {
    Single(Instruction),
    Sequential {
        divisible: bool,
        plans: Vec<InstructionPlan>,
    },
    Parallel {
        plans: Vec<InstructionPlan>,
    },
    MessagePacker(Box<dyn InstructionPacker>),
}

impl InstructionPlan {
    pub fn single(instruction: Instruction) -> Self {
        Self::Single(instruction)
    }

    pub fn sequential(divisible: bool, plans: Vec<InstructionPlan>) -> Self {
        Self::Sequential { divisible, plans }
    }

    pub fn parallel(plans: Vec<InstructionPlan>) -> Self {
        Self::Parallel { plans }
    }

    pub fn message_packer(packer: impl InstructionPacker + 'static) -> Self {
        Self::MessagePacker(Box::new(packer))
    }
}
