use kit_addresses::Address;

use crate::account_meta::InstructionAccount;

/// An uncompiled instruction: a program address, its account references, and
/// opaque instruction data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_address: Address,
    pub accounts: Vec<InstructionAccount>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_address: Address, accounts: Vec<InstructionAccount>, data: Vec<u8>) -> Self {
        Self {
            program_address,
            accounts,
            data,
        }
    }
}
