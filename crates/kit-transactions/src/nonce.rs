//! The single system-program instruction the compiler/decompiler needs to
//! recognize: `AdvanceNonceAccount`, required as the first instruction of any
//! durable-nonce message (§4.6, §4.7 step 4).

use kit_addresses::Address;

use crate::account_meta::{AccountMeta, AccountRole, InstructionAccount};
use crate::instruction::Instruction;

/// `11111111111111111111111111111111`, the System Program's address.
pub const SYSTEM_PROGRAM_ADDRESS: Address = Address::new_from_array([0u8; 32]);

// SysvarRecentB1ockHashes11111111111111111111, kept as raw bytes since this
// crate has no const base58 decoder.
const RECENT_BLOCKHASHES_SYSVAR: Address = Address::new_from_array([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155, 161,
    253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);

/// System program instruction index `4`, `AdvanceNonceAccount`.
const ADVANCE_NONCE_ACCOUNT_DISCRIMINANT: u32 = 4;

pub fn advance_nonce_account_instruction(
    nonce_account_address: Address,
    nonce_authority_address: Address,
) -> Instruction {
    Instruction::new(
        SYSTEM_PROGRAM_ADDRESS,
        vec![
            InstructionAccount::Static(AccountMeta::new(
                nonce_account_address,
                AccountRole::WritableNonSigner,
            )),
            InstructionAccount::Static(AccountMeta::new(
                RECENT_BLOCKHASHES_SYSVAR,
                AccountRole::ReadonlyNonSigner,
            )),
            InstructionAccount::Static(AccountMeta::new(
                nonce_authority_address,
                AccountRole::ReadonlySigner,
            )),
        ],
        ADVANCE_NONCE_ACCOUNT_DISCRIMINANT.to_le_bytes().to_vec(),
    )
}

pub fn is_advance_nonce_account_instruction(
    instruction: &Instruction,
    nonce_account_address: Address,
    nonce_authority_address: Address,
) -> bool {
    if instruction.program_address != SYSTEM_PROGRAM_ADDRESS {
        return false;
    }
    if instruction.data.as_slice() != ADVANCE_NONCE_ACCOUNT_DISCRIMINANT.to_le_bytes() {
        return false;
    }
    let Some(first_account) = instruction.accounts.first() else {
        return false;
    };
    let has_authority_signer = instruction
        .accounts
        .iter()
        .any(|account| account.address() == nonce_authority_address && account.role().is_signer());
    first_account.address() == nonce_account_address && has_authority_signer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_its_own_output() {
        let nonce_account: Address = [3u8; 32].into();
        let nonce_authority: Address = [4u8; 32].into();
        let ix = advance_nonce_account_instruction(nonce_account, nonce_authority);
        assert!(is_advance_nonce_account_instruction(
            &ix,
            nonce_account,
            nonce_authority
        ));
    }

    #[test]
    fn rejects_mismatched_nonce_account() {
        let nonce_account: Address = [3u8; 32].into();
        let nonce_authority: Address = [4u8; 32].into();
        let other: Address = [5u8; 32].into();
        let ix = advance_nonce_account_instruction(nonce_account, nonce_authority);
        assert!(!is_advance_nonce_account_instruction(
            &ix,
            other,
            nonce_authority
        ));
    }
}
