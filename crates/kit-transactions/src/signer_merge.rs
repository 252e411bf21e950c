//! Signer-aware account merging (§4.6): attaching available signing
//! capability to the accounts of a message that already reference it by
//! address, and deduplicating repeated signers.

use std::collections::BTreeMap;

use kit_addresses::{Address, KeyPair};

use crate::account_meta::{AccountRole, InstructionAccount};
use crate::message::TransactionMessage;

/// A deduplicated pool of signing capability, keyed by address.
#[derive(Default)]
pub struct SignerPool {
    by_address: BTreeMap<Address, KeyPair>,
}

impl SignerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a signer, deduplicating against any signer already registered
    /// for the same address.
    pub fn add(&mut self, signer: KeyPair) {
        self.by_address.entry(signer.address()).or_insert(signer);
    }

    pub fn get(&self, address: &Address) -> Option<&KeyPair> {
        self.by_address.get(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.by_address.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

/// Upgrades any account meta whose address matches an available signer to
/// carry signer privilege, preserving its writability. Accounts whose
/// address isn't in `signers` are left untouched. The fee payer, being a
/// bare address in this model already, needs no separate upgrade step — it
/// is cross-checked the same way at compile time.
pub fn merge_signers(message: TransactionMessage, signers: &SignerPool) -> TransactionMessage {
    let version = message.version();
    let fee_payer = message.fee_payer();
    let lifetime = message.lifetime().cloned();
    let mut rebuilt = crate::message::TransactionMessage::new(version);
    if let Some(fee_payer) = fee_payer {
        rebuilt = rebuilt.with_fee_payer(fee_payer);
    }
    if let Some(lifetime) = lifetime {
        rebuilt = match lifetime {
            crate::lifetime::TransactionMessageLifetime::Blockhash {
                blockhash,
                last_valid_block_height,
            } => rebuilt.with_blockhash_lifetime(blockhash, last_valid_block_height),
            crate::lifetime::TransactionMessageLifetime::DurableNonce {
                nonce,
                nonce_account_address,
                nonce_authority_address,
            } => rebuilt.with_durable_nonce_lifetime(nonce, nonce_account_address, nonce_authority_address),
        };
    }

    let instructions = message
        .instructions()
        .iter()
        .cloned()
        .map(|instruction| crate::instruction::Instruction {
            program_address: instruction.program_address,
            data: instruction.data,
            accounts: instruction
                .accounts
                .into_iter()
                .map(|account| upgrade_account(account, signers))
                .collect(),
        });
    rebuilt.append_instructions(instructions)
}

fn upgrade_account(account: InstructionAccount, signers: &SignerPool) -> InstructionAccount {
    match account {
        InstructionAccount::Static(mut meta) => {
            if signers.get(&meta.address).is_some() {
                meta.role = meta.role.merge(AccountRole::ReadonlySigner);
            }
            InstructionAccount::Static(meta)
        }
        lookup => lookup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_meta::{AccountMeta, AccountRole};
    use crate::instruction::Instruction;
    use crate::message::TransactionMessageVersion;

    #[test]
    fn duplicate_signers_collapse_to_one_entry() {
        let signer = KeyPair::generate();
        let mut pool = SignerPool::new();
        pool.add(signer.clone());
        pool.add(signer);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn matching_address_is_upgraded_to_signer() {
        let signer = KeyPair::generate();
        let address = signer.address();
        let mut pool = SignerPool::new();
        pool.add(signer);

        let message = TransactionMessage::new(TransactionMessageVersion::Legacy).append_instruction(
            Instruction::new(
                [9u8; 32].into(),
                vec![InstructionAccount::Static(AccountMeta::new(
                    address,
                    AccountRole::WritableNonSigner,
                ))],
                vec![],
            ),
        );

        let merged = merge_signers(message, &pool);
        let account = &merged.instructions()[0].accounts[0];
        assert!(account.role().is_signer());
        assert!(account.role().is_writable());
    }

    #[test]
    fn non_matching_address_is_untouched() {
        let pool = SignerPool::new();
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy).append_instruction(
            Instruction::new(
                [9u8; 32].into(),
                vec![InstructionAccount::Static(AccountMeta::new(
                    [1u8; 32].into(),
                    AccountRole::ReadonlyNonSigner,
                ))],
                vec![],
            ),
        );
        let merged = merge_signers(message, &pool);
        assert!(!merged.instructions()[0].accounts[0].role().is_signer());
    }
}
