//! The transaction message builder (C6): a chain of combinators, each
//! producing a new immutable snapshot.

use kit_addresses::Address;

use crate::instruction::Instruction;
use crate::lifetime::TransactionMessageLifetime;
use crate::nonce::advance_nonce_account_instruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMessageVersion {
    Legacy,
    V0,
}

/// An immutable transaction message snapshot. Every builder method below
/// consumes `self` and returns a new value; there are no in-place setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMessage {
    version: TransactionMessageVersion,
    fee_payer: Option<Address>,
    lifetime: Option<TransactionMessageLifetime>,
    instructions: Vec<Instruction>,
}

impl TransactionMessage {
    pub fn new(version: TransactionMessageVersion) -> Self {
        Self {
            version,
            fee_payer: None,
            lifetime: None,
            instructions: Vec::new(),
        }
    }

    pub fn version(&self) -> TransactionMessageVersion {
        self.version
    }

    pub fn fee_payer(&self) -> Option<Address> {
        self.fee_payer
    }

    pub fn lifetime(&self) -> Option<&TransactionMessageLifetime> {
        self.lifetime.as_ref()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// A message is compilable exactly when it carries both a fee payer and
    /// a lifetime (§4.6).
    pub fn is_compilable(&self) -> bool {
        self.fee_payer.is_some() && self.lifetime.is_some()
    }

    pub fn with_fee_payer(mut self, fee_payer: Address) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    pub fn with_blockhash_lifetime(mut self, blockhash: [u8; 32], last_valid_block_height: u64) -> Self {
        self.lifetime = Some(TransactionMessageLifetime::Blockhash {
            blockhash,
            last_valid_block_height,
        });
        self
    }

    /// Sets a durable-nonce lifetime and prepends the required
    /// `AdvanceNonceAccount` instruction if it is not already the first
    /// instruction.
    pub fn with_durable_nonce_lifetime(
        mut self,
        nonce: [u8; 32],
        nonce_account_address: Address,
        nonce_authority_address: Address,
    ) -> Self {
        self.lifetime = Some(TransactionMessageLifetime::DurableNonce {
            nonce,
            nonce_account_address,
            nonce_authority_address,
        });
        let already_present = self
            .instructions
            .first()
            .is_some_and(|first| {
                crate::nonce::is_advance_nonce_account_instruction(
                    first,
                    nonce_account_address,
                    nonce_authority_address,
                )
            });
        if !already_present {
            self.instructions.insert(
                0,
                advance_nonce_account_instruction(nonce_account_address, nonce_authority_address),
            );
        }
        self
    }

    pub fn append_instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn prepend_instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.insert(0, instruction);
        self
    }

    pub fn append_instructions(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(instructions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_meta::{AccountMeta, AccountRole, InstructionAccount};

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    #[test]
    fn is_compilable_requires_fee_payer_and_lifetime() {
        let message = TransactionMessage::new(TransactionMessageVersion::V0);
        assert!(!message.is_compilable());

        let message = message.with_fee_payer(addr(1));
        assert!(!message.is_compilable());

        let message = message.with_blockhash_lifetime([0u8; 32], 100);
        assert!(message.is_compilable());
    }

    #[test]
    fn durable_nonce_prepends_advance_instruction_once() {
        let nonce_account = addr(2);
        let nonce_authority = addr(3);
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(nonce_authority)
            .append_instruction(Instruction::new(
                addr(9),
                vec![InstructionAccount::Static(AccountMeta::new(
                    addr(9),
                    AccountRole::ReadonlyNonSigner,
                ))],
                vec![],
            ))
            .with_durable_nonce_lifetime([1u8; 32], nonce_account, nonce_authority);

        assert_eq!(message.instructions().len(), 2);
        assert!(crate::nonce::is_advance_nonce_account_instruction(
            &message.instructions()[0],
            nonce_account,
            nonce_authority
        ));

        // Re-applying the same lifetime must not prepend a second copy.
        let message = message.with_durable_nonce_lifetime([1u8; 32], nonce_account, nonce_authority);
        assert_eq!(message.instructions().len(), 2);
    }

    #[test]
    fn prepend_and_append_preserve_order() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .append_instruction(Instruction::new(addr(1), vec![], vec![1]))
            .append_instruction(Instruction::new(addr(2), vec![], vec![2]))
            .prepend_instruction(Instruction::new(addr(0), vec![], vec![0]));

        let data: Vec<u8> = message
            .instructions()
            .iter()
            .flat_map(|ix| ix.data.clone())
            .collect();
        assert_eq!(data, vec![0, 1, 2]);
    }
}
