//! Address-lookup-table compression (§4.6 bullet 2): rewriting static
//! non-signer account metas into lookup references when their address is
//! available in a caller-supplied table.

use std::collections::BTreeMap;

use kit_addresses::Address;

use crate::account_meta::{AccountLookupMeta, InstructionAccount};
use crate::message::TransactionMessage;

/// `lookupTableAddress -> [addresses]`, ordered deterministically by table
/// address so compression always picks the same table when an address
/// appears in more than one.
pub type LookupTableMap = BTreeMap<Address, Vec<Address>>;

pub fn compress_lookup_tables(
    message: TransactionMessage,
    lookup_tables: &LookupTableMap,
) -> TransactionMessage {
    let version = message.version();
    let fee_payer = message.fee_payer();
    let lifetime = message.lifetime().cloned();
    let mut rebuilt = TransactionMessage::new(version);
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
            } => rebuilt.with_durable_nonce_lifetime(
                nonce,
                nonce_account_address,
                nonce_authority_address,
            ),
        };
    }

    let instructions = message.instructions().iter().cloned().map(|instruction| {
        crate::instruction::Instruction {
            program_address: instruction.program_address,
            data: instruction.data,
            accounts: instruction
                .accounts
                .into_iter()
                .map(|account| compress_account(account, lookup_tables))
                .collect(),
        }
    });
    rebuilt.append_instructions(instructions)
}

fn compress_account(account: InstructionAccount, lookup_tables: &LookupTableMap) -> InstructionAccount {
    let InstructionAccount::Static(meta) = account else {
        return account;
    };
    if meta.role.is_signer() {
        return InstructionAccount::Static(meta);
    }
    for (lookup_table_address, addresses) in lookup_tables {
        if let Some(address_index) = addresses.iter().position(|address| *address == meta.address) {
            return InstructionAccount::Lookup(AccountLookupMeta {
                address: meta.address,
                lookup_table_address: *lookup_table_address,
                address_index: address_index as u8,
                role: meta.role,
            });
        }
    }
    InstructionAccount::Static(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_meta::{AccountMeta, AccountRole};
    use crate::instruction::Instruction;
    use crate::message::TransactionMessageVersion;

    #[test]
    fn non_signer_matching_table_entry_is_compressed() {
        let table_address: Address = [10u8; 32].into();
        let looked_up: Address = [11u8; 32].into();
        let mut tables = LookupTableMap::new();
        tables.insert(table_address, vec![[0u8; 32].into(), looked_up]);

        let message = TransactionMessage::new(TransactionMessageVersion::V0)
            .with_fee_payer([1u8; 32].into())
            .append_instruction(Instruction::new(
                [9u8; 32].into(),
                vec![InstructionAccount::Static(AccountMeta::new(
                    looked_up,
                    AccountRole::WritableNonSigner,
                ))],
                vec![],
            ));

        let compressed = compress_lookup_tables(message, &tables);
        match &compressed.instructions()[0].accounts[0] {
            InstructionAccount::Lookup(meta) => {
                assert_eq!(meta.lookup_table_address, table_address);
                assert_eq!(meta.address_index, 1);
            }
            InstructionAccount::Static(_) => panic!("expected a compressed lookup meta"),
        }
    }

    #[test]
    fn signers_are_never_compressed() {
        let table_address: Address = [10u8; 32].into();
        let signer_address: Address = [11u8; 32].into();
        let mut tables = LookupTableMap::new();
        tables.insert(table_address, vec![signer_address]);

        let message = TransactionMessage::new(TransactionMessageVersion::V0)
            .with_fee_payer([1u8; 32].into())
            .append_instruction(Instruction::new(
                [9u8; 32].into(),
                vec![InstructionAccount::Static(AccountMeta::new(
                    signer_address,
                    AccountRole::ReadonlySigner,
                ))],
                vec![],
            ));

        let compressed = compress_lookup_tables(message, &tables);
        assert!(matches!(
            compressed.instructions()[0].accounts[0],
            InstructionAccount::Static(_)
        ));
    }
}
