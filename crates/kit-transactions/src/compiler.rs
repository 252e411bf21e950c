//! The transaction compiler (§4.7): turns an uncompiled [`TransactionMessage`]
//! into the exact bytes a validator will hash.

use std::collections::{BTreeMap, HashMap, HashSet};

use kit_addresses::Address;
use log::debug;

use crate::account_meta::{AccountRole, InstructionAccount};
use crate::compiled::{
    CompiledAddressTableLookup, CompiledInstruction, CompiledTransactionMessage, MessageHeader,
};
use crate::error::{TransactionError, TransactionResult};
use crate::message::{TransactionMessage, TransactionMessageVersion};

/// Compiles `message` into its wire form (§4.7 steps 1-6).
pub fn compile(message: &TransactionMessage) -> TransactionResult<CompiledTransactionMessage> {
    let fee_payer = message.fee_payer().ok_or(TransactionError::FeePayerMissing)?;
    let lifetime = message
        .lifetime()
        .ok_or(TransactionError::LifetimeMissing)?
        .clone();

    let mut order: Vec<Address> = Vec::new();
    let mut roles: HashMap<Address, AccountRole> = HashMap::new();
    let mut program_addresses: HashSet<Address> = HashSet::new();
    let mut table_order: Vec<Address> = Vec::new();
    let mut lookup_entries: BTreeMap<(Address, u8), (Address, AccountRole)> = BTreeMap::new();

    touch(&mut order, &mut roles, fee_payer, AccountRole::WritableSigner);

    for instruction in message.instructions() {
        for account in &instruction.accounts {
            match account {
                InstructionAccount::Static(meta) => {
                    touch(&mut order, &mut roles, meta.address, meta.role);
                }
                InstructionAccount::Lookup(meta) => {
                    if !table_order.contains(&meta.lookup_table_address) {
                        table_order.push(meta.lookup_table_address);
                    }
                    let key = (meta.lookup_table_address, meta.address_index);
                    lookup_entries
                        .entry(key)
                        .and_modify(|(_, role)| *role = role.merge(meta.role))
                        .or_insert((meta.address, meta.role));
                }
            }
        }
        program_addresses.insert(instruction.program_address);
        touch(
            &mut order,
            &mut roles,
            instruction.program_address,
            AccountRole::ReadonlyNonSigner,
        );
    }

    for program_address in &program_addresses {
        roles.insert(*program_address, AccountRole::ReadonlyNonSigner);
    }
    for (_, (address, _)) in lookup_entries.iter() {
        if program_addresses.contains(address) {
            return Err(TransactionError::ProgramMustBeStatic);
        }
    }

    if lifetime.is_durable_nonce() {
        let (nonce_account, nonce_authority) = match &lifetime {
            crate::lifetime::TransactionMessageLifetime::DurableNonce {
                nonce_account_address,
                nonce_authority_address,
                ..
            } => (*nonce_account_address, *nonce_authority_address),
            _ => unreachable!(),
        };
        let first_ok = message.instructions().first().is_some_and(|first| {
            crate::nonce::is_advance_nonce_account_instruction(first, nonce_account, nonce_authority)
        });
        if !first_ok {
            return Err(TransactionError::MissingNonceAdvanceInstruction);
        }
    }

    let mut writable_signers = Vec::new();
    let mut readonly_signers = Vec::new();
    let mut writable_non_signers = Vec::new();
    let mut readonly_non_signers = Vec::new();
    for address in &order {
        match roles[address] {
            AccountRole::WritableSigner => writable_signers.push(*address),
            AccountRole::ReadonlySigner => readonly_signers.push(*address),
            AccountRole::WritableNonSigner => writable_non_signers.push(*address),
            AccountRole::ReadonlyNonSigner => readonly_non_signers.push(*address),
        }
    }

    let header = MessageHeader {
        num_required_signatures: (writable_signers.len() + readonly_signers.len()) as u8,
        num_readonly_signed_accounts: readonly_signers.len() as u8,
        num_readonly_unsigned_accounts: readonly_non_signers.len() as u8,
    };

    let mut static_accounts = writable_signers;
    static_accounts.extend(readonly_signers);
    static_accounts.extend(writable_non_signers);
    static_accounts.extend(readonly_non_signers);

    let mut index_of: HashMap<Address, u8> = HashMap::new();
    for (index, address) in static_accounts.iter().enumerate() {
        index_of.insert(*address, index as u8);
    }

    let mut writable_by_table: HashMap<Address, Vec<u8>> = HashMap::new();
    let mut readonly_by_table: HashMap<Address, Vec<u8>> = HashMap::new();
    for table_address in &table_order {
        for ((table, idx), (_, role)) in
            lookup_entries.range((*table_address, 0)..=(*table_address, u8::MAX))
        {
            debug_assert_eq!(table, table_address);
            if role.is_writable() {
                writable_by_table.entry(*table_address).or_default().push(*idx);
            } else {
                readonly_by_table.entry(*table_address).or_default().push(*idx);
            }
        }
    }

    let static_count = static_accounts.len() as u8;
    let mut virtual_index: HashMap<(Address, u8), u8> = HashMap::new();
    let mut running = static_count;
    for table_address in &table_order {
        for idx in writable_by_table.get(table_address).into_iter().flatten() {
            virtual_index.insert((*table_address, *idx), running);
            running += 1;
        }
    }
    for table_address in &table_order {
        for idx in readonly_by_table.get(table_address).into_iter().flatten() {
            virtual_index.insert((*table_address, *idx), running);
            running += 1;
        }
    }

    let address_table_lookups: Vec<CompiledAddressTableLookup> = table_order
        .iter()
        .map(|table_address| CompiledAddressTableLookup {
            lookup_table_address: *table_address,
            writable_indexes: writable_by_table.get(table_address).cloned().unwrap_or_default(),
            readonly_indexes: readonly_by_table.get(table_address).cloned().unwrap_or_default(),
        })
        .collect();

    let mut compiled_instructions = Vec::with_capacity(message.instructions().len());
    for instruction in message.instructions() {
        let program_address_index = *index_of
            .get(&instruction.program_address)
            .expect("program address was just inserted into the static account set");
        let account_indices = instruction
            .accounts
            .iter()
            .map(|account| match account {
                InstructionAccount::Static(meta) => index_of[&meta.address],
                InstructionAccount::Lookup(meta) => {
                    virtual_index[&(meta.lookup_table_address, meta.address_index)]
                }
            })
            .collect();
        compiled_instructions.push(CompiledInstruction {
            program_address_index,
            account_indices,
            data: instruction.data.clone(),
        });
    }

    let version_number = match message.version() {
        TransactionMessageVersion::Legacy => None,
        TransactionMessageVersion::V0 => Some(0u8),
    };

    debug!(
        "compiled message: {} static accounts, {} instructions, {} lookup tables",
        static_accounts.len(),
        compiled_instructions.len(),
        address_table_lookups.len()
    );

    Ok(CompiledTransactionMessage {
        version_number,
        header,
        static_accounts,
        lifetime_token: lifetime.lifetime_token(),
        instructions: compiled_instructions,
        address_table_lookups,
    })
}

fn touch(
    order: &mut Vec<Address>,
    roles: &mut HashMap<Address, AccountRole>,
    address: Address,
    role: AccountRole,
) {
    match roles.get_mut(&address) {
        Some(existing) => *existing = existing.merge(role),
        None => {
            roles.insert(address, role);
            order.push(address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_meta::{AccountMeta, AccountRole, InstructionAccount};
    use crate::instruction::Instruction;

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    #[test]
    fn fee_payer_is_first_static_account_and_writable_signer() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100)
            .append_instruction(Instruction::new(
                addr(2),
                vec![InstructionAccount::Static(AccountMeta::new(
                    addr(3),
                    AccountRole::WritableNonSigner,
                ))],
                vec![7],
            ));

        let compiled = compile(&message).unwrap();
        assert_eq!(compiled.static_accounts[0], addr(1));
        assert_eq!(compiled.header.num_required_signatures, 1);
        assert_eq!(compiled.lifetime_token, [9u8; 32]);
    }

    #[test]
    fn program_address_is_forced_readonly_non_signer() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100)
            .append_instruction(Instruction::new(addr(2), vec![], vec![]));

        let compiled = compile(&message).unwrap();
        let program_index = compiled
            .static_accounts
            .iter()
            .position(|a| *a == addr(2))
            .unwrap();
        assert!(program_index as u8 >= compiled.header.num_required_signatures);
    }

    #[test]
    fn missing_fee_payer_fails() {
        let message =
            TransactionMessage::new(TransactionMessageVersion::Legacy).with_blockhash_lifetime([0u8; 32], 1);
        assert_eq!(compile(&message).unwrap_err(), TransactionError::FeePayerMissing);
    }

    #[test]
    fn missing_lifetime_fails() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy).with_fee_payer(addr(1));
        assert_eq!(compile(&message).unwrap_err(), TransactionError::LifetimeMissing);
    }

    #[test]
    fn durable_nonce_compiles_when_advance_instruction_leads() {
        let nonce_account = addr(5);
        let nonce_authority = addr(6);
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(nonce_authority)
            .with_durable_nonce_lifetime([0u8; 32], nonce_account, nonce_authority);
        assert!(compile(&message).is_ok());
    }

    #[test]
    fn durable_nonce_without_advance_instruction_fails() {
        let nonce_account = addr(5);
        let nonce_authority = addr(6);
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(nonce_authority)
            .with_durable_nonce_lifetime([0u8; 32], nonce_account, nonce_authority)
            // Prepending another instruction pushes the advance instruction
            // out of first position, which must be rejected at compile time.
            .prepend_instruction(Instruction::new(addr(9), vec![], vec![]));
        assert_eq!(
            compile(&message).unwrap_err(),
            TransactionError::MissingNonceAdvanceInstruction
        );
    }
}
