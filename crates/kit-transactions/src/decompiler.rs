//! The transaction decompiler (§4.7): inverts [`crate::compiler::compile`]
//! given a caller-supplied address-lookup-table map.

use kit_addresses::Address;
use log::debug;

use crate::account_meta::{AccountMeta, AccountRole, InstructionAccount};
use crate::compiled::CompiledTransactionMessage;
use crate::error::{TransactionError, TransactionResult};
use crate::instruction::Instruction;
use crate::lookup::LookupTableMap;
use crate::message::{TransactionMessage, TransactionMessageVersion};
use crate::nonce::{is_advance_nonce_account_instruction, SYSTEM_PROGRAM_ADDRESS};

const ADVANCE_NONCE_ACCOUNT_DISCRIMINANT: u32 = 4;

/// Decompiles `compiled` back into a [`TransactionMessage`]. `lookup_tables`
/// resolves every address-table-lookup entry the message references.
/// `last_valid_block_height_hint` must be supplied for blockhash-lifetime
/// messages — per this crate's resolved design decision, a missing hint
/// fails with [`TransactionError::LifetimeHintMissing`] rather than
/// substituting a sentinel value.
pub fn decompile(
    compiled: &CompiledTransactionMessage,
    lookup_tables: &LookupTableMap,
    last_valid_block_height_hint: Option<u64>,
) -> TransactionResult<TransactionMessage> {
    let version = match compiled.version_number {
        None => TransactionMessageVersion::Legacy,
        Some(0) => TransactionMessageVersion::V0,
        Some(other) => return Err(TransactionError::VersionNumberOutOfRange { version: other }),
    };

    let fee_payer = *compiled
        .static_accounts
        .first()
        .ok_or(TransactionError::FeePayerMissing)?;

    let virtual_lookups = resolve_lookup_virtual_accounts(compiled, lookup_tables)?;

    let mut instructions = Vec::with_capacity(compiled.instructions.len());
    for compiled_instruction in &compiled.instructions {
        let program_address = resolve_index(
            compiled,
            &virtual_lookups,
            compiled_instruction.program_address_index,
        )?
        .0;
        let accounts = compiled_instruction
            .account_indices
            .iter()
            .map(|&index| {
                let (address, role, lookup) = resolve_index(compiled, &virtual_lookups, index)?;
                Ok(match lookup {
                    Some((lookup_table_address, address_index)) => {
                        InstructionAccount::Lookup(crate::account_meta::AccountLookupMeta {
                            address,
                            lookup_table_address,
                            address_index,
                            role,
                        })
                    }
                    None => InstructionAccount::Static(AccountMeta::new(address, role)),
                })
            })
            .collect::<TransactionResult<Vec<_>>>()?;
        instructions.push(Instruction::new(
            program_address,
            accounts,
            compiled_instruction.data.clone(),
        ));
    }

    let is_durable_nonce = instructions.first().is_some_and(|first| {
        first.program_address == SYSTEM_PROGRAM_ADDRESS
            && first.data == ADVANCE_NONCE_ACCOUNT_DISCRIMINANT.to_le_bytes()
            && first.accounts.len() >= 3
    });

    let mut message = TransactionMessage::new(version)
        .with_fee_payer(fee_payer)
        .append_instructions(instructions);

    message = if is_durable_nonce {
        let first = &message.instructions()[0];
        let nonce_account_address = first.accounts[0].address();
        let nonce_authority_address = first.accounts[2].address();
        debug_assert!(is_advance_nonce_account_instruction(
            first,
            nonce_account_address,
            nonce_authority_address
        ));
        message.with_durable_nonce_lifetime(
            compiled.lifetime_token,
            nonce_account_address,
            nonce_authority_address,
        )
    } else {
        let last_valid_block_height =
            last_valid_block_height_hint.ok_or(TransactionError::LifetimeHintMissing)?;
        message.with_blockhash_lifetime(compiled.lifetime_token, last_valid_block_height)
    };

    debug!(
        "decompiled message: {} instructions, durable_nonce={}",
        message.instructions().len(),
        is_durable_nonce
    );

    Ok(message)
}

fn static_role(compiled: &CompiledTransactionMessage, index: u8) -> AccountRole {
    let header = &compiled.header;
    let index = index as usize;
    if index < header.num_required_signatures as usize {
        let readonly_start =
            header.num_required_signatures as usize - header.num_readonly_signed_accounts as usize;
        if index >= readonly_start {
            AccountRole::ReadonlySigner
        } else {
            AccountRole::WritableSigner
        }
    } else {
        let readonly_start =
            compiled.static_accounts.len() - header.num_readonly_unsigned_accounts as usize;
        if index >= readonly_start {
            AccountRole::ReadonlyNonSigner
        } else {
            AccountRole::WritableNonSigner
        }
    }
}

struct VirtualLookupAccount {
    address: Address,
    role: AccountRole,
    lookup_table_address: Address,
    address_index: u8,
}

fn resolve_lookup_virtual_accounts(
    compiled: &CompiledTransactionMessage,
    lookup_tables: &LookupTableMap,
) -> TransactionResult<Vec<VirtualLookupAccount>> {
    let mut writable = Vec::new();
    let mut readonly = Vec::new();
    for lookup in &compiled.address_table_lookups {
        let table_addresses = lookup_tables.get(&lookup.lookup_table_address);
        for &address_index in &lookup.writable_indexes {
            let address = table_addresses
                .and_then(|addresses| addresses.get(address_index as usize))
                .copied()
                .ok_or(TransactionError::AddressLookupTableEntryMissing {
                    lookup_table_address: lookup.lookup_table_address.to_base58(),
                    address_index,
                })?;
            writable.push(VirtualLookupAccount {
                address,
                role: AccountRole::WritableNonSigner,
                lookup_table_address: lookup.lookup_table_address,
                address_index,
            });
        }
        for &address_index in &lookup.readonly_indexes {
            let address = table_addresses
                .and_then(|addresses| addresses.get(address_index as usize))
                .copied()
                .ok_or(TransactionError::AddressLookupTableEntryMissing {
                    lookup_table_address: lookup.lookup_table_address.to_base58(),
                    address_index,
                })?;
            readonly.push(VirtualLookupAccount {
                address,
                role: AccountRole::ReadonlyNonSigner,
                lookup_table_address: lookup.lookup_table_address,
                address_index,
            });
        }
    }
    writable.extend(readonly);
    Ok(writable)
}

fn resolve_index(
    compiled: &CompiledTransactionMessage,
    virtual_lookups: &[VirtualLookupAccount],
    index: u8,
) -> TransactionResult<(Address, AccountRole, Option<(Address, u8)>)> {
    let static_count = compiled.static_accounts.len();
    if (index as usize) < static_count {
        let address = compiled.static_accounts[index as usize];
        Ok((address, static_role(compiled, index), None))
    } else {
        let lookup_index = index as usize - static_count;
        let entry = virtual_lookups.get(lookup_index).ok_or(
            TransactionError::AccountIndexOutOfBounds {
                index,
                available: static_count + virtual_lookups.len(),
            },
        )?;
        Ok((
            entry.address,
            entry.role,
            Some((entry.lookup_table_address, entry.address_index)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_meta::AccountMeta;
    use crate::compiler::compile;
    use crate::instruction::Instruction;

    fn addr(byte: u8) -> Address {
        [byte; 32].into()
    }

    #[test]
    fn compile_then_decompile_round_trips_a_legacy_message() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100)
            .append_instruction(Instruction::new(
                addr(2),
                vec![
                    InstructionAccount::Static(AccountMeta::new(addr(1), AccountRole::WritableSigner)),
                    InstructionAccount::Static(AccountMeta::new(addr(3), AccountRole::ReadonlyNonSigner)),
                ],
                vec![1, 2, 3],
            ));

        let compiled = compile(&message).unwrap();
        let lookup_tables = LookupTableMap::new();
        let decompiled = decompile(&compiled, &lookup_tables, Some(100)).unwrap();

        assert_eq!(decompiled.fee_payer(), message.fee_payer());
        assert_eq!(decompiled.instructions().len(), message.instructions().len());
        assert_eq!(
            decompiled.instructions()[0].data,
            message.instructions()[0].data
        );
    }

    #[test]
    fn missing_blockhash_hint_fails_with_named_error() {
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100);
        let compiled = compile(&message).unwrap();
        let lookup_tables = LookupTableMap::new();
        assert_eq!(
            decompile(&compiled, &lookup_tables, None).unwrap_err(),
            TransactionError::LifetimeHintMissing
        );
    }

    #[test]
    fn missing_lookup_table_entry_fails() {
        let table_address = addr(50);
        let looked_up = addr(51);
        let mut tables = LookupTableMap::new();
        tables.insert(table_address, vec![looked_up]);

        let message = TransactionMessage::new(TransactionMessageVersion::V0)
            .with_fee_payer(addr(1))
            .with_blockhash_lifetime([9u8; 32], 100)
            .append_instruction(Instruction::new(
                addr(2),
                vec![InstructionAccount::Lookup(
                    crate::account_meta::AccountLookupMeta {
                        address: looked_up,
                        lookup_table_address: table_address,
                        address_index: 0,
                        role: AccountRole::WritableNonSigner,
                    },
                )],
                vec![],
            ));
        let compiled = compile(&message).unwrap();

        let empty_tables = LookupTableMap::new();
        assert!(matches!(
            decompile(&compiled, &empty_tables, Some(1)),
            Err(TransactionError::AddressLookupTableEntryMissing { .. })
        ));
    }

    #[test]
    fn durable_nonce_message_round_trips_without_hint() {
        let nonce_account = addr(5);
        let nonce_authority = addr(6);
        let message = TransactionMessage::new(TransactionMessageVersion::Legacy)
            .with_fee_payer(nonce_authority)
            .with_durable_nonce_lifetime([3u8; 32], nonce_account, nonce_authority);
        let compiled = compile(&message).unwrap();
        let lookup_tables = LookupTableMap::new();
        let decompiled = decompile(&compiled, &lookup_tables, None).unwrap();
        assert!(decompiled.lifetime().unwrap().is_durable_nonce());
        assert_eq!(decompiled.instructions().len(), 1);
    }
}
