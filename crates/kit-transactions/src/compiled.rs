//! The compiled, bit-exact wire representation of a transaction message
//! (§4.7, §6). [`CompiledTransactionMessage::to_bytes`] and
//! [`CompiledTransactionMessage::from_bytes`] are inverses of each other by
//! construction.

use kit_addresses::{Address, ADDRESS_BYTES};
use kit_codecs::primitives::{decode_short_u16, encode_short_u16};

use crate::error::{TransactionError, TransactionResult};

/// The packet payload limit minus nothing: this is the ceiling the *whole*
/// wire transaction (signatures + message) must fit under (§4.7, §6).
pub const PACKET_DATA_SIZE: usize = 1232;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_address_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAddressTableLookup {
    pub lookup_table_address: Address,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

/// `version_number == None` means a legacy message (no version byte at all);
/// `Some(n)` means a versioned message with the top bit set and `n` in the
/// low 7 bits (§4.7 step 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTransactionMessage {
    pub version_number: Option<u8>,
    pub header: MessageHeader,
    pub static_accounts: Vec<Address>,
    pub lifetime_token: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<CompiledAddressTableLookup>,
}

impl CompiledTransactionMessage {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(version_number) = self.version_number {
            out.push(0x80 | version_number);
        }
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        out.extend(encode_short_u16(self.static_accounts.len() as u16));
        for account in &self.static_accounts {
            out.extend_from_slice(account.as_bytes());
        }

        out.extend_from_slice(&self.lifetime_token);

        out.extend(encode_short_u16(self.instructions.len() as u16));
        for instruction in &self.instructions {
            out.push(instruction.program_address_index);
            out.extend(encode_short_u16(instruction.account_indices.len() as u16));
            out.extend_from_slice(&instruction.account_indices);
            out.extend(encode_short_u16(instruction.data.len() as u16));
            out.extend_from_slice(&instruction.data);
        }

        if self.version_number.is_some() {
            out.extend(encode_short_u16(self.address_table_lookups.len() as u16));
            for lookup in &self.address_table_lookups {
                out.extend_from_slice(lookup.lookup_table_address.as_bytes());
                out.extend(encode_short_u16(lookup.writable_indexes.len() as u16));
                out.extend_from_slice(&lookup.writable_indexes);
                out.extend(encode_short_u16(lookup.readonly_indexes.len() as u16));
                out.extend_from_slice(&lookup.readonly_indexes);
            }
        }

        out
    }

    pub fn from_bytes(bytes: &[u8]) -> TransactionResult<Self> {
        let mut offset = 0usize;
        let first_byte = *bytes
            .first()
            .ok_or(TransactionError::Codec(kit_codecs::error::CodecError::ByteArrayTooShort {
                expected: 1,
                actual: 0,
                offset: 0,
            }))?;

        let version_number = if first_byte & 0x80 != 0 {
            let version = first_byte & 0x7F;
            offset += 1;
            Some(version)
        } else {
            None
        };

        let header = MessageHeader {
            num_required_signatures: read_u8(bytes, &mut offset)?,
            num_readonly_signed_accounts: read_u8(bytes, &mut offset)?,
            num_readonly_unsigned_accounts: read_u8(bytes, &mut offset)?,
        };

        let static_accounts = read_address_array(bytes, &mut offset)?;

        let lifetime_token = read_fixed_32(bytes, &mut offset)?;

        let instruction_count = read_short_u16(bytes, &mut offset)?;
        let mut instructions = Vec::with_capacity(instruction_count as usize);
        for _ in 0..instruction_count {
            let program_address_index = read_u8(bytes, &mut offset)?;
            let account_indices = read_u8_array(bytes, &mut offset)?;
            let data = read_u8_array(bytes, &mut offset)?;
            instructions.push(CompiledInstruction {
                program_address_index,
                account_indices,
                data,
            });
        }

        let address_table_lookups = if version_number.is_some() {
            let lookup_count = read_short_u16(bytes, &mut offset)?;
            let mut lookups = Vec::with_capacity(lookup_count as usize);
            for _ in 0..lookup_count {
                let lookup_table_address = Address::new_from_array(read_fixed_32(bytes, &mut offset)?);
                let writable_indexes = read_u8_array(bytes, &mut offset)?;
                let readonly_indexes = read_u8_array(bytes, &mut offset)?;
                lookups.push(CompiledAddressTableLookup {
                    lookup_table_address,
                    writable_indexes,
                    readonly_indexes,
                });
            }
            lookups
        } else {
            Vec::new()
        };

        Ok(Self {
            version_number,
            header,
            static_accounts,
            lifetime_token,
            instructions,
            address_table_lookups,
        })
    }
}

fn read_u8(bytes: &[u8], offset: &mut usize) -> TransactionResult<u8> {
    let value = *bytes.get(*offset).ok_or(TransactionError::Codec(
        kit_codecs::error::CodecError::ByteArrayTooShort {
            expected: 1,
            actual: 0,
            offset: *offset,
        },
    ))?;
    *offset += 1;
    Ok(value)
}

fn read_short_u16(bytes: &[u8], offset: &mut usize) -> TransactionResult<u16> {
    let (value, new_offset) = decode_short_u16(bytes, *offset)?;
    *offset = new_offset;
    Ok(value)
}

fn read_fixed_32(bytes: &[u8], offset: &mut usize) -> TransactionResult<[u8; ADDRESS_BYTES]> {
    if bytes.len() < *offset + ADDRESS_BYTES {
        return Err(TransactionError::Codec(
            kit_codecs::error::CodecError::ByteArrayTooShort {
                expected: ADDRESS_BYTES,
                actual: bytes.len().saturating_sub(*offset),
                offset: *offset,
            },
        ));
    }
    let mut array = [0u8; ADDRESS_BYTES];
    array.copy_from_slice(&bytes[*offset..*offset + ADDRESS_BYTES]);
    *offset += ADDRESS_BYTES;
    Ok(array)
}

fn read_address_array(bytes: &[u8], offset: &mut usize) -> TransactionResult<Vec<Address>> {
    let count = read_short_u16(bytes, offset)?;
    let mut addresses = Vec::with_capacity(count as usize);
    for _ in 0..count {
        addresses.push(Address::new_from_array(read_fixed_32(bytes, offset)?));
    }
    Ok(addresses)
}

fn read_u8_array(bytes: &[u8], offset: &mut usize) -> TransactionResult<Vec<u8>> {
    let count = read_short_u16(bytes, offset)?;
    if bytes.len() < *offset + count as usize {
        return Err(TransactionError::Codec(
            kit_codecs::error::CodecError::ByteArrayTooShort {
                expected: count as usize,
                actual: bytes.len().saturating_sub(*offset),
                offset: *offset,
            },
        ));
    }
    let slice = bytes[*offset..*offset + count as usize].to_vec();
    *offset += count as usize;
    Ok(slice)
}
