//! The transaction message model, compiler/decompiler, and offchain message
//! codec (C6, C7).

pub mod account_meta;
pub mod compiled;
pub mod compiler;
pub mod decompiler;
pub mod error;
pub mod instruction;
pub mod lifetime;
pub mod lookup;
pub mod message;
pub mod nonce;
pub mod offchain;
pub mod signer_merge;

pub use account_meta::{AccountLookupMeta, AccountMeta, AccountRole, InstructionAccount};
pub use compiled::{
    CompiledAddressTableLookup, CompiledInstruction, CompiledTransactionMessage, MessageHeader,
    PACKET_DATA_SIZE,
};
pub use compiler::compile;
pub use decompiler::decompile;
pub use error::{TransactionError, TransactionResult};
pub use instruction::Instruction;
pub use lifetime::TransactionMessageLifetime;
pub use lookup::{compress_lookup_tables, LookupTableMap};
pub use message::{TransactionMessage, TransactionMessageVersion};
pub use offchain::OffchainMessage;
pub use signer_merge::{merge_signers, SignerPool};
