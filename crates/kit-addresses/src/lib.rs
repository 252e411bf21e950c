//! Address, program-derived-address, and key-pair primitives (C4).

pub mod address;
pub mod error;
pub mod keypair;
pub mod pda;
pub mod signature;

pub use address::{Address, ADDRESS_BYTES};
pub use error::{AddressError, AddressResult};
pub use keypair::KeyPair;
pub use pda::{
    create_address_with_seed, create_program_derived_address, find_program_derived_address,
    ProgramDerivedAddress, Seed, MAX_SEEDS, MAX_SEED_LEN,
};
pub use signature::{Signature, SIGNATURE_BYTES};
