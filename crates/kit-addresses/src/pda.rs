//! Program-derived address and address-with-seed derivation (C4).

use sha2::{Digest, Sha256};

use crate::address::{is_on_curve, Address, ADDRESS_BYTES};
use crate::error::{AddressError, AddressResult};

pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// One seed contributing to a PDA or address-with-seed derivation.
#[derive(Debug, Clone)]
pub enum Seed {
    Bytes(Vec<u8>),
    Text(String),
}

impl Seed {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Seed::Bytes(b) => b,
            Seed::Text(s) => s.as_bytes(),
        }
    }
}

impl From<&[u8]> for Seed {
    fn from(value: &[u8]) -> Self {
        Seed::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Seed {
    fn from(value: Vec<u8>) -> Self {
        Seed::Bytes(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

/// A program derived address: the off-curve address itself, plus the bump
/// seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDerivedAddress {
    pub address: Address,
    pub bump: u8,
}

fn validate_seeds(seeds: &[Seed]) -> AddressResult<()> {
    if seeds.len() > MAX_SEEDS {
        return Err(AddressError::MaxSeedsExceeded {
            actual: seeds.len(),
        });
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.as_bytes().len() > MAX_SEED_LEN {
            return Err(AddressError::MaxSeedLengthExceeded {
                index,
                actual_length: seed.as_bytes().len(),
            });
        }
    }
    Ok(())
}

fn hash_candidate(seeds: &[Seed], bump: u8, program_address: &Address) -> [u8; ADDRESS_BYTES] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed.as_bytes());
    }
    hasher.update([bump]);
    hasher.update(program_address.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Derives a PDA for `program_address` and `seeds`, trying bump `255` down to
/// `1` and returning the first off-curve result. At most 16 seeds, each at
/// most 32 bytes.
pub fn find_program_derived_address(
    program_address: &Address,
    seeds: &[Seed],
) -> AddressResult<ProgramDerivedAddress> {
    validate_seeds(seeds)?;
    for bump in (1..=255u8).rev() {
        let candidate = hash_candidate(seeds, bump, program_address);
        if !is_on_curve(&candidate) {
            return Ok(ProgramDerivedAddress {
                address: Address::new_from_array(candidate),
                bump,
            });
        }
    }
    Err(AddressError::FailedToFindViablePdaBumpSeed)
}

/// Re-derives the address for a known-good `(program_address, seeds, bump)`
/// triple without searching, failing if that exact bump does not yield an
/// off-curve address.
pub fn create_program_derived_address(
    program_address: &Address,
    seeds: &[Seed],
    bump: u8,
) -> AddressResult<Address> {
    validate_seeds(seeds)?;
    let candidate = hash_candidate(seeds, bump, program_address);
    if is_on_curve(&candidate) {
        return Err(AddressError::InvalidSeedsPointOnCurve);
    }
    Ok(Address::new_from_array(candidate))
}

/// `createAddressWithSeed`: `SHA-256(base || seed || program_address)`.
/// `program_address` must not end with the literal PDA marker bytes.
pub fn create_address_with_seed(
    base_address: &Address,
    seed: &str,
    program_address: &Address,
) -> AddressResult<Address> {
    if seed.len() > MAX_SEED_LEN {
        return Err(AddressError::MaxSeedLengthExceeded {
            index: 0,
            actual_length: seed.len(),
        });
    }
    let program_bytes = program_address.as_bytes();
    if program_bytes.len() >= PDA_MARKER.len()
        && &program_bytes[program_bytes.len() - PDA_MARKER.len()..] == PDA_MARKER
    {
        return Err(AddressError::PdaEndsWithPdaMarker);
    }
    let mut hasher = Sha256::new();
    hasher.update(base_address.as_bytes());
    hasher.update(seed.as_bytes());
    hasher.update(program_bytes);
    let hash: [u8; ADDRESS_BYTES] = hasher.finalize().into();
    Ok(Address::new_from_array(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pda_derivation_is_deterministic_and_off_curve() {
        let program_address: Address = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
            .parse()
            .unwrap();
        let owner: Address = "11111111111111111111111111111111".parse().unwrap();
        let token_program: Address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
            .parse()
            .unwrap();
        let mint: Address = "So11111111111111111111111111111111111111112"
            .parse()
            .unwrap();
        let seeds = vec![
            Seed::from(owner.as_bytes().to_vec()),
            Seed::from(token_program.as_bytes().to_vec()),
            Seed::from(mint.as_bytes().to_vec()),
        ];

        let first = find_program_derived_address(&program_address, &seeds).unwrap();
        let second = find_program_derived_address(&program_address, &seeds).unwrap();

        assert_eq!(first, second);
        assert!(first.address.is_off_curve());
    }

    #[test]
    fn too_many_seeds_is_rejected() {
        let program_address: Address = "11111111111111111111111111111111".parse().unwrap();
        let seeds: Vec<Seed> = (0..17).map(|i| Seed::from(vec![i as u8])).collect();
        assert_eq!(
            find_program_derived_address(&program_address, &seeds).unwrap_err(),
            AddressError::MaxSeedsExceeded { actual: 17 }
        );
    }

    #[test]
    fn oversized_seed_is_rejected() {
        let program_address: Address = "11111111111111111111111111111111".parse().unwrap();
        let seeds = vec![Seed::from(vec![0u8; 33])];
        assert!(matches!(
            find_program_derived_address(&program_address, &seeds).unwrap_err(),
            AddressError::MaxSeedLengthExceeded { .. }
        ));
    }

    #[test]
    fn address_with_seed_round_trips_deterministically() {
        let base: Address = "11111111111111111111111111111111".parse().unwrap();
        let owner: Address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
            .parse()
            .unwrap();
        let a = create_address_with_seed(&base, "my-seed", &owner).unwrap();
        let b = create_address_with_seed(&base, "my-seed", &owner).unwrap();
        assert_eq!(a, b);
    }
}
