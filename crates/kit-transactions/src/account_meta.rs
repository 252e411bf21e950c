//! Account roles and meta entries (C6): the building blocks instructions and
//! messages are made of, before compilation flattens them into indices.

use kit_addresses::Address;

/// The privilege level an account is referenced with, ordered so that
/// `role.max(other)` picks the more privileged of the two (signer beats
/// non-signer, writable beats readonly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountRole {
    ReadonlyNonSigner,
    ReadonlySigner,
    WritableNonSigner,
    WritableSigner,
}

impl AccountRole {
    pub fn is_signer(self) -> bool {
        matches!(self, Self::ReadonlySigner | Self::WritableSigner)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Self::WritableNonSigner | Self::WritableSigner)
    }

    /// Combines two references to the same account, taking the union of
    /// signer-ness and writability rather than a naive ordinal max (a
    /// writable non-signer merged with a readonly signer must come out
    /// writable *and* signer).
    pub fn merge(self, other: Self) -> Self {
        Self::from_flags(
            self.is_signer() || other.is_signer(),
            self.is_writable() || other.is_writable(),
        )
    }

    fn from_flags(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (true, true) => Self::WritableSigner,
            (true, false) => Self::ReadonlySigner,
            (false, true) => Self::WritableNonSigner,
            (false, false) => Self::ReadonlyNonSigner,
        }
    }
}

/// A statically-embedded account reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub address: Address,
    pub role: AccountRole,
}

impl AccountMeta {
    pub fn new(address: Address, role: AccountRole) -> Self {
        Self { address, role }
    }
}

/// An account reference indirected through an address-lookup-table entry.
/// Never used for signers (§4.6: "Signers are never compressed").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLookupMeta {
    pub address: Address,
    pub lookup_table_address: Address,
    pub address_index: u8,
    pub role: AccountRole,
}

/// An instruction's account reference: either embedded directly in the
/// static account list, or resolved through a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionAccount {
    Static(AccountMeta),
    Lookup(AccountLookupMeta),
}

impl InstructionAccount {
    pub fn address(&self) -> Address {
        match self {
            Self::Static(meta) => meta.address,
            Self::Lookup(meta) => meta.address,
        }
    }

    pub fn role(&self) -> AccountRole {
        match self {
            Self::Static(meta) => meta.role,
            Self::Lookup(meta) => meta.role,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_merge_picks_more_privileged() {
        assert_eq!(
            AccountRole::ReadonlyNonSigner.merge(AccountRole::WritableSigner),
            AccountRole::WritableSigner
        );
        assert_eq!(
            AccountRole::ReadonlyNonSigner.merge(AccountRole::ReadonlyNonSigner),
            AccountRole::ReadonlyNonSigner
        );
    }

    #[test]
    fn role_merge_unions_signer_and_writable_independently() {
        // A writable non-signer reference merged with a readonly signer
        // reference to the same account must end up both signer and writable.
        assert_eq!(
            AccountRole::WritableNonSigner.merge(AccountRole::ReadonlySigner),
            AccountRole::WritableSigner
        );
    }
}
