use kit_addresses::Address;

/// What makes a transaction message eventually expire: a recent blockhash, or
/// a durable nonce (§4.6, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMessageLifetime {
    Blockhash {
        blockhash: [u8; 32],
        last_valid_block_height: u64,
    },
    DurableNonce {
        nonce: [u8; 32],
        nonce_account_address: Address,
        nonce_authority_address: Address,
    },
}

impl TransactionMessageLifetime {
    /// The 32 bytes written into the wire format's `recentBlockhash` slot,
    /// regardless of which lifetime kind this is (§4.7 step 4).
    pub fn lifetime_token(&self) -> [u8; 32] {
        match self {
            Self::Blockhash { blockhash, .. } => *blockhash,
            Self::DurableNonce { nonce, .. } => *nonce,
        }
    }

    pub fn is_durable_nonce(&self) -> bool {
        matches!(self, Self::DurableNonce { .. })
    }
}
