//! The binary context threading validation state into settlement.
//!
//! Validation emits a [`SponsorshipContext`]; the host environment carries
//! its encoded bytes through the sponsored work and hands them back to
//! settlement unchanged. The context is the *only* channel for
//! validation-time state besides the ledger, it is consumed by value exactly
//! once, and it cannot be fabricated outside the engine: its fields are
//! private and construction is crate-internal.

use alloy_primitives::{Address, B256, U256};

use crate::{
    constants::context::{ENCODED_LEN, HASH_OFFSET, MODE_OFFSET, PRICE_OFFSET, SENDER_OFFSET},
    ContextError, Mode,
};

/// Validation-time state consumed exactly once by settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorshipContext {
    mode: Mode,
    /// Invariant: fits the wire format's 24-byte field; validation rejects
    /// any cross price wider than that before constructing a context.
    price: U256,
    sender: Address,
    operation_hash: B256,
}

impl SponsorshipContext {
    pub(crate) fn new(mode: Mode, price: U256, sender: Address, operation_hash: B256) -> Self {
        debug_assert!(price.bit_len() <= crate::constants::context::PRICE_BITS);
        Self { mode, price, sender, operation_hash }
    }

    /// The settlement mode selected during validation.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The cross price captured at validation time.
    pub fn price(&self) -> U256 {
        self.price
    }

    /// The sponsored account.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Identity of the validated operation.
    pub fn operation_hash(&self) -> B256 {
        self.operation_hash
    }

    /// Encodes the context into its pinned wire format:
    /// `1 byte mode | 24 bytes price | 20 bytes sender | 32 bytes hash`.
    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out[MODE_OFFSET] = self.mode as u8;
        out[PRICE_OFFSET..SENDER_OFFSET].copy_from_slice(&self.price.to_be_bytes::<32>()[8..]);
        out[SENDER_OFFSET..HASH_OFFSET].copy_from_slice(self.sender.as_slice());
        out[HASH_OFFSET..].copy_from_slice(self.operation_hash.as_slice());
        out
    }

    /// Decodes a context from wire bytes. The buffer must have exactly the
    /// encoded length and a known mode byte; anything else is a fatal decode
    /// error for the settlement that received it.
    pub(crate) fn decode(bytes: &[u8]) -> Result<Self, ContextError> {
        if bytes.len() != ENCODED_LEN {
            return Err(ContextError::Length { len: bytes.len(), expected: ENCODED_LEN });
        }

        let mode = match bytes[MODE_OFFSET] {
            0x00 => Mode::Standard,
            0x01 => Mode::ApprovalSponsorship,
            other => return Err(ContextError::UnknownMode(other)),
        };

        Ok(Self {
            mode,
            price: U256::from_be_slice(&bytes[PRICE_OFFSET..SENDER_OFFSET]),
            sender: Address::from_slice(&bytes[SENDER_OFFSET..HASH_OFFSET]),
            operation_hash: B256::from_slice(&bytes[HASH_OFFSET..]),
        })
    }
}
