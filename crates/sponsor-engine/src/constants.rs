//! Constants for the sponsorship engine.
//!
//! It groups the pinned wire offsets and fixed-point scales as sub-modules.

/// Byte offsets of the call payload inspected during validation.
///
/// The payload is an outer dispatch call wrapping a nested call:
/// a 4-byte outer selector, a 32-byte target word (address right-aligned in
/// its last 20 bytes), a 32-byte value word, a 32-byte inner-data offset
/// word, a 32-byte inner-data length word, and the inner call data itself.
/// These offsets are part of the engine's wire contract and must not change
/// without a coordinated upstream encoding change.
pub mod payload {
    /// Start of the target word's address portion (bytes 16..36).
    pub const TARGET_ADDRESS_OFFSET: usize = 16;
    /// End of the target word's address portion.
    pub const TARGET_ADDRESS_END: usize = 36;
    /// Offset of the nested call's 4-byte selector (start of the inner call
    /// data, after the outer selector and three 32-byte head words).
    pub const INNER_SELECTOR_OFFSET: usize = 132;
    /// The minimum payload length that can be inspected. Anything shorter
    /// fails with [`PayloadError::PayloadTooShort`](crate::PayloadError).
    pub const MIN_INSPECT_LEN: usize = INNER_SELECTOR_OFFSET + 4;
}

/// Byte layout of the encoded [`SponsorshipContext`](crate::SponsorshipContext).
///
/// `1 byte mode | 24 bytes price (big-endian) | 20 bytes sender | 32 bytes
/// operation hash`, consumed in that exact order and length by settlement.
pub mod context {
    /// Offset of the mode byte.
    pub const MODE_OFFSET: usize = 0;
    /// Offset of the big-endian price field.
    pub const PRICE_OFFSET: usize = 1;
    /// Width of the price field in bytes.
    pub const PRICE_LEN: usize = 24;
    /// Widest price representable in the context.
    pub const PRICE_BITS: usize = PRICE_LEN * 8;
    /// Offset of the sender address.
    pub const SENDER_OFFSET: usize = PRICE_OFFSET + PRICE_LEN;
    /// Offset of the operation hash.
    pub const HASH_OFFSET: usize = SENDER_OFFSET + 20;
    /// Total encoded length.
    pub const ENCODED_LEN: usize = HASH_OFFSET + 32;
}

/// Fixed-point scales of the fee computation.
pub mod fee {
    use alloy_primitives::{uint, U256};

    /// The markup ratio denoting break-even (100%). Configured markups are
    /// scaled by this denominator and must never fall below it.
    pub const MARKUP_DENOMINATOR: u32 = 1_000_000;
    /// Divisor applied after multiplying the native cost, the 1e6-scaled
    /// markup, and the 18-decimal price: `1e18 * 1e6`.
    pub const FEE_DIVISOR: U256 = uint!(1_000_000_000_000_000_000_000_000_U256);
}

/// Decimal precisions of the oracle pipeline.
pub mod oracle {
    /// The fixed decimal precision price feeds must report. A feed with any
    /// other precision is rejected at configuration time.
    pub const FEED_DECIMALS: u8 = 8;
    /// Decimal precision of a normalized [`PriceReading`](crate::PriceReading).
    pub const PRICE_DECIMALS: u8 = 18;
    /// Multiplier taking a raw 8-decimal feed answer to 18 decimals.
    pub const FEED_TO_PRICE_SCALE: u64 = 10_000_000_000;
}
