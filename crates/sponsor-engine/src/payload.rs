//! Fixed-offset inspection of the raw call payload.
//!
//! The engine never decodes the outer dispatch call generically. It reads
//! two fields at byte offsets pinned in [`crate::constants::payload`]: the 20-byte
//! target address embedded in the first head word, and the 4-byte selector
//! of the nested call. The offsets mirror the upstream dispatch encoding
//! (outer selector, target word, value word, inner-data offset word,
//! inner-data length word, inner data) and are part of the engine's wire
//! contract. Every read is bounds-checked up front; a payload shorter than
//! the inspection window is rejected, never read out of bounds.

use alloy_primitives::Address;

use crate::PayloadError;

/// The two classified fields of an inspected payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectedCall {
    /// Selector of the nested call embedded in the dispatch payload.
    pub selector: [u8; 4],
    /// Target address of the nested call.
    pub target: Address,
}

/// Reads the nested selector and target address out of `payload` at the
/// pinned offsets.
pub fn inspect(payload: &[u8]) -> Result<InspectedCall, PayloadError> {
    use crate::constants::payload::{
        INNER_SELECTOR_OFFSET, MIN_INSPECT_LEN, TARGET_ADDRESS_END, TARGET_ADDRESS_OFFSET,
    };

    if payload.len() < MIN_INSPECT_LEN {
        return Err(PayloadError::PayloadTooShort { len: payload.len(), min: MIN_INSPECT_LEN });
    }

    let target = Address::from_slice(&payload[TARGET_ADDRESS_OFFSET..TARGET_ADDRESS_END]);

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&payload[INNER_SELECTOR_OFFSET..INNER_SELECTOR_OFFSET + 4]);

    Ok(InspectedCall { selector, target })
}
