//! Error types for the sponsorship engine.
//!
//! The taxonomy follows the engine's three failure surfaces: configuration
//! errors are fatal at construction, validation errors reject an operation
//! before any side effect, and settlement errors abort the settlement step
//! after the sponsored work already ran.

use alloy_primitives::{Address, I256, U256};

/// Errors detected once at setup. Any of these blocks engine construction
/// entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configured markup would collect less than the sponsored cost.
    #[error("markup {markup} is below the break-even denominator {floor}")]
    MarkupBelowBreakEven {
        /// The rejected markup.
        markup: u32,
        /// The break-even floor ([`MARKUP_DENOMINATOR`](crate::constants::fee::MARKUP_DENOMINATOR)).
        floor: u32,
    },
    /// The configured markup exceeds the configured ceiling.
    #[error("markup {markup} exceeds the limit {limit}")]
    MarkupExceedsLimit {
        /// The rejected markup.
        markup: u32,
        /// The configured ceiling.
        limit: u32,
    },
    /// A price feed reports a decimal precision other than the pre-agreed one.
    #[error("oracle reports {actual} decimals, expected {expected}")]
    OracleDecimalsMismatch {
        /// The required precision.
        expected: u8,
        /// The precision the feed reports.
        actual: u8,
    },
}

/// Errors raised by the oracle adapter when a reading violates its
/// invariants. A reading failing either guard is never used for computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The reading is older than the staleness threshold.
    #[error("price reading is {age}s old, threshold is {threshold}s")]
    StalePrice {
        /// Seconds since the reading was updated.
        age: u64,
        /// The configured staleness threshold.
        threshold: u64,
    },
    /// The raw reading is zero or negative.
    #[error("price feed returned non-positive value {value}")]
    NonPositivePrice {
        /// The offending raw value.
        value: I256,
    },
    /// The raw reading is too large to normalize to 18 decimals.
    #[error("price feed value {value} does not fit the normalized range")]
    ValueOutOfRange {
        /// The offending raw value.
        value: I256,
    },
}

/// Errors raised by the payload inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The payload is shorter than the pinned inspection window; reading the
    /// selector or target address would go out of bounds.
    #[error("payload is {len} bytes, inspection requires at least {min}")]
    PayloadTooShort {
        /// Actual payload length.
        len: usize,
        /// Minimum inspectable length.
        min: usize,
    },
}

/// Errors raised by the fee calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    /// An intermediate product left the 256-bit range.
    #[error("fee computation overflowed 256-bit arithmetic")]
    Overflow,
}

/// Errors raised while decoding a [`SponsorshipContext`](crate::SponsorshipContext)
/// from its wire bytes. Both are fatal to the settlement that received the
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The buffer does not have the exact encoded length.
    #[error("context buffer is {len} bytes, expected exactly {expected}")]
    Length {
        /// Actual buffer length.
        len: usize,
        /// The pinned encoded length.
        expected: usize,
    },
    /// The mode byte is neither of the two pinned values.
    #[error("unknown context mode byte {0:#04x}")]
    UnknownMode(u8),
}

/// Errors raised by the payment token collaborator. Transfers fail loudly;
/// there is no ignored-boolean path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The source account's balance cannot cover the transfer.
    #[error("balance {available} cannot cover transfer of {needed}")]
    InsufficientBalance {
        /// Amount the transfer needs.
        needed: U256,
        /// Balance actually available.
        available: U256,
    },
    /// The spender's allowance cannot cover the transfer.
    #[error("allowance {available} cannot cover transfer of {needed}")]
    InsufficientAllowance {
        /// Amount the transfer needs.
        needed: U256,
        /// Allowance actually available.
        available: U256,
    },
}

/// Errors raised by the in-memory allow-list administration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The caller is not the owner of the allow-list.
    #[error("caller {caller} is not the allow-list owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },
    /// The accounts and statuses slices differ in length.
    #[error("{accounts} accounts paired with {statuses} statuses")]
    LengthMismatch {
        /// Number of accounts supplied.
        accounts: usize,
        /// Number of statuses supplied.
        statuses: usize,
    },
}

/// Typed rejection reasons produced by the validation phase. A rejected
/// operation never reaches settlement and leaves no state mutation behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The sender is not on the allow-list.
    #[error("sender {0} is not authorized for sponsorship")]
    NotAuthorized(Address),
    /// An oracle reading violated its freshness or sign invariant.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// The derived cross price does not fit the context's 24-byte field.
    #[error("cross price {0} does not fit the context price field")]
    PriceOutOfRange(U256),
    /// The fee bound could not be computed.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// The call payload could not be inspected.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The operation grants an allowance the sender does not need: its
    /// existing allowance already covers the fee bound, so it can self-pay.
    #[error("existing allowance {allowance} already covers required {required}")]
    AllowanceAlreadySufficient {
        /// The sender's current allowance to the engine.
        allowance: U256,
        /// The fee upper bound the allowance was checked against.
        required: U256,
    },
    /// A standard operation whose existing allowance cannot cover the fee
    /// upper bound.
    #[error("allowance {allowance} is below required {required}")]
    InsufficientAllowance {
        /// The sender's current allowance to the engine.
        allowance: U256,
        /// The fee upper bound the allowance was checked against.
        required: U256,
    },
}

/// Errors produced by the settlement phase. Settlement runs after the
/// sponsored work, so these must propagate to the host environment; silently
/// swallowing one would let the work run for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// The context buffer failed to decode.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The final fee could not be computed.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// The payment transfer failed, e.g. the sender's balance or allowance
    /// changed between validation and settlement.
    #[error(transparent)]
    Transfer(#[from] TokenError),
    /// Accruing the deferred obligation would overflow the ledger entry.
    #[error("accrued sponsorship debt overflowed")]
    DebtOverflow,
}

/// Errors produced by the owner-gated admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// The caller is not the engine owner.
    #[error("caller {caller} is not the engine owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },
    /// The new configuration value is out of bounds.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The withdrawal transfer failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}
