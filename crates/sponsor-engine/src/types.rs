use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// An externally supplied operation submitted for sponsorship. Immutable for
/// the duration of one validate/settle cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The account the sponsored work is performed for, and the account the
    /// payment token is collected from.
    pub sender: Address,
    /// The raw call buffer of the sponsored work. Only the pinned offsets in
    /// [`constants::payload`](crate::constants::payload) are inspected; the
    /// rest is opaque to the engine.
    pub call_payload: Bytes,
    /// Upper bound on the native-unit cost, known at validation time. The
    /// host environment guarantees the actual cost reported to settlement
    /// never exceeds it.
    pub max_native_cost: U256,
}

impl Operation {
    /// The operation's identity: `keccak256(sender || keccak256(payload) ||
    /// max_native_cost)`. Carried through the context so the audit record of
    /// a settlement can be tied back to the validated operation.
    pub fn hash(&self) -> B256 {
        let mut buf = [0u8; 84];
        buf[..20].copy_from_slice(self.sender.as_slice());
        buf[20..52].copy_from_slice(keccak256(&self.call_payload).as_slice());
        buf[52..].copy_from_slice(&self.max_native_cost.to_be_bytes::<32>());
        keccak256(buf)
    }
}

/// How a validated operation is charged at settlement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[repr(u8)]
pub enum Mode {
    /// The payment token is collected immediately after the sponsored work.
    #[display("standard")]
    Standard = 0x00,
    /// The operation grants the engine an allowance on the payment token, so
    /// no allowance exists yet to collect against; settlement accrues a
    /// deferred obligation instead of collecting.
    #[display("approval-sponsorship")]
    ApprovalSponsorship = 0x01,
}

/// The audit record emitted for every settlement, deferred or collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Identity of the settled operation.
    pub operation_hash: B256,
    /// The account the settlement charged (or deferred against).
    pub sender: Address,
    /// Payment-token amount collected. Zero for deferred settlements.
    pub amount_collected: U256,
    /// The validation-time cross price the fee was computed with.
    pub price_used: U256,
    /// Whether payment was deferred onto the ledger instead of collected.
    pub was_deferred: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn operation_hash_commits_to_every_field() {
        let op = Operation {
            sender: address!("000000000000000000000000000000000000aaaa"),
            call_payload: vec![1, 2, 3].into(),
            max_native_cost: U256::from(7u64),
        };
        let base = op.hash();

        let mut changed = op.clone();
        changed.sender = address!("000000000000000000000000000000000000bbbb");
        assert_ne!(changed.hash(), base);

        let mut changed = op.clone();
        changed.call_payload = vec![1, 2, 4].into();
        assert_ne!(changed.hash(), base);

        let mut changed = op;
        changed.max_native_cost = U256::from(8u64);
        assert_ne!(changed.hash(), base);
    }

    #[test]
    fn settlement_record_round_trips_through_json() {
        let record = SettlementRecord {
            operation_hash: B256::repeat_byte(0x22),
            sender: address!("000000000000000000000000000000000000aaaa"),
            amount_collected: U256::from(880_000u64),
            price_used: U256::from(2_000_000_000u64),
            was_deferred: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<SettlementRecord>(&json).unwrap(), record);
    }
}
