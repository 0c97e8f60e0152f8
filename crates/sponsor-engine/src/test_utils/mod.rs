//! Test utilities: mock collaborators and payload builders.

use std::collections::HashMap;

use alloy_primitives::{address, Address, Bytes, I256, U256};
use alloy_sol_types::SolCall;

use crate::{approveCall, PaymentToken, PriceFeed, RawReading, SponsorConfig, TokenError};

/// Owner identity used across tests.
pub const OWNER: Address = address!("0000000000000000000000000000000000000001");
/// The engine's own account.
pub const ENGINE: Address = address!("00000000000000000000000000000000000000e1");
/// The payment token contract address.
pub const TOKEN: Address = address!("00000000000000000000000000000000000000d0");

/// A price feed returning a fixed raw answer.
#[derive(Debug, Clone, Copy)]
pub struct MockFeed {
    /// Raw answer at `decimals` precision.
    pub answer: i64,
    /// Timestamp of the answer.
    pub updated_at: u64,
    /// Reported decimal precision.
    pub decimals: u8,
}

impl MockFeed {
    /// A well-formed 8-decimal feed.
    pub fn new(answer: i64, updated_at: u64) -> Self {
        Self::with_decimals(answer, updated_at, 8)
    }

    /// A feed reporting an arbitrary precision.
    pub fn with_decimals(answer: i64, updated_at: u64, decimals: u8) -> Self {
        Self { answer, updated_at, decimals }
    }
}

impl PriceFeed for MockFeed {
    fn latest_reading(&self) -> RawReading {
        RawReading {
            value: I256::try_from(self.answer).expect("i64 fits I256"),
            updated_at: self.updated_at,
        }
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }
}

/// An in-memory payment token. `operator` is the account whose allowances
/// `transfer_from` consumes and whose balance `transfer` spends, i.e. the
/// engine account in every test.
#[derive(Debug, Clone, Default)]
pub struct MockToken {
    operator: Address,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl MockToken {
    /// A token operated by `operator`.
    pub fn new(operator: Address) -> Self {
        Self { operator, ..Self::default() }
    }

    /// Sets an account balance.
    pub fn set_balance(&mut self, account: Address, amount: U256) {
        self.balances.insert(account, amount);
    }

    /// Sets the allowance `owner` grants `spender`.
    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Reads an account balance.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }
}

impl PaymentToken for MockToken {
    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or_default()
    }

    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, self.operator);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance { needed: amount, available: allowance });
        }
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance { needed: amount, available: balance });
        }
        self.allowances.insert((from, self.operator), allowance - amount);
        self.balances.insert(from, balance - amount);
        let credited = self.balance_of(to) + amount;
        self.balances.insert(to, credited);
        Ok(())
    }

    fn transfer(&mut self, to: Address, amount: U256) -> Result<(), TokenError> {
        let balance = self.balance_of(self.operator);
        if balance < amount {
            return Err(TokenError::InsufficientBalance { needed: amount, available: balance });
        }
        self.balances.insert(self.operator, balance - amount);
        let credited = self.balance_of(to) + amount;
        self.balances.insert(to, credited);
        Ok(())
    }
}

/// Builds an outer dispatch payload wrapping `inner` as the nested call to
/// `target`: outer selector, target word, value word, inner-data offset
/// word, inner-data length word, inner data.
pub fn dispatch_payload(target: Address, inner: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(132 + inner.len());
    // execute(address,uint256,bytes)
    out.extend_from_slice(&[0xb6, 0x1d, 0x27, 0xf6]);
    out.extend_from_slice(&U256::from_be_slice(target.as_slice()).to_be_bytes::<32>());
    out.extend_from_slice(&U256::ZERO.to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(0x60u64).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(inner.len()).to_be_bytes::<32>());
    out.extend_from_slice(inner);
    out.into()
}

/// A dispatch payload whose nested call approves `spender` for `amount` on
/// the `token` contract.
pub fn approve_payload(token: Address, spender: Address, amount: U256) -> Bytes {
    dispatch_payload(token, &approveCall { spender, value: amount }.abi_encode())
}

/// A dispatch payload whose nested call is an ordinary (non-approve) spend.
pub fn spend_payload(target: Address) -> Bytes {
    // transfer(address,uint256)-shaped inner call
    dispatch_payload(target, &[0xa9, 0x05, 0x9c, 0xbb, 0x00, 0x00, 0x00, 0x00])
}

/// A configuration with a 6-decimal payment token, 110% markup, and a
/// 300-second staleness threshold.
pub fn test_config() -> SponsorConfig {
    SponsorConfig {
        owner: OWNER,
        engine_account: ENGINE,
        token: TOKEN,
        token_decimals: 6,
        markup: 1_100_000,
        markup_limit: 2_000_000,
        staleness_threshold: 300,
    }
}
