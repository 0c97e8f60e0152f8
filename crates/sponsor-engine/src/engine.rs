//! The two-phase sponsorship engine.
//!
//! The host environment drives the protocol: it calls
//! [`SponsorEngine::validate`] before executing a sponsored operation, runs
//! the operation, then calls [`SponsorEngine::settle`] with the exact context
//! bytes validation produced plus the true native-unit cost.
//!
//! # Host preconditions
//!
//! The engine assumes a single-threaded, strictly ordered execution
//! environment: the validate/settle pair of one operation runs to completion
//! without interleaving from any other operation, a failed validation aborts
//! the surrounding operation with no partial effects, and nothing outside
//! settlement writes the ledger. These are documented preconditions of this
//! API, not properties the engine can enforce; a host that permits true
//! concurrency must wrap validate/settle in its own transaction or lock.
//!
//! A context is consumed exactly once. The typed value is consumed by value;
//! replaying its bytes is prevented by the host's sequencing contract, which
//! hands each context back to settlement exactly once.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    compute_token_fee, constants, cross_price, fee::check_markup, inspect, AccessList, AdminError,
    ConfigError, Mode, Operation, OracleAdapter, PaymentToken, PriceFeed, SettlementError,
    SettlementRecord, SponsorshipContext, SponsorshipLedger, ValidationError, APPROVE_SELECTOR,
};

/// Static configuration of a [`SponsorEngine`], validated once at
/// construction. Every violation is fatal at setup; no configuration error
/// is deferred to per-operation handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorConfig {
    /// Owner identity gating the admin surface.
    pub owner: Address,
    /// The engine's own account: the allowance spender senders approve and
    /// the recipient of collected tokens.
    pub engine_account: Address,
    /// The payment token contract. Approval-sponsorship classification
    /// matches the inspected target address against this.
    pub token: Address,
    /// Decimal count of the payment token, used to derive the cross price.
    pub token_decimals: u8,
    /// Fee markup, scaled by
    /// [`MARKUP_DENOMINATOR`](constants::fee::MARKUP_DENOMINATOR); `1e6` is
    /// break-even.
    pub markup: u32,
    /// Upper bound the markup may be configured or later updated to.
    pub markup_limit: u32,
    /// Maximum age, in seconds, of an acceptable oracle reading.
    pub staleness_threshold: u64,
}

impl SponsorConfig {
    /// Checks the markup bounds. Oracle precision is checked separately when
    /// the feeds are wrapped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_markup(self.markup, self.markup_limit)
    }
}

/// The sponsorship engine. Generic over its collaborators: the allow-list,
/// the payment token, and the price feeds (both feeds share one type; use
/// `Box<dyn PriceFeed>` for a heterogeneous pair).
#[derive(Debug)]
pub struct SponsorEngine<A: AccessList, T: PaymentToken, F: PriceFeed> {
    config: SponsorConfig,
    access: A,
    token: T,
    native_feed: OracleAdapter<F>,
    token_feed: OracleAdapter<F>,
    ledger: SponsorshipLedger,
}

impl<A: AccessList, T: PaymentToken, F: PriceFeed> SponsorEngine<A, T, F> {
    /// Builds an engine, validating the configuration and both feeds'
    /// decimal precision. Fails with a [`ConfigError`] on any violation.
    pub fn new(
        config: SponsorConfig,
        access: A,
        token: T,
        native_feed: F,
        token_feed: F,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let native_feed = OracleAdapter::new(native_feed, config.staleness_threshold)?;
        let token_feed = OracleAdapter::new(token_feed, config.staleness_threshold)?;
        Ok(Self { config, access, token, native_feed, token_feed, ledger: SponsorshipLedger::new() })
    }

    /// The active configuration.
    pub fn config(&self) -> &SponsorConfig {
        &self.config
    }

    /// The account's current deferred debt, in native units.
    pub fn ledger_debt(&self, account: Address) -> U256 {
        self.ledger.debt_of(account)
    }

    /// The payment token collaborator.
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Mutable access to the payment token collaborator. The token is
    /// external state whose balances and allowances legitimately change
    /// between the engine's phases; this is the host's handle for that.
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }
}

/* Validation phase */
impl<A: AccessList, T: PaymentToken, F: PriceFeed> SponsorEngine<A, T, F> {
    /// Decides sponsorship eligibility for `op` before it executes.
    ///
    /// On success returns the context settlement will consume. On rejection
    /// nothing is mutated: `&self` keeps the phase pure with respect to the
    /// ledger and all balances. `now` is the host's monotonic clock.
    pub fn validate(
        &self,
        op: &Operation,
        now: u64,
    ) -> Result<SponsorshipContext, ValidationError> {
        let result = self.validate_inner(op, now);
        if let Err(err) = &result {
            tracing::debug!(sender = %op.sender, %err, "sponsorship validation rejected");
        }
        result
    }

    fn validate_inner(
        &self,
        op: &Operation,
        now: u64,
    ) -> Result<SponsorshipContext, ValidationError> {
        if !self.access.is_authorized(op.sender) {
            return Err(ValidationError::NotAuthorized(op.sender));
        }

        let token_reading = self.token_feed.fetch(now)?;
        let native_reading = self.native_feed.fetch(now)?;
        let price =
            cross_price(native_reading.value, token_reading.value, self.config.token_decimals)?;
        if price.bit_len() > constants::context::PRICE_BITS {
            return Err(ValidationError::PriceOutOfRange(price));
        }

        let prior_debt = self.ledger.debt_of(op.sender);
        let max_token_needed =
            compute_token_fee(op.max_native_cost, prior_debt, price, self.config.markup)?;

        let call = inspect(&op.call_payload)?;
        let mode = if call.selector == APPROVE_SELECTOR && call.target == self.config.token {
            Mode::ApprovalSponsorship
        } else {
            Mode::Standard
        };

        let allowance = self.token.allowance(op.sender, self.config.engine_account);
        match mode {
            // Sponsoring an approval the sender does not need would be
            // redundant: the existing allowance already covers the bound.
            Mode::ApprovalSponsorship if allowance >= max_token_needed => {
                return Err(ValidationError::AllowanceAlreadySufficient {
                    allowance,
                    required: max_token_needed,
                })
            }
            Mode::Standard if allowance < max_token_needed => {
                return Err(ValidationError::InsufficientAllowance {
                    allowance,
                    required: max_token_needed,
                })
            }
            _ => {}
        }

        Ok(SponsorshipContext::new(mode, price, op.sender, op.hash()))
    }
}

/* Settlement phase */
impl<A: AccessList, T: PaymentToken, F: PriceFeed> SponsorEngine<A, T, F> {
    /// Settles a sponsored operation after it executed.
    ///
    /// `context_bytes` must be the exact bytes validation emitted for this
    /// operation; `actual_native_cost` is the true cost, never exceeding the
    /// validated bound. Standard-mode settlements charge at the price carried
    /// in the context. The oracle is deliberately not re-read, so a price
    /// movement between the phases cannot invalidate the allowance check
    /// validation already performed. Errors propagate to the host: the
    /// sponsored work already ran, so a swallowed failure here would make it
    /// free.
    pub fn settle(
        &mut self,
        context_bytes: &[u8],
        actual_native_cost: U256,
    ) -> Result<SettlementRecord, SettlementError> {
        let context = SponsorshipContext::decode(context_bytes)?;
        let record = self.settle_context(context, actual_native_cost)?;
        tracing::info!(
            operation_hash = %record.operation_hash,
            sender = %record.sender,
            amount_collected = %record.amount_collected,
            price_used = %record.price_used,
            was_deferred = record.was_deferred,
            "sponsorship settled"
        );
        Ok(record)
    }

    /// Consumes the decoded context. The ledger is only written on the
    /// success paths: a failed transfer returns before any mutation.
    fn settle_context(
        &mut self,
        context: SponsorshipContext,
        actual_native_cost: U256,
    ) -> Result<SettlementRecord, SettlementError> {
        let sender = context.sender();
        let was_deferred = context.mode() == Mode::ApprovalSponsorship;
        let amount_collected = match context.mode() {
            Mode::ApprovalSponsorship => {
                // No allowance exists yet; defer the obligation.
                self.ledger
                    .accrue(sender, actual_native_cost)
                    .ok_or(SettlementError::DebtOverflow)?;
                U256::ZERO
            }
            Mode::Standard => {
                let prior_debt = self.ledger.debt_of(sender);
                let amount = compute_token_fee(
                    actual_native_cost,
                    prior_debt,
                    context.price(),
                    self.config.markup,
                )?;
                self.token.transfer_from(sender, self.config.engine_account, amount)?;
                self.ledger.clear(sender);
                amount
            }
        };

        Ok(SettlementRecord {
            operation_hash: context.operation_hash(),
            sender,
            amount_collected,
            price_used: context.price(),
            was_deferred,
        })
    }
}

/* Admin surface */
impl<A: AccessList, T: PaymentToken, F: PriceFeed> SponsorEngine<A, T, F> {
    /// Updates the fee markup within `[1e6, markup_limit]`. Owner-gated.
    pub fn set_markup(&mut self, caller: Address, new_markup: u32) -> Result<(), AdminError> {
        if caller != self.config.owner {
            return Err(AdminError::NotOwner { caller });
        }
        check_markup(new_markup, self.config.markup_limit)?;
        self.config.markup = new_markup;
        Ok(())
    }

    /// Withdraws `amount` of collected tokens to `to`. Owner-gated; transfer
    /// failures propagate.
    pub fn withdraw_to(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AdminError> {
        if caller != self.config.owner {
            return Err(AdminError::NotOwner { caller });
        }
        self.token.transfer(to, amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_config;

    #[test]
    fn config_round_trips_through_json() {
        let config = test_config();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<SponsorConfig>(&json).unwrap(), config);
    }

    #[test]
    fn config_validation_applies_the_markup_bounds() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.markup = 999_999;
        assert!(matches!(config.validate(), Err(ConfigError::MarkupBelowBreakEven { .. })));

        config.markup = config.markup_limit + 1;
        assert!(matches!(config.validate(), Err(ConfigError::MarkupExceedsLimit { .. })));
    }
}
