//! Tests for the owner-gated admin surface and setup-time configuration
//! rejection.

use alloy_primitives::{address, Address, U256};
use sponsor_engine::{
    test_utils::{spend_payload, test_config, MockFeed, MockToken, ENGINE, OWNER},
    AdminError, ConfigError, InMemoryAccessList, Operation, SponsorEngine, TokenError,
};

const SENDER: Address = address!("000000000000000000000000000000000000aaaa");
const TREASURY: Address = address!("000000000000000000000000000000000000dddd");
const NOW: u64 = 1_700_000_000;

fn engine() -> SponsorEngine<InMemoryAccessList, MockToken, MockFeed> {
    let mut access = InMemoryAccessList::new(OWNER);
    access.set_authorized(OWNER, &[SENDER], &[true]).unwrap();

    let mut token = MockToken::new(ENGINE);
    token.set_allowance(SENDER, ENGINE, U256::from(10_000_000u64));
    token.set_balance(SENDER, U256::from(1_000_000_000u64));

    SponsorEngine::new(
        test_config(),
        access,
        token,
        MockFeed::new(200_000_000_000, NOW),
        MockFeed::new(100_000_000, NOW),
    )
    .unwrap()
}

#[test]
fn owner_updates_markup_within_bounds() {
    let mut engine = engine();
    engine.set_markup(OWNER, 1_500_000).unwrap();
    assert_eq!(engine.config().markup, 1_500_000);
}

#[test]
fn non_owner_cannot_update_markup() {
    let mut engine = engine();
    assert_eq!(
        engine.set_markup(SENDER, 1_500_000),
        Err(AdminError::NotOwner { caller: SENDER })
    );
    assert_eq!(engine.config().markup, 1_100_000);
}

#[test]
fn markup_update_is_bounded_like_setup() {
    let mut engine = engine();
    assert_eq!(
        engine.set_markup(OWNER, 999_999),
        Err(AdminError::Config(ConfigError::MarkupBelowBreakEven {
            markup: 999_999,
            floor: 1_000_000,
        }))
    );
    assert_eq!(
        engine.set_markup(OWNER, 2_000_001),
        Err(AdminError::Config(ConfigError::MarkupExceedsLimit {
            markup: 2_000_001,
            limit: 2_000_000,
        }))
    );
}

#[test]
fn updated_markup_applies_to_later_settlements() {
    let mut engine = engine();
    engine.set_markup(OWNER, 2_000_000).unwrap();

    let op = Operation {
        sender: SENDER,
        call_payload: spend_payload(TREASURY),
        max_native_cost: U256::from(1_000_000_000_000_000u64),
    };
    let ctx = engine.validate(&op, NOW).unwrap();
    let record = engine.settle(&ctx.encode(), U256::from(400_000_000_000_000u64)).unwrap();

    // 4e14 * 2e6 * 2e9 / 1e24 = 1_600_000
    assert_eq!(record.amount_collected, U256::from(1_600_000u64));
}

#[test]
fn owner_withdraws_collected_tokens() {
    let mut engine = engine();

    // collect something first
    let op = Operation {
        sender: SENDER,
        call_payload: spend_payload(TREASURY),
        max_native_cost: U256::from(1_000_000_000_000_000u64),
    };
    let ctx = engine.validate(&op, NOW).unwrap();
    let record = engine.settle(&ctx.encode(), U256::from(400_000_000_000_000u64)).unwrap();
    let collected = record.amount_collected;

    engine.withdraw_to(OWNER, TREASURY, collected).unwrap();
    assert_eq!(engine.token().balance_of(TREASURY), collected);
    assert_eq!(engine.token().balance_of(ENGINE), U256::ZERO);
}

#[test]
fn non_owner_cannot_withdraw() {
    let mut engine = engine();
    assert_eq!(
        engine.withdraw_to(SENDER, TREASURY, U256::from(1u64)),
        Err(AdminError::NotOwner { caller: SENDER })
    );
}

#[test]
fn overdrawn_withdrawal_propagates_the_transfer_failure() {
    let mut engine = engine();
    assert_eq!(
        engine.withdraw_to(OWNER, TREASURY, U256::from(5u64)),
        Err(AdminError::Token(TokenError::InsufficientBalance {
            needed: U256::from(5u64),
            available: U256::ZERO,
        }))
    );
}

#[test]
fn setup_rejects_out_of_bounds_markup() {
    let mut config = test_config();
    config.markup = 999_999;

    let err = SponsorEngine::new(
        config,
        InMemoryAccessList::new(OWNER),
        MockToken::new(ENGINE),
        MockFeed::new(200_000_000_000, NOW),
        MockFeed::new(100_000_000, NOW),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::MarkupBelowBreakEven { markup: 999_999, floor: 1_000_000 });
}

#[test]
fn setup_rejects_misconfigured_feed_precision() {
    let err = SponsorEngine::new(
        test_config(),
        InMemoryAccessList::new(OWNER),
        MockToken::new(ENGINE),
        MockFeed::with_decimals(200_000_000_000, NOW, 18),
        MockFeed::new(100_000_000, NOW),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::OracleDecimalsMismatch { expected: 8, actual: 18 });
}
