//! Two-phase payment sponsorship engine.
//!
//! A sponsor pays an operation's fee in native settlement units and is
//! reimbursed in a payment token whose price floats against the native unit.
//! [`SponsorEngine::validate`] authorizes sponsorship before the sponsored
//! work runs and emits a compact binary context; [`SponsorEngine::settle`]
//! consumes that context after the work ran, charging the real cost at the
//! price captured during validation.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod access;
pub use access::*;

mod context;
pub use context::*;

mod engine;
pub use engine::*;

mod fee;
pub use fee::*;

mod ledger;
pub use ledger::*;

mod oracle;
pub use oracle::*;

mod payload;
pub use payload::*;

mod result;
pub use result::*;

mod token;
pub use token::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;
