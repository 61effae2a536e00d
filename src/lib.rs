#![allow(clippy::arithmetic_side_effects)]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

//! An interest-bearing collateralized debt market for the Casper blockchain.
//!
//! Borrowers lock native CSPR as collateral and mint a fungible debt asset
//! against it. Debt compounds continuously at a per-second rate tracked by a
//! single global interest index; each position carries a snapshot of that
//! index so its real debt can be recomputed lazily, without ever sweeping
//! the ledger. Positions that fall below the liquidation threshold can be
//! closed by third parties in exchange for the collateral.

pub mod admin;
pub mod error;
pub mod market;
pub mod math;
pub mod oracle;
pub mod state;
pub mod token;

pub use market::CdpMarket;
pub use oracle::PriceOracle;

extern crate alloc;
