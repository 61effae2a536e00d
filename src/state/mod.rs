//! Market state: the global interest accumulator, the per-borrower
//! position record, and the collateralization constants that gate
//! borrowing and liquidation.

pub mod accumulator;
pub mod position;

pub use accumulator::InterestAccumulator;
pub use position::{required_collateral, Position};

/// A new loan must be covered by at least 150% of its value in collateral,
/// wad-scaled.
pub const BORROW_COLLATERAL_RATIO: u128 = 1_500_000_000_000_000_000;

/// Positions collateralized below 110% of their accrued debt are open to
/// liquidation, wad-scaled.
pub const LIQUIDATION_COLLATERAL_RATIO: u128 = 1_100_000_000_000_000_000;

/// Casper reports block time in milliseconds; the accumulator keeps whole
/// seconds.
pub const MILLIS_PER_SECOND: u64 = 1_000;
