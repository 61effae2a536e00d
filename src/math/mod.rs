//! Wad/ray fixed-point arithmetic used throughout the market.
//!
//! Amounts, prices, and the interest index are 18-decimal [`Decimal`]s;
//! the per-second interest rate is a 27-decimal [`Rate`] so that precision
//! survives exponentiation at bases very close to 1.0.

pub mod common;
pub mod decimal;
pub mod rate;

pub use common::{TryAdd, TryDiv, TryMul, TrySub};
pub use decimal::Decimal;
pub use rate::Rate;
