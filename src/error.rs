//! Error type shared by the market, its math, and its collaborator modules.

use odra::prelude::*;
use core::fmt;

/// Every failure the market can surface. All variants are precondition
/// failures detected before any storage write; callers see them verbatim.
#[odra::odra_error]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CdpError {
    /// A zero amount was passed where a positive one is required.
    InvalidAmount = 0,
    /// A per-second rate below 1.0 would shrink the interest index.
    InvalidRate = 1,
    /// The caller already has an open position.
    PositionAlreadyOpen = 2,
    /// The operation needs an open position and found none.
    PositionNotOpen = 3,
    /// The requested loan is not covered by enough collateral.
    InsufficientCollateral = 4,
    /// The repayment is larger than the accrued debt.
    RepayExceedsDebt = 5,
    /// The position is still collateralized above the liquidation threshold.
    NotUndercollateralized = 6,
    /// The debt-token balance cannot cover the requested burn or transfer.
    InsufficientBalance = 7,
    /// A fixed-point operation left the representable range.
    MathOverflow = 8,
    /// Division by zero, typically a zero oracle price.
    DivideByZero = 9,
    /// The caller is not the market admin.
    Unauthorized = 10,
}

impl CdpError {
    /// Human-readable message for logs and CLI output.
    pub fn message(&self) -> &str {
        match self {
            CdpError::InvalidAmount => "Input amount is invalid",
            CdpError::InvalidRate => "Interest rate below 1.0 is invalid",
            CdpError::PositionAlreadyOpen => "Position is already open",
            CdpError::PositionNotOpen => "Position is not open",
            CdpError::InsufficientCollateral => "Collateral does not cover the requested loan",
            CdpError::RepayExceedsDebt => "Repay amount exceeds accrued debt",
            CdpError::NotUndercollateralized => "Position is not eligible for liquidation",
            CdpError::InsufficientBalance => "Debt token balance is insufficient",
            CdpError::MathOverflow => "Math operation overflow",
            CdpError::DivideByZero => "Division by zero",
            CdpError::Unauthorized => "Caller is not authorized",
        }
    }
}

impl fmt::Display for CdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
