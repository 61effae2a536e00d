//! Per-borrower position record.
//!
//! A position stores principal-adjusted debt, not real debt: `debt` is
//! only meaningful together with `index_snapshot`, the global index at the
//! position's last accrual. Real debt at any later index is the stored
//! debt rescaled by the ratio of the two readings, which lets every
//! position compound lazily in O(1) without the market ever sweeping the
//! ledger.

use crate::error::CdpError;
use crate::math::{Decimal, TryAdd, TryDiv, TryMul, TrySub};

/// One borrower's collateral and debt. A zeroed record doubles as the
/// closed state; slots are reused, never deleted.
#[odra::odra_type]
pub struct Position {
    /// Deposited collateral, wad. Zero means the position is closed.
    pub collateral: Decimal,
    /// Principal-adjusted debt as of `index_snapshot`, wad.
    pub debt: Decimal,
    /// Global interest index at the last accrual, wad.
    pub index_snapshot: Decimal,
}

impl Position {
    /// The closed state.
    pub fn empty() -> Self {
        Self {
            collateral: Decimal::zero(),
            debt: Decimal::zero(),
            index_snapshot: Decimal::zero(),
        }
    }

    /// A freshly opened, debt-free position snapshotted at `index`.
    pub fn open(collateral: Decimal, index: Decimal) -> Self {
        Self {
            collateral,
            debt: Decimal::zero(),
            index_snapshot: index,
        }
    }

    /// Whether the position is open. `collateral == 0` is closed, and a
    /// closed position carries no debt.
    pub fn is_open(&self) -> bool {
        self.collateral != Decimal::zero()
    }

    /// Real debt at `index`, without mutating the record.
    pub fn accrued_debt(&self, index: Decimal) -> Result<Decimal, CdpError> {
        if self.debt == Decimal::zero() {
            return Ok(Decimal::zero());
        }
        self.debt.try_mul(index)?.try_div(self.index_snapshot)
    }

    /// Materialize the real debt at `index` and move the snapshot forward.
    /// Returns the accrued debt so checks and mutations in one operation
    /// share a single reading.
    pub fn accrue(&mut self, index: Decimal) -> Result<Decimal, CdpError> {
        self.debt = self.accrued_debt(index)?;
        self.index_snapshot = index;
        Ok(self.debt)
    }

    /// Add freshly borrowed principal. Call after [`Self::accrue`].
    pub fn borrow(&mut self, amount: Decimal) -> Result<(), CdpError> {
        self.debt = self.debt.try_add(amount)?;
        Ok(())
    }

    /// Retire part of the debt. Call after [`Self::accrue`].
    pub fn repay(&mut self, amount: Decimal) -> Result<(), CdpError> {
        if amount > self.debt {
            return Err(CdpError::RepayExceedsDebt);
        }
        self.debt = self.debt.try_sub(amount)?;
        Ok(())
    }

    /// Back to the closed state; the slot stays reusable.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

/// Collateral needed to hold `debt` at `ratio` with the oracle at `price`:
/// `debt * ratio / price`. A zero price surfaces [`CdpError::DivideByZero`];
/// the market passes the oracle reading through verbatim.
pub fn required_collateral(
    debt: Decimal,
    ratio: Decimal,
    price: Decimal,
) -> Result<Decimal, CdpError> {
    debt.try_mul(ratio)?.try_div(price)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::{BORROW_COLLATERAL_RATIO, LIQUIDATION_COLLATERAL_RATIO};

    fn wad(value: u64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn empty_position_is_closed() {
        let position = Position::empty();
        assert!(!position.is_open());
        assert_eq!(position.debt, Decimal::zero());
    }

    #[test]
    fn zero_debt_accrues_nothing() {
        let position = Position::open(wad(5), Decimal::one());
        // whatever the index has done since, no debt means no interest
        let later_index = Decimal::from_scaled_val(2_718_281_828_459_045_235);
        assert_eq!(position.accrued_debt(later_index).unwrap(), Decimal::zero());
    }

    #[test]
    fn accrual_rescales_by_index_ratio() {
        let mut position = Position::open(wad(200), Decimal::one());
        position.borrow(wad(100)).unwrap();
        let index = Decimal::from_scaled_val(1_100_000_000_000_000_000);
        assert_eq!(position.accrued_debt(index).unwrap(), wad(110));

        let accrued = position.accrue(index).unwrap();
        assert_eq!(accrued, wad(110));
        assert_eq!(position.index_snapshot, index);
        // a second accrual at the same index is a fixed point
        assert_eq!(position.accrue(index).unwrap(), wad(110));
    }

    #[test]
    fn repay_cannot_exceed_debt() {
        let mut position = Position::open(wad(10), Decimal::one());
        position.borrow(wad(4)).unwrap();
        assert_eq!(position.repay(wad(5)), Err(CdpError::RepayExceedsDebt));
        position.repay(wad(4)).unwrap();
        assert_eq!(position.debt, Decimal::zero());
        assert!(position.is_open());
    }

    #[test]
    fn clear_resets_to_closed() {
        let mut position = Position::open(wad(10), Decimal::one());
        position.borrow(wad(1)).unwrap();
        position.clear();
        assert!(!position.is_open());
        assert_eq!(position.debt, Decimal::zero());
    }

    #[test]
    fn borrow_floor_math() {
        let ratio = Decimal::from_scaled_val(BORROW_COLLATERAL_RATIO);
        let price = wad(2_000);
        // 1000 debt at price 2000 needs 0.75 collateral
        assert_eq!(
            required_collateral(wad(1_000), ratio, price).unwrap(),
            Decimal::from_scaled_val(750_000_000_000_000_000)
        );
    }

    #[test]
    fn liquidation_floor_math() {
        let ratio = Decimal::from_scaled_val(LIQUIDATION_COLLATERAL_RATIO);
        // 1900 debt at price 1500 needs ~1.393 collateral, so a single
        // unit of collateral is under water
        let required = required_collateral(wad(1_900), ratio, wad(1_500)).unwrap();
        assert!(required > wad(1));
        // at price 3000 the same debt only needs ~0.697
        let required = required_collateral(wad(1_900), ratio, wad(3_000)).unwrap();
        assert!(required < wad(1));
    }

    #[test]
    fn zero_price_is_division_by_zero() {
        let ratio = Decimal::from_scaled_val(BORROW_COLLATERAL_RATIO);
        assert_eq!(
            required_collateral(wad(1), ratio, Decimal::zero()),
            Err(CdpError::DivideByZero)
        );
    }
}
