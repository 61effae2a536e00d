//! The collateralized debt market.
//!
//! One contract module owns the global interest accumulator, the position
//! ledger, and the debt-token ledger. Borrowers attach native CSPR to open
//! a position, mint debt tokens against it, and settle by repaying or
//! closing; anyone may liquidate a position whose collateral has fallen
//! under the liquidation floor.
//!
//! Debt compounds from the moment it is borrowed while collateral earns
//! nothing, so positions drift toward the liquidation floor even at a
//! constant price. That asymmetry is deliberate and matches the accrual
//! math; operators are expected to size the borrow floor accordingly.
//!
//! Every entry point works on local copies of the accumulator and the
//! position and writes storage only after all checks pass, so a failed
//! operation leaves the market exactly as it found it.

use odra::prelude::*;
use odra::casper_types::{U256, U512};

use crate::admin::AdminGate;
use crate::error::CdpError;
use crate::math::{Decimal, Rate};
use crate::state::{
    required_collateral, InterestAccumulator, Position, BORROW_COLLATERAL_RATIO,
    LIQUIDATION_COLLATERAL_RATIO, MILLIS_PER_SECOND,
};
use crate::token::DebtToken;

/// Read-only view of the price feed the market consults. The reading is
/// trusted verbatim; a zero price surfaces as `DivideByZero` in the caller.
#[odra::external_contract]
pub trait PriceFeed {
    /// Debt units per unit of collateral, wad.
    fn get_price(&self) -> Decimal;
}

/// The market contract.
#[odra::module(events = [
    PositionOpened,
    LoanTaken,
    LoanRepaid,
    PositionClosed,
    PositionLiquidated,
    InterestRateChanged
])]
pub struct CdpMarket {
    accumulator: Var<InterestAccumulator>,
    positions: Mapping<Address, Position>,
    price_feed: Var<Address>,
    admin: SubModule<AdminGate>,
    debt_token: SubModule<DebtToken>,
}

#[odra::module]
impl CdpMarket {
    /// Deploy the market against a price feed, with `admin` allowed to
    /// change the interest rate. The interest index starts at `1.0` with a
    /// unit rate.
    pub fn init(&mut self, price_feed: Address, admin: Address) {
        self.price_feed.set(price_feed);
        self.admin.init(admin);
        let now = self.now();
        self.accumulator.set(InterestAccumulator::genesis(now));
    }

    // =======================================================================
    // POSITION LIFECYCLE
    // =======================================================================

    /// Open a position collateralized by the attached native value.
    /// Returns the deposited amount.
    #[odra(payable)]
    pub fn open_position(&mut self) -> Result<U512, CdpError> {
        let caller = self.env().caller();
        let deposit = self.env().attached_value();
        if deposit.is_zero() {
            return Err(CdpError::InvalidAmount);
        }
        let collateral = self.attached_wad()?;

        if self.position_of(&caller).is_open() {
            return Err(CdpError::PositionAlreadyOpen);
        }

        let mut accumulator = self.accumulator_state();
        let index = accumulator.commit(self.now())?;

        self.accumulator.set(accumulator);
        self.positions.set(&caller, Position::open(collateral, index));

        self.env().emit_event(PositionOpened {
            account: caller,
            collateral: collateral.0,
        });
        Ok(deposit)
    }

    /// Borrow `amount` of the debt asset against the caller's collateral.
    /// The position, including interest accrued so far, must stay above the
    /// borrow floor of 150% collateralization at the current oracle price.
    pub fn borrow(&mut self, amount: U256) -> Result<(), CdpError> {
        if amount.is_zero() {
            return Err(CdpError::InvalidAmount);
        }
        let caller = self.env().caller();
        let mut position = self.position_of(&caller);
        if !position.is_open() {
            return Err(CdpError::PositionNotOpen);
        }

        let mut accumulator = self.accumulator_state();
        let index = accumulator.commit(self.now())?;
        position.accrue(index)?;
        position.borrow(Decimal(amount))?;

        let required =
            required_collateral(position.debt, Self::borrow_ratio(), self.price())?;
        if position.collateral < required {
            return Err(CdpError::InsufficientCollateral);
        }

        let total_debt = position.debt.0;
        self.debt_token.mint(&caller, amount)?;
        self.accumulator.set(accumulator);
        self.positions.set(&caller, position);

        self.env().emit_event(LoanTaken {
            account: caller,
            amount,
            total_debt,
        });
        Ok(())
    }

    /// Burn `amount` of the caller's debt tokens against their accrued
    /// debt. The check and the mutation share one accrual reading.
    pub fn repay(&mut self, amount: U256) -> Result<(), CdpError> {
        if amount.is_zero() {
            return Err(CdpError::InvalidAmount);
        }
        let caller = self.env().caller();
        let mut position = self.position_of(&caller);
        if !position.is_open() {
            return Err(CdpError::PositionNotOpen);
        }

        let mut accumulator = self.accumulator_state();
        let index = accumulator.commit(self.now())?;
        position.accrue(index)?;
        position.repay(Decimal(amount))?;

        let remaining_debt = position.debt.0;
        self.debt_token.burn(&caller, amount)?;
        self.accumulator.set(accumulator);
        self.positions.set(&caller, position);

        self.env().emit_event(LoanRepaid {
            account: caller,
            amount,
            remaining_debt,
        });
        Ok(())
    }

    /// Settle the caller's full accrued debt and return the whole
    /// collateral. Returns the refunded native amount.
    pub fn close_position(&mut self) -> Result<U512, CdpError> {
        let caller = self.env().caller();
        let mut position = self.position_of(&caller);
        if !position.is_open() {
            return Err(CdpError::PositionNotOpen);
        }

        let mut accumulator = self.accumulator_state();
        let index = accumulator.commit(self.now())?;
        let debt = position.accrue(index)?;
        let collateral = position.collateral;
        let refund = Self::native_of(collateral)?;

        if debt != Decimal::zero() {
            self.debt_token.burn(&caller, debt.0)?;
        }
        position.clear();
        self.accumulator.set(accumulator);
        self.positions.set(&caller, position);
        self.env().transfer_tokens(&caller, &refund);

        self.env().emit_event(PositionClosed {
            account: caller,
            collateral_returned: collateral.0,
            debt_settled: debt.0,
        });
        Ok(refund)
    }

    /// Close somebody else's position that has slipped under the 110%
    /// liquidation floor. The caller supplies (and burns) debt tokens equal
    /// to the full accrued debt and receives the entire collateral.
    pub fn liquidate(&mut self, account: Address) -> Result<U512, CdpError> {
        let caller = self.env().caller();
        let mut position = self.position_of(&account);
        if !position.is_open() {
            return Err(CdpError::PositionNotOpen);
        }

        let mut accumulator = self.accumulator_state();
        let index = accumulator.commit(self.now())?;
        // one accrual reading drives both the eligibility check and the
        // settlement below
        let debt = position.accrued_debt(index)?;

        let required = required_collateral(debt, Self::liquidation_ratio(), self.price())?;
        if position.collateral >= required {
            return Err(CdpError::NotUndercollateralized);
        }

        let seized = position.collateral;
        let payout = Self::native_of(seized)?;

        if debt != Decimal::zero() {
            self.debt_token.burn(&caller, debt.0)?;
        }
        position.clear();
        self.accumulator.set(accumulator);
        self.positions.set(&account, position);
        self.env().transfer_tokens(&caller, &payout);

        self.env().emit_event(PositionLiquidated {
            account,
            liquidator: caller,
            debt_cleared: debt.0,
            collateral_seized: seized.0,
        });
        Ok(payout)
    }

    // =======================================================================
    // ADMINISTRATION
    // =======================================================================

    /// Change the per-second rate (ray). Admin only. Growth earned under
    /// the old rate is committed before the new rate takes effect, so a
    /// rate change can never rewrite past time.
    pub fn update_interest_rate(&mut self, new_rate: U256) -> Result<(), CdpError> {
        let caller = self.env().caller();
        if !self.admin.is_authorized(&caller) {
            return Err(CdpError::Unauthorized);
        }

        let mut accumulator = self.accumulator_state();
        accumulator.set_rate(self.now(), Rate(new_rate))?;
        self.accumulator.set(accumulator);

        self.env().emit_event(InterestRateChanged {
            rate: new_rate,
            changed_by: caller,
        });
        Ok(())
    }

    /// Hand the market to a new admin. Admin only.
    pub fn transfer_admin(&mut self, new_admin: Address) -> Result<(), CdpError> {
        let caller = self.env().caller();
        if !self.admin.is_authorized(&caller) {
            return Err(CdpError::Unauthorized);
        }
        self.admin.set_admin(new_admin);
        Ok(())
    }

    // =======================================================================
    // DEBT TOKEN
    // =======================================================================

    /// Move debt tokens from the caller to `recipient`.
    pub fn transfer_debt_token(
        &mut self,
        recipient: Address,
        amount: U256,
    ) -> Result<(), CdpError> {
        let caller = self.env().caller();
        self.debt_token.transfer(&caller, &recipient, amount)
    }

    /// Debt-token balance of `account`.
    pub fn get_debt_balance(&self, account: Address) -> U256 {
        self.debt_token.balance_of(&account)
    }

    /// Debt tokens in circulation.
    pub fn get_debt_total_supply(&self) -> U256 {
        self.debt_token.total_supply()
    }

    // =======================================================================
    // QUERIES
    // =======================================================================

    /// Real debt of `account` at the current clock, interest included.
    /// Zero for a closed position. Does not mutate.
    pub fn get_position_debt(&self, account: Address) -> Result<Decimal, CdpError> {
        let index = self.accumulator_state().current_index(self.now())?;
        self.position_of(&account).accrued_debt(index)
    }

    /// Collateral held by `account`, zero for a closed position.
    pub fn get_position_collateral(&self, account: Address) -> Decimal {
        self.position_of(&account).collateral
    }

    /// The global interest index at the current clock. Does not mutate.
    pub fn get_interest_index(&self) -> Result<Decimal, CdpError> {
        self.accumulator_state().current_index(self.now())
    }

    /// The current per-second rate, ray.
    pub fn get_interest_rate(&self) -> Rate {
        self.accumulator_state().rate_per_second
    }

    /// The market admin.
    pub fn get_admin(&self) -> Address {
        self.admin.get_admin()
    }

    /// Address of the consulted price feed.
    pub fn get_price_feed(&self) -> Address {
        self.price_feed.get().unwrap()
    }
}

impl CdpMarket {
    fn now(&self) -> u64 {
        self.env().get_block_time() / MILLIS_PER_SECOND
    }

    fn accumulator_state(&self) -> InterestAccumulator {
        self.accumulator.get().unwrap()
    }

    fn position_of(&self, account: &Address) -> Position {
        self.positions.get(account).unwrap_or(Position::empty())
    }

    fn price(&self) -> Decimal {
        let feed = self.price_feed.get().unwrap();
        PriceFeedContractRef::new(self.env(), feed).get_price()
    }

    fn borrow_ratio() -> Decimal {
        Decimal::from_scaled_val(BORROW_COLLATERAL_RATIO)
    }

    fn liquidation_ratio() -> Decimal {
        Decimal::from_scaled_val(LIQUIDATION_COLLATERAL_RATIO)
    }

    fn attached_wad(&self) -> Result<Decimal, CdpError> {
        let motes = self.env().attached_value();
        if motes > U512::from(u128::MAX) {
            return Err(CdpError::MathOverflow);
        }
        Ok(Decimal::from_scaled_val(motes.as_u128()))
    }

    fn native_of(amount: Decimal) -> Result<U512, CdpError> {
        if amount.0 > U256::from(u128::MAX) {
            return Err(CdpError::MathOverflow);
        }
        Ok(U512::from(amount.to_scaled_val()))
    }
}

// ===========================================================================
// EVENTS
// ===========================================================================

/// A position was opened.
#[odra::event]
pub struct PositionOpened {
    /// The borrower.
    pub account: Address,
    /// Deposited collateral, wad.
    pub collateral: U256,
}

/// Debt tokens were minted against a position.
#[odra::event]
pub struct LoanTaken {
    /// The borrower.
    pub account: Address,
    /// Freshly borrowed amount, wad.
    pub amount: U256,
    /// Accrued debt after the loan, wad.
    pub total_debt: U256,
}

/// Debt tokens were burned against a position.
#[odra::event]
pub struct LoanRepaid {
    /// The borrower.
    pub account: Address,
    /// Repaid amount, wad.
    pub amount: U256,
    /// Accrued debt left after the repayment, wad.
    pub remaining_debt: U256,
}

/// A position was settled and its collateral returned.
#[odra::event]
pub struct PositionClosed {
    /// The borrower.
    pub account: Address,
    /// Collateral sent back, wad.
    pub collateral_returned: U256,
    /// Debt burned on the way out, wad.
    pub debt_settled: U256,
}

/// An undercollateralized position was seized.
#[odra::event]
pub struct PositionLiquidated {
    /// The position owner.
    pub account: Address,
    /// Who supplied the debt tokens and received the collateral.
    pub liquidator: Address,
    /// Debt burned from the liquidator, wad.
    pub debt_cleared: U256,
    /// Collateral handed to the liquidator, wad.
    pub collateral_seized: U256,
}

/// The per-second rate changed.
#[odra::event]
pub struct InterestRateChanged {
    /// The new rate, ray.
    pub rate: U256,
    /// The admin who set it.
    pub changed_by: Address,
}
