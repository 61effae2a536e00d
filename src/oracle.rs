//! Deployable price feed for the market.
//!
//! Reports how many debt units one unit of collateral is worth, at wad
//! precision. The market trusts the reading verbatim; a zero price is
//! passed through and surfaces as a division error downstream, not here.

use odra::prelude::*;
use odra::casper_types::U256;

use crate::error::CdpError;
use crate::math::Decimal;

/// Admin-settable single-value price feed.
#[odra::module(events = [PriceUpdated, OracleAdminChanged])]
pub struct PriceOracle {
    admin: Var<Address>,
    price: Var<Decimal>,
}

#[odra::module]
impl PriceOracle {
    /// Deploy with an initial price; the deployer becomes the admin.
    pub fn init(&mut self, price: U256) {
        self.admin.set(self.env().caller());
        self.price.set(Decimal(price));
    }

    /// Replace the published price (admin only).
    pub fn set_price(&mut self, price: U256) {
        let caller = self.env().caller();
        if self.admin.get().unwrap() != caller {
            self.env().revert(CdpError::Unauthorized);
        }

        self.price.set(Decimal(price));

        self.env().emit_event(PriceUpdated {
            price,
            publisher: caller,
        });
    }

    /// Current price in debt units per collateral unit, wad.
    pub fn get_price(&self) -> Decimal {
        self.price.get().unwrap_or_default()
    }

    /// Hand the feed to a new admin (admin only).
    pub fn transfer_admin(&mut self, new_admin: Address) {
        let caller = self.env().caller();
        let current_admin = self.admin.get().unwrap();
        if current_admin != caller {
            self.env().revert(CdpError::Unauthorized);
        }

        self.admin.set(new_admin);

        self.env().emit_event(OracleAdminChanged {
            previous_admin: current_admin,
            new_admin,
        });
    }

    /// The current feed admin.
    pub fn get_admin(&self) -> Address {
        self.admin.get().unwrap()
    }
}

/// A new price was published.
#[odra::event]
pub struct PriceUpdated {
    /// The new price, wad.
    pub price: U256,
    /// Who published it.
    pub publisher: Address,
}

/// The feed admin changed hands.
#[odra::event]
pub struct OracleAdminChanged {
    /// Admin before the change.
    pub previous_admin: Address,
    /// Admin after the change.
    pub new_admin: Address,
}
