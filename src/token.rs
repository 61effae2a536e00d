//! Fungible debt-token ledger.
//!
//! The market mints these tokens when a loan is taken and burns them when
//! debt is settled. Balances are plain wad-scale integers; whoever holds
//! tokens can hand them to a liquidator with `transfer`.

use odra::prelude::*;
use odra::casper_types::U256;

use crate::error::CdpError;

/// Mint/burn ledger keyed by account.
#[odra::module]
pub struct DebtToken {
    balances: Mapping<Address, U256>,
    total_supply: Var<U256>,
}

#[odra::module]
impl DebtToken {
    /// Credit `amount` to `account`.
    pub fn mint(&mut self, account: &Address, amount: U256) -> Result<(), CdpError> {
        // resolve both additions before writing either, so a failed mint
        // leaves the ledger untouched
        let balance = self.balances.get(account).unwrap_or_default();
        let new_balance = balance.checked_add(amount).ok_or(CdpError::MathOverflow)?;
        let supply = self.total_supply.get_or_default();
        let new_supply = supply.checked_add(amount).ok_or(CdpError::MathOverflow)?;

        self.balances.set(account, new_balance);
        self.total_supply.set(new_supply);
        Ok(())
    }

    /// Debit `amount` from `account`; the account must hold at least that
    /// much.
    pub fn burn(&mut self, account: &Address, amount: U256) -> Result<(), CdpError> {
        let balance = self.balances.get(account).unwrap_or_default();
        if amount > balance {
            return Err(CdpError::InsufficientBalance);
        }
        let new_balance = balance.checked_sub(amount).ok_or(CdpError::MathOverflow)?;
        let supply = self.total_supply.get_or_default();
        let new_supply = supply.checked_sub(amount).ok_or(CdpError::MathOverflow)?;

        self.balances.set(account, new_balance);
        self.total_supply.set(new_supply);
        Ok(())
    }

    /// Move `amount` from `sender` to `recipient`.
    pub fn transfer(
        &mut self,
        sender: &Address,
        recipient: &Address,
        amount: U256,
    ) -> Result<(), CdpError> {
        let sender_balance = self.balances.get(sender).unwrap_or_default();
        if amount > sender_balance {
            return Err(CdpError::InsufficientBalance);
        }
        let new_sender_balance = sender_balance
            .checked_sub(amount)
            .ok_or(CdpError::MathOverflow)?;
        let recipient_balance = self.balances.get(recipient).unwrap_or_default();
        let new_recipient_balance = recipient_balance
            .checked_add(amount)
            .ok_or(CdpError::MathOverflow)?;

        self.balances.set(sender, new_sender_balance);
        self.balances.set(recipient, new_recipient_balance);
        Ok(())
    }

    /// Balance of `account`, zero if never touched.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).unwrap_or_default()
    }

    /// Tokens in circulation.
    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }
}
