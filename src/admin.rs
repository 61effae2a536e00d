//! Capability check for admin-only entry points.
//!
//! Kept as its own submodule so authorization stays a collaborator the
//! market consults, instead of being woven into the ledger itself.

use odra::prelude::*;

/// Holds the single admin identity and answers authorization queries.
#[odra::module]
pub struct AdminGate {
    admin: Var<Address>,
}

#[odra::module]
impl AdminGate {
    /// Set the initial admin. Called once by the owning module's
    /// constructor.
    pub fn init(&mut self, admin: Address) {
        self.admin.set(admin);
    }

    /// Whether `account` may perform admin-only operations.
    pub fn is_authorized(&self, account: &Address) -> bool {
        self.admin.get().map(|admin| admin == *account).unwrap_or(false)
    }

    /// The current admin.
    pub fn get_admin(&self) -> Address {
        self.admin.get().unwrap()
    }

    /// Replace the admin. The owning module gates the caller before
    /// delegating here.
    pub fn set_admin(&mut self, admin: Address) {
        self.admin.set(admin);
    }
}
