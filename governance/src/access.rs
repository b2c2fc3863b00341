//! Administrator capability.
//!
//! The election never decides who the administrator is. It asks an
//! [`AdminCapability`] on every administrator-only call. [`Ownership`] is the
//! default single-owner implementation; ownership moves through its own
//! methods, not through the election.

use ballot_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::BallotError;

/// Answers "is this identity the administrator?".
pub trait AdminCapability {
    fn is_administrator(&self, identity: &Address) -> bool;
}

/// Single transferable owner.
///
/// After [`Ownership::renounce_ownership`] nobody is administrator, which
/// freezes every administrator-only operation for good.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: Option<Address>,
}

impl Ownership {
    pub fn new(owner: Address) -> Self {
        Self { owner: Some(owner) }
    }

    /// The current owner, if ownership has not been renounced.
    pub fn owner(&self) -> Option<&Address> {
        self.owner.as_ref()
    }

    /// Hand ownership to `new_owner`. Only the current owner may do this.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), BallotError> {
        self.ensure_owner(caller)?;
        tracing::info!(previous = %caller, new = %new_owner, "ownership transferred");
        self.owner = Some(new_owner);
        Ok(())
    }

    /// Give up ownership permanently.
    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), BallotError> {
        self.ensure_owner(caller)?;
        tracing::info!(previous = %caller, "ownership renounced");
        self.owner = None;
        Ok(())
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), BallotError> {
        if self.is_administrator(caller) {
            Ok(())
        } else {
            Err(BallotError::Unauthorized(caller.clone()))
        }
    }
}

impl AdminCapability for Ownership {
    fn is_administrator(&self, identity: &Address) -> bool {
        self.owner.as_ref() == Some(identity)
    }
}

impl<T: AdminCapability + ?Sized> AdminCapability for &T {
    fn is_administrator(&self, identity: &Address) -> bool {
        (**self).is_administrator(identity)
    }
}

impl<T: AdminCapability + ?Sized> AdminCapability for Box<T> {
    fn is_administrator(&self, identity: &Address) -> bool {
        (**self).is_administrator(identity)
    }
}
