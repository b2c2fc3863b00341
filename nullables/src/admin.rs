//! Nullable administrator capability — a programmable set of administrators.

use ballot_governance::AdminCapability;
use ballot_types::Address;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An administrator capability for testing.
///
/// Any number of identities (including none) can hold the capability, and
/// every check is counted.
#[derive(Debug, Default)]
pub struct FixedAdmin {
    admins: HashSet<Address>,
    checks: AtomicUsize,
}

impl FixedAdmin {
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
            checks: AtomicUsize::new(0),
        }
    }

    /// A single administrator.
    pub fn single(admin: Address) -> Self {
        Self::new([admin])
    }

    /// Nobody holds the capability.
    pub fn nobody() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, identity: Address) {
        self.admins.insert(identity);
    }

    pub fn revoke(&mut self, identity: &Address) {
        self.admins.remove(identity);
    }

    /// How many times the capability has been consulted.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

impl AdminCapability for FixedAdmin {
    fn is_administrator(&self, identity: &Address) -> bool {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.admins.contains(identity)
    }
}
