//! Observable notifications and operation receipts.

use serde::{Deserialize, Serialize};

use crate::{Amount, Capabilities, Domain, Hash, PathAttr, Principal, RegistryPath, Timestamp};

/// A notification emitted by a committed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Event {
    /// Value moved on the ledger. `from` is [`Principal::ZERO`] for mints.
    Transfer {
        from: Principal,
        to: Principal,
        amount: Amount,
    },

    /// A delegation edge was written or removed.
    DelegationChanged {
        /// Grantee's domain
        domain: Domain,
        path: RegistryPath,
        attr: PathAttr,
        removed: bool,
        /// The registry's own address
        trustee: Principal,
    },

    /// An authorization grant was installed, extended or revoked.
    AuthorizationChanged {
        /// Domain of the granting authority
        domain: Domain,
        path: RegistryPath,
        capabilities: Capabilities,
        beneficiary: Principal,
        expires_at: Option<Timestamp>,
    },

    /// A content fingerprint was bound to a path.
    UriSet {
        /// Beneficiary's domain
        domain: Domain,
        path: RegistryPath,
        fingerprint: Hash,
    },

    DefaultPriceChanged {
        old: Amount,
        new: Amount,
    },

    /// `price` is `None` when the override was cleared.
    UserPriceChanged {
        principal: Principal,
        price: Option<Amount>,
    },

    TaxWithdrawn {
        to: Principal,
        amount: Amount,
    },
}

impl Event {
    /// Short event name, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Transfer { .. } => "transfer",
            Event::DelegationChanged { .. } => "delegation_changed",
            Event::AuthorizationChanged { .. } => "authorization_changed",
            Event::UriSet { .. } => "uri_set",
            Event::DefaultPriceChanged { .. } => "default_price_changed",
            Event::UserPriceChanged { .. } => "user_price_changed",
            Event::TaxWithdrawn { .. } => "tax_withdrawn",
        }
    }
}

/// Events emitted by one committed operation, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub events: Vec<Event>,
}

impl Receipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Number of events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tag() {
        let event = Event::TaxWithdrawn {
            to: Principal([3; 20]),
            amount: 1000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "tax_withdrawn");
        assert_eq!(json["amount"], 1000);
        assert_eq!(event.name(), "tax_withdrawn");
    }

    #[test]
    fn test_receipt_count() {
        let mut receipt = Receipt::new();
        receipt.push(Event::Transfer {
            from: Principal::ZERO,
            to: Principal([1; 20]),
            amount: 5,
        });
        receipt.push(Event::Transfer {
            from: Principal([1; 20]),
            to: Principal([2; 20]),
            amount: 5,
        });
        assert_eq!(receipt.len(), 2);
        assert_eq!(receipt.count("transfer"), 2);
        assert_eq!(receipt.count("uri_set"), 0);
    }
}
