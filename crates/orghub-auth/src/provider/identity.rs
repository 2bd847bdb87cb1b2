//! Wire shapes of sessions and identities returned by the identity provider.

use serde::{Deserialize, Serialize};

/// An introspected session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    /// Session id.
    #[serde(default)]
    pub id: Option<String>,
    /// Whether the session is currently valid.
    #[serde(default)]
    pub active: bool,
    /// The identity the session belongs to.
    pub identity: ProviderIdentity,
}

/// An identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Subject id.
    pub id: String,
    /// Schema-defined traits.
    #[serde(default)]
    pub traits: IdentityTraits,
    /// Addresses the identity can be reached at.
    #[serde(default)]
    pub verifiable_addresses: Vec<VerifiableAddress>,
}

impl ProviderIdentity {
    /// Values of all verified addresses.
    pub fn verified_addresses(&self) -> Vec<String> {
        self.verifiable_addresses
            .iter()
            .filter(|a| a.verified)
            .map(|a| a.value.clone())
            .collect()
    }
}

/// Identity traits OrgHub caches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityTraits {
    /// Primary email.
    #[serde(default)]
    pub email: Option<String>,
    /// Name, either a single string or first/last parts.
    #[serde(default)]
    pub name: Option<PersonName>,
    /// Preferred locale.
    #[serde(default)]
    pub locale: Option<String>,
    /// Preferred timezone.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl IdentityTraits {
    /// Display name derived from the name trait; blank names yield `None`.
    pub fn display_name(&self) -> Option<String> {
        let name = match self.name.as_ref()? {
            PersonName::Full(full) => full.trim().to_string(),
            PersonName::Parts { first, last } => [first.as_deref(), last.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// The `name` trait in either of its accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonName {
    /// `"name": "Ada Lovelace"`.
    Full(String),
    /// `"name": {"first": "Ada", "last": "Lovelace"}`.
    Parts {
        /// Given name.
        #[serde(default)]
        first: Option<String>,
        /// Family name.
        #[serde(default)]
        last: Option<String>,
    },
}

/// A verifiable address attached to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiableAddress {
    /// The address itself.
    pub value: String,
    /// Whether it has been verified.
    #[serde(default)]
    pub verified: bool,
    /// Channel, e.g. `email`.
    #[serde(default)]
    pub via: Option<String>,
}
