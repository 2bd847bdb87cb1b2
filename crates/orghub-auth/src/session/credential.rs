//! Credentials a request may carry.

use crate::provider::Transport;

/// Where a credential was found on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// The identity provider's session cookie.
    Cookie,
}

impl CredentialSource {
    /// The transport that matches how the credential arrived.
    pub fn primary_transport(self) -> Transport {
        match self {
            Self::Bearer => Transport::SessionToken,
            Self::Cookie => Transport::Cookie,
        }
    }
}

/// Raw credentials extracted from a request, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentedCredentials {
    /// Bearer token, if an `Authorization: Bearer` header was present.
    pub bearer: Option<String>,
    /// Session cookie value, if the named cookie was present.
    pub cookie: Option<String>,
}

impl PresentedCredentials {
    /// Credentials carrying only a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
            cookie: None,
        }
    }

    /// Credentials carrying only a session cookie.
    pub fn cookie(value: impl Into<String>) -> Self {
        Self {
            bearer: None,
            cookie: Some(value.into()),
        }
    }

    /// Non-empty candidates in resolution order: bearer first, then cookie.
    pub fn candidates(&self) -> Vec<(CredentialSource, &str)> {
        [
            (CredentialSource::Bearer, self.bearer.as_deref()),
            (CredentialSource::Cookie, self.cookie.as_deref()),
        ]
        .into_iter()
        .filter_map(|(source, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (source, v))
        })
        .collect()
    }
}
