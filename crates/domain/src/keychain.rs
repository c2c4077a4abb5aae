//! Secure item store types
//!
//! Items are looked up by an [`ItemIdentity`] and persisted as the JSON
//! encoding of a [`StoredItem`].

use serde::{Deserialize, Serialize};
use url::Url;

use crate::coding::{Convertible, DecodeContext, EncodeContext};
use crate::error::{DecodeResult, EncodeResult};

/// Where an item is filed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemIdentity {
    /// Credentials for a web service, keyed by host and path.
    Internet {
        /// Server host.
        host: String,
        /// URL path on the server.
        path: String,
        /// Optional account name.
        account: Option<String>,
    },
    /// Credentials keyed by an arbitrary service name.
    Generic {
        /// Service name.
        service: String,
        /// Optional account name.
        account: Option<String>,
    },
}

impl ItemIdentity {
    /// An internet identity for `url`'s host and path.
    ///
    /// Returns `None` if the URL has no host; callers surface that as a
    /// missing-host error.
    #[must_use]
    pub fn for_service_url(url: &Url, account: Option<&str>) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self::Internet {
            host: host.to_string(),
            path: url.path().to_string(),
            account: account.map(str::to_string),
        })
    }

    /// A generic identity.
    #[must_use]
    pub fn generic(service: impl Into<String>, account: Option<&str>) -> Self {
        Self::Generic {
            service: service.into(),
            account: account.map(str::to_string),
        }
    }

    /// The account the identity names, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Internet { account, .. } | Self::Generic { account, .. } => account.as_deref(),
        }
    }

    /// Whether a lookup for `self` finds an item filed under `stored`.
    ///
    /// An identity without an account matches items under any account for
    /// the same host and path, or the same service.
    #[must_use]
    pub fn matches(&self, stored: &Self) -> bool {
        let same_place = match (self, stored) {
            (
                Self::Internet { host, path, .. },
                Self::Internet {
                    host: stored_host,
                    path: stored_path,
                    ..
                },
            ) => host == stored_host && path == stored_path,
            (Self::Generic { service, .. }, Self::Generic { service: stored_service, .. }) => {
                service == stored_service
            }
            _ => false,
        };
        same_place && (self.account().is_none() || self.account() == stored.account())
    }

    /// Stable key under which a store files this identity.
    ///
    /// `%` and `#` inside components are percent-escaped, so distinct
    /// identities never share a key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        let mut key = match self {
            Self::Internet { host, path, .. } => {
                format!("internet:{}{}", escape(host), escape(path))
            }
            Self::Generic { service, .. } => format!("generic:{}", escape(service)),
        };
        if let Some(account) = self.account() {
            key.push('#');
            key.push_str(&escape(account));
        }
        key
    }
}

fn escape(component: &str) -> String {
    component.replace('%', "%25").replace('#', "%23")
}

/// When a stored item may be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Only while the device is unlocked.
    #[default]
    WhenUnlocked,
    /// As `WhenUnlocked`, never migrated to another device.
    WhenUnlockedThisDeviceOnly,
    /// After the first unlock following a restart.
    AfterFirstUnlock,
    /// As `AfterFirstUnlock`, never migrated to another device.
    AfterFirstUnlockThisDeviceOnly,
    /// Always.
    Always,
    /// Always, never migrated to another device.
    AlwaysThisDeviceOnly,
    /// Only while a passcode is set, never migrated.
    WhenPasscodeSetThisDeviceOnly,
}

/// A value the secure store can hold.
pub trait StoredItem: Convertible + Send + Sync {}

/// Credentials for a web service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InternetCredentials {
    /// Account name.
    pub account: String,
    /// Password.
    pub password: Option<String>,
    /// Access token.
    pub token: Option<String>,
    /// Refresh token.
    pub refresh_token: Option<String>,
}

impl Convertible for InternetCredentials {
    const TYPE_NAME: &'static str = "InternetCredentials";

    fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
        Ok(Self {
            account: ctx.decode("acc")?,
            password: ctx.decode_opt("pw")?,
            token: ctx.decode_opt("tok")?,
            refresh_token: ctx.decode_opt("rtok")?,
        })
    }

    fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
        ctx.encode("acc", &self.account);
        ctx.encode_opt("pw", self.password.as_ref());
        ctx.encode_opt("tok", self.token.as_ref());
        ctx.encode_opt("rtok", self.refresh_token.as_ref());
        Ok(())
    }
}

impl StoredItem for InternetCredentials {}

/// Credentials for an arbitrary service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenericCredentials {
    /// Account name.
    pub account: String,
    /// User name.
    pub username: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl Convertible for GenericCredentials {
    const TYPE_NAME: &'static str = "GenericCredentials";

    fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
        Ok(Self {
            account: ctx.decode("acc")?,
            username: ctx.decode_opt("un")?,
            email: ctx.decode_opt("em")?,
            password: ctx.decode_opt("pw")?,
        })
    }

    fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
        ctx.encode("acc", &self.account);
        ctx.encode_opt("un", self.username.as_ref());
        ctx.encode_opt("em", self.email.as_ref());
        ctx.encode_opt("pw", self.password.as_ref());
        Ok(())
    }
}

impl StoredItem for GenericCredentials {}
