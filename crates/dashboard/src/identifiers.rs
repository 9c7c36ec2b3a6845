//! Newtype identifiers.
//!
//! Resource names ([`AppName`], [`AppVersion`], [`InstanceName`]) are distinct
//! newtypes so an application version cannot be passed where an instance name
//! is expected. The endpoint identifiers ([`ApiVersion`], [`BaseUrl`],
//! [`ApiKey`]) are the only configuration a [`crate::Client`] holds. All of
//! them are immutable once constructed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and
// serde conversions that reject the empty string.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::new(value).ok_or_else(|| concat!(stringify!($name), " must not be empty").to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Resource names
// ---------------------------------------------------------------------------

string_id! {
    /// Name of an application definition.
    AppName
}

string_id! {
    /// Version of an application definition. Compared as text: `1.10` and
    /// `1.1` are different versions.
    AppVersion
}

string_id! {
    /// Name of an instance. Unique per dashboard.
    InstanceName
}

// ---------------------------------------------------------------------------
// API generation
// ---------------------------------------------------------------------------

/// Wire-level generation of the dashboard's remote management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Legacy protocol: plain-text and manifest bodies, no authentication.
    V1,
    /// JSON protocol authenticated with an API key header.
    V2,
}

impl ApiVersion {
    /// Path prefix under the base URL that every resource of this generation
    /// lives below. Always ends with `/`.
    pub fn path_prefix(self) -> &'static str {
        match self {
            ApiVersion::V1 => "api/v1/",
            ApiVersion::V2 => "api/v2/",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::V1 => write!(f, "v1"),
            ApiVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            other => Err(format!("unknown API version '{other}' (expected v1 or v2)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Canonical dashboard endpoint: the configured URL with every trailing `/`
/// removed.
///
/// Canonicalised once at construction so that resource paths can always be
/// joined with a single `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a canonical endpoint, returning `None` if nothing but slashes
    /// (or nothing at all) was given.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let trimmed = v.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the endpoint as a string slice (never with a trailing `/`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins `prefix` and `path` onto the endpoint.
    ///
    /// `prefix` is expected to be an [`ApiVersion::path_prefix`]; `path` is
    /// appended verbatim, so callers escape segments themselves.
    pub fn join(&self, prefix: &str, path: &str) -> String {
        format!("{}/{}{}", self.0, prefix, path)
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BaseUrl::new(value).ok_or_else(|| "dashboard URL must not be empty".to_owned())
    }
}

impl From<BaseUrl> for String {
    fn from(url: BaseUrl) -> Self {
        url.0
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// API key sent with every v2 request.
///
/// `Debug` and `Display` never reveal the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a key, returning `None` if the value is empty or blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw key for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}
