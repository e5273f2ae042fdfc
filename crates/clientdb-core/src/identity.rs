//! # Client Identity
//!
//! Newtype wrappers for the two identifiers a client record carries:
//! the opaque store-assigned [`ClientId`] and the business-facing [`Cif`].
//! Keeping them distinct means a CIF can never be passed where a record id
//! is expected.
//!
//! Identity assignment goes through the [`IdentityGenerator`] trait. The
//! default is [`UuidIdentity`]; [`TimestampIdentity`] produces short tagged
//! identifiers for environments that want time-ordered ids.
//! [`IdentityStrategy`] selects one of the two from configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable identifier of a stored client record.
///
/// Persisted documents may carry ids produced by either generator (or by
/// older tooling), so the inner value is an arbitrary non-empty string
/// rather than a `Uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap an existing identifier. Returns `None` for blank input.
    pub fn parse(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business/tax registration code of a client.
///
/// Whitespace around the code is not significant and is trimmed on
/// construction. An empty code is not a CIF at all, so [`Cif::parse`]
/// returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cif(String);

impl Cif {
    /// Build a CIF from raw input, or `None` if the input is blank.
    pub fn parse(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Access the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh client identifiers.
pub trait IdentityGenerator: Send + Sync {
    /// Produce a new identifier with negligible collision probability.
    fn generate(&self) -> ClientId;
}

impl<T: IdentityGenerator + ?Sized> IdentityGenerator for std::sync::Arc<T> {
    fn generate(&self) -> ClientId {
        (**self).generate()
    }
}

/// Random UUID v4 identities. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentity;

impl IdentityGenerator for UuidIdentity {
    fn generate(&self) -> ClientId {
        ClientId(Uuid::new_v4().to_string())
    }
}

/// Short tagged identities of the form `c_<millis base36>_<random base36>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdentity;

impl IdentityGenerator for TimestampIdentity {
    fn generate(&self) -> ClientId {
        use rand::Rng;

        let millis = crate::temporal::Timestamp::now().epoch_millis().max(0) as u64;
        let suffix: u64 = rand::thread_rng().gen_range(0..36u64.pow(8));
        ClientId(format!("c_{}_{}", to_base36(millis), to_base36(suffix)))
    }
}

/// Configurable choice of identity generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityStrategy {
    /// [`UuidIdentity`].
    #[default]
    Uuid,
    /// [`TimestampIdentity`].
    Timestamp,
}

impl IdentityStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(format!(
                "identity strategy must be \"uuid\" or \"timestamp\", got {other:?}"
            )),
        }
    }
}

impl IdentityGenerator for IdentityStrategy {
    fn generate(&self) -> ClientId {
        match self {
            Self::Uuid => UuidIdentity.generate(),
            Self::Timestamp => TimestampIdentity.generate(),
        }
    }
}

/// Render an unsigned integer in lowercase base 36.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
