//! Opaque 256-bit record identifiers.
//!
//! [`Key`] is the raw 32-byte identifier shared by both namespaces.
//! [`PoolId`] and [`EscrowId`] are type-safe wrappers so that a pool key
//! cannot be passed where an escrow key is expected. Keys are only ever
//! minted by a [`KeyGenerator`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::Address;
use crate::error::LedgerError;

/// Byte length of a [`Key`].
pub const KEY_LEN: usize = 32;

/// Raw 256-bit identifier, rendered as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Creates a `Key` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Encodes a short string as a right zero-padded key.
    ///
    /// Strings longer than 32 bytes are truncated. This is how clients
    /// format placeholder identifiers; such keys are never issued by a
    /// [`KeyGenerator`].
    #[must_use]
    pub fn from_short_string(s: &str) -> Self {
        let mut bytes = [0u8; KEY_LEN];
        let src = s.as_bytes();
        let len = src.len().min(KEY_LEN);
        if let (Some(dst), Some(src)) = (bytes.get_mut(..len), src.get(..len)) {
            dst.copy_from_slice(src);
        }
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Key {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| LedgerError::InvalidRequest(format!("invalid key {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

macro_rules! typed_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Key);

        impl $name {
            /// Wraps a raw [`Key`].
            #[must_use]
            pub const fn from_key(key: Key) -> Self {
                Self(key)
            }

            /// Returns the inner [`Key`].
            #[must_use]
            pub const fn as_key(&self) -> &Key {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<Key> for $name {
            fn from(key: Key) -> Self {
                Self(key)
            }
        }

        impl From<$name> for Key {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_key! {
    /// Identifier of a pool in the [`super::PoolRegistry`].
    PoolId
}

typed_key! {
    /// Identifier of an escrow in the [`super::EscrowLedger`].
    EscrowId
}

/// Mints unique keys for one namespace.
///
/// Each key is the SHA-256 digest of the namespace tag, a monotonically
/// increasing sequence number, the caller, and the length-prefixed input
/// parts. Identical inputs from the same caller still yield distinct keys,
/// and a key is never minted twice because the sequence never rewinds.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    namespace: &'static str,
    sequence: u64,
}

impl KeyGenerator {
    /// Creates a generator for the given namespace tag.
    #[must_use]
    pub const fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            sequence: 0,
        }
    }

    /// Mints the next key.
    pub fn next_key(&mut self, caller: &Address, parts: &[&[u8]]) -> Key {
        let mut hasher = Sha256::new();
        hasher.update(self.namespace.as_bytes());
        hasher.update(self.sequence.to_be_bytes());
        hasher.update(caller.as_bytes());
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        self.sequence = self.sequence.saturating_add(1);
        Key(hasher.finalize().into())
    }
}
