//! Opaque version tokens and client-side id generation.
//!
//! Tokens only need to be distinguishable, not ordered. The `vN-xxxxx` shape
//! is a readability aid: a chain started on this client reads `v1-..`,
//! `v2-..`, and so on.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;
const SPENDING_ID_LEN: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Produces the token for the version that follows `prev`.
    ///
    /// - no previous version: `v1-` plus 5 lowercase hex digits;
    /// - previous token `vN-xxxxx`: `v{N+1}-` plus fresh hex digits;
    /// - any other previous token: 5 random alphanumerics.
    pub fn generate(prev: Option<&Version>) -> Version {
        let Some(prev) = prev else {
            return Version(format!("v1-{}", hex_suffix()));
        };

        match sequence_number(prev.as_str()) {
            Some(n) => Version(format!("v{}-{}", n.saturating_add(1), hex_suffix())),
            None => Version(random_alphanumeric(SUFFIX_LEN)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.0
    }
}

/// New client-generated spending id (10 alphanumerics).
pub fn new_spending_id() -> String {
    random_alphanumeric(SPENDING_ID_LEN)
}

fn sequence_number(token: &str) -> Option<u64> {
    let (number, suffix) = token.strip_prefix('v')?.split_once('-')?;
    if suffix.len() != SUFFIX_LEN || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

fn hex_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string()
}

fn random_alphanumeric(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        for byte in Uuid::new_v4().as_bytes() {
            if out.len() == len {
                break;
            }
            let idx = usize::from(*byte) % ALPHANUMERIC.len();
            out.push(char::from(ALPHANUMERIC[idx]));
        }
    }
    out
}
