//! Course identity and on-chain account types.

use serde::{Deserialize, Serialize};

use super::schedule::MILESTONE_COUNT;
use super::time::UnixTimestamp;

crate::define_id_type!(u64, CourseId);
crate::define_id_type!(u64, TokenId);

/// The `getCourse` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub milestones: [String; MILESTONE_COUNT],
    #[serde(default)]
    pub created_at: UnixTimestamp,
}

impl CourseInfo {
    /// Title to show when the course read failed or returned nothing.
    pub fn fallback_title(id: CourseId) -> String {
        format!("Course #{}", id)
    }
}

/// A `0x`-prefixed, 20-byte hex account address.
///
/// Stored lowercased so that checksummed and plain spellings compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

/// The all-zero address, which the contract returns for "not configured".
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

impl WalletAddress {
    /// Validate and normalize an address.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| format!("Address '{}' must start with 0x", trimmed))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Address '{}' must have 40 hex digits", trimmed));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// The `CertificateMinted(user, courseId, tokenId)` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMinted {
    pub user: WalletAddress,
    pub course_id: CourseId,
    pub token_id: TokenId,
}
