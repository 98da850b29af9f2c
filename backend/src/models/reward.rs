use serde::{Deserialize, Serialize};

/// The `getMyRewardStatus` view: whether the payout happened and its size in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardStatus {
    pub paid: bool,
    pub amount: u128,
}

/// ERC-20 metadata of the reward token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMeta {
    fn default() -> Self {
        Self {
            symbol: "EDU".to_string(),
            decimals: 18,
        }
    }
}
