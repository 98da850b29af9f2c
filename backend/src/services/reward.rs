//! Reward amount rendering.

use serde::{Deserialize, Serialize};

use crate::models::{EnrollmentStatus, RewardStatus, TokenMeta, WalletAddress};

/// Render `amount` base units with `decimals` fractional digits.
///
/// Trailing fractional zeros are dropped but one digit always remains, so
/// `10^18` with 18 decimals renders as `"1.0"`.
pub fn format_units(amount: u128, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);

    let (whole, frac) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    format!("{}.{}", whole, frac)
}

/// Reward line of a course page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardView {
    pub amount: String,
    pub symbol: String,
    pub paid: bool,
    /// `Received` / `Pending`, only once the course is completed.
    pub status_label: Option<String>,
}

pub fn reward_view(status: &RewardStatus, token: &TokenMeta, enrollment: EnrollmentStatus) -> RewardView {
    let status_label = (enrollment == EnrollmentStatus::Completed).then(|| {
        if status.paid {
            "Received".to_string()
        } else {
            "Pending".to_string()
        }
    });
    RewardView {
        amount: format_units(status.amount, token.decimals),
        symbol: token.symbol.clone(),
        paid: status.paid,
        status_label,
    }
}

/// Token whose symbol and decimals label the reward.
///
/// The contract's `rewardToken()` wins unless it is the zero address; then the
/// configured address is used. `None` means the EDU/18 defaults apply.
pub fn pick_token_address(
    reward_token: Option<&WalletAddress>,
    configured: Option<&str>,
) -> Option<WalletAddress> {
    if let Some(address) = reward_token.filter(|a| !a.is_zero()) {
        return Some(address.clone());
    }
    configured
        .and_then(|raw| WalletAddress::parse(raw).ok())
        .filter(|a| !a.is_zero())
}
